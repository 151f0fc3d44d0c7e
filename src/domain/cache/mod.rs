//! Cache domain - storage abstraction for resolved mappings

mod repository;

pub use repository::{MappingCache, MappingCacheExt};

#[cfg(test)]
pub use repository::mock::MockMappingCache;
