//! Upstream domain - the mapping service behind the cache

mod pairing;
mod provider;

pub use pairing::{pair_results, MappingPair};
pub use provider::MappingProvider;

#[cfg(test)]
pub use provider::MockMappingProvider;
