//! Archive domain - durable record of mappings resolved from upstream

mod record;
mod repository;

pub use record::{flatten_mapping, ArchivedMapping};
pub use repository::MappingArchive;

#[cfg(test)]
pub use repository::MockMappingArchive;
