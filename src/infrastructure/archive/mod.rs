//! Mapping archive implementations

mod factory;
mod in_memory;
mod postgres;

pub use factory::ArchiveFactory;
pub use in_memory::InMemoryMappingArchive;
pub use postgres::{PostgresArchiveConfig, PostgresMappingArchive};
