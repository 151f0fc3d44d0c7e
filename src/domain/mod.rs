//! Domain layer - Core business logic and entities

pub mod archive;
pub mod cache;
pub mod error;
pub mod mapping;
pub mod upstream;

pub use archive::{flatten_mapping, ArchivedMapping, MappingArchive};
pub use cache::{MappingCache, MappingCacheExt};
pub use error::DomainError;
pub use mapping::{
    derive_key, derive_keys, BatchOutcome, CacheKey, LookupRequest, MappingResult, OrderingPolicy,
    Resolution, UnresolvedReason,
};
pub use upstream::{pair_results, MappingPair, MappingProvider};
