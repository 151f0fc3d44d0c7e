//! Mapping domain - lookup requests, cache keys and resolution outcomes

mod key;
mod ordering;
mod request;
mod result;

pub use key::{derive_key, derive_keys, CacheKey, KEY_SEPARATOR};
pub use ordering::OrderingPolicy;
pub use request::LookupRequest;
pub use result::{BatchOutcome, MappingResult, Resolution, UnresolvedReason};
