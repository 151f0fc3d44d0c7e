//! Cache infrastructure - Mapping cache implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::CacheFactory;
pub use in_memory::InMemoryMappingCache;
pub use redis::{RedisCacheConfig, RedisMappingCache};
