//! Infrastructure services

mod batch_resolver;
mod cache_admin;

pub use batch_resolver::BatchResolver;
pub use cache_admin::CacheAdminService;
