//! Infrastructure layer - External service implementations

pub mod archive;
pub mod cache;
pub mod logging;
pub mod observability;
pub mod services;
pub mod upstream;
