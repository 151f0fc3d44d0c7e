//! Upstream infrastructure - Mapping API clients

mod openfigi;

pub use openfigi::{OpenFigiClient, OpenFigiConfig, API_KEY_HEADER};
