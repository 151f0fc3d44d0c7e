//! API layer - HTTP endpoints, gateway envelope and middleware

pub mod admin;
pub mod envelope;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use envelope::{handle_admin_event, handle_mapping_event, GatewayEvent, GatewayResponse};
pub use router::create_router_with_state;
pub use state::AppState;
