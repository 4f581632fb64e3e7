//! Server-side plumbing shared by every feature slice.

pub mod health;
pub mod middleware;
pub mod router;
pub mod state;

pub use state::{ApiState, ApiStateError};
