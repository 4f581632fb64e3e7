//! Ergonomic re-exports for slice and application code.

pub use crate::config::{ConfigError, load_config};
pub use crate::safe_nanoid;
pub use shub_domain::config::ApiConfig;
pub use shub_domain::registry::{FeatureSlice, InitializedSlice};

#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError};
