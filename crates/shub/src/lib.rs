//! Facade crate for `SurveyHub` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `shub` with the desired feature flags (`server`/`client`).
//! - Call `shub::init` (server) to register feature slices; extend as new slices appear.

pub use shub_domain as domain;
pub use shub_kernel as kernel;

#[cfg(feature = "server")]
use shub_database::{Database, Migration};

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use shub_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use shub_survey as survey;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "client")]
        "client",
        #[cfg(feature = "server")]
        "survey",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema migrations of every enabled feature, in application order.
#[cfg(feature = "server")]
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::survey::migrations()
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Survey
    slices.push(features::survey::init(database)?);

    Ok(slices)
}
