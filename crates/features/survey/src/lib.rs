//! Survey feature slice: draft validation, the persistence endpoint, and the
//! submission client.

pub mod error;
pub mod model;
pub mod validation;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub use repository::{SurveyRepository, migrations};

#[cfg(feature = "server")]
use crate::error::SurveyError;
#[cfg(feature = "server")]
use shub_database::Database;
#[cfg(feature = "server")]
use shub_kernel::domain::registry::InitializedSlice;

/// Survey feature state.
#[cfg(feature = "server")]
#[shub_derive::shub_slice]
pub struct Survey {
    pub repository: SurveyRepository,
}

/// Initialize the survey feature against an established database session.
///
/// # Errors
/// Reserved for future wiring; initialization is currently infallible.
#[cfg(feature = "server")]
pub fn init(database: &Database) -> Result<InitializedSlice, SurveyError> {
    let repository = SurveyRepository::new(database.clone());

    tracing::info!("Survey server slice initialized");

    let slice = Survey::new(SurveyInner { repository });

    Ok(InitializedSlice::new(slice))
}
