use std::borrow::Cow;

/// A specialized [`SurveyError`] enum of this crate.
#[shub_derive::shub_error]
pub enum SurveyError {
    /// The draft violated one or more field rules.
    #[error("Survey validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// The email collided with an existing record.
    #[error("Email already registered{}", format_context(.context))]
    DuplicateEmail { context: Option<Cow<'static, str>> },
    /// The phone collided with an existing record.
    #[error("Phone already registered{}", format_context(.context))]
    DuplicatePhone { context: Option<Cow<'static, str>> },
    /// The slice was not registered in the API state.
    #[cfg(feature = "server")]
    #[error("Survey state error{}: {source}", format_context(.context))]
    State { source: shub_kernel::server::ApiStateError, context: Option<Cow<'static, str>> },
    /// The storage layer failed outside of uniqueness handling.
    #[cfg(feature = "server")]
    #[error("Survey database error{}: {source}", format_context(.context))]
    Database { source: shub_database::DatabaseError, context: Option<Cow<'static, str>> },
    /// The submission request could not be delivered or read.
    #[cfg(feature = "client")]
    #[error("Survey transport error{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal survey error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
mod response {
    use super::SurveyError;
    use crate::model::ApiMessage;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    /// Maps slice errors onto the wire contract.
    ///
    /// Validation failures echo their message; duplicate conflicts name the
    /// colliding field; everything else is logged server-side and reported
    /// as an opaque processing error.
    impl IntoResponse for SurveyError {
        fn into_response(self) -> Response {
            let (status, message) = match &self {
                Self::Validation { message, .. } => {
                    (StatusCode::BAD_REQUEST, message.clone().into_owned())
                },
                Self::DuplicateEmail { .. } => {
                    (StatusCode::CONFLICT, "Email already registered".to_owned())
                },
                Self::DuplicatePhone { .. } => {
                    (StatusCode::CONFLICT, "Phone already registered".to_owned())
                },
                _ => {
                    tracing::error!(error = %self, "Survey request failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "processing error".to_owned())
                },
            };

            (status, Json(ApiMessage { message })).into_response()
        }
    }
}
