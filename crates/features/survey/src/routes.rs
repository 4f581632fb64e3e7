//! HTTP surface of the survey slice.

use crate::error::SurveyError;
use crate::model::{ApiMessage, SubmissionReceipt, SurveySubmission};
use crate::{Survey, validation};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use shub_derive::api_handler;
use shub_domain::constants::SURVEY_TAG;
use shub_kernel::server::ApiState;
use shub_kernel::server::middleware::{cors_layer, force_json_responses};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes owned by the survey slice, with the `/api` middleware stack
/// (permissive CORS, forced JSON content type) already applied.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(create_survey_response))
        .layer(axum::middleware::from_fn(force_json_responses))
        .layer(cors_layer())
}

#[api_handler(
    post,
    path = "/api/survey-responses",
    request_body = SurveySubmission,
    responses(
        (status = CREATED, description = "Survey response stored", body = SubmissionReceipt),
        (status = BAD_REQUEST, description = "Validation failed", body = ApiMessage),
        (status = CONFLICT, description = "Email or phone already registered", body = ApiMessage),
        (status = INTERNAL_SERVER_ERROR, description = "Processing error", body = ApiMessage),
    ),
    tag = SURVEY_TAG,
)]
pub(crate) async fn create_survey_response(
    State(state): State<ApiState>,
    payload: Result<Json<SurveySubmission>, JsonRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    // Unparseable bodies get the same error envelope as every other failure.
    let Json(submission) = payload.map_err(|rejection| SurveyError::Validation {
        message: rejection.body_text().into(),
        context: None,
    })?;

    if !validation::has_required_identity(&submission) {
        return Err(SurveyError::Validation {
            message: "name and email are required".into(),
            context: None,
        });
    }

    let errors = validation::validate(&submission);
    if !errors.is_empty() {
        return Err(SurveyError::Validation {
            message: validation::describe(&errors).into(),
            context: None,
        });
    }

    let survey = state.try_get_slice::<Survey>()?;
    let id = survey.repository.create(validation::normalize(submission)).await?;

    Ok((StatusCode::CREATED, Json(SubmissionReceipt { success: true, id })))
}
