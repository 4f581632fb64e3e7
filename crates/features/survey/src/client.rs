//! Submission client for the survey endpoint.
//!
//! Drafts are validated locally before anything touches the wire; every
//! failure after that is terminal for the attempt, there are no retries.

use crate::error::{SurveyError, SurveyErrorExt};
use crate::model::{ApiMessage, SubmissionReceipt, SurveySubmission};
use crate::validation::{self, FieldError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

const EXCERPT_LIMIT: usize = 100;

/// Terminal classification of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Stored; the server assigned this record ID.
    Created { id: String },
    /// Local validation failed; no request was issued.
    Rejected { errors: Vec<FieldError> },
    /// The server rejected the payload.
    Invalid { message: String },
    /// The email is already registered.
    DuplicateEmail,
    /// The phone is already registered.
    DuplicatePhone,
    /// The server answered with something other than JSON.
    Unreadable { status: u16, excerpt: String },
    /// Any other non-success answer.
    Failed { status: u16, message: String },
}

/// HTTP client bound to one survey endpoint.
#[derive(Debug, Clone)]
pub struct SurveyClient {
    http: Client,
    endpoint: String,
}

impl SurveyClient {
    /// Creates a client against `base_url` (scheme and authority only).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, SurveyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Building HTTP client")?;

        let endpoint =
            format!("{}/api/survey-responses", base_url.as_ref().trim_end_matches('/'));

        Ok(Self { http, endpoint })
    }

    /// Validates the draft, posts it, and classifies the answer.
    ///
    /// # Errors
    /// [`SurveyError::Transport`] when the request cannot be delivered or
    /// the response body cannot be read.
    pub async fn submit(&self, draft: &SurveySubmission) -> Result<SubmissionOutcome, SurveyError> {
        let errors = validation::validate(draft);
        if !errors.is_empty() {
            return Ok(SubmissionOutcome::Rejected { errors });
        }

        let response = self
            .http
            .post(&self.endpoint)
            .json(draft)
            .send()
            .await
            .context("Sending survey submission")?;

        classify(response).await
    }
}

async fn classify(response: Response) -> Result<SubmissionOutcome, SurveyError> {
    let status = response.status();

    if !is_json(&response) {
        let body = response.text().await.context("Reading non-JSON response")?;
        return Ok(SubmissionOutcome::Unreadable {
            status: status.as_u16(),
            excerpt: excerpt(&body),
        });
    }

    if status == StatusCode::CREATED {
        let receipt: SubmissionReceipt =
            response.json().await.context("Parsing submission receipt")?;
        return Ok(SubmissionOutcome::Created { id: receipt.id });
    }

    let body: ApiMessage = response.json().await.context("Parsing error envelope")?;
    Ok(match status {
        StatusCode::BAD_REQUEST => SubmissionOutcome::Invalid { message: body.message },
        StatusCode::CONFLICT if body.message.contains("Email") => SubmissionOutcome::DuplicateEmail,
        StatusCode::CONFLICT if body.message.contains("Phone") => SubmissionOutcome::DuplicatePhone,
        _ => SubmissionOutcome::Failed { status: status.as_u16(), message: body.message },
    })
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_to_the_limit() {
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).len(), EXCERPT_LIMIT);
        assert_eq!(excerpt("short"), "short");
    }
}
