//! Wire and storage models for survey submissions.

use shub_derive::api_model;
#[cfg(feature = "server")]
use surrealdb::types::SurrealValue;

/// Incoming survey draft, as posted by the form.
///
/// The two required fields stay `Option` so that a payload missing `name` or
/// `email` still deserializes and reaches the validation layer, which owns
/// the error message for that case.
#[api_model]
#[derive(Clone, Default)]
pub struct SurveySubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub therapist_feature_choices: Vec<String>,
    #[serde(default)]
    pub guardian_feature_choices: Vec<String>,
    #[serde(default)]
    pub native_feature_choices: Vec<String>,
    pub open_feedback: Option<String>,
    pub wants_updates: Option<bool>,
}

/// Body returned when a submission is persisted.
#[api_model]
pub struct SubmissionReceipt {
    pub success: bool,
    pub id: String,
}

/// Error envelope shared by every non-2xx API response.
#[api_model]
pub struct ApiMessage {
    pub message: String,
}

/// Normalized row as persisted in the `survey_response` table.
///
/// Blank optionals are dropped before this struct is built, so `None` here
/// means the respondent left the field empty.
#[cfg(feature = "server")]
#[derive(Debug, Clone, PartialEq, SurrealValue)]
pub struct SurveyRecord {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub diagnosis: Option<String>,
    pub therapist_features: Vec<String>,
    pub guardian_features: Vec<String>,
    pub native_features: Vec<String>,
    pub open_feedback: Option<String>,
    pub wants_updates: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let draft = SurveySubmission {
            name: Some("Ana".to_owned()),
            email: Some("ana@example.com".to_owned()),
            guardian_feature_choices: vec!["Progress Charts".to_owned()],
            wants_updates: Some(true),
            ..Default::default()
        };

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["guardianFeatureChoices"][0], "Progress Charts");
        assert_eq!(json["wantsUpdates"], true);
        assert!(json.get("guardian_feature_choices").is_none());
    }

    #[test]
    fn unknown_wire_fields_are_rejected() {
        let raw = r#"{"name":"Ana","email":"ana@example.com","favoriteColor":"blue"}"#;
        assert!(serde_json::from_str::<SurveySubmission>(raw).is_err());
    }

    #[test]
    fn missing_choice_arrays_default_to_empty() {
        let raw = r#"{"name":"Ana","email":"ana@example.com"}"#;
        let draft: SurveySubmission = serde_json::from_str(raw).unwrap();
        assert!(draft.therapist_feature_choices.is_empty());
        assert!(draft.native_feature_choices.is_empty());
    }
}
