//! Field rules shared by the persistence endpoint and the submission client.
//!
//! Both sides run the same checks: the client to spare the respondent a
//! round-trip, the endpoint because it trusts nobody.

#[cfg(feature = "server")]
use crate::model::SurveyRecord;
use crate::model::SurveySubmission;
use shub_domain::survey::{FeatureCatalog, Gender};
use std::borrow::Cow;
use std::str::FromStr;

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: Cow<'static, str>,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Whether the draft carries the two mandatory identity fields.
#[must_use]
pub fn has_required_identity(draft: &SurveySubmission) -> bool {
    cleaned(draft.name.as_deref()).is_some() && cleaned(draft.email.as_deref()).is_some()
}

/// Runs every field rule and returns the complete list of violations.
#[must_use]
pub fn validate(draft: &SurveySubmission) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if cleaned(draft.name.as_deref()).is_none() {
        errors.push(FieldError::new("name", "name is required"));
    }

    match cleaned(draft.email.as_deref()) {
        None => errors.push(FieldError::new("email", "email is required")),
        Some(email) if !is_email(email) => {
            errors.push(FieldError::new("email", "email is not a valid address"));
        },
        Some(_) => {},
    }

    if let Some(age) = draft.age
        && age < 1
    {
        errors.push(FieldError::new("age", "age must be at least 1"));
    }

    if let Some(gender) = cleaned(draft.gender.as_deref())
        && Gender::from_str(gender).is_err()
    {
        errors.push(FieldError::new("gender", "gender must be male, female or other"));
    }

    check_catalog(
        &mut errors,
        "therapistFeatureChoices",
        FeatureCatalog::Therapist,
        &draft.therapist_feature_choices,
    );
    check_catalog(
        &mut errors,
        "guardianFeatureChoices",
        FeatureCatalog::Guardian,
        &draft.guardian_feature_choices,
    );
    check_catalog(
        &mut errors,
        "nativeFeatureChoices",
        FeatureCatalog::Native,
        &draft.native_feature_choices,
    );

    errors
}

/// Flattens violations into one human-readable line for the error envelope.
#[must_use]
pub fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Converts a validated draft into its storage row.
///
/// Blank or whitespace-only optionals are dropped; the gender string is
/// canonicalized to its lowercase enum form.
#[cfg(feature = "server")]
#[must_use]
pub fn normalize(draft: SurveySubmission) -> SurveyRecord {
    let gender = cleaned_owned(draft.gender)
        .and_then(|g| Gender::from_str(&g).ok())
        .map(|g| g.to_string());

    SurveyRecord {
        name: cleaned_owned(draft.name).unwrap_or_default(),
        email: cleaned_owned(draft.email).unwrap_or_default(),
        phone: cleaned_owned(draft.phone),
        age: draft.age,
        gender,
        diagnosis: cleaned_owned(draft.diagnosis),
        therapist_features: draft.therapist_feature_choices,
        guardian_features: draft.guardian_feature_choices,
        native_features: draft.native_feature_choices,
        open_feedback: cleaned_owned(draft.open_feedback),
        wants_updates: draft.wants_updates,
    }
}

fn check_catalog(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    catalog: FeatureCatalog,
    choices: &[String],
) {
    for choice in choices {
        if !catalog.contains(choice) {
            errors.push(FieldError::new(
                field,
                format!("'{choice}' is not a known {catalog} feature"),
            ));
        }
    }
}

/// Trims a draft value, treating whitespace-only input as absent.
fn cleaned(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn cleaned_owned(value: Option<String>) -> Option<String> {
    cleaned(value.as_deref()).map(str::to_owned)
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_draft() -> SurveySubmission {
        SurveySubmission {
            name: Some("Ana Souza".to_owned()),
            email: Some("ana@example.com".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_draft_passes() {
        assert!(has_required_identity(&minimal_draft()));
        assert!(validate(&minimal_draft()).is_empty());
    }

    #[test]
    fn whitespace_identity_counts_as_missing() {
        let mut draft = minimal_draft();
        draft.name = Some("   ".to_owned());
        assert!(!has_required_identity(&draft));

        let errors = validate(&draft);
        assert!(errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["plainaddress", "@no-local.com", "user@nodot", "a b@x.com", "user@@x.com"] {
            let mut draft = minimal_draft();
            draft.email = Some(email.to_owned());
            assert!(
                validate(&draft).iter().any(|e| e.field == "email"),
                "accepted malformed email: {email}"
            );
        }
    }

    #[test]
    fn zero_age_is_rejected() {
        let mut draft = minimal_draft();
        draft.age = Some(0);
        let errors = validate(&draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "age");
    }

    #[test]
    fn unknown_gender_and_choice_are_both_reported() {
        let mut draft = minimal_draft();
        draft.gender = Some("robot".to_owned());
        draft.guardian_feature_choices = vec!["Teleportation".to_owned()];

        let errors = validate(&draft);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == "gender"));
        assert!(errors.iter().any(|e| e.field == "guardianFeatureChoices"));
    }

    #[test]
    fn describe_joins_all_violations() {
        let draft = SurveySubmission { age: Some(0), ..Default::default() };
        let line = describe(&validate(&draft));
        assert!(line.contains("name"));
        assert!(line.contains("email"));
        assert!(line.contains("age"));
    }

    #[cfg(feature = "server")]
    #[test]
    fn normalize_strips_blank_optionals() {
        let mut draft = minimal_draft();
        draft.name = Some("  Ana Souza  ".to_owned());
        draft.phone = Some("   ".to_owned());
        draft.diagnosis = Some("\t".to_owned());
        draft.gender = Some(" female ".to_owned());
        draft.open_feedback = Some("more charts please".to_owned());

        let record = normalize(draft);
        assert_eq!(record.name, "Ana Souza");
        assert_eq!(record.phone, None);
        assert_eq!(record.diagnosis, None);
        assert_eq!(record.gender.as_deref(), Some("female"));
        assert_eq!(record.open_feedback.as_deref(), Some("more charts please"));
    }
}
