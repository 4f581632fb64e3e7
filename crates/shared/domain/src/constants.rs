//! Shared constant values: API documentation tags, slice keys, and the fixed
//! feature-choice catalogs presented to respondents.

/// OpenAPI tag for system endpoints.
pub const SYSTEM_TAG: &str = "System";
/// OpenAPI tag for survey endpoints.
pub const SURVEY_TAG: &str = "Survey";

/// Slice key for the survey feature.
pub const SURVEY: &str = "survey";

/// Features proposed to therapists.
pub const THERAPIST_FEATURES: &[&str] = &[
    "Symptom Monitoring",
    "Session Logging",
    "Goal Setting",
    "Custom Reports",
    "Image Gallery",
    "Appointment Schedule",
];

/// Features proposed to parents and guardians.
pub const GUARDIAN_FEATURES: &[&str] =
    &["Progress Charts", "Practical Guidance", "Therapist Messaging", "File Access"];

/// Platform-level features spanning clinics.
pub const NATIVE_FEATURES: &[&str] = &["Cross-Clinic Reports"];
