//! Persistence for survey responses.

use crate::error::SurveyError;
use crate::model::SurveyRecord;
use shub_database::{Database, DatabaseError, Migration};
use shub_domain::constants::SURVEY;
use shub_kernel::safe_nanoid;
use surrealdb::types::SurrealValue;

pub(crate) const TABLE: &str = "survey_response";
const EMAIL_INDEX: &str = "survey_email_idx";
const PHONE_INDEX: &str = "survey_phone_idx";

/// Table schema. Uniqueness of `email` and `phone` lives here, in the two
/// UNIQUE indexes; concurrent duplicates race at the storage layer and
/// exactly one wins.
const SURVEY_SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS survey_response SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS name ON survey_response TYPE string;
    DEFINE FIELD IF NOT EXISTS email ON survey_response TYPE string;
    DEFINE FIELD IF NOT EXISTS phone ON survey_response TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS age ON survey_response TYPE option<int>;
    DEFINE FIELD IF NOT EXISTS gender ON survey_response TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS diagnosis ON survey_response TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS therapist_features ON survey_response TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS guardian_features ON survey_response TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS native_features ON survey_response TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS open_feedback ON survey_response TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS wants_updates ON survey_response TYPE option<bool>;
    DEFINE FIELD IF NOT EXISTS created_at ON survey_response TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS survey_email_idx ON survey_response FIELDS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS survey_phone_idx ON survey_response FIELDS phone UNIQUE;
";

/// Migrations owned by this slice.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(SURVEY, "0001", SURVEY_SCHEMA)]
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    count: i64,
}

/// Insert-only access to the `survey_response` table. Records are created
/// exactly once and never mutated or deleted.
#[derive(Debug, Clone)]
pub struct SurveyRepository {
    db: Database,
}

impl SurveyRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persists one normalized record under a fresh nanoid and returns it.
    ///
    /// # Errors
    /// * [`SurveyError::DuplicateEmail`] / [`SurveyError::DuplicatePhone`]
    ///   when a UNIQUE index rejects the row.
    /// * [`SurveyError::Database`] for any other storage failure.
    pub async fn create(&self, record: SurveyRecord) -> Result<String, SurveyError> {
        let id = safe_nanoid!();

        let outcome = self
            .db
            .query("CREATE type::record($tb, $id) CONTENT $data RETURN NONE")
            .bind(("tb", TABLE))
            .bind(("id", id.clone()))
            .bind(("data", record))
            .await
            .map_err(DatabaseError::from)?
            .check();

        match outcome {
            Ok(_) => Ok(id),
            Err(err) => Err(classify_write_error(err)),
        }
    }

    /// Fetches a stored record by its nanoid.
    pub async fn get(&self, id: &str) -> Result<Option<SurveyRecord>, SurveyError> {
        let record = self
            .db
            .query(
                "SELECT name, email, phone, age, gender, diagnosis, therapist_features, \
                 guardian_features, native_features, open_feedback, wants_updates \
                 FROM ONLY type::record($tb, $id)",
            )
            .bind(("tb", TABLE))
            .bind(("id", id.to_owned()))
            .await
            .map_err(DatabaseError::from)?
            .take::<Option<SurveyRecord>>(0)
            .map_err(DatabaseError::from)?;

        Ok(record)
    }

    /// Total number of stored responses.
    pub async fn count(&self) -> Result<i64, SurveyError> {
        let row = self
            .db
            .query("SELECT count() FROM survey_response GROUP ALL")
            .await
            .map_err(DatabaseError::from)?
            .take::<Option<CountRow>>(0)
            .map_err(DatabaseError::from)?;

        Ok(row.map_or(0, |r| r.count))
    }
}

/// Resolves a rejected write into the conflict it represents, keyed off the
/// UNIQUE index named in the engine error.
fn classify_write_error(err: surrealdb::Error) -> SurveyError {
    let text = err.to_string();
    if text.contains(EMAIL_INDEX) {
        return SurveyError::DuplicateEmail { context: None };
    }
    if text.contains(PHONE_INDEX) {
        return SurveyError::DuplicatePhone { context: None };
    }
    DatabaseError::from(err).into()
}
