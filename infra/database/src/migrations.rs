use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// Schema bootstrap for the migration ledger itself.
const LEDGER_SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS migration_slice_version_idx ON migration FIELDS slice, version UNIQUE;
";

/// A single schema migration owned by a feature slice.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Slice key, e.g. `survey`.
    pub slice: &'static str,
    /// Monotonic version within the slice, e.g. `0001`.
    pub version: &'static str,
    /// SurrealQL DDL/DML executed inside one transaction.
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    fn checksum(&self) -> String {
        let digest = Sha256::digest(self.script.as_bytes());
        format!("{digest:x}")
    }
}

/// Outcome of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

/// Ledger row for an applied migration.
#[derive(Debug, SurrealValue)]
pub struct AppliedMigration {
    pub slice: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        self.db.query(LEDGER_SCHEMA).await.context("Bootstrapping migration ledger")?;

        let mut report = MigrationReport::default();
        let ledger = self.ledger_map().await?;

        for migration in migrations {
            let checksum = migration.checksum();
            if let Some(existing) = ledger.get(&migration.key()) {
                if existing.checksum != checksum {
                    return Err(DatabaseError::Migration {
                        message: format!(
                            "Checksum mismatch for {} (expected {}, got {})",
                            migration.key(),
                            existing.checksum,
                            checksum
                        )
                        .into(),
                        context: Some("Migration already applied with different checksum".into()),
                    });
                }
                report.skipped.push(self.entry(migration, checksum));
                continue;
            }

            self.apply(migration, &checksum).await?;
            report.applied.push(self.entry(migration, checksum));
        }

        Ok(report)
    }

    fn entry(&self, migration: &Migration, checksum: String) -> AppliedMigration {
        AppliedMigration {
            slice: migration.slice.to_owned(),
            version: migration.version.to_owned(),
            checksum,
        }
    }

    async fn apply(&self, migration: &Migration, checksum: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum.to_owned()))
            .await
            .context(format!("SQL execution failed at {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Migration rejected at {}", migration.key()))?;

        Ok(())
    }

    async fn ledger_map(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing migration ledger")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}
