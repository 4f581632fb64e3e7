//! # Database Infrastructure
//!
//! Unified access to [SurrealDB](https://surrealdb.com) sessions across the
//! workspace, via the `any` engine (`mem://`, `rocksdb://`, `ws://`,
//! `http://`).
//!
//! Connections are established by a fluent builder that validates its
//! parameters, waits out engine startup with retried health checks, signs in
//! when credentials are present, and applies slice-owned, checksummed schema
//! migrations recorded in a `migration` ledger table.
//!
//! ## Example
//!
//! ```rust
//! use shub_database::{Database, DatabaseError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("shub", "core")
//!         .init()
//!         .await?;
//!
//!     let _version = db.version().await?;
//!
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use migrations::{AppliedMigration, Migration, MigrationReport};

use migrations::MigrationRunner;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, trace, warn};

const HEALTH_ATTEMPTS: u32 = 3;
const HEALTH_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// Cloneable handle to an established `SurrealDB` session. Derefs to the
/// underlying client, so queries read the same as on `Surreal<Any>`.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Applies `migrations`, skipping entries already in the ledger.
    ///
    /// # Errors
    /// [`DatabaseError::Migration`] on checksum mismatch,
    /// [`DatabaseError::Surreal`] when a script fails to execute.
    pub async fn apply_migrations(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        MigrationRunner::new(self.inner.instance.clone()).run(migrations).await
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// Collects connection parameters for [`DatabaseBuilder::init`]. URL,
/// namespace, and database name are mandatory; credentials and migrations
/// are not.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
    migrations: Vec<Migration>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Root credentials for authenticated engines.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Schema scripts to apply once the session is active.
    pub fn migrations(mut self, migrations: impl IntoIterator<Item = Migration>) -> Self {
        self.migrations.extend(migrations);
        self
    }

    /// Connects, authenticates, activates the session, and runs migrations.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or stays
    ///   unhealthy after [`HEALTH_ATTEMPTS`] checks.
    /// * [`DatabaseError::Auth`] if the credentials are rejected.
    /// * [`DatabaseError::Surreal`] if session activation or a migration
    ///   script fails.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = self.url.ok_or_else(|| required("URL"))?;
        let ns = self.ns.ok_or_else(|| required("Namespace"))?;
        let db = self.db.ok_or_else(|| required("Database"))?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        wait_until_healthy(&instance, &url).await?;

        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth {
                    message: e.to_string().into(),
                    context: Some(url.clone().into()),
                }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        if !self.migrations.is_empty() {
            let report = MigrationRunner::new(instance.clone()).run(&self.migrations).await?;
            for skipped in &report.skipped {
                trace!(slice = skipped.slice, version = skipped.version, "Skipping migration");
            }
            for applied in &report.applied {
                info!(slice = applied.slice, version = applied.version, "Applied migration");
            }
        }

        Ok(Database { inner: Arc::new(DatabaseInner { instance, ns, db }) })
    }
}

fn required(what: &'static str) -> DatabaseError {
    DatabaseError::Validation { message: format!("{what} is required").into(), context: None }
}

/// Embedded engines can report unhealthy briefly after `connect`; retry with
/// exponential backoff before giving up.
async fn wait_until_healthy(instance: &Surreal<Any>, url: &str) -> Result<(), DatabaseError> {
    let mut delay = HEALTH_BACKOFF;
    for attempt in 1..=HEALTH_ATTEMPTS {
        if instance.health().await.is_ok() {
            return Ok(());
        }
        if attempt == HEALTH_ATTEMPTS {
            break;
        }
        warn!(attempt, ?delay, "Database not ready, retrying...");
        tokio::time::sleep(delay).await;
        delay *= 2;
    }

    Err(DatabaseError::Connection {
        message: "Unhealthy after retries".into(),
        context: Some(url.to_owned().into()),
    })
}
