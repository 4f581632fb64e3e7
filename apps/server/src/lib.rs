//! # SurveyHub Server
//!
//! The survey collection backend: an `Axum` HTTP API over `SurrealDB`,
//! assembled from feature slices.
//!
//! ## Example
//! ```no_run
//! use shub_server::Server;
//!
//! #[shub_runtime::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4710)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result, anyhow};
use axum_server::Handle;
use shub::domain::config::ApiConfig;
use shub::kernel::server::ApiState;
use shub_database::Database;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Configures and assembles a [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Replaces the whole configuration (usually the output of `load_config`).
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Overrides the listener port.
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Assembles the server: database session, slice registration, API state.
    ///
    /// # Errors
    /// Fails when the TLS material is missing, the database is unreachable,
    /// a migration is rejected, or a slice cannot initialize.
    pub async fn build(self) -> Result<Server> {
        self.check_tls_material()?;

        info!(address = %self.cfg.server.socket_addr(), "Initializing server");

        let db = self.connect_database().await?;

        let slices = shub::init(&db).map_err(|e| anyhow!("Feature bootstrap failed: {e}"))?;

        let mut state_builder = ApiState::builder().config(self.cfg).db(db);
        for slice in slices {
            state_builder = state_builder.register_slice(slice);
        }
        let state = state_builder.build().context("Failed to finalize API state registry")?;

        Ok(Server { state })
    }

    async fn connect_database(&self) -> Result<Database> {
        let db_cfg = &self.cfg.database;
        let mut builder = Database::builder()
            .url(&db_cfg.url)
            .session(&db_cfg.namespace, &db_cfg.database)
            .migrations(shub::migrations());

        if let Some(creds) = &db_cfg.credentials {
            builder = builder.auth(&creds.username, &creds.password);
        }

        builder.init().await.context("Failed to establish database connection")
    }

    fn check_tls_material(&self) -> Result<()> {
        let Some(ssl) = &self.cfg.server.ssl else { return Ok(()) };

        for (label, path) in [("certificate", &ssl.cert), ("key", &ssl.key)] {
            if !path.exists() {
                anyhow::bail!("SSL {label} not found at: {}", path.display());
            }
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = ssl.key.metadata()?.permissions().mode();
            if mode & 0o077 != 0 {
                tracing::warn!(
                    "SECURITY: SSL private key {} is group/world accessible (should be 600)",
                    ssl.key.display()
                );
            }
        }

        Ok(())
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Serves the API until Ctrl+C or SIGTERM, then drains connections for
    /// up to [`SHUTDOWN_GRACE`].
    ///
    /// # Errors
    /// Fails when the listener cannot bind or the TLS material cannot load.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = cfg.server.socket_addr();

        let app = router::init(self.state);

        let handle = Handle::<SocketAddr>::new();
        spawn_shutdown_watcher(handle.clone());

        if let Some(ssl) = &cfg.server.ssl {
            info!("Listening on https://{address}");

            let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                .await
                .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Listening on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Shared application state (useful for embedding in tests).
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

fn spawn_shutdown_watcher(handle: Handle<SocketAddr>) {
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            error!("Error while waiting for shutdown signal: {e}");
            return;
        }
        info!("Shutdown signal received, draining connections...");
        handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
