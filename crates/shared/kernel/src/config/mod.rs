use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

#[shub_derive::shub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file with environment overrides on top.
///
/// The file (default `server`, any extension the `config` crate knows) is
/// required; `SHUB__*` variables override individual keys, nested with
/// double underscores, e.g. `SHUB__DATABASE__URL` sets `database.url`.
///
/// # Errors
/// Returns [`ConfigError`] when the file is missing, an override is
/// malformed, or the merged tree does not deserialize into `T`.
///
/// # Example
/// ```rust
/// use shub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());
    info!("Loading config from {}", file.display());

    Config::builder()
        .add_source(File::from(file.as_path()).required(true))
        .add_source(
            Environment::with_prefix("SHUB").separator("__").convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
