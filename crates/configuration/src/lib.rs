use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Account, Config, Overview, Scheduler, Warehouse};

/// Prefix of the environment variables that override file values,
/// e.g. `PULSE__OVERVIEW__WINDOW_DAYS=14`.
pub const ENV_PREFIX: &str = "PULSE";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// layers `PULSE__*` environment variables over it, deserializes the result into our
/// strongly-typed `Config` struct and validates it.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the application configuration from an explicit file path.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    load_layered(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

// Environment values take precedence over the file.
fn load_layered(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml))
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        account = %config.account.name,
        window_days = config.overview.window_days,
        "Configuration loaded."
    );

    Ok(config)
}
