use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Fetch configuration.
///
/// Nothing here is required: the defaults send an empty User-Agent and
/// never time out.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ScraperConfig {
    /// Value of the User-Agent header sent with the request
    #[serde(default)]
    pub user_agent: String,
    /// Request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPE__ prefix
    /// 2. recipe-scrape.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPE__USER_AGENT
    pub fn load() -> Result<Self, ConfigError> {
        load_config("recipe-scrape")
    }
}

/// Load configuration from the named file (extension optional) and environment
pub fn load_config(file_name: &str) -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(file_name).required(false))
        .add_source(
            Environment::with_prefix("RECIPE_SCRAPE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
