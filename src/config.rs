use connect_date::{Zone, ZoneError};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

const CONFIG_FILE: &str = "connect-date.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decode: DecodeConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DecodeConfig {
    /// `local` or an IANA zone name, used for epoch-millisecond values.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Also print the UTC midnight timestamp of each day.
    #[serde(default)]
    pub timestamps: bool,
}

fn default_timezone() -> String {
    "local".to_string()
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl DecodeConfig {
    pub fn zone(&self) -> Result<Zone, ZoneError> {
        self.timezone.parse()
    }
}

/// Load configuration from connect-date.toml and environment variables
pub fn load() -> Result<Config, figment::Error> {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        // Use double-underscore nesting for snake_case keys
        .merge(Env::prefixed("CONNECT_DATE_").split("__"))
        .extract()
}

/// Validate configuration and return a user-friendly error
pub fn validate(config: &Config) -> Result<Zone, String> {
    config
        .decode
        .zone()
        .map_err(|err| format!("decode.timezone: {err}"))
}
