use std::time::Duration;

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use config::Source;
use pt_http::riot;
use pt_http::HttpClientConfig;
use pt_ratelimit::presets::riot::Budget;
use pt_ratelimit::presets::riot::LONG_WINDOW_LIMIT;
use pt_ratelimit::presets::riot::SHORT_WINDOW_LIMIT;
use serde::Deserialize;

use crate::cli::Cli;

/// Environment variables are read as `PLAYTIME_<KEY>` and `PLAYTIME_<TABLE>__<KEY>`
pub const ENV_PREFIX: &str = "PLAYTIME";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub verbose: bool,

    /// Also write hourly rolling log files here
    pub log_dir: Option<String>,

    pub api: ApiSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub scheme: String,
    pub domain: String,
    pub page_size: u32,
    pub retry_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    pub short_limit: u32,
    pub short_window_ms: u64,
    pub long_limit: u32,
    pub long_window_ms: u64,
}

impl Settings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.api.retry_delay_ms)
    }

    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::default()
            .with_timeouts(Duration::from_millis(self.api.connect_timeout_ms), Duration::from_millis(self.api.request_timeout_ms))
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for (key, value) in [("server", &self.server), ("summoner_name", &self.summoner_name), ("api_key", &self.api_key)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{key} is required (flag, {ENV_PREFIX}_{} or config file)", key.to_uppercase())));
            }
        }

        if self.limits.short_limit == 0 || self.limits.long_limit == 0 {
            return Err(ConfigError::Message("limits.short_limit and limits.long_limit must be positive".to_string()));
        }
        if self.limits.short_window_ms == 0 || self.limits.long_window_ms == 0 {
            return Err(ConfigError::Message("limits.short_window_ms and limits.long_window_ms must be positive".to_string()));
        }

        Ok(self)
    }
}

impl LimitSettings {
    pub fn short_budget(&self) -> Budget {
        Budget::new(self.short_limit, Duration::from_millis(self.short_window_ms))
    }

    pub fn long_budget(&self) -> Budget {
        Budget::new(self.long_limit, Duration::from_millis(self.long_window_ms))
    }
}

/// Defaults, then the optional config file, then `PLAYTIME_*` variables, then flags
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let file = File::from(cli.config.as_path()).format(FileFormat::Toml).required(false);
    layered(cli, file, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__").try_parsing(true)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("api.scheme", "https")?
        .set_default("api.domain", riot::RIOT_API_DOMAIN)?
        .set_default("api.page_size", i64::from(riot::MAX_PAGE_SIZE))?
        .set_default("api.retry_delay_ms", riot::DEFAULT_RETRY_DELAY.as_millis() as i64)?
        .set_default("api.connect_timeout_ms", 10_000)?
        .set_default("api.request_timeout_ms", 30_000)?
        .set_default("limits.short_limit", i64::from(SHORT_WINDOW_LIMIT))?
        .set_default("limits.short_window_ms", 1_000)?
        .set_default("limits.long_limit", i64::from(LONG_WINDOW_LIMIT))?
        .set_default("limits.long_window_ms", 120_000)
}

fn layered<F, E>(cli: &Cli, file: F, env: E) -> Result<Settings, ConfigError>
where
    F: Source + Send + Sync + 'static,
    E: Source + Send + Sync + 'static,
{
    let config = defaults()?
        .add_source(file)
        .add_source(env)
        .set_override_option("server", cli.server.clone())?
        .set_override_option("summoner_name", cli.summoner_name.clone())?
        .set_override_option("api_key", cli.api_key.clone())?
        .set_override_option("verbose", cli.verbose.then_some(true))?
        .build()?;

    config.try_deserialize::<Settings>()?.validate()
}
