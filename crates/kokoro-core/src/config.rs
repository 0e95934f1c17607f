//! Service configuration loaded from defaults, an optional TOML file, and
//! `KOKORO`-prefixed environment variables.
//!
//! The LLM API key deliberately stays out of this struct — it lives only in
//! the environment (`ANTHROPIC_API_KEY`), so config dumps never leak it.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gateway/core configuration.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | KOKORO__APP_NAME | Kokoro Diary | Display name used in logs. |
/// | KOKORO__PORT | 8000 | Gateway HTTP port (loopback only). |
/// | KOKORO__TZ_OFFSET_HOURS | 9 | Fixed UTC offset for all calendar math (JST). |
/// | KOKORO__MODEL | claude-sonnet-4-20250514 | Anthropic model id. |
/// | KOKORO__MAX_TOKENS | 1000 | Completion budget for the diary message. |
/// | KOKORO__REQUEST_TIMEOUT_SECS | 60 | Upstream call timeout. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub app_name: String,
    pub port: u16,
    pub tz_offset_hours: i32,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

impl CoreConfig {
    /// Load config. Precedence: env `KOKORO_CONFIG` path > `config/gateway.toml`
    /// > defaults, then `KOKORO__*` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("KOKORO_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Kokoro Diary")?
            .set_default("port", 8000_i64)?
            .set_default("tz_offset_hours", 9_i64)?
            .set_default("model", "claude-sonnet-4-20250514")?
            .set_default("max_tokens", 1000_i64)?
            .set_default("request_timeout_secs", 60_i64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("KOKORO").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    /// The fixed evaluation-time offset. Out-of-range values fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_hours.saturating_mul(3600))
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("UTC offset is valid"))
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Kokoro Diary".to_string(),
            port: 8000,
            tz_offset_hours: 9,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1000,
            request_timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timezone_is_jst() {
        let config = CoreConfig::default();
        assert_eq!(config.timezone().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = CoreConfig {
            tz_offset_hours: 9999,
            ..CoreConfig::default()
        };
        assert_eq!(config.timezone().local_minus_utc(), 0);
    }
}
