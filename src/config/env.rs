//! Environment overrides for [`TrackerConfig`].

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

use super::tracker::TrackerConfig;

pub const COLLECTOR_URL_VAR: &str = "DAILYQUERY_COLLECTOR_URL";
pub const APP_ID_VAR: &str = "DAILYQUERY_APP_ID";
pub const APP_VERSION_VAR: &str = "DAILYQUERY_APP_VERSION";
pub const ARTICLE_VIEW_DELAY_VAR: &str = "DAILYQUERY_ARTICLE_VIEW_DELAY_MS";
pub const MEDIA_WARMUP_VAR: &str = "DAILYQUERY_MEDIA_WARMUP_MS";

impl TrackerConfig {
    /// Defaults overridden by `DAILYQUERY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = TrackerConfig::default();

        config.collector_url = try_load(&lookup, COLLECTOR_URL_VAR, config.collector_url)?;
        config.app_id = try_load(&lookup, APP_ID_VAR, config.app_id)?;
        config.app_version = try_load(&lookup, APP_VERSION_VAR, config.app_version)?;
        config.article_view_delay_ms =
            try_load(&lookup, ARTICLE_VIEW_DELAY_VAR, config.article_view_delay_ms)?;
        config.media_warmup_ms = try_load(&lookup, MEDIA_WARMUP_VAR, config.media_warmup_ms)?;

        Ok(config)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            log::warn!("CONFIG_INVALID key={} value={:?} error={}", key, raw, e);
            ConfigError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            }
        }),
        None => {
            log::debug!("CONFIG_DEFAULT key={} value={}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_overrides_applied() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (COLLECTOR_URL_VAR, "https://collector.example.com"),
            (MEDIA_WARMUP_VAR, " 250 "),
        ]);
        let config =
            TrackerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.collector_url, "https://collector.example.com");
        assert_eq!(config.media_warmup_ms, 250);
        assert_eq!(config.app_id, "demo-media-publishing-web");
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = TrackerConfig::from_lookup(|key| {
            (key == ARTICLE_VIEW_DELAY_VAR).then(|| "soon".to_string())
        });
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, ARTICLE_VIEW_DELAY_VAR),
            other => panic!("expected invalid value, got {:?}", other),
        }
    }
}
