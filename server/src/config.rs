use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use platform_chaos::{ErrorRate, FaultInjectorConfig, LatencyRange};
use platform_db::FixtureSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    pub fixture: FixtureSettings,
    pub chaos: FaultInjectorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let enabled = lookup("CHAOS_ENABLED")
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);

        let seed = lookup("CHAOS_SEED")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .context("invalid CHAOS_SEED")?;

        let min_ms = env_millis(&lookup, "CHAOS_LATENCY_MIN_MS", LatencyRange::DEFAULT_MIN)?;
        let max_ms = env_millis(&lookup, "CHAOS_LATENCY_MAX_MS", LatencyRange::DEFAULT_MAX)?;
        let latency = LatencyRange::new(min_ms, max_ms).context("invalid latency range")?;

        let error_rate_override = lookup("CHAOS_ERROR_RATE")
            .map(|raw| raw.parse::<ErrorRate>())
            .transpose()
            .context("invalid CHAOS_ERROR_RATE")?;

        Ok(Self {
            cors_allowed_origins,
            fixture: FixtureSettings::from_env(),
            chaos: FaultInjectorConfig {
                enabled,
                latency,
                seed,
                error_rate_override,
            },
        })
    }
}

fn env_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| anyhow!("{} must be a whole number of milliseconds", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_match_production_profile() {
        let config = config_from(&[]).unwrap();
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.chaos.enabled);
        assert_eq!(config.chaos.seed, None);
        assert_eq!(config.chaos.error_rate_override, None);
        assert_eq!(config.chaos.latency, LatencyRange::default());
    }

    #[test]
    fn chaos_knobs_are_read() {
        let config = config_from(&[
            ("CHAOS_ENABLED", "false"),
            ("CHAOS_SEED", "1234"),
            ("CHAOS_LATENCY_MIN_MS", "0"),
            ("CHAOS_LATENCY_MAX_MS", "50"),
            ("CHAOS_ERROR_RATE", "0.5"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
        ])
        .unwrap();
        assert!(!config.chaos.enabled);
        assert_eq!(config.chaos.seed, Some(1234));
        assert_eq!(config.chaos.latency.max(), Duration::from_millis(50));
        assert_eq!(
            config.chaos.error_rate_override.map(ErrorRate::value),
            Some(0.5)
        );
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(config_from(&[("CHAOS_ERROR_RATE", "2")]).is_err());
        assert!(config_from(&[("CHAOS_SEED", "abc")]).is_err());
        assert!(config_from(&[("CHAOS_LATENCY_MIN_MS", "soon")]).is_err());
        assert!(
            config_from(&[
                ("CHAOS_LATENCY_MIN_MS", "500"),
                ("CHAOS_LATENCY_MAX_MS", "100")
            ])
            .is_err()
        );
    }
}
