//! Dashboard configuration
//!
//! Loaded from an optional TOML file, then overridden from `DASHBOARD_*`
//! environment variables (nested keys use `__`, e.g.
//! `DASHBOARD_SIGNALS__BATCH_SIZE=10`).

use crate::error::MarketError;
use crate::types::{Direction, Selection, Timeframe};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

const ENV_PREFIX: &str = "DASHBOARD";

/// Top-level configuration of a dashboard instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Maximum tracing level (`trace`, `debug`, `info`, `warn`, `error`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How long the `dashboard` binary runs before printing its final snapshot
    #[serde(default = "default_run_seconds")]
    pub run_seconds: u64,

    #[serde(default)]
    pub signals: SignalFeedConfig,

    #[serde(default)]
    pub alerts: AlertFeedConfig,

    #[serde(default)]
    pub ticker: TickerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            run_seconds: default_run_seconds(),
            signals: SignalFeedConfig::default(),
            alerts: AlertFeedConfig::default(),
            ticker: TickerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Reject settings the runtime cannot honour. A zero latency is allowed
    /// and means the simulated fetch returns immediately.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.ticker.interval_ms == 0 {
            return Err(MarketError::InvalidSetting {
                key: "ticker.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        self.max_level()?;
        Ok(())
    }

    pub fn max_level(&self) -> Result<Level, MarketError> {
        self.log_level
            .parse()
            .map_err(|_| MarketError::InvalidLogLevel(self.log_level.clone()))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_run_seconds() -> u64 {
    10
}

/// Trading signal feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalFeedConfig {
    /// Signals produced per regeneration
    #[serde(default = "default_signal_batch_size")]
    pub batch_size: usize,

    /// Simulated fetch latency
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Initial filter criteria
    #[serde(default)]
    pub min_confidence: u8,

    #[serde(default)]
    pub direction: Selection<Direction>,

    #[serde(default)]
    pub timeframe: Selection<Timeframe>,
}

impl Default for SignalFeedConfig {
    fn default() -> Self {
        Self {
            batch_size: default_signal_batch_size(),
            latency_ms: default_latency_ms(),
            min_confidence: 0,
            direction: Selection::All,
            timeframe: Selection::All,
        }
    }
}

impl SignalFeedConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn default_signal_batch_size() -> usize {
    25
}

/// Alert feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFeedConfig {
    /// Alerts produced per regeneration
    #[serde(default = "default_alert_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for AlertFeedConfig {
    fn default() -> Self {
        Self {
            batch_size: default_alert_batch_size(),
            latency_ms: default_latency_ms(),
        }
    }
}

impl AlertFeedConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn default_alert_batch_size() -> usize {
    15
}

fn default_latency_ms() -> u64 {
    1000
}

/// Refresh cadence of the clock and market data tickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_interval_ms() -> u64 {
    1000
}

/// Load configuration from an optional TOML file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    load_layers(path, None)
}

/// `vars` replaces the process environment when given
fn load_layers(
    path: Option<&Path>,
    vars: Option<config::Map<String, String>>,
) -> Result<DashboardConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(vars),
        )
        .build()
        .context("Failed to read dashboard configuration")?;

    let config: DashboardConfig = settings
        .try_deserialize()
        .context("Invalid dashboard configuration")?;

    config.validate()?;
    Ok(config)
}

/// Save configuration to TOML file
pub fn save_config(config: &DashboardConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

/// Create a default configuration file template
pub fn create_config_template(path: &Path) -> Result<()> {
    let template = "# Market Dashboard Configuration

# Maximum log level (trace, debug, info, warn, error)
log_level = \"info\"

# Seconds the dashboard binary runs before printing its snapshot
run_seconds = 10

[signals]
# Signals generated per refresh
batch_size = 25

# Simulated fetch latency (ms)
latency_ms = 1000

# Filter criteria: minimum confidence, \"all\" or buy/sell, \"all\" or 1m/5m/15m/1h/4h/1d
min_confidence = 0
direction = \"all\"
timeframe = \"all\"

[alerts]
# Alerts generated per refresh
batch_size = 15
latency_ms = 1000

[ticker]
# Clock and quote refresh interval (ms)
interval_ms = 1000
";

    std::fs::write(path, template)
        .with_context(|| format!("Failed to write config template to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.signals.batch_size, 25);
        assert_eq!(config.alerts.batch_size, 15);
        assert_eq!(config.ticker.interval(), Duration::from_secs(1));
        assert_eq!(config.signals.latency(), Duration::from_secs(1));
        assert_eq!(config.max_level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = DashboardConfig::default();
        config.signals.direction = Selection::Only(Direction::Sell);
        config.signals.min_confidence = 75;

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: DashboardConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [signals]
            batch_size = 5
            timeframe = "1h"
            "#,
        )
        .unwrap();

        assert_eq!(config.signals.batch_size, 5);
        assert_eq!(config.signals.timeframe, Selection::Only(Timeframe::H1));
        assert_eq!(config.signals.latency_ms, 1000);
        assert_eq!(config.alerts, AlertFeedConfig::default());
    }

    #[test]
    fn test_template_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        create_config_template(&path).unwrap();

        let config = load_layers(Some(&path), vars(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_env_overrides() {
        let config = load_layers(
            None,
            vars(&[
                ("DASHBOARD_SIGNALS__BATCH_SIZE", "10"),
                ("DASHBOARD_SIGNALS__TIMEFRAME", "1h"),
                ("DASHBOARD_RUN_SECONDS", "3"),
                ("OTHER_SIGNALS__BATCH_SIZE", "99"),
            ]),
        )
        .unwrap();

        assert_eq!(config.signals.batch_size, 10);
        assert_eq!(config.signals.timeframe, Selection::Only(Timeframe::H1));
        assert_eq!(config.run_seconds, 3);
        assert_eq!(config.alerts, AlertFeedConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(
            &path,
            "[signals]\nbatch_size = 5\nmin_confidence = 70\n\n[alerts]\nbatch_size = 8\n",
        )
        .unwrap();

        let config =
            load_layers(Some(&path), vars(&[("DASHBOARD_SIGNALS__BATCH_SIZE", "12")])).unwrap();

        assert_eq!(config.signals.batch_size, 12);
        assert_eq!(config.signals.min_confidence, 70);
        assert_eq!(config.alerts.batch_size, 8);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = load_layers(None, vars(&[("DASHBOARD_TICKER__INTERVAL_MS", "0")])).unwrap_err();
        assert!(format!("{:#}", err).contains("ticker.interval_ms"));

        let config = load_layers(None, vars(&[("DASHBOARD_SIGNALS__LATENCY_MS", "0")])).unwrap();
        assert_eq!(config.signals.latency(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_log_level() {
        let config = DashboardConfig {
            log_level: "loud".to_string(),
            ..DashboardConfig::default()
        };
        assert_eq!(
            config.max_level().unwrap_err(),
            MarketError::InvalidLogLevel("loud".to_string())
        );
    }
}
