//! Dashboard - owns every store a dashboard screen reads from
//!
//! Nothing here is process-wide: each `Dashboard` builds its own feeds,
//! stores and tickers from a `DashboardConfig` and releases its timers in
//! `dispose`.

use super::clock::{ClockReading, MarketClock};
use super::market_data::{MarketDataStore, Movers, Quote};
use super::ticker::Ticker;
use anyhow::{Context, Result};
use common::DashboardConfig;
use serde::{Deserialize, Serialize};
use signal_generation::{AlertStats, AlertStore, AlertsView, SignalFeed, SignalStats, SignalsView};
use tracing::info;

const MOVERS_PER_SIDE: usize = 3;

/// Everything a dashboard render needs, at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub clock: ClockReading,
    pub quotes: Vec<Quote>,
    pub movers: Movers,
    pub signals: SignalsView,
    pub signal_stats: SignalStats,
    pub alerts: AlertsView,
    pub alert_stats: AlertStats,
}

pub struct Dashboard {
    signals: SignalFeed,
    alerts: AlertStore,
    market: MarketDataStore,
    clock: MarketClock,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        let interval = config.ticker.interval();
        Self::from_parts(
            SignalFeed::simulated(&config.signals),
            AlertStore::simulated(&config.alerts),
            MarketDataStore::new(Ticker::new("market-data", interval)),
            MarketClock::new(Ticker::new("clock", interval)),
        )
    }

    pub fn from_parts(
        signals: SignalFeed,
        alerts: AlertStore,
        market: MarketDataStore,
        clock: MarketClock,
    ) -> Self {
        Self {
            signals,
            alerts,
            market,
            clock,
        }
    }

    pub fn signals(&self) -> &SignalFeed {
        &self.signals
    }

    pub fn alerts(&self) -> &AlertStore {
        &self.alerts
    }

    pub fn market(&self) -> &MarketDataStore {
        &self.market
    }

    pub fn clock(&self) -> &MarketClock {
        &self.clock
    }

    /// Load the first batches and start both tickers
    pub async fn mount(&mut self) -> Result<()> {
        let (signals, alerts) = tokio::join!(self.signals.refetch(), self.alerts.refetch());
        signals.context("Failed to load signals")?;
        alerts.context("Failed to load alerts")?;

        self.market.start().context("Failed to start market data")?;
        self.clock.start().context("Failed to start market clock")?;

        info!("Dashboard mounted");
        Ok(())
    }

    /// Re-run both feeds concurrently
    pub async fn refresh(&self) -> Result<()> {
        let (signals, alerts) = tokio::join!(self.signals.refetch(), self.alerts.refetch());
        signals.context("Failed to refresh signals")?;
        alerts.context("Failed to refresh alerts")?;
        Ok(())
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let signals = self.signals.snapshot().await;
        let alerts = self.alerts.snapshot().await;

        DashboardSnapshot {
            clock: self.clock.reading(),
            quotes: self.market.quotes(),
            movers: self.market.movers(MOVERS_PER_SIDE),
            signal_stats: SignalStats::from_signals(&signals.signals),
            signals,
            alert_stats: AlertStats::from_alerts(&alerts.alerts),
            alerts,
        }
    }

    /// Stop every ticker this dashboard started
    pub async fn dispose(&mut self) -> Result<()> {
        self.clock.stop().await.context("Failed to stop market clock")?;
        self.market
            .dispose()
            .await
            .context("Failed to dispose market data")?;
        info!("Dashboard disposed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AlertType, Direction, Priority, Selection};
    use signal_generation::{NewAlert, SignalCriteria};
    use std::time::Duration;

    fn fast_config() -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.signals.latency_ms = 0;
        config.alerts.latency_ms = 0;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_snapshot_dispose() {
        let mut dashboard = Dashboard::new(&fast_config());
        dashboard.mount().await.unwrap();
        assert!(dashboard.market().is_running());
        assert!(dashboard.clock().is_running());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let snapshot = dashboard.snapshot().await;

        assert_eq!(snapshot.signals.signals.len(), 25);
        assert_eq!(snapshot.alerts.alerts.len(), 15);
        assert_eq!(snapshot.signal_stats.total_signals, 25);
        assert_eq!(snapshot.alert_stats.total_alerts, 15);
        assert!(snapshot.quotes.iter().any(|q| q.volume > 0));
        assert!(!snapshot.signals.is_loading);

        dashboard.dispose().await.unwrap();
        assert!(!dashboard.market().is_running());
        assert!(!dashboard.clock().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_criteria_reach_the_feed() {
        let mut config = fast_config();
        config.signals.min_confidence = 85;
        config.signals.direction = Selection::Only(Direction::Sell);

        let dashboard = Dashboard::new(&config);
        dashboard.refresh().await.unwrap();

        assert_eq!(
            dashboard.signals().criteria().await,
            SignalCriteria::new(85, Selection::Only(Direction::Sell), Selection::All)
        );
        let signals = dashboard.signals().signals().await;
        assert!(signals
            .iter()
            .all(|s| s.confidence >= 85 && s.direction == Direction::Sell));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboards_do_not_share_state() {
        let first = Dashboard::new(&fast_config());
        let second = Dashboard::new(&fast_config());
        first.refresh().await.unwrap();

        first
            .alerts()
            .create(NewAlert {
                symbol: "GBPUSD".to_string(),
                alert_type: AlertType::News,
                condition: "Central bank announcement".to_string(),
                value: 3.0,
                is_active: true,
                priority: Priority::High,
                ai_enhanced: true,
            })
            .await;

        assert_eq!(first.alerts().alerts().await.len(), 16);
        assert!(second.alerts().alerts().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_fails_on_zero_interval() {
        let mut config = fast_config();
        config.ticker.interval_ms = 0;

        let mut dashboard = Dashboard::new(&config);
        let err = dashboard.mount().await.unwrap_err();
        assert!(format!("{:#}", err).contains("non-zero period"));
        assert!(!dashboard.market().is_running());
        assert!(!dashboard.clock().is_running());
        dashboard.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_before_mount() {
        let dashboard = Dashboard::new(&fast_config());
        let snapshot = dashboard.snapshot().await;

        assert!(snapshot.signals.signals.is_empty());
        assert_eq!(snapshot.alert_stats.total_alerts, 0);
        assert!(snapshot.movers.gainers.is_empty() && snapshot.movers.losers.is_empty());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("signalStats").is_some());
        assert!(json.get("alertStats").is_some());
        assert_eq!(json["quotes"].as_array().unwrap().len(), 6);
    }
}
