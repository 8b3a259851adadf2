// Signal and Alert Stores
// In-process holders of the latest batch. Nothing is persisted.
//
// Handles are cheap to clone and share one state. A refetch holds no lock
// while its source is fetching, so mutations made in the meantime are
// replaced when the fetch lands: whichever write finishes last wins.

use super::alerts::{Alert, NewAlert, RandomAlertGenerator};
use super::filters::SignalCriteria;
use super::pipeline::{AlertPipeline, SignalPipeline};
use super::signals::{RandomSignalGenerator, TradingSignal};
use super::source::{BatchSource, SimulatedSource};
use chrono::{DateTime, Utc};
use common::{AlertFeedConfig, FeedError, SignalFeedConfig};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of refetches in flight
#[derive(Debug, Clone, Default)]
struct Loading(Arc<AtomicUsize>);

impl Loading {
    fn enter(&self) -> LoadingGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(self.0.clone())
    }

    fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

/// Leaves the loading state on drop, including when a refetch is cancelled
struct LoadingGuard(Arc<AtomicUsize>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Batch plus loading bookkeeping shared by both stores
#[derive(Debug)]
struct FeedState<T> {
    records: Vec<T>,
    loading: Loading,
    last_error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl<T> FeedState<T> {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: Loading::default(),
            last_error: None,
            last_updated: None,
        }
    }

    fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    fn replace(&mut self, records: Vec<T>) {
        self.records = records;
        self.last_error = None;
        self.last_updated = Some(Utc::now());
    }

    /// Keeps the previous batch and remembers why the refresh failed
    fn fail(&mut self, feed: &'static str, error: anyhow::Error) -> FeedError {
        let reason = format!("{:#}", error);
        warn!("Refresh of {} failed, keeping {} records: {}", feed, self.records.len(), reason);
        self.last_error = Some(reason.clone());
        FeedError::RefreshFailed { feed, reason }
    }
}

/// What the signals screen reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalsView {
    pub signals: Vec<TradingSignal>,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// What the alerts screen reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsView {
    pub alerts: Vec<Alert>,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

struct SignalFeedInner {
    feed: FeedState<TradingSignal>,
    pipeline: SignalPipeline,
}

/// Filtered, ranked feed of trading signals
#[derive(Clone)]
pub struct SignalFeed {
    source: Arc<dyn BatchSource<TradingSignal>>,
    inner: Arc<RwLock<SignalFeedInner>>,
}

impl SignalFeed {
    pub fn new<S>(source: S, criteria: SignalCriteria) -> Self
    where
        S: BatchSource<TradingSignal> + 'static,
    {
        Self {
            source: Arc::new(source),
            inner: Arc::new(RwLock::new(SignalFeedInner {
                feed: FeedState::new(),
                pipeline: SignalPipeline::with_criteria(criteria),
            })),
        }
    }

    /// Feed backed by the random generator with simulated latency
    pub fn simulated(config: &SignalFeedConfig) -> Self {
        let source = SimulatedSource::new(
            RandomSignalGenerator::new(config.batch_size),
            config.latency(),
        );
        Self::new(source, SignalCriteria::from(config))
    }

    pub async fn snapshot(&self) -> SignalsView {
        let inner = self.inner.read().await;
        SignalsView {
            signals: inner.feed.records.clone(),
            is_loading: inner.feed.is_loading(),
            last_error: inner.feed.last_error.clone(),
            last_updated: inner.feed.last_updated,
        }
    }

    pub async fn signals(&self) -> Vec<TradingSignal> {
        self.inner.read().await.feed.records.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.feed.is_loading()
    }

    pub async fn criteria(&self) -> SignalCriteria {
        self.inner.read().await.pipeline.criteria()
    }

    /// Takes effect on the next refetch
    pub async fn set_criteria(&self, criteria: SignalCriteria) {
        self.inner.write().await.pipeline.set_criteria(criteria);
    }

    /// Fetch a new batch, filter it, rank it and replace the current one.
    ///
    /// On failure the previous batch is kept.
    pub async fn refetch(&self) -> Result<(), FeedError> {
        let _loading = self.inner.read().await.feed.loading.enter();
        debug!("Refetching signals from {}", self.source.name());

        let fetched = self.source.fetch().await;

        let mut inner = self.inner.write().await;
        match fetched {
            Ok(batch) => {
                let signals = inner.pipeline.process(batch);
                info!("Signal feed refreshed with {} signals", signals.len());
                inner.feed.replace(signals);
                Ok(())
            }
            Err(e) => Err(inner.feed.fail("signals", e)),
        }
    }
}

/// Ranked alerts with create / toggle / delete
#[derive(Clone)]
pub struct AlertStore {
    source: Arc<dyn BatchSource<Alert>>,
    pipeline: AlertPipeline,
    state: Arc<RwLock<FeedState<Alert>>>,
}

impl AlertStore {
    pub fn new<S>(source: S) -> Self
    where
        S: BatchSource<Alert> + 'static,
    {
        Self {
            source: Arc::new(source),
            pipeline: AlertPipeline,
            state: Arc::new(RwLock::new(FeedState::new())),
        }
    }

    pub fn simulated(config: &AlertFeedConfig) -> Self {
        Self::new(SimulatedSource::new(
            RandomAlertGenerator::new(config.batch_size),
            config.latency(),
        ))
    }

    pub async fn snapshot(&self) -> AlertsView {
        let state = self.state.read().await;
        AlertsView {
            alerts: state.records.clone(),
            is_loading: state.is_loading(),
            last_error: state.last_error.clone(),
            last_updated: state.last_updated,
        }
    }

    pub async fn alerts(&self) -> Vec<Alert> {
        self.state.read().await.records.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Alert> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading()
    }

    /// Prepend a new, untriggered alert. The batch is not re-ranked.
    pub async fn create(&self, new_alert: NewAlert) -> Alert {
        let alert = new_alert.into_alert(Utc::now());
        self.state.write().await.records.insert(0, alert.clone());
        info!("Created {} alert {} for {}", alert.alert_type, alert.id, alert.symbol);
        alert
    }

    /// Flip the active flag; returns false when no alert has this id
    pub async fn toggle(&self, id: Uuid) -> bool {
        let mut state = self.state.write().await;
        match state.records.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.toggle();
                debug!("Alert {} toggled, active = {}", id, alert.is_active);
                true
            }
            None => {
                debug!("Toggle ignored, no alert {}", id);
                false
            }
        }
    }

    /// Remove an alert; returns false when no alert has this id
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|a| a.id != id);
        let removed = state.records.len() != before;
        if removed {
            info!("Deleted alert {}", id);
        }
        removed
    }

    /// Fetch a new batch, rank it and replace the current one.
    ///
    /// On failure the previous batch is kept.
    pub async fn refetch(&self) -> Result<(), FeedError> {
        let _loading = self.state.read().await.loading.enter();
        debug!("Refetching alerts from {}", self.source.name());

        let fetched = self.source.fetch().await;

        let mut state = self.state.write().await;
        match fetched {
            Ok(batch) => {
                let alerts = self.pipeline.process(batch);
                info!("Alert store refreshed with {} alerts", alerts.len());
                state.replace(alerts);
                Ok(())
            }
            Err(e) => Err(state.fail("alerts", e)),
        }
    }
}
