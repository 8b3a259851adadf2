// Signal Generation Pipeline
// Filters and ranks freshly generated batches before they reach a store

use super::alerts::Alert;
use super::filters::SignalCriteria;
use super::generator::BatchGenerator;
use super::ranking::{rank_alerts, rank_signals};
use super::signals::TradingSignal;
use tracing::{debug, info};

/// Configuration for the signal pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Enable/disable signal processing
    pub enabled: bool,
    /// Criteria every emitted signal satisfies
    pub criteria: SignalCriteria,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            criteria: SignalCriteria::default(),
        }
    }
}

/// Generator → Filter → Ranker for trading signals
#[derive(Debug, Clone, Default)]
pub struct SignalPipeline {
    config: PipelineConfig,
}

impl SignalPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn with_criteria(criteria: SignalCriteria) -> Self {
        Self::new(PipelineConfig {
            enabled: true,
            criteria,
        })
    }

    pub fn criteria(&self) -> SignalCriteria {
        self.config.criteria
    }

    pub fn set_criteria(&mut self, criteria: SignalCriteria) {
        debug!("Signal criteria changed: {:?}", criteria);
        self.config.criteria = criteria;
    }

    /// Filter then rank a generated batch
    pub fn process(&self, batch: Vec<TradingSignal>) -> Vec<TradingSignal> {
        if !self.config.enabled {
            debug!("Pipeline is disabled, dropping {} signals", batch.len());
            return Vec::new();
        }

        let generated = batch.len();
        let mut signals = self.config.criteria.apply(batch);
        rank_signals(&mut signals);

        info!("Kept {} of {} generated signals", signals.len(), generated);
        signals
    }

    /// Generate, filter and rank in one go
    pub fn run<G>(&self, generator: &G) -> Vec<TradingSignal>
    where
        G: BatchGenerator<Record = TradingSignal>,
    {
        debug!("Running signal pipeline with {}", generator.name());
        self.process(generator.generate_batch())
    }
}

/// Generator → Ranker for alerts; alerts are never filtered
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertPipeline;

impl AlertPipeline {
    pub fn process(&self, mut alerts: Vec<Alert>) -> Vec<Alert> {
        rank_alerts(&mut alerts);
        info!("Ranked {} alerts", alerts.len());
        alerts
    }

    pub fn run<G>(&self, generator: &G) -> Vec<Alert>
    where
        G: BatchGenerator<Record = Alert>,
    {
        debug!("Running alert pipeline with {}", generator.name());
        self.process(generator.generate_batch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::RandomAlertGenerator;
    use crate::signals::RandomSignalGenerator;
    use common::{Direction, Selection};

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.enabled);
        assert_eq!(config.criteria, SignalCriteria::default());
    }

    #[test]
    fn test_signal_pipeline_filters_and_ranks() {
        let pipeline = SignalPipeline::with_criteria(SignalCriteria::new(
            80,
            Selection::Only(Direction::Buy),
            Selection::All,
        ));
        let signals = pipeline.run(&RandomSignalGenerator::new(100));

        assert!(signals
            .iter()
            .all(|s| s.confidence >= 80 && s.direction == Direction::Buy));
        for pair in signals.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_disabled_pipeline_is_empty() {
        let pipeline = SignalPipeline::new(PipelineConfig {
            enabled: false,
            criteria: SignalCriteria::default(),
        });
        assert!(pipeline.run(&RandomSignalGenerator::default()).is_empty());
    }

    #[test]
    fn test_alert_pipeline_keeps_every_alert() {
        let alerts = AlertPipeline.run(&RandomAlertGenerator::default());
        assert_eq!(alerts.len(), 15);
        let first_triggered = alerts.iter().position(|a| a.triggered).unwrap_or(alerts.len());
        assert!(alerts[first_triggered..].iter().all(|a| a.triggered));
    }
}
