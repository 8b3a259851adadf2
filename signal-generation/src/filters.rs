// Signal Filters
// Caller supplied criteria applied to a generated batch

use super::signals::TradingSignal;
use common::{Direction, Selection, SignalFeedConfig, Timeframe};
use serde::{Deserialize, Serialize};

/// Criteria a signal must satisfy to stay in the feed
///
/// All three predicates must hold; a `Selection::All` field always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalCriteria {
    #[serde(rename = "confidence")]
    pub min_confidence: u8,
    #[serde(rename = "type")]
    pub direction: Selection<Direction>,
    pub timeframe: Selection<Timeframe>,
}

impl SignalCriteria {
    pub fn new(
        min_confidence: u8,
        direction: Selection<Direction>,
        timeframe: Selection<Timeframe>,
    ) -> Self {
        Self {
            min_confidence,
            direction,
            timeframe,
        }
    }

    pub fn matches(&self, signal: &TradingSignal) -> bool {
        signal.confidence >= self.min_confidence
            && self.direction.accepts(&signal.direction)
            && self.timeframe.accepts(&signal.timeframe)
    }

    /// Keep matching signals, preserving their relative order
    pub fn apply(&self, signals: Vec<TradingSignal>) -> Vec<TradingSignal> {
        signals.into_iter().filter(|s| self.matches(s)).collect()
    }
}

impl From<&SignalFeedConfig> for SignalCriteria {
    fn from(config: &SignalFeedConfig) -> Self {
        Self::new(config.min_confidence, config.direction, config.timeframe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::BatchGenerator;
    use crate::signals::RandomSignalGenerator;

    fn batch() -> Vec<TradingSignal> {
        RandomSignalGenerator::with_seed(200, 11).generate_batch()
    }

    #[test]
    fn test_identity_filter_keeps_everything() {
        let signals = batch();
        let filtered = SignalCriteria::default().apply(signals.clone());
        assert_eq!(filtered, signals);
    }

    #[test]
    fn test_confidence_threshold() {
        let signals = batch();
        for threshold in [0u8, 60, 61, 75, 90, 100, 101] {
            let criteria = SignalCriteria::new(threshold, Selection::All, Selection::All);
            let filtered = criteria.apply(signals.clone());

            assert!(filtered.iter().all(|s| s.confidence >= threshold));
            let expected = signals.iter().filter(|s| s.confidence >= threshold).count();
            assert_eq!(filtered.len(), expected);
        }
    }

    #[test]
    fn test_conjunctive_predicates() {
        let signals = batch();
        let criteria = SignalCriteria::new(
            70,
            Selection::Only(Direction::Sell),
            Selection::Only(Timeframe::H1),
        );
        let filtered = criteria.apply(signals.clone());

        assert!(filtered.iter().all(|s| {
            s.confidence >= 70 && s.direction == Direction::Sell && s.timeframe == Timeframe::H1
        }));
        let expected: Vec<_> = signals.into_iter().filter(|s| criteria.matches(s)).collect();
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_criteria_wire_format() {
        let criteria: SignalCriteria =
            serde_json::from_str(r#"{"confidence":80,"type":"buy","timeframe":"all"}"#).unwrap();
        assert_eq!(
            criteria,
            SignalCriteria::new(80, Selection::Only(Direction::Buy), Selection::All)
        );
    }
}
