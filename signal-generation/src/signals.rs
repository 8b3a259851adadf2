use super::generator::{BatchGenerator, Sampler};
use chrono::{DateTime, Utc};
use common::{
    base_price, Direction, SignalResult, SignalStatus, Timeframe, FX_PAIRS, INDICATORS,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const CONFIDENCE_RANGE: std::ops::RangeInclusive<u8> = 60..=100;
const ENTRY_NOISE: f64 = 0.05;
const MAX_SIGNAL_AGE_SECS: i64 = 24 * 60 * 60;

/// ML-labelled trading signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    pub id: Uuid,
    pub symbol: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub confidence: u8, // 0 to 100
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    pub timeframe: Timeframe,
    pub timestamp: DateTime<Utc>,
    pub status: SignalStatus,
    /// Only present once the signal is completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SignalResult>,
    pub indicators: Vec<String>,
}

impl TradingSignal {
    pub fn is_completed(&self) -> bool {
        self.status == SignalStatus::Completed
    }
}

/// Target and stop levels around a base price for the given direction
pub fn exit_levels(base: f64, direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Buy => (base * 1.02, base * 0.99),
        Direction::Sell => (base * 0.98, base * 1.01),
    }
}

/// Generates batches of randomized FX signals
#[derive(Debug)]
pub struct RandomSignalGenerator {
    batch_size: usize,
    sampler: Sampler,
}

impl RandomSignalGenerator {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            sampler: Sampler::new(),
        }
    }

    /// Reproducible generator for tests and demos
    pub fn with_seed(batch_size: usize, seed: u64) -> Self {
        Self {
            batch_size,
            sampler: Sampler::seeded(seed),
        }
    }

    fn generate_one(&self, now: DateTime<Utc>) -> TradingSignal {
        let symbol = self.sampler.pick(FX_PAIRS);
        let base = base_price(symbol);
        let direction = self.sampler.pick(Direction::ALL);
        let (target_price, stop_loss) = exit_levels(base, direction);

        let status = self.sampler.pick(SignalStatus::ALL);
        let result = match status {
            SignalStatus::Completed => Some(self.sampler.pick(SignalResult::ALL)),
            SignalStatus::Active => None,
        };

        TradingSignal {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            direction,
            confidence: self.sampler.int(CONFIDENCE_RANGE),
            entry_price: base + self.sampler.uniform(-ENTRY_NOISE, ENTRY_NOISE),
            target_price,
            stop_loss,
            timeframe: self.sampler.pick(Timeframe::ALL),
            timestamp: now - self.sampler.age(MAX_SIGNAL_AGE_SECS),
            status,
            result,
            indicators: self
                .sampler
                .subset(INDICATORS, 2, 4)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for RandomSignalGenerator {
    fn default() -> Self {
        Self::new(25)
    }
}

impl BatchGenerator for RandomSignalGenerator {
    type Record = TradingSignal;

    fn generate_batch(&self) -> Vec<TradingSignal> {
        let now = Utc::now();
        let signals: Vec<_> = (0..self.batch_size).map(|_| self.generate_one(now)).collect();
        debug!("Generated {} signals", signals.len());
        signals
    }

    fn name(&self) -> &'static str {
        "random-signals"
    }
}
