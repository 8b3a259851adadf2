// Alerts
// Price, technical, news and AI alerts plus their random generator

use super::generator::{BatchGenerator, Sampler};
use chrono::{DateTime, Utc};
use common::{base_price, is_yen_pair, AlertType, Priority, FX_PAIRS};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const MAX_ALERT_AGE_SECS: i64 = 72 * 60 * 60;

const TECHNICAL_CONDITIONS: &[(&str, f64)] = &[
    ("RSI above 70", 70.0),
    ("RSI below 30", 30.0),
    ("MACD bullish crossover", 0.0),
    ("Price breaks upper Bollinger Band", 2.0),
];

const NEWS_CONDITIONS: &[&str] = &[
    "High impact news release",
    "Central bank announcement",
    "Economic calendar event",
];

/// A user or AI defined market alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub symbol: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub condition: String,
    pub value: f64,
    pub is_active: bool,
    pub triggered: bool,
    pub ai_enhanced: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    /// Only present while `triggered` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Flip the active flag.
    ///
    /// Re-activating a triggered alert re-arms it: `triggered` and
    /// `triggered_at` are cleared so an alert is never both triggered and
    /// active.
    pub fn toggle(&mut self) {
        self.is_active = !self.is_active;
        if self.is_active && self.triggered {
            self.triggered = false;
            self.triggered_at = None;
        }
    }
}

/// Caller supplied fields of a new alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub symbol: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub condition: String,
    pub value: f64,
    pub is_active: bool,
    pub priority: Priority,
    pub ai_enhanced: bool,
}

impl NewAlert {
    /// Complete the alert with a fresh id and creation time; never triggered
    pub fn into_alert(self, now: DateTime<Utc>) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            symbol: self.symbol,
            alert_type: self.alert_type,
            condition: self.condition,
            value: self.value,
            is_active: self.is_active,
            triggered: false,
            ai_enhanced: self.ai_enhanced,
            priority: self.priority,
            created_at: now,
            triggered_at: None,
        }
    }
}

/// Generates batches of randomized alerts
#[derive(Debug)]
pub struct RandomAlertGenerator {
    batch_size: usize,
    sampler: Sampler,
}

impl RandomAlertGenerator {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            sampler: Sampler::new(),
        }
    }

    pub fn with_seed(batch_size: usize, seed: u64) -> Self {
        Self {
            batch_size,
            sampler: Sampler::seeded(seed),
        }
    }

    /// Condition text and threshold value for a category
    fn condition(&self, alert_type: AlertType, symbol: &str) -> (String, f64) {
        match alert_type {
            AlertType::Price => {
                let value = base_price(symbol) + self.sampler.uniform(-0.05, 0.05);
                let text = if is_yen_pair(symbol) {
                    format!("Price crosses {:.2}", value)
                } else {
                    format!("Price crosses {:.4}", value)
                };
                (text, value)
            }
            AlertType::Technical => {
                let (text, value) = self.sampler.pick(TECHNICAL_CONDITIONS);
                (text.to_string(), value)
            }
            AlertType::News => {
                let text = self.sampler.pick(NEWS_CONDITIONS);
                (text.to_string(), f64::from(self.sampler.int(1..=3)))
            }
            AlertType::AiSignal => {
                let confidence = self.sampler.int(60..=95);
                (
                    format!("AI confidence above {}%", confidence),
                    f64::from(confidence),
                )
            }
        }
    }

    fn generate_one(&self, now: DateTime<Utc>) -> Alert {
        let symbol = self.sampler.pick(FX_PAIRS);
        let alert_type = self.sampler.pick(AlertType::ALL);
        let (condition, value) = self.condition(alert_type, symbol);

        let created_at = now - self.sampler.age(MAX_ALERT_AGE_SECS);
        let triggered = self.sampler.chance(0.5);
        let triggered_at = if triggered {
            let since_creation = (now - created_at).num_seconds();
            Some(now - self.sampler.age(since_creation))
        } else {
            None
        };

        Alert {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            alert_type,
            condition,
            value,
            is_active: !triggered,
            triggered,
            ai_enhanced: self.sampler.chance(0.5),
            priority: self.sampler.pick(Priority::ALL),
            created_at,
            triggered_at,
        }
    }
}

impl Default for RandomAlertGenerator {
    fn default() -> Self {
        Self::new(15)
    }
}

impl BatchGenerator for RandomAlertGenerator {
    type Record = Alert;

    fn generate_batch(&self) -> Vec<Alert> {
        let now = Utc::now();
        let alerts: Vec<_> = (0..self.batch_size).map(|_| self.generate_one(now)).collect();
        debug!("Generated {} alerts", alerts.len());
        alerts
    }

    fn name(&self) -> &'static str {
        "random-alerts"
    }
}
