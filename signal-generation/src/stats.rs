// Batch Statistics
// Summary figures for the dashboard cards

use super::alerts::Alert;
use super::signals::TradingSignal;
use common::{Priority, SignalResult, SignalStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Signal feed statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalStats {
    pub total_signals: usize,
    pub active_signals: usize,
    pub completed_signals: usize,
    pub winning_signals: usize,
    pub losing_signals: usize,
    /// Wins over completed signals, 0.0 when nothing has completed
    pub win_rate: f64,
    pub average_confidence: f64,
    pub signals_by_symbol: BTreeMap<String, usize>,
}

impl SignalStats {
    pub fn from_signals(signals: &[TradingSignal]) -> Self {
        let mut signals_by_symbol = BTreeMap::new();
        let mut active_signals = 0;
        let mut winning_signals = 0;
        let mut losing_signals = 0;
        let mut confidence_sum = 0u64;

        for signal in signals {
            *signals_by_symbol.entry(signal.symbol.clone()).or_insert(0) += 1;
            confidence_sum += u64::from(signal.confidence);

            if signal.status == SignalStatus::Active {
                active_signals += 1;
            }
            match signal.result {
                Some(SignalResult::Profit) => winning_signals += 1,
                Some(SignalResult::Loss) => losing_signals += 1,
                None => {}
            }
        }

        let total_signals = signals.len();
        let completed_signals = total_signals - active_signals;
        let win_rate = if completed_signals > 0 {
            winning_signals as f64 / completed_signals as f64
        } else {
            0.0
        };
        let average_confidence = if total_signals > 0 {
            confidence_sum as f64 / total_signals as f64
        } else {
            0.0
        };

        Self {
            total_signals,
            active_signals,
            completed_signals,
            winning_signals,
            losing_signals,
            win_rate,
            average_confidence,
            signals_by_symbol,
        }
    }
}

/// Alert store statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total_alerts: usize,
    pub active_alerts: usize,
    pub triggered_alerts: usize,
    pub ai_enhanced_alerts: usize,
    pub alerts_by_priority: BTreeMap<String, usize>,
}

impl AlertStats {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut alerts_by_priority: BTreeMap<String, usize> = Priority::ALL
            .iter()
            .map(|p| (p.to_string(), 0))
            .collect();

        for alert in alerts {
            *alerts_by_priority.entry(alert.priority.to_string()).or_insert(0) += 1;
        }

        Self {
            total_alerts: alerts.len(),
            active_alerts: alerts.iter().filter(|a| a.is_active).count(),
            triggered_alerts: alerts.iter().filter(|a| a.triggered).count(),
            ai_enhanced_alerts: alerts.iter().filter(|a| a.ai_enhanced).count(),
            alerts_by_priority,
        }
    }
}
