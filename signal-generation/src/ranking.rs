// Ranking
// Orders signal and alert batches for display. Both sorts are stable, so
// records with equal keys keep the order they arrived in.

use super::alerts::Alert;
use super::signals::TradingSignal;
use std::cmp::Ordering;

/// Newest signals first
pub fn rank_signals(signals: &mut [TradingSignal]) {
    signals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Untriggered before triggered, then by priority weight, highest first
pub fn rank_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(compare_alerts);
}

fn compare_alerts(a: &Alert, b: &Alert) -> Ordering {
    a.triggered
        .cmp(&b.triggered)
        .then_with(|| b.priority.weight().cmp(&a.priority.weight()))
}
