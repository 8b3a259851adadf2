// Example: Signal Feed
// Loads a simulated batch, narrows it with criteria and prints the ranked result

use common::{Direction, Selection, SignalFeedConfig, Timeframe};
use signal_generation::{SignalCriteria, SignalFeed, SignalStats};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Signal Feed Example ===\n");

    let feed = SignalFeed::simulated(&SignalFeedConfig::default());

    println!("Fetching signals (simulated latency)...");
    feed.refetch().await?;

    let signals = feed.signals().await;
    let stats = SignalStats::from_signals(&signals);
    println!(
        "Loaded {} signals: {} active, {} completed, win rate {:.1}%\n",
        stats.total_signals,
        stats.active_signals,
        stats.completed_signals,
        stats.win_rate * 100.0
    );

    for signal in signals.iter().take(5) {
        println!(
            "  {} {:<6} {:>3}% {:>4} entry {:.4} target {:.4} stop {:.4} [{}]",
            signal.timestamp.format("%H:%M"),
            signal.symbol,
            signal.confidence,
            signal.direction,
            signal.entry_price,
            signal.target_price,
            signal.stop_loss,
            signal.timeframe
        );
    }

    let criteria = SignalCriteria::new(
        80,
        Selection::Only(Direction::Buy),
        Selection::Only(Timeframe::H1),
    );
    feed.set_criteria(criteria).await;
    feed.refetch().await?;

    println!("\nHigh-confidence 1h buys:");
    for signal in feed.signals().await {
        println!("  {} {}% {}", signal.symbol, signal.confidence, signal.indicators.join(", "));
    }

    println!("\nAs JSON:");
    println!("{}", serde_json::to_string_pretty(&feed.snapshot().await)?);
    Ok(())
}
