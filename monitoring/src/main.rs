use anyhow::Result;
use common::{create_config_template, load_config};
use monitoring::Dashboard;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::info;

const SUMMARY_EVERY: Duration = Duration::from_secs(5);

/// Usage:
///   dashboard [config.toml]
///   dashboard --init <config.toml>
#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--init") {
        let path = PathBuf::from(args.next().unwrap_or_else(|| "dashboard.toml".to_string()));
        create_config_template(&path)?;
        println!("Wrote config template to {}", path.display());
        return Ok(());
    }

    let path = first.map(PathBuf::from);
    let config = load_config(path.as_deref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(config.max_level()?)
        .init();

    info!("Starting market dashboard for {}s", config.run_seconds);

    let mut dashboard = Dashboard::new(&config);
    dashboard.mount().await?;

    let deadline = sleep(Duration::from_secs(config.run_seconds));
    tokio::pin!(deadline);

    let mut summary = interval(SUMMARY_EVERY);
    summary.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    summary.tick().await;

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down gracefully...");
                break;
            }
            _ = summary.tick() => {
                let snapshot = dashboard.snapshot().await;
                info!(
                    "Market {} | sessions {:?} | {} signals, {:.1}% wins | {} alerts, {} triggered",
                    if snapshot.clock.market_open { "open" } else { "closed" },
                    snapshot.clock.sessions,
                    snapshot.signal_stats.total_signals,
                    snapshot.signal_stats.win_rate * 100.0,
                    snapshot.alert_stats.total_alerts,
                    snapshot.alert_stats.triggered_alerts,
                );
            }
        }
    }

    let snapshot = dashboard.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    dashboard.dispose().await?;
    Ok(())
}
