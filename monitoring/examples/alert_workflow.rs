use anyhow::Result;
use common::{AlertFeedConfig, AlertType, Priority};
use signal_generation::{AlertStats, AlertStore, NewAlert};
use tracing::info;

/// Alert management walkthrough: load, create, toggle and delete

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("=== Alert Workflow Example ===\n");

    let store = AlertStore::simulated(&AlertFeedConfig::default());
    store.refetch().await?;

    for alert in store.alerts().await {
        info!(
            "  [{:<8}] {:<6} {:<10} {} (active: {}, triggered: {})",
            alert.priority,
            alert.symbol,
            alert.alert_type,
            alert.condition,
            alert.is_active,
            alert.triggered
        );
    }

    let created = store
        .create(NewAlert {
            symbol: "EURUSD".to_string(),
            alert_type: AlertType::Price,
            condition: "Price crosses 1.0900".to_string(),
            value: 1.09,
            is_active: true,
            priority: Priority::Critical,
            ai_enhanced: false,
        })
        .await;
    info!("Created alert {}", created.id);

    store.toggle(created.id).await;
    if let Some(alert) = store.get(created.id).await {
        info!("After toggle, active = {}", alert.is_active);
    }

    let stats = AlertStats::from_alerts(&store.alerts().await);
    info!(
        "{} alerts, {} active, {} triggered, {} AI-enhanced",
        stats.total_alerts, stats.active_alerts, stats.triggered_alerts, stats.ai_enhanced_alerts
    );
    for (priority, count) in &stats.alerts_by_priority {
        info!("  {}: {}", priority, count);
    }

    store.delete(created.id).await;
    info!("Deleted alert, {} remain", store.alerts().await.len());

    Ok(())
}
