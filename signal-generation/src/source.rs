// Batch Sources
// Where stores fetch their batches from. The only built-in source simulates
// network latency in front of a generator; real feeds implement the same trait.

use super::generator::BatchGenerator;
use anyhow::Result;
use std::time::Duration;
use tracing::debug;

/// Asynchronous provider of whole record batches
#[async_trait::async_trait]
pub trait BatchSource<T>: Send + Sync {
    async fn fetch(&self) -> Result<Vec<T>>;

    fn name(&self) -> &str;
}

/// Generator behind a fixed, non-cancellable delay. Never fails.
pub struct SimulatedSource<G> {
    generator: G,
    latency: Duration,
}

impl<G> SimulatedSource<G> {
    pub fn new(generator: G, latency: Duration) -> Self {
        Self { generator, latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait::async_trait]
impl<G> BatchSource<G::Record> for SimulatedSource<G>
where
    G: BatchGenerator,
    G::Record: Send,
{
    async fn fetch(&self) -> Result<Vec<G::Record>> {
        if !self.latency.is_zero() {
            debug!("Simulating {:?} of latency for {}", self.latency, self.generator.name());
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.generator.generate_batch())
    }

    fn name(&self) -> &str {
        self.generator.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::RandomSignalGenerator;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency() {
        let source = SimulatedSource::new(RandomSignalGenerator::new(5), Duration::from_secs(1));
        let started = Instant::now();

        let batch = source.fetch().await.unwrap();

        assert_eq!(batch.len(), 5);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(source.name(), "random-signals");
    }
}
