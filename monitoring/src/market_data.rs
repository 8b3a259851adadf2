//! Unified market data
//!
//! One quote per instrument, nudged by a bounded random walk on every tick.
//! A store is constructed explicitly and handed to whoever needs it; its
//! ticker runs between `start` and `dispose`.

use super::ticker::Ticker;
use chrono::{DateTime, Utc};
use common::FeedError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use signal_generation::Sampler;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Instruments shown on the dashboard with their opening prices
pub const INSTRUMENTS: &[(&str, f64)] = &[
    ("EURUSD", 1.0850),
    ("GBPUSD", 1.2650),
    ("USDJPY", 149.50),
    ("AUDUSD", 0.6550),
    ("BTCUSD", 43250.0),
    ("ETHUSD", 2280.0),
];

/// Largest per-tick move as a fraction of the current price
const MAX_STEP: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn opening(symbol: &str, price: f64, now: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
            open: price,
            high: price,
            low: price,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
            updated_at: now,
        }
    }

    /// Move the price by `fraction` of itself and refresh the derived fields
    pub fn apply_move(&mut self, fraction: f64, traded: u64, now: DateTime<Utc>) {
        self.price *= 1.0 + fraction;
        self.high = self.high.max(self.price);
        self.low = self.low.min(self.price);
        self.change = self.price - self.open;
        self.change_percent = if self.open != 0.0 {
            self.change / self.open * 100.0
        } else {
            0.0
        };
        self.volume += traded;
        self.updated_at = now;
    }
}

/// Biggest gainers and losers by percentage change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movers {
    pub gainers: Vec<Quote>,
    pub losers: Vec<Quote>,
}

fn by_change_percent(a: &Quote, b: &Quote) -> Ordering {
    a.change_percent
        .partial_cmp(&b.change_percent)
        .unwrap_or(Ordering::Equal)
}

/// Random-walk quotes for the dashboard
pub struct MarketDataStore {
    quotes: Arc<DashMap<String, Quote>>,
    sampler: Arc<Sampler>,
    ticker: Option<Ticker>,
}

impl MarketDataStore {
    pub fn new(ticker: Ticker) -> Self {
        Self::with_sampler(ticker, Sampler::new())
    }

    pub fn with_sampler(ticker: Ticker, sampler: Sampler) -> Self {
        let now = Utc::now();
        let quotes = DashMap::new();
        for (symbol, price) in INSTRUMENTS {
            quotes.insert(symbol.to_string(), Quote::opening(symbol, *price, now));
        }

        Self {
            quotes: Arc::new(quotes),
            sampler: Arc::new(sampler),
            ticker: Some(ticker),
        }
    }

    /// Apply one random-walk step to every quote
    pub fn tick(&self) {
        step(&self.quotes, &self.sampler);
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    pub fn is_disposed(&self) -> bool {
        self.ticker.is_none()
    }

    pub fn start(&mut self) -> Result<(), FeedError> {
        let Some(ticker) = self.ticker.as_mut() else {
            return Err(FeedError::Disposed("market data store"));
        };

        let quotes = self.quotes.clone();
        let sampler = self.sampler.clone();
        ticker.start(move |tick| {
            step(&quotes, &sampler);
            debug!("Market data tick {}", tick);
        })
    }

    /// Stop ticking and release the ticker; quotes stay readable
    pub async fn dispose(&mut self) -> Result<(), FeedError> {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop().await?;
            info!("Market data store disposed");
        }
        Ok(())
    }

    pub fn quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes.get(symbol).map(|entry| entry.value().clone())
    }

    /// All quotes ordered by symbol
    pub fn quotes(&self) -> Vec<Quote> {
        let mut quotes: Vec<Quote> = self
            .quotes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        quotes.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        quotes
    }

    /// Top `count` gainers (positive change) and losers (negative change)
    pub fn movers(&self, count: usize) -> Movers {
        let quotes = self.quotes();

        let mut gainers: Vec<Quote> = quotes.iter().filter(|q| q.change > 0.0).cloned().collect();
        gainers.sort_by(|a, b| by_change_percent(b, a));
        gainers.truncate(count);

        let mut losers: Vec<Quote> = quotes.into_iter().filter(|q| q.change < 0.0).collect();
        losers.sort_by(by_change_percent);
        losers.truncate(count);

        Movers { gainers, losers }
    }
}

fn step(quotes: &DashMap<String, Quote>, sampler: &Sampler) {
    let now = Utc::now();
    for mut entry in quotes.iter_mut() {
        let fraction = sampler.uniform(-MAX_STEP, MAX_STEP);
        let traded = sampler.uniform(1_000.0, 50_000.0) as u64;
        entry.value_mut().apply_move(fraction, traded, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> MarketDataStore {
        MarketDataStore::with_sampler(
            Ticker::new("market-data", Duration::from_secs(1)),
            Sampler::seeded(5),
        )
    }

    #[test]
    fn test_opening_quotes() {
        let store = store();
        let quotes = store.quotes();
        assert_eq!(quotes.len(), INSTRUMENTS.len());
        assert!(quotes.windows(2).all(|w| w[0].symbol < w[1].symbol));

        let usdjpy = store.quote("USDJPY").unwrap();
        assert_eq!(usdjpy.price, 149.50);
        assert_eq!(usdjpy.change, 0.0);
        assert!(store.quote("XAUUSD").is_none());
    }

    #[test]
    fn test_random_walk_is_bounded() {
        let store = store();
        let before = store.quotes();
        store.tick();

        for (old, new) in before.iter().zip(store.quotes()) {
            let moved = (new.price - old.price).abs() / old.price;
            assert!(moved <= MAX_STEP + 1e-12);
            assert!(new.high >= new.price && new.low <= new.price);
            assert!(new.volume >= 1_000);
            assert!((new.change - (new.price - new.open)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_movers_split_by_sign() {
        let store = store();
        for _ in 0..20 {
            store.tick();
        }
        let movers = store.movers(3);

        assert!(movers.gainers.len() <= 3 && movers.losers.len() <= 3);
        assert!(movers.gainers.iter().all(|q| q.change > 0.0));
        assert!(movers.losers.iter().all(|q| q.change < 0.0));
        assert!(movers
            .gainers
            .windows(2)
            .all(|w| w[0].change_percent >= w[1].change_percent));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_disposed() {
        let mut store = store();
        store.start().unwrap();
        assert!(store.is_running());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let volume = store.quote("EURUSD").unwrap().volume;
        assert!(volume >= 2_000);

        store.dispose().await.unwrap();
        assert!(store.is_disposed());
        assert!(!store.is_running());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.quote("EURUSD").unwrap().volume, volume);
        assert_eq!(
            store.start().unwrap_err(),
            FeedError::Disposed("market data store")
        );
    }
}
