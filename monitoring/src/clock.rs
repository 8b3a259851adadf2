//! Market clock for the dashboard header
//!
//! Tracks the current time and which FX trading sessions are open.

use super::ticker::Ticker;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use common::FeedError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Major FX trading sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingSession {
    Sydney,
    Tokyo,
    London,
    NewYork,
}

impl TradingSession {
    pub const ALL: &'static [TradingSession] = &[
        TradingSession::Sydney,
        TradingSession::Tokyo,
        TradingSession::London,
        TradingSession::NewYork,
    ];

    /// Opening and closing hour in UTC, closing hour exclusive
    pub fn hours_utc(&self) -> (u32, u32) {
        match self {
            TradingSession::Sydney => (21, 6),
            TradingSession::Tokyo => (0, 9),
            TradingSession::London => (7, 16),
            TradingSession::NewYork => (12, 21),
        }
    }

    pub fn is_open_at(&self, hour: u32) -> bool {
        let (open, close) = self.hours_utc();
        if open < close {
            (open..close).contains(&hour)
        } else {
            // Wraps past midnight
            hour >= open || hour < close
        }
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TradingSession::Sydney => "Sydney",
            TradingSession::Tokyo => "Tokyo",
            TradingSession::London => "London",
            TradingSession::NewYork => "New York",
        };
        f.write_str(name)
    }
}

/// Header state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockReading {
    pub now: DateTime<Utc>,
    pub market_open: bool,
    pub sessions: Vec<TradingSession>,
}

/// FX trades from Sunday 21:00 UTC to Friday 21:00 UTC
pub fn is_fx_market_open(now: DateTime<Utc>) -> bool {
    match now.weekday() {
        Weekday::Sat => false,
        Weekday::Fri => now.hour() < 21,
        Weekday::Sun => now.hour() >= 21,
        _ => true,
    }
}

pub fn session_status(now: DateTime<Utc>) -> ClockReading {
    let market_open = is_fx_market_open(now);
    let sessions = if market_open {
        TradingSession::ALL
            .iter()
            .copied()
            .filter(|s| s.is_open_at(now.hour()))
            .collect()
    } else {
        Vec::new()
    };

    ClockReading {
        now,
        market_open,
        sessions,
    }
}

/// Source of the current time
pub type TimeSource = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Header clock refreshed by its own ticker
pub struct MarketClock {
    ticker: Ticker,
    now: TimeSource,
    reading: Arc<RwLock<ClockReading>>,
}

impl MarketClock {
    pub fn new(ticker: Ticker) -> Self {
        Self::with_time_source(ticker, Arc::new(Utc::now))
    }

    pub fn with_time_source(ticker: Ticker, now: TimeSource) -> Self {
        let reading = session_status(now());
        Self {
            ticker,
            now,
            reading: Arc::new(RwLock::new(reading)),
        }
    }

    pub fn reading(&self) -> ClockReading {
        self.reading
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn start(&mut self) -> Result<(), FeedError> {
        let reading = self.reading.clone();
        let now = self.now.clone();
        self.ticker.start(move |_| {
            let next = session_status(now());
            *reading.write().unwrap_or_else(PoisonError::into_inner) = next;
        })
    }

    pub async fn stop(&mut self) -> Result<(), FeedError> {
        self.ticker.stop().await
    }
}
