pub mod clock;
pub mod dashboard;
pub mod market_data;
pub mod ticker;

pub use clock::{
    is_fx_market_open, session_status, ClockReading, MarketClock, TimeSource, TradingSession,
};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use market_data::{MarketDataStore, Movers, Quote, INSTRUMENTS};
pub use ticker::Ticker;

// Re-export from common
pub use common::{DashboardConfig, FeedError};
