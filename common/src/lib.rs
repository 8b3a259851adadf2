//! Shared vocabulary for the market dashboard workspace
//!
//! Instruments, wire-level enums, typed errors and the layered configuration
//! used by `signal-generation` and `monitoring`.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    create_config_template, load_config, save_config, AlertFeedConfig, DashboardConfig,
    SignalFeedConfig, TickerConfig,
};
pub use error::{FeedError, MarketError};
pub use types::{
    base_price, is_yen_pair, AlertType, Direction, Priority, Selection, SignalResult,
    SignalStatus, Timeframe, FX_PAIRS, INDICATORS,
};

// Re-exported so downstream crates agree on the id and clock types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
