// Signal Generation Framework
// Synthesizes trading signals and alerts, filters and ranks them, and keeps
// the latest batches in memory for the dashboard screens

pub mod alerts;
pub mod filters;
pub mod generator;
pub mod pipeline;
pub mod ranking;
pub mod signals;
pub mod source;
pub mod stats;
pub mod storage;

pub use alerts::{Alert, NewAlert, RandomAlertGenerator};
pub use filters::SignalCriteria;
pub use generator::{BatchGenerator, Sampler};
pub use pipeline::{AlertPipeline, PipelineConfig, SignalPipeline};
pub use ranking::{rank_alerts, rank_signals};
pub use signals::{exit_levels, RandomSignalGenerator, TradingSignal};
pub use source::{BatchSource, SimulatedSource};
pub use stats::{AlertStats, SignalStats};
pub use storage::{AlertStore, AlertsView, SignalFeed, SignalsView};
