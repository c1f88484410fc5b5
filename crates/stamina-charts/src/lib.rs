pub mod config;
pub mod logging;
pub mod render;
pub mod runner;
pub mod sweep;

pub use config::{ChartConfig, ConfigError, ResolvedOutputs, ValidationError};
pub use runner::{RunSummary, RunnerError, SweepRunner};
pub use sweep::{ChartKind, SweepGrid};
