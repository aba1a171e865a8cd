//! Smoothed completion-rate estimation over a double sliding window.
//!
//! [`RateTracker`] counts completions reported from any thread and, once per
//! interval, folds them into two cascaded ring buffers to publish a rate that
//! follows recent throughput without jumping on every burst.

mod config;
mod error;
mod eta;
mod tracker;
mod window;

pub use config::WindowConfig;
pub use error::ConfigError;
pub use eta::{eta, format_eta, ProgressReport};
pub use tracker::RateTracker;
pub use window::{DoubleWindow, WindowSnapshot};
