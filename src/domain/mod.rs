//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod backtest;
pub mod metrics;
pub mod chart;
pub mod run_config;
pub mod config_validation;
pub mod pipeline;
pub mod error;
