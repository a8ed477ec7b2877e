//! Core domain types and logic.

pub mod backtest;
pub mod candle;
pub mod capital;
pub mod crossover;
pub mod date;
pub mod error;
pub mod gbm;
pub mod pricing;
pub mod record;
pub mod report;
pub mod sequence;
pub mod stats;
pub mod system;
pub mod trade;
