//! Core domain types and logic.

pub mod candle;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod performance;
pub mod position;
pub mod risk;
pub mod rsi_macd;
pub mod strategy;
