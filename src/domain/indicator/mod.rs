//! Technical indicator implementations.
//!
//! Every indicator returns values only for points where its window is
//! satisfied, so `values[0]` belongs to the earliest computable candle and
//! the last value to the most recent one. Too little input yields an empty
//! series; [`IndicatorSeries::ready`] turns that into
//! [`TradekitError::InsufficientData`] for callers that want an error.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a trimmed series of indicator values
//! - `MacdResult` / `BollingerResult`: aligned multi-line outputs

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{calculate_bollinger, calculate_bollinger_default};
pub use ema::{calculate_ema, ema_values};
pub use macd::{calculate_macd, calculate_macd_default};
pub use rsi::{calculate_rsi, calculate_rsi_default};
pub use sma::{calculate_sma, sma_values};

use crate::domain::error::TradekitError;
use std::fmt;

/// Inputs are multiplied by this before the EMA and Bollinger computations
/// and outputs divided by it afterwards.
pub const SCALE_FACTOR: f64 = 1e10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: i32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    /// Minimum number of input points needed for a first value.
    pub required: usize,
    /// Number of input points the series was computed from.
    pub available: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(
        indicator_type: IndicatorType,
        required: usize,
        available: usize,
        values: Vec<f64>,
    ) -> Self {
        IndicatorSeries {
            indicator_type,
            required,
            available,
            values,
        }
    }

    pub fn empty(indicator_type: IndicatorType, required: usize, available: usize) -> Self {
        Self::new(indicator_type, required, available, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent value, if any.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The computed values, or `InsufficientData` when nothing was computable.
    pub fn ready(&self) -> Result<&[f64], TradekitError> {
        if self.values.is_empty() {
            return Err(TradekitError::InsufficientData {
                indicator: self.indicator_type.to_string(),
                bars: self.available,
                minimum: self.required,
            });
        }
        Ok(&self.values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

impl MacdResult {
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerResult {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

impl BollingerResult {
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
