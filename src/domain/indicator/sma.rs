//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean of the n points ending at i, maintained as a running sum.
//! Output starts at the n-th input point: len = input_len - n + 1.

use crate::domain::candle::{Candle, PriceField};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(candles: &[Candle], period: usize, field: PriceField) -> IndicatorSeries {
    let prices: Vec<f64> = candles.iter().map(|c| c.price(field)).collect();
    IndicatorSeries::new(
        IndicatorType::Sma(period),
        period.max(1),
        candles.len(),
        sma_values(&prices, period),
    )
}

/// Rolling mean over `values`. Empty when `period` is zero or exceeds the input.
pub fn sma_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    out.push(sum / period as f64);

    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        out.push(sum / period as f64);
    }

    out
}
