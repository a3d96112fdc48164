//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the SMA of the first n points, then
//! EMA[i] = (P[i] - EMA[i-1]) * k + EMA[i-1].
//!
//! The recurrence runs on inputs multiplied by [`SCALE_FACTOR`]; each output
//! is divided back down at the end. Keep that order: removing the scaling
//! changes the rounding path and therefore the low digits of the output.
//!
//! NaN handling: a NaN inside the seed window yields an empty result. A NaN
//! after the seed is skipped; it emits no value and the recurrence carries
//! on from the last valid EMA.

use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{IndicatorSeries, IndicatorType, SCALE_FACTOR};

pub fn calculate_ema(candles: &[Candle], period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::Ema(period),
        period.max(1),
        candles.len(),
        ema_values(&closes(candles), period),
    )
}

pub fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let scaled: Vec<f64> = values.iter().map(|v| v * SCALE_FACTOR).collect();

    let mut sum = 0.0;
    for (i, &v) in scaled[..period].iter().enumerate() {
        if v.is_nan() {
            tracing::debug!(index = i, period, "NaN in EMA seed window");
            return Vec::new();
        }
        sum += v;
    }

    let mut ema = sum / period as f64;
    let mut out = Vec::with_capacity(scaled.len() - period + 1);
    out.push(ema);

    for &v in &scaled[period..] {
        if v.is_nan() {
            continue;
        }
        ema = (v - ema) * k + ema;
        out.push(ema);
    }

    out.into_iter().map(|v| v / SCALE_FACTOR).collect()
}
