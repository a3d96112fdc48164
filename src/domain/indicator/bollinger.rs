//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! Closes are multiplied by [`SCALE_FACTOR`] before any arithmetic and all
//! three bands divided back down at the end, as for the EMA.
//!
//! Default parameters: period=20, multiplier=2.0
//! len = input_len - period + 1.
//!
//! The middle band is a running-sum SMA, so rounding from earlier windows
//! carries forward. A constant window after a noisy history gives bands
//! that coincide only to within rounding error, not exactly.

use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{
    sma_values, BollingerResult, IndicatorSeries, IndicatorType, SCALE_FACTOR,
};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT: f64 = 2.0;

pub fn calculate_bollinger(
    candles: &[Candle],
    period: usize,
    stddev_mult: f64,
) -> BollingerResult {
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100: (stddev_mult * 100.0).round() as i32,
    };
    let required = period.max(1);
    let available = candles.len();

    let series = |values: Vec<f64>| {
        IndicatorSeries::new(indicator_type.clone(), required, available, values)
    };

    if period == 0 || available < period {
        return BollingerResult {
            upper: series(Vec::new()),
            middle: series(Vec::new()),
            lower: series(Vec::new()),
        };
    }

    let scaled: Vec<f64> = closes(candles).iter().map(|c| c * SCALE_FACTOR).collect();
    let middle = sma_values(&scaled, period);

    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for (start, &avg) in middle.iter().enumerate() {
        let window = &scaled[start..start + period];
        let variance: f64 = window
            .iter()
            .map(|c| {
                let diff = c - avg;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let sd = variance.sqrt();

        upper.push((avg + stddev_mult * sd) / SCALE_FACTOR);
        lower.push((avg - stddev_mult * sd) / SCALE_FACTOR);
    }

    BollingerResult {
        upper: series(upper),
        middle: series(middle.into_iter().map(|m| m / SCALE_FACTOR).collect()),
        lower: series(lower),
    }
}

pub fn calculate_bollinger_default(candles: &[Candle]) -> BollingerResult {
    calculate_bollinger(candles, DEFAULT_PERIOD, DEFAULT_STDDEV_MULT)
}
