//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), over the range where both exist
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Needs max(fast, slow) + signal candles; otherwise all three lines are empty.
//! The three lines are trimmed to a common length and aligned on the most
//! recent candle: len = input_len - max(fast, slow) - signal + 2.

use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{ema_values, IndicatorSeries, IndicatorType, MacdResult};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    candles: &[Candle],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdResult {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    let required = fast.max(slow) + signal_period;
    let available = candles.len();

    let series = |values: Vec<f64>| {
        IndicatorSeries::new(indicator_type.clone(), required, available, values)
    };

    if fast == 0 || slow == 0 || signal_period == 0 || available < required {
        tracing::debug!(
            candles = available,
            required,
            "insufficient data for MACD calculation"
        );
        return MacdResult {
            macd: series(Vec::new()),
            signal: series(Vec::new()),
            histogram: series(Vec::new()),
        };
    }

    let prices = closes(candles);
    let fast_ema = ema_values(&prices, fast);
    let slow_ema = ema_values(&prices, slow);

    // Both EMAs end on the last candle; keep the overlapping tails.
    let common = fast_ema.len().min(slow_ema.len());
    let macd_line: Vec<f64> = fast_ema[fast_ema.len() - common..]
        .iter()
        .zip(&slow_ema[slow_ema.len() - common..])
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema_values(&macd_line, signal_period);
    let macd_tail = &macd_line[macd_line.len() - signal_line.len()..];

    let mut macd = Vec::with_capacity(signal_line.len());
    let mut signal = Vec::with_capacity(signal_line.len());
    let mut histogram = Vec::with_capacity(signal_line.len());

    for (&m, &s) in macd_tail.iter().zip(&signal_line) {
        let h = m - s;
        if h.is_nan() {
            continue;
        }
        macd.push(m);
        signal.push(s);
        histogram.push(h);
    }

    tracing::debug!(
        candles = available,
        fast_len = fast_ema.len(),
        slow_len = slow_ema.len(),
        macd_len = macd.len(),
        signal_len = signal.len(),
        "MACD components"
    );

    MacdResult {
        macd: series(macd),
        signal: series(signal),
        histogram: series(histogram),
    }
}

pub fn calculate_macd_default(candles: &[Candle]) -> MacdResult {
    calculate_macd(candles, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
