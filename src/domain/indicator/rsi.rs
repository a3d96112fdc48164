//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of the first n close-to-close gains/losses
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (this includes a flat window)
//!
//! Needs n + 1 candles for the first value: len = input_len - n.

use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(candles: &[Candle], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    let required = period.max(1).saturating_add(1);

    if period == 0 || candles.len() <= period {
        return IndicatorSeries::empty(indicator_type, required, candles.len());
    }

    let prices = closes(candles);
    let mut gains: Vec<f64> = Vec::with_capacity(prices.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(prices.len() - 1);

    for w in prices.windows(2) {
        let change = w[1] - w[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(candles.len() - period);
    values.push(rsi_from_averages(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    IndicatorSeries::new(indicator_type, required, candles.len(), values)
}

pub fn calculate_rsi_default(candles: &[Candle]) -> IndicatorSeries {
    calculate_rsi(candles, DEFAULT_PERIOD)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_candles(prices: &[f64]) -> Vec<Candle> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: 1_700_000_000_000 + i as i64 * 60_000,
                open: close,
                high: close,
                low: close,
                close,
                volume_base: 1000.0,
                volume_quote: 1000.0,
            })
            .collect()
    }

    #[test]
    fn rsi_empty_candles() {
        let series = calculate_rsi(&[], 14);
        assert!(series.is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let series = calculate_rsi(&candles, 14);
        assert!(series.is_empty());
        assert_eq!(series.required, 15);
        assert!(series.ready().is_err());
    }

    #[test]
    fn rsi_exactly_period_candles_is_empty() {
        let candles = make_candles(&[100.0; 14]);
        assert!(calculate_rsi(&candles, 14).is_empty());
    }

    #[test]
    fn rsi_output_length() {
        let prices: Vec<f64> = (0..50).map(|i| 102.0 + i as f64).collect();
        let series = calculate_rsi_default(&make_candles(&prices));
        assert_eq!(series.len(), 50 - 14);
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_candles(&prices), 14);

        for rsi in &series.values {
            assert!((rsi - 100.0).abs() < f64::EPSILON, "RSI should be 100 when all gains");
        }
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_candles(&prices), 14);

        for rsi in &series.values {
            assert!(rsi.abs() < f64::EPSILON, "RSI should be 0 when all losses");
        }
    }

    #[test]
    fn rsi_constant_prices_use_sentinel() {
        let series = calculate_rsi(&make_candles(&[100.0; 20]), 14);
        assert_eq!(series.len(), 6);
        for rsi in &series.values {
            assert!(!rsi.is_nan());
            assert!((rsi - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn rsi_seed_is_plain_mean() {
        // deltas: +2, -1, +3 -> avg gain 5/3, avg loss 1/3 -> RS = 5
        let series = calculate_rsi(&make_candles(&[10.0, 12.0, 11.0, 14.0]), 3);
        assert_eq!(series.len(), 1);
        let expected = 100.0 - 100.0 / 6.0;
        assert!((series.values[0] - expected).abs() < 1e-10);
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        // seed as above, then delta -2: gain = (5/3*2 + 0)/3, loss = (1/3*2 + 2)/3
        let series = calculate_rsi(&make_candles(&[10.0, 12.0, 11.0, 14.0, 12.0]), 3);
        assert_eq!(series.len(), 2);

        let avg_gain = (5.0 / 3.0 * 2.0) / 3.0;
        let avg_loss = (1.0 / 3.0 * 2.0 + 2.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((series.values[1] - expected).abs() < 1e-10);
    }

    #[test]
    fn rsi_known_calculation() {
        let candles = make_candles(&[
            44.0, 44.25, 44.50, 43.75, 44.50, 44.25, 44.75, 45.25, 45.50, 45.25, 45.50, 46.0,
            46.25, 46.0, 46.50,
        ]);

        let series = calculate_rsi(&candles, 14);
        assert_eq!(series.len(), 1);

        let rsi = series.values[0];
        assert!(rsi > 50.0 && rsi < 100.0, "RSI should be in bullish territory");
    }

    #[test]
    fn rsi_zero_period() {
        let candles = make_candles(&[100.0, 101.0]);
        assert!(calculate_rsi(&candles, 0).is_empty());
    }

    #[test]
    fn rsi_huge_period_saturates_required() {
        let series = calculate_rsi(&make_candles(&[100.0, 101.0]), usize::MAX);
        assert!(series.is_empty());
        assert_eq!(series.required, usize::MAX);
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&make_candles(&[100.0]), 14);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }

    proptest! {
        #[test]
        fn rsi_in_range(
            prices in prop::collection::vec(1.0f64..500.0, 16..80),
            period in 2usize..15,
        ) {
            let series = calculate_rsi(&make_candles(&prices), period);
            prop_assert_eq!(series.len(), prices.len() - period);
            for rsi in series.values {
                prop_assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }
}
