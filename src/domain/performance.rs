//! Performance statistics over return series and equity curves.

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Mean excess return over the population standard deviation of excess
/// returns. Not annualised: `risk_free_rate` must be in the same units as the
/// returns. Returns 0.0 for an empty series or zero dispersion.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let excess: Vec<f64> = returns.iter().map(|r| r - risk_free_rate).collect();
    let mean = excess.iter().sum::<f64>() / n;
    let variance = excess.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev
    } else {
        0.0
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in equity {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Equity relative to a starting value of 1: 1 + running sum of returns.
pub fn equity_curve_from_returns(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(0.0, |total, r| {
            *total += r;
            Some(1.0 + *total)
        })
        .collect()
}

/// Fraction of strictly positive returns.
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let wins = returns.iter().filter(|&&r| r > 0.0).count();
    wins as f64 / returns.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETURNS: [f64; 5] = [0.05, 0.06, 0.04, 0.07, 0.05];

    #[test]
    fn sharpe_positive() {
        assert!(sharpe_ratio(&RETURNS, DEFAULT_RISK_FREE_RATE) > 0.0);
    }

    #[test]
    fn sharpe_negative() {
        let returns: Vec<f64> = RETURNS.iter().map(|r| -r).collect();
        assert!(sharpe_ratio(&returns, DEFAULT_RISK_FREE_RATE) < 0.0);
    }

    #[test]
    fn sharpe_higher_risk_free_rate_lowers_ratio() {
        let low = sharpe_ratio(&RETURNS, 0.02);
        let high = sharpe_ratio(&RETURNS, 0.03);
        assert!(low > high);
    }

    #[test]
    fn sharpe_known_value() {
        // excess: 0.03, 0.05 -> mean 0.04, population sd 0.01
        let sharpe = sharpe_ratio(&[0.05, 0.07], 0.02);
        assert!((sharpe - 4.0).abs() < 1e-9);
    }

    #[test]
    fn sharpe_degenerate_inputs() {
        assert_eq!(sharpe_ratio(&[], 0.02), 0.0);
        assert_eq!(sharpe_ratio(&[0.5, 0.5, 0.5], 0.25), 0.0);
    }

    #[test]
    fn max_drawdown_known_curve() {
        let equity = [100.0, 95.0, 90.0, 95.0, 85.0, 80.0, 85.0, 90.0];
        assert_eq!(max_drawdown(&equity), 0.2);
    }

    #[test]
    fn max_drawdown_uses_running_peak() {
        let equity = [100.0, 110.0, 90.0, 95.0, 80.0, 100.0];
        assert!((max_drawdown(&equity) - (110.0 - 80.0) / 110.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_ascending_curve() {
        assert_eq!(max_drawdown(&[100.0, 105.0, 110.0, 115.0, 120.0]), 0.0);
    }

    #[test]
    fn max_drawdown_single_value() {
        assert_eq!(max_drawdown(&[100.0]), 0.0);
    }

    #[test]
    fn max_drawdown_empty() {
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn equity_curve_accumulates() {
        let curve = equity_curve_from_returns(&[0.1, -0.05, 0.02]);
        assert_eq!(curve.len(), 3);
        assert!((curve[0] - 1.1).abs() < 1e-12);
        assert!((curve[1] - 1.05).abs() < 1e-12);
        assert!((curve[2] - 1.07).abs() < 1e-12);
    }

    #[test]
    fn win_rate_counts_positive_returns() {
        assert!((win_rate(&[0.1, -0.05, 0.0, 0.2]) - 0.5).abs() < f64::EPSILON);
        assert_eq!(win_rate(&[]), 0.0);
    }
}
