//! Strategy capability interface.
//!
//! A strategy reads a candle history and produces a trading signal, and can
//! replay a history to summarise how it would have performed.

use crate::domain::candle::Candle;
use crate::domain::performance::{
    equity_curve_from_returns, max_drawdown, sharpe_ratio, win_rate,
};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub signal: Signal,
    /// In [0, 1].
    pub confidence: f64,
    /// Indicator readings the decision was based on, keyed by name.
    pub metadata: BTreeMap<String, f64>,
}

impl Analysis {
    pub fn hold() -> Self {
        Analysis {
            signal: Signal::Hold,
            confidence: 0.0,
            metadata: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    /// Sum of per-trade returns.
    pub returns: f64,
    pub trade_returns: Vec<f64>,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

impl BacktestSummary {
    pub fn from_trade_returns(trade_returns: Vec<f64>, risk_free_rate: f64) -> Self {
        let equity = equity_curve_from_returns(&trade_returns);
        let mut curve = Vec::with_capacity(equity.len() + 1);
        curve.push(1.0);
        curve.extend(equity);

        BacktestSummary {
            returns: trade_returns.iter().sum(),
            sharpe_ratio: sharpe_ratio(&trade_returns, risk_free_rate),
            max_drawdown: max_drawdown(&curve),
            win_rate: win_rate(&trade_returns),
            trade_returns,
        }
    }

    pub fn trades(&self) -> usize {
        self.trade_returns.len()
    }
}

pub trait Strategy {
    fn config(&self) -> &StrategyConfig;

    /// Signal for the most recent candle of `candles`.
    fn analyze(&self, candles: &[Candle]) -> Analysis;

    /// Replay `candles` in order, trading on each prefix's signal.
    fn backtest(&self, candles: &[Candle]) -> BacktestSummary;
}
