//! RSI + MACD momentum strategy.
//!
//! Buy when RSI is below the oversold level while the MACD histogram is
//! positive; sell when RSI is above the overbought level while the histogram
//! is negative. Backtests trade long only, with stop and target placed a
//! fixed fraction away from the entry close, and exit at whichever boundary
//! a later close crosses.

use crate::domain::candle::Candle;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{calculate_bollinger_default, calculate_macd_default, calculate_rsi};
use crate::domain::performance::DEFAULT_RISK_FREE_RATE;
use crate::domain::position::{CloseReason, Position, PositionConfig, Side};
use crate::domain::risk::RiskManager;
use crate::domain::strategy::{Analysis, BacktestSummary, Signal, Strategy, StrategyConfig};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiMacdSettings {
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    /// Stop distance below entry, as a fraction of the entry price.
    pub stop_loss_pct: f64,
    /// Target distance above entry, as a fraction of the entry price.
    pub take_profit_pct: f64,
    pub risk_free_rate: f64,
}

impl Default for RsiMacdSettings {
    fn default() -> Self {
        RsiMacdSettings {
            rsi_period: 14,
            oversold: 30.0,
            overbought: 70.0,
            stop_loss_pct: 0.02,
            // 2.5:1 against the stop, clear of the 2:1 minimum under rounding.
            take_profit_pct: 0.05,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RsiMacdStrategy {
    config: StrategyConfig,
    settings: RsiMacdSettings,
    risk: RiskManager,
}

impl RsiMacdStrategy {
    pub fn new(config: StrategyConfig, settings: RsiMacdSettings, risk: RiskManager) -> Self {
        RsiMacdStrategy {
            config,
            settings,
            risk,
        }
    }

    pub fn settings(&self) -> &RsiMacdSettings {
        &self.settings
    }

    pub fn risk_manager(&self) -> &RiskManager {
        &self.risk
    }

    /// Candles needed before both RSI and the MACD histogram exist.
    pub fn warmup(&self) -> usize {
        let macd = DEFAULT_FAST.max(DEFAULT_SLOW) + DEFAULT_SIGNAL;
        macd.max(self.settings.rsi_period.saturating_add(1))
    }
}

fn scaled(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        (num / den).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Strategy for RsiMacdStrategy {
    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn analyze(&self, candles: &[Candle]) -> Analysis {
        let rsi = calculate_rsi(candles, self.settings.rsi_period);
        let macd = calculate_macd_default(candles);
        let bollinger = calculate_bollinger_default(candles);

        let mut metadata = BTreeMap::new();
        let readings = [
            ("rsi", rsi.latest()),
            ("macd", macd.macd.latest()),
            ("macd_signal", macd.signal.latest()),
            ("macd_histogram", macd.histogram.latest()),
            ("bollinger_upper", bollinger.upper.latest()),
            ("bollinger_middle", bollinger.middle.latest()),
            ("bollinger_lower", bollinger.lower.latest()),
            ("close", candles.last().map(|c| c.close)),
        ];
        for (key, value) in readings {
            if let Some(v) = value {
                metadata.insert(key.to_string(), v);
            }
        }

        let (Some(rsi), Some(histogram)) = (rsi.latest(), macd.histogram.latest()) else {
            return Analysis {
                metadata,
                ..Analysis::hold()
            };
        };

        let s = &self.settings;
        let (signal, confidence) = if rsi < s.oversold && histogram > 0.0 {
            (Signal::Buy, scaled(s.oversold - rsi, s.oversold))
        } else if rsi > s.overbought && histogram < 0.0 {
            (Signal::Sell, scaled(rsi - s.overbought, 100.0 - s.overbought))
        } else {
            (Signal::Hold, 0.0)
        };

        Analysis {
            signal,
            confidence,
            metadata,
        }
    }

    fn backtest(&self, candles: &[Candle]) -> BacktestSummary {
        let mut risk = self.risk.clone();
        let mut position: Option<Position> = None;
        let mut trade_returns = Vec::new();
        let warmup = self.warmup();

        for (i, candle) in candles.iter().enumerate() {
            let price = candle.close;

            if let Some(pos) = position.as_mut() {
                pos.update_pnl(price);
                if let Some(reason) = pos.close_reason(price) {
                    // Fill at the boundary that was crossed.
                    let exit_price = match reason {
                        CloseReason::StopLoss => pos.stop_loss(),
                        CloseReason::TakeProfit => pos.take_profit(),
                    }
                    .unwrap_or(price);
                    pos.update_pnl(exit_price);
                    let pnl = pos.unrealized_pnl();
                    let balance = risk.account_balance();
                    if balance > 0.0 {
                        trade_returns.push(pnl / balance);
                    }
                    if let Err(e) = risk.update_balance((balance + pnl).max(0.0)) {
                        tracing::warn!(error = %e, "stopping backtest");
                        break;
                    }
                    tracing::debug!(index = i, exit_price, pnl, ?reason, "position closed");
                    position = None;
                }
                continue;
            }

            if i + 1 < warmup {
                continue;
            }

            let analysis = self.analyze(&candles[..=i]);
            if analysis.signal != Signal::Buy {
                continue;
            }

            let stop_loss = price * (1.0 - self.settings.stop_loss_pct);
            let take_profit = price * (1.0 + self.settings.take_profit_pct);
            let verdict = risk.validate_trade(price, stop_loss, take_profit);
            if !verdict.is_valid {
                tracing::debug!(
                    index = i,
                    reason = %verdict.reason_text().unwrap_or_default(),
                    "entry skipped"
                );
                continue;
            }

            let size = risk.calculate_position_size(price, stop_loss);
            if size <= 0.0 {
                continue;
            }

            tracing::debug!(index = i, price, size, "position opened");
            position = Some(Position::new(PositionConfig {
                entry_price: price,
                size,
                leverage: None,
                stop_loss: Some(stop_loss),
                take_profit: Some(take_profit),
                side: Side::Long,
            }));
        }

        BacktestSummary::from_trade_returns(trade_returns, self.settings.risk_free_rate)
    }
}
