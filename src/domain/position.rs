//! Open position tracking.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionConfig {
    pub entry_price: f64,
    pub size: f64,
    /// Defaults to 1 when `None`. Values below 1 (and NaN) also fall back to 1.
    pub leverage: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub side: Side,
}

/// Which boundary a price tick crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    StopLoss,
    TakeProfit,
}

/// A single open trade. Closing it is up to the caller; `should_close` only
/// reports that a boundary was crossed.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    entry_price: f64,
    size: f64,
    leverage: f64,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    side: Side,
    unrealized_pnl: f64,
}

impl Position {
    pub fn new(config: PositionConfig) -> Self {
        Position {
            entry_price: config.entry_price,
            size: config.size,
            leverage: config.leverage.filter(|l| *l >= 1.0).unwrap_or(1.0),
            stop_loss: config.stop_loss,
            take_profit: config.take_profit,
            side: config.side,
            unrealized_pnl: 0.0,
        }
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn leverage(&self) -> f64 {
        self.leverage
    }

    pub fn stop_loss(&self) -> Option<f64> {
        self.stop_loss
    }

    pub fn take_profit(&self) -> Option<f64> {
        self.take_profit
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// P&L as of the last `update_pnl` call.
    pub fn unrealized_pnl(&self) -> f64 {
        self.unrealized_pnl
    }

    pub fn update_pnl(&mut self, current_price: f64) {
        let per_unit = match self.side {
            Side::Long => current_price - self.entry_price,
            Side::Short => self.entry_price - current_price,
        };
        self.unrealized_pnl = per_unit * self.size * self.leverage;
    }

    pub fn should_close(&self, current_price: f64) -> bool {
        self.close_reason(current_price).is_some()
    }

    /// The boundary crossed at `current_price`, stop-loss checked first.
    pub fn close_reason(&self, current_price: f64) -> Option<CloseReason> {
        let stop_hit = self.stop_loss.is_some_and(|stop| match self.side {
            Side::Long => current_price <= stop,
            Side::Short => current_price >= stop,
        });
        if stop_hit {
            return Some(CloseReason::StopLoss);
        }

        let target_hit = self.take_profit.is_some_and(|target| match self.side {
            Side::Long => current_price >= target,
            Side::Short => current_price <= target,
        });
        if target_hit {
            return Some(CloseReason::TakeProfit);
        }

        None
    }
}
