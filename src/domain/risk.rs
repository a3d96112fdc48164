//! Risk sizing and trade validation.
//!
//! Position size is the risk budget (balance × max risk per trade) divided by
//! the per-unit stop distance, capped at max position size × balance / entry.
//! A setup is rejected when its per-unit stop distance exceeds the total risk
//! budget, or when reward:risk is below [`MIN_REWARD_RISK_RATIO`].

use crate::domain::error::TradekitError;
use std::fmt;

pub const DEFAULT_MAX_RISK_PER_TRADE: f64 = 0.02;
pub const DEFAULT_MAX_POSITION_SIZE: f64 = 0.1;
pub const MIN_REWARD_RISK_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParameters {
    pub account_balance: f64,
    /// Fraction of the balance that may be lost on one trade, in (0, 1].
    pub max_risk_per_trade: f64,
    /// Fraction of the balance one position may occupy, in (0, 1].
    pub max_position_size: f64,
}

impl RiskParameters {
    pub fn with_balance(account_balance: f64) -> Self {
        RiskParameters {
            account_balance,
            max_risk_per_trade: DEFAULT_MAX_RISK_PER_TRADE,
            max_position_size: DEFAULT_MAX_POSITION_SIZE,
        }
    }

    pub fn validate(&self) -> Result<(), TradekitError> {
        validate_balance(self.account_balance)?;
        validate_fraction("max_risk_per_trade", self.max_risk_per_trade)?;
        validate_fraction("max_position_size", self.max_position_size)?;
        Ok(())
    }
}

fn validate_balance(balance: f64) -> Result<(), TradekitError> {
    if !balance.is_finite() || balance < 0.0 {
        return Err(TradekitError::invalid(
            "risk",
            "account_balance",
            format!("account_balance must be a non-negative number, got {}", balance),
        ));
    }
    Ok(())
}

fn validate_fraction(key: &str, value: f64) -> Result<(), TradekitError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(TradekitError::invalid(
            "risk",
            key,
            format!("{} must be in (0, 1], got {}", key, value),
        ));
    }
    Ok(())
}

/// Why a trade setup was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionReason {
    /// The per-unit stop distance exceeds the whole risk budget.
    RiskExceedsLimit {
        risk_per_unit: f64,
        max_risk_amount: f64,
    },
    RewardRiskTooLow {
        ratio: f64,
    },
    /// Stop placed at the entry price; reward:risk is undefined.
    ZeroRisk,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::RiskExceedsLimit {
                risk_per_unit,
                max_risk_amount,
            } => write!(
                f,
                "Risk amount exceeds maximum allowed risk per trade ({:.2} > {:.2})",
                risk_per_unit, max_risk_amount
            ),
            RejectionReason::RewardRiskTooLow { .. } => {
                write!(f, "Risk-reward ratio is less than 2:1")
            }
            RejectionReason::ZeroRisk => write!(f, "Stop loss equals entry price"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeValidation {
    pub is_valid: bool,
    pub reason: Option<RejectionReason>,
}

impl TradeValidation {
    pub fn accepted() -> Self {
        TradeValidation {
            is_valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: RejectionReason) -> Self {
        TradeValidation {
            is_valid: false,
            reason: Some(reason),
        }
    }

    /// Human-readable rejection reason, if any.
    pub fn reason_text(&self) -> Option<String> {
        self.reason.map(|r| r.to_string())
    }
}

/// Single-owner risk state. Wrap in a mutex if it must be shared.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskManager {
    params: RiskParameters,
}

impl RiskManager {
    pub fn new(params: RiskParameters) -> Result<Self, TradekitError> {
        params.validate()?;
        Ok(RiskManager { params })
    }

    pub fn with_defaults(account_balance: f64) -> Result<Self, TradekitError> {
        Self::new(RiskParameters::with_balance(account_balance))
    }

    pub fn parameters(&self) -> &RiskParameters {
        &self.params
    }

    pub fn account_balance(&self) -> f64 {
        self.params.account_balance
    }

    pub fn max_risk_per_trade(&self) -> f64 {
        self.params.max_risk_per_trade
    }

    pub fn max_position_size(&self) -> f64 {
        self.params.max_position_size
    }

    /// Maximum currency amount that may be lost on one trade.
    pub fn max_risk_amount(&self) -> f64 {
        self.params.account_balance * self.params.max_risk_per_trade
    }

    /// Units to buy so that hitting `stop_loss` loses at most the risk budget,
    /// capped by the maximum position size.
    ///
    /// A stop at the entry price has no per-unit risk, so only the position
    /// cap applies. A non-positive entry price sizes to zero.
    pub fn calculate_position_size(&self, entry_price: f64, stop_loss: f64) -> f64 {
        if entry_price <= 0.0 {
            return 0.0;
        }

        let max_allowed =
            self.params.account_balance * self.params.max_position_size / entry_price;
        let risk_per_unit = (entry_price - stop_loss).abs();
        if risk_per_unit == 0.0 {
            return max_allowed;
        }

        (self.max_risk_amount() / risk_per_unit).min(max_allowed)
    }

    pub fn calculate_potential_loss(
        &self,
        position_size: f64,
        entry_price: f64,
        stop_loss: f64,
    ) -> f64 {
        (position_size * (entry_price - stop_loss)).abs()
    }

    pub fn validate_trade(
        &self,
        entry_price: f64,
        stop_loss: f64,
        target_price: f64,
    ) -> TradeValidation {
        // Per-unit price distance against the total currency budget.
        let risk_per_unit = (entry_price - stop_loss).abs();
        let max_risk_amount = self.max_risk_amount();

        if risk_per_unit > max_risk_amount {
            tracing::debug!(risk_per_unit, max_risk_amount, "trade rejected: risk too large");
            return TradeValidation::rejected(RejectionReason::RiskExceedsLimit {
                risk_per_unit,
                max_risk_amount,
            });
        }

        if risk_per_unit == 0.0 {
            tracing::debug!(entry_price, "trade rejected: stop at entry");
            return TradeValidation::rejected(RejectionReason::ZeroRisk);
        }

        let ratio = (target_price - entry_price).abs() / risk_per_unit;
        if ratio < MIN_REWARD_RISK_RATIO {
            tracing::debug!(ratio, "trade rejected: reward:risk below minimum");
            return TradeValidation::rejected(RejectionReason::RewardRiskTooLow { ratio });
        }

        TradeValidation::accepted()
    }

    /// Replace the account balance used by later sizing and validation calls.
    pub fn update_balance(&mut self, new_balance: f64) -> Result<(), TradekitError> {
        validate_balance(new_balance)?;
        self.params.account_balance = new_balance;
        Ok(())
    }
}
