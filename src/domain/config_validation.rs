//! Configuration validation and building.
//!
//! Reads `[risk]` and `[strategy]` through a [`ConfigPort`], rejecting
//! malformed or out-of-range values before anything runs.

use crate::domain::error::TradekitError;
use crate::domain::risk::{
    DEFAULT_MAX_POSITION_SIZE, DEFAULT_MAX_RISK_PER_TRADE, RiskManager, RiskParameters,
};
use crate::domain::rsi_macd::{RsiMacdSettings, RsiMacdStrategy};
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_STRATEGY_NAME: &str = "rsi-macd";
pub const DEFAULT_TIMEFRAME: &str = "1h";
pub const MAX_RSI_PERIOD: usize = 10_000;

const TIMEFRAMES: [&str; 9] = ["1m", "5m", "15m", "30m", "1h", "4h", "1d", "1w", "1M"];

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), TradekitError> {
    build_risk_parameters(config).map(|_| ())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TradekitError> {
    build_strategy_config(config)?;
    build_rsi_macd_settings(config)?;
    Ok(())
}

pub fn build_risk_parameters(config: &dyn ConfigPort) -> Result<RiskParameters, TradekitError> {
    let account_balance = required_double(config, "risk", "account_balance")?;
    let params = RiskParameters {
        account_balance,
        max_risk_per_trade: optional_double(
            config,
            "risk",
            "max_risk_per_trade",
            DEFAULT_MAX_RISK_PER_TRADE,
        )?,
        max_position_size: optional_double(
            config,
            "risk",
            "max_position_size",
            DEFAULT_MAX_POSITION_SIZE,
        )?,
    };
    params.validate()?;
    Ok(params)
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, TradekitError> {
    let name = non_blank(config, "strategy", "name")
        .unwrap_or_else(|| DEFAULT_STRATEGY_NAME.to_string());
    if name != DEFAULT_STRATEGY_NAME {
        return Err(TradekitError::invalid(
            "strategy",
            "name",
            format!("unknown strategy {:?}, expected {:?}", name, DEFAULT_STRATEGY_NAME),
        ));
    }

    let timeframe = non_blank(config, "strategy", "timeframe")
        .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());
    if !TIMEFRAMES.contains(&timeframe.as_str()) {
        return Err(TradekitError::invalid(
            "strategy",
            "timeframe",
            format!("timeframe must be one of {}", TIMEFRAMES.join(", ")),
        ));
    }

    Ok(StrategyConfig { name, timeframe })
}

pub fn build_rsi_macd_settings(config: &dyn ConfigPort) -> Result<RsiMacdSettings, TradekitError> {
    let defaults = RsiMacdSettings::default();

    let rsi_period = optional_double(config, "strategy", "rsi_period", defaults.rsi_period as f64)?;
    if rsi_period < 1.0 || rsi_period.fract() != 0.0 {
        return Err(TradekitError::invalid(
            "strategy",
            "rsi_period",
            "rsi_period must be a positive integer",
        ));
    }
    if rsi_period > MAX_RSI_PERIOD as f64 {
        return Err(TradekitError::invalid(
            "strategy",
            "rsi_period",
            format!("rsi_period must be at most {}", MAX_RSI_PERIOD),
        ));
    }

    let oversold = optional_double(config, "strategy", "oversold", defaults.oversold)?;
    let overbought = optional_double(config, "strategy", "overbought", defaults.overbought)?;
    for (key, value) in [("oversold", oversold), ("overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(TradekitError::invalid(
                "strategy",
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }
    if oversold >= overbought {
        return Err(TradekitError::invalid(
            "strategy",
            "oversold",
            "oversold must be below overbought",
        ));
    }

    let stop_loss_pct =
        optional_double(config, "strategy", "stop_loss_pct", defaults.stop_loss_pct)?;
    if !(stop_loss_pct > 0.0 && stop_loss_pct < 1.0) {
        return Err(TradekitError::invalid(
            "strategy",
            "stop_loss_pct",
            "stop_loss_pct must be between 0 and 1",
        ));
    }

    let take_profit_pct =
        optional_double(config, "strategy", "take_profit_pct", defaults.take_profit_pct)?;
    if take_profit_pct <= 0.0 {
        return Err(TradekitError::invalid(
            "strategy",
            "take_profit_pct",
            "take_profit_pct must be positive",
        ));
    }

    let risk_free_rate =
        optional_double(config, "strategy", "risk_free_rate", defaults.risk_free_rate)?;
    if !(0.0..1.0).contains(&risk_free_rate) {
        return Err(TradekitError::invalid(
            "strategy",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }

    Ok(RsiMacdSettings {
        rsi_period: rsi_period as usize,
        oversold,
        overbought,
        stop_loss_pct,
        take_profit_pct,
        risk_free_rate,
    })
}

/// Risk manager and strategy wired from one config.
pub fn build_rsi_macd_strategy(config: &dyn ConfigPort) -> Result<RsiMacdStrategy, TradekitError> {
    let risk = RiskManager::new(build_risk_parameters(config)?)?;
    Ok(RsiMacdStrategy::new(
        build_strategy_config(config)?,
        build_rsi_macd_settings(config)?,
        risk,
    ))
}

fn non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_double(section: &str, key: &str, raw: &str) -> Result<f64, TradekitError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TradekitError::invalid(
            section,
            key,
            format!("{} must be a number, got {:?}", key, raw),
        )),
    }
}

fn required_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<f64, TradekitError> {
    let raw = non_blank(config, section, key).ok_or_else(|| TradekitError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    })?;
    parse_double(section, key, &raw)
}

fn optional_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TradekitError> {
    match non_blank(config, section, key) {
        Some(raw) => parse_double(section, key, &raw),
        None => Ok(default),
    }
}
