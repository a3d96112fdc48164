//! CLI definition and dispatch.
//!
//! Progress and diagnostics go to stderr via `tracing`; results go to stdout.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::candle::{Candle, PriceField};
use crate::domain::config_validation::{
    build_risk_parameters, build_rsi_macd_strategy, validate_risk_config,
    validate_strategy_config,
};
use crate::domain::error::TradekitError;
use crate::domain::indicator::{
    IndicatorSeries, calculate_bollinger_default, calculate_ema, calculate_macd_default,
    calculate_rsi_default, calculate_sma,
};
use crate::domain::risk::RiskManager;
use crate::domain::strategy::Strategy;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::CandleSource;

/// Exit code for a trade setup the risk manager rejects.
pub const EXIT_REJECTED: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "tradekit", about = "Technical indicators, risk sizing and strategy backtests")]
pub struct Cli {
    /// Log level directive; RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    #[arg(long)]
    pub symbol: String,
    /// Start of range: epoch milliseconds or YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// End of range (inclusive): epoch milliseconds or YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    /// Overrides [data] base_path
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the latest value of each indicator for a symbol
    Indicators {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Size a position from entry and stop prices
    Size {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        stop: f64,
    },
    /// Check a trade setup against the risk limits
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        stop: f64,
        #[arg(long)]
        target: f64,
    },
    /// Backtest the configured strategy over a symbol's history
    Backtest {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Validate a configuration file
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let log_level = cli.log_level.as_deref();
    let result = match &cli.command {
        Command::Indicators { data } => run_indicators(data, log_level),
        Command::Size {
            config,
            entry,
            stop,
        } => run_size(config, *entry, *stop, log_level),
        Command::Validate {
            config,
            entry,
            stop,
            target,
        } => run_validate(config, *entry, *stop, *target, log_level),
        Command::Backtest { data } => run_backtest(data, log_level),
        Command::CheckConfig { config } => run_check_config(config, log_level),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load the config file and install logging at the resolved level.
pub fn load_config(
    path: &Path,
    log_level: Option<&str>,
) -> Result<FileConfigAdapter, TradekitError> {
    let adapter = match FileConfigAdapter::from_file(path) {
        Ok(a) => a,
        Err(e) => {
            logging::init(&logging::resolve_level(log_level, None));
            return Err(e);
        }
    };
    logging::init(&logging::resolve_level(log_level, Some(&adapter)));
    tracing::info!(config = %path.display(), "config loaded");
    Ok(adapter)
}

/// `value` as epoch milliseconds. Dates are midnight UTC, or the last
/// millisecond of the day when `end_of_day` is set.
pub fn parse_time_bound(key: &str, value: &str, end_of_day: bool) -> Result<i64, TradekitError> {
    let value = value.trim();
    if let Ok(ms) = value.parse::<i64>() {
        return Ok(ms);
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        TradekitError::invalid(
            "args",
            key,
            format!("expected epoch milliseconds or YYYY-MM-DD, got {:?}", value),
        )
    })?;
    let start = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| TradekitError::invalid("args", key, "date out of range"))?;

    Ok(if end_of_day {
        start + 86_400_000 - 1
    } else {
        start
    })
}

pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn resolve_data_dir(args: &DataArgs, config: &dyn ConfigPort) -> Result<PathBuf, TradekitError> {
    if let Some(dir) = &args.data_dir {
        return Ok(dir.clone());
    }
    config
        .get_string("data", "base_path")
        .filter(|p| !p.trim().is_empty())
        .map(|p| PathBuf::from(p.trim()))
        .ok_or_else(|| TradekitError::ConfigMissing {
            section: "data".to_string(),
            key: "base_path".to_string(),
        })
}

fn load_candles(args: &DataArgs, config: &dyn ConfigPort) -> Result<Vec<Candle>, TradekitError> {
    let start = match &args.start {
        Some(s) => parse_time_bound("start", s, false)?,
        None => i64::MIN,
    };
    let end = match &args.end {
        Some(s) => parse_time_bound("end", s, true)?,
        None => i64::MAX,
    };
    if start > end {
        return Err(TradekitError::invalid(
            "args",
            "start",
            "start must not be after end",
        ));
    }

    let source = CsvAdapter::new(resolve_data_dir(args, config)?);
    let candles = source.fetch_candles(&args.symbol, start, end)?;
    if candles.is_empty() {
        return Err(TradekitError::NoData {
            symbol: args.symbol.clone(),
        });
    }
    tracing::info!(symbol = %args.symbol, count = candles.len(), "candles loaded");
    Ok(candles)
}

fn describe(series: &IndicatorSeries) -> String {
    match series.ready() {
        Ok(values) => format!("{:.4}", values[values.len() - 1]),
        Err(e) => format!("n/a ({})", e),
    }
}

fn run_indicators(args: &DataArgs, log_level: Option<&str>) -> Result<ExitCode, TradekitError> {
    let config = load_config(&args.config, log_level)?;
    let candles = load_candles(args, &config)?;

    let Some(last) = candles.last() else {
        return Err(TradekitError::NoData {
            symbol: args.symbol.clone(),
        });
    };

    println!(
        "{} {} candles, last {} close {:.4}",
        args.symbol,
        candles.len(),
        format_timestamp(last.timestamp),
        last.close
    );

    let sma = calculate_sma(&candles, 20, PriceField::Close);
    let ema = calculate_ema(&candles, 20);
    let rsi = calculate_rsi_default(&candles);
    println!("{:<18} {}", sma.indicator_type.to_string(), describe(&sma));
    println!("{:<18} {}", ema.indicator_type.to_string(), describe(&ema));
    println!("{:<18} {}", rsi.indicator_type.to_string(), describe(&rsi));

    let macd = calculate_macd_default(&candles);
    println!("{:<18} {}", macd.macd.indicator_type.to_string(), describe(&macd.macd));
    println!("{:<18} {}", "  signal", describe(&macd.signal));
    println!("{:<18} {}", "  histogram", describe(&macd.histogram));

    let bands = calculate_bollinger_default(&candles);
    println!("{:<18} {}", bands.middle.indicator_type.to_string(), describe(&bands.middle));
    println!("{:<18} {}", "  upper", describe(&bands.upper));
    println!("{:<18} {}", "  lower", describe(&bands.lower));

    Ok(ExitCode::SUCCESS)
}

fn risk_manager(config: &dyn ConfigPort) -> Result<RiskManager, TradekitError> {
    RiskManager::new(build_risk_parameters(config)?)
}

fn run_size(
    config_path: &Path,
    entry: f64,
    stop: f64,
    log_level: Option<&str>,
) -> Result<ExitCode, TradekitError> {
    let config = load_config(config_path, log_level)?;
    let risk = risk_manager(&config)?;

    let size = risk.calculate_position_size(entry, stop);
    let loss = risk.calculate_potential_loss(size, entry, stop);

    println!("position size:   {:.8}", size);
    println!("notional:        {:.2}", size * entry);
    println!("potential loss:  {:.2}", loss);
    println!("risk budget:     {:.2}", risk.max_risk_amount());
    Ok(ExitCode::SUCCESS)
}

fn run_validate(
    config_path: &Path,
    entry: f64,
    stop: f64,
    target: f64,
    log_level: Option<&str>,
) -> Result<ExitCode, TradekitError> {
    let config = load_config(config_path, log_level)?;
    let risk = risk_manager(&config)?;

    let verdict = risk.validate_trade(entry, stop, target);
    match verdict.reason_text() {
        None => {
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Some(reason) => {
            println!("rejected: {}", reason);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

fn run_backtest(args: &DataArgs, log_level: Option<&str>) -> Result<ExitCode, TradekitError> {
    let config = load_config(&args.config, log_level)?;
    validate_risk_config(&config)?;
    validate_strategy_config(&config)?;
    let strategy = build_rsi_macd_strategy(&config)?;
    let candles = load_candles(args, &config)?;

    let warmup = strategy.warmup();
    if candles.len() < warmup {
        return Err(TradekitError::InsufficientData {
            indicator: strategy.config().name.clone(),
            bars: candles.len(),
            minimum: warmup,
        });
    }

    tracing::info!(
        strategy = %strategy.config().name,
        timeframe = %strategy.config().timeframe,
        "running backtest"
    );
    let summary = strategy.backtest(&candles);

    println!(
        "{} on {} ({}), {} candles",
        strategy.config().name,
        args.symbol,
        strategy.config().timeframe,
        candles.len()
    );
    println!("Total Return:     {:.2}%", summary.returns * 100.0);
    println!("Sharpe Ratio:     {:.2}", summary.sharpe_ratio);
    println!("Max Drawdown:     -{:.1}%", summary.max_drawdown * 100.0);
    println!("Total Trades:     {}", summary.trades());
    println!("Win Rate:         {:.1}%", summary.win_rate * 100.0);

    let latest = strategy.analyze(&candles);
    println!(
        "Latest Signal:    {} (confidence {:.2})",
        latest.signal, latest.confidence
    );
    Ok(ExitCode::SUCCESS)
}

fn run_check_config(
    config_path: &Path,
    log_level: Option<&str>,
) -> Result<ExitCode, TradekitError> {
    let config = load_config(config_path, log_level)?;
    validate_risk_config(&config)?;
    validate_strategy_config(&config)?;

    let strategy = build_rsi_macd_strategy(&config)?;
    let params = strategy.risk_manager().parameters();
    let settings = strategy.settings();

    println!("[risk]");
    println!("  account_balance     = {}", params.account_balance);
    println!("  max_risk_per_trade  = {}", params.max_risk_per_trade);
    println!("  max_position_size   = {}", params.max_position_size);
    println!("[strategy]");
    println!("  name                = {}", strategy.config().name);
    println!("  timeframe           = {}", strategy.config().timeframe);
    println!("  rsi_period          = {}", settings.rsi_period);
    println!("  oversold            = {}", settings.oversold);
    println!("  overbought          = {}", settings.overbought);
    println!("  stop_loss_pct       = {}", settings.stop_loss_pct);
    println!("  take_profit_pct     = {}", settings.take_profit_pct);
    match config.get_string("data", "base_path") {
        Some(path) => println!("[data]\n  base_path           = {}", path),
        None => tracing::warn!("[data] base_path is not set; pass --data-dir to load candles"),
    }
    eprintln!("Config validated successfully");
    Ok(ExitCode::SUCCESS)
}
