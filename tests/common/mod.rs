#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
pub use tradekit::domain::candle::Candle;
use tradekit::domain::error::TradekitError;
use tradekit::ports::data_port::CandleSource;

pub const MINUTE_MS: i64 = 60_000;
pub const START_MS: i64 = 1_700_000_000_000;

pub struct MockCandleSource {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
}

impl MockCandleSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl CandleSource for MockCandleSource {
    fn fetch_candles(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, TradekitError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradekitError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|candles| {
                candles
                    .iter()
                    .filter(|c| c.timestamp >= start_ms && c.timestamp <= end_ms)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn make_candle(index: usize, close: f64) -> Candle {
    Candle {
        timestamp: START_MS + index as i64 * MINUTE_MS,
        open: close - 1.0,
        high: close + 3.0,
        low: close - 3.0,
        close,
        volume_base: 1000.0,
        volume_quote: 1000.0 * close,
    }
}

pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_candle(i, c))
        .collect()
}

/// 50 steadily rising candles: close = 102 + i.
pub fn sample_candles() -> Vec<Candle> {
    (0..50).map(|i| make_candle(i, 102.0 + i as f64)).collect()
}

/// Oscillating series with a mild upward drift.
pub fn wave_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            make_candle(i, 100.0 + 10.0 * (x / 5.0).sin() + 0.1 * x)
        })
        .collect()
}

/// Rising with growing step size, so MACD keeps climbing above its signal.
pub fn accelerating_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| make_candle(i, 100.0 + 0.05 * (i * i) as f64))
        .collect()
}

pub fn write_candle_csv(dir: &Path, symbol: &str, candles: &[Candle]) {
    let mut file = std::fs::File::create(dir.join(format!("{}.csv", symbol))).unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume_base,volume_quote").unwrap();
    for c in candles {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            c.timestamp, c.open, c.high, c.low, c.close, c.volume_base, c.volume_quote
        )
        .unwrap();
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// `ExitCode` has no `PartialEq`; compare through `Debug`.
pub fn same_exit_code(a: std::process::ExitCode, b: std::process::ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}
