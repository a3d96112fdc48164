//! CSV candle file adapter.
//!
//! One file per symbol at `<base_path>/<SYMBOL>.csv` with the header
//! `timestamp,open,high,low,close,volume_base,volume_quote`. Timestamps are
//! milliseconds since the Unix epoch.

use crate::domain::candle::Candle;
use crate::domain::error::TradekitError;
use crate::ports::data_port::CandleSource;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

const COLUMNS: [&str; 7] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume_base",
    "volume_quote",
];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(reason: String) -> TradekitError {
    TradekitError::Data { reason }
}

fn column<T: std::str::FromStr>(
    record: &StringRecord,
    index: usize,
    line: u64,
) -> Result<T, TradekitError>
where
    T::Err: std::fmt::Display,
{
    let name = COLUMNS[index];
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(format!("line {}: missing {} column", line, name)))?;
    raw.trim().parse().map_err(|e| {
        data_error(format!(
            "line {}: invalid {} value {:?}: {}",
            line, name, raw, e
        ))
    })
}

fn parse_candle(record: &StringRecord, line: u64) -> Result<Candle, TradekitError> {
    Ok(Candle {
        timestamp: column(record, 0, line)?,
        open: column(record, 1, line)?,
        high: column(record, 2, line)?,
        low: column(record, 3, line)?,
        close: column(record, 4, line)?,
        volume_base: column(record, 5, line)?,
        volume_quote: column(record, 6, line)?,
    })
}

impl CandleSource for CsvAdapter {
    fn fetch_candles(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, TradekitError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let line = record.position().map_or(0, |p| p.line());
            let candle = parse_candle(&record, line)?;

            if candle.timestamp < start_ms || candle.timestamp > end_ms {
                continue;
            }
            candles.push(candle);
        }

        candles.sort_by_key(|c| c.timestamp);
        tracing::debug!(symbol, count = candles.len(), "loaded candles");
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "timestamp,open,high,low,close,volume_base,volume_quote\n";

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // Deliberately out of order.
        let btc = format!(
            "{}{}{}{}",
            HEADER,
            "3000,110.0,120.0,105.0,115.0,5.5,632.5\n",
            "1000,100.0,110.0,90.0,105.0,5.0,525.0\n",
            "2000,105.0,115.0,100.0,110.0,6.0,660.0\n",
        );
        fs::write(path.join("BTCUSDT.csv"), btc).unwrap();
        fs::write(path.join("ETHUSDT.csv"), HEADER).unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_candles_sorted_ascending() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let candles = adapter.fetch_candles("BTCUSDT", 0, i64::MAX).unwrap();

        assert_eq!(candles.len(), 3);
        let stamps: Vec<i64> = candles.iter().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![1000, 2000, 3000]);
        assert_eq!(candles[0].open, 100.0);
        assert_eq!(candles[0].high, 110.0);
        assert_eq!(candles[0].low, 90.0);
        assert_eq!(candles[0].close, 105.0);
        assert_eq!(candles[0].volume_base, 5.0);
        assert_eq!(candles[0].volume_quote, 525.0);
    }

    #[test]
    fn fetch_candles_range_is_inclusive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let candles = adapter.fetch_candles("BTCUSDT", 2000, 3000).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp, 2000);

        let candles = adapter.fetch_candles("BTCUSDT", 1001, 1999).unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn fetch_candles_header_only_is_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(adapter.fetch_candles("ETHUSDT", 0, i64::MAX).unwrap().is_empty());
    }

    #[test]
    fn fetch_candles_missing_file_is_data_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_candles("XYZ", 0, i64::MAX).unwrap_err();
        assert!(matches!(err, TradekitError::Data { .. }));
    }

    #[test]
    fn fetch_candles_bad_value_names_column() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            format!("{}1000,100.0,abc,90.0,105.0,5.0,525.0\n", HEADER),
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_candles("BAD", 0, i64::MAX).unwrap_err();
        match err {
            TradekitError::Data { reason } => assert!(reason.contains("high"), "{}", reason),
            other => panic!("unexpected error: {}", other),
        }
    }
}
