//! Candle history port.

use crate::domain::candle::Candle;
use crate::domain::error::TradekitError;

pub trait CandleSource {
    /// Candles for `symbol` with `start_ms <= timestamp <= end_ms`, oldest
    /// first.
    fn fetch_candles(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, TradekitError>;
}
