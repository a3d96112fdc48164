//! Candle (OHLC bar) representation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Bar open time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume_base: f64,
    pub volume_quote: f64,
}

/// Numeric field of a candle read by price-based indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl Candle {
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// Closing prices of `candles`, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Open => write!(f, "open"),
            PriceField::High => write!(f, "high"),
            PriceField::Low => write!(f, "low"),
            PriceField::Close => write!(f, "close"),
        }
    }
}
