//! Domain error types.

/// Top-level error type for tradekit.
#[derive(Debug, thiserror::Error)]
pub enum TradekitError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no candles for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {indicator}: have {bars} candles, need {minimum}")]
    InsufficientData {
        indicator: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradekitError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TradekitError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TradekitError> for std::process::ExitCode {
    fn from(err: &TradekitError) -> Self {
        let code: u8 = match err {
            TradekitError::Io(_) => 1,
            TradekitError::ConfigParse { .. }
            | TradekitError::ConfigMissing { .. }
            | TradekitError::ConfigInvalid { .. } => 2,
            TradekitError::Data { .. } => 3,
            TradekitError::NoData { .. } | TradekitError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
