//! INI file configuration adapter.

use crate::domain::error::TradekitError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradekitError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradekitError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        tracing::debug!(file = %path.display(), "loaded config");
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TradekitError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradekitError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[risk]
account_balance = 10000.0
max_risk_per_trade = 0.02

[strategy]
name = rsi-macd
timeframe = 1h
rsi_period = 14

[data]
base_path = /var/lib/candles

[logging]
level = debug
verbose = yes
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_reads_all_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("risk", "account_balance", 0.0), 10000.0);
        assert_eq!(adapter.get_string("strategy", "name"), Some("rsi-macd".to_string()));
        assert_eq!(adapter.get_int("strategy", "rsi_period", 0), 14);
        assert_eq!(
            adapter.get_string("data", "base_path"),
            Some("/var/lib/candles".to_string())
        );
        assert!(adapter.get_bool("logging", "verbose", false));
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("risk", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert_eq!(adapter.get_int("strategy", "missing", 42), 42);
        assert_eq!(adapter.get_double("risk", "missing", 99.9), 99.9);
        assert!(adapter.get_bool("logging", "missing", true));
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let adapter =
            FileConfigAdapter::from_string("[risk]\naccount_balance = lots\nperiod = x\n")
                .unwrap();
        assert_eq!(adapter.get_double("risk", "account_balance", 1.5), 1.5);
        assert_eq!(adapter.get_int("risk", "period", 7), 7);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[flags]\na = true\nb = YES\nc = 1\nd = off\ne = no\nf = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("flags", "a", false));
        assert!(adapter.get_bool("flags", "b", false));
        assert!(adapter.get_bool("flags", "c", false));
        assert!(!adapter.get_bool("flags", "d", true));
        assert!(!adapter.get_bool("flags", "e", true));
        assert!(adapter.get_bool("flags", "f", true));
    }

    #[test]
    fn has_value_ignores_blank_entries() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nname = rsi-macd\ntimeframe =\n").unwrap();
        assert!(adapter.has_value("strategy", "name"));
        assert!(!adapter.has_value("strategy", "timeframe"));
        assert!(!adapter.has_value("strategy", "missing"));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("logging", "level"), Some("debug".to_string()));
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/tradekit.ini").unwrap_err();
        match err {
            TradekitError::ConfigParse { file, .. } => assert!(file.contains("tradekit.ini")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
