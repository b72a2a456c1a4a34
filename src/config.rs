use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Display/output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places for percentages in the stock and per-account ETF
    /// reports. The coarse type/account/ETF reports always use 0.
    pub detail_percent_decimals: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            detail_percent_decimals: 2,
        }
    }
}

/// Top-level configuration, loaded from `folioview.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedConfig {
    /// Directory holding the position/transaction record files.
    pub data_dir: PathBuf,

    /// Symbols excluded from the individual-stock allocation report.
    ///
    /// Replaces an ad hoc hard-coded filter in the predecessor tool; empty
    /// by default.
    pub excluded_stock_symbols: Vec<String>,

    pub display: DisplayConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            excluded_stock_symbols: Vec::new(),
            display: DisplayConfig::default(),
        }
    }
}

impl ResolvedConfig {
    /// Load config from a TOML file, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config file {}", path.display()))
            }
        }
    }

    /// Case-insensitive membership test against the exclusion list.
    pub fn is_excluded_stock(&self, symbol: &str) -> bool {
        self.excluded_stock_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }
}
