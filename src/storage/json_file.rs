use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::ReportError;
use crate::models::{
    EquityPosition, EquityTransaction, FixedPosition, FixedTransaction, OtherHolding,
};

use super::{PositionStore, TransactionStore};

/// JSON file-based record store.
///
/// Directory structure:
/// ```text
/// data/
///   equity/
///     positions.jsonl
///     transactions.jsonl
///   fixed_income/
///     positions.jsonl
///     transactions.jsonl
///   other_holdings.json
/// ```
///
/// Records are read fresh on every call; nothing derived is ever written
/// back.
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn equity_positions_file(&self) -> PathBuf {
        self.base_path.join("equity").join("positions.jsonl")
    }

    fn equity_transactions_file(&self) -> PathBuf {
        self.base_path.join("equity").join("transactions.jsonl")
    }

    fn fixed_positions_file(&self) -> PathBuf {
        self.base_path.join("fixed_income").join("positions.jsonl")
    }

    fn fixed_transactions_file(&self) -> PathBuf {
        self.base_path.join("fixed_income").join("transactions.jsonl")
    }

    fn other_holdings_file(&self) -> PathBuf {
        self.base_path.join("other_holdings.json")
    }

    fn read_jsonl<T: for<'de> serde::Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let mut items = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let item: T = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse JSONL line: {line}"))?;
            items.push(item);
        }
        Ok(items)
    }

    fn read_json_array<T: for<'de> serde::Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON from {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn append_jsonl<T: serde::Serialize>(path: &Path, items: &[T]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create directory")?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for append", path.display()))?;
        for item in items {
            let line = serde_json::to_string(item).context("Failed to serialize item")?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create directory")?;
        }
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    // Maintenance helpers for keeping the raw record files up to date. The
    // reporting pipeline itself never writes.

    pub fn append_equity_positions(&self, rows: &[EquityPosition]) -> Result<()> {
        Self::append_jsonl(&self.equity_positions_file(), rows)
    }

    pub fn append_equity_transactions(&self, rows: &[EquityTransaction]) -> Result<()> {
        Self::append_jsonl(&self.equity_transactions_file(), rows)
    }

    pub fn append_fixed_positions(&self, rows: &[FixedPosition]) -> Result<()> {
        Self::append_jsonl(&self.fixed_positions_file(), rows)
    }

    pub fn append_fixed_transactions(&self, rows: &[FixedTransaction]) -> Result<()> {
        Self::append_jsonl(&self.fixed_transactions_file(), rows)
    }

    pub fn write_other_holdings(&self, rows: &[OtherHolding]) -> Result<()> {
        Self::write_json(&self.other_holdings_file(), &rows)
    }
}

impl PositionStore for JsonFileStore {
    fn equity_positions(&self) -> Result<Vec<EquityPosition>, ReportError> {
        Self::read_jsonl(&self.equity_positions_file())
            .map_err(|e| ReportError::store("equity positions", e))
    }

    fn fixed_positions(&self) -> Result<Vec<FixedPosition>, ReportError> {
        Self::read_jsonl(&self.fixed_positions_file())
            .map_err(|e| ReportError::store("fixed-income positions", e))
    }

    fn other_holdings(&self) -> Result<Vec<OtherHolding>, ReportError> {
        Self::read_json_array(&self.other_holdings_file())
            .map_err(|e| ReportError::store("other holdings", e))
    }
}

impl TransactionStore for JsonFileStore {
    fn equity_transactions(&self) -> Result<Vec<EquityTransaction>, ReportError> {
        Self::read_jsonl(&self.equity_transactions_file())
            .map_err(|e| ReportError::store("equity transactions", e))
    }

    fn fixed_transactions(&self) -> Result<Vec<FixedTransaction>, ReportError> {
        Self::read_jsonl(&self.fixed_transactions_file())
            .map_err(|e| ReportError::store("fixed-income transactions", e))
    }
}
