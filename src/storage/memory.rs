use crate::error::Result;
use crate::models::{
    EquityPosition, EquityTransaction, FixedPosition, FixedTransaction, OtherHolding,
};

use super::{PositionStore, TransactionStore};

/// In-memory store, used by tests and as a building block for callers that
/// materialize records themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub equity_positions: Vec<EquityPosition>,
    pub equity_transactions: Vec<EquityTransaction>,
    pub fixed_positions: Vec<FixedPosition>,
    pub fixed_transactions: Vec<FixedTransaction>,
    pub other_holdings: Vec<OtherHolding>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equity_positions(mut self, rows: Vec<EquityPosition>) -> Self {
        self.equity_positions = rows;
        self
    }

    pub fn with_equity_transactions(mut self, rows: Vec<EquityTransaction>) -> Self {
        self.equity_transactions = rows;
        self
    }

    pub fn with_fixed_positions(mut self, rows: Vec<FixedPosition>) -> Self {
        self.fixed_positions = rows;
        self
    }

    pub fn with_fixed_transactions(mut self, rows: Vec<FixedTransaction>) -> Self {
        self.fixed_transactions = rows;
        self
    }

    pub fn with_other_holdings(mut self, rows: Vec<OtherHolding>) -> Self {
        self.other_holdings = rows;
        self
    }
}

impl PositionStore for MemoryStore {
    fn equity_positions(&self) -> Result<Vec<EquityPosition>> {
        Ok(self.equity_positions.clone())
    }

    fn fixed_positions(&self) -> Result<Vec<FixedPosition>> {
        Ok(self.fixed_positions.clone())
    }

    fn other_holdings(&self) -> Result<Vec<OtherHolding>> {
        Ok(self.other_holdings.clone())
    }
}

impl TransactionStore for MemoryStore {
    fn equity_transactions(&self) -> Result<Vec<EquityTransaction>> {
        Ok(self.equity_transactions.clone())
    }

    fn fixed_transactions(&self) -> Result<Vec<FixedTransaction>> {
        Ok(self.fixed_transactions.clone())
    }
}
