mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{EquityPosition, EquityTransaction, FixedPosition, FixedTransaction, OtherHolding};

/// Read access to current positions.
///
/// Stores make no ordering guarantee; the aggregator must not depend on row
/// order for correctness.
pub trait PositionStore: Send + Sync {
    fn equity_positions(&self) -> Result<Vec<EquityPosition>>;
    fn fixed_positions(&self) -> Result<Vec<FixedPosition>>;
    fn other_holdings(&self) -> Result<Vec<OtherHolding>>;
}

/// Read access to the historical transaction log.
pub trait TransactionStore: Send + Sync {
    fn equity_transactions(&self) -> Result<Vec<EquityTransaction>>;
    fn fixed_transactions(&self) -> Result<Vec<FixedTransaction>>;
}
