mod holding;
mod transaction;

pub use holding::{
    EquityPosition, FixedPosition, InvestmentType, OtherHolding, SYMBOL_NOT_AVAILABLE,
};
pub use transaction::{EquityTransaction, FixedTransaction, TradeType};
