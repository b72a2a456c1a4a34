use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Buy/sell marker on a transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TradeType {
    Buy,
    Sell,
    Other(String),
}

impl TradeType {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "BUY" => Self::Buy,
            "SELL" => Self::Sell,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TradeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TradeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// One equity buy/sell event.
///
/// `units` is always recorded positive at the source; consumers must use
/// [`EquityTransaction::signed_units`] when netting positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityTransaction {
    pub symbol: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub units: Decimal,
    pub dollars: Decimal,
    pub account: String,
}

impl EquityTransaction {
    /// Units with the sign implied by the trade type: SELL rows count
    /// against the position, everything else counts toward it.
    pub fn signed_units(&self) -> Decimal {
        match self.trade_type {
            TradeType::Sell => -self.units,
            _ => self.units,
        }
    }
}

/// One fixed-income purchase event. Carries the account, which the
/// fixed-income position view does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedTransaction {
    pub dollars: Decimal,
    /// Maturity date as recorded (`YYYY-MM-DD`); parsed leniently downstream.
    pub maturity_date: String,
    pub account: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn signed_units_negates_sells() {
        let buy = EquityTransaction {
            symbol: "AAPL".to_string(),
            trade_type: TradeType::Buy,
            units: dec!(10),
            dollars: dec!(1500),
            account: "Broker A".to_string(),
        };
        assert_eq!(buy.signed_units(), dec!(10));

        let sell = EquityTransaction {
            trade_type: TradeType::Sell,
            units: dec!(4),
            ..buy.clone()
        };
        assert_eq!(sell.signed_units(), dec!(-4));

        let transfer = EquityTransaction {
            trade_type: TradeType::parse("transfer"),
            ..buy
        };
        assert_eq!(transfer.signed_units(), dec!(10));
    }

    #[test]
    fn trade_type_parses_case_insensitively() {
        assert_eq!(TradeType::parse("buy"), TradeType::Buy);
        assert_eq!(TradeType::parse("SELL"), TradeType::Sell);
        assert_eq!(
            TradeType::parse("Dividend"),
            TradeType::Other("DIVIDEND".to_string())
        );
    }
}
