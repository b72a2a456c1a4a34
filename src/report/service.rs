//! Report operations: pull records from the stores, classify them, and run
//! the aggregation pipeline.
//!
//! Every method reads fresh rows from the collaborators, so two invocations
//! over unchanged stores produce identical tables.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::catalog::FundCatalog;
use crate::clock::Clock;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::format;
use crate::models::InvestmentType;
use crate::storage::{PositionStore, TransactionStore};

use super::allocation::{
    format_single_level, format_two_level, single_level_allocation, two_level_allocation,
    AllocationDisplayRow, AllocationRow, ClassifiedHolding, SingleAllocationDisplayRow,
    SingleAllocationRow, TOTAL_LABEL,
};
use super::classify::{classify_etf, classify_major, EtfScope, MajorCategory};
use super::maturity::{
    build_maturity_calendar, format_maturity_calendar, parse_maturity_date, MaturityBucket,
    MaturityDisplayRow,
};

/// Major category label carried by cash-equivalent other-holding rows.
const CASH_EQUIVALENT: &str = "Cash Equivalent";

/// One row of the individual-stock allocation report.
#[derive(Debug, Clone, PartialEq)]
pub struct StockAllocationRow {
    pub symbol: String,
    pub description: String,
    pub dollars: Decimal,
    pub allocation_pct: Option<Decimal>,
}

/// Formatted stock report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAllocationDisplayRow {
    pub symbol: String,
    pub description: String,
    pub dollars: String,
    pub allocation_pct: String,
}

/// All report operations over a set of collaborators.
pub struct ReportService<'a> {
    positions: &'a dyn PositionStore,
    transactions: &'a dyn TransactionStore,
    catalog: &'a FundCatalog,
    clock: &'a dyn Clock,
    config: &'a ResolvedConfig,
}

impl<'a> ReportService<'a> {
    pub fn new(
        positions: &'a dyn PositionStore,
        transactions: &'a dyn TransactionStore,
        catalog: &'a FundCatalog,
        clock: &'a dyn Clock,
        config: &'a ResolvedConfig,
    ) -> Self {
        Self {
            positions,
            transactions,
            catalog,
            clock,
            config,
        }
    }

    /// Two-level allocation by major/minor investment type across equity,
    /// fixed-income, and other holdings.
    pub fn allocation_by_type(&self) -> Result<Vec<AllocationRow>> {
        info!("generating allocation report by investment type");
        let mut holdings = Vec::new();

        for p in self.positions.equity_positions()? {
            let major = classify_major(self.catalog, &p.symbol, &p.investment_type);
            holdings.push(ClassifiedHolding::new(
                major.as_str(),
                p.investment_type.as_str(),
                p.market_value,
            ));
        }

        for p in self.positions.fixed_positions()? {
            holdings.push(ClassifiedHolding::new(
                MajorCategory::FixedIncome.as_str(),
                p.investment_type.as_str(),
                p.total_dollars,
            ));
        }

        for o in self.positions.other_holdings()? {
            holdings.push(ClassifiedHolding::new(
                o.major_category,
                o.minor_category,
                o.dollars,
            ));
        }

        two_level_allocation(&holdings)
    }

    pub fn allocation_by_type_display(&self) -> Result<Vec<AllocationDisplayRow>> {
        Ok(format_two_level(&self.allocation_by_type()?, 0))
    }

    /// Single-level allocation by account (broker).
    ///
    /// Equity dollars are rebuilt from the transaction log (positions carry
    /// no account): net units per (account, symbol), only positive nets
    /// held, valued at the position's unit price. Fixed-income rows come
    /// from the fixed transaction log, excluding already-matured entries.
    pub fn allocation_by_account(&self) -> Result<Vec<SingleAllocationRow>> {
        info!("generating allocation report by account");
        let mut entries: Vec<(String, Decimal)> = Vec::new();

        let unit_prices: HashMap<String, Decimal> = self
            .positions
            .equity_positions()?
            .into_iter()
            .map(|p| (p.symbol.to_uppercase(), p.unit_price))
            .collect();

        for ((account, symbol), net_units) in self.net_equity_units()? {
            match unit_prices.get(&symbol) {
                Some(price) => entries.push((account, net_units * *price)),
                None => {
                    // Held per the transaction log but absent from the
                    // position snapshot; nothing to value it with.
                    debug!(%symbol, %account, "no position row for held symbol, skipping");
                }
            }
        }

        let today = self.clock.today();
        for t in self.transactions.fixed_transactions()? {
            match parse_maturity_date(&t.maturity_date) {
                Some(date) if date < today => {}
                Some(_) => entries.push((t.account, t.dollars)),
                None => {
                    warn!(
                        account = %t.account,
                        maturity_date = %t.maturity_date,
                        "skipping fixed-income transaction with unparseable maturity date"
                    );
                }
            }
        }

        for o in self.positions.other_holdings()? {
            entries.push((o.account, o.dollars));
        }

        Ok(single_level_allocation(entries))
    }

    pub fn allocation_by_account_display(&self) -> Result<Vec<SingleAllocationDisplayRow>> {
        Ok(format_single_level(&self.allocation_by_account()?, 0))
    }

    /// Two-level allocation of equity-class ETFs by asset class/subclass.
    pub fn allocation_equity_etf(&self) -> Result<Vec<AllocationRow>> {
        info!("generating allocation report for equity ETFs");
        let holdings: Vec<ClassifiedHolding> = self
            .positions
            .equity_positions()?
            .into_iter()
            .filter(|p| {
                p.investment_type == InvestmentType::Etf
                    && !self.catalog.is_fixed_income(&p.symbol)
            })
            .map(|p| {
                let class = classify_etf(self.catalog, &p.symbol, EtfScope::Equity);
                ClassifiedHolding::new(class.asset_class, class.subclass, p.market_value)
            })
            .collect();

        two_level_allocation(&holdings)
    }

    pub fn allocation_equity_etf_display(&self) -> Result<Vec<AllocationDisplayRow>> {
        Ok(format_two_level(&self.allocation_equity_etf()?, 0))
    }

    /// Two-level allocation of fixed-income-class ETFs by asset
    /// class/subclass. These trade as equities, so the rows come from the
    /// equity position snapshot.
    pub fn allocation_fixed_etf(&self) -> Result<Vec<AllocationRow>> {
        info!("generating allocation report for fixed-income ETFs");
        let holdings: Vec<ClassifiedHolding> = self
            .positions
            .equity_positions()?
            .into_iter()
            .filter(|p| {
                p.investment_type == InvestmentType::Etf && self.catalog.is_fixed_income(&p.symbol)
            })
            .map(|p| {
                let class = classify_etf(self.catalog, &p.symbol, EtfScope::FixedIncome);
                ClassifiedHolding::new(class.asset_class, class.subclass, p.market_value)
            })
            .collect();

        two_level_allocation(&holdings)
    }

    pub fn allocation_fixed_etf_display(&self) -> Result<Vec<AllocationDisplayRow>> {
        Ok(format_two_level(&self.allocation_fixed_etf()?, 0))
    }

    /// Single-level allocation across individual stocks, with the
    /// configured exclusion list applied.
    pub fn allocation_stock(&self) -> Result<Vec<StockAllocationRow>> {
        info!("generating allocation report for individual stocks");
        let positions: Vec<_> = self
            .positions
            .equity_positions()?
            .into_iter()
            .filter(|p| {
                p.investment_type == InvestmentType::Stock
                    && !self.config.is_excluded_stock(&p.symbol)
            })
            .collect();

        let mut descriptions: HashMap<String, String> = HashMap::new();
        for p in &positions {
            descriptions
                .entry(p.symbol.to_uppercase())
                .or_insert_with(|| p.description.clone());
        }

        let rows = single_level_allocation(
            positions
                .into_iter()
                .map(|p| (p.symbol.to_uppercase(), p.market_value)),
        );

        Ok(rows
            .into_iter()
            .map(|row| {
                let description = if row.key == TOTAL_LABEL {
                    "N/A".to_string()
                } else {
                    descriptions.get(&row.key).cloned().unwrap_or_default()
                };
                StockAllocationRow {
                    symbol: row.key,
                    description,
                    dollars: row.total_dollars,
                    allocation_pct: row.allocation_pct,
                }
            })
            .collect())
    }

    pub fn allocation_stock_display(&self) -> Result<Vec<StockAllocationDisplayRow>> {
        let dp = self.config.display.detail_percent_decimals;
        Ok(self
            .allocation_stock()?
            .into_iter()
            .map(|row| StockAllocationDisplayRow {
                symbol: row.symbol,
                description: row.description,
                dollars: format::dollars(row.dollars),
                allocation_pct: format::percent(row.allocation_pct, dp),
            })
            .collect())
    }

    /// Two-level ETF allocation for one account, rebuilt from the
    /// transaction log, with the account's cash-equivalent holdings
    /// appended as a (Cash Equivalent, Cash) bucket.
    pub fn allocation_etf_for_account(&self, account: &str) -> Result<Vec<AllocationRow>> {
        info!(%account, "generating per-account ETF allocation report");
        let positions: HashMap<String, (InvestmentType, Decimal)> = self
            .positions
            .equity_positions()?
            .into_iter()
            .map(|p| (p.symbol.to_uppercase(), (p.investment_type, p.unit_price)))
            .collect();

        let mut holdings = Vec::new();
        for ((txn_account, symbol), net_units) in self.net_equity_units()? {
            if txn_account != account {
                continue;
            }
            let Some((investment_type, unit_price)) = positions.get(&symbol) else {
                debug!(%symbol, %account, "no position row for held symbol, skipping");
                continue;
            };
            if *investment_type != InvestmentType::Etf {
                continue;
            }
            let class = classify_etf(self.catalog, &symbol, EtfScope::Any);
            holdings.push(ClassifiedHolding::new(
                class.asset_class,
                class.subclass,
                net_units * *unit_price,
            ));
        }

        let cash: Decimal = self
            .positions
            .other_holdings()?
            .into_iter()
            .filter(|o| o.account == account && o.major_category == CASH_EQUIVALENT)
            .map(|o| o.dollars)
            .sum();
        if !cash.is_zero() {
            holdings.push(ClassifiedHolding::new(CASH_EQUIVALENT, "Cash", cash));
        }

        two_level_allocation(&holdings)
    }

    pub fn allocation_etf_for_account_display(
        &self,
        account: &str,
    ) -> Result<Vec<AllocationDisplayRow>> {
        let dp = self.config.display.detail_percent_decimals;
        Ok(format_two_level(
            &self.allocation_etf_for_account(account)?,
            dp,
        ))
    }

    /// Forward-looking maturity calendar for fixed-income holdings.
    pub fn maturity_calendar(&self) -> Result<Vec<MaturityBucket>> {
        info!("generating maturity calendar");
        let positions = self.positions.fixed_positions()?;
        Ok(build_maturity_calendar(
            &positions,
            self.clock.current_month(),
        ))
    }

    pub fn maturity_calendar_display(&self) -> Result<Vec<MaturityDisplayRow>> {
        Ok(format_maturity_calendar(&self.maturity_calendar()?))
    }

    /// Net held units per (account, symbol) from the equity transaction
    /// log. Only pairs with a positive net are held; symbols are
    /// upper-cased for joining against position rows.
    fn net_equity_units(&self) -> Result<BTreeMap<(String, String), Decimal>> {
        let mut net: BTreeMap<(String, String), Decimal> = BTreeMap::new();
        for t in self.transactions.equity_transactions()? {
            *net.entry((t.account.clone(), t.symbol.to_uppercase()))
                .or_default() += t.signed_units();
        }
        net.retain(|_, units| *units > Decimal::ZERO);
        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{
        EquityPosition, EquityTransaction, FixedPosition, FixedTransaction, OtherHolding,
        TradeType,
    };
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2021, 11, 28, 12, 0, 0).unwrap())
    }

    fn equity(symbol: &str, tag: &str, price: Decimal, value: Decimal) -> EquityPosition {
        EquityPosition {
            symbol: symbol.to_string(),
            description: format!("{symbol} description"),
            investment_type: InvestmentType::parse(tag),
            unit_price: price,
            market_value: value,
        }
    }

    fn txn(symbol: &str, trade: TradeType, units: Decimal, account: &str) -> EquityTransaction {
        EquityTransaction {
            symbol: symbol.to_string(),
            trade_type: trade,
            units,
            dollars: Decimal::ZERO,
            account: account.to_string(),
        }
    }

    fn service_fixture() -> (FundCatalog, ResolvedConfig, FixedClock) {
        (FundCatalog::builtin(), ResolvedConfig::default(), clock())
    }

    #[test]
    fn type_report_splits_equity_and_fixed_income() {
        // AAPL $1,000 stock, VOO $3,000 equity ETF, VGSH $1,000 ETF that the
        // catalog reclassifies as fixed income.
        let store = MemoryStore::new().with_equity_positions(vec![
            equity("AAPL", "STOCK", dec!(150), dec!(1000)),
            equity("VOO", "ETF", dec!(400), dec!(3000)),
            equity("VGSH", "ETF", dec!(60), dec!(1000)),
        ]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_by_type().unwrap();
        let equity_row = rows
            .iter()
            .find(|r| r.major_category == "EQUITY" && r.minor_category == "ETF")
            .unwrap();
        assert_eq!(equity_row.major_total_dollars, dec!(4000));
        assert_eq!(equity_row.major_allocation_pct, Some(dec!(80)));
        assert_eq!(equity_row.minor_total_dollars, Some(dec!(3000)));

        let fixed_row = rows
            .iter()
            .find(|r| r.major_category == "FIXED_INCOME")
            .unwrap();
        assert_eq!(fixed_row.major_total_dollars, dec!(1000));
        assert_eq!(fixed_row.major_allocation_pct, Some(dec!(20)));
        assert_eq!(fixed_row.minor_category, "ETF");
    }

    #[test]
    fn type_report_folds_in_fixed_positions_and_other_holdings() {
        let store = MemoryStore::new()
            .with_fixed_positions(vec![FixedPosition {
                name: "12mo CD".to_string(),
                symbol: "n/a".to_string(),
                investment_type: InvestmentType::FixedIncome,
                total_dollars: dec!(5000),
                maturity_date: "2022-05-01".to_string(),
                return_rate: dec!(0.02),
            }])
            .with_other_holdings(vec![OtherHolding {
                description: "settlement fund".to_string(),
                major_category: "Cash Equivalent".to_string(),
                minor_category: "Cash".to_string(),
                dollars: dec!(5000),
                account: "Broker A".to_string(),
            }]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_by_type().unwrap();
        let majors: Vec<&str> = rows.iter().map(|r| r.major_category.as_str()).collect();
        assert!(majors.contains(&"FIXED_INCOME"));
        assert!(majors.contains(&"Cash Equivalent"));
        assert_eq!(rows.last().unwrap().major_total_dollars, dec!(10000));
    }

    #[test]
    fn account_report_nets_transactions_and_drops_matured_cds() {
        let store = MemoryStore::new()
            .with_equity_positions(vec![equity("VOO", "ETF", dec!(100), dec!(1000))])
            .with_equity_transactions(vec![
                txn("VOO", TradeType::Buy, dec!(10), "Broker A"),
                txn("VOO", TradeType::Sell, dec!(4), "Broker A"),
                txn("VOO", TradeType::Buy, dec!(2), "Broker B"),
                // Fully sold out: must not appear.
                txn("AAPL", TradeType::Buy, dec!(5), "Broker B"),
                txn("AAPL", TradeType::Sell, dec!(5), "Broker B"),
            ])
            .with_fixed_transactions(vec![
                FixedTransaction {
                    dollars: dec!(400),
                    maturity_date: "2022-06-01".to_string(),
                    account: "Broker C".to_string(),
                },
                FixedTransaction {
                    dollars: dec!(9999),
                    maturity_date: "2020-01-01".to_string(),
                    account: "Broker C".to_string(),
                },
                FixedTransaction {
                    dollars: dec!(9999),
                    maturity_date: "when it matures".to_string(),
                    account: "Broker C".to_string(),
                },
            ]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_by_account().unwrap();
        let get = |key: &str| rows.iter().find(|r| r.key == key).unwrap();
        assert_eq!(get("Broker A").total_dollars, dec!(600));
        assert_eq!(get("Broker B").total_dollars, dec!(200));
        assert_eq!(get("Broker C").total_dollars, dec!(400));
        assert_eq!(get(TOTAL_LABEL).total_dollars, dec!(1200));
        assert_eq!(get("Broker A").allocation_pct, Some(dec!(50)));
    }

    #[test]
    fn equity_and_fixed_etf_reports_split_on_catalog_membership() {
        let store = MemoryStore::new().with_equity_positions(vec![
            equity("VOO", "ETF", dec!(400), dec!(6000)),
            equity("VGSH", "ETF", dec!(60), dec!(3000)),
            equity("AAPL", "STOCK", dec!(150), dec!(1000)),
        ]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let equity_rows = service.allocation_equity_etf().unwrap();
        assert_eq!(equity_rows.len(), 2); // VOO bucket + TOTAL
        assert_eq!(equity_rows[0].major_category, "Large-Cap");
        assert_eq!(equity_rows[0].major_allocation_pct, Some(dec!(100)));
        assert_eq!(equity_rows.last().unwrap().major_total_dollars, dec!(6000));

        let fixed_rows = service.allocation_fixed_etf().unwrap();
        assert_eq!(fixed_rows.len(), 2);
        assert_eq!(fixed_rows[0].major_category, "Short-Term Fixed Income");
        assert_eq!(fixed_rows.last().unwrap().major_total_dollars, dec!(3000));
    }

    #[test]
    fn uncataloged_equity_etf_lands_in_others() {
        let store = MemoryStore::new()
            .with_equity_positions(vec![equity("ARKK", "ETF", dec!(50), dec!(500))]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_equity_etf().unwrap();
        assert_eq!(rows[0].major_category, "Others");
        assert_eq!(rows[0].minor_category, "Others");
    }

    #[test]
    fn stock_report_excludes_configured_symbols_and_describes_total_as_na() {
        let store = MemoryStore::new().with_equity_positions(vec![
            equity("AAPL", "STOCK", dec!(150), dec!(3000)),
            equity("MSFT", "STOCK", dec!(300), dec!(1000)),
            equity("GPRO", "STOCK", dec!(8), dec!(50)),
            equity("VOO", "ETF", dec!(400), dec!(9999)),
        ]);
        let catalog = FundCatalog::builtin();
        let config = ResolvedConfig {
            excluded_stock_symbols: vec!["GPRO".to_string()],
            ..ResolvedConfig::default()
        };
        let clock = clock();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_stock().unwrap();
        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", TOTAL_LABEL]);
        assert_eq!(rows[0].allocation_pct, Some(dec!(75)));
        let total = rows.last().unwrap();
        assert_eq!(total.description, "N/A");
        assert_eq!(total.dollars, dec!(4000));
    }

    #[test]
    fn per_account_etf_report_appends_cash_bucket() {
        let store = MemoryStore::new()
            .with_equity_positions(vec![
                equity("VOO", "ETF", dec!(100), dec!(0)),
                equity("VGSH", "ETF", dec!(50), dec!(0)),
                equity("AAPL", "STOCK", dec!(150), dec!(0)),
            ])
            .with_equity_transactions(vec![
                txn("VOO", TradeType::Buy, dec!(30), "Broker A"),
                txn("VGSH", TradeType::Buy, dec!(20), "Broker A"),
                // Stocks and other accounts stay out of the report.
                txn("AAPL", TradeType::Buy, dec!(10), "Broker A"),
                txn("VOO", TradeType::Buy, dec!(99), "Broker B"),
            ])
            .with_other_holdings(vec![
                OtherHolding {
                    description: "settlement fund".to_string(),
                    major_category: "Cash Equivalent".to_string(),
                    minor_category: "Cash".to_string(),
                    dollars: dec!(1000),
                    account: "Broker A".to_string(),
                },
                OtherHolding {
                    description: "elsewhere".to_string(),
                    major_category: "Cash Equivalent".to_string(),
                    minor_category: "Cash".to_string(),
                    dollars: dec!(7777),
                    account: "Broker B".to_string(),
                },
            ]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_etf_for_account("Broker A").unwrap();
        let get = |major: &str| rows.iter().find(|r| r.major_category == major).unwrap();
        // 30 × $100 VOO, 20 × $50 VGSH, $1,000 cash: $5,000 total.
        assert_eq!(get("Large-Cap").major_total_dollars, dec!(3000));
        assert_eq!(
            get("Short-Term Fixed Income").major_total_dollars,
            dec!(1000)
        );
        assert_eq!(get("Cash Equivalent").major_total_dollars, dec!(1000));
        assert_eq!(get("Cash Equivalent").minor_category, "Cash");
        assert_eq!(rows.last().unwrap().major_total_dollars, dec!(5000));
        assert_eq!(get("Large-Cap").major_allocation_pct, Some(dec!(60)));
    }

    #[test]
    fn maturity_calendar_uses_the_clock_cutoff() {
        let store = MemoryStore::new().with_fixed_positions(vec![
            FixedPosition {
                name: "old".to_string(),
                symbol: "n/a".to_string(),
                investment_type: InvestmentType::FixedIncome,
                total_dollars: dec!(1000),
                maturity_date: "2021-06-01".to_string(),
                return_rate: dec!(0.01),
            },
            FixedPosition {
                name: "upcoming".to_string(),
                symbol: "912797GL4".to_string(),
                investment_type: InvestmentType::FixedIncome,
                total_dollars: dec!(2000),
                maturity_date: "2022-02-15".to_string(),
                return_rate: dec!(0.02),
            },
        ]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let calendar = service.maturity_calendar().unwrap();
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].period.to_string(), "2022-02");
        assert_eq!(calendar[0].symbols, "912797GL4");
    }

    #[test]
    fn display_variants_format_with_the_configured_precision() {
        let store = MemoryStore::new().with_equity_positions(vec![
            equity("AAPL", "STOCK", dec!(150), dec!(3000)),
            equity("MSFT", "STOCK", dec!(300), dec!(1000)),
        ]);
        let (catalog, config, clock) = service_fixture();
        let service = ReportService::new(&store, &store, &catalog, &clock, &config);

        let rows = service.allocation_stock_display().unwrap();
        assert_eq!(rows[0].allocation_pct, "75.00%");
        assert_eq!(rows[0].dollars, "$3,000");

        let type_rows = service.allocation_by_type_display().unwrap();
        assert_eq!(type_rows[0].major_allocation_pct, "100%");
    }
}
