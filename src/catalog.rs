//! Static reference catalog mapping ETF tickers to their classification.
//!
//! The catalog is constructed once at startup and passed by reference into
//! the classifier; nothing mutates it afterwards, so it is safe to share
//! across threads should a caller ever parallelize report generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One catalog row: a known fund ticker and how it is classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub symbol: String,
    pub display_name: String,
    pub asset_class: String,
    pub subclass: String,
}

impl ClassificationEntry {
    fn new(symbol: &str, display_name: &str, asset_class: &str, subclass: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
            asset_class: asset_class.to_string(),
            subclass: subclass.to_string(),
        }
    }
}

/// Lookup tables for equity-class and fixed-income-class ETFs.
///
/// Keys are canonicalized to upper-case once at construction; all lookups
/// are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct FundCatalog {
    equity: HashMap<String, ClassificationEntry>,
    fixed_income: HashMap<String, ClassificationEntry>,
}

impl FundCatalog {
    pub fn new(
        equity: impl IntoIterator<Item = ClassificationEntry>,
        fixed_income: impl IntoIterator<Item = ClassificationEntry>,
    ) -> Self {
        fn index(
            entries: impl IntoIterator<Item = ClassificationEntry>,
        ) -> HashMap<String, ClassificationEntry> {
            entries
                .into_iter()
                .map(|e| (e.symbol.to_uppercase(), e))
                .collect()
        }

        Self {
            equity: index(equity),
            fixed_income: index(fixed_income),
        }
    }

    /// Look up an equity-class ETF. `None` means "not in the catalog"; the
    /// caller decides whether that degrades to an `Others` bucket.
    pub fn equity(&self, symbol: &str) -> Option<&ClassificationEntry> {
        self.equity.get(&symbol.to_uppercase())
    }

    /// Look up a fixed-income-class ETF.
    pub fn fixed_income(&self, symbol: &str) -> Option<&ClassificationEntry> {
        self.fixed_income.get(&symbol.to_uppercase())
    }

    /// Fixed-income membership drives the major-category override.
    pub fn is_fixed_income(&self, symbol: &str) -> bool {
        self.fixed_income.contains_key(&symbol.to_uppercase())
    }

    /// Combined lookup: equity table first, then fixed income.
    pub fn any(&self, symbol: &str) -> Option<&ClassificationEntry> {
        self.equity(symbol).or_else(|| self.fixed_income(symbol))
    }

    /// The built-in Vanguard tables.
    pub fn builtin() -> Self {
        let fixed_income = vec![
            ClassificationEntry::new(
                "VGSH",
                "Vanguard Short-Term Treasury Index Fund",
                "Short-Term Fixed Income",
                "Treasury",
            ),
            ClassificationEntry::new(
                "VGIT",
                "Vanguard Intermediate-Term Treasury Index Fund",
                "Intermediate-Term Fixed Income",
                "Treasury",
            ),
            ClassificationEntry::new(
                "VGLT",
                "Vanguard Long-Term Treasury Index Fund",
                "Long-Term Fixed Income",
                "Treasury",
            ),
            ClassificationEntry::new(
                "VCSH",
                "Vanguard Short-Term Corporate Bond Index Fund",
                "Short-Term Fixed Income",
                "Corporate",
            ),
            ClassificationEntry::new(
                "VCIT",
                "Vanguard Intermediate-Term Corporate Bond Index Fund",
                "Intermediate-Term Fixed Income",
                "Corporate",
            ),
            ClassificationEntry::new(
                "VCLT",
                "Vanguard Long-Term Corporate Bond Index Fund",
                "Long-Term Fixed Income",
                "Corporate",
            ),
            ClassificationEntry::new(
                "BSV",
                "Vanguard Short-Term Bond Index Fund",
                "Short-Term Fixed Income",
                "Blend",
            ),
            ClassificationEntry::new(
                "BIV",
                "Vanguard Intermediate-Term Bond Index Fund",
                "Intermediate-Term Fixed Income",
                "Blend",
            ),
            ClassificationEntry::new(
                "BLV",
                "Vanguard Long-Term Bond Index Fund",
                "Long-Term Fixed Income",
                "Blend",
            ),
            ClassificationEntry::new(
                "VTIP",
                "Vanguard Short-Term Inflation Protected Securities",
                "Short-Term Fixed Income",
                "Inflation-protected",
            ),
        ];

        let equity = vec![
            ClassificationEntry::new("VOO", "Vanguard S&P 500 Index Fund", "Large-Cap", "Blend"),
            ClassificationEntry::new(
                "VIG",
                "Vanguard Dividend Appreciation Index Fund",
                "Large-Cap",
                "Div Appreciate",
            ),
            ClassificationEntry::new("VTV", "Vanguard Value Index Fund", "Large-Cap", "Value"),
            ClassificationEntry::new("VUG", "Vanguard Growth Index Fund", "Large-Cap", "Growth"),
            ClassificationEntry::new("VO", "Vanguard Mid-Cap Index Fund", "Mid-Cap", "Blend"),
            ClassificationEntry::new(
                "VOE",
                "Vanguard Mid-Cap Value Index Fund",
                "Mid-Cap",
                "Value",
            ),
            ClassificationEntry::new(
                "VOT",
                "Vanguard Mid-Cap Growth Index Fund",
                "Mid-Cap",
                "Growth",
            ),
            ClassificationEntry::new("VB", "Vanguard Small-Cap Index Fund", "Small-Cap", "Blend"),
            ClassificationEntry::new(
                "VBR",
                "Vanguard Small-Cap Value Index Fund",
                "Small-Cap",
                "Value",
            ),
            ClassificationEntry::new(
                "VBK",
                "Vanguard Small-Cap Growth Index Fund",
                "Small-Cap",
                "Growth",
            ),
            ClassificationEntry::new(
                "VGT",
                "Vanguard Information Technology Index Fund",
                "Sector-Specific Equity",
                "Information Technology",
            ),
            ClassificationEntry::new(
                "VHT",
                "Vanguard Health Care Index Fund",
                "Sector-Specific Equity",
                "Health Care",
            ),
            ClassificationEntry::new(
                "VDC",
                "Vanguard Consumer Staples Index Fund",
                "Sector-Specific Equity",
                "Consumer Staples",
            ),
            ClassificationEntry::new(
                "VCR",
                "Vanguard Consumer Discretionary Index Fund",
                "Sector-Specific Equity",
                "Consumer Discretionary",
            ),
            ClassificationEntry::new(
                "VNQ",
                "Vanguard Real Estate Index Fund",
                "Alternative",
                "REITs",
            ),
            ClassificationEntry::new(
                "VPU",
                "Vanguard Utility Index Fund",
                "Sector-Specific Equity",
                "Utility",
            ),
            ClassificationEntry::new(
                "VIS",
                "Vanguard Industrial Index Fund",
                "Sector-Specific Equity",
                "Industrial",
            ),
            ClassificationEntry::new(
                "VIGI",
                "Vanguard International Dividend Appreciate ETF",
                "Foreign Equity",
                "Large Blend",
            ),
            ClassificationEntry::new(
                "VEA",
                "Vanguard FTSE Developed Markets ETF",
                "Foreign Equity",
                "Developed Markets",
            ),
            ClassificationEntry::new(
                "VWO",
                "Vanguard FTSE Emerging Markets ETF",
                "Foreign Equity",
                "Emerging Markets",
            ),
        ];

        Self::new(equity, fixed_income)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let catalog = FundCatalog::builtin();
        assert_eq!(
            catalog.equity("voo").map(|e| e.asset_class.as_str()),
            Some("Large-Cap")
        );
        assert_eq!(
            catalog.fixed_income("vgsh").map(|e| e.subclass.as_str()),
            Some("Treasury")
        );
    }

    #[test]
    fn fixed_income_membership() {
        let catalog = FundCatalog::builtin();
        assert!(catalog.is_fixed_income("VGSH"));
        assert!(!catalog.is_fixed_income("VOO"));
        assert!(!catalog.is_fixed_income("AAPL"));
    }

    #[test]
    fn any_prefers_equity_table() {
        let catalog = FundCatalog::builtin();
        assert_eq!(
            catalog.any("VOO").map(|e| e.asset_class.as_str()),
            Some("Large-Cap")
        );
        assert_eq!(
            catalog.any("VCIT").map(|e| e.asset_class.as_str()),
            Some("Intermediate-Term Fixed Income")
        );
        assert!(catalog.any("UNKNOWN").is_none());
    }
}
