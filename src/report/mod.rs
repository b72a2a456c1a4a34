pub mod allocation;
pub mod classify;
pub mod maturity;
mod service;
mod table;

pub use allocation::{
    format_single_level, format_two_level, single_level_allocation, two_level_allocation,
    AllocationDisplayRow, AllocationRow, ClassifiedHolding, SingleAllocationDisplayRow,
    SingleAllocationRow, TOTAL_LABEL,
};
pub use classify::{classify_etf, classify_major, Classification, EtfScope, MajorCategory, OTHERS};
pub use maturity::{
    build_maturity_calendar, format_maturity_calendar, MaturityBucket, MaturityDisplayRow,
    YearMonth, CD_RENEW,
};
pub use service::{
    ReportService, StockAllocationDisplayRow, StockAllocationRow,
};
pub use table::render_table;
