pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod market_data;
pub mod models;
pub mod report;
pub mod storage;
