use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use folioview::catalog::FundCatalog;
use folioview::clock::SystemClock;
use folioview::config::ResolvedConfig;
use folioview::market_data::{Fundamentals, QuoteService, YahooQuoteClient};
use folioview::report::{render_table, AllocationDisplayRow, ReportService};
use folioview::storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "folioview")]
#[command(about = "Portfolio allocation and maturity reports")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "folioview.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Allocation by investment type (equity vs fixed income)
    Type,
    /// Allocation by account
    Account,
    /// Equity ETF allocation by asset class
    EquityEtf,
    /// Fixed-income ETF allocation by asset class
    FixedEtf,
    /// Individual stock allocation
    Stock,
    /// ETF allocation within one account, cash included
    Etf {
        /// Account name to report on
        #[arg(long)]
        account: String,
    },
    /// Maturity calendar for fixed-income holdings
    Maturity,
    /// Fetch scalar fundamentals for one ticker
    Quote {
        /// Ticker symbol to look up
        ticker: String,
    },
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ResolvedConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    if let Command::Quote { ticker } = &cli.command {
        let quotes = YahooQuoteClient::new();
        let fundamentals = quotes.fundamentals(ticker)?;
        println!("{}", quote_table(ticker, &fundamentals));
        return Ok(());
    }

    if let Command::Config = cli.command {
        println!("Config file: {}", cli.config.display());
        println!("Data directory: {}", config.data_dir.display());
        println!(
            "Excluded stock symbols: {}",
            if config.excluded_stock_symbols.is_empty() {
                "(none)".to_string()
            } else {
                config.excluded_stock_symbols.join(", ")
            }
        );
        return Ok(());
    }

    let store = JsonFileStore::new(&config.data_dir);
    let catalog = FundCatalog::builtin();
    let clock = SystemClock;
    let service = ReportService::new(&store, &store, &catalog, &clock, &config);

    let output = match &cli.command {
        Command::Type => two_level_table(service.allocation_by_type_display()?),
        Command::EquityEtf => two_level_table(service.allocation_equity_etf_display()?),
        Command::FixedEtf => two_level_table(service.allocation_fixed_etf_display()?),
        Command::Etf { account } => {
            two_level_table(service.allocation_etf_for_account_display(account)?)
        }
        Command::Account => {
            let rows: Vec<Vec<String>> = service
                .allocation_by_account_display()?
                .into_iter()
                .map(|r| vec![r.key, r.total_dollars, r.allocation_pct])
                .collect();
            render_table(&["Account", "Total", "%"], &rows, &[1, 2])
        }
        Command::Stock => {
            let rows: Vec<Vec<String>> = service
                .allocation_stock_display()?
                .into_iter()
                .map(|r| vec![r.symbol, r.description, r.dollars, r.allocation_pct])
                .collect();
            render_table(&["Symbol", "Description", "Total", "%"], &rows, &[2, 3])
        }
        Command::Maturity => {
            let rows: Vec<Vec<String>> = service
                .maturity_calendar_display()?
                .into_iter()
                .map(|r| {
                    vec![
                        r.period,
                        r.total_dollars,
                        r.total_count,
                        r.weighted_yield_pct,
                        r.symbols,
                    ]
                })
                .collect();
            render_table(
                &["Month", "Total", "Count", "Yield", "Holdings"],
                &rows,
                &[1, 2, 3],
            )
        }
        Command::Quote { .. } | Command::Config => unreachable!(),
    };

    println!("{output}");
    Ok(())
}

fn quote_table(ticker: &str, f: &Fundamentals) -> String {
    fn num(value: Option<rust_decimal::Decimal>) -> String {
        value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
    }
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| "N/A".to_string())
    }

    let rows = vec![
        vec!["Previous close".to_string(), num(f.previous_close)],
        vec!["52-week low".to_string(), num(f.low_52wk)],
        vec!["52-week high".to_string(), num(f.high_52wk)],
        vec!["Market cap".to_string(), num(f.market_cap)],
        vec!["P/E".to_string(), num(f.pe_ratio)],
        vec!["EPS".to_string(), num(f.eps)],
        vec!["Beta".to_string(), num(f.beta)],
        vec!["Dividend yield".to_string(), num(f.dividend_yield)],
        vec!["Sector".to_string(), text(&f.sector)],
        vec!["Fund family".to_string(), text(&f.fund_family)],
        vec!["Fund category".to_string(), text(&f.fund_category)],
    ];
    render_table(&[ticker, "Value"], &rows, &[1])
}

fn two_level_table(rows: Vec<AllocationDisplayRow>) -> String {
    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.major_category,
                r.major_total_dollars,
                r.major_allocation_pct,
                r.minor_category,
                r.minor_total_dollars,
                r.minor_allocation_pct,
            ]
        })
        .collect();
    render_table(
        &["Major", "Major total", "Major %", "Minor", "Minor total", "Minor %"],
        &cells,
        &[1, 2, 4, 5],
    )
}
