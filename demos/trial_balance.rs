//! Trial balance, balance sheet and P&L for a small trading business

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use trial_balance_core::utils::{standard_chart, MemoryStorage};
use trial_balance_core::{
    Account, AccountType, ForestCache, ReportConfig, ReportLine, TrialBalanceService,
    VoucherBuilder,
};
use tracing_subscriber::EnvFilter;

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("invalid date {}-{}-{}", y, m, d).into())
}

fn print_lines(lines: &[ReportLine]) {
    for line in lines {
        let indent = "  ".repeat(line.depth + 1);
        let marker = if line.is_group { "▸" } else { "·" };
        println!("{}{} {:<28} {:>12}", indent, marker, line.name, line.balance);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("📒 Trial Balance Core - Reports Example\n");

    let storage = MemoryStorage::new();
    storage.add_accounts(standard_chart())?;
    // A ledger whose group was deleted upstream; it is reported at the root
    storage.add_account(Account::new(
        "suspense",
        "Suspense A/c",
        AccountType::Asset,
        Some("deleted_group"),
    ))?;

    let vouchers = [
        VoucherBuilder::new(date(2024, 4, 1)?, "Capital introduced")
            .debit("hdfc", BigDecimal::from(200000))
            .credit("capital", BigDecimal::from(200000)),
        VoucherBuilder::new(date(2024, 4, 8)?, "Purchase of goods on credit")
            .debit("purchases", BigDecimal::from(80000))
            .debit("input_gst", BigDecimal::from(14400))
            .credit("creditors", BigDecimal::from(94400)),
        VoucherBuilder::new(date(2024, 5, 12)?, "Sales invoice INV-001")
            .debit("debtors", BigDecimal::from(141600))
            .credit("domestic_sales", BigDecimal::from(120000))
            .credit("output_gst", BigDecimal::from(21600)),
        VoucherBuilder::new(date(2024, 5, 31)?, "Salaries for May")
            .debit("salaries", BigDecimal::from(25000))
            .credit("sbi", BigDecimal::from(25000)),
        VoucherBuilder::new(date(2024, 6, 2)?, "Cash withdrawn")
            .debit("cash", BigDecimal::from(10000))
            .credit("hdfc", BigDecimal::from(10000)),
    ];
    for voucher in vouchers {
        storage.add_postings(voucher.build()?)?;
    }

    let config = ReportConfig {
        hide_zero_balances: true,
        ..ReportConfig::default()
    };
    let cache = ForestCache::from_config(&config.cache);
    let service = TrialBalanceService::with_cache(storage, config, cache)?;

    let today = date(2024, 6, 30)?;
    let period = service.resolve_period(None, Some(today), today)?;
    println!("Period: {}\n", period);

    let tb = service.trial_balance(&period).await?;
    println!("⚖️  Trial Balance");
    print_lines(&tb.lines);
    println!(
        "  Totals: Dr {} / Cr {} ({})\n",
        tb.total_debits,
        tb.total_credits,
        if tb.is_balanced { "balanced" } else { "NOT balanced" }
    );

    let pl = service.profit_and_loss(&period).await?;
    println!("📈 Profit & Loss");
    print_lines(&pl.revenue.lines);
    print_lines(&pl.expenses.lines);
    println!("  Net profit: {}\n", pl.net_profit);

    let bs = service.balance_sheet(&period).await?;
    println!("🏦 Balance Sheet");
    print_lines(&bs.assets.lines);
    println!("  Total assets: {}", bs.total_assets);
    print_lines(&bs.liabilities.lines);
    print_lines(&bs.equity.lines);
    println!("  Profit for the period: {}", bs.net_profit);
    println!(
        "  Total liabilities & equity: {}",
        bs.total_liabilities_and_equity
    );

    let forest = service.forest(&period).await?;
    for warning in &forest.warnings {
        println!("⚠️  {}", warning);
    }

    Ok(())
}
