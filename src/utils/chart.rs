//! Ready-made chart of accounts

use crate::types::*;

/// A small grouped chart of accounts for a trading business
///
/// Primary groups are roots; ledgers hang below them, with "Current Assets"
/// holding a nested "Bank Accounts" group.
pub fn standard_chart() -> Vec<Account> {
    let rows: [(&str, &str, AccountType, Option<&str>); 17] = [
        // Assets
        ("current_assets", "Current Assets", AccountType::Asset, None),
        ("cash", "Cash-in-Hand", AccountType::Asset, Some("current_assets")),
        ("bank_accounts", "Bank Accounts", AccountType::Asset, Some("current_assets")),
        ("hdfc", "HDFC Current A/c", AccountType::Asset, Some("bank_accounts")),
        ("sbi", "SBI Savings A/c", AccountType::Asset, Some("bank_accounts")),
        ("debtors", "Sundry Debtors", AccountType::Asset, Some("current_assets")),
        ("input_gst", "Input GST", AccountType::Asset, Some("current_assets")),
        // Liabilities
        ("current_liabilities", "Current Liabilities", AccountType::Liability, None),
        ("creditors", "Sundry Creditors", AccountType::Liability, Some("current_liabilities")),
        ("output_gst", "Output GST", AccountType::Liability, Some("current_liabilities")),
        // Equity
        ("capital", "Capital Account", AccountType::Equity, None),
        // Revenue
        ("sales", "Sales Accounts", AccountType::Revenue, None),
        ("domestic_sales", "Domestic Sales", AccountType::Revenue, Some("sales")),
        // Expenses
        ("purchases", "Purchase Accounts", AccountType::Expense, None),
        ("indirect_expenses", "Indirect Expenses", AccountType::Expense, None),
        ("rent", "Rent", AccountType::Expense, Some("indirect_expenses")),
        ("salaries", "Salaries", AccountType::Expense, Some("indirect_expenses")),
    ];

    rows.iter()
        .map(|(id, name, account_type, parent)| Account::new(*id, *name, *account_type, *parent))
        .collect()
}
