//! Statement line-item names as reported by the market-data provider.

pub const FREE_CASH_FLOW: &str = "Free Cash Flow";
pub const OPERATING_CASH_FLOW: &str = "Operating Cash Flow";
pub const CAPITAL_EXPENDITURE: &str = "Capital Expenditure";

pub const TOTAL_DEBT: &str = "Total Debt";
pub const LONG_TERM_DEBT: &str = "Long Term Debt";
pub const TOTAL_ASSETS: &str = "Total Assets";
pub const TOTAL_LIABILITIES: &str = "Total Liabilities Net Minority Interest";
pub const STOCKHOLDERS_EQUITY: &str = "Stockholders Equity";
pub const INVENTORY: &str = "Inventory";
pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";

pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const COST_OF_REVENUE: &str = "Cost Of Revenue";
