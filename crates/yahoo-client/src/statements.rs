//! Annual statements from the fundamentals-timeseries endpoint.

use chrono::NaiveDate;
use report_core::{SourceError, StatementKind, StatementPeriod, StatementTable};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// (timeseries key without the `annual` prefix, line-item label)
const INCOME_ITEMS: &[(&str, &str)] = &[
    ("TotalRevenue", "Total Revenue"),
    ("CostOfRevenue", "Cost Of Revenue"),
    ("GrossProfit", "Gross Profit"),
    ("ResearchAndDevelopment", "Research And Development"),
    ("SellingGeneralAndAdministration", "Selling General And Administration"),
    ("OperatingExpense", "Operating Expense"),
    ("OperatingIncome", "Operating Income"),
    ("InterestExpense", "Interest Expense"),
    ("PretaxIncome", "Pretax Income"),
    ("TaxProvision", "Tax Provision"),
    ("NetIncome", "Net Income"),
    ("NetIncomeCommonStockholders", "Net Income Common Stockholders"),
    ("BasicEPS", "Basic EPS"),
    ("DilutedEPS", "Diluted EPS"),
    ("BasicAverageShares", "Basic Average Shares"),
    ("DilutedAverageShares", "Diluted Average Shares"),
    ("EBIT", "EBIT"),
    ("EBITDA", "EBITDA"),
];

const BALANCE_ITEMS: &[(&str, &str)] = &[
    ("TotalAssets", "Total Assets"),
    ("CurrentAssets", "Current Assets"),
    ("CashAndCashEquivalents", "Cash And Cash Equivalents"),
    ("AccountsReceivable", "Accounts Receivable"),
    ("Inventory", "Inventory"),
    ("NetPPE", "Net PPE"),
    ("TotalLiabilitiesNetMinorityInterest", "Total Liabilities Net Minority Interest"),
    ("CurrentLiabilities", "Current Liabilities"),
    ("AccountsPayable", "Accounts Payable"),
    ("TotalDebt", "Total Debt"),
    ("LongTermDebt", "Long Term Debt"),
    ("NetDebt", "Net Debt"),
    ("StockholdersEquity", "Stockholders Equity"),
    ("RetainedEarnings", "Retained Earnings"),
    ("WorkingCapital", "Working Capital"),
    ("OrdinarySharesNumber", "Ordinary Shares Number"),
];

const CASHFLOW_ITEMS: &[(&str, &str)] = &[
    ("OperatingCashFlow", "Operating Cash Flow"),
    ("CapitalExpenditure", "Capital Expenditure"),
    ("FreeCashFlow", "Free Cash Flow"),
    ("InvestingCashFlow", "Investing Cash Flow"),
    ("FinancingCashFlow", "Financing Cash Flow"),
    ("DepreciationAndAmortization", "Depreciation And Amortization"),
    ("StockBasedCompensation", "Stock Based Compensation"),
    ("ChangeInWorkingCapital", "Change In Working Capital"),
    ("RepurchaseOfCapitalStock", "Repurchase Of Capital Stock"),
    ("CashDividendsPaid", "Cash Dividends Paid"),
    ("IssuanceOfDebt", "Issuance Of Debt"),
    ("RepaymentOfDebt", "Repayment Of Debt"),
    ("EndCashPosition", "End Cash Position"),
];

pub(crate) fn line_items(kind: StatementKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        StatementKind::Income => INCOME_ITEMS,
        StatementKind::Balance => BALANCE_ITEMS,
        StatementKind::Cashflow => CASHFLOW_ITEMS,
    }
}

/// Comma-separated `type` query value for a statement.
pub(crate) fn timeseries_types(kind: StatementKind) -> String {
    line_items(kind)
        .iter()
        .map(|(key, _)| format!("annual{}", key))
        .collect::<Vec<_>>()
        .join(",")
}

/// Pivot a timeseries response into a statement table, newest period first.
pub(crate) fn parse_timeseries(kind: StatementKind, body: &Value) -> Result<StatementTable, SourceError> {
    let results = body
        .pointer("/timeseries/result")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SourceError::InvalidResponse("missing timeseries.result".to_string()))?;

    let labels: HashMap<String, &str> = line_items(kind)
        .iter()
        .map(|(key, label)| (format!("annual{}", key), *label))
        .collect();

    let mut by_date: BTreeMap<NaiveDate, HashMap<String, f64>> = BTreeMap::new();
    let mut present: Vec<&str> = Vec::new();

    for series in results {
        let Some(key) = series.pointer("/meta/type/0").and_then(|v| v.as_str()) else {
            continue;
        };
        let Some(label) = labels.get(key).copied() else {
            continue;
        };
        let Some(entries) = series.get(key).and_then(|v| v.as_array()) else {
            continue;
        };

        for entry in entries.iter().filter(|e| !e.is_null()) {
            let date = entry
                .get("asOfDate")
                .and_then(|v| v.as_str())
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
            let value = entry.pointer("/reportedValue/raw").and_then(|v| v.as_f64());
            if let (Some(date), Some(value)) = (date, value) {
                by_date.entry(date).or_default().insert(label.to_string(), value);
                if !present.contains(&label) {
                    present.push(label);
                }
            }
        }
    }

    // Keep the canonical line-item order rather than response order.
    let line_items = line_items(kind)
        .iter()
        .map(|(_, label)| *label)
        .filter(|label| present.contains(label))
        .map(str::to_string)
        .collect();

    let periods = by_date
        .into_iter()
        .rev()
        .map(|(end_date, values)| StatementPeriod { end_date, values })
        .collect();

    Ok(StatementTable {
        kind,
        line_items,
        periods,
    })
}
