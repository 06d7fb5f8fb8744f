//! quoteSummary module parsing.

use chrono::{DateTime, NaiveDate};
use report_core::{CalendarInfo, Fundamentals, SourceError};
use serde_json::Value;

pub(crate) const FUNDAMENTAL_MODULES: &str =
    "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile,balanceSheetHistory";

pub(crate) const CALENDAR_MODULES: &str = "calendarEvents";

/// First entry of `quoteSummary.result`, or `NoData` when the symbol is unknown.
pub(crate) fn summary_result<'a>(body: &'a Value, symbol: &str) -> Result<&'a Value, SourceError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| SourceError::InvalidResponse("missing quoteSummary".to_string()))?;

    if let Some(description) = summary
        .pointer("/error/description")
        .and_then(|v| v.as_str())
    {
        return Err(SourceError::NoData(format!("{}: {}", symbol, description)));
    }

    summary
        .pointer("/result/0")
        .filter(|v| !v.is_null())
        .ok_or_else(|| SourceError::NoData(format!("no quote summary for {}", symbol)))
}

/// `{ "raw": x, "fmt": ".." }` or a bare number.
fn raw(result: &Value, module: &str, field: &str) -> Option<f64> {
    let value = result.get(module)?.get(field)?;
    value
        .get("raw")
        .and_then(|v| v.as_f64())
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
}

fn text(result: &Value, module: &str, field: &str) -> Option<String> {
    result
        .get(module)?
        .get(field)?
        .as_str()
        .map(str::to_string)
}

/// Field of the most recent annual balance sheet in `balanceSheetHistory`.
fn latest_balance(result: &Value, field: &str) -> Option<f64> {
    let value = result
        .pointer("/balanceSheetHistory/balanceSheetStatements/0")?
        .get(field)?;
    value
        .get("raw")
        .and_then(|v| v.as_f64())
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
}

pub(crate) fn parse_fundamentals(result: &Value) -> Fundamentals {
    let financial = |field| raw(result, "financialData", field);
    let summary = |field| raw(result, "summaryDetail", field);
    let stats = |field| raw(result, "defaultKeyStatistics", field);

    Fundamentals {
        short_name: text(result, "price", "shortName").or_else(|| text(result, "price", "longName")),
        sector: text(result, "assetProfile", "sector"),
        industry: text(result, "assetProfile", "industry"),
        current_price: financial("currentPrice"),
        regular_market_price: raw(result, "price", "regularMarketPrice"),
        previous_close: summary("previousClose"),
        market_cap: raw(result, "price", "marketCap").or_else(|| summary("marketCap")),
        trailing_pe: summary("trailingPE"),
        trailing_eps: stats("trailingEps"),
        debt_to_equity: financial("debtToEquity"),
        current_ratio: financial("currentRatio"),
        quick_ratio: financial("quickRatio"),
        return_on_equity: financial("returnOnEquity"),
        gross_margins: financial("grossMargins"),
        operating_margins: financial("operatingMargins"),
        profit_margins: financial("profitMargins"),
        fifty_two_week_high: summary("fiftyTwoWeekHigh"),
        fifty_two_week_low: summary("fiftyTwoWeekLow"),
        beta: summary("beta"),
        dividend_yield: summary("dividendYield"),
        volume: summary("volume"),
        average_volume: summary("averageVolume"),
        total_revenue: financial("totalRevenue"),
        net_income_to_common: stats("netIncomeToCommon"),
        total_assets: latest_balance(result, "totalAssets"),
        total_stockholder_equity: latest_balance(result, "totalStockholderEquity"),
        free_cashflow: financial("freeCashflow"),
    }
}

fn epoch_date(value: &Value) -> Option<NaiveDate> {
    let secs = value.get("raw").and_then(|v| v.as_i64()).or_else(|| value.as_i64())?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

pub(crate) fn parse_calendar(result: &Value) -> CalendarInfo {
    let events = result.get("calendarEvents");

    let earnings_dates = events
        .and_then(|e| e.pointer("/earnings/earningsDate"))
        .and_then(|v| v.as_array())
        .map(|dates| dates.iter().filter_map(epoch_date).collect())
        .unwrap_or_default();

    let ex_dividend_date = events
        .and_then(|e| e.get("exDividendDate"))
        .and_then(epoch_date);

    CalendarInfo {
        earnings_dates,
        ex_dividend_date,
    }
}
