use chrono::Datelike;
use report_core::line_items::{
    CAPITAL_EXPENDITURE, FREE_CASH_FLOW, LONG_TERM_DEBT, OPERATING_CASH_FLOW, TOTAL_DEBT,
    TOTAL_REVENUE,
};
use report_core::{PriceBar, StatementPeriod, StatementTable, TrendPoint, TrendSeries};
use std::collections::BTreeMap;

/// Longest series the dashboard charts.
pub const MAX_TREND_POINTS: usize = 5;

/// Yearly P/E values at or above this are treated as outliers.
const PE_CEILING: f64 = 200.0;

/// Builds the four annual trend series from statement tables and price history.
pub struct TrendExtractor;

impl TrendExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every series. Missing tables yield empty series.
    pub fn extract(
        &self,
        cashflow: Option<&StatementTable>,
        balance: Option<&StatementTable>,
        income: Option<&StatementTable>,
        history: &[PriceBar],
        trailing_eps: Option<f64>,
    ) -> TrendSeries {
        TrendSeries {
            free_cash_flow: cashflow.map(|t| self.free_cash_flow(t)).unwrap_or_default(),
            pe_ratio: self.pe_ratio(history, trailing_eps),
            debt: balance.map(|t| self.debt(t)).unwrap_or_default(),
            revenue: income.map(|t| self.revenue(t)).unwrap_or_default(),
        }
    }

    /// Reported free cash flow, or operating cash flow plus (negative) capex.
    pub fn free_cash_flow(&self, cashflow: &StatementTable) -> Vec<TrendPoint> {
        self.collect(cashflow, |period| {
            period
                .get(FREE_CASH_FLOW)
                .or_else(|| {
                    period
                        .get(OPERATING_CASH_FLOW)
                        .map(|ocf| ocf + period.get(CAPITAL_EXPENDITURE).unwrap_or(0.0))
                })
                .filter(|v| *v != 0.0)
        })
    }

    /// Mean yearly close divided by trailing EPS, one point per calendar year.
    pub fn pe_ratio(&self, history: &[PriceBar], trailing_eps: Option<f64>) -> Vec<TrendPoint> {
        let eps = match trailing_eps {
            Some(eps) if eps > 0.0 && eps.is_finite() => eps,
            _ => return Vec::new(),
        };

        let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for bar in history.iter().filter(|b| b.close.is_finite()) {
            let entry = by_year.entry(bar.timestamp.year()).or_insert((0.0, 0));
            entry.0 += bar.close;
            entry.1 += 1;
        }

        let points = by_year
            .into_iter()
            .filter_map(|(year, (sum, count))| {
                let pe = (sum / count as f64) / eps;
                (pe > 0.0 && pe < PE_CEILING).then(|| TrendPoint {
                    period: year.to_string(),
                    value: pe,
                })
            })
            .collect();

        oldest_first(points)
    }

    /// Total debt, falling back to long-term debt.
    pub fn debt(&self, balance: &StatementTable) -> Vec<TrendPoint> {
        self.collect(balance, |period| {
            period.get(TOTAL_DEBT).or_else(|| period.get(LONG_TERM_DEBT))
        })
    }

    pub fn revenue(&self, income: &StatementTable) -> Vec<TrendPoint> {
        self.collect(income, |period| period.get(TOTAL_REVENUE))
    }

    fn collect(
        &self,
        table: &StatementTable,
        value_of: impl Fn(&StatementPeriod) -> Option<f64>,
    ) -> Vec<TrendPoint> {
        let points = table
            .recent(MAX_TREND_POINTS)
            .iter()
            .filter_map(|period| {
                value_of(period).map(|value| TrendPoint {
                    period: period.fiscal_year(),
                    value,
                })
            })
            .collect();

        oldest_first(points)
    }
}

impl Default for TrendExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort by year label, keep the first point seen per year, cap at the newest
/// `MAX_TREND_POINTS`.
fn oldest_first(mut points: Vec<TrendPoint>) -> Vec<TrendPoint> {
    points.sort_by(|a, b| a.period.cmp(&b.period));
    points.dedup_by(|later, earlier| later.period == earlier.period);
    let excess = points.len().saturating_sub(MAX_TREND_POINTS);
    points.split_off(excess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use report_core::StatementKind;
    use std::collections::HashMap;

    fn table(kind: StatementKind, rows: &[(i32, &[(&str, f64)])]) -> StatementTable {
        let mut table = StatementTable::new(kind);
        for (year, values) in rows {
            let mut map = HashMap::new();
            for (item, value) in values.iter() {
                if !table.has_line(item) {
                    table.line_items.push(item.to_string());
                }
                map.insert(item.to_string(), *value);
            }
            table.periods.push(StatementPeriod {
                end_date: NaiveDate::from_ymd_opt(*year, 12, 31).unwrap(),
                values: map,
            });
        }
        table
    }

    fn bar(year: i32, month: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(year, month, 15, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        }
    }

    fn assert_strictly_ascending(points: &[TrendPoint]) {
        assert!(points.len() <= MAX_TREND_POINTS);
        for pair in points.windows(2) {
            assert!(pair[0].period < pair[1].period, "{:?}", points);
        }
    }

    #[test]
    fn test_fcf_prefers_reported_then_derives() {
        let cashflow = table(
            StatementKind::Cashflow,
            &[
                (2024, &[(FREE_CASH_FLOW, 100.0), (OPERATING_CASH_FLOW, 500.0)]),
                (2023, &[(OPERATING_CASH_FLOW, 300.0), (CAPITAL_EXPENDITURE, -120.0)]),
                (2022, &[(OPERATING_CASH_FLOW, 80.0)]),
            ],
        );
        let fcf = TrendExtractor::new().free_cash_flow(&cashflow);
        let values: Vec<(&str, f64)> = fcf.iter().map(|p| (p.period.as_str(), p.value)).collect();
        assert_eq!(values, vec![("2022", 80.0), ("2023", 180.0), ("2024", 100.0)]);
    }

    #[test]
    fn test_fcf_drops_missing_and_zero_columns() {
        let cashflow = table(
            StatementKind::Cashflow,
            &[
                (2024, &[(FREE_CASH_FLOW, f64::NAN)]),
                (2023, &[(FREE_CASH_FLOW, 0.0)]),
                (2022, &[(FREE_CASH_FLOW, 42.0)]),
            ],
        );
        let fcf = TrendExtractor::new().free_cash_flow(&cashflow);
        assert_eq!(fcf.len(), 1);
        assert_eq!(fcf[0].period, "2022");
    }

    #[test]
    fn test_only_five_most_recent_columns_are_used() {
        let rows: Vec<(i32, Vec<(&str, f64)>)> = (2017..=2024)
            .rev()
            .map(|y| (y, vec![(TOTAL_REVENUE, y as f64)]))
            .collect();
        let borrowed: Vec<(i32, &[(&str, f64)])> =
            rows.iter().map(|(y, v)| (*y, v.as_slice())).collect();
        let income = table(StatementKind::Income, &borrowed);

        let revenue = TrendExtractor::new().revenue(&income);
        assert_strictly_ascending(&revenue);
        assert_eq!(revenue.len(), 5);
        assert_eq!(revenue.first().unwrap().period, "2020");
        assert_eq!(revenue.last().unwrap().period, "2024");
    }

    #[test]
    fn test_debt_falls_back_to_long_term_debt() {
        let balance = table(
            StatementKind::Balance,
            &[
                (2024, &[(TOTAL_DEBT, 10.0), (LONG_TERM_DEBT, 7.0)]),
                (2023, &[(LONG_TERM_DEBT, 6.0)]),
                (2022, &[(TOTAL_REVENUE, 1.0)]),
            ],
        );
        let debt = TrendExtractor::new().debt(&balance);
        let values: Vec<f64> = debt.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![6.0, 10.0]);
    }

    #[test]
    fn test_pe_trend_averages_each_year() {
        let history = vec![bar(2023, 3, 90.0), bar(2023, 9, 110.0), bar(2024, 6, 150.0)];
        let pe = TrendExtractor::new().pe_ratio(&history, Some(5.0));
        assert_eq!(pe.len(), 2);
        assert_eq!(pe[0].period, "2023");
        assert!((pe[0].value - 20.0).abs() < 1e-9);
        assert!((pe[1].value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_pe_trend_rejects_non_positive_eps() {
        let history = vec![bar(2024, 1, 100.0)];
        let extractor = TrendExtractor::new();
        assert!(extractor.pe_ratio(&history, Some(0.0)).is_empty());
        assert!(extractor.pe_ratio(&history, Some(-2.0)).is_empty());
        assert!(extractor.pe_ratio(&history, None).is_empty());
    }

    #[test]
    fn test_pe_trend_filters_outliers_and_caps_length() {
        let mut history: Vec<PriceBar> = (2019..=2024).map(|y| bar(y, 6, 100.0)).collect();
        history.push(bar(2018, 6, 5_000.0));
        let pe = TrendExtractor::new().pe_ratio(&history, Some(10.0));
        assert_strictly_ascending(&pe);
        assert_eq!(pe.len(), 5);
        assert!(pe.iter().all(|p| p.value > 0.0 && p.value < 200.0));
        assert_eq!(pe[0].period, "2020");
    }

    #[test]
    fn test_extract_without_tables_is_empty() {
        let trends = TrendExtractor::new().extract(None, None, None, &[], Some(3.0));
        assert_eq!(trends, TrendSeries::default());
    }
}
