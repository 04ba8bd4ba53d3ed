//! The ordered rule table behind [`resolve`](super::resolve).

use super::expression::{
    parse_calendar_date, parse_last_period, parse_quarter_literal, QuarterLiteral, MONTH_TO_DATE,
    QUARTER_TO_DATE, YEAR_TO_DATE,
};
use super::PeriodSelection;
use crate::core::{quarter_of, MonthlySeries};
use chrono::Datelike;

/// Number of trailing months in the default window.
pub const DEFAULT_WINDOW: usize = 3;

/// What a single rule decided.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule produced the final selection.
    Matched(PeriodSelection),
    /// The rule does not apply, or applied but selected nothing: try the next one.
    Fallthrough,
    /// Stop and use the default trailing window.
    Default,
}

/// One step of the resolution cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    NoHistory,
    NoExpression,
    YearToDate,
    MonthToDate,
    QuarterToDate,
    TrailingWindow,
    QuarterLiteral,
    CalendarDate,
}

/// Rules in evaluation order.
pub const RULES: [Rule; 8] = [
    Rule::NoHistory,
    Rule::NoExpression,
    Rule::YearToDate,
    Rule::MonthToDate,
    Rule::QuarterToDate,
    Rule::TrailingWindow,
    Rule::QuarterLiteral,
    Rule::CalendarDate,
];

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::NoHistory => "no_history",
            Rule::NoExpression => "no_expression",
            Rule::YearToDate => "ytd",
            Rule::MonthToDate => "mtd",
            Rule::QuarterToDate => "qtd",
            Rule::TrailingWindow => "trailing_window",
            Rule::QuarterLiteral => "quarter_literal",
            Rule::CalendarDate => "calendar_date",
        }
    }

    /// Evaluate the rule. `expression` is trimmed and lowercased, `None` if blank.
    pub fn apply(&self, series: &MonthlySeries, expression: Option<&str>) -> RuleOutcome {
        match self {
            Rule::NoHistory => {
                if series.is_empty() {
                    RuleOutcome::Matched(PeriodSelection::new(
                        MonthlySeries::empty(),
                        "no history available",
                    ))
                } else {
                    RuleOutcome::Fallthrough
                }
            }
            Rule::NoExpression => match expression {
                None => RuleOutcome::Matched(default_window(series)),
                Some(_) => RuleOutcome::Fallthrough,
            },
            Rule::YearToDate => keyword_rule(series, expression, &YEAR_TO_DATE, |series| {
                let year = series.last()?.year();
                Some((
                    series.filter(|p| p.year() == year),
                    format!("{year} YTD"),
                ))
            }),
            Rule::MonthToDate => keyword_rule(series, expression, &MONTH_TO_DATE, |series| {
                let latest = series.last()?.period_start;
                Some((
                    series.filter(|p| p.period_start == latest),
                    latest.format("%Y-%m MTD").to_string(),
                ))
            }),
            Rule::QuarterToDate => keyword_rule(series, expression, &QUARTER_TO_DATE, |series| {
                let latest = series.last()?.period_start;
                let quarter = quarter_of(latest.month());
                let first_month = (quarter - 1) * 3 + 1;
                Some((
                    series.filter(|p| {
                        p.year() == latest.year()
                            && (first_month..=latest.month()).contains(&p.month())
                    }),
                    format!("{}-Q{quarter} QTD", latest.year()),
                ))
            }),
            Rule::TrailingWindow => match expression.and_then(parse_last_period) {
                Some(months) => {
                    let subset = series.tail(months.max(1));
                    let label = trailing_label(subset.len());
                    RuleOutcome::Matched(PeriodSelection::new(subset, label))
                }
                None => RuleOutcome::Fallthrough,
            },
            Rule::QuarterLiteral => match expression.map(parse_quarter_literal) {
                Some(QuarterLiteral::Quarter { year, quarter }) => {
                    let months = (quarter * 3 - 2)..=(quarter * 3);
                    let subset =
                        series.filter(|p| p.year() == year && months.contains(&p.month()));
                    non_empty_or_default(subset, format!("{year}-Q{quarter}"))
                }
                Some(QuarterLiteral::Malformed) => RuleOutcome::Default,
                Some(QuarterLiteral::NotQuarter) | None => RuleOutcome::Fallthrough,
            },
            Rule::CalendarDate => match expression.and_then(parse_calendar_date) {
                Some(date) => {
                    let subset = series
                        .filter(|p| p.year() == date.year() && p.month() == date.month());
                    non_empty_or_default(subset, date.format("%Y-%m").to_string())
                }
                None => RuleOutcome::Default,
            },
        }
    }
}

/// The trailing `min(3, len)` points with their label.
pub fn default_window(series: &MonthlySeries) -> PeriodSelection {
    let subset = series.tail(DEFAULT_WINDOW);
    let label = trailing_label(subset.len());
    PeriodSelection::new(subset, label)
}

fn trailing_label(count: usize) -> String {
    format!("last {count} period(s)")
}

fn keyword_rule<F>(
    series: &MonthlySeries,
    expression: Option<&str>,
    keywords: &[&str],
    select: F,
) -> RuleOutcome
where
    F: FnOnce(&MonthlySeries) -> Option<(MonthlySeries, String)>,
{
    let Some(expression) = expression else {
        return RuleOutcome::Fallthrough;
    };
    if !keywords.contains(&expression) {
        return RuleOutcome::Fallthrough;
    }
    match select(series) {
        Some((subset, label)) if !subset.is_empty() => {
            RuleOutcome::Matched(PeriodSelection::new(subset, label))
        }
        _ => RuleOutcome::Fallthrough,
    }
}

fn non_empty_or_default(subset: MonthlySeries, label: String) -> RuleOutcome {
    if subset.is_empty() {
        RuleOutcome::Default
    } else {
        RuleOutcome::Matched(PeriodSelection::new(subset, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_from(year: i32, month: u32, n: usize) -> MonthlySeries {
        let values: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        MonthlySeries::consecutive(NaiveDate::from_ymd_opt(year, month, 1).unwrap(), &values)
    }

    fn matched(outcome: RuleOutcome) -> PeriodSelection {
        match outcome {
            RuleOutcome::Matched(selection) => selection,
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = RULES.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "no_history",
                "no_expression",
                "ytd",
                "mtd",
                "qtd",
                "trailing_window",
                "quarter_literal",
                "calendar_date"
            ]
        );
    }

    #[test]
    fn no_history_only_matches_empty_series() {
        let selection = matched(Rule::NoHistory.apply(&MonthlySeries::empty(), Some("ytd")));
        assert!(selection.subset.is_empty());
        assert_eq!(selection.label, "no history available");

        assert_eq!(
            Rule::NoHistory.apply(&series_from(2024, 1, 3), None),
            RuleOutcome::Fallthrough
        );
    }

    #[test]
    fn year_to_date_selects_latest_year() {
        let series = series_from(2023, 11, 5); // 2023-11 .. 2024-03
        let selection = matched(Rule::YearToDate.apply(&series, Some("year to date")));
        assert_eq!(selection.subset.values(), vec![3.0, 4.0, 5.0]);
        assert_eq!(selection.label, "2024 YTD");
        assert_eq!(
            Rule::YearToDate.apply(&series, Some("mtd")),
            RuleOutcome::Fallthrough
        );
    }

    #[test]
    fn month_to_date_selects_latest_month() {
        let series = series_from(2024, 1, 5);
        let selection = matched(Rule::MonthToDate.apply(&series, Some("mtd")));
        assert_eq!(selection.subset.values(), vec![5.0]);
        assert_eq!(selection.label, "2024-05 MTD");
    }

    #[test]
    fn quarter_to_date_stops_at_latest_month() {
        let series = series_from(2024, 1, 5); // latest 2024-05, Q2
        let selection = matched(Rule::QuarterToDate.apply(&series, Some("qtd")));
        assert_eq!(selection.subset.values(), vec![4.0, 5.0]);
        assert_eq!(selection.label, "2024-Q2 QTD");
    }

    #[test]
    fn trailing_window_reports_actual_count() {
        let series = series_from(2024, 1, 4);
        let selection = matched(Rule::TrailingWindow.apply(&series, Some("last 2 years")));
        assert_eq!(selection.subset.len(), 4);
        assert_eq!(selection.label, "last 4 period(s)");
    }

    #[test]
    fn quarter_literal_falls_back_to_default_when_empty() {
        let series = series_from(2024, 4, 6);
        assert_eq!(
            Rule::QuarterLiteral.apply(&series, Some("2024-q1")),
            RuleOutcome::Default
        );
        let selection = matched(Rule::QuarterLiteral.apply(&series, Some("2024-q3")));
        assert_eq!(selection.label, "2024-Q3");
        assert_eq!(selection.subset.values(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn malformed_quarter_goes_straight_to_default() {
        let series = series_from(2024, 1, 6);
        assert_eq!(
            Rule::QuarterLiteral.apply(&series, Some("2024-q9")),
            RuleOutcome::Default
        );
    }

    #[test]
    fn calendar_date_selects_containing_month() {
        let series = series_from(2024, 1, 6);
        let selection = matched(Rule::CalendarDate.apply(&series, Some("2024-02-17")));
        assert_eq!(selection.subset.values(), vec![2.0]);
        assert_eq!(selection.label, "2024-02");
        assert_eq!(
            Rule::CalendarDate.apply(&series, Some("2019-02-17")),
            RuleOutcome::Default
        );
        assert_eq!(
            Rule::CalendarDate.apply(&series, Some("whenever")),
            RuleOutcome::Default
        );
    }
}
