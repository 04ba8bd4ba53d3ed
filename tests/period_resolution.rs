//! Period resolution against realistic monthly histories.

use chrono::NaiveDate;
use kpi_forecast::core::{MonthlyPoint, MonthlySeries, Observation};
use kpi_forecast::period::resolve;
use kpi_forecast::slicer::slice_series;

fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn consecutive(year: i32, start_month: u32, n: usize) -> MonthlySeries {
    let values: Vec<f64> = (1..=n).map(|i| 100.0 + i as f64).collect();
    MonthlySeries::consecutive(month(year, start_month), &values)
}

fn months_of(series: &MonthlySeries) -> Vec<NaiveDate> {
    series.points().iter().map(|p| p.period_start).collect()
}

#[test]
fn last_two_quarters_is_six_months() {
    let series = consecutive(2024, 1, 8);
    let selection = resolve(&series, Some("last 2 quarters"));
    assert_eq!(selection.label, "last 6 period(s)");
    assert_eq!(
        months_of(&selection.subset),
        (3..=8).map(|m| month(2024, m)).collect::<Vec<_>>()
    );
}

#[test]
fn quarter_outside_history_uses_default_window() {
    let series = consecutive(2024, 4, 6);
    let selection = resolve(&series, Some("2024-Q1"));
    assert_eq!(selection.label, "last 3 period(s)");
    assert_eq!(
        months_of(&selection.subset),
        vec![month(2024, 7), month(2024, 8), month(2024, 9)]
    );
}

#[test]
fn year_to_date_spans_the_latest_year() {
    let series = consecutive(2023, 10, 6);
    let selection = resolve(&series, Some("Year To Date"));
    assert_eq!(selection.label, "2024 YTD");
    assert_eq!(months_of(&selection.subset), vec![month(2024, 1), month(2024, 2), month(2024, 3)]);
}

#[test]
fn quarter_to_date_and_month_to_date() {
    let series = consecutive(2024, 1, 5);
    let qtd = resolve(&series, Some("qtd"));
    assert_eq!(qtd.label, "2024-Q2 QTD");
    assert_eq!(months_of(&qtd.subset), vec![month(2024, 4), month(2024, 5)]);

    let mtd = resolve(&series, Some(" MTD "));
    assert_eq!(mtd.label, "2024-05 MTD");
    assert_eq!(mtd.subset.len(), 1);
}

#[test]
fn calendar_month_names() {
    let series = consecutive(2024, 1, 12);
    let selection = resolve(&series, Some("March 2024"));
    assert_eq!(selection.label, "2024-03");
    assert_eq!(months_of(&selection.subset), vec![month(2024, 3)]);

    let iso = resolve(&series, Some("2024-11-15"));
    assert_eq!(iso.label, "2024-11");
}

#[test]
fn unknown_phrases_match_no_phrase() {
    let series = consecutive(2024, 1, 10);
    let baseline = resolve(&series, None);
    for phrase in ["sometime soon", "2024-q9", "", "   ", "next fiscal"] {
        assert_eq!(resolve(&series, Some(phrase)), baseline, "phrase {phrase:?}");
    }
}

#[test]
fn resolution_on_sliced_observations() {
    let obs = vec![
        Observation::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "Revenue", "SMB", 10.0),
        Observation::new(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(), "revenue", "smb", 20.0),
        Observation::new(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), "revenue", "smb", 30.0),
        Observation::new(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), "revenue", "enterprise", 99.0),
    ];
    let series = slice_series(&obs, "revenue", "smb");
    assert_eq!(
        series.points(),
        &[
            MonthlyPoint::new(month(2024, 1), 15.0),
            MonthlyPoint::new(month(2024, 3), 30.0)
        ]
    );

    // The February gap stays a gap.
    let selection = resolve(&series, Some("last 3 months"));
    assert_eq!(selection.label, "last 2 period(s)");
    assert_eq!(resolve(&series, Some("2024-02")).label, "last 2 period(s)");
}
