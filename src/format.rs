//! User-facing text for query and forecast responses.

use crate::core::{ForecastResult, MonthlyPoint};
use crate::period::PeriodSelection;

/// Interval label shown on every forecast line, whatever level the backend used.
pub const INTERVAL_LABEL: &str = "80%";

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
///
/// ```
/// use kpi_forecast::format::title_case;
///
/// assert_eq!(title_case("north-east smb"), "North-East Smb");
/// ```
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}

/// Display name of a backend identifier.
pub fn backend_display_name(backend: &str) -> String {
    match backend {
        "prophet" => "Prophet".to_string(),
        "arima" => "ARIMA".to_string(),
        other => title_case(other),
    }
}

fn month_label(point: &MonthlyPoint) -> String {
    point.period_start.format("%Y-%m").to_string()
}

/// `"{KPI} for {Segment} — {label}: YYYY-MM: v.vv, ..."`
pub fn query_summary(kpi: &str, segment: &str, selection: &PeriodSelection) -> String {
    let values = selection
        .subset
        .points()
        .iter()
        .map(|p| format!("{}: {:.2}", month_label(p), p.value))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} for {} \u{2014} {}: {}",
        kpi.to_uppercase(),
        title_case(segment),
        selection.label,
        values
    )
}

/// Reply when a period matched no data; quotes the latest observation.
pub fn no_period_data(latest: &MonthlyPoint) -> String {
    format!(
        "I do not have data for the requested period. Latest value: {:.2} on {}.",
        latest.value,
        month_label(latest)
    )
}

/// Header plus one line per forecast month.
pub fn forecast_summary(kpi: &str, segment: &str, result: &ForecastResult) -> String {
    let horizon = result.horizon();
    let mut lines = Vec::with_capacity(horizon + 1);
    lines.push(format!(
        "{} forecast for {} in the {} segment ({} month{}):",
        backend_display_name(result.backend()),
        kpi.to_uppercase(),
        title_case(segment),
        horizon,
        if horizon > 1 { "s" } else { "" }
    ));
    lines.extend(result.points().iter().map(|p| {
        format!(
            "{}: yhat={:.2} ({} [{:.2}, {:.2}])",
            p.period_start.format("%Y-%m"),
            p.point_estimate,
            INTERVAL_LABEL,
            p.lower_bound,
            p.upper_bound
        )
    }));
    lines.join("\n")
}

/// Note appended when a forecast was computed for fewer months than asked.
pub fn horizon_capped(requested: usize, horizon: usize) -> String {
    format!("Forecasts are limited to {horizon} months; {requested} were requested.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Forecast, MonthlySeries};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("enterprise"), "Enterprise");
        assert_eq!(title_case("small business"), "Small Business");
        assert_eq!(title_case("SMB"), "Smb");
        assert_eq!(title_case("b2b"), "B2B");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn query_lists_every_month() {
        let subset = MonthlySeries::consecutive(date(2024, 5), &[10.0, 12.346]);
        let selection = PeriodSelection::new(subset, "last 2 period(s)");
        assert_eq!(
            query_summary("revenue", "enterprise", &selection),
            "REVENUE for Enterprise \u{2014} last 2 period(s): 2024-05: 10.00, 2024-06: 12.35"
        );
    }

    #[test]
    fn no_period_data_quotes_latest() {
        let latest = MonthlyPoint::new(date(2024, 8), 41.5);
        assert_eq!(
            no_period_data(&latest),
            "I do not have data for the requested period. Latest value: 41.50 on 2024-08."
        );
    }

    #[test]
    fn forecast_lines_use_fixed_label() {
        let forecast = Forecast::from_values_with_intervals(
            vec![100.0, 101.0],
            vec![90.0, 89.5],
            vec![110.0, 112.25],
        );
        let result = ForecastResult::from_forecast("prophet", 0.95, date(2024, 12), &forecast).unwrap();
        assert_eq!(
            forecast_summary("churn", "mid market", &result),
            "Prophet forecast for CHURN in the Mid Market segment (2 months):\n\
             2025-01: yhat=100.00 (80% [90.00, 110.00])\n\
             2025-02: yhat=101.00 (80% [89.50, 112.25])"
        );
    }

    #[test]
    fn single_month_is_singular() {
        let forecast = Forecast::from_values_with_intervals(vec![5.0], vec![4.0], vec![6.0]);
        let result = ForecastResult::from_forecast("arima", 0.8, date(2024, 3), &forecast).unwrap();
        let text = forecast_summary("nps", "smb", &result);
        assert!(text.starts_with("ARIMA forecast for NPS in the Smb segment (1 month):"));
    }

    #[test]
    fn capped_horizon_note() {
        assert_eq!(
            horizon_capped(200, 120),
            "Forecasts are limited to 120 months; 200 were requested."
        );
    }

    #[test]
    fn unknown_backends_are_title_cased() {
        assert_eq!(backend_display_name("theta"), "Theta");
    }
}
