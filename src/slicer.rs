//! Series slicing: raw observations to a monthly series for one (KPI, segment).
//!
//! Several readings in the same calendar month collapse to their mean so the
//! resulting series stays regular for forecasting.

use crate::core::{month_start, normalize_identifier, MonthlyPoint, MonthlySeries, Observation};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Select the observations for `kpi`/`segment` and average them per month.
///
/// Matching is case-insensitive. No match yields an empty series. Non-finite
/// readings are skipped.
pub fn slice_series(observations: &[Observation], kpi: &str, segment: &str) -> MonthlySeries {
    let kpi = normalize_identifier(kpi);
    let segment = normalize_identifier(segment);

    // month -> (sum, count)
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for obs in observations
        .iter()
        .filter(|o| o.matches(&kpi, &segment))
        .filter(|o| o.value().is_finite())
    {
        let bucket = buckets.entry(month_start(obs.date())).or_insert((0.0, 0));
        bucket.0 += obs.value();
        bucket.1 += 1;
    }

    let points: Vec<MonthlyPoint> = buckets
        .into_iter()
        .map(|(month, (sum, count))| MonthlyPoint::new(month, sum / count as f64))
        .collect();

    tracing::debug!(kpi = %kpi, segment = %segment, months = points.len(), "sliced series");

    // BTreeMap keys are unique month starts in ascending order.
    MonthlySeries::new(points).unwrap_or_default()
}
