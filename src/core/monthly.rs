//! Regular monthly series and the calendar arithmetic around it.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a month-start date by `months` (may be negative).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month0 = index.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// Signed number of whole months from `from` to `to`, ignoring the day.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Calendar quarter (1-4) of a month number (1-12).
pub fn quarter_of(month: u32) -> u32 {
    (month.saturating_sub(1)) / 3 + 1
}

/// One aggregated value for a calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyPoint {
    pub period_start: NaiveDate,
    pub value: f64,
}

impl MonthlyPoint {
    pub fn new(period_start: NaiveDate, value: f64) -> Self {
        Self {
            period_start,
            value,
        }
    }

    pub fn year(&self) -> i32 {
        self.period_start.year()
    }

    pub fn month(&self) -> u32 {
        self.period_start.month()
    }
}

/// A monthly series: at most one point per calendar month, strictly
/// increasing by `period_start`. Missing months are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    /// Create a series, validating ordering and month alignment.
    pub fn new(points: Vec<MonthlyPoint>) -> Result<Self> {
        for point in &points {
            if point.period_start.day() != 1 {
                return Err(Error::TimestampError(format!(
                    "{} is not the first day of a month",
                    point.period_start
                )));
            }
        }
        for pair in points.windows(2) {
            if pair[1].period_start <= pair[0].period_start {
                return Err(Error::TimestampError(
                    "months must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { points })
    }

    /// Create an empty series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build consecutive months starting at `start` (any day in that month).
    pub fn consecutive(start: NaiveDate, values: &[f64]) -> Self {
        let first = month_start(start);
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| MonthlyPoint::new(add_months(first, i as i32), value))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[MonthlyPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&MonthlyPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&MonthlyPoint> {
        self.points.last()
    }

    /// Values in month order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// The trailing `k` points (all of them if the series is shorter).
    pub fn tail(&self, k: usize) -> MonthlySeries {
        let start = self.points.len().saturating_sub(k);
        Self {
            points: self.points[start..].to_vec(),
        }
    }

    /// The points satisfying `predicate`, in order.
    pub fn filter<P>(&self, mut predicate: P) -> MonthlySeries
    where
        P: FnMut(&MonthlyPoint) -> bool,
    {
        Self {
            points: self.points.iter().copied().filter(|p| predicate(p)).collect(),
        }
    }

    /// Number of calendar months from the first to the last point, inclusive.
    pub fn month_span(&self) -> usize {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => {
                months_between(first.period_start, last.period_start) as usize + 1
            }
            _ => 0,
        }
    }

    /// Whether any calendar month between the first and last point is missing.
    pub fn has_gaps(&self) -> bool {
        self.month_span() > self.len()
    }

    /// Values laid out on a gap-free monthly grid; missing months are NaN.
    pub fn regular_values(&self) -> Vec<f64> {
        let Some(first) = self.first() else {
            return Vec::new();
        };
        let mut grid = vec![f64::NAN; self.month_span()];
        for point in &self.points {
            let offset = months_between(first.period_start, point.period_start) as usize;
            grid[offset] = point.value;
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_arithmetic_crosses_year_boundaries() {
        assert_eq!(add_months(date(2024, 11, 1), 3), date(2025, 2, 1));
        assert_eq!(add_months(date(2024, 1, 1), -1), date(2023, 12, 1));
        assert_eq!(months_between(date(2023, 12, 1), date(2024, 2, 1)), 2);
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn quarters_follow_calendar() {
        assert_eq!(quarter_of(1), 1);
        assert_eq!(quarter_of(3), 1);
        assert_eq!(quarter_of(4), 2);
        assert_eq!(quarter_of(12), 4);
    }

    #[test]
    fn series_rejects_unordered_or_misaligned_points() {
        let unordered = vec![
            MonthlyPoint::new(date(2024, 2, 1), 1.0),
            MonthlyPoint::new(date(2024, 1, 1), 2.0),
        ];
        assert!(matches!(
            MonthlySeries::new(unordered),
            Err(Error::TimestampError(_))
        ));

        let misaligned = vec![MonthlyPoint::new(date(2024, 2, 3), 1.0)];
        assert!(MonthlySeries::new(misaligned).is_err());
    }

    #[test]
    fn tail_and_filter_return_subsets() {
        let series = MonthlySeries::consecutive(date(2024, 1, 1), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(series.tail(2).values(), vec![3.0, 4.0]);
        assert_eq!(series.tail(10).len(), 4);
        let odd = series.filter(|p| p.month() % 2 == 1);
        assert_eq!(odd.values(), vec![1.0, 3.0]);
    }

    #[test]
    fn regular_values_mark_missing_months() {
        let series = MonthlySeries::new(vec![
            MonthlyPoint::new(date(2024, 1, 1), 1.0),
            MonthlyPoint::new(date(2024, 4, 1), 4.0),
        ])
        .unwrap();
        assert!(series.has_gaps());
        assert_eq!(series.month_span(), 4);
        let grid = series.regular_values();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0], 1.0);
        assert!(grid[1].is_nan() && grid[2].is_nan());
        assert_eq!(grid[3], 4.0);
    }

    #[test]
    fn empty_series_has_no_span() {
        let series = MonthlySeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.month_span(), 0);
        assert!(series.regular_values().is_empty());
    }
}
