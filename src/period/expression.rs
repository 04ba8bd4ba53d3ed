//! Parsing of the individual period phrase shapes.
//!
//! Every parser takes an already trimmed, lowercased expression.

use chrono::{DateTime, NaiveDate};

/// Keywords for "year to date".
pub const YEAR_TO_DATE: [&str; 2] = ["ytd", "year to date"];
/// Keywords for "month to date".
pub const MONTH_TO_DATE: [&str; 2] = ["mtd", "month to date"];
/// Keywords for "quarter to date".
pub const QUARTER_TO_DATE: [&str; 2] = ["qtd", "quarter to date"];

/// Number of trailing months requested by a "last N unit(s)" phrase.
///
/// Returns `None` when the phrase has no `last` token. `N` is the first
/// integer token (absent or zero means 1); quarters count as 3 months and
/// years as 12. The result is never below 1.
pub fn parse_last_period(expression: &str) -> Option<usize> {
    let tokens: Vec<&str> = expression.split_whitespace().collect();
    if !tokens.contains(&"last") {
        return None;
    }

    let count = tokens
        .iter()
        .find_map(|t| t.parse::<i64>().ok())
        .filter(|&n| n != 0)
        .unwrap_or(1);

    let has = |words: [&str; 2]| tokens.iter().any(|t| words.contains(t));
    let multiplier = if has(["quarter", "quarters"]) {
        3
    } else if has(["year", "years"]) {
        12
    } else {
        1
    };

    Some(count.saturating_mul(multiplier).max(1) as usize)
}

/// Result of inspecting an expression for the `YYYY-Qn` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterLiteral {
    /// Not a quarter literal at all.
    NotQuarter,
    /// Looks like `YYYY-Q...` but the quarter is not 1-4.
    Malformed,
    /// A valid year and quarter.
    Quarter { year: i32, quarter: u32 },
}

/// Recognize `YYYY-Qn` (the expression is lowercase, so `yyyy-qn`).
pub fn parse_quarter_literal(expression: &str) -> QuarterLiteral {
    let Some((year, quarter)) = expression.split_once("-q") else {
        return QuarterLiteral::NotQuarter;
    };
    let year = year.trim();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return QuarterLiteral::NotQuarter;
    }
    match (year.parse::<i32>(), quarter.trim().parse::<u32>()) {
        (Ok(year), Ok(quarter)) if (1..=4).contains(&quarter) => {
            QuarterLiteral::Quarter { year, quarter }
        }
        _ => QuarterLiteral::Malformed,
    }
}

const FULL_DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y-%m-%dt%H:%M:%S",
];

/// Parse a calendar date in one of the accepted shapes.
///
/// Shapes without a day resolve to the first of the month, a bare year to
/// January 1st.
pub fn parse_calendar_date(expression: &str) -> Option<NaiveDate> {
    let s = expression.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return match s.len() {
            4 => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
            8 => NaiveDate::from_ymd_opt(
                s[..4].parse().ok()?,
                s[4..6].parse().ok()?,
                s[6..].parse().ok()?,
            ),
            _ => None,
        };
    }

    for format in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // Month-only shapes: pin the day to the 1st and reuse the full formats.
    let month_only = [
        (format!("{s}-01"), "%Y-%m-%d"),
        (format!("{s}/01"), "%Y/%m/%d"),
        (format!("01 {s}"), "%d %B %Y"),
        (format!("01 {s}"), "%d %b %Y"),
    ];
    for (candidate, format) in &month_only {
        if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(&s.to_uppercase())
        .ok()
        .map(|dt| dt.date_naive())
}
