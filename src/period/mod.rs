//! Period resolution: map a free-form period phrase onto a monthly series.
//!
//! Resolution walks an ordered rule table (see [`rules::RULES`]):
//!
//! 1. empty series: nothing to select, `"no history available"`
//! 2. no phrase: the default window
//! 3. `ytd` / `year to date`
//! 4. `mtd` / `month to date`
//! 5. `qtd` / `quarter to date`
//! 6. `last N month(s)|quarter(s)|year(s)`
//! 7. `YYYY-Qn`
//! 8. a calendar date
//!
//! Rules 3-5 that select nothing hand over to the next rule; rules 7 and 8
//! go straight to the default window, the last `min(3, len)` months. The
//! returned label always describes the window actually used.

pub mod expression;
pub mod rules;

use crate::core::MonthlySeries;
use rules::{default_window, RuleOutcome, RULES};

/// A subset of a monthly series together with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSelection {
    pub subset: MonthlySeries,
    pub label: String,
}

impl PeriodSelection {
    pub fn new(subset: MonthlySeries, label: impl Into<String>) -> Self {
        Self {
            subset,
            label: label.into(),
        }
    }
}

/// Resolve `period` against `series`. Never fails.
pub fn resolve(series: &MonthlySeries, period: Option<&str>) -> PeriodSelection {
    let normalized = period
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty());
    let expression = normalized.as_deref();

    for rule in RULES {
        match rule.apply(series, expression) {
            RuleOutcome::Matched(selection) => {
                tracing::debug!(rule = rule.name(), label = %selection.label, "period resolved");
                return selection;
            }
            RuleOutcome::Fallthrough => continue,
            RuleOutcome::Default => {
                tracing::debug!(
                    rule = rule.name(),
                    period = expression.unwrap_or_default(),
                    "period not honoured, using default window"
                );
                return default_window(series);
            }
        }
    }

    default_window(series)
}
