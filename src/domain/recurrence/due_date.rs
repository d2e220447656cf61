//! Due date rules and their resolution against a framed window.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar;
use super::{ClampContext, ClampedDateWarning, CycleWindow, RecurrenceError};

/// Unit of a relative due-date offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    Days,
    Weeks,
    Months,
}

/// Which window edge a relative offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetAnchor {
    PeriodStart,
    PeriodEnd,
}

/// How a due date is derived.
///
/// Deserialization tries the exact form first, so a record that carries both
/// an `exact_date` and offset fields resolves to the exact date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DueDateRule {
    Exact {
        exact_date: NaiveDate,
    },
    Offset {
        offset_type: OffsetUnit,
        offset_value: i64,
        anchored_to: OffsetAnchor,
    },
}

impl DueDateRule {
    pub fn exact(exact_date: NaiveDate) -> Self {
        DueDateRule::Exact { exact_date }
    }

    pub fn offset(offset_type: OffsetUnit, offset_value: i64, anchored_to: OffsetAnchor) -> Self {
        DueDateRule::Offset {
            offset_type,
            offset_value,
            anchored_to,
        }
    }

    pub fn validate(&self) -> Result<(), RecurrenceError> {
        match self {
            DueDateRule::Offset { offset_value, .. } if *offset_value < 0 => {
                Err(RecurrenceError::InvalidOffset {
                    value: *offset_value,
                })
            }
            _ => Ok(()),
        }
    }
}

/// A resolved due date plus any clamp that happened on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateResolution {
    pub date: NaiveDate,
    pub warning: Option<ClampedDateWarning>,
}

/// Resolves `rule` against `window`.
pub fn resolve(window: &CycleWindow, rule: &DueDateRule) -> Result<NaiveDate, RecurrenceError> {
    resolve_detailed(window, rule, ClampContext::WorkDueDate).map(|resolution| resolution.date)
}

/// Like [`resolve`], also reporting a clamped month offset under `context`.
pub fn resolve_detailed(
    window: &CycleWindow,
    rule: &DueDateRule,
    context: ClampContext,
) -> Result<DueDateResolution, RecurrenceError> {
    rule.validate()?;

    let (unit, value, anchored_to) = match rule {
        DueDateRule::Exact { exact_date } => {
            return Ok(DueDateResolution {
                date: *exact_date,
                warning: None,
            })
        }
        DueDateRule::Offset {
            offset_type,
            offset_value,
            anchored_to,
        } => (*offset_type, *offset_value, *anchored_to),
    };

    let anchor = match anchored_to {
        OffsetAnchor::PeriodStart => window.start,
        OffsetAnchor::PeriodEnd => window.end,
    };
    let overflow = || RecurrenceError::out_of_range(anchor);
    let amount = u64::try_from(value).map_err(|_| RecurrenceError::InvalidOffset { value })?;

    match unit {
        OffsetUnit::Days => Ok(DueDateResolution {
            date: calendar::add_days(anchor, amount).ok_or_else(overflow)?,
            warning: None,
        }),
        OffsetUnit::Weeks => {
            let days = amount.checked_mul(7).ok_or_else(overflow)?;
            Ok(DueDateResolution {
                date: calendar::add_days(anchor, days).ok_or_else(overflow)?,
                warning: None,
            })
        }
        OffsetUnit::Months => {
            let shifted =
                calendar::add_months(anchor, value, anchor.day()).ok_or_else(overflow)?;
            Ok(DueDateResolution {
                date: shifted.date,
                warning: shifted
                    .was_clamped()
                    .then(|| ClampedDateWarning::new(context, shifted.requested_day, shifted.date)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn february() -> CycleWindow {
        CycleWindow::new(date(2025, 2, 10), date(2025, 3, 10))
    }

    #[test]
    fn days_after_period_end() {
        let rule = DueDateRule::offset(OffsetUnit::Days, 10, OffsetAnchor::PeriodEnd);
        assert_eq!(resolve(&february(), &rule).unwrap(), date(2025, 3, 20));
    }

    #[test]
    fn weeks_after_period_start() {
        let rule = DueDateRule::offset(OffsetUnit::Weeks, 2, OffsetAnchor::PeriodStart);
        assert_eq!(resolve(&february(), &rule).unwrap(), date(2025, 2, 24));
    }

    #[test]
    fn zero_offset_is_the_anchor() {
        let rule = DueDateRule::offset(OffsetUnit::Days, 0, OffsetAnchor::PeriodStart);
        assert_eq!(resolve(&february(), &rule).unwrap(), date(2025, 2, 10));
    }

    #[test]
    fn months_clamp_and_warn() {
        let window = CycleWindow::new(date(2025, 1, 1), date(2025, 1, 31));
        let rule = DueDateRule::offset(OffsetUnit::Months, 1, OffsetAnchor::PeriodEnd);
        let resolution = resolve_detailed(&window, &rule, ClampContext::TaskDueDate).unwrap();
        assert_eq!(resolution.date, date(2025, 2, 28));
        let warning = resolution.warning.unwrap();
        assert_eq!(warning.context, ClampContext::TaskDueDate);
        assert_eq!(warning.requested_day, 31);
    }

    #[test]
    fn months_without_clamp_have_no_warning() {
        let rule = DueDateRule::offset(OffsetUnit::Months, 1, OffsetAnchor::PeriodStart);
        let resolution = resolve_detailed(&february(), &rule, ClampContext::WorkDueDate).unwrap();
        assert_eq!(resolution.date, date(2025, 3, 10));
        assert!(resolution.warning.is_none());
    }

    #[test]
    fn exact_date_ignores_window() {
        let rule = DueDateRule::exact(date(2025, 12, 31));
        assert_eq!(resolve(&february(), &rule).unwrap(), date(2025, 12, 31));
    }

    #[test]
    fn negative_offset_is_rejected() {
        let rule = DueDateRule::offset(OffsetUnit::Days, -5, OffsetAnchor::PeriodEnd);
        assert_eq!(
            resolve(&february(), &rule),
            Err(RecurrenceError::InvalidOffset { value: -5 })
        );
    }

    #[test]
    fn exact_date_wins_when_both_forms_present() {
        let json = r#"{
            "exact_date": "2025-04-15",
            "offset_type": "days",
            "offset_value": 10,
            "anchored_to": "period_end"
        }"#;
        let rule: DueDateRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, DueDateRule::exact(date(2025, 4, 15)));
    }

    #[test]
    fn non_integer_offset_does_not_decode() {
        let json = r#"{"offset_type": "days", "offset_value": 2.5, "anchored_to": "period_end"}"#;
        assert!(serde_json::from_str::<DueDateRule>(json).is_err());
    }

    #[test]
    fn huge_offset_reports_out_of_range() {
        let rule = DueDateRule::offset(OffsetUnit::Weeks, i64::MAX, OffsetAnchor::PeriodEnd);
        assert!(matches!(
            resolve(&february(), &rule),
            Err(RecurrenceError::DateOutOfRange { .. })
        ));
    }
}
