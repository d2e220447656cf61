//! Period framing: choosing the one window a reference date and policy
//! point at.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cycle::{compute_cycle_boundaries, previous_window, window_containing};
use super::{CycleWindow, RecurrenceDefinition, RecurrenceError};

/// Which cycle, relative to the reference date, is "the" target period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodFramingPolicy {
    PreviousPeriod,
    #[default]
    CurrentPeriod,
    NextPeriod,
}

impl PeriodFramingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodFramingPolicy::PreviousPeriod => "previous_period",
            PeriodFramingPolicy::CurrentPeriod => "current_period",
            PeriodFramingPolicy::NextPeriod => "next_period",
        }
    }
}

impl fmt::Display for PeriodFramingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects one window from an ordered, contiguous sequence.
///
/// The current window is the one with `start <= reference < end`; the
/// previous/next policies take its direct neighbour in `windows`.
pub fn select_framed_period<I>(
    windows: I,
    reference: NaiveDate,
    policy: PeriodFramingPolicy,
) -> Result<CycleWindow, RecurrenceError>
where
    I: IntoIterator<Item = CycleWindow>,
{
    let mut windows = windows.into_iter();
    let mut previous: Option<CycleWindow> = None;

    while let Some(window) = windows.next() {
        if previous.is_none() && reference < window.start {
            return Err(RecurrenceError::unresolved(
                reference,
                "reference date precedes the first window",
            ));
        }

        if window.contains(reference) {
            return match policy {
                PeriodFramingPolicy::CurrentPeriod => Ok(window),
                PeriodFramingPolicy::PreviousPeriod => previous.ok_or_else(|| {
                    RecurrenceError::unresolved(reference, "no window precedes the current one")
                }),
                PeriodFramingPolicy::NextPeriod => windows.next().ok_or_else(|| {
                    RecurrenceError::unresolved(reference, "no window follows the current one")
                }),
            };
        }

        previous = Some(window);
    }

    Err(RecurrenceError::unresolved(
        reference,
        "no window contains the reference date",
    ))
}

/// Frames the target window for `recurrence` directly.
///
/// Reference dates outside the effective range are unresolved, as is a
/// previous period before the first effective window or a next period past
/// the effective end.
pub fn frame_period(
    recurrence: &RecurrenceDefinition,
    reference: NaiveDate,
    policy: PeriodFramingPolicy,
) -> Result<CycleWindow, RecurrenceError> {
    recurrence.validate()?;

    if !recurrence.is_effective_on(reference) {
        let range = match recurrence.effective_end_date {
            Some(end) => format!("{}..={}", recurrence.effective_start_date, end),
            None => format!("{}..", recurrence.effective_start_date),
        };
        return Err(RecurrenceError::unresolved(
            reference,
            format!("reference date is outside the effective range {}", range),
        ));
    }

    // Start one window early so the previous policy has a neighbour; the
    // boundary sequence itself clips at the effective start.
    let current = window_containing(recurrence, reference)?;
    let from = match previous_window(recurrence, &current) {
        Ok(window) => window.start,
        Err(_) => current.start,
    };
    let windows = compute_cycle_boundaries(recurrence, from, 3)?;

    select_framed_period(windows, reference, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recurrence::AnchorWeekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn windows() -> Vec<CycleWindow> {
        vec![
            CycleWindow::new(date(2025, 1, 1), date(2025, 2, 1)),
            CycleWindow::new(date(2025, 2, 1), date(2025, 3, 1)),
            CycleWindow::new(date(2025, 3, 1), date(2025, 4, 1)),
        ]
    }

    #[test]
    fn current_is_start_inclusive_end_exclusive() {
        let framed =
            select_framed_period(windows(), date(2025, 2, 1), PeriodFramingPolicy::CurrentPeriod)
                .unwrap();
        assert_eq!(framed.start, date(2025, 2, 1));
    }

    #[test]
    fn previous_and_next_pick_neighbours() {
        let reference = date(2025, 2, 14);
        assert_eq!(
            select_framed_period(windows(), reference, PeriodFramingPolicy::PreviousPeriod)
                .unwrap()
                .start,
            date(2025, 1, 1)
        );
        assert_eq!(
            select_framed_period(windows(), reference, PeriodFramingPolicy::NextPeriod)
                .unwrap()
                .start,
            date(2025, 3, 1)
        );
    }

    #[test]
    fn reference_before_first_window_is_unresolved() {
        let result =
            select_framed_period(windows(), date(2024, 12, 31), PeriodFramingPolicy::CurrentPeriod);
        assert!(matches!(
            result,
            Err(RecurrenceError::UnresolvedPeriod { .. })
        ));
    }

    #[test]
    fn missing_neighbours_are_unresolved() {
        assert!(select_framed_period(
            windows(),
            date(2025, 1, 5),
            PeriodFramingPolicy::PreviousPeriod
        )
        .is_err());
        assert!(select_framed_period(
            windows(),
            date(2025, 3, 5),
            PeriodFramingPolicy::NextPeriod
        )
        .is_err());
        assert!(select_framed_period(
            windows(),
            date(2025, 4, 1),
            PeriodFramingPolicy::CurrentPeriod
        )
        .is_err());
    }

    #[test]
    fn monthly_previous_period_scenario() {
        let def = RecurrenceDefinition::monthly(10, date(2024, 1, 1));
        let framed =
            frame_period(&def, date(2025, 3, 15), PeriodFramingPolicy::PreviousPeriod).unwrap();
        assert_eq!(framed, CycleWindow::new(date(2025, 2, 10), date(2025, 3, 10)));
    }

    #[test]
    fn weekly_current_period_scenario() {
        let def = RecurrenceDefinition::weekly(AnchorWeekday::Monday, date(2025, 1, 1));
        let framed =
            frame_period(&def, date(2025, 6, 11), PeriodFramingPolicy::CurrentPeriod).unwrap();
        assert_eq!(framed, CycleWindow::new(date(2025, 6, 9), date(2025, 6, 16)));
    }

    #[test]
    fn reference_before_effective_start_is_unresolved() {
        let def = RecurrenceDefinition::monthly(1, date(2025, 3, 15));
        let result = frame_period(&def, date(2025, 3, 14), PeriodFramingPolicy::CurrentPeriod);
        assert!(matches!(
            result,
            Err(RecurrenceError::UnresolvedPeriod { .. })
        ));
    }

    #[test]
    fn previous_of_first_effective_window_is_unresolved() {
        let def = RecurrenceDefinition::monthly(1, date(2025, 3, 15));
        let result = frame_period(&def, date(2025, 3, 20), PeriodFramingPolicy::PreviousPeriod);
        assert!(result.is_err());
        assert_eq!(
            frame_period(&def, date(2025, 4, 2), PeriodFramingPolicy::PreviousPeriod).unwrap(),
            CycleWindow::new(date(2025, 3, 1), date(2025, 4, 1))
        );
    }

    #[test]
    fn next_past_effective_end_is_unresolved() {
        let def = RecurrenceDefinition::monthly(1, date(2025, 1, 1)).with_end_date(date(2025, 3, 31));
        assert!(frame_period(&def, date(2025, 3, 10), PeriodFramingPolicy::NextPeriod).is_err());
        assert!(frame_period(&def, date(2025, 4, 1), PeriodFramingPolicy::CurrentPeriod).is_err());
        assert_eq!(
            frame_period(&def, date(2025, 2, 10), PeriodFramingPolicy::NextPeriod).unwrap(),
            CycleWindow::new(date(2025, 3, 1), date(2025, 4, 1))
        );
    }

    #[test]
    fn invalid_recurrence_surfaces_before_framing() {
        let mut def = RecurrenceDefinition::quarterly(4, 1, date(2025, 1, 1));
        def.anchor.start_month = None;
        assert!(matches!(
            frame_period(&def, date(2025, 5, 1), PeriodFramingPolicy::CurrentPeriod),
            Err(RecurrenceError::InvalidRecurrenceConfig { .. })
        ));
    }
}
