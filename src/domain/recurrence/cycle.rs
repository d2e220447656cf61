//! Cycle anchor resolution: turning a recurrence definition into concrete
//! `[start, end)` windows.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::calendar;
use super::{ClampContext, ClampedDateWarning, RecurrenceDefinition, RecurrenceError};

/// One realised cycle: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CycleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CycleWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Start-inclusive, end-exclusive membership.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// A validated cadence, stripped of the fields its frequency ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Daily,
    Weekly(Weekday),
    Months {
        length: i64,
        start_month: u32,
        day: u32,
    },
}

impl Cadence {
    fn from_definition(recurrence: &RecurrenceDefinition) -> Result<Self, RecurrenceError> {
        recurrence.validate()?;
        let anchor = &recurrence.anchor;
        let missing = || RecurrenceError::invalid_config("anchor fields missing");

        let cadence = match recurrence.frequency.cycle_months() {
            None if recurrence.frequency.requires_weekday() => {
                Cadence::Weekly(anchor.weekday.ok_or_else(missing)?.to_chrono())
            }
            None => Cadence::Daily,
            Some(length) => Cadence::Months {
                length: i64::from(length),
                start_month: if recurrence.frequency.requires_start_month() {
                    anchor.start_month.ok_or_else(missing)?
                } else {
                    1
                },
                day: anchor.day_of_month.ok_or_else(missing)?,
            },
        };
        Ok(cadence)
    }

    fn window_containing(&self, date: NaiveDate) -> Result<CycleWindow, RecurrenceError> {
        let overflow = || RecurrenceError::out_of_range(date);
        match *self {
            Cadence::Daily => {
                let end = calendar::add_days(date, 1).ok_or_else(overflow)?;
                Ok(CycleWindow::new(date, end))
            }
            Cadence::Weekly(weekday) => {
                let back = (date.weekday().num_days_from_monday() + 7
                    - weekday.num_days_from_monday())
                    % 7;
                let start = calendar::sub_days(date, u64::from(back)).ok_or_else(overflow)?;
                let end = calendar::add_days(start, 7).ok_or_else(overflow)?;
                Ok(CycleWindow::new(start, end))
            }
            Cadence::Months {
                length,
                start_month,
                day,
            } => {
                let index = calendar::month_index(date);
                let aligned = i64::from(start_month) - 1;
                let mut start_index = index - (index - aligned).rem_euclid(length);
                let mut start = calendar::from_month_index(start_index, day)
                    .ok_or_else(overflow)?
                    .date;
                // The aligned month's anchor day may still lie ahead of `date`.
                if start > date {
                    start_index -= length;
                    start = calendar::from_month_index(start_index, day)
                        .ok_or_else(overflow)?
                        .date;
                }
                let end = calendar::from_month_index(start_index + length, day)
                    .ok_or_else(overflow)?
                    .date;
                Ok(CycleWindow::new(start, end))
            }
        }
    }

    fn next_window(&self, window: &CycleWindow) -> Result<CycleWindow, RecurrenceError> {
        self.window_containing(window.end)
    }

    fn previous_window(&self, window: &CycleWindow) -> Result<CycleWindow, RecurrenceError> {
        let day_before =
            calendar::sub_days(window.start, 1).ok_or(RecurrenceError::out_of_range(window.start))?;
        self.window_containing(day_before)
    }

    fn anchor_day(&self) -> Option<u32> {
        match self {
            Cadence::Months { day, .. } => Some(*day),
            _ => None,
        }
    }
}

/// Lazy, finite, restartable sequence of cycle windows.
///
/// Cloning the iterator restarts from the clone point.
#[derive(Debug, Clone)]
pub struct CycleBoundaries {
    cadence: Cadence,
    next: Option<CycleWindow>,
    remaining: usize,
    last_start: Option<NaiveDate>,
}

impl Iterator for CycleBoundaries {
    type Item = CycleWindow;

    fn next(&mut self) -> Option<CycleWindow> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next.take()?;
        if self.last_start.is_some_and(|last| current.start > last) {
            return None;
        }
        self.remaining -= 1;
        self.next = self.cadence.next_window(&current).ok();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next.is_none() {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

/// Produces up to `count` consecutive windows, starting with the window that
/// contains `max(from_date, effective_start_date)` and stopping before any
/// window that would start after `effective_end_date`.
///
/// Windows are strictly increasing and contiguous (`w[i].end == w[i+1].start`).
pub fn compute_cycle_boundaries(
    recurrence: &RecurrenceDefinition,
    from_date: NaiveDate,
    count: usize,
) -> Result<CycleBoundaries, RecurrenceError> {
    let cadence = Cadence::from_definition(recurrence)?;
    let from = from_date.max(recurrence.effective_start_date);
    let past_end = recurrence.effective_end_date.is_some_and(|end| from > end);
    let first = if past_end {
        None
    } else {
        Some(cadence.window_containing(from)?)
    };

    Ok(CycleBoundaries {
        cadence,
        next: first,
        remaining: count,
        last_start: recurrence.effective_end_date,
    })
}

/// The window of `recurrence` that contains `date`, ignoring the effective
/// range.
pub fn window_containing(
    recurrence: &RecurrenceDefinition,
    date: NaiveDate,
) -> Result<CycleWindow, RecurrenceError> {
    Cadence::from_definition(recurrence)?.window_containing(date)
}

/// The window immediately after `window`.
pub fn next_window(
    recurrence: &RecurrenceDefinition,
    window: &CycleWindow,
) -> Result<CycleWindow, RecurrenceError> {
    Cadence::from_definition(recurrence)?.next_window(window)
}

/// The window immediately before `window`.
pub fn previous_window(
    recurrence: &RecurrenceDefinition,
    window: &CycleWindow,
) -> Result<CycleWindow, RecurrenceError> {
    Cadence::from_definition(recurrence)?.previous_window(window)
}

/// Reports when a month-based window start was pulled back to a month's
/// last day.
pub fn window_clamp_warning(
    recurrence: &RecurrenceDefinition,
    window: &CycleWindow,
    context: ClampContext,
) -> Option<ClampedDateWarning> {
    let day = Cadence::from_definition(recurrence).ok()?.anchor_day()?;
    (window.start.day() != day).then(|| ClampedDateWarning::new(context, day, window.start))
}
