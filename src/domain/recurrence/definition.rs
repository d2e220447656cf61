//! Recurrence definitions: cadence, anchors and effective range.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RecurrenceError;

/// How often a piece of work recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl Frequency {
    /// Cycle length in calendar months, `None` for day-based cadences.
    pub fn cycle_months(&self) -> Option<u32> {
        match self {
            Frequency::Daily | Frequency::Weekly => None,
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::HalfYearly => Some(6),
            Frequency::Yearly => Some(12),
        }
    }

    pub fn requires_weekday(&self) -> bool {
        matches!(self, Frequency::Weekly)
    }

    pub fn requires_day_of_month(&self) -> bool {
        self.cycle_months().is_some()
    }

    pub fn requires_start_month(&self) -> bool {
        matches!(
            self,
            Frequency::Quarterly | Frequency::HalfYearly | Frequency::Yearly
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::HalfYearly => "half_yearly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week a weekly cycle starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorWeekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl AnchorWeekday {
    pub fn to_chrono(self) -> Weekday {
        match self {
            AnchorWeekday::Monday => Weekday::Mon,
            AnchorWeekday::Tuesday => Weekday::Tue,
            AnchorWeekday::Wednesday => Weekday::Wed,
            AnchorWeekday::Thursday => Weekday::Thu,
            AnchorWeekday::Friday => Weekday::Fri,
            AnchorWeekday::Saturday => Weekday::Sat,
            AnchorWeekday::Sunday => Weekday::Sun,
        }
    }
}

/// Anchor fields fixing where cycles begin.
///
/// Which fields matter depends on the frequency; unused ones are ignored.
/// The same shape doubles as a task-level override, where every unset field
/// falls back to the parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleAnchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<AnchorWeekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u32>,
}

impl CycleAnchor {
    pub fn weekday(weekday: AnchorWeekday) -> Self {
        Self {
            weekday: Some(weekday),
            ..Self::default()
        }
    }

    pub fn day_of_month(day: u32) -> Self {
        Self {
            day_of_month: Some(day),
            ..Self::default()
        }
    }

    pub fn month_and_day(start_month: u32, day: u32) -> Self {
        Self {
            day_of_month: Some(day),
            start_month: Some(start_month),
            ..Self::default()
        }
    }

    /// Field-wise fallback: fields set on `self` win, the rest come from
    /// `parent`.
    pub fn or(&self, parent: &CycleAnchor) -> CycleAnchor {
        CycleAnchor {
            weekday: self.weekday.or(parent.weekday),
            day_of_month: self.day_of_month.or(parent.day_of_month),
            start_month: self.start_month.or(parent.start_month),
        }
    }
}

/// A complete recurrence definition for one work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceDefinition {
    pub frequency: Frequency,
    #[serde(flatten)]
    pub anchor: CycleAnchor,
    pub effective_start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_end_date: Option<NaiveDate>,
}

impl RecurrenceDefinition {
    pub fn new(frequency: Frequency, anchor: CycleAnchor, effective_start_date: NaiveDate) -> Self {
        Self {
            frequency,
            anchor,
            effective_start_date,
            effective_end_date: None,
        }
    }

    pub fn daily(effective_start_date: NaiveDate) -> Self {
        Self::new(Frequency::Daily, CycleAnchor::default(), effective_start_date)
    }

    pub fn weekly(weekday: AnchorWeekday, effective_start_date: NaiveDate) -> Self {
        Self::new(
            Frequency::Weekly,
            CycleAnchor::weekday(weekday),
            effective_start_date,
        )
    }

    pub fn monthly(day: u32, effective_start_date: NaiveDate) -> Self {
        Self::new(
            Frequency::Monthly,
            CycleAnchor::day_of_month(day),
            effective_start_date,
        )
    }

    pub fn quarterly(start_month: u32, day: u32, effective_start_date: NaiveDate) -> Self {
        Self::new(
            Frequency::Quarterly,
            CycleAnchor::month_and_day(start_month, day),
            effective_start_date,
        )
    }

    pub fn half_yearly(start_month: u32, day: u32, effective_start_date: NaiveDate) -> Self {
        Self::new(
            Frequency::HalfYearly,
            CycleAnchor::month_and_day(start_month, day),
            effective_start_date,
        )
    }

    pub fn yearly(start_month: u32, day: u32, effective_start_date: NaiveDate) -> Self {
        Self::new(
            Frequency::Yearly,
            CycleAnchor::month_and_day(start_month, day),
            effective_start_date,
        )
    }

    pub fn with_end_date(mut self, effective_end_date: NaiveDate) -> Self {
        self.effective_end_date = Some(effective_end_date);
        self
    }

    /// Checks that the anchor fields required by the frequency are present
    /// and in range, and that the effective range is ordered.
    pub fn validate(&self) -> Result<(), RecurrenceError> {
        if self.frequency.requires_weekday() && self.anchor.weekday.is_none() {
            return Err(RecurrenceError::invalid_config(format!(
                "{} recurrence requires a start weekday",
                self.frequency
            )));
        }

        if self.frequency.requires_day_of_month() {
            match self.anchor.day_of_month {
                None => {
                    return Err(RecurrenceError::invalid_config(format!(
                        "{} recurrence requires a start day of month",
                        self.frequency
                    )))
                }
                Some(day) if !(1..=31).contains(&day) => {
                    return Err(RecurrenceError::invalid_config(format!(
                        "start day of month must be between 1 and 31, got {}",
                        day
                    )))
                }
                Some(_) => {}
            }
        }

        if self.frequency.requires_start_month() {
            match self.anchor.start_month {
                None => {
                    return Err(RecurrenceError::invalid_config(format!(
                        "{} recurrence requires a start month",
                        self.frequency
                    )))
                }
                Some(month) if !(1..=12).contains(&month) => {
                    return Err(RecurrenceError::invalid_config(format!(
                        "start month must be between 1 and 12, got {}",
                        month
                    )))
                }
                Some(_) => {}
            }
        }

        if let Some(end) = self.effective_end_date {
            if end < self.effective_start_date {
                return Err(RecurrenceError::invalid_config(format!(
                    "effective end date {} is before effective start date {}",
                    end, self.effective_start_date
                )));
            }
        }

        Ok(())
    }

    /// True when `date` lies inside the effective range (both ends inclusive).
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_start_date
            && self.effective_end_date.map_or(true, |end| date <= end)
    }
}
