//! Recurrence patterns and their derivation from a meeting date.
//!
//! The user picks one of five repeat kinds; everything else (weekday,
//! day-of-month, month) is derived from the meeting date, never chosen
//! independently. Each provider re-expresses the pattern in its own wire
//! vocabulary, so this module only carries the provider-neutral union.

use chrono::{Datelike, NaiveDate, Weekday};

/// The repeat kind as chosen in the scheduling form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    /// One-off meeting.
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatKind {
    /// Parses a form value into a repeat kind.
    ///
    /// Returns `None` for anything outside the five known kinds; callers
    /// must surface that as an explicit validation error rather than
    /// falling through.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Returns the wire name used by the video provider's repeat block.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// A concrete recurrence rule derived from a repeat kind and a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrencePattern {
    Daily {
        interval: u32,
    },
    Weekly {
        interval: u32,
        day_of_week: Weekday,
    },
    Monthly {
        interval: u32,
        day_of_month: u32,
    },
    Yearly {
        month: u32,
        day_of_month: u32,
    },
}

/// Derives the recurrence pattern for a repeat kind and meeting date.
///
/// Pure and total over the five kinds: `None` yields no pattern, weekly
/// takes the weekday of `date`, monthly/yearly take its day and month.
pub fn map_recurrence(kind: RepeatKind, date: NaiveDate) -> Option<RecurrencePattern> {
    match kind {
        RepeatKind::None => None,
        RepeatKind::Daily => Some(RecurrencePattern::Daily { interval: 1 }),
        RepeatKind::Weekly => Some(RecurrencePattern::Weekly {
            interval: 1,
            day_of_week: date.weekday(),
        }),
        RepeatKind::Monthly => Some(RecurrencePattern::Monthly {
            interval: 1,
            day_of_month: date.day(),
        }),
        RepeatKind::Yearly => Some(RecurrencePattern::Yearly {
            month: date.month(),
            day_of_month: date.day(),
        }),
    }
}

/// Uppercase weekday name as the video provider's repeat block expects it.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}
