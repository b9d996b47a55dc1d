//! Generic time-of-use schedule model.
//!
//! This is the normalized form the translator reads out of, and writes
//! into, the meter's compact table encoding. It also serializes to and
//! from the external schedule file format.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Whether a switchpoint drives a TOU rate or an output relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchPointKind {
    Rate,
    Output,
}

/// A time-of-day interval during which a rate or output is active.
///
/// Start and stop are minutes since midnight; stop may be 1440 for
/// end-of-day. Rate switchpoints are mutually exclusive in time within a
/// day type; output switchpoints may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchPoint {
    pub start: u16,
    pub stop: u16,
    pub index: u8,
    pub kind: SwitchPointKind,
}

impl SwitchPoint {
    pub fn rate(start: u16, stop: u16, rate: u8) -> Self {
        SwitchPoint {
            start,
            stop,
            index: rate,
            kind: SwitchPointKind::Rate,
        }
    }

    pub fn output(start: u16, stop: u16, output: u8) -> Self {
        SwitchPoint {
            start,
            stop,
            index: output,
            kind: SwitchPointKind::Output,
        }
    }
}

/// An ordered list of switchpoints applied to one day type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: u16,
    pub name: String,
    pub switchpoints: Vec<SwitchPoint>,
}

/// One season of the schedule.
///
/// `typical_week` maps the days Sunday through Saturday onto day type
/// indices. `normal_patterns` lists the pattern applied to each normal
/// day type in order; `holiday_patterns` the pattern(s) for holidays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// 1-based season number.
    pub index: u8,
    pub name: String,
    pub normal_patterns: Vec<u16>,
    pub holiday_patterns: Vec<u16>,
    pub typical_week: [u8; 7],
}

/// Calendar event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarEventKind {
    Season,
    Holiday,
    ToDst,
    FromDst,
}

/// A dated calendar event. For season starts, `index` is the 0-based
/// position of the season in the schedule's season array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub at: NaiveDateTime,
    pub kind: CalendarEventKind,
    pub index: u8,
}

/// One calendar year of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarYear {
    pub year: u16,
    pub events: Vec<CalendarEvent>,
}

/// A complete time-of-use schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouSchedule {
    pub name: String,
    pub seasons: Vec<Season>,
    pub patterns: Vec<Pattern>,
    pub years: Vec<CalendarYear>,
}

impl TouSchedule {
    /// Finds a pattern by its globally unique identifier.
    pub fn pattern(&self, id: u16) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// A schedule whose last configured year has passed can no longer be
    /// written to a meter.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match self.years.iter().map(|y| y.year).max() {
            Some(last) => i32::from(last) < today.year(),
            None => true,
        }
    }
}

/// One year of daylight-saving dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DstYear {
    pub year: u16,
    pub to_dst: NaiveDate,
    pub from_dst: NaiveDate,
}

/// Daylight-saving configuration: the switch time of day, the shift
/// length, and the per-year switch dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DstSchedule {
    pub hour: u8,
    pub minute: u8,
    pub offset_minutes: u8,
    pub dates: Vec<DstYear>,
}

impl DstSchedule {
    /// Looks up the switch dates for a specific year.
    pub fn year(&self, year: u16) -> Option<&DstYear> {
        self.dates.iter().find(|d| d.year == year)
    }

    /// True when every configured year has passed.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match self.dates.iter().map(|d| d.year).max() {
            Some(last) => i32::from(last) < today.year(),
            None => true,
        }
    }
}
