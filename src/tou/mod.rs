//! The tou module contains the generic time-of-use schedule model and the
//! bidirectional translation between it and the meter's compact
//! season/day-type/switchpoint table encoding.

pub mod dst;
pub mod events;
pub mod schedule;
pub mod translator;

pub use dst::{DstReconfigState, DstReconfiguration, DstUpdateResult, TouReconfigResult};
pub use events::{CalendarCfgEvent, DayEvent};
pub use schedule::{
    CalendarEvent, CalendarEventKind, CalendarYear, DstSchedule, DstYear, Pattern, Season,
    SwitchPoint, SwitchPointKind, TouSchedule,
};
pub use translator::{overwrite_calendar_config, overwrite_tou_config, read_tou_schedule};
