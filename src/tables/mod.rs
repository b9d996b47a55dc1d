//! The tables module contains typed views of the raw meter configuration
//! and status tables, with nom parsers and byte encoders for each
//! sub-record.

pub mod clock;
pub mod table2048;

pub use clock::{ClockRecord, ClockStatus};
pub use table2048::{
    CalendarConfig, CalendarYearConfig, ConstantsConfig, DemandConfig, DisplayConfig,
    DisplayEntry, SeasonConfig, Table2048, TouConfig,
};
