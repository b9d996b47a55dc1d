//! ANSI C12.19 Meter Constants
//!
//! This module defines constants used by the PSEM device-driver layer:
//! display format code masks, display geometry, and the fixed geometry of
//! the manufacturer configuration table (Table 2048).

/// Display format code mask for the display type nibble.
pub const DISPLAY_TYPE_MASK: u16 = 0x000F;

/// Display format code mask for the unit field (bits 4-8).
pub const UNIT_TYPE_MASK: u16 = 0x01F0;

/// Shift for the unit field within the display format code.
pub const UNIT_TYPE_SHIFT: u16 = 4;

/// Display dimension mask for the total digit count (high nibble).
pub const DIMENSION_TOTAL_MASK: u8 = 0xF0;

/// Display dimension mask for the decimal digit count (low nibble).
pub const DIMENSION_DECIMAL_MASK: u8 = 0x0F;

/// Width of the physical register display in digits.
pub const MAX_DIGITS: usize = 6;

/// Upper bound on logical identifiers per multiple-LID read request.
pub const MAX_LIDS_PER_REQUEST: usize = 8;

// ----------------------------------------------------------------------------
// Day event word packing (TOU config switchpoint slots)
// ----------------------------------------------------------------------------

/// Day event mask for the event identifier.
pub const DAY_EVENT_ID_MASK: u16 = 0x001F;

/// Day event mask for the minute field.
pub const DAY_EVENT_MINUTE_MASK: u16 = 0x07E0;

/// Shift for the minute field within a day event word.
pub const DAY_EVENT_MINUTE_SHIFT: u16 = 5;

/// Day event mask for the hour field.
pub const DAY_EVENT_HOUR_MASK: u16 = 0xF800;

/// Shift for the hour field within a day event word.
pub const DAY_EVENT_HOUR_SHIFT: u16 = 11;

// ----------------------------------------------------------------------------
// Calendar event word packing (per-year slots)
// ----------------------------------------------------------------------------

/// Calendar event mask for the event type nibble.
pub const CAL_EVENT_TYPE_MASK: u16 = 0x000F;

/// Calendar event mask for the 0-based month field.
pub const CAL_EVENT_MONTH_MASK: u16 = 0x00F0;

/// Shift for the month field within a calendar event word.
pub const CAL_EVENT_MONTH_SHIFT: u16 = 4;

/// Calendar event mask for the 0-based day-of-month field.
pub const CAL_EVENT_DAY_MASK: u16 = 0x1F00;

/// Shift for the day field within a calendar event word.
pub const CAL_EVENT_DAY_SHIFT: u16 = 8;

// ----------------------------------------------------------------------------
// Table geometry
// ----------------------------------------------------------------------------

/// Seasons in the TOU configuration record.
pub const TOU_SEASONS: usize = 8;

/// Day types per season; the last one is the holiday type.
pub const TOU_DAY_TYPES: usize = 4;

/// Day type index reserved for holidays.
pub const HOLIDAY_DAY_TYPE: usize = TOU_DAY_TYPES - 1;

/// Switchpoint event slots per day type.
pub const TOU_EVENTS_PER_DAY: usize = 24;

/// Year slots in the calendar configuration record.
pub const CAL_YEARS: usize = 25;

/// Event slots per calendar year. Slots 0 and 1 are reserved for the
/// to-DST and from-DST events.
pub const CAL_EVENTS_PER_YEAR: usize = 44;

/// Stored calendar years are offsets from this epoch.
pub const CALENDAR_YEAR_EPOCH: u16 = 2000;

/// Minutes in a meter day; switchpoint end times default to this value.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Display item entry slots in the display configuration record.
pub const MAX_DISPLAY_ENTRIES: usize = 48;

// ----------------------------------------------------------------------------
// Table numbers
// ----------------------------------------------------------------------------

/// Standard clock table (current time and clock status).
pub const TABLE_CLOCK: u16 = 52;

/// Manufacturer configuration table holding the display, demand, constants,
/// TOU, and calendar sub-records.
pub const TABLE_MFG_CONFIG: u16 = 2048;
