//! The display module contains the components responsible for decoding
//! display format codes and rendering raw register values into the
//! fixed-width strings shown on the physical meter display.

pub mod format;
pub mod formatter;
pub mod item;
pub mod unit_maps;

pub use format::{DisplayDimension, DisplayFormatCode, DisplayType, UnitType};
pub use formatter::{
    format_date, format_fixed_point, format_floating, format_signed, format_time, format_unsigned,
};
pub use item::{DisplayItem, DisplayList, DisplayListKind};
pub use unit_maps::{lid_description, lookup_unit, UnitInfo};
