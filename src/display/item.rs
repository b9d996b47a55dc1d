//! Display items and display lists.
//!
//! A display item pairs a LID with its format code and dimension; its
//! rendered value is overwritten on every format call. The Normal,
//! Alternate, and Test lists own their items and are rebuilt on each
//! full display-list request.

use crate::display::format::{DisplayDimension, DisplayFormatCode, DisplayType};
use crate::display::formatter::{
    format_date, format_fixed_point, format_floating, format_signed, format_time, format_unsigned,
};
use crate::display::unit_maps::lid_description;
use crate::error::PsemError;
use crate::psem::{Lid, RegisterValue};

/// One entry of a meter display list.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub lid: Lid,
    pub format: DisplayFormatCode,
    pub dimension: DisplayDimension,
    /// Rendered value; overwritten by every `format_data` call.
    pub value: String,
    pub description: String,
}

impl DisplayItem {
    pub fn new(lid: Lid, format: DisplayFormatCode, dimension: DisplayDimension) -> Self {
        DisplayItem {
            lid,
            format,
            dimension,
            value: String::new(),
            description: lid_description(lid),
        }
    }

    /// Renders a raw register value into this item's display string.
    ///
    /// A raw value of the wrong runtime type for the declared display
    /// type is a data conversion failure.
    pub fn format_data(&mut self, raw: &RegisterValue) -> Result<(), PsemError> {
        let display_type = self.format.display_type()?;
        let rendered = match display_type {
            DisplayType::UnsignedInteger | DisplayType::UnsignedIntegerLeadingZeros => match raw {
                RegisterValue::Uint(v) => {
                    format_unsigned(u64::from(*v), display_type.leading_zeros())
                }
                other => return Err(conversion("uint", other)),
            },
            DisplayType::SignedInteger => match raw {
                RegisterValue::Int(v) => format_signed(i64::from(*v)),
                other => return Err(conversion("int", other)),
            },
            DisplayType::Decimal | DisplayType::DecimalLeadingZeros | DisplayType::DecimalDegrees => {
                let value = numeric(raw).ok_or_else(|| conversion("numeric", raw))?;
                format_fixed_point(value, self.dimension, display_type.leading_zeros())
            }
            DisplayType::FloatingDecimal | DisplayType::FloatingDecimalLeadingZeros => {
                let value = match raw {
                    RegisterValue::Double(v) => *v,
                    RegisterValue::Float(v) => f64::from(*v),
                    other => return Err(conversion("double or float", other)),
                };
                format_floating(value, self.format.unit()?, display_type.leading_zeros())
            }
            DisplayType::DateDdMmYy
            | DisplayType::DateMmDdYy
            | DisplayType::DateYyMmDd => match raw {
                RegisterValue::DateTime(dt) => format_date(dt, display_type),
                other => return Err(conversion("datetime", other)),
            },
            DisplayType::TimeHhMmSs => match raw {
                RegisterValue::TimeSeconds(s) => format_time(*s),
                RegisterValue::DateTime(dt) => format_date(dt, display_type),
                other => return Err(conversion("time or datetime", other)),
            },
            DisplayType::UserText => match raw {
                RegisterValue::Text(s) => s.clone(),
                other => return Err(conversion("text", other)),
            },
            // Segment test pattern: every digit lit.
            DisplayType::AllSegments => "888888".to_string(),
        };
        self.value = rendered;
        Ok(())
    }
}

fn conversion(expected: &'static str, got: &RegisterValue) -> PsemError {
    PsemError::DataConversion {
        expected,
        got: got.kind(),
    }
}

fn numeric(raw: &RegisterValue) -> Option<f64> {
    match raw {
        RegisterValue::Uint(v) => Some(f64::from(*v)),
        RegisterValue::Int(v) => Some(f64::from(*v)),
        RegisterValue::Double(v) => Some(*v),
        RegisterValue::Float(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Which of the three meter display lists an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayListKind {
    Normal,
    Alternate,
    Test,
}

/// A rebuilt display list with freshly formatted item values.
#[derive(Debug, Clone)]
pub struct DisplayList {
    pub kind: DisplayListKind,
    pub items: Vec<DisplayItem>,
}
