//! OpenWay family hooks.
//!
//! OpenWay meters describe each display list entry in their configuration
//! tool with a segment template ("8888.88 kWh") built from the format
//! code and dimension byte. The labels here reproduce that rendering.

use crate::constants::MAX_DIGITS;
use crate::device::MeterVariant;
use crate::display::{DisplayDimension, DisplayFormatCode, DisplayType};
use crate::error::PsemError;

#[derive(Debug, Default)]
pub struct OpenWay;

impl MeterVariant for OpenWay {
    fn name(&self) -> &'static str {
        "OpenWay"
    }

    fn format_label(
        &self,
        code: DisplayFormatCode,
        dimension: DisplayDimension,
    ) -> Result<String, PsemError> {
        let display_type = code.display_type()?;
        let template = match display_type {
            DisplayType::DateDdMmYy => "dd-mm-yy".to_string(),
            DisplayType::DateMmDdYy => "mm-dd-yy".to_string(),
            DisplayType::DateYyMmDd => "yy-mm-dd".to_string(),
            DisplayType::TimeHhMmSs => "hh:mm:ss".to_string(),
            DisplayType::UserText => "text".to_string(),
            DisplayType::AllSegments => "8".repeat(MAX_DIGITS),
            DisplayType::FloatingDecimal | DisplayType::FloatingDecimalLeadingZeros => {
                format!("{}.{}", "8".repeat(2), "8".repeat(4))
            }
            _ => digit_template(dimension),
        };
        let units = self.units_label(code)?;
        if units.is_empty() {
            Ok(template)
        } else {
            Ok(format!("{template} {units}"))
        }
    }

    fn units_label(&self, code: DisplayFormatCode) -> Result<String, PsemError> {
        Ok(code.unit()?.label().to_string())
    }
}

/// Fixed-point segment template, e.g. total 5 decimal 2 -> "888.88".
fn digit_template(dimension: DisplayDimension) -> String {
    let total = usize::from(dimension.total_digits()).min(MAX_DIGITS);
    let decimal = usize::from(dimension.decimal_digits()).min(total);
    if decimal == 0 {
        "8".repeat(total.max(1))
    } else {
        format!("{}.{}", "8".repeat(total - decimal), "8".repeat(decimal))
    }
}
