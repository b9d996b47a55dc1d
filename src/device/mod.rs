//! Meter-family extension points.
//!
//! The standard tables and procedures behave the same on every supported
//! meter, but a few presentation details are family-specific. The
//! [`MeterVariant`] trait carries those hooks; families that do not
//! implement a hook report [`PsemError::NotImplemented`] instead of
//! guessing.

use crate::display::{DisplayDimension, DisplayFormatCode};
use crate::error::PsemError;

pub mod openway;

pub use openway::OpenWay;

/// Family-specific display hooks.
pub trait MeterVariant {
    /// Human-readable name of the family.
    fn name(&self) -> &'static str;

    /// Renders a display format code the way the family's faceplate
    /// annunciators describe it.
    fn format_label(
        &self,
        _code: DisplayFormatCode,
        _dimension: DisplayDimension,
    ) -> Result<String, PsemError> {
        Err(PsemError::NotImplemented("format_label"))
    }

    /// Renders the unit annunciator text for a display format code.
    fn units_label(&self, _code: DisplayFormatCode) -> Result<String, PsemError> {
        Err(PsemError::NotImplemented("units_label"))
    }
}

/// A meter family with no special presentation behavior.
#[derive(Debug, Default)]
pub struct GenericMeter;

impl MeterVariant for GenericMeter {
    fn name(&self) -> &'static str {
        "generic"
    }
}
