//! Display format code and dimension decoding.
//!
//! A display format code is a 16-bit word: bits 0-3 select the display
//! type, bits 4-8 select the unit. The two fields decode independently
//! through fixed masks; no cross-validation is performed. The dimension
//! byte packs the total digit count in the high nibble and the decimal
//! digit count in the low nibble.

use crate::constants::{
    DIMENSION_DECIMAL_MASK, DIMENSION_TOTAL_MASK, DISPLAY_TYPE_MASK, UNIT_TYPE_MASK,
    UNIT_TYPE_SHIFT,
};
use crate::display::unit_maps::lookup_unit;
use crate::error::PsemError;

/// The 16-bit display format code from a display configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFormatCode(pub u16);

impl DisplayFormatCode {
    pub fn new(raw: u16) -> Self {
        DisplayFormatCode(raw)
    }

    /// Raw format code word.
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Decodes the display type nibble.
    pub fn display_type(self) -> Result<DisplayType, PsemError> {
        let nibble = (self.0 & DISPLAY_TYPE_MASK) as u8;
        DisplayType::from_code(nibble).ok_or(PsemError::UnknownDisplayType(nibble))
    }

    /// Decodes the unit field.
    pub fn unit(self) -> Result<UnitType, PsemError> {
        let code = ((self.0 & UNIT_TYPE_MASK) >> UNIT_TYPE_SHIFT) as u8;
        UnitType::from_code(code).ok_or(PsemError::UnknownUnit(code))
    }

    /// Builds a format code from a display type and unit.
    pub fn from_parts(display_type: DisplayType, unit: UnitType) -> Self {
        DisplayFormatCode(
            (display_type as u16 & DISPLAY_TYPE_MASK)
                | (((unit as u16) << UNIT_TYPE_SHIFT) & UNIT_TYPE_MASK),
        )
    }
}

/// Numeric rendering selected by the low nibble of the format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayType {
    UnsignedInteger = 0,
    UnsignedIntegerLeadingZeros = 1,
    Decimal = 2,
    DecimalLeadingZeros = 3,
    DecimalDegrees = 4,
    FloatingDecimal = 5,
    FloatingDecimalLeadingZeros = 6,
    DateDdMmYy = 7,
    DateMmDdYy = 8,
    DateYyMmDd = 9,
    TimeHhMmSs = 10,
    SignedInteger = 11,
    UserText = 12,
    AllSegments = 13,
}

impl DisplayType {
    pub fn from_code(code: u8) -> Option<Self> {
        use DisplayType::*;
        Some(match code {
            0 => UnsignedInteger,
            1 => UnsignedIntegerLeadingZeros,
            2 => Decimal,
            3 => DecimalLeadingZeros,
            4 => DecimalDegrees,
            5 => FloatingDecimal,
            6 => FloatingDecimalLeadingZeros,
            7 => DateDdMmYy,
            8 => DateMmDdYy,
            9 => DateYyMmDd,
            10 => TimeHhMmSs,
            11 => SignedInteger,
            12 => UserText,
            13 => AllSegments,
            _ => return None,
        })
    }

    /// Whether this type left-pads short values with zeros. Signed
    /// integers are never padded.
    pub fn leading_zeros(self) -> bool {
        matches!(
            self,
            DisplayType::UnsignedIntegerLeadingZeros
                | DisplayType::DecimalLeadingZeros
                | DisplayType::FloatingDecimalLeadingZeros
        )
    }
}

/// Unit selected by bits 4-8 of the format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UnitType {
    None = 0,
    Watts = 1,
    Kilowatts = 2,
    Megawatts = 3,
    WattHours = 4,
    KilowattHours = 5,
    MegawattHours = 6,
    Vars = 7,
    Kilovars = 8,
    Megavars = 9,
    VarHours = 10,
    KilovarHours = 11,
    MegavarHours = 12,
    VoltAmperes = 13,
    KilovoltAmperes = 14,
    MegavoltAmperes = 15,
    VoltAmpereHours = 16,
    KilovoltAmpereHours = 17,
    MegavoltAmpereHours = 18,
    Volts = 19,
    Amperes = 20,
    Hertz = 21,
    Seconds = 22,
    Minutes = 23,
    Hours = 24,
    Degrees = 25,
    PowerFactor = 26,
    Mega = 27,
}

impl UnitType {
    pub fn from_code(code: u8) -> Option<Self> {
        use UnitType::*;
        Some(match code {
            0 => None,
            1 => Watts,
            2 => Kilowatts,
            3 => Megawatts,
            4 => WattHours,
            5 => KilowattHours,
            6 => MegawattHours,
            7 => Vars,
            8 => Kilovars,
            9 => Megavars,
            10 => VarHours,
            11 => KilovarHours,
            12 => MegavarHours,
            13 => VoltAmperes,
            14 => KilovoltAmperes,
            15 => MegavoltAmperes,
            16 => VoltAmpereHours,
            17 => KilovoltAmpereHours,
            18 => MegavoltAmpereHours,
            19 => Volts,
            20 => Amperes,
            21 => Hertz,
            22 => Seconds,
            23 => Minutes,
            24 => Hours,
            25 => Degrees,
            26 => PowerFactor,
            27 => Mega,
            _ => return Option::None,
        })
    }

    /// Display label for the unit.
    pub fn label(self) -> &'static str {
        lookup_unit(self as u8).map(|u| u.label).unwrap_or("")
    }

    /// Scaling applied to the raw value before formatting: 1 for base
    /// units, 1e-3 for K-prefixed, 1e-6 for M-prefixed.
    pub fn multiplier(self) -> f64 {
        lookup_unit(self as u8).map(|u| u.multiplier).unwrap_or(1.0)
    }
}

/// The 8-bit display dimension byte from a display configuration entry.
///
/// TotalDigits >= DecimalDigits is not enforced; callers tolerate
/// nonsensical combinations by truncating deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayDimension(pub u8);

impl DisplayDimension {
    pub fn new(total_digits: u8, decimal_digits: u8) -> Self {
        DisplayDimension(((total_digits << 4) & DIMENSION_TOTAL_MASK) | (decimal_digits & DIMENSION_DECIMAL_MASK))
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn total_digits(self) -> u8 {
        (self.0 & DIMENSION_TOTAL_MASK) >> 4
    }

    pub fn decimal_digits(self) -> u8 {
        self.0 & DIMENSION_DECIMAL_MASK
    }
}
