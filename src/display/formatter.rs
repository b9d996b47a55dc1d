//! Register value rendering.
//!
//! These functions reproduce the fixed-width conventions of the physical
//! 6/7-segment meter display. Out-of-range magnitudes are truncated or
//! padded deterministically; formatting never fails. Fractional digits
//! are always truncated, never rounded: rounding a register can display
//! energy the meter has not yet accumulated.

use chrono::NaiveDateTime;

use crate::constants::MAX_DIGITS;
use crate::display::format::{DisplayDimension, DisplayType, UnitType};

/// Truncates a non-negative value to a fixed number of fractional digits
/// by cutting the rendered string. The guard rendering carries more
/// fractional digits than an f64 holds, so the renderer's rounding at
/// the last guard digit can never carry across the cut position.
fn truncate_decimals(value: f64, places: usize) -> String {
    let rendered = format!("{value:.17}");
    let dot = rendered.find('.').unwrap_or(rendered.len());
    if places == 0 {
        return rendered[..dot].to_string();
    }
    let want = dot + 1 + places;
    let mut s = rendered[..want.min(rendered.len())].to_string();
    // Dimension nibbles can ask for more digits than the guard rendering
    // carries; fill with zeros.
    while s.len() < want {
        s.push('0');
    }
    s
}

/// Keeps the rightmost `width` characters of an ASCII digit string.
fn rightmost(s: &str, width: usize) -> &str {
    &s[s.len().saturating_sub(width)..]
}

/// Formats an unsigned integer register. Values longer than the display
/// keep the rightmost [`MAX_DIGITS`] digits; shorter values are
/// left-padded with zeros when the leading-zero flag is set.
pub fn format_unsigned(value: u64, leading_zeros: bool) -> String {
    let s = value.to_string();
    if s.len() > MAX_DIGITS {
        rightmost(&s, MAX_DIGITS).to_string()
    } else if leading_zeros {
        format!("{}{s}", "0".repeat(MAX_DIGITS - s.len()))
    } else {
        s
    }
}

/// Formats a signed integer register. Signed values are never zero
/// padded; overflow keeps the rightmost [`MAX_DIGITS`] characters of the
/// decimal string, which drops the sign.
pub fn format_signed(value: i64) -> String {
    let s = value.to_string();
    if s.len() > MAX_DIGITS {
        rightmost(&s, MAX_DIGITS).to_string()
    } else {
        s
    }
}

/// Formats seconds-since-midnight as `HH:MM:SS`. The hour field carries
/// the full hour count and never wraps into days: 25 hours displays as
/// `25:00:00`.
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats a date or time-of-day value per the display type's field
/// order.
pub fn format_date(value: &NaiveDateTime, display_type: DisplayType) -> String {
    match display_type {
        DisplayType::DateDdMmYy => value.format("%d-%m-%y").to_string(),
        DisplayType::DateMmDdYy => value.format("%m-%d-%y").to_string(),
        DisplayType::DateYyMmDd => value.format("%y-%m-%d").to_string(),
        DisplayType::TimeHhMmSs => value.format("%H:%M:%S").to_string(),
        _ => value.to_string(),
    }
}

/// Formats a floating-point register with a floating decimal position.
///
/// The raw value is scaled by the unit multiplier first, then rendered
/// through the magnitude table below. All truncation is string-level;
/// naive numeric formatting slips into scientific notation for the
/// magnitudes meters accumulate.
pub fn format_floating(value: f64, unit: UnitType, leading_zeros: bool) -> String {
    let scaled = value * unit.multiplier();
    if scaled >= 0.0 {
        if scaled < 10.0 {
            // Four decimal places, five significant digits.
            let s = truncate_decimals(scaled, 4);
            if leading_zeros {
                format!("0{s}")
            } else {
                s
            }
        } else if scaled < 100_000.0 {
            // The decimal point floats; keep MAX_DIGITS digits plus the point.
            let s = truncate_decimals(scaled, MAX_DIGITS);
            s[..MAX_DIGITS + 1].to_string()
        } else {
            // No room for a decimal point; keep the rightmost digits.
            let digits = (scaled.trunc() as u64).to_string();
            rightmost(&digits, MAX_DIGITS).to_string()
        }
    } else if scaled > -10_000.0 {
        let s = format!("-{}", truncate_decimals(-scaled, MAX_DIGITS));
        s[..MAX_DIGITS + 1].to_string()
    } else {
        let digits = ((-scaled).trunc() as u64).to_string();
        format!("-{}", rightmost(&digits, MAX_DIGITS - 1))
    }
}

/// Formats a fixed-point register to exactly the dimension's decimal
/// digit count.
pub fn format_fixed_point(value: f64, dimension: DisplayDimension, leading_zeros: bool) -> String {
    let decimals = dimension.decimal_digits() as usize;
    let total = dimension.total_digits() as usize;
    let negative = value < 0.0;
    let body = truncate_decimals(value.abs(), decimals);

    let mut max_len = total + usize::from(decimals > 0);
    if negative && total < MAX_DIGITS {
        max_len += 1;
    }
    let sign = if negative { "-" } else { "" };
    let len = sign.len() + body.len();

    if len > max_len {
        // Truncate from the left, preserving the sign character.
        let keep = max_len.saturating_sub(sign.len()).min(body.len());
        format!("{sign}{}", rightmost(&body, keep))
    } else if len < max_len && leading_zeros {
        format!("{sign}{}{body}", "0".repeat(max_len - len))
    } else {
        format!("{sign}{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::format::UnitType;

    #[test]
    fn test_truncate_decimals_never_rounds() {
        assert_eq!(truncate_decimals(1234.5678, 2), "1234.56");
        assert_eq!(truncate_decimals(9.99999, 4), "9.9999");
        assert_eq!(truncate_decimals(0.129, 2), "0.12");
    }

    #[test]
    fn test_truncate_decimals_long_nine_runs() {
        // Expansions longer than a short guard rendering must still cut,
        // not carry a round-up across the boundary.
        assert_eq!(truncate_decimals(0.99999999999, 2), "0.99");
        assert_eq!(truncate_decimals(4.99999999999999, 4), "4.9999");
    }

    #[test]
    fn test_unsigned_padding_and_overflow() {
        assert_eq!(format_unsigned(42, true), "000042");
        assert_eq!(format_unsigned(42, false), "42");
        assert_eq!(format_unsigned(123_456_789, false), "456789");
    }

    #[test]
    fn test_time_never_wraps() {
        assert_eq!(format_time(5400), "01:30:00");
        assert_eq!(format_time(90_000), "25:00:00");
    }

    #[test]
    fn test_floating_unit_scaling() {
        // 12345 W shown on a kW display.
        assert_eq!(format_floating(12_345.0, UnitType::Kilowatts, false), "12.3450");
    }

    #[test]
    fn test_floating_magnitude_cases() {
        assert_eq!(format_floating(9.99999, UnitType::None, true), "09.9999");
        assert_eq!(format_floating(9.99999, UnitType::None, false), "9.9999");
        assert_eq!(format_floating(1234.5678, UnitType::None, false), "1234.56");
        assert_eq!(format_floating(123_456_789.0, UnitType::None, false), "456789");
        assert_eq!(format_floating(-1234.5678, UnitType::None, false), "-1234.5");
        assert_eq!(format_floating(-123_456.7, UnitType::None, false), "-23456");
    }
}
