//! Unit tests for the display formatting engine: the fixed-width numeric
//! rendering rules the physical meter display uses.

use proptest::prelude::*;
use psem_rs::display::{
    format_fixed_point, format_floating, format_signed, format_time, format_unsigned,
    DisplayDimension, UnitType,
};

/// Unsigned values always occupy the rightmost digits of the display.
#[test]
fn test_unsigned_rightmost_digits() {
    assert_eq!(format_unsigned(123456789, false), "456789");
    assert_eq!(format_unsigned(42, false), "42");
    assert_eq!(format_unsigned(42, true), "000042");
    assert_eq!(format_unsigned(0, true), "000000");
}

#[test]
fn test_signed_never_padded() {
    assert_eq!(format_signed(-42), "-42");
    assert_eq!(format_signed(42), "42");
    // Overflowing magnitudes keep the rightmost digits and lose the sign.
    assert_eq!(format_signed(-1234567), "234567");
}

/// Hours never wrap into days.
#[test]
fn test_time_hours_exceed_day() {
    assert_eq!(format_time(90000), "25:00:00");
    assert_eq!(format_time(0), "00:00:00");
    assert_eq!(format_time(3661), "01:01:01");
}

#[test]
fn test_floating_small_magnitudes_use_four_decimals() {
    assert_eq!(format_floating(9.99999, UnitType::None, false), "9.9999");
    assert_eq!(format_floating(9.99999, UnitType::None, true), "09.9999");
    assert_eq!(format_floating(0.12345, UnitType::None, false), "0.1234");
}

#[test]
fn test_floating_mid_magnitudes_truncate_to_six_digits() {
    assert_eq!(format_floating(1234.5678, UnitType::None, false), "1234.56");
    assert_eq!(format_floating(99999.99, UnitType::None, false), "99999.9");
}

#[test]
fn test_floating_large_magnitudes_drop_fraction() {
    assert_eq!(format_floating(1234567.0, UnitType::None, false), "234567");
}

#[test]
fn test_floating_negative() {
    assert_eq!(format_floating(-1234.56, UnitType::None, false), "-1234.5");
    assert_eq!(format_floating(-123456.0, UnitType::None, false), "-23456");
}

/// K-prefixed units scale the raw value by a thousand before rendering.
#[test]
fn test_floating_unit_scaling() {
    assert_eq!(
        format_floating(12345.0, UnitType::Kilowatts, false),
        "12.3450"
    );
    assert_eq!(
        format_floating(12345.0, UnitType::Megawatts, false),
        "0.0123"
    );
}

#[test]
fn test_fixed_point_truncates_never_rounds() {
    let dim = DisplayDimension::new(6, 2);
    assert_eq!(format_fixed_point(1234.5678, dim, false), "1234.56");
    assert_eq!(format_fixed_point(0.999, dim, false), "0.99");
}

/// Values a hair under a decimal boundary must cut, not carry upward,
/// even when the expansion runs past the renderer's default precision.
#[test]
fn test_fixed_point_near_boundary_never_rounds_up() {
    let dim = DisplayDimension::new(6, 2);
    assert_eq!(format_fixed_point(0.99999999999, dim, false), "0.99");
    assert_eq!(format_fixed_point(999.9999999999, dim, false), "999.99");
}

#[test]
fn test_floating_near_boundary_never_rounds_up() {
    assert_eq!(
        format_floating(9.999999999999, UnitType::None, false),
        "9.9999"
    );
}

#[test]
fn test_fixed_point_leading_zeros() {
    let dim = DisplayDimension::new(6, 2);
    assert_eq!(format_fixed_point(1.5, dim, true), "0001.50");
}

#[test]
fn test_fixed_point_negative_gets_sign_room() {
    let dim = DisplayDimension::new(4, 1);
    assert_eq!(format_fixed_point(-123.45, dim, false), "-123.4");
}

proptest! {
    /// Zero-padded unsigned rendering is always exactly six characters.
    #[test]
    fn prop_unsigned_padded_width(value in 0u64..10_000_000_000) {
        prop_assert_eq!(format_unsigned(value, true).len(), 6);
    }

    /// Unpadded unsigned rendering never exceeds six characters.
    #[test]
    fn prop_unsigned_width_bound(value in 0u64..10_000_000_000) {
        prop_assert!(format_unsigned(value, false).len() <= 6);
    }

    /// The time rendering keeps its shape for any second count under
    /// 100 hours.
    #[test]
    fn prop_time_shape(seconds in 0u32..360_000) {
        let rendered = format_time(seconds);
        prop_assert_eq!(rendered.len(), 8);
        prop_assert_eq!(rendered.as_bytes()[2], b':');
        prop_assert_eq!(rendered.as_bytes()[5], b':');
    }
}
