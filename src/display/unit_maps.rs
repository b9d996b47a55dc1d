//! Lookup tables for display unit codes and well-known LID descriptions.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::psem::Lid;

/// Decoded unit information for a 5-bit unit code.
#[derive(Debug, Clone, Copy)]
pub struct UnitInfo {
    pub code: u8,
    pub label: &'static str,
    pub multiplier: f64,
}

/// Unit code assignments. Base units scale by 1, K-prefixed by 1e-3,
/// M-prefixed by 1e-6.
pub const UNIT_CODES: &[(u8, &str, f64)] = &[
    (0, "", 1.0),
    (1, "W", 1.0),
    (2, "kW", 1e-3),
    (3, "MW", 1e-6),
    (4, "Wh", 1.0),
    (5, "kWh", 1e-3),
    (6, "MWh", 1e-6),
    (7, "VAR", 1.0),
    (8, "kVAR", 1e-3),
    (9, "MVAR", 1e-6),
    (10, "VARh", 1.0),
    (11, "kVARh", 1e-3),
    (12, "MVARh", 1e-6),
    (13, "VA", 1.0),
    (14, "kVA", 1e-3),
    (15, "MVA", 1e-6),
    (16, "VAh", 1.0),
    (17, "kVAh", 1e-3),
    (18, "MVAh", 1e-6),
    (19, "V", 1.0),
    (20, "A", 1.0),
    (21, "Hz", 1.0),
    (22, "sec", 1.0),
    (23, "min", 1.0),
    (24, "hr", 1.0),
    (25, "deg", 1.0),
    (26, "PF", 1.0),
    (27, "M", 1e-6),
];

/// Looks up a unit code; codes 28-31 are unassigned.
pub fn lookup_unit(code: u8) -> Option<UnitInfo> {
    UNIT_CODES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(code, label, multiplier)| UnitInfo {
            code,
            label,
            multiplier,
        })
}

// Well-known quantity LIDs surfaced on meter displays.
pub const LID_WH_DELIVERED: Lid = Lid(0x1400_0080);
pub const LID_WH_RECEIVED: Lid = Lid(0x1400_0081);
pub const LID_VARH_DELIVERED: Lid = Lid(0x1400_0082);
pub const LID_VARH_RECEIVED: Lid = Lid(0x1400_0083);
pub const LID_VAH_DELIVERED: Lid = Lid(0x1400_0084);
pub const LID_W_MAX_DEMAND: Lid = Lid(0x1401_0080);
pub const LID_VAR_MAX_DEMAND: Lid = Lid(0x1401_0081);
pub const LID_VA_MAX_DEMAND: Lid = Lid(0x1401_0082);
pub const LID_INSTANTANEOUS_W: Lid = Lid(0x1402_0080);
pub const LID_INSTANTANEOUS_PF: Lid = Lid(0x1402_0081);
pub const LID_VOLTS_PHASE_A: Lid = Lid(0x1402_0090);
pub const LID_AMPS_PHASE_A: Lid = Lid(0x1402_0091);
pub const LID_CURRENT_DATE: Lid = Lid(0x1403_0080);
pub const LID_CURRENT_TIME: Lid = Lid(0x1403_0081);
pub const LID_METER_ID: Lid = Lid(0x1404_0080);
pub const LID_SEGMENT_TEST: Lid = Lid(0x1404_00FF);

static LID_DESCRIPTIONS: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(LID_WH_DELIVERED.0, "Wh Delivered");
    m.insert(LID_WH_RECEIVED.0, "Wh Received");
    m.insert(LID_VARH_DELIVERED.0, "VARh Delivered");
    m.insert(LID_VARH_RECEIVED.0, "VARh Received");
    m.insert(LID_VAH_DELIVERED.0, "VAh Delivered");
    m.insert(LID_W_MAX_DEMAND.0, "Max W Demand");
    m.insert(LID_VAR_MAX_DEMAND.0, "Max VAR Demand");
    m.insert(LID_VA_MAX_DEMAND.0, "Max VA Demand");
    m.insert(LID_INSTANTANEOUS_W.0, "Instantaneous W");
    m.insert(LID_INSTANTANEOUS_PF.0, "Instantaneous PF");
    m.insert(LID_VOLTS_PHASE_A.0, "Volts Phase A");
    m.insert(LID_AMPS_PHASE_A.0, "Amps Phase A");
    m.insert(LID_CURRENT_DATE.0, "Current Date");
    m.insert(LID_CURRENT_TIME.0, "Current Time");
    m.insert(LID_METER_ID.0, "Meter ID");
    m.insert(LID_SEGMENT_TEST.0, "Segment Test");
    m
});

/// Description for a well-known LID, or a hex rendering for others.
pub fn lid_description(lid: Lid) -> String {
    match LID_DESCRIPTIONS.get(&lid.0) {
        Some(desc) => (*desc).to_string(),
        None => format!("LID {lid}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unit_all_cases() {
        for (code, label, multiplier) in UNIT_CODES.iter() {
            let info = lookup_unit(*code).unwrap();
            assert_eq!(info.code, *code);
            assert_eq!(info.label, *label);
            assert_eq!(info.multiplier, *multiplier);
        }
        assert!(lookup_unit(28).is_none());
        assert!(lookup_unit(31).is_none());
    }

    #[test]
    fn test_lid_description_known_and_unknown() {
        assert_eq!(lid_description(LID_WH_DELIVERED), "Wh Delivered");
        assert_eq!(lid_description(Lid(0xDEAD_BEEF)), "LID 0xDEADBEEF");
    }
}
