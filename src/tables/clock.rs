//! Clock table (Table 52): current time and clock status word.

use bitflags::bitflags;
use chrono::{NaiveDate, NaiveDateTime};
use nom::number::complete::le_u8;
use nom::IResult;

use crate::constants::{CALENDAR_YEAR_EPOCH, TABLE_CLOCK};
use crate::error::PsemError;

bitflags! {
    /// Meter clock status word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClockStatus: u8 {
        const CLOCK_RUNNING = 0x01;
        const DST_APPLIED   = 0x02;
        const GMT           = 0x04;
        const TZ_APPLIED    = 0x08;
        const DST_SUPPORTED = 0x10;
    }
}

/// Decoded clock table contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockRecord {
    pub status: ClockStatus,
    pub now: NaiveDateTime,
}

impl ClockRecord {
    /// Parses the clock table: status byte followed by year-since-epoch,
    /// month, day, hour, minute, second.
    pub fn parse(input: &[u8]) -> Result<Self, PsemError> {
        let (_, record) = parse_clock(input).map_err(|e| PsemError::TableParse {
            table: TABLE_CLOCK,
            reason: e.to_string(),
        })?;
        Ok(record)
    }

    pub fn encode(&self) -> Vec<u8> {
        use chrono::{Datelike, Timelike};
        vec![
            self.status.bits(),
            (self.now.year() - i32::from(CALENDAR_YEAR_EPOCH)) as u8,
            self.now.month() as u8,
            self.now.day() as u8,
            self.now.hour() as u8,
            self.now.minute() as u8,
            self.now.second() as u8,
        ]
    }
}

fn parse_clock(input: &[u8]) -> IResult<&[u8], ClockRecord> {
    let (input, status) = le_u8(input)?;
    let (input, year) = le_u8(input)?;
    let (input, month) = le_u8(input)?;
    let (input, day) = le_u8(input)?;
    let (input, hour) = le_u8(input)?;
    let (input, minute) = le_u8(input)?;
    let (input, second) = le_u8(input)?;

    let date = NaiveDate::from_ymd_opt(
        i32::from(CALENDAR_YEAR_EPOCH) + i32::from(year),
        u32::from(month),
        u32::from(day),
    )
    .and_then(|d| d.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)))
    .ok_or_else(|| nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify)))?;

    Ok((
        input,
        ClockRecord {
            status: ClockStatus::from_bits_truncate(status),
            now: date,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_record_round_trip() {
        let record = ClockRecord {
            status: ClockStatus::CLOCK_RUNNING | ClockStatus::DST_SUPPORTED,
            now: NaiveDate::from_ymd_opt(2026, 3, 8)
                .unwrap()
                .and_hms_opt(2, 0, 0)
                .unwrap(),
        };
        let bytes = record.encode();
        let back = ClockRecord::parse(&bytes).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_invalid_date_rejected() {
        // Month 13 cannot form a date.
        let bytes = [0x01, 26, 13, 1, 0, 0, 0];
        assert!(ClockRecord::parse(&bytes).is_err());
    }

    #[test]
    fn test_short_input_rejected() {
        assert!(ClockRecord::parse(&[0x01, 26]).is_err());
    }
}
