//! Manufacturer configuration table (Table 2048).
//!
//! The table is a fixed-size blob holding the display, demand, constants,
//! TOU, and calendar sub-records at sequential offsets. Multi-byte fields
//! are little-endian. Decode and encode are exact inverses, so the table
//! can be read, edited in place, and written back.

use nom::number::complete::{le_u16, le_u32, le_u8};
use nom::IResult;

use crate::constants::{
    CAL_EVENTS_PER_YEAR, CAL_YEARS, MAX_DISPLAY_ENTRIES, TABLE_MFG_CONFIG, TOU_DAY_TYPES,
    TOU_EVENTS_PER_DAY, TOU_SEASONS,
};
use crate::display::{DisplayDimension, DisplayFormatCode};
use crate::error::PsemError;
use crate::psem::Lid;
use crate::tou::events::{CalendarCfgEvent, DayEvent};

/// One display list entry: a LID plus its rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEntry {
    pub lid: Lid,
    pub format: DisplayFormatCode,
    pub dimension: DisplayDimension,
}

/// Display list configuration. Entries are stored in list order: the
/// normal list first, then alternate, then test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayConfig {
    pub normal: Vec<DisplayEntry>,
    pub alternate: Vec<DisplayEntry>,
    pub test: Vec<DisplayEntry>,
}

impl DisplayConfig {
    fn entry_count(&self) -> usize {
        self.normal.len() + self.alternate.len() + self.test.len()
    }
}

/// Demand measurement configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemandConfig {
    pub interval_minutes: u8,
    pub subintervals: u8,
    pub test_interval_minutes: u8,
    pub reset_holdoff_seconds: u16,
    pub self_read_buffers: u8,
    pub demand_reset_buffers: u8,
}

/// Metering constants configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstantsConfig {
    pub ct_multiplier: u16,
    pub vt_multiplier: u16,
    pub register_multiplier: u32,
}

/// One season of the TOU configuration: the typical-week day type map
/// plus the switchpoint event slots for each day type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonConfig {
    pub typical_week: [u8; 7],
    pub day_events: [[DayEvent; TOU_EVENTS_PER_DAY]; TOU_DAY_TYPES],
}

impl Default for SeasonConfig {
    fn default() -> Self {
        SeasonConfig {
            typical_week: [0; 7],
            day_events: [[DayEvent::terminator(); TOU_EVENTS_PER_DAY]; TOU_DAY_TYPES],
        }
    }
}

/// TOU configuration record: season count plus the fixed season slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouConfig {
    pub season_count: u8,
    pub seasons: [SeasonConfig; TOU_SEASONS],
}

impl Default for TouConfig {
    fn default() -> Self {
        TouConfig {
            season_count: 0,
            seasons: [SeasonConfig::default(); TOU_SEASONS],
        }
    }
}

/// One year slot of the calendar configuration. The year is stored as an
/// offset from [`crate::constants::CALENDAR_YEAR_EPOCH`]; slots 0 and 1
/// of the event array are reserved for the DST events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarYearConfig {
    pub year: u8,
    pub events: [CalendarCfgEvent; CAL_EVENTS_PER_YEAR],
}

impl Default for CalendarYearConfig {
    fn default() -> Self {
        CalendarYearConfig {
            year: 0,
            events: [CalendarCfgEvent::unused(); CAL_EVENTS_PER_YEAR],
        }
    }
}

impl CalendarYearConfig {
    /// True for a slot the writer never filled.
    pub fn is_unfilled(&self) -> bool {
        self.year == 0 && self.events.iter().all(|e| e.raw() == 0)
    }
}

/// Calendar configuration record: the DST switch time and shift length
/// plus the fixed year slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarConfig {
    pub dst_hour: u8,
    pub dst_minute: u8,
    pub dst_offset_minutes: u8,
    pub years: [CalendarYearConfig; CAL_YEARS],
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            dst_hour: 0,
            dst_minute: 0,
            dst_offset_minutes: 0,
            years: [CalendarYearConfig::default(); CAL_YEARS],
        }
    }
}

/// Typed view of the full manufacturer configuration table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table2048 {
    pub display: DisplayConfig,
    pub demand: DemandConfig,
    pub constants: ConstantsConfig,
    pub tou: TouConfig,
    pub calendar: CalendarConfig,
}

impl Table2048 {
    /// Parses the full table blob.
    pub fn parse(input: &[u8]) -> Result<Self, PsemError> {
        let (_, table) = parse_table2048(input).map_err(|e| PsemError::TableParse {
            table: TABLE_MFG_CONFIG,
            reason: e.to_string(),
        })?;
        Ok(table)
    }

    /// Encodes the table back into its fixed-size blob.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_display(&self.display, &mut out);
        encode_demand(&self.demand, &mut out);
        encode_constants(&self.constants, &mut out);
        encode_tou(&self.tou, &mut out);
        encode_calendar(&self.calendar, &mut out);
        out
    }
}

// ----------------------------------------------------------------------------
// Parsers
// ----------------------------------------------------------------------------

fn parse_display_entry(input: &[u8]) -> IResult<&[u8], DisplayEntry> {
    let (input, lid) = le_u32(input)?;
    let (input, format) = le_u16(input)?;
    let (input, dimension) = le_u8(input)?;
    Ok((
        input,
        DisplayEntry {
            lid: Lid(lid),
            format: DisplayFormatCode(format),
            dimension: DisplayDimension(dimension),
        },
    ))
}

fn parse_display(input: &[u8]) -> IResult<&[u8], DisplayConfig> {
    let (input, normal_count) = le_u8(input)?;
    let (input, alternate_count) = le_u8(input)?;
    let (input, test_count) = le_u8(input)?;

    let total = usize::from(normal_count) + usize::from(alternate_count) + usize::from(test_count);
    if total > MAX_DISPLAY_ENTRIES {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let mut remaining = input;
    let mut entries = Vec::with_capacity(total);
    for _ in 0..MAX_DISPLAY_ENTRIES {
        let (rest, entry) = parse_display_entry(remaining)?;
        remaining = rest;
        entries.push(entry);
    }
    entries.truncate(total);

    let alternate = entries.split_off(usize::from(normal_count));
    let (alternate, test) = {
        let mut alternate = alternate;
        let test = alternate.split_off(usize::from(alternate_count));
        (alternate, test)
    };

    Ok((
        remaining,
        DisplayConfig {
            normal: entries,
            alternate,
            test,
        },
    ))
}

fn parse_demand(input: &[u8]) -> IResult<&[u8], DemandConfig> {
    let (input, interval_minutes) = le_u8(input)?;
    let (input, subintervals) = le_u8(input)?;
    let (input, test_interval_minutes) = le_u8(input)?;
    let (input, reset_holdoff_seconds) = le_u16(input)?;
    let (input, self_read_buffers) = le_u8(input)?;
    let (input, demand_reset_buffers) = le_u8(input)?;
    Ok((
        input,
        DemandConfig {
            interval_minutes,
            subintervals,
            test_interval_minutes,
            reset_holdoff_seconds,
            self_read_buffers,
            demand_reset_buffers,
        },
    ))
}

fn parse_constants(input: &[u8]) -> IResult<&[u8], ConstantsConfig> {
    let (input, ct_multiplier) = le_u16(input)?;
    let (input, vt_multiplier) = le_u16(input)?;
    let (input, register_multiplier) = le_u32(input)?;
    Ok((
        input,
        ConstantsConfig {
            ct_multiplier,
            vt_multiplier,
            register_multiplier,
        },
    ))
}

fn parse_season(input: &[u8]) -> IResult<&[u8], SeasonConfig> {
    let mut season = SeasonConfig::default();
    let mut remaining = input;
    for slot in season.typical_week.iter_mut() {
        let (rest, day_type) = le_u8(remaining)?;
        *slot = day_type;
        remaining = rest;
    }
    for day in season.day_events.iter_mut() {
        for event in day.iter_mut() {
            let (rest, word) = le_u16(remaining)?;
            *event = DayEvent(word);
            remaining = rest;
        }
    }
    Ok((remaining, season))
}

fn parse_tou(input: &[u8]) -> IResult<&[u8], TouConfig> {
    let (input, season_count) = le_u8(input)?;
    if usize::from(season_count) > TOU_SEASONS {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let mut tou = TouConfig {
        season_count,
        ..TouConfig::default()
    };
    let mut remaining = input;
    for season in tou.seasons.iter_mut() {
        let (rest, parsed) = parse_season(remaining)?;
        *season = parsed;
        remaining = rest;
    }
    Ok((remaining, tou))
}

fn parse_calendar_year(input: &[u8]) -> IResult<&[u8], CalendarYearConfig> {
    let (input, year) = le_u8(input)?;
    let mut cfg = CalendarYearConfig {
        year,
        ..CalendarYearConfig::default()
    };
    let mut remaining = input;
    for event in cfg.events.iter_mut() {
        let (rest, word) = le_u16(remaining)?;
        *event = CalendarCfgEvent(word);
        remaining = rest;
    }
    Ok((remaining, cfg))
}

fn parse_calendar(input: &[u8]) -> IResult<&[u8], CalendarConfig> {
    let (input, dst_hour) = le_u8(input)?;
    let (input, dst_minute) = le_u8(input)?;
    let (input, dst_offset_minutes) = le_u8(input)?;
    let mut calendar = CalendarConfig {
        dst_hour,
        dst_minute,
        dst_offset_minutes,
        ..CalendarConfig::default()
    };
    let mut remaining = input;
    for year in calendar.years.iter_mut() {
        let (rest, parsed) = parse_calendar_year(remaining)?;
        *year = parsed;
        remaining = rest;
    }
    Ok((remaining, calendar))
}

fn parse_table2048(input: &[u8]) -> IResult<&[u8], Table2048> {
    let (input, display) = parse_display(input)?;
    let (input, demand) = parse_demand(input)?;
    let (input, constants) = parse_constants(input)?;
    let (input, tou) = parse_tou(input)?;
    let (input, calendar) = parse_calendar(input)?;
    Ok((
        input,
        Table2048 {
            display,
            demand,
            constants,
            tou,
            calendar,
        },
    ))
}

// ----------------------------------------------------------------------------
// Encoders
// ----------------------------------------------------------------------------

fn encode_display_entry(entry: &DisplayEntry, out: &mut Vec<u8>) {
    out.extend_from_slice(&entry.lid.0.to_le_bytes());
    out.extend_from_slice(&entry.format.raw().to_le_bytes());
    out.push(entry.dimension.raw());
}

fn encode_display(config: &DisplayConfig, out: &mut Vec<u8>) {
    out.push(config.normal.len() as u8);
    out.push(config.alternate.len() as u8);
    out.push(config.test.len() as u8);
    let mut written = 0;
    for entry in config
        .normal
        .iter()
        .chain(&config.alternate)
        .chain(&config.test)
    {
        encode_display_entry(entry, out);
        written += 1;
    }
    let empty = DisplayEntry {
        lid: Lid(0),
        format: DisplayFormatCode(0),
        dimension: DisplayDimension(0),
    };
    for _ in written..MAX_DISPLAY_ENTRIES {
        encode_display_entry(&empty, out);
    }
}

fn encode_demand(config: &DemandConfig, out: &mut Vec<u8>) {
    out.push(config.interval_minutes);
    out.push(config.subintervals);
    out.push(config.test_interval_minutes);
    out.extend_from_slice(&config.reset_holdoff_seconds.to_le_bytes());
    out.push(config.self_read_buffers);
    out.push(config.demand_reset_buffers);
}

fn encode_constants(config: &ConstantsConfig, out: &mut Vec<u8>) {
    out.extend_from_slice(&config.ct_multiplier.to_le_bytes());
    out.extend_from_slice(&config.vt_multiplier.to_le_bytes());
    out.extend_from_slice(&config.register_multiplier.to_le_bytes());
}

fn encode_tou(config: &TouConfig, out: &mut Vec<u8>) {
    out.push(config.season_count);
    for season in &config.seasons {
        out.extend_from_slice(&season.typical_week);
        for day in &season.day_events {
            for event in day {
                out.extend_from_slice(&event.raw().to_le_bytes());
            }
        }
    }
}

fn encode_calendar(config: &CalendarConfig, out: &mut Vec<u8>) {
    out.push(config.dst_hour);
    out.push(config.dst_minute);
    out.push(config.dst_offset_minutes);
    for year in &config.years {
        out.push(year.year);
        for event in &year.events {
            out.extend_from_slice(&event.raw().to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayType, UnitType};

    fn sample_table() -> Table2048 {
        let mut table = Table2048::default();
        table.display.normal.push(DisplayEntry {
            lid: Lid(0x1400_0080),
            format: DisplayFormatCode::from_parts(
                DisplayType::UnsignedIntegerLeadingZeros,
                UnitType::KilowattHours,
            ),
            dimension: DisplayDimension::new(6, 0),
        });
        table.display.test.push(DisplayEntry {
            lid: Lid(0x1404_00FF),
            format: DisplayFormatCode::from_parts(DisplayType::AllSegments, UnitType::None),
            dimension: DisplayDimension::new(6, 0),
        });
        table.demand.interval_minutes = 15;
        table.demand.subintervals = 3;
        table.demand.self_read_buffers = 4;
        table.demand.demand_reset_buffers = 2;
        table.constants.ct_multiplier = 200;
        table.tou.season_count = 1;
        table.tou.seasons[0].typical_week = [1, 0, 0, 0, 0, 0, 1];
        table.tou.seasons[0].day_events[0][0] = DayEvent::rate_change(1, 420);
        table.calendar.dst_hour = 2;
        table.calendar.years[0].year = 26;
        table.calendar.years[0].events[0] = CalendarCfgEvent::to_dst(2, 7);
        table
    }

    #[test]
    fn test_table_round_trip() {
        let table = sample_table();
        let bytes = table.encode();
        let back = Table2048::parse(&bytes).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_encoded_size_is_stable() {
        // The table is fixed-size regardless of how many entries are used.
        let empty = Table2048::default().encode();
        let filled = sample_table().encode();
        assert_eq!(empty.len(), filled.len());
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let mut bytes = sample_table().encode();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            Table2048::parse(&bytes),
            Err(PsemError::TableParse { table: 2048, .. })
        ));
    }

    #[test]
    fn test_bad_season_count_rejected() {
        let mut bytes = sample_table().encode();
        // Season count sits right after the display and demand and
        // constants records.
        let tou_offset = 3 + MAX_DISPLAY_ENTRIES * 7 + 7 + 8;
        bytes[tou_offset] = 9;
        assert!(Table2048::parse(&bytes).is_err());
    }
}
