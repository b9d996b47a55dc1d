//! Bidirectional translation between the meter's compact TOU/calendar
//! table encoding and the generic schedule model.

use chrono::{Datelike, NaiveDateTime};

use crate::constants::{
    CALENDAR_YEAR_EPOCH, CAL_EVENTS_PER_YEAR, CAL_YEARS, HOLIDAY_DAY_TYPE, MINUTES_PER_DAY,
    TABLE_MFG_CONFIG, TOU_DAY_TYPES, TOU_EVENTS_PER_DAY, TOU_SEASONS,
};
use crate::error::PsemError;
use crate::logging::log_debug;
use crate::tables::table2048::{CalendarConfig, TouConfig};
use crate::tou::dst::TouReconfigResult;
use crate::tou::events::{CalendarCfgEvent, DayEvent};
use crate::tou::schedule::{
    CalendarEvent, CalendarEventKind, CalendarYear, DstSchedule, Pattern, Season, SwitchPoint,
    TouSchedule,
};

const DAY_TYPE_NAMES: [&str; TOU_DAY_TYPES] = ["Weekday", "Saturday", "Sunday", "Holiday"];

/// Translates the meter's TOU and calendar configuration records into a
/// generic schedule.
pub fn read_tou_schedule(
    tou: &TouConfig,
    calendar: &CalendarConfig,
) -> Result<TouSchedule, PsemError> {
    let mut seasons = Vec::new();
    let mut patterns = Vec::new();

    // The typical week is read from season 0 only; the meter family is
    // assumed to carry an identical mapping in every season.
    let typical_week = tou.seasons[0].typical_week;

    for season_index in 0..usize::from(tou.season_count) {
        let config = &tou.seasons[season_index];
        let mut normal_patterns = Vec::new();
        let mut holiday_patterns = Vec::new();

        for day_type in 0..TOU_DAY_TYPES {
            // Pattern identifiers are globally unique across seasons.
            let id = (season_index * TOU_DAY_TYPES + day_type) as u16;
            patterns.push(Pattern {
                id,
                name: format!("Season {} {}", season_index + 1, DAY_TYPE_NAMES[day_type]),
                switchpoints: translate_day_events(&config.day_events[day_type]),
            });
            if day_type == HOLIDAY_DAY_TYPE {
                holiday_patterns.push(id);
            } else {
                normal_patterns.push(id);
            }
        }

        seasons.push(Season {
            index: (season_index + 1) as u8,
            name: format!("Season {}", season_index + 1),
            normal_patterns,
            holiday_patterns,
            typical_week,
        });
    }

    Ok(TouSchedule {
        name: format!("Table {TABLE_MFG_CONFIG} schedule"),
        seasons,
        patterns,
        years: read_calendar_years(calendar)?,
    })
}

/// Synthesizes switchpoints from one day type's event slots.
///
/// Each rate or output-on event becomes a switchpoint whose end time is
/// found by a forward nearest-neighbor scan for the next event of the
/// matching category; the end defaults to midnight when none exists.
fn translate_day_events(events: &[DayEvent; TOU_EVENTS_PER_DAY]) -> Vec<SwitchPoint> {
    let used: Vec<DayEvent> = events
        .iter()
        .copied()
        .take_while(|e| !e.is_terminator())
        .collect();

    let mut switchpoints = Vec::new();
    for (slot, event) in used.iter().enumerate() {
        let start = event.minute_of_day();
        if let Some(rate) = event.rate_index() {
            let stop = used[slot + 1..]
                .iter()
                .find(|e| e.is_rate_change())
                .map(|e| e.minute_of_day())
                .unwrap_or(MINUTES_PER_DAY);
            switchpoints.push(SwitchPoint::rate(start, stop, rate));
        } else if event.is_output_on() {
            let output = event.output_index().unwrap_or(0);
            let stop = used[slot + 1..]
                .iter()
                .find(|e| e.is_output_off() && e.output_index() == Some(output))
                .map(|e| e.minute_of_day())
                .unwrap_or(MINUTES_PER_DAY);
            switchpoints.push(SwitchPoint::output(start, stop, output));
        }
        // Output-off events close an earlier on event and synthesize
        // nothing themselves.
    }
    switchpoints
}

/// Walks the fixed year slots of the calendar configuration.
fn read_calendar_years(calendar: &CalendarConfig) -> Result<Vec<CalendarYear>, PsemError> {
    let mut years = Vec::new();
    let mut previous_year: Option<u8> = None;

    for slot in &calendar.years {
        if slot.is_unfilled() {
            break;
        }
        // A stored year lower than its predecessor signals the end of the
        // filled region.
        if let Some(previous) = previous_year {
            if slot.year < previous {
                break;
            }
        }
        previous_year = Some(slot.year);

        let year = i32::from(CALENDAR_YEAR_EPOCH) + i32::from(slot.year);
        let mut events = Vec::new();
        for word in &slot.events {
            let Some((kind, index)) = word.classify() else {
                continue;
            };
            let date = chrono::NaiveDate::from_ymd_opt(
                year,
                u32::from(word.month0()) + 1,
                u32::from(word.day0()) + 1,
            )
            .ok_or_else(|| PsemError::TableParse {
                table: TABLE_MFG_CONFIG,
                reason: format!(
                    "invalid calendar date {}-{} in year {year}",
                    word.month0(),
                    word.day0()
                ),
            })?;
            // DST events fire at the configured switch time; everything
            // else is dated at midnight.
            let at = match kind {
                CalendarEventKind::ToDst | CalendarEventKind::FromDst => date
                    .and_hms_opt(
                        u32::from(calendar.dst_hour),
                        u32::from(calendar.dst_minute),
                        0,
                    )
                    .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN)),
                _ => date.and_time(chrono::NaiveTime::MIN),
            };
            events.push(CalendarEvent { at, kind, index });
        }
        years.push(CalendarYear {
            year: year as u16,
            events,
        });
    }

    Ok(years)
}

/// Populates the TOU configuration record from a generic schedule.
pub fn overwrite_tou_config(schedule: &TouSchedule, tou: &mut TouConfig) -> TouReconfigResult {
    if schedule.seasons.len() > TOU_SEASONS {
        return TouReconfigResult::ScheduleNotSupported;
    }
    if schedule.seasons.is_empty() {
        return TouReconfigResult::FileNotFound;
    }

    *tou = TouConfig::default();
    tou.season_count = schedule.seasons.len() as u8;

    for (season_index, season) in schedule.seasons.iter().enumerate() {
        let config = &mut tou.seasons[season_index];
        config.typical_week = season.typical_week;

        for day_type in 0..TOU_DAY_TYPES {
            let pattern_id = if day_type == HOLIDAY_DAY_TYPE {
                season.holiday_patterns.first()
            } else {
                season.normal_patterns.get(day_type)
            };
            let Some(&pattern_id) = pattern_id else {
                continue;
            };
            let Some(pattern) = schedule.pattern(pattern_id) else {
                log_debug(&format!("schedule references missing pattern {pattern_id}"));
                return TouReconfigResult::FileNotFound;
            };

            let mut events: Vec<DayEvent> = Vec::new();
            for switchpoint in &pattern.switchpoints {
                match switchpoint.kind {
                    crate::tou::schedule::SwitchPointKind::Rate => {
                        events.push(DayEvent::rate_change(switchpoint.index, switchpoint.start));
                    }
                    crate::tou::schedule::SwitchPointKind::Output => {
                        // Output intervals need an explicit matching off
                        // event after the on event.
                        events.push(DayEvent::output_on(switchpoint.index, switchpoint.start));
                        events.push(DayEvent::output_off(switchpoint.index, switchpoint.stop));
                    }
                }
            }
            events.sort_by_key(|e| e.minute_of_day());

            if events.len() > TOU_EVENTS_PER_DAY {
                return TouReconfigResult::ScheduleNotSupported;
            }
            for (slot, event) in events.into_iter().enumerate() {
                config.day_events[day_type][slot] = event;
            }
        }
    }

    TouReconfigResult::Success
}

/// Populates the calendar configuration record from a generic schedule
/// and an optional DST schedule.
pub fn overwrite_calendar_config(
    schedule: &TouSchedule,
    dst: Option<&DstSchedule>,
    calendar: &mut CalendarConfig,
) -> TouReconfigResult {
    if schedule.years.is_empty() {
        return TouReconfigResult::FileNotFound;
    }
    if schedule.years.len() > CAL_YEARS {
        return TouReconfigResult::ScheduleNotSupported;
    }

    *calendar = CalendarConfig::default();
    if let Some(dst) = dst {
        calendar.dst_hour = dst.hour;
        calendar.dst_minute = dst.minute;
        calendar.dst_offset_minutes = dst.offset_minutes;
    }

    for (year_slot, year) in schedule.years.iter().enumerate() {
        if year.year < CALENDAR_YEAR_EPOCH
            || year.year >= CALENDAR_YEAR_EPOCH + u16::from(u8::MAX)
        {
            return TouReconfigResult::ScheduleNotSupported;
        }
        let config = &mut calendar.years[year_slot];
        config.year = (year.year - CALENDAR_YEAR_EPOCH) as u8;

        // Slots 0 and 1 are reserved for the to/from-DST pair in every
        // year, whether or not this write carries DST dates; dated
        // events start at slot 2. A later DST-only update rewrites the
        // reserved pair in place without touching the rest.
        let mut slots: Vec<CalendarCfgEvent> =
            vec![CalendarCfgEvent::unused(), CalendarCfgEvent::unused()];
        if let Some(dst) = dst {
            let Some(dates) = dst.year(year.year) else {
                return TouReconfigResult::FileNotFound;
            };
            slots[0] = CalendarCfgEvent::to_dst(
                dates.to_dst.month0() as u8,
                dates.to_dst.day0() as u8,
            );
            slots[1] = CalendarCfgEvent::from_dst(
                dates.from_dst.month0() as u8,
                dates.from_dst.day0() as u8,
            );
        } else {
            for event in &year.events {
                match event.kind {
                    CalendarEventKind::ToDst => slots[0] = encode_calendar_event(event),
                    CalendarEventKind::FromDst => slots[1] = encode_calendar_event(event),
                    _ => {}
                }
            }
        }

        let mut dated: Vec<CalendarEvent> = year
            .events
            .iter()
            .filter(|e| !matches!(e.kind, CalendarEventKind::ToDst | CalendarEventKind::FromDst))
            .copied()
            .collect();
        dated.sort_by_key(|e| e.at);

        // The meter's first year must open with a season in effect. When
        // the schedule does not start one on Jan 1, inherit the season
        // active at the end of the prior year, which for an annually
        // repeating schedule is the year's chronologically last season
        // event.
        if year_slot == 0 && !has_jan1_season(&dated) {
            let inherited = dated
                .iter()
                .rev()
                .find(|e| e.kind == CalendarEventKind::Season)
                .map(|e| e.index)
                .or_else(|| schedule.seasons.first().map(|s| s.index.saturating_sub(1)))
                .unwrap_or(0);
            dated.insert(
                0,
                CalendarEvent {
                    at: jan1(year.year),
                    kind: CalendarEventKind::Season,
                    index: inherited,
                },
            );
        }

        for event in &dated {
            slots.push(encode_calendar_event(event));
        }
        if slots.len() > CAL_EVENTS_PER_YEAR {
            return TouReconfigResult::ScheduleNotSupported;
        }
        for (slot, word) in slots.into_iter().enumerate() {
            config.events[slot] = word;
        }
    }

    TouReconfigResult::Success
}

fn has_jan1_season(events: &[CalendarEvent]) -> bool {
    events.iter().any(|e| {
        e.kind == CalendarEventKind::Season && e.at.month() == 1 && e.at.day() == 1
    })
}

fn jan1(year: u16) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(i32::from(year), 1, 1)
        .unwrap_or_default()
        .and_time(chrono::NaiveTime::MIN)
}

fn encode_calendar_event(event: &CalendarEvent) -> CalendarCfgEvent {
    let month0 = event.at.month0() as u8;
    let day0 = event.at.day0() as u8;
    match event.kind {
        CalendarEventKind::Season => CalendarCfgEvent::season(event.index, month0, day0),
        CalendarEventKind::Holiday => CalendarCfgEvent::holiday(month0, day0),
        CalendarEventKind::ToDst => CalendarCfgEvent::to_dst(month0, day0),
        CalendarEventKind::FromDst => CalendarCfgEvent::from_dst(month0, day0),
    }
}
