//! Bit-level codecs for the two packed event words in the meter tables.
//!
//! A day event word carries a 5-bit event identifier plus the hour and
//! minute at which it fires. Identifier assignments:
//!
//! - 0: no more changes (terminator)
//! - 1..=8: rate change to rate `id - 1`
//! - 9..=12: output `id - 9` on
//! - 13..=16: output `id - 13` off
//!
//! The classifiers below partition this space; every valid identifier
//! belongs to exactly one category. Identifiers 17..=31 are unassigned.
//!
//! A calendar event word carries a type nibble plus 0-based month and
//! day fields: type 0 is an unused slot, 1/2 are to/from DST, 3 is a
//! holiday, and 4..=11 start season `type - 4`.

use crate::constants::{
    CAL_EVENT_DAY_MASK, CAL_EVENT_DAY_SHIFT, CAL_EVENT_MONTH_MASK, CAL_EVENT_MONTH_SHIFT,
    CAL_EVENT_TYPE_MASK, DAY_EVENT_HOUR_MASK, DAY_EVENT_HOUR_SHIFT, DAY_EVENT_ID_MASK,
    DAY_EVENT_MINUTE_MASK, DAY_EVENT_MINUTE_SHIFT,
};
use crate::tou::schedule::CalendarEventKind;

const RATE_ID_BASE: u8 = 1;
const OUTPUT_ON_ID_BASE: u8 = 9;
const OUTPUT_OFF_ID_BASE: u8 = 13;

const CAL_TYPE_UNUSED: u8 = 0;
const CAL_TYPE_TO_DST: u8 = 1;
const CAL_TYPE_FROM_DST: u8 = 2;
const CAL_TYPE_HOLIDAY: u8 = 3;
const CAL_TYPE_SEASON_BASE: u8 = 4;

/// One switchpoint slot of a day type in the TOU configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayEvent(pub u16);

impl DayEvent {
    fn pack(id: u8, minute_of_day: u16) -> Self {
        let hour = minute_of_day / 60;
        let minute = minute_of_day % 60;
        DayEvent(
            (u16::from(id) & DAY_EVENT_ID_MASK)
                | ((minute << DAY_EVENT_MINUTE_SHIFT) & DAY_EVENT_MINUTE_MASK)
                | ((hour << DAY_EVENT_HOUR_SHIFT) & DAY_EVENT_HOUR_MASK),
        )
    }

    /// A rate change to `rate` at `minute_of_day`.
    pub fn rate_change(rate: u8, minute_of_day: u16) -> Self {
        Self::pack(RATE_ID_BASE + rate, minute_of_day)
    }

    /// Output `output` switching on at `minute_of_day`.
    pub fn output_on(output: u8, minute_of_day: u16) -> Self {
        Self::pack(OUTPUT_ON_ID_BASE + output, minute_of_day)
    }

    /// Output `output` switching off at `minute_of_day`.
    pub fn output_off(output: u8, minute_of_day: u16) -> Self {
        Self::pack(OUTPUT_OFF_ID_BASE + output, minute_of_day)
    }

    /// The terminator slot value.
    pub fn terminator() -> Self {
        DayEvent(0)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn event_id(self) -> u8 {
        (self.0 & DAY_EVENT_ID_MASK) as u8
    }

    pub fn minute_of_day(self) -> u16 {
        let hour = (self.0 & DAY_EVENT_HOUR_MASK) >> DAY_EVENT_HOUR_SHIFT;
        let minute = (self.0 & DAY_EVENT_MINUTE_MASK) >> DAY_EVENT_MINUTE_SHIFT;
        hour * 60 + minute
    }

    pub fn is_terminator(self) -> bool {
        self.event_id() == 0
    }

    pub fn is_rate_change(self) -> bool {
        (RATE_ID_BASE..OUTPUT_ON_ID_BASE).contains(&self.event_id())
    }

    pub fn is_output_on(self) -> bool {
        (OUTPUT_ON_ID_BASE..OUTPUT_OFF_ID_BASE).contains(&self.event_id())
    }

    pub fn is_output_off(self) -> bool {
        (OUTPUT_OFF_ID_BASE..OUTPUT_OFF_ID_BASE + 4).contains(&self.event_id())
    }

    /// Rate index for rate-change events.
    pub fn rate_index(self) -> Option<u8> {
        self.is_rate_change().then(|| self.event_id() - RATE_ID_BASE)
    }

    /// Output index for output-on and output-off events.
    pub fn output_index(self) -> Option<u8> {
        if self.is_output_on() {
            Some(self.event_id() - OUTPUT_ON_ID_BASE)
        } else if self.is_output_off() {
            Some(self.event_id() - OUTPUT_OFF_ID_BASE)
        } else {
            None
        }
    }
}

/// One event slot of a calendar year in the calendar configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarCfgEvent(pub u16);

impl CalendarCfgEvent {
    fn pack(event_type: u8, month0: u8, day0: u8) -> Self {
        CalendarCfgEvent(
            (u16::from(event_type) & CAL_EVENT_TYPE_MASK)
                | ((u16::from(month0) << CAL_EVENT_MONTH_SHIFT) & CAL_EVENT_MONTH_MASK)
                | ((u16::from(day0) << CAL_EVENT_DAY_SHIFT) & CAL_EVENT_DAY_MASK),
        )
    }

    pub fn unused() -> Self {
        CalendarCfgEvent(0)
    }

    /// Season `season` (0-based) starting on the 0-based month/day.
    pub fn season(season: u8, month0: u8, day0: u8) -> Self {
        Self::pack(CAL_TYPE_SEASON_BASE + season, month0, day0)
    }

    pub fn holiday(month0: u8, day0: u8) -> Self {
        Self::pack(CAL_TYPE_HOLIDAY, month0, day0)
    }

    pub fn to_dst(month0: u8, day0: u8) -> Self {
        Self::pack(CAL_TYPE_TO_DST, month0, day0)
    }

    pub fn from_dst(month0: u8, day0: u8) -> Self {
        Self::pack(CAL_TYPE_FROM_DST, month0, day0)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn month0(self) -> u8 {
        ((self.0 & CAL_EVENT_MONTH_MASK) >> CAL_EVENT_MONTH_SHIFT) as u8
    }

    pub fn day0(self) -> u8 {
        ((self.0 & CAL_EVENT_DAY_MASK) >> CAL_EVENT_DAY_SHIFT) as u8
    }

    /// Classifies the slot; `None` for unused or unassigned types. For
    /// season starts the second element is the 0-based season index.
    pub fn classify(self) -> Option<(CalendarEventKind, u8)> {
        let event_type = (self.0 & CAL_EVENT_TYPE_MASK) as u8;
        match event_type {
            CAL_TYPE_UNUSED => None,
            CAL_TYPE_TO_DST => Some((CalendarEventKind::ToDst, 0)),
            CAL_TYPE_FROM_DST => Some((CalendarEventKind::FromDst, 0)),
            CAL_TYPE_HOLIDAY => Some((CalendarEventKind::Holiday, 0)),
            t if (CAL_TYPE_SEASON_BASE..CAL_TYPE_SEASON_BASE + 8).contains(&t) => {
                Some((CalendarEventKind::Season, t - CAL_TYPE_SEASON_BASE))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::proptest;

    #[test]
    fn test_day_event_round_trip() {
        let ev = DayEvent::rate_change(2, 1265);
        assert_eq!(ev.minute_of_day(), 1265);
        assert_eq!(ev.rate_index(), Some(2));
        assert!(ev.is_rate_change());
    }

    #[test]
    fn test_output_events() {
        let on = DayEvent::output_on(1, 480);
        let off = DayEvent::output_off(1, 1020);
        assert!(on.is_output_on());
        assert!(off.is_output_off());
        assert_eq!(on.output_index(), Some(1));
        assert_eq!(off.output_index(), Some(1));
    }

    #[test]
    fn test_terminator() {
        assert!(DayEvent::terminator().is_terminator());
        assert_eq!(DayEvent::terminator().rate_index(), None);
    }

    #[test]
    fn test_end_of_day_encodable() {
        // Synthetic output-off events may land on minute 1440.
        let off = DayEvent::output_off(0, 1440);
        assert_eq!(off.minute_of_day(), 1440);
    }

    #[test]
    fn test_calendar_event_classify() {
        assert_eq!(
            CalendarCfgEvent::season(3, 5, 0).classify(),
            Some((CalendarEventKind::Season, 3))
        );
        assert_eq!(
            CalendarCfgEvent::holiday(11, 24).classify(),
            Some((CalendarEventKind::Holiday, 0))
        );
        assert_eq!(CalendarCfgEvent::unused().classify(), None);
    }

    #[test]
    fn test_calendar_event_fields() {
        let ev = CalendarCfgEvent::to_dst(2, 8);
        assert_eq!(ev.month0(), 2);
        assert_eq!(ev.day0(), 8);
    }

    proptest! {
        // Every event identifier belongs to at most one category.
        #[test]
        fn prop_event_categories_partition(raw in 0u16..=0xFFFF) {
            let ev = DayEvent(raw);
            let categories = [
                ev.is_terminator(),
                ev.is_rate_change(),
                ev.is_output_on(),
                ev.is_output_off(),
            ];
            let count = categories.iter().filter(|c| **c).count();
            prop_assert!(count <= 1);
            // Identifiers up to 16 are always classified.
            if ev.event_id() <= 16 {
                prop_assert_eq!(count, 1);
            }
        }

        #[test]
        fn prop_day_event_time_round_trip(minute in 0u16..1440, rate in 0u8..8) {
            let ev = DayEvent::rate_change(rate, minute);
            prop_assert_eq!(ev.minute_of_day(), minute);
            prop_assert_eq!(ev.rate_index(), Some(rate));
        }
    }
}
