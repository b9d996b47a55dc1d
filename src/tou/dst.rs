//! Daylight-saving reconfiguration.
//!
//! Updating the DST dates in a live meter is a multi-step exchange:
//! validate the clock, read the configuration table, rewrite the DST
//! slots of every configured year, write the table back, and run the
//! reconfiguration procedure. The steps are modeled as an explicit state
//! machine so a caller can observe where a failed update stopped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{TABLE_CLOCK, TABLE_MFG_CONFIG};
use crate::error::PsemError;
use crate::logging::{log_debug, log_info, log_warn};
use crate::psem::procedures::{ProcedureId, ProcedureResultCode};
use crate::psem::PsemSession;
use crate::tables::clock::{ClockRecord, ClockStatus};
use crate::tables::table2048::Table2048;
use crate::tou::events::CalendarCfgEvent;
use crate::tou::schedule::DstSchedule;

/// Outcome of a DST date update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DstUpdateResult {
    Success,
    Error,
    ClockError,
    InsufficientSecurityError,
    DatesNotFound,
    DatesExpired,
}

/// Outcome of a TOU schedule reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouReconfigResult {
    Success,
    Error,
    SecurityError,
    ClockError,
    FileNotFound,
    ScheduleExpired,
    ScheduleNotSupported,
}

/// Progress of a [`DstReconfiguration`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstReconfigState {
    NotConfigured,
    ValidatingClock,
    ReadingDates,
    WritingConfig,
    Reconfiguring,
    Done,
    Error,
    ClockError,
    InsufficientSecurityError,
}

/// Drives the DST update sequence against a session.
#[derive(Debug)]
pub struct DstReconfiguration {
    state: DstReconfigState,
}

impl Default for DstReconfiguration {
    fn default() -> Self {
        DstReconfiguration {
            state: DstReconfigState::NotConfigured,
        }
    }
}

impl DstReconfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state reached by the most recent [`run`](Self::run) call.
    pub fn state(&self) -> DstReconfigState {
        self.state
    }

    /// Runs the full update sequence. The returned result mirrors the
    /// terminal state.
    pub fn run<S: PsemSession>(
        &mut self,
        session: &mut S,
        dst: &DstSchedule,
        today: NaiveDate,
    ) -> DstUpdateResult {
        self.state = DstReconfigState::ValidatingClock;
        match self.validate_clock(session) {
            Ok(true) => {}
            Ok(false) => {
                self.state = DstReconfigState::ClockError;
                return DstUpdateResult::ClockError;
            }
            Err(error) => return self.fail(error),
        }

        self.state = DstReconfigState::ReadingDates;
        if dst.dates.is_empty() {
            self.state = DstReconfigState::Error;
            return DstUpdateResult::DatesNotFound;
        }
        if dst.is_expired(today) {
            self.state = DstReconfigState::Error;
            return DstUpdateResult::DatesExpired;
        }

        self.state = DstReconfigState::WritingConfig;
        if let Err(error) = self.write_dates(session, dst) {
            return self.fail(error);
        }

        self.state = DstReconfigState::Reconfiguring;
        match run_procedure(session, ProcedureId::ReconfigureDst, &[]) {
            Ok(ProcedureResultCode::Completed) => {}
            Ok(ProcedureResultCode::NoAuthorization) => {
                self.state = DstReconfigState::InsufficientSecurityError;
                return DstUpdateResult::InsufficientSecurityError;
            }
            Ok(code) => {
                log_warn(&format!("DST reconfigure procedure returned {code:?}"));
                self.state = DstReconfigState::Error;
                return DstUpdateResult::Error;
            }
            Err(error) => return self.fail(error),
        }

        log_info("DST dates updated");
        self.state = DstReconfigState::Done;
        DstUpdateResult::Success
    }

    fn fail(&mut self, error: PsemError) -> DstUpdateResult {
        match error {
            PsemError::SecurityRejected(_) => {
                log_warn("DST update rejected for insufficient security");
                self.state = DstReconfigState::InsufficientSecurityError;
                DstUpdateResult::InsufficientSecurityError
            }
            other => {
                log_warn(&format!("DST update failed: {other}"));
                self.state = DstReconfigState::Error;
                DstUpdateResult::Error
            }
        }
    }

    fn validate_clock<S: PsemSession>(&self, session: &mut S) -> Result<bool, PsemError> {
        let raw = session.read_table(TABLE_CLOCK)?;
        let clock = ClockRecord::parse(&raw)?;
        log_debug(&format!("meter clock {} status {:?}", clock.now, clock.status));
        Ok(clock.status.contains(ClockStatus::CLOCK_RUNNING))
    }

    /// Rewrites the DST slots of every configured calendar year in place.
    fn write_dates<S: PsemSession>(
        &self,
        session: &mut S,
        dst: &DstSchedule,
    ) -> Result<(), PsemError> {
        let raw = session.read_table(TABLE_MFG_CONFIG)?;
        let mut table = Table2048::parse(&raw)?;

        table.calendar.dst_hour = dst.hour;
        table.calendar.dst_minute = dst.minute;
        table.calendar.dst_offset_minutes = dst.offset_minutes;

        for slot in table.calendar.years.iter_mut() {
            if slot.is_unfilled() {
                break;
            }
            let year = u16::from(slot.year) + crate::constants::CALENDAR_YEAR_EPOCH;
            let Some(dates) = dst.year(year) else {
                log_debug(&format!("no DST dates for configured year {year}"));
                continue;
            };
            let mut events = vec![
                CalendarCfgEvent::to_dst(
                    chrono::Datelike::month0(&dates.to_dst) as u8,
                    chrono::Datelike::day0(&dates.to_dst) as u8,
                ),
                CalendarCfgEvent::from_dst(
                    chrono::Datelike::month0(&dates.from_dst) as u8,
                    chrono::Datelike::day0(&dates.from_dst) as u8,
                ),
            ];
            events.extend(
                slot.events
                    .iter()
                    .skip(2)
                    .copied()
                    .filter(|e| e.classify().is_some()),
            );
            let mut rebuilt = [CalendarCfgEvent::unused(); crate::constants::CAL_EVENTS_PER_YEAR];
            for (index, event) in events.into_iter().take(rebuilt.len()).enumerate() {
                rebuilt[index] = event;
            }
            slot.events = rebuilt;
        }

        session.write_table(TABLE_MFG_CONFIG, &table.encode())
    }
}

/// Runs a procedure bracketed by the configuration update session the
/// meter requires for writes to take effect.
pub fn run_procedure<S: PsemSession>(
    session: &mut S,
    procedure: ProcedureId,
    parameters: &[u8],
) -> Result<ProcedureResultCode, PsemError> {
    let open = session.execute_procedure(ProcedureId::OpenConfigUpdate, &[])?;
    if open.code != ProcedureResultCode::Completed {
        return Ok(open.code);
    }
    let response = session.execute_procedure(procedure, parameters)?;
    let close = session.execute_procedure(ProcedureId::CloseConfigUpdate, &[])?;
    if response.code == ProcedureResultCode::Completed
        && close.code != ProcedureResultCode::Completed
    {
        return Ok(close.code);
    }
    Ok(response.code)
}
