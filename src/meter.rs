//! ANSI meter session context.
//!
//! [`AnsiMeter`] wraps a live PSEM session with the operations a caller
//! actually wants: read the display lists, read or rewrite the TOU
//! schedule, update DST dates, and run the handful of standard
//! procedures. Derived data (the translated schedule, the probed
//! supported-LID lists) is cached per session and invalidated whenever a
//! reconfiguration write may have changed it.

use chrono::NaiveDate;

use crate::constants::{MAX_LIDS_PER_REQUEST, TABLE_CLOCK, TABLE_MFG_CONFIG};
use crate::device::{GenericMeter, MeterVariant};
use crate::display::item::{DisplayItem, DisplayList, DisplayListKind};
use crate::display::unit_maps::{
    LID_AMPS_PHASE_A, LID_INSTANTANEOUS_PF, LID_INSTANTANEOUS_W, LID_VAH_DELIVERED,
    LID_VARH_DELIVERED, LID_VARH_RECEIVED, LID_VA_MAX_DEMAND, LID_VAR_MAX_DEMAND,
    LID_VOLTS_PHASE_A, LID_WH_DELIVERED, LID_WH_RECEIVED, LID_W_MAX_DEMAND,
};
use crate::error::PsemError;
use crate::logging::{log_debug, log_info, log_warn};
use crate::psem::procedures::{ProcedureId, ProcedureResultCode};
use crate::psem::{Lid, PsemSession, RegisterValue};
use crate::tables::clock::{ClockRecord, ClockStatus};
use crate::tables::table2048::{DisplayEntry, Table2048};
use crate::tou::dst::{run_procedure, DstReconfiguration, DstUpdateResult, TouReconfigResult};
use crate::tou::schedule::{DstSchedule, TouSchedule};
use crate::tou::translator::{overwrite_calendar_config, overwrite_tou_config, read_tou_schedule};

/// Self-read snapshot registers live at a fixed LID base plus the buffer
/// index; demand-reset snapshots likewise.
const LID_SELF_READ_BASE: u32 = 0x1405_0000;
const LID_DEMAND_RESET_BASE: u32 = 0x1406_0000;

/// Energy quantities a meter may meter; probed once per session.
const ENERGY_CANDIDATES: [Lid; 5] = [
    LID_WH_DELIVERED,
    LID_WH_RECEIVED,
    LID_VARH_DELIVERED,
    LID_VARH_RECEIVED,
    LID_VAH_DELIVERED,
];

/// Demand quantities a meter may track; probed once per session.
const DEMAND_CANDIDATES: [Lid; 7] = [
    LID_W_MAX_DEMAND,
    LID_VAR_MAX_DEMAND,
    LID_VA_MAX_DEMAND,
    LID_INSTANTANEOUS_W,
    LID_INSTANTANEOUS_PF,
    LID_VOLTS_PHASE_A,
    LID_AMPS_PHASE_A,
];

/// A meter reached through a PSEM session.
pub struct AnsiMeter<S: PsemSession> {
    session: S,
    variant: Box<dyn MeterVariant>,
    tou_schedule: Option<TouSchedule>,
    supported_energy_lids: Option<Vec<Lid>>,
    supported_demand_lids: Option<Vec<Lid>>,
}

impl<S: PsemSession> AnsiMeter<S> {
    pub fn new(session: S) -> Self {
        Self::with_variant(session, Box::new(GenericMeter))
    }

    pub fn with_variant(session: S, variant: Box<dyn MeterVariant>) -> Self {
        AnsiMeter {
            session,
            variant,
            tou_schedule: None,
            supported_energy_lids: None,
            supported_demand_lids: None,
        }
    }

    pub fn variant(&self) -> &dyn MeterVariant {
        self.variant.as_ref()
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// The meter's current clock record.
    pub fn clock(&mut self) -> Result<ClockRecord, PsemError> {
        let raw = self.session.read_table(TABLE_CLOCK)?;
        ClockRecord::parse(&raw)
    }

    /// Reads and translates the TOU schedule, caching the result for the
    /// life of the session.
    pub fn tou_schedule(&mut self) -> Result<TouSchedule, PsemError> {
        if let Some(schedule) = &self.tou_schedule {
            return Ok(schedule.clone());
        }
        let raw = self.session.read_table(TABLE_MFG_CONFIG)?;
        let table = Table2048::parse(&raw)?;
        let schedule = read_tou_schedule(&table.tou, &table.calendar)?;
        log_debug(&format!(
            "translated schedule: {} seasons, {} years",
            schedule.seasons.len(),
            schedule.years.len()
        ));
        self.tou_schedule = Some(schedule.clone());
        Ok(schedule)
    }

    /// Updates the meter's DST dates. Any write invalidates the cached
    /// schedule, even on partial failure.
    pub fn reconfigure_dst(&mut self, dst: &DstSchedule, today: NaiveDate) -> DstUpdateResult {
        self.invalidate();
        DstReconfiguration::new().run(&mut self.session, dst, today)
    }

    /// Replaces the meter's TOU schedule.
    pub fn reconfigure_tou(
        &mut self,
        schedule: &TouSchedule,
        dst: Option<&DstSchedule>,
        today: NaiveDate,
    ) -> TouReconfigResult {
        self.invalidate();

        if schedule.is_expired(today) {
            return TouReconfigResult::ScheduleExpired;
        }

        match self.clock() {
            Ok(clock) if clock.status.contains(ClockStatus::CLOCK_RUNNING) => {}
            Ok(_) => return TouReconfigResult::ClockError,
            Err(PsemError::SecurityRejected(_)) => return TouReconfigResult::SecurityError,
            Err(error) => {
                log_warn(&format!("clock read failed: {error}"));
                return TouReconfigResult::Error;
            }
        }

        let mut table = match self.read_config_table() {
            Ok(table) => table,
            Err(PsemError::SecurityRejected(_)) => return TouReconfigResult::SecurityError,
            Err(error) => {
                log_warn(&format!("configuration read failed: {error}"));
                return TouReconfigResult::Error;
            }
        };

        let result = overwrite_tou_config(schedule, &mut table.tou);
        if result != TouReconfigResult::Success {
            return result;
        }
        let result = overwrite_calendar_config(schedule, dst, &mut table.calendar);
        if result != TouReconfigResult::Success {
            return result;
        }

        if let Err(error) = self.session.write_table(TABLE_MFG_CONFIG, &table.encode()) {
            return match error {
                PsemError::SecurityRejected(_) => TouReconfigResult::SecurityError,
                other => {
                    log_warn(&format!("configuration write failed: {other}"));
                    TouReconfigResult::Error
                }
            };
        }

        match run_procedure(&mut self.session, ProcedureId::ReconfigureTou, &[]) {
            Ok(ProcedureResultCode::Completed) => {
                log_info(&format!("TOU schedule '{}' written", schedule.name));
                TouReconfigResult::Success
            }
            Ok(ProcedureResultCode::NoAuthorization) => TouReconfigResult::SecurityError,
            Ok(code) => {
                log_warn(&format!("TOU reconfigure procedure returned {code:?}"));
                TouReconfigResult::Error
            }
            Err(PsemError::SecurityRejected(_)) => TouReconfigResult::SecurityError,
            Err(error) => {
                log_warn(&format!("TOU reconfigure failed: {error}"));
                TouReconfigResult::Error
            }
        }
    }

    /// The normal display list with freshly read and formatted values.
    pub fn normal_display(&mut self) -> Result<DisplayList, PsemError> {
        self.display_list(DisplayListKind::Normal)
    }

    /// The alternate display list with freshly read and formatted values.
    pub fn alternate_display(&mut self) -> Result<DisplayList, PsemError> {
        self.display_list(DisplayListKind::Alternate)
    }

    /// The test display list with freshly read and formatted values.
    pub fn test_display(&mut self) -> Result<DisplayList, PsemError> {
        self.display_list(DisplayListKind::Test)
    }

    fn display_list(&mut self, kind: DisplayListKind) -> Result<DisplayList, PsemError> {
        let table = self.read_config_table()?;
        let entries: &[DisplayEntry] = match kind {
            DisplayListKind::Normal => &table.display.normal,
            DisplayListKind::Alternate => &table.display.alternate,
            DisplayListKind::Test => &table.display.test,
        };

        let mut items: Vec<DisplayItem> = entries
            .iter()
            .map(|e| DisplayItem::new(e.lid, e.format, e.dimension))
            .collect();

        // Values are fetched in protocol-limited batches.
        let lids: Vec<Lid> = items.iter().map(|i| i.lid).collect();
        let mut values = Vec::with_capacity(lids.len());
        for chunk in lids.chunks(MAX_LIDS_PER_REQUEST) {
            values.extend(self.session.retrieve_multiple_lids(chunk)?);
        }

        for (item, value) in items.iter_mut().zip(values.iter()) {
            item.format_data(value)?;
        }

        Ok(DisplayList { kind, items })
    }

    /// Energy quantity LIDs this meter answers for, probed once and then
    /// cached.
    pub fn supported_energies(&mut self) -> Result<&[Lid], PsemError> {
        if self.supported_energy_lids.is_none() {
            let found = self.probe(&ENERGY_CANDIDATES)?;
            self.supported_energy_lids = Some(found);
        }
        Ok(self.supported_energy_lids.as_deref().unwrap_or(&[]))
    }

    /// Demand quantity LIDs this meter answers for, probed once and then
    /// cached.
    pub fn supported_demands(&mut self) -> Result<&[Lid], PsemError> {
        if self.supported_demand_lids.is_none() {
            let found = self.probe(&DEMAND_CANDIDATES)?;
            self.supported_demand_lids = Some(found);
        }
        Ok(self.supported_demand_lids.as_deref().unwrap_or(&[]))
    }

    fn probe(&mut self, candidates: &[Lid]) -> Result<Vec<Lid>, PsemError> {
        let mut found = Vec::new();
        for &lid in candidates {
            match self.session.retrieve_lid(lid) {
                Ok(_) => found.push(lid),
                Err(PsemError::SecurityRejected(reason)) => {
                    return Err(PsemError::SecurityRejected(reason))
                }
                Err(_) => {}
            }
        }
        Ok(found)
    }

    /// One self-read snapshot register. The index must address one of the
    /// buffers the demand configuration declares.
    pub fn self_read(&mut self, index: u8) -> Result<RegisterValue, PsemError> {
        let table = self.read_config_table()?;
        let max = table.demand.self_read_buffers;
        if index >= max {
            return Err(PsemError::IndexOutOfRange { index, max });
        }
        self.session
            .retrieve_lid(Lid(LID_SELF_READ_BASE + u32::from(index)))
    }

    /// One demand-reset snapshot register, validated the same way.
    pub fn demand_reset_snapshot(&mut self, index: u8) -> Result<RegisterValue, PsemError> {
        let table = self.read_config_table()?;
        let max = table.demand.demand_reset_buffers;
        if index >= max {
            return Err(PsemError::IndexOutOfRange { index, max });
        }
        self.session
            .retrieve_lid(Lid(LID_DEMAND_RESET_BASE + u32::from(index)))
    }

    /// Latches current demand values and resets the running maxima.
    pub fn demand_reset(&mut self) -> Result<ProcedureResultCode, PsemError> {
        let response = self
            .session
            .execute_procedure(ProcedureId::RemoteReset, &[0x01])?;
        Ok(response.code)
    }

    /// Full device restart. All session caches are dropped.
    pub fn cold_start(&mut self) -> Result<ProcedureResultCode, PsemError> {
        self.invalidate();
        self.supported_energy_lids = None;
        self.supported_demand_lids = None;
        let response = self.session.execute_procedure(ProcedureId::ColdStart, &[])?;
        Ok(response.code)
    }

    /// Switches the faceplate between the normal, alternate, and test
    /// scroll lists.
    pub fn set_display_mode(
        &mut self,
        kind: DisplayListKind,
    ) -> Result<ProcedureResultCode, PsemError> {
        let mode: u8 = match kind {
            DisplayListKind::Normal => 0,
            DisplayListKind::Alternate => 1,
            DisplayListKind::Test => 2,
        };
        let response = self
            .session
            .execute_procedure(ProcedureId::ChangeDisplayMode, &[mode])?;
        Ok(response.code)
    }

    fn read_config_table(&mut self) -> Result<Table2048, PsemError> {
        let raw = self.session.read_table(TABLE_MFG_CONFIG)?;
        Table2048::parse(&raw)
    }

    fn invalidate(&mut self) {
        self.tou_schedule = None;
    }
}
