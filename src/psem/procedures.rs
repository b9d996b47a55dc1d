//! Procedure identifiers and result codes.
//!
//! Standard procedures occupy the C12.19 range 0-24; manufacturer-specific
//! procedures start at 2048. Result codes follow the standard procedure
//! response table.

use crate::error::PsemError;

/// Stable numeric identifiers for the procedures this layer invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProcedureId {
    // Standard C12.19 procedures
    ColdStart = 0,
    WarmStart = 1,
    SaveConfiguration = 2,
    ClearData = 3,
    ResetListPointers = 4,
    UpdateLastReadEntry = 5,
    ChangeEndDeviceMode = 6,
    ClearStandardStatusFlags = 7,
    ClearManufacturerStatusFlags = 8,
    RemoteReset = 9,
    SetDateTime = 10,
    ExecuteDiagnostics = 11,
    ActivateAllPendingTables = 12,
    ActivateSpecificPendingTables = 13,
    ClearAllPendingTables = 14,
    ClearSpecificPendingTables = 15,
    StartLoadProfile = 16,
    StopLoadProfile = 17,
    LogIn = 18,
    LogOut = 19,
    InitiateSelfRead = 20,
    DirectLoadControl = 21,
    ModifyCredit = 22,
    RegisterService = 23,
    DeregisterService = 24,

    // Manufacturer procedures
    OpenConfigUpdate = 2048,
    CloseConfigUpdate = 2049,
    ReconfigureDst = 2050,
    ReconfigureTou = 2051,
    ChangeDisplayMode = 2052,
    SealMeter = 2053,
    UnsealMeter = 2054,
    ResetPowerOutageCount = 2055,
    ClearDisplayLockout = 2056,
    ClearVoltageEventLog = 2057,
    ForceTimeSync = 2058,
    ClearSelfReadBuffers = 2059,
}

impl ProcedureId {
    /// Numeric procedure code as carried on the wire.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// True for identifiers in the manufacturer range.
    pub fn is_manufacturer(self) -> bool {
        self.code() >= 2048
    }

    /// Maps a wire code back to a known procedure.
    pub fn from_code(code: u16) -> Result<Self, PsemError> {
        use ProcedureId::*;
        let id = match code {
            0 => ColdStart,
            1 => WarmStart,
            2 => SaveConfiguration,
            3 => ClearData,
            4 => ResetListPointers,
            5 => UpdateLastReadEntry,
            6 => ChangeEndDeviceMode,
            7 => ClearStandardStatusFlags,
            8 => ClearManufacturerStatusFlags,
            9 => RemoteReset,
            10 => SetDateTime,
            11 => ExecuteDiagnostics,
            12 => ActivateAllPendingTables,
            13 => ActivateSpecificPendingTables,
            14 => ClearAllPendingTables,
            15 => ClearSpecificPendingTables,
            16 => StartLoadProfile,
            17 => StopLoadProfile,
            18 => LogIn,
            19 => LogOut,
            20 => InitiateSelfRead,
            21 => DirectLoadControl,
            22 => ModifyCredit,
            23 => RegisterService,
            24 => DeregisterService,
            2048 => OpenConfigUpdate,
            2049 => CloseConfigUpdate,
            2050 => ReconfigureDst,
            2051 => ReconfigureTou,
            2052 => ChangeDisplayMode,
            2053 => SealMeter,
            2054 => UnsealMeter,
            2055 => ResetPowerOutageCount,
            2056 => ClearDisplayLockout,
            2057 => ClearVoltageEventLog,
            2058 => ForceTimeSync,
            2059 => ClearSelfReadBuffers,
            other => return Err(PsemError::UnknownProcedure(other)),
        };
        Ok(id)
    }
}

/// Completion codes from the standard procedure response table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureResultCode {
    Completed,
    AcceptedNotCompleted,
    InvalidParameter,
    DeviceSetupConflict,
    TimingConstraint,
    NoAuthorization,
    UnrecognizedProcedure,
}

impl ProcedureResultCode {
    pub fn from_u8(code: u8) -> Self {
        match code {
            0 => ProcedureResultCode::Completed,
            1 => ProcedureResultCode::AcceptedNotCompleted,
            2 => ProcedureResultCode::InvalidParameter,
            3 => ProcedureResultCode::DeviceSetupConflict,
            4 => ProcedureResultCode::TimingConstraint,
            5 => ProcedureResultCode::NoAuthorization,
            _ => ProcedureResultCode::UnrecognizedProcedure,
        }
    }
}

/// Result of a procedure exchange: completion code plus response bytes.
#[derive(Debug, Clone)]
pub struct ProcedureResponse {
    pub code: ProcedureResultCode,
    pub data: Vec<u8>,
}
