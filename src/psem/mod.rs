//! The psem module contains the narrow request/response interface to the
//! meter communications stack: logical-identifier reads, table reads and
//! writes, and procedure execution.

pub mod mock;
pub mod procedures;

pub use procedures::{ProcedureId, ProcedureResponse, ProcedureResultCode};

use chrono::NaiveDateTime;

use crate::error::PsemError;

/// A 32-bit logical identifier addressing a specific meter register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lid(pub u32);

impl std::fmt::Display for Lid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// A raw decoded register value as returned by the communications stack.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterValue {
    Uint(u32),
    Int(i32),
    Double(f64),
    Float(f32),
    Text(String),
    DateTime(NaiveDateTime),
    /// Seconds since midnight; may exceed one day for cumulative counters.
    TimeSeconds(u32),
}

impl RegisterValue {
    /// Short name of the runtime type, for conversion failure reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            RegisterValue::Uint(_) => "uint",
            RegisterValue::Int(_) => "int",
            RegisterValue::Double(_) => "double",
            RegisterValue::Float(_) => "float",
            RegisterValue::Text(_) => "text",
            RegisterValue::DateTime(_) => "datetime",
            RegisterValue::TimeSeconds(_) => "time",
        }
    }
}

/// Blocking request/response interface to a live meter session.
///
/// Implementations wrap the PSEM transport; every method may block for the
/// duration of one exchange. Timeouts belong to the transport, not here.
pub trait PsemSession {
    /// Fetches a single logical identifier.
    fn retrieve_lid(&mut self, lid: Lid) -> Result<RegisterValue, PsemError>;

    /// Fetches a batch of logical identifiers. Callers chunk requests at
    /// [`crate::constants::MAX_LIDS_PER_REQUEST`] items.
    fn retrieve_multiple_lids(&mut self, lids: &[Lid]) -> Result<Vec<RegisterValue>, PsemError>;

    /// Executes a standard or manufacturer procedure and collects the
    /// response bytes.
    fn execute_procedure(
        &mut self,
        procedure: ProcedureId,
        params: &[u8],
    ) -> Result<ProcedureResponse, PsemError>;

    /// Reads the full contents of a numbered table.
    fn read_table(&mut self, table: u16) -> Result<Vec<u8>, PsemError>;

    /// Writes the full contents of a numbered table.
    fn write_table(&mut self, table: u16, data: &[u8]) -> Result<(), PsemError>;
}
