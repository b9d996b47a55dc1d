//! # PSEM Error Handling
//!
//! This module defines the PsemError enum, which represents the different
//! error types that can occur in the psem-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the PSEM crate.
#[derive(Debug, Error)]
pub enum PsemError {
    /// Indicates a failed request/response exchange with the meter.
    #[error("Communication failure during {operation}: response code {code}")]
    CommunicationFailure { operation: String, code: u8 },

    /// Indicates the communications channel timed out.
    #[error("Timeout during {0}")]
    Timeout(String),

    /// Indicates the meter rejected the request for security reasons.
    #[error("Security rejection during {0}")]
    SecurityRejected(String),

    /// Indicates an error when parsing a meter table.
    #[error("Error parsing table {table}: {reason}")]
    TableParse { table: u16, reason: String },

    /// Indicates an unknown unit code in a display format code.
    #[error("Unknown unit code: 0x{0:02X}")]
    UnknownUnit(u8),

    /// Indicates an unknown display type nibble in a display format code.
    #[error("Unknown display type: 0x{0:02X}")]
    UnknownDisplayType(u8),

    /// Indicates an unrecognized procedure identifier.
    #[error("Unknown procedure: {0}")]
    UnknownProcedure(u16),

    /// Indicates a register value of the wrong runtime type for its LID.
    #[error("Data conversion failure: expected {expected}, got {got}")]
    DataConversion {
        expected: &'static str,
        got: &'static str,
    },

    /// Indicates a capability the device variant does not implement.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Indicates a buffer index outside the supported range.
    #[error("Index {index} out of range (max {max})")]
    IndexOutOfRange { index: u8, max: u8 },
}
