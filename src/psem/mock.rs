//! Mock PSEM session for testing
//!
//! This module provides an in-memory session that can be used to test the
//! meter layer without a live communications channel.

use std::collections::HashMap;

use crate::error::PsemError;
use crate::psem::{
    Lid, ProcedureId, ProcedureResponse, ProcedureResultCode, PsemSession, RegisterValue,
};

/// In-memory session backed by register and table maps.
#[derive(Debug, Default)]
pub struct MockSession {
    /// Register values keyed by LID.
    pub registers: HashMap<u32, RegisterValue>,
    /// Table contents keyed by table number.
    pub tables: HashMap<u16, Vec<u8>>,
    /// Procedures executed, in order, with their parameter bytes.
    pub procedure_log: Vec<(ProcedureId, Vec<u8>)>,
    /// Result code returned for every procedure.
    pub procedure_result: Option<ProcedureResultCode>,
    /// When set, every operation fails with a security rejection.
    pub reject_security: bool,
    /// When set, every operation fails with a timeout.
    pub time_out: bool,
    /// Largest batch size seen by retrieve_multiple_lids.
    pub max_batch_seen: usize,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a register value for later retrieval.
    pub fn set_register(&mut self, lid: Lid, value: RegisterValue) {
        self.registers.insert(lid.0, value);
    }

    /// Stores table contents for later reads.
    pub fn set_table(&mut self, table: u16, data: Vec<u8>) {
        self.tables.insert(table, data);
    }
}

impl PsemSession for MockSession {
    fn retrieve_lid(&mut self, lid: Lid) -> Result<RegisterValue, PsemError> {
        if self.reject_security {
            return Err(PsemError::SecurityRejected(format!("retrieve {lid}")));
        }
        if self.time_out {
            return Err(PsemError::Timeout(format!("retrieve {lid}")));
        }
        self.registers
            .get(&lid.0)
            .cloned()
            .ok_or(PsemError::CommunicationFailure {
                operation: format!("retrieve {lid}"),
                code: 1,
            })
    }

    fn retrieve_multiple_lids(&mut self, lids: &[Lid]) -> Result<Vec<RegisterValue>, PsemError> {
        self.max_batch_seen = self.max_batch_seen.max(lids.len());
        lids.iter().map(|lid| self.retrieve_lid(*lid)).collect()
    }

    fn execute_procedure(
        &mut self,
        procedure: ProcedureId,
        params: &[u8],
    ) -> Result<ProcedureResponse, PsemError> {
        if self.reject_security {
            return Err(PsemError::SecurityRejected(format!(
                "procedure {}",
                procedure.code()
            )));
        }
        if self.time_out {
            return Err(PsemError::Timeout(format!(
                "procedure {}",
                procedure.code()
            )));
        }
        self.procedure_log.push((procedure, params.to_vec()));
        Ok(ProcedureResponse {
            code: self
                .procedure_result
                .unwrap_or(ProcedureResultCode::Completed),
            data: Vec::new(),
        })
    }

    fn read_table(&mut self, table: u16) -> Result<Vec<u8>, PsemError> {
        if self.reject_security {
            return Err(PsemError::SecurityRejected(format!("read table {table}")));
        }
        if self.time_out {
            return Err(PsemError::Timeout(format!("read table {table}")));
        }
        self.tables
            .get(&table)
            .cloned()
            .ok_or(PsemError::CommunicationFailure {
                operation: format!("read table {table}"),
                code: 1,
            })
    }

    fn write_table(&mut self, table: u16, data: &[u8]) -> Result<(), PsemError> {
        if self.reject_security {
            return Err(PsemError::SecurityRejected(format!("write table {table}")));
        }
        if self.time_out {
            return Err(PsemError::Timeout(format!("write table {table}")));
        }
        self.tables.insert(table, data.to_vec());
        Ok(())
    }
}
