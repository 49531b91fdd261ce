#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use quantum_kernel_contracts::qrec::{QuantumRecord, RecordHash, RegistryError};
use quantum_kernel_contracts::PrincipalId;

/// Record table plus the identifier sequence.
///
/// `last_record_hash` only moves forward, so a hash freed by deletion is never handed out again.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: BTreeMap<RecordHash, QuantumRecord>,
    last_record_hash: RecordHash,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash the next successful insert will receive.
    pub fn next_record_hash(&self) -> RecordHash {
        self.last_record_hash.successor()
    }

    /// Number of successful inserts so far. Deletions do not reduce it.
    pub fn record_count(&self) -> u64 {
        self.last_record_hash.0
    }

    pub fn live_record_count(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, record_hash: RecordHash) -> Option<&QuantumRecord> {
        self.records.get(&record_hash)
    }

    pub fn contains(&self, record_hash: RecordHash) -> bool {
        self.records.contains_key(&record_hash)
    }

    /// Inserts a fresh row and advances the sequence to its hash.
    pub fn insert_new(&mut self, record: QuantumRecord) -> Result<RecordHash, RegistryError> {
        let record_hash = record.record_hash;
        if self.records.contains_key(&record_hash) {
            return Err(RegistryError::DuplicateDetected);
        }
        self.records.insert(record_hash, record);
        if record_hash > self.last_record_hash {
            self.last_record_hash = record_hash;
        }
        Ok(record_hash)
    }

    /// Looks up a row the caller currently owns.
    pub fn owned_by(
        &self,
        record_hash: RecordHash,
        caller: &PrincipalId,
    ) -> Result<&QuantumRecord, RegistryError> {
        let record = self
            .records
            .get(&record_hash)
            .ok_or(RegistryError::RecordMissing)?;
        if !record.is_owned_by(caller) {
            return Err(RegistryError::OperationForbidden);
        }
        Ok(record)
    }

    pub(crate) fn owned_by_mut(
        &mut self,
        record_hash: RecordHash,
        caller: &PrincipalId,
    ) -> Result<&mut QuantumRecord, RegistryError> {
        let record = self
            .records
            .get_mut(&record_hash)
            .ok_or(RegistryError::RecordMissing)?;
        if !record.is_owned_by(caller) {
            return Err(RegistryError::OperationForbidden);
        }
        Ok(record)
    }

    pub(crate) fn remove(&mut self, record_hash: RecordHash) -> Option<QuantumRecord> {
        self.records.remove(&record_hash)
    }
}
