#![forbid(unsafe_code)]

use quantum_kernel_contracts::audit::{AuditEventId, RecordAuditEvent, RecordAuditEventInput};
use quantum_kernel_contracts::qrec::{QuantumRecord, RecordHash};
use quantum_kernel_contracts::ContractViolation;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 over the record's fields, NUL-separated in declaration order.
pub fn record_state_digest(record: &QuantumRecord) -> String {
    let mut h = Sha256::new();
    h.update(record.schema_version.0.to_be_bytes());
    h.update(record.record_hash.0.to_be_bytes());
    h.update(record.record_key.as_bytes());
    h.update([0u8]);
    h.update(record.record_owner.as_str().as_bytes());
    h.update([0u8]);
    h.update(record.payload_size.to_be_bytes());
    h.update(record.genesis_block.0.to_be_bytes());
    h.update(record.record_digest.as_bytes());
    h.update([0u8]);
    h.update((record.tag_collection.len() as u64).to_be_bytes());
    for tag in &record.tag_collection {
        h.update(tag.as_bytes());
        h.update([0u8]);
    }
    h.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

/// Append-only ledger of successful registry mutations.
#[derive(Debug, Clone)]
pub struct AuditLedger {
    events: Vec<RecordAuditEvent>,
    next_event_id: u64,
}

impl Default for AuditLedger {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
        }
    }
}

impl AuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        input: RecordAuditEventInput,
    ) -> Result<AuditEventId, ContractViolation> {
        let event_id = AuditEventId(self.next_event_id);
        let ev = RecordAuditEvent::from_input_v1(event_id, input)?;
        self.next_event_id = self.next_event_id.saturating_add(1);
        self.events.push(ev);
        Ok(event_id)
    }

    pub fn events(&self) -> &[RecordAuditEvent] {
        &self.events
    }

    pub fn events_for_record(&self, record_hash: RecordHash) -> Vec<&RecordAuditEvent> {
        self.events
            .iter()
            .filter(|e| e.record_hash == record_hash)
            .collect()
    }
}
