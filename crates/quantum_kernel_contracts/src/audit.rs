#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::qrec::RecordHash;
use crate::{BlockHeight, ContractViolation, PrincipalId, SchemaVersion, Validate};

pub const QREC_AUDIT_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuditEventId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordAuditEventKind {
    Established,
    Updated,
    OwnershipTransferred,
    Deleted,
    AccessGranted,
    AccessRevoked,
    PreservationApplied,
    TagsExtended,
}

impl RecordAuditEventKind {
    /// Kinds whose rows carry a digest of the post-mutation record.
    pub fn carries_state_digest(self) -> bool {
        !matches!(
            self,
            RecordAuditEventKind::Deleted
                | RecordAuditEventKind::AccessGranted
                | RecordAuditEventKind::AccessRevoked
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAuditEventInput {
    pub height: BlockHeight,
    pub actor: PrincipalId,
    pub record_hash: RecordHash,
    pub kind: RecordAuditEventKind,
    pub subject: Option<PrincipalId>,
    pub state_digest: Option<String>,
}

impl Validate for RecordAuditEventInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        match (&self.state_digest, self.kind.carries_state_digest()) {
            (None, true) => Err(ContractViolation::InvalidValue {
                field: "record_audit_event.state_digest",
                reason: "required for record-state events",
            }),
            (Some(_), false) => Err(ContractViolation::InvalidValue {
                field: "record_audit_event.state_digest",
                reason: "must be absent for deletion and permission events",
            }),
            (Some(d), true) if d.len() != 64 || !d.bytes().all(|b| b.is_ascii_hexdigit()) => {
                Err(ContractViolation::InvalidValue {
                    field: "record_audit_event.state_digest",
                    reason: "must be 64 hex chars",
                })
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAuditEvent {
    pub schema_version: SchemaVersion,
    pub event_id: AuditEventId,
    pub height: BlockHeight,
    pub actor: PrincipalId,
    pub record_hash: RecordHash,
    pub kind: RecordAuditEventKind,
    /// The other principal involved, e.g. the grantee or the new owner.
    pub subject: Option<PrincipalId>,
    pub state_digest: Option<String>,
}

impl RecordAuditEvent {
    pub fn from_input_v1(
        event_id: AuditEventId,
        input: RecordAuditEventInput,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        Ok(Self {
            schema_version: QREC_AUDIT_CONTRACT_VERSION,
            event_id,
            height: input.height,
            actor: input.actor,
            record_hash: input.record_hash,
            kind: input.kind,
            subject: input.subject,
            state_digest: input.state_digest,
        })
    }
}
