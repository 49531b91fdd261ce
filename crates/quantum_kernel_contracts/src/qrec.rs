#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BlockHeight, ContractViolation, PrincipalId, ReasonCodeId, SchemaVersion, Validate};

pub const QREC_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Exclusive upper bound on `record_key` length, in chars.
pub const RECORD_KEY_MAX_EXCLUSIVE: usize = 64;
/// Exclusive upper bound on `record_digest` length, in chars.
pub const RECORD_DIGEST_MAX_EXCLUSIVE: usize = 128;
pub const PAYLOAD_SIZE_MAX_EXCLUSIVE: u64 = 1_000_000_000;
/// Exclusive upper bound on a single tag's length, in chars.
pub const TAG_MAX_EXCLUSIVE: usize = 33;
pub const MAX_TAGS: usize = 10;
pub const PRESERVATION_TAG: &str = "PRESERVED";

/// Sequential record identifier. Not a content hash. Zero is never assigned.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RecordHash(pub u64);

impl RecordHash {
    pub fn successor(self) -> RecordHash {
        RecordHash(self.0.saturating_add(1))
    }
}

impl fmt::Display for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed error taxonomy for every registry operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RegistryError {
    #[error("record not found")]
    RecordMissing,
    #[error("record key or digest outside length bounds")]
    KeyMalformed,
    #[error("payload size outside numeric bounds")]
    SizeInvalid,
    #[error("record hash already present")]
    DuplicateDetected,
    #[error("caller lacks owner, permission or administrator standing")]
    AuthFailure,
    #[error("caller is not the record owner")]
    OperationForbidden,
    #[error("operation restricted to the administrator")]
    AdminOnly,
    /// Reserved. No operation currently returns it.
    #[error("access denied")]
    AccessDenied,
    #[error("tag collection failed count or format rules")]
    TagValidationFailed,
}

impl RegistryError {
    /// Stable numeric code for hosts that surface errors as integers.
    pub fn reason_code(self) -> ReasonCodeId {
        match self {
            RegistryError::RecordMissing => ReasonCodeId(0x5152_0001),
            RegistryError::KeyMalformed => ReasonCodeId(0x5152_0002),
            RegistryError::SizeInvalid => ReasonCodeId(0x5152_0003),
            RegistryError::DuplicateDetected => ReasonCodeId(0x5152_0004),
            RegistryError::AuthFailure => ReasonCodeId(0x5152_0005),
            RegistryError::OperationForbidden => ReasonCodeId(0x5152_0006),
            RegistryError::AdminOnly => ReasonCodeId(0x5152_0007),
            RegistryError::AccessDenied => ReasonCodeId(0x5152_0008),
            RegistryError::TagValidationFailed => ReasonCodeId(0x5152_0009),
        }
    }
}

/// True iff `min_exclusive < chars(s) < max_exclusive`.
pub fn len_within_exclusive(s: &str, min_exclusive: usize, max_exclusive: usize) -> bool {
    let n = s.chars().count();
    min_exclusive < n && n < max_exclusive
}

pub fn is_valid_record_key(key: &str) -> bool {
    len_within_exclusive(key, 0, RECORD_KEY_MAX_EXCLUSIVE)
}

pub fn is_valid_record_digest(digest: &str) -> bool {
    len_within_exclusive(digest, 0, RECORD_DIGEST_MAX_EXCLUSIVE)
}

pub fn is_valid_payload_size(payload_size: u64) -> bool {
    payload_size > 0 && payload_size < PAYLOAD_SIZE_MAX_EXCLUSIVE
}

pub fn is_valid_tag(tag: &str) -> bool {
    len_within_exclusive(tag, 0, TAG_MAX_EXCLUSIVE)
}

pub fn is_valid_tag_collection<S: AsRef<str>>(tags: &[S]) -> bool {
    !tags.is_empty() && tags.len() <= MAX_TAGS && tags.iter().all(|t| is_valid_tag(t.as_ref()))
}

/// Caller-supplied mutable fields of a record, shared by establish and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub record_key: String,
    pub payload_size: u64,
    pub record_digest: String,
    pub tag_collection: Vec<String>,
}

impl RecordInput {
    pub fn new(
        record_key: impl Into<String>,
        payload_size: u64,
        record_digest: impl Into<String>,
        tag_collection: Vec<String>,
    ) -> Self {
        Self {
            record_key: record_key.into(),
            payload_size,
            record_digest: record_digest.into(),
            tag_collection,
        }
    }

    /// Key, then payload size, then digest, then tags. First failure wins.
    pub fn check(&self) -> Result<(), RegistryError> {
        if !is_valid_record_key(&self.record_key) {
            return Err(RegistryError::KeyMalformed);
        }
        if !is_valid_payload_size(self.payload_size) {
            return Err(RegistryError::SizeInvalid);
        }
        if !is_valid_record_digest(&self.record_digest) {
            return Err(RegistryError::KeyMalformed);
        }
        if !is_valid_tag_collection(&self.tag_collection) {
            return Err(RegistryError::TagValidationFailed);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRecord {
    pub schema_version: SchemaVersion,
    pub record_hash: RecordHash,
    pub record_key: String,
    pub record_owner: PrincipalId,
    pub payload_size: u64,
    pub genesis_block: BlockHeight,
    pub record_digest: String,
    pub tag_collection: Vec<String>,
}

impl QuantumRecord {
    pub fn v1(
        record_hash: RecordHash,
        record_owner: PrincipalId,
        genesis_block: BlockHeight,
        input: RecordInput,
    ) -> Self {
        Self {
            schema_version: QREC_CONTRACT_VERSION,
            record_hash,
            record_key: input.record_key,
            record_owner,
            payload_size: input.payload_size,
            genesis_block,
            record_digest: input.record_digest,
            tag_collection: input.tag_collection,
        }
    }

    /// Replaces every caller-mutable field. Hash, owner and genesis stay put.
    pub fn apply_input(&mut self, input: RecordInput) {
        self.record_key = input.record_key;
        self.payload_size = input.payload_size;
        self.record_digest = input.record_digest;
        self.tag_collection = input.tag_collection;
    }

    pub fn is_owned_by(&self, principal: &PrincipalId) -> bool {
        &self.record_owner == principal
    }
}

impl Validate for QuantumRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.record_hash.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "quantum_record.record_hash",
                reason: "must be >= 1",
            });
        }
        if !is_valid_record_key(&self.record_key) {
            return Err(ContractViolation::InvalidLength {
                field: "quantum_record.record_key",
                min_exclusive: 0,
                max_exclusive: RECORD_KEY_MAX_EXCLUSIVE,
                got: self.record_key.chars().count(),
            });
        }
        if !is_valid_payload_size(self.payload_size) {
            return Err(ContractViolation::InvalidValue {
                field: "quantum_record.payload_size",
                reason: "must be within 1..1_000_000_000",
            });
        }
        if !is_valid_record_digest(&self.record_digest) {
            return Err(ContractViolation::InvalidLength {
                field: "quantum_record.record_digest",
                min_exclusive: 0,
                max_exclusive: RECORD_DIGEST_MAX_EXCLUSIVE,
                got: self.record_digest.chars().count(),
            });
        }
        if self.tag_collection.len() > MAX_TAGS {
            return Err(ContractViolation::InvalidValue {
                field: "quantum_record.tag_collection",
                reason: "must contain <= 10 tags",
            });
        }
        if let Some(bad) = self.tag_collection.iter().find(|t| !is_valid_tag(t)) {
            return Err(ContractViolation::InvalidLength {
                field: "quantum_record.tag_collection[]",
                min_exclusive: 0,
                max_exclusive: TAG_MAX_EXCLUSIVE,
                got: bad.chars().count(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAnalytics {
    pub age: u64,
    pub payload_size: u64,
    pub tag_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Successful establishes so far. Deletions do not reduce it.
    pub total_records: u64,
    /// Rows currently present in the record table.
    pub live_records: u64,
    pub status: bool,
    pub height: BlockHeight,
}

/// Ownership-match report. Neither flag reflects a content check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub integrity_verified: bool,
    pub current_height: BlockHeight,
    pub record_lifetime: u64,
    pub ownership_verified: bool,
}
