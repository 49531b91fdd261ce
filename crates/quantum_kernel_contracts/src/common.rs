#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion(pub u32);

/// Host-supplied height. Monotonically non-decreasing across operations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Blocks elapsed since `earlier`, clamped at zero.
    pub fn blocks_since(self, earlier: BlockHeight) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReasonCodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    InvalidLength {
        field: &'static str,
        min_exclusive: usize,
        max_exclusive: usize,
        got: usize,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::InvalidValue { field, reason } => write!(f, "{field}: {reason}"),
            ContractViolation::InvalidLength {
                field,
                min_exclusive,
                max_exclusive,
                got,
            } => write!(
                f,
                "{field}: length {got} outside ({min_exclusive}, {max_exclusive})"
            ),
        }
    }
}

impl std::error::Error for ContractViolation {}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}
