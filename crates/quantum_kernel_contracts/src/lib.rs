#![forbid(unsafe_code)]

pub mod audit;
pub mod common;
pub mod identity;
pub mod qrec;

pub use common::{BlockHeight, ContractViolation, ReasonCodeId, SchemaVersion, Validate};
pub use identity::PrincipalId;
