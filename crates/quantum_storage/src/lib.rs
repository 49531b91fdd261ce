#![forbid(unsafe_code)]

pub mod audit;
pub mod config;
pub mod permissions;
pub mod records;
pub mod registry;
pub mod repo;
pub mod shared;
pub mod tags;

pub use config::{GrantMode, RegistryConfig};
pub use registry::{CallContext, QuantumRegistry};
pub use repo::QuantumRegistryRepo;
pub use shared::{SharedRegistry, SharedRegistryError};
