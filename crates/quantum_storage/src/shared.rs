#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use quantum_kernel_contracts::audit::RecordAuditEvent;
use quantum_kernel_contracts::qrec::{
    DiagnosticsReport, IntegrityReport, QuantumRecord, RecordAnalytics, RecordHash, RecordInput,
    RegistryError,
};
use quantum_kernel_contracts::PrincipalId;
use thiserror::Error;

use crate::config::RegistryConfig;
use crate::registry::{CallContext, QuantumRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharedRegistryError {
    #[error("registry lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Cloneable handle that serializes every operation behind one lock.
///
/// The lock is held for the whole operation, so computing the next hash and inserting the row
/// can never interleave with another writer.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    registry: Arc<Mutex<QuantumRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: QuantumRegistry) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, QuantumRegistry>, SharedRegistryError> {
        self.registry
            .lock()
            .map_err(|_| SharedRegistryError::LockPoisoned)
    }

    fn run<T>(
        &self,
        op: impl FnOnce(&mut QuantumRegistry) -> Result<T, RegistryError>,
    ) -> Result<T, SharedRegistryError> {
        let mut registry = self.lock()?;
        Ok(op(&mut *registry)?)
    }

    pub fn establish_record(
        &self,
        ctx: &CallContext,
        input: RecordInput,
    ) -> Result<RecordHash, SharedRegistryError> {
        self.run(|r| r.establish_record(ctx, input))
    }

    pub fn update_record(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        input: RecordInput,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.update_record(ctx, record_hash, input))
    }

    pub fn transfer_ownership(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        new_owner: PrincipalId,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.transfer_ownership(ctx, record_hash, new_owner))
    }

    pub fn delete_record(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.delete_record(ctx, record_hash))
    }

    pub fn grant_access(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: PrincipalId,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.grant_access(ctx, record_hash, user))
    }

    pub fn revoke_access(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: &PrincipalId,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.revoke_access(ctx, record_hash, user))
    }

    pub fn apply_preservation(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.apply_preservation(ctx, record_hash))
    }

    pub fn extend_tags(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        additional_tags: &[String],
    ) -> Result<Vec<String>, SharedRegistryError> {
        self.run(|r| r.extend_tags(ctx, record_hash, additional_tags))
    }

    pub fn generate_analytics(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<RecordAnalytics, SharedRegistryError> {
        self.run(|r| r.generate_analytics(ctx, record_hash))
    }

    pub fn activate_enhanced_security(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), SharedRegistryError> {
        self.run(|r| r.activate_enhanced_security(ctx, record_hash))
    }

    pub fn execute_diagnostics(
        &self,
        ctx: &CallContext,
    ) -> Result<DiagnosticsReport, SharedRegistryError> {
        self.run(|r| r.execute_diagnostics(ctx))
    }

    pub fn validate_integrity(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        claimed_owner: &PrincipalId,
    ) -> Result<IntegrityReport, SharedRegistryError> {
        self.run(|r| r.validate_integrity(ctx, record_hash, claimed_owner))
    }

    pub fn get_metadata(
        &self,
        record_hash: RecordHash,
    ) -> Result<Option<QuantumRecord>, SharedRegistryError> {
        Ok(self.lock()?.get_metadata(record_hash).cloned())
    }

    pub fn check_permission(
        &self,
        record_hash: RecordHash,
        user: &PrincipalId,
    ) -> Result<bool, SharedRegistryError> {
        Ok(self.lock()?.check_permission(record_hash, user))
    }

    pub fn authorized_users(
        &self,
        record_hash: RecordHash,
    ) -> Result<Vec<PrincipalId>, SharedRegistryError> {
        Ok(self
            .lock()?
            .authorized_users(record_hash)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn config(&self) -> Result<RegistryConfig, SharedRegistryError> {
        Ok(self.lock()?.config())
    }

    pub fn get_record_count(&self) -> Result<u64, SharedRegistryError> {
        Ok(self.lock()?.get_record_count())
    }

    pub fn audit_events(&self) -> Result<Vec<RecordAuditEvent>, SharedRegistryError> {
        Ok(self.lock()?.audit_events().to_vec())
    }

    pub fn audit_events_for_record(
        &self,
        record_hash: RecordHash,
    ) -> Result<Vec<RecordAuditEvent>, SharedRegistryError> {
        Ok(self
            .lock()?
            .audit_events_for_record(record_hash)
            .into_iter()
            .cloned()
            .collect())
    }
}
