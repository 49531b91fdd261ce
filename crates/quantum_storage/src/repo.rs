#![forbid(unsafe_code)]

use quantum_kernel_contracts::audit::RecordAuditEvent;
use quantum_kernel_contracts::qrec::{
    DiagnosticsReport, IntegrityReport, QuantumRecord, RecordAnalytics, RecordHash, RecordInput,
    RegistryError,
};
use quantum_kernel_contracts::PrincipalId;

use crate::registry::{CallContext, QuantumRegistry};

/// Typed repository interface for the quantum record registry.
pub trait QuantumRegistryRepo {
    fn establish_record_row(
        &mut self,
        ctx: &CallContext,
        input: RecordInput,
    ) -> Result<RecordHash, RegistryError>;
    fn update_record_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        input: RecordInput,
    ) -> Result<(), RegistryError>;
    fn transfer_ownership_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        new_owner: PrincipalId,
    ) -> Result<(), RegistryError>;
    fn delete_record_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError>;
    fn grant_access_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: PrincipalId,
    ) -> Result<(), RegistryError>;
    fn revoke_access_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: &PrincipalId,
    ) -> Result<(), RegistryError>;
    fn apply_preservation_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError>;
    fn extend_tags_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        additional_tags: &[String],
    ) -> Result<Vec<String>, RegistryError>;

    fn record_analytics(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<RecordAnalytics, RegistryError>;
    fn activate_enhanced_security_row(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError>;
    fn diagnostics(&self, ctx: &CallContext) -> Result<DiagnosticsReport, RegistryError>;
    fn integrity_report(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        claimed_owner: &PrincipalId,
    ) -> Result<IntegrityReport, RegistryError>;

    fn record_row(&self, record_hash: RecordHash) -> Option<&QuantumRecord>;
    fn permission_active(&self, record_hash: RecordHash, user: &PrincipalId) -> bool;
    fn authorized_user_rows(&self, record_hash: RecordHash) -> Vec<&PrincipalId>;
    fn record_count(&self) -> u64;
    fn audit_rows(&self) -> &[RecordAuditEvent];
    fn audit_rows_by_record(&self, record_hash: RecordHash) -> Vec<&RecordAuditEvent>;
}

impl QuantumRegistryRepo for QuantumRegistry {
    fn establish_record_row(
        &mut self,
        ctx: &CallContext,
        input: RecordInput,
    ) -> Result<RecordHash, RegistryError> {
        self.establish_record(ctx, input)
    }

    fn update_record_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        input: RecordInput,
    ) -> Result<(), RegistryError> {
        self.update_record(ctx, record_hash, input)
    }

    fn transfer_ownership_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        new_owner: PrincipalId,
    ) -> Result<(), RegistryError> {
        self.transfer_ownership(ctx, record_hash, new_owner)
    }

    fn delete_record_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError> {
        self.delete_record(ctx, record_hash)
    }

    fn grant_access_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: PrincipalId,
    ) -> Result<(), RegistryError> {
        self.grant_access(ctx, record_hash, user)
    }

    fn revoke_access_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: &PrincipalId,
    ) -> Result<(), RegistryError> {
        self.revoke_access(ctx, record_hash, user)
    }

    fn apply_preservation_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError> {
        self.apply_preservation(ctx, record_hash)
    }

    fn extend_tags_row(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        additional_tags: &[String],
    ) -> Result<Vec<String>, RegistryError> {
        self.extend_tags(ctx, record_hash, additional_tags)
    }

    fn record_analytics(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<RecordAnalytics, RegistryError> {
        self.generate_analytics(ctx, record_hash)
    }

    fn activate_enhanced_security_row(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError> {
        self.activate_enhanced_security(ctx, record_hash)
    }

    fn diagnostics(&self, ctx: &CallContext) -> Result<DiagnosticsReport, RegistryError> {
        self.execute_diagnostics(ctx)
    }

    fn integrity_report(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        claimed_owner: &PrincipalId,
    ) -> Result<IntegrityReport, RegistryError> {
        self.validate_integrity(ctx, record_hash, claimed_owner)
    }

    fn record_row(&self, record_hash: RecordHash) -> Option<&QuantumRecord> {
        self.get_metadata(record_hash)
    }

    fn permission_active(&self, record_hash: RecordHash, user: &PrincipalId) -> bool {
        self.check_permission(record_hash, user)
    }

    fn authorized_user_rows(&self, record_hash: RecordHash) -> Vec<&PrincipalId> {
        self.authorized_users(record_hash)
    }

    fn record_count(&self) -> u64 {
        self.get_record_count()
    }

    fn audit_rows(&self) -> &[RecordAuditEvent] {
        self.audit_events()
    }

    fn audit_rows_by_record(&self, record_hash: RecordHash) -> Vec<&RecordAuditEvent> {
        self.audit_events_for_record(record_hash)
    }
}
