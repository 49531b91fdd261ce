#![forbid(unsafe_code)]

use quantum_kernel_contracts::audit::{
    RecordAuditEvent, RecordAuditEventInput, RecordAuditEventKind,
};
use quantum_kernel_contracts::qrec::{
    DiagnosticsReport, IntegrityReport, QuantumRecord, RecordAnalytics, RecordHash, RecordInput,
    RegistryError,
};
use quantum_kernel_contracts::{BlockHeight, PrincipalId};
use tracing::{debug, error, info, warn};

use crate::audit::{record_state_digest, AuditLedger};
use crate::config::{GrantMode, RegistryConfig};
use crate::permissions::PermissionRegistry;
use crate::records::RecordTable;
use crate::tags;

/// Trusted per-operation values supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: PrincipalId,
    pub height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: PrincipalId, height: BlockHeight) -> Self {
        Self { caller, height }
    }
}

fn rejected(
    op: &'static str,
    ctx: &CallContext,
    record_hash: Option<RecordHash>,
    err: RegistryError,
) -> RegistryError {
    match err {
        RegistryError::AuthFailure
        | RegistryError::OperationForbidden
        | RegistryError::AdminOnly
        | RegistryError::AccessDenied => warn!(
            op,
            caller = %ctx.caller,
            record_hash = ?record_hash.map(|h| h.0),
            height = ctx.height.0,
            error = %err,
            "registry call denied"
        ),
        _ => debug!(
            op,
            caller = %ctx.caller,
            record_hash = ?record_hash.map(|h| h.0),
            error = %err,
            "registry call rejected"
        ),
    }
    err
}

/// Record store, permission registry and audit ledger behind one owner.
///
/// Every method runs to completion or returns an error before touching any table. Callers that
/// share a registry across threads go through [`crate::SharedRegistry`].
#[derive(Debug, Clone)]
pub struct QuantumRegistry {
    administrator: PrincipalId,
    config: RegistryConfig,
    records: RecordTable,
    permissions: PermissionRegistry,
    audit: AuditLedger,
}

impl QuantumRegistry {
    /// The deployer becomes the administrator for the lifetime of the registry.
    pub fn initialize(deployer: PrincipalId) -> Self {
        Self::initialize_with_config(deployer, RegistryConfig::default())
    }

    pub fn initialize_with_config(deployer: PrincipalId, config: RegistryConfig) -> Self {
        info!(
            administrator = %deployer,
            grant_mode = config.grant_mode.as_str(),
            audit_enabled = config.audit_enabled,
            "quantum registry initialized"
        );
        Self {
            administrator: deployer,
            config,
            records: RecordTable::new(),
            permissions: PermissionRegistry::new(),
            audit: AuditLedger::new(),
        }
    }

    pub fn administrator(&self) -> &PrincipalId {
        &self.administrator
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    fn is_administrator(&self, principal: &PrincipalId) -> bool {
        &self.administrator == principal
    }

    fn has_read_standing(&self, record: &QuantumRecord, caller: &PrincipalId) -> bool {
        record.is_owned_by(caller)
            || self.permissions.is_active(record.record_hash, caller)
            || self.is_administrator(caller)
    }

    fn record_audit(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        kind: RecordAuditEventKind,
        subject: Option<PrincipalId>,
        state_digest: Option<String>,
    ) {
        if !self.config.audit_enabled {
            return;
        }
        let input = RecordAuditEventInput {
            height: ctx.height,
            actor: ctx.caller.clone(),
            record_hash,
            kind,
            subject,
            state_digest,
        };
        if let Err(violation) = self.audit.append(input) {
            error!(record_hash = record_hash.0, ?kind, %violation, "audit row rejected");
        }
    }

    // Record store.

    pub fn establish_record(
        &mut self,
        ctx: &CallContext,
        input: RecordInput,
    ) -> Result<RecordHash, RegistryError> {
        input
            .check()
            .map_err(|e| rejected("establish_record", ctx, None, e))?;

        let record_hash = self.records.next_record_hash();
        let record = QuantumRecord::v1(record_hash, ctx.caller.clone(), ctx.height, input);
        let state_digest = record_state_digest(&record);
        self.records
            .insert_new(record)
            .map_err(|e| rejected("establish_record", ctx, Some(record_hash), e))?;
        self.permissions.set_active(record_hash, ctx.caller.clone());

        self.record_audit(
            ctx,
            record_hash,
            RecordAuditEventKind::Established,
            None,
            Some(state_digest),
        );
        info!(
            record_hash = record_hash.0,
            caller = %ctx.caller,
            height = ctx.height.0,
            "record established"
        );
        Ok(record_hash)
    }

    pub fn update_record(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        input: RecordInput,
    ) -> Result<(), RegistryError> {
        let record = self
            .records
            .owned_by_mut(record_hash, &ctx.caller)
            .map_err(|e| rejected("update_record", ctx, Some(record_hash), e))?;
        input
            .check()
            .map_err(|e| rejected("update_record", ctx, Some(record_hash), e))?;
        record.apply_input(input);
        let state_digest = record_state_digest(record);

        self.record_audit(
            ctx,
            record_hash,
            RecordAuditEventKind::Updated,
            None,
            Some(state_digest),
        );
        debug!(record_hash = record_hash.0, caller = %ctx.caller, "record updated");
        Ok(())
    }

    /// Moves write authority. Permission entries, including the prior owner's, are left as-is.
    pub fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        new_owner: PrincipalId,
    ) -> Result<(), RegistryError> {
        let record = self
            .records
            .owned_by_mut(record_hash, &ctx.caller)
            .map_err(|e| rejected("transfer_ownership", ctx, Some(record_hash), e))?;
        record.record_owner = new_owner.clone();
        let state_digest = record_state_digest(record);

        info!(
            record_hash = record_hash.0,
            from = %ctx.caller,
            to = %new_owner,
            height = ctx.height.0,
            "record ownership transferred"
        );
        self.record_audit(
            ctx,
            record_hash,
            RecordAuditEventKind::OwnershipTransferred,
            Some(new_owner),
            Some(state_digest),
        );
        Ok(())
    }

    /// Removes the row. Permission entries for the hash are not cascaded.
    pub fn delete_record(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError> {
        self.records
            .owned_by(record_hash, &ctx.caller)
            .map_err(|e| rejected("delete_record", ctx, Some(record_hash), e))?;
        self.records.remove(record_hash);

        self.record_audit(ctx, record_hash, RecordAuditEventKind::Deleted, None, None);
        info!(
            record_hash = record_hash.0,
            caller = %ctx.caller,
            height = ctx.height.0,
            "record deleted"
        );
        Ok(())
    }

    /// Owner-gated. Under [`GrantMode::ValidateOnly`] no permission entry and no audit row is
    /// written.
    pub fn grant_access(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: PrincipalId,
    ) -> Result<(), RegistryError> {
        self.records
            .owned_by(record_hash, &ctx.caller)
            .map_err(|e| rejected("grant_access", ctx, Some(record_hash), e))?;
        debug!(
            record_hash = record_hash.0,
            grantee = %user,
            grant_mode = self.config.grant_mode.as_str(),
            "access granted"
        );
        if self.config.grant_mode == GrantMode::Record {
            self.permissions.set_active(record_hash, user.clone());
            self.record_audit(
                ctx,
                record_hash,
                RecordAuditEventKind::AccessGranted,
                Some(user),
                None,
            );
        }
        Ok(())
    }

    /// Self-revocation is refused with `AdminOnly` whether or not the caller owns the record.
    /// Revoking an absent entry succeeds and leaves the audit ledger untouched.
    pub fn revoke_access(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        user: &PrincipalId,
    ) -> Result<(), RegistryError> {
        if !self.records.contains(record_hash) {
            return Err(rejected(
                "revoke_access",
                ctx,
                Some(record_hash),
                RegistryError::RecordMissing,
            ));
        }
        if user == &ctx.caller {
            return Err(rejected(
                "revoke_access",
                ctx,
                Some(record_hash),
                RegistryError::AdminOnly,
            ));
        }
        self.records
            .owned_by(record_hash, &ctx.caller)
            .map_err(|e| rejected("revoke_access", ctx, Some(record_hash), e))?;
        let removed = self.permissions.clear(record_hash, user);

        debug!(record_hash = record_hash.0, user = %user, removed, "access revoked");
        if removed {
            self.record_audit(
                ctx,
                record_hash,
                RecordAuditEventKind::AccessRevoked,
                Some(user.clone()),
                None,
            );
        }
        Ok(())
    }

    // Tag manager.

    /// Appends one `PRESERVED` tag. Not idempotent.
    pub fn apply_preservation(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError> {
        let record = self
            .records
            .owned_by_mut(record_hash, &ctx.caller)
            .map_err(|e| rejected("apply_preservation", ctx, Some(record_hash), e))?;
        record.tag_collection = tags::with_preservation_marker(&record.tag_collection)
            .map_err(|e| rejected("apply_preservation", ctx, Some(record_hash), e))?;
        let state_digest = record_state_digest(record);
        let tag_count = record.tag_collection.len();

        self.record_audit(
            ctx,
            record_hash,
            RecordAuditEventKind::PreservationApplied,
            None,
            Some(state_digest),
        );
        debug!(record_hash = record_hash.0, tag_count, "preservation applied");
        Ok(())
    }

    pub fn extend_tags(
        &mut self,
        ctx: &CallContext,
        record_hash: RecordHash,
        additional_tags: &[String],
    ) -> Result<Vec<String>, RegistryError> {
        let record = self
            .records
            .owned_by_mut(record_hash, &ctx.caller)
            .map_err(|e| rejected("extend_tags", ctx, Some(record_hash), e))?;
        let merged = tags::merged_with(&record.tag_collection, additional_tags)
            .map_err(|e| rejected("extend_tags", ctx, Some(record_hash), e))?;
        record.tag_collection = merged.clone();
        let state_digest = record_state_digest(record);

        self.record_audit(
            ctx,
            record_hash,
            RecordAuditEventKind::TagsExtended,
            None,
            Some(state_digest),
        );
        debug!(record_hash = record_hash.0, tag_count = merged.len(), "tags extended");
        Ok(merged)
    }

    // Gated reads.

    pub fn generate_analytics(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<RecordAnalytics, RegistryError> {
        let record = self.records.get(record_hash).ok_or_else(|| {
            rejected(
                "generate_analytics",
                ctx,
                Some(record_hash),
                RegistryError::RecordMissing,
            )
        })?;
        if !self.has_read_standing(record, &ctx.caller) {
            return Err(rejected(
                "generate_analytics",
                ctx,
                Some(record_hash),
                RegistryError::AuthFailure,
            ));
        }
        Ok(RecordAnalytics {
            age: ctx.height.blocks_since(record.genesis_block),
            payload_size: record.payload_size,
            tag_count: record.tag_collection.len(),
        })
    }

    /// Authorization check only. Nothing is stored.
    pub fn activate_enhanced_security(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
    ) -> Result<(), RegistryError> {
        let record = self.records.get(record_hash).ok_or_else(|| {
            rejected(
                "activate_enhanced_security",
                ctx,
                Some(record_hash),
                RegistryError::RecordMissing,
            )
        })?;
        if !self.is_administrator(&ctx.caller) && !record.is_owned_by(&ctx.caller) {
            return Err(rejected(
                "activate_enhanced_security",
                ctx,
                Some(record_hash),
                RegistryError::AdminOnly,
            ));
        }
        debug!(record_hash = record_hash.0, caller = %ctx.caller, "enhanced security activated");
        Ok(())
    }

    pub fn execute_diagnostics(
        &self,
        ctx: &CallContext,
    ) -> Result<DiagnosticsReport, RegistryError> {
        if !self.is_administrator(&ctx.caller) {
            return Err(rejected(
                "execute_diagnostics",
                ctx,
                None,
                RegistryError::AdminOnly,
            ));
        }
        Ok(DiagnosticsReport {
            total_records: self.records.record_count(),
            live_records: self.records.live_record_count() as u64,
            status: true,
            height: ctx.height,
        })
    }

    /// Reports whether `claimed_owner` is the current owner. No content is inspected.
    pub fn validate_integrity(
        &self,
        ctx: &CallContext,
        record_hash: RecordHash,
        claimed_owner: &PrincipalId,
    ) -> Result<IntegrityReport, RegistryError> {
        let record = self.records.get(record_hash).ok_or_else(|| {
            rejected(
                "validate_integrity",
                ctx,
                Some(record_hash),
                RegistryError::RecordMissing,
            )
        })?;
        if !self.has_read_standing(record, &ctx.caller) {
            return Err(rejected(
                "validate_integrity",
                ctx,
                Some(record_hash),
                RegistryError::AuthFailure,
            ));
        }
        let owner_matches = record.is_owned_by(claimed_owner);
        Ok(IntegrityReport {
            integrity_verified: owner_matches,
            current_height: ctx.height,
            record_lifetime: ctx.height.blocks_since(record.genesis_block),
            ownership_verified: owner_matches,
        })
    }

    // Open reads.

    pub fn get_metadata(&self, record_hash: RecordHash) -> Option<&QuantumRecord> {
        self.records.get(record_hash)
    }

    pub fn check_permission(&self, record_hash: RecordHash, user: &PrincipalId) -> bool {
        self.permissions.is_active(record_hash, user)
    }

    /// Users holding an active entry for `record_hash`, in identity order.
    pub fn authorized_users(&self, record_hash: RecordHash) -> Vec<&PrincipalId> {
        self.permissions.active_users(record_hash)
    }

    pub fn get_record_count(&self) -> u64 {
        self.records.record_count()
    }

    pub fn audit_events(&self) -> &[RecordAuditEvent] {
        self.audit.events()
    }

    pub fn audit_events_for_record(&self, record_hash: RecordHash) -> Vec<&RecordAuditEvent> {
        self.audit.events_for_record(record_hash)
    }
}
