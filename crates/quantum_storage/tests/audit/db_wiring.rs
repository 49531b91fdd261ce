#![forbid(unsafe_code)]

use quantum_kernel_contracts::audit::{AuditEventId, RecordAuditEventKind};
use quantum_kernel_contracts::qrec::{RecordInput, RegistryError};
use quantum_kernel_contracts::{BlockHeight, PrincipalId};
use quantum_storage::audit::record_state_digest;
use quantum_storage::{CallContext, GrantMode, QuantumRegistry, RegistryConfig};

fn user(id: &str) -> PrincipalId {
    PrincipalId::new(id).unwrap()
}

fn ctx(caller: &str, height: u64) -> CallContext {
    CallContext::new(user(caller), BlockHeight(height))
}

fn doc(key: &str) -> RecordInput {
    RecordInput::new(key, 1024, "abcd", vec!["alpha".to_string()])
}

fn registry_with(grant_mode: GrantMode) -> QuantumRegistry {
    QuantumRegistry::initialize_with_config(
        user("deployer"),
        RegistryConfig {
            grant_mode,
            ..RegistryConfig::default()
        },
    )
}

#[test]
fn at_qrec_audit_01_one_row_per_successful_mutation() {
    let mut r = registry_with(GrantMode::Record);
    let a = ctx("alice", 10);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();
    r.update_record(&a, h, doc("doc-1b")).unwrap();
    r.grant_access(&a, h, user("bob")).unwrap();
    r.revoke_access(&a, h, &user("bob")).unwrap();
    r.apply_preservation(&a, h).unwrap();
    r.extend_tags(&a, h, &["beta".to_string()]).unwrap();
    r.transfer_ownership(&a, h, user("bob")).unwrap();
    r.delete_record(&ctx("bob", 11), h).unwrap();

    let kinds: Vec<RecordAuditEventKind> = r.audit_events().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RecordAuditEventKind::Established,
            RecordAuditEventKind::Updated,
            RecordAuditEventKind::AccessGranted,
            RecordAuditEventKind::AccessRevoked,
            RecordAuditEventKind::PreservationApplied,
            RecordAuditEventKind::TagsExtended,
            RecordAuditEventKind::OwnershipTransferred,
            RecordAuditEventKind::Deleted,
        ]
    );
    let ids: Vec<u64> = r.audit_events().iter().map(|e| e.event_id.0).collect();
    assert_eq!(ids, (1..=8).collect::<Vec<u64>>());

    let last = r.audit_events().last().unwrap();
    assert_eq!(last.actor, user("bob"));
    assert_eq!(last.height, BlockHeight(11));
    assert!(last.state_digest.is_none());
}

#[test]
fn at_qrec_audit_02_failures_append_nothing() {
    let mut r = QuantumRegistry::initialize(user("deployer"));
    let a = ctx("alice", 10);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();

    assert_eq!(
        r.update_record(&ctx("bob", 10), h, doc("x")),
        Err(RegistryError::OperationForbidden)
    );
    assert_eq!(
        r.establish_record(&a, doc("")),
        Err(RegistryError::KeyMalformed)
    );
    assert_eq!(
        r.revoke_access(&a, h, &user("alice")),
        Err(RegistryError::AdminOnly)
    );
    r.activate_enhanced_security(&a, h).unwrap();
    assert_eq!(r.audit_events().len(), 1);
    assert_eq!(r.audit_events()[0].event_id, AuditEventId(1));
}

#[test]
fn at_qrec_audit_03_state_digest_matches_stored_row() {
    let mut r = QuantumRegistry::initialize(user("deployer"));
    let a = ctx("alice", 10);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();
    r.extend_tags(&a, h, &["beta".to_string()]).unwrap();

    let expected = record_state_digest(r.get_metadata(h).unwrap());
    let rows = r.audit_events_for_record(h);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].state_digest.as_deref(), Some(expected.as_str()));
    assert_ne!(rows[0].state_digest, rows[1].state_digest);
}

#[test]
fn at_qrec_audit_04_grant_rows_follow_the_permission_table() {
    let mut r = registry_with(GrantMode::Record);
    let a = ctx("alice", 10);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();
    r.grant_access(&a, h, user("carol")).unwrap();

    assert!(r.check_permission(h, &user("carol")));
    let row = r.audit_events_for_record(h)[1];
    assert_eq!(row.kind, RecordAuditEventKind::AccessGranted);
    assert_eq!(row.subject, Some(user("carol")));
    assert!(row.state_digest.is_none());

    // Validate-only grants change no table, so they leave no row.
    let mut r = registry_with(GrantMode::ValidateOnly);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();
    r.grant_access(&a, h, user("carol")).unwrap();

    assert!(!r.check_permission(h, &user("carol")));
    let kinds: Vec<RecordAuditEventKind> =
        r.audit_events_for_record(h).iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![RecordAuditEventKind::Established]);
}

#[test]
fn at_qrec_audit_04b_revoking_absent_entry_leaves_no_row() {
    let mut r = registry_with(GrantMode::Record);
    let a = ctx("alice", 10);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();

    r.revoke_access(&a, h, &user("bob")).unwrap();
    assert_eq!(r.audit_events().len(), 1);

    r.grant_access(&a, h, user("bob")).unwrap();
    r.revoke_access(&a, h, &user("bob")).unwrap();
    assert_eq!(
        r.audit_events().last().map(|e| e.kind),
        Some(RecordAuditEventKind::AccessRevoked)
    );
    assert_eq!(r.audit_events().len(), 3);
}

#[test]
fn at_qrec_audit_05_disabled_ledger_stays_empty() {
    let mut r = QuantumRegistry::initialize_with_config(
        user("deployer"),
        RegistryConfig {
            audit_enabled: false,
            ..RegistryConfig::default()
        },
    );
    let a = ctx("alice", 10);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();
    r.delete_record(&a, h).unwrap();
    assert!(r.audit_events().is_empty());
}
