#![forbid(unsafe_code)]

use proptest::prelude::*;
use quantum_kernel_contracts::qrec::{RecordHash, RecordInput, RegistryError};
use quantum_kernel_contracts::{BlockHeight, PrincipalId, Validate};
use quantum_storage::{CallContext, QuantumRegistry};

fn user(id: &str) -> PrincipalId {
    PrincipalId::new(id).unwrap()
}

fn ctx(caller: &str, height: u64) -> CallContext {
    CallContext::new(user(caller), BlockHeight(height))
}

fn tags(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn doc(key: &str) -> RecordInput {
    RecordInput::new(key, 1024, "abcd", tags(&["alpha"]))
}

fn registry() -> QuantumRegistry {
    QuantumRegistry::initialize(user("deployer"))
}

#[test]
fn at_qrec_db_01_establish_assigns_sequential_hashes_from_one() {
    let mut r = registry();
    let a = ctx("alice", 100);

    assert_eq!(r.establish_record(&a, doc("doc-1")).unwrap(), RecordHash(1));
    assert_eq!(r.establish_record(&a, doc("doc-2")).unwrap(), RecordHash(2));
    assert_eq!(
        r.establish_record(&ctx("bob", 101), doc("doc-3")).unwrap(),
        RecordHash(3)
    );
    assert_eq!(r.get_record_count(), 3);
}

#[test]
fn at_qrec_db_02_establish_then_metadata_matches_inputs() {
    let mut r = registry();
    let a = ctx("alice", 100);
    let input = RecordInput::new("doc-1", 1024, "abcd1234", tags(&["alpha", "beta"]));

    let h = r.establish_record(&a, input.clone()).unwrap();
    let row = r.get_metadata(h).unwrap();

    assert_eq!(row.record_hash, h);
    assert_eq!(row.record_key, input.record_key);
    assert_eq!(row.payload_size, input.payload_size);
    assert_eq!(row.record_digest, input.record_digest);
    assert_eq!(row.tag_collection, input.tag_collection);
    assert_eq!(row.record_owner, user("alice"));
    assert_eq!(row.genesis_block, BlockHeight(100));
    assert!(row.validate().is_ok());
    assert!(r.check_permission(h, &user("alice")));
}

#[test]
fn at_qrec_db_03_deleted_hashes_are_never_reused() {
    let mut r = registry();
    let a = ctx("alice", 100);

    let h1 = r.establish_record(&a, doc("doc-1")).unwrap();
    let h2 = r.establish_record(&a, doc("doc-2")).unwrap();
    r.delete_record(&a, h2).unwrap();
    r.delete_record(&a, h1).unwrap();

    assert_eq!(r.establish_record(&a, doc("doc-3")).unwrap(), RecordHash(3));
    assert_eq!(r.get_record_count(), 3);
    assert!(r.get_metadata(h1).is_none());
    assert!(r.get_metadata(h2).is_none());
}

#[test]
fn at_qrec_db_04_key_length_bounds_are_exclusive() {
    let mut r = registry();
    let a = ctx("alice", 1);

    assert_eq!(
        r.establish_record(&a, doc("")),
        Err(RegistryError::KeyMalformed)
    );
    assert_eq!(
        r.establish_record(&a, doc(&"k".repeat(64))),
        Err(RegistryError::KeyMalformed)
    );
    assert_eq!(r.get_record_count(), 0);

    assert_eq!(r.establish_record(&a, doc("k")).unwrap(), RecordHash(1));
    assert_eq!(
        r.establish_record(&a, doc(&"k".repeat(63))).unwrap(),
        RecordHash(2)
    );
}

#[test]
fn at_qrec_db_05_validation_order_names_first_failure() {
    let mut r = registry();
    let a = ctx("alice", 1);

    let cases = [
        (RecordInput::new("", 0, "", vec![]), RegistryError::KeyMalformed),
        (RecordInput::new("k", 0, "", vec![]), RegistryError::SizeInvalid),
        (
            RecordInput::new("k", 1_000_000_000, "d", tags(&["a"])),
            RegistryError::SizeInvalid,
        ),
        (RecordInput::new("k", 1, "", vec![]), RegistryError::KeyMalformed),
        (
            RecordInput::new("k", 1, &"d".repeat(128), tags(&["a"])),
            RegistryError::KeyMalformed,
        ),
        (RecordInput::new("k", 1, "d", vec![]), RegistryError::TagValidationFailed),
        (
            RecordInput::new("k", 1, "d", vec!["t".to_string(); 11]),
            RegistryError::TagValidationFailed,
        ),
        (
            RecordInput::new("k", 1, "d", vec!["x".repeat(33)]),
            RegistryError::TagValidationFailed,
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(r.establish_record(&a, input), Err(expected));
    }
    assert_eq!(r.get_record_count(), 0);
    assert!(!r.check_permission(RecordHash(1), &user("alice")));
}

#[test]
fn at_qrec_db_06_update_is_owner_gated_and_atomic() {
    let mut r = registry();
    let a = ctx("alice", 100);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();
    let before = r.get_metadata(h).unwrap().clone();

    let replacement = RecordInput::new("doc-1b", 2048, "ffff", tags(&["beta", "gamma"]));
    assert_eq!(
        r.update_record(&ctx("bob", 101), h, replacement.clone()),
        Err(RegistryError::OperationForbidden)
    );
    assert_eq!(
        r.update_record(&a, RecordHash(99), replacement.clone()),
        Err(RegistryError::RecordMissing)
    );
    assert_eq!(
        r.update_record(&a, h, RecordInput::new("doc-1b", 0, "ffff", tags(&["beta"]))),
        Err(RegistryError::SizeInvalid)
    );
    assert_eq!(r.get_metadata(h).unwrap(), &before);

    r.update_record(&ctx("alice", 150), h, replacement.clone())
        .unwrap();
    let after = r.get_metadata(h).unwrap();
    assert_eq!(after.record_key, "doc-1b");
    assert_eq!(after.payload_size, 2048);
    assert_eq!(after.record_digest, "ffff");
    assert_eq!(after.tag_collection, replacement.tag_collection);
    assert_eq!(after.record_owner, user("alice"));
    assert_eq!(after.genesis_block, BlockHeight(100));
    assert_eq!(after.record_hash, h);
}

#[test]
fn at_qrec_db_07_transfer_moves_write_authority_only() {
    let mut r = registry();
    let a = ctx("alice", 100);
    let b = ctx("bob", 101);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();

    assert_eq!(
        r.transfer_ownership(&b, h, user("bob")),
        Err(RegistryError::OperationForbidden)
    );
    r.transfer_ownership(&a, h, user("bob")).unwrap();

    let row = r.get_metadata(h).unwrap();
    assert_eq!(row.record_owner, user("bob"));
    assert_eq!(row.tag_collection, tags(&["alpha"]));
    assert_eq!(
        r.update_record(&a, h, doc("doc-1")),
        Err(RegistryError::OperationForbidden)
    );
    r.update_record(&b, h, doc("doc-1-bob")).unwrap();

    // Prior owner keeps its entry; the new owner was not given one.
    assert!(r.check_permission(h, &user("alice")));
    assert!(!r.check_permission(h, &user("bob")));
}

#[test]
fn at_qrec_db_08_delete_is_owner_gated_and_irreversible() {
    let mut r = registry();
    let a = ctx("alice", 100);
    let h = r.establish_record(&a, doc("doc-1")).unwrap();

    assert_eq!(
        r.delete_record(&ctx("bob", 100), h),
        Err(RegistryError::OperationForbidden)
    );
    assert!(r.get_metadata(h).is_some());

    r.delete_record(&a, h).unwrap();
    assert!(r.get_metadata(h).is_none());
    assert_eq!(r.update_record(&a, h, doc("doc-1")), Err(RegistryError::RecordMissing));
    assert_eq!(r.delete_record(&a, h), Err(RegistryError::RecordMissing));
    assert_eq!(
        r.transfer_ownership(&a, h, user("bob")),
        Err(RegistryError::RecordMissing)
    );
    // No cascade into the permission table.
    assert!(r.check_permission(h, &user("alice")));
    assert_eq!(r.get_record_count(), 1);
}

proptest! {
    #[test]
    fn at_qrec_db_09_count_tracks_successful_establishes(
        ops in proptest::collection::vec((0usize..70, 0u64..3, any::<bool>()), 1..40)
    ) {
        let mut r = registry();
        let a = ctx("alice", 10);
        let mut successes = 0u64;
        let mut last = 0u64;

        for (key_len, size, delete_after) in ops {
            let input = RecordInput::new("k".repeat(key_len), size, "d", tags(&["t"]));
            match r.establish_record(&a, input) {
                Ok(h) => {
                    successes += 1;
                    prop_assert_eq!(h.0, last + 1);
                    last = h.0;
                    if delete_after {
                        r.delete_record(&a, h).unwrap();
                    }
                }
                Err(e) => {
                    prop_assert!(
                        e == RegistryError::KeyMalformed || e == RegistryError::SizeInvalid
                    );
                }
            }
        }
        prop_assert_eq!(r.get_record_count(), successes);
    }
}
