#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use quantum_kernel_contracts::qrec::RecordHash;
use quantum_kernel_contracts::PrincipalId;

/// Per-record authorized-reader table. Absence of an entry means not granted.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    entries: BTreeMap<(RecordHash, PrincipalId), bool>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&mut self, record_hash: RecordHash, user: PrincipalId) {
        self.entries.insert((record_hash, user), true);
    }

    /// Returns whether an entry was present.
    pub fn clear(&mut self, record_hash: RecordHash, user: &PrincipalId) -> bool {
        self.entries.remove(&(record_hash, user.clone())).is_some()
    }

    pub fn is_active(&self, record_hash: RecordHash, user: &PrincipalId) -> bool {
        self.entries
            .get(&(record_hash, user.clone()))
            .copied()
            .unwrap_or(false)
    }

    /// Users holding an entry for `record_hash`, in identity order.
    pub fn active_users(&self, record_hash: RecordHash) -> Vec<&PrincipalId> {
        self.entries
            .iter()
            .filter(|((h, _), active)| *h == record_hash && **active)
            .map(|((_, user), _)| user)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
