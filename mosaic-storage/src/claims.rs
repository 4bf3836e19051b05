//! Claim-if-absent sets for write deduplication.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use mosaic_core::DedupeKey;

/// Result of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The key was unseen and now belongs to this caller.
    Claimed,
    /// Another caller claimed the key first.
    AlreadyClaimed,
}

impl ClaimOutcome {
    pub fn is_claimed(self) -> bool {
        matches!(self, ClaimOutcome::Claimed)
    }
}

/// A process-wide set of claimed keys.
///
/// Claims never expire and are never removed. Among any number of
/// concurrent callers racing on the same key exactly one observes
/// [`ClaimOutcome::Claimed`].
pub struct ClaimSet<K>
where
    K: Eq + Hash,
{
    claims: Arc<DashMap<K, ()>>,
}

impl<K> ClaimSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            claims: Arc::new(DashMap::new()),
        }
    }

    /// Atomically claim `key` if nobody has claimed it yet.
    pub fn try_claim(&self, key: K) -> ClaimOutcome {
        // The entry API holds the shard lock across the check and the insert.
        match self.claims.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => ClaimOutcome::AlreadyClaimed,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                ClaimOutcome::Claimed
            }
        }
    }

    pub fn is_claimed(&self, key: &K) -> bool {
        self.claims.contains_key(key)
    }

    /// Number of claims held.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl<K> Default for ClaimSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for ClaimSet<K>
where
    K: Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            claims: Arc::clone(&self.claims),
        }
    }
}

impl<K> std::fmt::Debug for ClaimSet<K>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimSet").field("len", &self.len()).finish()
    }
}

// ============================================================================
// IDEMPOTENCY LEDGER
// ============================================================================

/// Fine-grained write dedupe keyed by token, operation and payload.
///
/// Clones share the same underlying set.
#[derive(Debug, Clone, Default)]
pub struct IdempotencyLedger {
    claims: ClaimSet<DedupeKey>,
}

impl IdempotencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a dedupe key. The claim is permanent, whatever the outcome of
    /// the write it guards.
    pub fn claim(&self, key: DedupeKey) -> ClaimOutcome {
        let outcome = self.claims.try_claim(key);
        tracing::trace!(claims = self.claims.len(), ?outcome, "Ledger claim attempted");
        outcome
    }

    pub fn contains(&self, key: &DedupeKey) -> bool {
        self.claims.is_claimed(key)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
