//! Child-collection reconciliation.
//!
//! Given the owned child collection as it was at snapshot time and as it
//! is currently held by the root, partition the current children into
//! New, Changed and Removed. Unchanged children appear in no partition
//! and never generate a write.

use std::collections::HashMap;
use std::hash::Hash;

use crate::delta::{Delta, Diffable};
use crate::identity::Identity;

/// A child entity owned exclusively by an aggregate root.
///
/// Children have no independent lifecycle: they are created, updated and
/// deleted only as part of the root's save/remove.
pub trait ChildEntity: Diffable {
    type Key: Eq + Hash + Clone;

    /// Identity state of this child. `Unassigned` until the store
    /// assigns a key on first insert.
    fn identity(&self) -> Identity<Self::Key>;
}

/// Result of reconciling a child collection against its snapshot.
///
/// The three partitions are pairwise disjoint by construction: an
/// identity-absent element never matches an identity-present one, and
/// each assigned identity is consumed by exactly one classification.
#[derive(Debug)]
pub struct Reconciliation<'a, C> {
    /// Children with no assigned identity (or no snapshot counterpart),
    /// in the insertion order of the current collection. Inserted whole.
    pub added: Vec<&'a C>,
    /// Children present on both sides whose field-level diff is dirty
    pub changed: Vec<&'a C>,
    /// Snapshot children whose identity is absent from the current
    /// collection, in snapshot order. Deleted by identity.
    pub removed: Vec<&'a C>,
}

impl<C> Reconciliation<'_, C> {
    /// True if no partition holds any element
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Compute the New/Changed/Removed partitions in a single pass.
///
/// `before` is indexed by assigned identity, each `after` element is
/// classified against that index, and whatever remains unconsumed in the
/// index is removed. A current child carrying an assigned identity with
/// no snapshot counterpart is classified as added: there is no old side
/// to diff against, so the full row must be written.
pub fn reconcile<'a, C: ChildEntity>(before: &'a [C], after: &'a [C]) -> Reconciliation<'a, C> {
    let mut index: HashMap<C::Key, &'a C> = HashMap::new();
    for child in before {
        if let Identity::Assigned(key) = child.identity() {
            index.insert(key, child);
        }
    }

    let mut added = Vec::new();
    let mut changed = Vec::new();
    for child in after {
        match child.identity() {
            Identity::Unassigned => added.push(child),
            Identity::Assigned(key) => match index.remove(&key) {
                Some(old) => {
                    if C::diff(old, child).is_dirty() {
                        changed.push(child);
                    }
                }
                None => added.push(child),
            },
        }
    }

    // Whatever is still indexed was dropped from the current collection.
    // Walk `before` in order so the output is deterministic.
    let removed = before
        .iter()
        .filter(|child| {
            child
                .identity()
                .as_assigned()
                .is_some_and(|key| index.contains_key(key))
        })
        .collect();

    Reconciliation {
        added,
        changed,
        removed,
    }
}
