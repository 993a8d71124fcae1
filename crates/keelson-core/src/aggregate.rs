//! Aggregate wrapper with snapshot capture.
//!
//! An aggregate is a root entity plus the children it exclusively owns,
//! treated as one consistency and persistence unit. The wrapper retains
//! an immutable snapshot of the root as loaded so that change detection
//! can be re-derived on demand instead of tracked through dirty flags
//! (direct field mutation can never bypass it).
//!
//! The wrapper instance is not meant to be shared across concurrent
//! callers; concurrency correctness comes from the version token checked
//! at write time, not from the wrapper.

use crate::reconcile::{reconcile, ChildEntity, Reconciliation};

/// Contract an aggregate root must satisfy.
///
/// `PartialEq` must compare by value over the root's fields and its
/// owned collections, since the wrapper derives `is_changed` from a
/// whole-root comparison against the snapshot.
pub trait AggregateRoot: Clone + PartialEq {
    type Id: Clone + Eq + std::fmt::Display;

    /// Stable identity. Immutable once assigned.
    fn id(&self) -> &Self::Id;

    /// Concurrency token as read at load time
    fn version(&self) -> i64;

    /// Called by the persistence layer after a successful root write to
    /// keep the in-memory token aligned with the stored one
    fn set_version(&mut self, version: i64);
}

/// Wrapper tracking whether an aggregate is new or existing, and holding
/// the snapshot used for delta computation and child reconciliation.
#[derive(Debug, Clone)]
pub struct Aggregate<R: AggregateRoot> {
    root: R,
    snapshot: Option<R>,
}

impl<R: AggregateRoot> Aggregate<R> {
    /// Wrap a domain-constructed root that has never been persisted.
    ///
    /// No snapshot exists: the "old" side of every comparison is
    /// implicitly absent, so the first save inserts everything whole.
    pub fn fresh(root: R) -> Self {
        Self {
            root,
            snapshot: None,
        }
    }

    /// Wrap a root as loaded from the store, capturing its snapshot.
    ///
    /// The snapshot is a structural copy taken exactly once here; later
    /// field-by-field comparison against the live root reflects only
    /// real mutations, never copy aliasing.
    pub fn loaded(root: R) -> Self {
        let snapshot = root.clone();
        Self {
            root,
            snapshot: Some(snapshot),
        }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut R {
        &mut self.root
    }

    /// The snapshot taken at load time; `None` for new aggregates
    pub fn snapshot(&self) -> Option<&R> {
        self.snapshot.as_ref()
    }

    /// True if this aggregate has never been persisted
    pub fn is_new(&self) -> bool {
        self.snapshot.is_none()
    }

    /// True if the root or any owned collection differs from the
    /// snapshot. Computed on demand; new aggregates are always changed.
    pub fn is_changed(&self) -> bool {
        match &self.snapshot {
            None => true,
            Some(snapshot) => snapshot != &self.root,
        }
    }

    /// Reconcile one owned child collection against its snapshot state.
    ///
    /// `children` selects the collection off the root; the same accessor
    /// is applied to the snapshot side. For a new aggregate the snapshot
    /// side is the empty collection.
    pub fn reconcile_children<'a, C, F>(&'a self, children: F) -> Reconciliation<'a, C>
    where
        C: ChildEntity,
        F: Fn(&'a R) -> &'a [C],
    {
        let before: &[C] = self.snapshot.as_ref().map(&children).unwrap_or(&[]);
        reconcile(before, children(&self.root))
    }

    /// Children of the current collection with no persisted counterpart
    pub fn find_new_entities<'a, C, F>(&'a self, children: F) -> Vec<&'a C>
    where
        C: ChildEntity,
        F: Fn(&'a R) -> &'a [C],
    {
        self.reconcile_children(children).added
    }

    /// Children present in both snapshot and current collection whose
    /// field-level diff is dirty
    pub fn find_changed_entities<'a, C, F>(&'a self, children: F) -> Vec<&'a C>
    where
        C: ChildEntity,
        F: Fn(&'a R) -> &'a [C],
    {
        self.reconcile_children(children).changed
    }

    /// Snapshot children whose identity is absent from the current
    /// collection
    pub fn find_removed_entities<'a, C, F>(&'a self, children: F) -> Vec<&'a C>
    where
        C: ChildEntity,
        F: Fn(&'a R) -> &'a [C],
    {
        self.reconcile_children(children).removed
    }

    /// Re-capture the snapshot after a successful save.
    ///
    /// Makes an immediately repeated save a no-op and flips a fresh
    /// aggregate to existing.
    pub fn mark_persisted(&mut self) {
        self.snapshot = Some(self.root.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::{changed as field_changed, Delta, Diffable};
    use crate::identity::Identity;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        id: Identity<i64>,
        qty: i32,
    }

    struct LineDelta {
        qty: Option<i32>,
    }

    impl Delta for LineDelta {
        fn is_dirty(&self) -> bool {
            self.qty.is_some()
        }
    }

    impl Diffable for Line {
        type Delta = LineDelta;

        fn diff(old: &Self, current: &Self) -> Self::Delta {
            LineDelta {
                qty: field_changed(&old.qty, &current.qty),
            }
        }
    }

    impl ChildEntity for Line {
        type Key = i64;

        fn identity(&self) -> Identity<i64> {
            self.id
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Cart {
        id: String,
        version: i64,
        lines: Vec<Line>,
    }

    impl AggregateRoot for Cart {
        type Id = String;

        fn id(&self) -> &String {
            &self.id
        }

        fn version(&self) -> i64 {
            self.version
        }

        fn set_version(&mut self, version: i64) {
            self.version = version;
        }
    }

    fn cart() -> Cart {
        Cart {
            id: "C1".to_string(),
            version: 1,
            lines: vec![
                Line {
                    id: Identity::Assigned(1),
                    qty: 2,
                },
                Line {
                    id: Identity::Assigned(2),
                    qty: 5,
                },
            ],
        }
    }

    #[test]
    fn test_fresh_is_new_and_changed() {
        let agg = Aggregate::fresh(cart());
        assert!(agg.is_new());
        assert!(agg.is_changed());
        assert!(agg.snapshot().is_none());
    }

    #[test]
    fn test_loaded_is_unchanged_until_mutated() {
        let mut agg = Aggregate::loaded(cart());
        assert!(!agg.is_new());
        assert!(!agg.is_changed());

        agg.root_mut().lines[0].qty = 3;
        assert!(agg.is_changed());
    }

    #[test]
    fn test_snapshot_is_not_aliased() {
        let mut agg = Aggregate::loaded(cart());
        agg.root_mut().version = 99;
        assert_eq!(agg.snapshot().unwrap().version, 1);
    }

    #[test]
    fn test_child_classification_through_wrapper() {
        let mut agg = Aggregate::loaded(cart());
        {
            let root = agg.root_mut();
            root.lines[0].qty = 9; // changed
            root.lines.remove(1); // removed
            root.lines.push(Line {
                id: Identity::Unassigned,
                qty: 1,
            }); // new
        }

        let added = agg.find_new_entities(|c| c.lines.as_slice());
        let changed = agg.find_changed_entities(|c| c.lines.as_slice());
        let removed = agg.find_removed_entities(|c| c.lines.as_slice());

        assert_eq!(added.len(), 1);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].identity(), Identity::Assigned(1));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].identity(), Identity::Assigned(2));
    }

    #[test]
    fn test_new_aggregate_reconciles_against_empty_snapshot() {
        let agg = Aggregate::fresh(cart());
        let rec = agg.reconcile_children(|c| c.lines.as_slice());
        // both lines carry assigned ids but have no snapshot counterpart
        assert_eq!(rec.added.len(), 2);
        assert!(rec.changed.is_empty());
        assert!(rec.removed.is_empty());
    }

    #[test]
    fn test_mark_persisted_resets_change_detection() {
        let mut agg = Aggregate::fresh(cart());
        agg.mark_persisted();
        assert!(!agg.is_new());
        assert!(!agg.is_changed());

        agg.root_mut().lines[0].qty = 100;
        assert!(agg.is_changed());
    }
}
