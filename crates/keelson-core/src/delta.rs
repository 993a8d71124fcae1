//! Field-level delta computation.
//!
//! A delta is a sparse partial representation of an entity carrying only
//! its identity, its concurrency token, and the fields whose values
//! differ between two snapshots of the same entity. Unchanged fields are
//! never carried, which keeps both the write surface and the conflict
//! surface minimal.

/// A sparse change-set for one entity.
///
/// Identity and concurrency token are always present on a delta but do
/// not make it dirty; only genuine field changes do.
pub trait Delta {
    /// True if at least one field differs between the two snapshots
    fn is_dirty(&self) -> bool;
}

/// Field-by-field value comparison producing a sparse delta.
///
/// Implementations compare under value equality, not identity equality,
/// and include a field in the delta iff it differs. The delta always
/// carries the entity identity and the version read at load time, since
/// the persistence call needs them to target the correct row and check
/// the correct version.
///
/// There is no diff call for a brand-new entity (no `old` side exists);
/// the full entity is inserted instead.
pub trait Diffable {
    type Delta: Delta;

    fn diff(old: &Self, current: &Self) -> Self::Delta;
}

/// Per-field comparison helper: the current value iff it differs from
/// the old one under value equality.
pub fn changed<T: PartialEq + Clone>(old: &T, current: &T) -> Option<T> {
    if old != current {
        Some(current.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_detects_value_difference() {
        assert_eq!(changed(&1, &2), Some(2));
        assert_eq!(changed(&"a".to_string(), &"b".to_string()), Some("b".to_string()));
    }

    #[test]
    fn test_changed_ignores_equal_values() {
        assert_eq!(changed(&1, &1), None);
        let s = "same".to_string();
        assert_eq!(changed(&s, &s.clone()), None);
    }
}
