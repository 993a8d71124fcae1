use serde::{Deserialize, Serialize};

/// Identity state of a child entity
///
/// A child entity has no identity until the store assigns one on first
/// insert. Modeling that as an explicit tagged state (rather than a
/// nullable field) makes the New/Changed/Removed classification in
/// [`crate::reconcile`] exhaustive and compiler-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity<K> {
    /// Never persisted; the store will assign an identity on insert
    Unassigned,
    /// Persisted under the given key. Immutable once assigned.
    Assigned(K),
}

impl<K> Identity<K> {
    /// True if the store has assigned a key
    pub fn is_assigned(&self) -> bool {
        matches!(self, Identity::Assigned(_))
    }

    /// The assigned key, if any
    pub fn as_assigned(&self) -> Option<&K> {
        match self {
            Identity::Assigned(k) => Some(k),
            Identity::Unassigned => None,
        }
    }

    /// Consume into the assigned key, if any
    pub fn into_assigned(self) -> Option<K> {
        match self {
            Identity::Assigned(k) => Some(k),
            Identity::Unassigned => None,
        }
    }
}

impl<K> From<Option<K>> for Identity<K> {
    fn from(value: Option<K>) -> Self {
        match value {
            Some(k) => Identity::Assigned(k),
            None => Identity::Unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigned_accessors() {
        let id: Identity<i64> = Identity::Assigned(7);
        assert!(id.is_assigned());
        assert_eq!(id.as_assigned(), Some(&7));
        assert_eq!(id.into_assigned(), Some(7));
    }

    #[test]
    fn test_unassigned_accessors() {
        let id: Identity<i64> = Identity::Unassigned;
        assert!(!id.is_assigned());
        assert_eq!(id.as_assigned(), None);
        assert_eq!(id.into_assigned(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Identity::from(Some(3)), Identity::Assigned(3));
        assert_eq!(Identity::<i64>::from(None), Identity::Unassigned);
    }
}
