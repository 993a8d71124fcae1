use serde::{Deserialize, Serialize};

/// A customer, referenced from orders by id only.
///
/// Lives in its own aggregate; order persistence never cascades into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
