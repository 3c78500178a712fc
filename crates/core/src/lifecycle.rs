//! Entity lifecycle status.

use serde::{Deserialize, Serialize};

/// Explicit lifecycle status carried by soft-deletable entities.
///
/// Replaces nullable "deleted at" timestamps: an entity is either `Active`
/// or `Deleted`, and query layers filter on it explicitly. Deletion is a
/// state transition, never a row removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Deleted,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Active
    }
}
