use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Visibility of a method.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Callable from anywhere
    Public,

    /// Callable from instances of the same class
    Protected,

    /// Callable only from the receiver itself
    Private,
}

impl Visibility {
    /// Check if the visibility is [Visibility::Public].
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}
