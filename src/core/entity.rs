//! Instance identification for cards in play.
//!
//! A `CardId` names a card definition; the same definition can in principle
//! be in play more than once. Every `ControlledCard` therefore carries an
//! `InstanceId`, allocated by the match state when the card enters play and
//! never reused within a match. Continuations and pending decisions refer to
//! their source by instance so that a destroyed source is detected rather
//! than confused with another copy.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn successor(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}
