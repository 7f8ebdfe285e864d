//! The interrupt stack.
//!
//! Resolution in Res Arcana is immediate except where another seat must
//! answer first. Those points suspend the acting seat's ability:
//!
//! - **Attack**: every opponent must pay the negation cost, react, or take
//!   the outcome before the rest of the ability resolves.
//! - **Reactions**: after an artifact is destroyed, every seat holding a
//!   usable `ArtifactDestroyed` reaction may use it or decline.
//! - **Reveal**: the owner decides after seeing cards (discarding after a
//!   draw, reordering the top of the deck).
//!
//! Each suspension is a `StackEntry` carrying the `Continuation` to run once
//! it is answered. Entries nest LIFO; only the top entry accepts responses.
//! When the stack drains, the acting seat's turn ends.

use serde::{Deserialize, Serialize};

use crate::cards::{Attack, CardId, Effect};
use crate::core::{InstanceId, PlayerId};
use crate::effects::{AbilityChoices, PendingDecision, ResolutionMemo};

/// Unique identifier for a stack entry within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackEntryId(pub u32);

impl StackEntryId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StackEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackEntry({})", self.0)
    }
}

/// What a suspension is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interrupt {
    Attack {
        attacker: PlayerId,
        source: CardId,
        attack: Attack,
        /// Defenders yet to respond, in turn order.
        pending: Vec<PlayerId>,
    },
    Reactions {
        destroyed: CardId,
        owner: PlayerId,
        /// Seats that may still react, in turn order.
        pending: Vec<PlayerId>,
    },
    Reveal(PendingDecision),
}

impl Interrupt {
    /// Seats that still owe a response.
    #[must_use]
    pub fn waiting_on(&self) -> Vec<PlayerId> {
        match self {
            Interrupt::Attack { pending, .. } | Interrupt::Reactions { pending, .. } => {
                pending.clone()
            }
            Interrupt::Reveal(decision) => vec![decision.seat],
        }
    }

    /// Has every seat answered?
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            Interrupt::Attack { pending, .. } | Interrupt::Reactions { pending, .. } => {
                pending.is_empty()
            }
            Interrupt::Reveal(_) => false,
        }
    }
}

/// The rest of a suspended ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub seat: PlayerId,
    pub source: InstanceId,
    pub card: CardId,
    /// Effects still to resolve, with their index in the ability.
    pub effects: Vec<(usize, Effect)>,
    pub choices: AbilityChoices,
    pub memo: ResolutionMemo,
}

/// A suspension and what follows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub id: StackEntryId,
    pub interrupt: Interrupt,
    pub continuation: Option<Continuation>,
}

/// LIFO stack of suspensions (index 0 = bottom).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptStack {
    entries: Vec<StackEntry>,
    next_id: u32,
}

impl InterruptStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries, bottom to top.
    #[must_use]
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    #[must_use]
    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut StackEntry> {
        self.entries.last_mut()
    }

    pub fn push(
        &mut self,
        interrupt: Interrupt,
        continuation: Option<Continuation>,
    ) -> StackEntryId {
        let id = StackEntryId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(StackEntry {
            id,
            interrupt,
            continuation,
        });
        id
    }

    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }
}
