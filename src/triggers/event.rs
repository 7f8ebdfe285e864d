//! Match events.
//!
//! Events are emitted while a command resolves and decide which reaction
//! abilities may answer.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, ReactionTrigger};
use crate::core::PlayerId;

/// Something that happened during resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An artifact left play for its owner's discard pile.
    ArtifactDestroyed { owner: PlayerId, card: CardId },
    /// `attacker` attacked every opponent with `source`.
    AttackDeclared { attacker: PlayerId, source: CardId },
}

impl GameEvent {
    /// Does `trigger`, held by `seat`, answer this event?
    ///
    /// ```
    /// use arcana_rules::cards::{CardId, ReactionTrigger};
    /// use arcana_rules::core::PlayerId;
    /// use arcana_rules::triggers::GameEvent;
    ///
    /// let event = GameEvent::ArtifactDestroyed { owner: PlayerId::new(1), card: CardId::new(4) };
    ///
    /// let any = ReactionTrigger::ArtifactDestroyed { own_only: false };
    /// let own = ReactionTrigger::ArtifactDestroyed { own_only: true };
    /// assert!(event.answered_by(any, PlayerId::new(0)));
    /// assert!(!event.answered_by(own, PlayerId::new(0)));
    /// ```
    #[must_use]
    pub fn answered_by(&self, trigger: ReactionTrigger, seat: PlayerId) -> bool {
        match (self, trigger) {
            (
                GameEvent::ArtifactDestroyed { owner, .. },
                ReactionTrigger::ArtifactDestroyed { own_only },
            ) => !own_only || *owner == seat,
            (GameEvent::AttackDeclared { attacker, .. }, ReactionTrigger::IncomingAttack) => {
                *attacker != seat
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::ArtifactDestroyed { owner, card } => write!(f, "{} lost {}", owner, card),
            GameEvent::AttackDeclared { attacker, source } => {
                write!(f, "{} attacks with {}", attacker, source)
            }
        }
    }
}
