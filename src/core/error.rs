//! Error types.
//!
//! `RulesError` is what a rejected command returns. The match is left
//! exactly as it was before the command. `Poisoned` is the one variant
//! that is not recoverable: a shared match whose last command panicked
//! refuses everything after it.
//! Broken resource invariants are not `RulesError`s; they panic inside
//! `ResourceBag`.
//!
//! `ConfigError` covers building a match: bad configuration or card data
//! that cannot supply the configured counts.

use std::fmt;

use serde::Serialize;

use crate::cards::{CardId, CardType};
use crate::effects::PendingDecision;

use super::player::PlayerId;
use super::resources::ResourceBag;
use super::state::Phase;

/// Why a command was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RulesError {
    /// The command does not apply in the current phase or sub-state.
    InvalidPhase { phase: Phase, command: &'static str },
    /// Another seat must act first.
    NotYourTurn { seat: PlayerId, waiting_on: Option<PlayerId> },
    InsufficientResources { needed: ResourceBag, available: ResourceBag },
    /// A non-resource cost cannot be paid (tapped source, no target).
    UnpayableCost(String),
    InvalidTarget(String),
    /// A supplied choice is not one of the legal answers.
    InvalidChoice(String),
    /// The card is not in the registry or not where the command says.
    UnknownCard(CardId),
    UnknownAbility { card: CardId, index: usize },
    /// A choice is missing; the decision lists the legal answers.
    PendingDecisionRequired(Box<PendingDecision>),
    AlreadyFinalized(PlayerId),
    AlreadyPassed(PlayerId),
    UnknownSeat(PlayerId),
    /// The match is over; only a new match can be started.
    GameOver,
    /// An earlier command panicked while holding a shared match.
    Poisoned,
}

impl RulesError {
    pub(crate) fn phase(phase: Phase, command: &'static str) -> Self {
        RulesError::InvalidPhase { phase, command }
    }

    pub(crate) fn pending(decision: PendingDecision) -> Self {
        RulesError::PendingDecisionRequired(Box::new(decision))
    }

    /// The decision inside a `PendingDecisionRequired`.
    #[must_use]
    pub fn decision(&self) -> Option<&PendingDecision> {
        match self {
            RulesError::PendingDecisionRequired(decision) => Some(decision),
            _ => None,
        }
    }
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::InvalidPhase { phase, command } => {
                write!(f, "{} is not allowed during {:?}", command, phase)
            }
            RulesError::NotYourTurn { seat, waiting_on: Some(other) } => {
                write!(f, "not {}'s turn: waiting on {}", seat, other)
            }
            RulesError::NotYourTurn { seat, waiting_on: None } => write!(f, "not {}'s turn", seat),
            RulesError::InsufficientResources { needed, available } => {
                write!(f, "insufficient resources: need {}, have {}", needed, available)
            }
            RulesError::UnpayableCost(msg) => write!(f, "cost cannot be paid: {}", msg),
            RulesError::InvalidTarget(msg) => write!(f, "invalid target: {}", msg),
            RulesError::InvalidChoice(msg) => write!(f, "invalid choice: {}", msg),
            RulesError::UnknownCard(card) => write!(f, "unknown card {}", card),
            RulesError::UnknownAbility { card, index } => {
                write!(f, "{} has no ability {}", card, index)
            }
            RulesError::PendingDecisionRequired(decision) => {
                write!(f, "{} must decide {:?}", decision.seat, decision.step)
            }
            RulesError::AlreadyFinalized(seat) => write!(f, "{} has already finalized", seat),
            RulesError::AlreadyPassed(seat) => write!(f, "{} has already passed", seat),
            RulesError::UnknownSeat(seat) => write!(f, "no such seat: {}", seat),
            RulesError::GameOver => f.write_str("the match is over"),
            RulesError::Poisoned => f.write_str("the shared match was left mid-command by a panic"),
        }
    }
}

impl std::error::Error for RulesError {}

/// Why a match could not be built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ConfigError {
    PlayerCount(usize),
    Invalid(String),
    /// Card JSON failed to parse.
    CardData(String),
    DuplicateCard(String),
    InvalidCard(String),
    NotEnoughCards { card_type: CardType, needed: usize, available: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PlayerCount(n) => write!(f, "unsupported seat count {} (2-4)", n),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
            ConfigError::CardData(msg) => write!(f, "card data: {}", msg),
            ConfigError::DuplicateCard(msg) => write!(f, "duplicate card: {}", msg),
            ConfigError::InvalidCard(msg) => write!(f, "invalid card: {}", msg),
            ConfigError::NotEnoughCards {
                card_type,
                needed,
                available,
            } => write!(f, "need {} {} cards, registry has {}", needed, card_type, available),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{DecisionRequest, DecisionStep};

    #[test]
    fn test_display() {
        let err = RulesError::NotYourTurn {
            seat: PlayerId::new(1),
            waiting_on: Some(PlayerId::new(0)),
        };
        assert_eq!(err.to_string(), "not Seat 1's turn: waiting on Seat 0");

        let err = ConfigError::PlayerCount(5);
        assert_eq!(err.to_string(), "unsupported seat count 5 (2-4)");
    }

    #[test]
    fn test_decision_accessor() {
        let decision = PendingDecision::new(
            PlayerId::new(0),
            DecisionStep::Cost(1),
            DecisionRequest::Card {
                options: vec![CardId::new(3)],
            },
        );
        let err = RulesError::pending(decision.clone());

        assert_eq!(err.decision(), Some(&decision));
        assert_eq!(RulesError::GameOver.decision(), None);
    }
}
