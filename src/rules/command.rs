//! Commands: one variant per player intent.
//!
//! A transport decodes a `Command` from JSON and hands it to
//! `Match::submit`. Every command names the seat issuing it; the engine
//! decides whether that seat may act.
//!
//! ```
//! use arcana_rules::rules::Command;
//!
//! let json = r#"{"type":"income_finalize","seat":1}"#;
//! let command: Command = serde_json::from_str(json).unwrap();
//! assert_eq!(command.name(), "income_finalize");
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{PlayerId, ResourceBag};
use crate::effects::{AbilityChoices, AttackResponse, Choice, ReactionResponse};

/// Which monument to buy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonumentSource {
    /// One of the face-up monuments.
    FaceUp(CardId),
    /// The top of the face-down monument deck.
    DeckTop,
}

/// A player intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    DraftPick {
        seat: PlayerId,
        card: CardId,
    },
    SelectMage {
        seat: PlayerId,
        card: CardId,
    },
    SelectMagicItem {
        seat: PlayerId,
        card: CardId,
    },
    IncomeSetCollectionChoice {
        seat: PlayerId,
        card: CardId,
        take: bool,
    },
    IncomeSetChoice {
        seat: PlayerId,
        card: CardId,
        resources: ResourceBag,
    },
    IncomeWait {
        seat: PlayerId,
    },
    IncomeFinalize {
        seat: PlayerId,
    },
    PlayCard {
        seat: PlayerId,
        card: CardId,
        #[serde(default)]
        payment: Option<ResourceBag>,
        #[serde(default)]
        choices: AbilityChoices,
    },
    BuyPlaceOfPower {
        seat: PlayerId,
        card: CardId,
        #[serde(default)]
        payment: Option<ResourceBag>,
    },
    BuyMonument {
        seat: PlayerId,
        source: MonumentSource,
        #[serde(default)]
        payment: Option<ResourceBag>,
    },
    DiscardForResources {
        seat: PlayerId,
        card: CardId,
        reward: ResourceBag,
    },
    UseAbility {
        seat: PlayerId,
        card: CardId,
        ability: usize,
        #[serde(default)]
        choices: AbilityChoices,
    },
    Pass {
        seat: PlayerId,
        magic_item: CardId,
    },
    RespondToAttack {
        seat: PlayerId,
        response: AttackResponse,
    },
    RespondToReaction {
        seat: PlayerId,
        response: ReactionResponse,
    },
    RespondToDecision {
        seat: PlayerId,
        choice: Choice,
    },
    StartNewMatch {
        seat: PlayerId,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Command {
    /// The seat issuing the command.
    #[must_use]
    pub fn seat(&self) -> PlayerId {
        match self {
            Command::DraftPick { seat, .. }
            | Command::SelectMage { seat, .. }
            | Command::SelectMagicItem { seat, .. }
            | Command::IncomeSetCollectionChoice { seat, .. }
            | Command::IncomeSetChoice { seat, .. }
            | Command::IncomeWait { seat }
            | Command::IncomeFinalize { seat }
            | Command::PlayCard { seat, .. }
            | Command::BuyPlaceOfPower { seat, .. }
            | Command::BuyMonument { seat, .. }
            | Command::DiscardForResources { seat, .. }
            | Command::UseAbility { seat, .. }
            | Command::Pass { seat, .. }
            | Command::RespondToAttack { seat, .. }
            | Command::RespondToReaction { seat, .. }
            | Command::RespondToDecision { seat, .. }
            | Command::StartNewMatch { seat, .. } => *seat,
        }
    }

    /// Wire name, as used in logs and `InvalidPhase` errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::DraftPick { .. } => "draft_pick",
            Command::SelectMage { .. } => "select_mage",
            Command::SelectMagicItem { .. } => "select_magic_item",
            Command::IncomeSetCollectionChoice { .. } => "income_set_collection_choice",
            Command::IncomeSetChoice { .. } => "income_set_choice",
            Command::IncomeWait { .. } => "income_wait",
            Command::IncomeFinalize { .. } => "income_finalize",
            Command::PlayCard { .. } => "play_card",
            Command::BuyPlaceOfPower { .. } => "buy_place_of_power",
            Command::BuyMonument { .. } => "buy_monument",
            Command::DiscardForResources { .. } => "discard_for_resources",
            Command::UseAbility { .. } => "use_ability",
            Command::Pass { .. } => "pass",
            Command::RespondToAttack { .. } => "respond_to_attack",
            Command::RespondToReaction { .. } => "respond_to_reaction",
            Command::RespondToDecision { .. } => "respond_to_decision",
            Command::StartNewMatch { .. } => "start_new_match",
        }
    }
}
