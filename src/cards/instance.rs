//! Cards in play.
//!
//! `ControlledCard` is the runtime state of a card on a seat's table: its
//! instance id, whether it is tapped, and the resources stored on it. The
//! definition is looked up through the registry by `card`.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::{InstanceId, ResourceBag};

/// A card a seat controls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlledCard {
    pub instance: InstanceId,
    pub card: CardId,
    pub tapped: bool,
    /// Resources stored on the card. Removed from play with the card.
    pub resources: ResourceBag,
}

impl ControlledCard {
    /// An untapped card with nothing stored on it.
    #[must_use]
    pub fn new(instance: InstanceId, card: CardId) -> Self {
        Self {
            instance,
            card,
            tapped: false,
            resources: ResourceBag::new(),
        }
    }

    /// Set stored resources (builder pattern).
    #[must_use]
    pub fn holding(mut self, resources: ResourceBag) -> Self {
        self.resources = resources;
        self
    }

    /// Set tapped (builder pattern).
    #[must_use]
    pub fn tapped(mut self) -> Self {
        self.tapped = true;
        self
    }
}
