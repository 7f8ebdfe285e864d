//! Built-in base set.
//!
//! Full counts for a 2-4 seat match: 40 artifacts, 10 mages, 10 monuments,
//! 8 magic items, 8 scrolls and 6 double-sided places of power. Named
//! cards carry real abilities; the rest of the artifact supply is filled
//! with simple income charms.
//!
//! Ids are assigned in declaration order, so look cards up by name:
//!
//! ```
//! use arcana_rules::cards::{base_set, CardType};
//!
//! let registry = base_set();
//! let bow = registry.id_of("Elvish Bow").unwrap();
//! assert_eq!(registry.get(bow).unwrap().card_type, CardType::Artifact);
//! assert_eq!(registry.ids_of_type(CardType::Artifact).len(), 40);
//! ```

use crate::core::ResourceType::{Black, Blue, Gold, Green, Red};
use crate::core::{ResourceBag, ResourceFilter, ResourceType};

use super::ability::{
    Ability, Amount, Attack, AttackOutcome, CardFilter, Cost, Effect, Grant, ReactionTrigger,
    UntapTarget,
};
use super::definition::{Card, CardId, CardPredicate, CardType, Points, Price};
use super::income::IncomeSpec;
use super::registry::CardRegistry;

const ARTIFACT_COUNT: usize = 40;

fn bag(entries: &[(ResourceType, u32)]) -> ResourceBag {
    entries.iter().fold(ResourceBag::new(), |b, (r, n)| b.with(*r, *n))
}

fn price(entries: &[(ResourceType, u32)]) -> Price {
    Price::of(bag(entries))
}

fn gain(entries: &[(ResourceType, u32)]) -> Effect {
    Effect::Gain(Grant::Fixed(bag(entries)))
}

fn tap() -> Ability {
    Ability::new().with_cost(Cost::Tap)
}

/// Tap and pay.
fn tap_paying(entries: &[(ResourceType, u32)]) -> Ability {
    tap().with_cost(Cost::Pay(bag(entries)))
}

/// Gain `count` of one type allowed by `filter`.
fn gain_one_of(count: u32, filter: ResourceFilter) -> Effect {
    Effect::Gain(Grant::single_type(count, filter))
}

fn attack_unless(lose: &[(ResourceType, u32)], negate: &[(ResourceType, u32)]) -> Effect {
    Effect::Attack(Attack::lose(bag(lose)).negated_by(bag(negate)))
}

struct SetBuilder {
    registry: CardRegistry,
}

impl SetBuilder {
    fn add(&mut self, name: &str, card_type: CardType, build: impl FnOnce(Card) -> Card) -> CardId {
        let id = self.registry.next_id();
        self.registry.register(build(Card::new(id, name, card_type)));
        id
    }

    fn artifact(&mut self, name: &str, build: impl FnOnce(Card) -> Card) -> CardId {
        self.add(name, CardType::Artifact, build)
    }

    /// Two faces of one physical place of power.
    fn place_pair(
        &mut self,
        front: (&str, impl FnOnce(Card) -> Card),
        back: (&str, impl FnOnce(Card) -> Card),
    ) {
        let front_id = self.registry.next_id();
        let back_id = CardId::new(front_id.raw() + 1);
        self.add(front.0, CardType::PlaceOfPower, |c| (front.1)(c).paired_with(back_id));
        self.add(back.0, CardType::PlaceOfPower, |c| (back.1)(c).paired_with(front_id));
    }
}

/// The built-in card set.
#[must_use]
pub fn base_set() -> CardRegistry {
    let mut set = SetBuilder {
        registry: CardRegistry::new(),
    };

    artifacts(&mut set);
    mages(&mut set);
    magic_items(&mut set);
    monuments(&mut set);
    places_of_power(&mut set);

    for n in 1..=8 {
        set.add(&format!("Scroll {}", n), CardType::Scroll, |c| c);
    }

    set.registry
}

fn artifacts(set: &mut SetBuilder) {
    set.artifact("Dwarven Pickaxe", |c| {
        c.with_price(price(&[(Red, 1)]))
            .with_ability(tap_paying(&[(Red, 1)]).with_effect(gain(&[(Gold, 1)])))
    });
    set.artifact("Athanor", |c| {
        c.with_price(price(&[(Gold, 1), (Red, 1)]))
            .with_ability(
                tap()
                    .with_cost(Cost::Pay(bag(&[(Red, 1)])))
                    .with_effect(Effect::AddToCard(Grant::Fixed(bag(&[(Red, 2)])))),
            )
            .with_ability(
                tap()
                    .with_cost(Cost::RemoveFromCard(bag(&[(Red, 6)])))
                    .with_effect(Effect::Convert { limit: None, rate: 1 }),
            )
    });
    set.artifact("Elvish Bow", |c| {
        c.with_price(price(&[(Red, 1), (Green, 2)]))
            .with_ability(tap().with_effect(gain(&[(Green, 1)])))
            .with_ability(tap().with_effect(Effect::Attack(Attack::lose(bag(&[(Green, 1)])))))
    });
    set.artifact("Cursed Dwarven King", |c| {
        c.with_price(price(&[(Red, 2), (Black, 1)]))
            .with_points(Points::Fixed(1))
            .with_ability(tap().with_effect(gain(&[(Black, 1)])))
            .with_ability(
                tap()
                    .with_cost(Cost::TapCard {
                        filter: CardFilter::tag("dragon"),
                    })
                    .with_effect(gain(&[(Gold, 1)])),
            )
    });
    set.artifact("Fire Dragon", |c| {
        c.with_price(price(&[(Red, 6)]))
            .with_tag("dragon")
            .with_points(Points::Fixed(1))
            .with_ability(
                tap_paying(&[(Red, 2)]).with_effect(attack_unless(&[(Gold, 2)], &[(Black, 1)])),
            )
    });
    set.artifact("Bone Dragon", |c| {
        c.with_price(price(&[(Black, 4), (Green, 1)]))
            .with_tag("dragon")
            .with_points(Points::Fixed(1))
            .with_ability(tap_paying(&[(Black, 1)]).with_effect(Effect::Attack(Attack {
                outcome: AttackOutcome::DestroyArtifact,
                negate_cost: Some(bag(&[(Black, 1)])),
            })))
    });
    set.artifact("Water Dragon", |c| {
        c.with_price(price(&[(Blue, 6)]))
            .with_tag("dragon")
            .with_points(Points::Fixed(1))
            .with_ability(
                tap()
                    .with_cost(Cost::Pay(bag(&[(Blue, 1)])))
                    .with_effect(attack_unless(&[(Blue, 2)], &[(Blue, 1)])),
            )
    });
    set.artifact("Earth Dragon", |c| {
        c.with_price(price(&[(Green, 6)]))
            .with_tag("dragon")
            .with_points(Points::Fixed(1))
            .with_ability(
                tap()
                    .with_cost(Cost::Pay(bag(&[(Green, 1)])))
                    .with_effect(Effect::Attack(Attack::lose(bag(&[(Green, 2)])))),
            )
    });
    set.artifact("Dragon Egg", |c| {
        c.with_price(price(&[(Gold, 1)]))
            .with_points(Points::Fixed(1))
            .with_ability(Ability::new().with_cost(Cost::DestroySelf).with_effect(Effect::PlayCard {
                filter: CardFilter::tag("dragon"),
                discount: 4,
            }))
    });
    set.artifact("Dragon Bridle", |c| {
        c.with_price(price(&[(Gold, 1)])).with_cost_reduction("dragon", 3)
    });
    set.artifact("Fiery Whip", |c| {
        c.with_price(price(&[(Red, 2), (Black, 2)]))
            .with_ability(tap_paying(&[(Red, 1)]).with_effect(gain(&[(Red, 2)])))
            .with_ability(
                Ability::new()
                    .with_cost(Cost::DestroyArtifact {
                        filter: CardFilter::Any,
                    })
                    .with_effect(Effect::Gain(Grant::DestroyedCost))
                    .with_effect(gain_one_of(2, ResourceFilter::NonGold)),
            )
    });
    set.artifact("Magical Shard", |c| {
        c.with_ability(tap().with_effect(gain_one_of(1, ResourceFilter::NonGold)))
    });
    set.artifact("Prism", |c| {
        c.with_price(price(&[(Gold, 1)]))
            .with_ability(
                tap_paying(&[(Gold, 1)]).with_effect(gain_one_of(2, ResourceFilter::NonGold)),
            )
            .with_ability(
                tap()
                    .with_cost(Cost::PayVariable {
                        min: 1,
                        max: 10,
                        filter: ResourceFilter::NonGold,
                        single_type: true,
                    })
                    .with_effect(Effect::Gain(Grant::Choice {
                        count: Amount::PaidX,
                        filter: ResourceFilter::NonGold,
                        single_type: true,
                        different_from_paid: true,
                    })),
            )
    });
    set.artifact("Chalice of Life", |c| {
        c.with_price(price(&[(Blue, 1), (Green, 1)]))
            .with_points(Points::Fixed(1))
            .with_income(IncomeSpec::All(vec![
                IncomeSpec::Fixed(bag(&[(Blue, 1)])),
                IncomeSpec::Fixed(bag(&[(Green, 1)])),
            ]))
    });
    set.artifact("Chalice of Fire", |c| {
        c.with_price(price(&[(Red, 2)]))
            .with_ability(tap().with_effect(Effect::Convert {
                limit: Some(3),
                rate: 1,
            }))
    });
    set.artifact("Celestial Horse", |c| {
        c.with_price(price(&[(Blue, 2)]))
            .with_tag("creature")
            .with_income(IncomeSpec::Choice {
                count: 2,
                filter: ResourceFilter::only([Red, Blue, Green]),
                single_type: false,
            })
    });
    set.artifact("Guard Dog", |c| {
        c.with_price(price(&[(Red, 1)]))
            .with_tag("creature")
            .with_ability(Ability::reaction(ReactionTrigger::IncomingAttack).with_cost(Cost::Tap))
    });
    set.artifact("Dancing Sword", |c| {
        c.with_price(price(&[(Gold, 1), (Red, 1)]))
            .with_points(Points::Fixed(1))
            .with_ability(
                Ability::reaction(ReactionTrigger::IncomingAttack)
                    .with_cost(Cost::Pay(bag(&[(Red, 1)]))),
            )
    });
    set.artifact("Crypt", |c| {
        c.with_price(price(&[(Black, 2)])).with_ability(
            Ability::reaction(ReactionTrigger::ArtifactDestroyed { own_only: true })
                .with_cost(Cost::Tap)
                .with_effect(gain(&[(Black, 2)])),
        )
    });
    set.artifact("Jeweled Statuette", |c| {
        c.with_price(price(&[(Black, 2), (Gold, 1)]))
            .with_points(Points::Fixed(1))
            .with_ability(
                Ability::reaction(ReactionTrigger::ArtifactDestroyed { own_only: false })
                    .with_cost(Cost::Tap)
                    .with_effect(gain(&[(Gold, 1)])),
            )
    });
    set.artifact("Vault", |c| {
        c.with_price(price(&[(Gold, 1)]).with_wildcards(1))
            .with_income(IncomeSpec::Store(bag(&[(Gold, 1)])))
            .with_points(Points::PerStored {
                resource: Gold,
                per: 2,
            })
    });
    set.artifact("Treant", |c| {
        c.with_price(price(&[(Green, 3)]))
            .with_tag("creature")
            .with_income(IncomeSpec::All(vec![
                IncomeSpec::Store(bag(&[(Green, 1)])),
                IncomeSpec::Conditional {
                    predicate: CardPredicate::HasStored {
                        resource: Green,
                        count: 3,
                    },
                    then: Box::new(IncomeSpec::Fixed(bag(&[(Gold, 1)]))),
                },
            ]))
    });
    set.artifact("Hand of Glory", |c| {
        c.with_price(price(&[(Black, 2)]))
            .with_ability(tap_paying(&[(Black, 1)]).with_effect(Effect::Draw(2)))
    });
    set.artifact("Hawk", |c| {
        c.with_price(price(&[(Blue, 1)]))
            .with_tag("creature")
            .with_ability(tap().with_effect(gain(&[(Blue, 1)])).with_effect(Effect::ReorderDeck(3)))
    });
    set.artifact("Hypnotic Basin", |c| {
        c.with_price(price(&[(Blue, 2), (Black, 1)]))
            .with_ability(tap().with_effect(Effect::DrawThenDiscard { draw: 2, discard: 1 }))
    });
    set.artifact("Nightingale", |c| {
        c.with_price(price(&[(Blue, 1), (Green, 1)]))
            .with_tag("creature")
            .with_points(Points::Fixed(1))
    });
    set.artifact("Philosopher's Stone", |c| {
        c.with_price(price(&[(Red, 2), (Blue, 2), (Green, 2), (Black, 2)]))
            .with_points(Points::Fixed(1))
            .with_ability(
                tap()
                    .with_cost(Cost::Discard { count: 1 })
                    .with_effect(gain(&[(Gold, 2)])),
            )
    });
    set.artifact("Windup Man", |c| {
        c.with_price(price(&[(Red, 1), (Blue, 1)]))
            .with_ability(tap().with_effect(Effect::Untap(UntapTarget::Card(CardFilter::Type(
                CardType::Artifact,
            )))))
    });
    set.artifact("Horn of Plenty", |c| {
        c.with_price(price(&[(Gold, 2)]))
            .with_ability(tap().with_effect(Effect::Gain(Grant::PerOpponent(bag(&[(Green, 1)])))))
    });
    set.artifact("Mermaid", |c| {
        c.with_price(price(&[(Blue, 2), (Green, 1)]))
            .with_tag("creature")
            .with_ability(
                tap()
                    .with_effect(gain(&[(Blue, 2)]))
                    .with_effect(Effect::GiveOpponents(bag(&[(Blue, 1)]))),
            )
    });
    set.artifact("Elemental Spring", |c| {
        c.with_price(price(&[(Red, 2), (Blue, 1), (Green, 1)]))
            .with_income(IncomeSpec::Fixed(bag(&[(Red, 1), (Blue, 1), (Green, 1)])))
    });
    set.artifact("Corrupt Altar", |c| {
        c.with_price(price(&[(Green, 1), (Black, 2)]))
            .with_ability(tap_paying(&[(Black, 1)]).with_effect(Effect::Convert {
                limit: Some(4),
                rate: 2,
            }))
    });
    set.artifact("Sea Serpent", |c| {
        c.with_price(price(&[(Blue, 4)]))
            .with_tag("creature")
            .with_points(Points::Fixed(1))
            .with_income(IncomeSpec::Fixed(bag(&[(Blue, 2)])))
            .with_on_play(Effect::Draw(1))
    });
    set.artifact("Tree of Life", |c| {
        c.with_price(price(&[(Green, 2)]).with_wildcards(1))
            .with_income(IncomeSpec::Fixed(bag(&[(Green, 1)])))
            .with_ability(
                tap_paying(&[(Green, 1)]).with_effect(Effect::Untap(UntapTarget::SelfCard)),
            )
    });

    let mut n = 0;
    while set.registry.ids_of_type(CardType::Artifact).len() < ARTIFACT_COUNT {
        let resource = ResourceType::ELEMENTAL[n % ResourceType::ELEMENTAL.len()];
        n += 1;
        set.artifact(&format!("Charm of {} {}", resource, n), |c| {
            c.with_price(Price::free().with_wildcards(1))
                .with_income(IncomeSpec::Fixed(bag(&[(resource, 1)])))
        });
    }
}

fn mages(set: &mut SetBuilder) {
    let mut mage = |name: &str, build: fn(Card) -> Card| {
        set.add(name, CardType::Mage, build);
    };

    mage("Alchemist", |c| {
        c.with_ability(
            tap()
                .with_cost(Cost::PayVariable {
                    min: 2,
                    max: 2,
                    filter: ResourceFilter::NonGold,
                    single_type: false,
                })
                .with_effect(gain(&[(Gold, 1)])),
        )
    });
    mage("Beastmaster", |c| c.with_cost_reduction("creature", 1).with_cost_reduction("dragon", 1));
    mage("Diviner", |c| c.with_ability(tap().with_effect(Effect::ReorderDeck(3))));
    mage("Druid", |c| {
        c.with_ability(tap().with_effect(gain_one_of(1, ResourceFilter::only([Green, Blue]))))
    });
    mage("Duelist", |c| {
        c.with_ability(
            tap()
                .with_cost(Cost::Pay(bag(&[(Red, 1)])))
                .with_effect(attack_unless(&[(Gold, 1)], &[(Red, 1)])),
        )
    });
    mage("Healer", |c| {
        c.with_ability(
            Ability::reaction(ReactionTrigger::IncomingAttack)
                .with_cost(Cost::Tap)
                .with_effect(gain(&[(Green, 1)])),
        )
    });
    mage("Necromancer", |c| {
        c.with_ability(tap_paying(&[(Black, 1)]).with_effect(Effect::Untap(UntapTarget::Card(
            CardFilter::Type(CardType::Artifact),
        ))))
    });
    mage("Scholar", |c| c.with_ability(tap().with_effect(Effect::Draw(1))));
    mage("Seer", |c| {
        c.with_ability(tap().with_effect(Effect::Gain(Grant::PerOpponent(bag(&[(Blue, 1)])))))
    });
    mage("Transmuter", |c| {
        c.with_ability(
            tap()
                .with_cost(Cost::PayVariable {
                    min: 1,
                    max: 2,
                    filter: ResourceFilter::NonGold,
                    single_type: true,
                })
                .with_effect(Effect::Gain(Grant::Choice {
                    count: Amount::PaidX,
                    filter: ResourceFilter::NonGold,
                    single_type: true,
                    different_from_paid: true,
                })),
        )
    });
}

fn magic_items(set: &mut SetBuilder) {
    let mut item = |name: &str, build: fn(Card) -> Card| {
        set.add(name, CardType::MagicItem, build);
    };

    item("Alchemy", |c| {
        c.with_ability(
            tap()
                .with_cost(Cost::PayVariable {
                    min: 2,
                    max: 2,
                    filter: ResourceFilter::NonGold,
                    single_type: false,
                })
                .with_effect(gain(&[(Gold, 1)])),
        )
    });
    item("Calm | Elan", |c| {
        c.with_ability(tap().with_effect(gain_one_of(1, ResourceFilter::only([Blue, Red]))))
    });
    item("Death | Life", |c| {
        c.with_ability(tap().with_effect(gain_one_of(1, ResourceFilter::only([Black, Green]))))
    });
    item("Divination", |c| c.with_ability(tap().with_effect(Effect::ReorderDeck(3))));
    item("Protection", |c| {
        c.with_ability(Ability::reaction(ReactionTrigger::IncomingAttack).with_cost(Cost::Tap))
    });
    item("Reanimate", |c| c.with_ability(tap().with_effect(gain(&[(Black, 1)]))));
    item("Research", |c| c.with_ability(tap().with_effect(Effect::Draw(1))));
    item("Transmutation", |c| {
        c.with_ability(
            tap()
                .with_cost(Cost::PayVariable {
                    min: 1,
                    max: 3,
                    filter: ResourceFilter::NonGold,
                    single_type: true,
                })
                .with_effect(Effect::Gain(Grant::Choice {
                    count: Amount::PaidX,
                    filter: ResourceFilter::NonGold,
                    single_type: true,
                    different_from_paid: true,
                })),
        )
    });
}

fn monuments(set: &mut SetBuilder) {
    let mut monument = |name: &str, build: fn(Card) -> Card| {
        set.add(name, CardType::Monument, build);
    };

    monument("Colossus", |c| c.with_price(price(&[(Gold, 4)])).with_points(Points::Fixed(2)));
    monument("Golden Statue", |c| c.with_price(price(&[(Gold, 5)])).with_points(Points::Fixed(3)));
    monument("Great Pyramid", |c| c.with_price(price(&[(Gold, 5)])).with_points(Points::Fixed(3)));
    monument("Hanging Gardens", |c| {
        c.with_price(price(&[(Gold, 4)]))
            .with_points(Points::Fixed(1))
            .with_income(IncomeSpec::Choice {
                count: 3,
                filter: ResourceFilter::NonGold,
                single_type: false,
            })
    });
    monument("Library", |c| {
        c.with_price(price(&[(Gold, 4)]))
            .with_points(Points::Fixed(1))
            .with_ability(tap().with_effect(Effect::Draw(1)))
    });
    monument("Mausoleum", |c| c.with_price(price(&[(Gold, 4)])).with_points(Points::Fixed(2)));
    monument("Obelisk", |c| {
        c.with_price(price(&[(Gold, 4)]))
            .with_points(Points::Fixed(1))
            .with_income(IncomeSpec::Fixed(bag(&[(Gold, 1)])))
    });
    monument("Oracle", |c| {
        c.with_price(price(&[(Gold, 4)]))
            .with_points(Points::Fixed(2))
            .with_ability(tap().with_effect(Effect::ReorderDeck(3)))
    });
    monument("Solomon's Mine", |c| {
        c.with_price(price(&[(Gold, 4)]))
            .with_points(Points::Fixed(1))
            .with_ability(tap().with_effect(gain(&[(Gold, 1)])))
    });
    monument("Temple", |c| {
        c.with_price(price(&[(Gold, 4)]))
            .with_points(Points::Fixed(2))
            .with_income(IncomeSpec::Fixed(bag(&[(Green, 1)])))
    });
}

fn places_of_power(set: &mut SetBuilder) {
    set.place_pair(
        ("Catacombs of the Dead", |c: Card| {
            c.with_price(price(&[(Black, 5)]))
                .with_points(Points::PerStored {
                    resource: Black,
                    per: 1,
                })
                .with_ability(
                    tap()
                        .with_cost(Cost::Pay(bag(&[(Black, 1)])))
                        .with_effect(Effect::AddToCard(Grant::Fixed(bag(&[(Black, 1)])))),
                )
        }),
        ("Sacrificial Pit", |c: Card| {
            c.with_price(price(&[(Red, 3), (Black, 2)]))
                .with_points(Points::PerStored {
                    resource: Black,
                    per: 1,
                })
                .with_ability(
                    Ability::new()
                        .with_cost(Cost::DestroyArtifact {
                            filter: CardFilter::Any,
                        })
                        .with_effect(Effect::AddToCard(Grant::Fixed(bag(&[(Black, 2)])))),
                )
        }),
    );
    set.place_pair(
        ("Coral Castle", |c: Card| {
            c.with_price(price(&[(Blue, 3), (Green, 3)])).with_points(Points::Fixed(3))
        }),
        ("Sunken Reef", |c: Card| {
            c.with_price(price(&[(Blue, 4)]).with_wildcards(1))
                .with_income(IncomeSpec::Store(bag(&[(Blue, 1)])))
                .with_points(Points::PerStored {
                    resource: Blue,
                    per: 2,
                })
        }),
    );
    set.place_pair(
        ("Cursed Forge", |c: Card| {
            c.with_price(price(&[(Red, 5)]))
                .with_points(Points::PerStored {
                    resource: Gold,
                    per: 1,
                })
                .with_ability(
                    tap()
                        .with_cost(Cost::Pay(bag(&[(Red, 1)])))
                        .with_effect(Effect::AddToCard(Grant::Fixed(bag(&[(Gold, 1)])))),
                )
        }),
        ("Dwarven Mines", |c: Card| {
            c.with_price(price(&[(Red, 4), (Green, 2)]))
                .with_points(Points::Fixed(1))
                .with_income(IncomeSpec::Fixed(bag(&[(Gold, 1)])))
        }),
    );
    set.place_pair(
        ("Dragon's Lair", |c: Card| {
            c.with_price(price(&[(Red, 4), (Black, 2)]))
                .with_points(Points::Fixed(1))
                .with_ability(tap().with_effect(Effect::PlayCard {
                    filter: CardFilter::tag("dragon"),
                    discount: 3,
                }))
        }),
        ("Sorcerer's Bestiary", |c: Card| {
            c.with_price(price(&[(Green, 4), (Blue, 2)]))
                .with_points(Points::Fixed(1))
                .with_ability(tap().with_effect(gain_one_of(2, ResourceFilter::NonGold)))
        }),
    );
    set.place_pair(
        ("Alchemist's Tower", |c: Card| {
            c.with_price(price(&[(Gold, 3)]))
                .with_points(Points::PerStored {
                    resource: Gold,
                    per: 3,
                })
                .with_ability(
                    tap()
                        .with_cost(Cost::PayVariable {
                            min: 3,
                            max: 3,
                            filter: ResourceFilter::NonGold,
                            single_type: false,
                        })
                        .with_effect(Effect::AddToCard(Grant::Fixed(bag(&[(Gold, 1)])))),
                )
        }),
        ("Sacred Grove", |c: Card| {
            c.with_price(price(&[(Green, 5), (Blue, 1)]))
                .with_points(Points::Fixed(2))
                .with_income(IncomeSpec::Choice {
                    count: 2,
                    filter: ResourceFilter::only([Green, Blue]),
                    single_type: true,
                })
        }),
    );
    set.place_pair(
        ("Crystal Keep", |c: Card| {
            c.with_price(price(&[(Gold, 2), (Blue, 2)]))
                .with_income(IncomeSpec::Store(bag(&[(Gold, 1)])))
                .with_points(Points::Conditional {
                    predicate: CardPredicate::HasStored {
                        resource: Gold,
                        count: 3,
                    },
                    points: 4,
                })
        }),
        ("Temple of the Abyss", |c: Card| {
            c.with_price(price(&[(Black, 4)]).with_wildcards(1))
                .with_income(IncomeSpec::Store(bag(&[(Black, 1)])))
                .with_points(Points::PerStored {
                    resource: Black,
                    per: 1,
                })
        }),
    );
}
