//! The Income phase.
//!
//! Seats negotiate income independently: take or leave resources stored on
//! their cards, answer income choices, then finalize. A seat other than the
//! first player may `wait`, after which its finalize is held back until
//! every earlier seat in turn order has finalized.
//!
//! Income is evaluated on the pre-collection state of each card, collected
//! resources move next, then income is applied. Everything happens at the
//! finalizing seat's own `finalize`.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::cards::{CardId, CardRegistry, IncomeYield};
use crate::core::{
    distributions, ActionState, IncomeState, InstanceId, MatchState, Phase, PhaseState, Player,
    PlayerId, ResourceBag, RulesError,
};
use crate::effects::{select, DecisionRequest, DecisionStep, PendingDecision};

/// Start the next round's Income phase.
pub(crate) fn begin_round(state: &mut MatchState) {
    state.round += 1;
    state.phase = Phase::Income;
    state.sub = PhaseState::Income(IncomeState::new(state.player_count()));
    info!("round {}: income", state.round);
}

fn income_state<'a>(
    state: &'a mut MatchState,
    seat: PlayerId,
    command: &'static str,
) -> Result<&'a mut IncomeState, RulesError> {
    let phase = state.phase;
    let income = state.income_mut().ok_or(RulesError::phase(phase, command))?;
    if income.finalized[seat] {
        return Err(RulesError::AlreadyFinalized(seat));
    }
    Ok(income)
}

/// What every controlled card of `player` yields this round.
#[must_use]
pub fn income_yields(
    player: &Player,
    registry: &CardRegistry,
) -> Vec<(InstanceId, CardId, IncomeYield)> {
    player
        .controlled()
        .filter_map(|c| {
            let def = registry.get(c.card)?;
            Some((c.instance, c.card, def.income.evaluate(c)))
        })
        .collect()
}

/// Cards of `player` whose income needs an answer before finalizing.
#[must_use]
pub fn required_choices(player: &Player, registry: &CardRegistry) -> Vec<CardId> {
    income_yields(player, registry)
        .into_iter()
        .filter(|(_, _, y)| !y.choices.is_empty())
        .map(|(_, card, _)| card)
        .collect()
}

/// Take or leave the resources stored on `card`.
pub(crate) fn set_collection_choice(
    state: &mut MatchState,
    seat: PlayerId,
    card: CardId,
    take: bool,
) -> Result<(), RulesError> {
    income_state(state, seat, "income_set_collection_choice")?;
    let stored = state
        .player(seat)?
        .find_controlled(card)
        .ok_or(RulesError::UnknownCard(card))?
        .resources;
    let income = income_state(state, seat, "income_set_collection_choice")?;
    if stored.is_empty() {
        return Err(RulesError::InvalidTarget(format!("nothing is stored on {}", card)));
    }

    let collect = &mut income.collect[seat];
    collect.retain(|c| *c != card);
    if take {
        collect.push(card);
    }
    debug!("{} will {} {} from {}", seat, if take { "take" } else { "leave" }, stored, card);
    Ok(())
}

/// Answer the income choice on `card`.
pub(crate) fn set_choice(
    state: &mut MatchState,
    registry: &CardRegistry,
    seat: PlayerId,
    card: CardId,
    resources: ResourceBag,
) -> Result<(), RulesError> {
    income_state(state, seat, "income_set_choice")?;
    let controlled = state
        .player(seat)?
        .find_controlled(card)
        .ok_or(RulesError::UnknownCard(card))?;
    let spec = registry
        .lookup(card)?
        .income
        .evaluate(controlled)
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| {
            RulesError::InvalidTarget(format!("{} has no income choice", registry.name_of(card)))
        })?;
    if !spec.accepts(&resources) {
        return Err(RulesError::InvalidChoice(format!(
            "{} is not a legal income choice for {}",
            resources,
            registry.name_of(card)
        )));
    }

    income_state(state, seat, "income_set_choice")?.choices[seat].insert(card, resources);
    debug!("{} chose {} from {}", seat, resources, card);
    Ok(())
}

/// Hold this seat's finalize until earlier seats have finalized.
pub(crate) fn wait(state: &mut MatchState, seat: PlayerId) -> Result<(), RulesError> {
    let phase = state.phase;
    if state.income().is_some() && seat == state.first_player() {
        return Err(RulesError::phase(phase, "income_wait"));
    }
    income_state(state, seat, "income_wait")?.waiting[seat] = true;
    debug!("{} waits on earlier seats", seat);
    Ok(())
}

/// Collect and apply this seat's income.
pub(crate) fn finalize(
    state: &mut MatchState,
    registry: &CardRegistry,
    seat: PlayerId,
) -> Result<(), RulesError> {
    let order = state.turn_order();
    let income = income_state(state, seat, "income_finalize")?;

    if income.waiting[seat] {
        let earlier = order.iter().take_while(|s| **s != seat).find(|s| !income.finalized[**s]);
        if let Some(earlier) = earlier {
            return Err(RulesError::NotYourTurn {
                seat,
                waiting_on: Some(*earlier),
            });
        }
    }
    let collect = income.collect[seat].clone();
    let chosen: BTreeMap<CardId, ResourceBag> = income.choices[seat].clone();

    let player = state.player_mut(seat)?;
    let yields = income_yields(player, registry);

    let mut answers = Vec::new();
    for (instance, card, yielded) in &yields {
        let Some(spec) = yielded.choices.first() else {
            continue;
        };
        let options = distributions(spec.count, &spec.filter.types(), None)
            .into_iter()
            .filter(|bag| spec.accepts(bag))
            .collect();
        let bag = select(
            chosen.get(card).copied(),
            options,
            || RulesError::InvalidTarget(format!("{} has no legal income choice", card)),
            |options| {
                RulesError::pending(PendingDecision::new(
                    seat,
                    DecisionStep::Income(*card),
                    DecisionRequest::Resources { options },
                ))
            },
        )?;
        answers.push((*instance, bag));
    }

    let mut collected = ResourceBag::new();
    for card in &collect {
        if let Some(controlled) = player.find_controlled_mut(*card) {
            collected += controlled.resources.take_all();
        }
    }
    player.resources += collected;

    let mut gained = ResourceBag::new();
    for (instance, _, yielded) in &yields {
        gained += yielded.to_pool;
        if !yielded.to_card.is_empty() {
            if let Some(controlled) = player.find_instance_mut(*instance) {
                controlled.resources += yielded.to_card;
            }
        }
    }
    for (_, bag) in &answers {
        gained += *bag;
    }
    player.resources += gained;
    debug!("{} finalized income: collected {}, gained {}", seat, collected, gained);

    let Some(income) = state.income_mut() else {
        return Ok(());
    };
    income.finalized[seat] = true;
    if income.finalized.values().all(|done| *done) {
        let first = state.first_player();
        state.phase = Phase::Action;
        state.sub = PhaseState::Action(ActionState::new(state.player_count(), first));
        info!("round {}: actions, {} starts", state.round, first);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::base_set;
    use crate::core::ResourceType::{Black, Blue, Gold, Green, Red};

    struct Fixture {
        registry: CardRegistry,
        state: MatchState,
    }

    impl Fixture {
        fn new() -> Self {
            let mut state = MatchState::new(2);
            state.players[PlayerId::new(0)].has_first_player_token = true;
            begin_round(&mut state);
            Self {
                registry: base_set(),
                state,
            }
        }

        fn give(&mut self, seat: u8, name: &str, stored: ResourceBag) -> CardId {
            let id = self.registry.id_of(name).unwrap();
            let card = self.state.enter_play(id).holding(stored);
            self.state.players[PlayerId::new(seat)].artifacts.push_back(card);
            id
        }
    }

    #[test]
    fn test_begin_round() {
        let fx = Fixture::new();
        assert_eq!(fx.state.round, 1);
        assert_eq!(fx.state.phase, Phase::Income);
    }

    #[test]
    fn test_collection_then_income() {
        let mut fx = Fixture::new();
        let seat = PlayerId::new(1);
        let vault = fx.give(1, "Vault", ResourceBag::of(Gold, 2));

        set_collection_choice(&mut fx.state, seat, vault, true).unwrap();
        finalize(&mut fx.state, &fx.registry, seat).unwrap();

        let player = &fx.state.players[seat];
        assert_eq!(player.resources, ResourceBag::of(Gold, 2));
        // The round's income is stored after collection.
        assert_eq!(player.find_controlled(vault).unwrap().resources, ResourceBag::of(Gold, 1));
        assert!(fx.state.income().unwrap().finalized[seat]);
    }

    #[test]
    fn test_leave_is_the_default() {
        let mut fx = Fixture::new();
        let seat = PlayerId::new(1);
        let vault = fx.give(1, "Vault", ResourceBag::of(Gold, 2));

        set_collection_choice(&mut fx.state, seat, vault, true).unwrap();
        set_collection_choice(&mut fx.state, seat, vault, false).unwrap();
        finalize(&mut fx.state, &fx.registry, seat).unwrap();

        assert!(fx.state.players[seat].resources.is_empty());
        assert_eq!(
            fx.state.players[seat].find_controlled(vault).unwrap().resources,
            ResourceBag::of(Gold, 3)
        );
    }

    #[test]
    fn test_conditional_sees_pre_collection_state() {
        let mut fx = Fixture::new();
        let seat = PlayerId::new(0);
        let treant = fx.give(0, "Treant", ResourceBag::of(Green, 3));

        set_collection_choice(&mut fx.state, seat, treant, true).unwrap();
        finalize(&mut fx.state, &fx.registry, seat).unwrap();

        let player = &fx.state.players[seat];
        assert_eq!(player.resources, ResourceBag::new().with(Green, 3).with(Gold, 1));
        assert_eq!(player.find_controlled(treant).unwrap().resources, ResourceBag::of(Green, 1));
    }

    #[test]
    fn test_choice_required_before_finalize() {
        let mut fx = Fixture::new();
        let seat = PlayerId::new(0);
        let horse = fx.give(0, "Celestial Horse", ResourceBag::new());
        assert_eq!(required_choices(&fx.state.players[seat], &fx.registry), vec![horse]);

        let err = finalize(&mut fx.state.clone(), &fx.registry, seat).unwrap_err();
        let decision = err.decision().unwrap();
        assert_eq!(decision.step, DecisionStep::Income(horse));
        // 2 from three types: 6 multisets.
        assert_eq!(decision.request, DecisionRequest::Resources {
            options: distributions(2, &[Red, Blue, Green], None),
        });

        let bad = set_choice(&mut fx.state, &fx.registry, seat, horse, ResourceBag::of(Black, 2));
        assert!(matches!(bad, Err(RulesError::InvalidChoice(_))));

        let mixed = ResourceBag::new().with(Red, 1).with(Blue, 1);
        set_choice(&mut fx.state, &fx.registry, seat, horse, mixed).unwrap();
        finalize(&mut fx.state, &fx.registry, seat).unwrap();
        assert_eq!(fx.state.players[seat].resources, mixed);
    }

    #[test]
    fn test_waiting_seat_holds_for_earlier_seats() {
        let mut fx = Fixture::new();
        let second = PlayerId::new(1);

        assert!(matches!(
            wait(&mut fx.state, PlayerId::new(0)),
            Err(RulesError::InvalidPhase { .. })
        ));
        wait(&mut fx.state, second).unwrap();
        assert_eq!(
            finalize(&mut fx.state, &fx.registry, second),
            Err(RulesError::NotYourTurn {
                seat: second,
                waiting_on: Some(PlayerId::new(0))
            })
        );

        finalize(&mut fx.state, &fx.registry, PlayerId::new(0)).unwrap();
        finalize(&mut fx.state, &fx.registry, second).unwrap();
        assert_eq!(fx.state.phase, Phase::Action);
        assert_eq!(fx.state.action().unwrap().active, PlayerId::new(0));
    }

    #[test]
    fn test_double_finalize_rejected() {
        let mut fx = Fixture::new();
        let seat = PlayerId::new(1);
        finalize(&mut fx.state, &fx.registry, seat).unwrap();
        assert_eq!(
            finalize(&mut fx.state, &fx.registry, seat),
            Err(RulesError::AlreadyFinalized(seat))
        );
        assert_eq!(wait(&mut fx.state, seat), Err(RulesError::AlreadyFinalized(seat)));
    }
}
