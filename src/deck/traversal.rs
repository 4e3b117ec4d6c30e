//! Deck traversal: which card is current and how many remain.
//!
//! A card is *decided* once its id is in either `selected_card_ids` or
//! `discarded_card_ids`. Traversal walks the merged deck in order and stops
//! at the first undecided card. Decided ids are never removed, so a decided
//! card is never current again.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::cards::{Catalog, ValueCard};
use crate::core::SessionState;

/// Outcome of a keep/skip decision on the current card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Keep the card (appends to `selected_card_ids`).
    Select,
    /// Skip the card (appends to `discarded_card_ids`).
    Discard,
}

fn decided_ids(state: &SessionState) -> FxHashSet<&str> {
    state
        .selected_card_ids
        .iter()
        .chain(state.discarded_card_ids.iter())
        .map(String::as_str)
        .collect()
}

/// First card in deck order that is neither selected nor discarded.
#[must_use]
pub fn current_card(catalog: &Catalog, state: &SessionState) -> Option<ValueCard> {
    let decided = decided_ids(state);
    catalog
        .list_cards(state)
        .into_iter()
        .find(|card| !decided.contains(card.id.as_str()))
}

/// Number of deck cards not yet decided.
#[must_use]
pub fn remaining_count(catalog: &Catalog, state: &SessionState) -> usize {
    let decided = decided_ids(state);
    catalog
        .list_cards(state)
        .iter()
        .filter(|card| !decided.contains(card.id.as_str()))
        .count()
}

/// Record a decision on the current card.
///
/// Returns the state unchanged if every card has been decided.
#[must_use]
pub fn decide_current(catalog: &Catalog, state: &SessionState, decision: Decision) -> SessionState {
    let mut next = state.clone();
    let Some(card) = current_card(catalog, state) else {
        debug!(?decision, "no current card, decision ignored");
        return next;
    };

    debug!(card = %card.id, ?decision, "deciding current card");
    match decision {
        Decision::Select => next.selected_card_ids.push_back(card.id),
        Decision::Discard => next.discarded_card_ids.push_back(card.id),
    }
    next
}

/// Keep the current card.
#[must_use]
pub fn select_current(catalog: &Catalog, state: &SessionState) -> SessionState {
    decide_current(catalog, state, Decision::Select)
}

/// Skip the current card.
#[must_use]
pub fn discard_current(catalog: &Catalog, state: &SessionState) -> SessionState {
    decide_current(catalog, state, Decision::Discard)
}

/// Append a custom card and auto-select it.
///
/// Custom cards bypass the undecided state. If the id is already selected
/// (re-adding the same card) the selection list is left as is; if it was
/// skipped, the skip is withdrawn so the decided lists stay disjoint.
#[must_use]
pub fn add_custom_card(state: &SessionState, card: ValueCard) -> SessionState {
    let mut next = state.clone();
    debug!(card = %card.id, label = %card.label, "adding custom card");
    if next.is_discarded(&card.id) {
        next.discarded_card_ids.retain(|id| *id != card.id);
    }
    if !next.is_selected(&card.id) {
        next.selected_card_ids.push_back(card.id.clone());
    }
    next.custom_cards.push_back(card);
    next
}
