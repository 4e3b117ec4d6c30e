//! Group store: creating, naming and removing groups, and moving cards.
//!
//! Exclusive membership is maintained by `move_card` alone: it strips the
//! card from every group before appending it to the target. Unassigned cards
//! are never stored; they are `selected_card_ids` minus the union of all
//! groups' `card_ids`.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::{Group, SessionState};

/// Prefix of generated placeholder names.
pub const PLACEHOLDER_PREFIX: &str = "Group";

/// Placeholder name for the group that would be added next.
#[must_use]
pub fn placeholder_name(group_count: usize) -> String {
    format!("{PLACEHOLDER_PREFIX} {}", group_count + 1)
}

/// Check if a name is still a placeholder the user has not replaced.
///
/// Empty (or whitespace-only) names and `Group <digits>` count.
///
/// ```
/// use values_sort::grouping::is_placeholder_name;
///
/// assert!(is_placeholder_name("Group 3"));
/// assert!(is_placeholder_name("  "));
/// assert!(!is_placeholder_name("Family"));
/// assert!(!is_placeholder_name("Group three"));
/// ```
#[must_use]
pub fn is_placeholder_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return true;
    }
    trimmed
        .strip_prefix(PLACEHOLDER_PREFIX)
        .and_then(|rest| rest.strip_prefix(' '))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Move a card into `target`, or back to the unassigned pool with `None`.
///
/// The card is first removed from whichever group holds it. Moving into the
/// group it is already in re-appends it at the end. Cards that were never
/// selected cannot be assigned; an unknown target leaves the card unassigned.
#[must_use]
pub fn move_card(state: &SessionState, card_id: &str, target: Option<&str>) -> SessionState {
    let mut next = state.clone();

    for group in next.groups.iter_mut() {
        if group.contains(card_id) {
            group.card_ids.retain(|id| id != card_id);
        }
    }

    let Some(target) = target else {
        debug!(card = %card_id, "card returned to unassigned pool");
        return next;
    };

    if !next.is_selected(card_id) {
        debug!(card = %card_id, group = %target, "card not selected, cannot be grouped");
        return next;
    }

    match next.groups.iter_mut().find(|g| g.id == target) {
        Some(group) => {
            group.card_ids.push_back(card_id.to_string());
            debug!(card = %card_id, group = %target, "card moved");
        }
        None => debug!(card = %card_id, group = %target, "unknown target group, card left unassigned"),
    }
    next
}

/// Append an empty group with the given id and a placeholder name.
#[must_use]
pub fn add_group(state: &SessionState, group_id: impl Into<String>) -> SessionState {
    let mut next = state.clone();
    let group = Group::new(group_id, placeholder_name(state.groups.len()));
    debug!(group = %group.id, name = %group.name, "adding group");
    next.groups.push_back(group);
    next
}

/// Replace a group's name verbatim (empty names allowed).
#[must_use]
pub fn rename_group(state: &SessionState, group_id: &str, name: &str) -> SessionState {
    let mut next = state.clone();
    if let Some(group) = next.groups.iter_mut().find(|g| g.id == group_id) {
        group.name = name.to_string();
    }
    next
}

/// Remove a group. Its cards become unassigned.
///
/// `top_group_ids` is left untouched, so a removed top group keeps its slot.
#[must_use]
pub fn remove_group(state: &SessionState, group_id: &str) -> SessionState {
    let mut next = state.clone();
    next.groups.retain(|g| g.id != group_id);
    debug!(group = %group_id, remaining = next.groups.len(), "group removed");
    next
}

/// The group currently holding a card.
#[must_use]
pub fn group_of<'a>(state: &'a SessionState, card_id: &str) -> Option<&'a Group> {
    state.groups.iter().find(|g| g.contains(card_id))
}

/// Selected card ids that are in no group, in selection order.
#[must_use]
pub fn unassigned_card_ids(state: &SessionState) -> Vec<String> {
    let assigned: FxHashSet<&str> = state
        .groups
        .iter()
        .flat_map(|g| g.card_ids.iter())
        .map(String::as_str)
        .collect();

    state
        .selected_card_ids
        .iter()
        .filter(|id| !assigned.contains(id.as_str()))
        .cloned()
        .collect()
}
