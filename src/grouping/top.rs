//! Top-selection: the bounded set of groups marked most important.
//!
//! The cap is soft. `toggle_top` never grows the set past `max_top`, but
//! nothing re-checks it after other mutations, and an imported record may
//! carry more ids than the cap.

use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Group, SessionState, DEFAULT_MAX_TOP_GROUPS};

/// Toggle a group's top mark.
///
/// Already marked: unmarked, dropping every copy of the id (imported records
/// may repeat one). Not marked: marked only if fewer than `max_top` groups
/// are marked; at capacity the call is silently ignored.
#[must_use]
pub fn toggle_top(state: &SessionState, group_id: &str, max_top: usize) -> SessionState {
    let mut next = state.clone();

    if next.is_top(group_id) {
        next.top_group_ids.retain(|id| id != group_id);
        debug!(group = %group_id, "top mark removed");
    } else if next.top_group_ids.len() < max_top {
        next.top_group_ids.push_back(group_id.to_string());
        debug!(group = %group_id, count = next.top_group_ids.len(), "top mark added");
    } else {
        debug!(group = %group_id, max_top, "top selection full, toggle ignored");
    }
    next
}

/// Whether another group can still be marked.
#[must_use]
pub fn can_mark_more(state: &SessionState, max_top: usize) -> bool {
    state.top_group_ids.len() < max_top
}

/// Marked groups that still exist, in the order they were marked.
///
/// Ids of removed groups are skipped.
#[must_use]
pub fn top_groups(state: &SessionState) -> SmallVec<[&Group; DEFAULT_MAX_TOP_GROUPS]> {
    state
        .top_group_ids
        .iter()
        .filter_map(|id| state.group(id))
        .collect()
}
