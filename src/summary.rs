//! Result summary and step gating.
//!
//! The exercise runs in four steps. Each step may only be left once the
//! user has produced something the next step can work with.

use serde::{Deserialize, Serialize};

use crate::cards::Catalog;
use crate::core::{Group, SessionState};
use crate::grouping::top_groups;

/// Title line of the text summary.
pub const SUMMARY_TITLE: &str = "Values Card Sort - Results";

const RULE: &str = "-----------";

/// The four steps of the exercise, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Select,
    Group,
    Prioritize,
    Result,
}

impl Step {
    /// 1-based position shown in the step indicator.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Step::Select => 1,
            Step::Group => 2,
            Step::Prioritize => 3,
            Step::Result => 4,
        }
    }

    /// Step after this one, `None` at the end.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Select => Some(Step::Group),
            Step::Group => Some(Step::Prioritize),
            Step::Prioritize => Some(Step::Result),
            Step::Result => None,
        }
    }
}

/// Whether the user may move past `step`.
///
/// - Select: at least one card kept.
/// - Group: at least one group holds a card.
/// - Prioritize: at least one group marked top.
#[must_use]
pub fn can_continue(step: Step, state: &SessionState) -> bool {
    match step {
        Step::Select => !state.selected_card_ids.is_empty(),
        Step::Group => state.groups.iter().any(|g| !g.is_empty()),
        Step::Prioritize => !state.top_group_ids.is_empty(),
        Step::Result => true,
    }
}

/// Hint that many single-card groups might be merged.
///
/// Shown once there are three or more groups and at least two of them hold
/// exactly one card.
#[must_use]
pub fn suggests_bigger_groups(state: &SessionState) -> bool {
    state.groups.len() >= 3 && state.groups.iter().filter(|g| g.len() == 1).count() >= 2
}

fn group_line(catalog: &Catalog, state: &SessionState, group: &Group) -> String {
    let labels: Vec<String> = catalog
        .resolve_cards(state, &group.card_ids)
        .into_iter()
        .map(|c| c.label)
        .collect();
    format!("{}: {}", group.name, labels.join(", "))
}

/// Plain-text summary for copying.
///
/// ```
/// use values_sort::cards::{Catalog, CatalogEntry};
/// use values_sort::core::{Group, SessionState};
/// use values_sort::summary::format_as_text;
///
/// let catalog = Catalog::from_entries(vec![CatalogEntry::new("c1", "Honesty")]).unwrap();
/// let mut state = SessionState::new();
/// state.selected_card_ids.push_back("c1".into());
/// let mut group = Group::new("g1", "Integrity");
/// group.card_ids.push_back("c1".into());
/// state.groups.push_back(group);
/// state.top_group_ids.push_back("g1".into());
///
/// let text = format_as_text(&catalog, &state);
/// assert!(text.contains("Integrity: Honesty"));
/// ```
#[must_use]
pub fn format_as_text(catalog: &Catalog, state: &SessionState) -> String {
    let mut lines = vec![SUMMARY_TITLE.to_string(), String::new()];

    lines.push("Top groups".to_string());
    lines.push(RULE.to_string());
    for group in top_groups(state) {
        lines.push(group_line(catalog, state, group));
    }
    lines.push(String::new());

    lines.push("All groups".to_string());
    lines.push(RULE.to_string());
    for group in &state.groups {
        lines.push(group_line(catalog, state, group));
    }

    lines.join("\n")
}
