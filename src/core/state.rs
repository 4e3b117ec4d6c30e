//! Session state: the single record the engine reads, transforms and persists.
//!
//! ## SessionState
//!
//! - Decision lists (selected / discarded card ids)
//! - Custom cards added by the user
//! - Groups and their card assignments
//! - Top-selected group ids
//! - Bookkeeping: schema version and timestamps
//!
//! Uses `im` persistent vectors so the engine can keep the previous state
//! next to the current one with O(1) clones. Transforms take `&SessionState`
//! and return a new state; callers never see a partial patch.

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::ValueCard;

/// Field layout version written to every persisted or exported record.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A user-named bucket of selected card ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Unique group id.
    pub id: String,

    /// Display name. Stored verbatim, may be empty.
    pub name: String,

    /// Card ids in insertion order.
    #[serde(default)]
    pub card_ids: Vector<String>,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            card_ids: Vector::new(),
        }
    }

    /// Check if the group holds a card.
    #[must_use]
    pub fn contains(&self, card_id: &str) -> bool {
        self.card_ids.iter().any(|id| id == card_id)
    }

    /// Number of cards in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    /// Check if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }
}

/// Complete session state.
///
/// ## Invariants
///
/// - `selected_card_ids` and `discarded_card_ids` are disjoint, no duplicates.
/// - Every id in a group's `card_ids` is also in `selected_card_ids`.
/// - A card id is in at most one group.
/// - `top_group_ids` has no duplicates. Its size cap is enforced only by
///   `toggle_top`; ids of removed groups are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Layout version (see `CURRENT_SCHEMA_VERSION`).
    pub schema_version: u32,

    /// When this session was first created.
    pub created_at: DateTime<Utc>,

    /// Rewritten on every mutation and save.
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub selected_card_ids: Vector<String>,

    #[serde(default)]
    pub discarded_card_ids: Vector<String>,

    /// User-created cards, in the order they were added.
    #[serde(default)]
    pub custom_cards: Vector<ValueCard>,

    #[serde(default)]
    pub groups: Vector<Group>,

    #[serde(default)]
    pub top_group_ids: Vector<String>,
}

impl SessionState {
    /// Create a fresh state stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::created_at(Utc::now())
    }

    /// Create a fresh state with explicit timestamps.
    #[must_use]
    pub fn created_at(now: DateTime<Utc>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at: now,
            updated_at: now,
            selected_card_ids: Vector::new(),
            discarded_card_ids: Vector::new(),
            custom_cards: Vector::new(),
            groups: Vector::new(),
            top_group_ids: Vector::new(),
        }
    }

    /// Stamp `updated_at` with the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // === Decisions ===

    /// Check if a card was selected.
    #[must_use]
    pub fn is_selected(&self, card_id: &str) -> bool {
        self.selected_card_ids.iter().any(|id| id == card_id)
    }

    /// Check if a card was discarded.
    #[must_use]
    pub fn is_discarded(&self, card_id: &str) -> bool {
        self.discarded_card_ids.iter().any(|id| id == card_id)
    }

    /// Check if a card was decided either way.
    #[must_use]
    pub fn is_decided(&self, card_id: &str) -> bool {
        self.is_selected(card_id) || self.is_discarded(card_id)
    }

    // === Groups ===

    /// Get a group by id.
    #[must_use]
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Check if a group is marked as top.
    #[must_use]
    pub fn is_top(&self, group_id: &str) -> bool {
        self.top_group_ids.iter().any(|id| id == group_id)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
