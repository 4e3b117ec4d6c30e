//! Card catalog and deck resolution.
//!
//! The `Catalog` stores the static value list shipped with the app and
//! merges it with the custom cards held in a `SessionState`:
//!
//! - Catalog cards come first, in catalog order.
//! - Custom cards follow in the order they were added.
//! - A custom card whose id is already a catalog id is suppressed.

use std::sync::OnceLock;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::ValueCard;
use crate::core::SessionState;

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/values-catalog.json");

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog id '{0}' appears more than once")]
    DuplicateId(String),
}

/// One record of the catalog data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl CatalogEntry {
    /// Create an untagged entry.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tag: None,
        }
    }

    /// Set the tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn to_card(&self) -> ValueCard {
        ValueCard {
            id: self.id.clone(),
            label: self.label.clone(),
            source: super::CardSource::Catalog,
            tag: self.tag.clone(),
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    values: Vec<CatalogEntry>,
}

/// Immutable catalog of value cards.
///
/// ## Example
///
/// ```
/// use values_sort::cards::{Catalog, CatalogEntry, ValueCard};
/// use values_sort::core::SessionState;
///
/// let catalog = Catalog::from_entries(vec![
///     CatalogEntry::new("c1", "Honesty"),
///     CatalogEntry::new("c2", "Courage"),
/// ])
/// .unwrap();
///
/// let mut state = SessionState::new();
/// state.custom_cards.push_back(ValueCard::custom("x", "Curiosity"));
///
/// let deck = catalog.list_cards(&state);
/// assert_eq!(deck.len(), 3);
/// assert_eq!(catalog.find_card(&state, "x").unwrap().label, "Curiosity");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from entries, rejecting duplicate ids.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Parse a `{"values": [{id, label, tag?}, ...]}` document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_entries(file.values)
    }

    /// The bundled values catalog, parsed once per process.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::from_json(BUILTIN_CATALOG_JSON).expect("bundled catalog must be valid")
        })
    }

    /// Number of catalog cards (custom cards excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if an id belongs to the catalog.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Get a catalog card by id (custom cards are not searched).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ValueCard> {
        self.index.get(id).map(|&i| self.entries[i].to_card())
    }

    /// Iterate over catalog cards in catalog order.
    pub fn cards(&self) -> impl Iterator<Item = ValueCard> + '_ {
        self.entries.iter().map(CatalogEntry::to_card)
    }

    /// Custom cards that survive deduplication, in insertion order.
    fn custom_only<'a>(&'a self, state: &'a SessionState) -> impl Iterator<Item = &'a ValueCard> {
        state
            .custom_cards
            .iter()
            .filter(move |card| !self.contains(&card.id))
    }

    /// The merged deck: catalog cards then non-colliding custom cards.
    #[must_use]
    pub fn list_cards(&self, state: &SessionState) -> Vec<ValueCard> {
        self.cards()
            .chain(self.custom_only(state).cloned())
            .collect()
    }

    /// Look up a card across the merged deck.
    #[must_use]
    pub fn find_card(&self, state: &SessionState, id: &str) -> Option<ValueCard> {
        self.get(id)
            .or_else(|| self.custom_only(state).find(|c| c.id == id).cloned())
    }

    /// Resolve ids to cards, preserving order and skipping unknown ids.
    #[must_use]
    pub fn resolve_cards<'a, I>(&self, state: &SessionState, ids: I) -> Vec<ValueCard>
    where
        I: IntoIterator<Item = &'a String>,
    {
        ids.into_iter()
            .filter_map(|id| self.find_card(state, id))
            .collect()
    }

    /// Cards the user selected, in selection order.
    #[must_use]
    pub fn selected_cards(&self, state: &SessionState) -> Vec<ValueCard> {
        self.resolve_cards(state, &state.selected_card_ids)
    }

    /// Ids of the merged deck, for set lookups.
    #[must_use]
    pub fn deck_ids<'a>(&'a self, state: &'a SessionState) -> FxHashSet<&'a str> {
        self.entries
            .iter()
            .map(|e| e.id.as_str())
            .chain(self.custom_only(state).map(|c| c.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardSource;

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry::new("c1", "Honesty").with_tag("integrity"),
            CatalogEntry::new("c2", "Courage"),
            CatalogEntry::new("c3", "Family"),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_catalog_id_rejected() {
        let result = Catalog::from_entries(vec![
            CatalogEntry::new("a", "A"),
            CatalogEntry::new("a", "B"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"{"values":[{"id":"a","label":"A","tag":"t"},{"id":"b","label":"B"}]}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().tag.as_deref(), Some("t"));
        assert!(catalog.get("b").unwrap().tag.is_none());
        assert!(Catalog::from_json("not json").is_err());
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.cards().all(|c| c.source == CardSource::Catalog));
    }

    #[test]
    fn test_list_cards_catalog_then_custom() {
        let catalog = catalog();
        let mut state = SessionState::new();
        state.custom_cards.push_back(ValueCard::custom("x", "X"));
        state.custom_cards.push_back(ValueCard::custom("y", "Y"));

        let ids: Vec<_> = catalog.list_cards(&state).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3", "x", "y"]);
    }

    #[test]
    fn test_colliding_custom_card_suppressed() {
        let catalog = catalog();
        let mut state = SessionState::new();
        state.custom_cards.push_back(ValueCard::custom("c2", "Impostor"));

        let deck = catalog.list_cards(&state);
        assert_eq!(deck.len(), 3);

        let found = catalog.find_card(&state, "c2").unwrap();
        assert_eq!(found.label, "Courage");
        assert_eq!(found.source, CardSource::Catalog);
    }

    #[test]
    fn test_find_card_missing() {
        let state = SessionState::new();
        assert!(catalog().find_card(&state, "nope").is_none());
    }

    #[test]
    fn test_resolve_cards_skips_unknown() {
        let catalog = catalog();
        let mut state = SessionState::new();
        state.custom_cards.push_back(ValueCard::custom("x", "X"));

        let ids: Vec<String> = vec!["c3".into(), "ghost".into(), "x".into(), "c1".into()];
        let labels: Vec<_> = catalog
            .resolve_cards(&state, &ids)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Family", "X", "Honesty"]);
    }

    #[test]
    fn test_selected_cards() {
        let catalog = catalog();
        let mut state = SessionState::new();
        state.selected_card_ids.push_back("c2".into());
        state.selected_card_ids.push_back("c1".into());

        let labels: Vec<_> = catalog
            .selected_cards(&state)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Courage", "Honesty"]);
    }

    #[test]
    fn test_deck_ids() {
        let catalog = catalog();
        let mut state = SessionState::new();
        state.custom_cards.push_back(ValueCard::custom("x", "X"));

        let ids = catalog.deck_ids(&state);
        assert_eq!(ids.len(), 4);
        assert!(ids.contains("x"));
    }
}
