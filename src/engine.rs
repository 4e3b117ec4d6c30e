//! Session engine: the single mutation entry point.
//!
//! The view layer hands `SessionEngine::update` a pure transform. The engine
//! applies it, stamps and persists the result, keeps the previous state and
//! returns the new one. Every mutation replaces the whole state.
//!
//! ## Usage
//!
//! ```
//! use values_sort::cards::{Catalog, CatalogEntry};
//! use values_sort::core::EngineConfig;
//! use values_sort::engine::SessionEngine;
//! use values_sort::persistence::MemoryStore;
//!
//! let catalog = Catalog::from_entries(vec![
//!     CatalogEntry::new("c1", "Honesty"),
//!     CatalogEntry::new("c2", "Courage"),
//! ])
//! .unwrap();
//!
//! let mut engine = SessionEngine::open(catalog, EngineConfig::default().with_seed(1), MemoryStore::new());
//!
//! engine.select_current();
//! let group = engine.add_group();
//! engine.move_card("c1", Some(group.as_str()));
//! engine.toggle_top(&group);
//!
//! assert_eq!(engine.current_card().unwrap().id, "c2");
//! assert_eq!(engine.state().top_group_ids.len(), 1);
//! ```

use tracing::{debug, info};

use crate::cards::{Catalog, ValueCard};
use crate::core::{EngineConfig, Group, IdGenerator, SessionState};
use crate::deck;
use crate::grouping;
use crate::persistence::{SessionError, SessionRepository, SessionStore};

/// Owns the session state and everything needed to transform and persist it.
#[derive(Debug)]
pub struct SessionEngine<S: SessionStore> {
    catalog: Catalog,
    config: EngineConfig,
    repo: SessionRepository<S>,
    ids: IdGenerator,
    state: SessionState,
    previous: Option<SessionState>,
}

impl<S: SessionStore> SessionEngine<S> {
    /// Load the persisted session, or start a fresh one.
    ///
    /// A fresh session is not written until the first mutation.
    pub fn open(catalog: Catalog, config: EngineConfig, store: S) -> Self {
        Self::with_repository(catalog, config, SessionRepository::new(store))
    }

    /// Like `open`, with a preconfigured repository (custom migrations).
    pub fn with_repository(catalog: Catalog, config: EngineConfig, repo: SessionRepository<S>) -> Self {
        let state = repo.load().unwrap_or_else(|| {
            info!("starting fresh session");
            SessionState::new()
        });
        let ids = config.seed.map_or_else(IdGenerator::from_clock, IdGenerator::new);

        Self {
            catalog,
            config,
            repo,
            ids,
            state,
            previous: None,
        }
    }

    // === Accessors ===

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// State before the last mutation, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&SessionState> {
        self.previous.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The durable store backing this engine.
    #[must_use]
    pub fn store(&self) -> &S {
        self.repo.store()
    }

    // === Mutation entry points ===

    /// Apply a transform, persist the result and make it current.
    pub fn update<F>(&mut self, transform: F) -> &SessionState
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let next = transform(&self.state);
        self.commit(next)
    }

    /// Replace the state outright (used by import), persisting it.
    pub fn replace(&mut self, state: SessionState) -> &SessionState {
        self.commit(state)
    }

    fn commit(&mut self, mut next: SessionState) -> &SessionState {
        self.repo.save(&mut next);
        self.previous = Some(std::mem::replace(&mut self.state, next));
        &self.state
    }

    // === Deck traversal ===

    /// Next undecided card.
    #[must_use]
    pub fn current_card(&self) -> Option<ValueCard> {
        deck::current_card(&self.catalog, &self.state)
    }

    /// Number of undecided cards.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        deck::remaining_count(&self.catalog, &self.state)
    }

    /// Merged deck (catalog then custom cards).
    #[must_use]
    pub fn deck(&self) -> Vec<ValueCard> {
        self.catalog.list_cards(&self.state)
    }

    /// Look up any deck card by id.
    #[must_use]
    pub fn find_card(&self, id: &str) -> Option<ValueCard> {
        self.catalog.find_card(&self.state, id)
    }

    /// Keep the current card. No-op when every card is decided.
    pub fn select_current(&mut self) -> &SessionState {
        if self.current_card().is_none() {
            return &self.state;
        }
        let next = deck::select_current(&self.catalog, &self.state);
        self.commit(next)
    }

    /// Skip the current card. No-op when every card is decided.
    pub fn discard_current(&mut self) -> &SessionState {
        if self.current_card().is_none() {
            return &self.state;
        }
        let next = deck::discard_current(&self.catalog, &self.state);
        self.commit(next)
    }

    /// Create a custom card from a label and auto-select it.
    ///
    /// The label is trimmed; an empty label adds nothing and returns `None`.
    pub fn add_custom_card(&mut self, label: &str) -> Option<ValueCard> {
        let label = label.trim();
        if label.is_empty() {
            debug!("empty custom card label ignored");
            return None;
        }

        let card = ValueCard::custom(self.ids.custom_card_id(), label);
        let next = deck::add_custom_card(&self.state, card.clone());
        self.commit(next);
        Some(card)
    }

    // === Grouping ===

    /// Selected cards in no group.
    #[must_use]
    pub fn unassigned_card_ids(&self) -> Vec<String> {
        grouping::unassigned_card_ids(&self.state)
    }

    /// Move a card into a group, or to the unassigned pool with `None`.
    pub fn move_card(&mut self, card_id: &str, target: Option<&str>) -> &SessionState {
        let next = grouping::move_card(&self.state, card_id, target);
        self.commit(next)
    }

    /// Add an empty placeholder-named group and return its id.
    pub fn add_group(&mut self) -> String {
        let id = self.ids.group_id();
        let next = grouping::add_group(&self.state, id.clone());
        self.commit(next);
        id
    }

    /// Rename a group verbatim.
    pub fn rename_group(&mut self, group_id: &str, name: &str) -> &SessionState {
        let next = grouping::rename_group(&self.state, group_id, name);
        self.commit(next)
    }

    /// Remove a group; its cards become unassigned.
    pub fn remove_group(&mut self, group_id: &str) -> &SessionState {
        let next = grouping::remove_group(&self.state, group_id);
        self.commit(next)
    }

    // === Top selection ===

    /// Toggle a group's top mark, bounded by `max_top_groups`.
    pub fn toggle_top(&mut self, group_id: &str) -> &SessionState {
        let next = grouping::toggle_top(&self.state, group_id, self.config.max_top_groups);
        self.commit(next)
    }

    /// Marked groups that still exist.
    #[must_use]
    pub fn top_groups(&self) -> Vec<&Group> {
        grouping::top_groups(&self.state).into_vec()
    }

    // === Persistence ===

    /// Pretty JSON of the whole state.
    pub fn export_json(&self) -> Result<String, SessionError> {
        self.repo.export(&self.state)
    }

    /// Replace the state with an imported record.
    ///
    /// Returns `None`, leaving the state untouched, if the text is not a
    /// compatible session record.
    pub fn import_json(&mut self, json: &str) -> Option<&SessionState> {
        let imported = self.repo.import(json)?;
        Some(self.replace(imported))
    }

    /// Start over with a fresh, persisted state.
    pub fn reset(&mut self) -> &SessionState {
        let fresh = self.repo.reset();
        self.previous = Some(std::mem::replace(&mut self.state, fresh));
        &self.state
    }
}
