//! # values-sort
//!
//! Session state engine for a four-step values card sort: keep or skip
//! value cards, group the kept ones, mark the most important groups, and
//! read the summary.
//!
//! ## Design Principles
//!
//! 1. **Full-State Transforms**: Every mutation is a pure function from
//!    `&SessionState` to a new `SessionState`. Callers never see partial
//!    patches.
//!
//! 2. **Silent Persistence**: Loading, importing and saving never fail
//!    loudly. Unusable records read as "no session"; failed writes leave
//!    the in-memory state authoritative.
//!
//! 3. **Injected Storage**: The durable slot is a `SessionStore` handed to
//!    the engine, never an ambient global.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state cloning via `im-rs`, so the
//!   engine keeps the previous state alongside the current one.
//!
//! - **Versioned Records**: Raw JSON passes through a `MigrationChain` keyed
//!   by `schemaVersion` before typed decoding.
//!
//! ## Modules
//!
//! - `core`: Session state, configuration, id generation
//! - `cards`: Value cards and the catalog resolver
//! - `deck`: Deck traversal and keep/skip decisions
//! - `grouping`: Group store and top-selection validator
//! - `persistence`: Stores, migrations, load/save/import/export
//! - `engine`: The mutation entry point tying it all together
//! - `summary`: Step gating and the text summary

pub mod core;
pub mod cards;
pub mod deck;
pub mod grouping;
pub mod persistence;
pub mod engine;
pub mod summary;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig, Group, IdGenerator, SessionState,
    CURRENT_SCHEMA_VERSION, DEFAULT_MAX_TOP_GROUPS,
};

pub use crate::cards::{CardSource, Catalog, CatalogEntry, CatalogError, ValueCard};

pub use crate::deck::{current_card, remaining_count, Decision};

pub use crate::grouping::{is_placeholder_name, move_card, toggle_top, unassigned_card_ids};

pub use crate::persistence::{
    FileStore, MemoryStore, Migration, MigrationChain, MigrationError,
    SessionError, SessionRepository, SessionStore, StoreError,
};

pub use crate::engine::SessionEngine;

pub use crate::summary::{can_continue, format_as_text, Step};
