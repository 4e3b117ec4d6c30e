//! Persistence and schema migration.
//!
//! ## Key Types
//!
//! - `SessionStore`: One durable slot (`MemoryStore`, `FileStore`)
//! - `MigrationChain`: Versioned normalization of raw records
//! - `SessionRepository`: Load / save / import / export / reset over a store
//!
//! ## Failure Policy
//!
//! Persistence never fails loudly. Load and import return `None` for
//! anything unusable, save logs and moves on.

pub mod migration;
pub mod repository;
pub mod store;

pub use migration::{
    DefaultDiscardedCardIds, DefaultTimestamps, JsonObject, LegacyPileFields, Migration,
    MigrationChain, MigrationError,
};
pub use repository::{decode_session, encode_session, export_session, SessionError, SessionRepository};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError, APP_DIR, SESSION_FILENAME};
