//! Core engine types: session state, configuration, id generation.
//!
//! This module contains the record every other module reads and transforms.
//! Callers configure limits via `EngineConfig` rather than constants.

pub mod config;
pub mod ids;
pub mod state;

pub use config::{EngineConfig, DEFAULT_MAX_TOP_GROUPS};
pub use ids::{IdGenerator, CUSTOM_ID_PREFIX, GROUP_ID_PREFIX};
pub use state::{Group, SessionState, CURRENT_SCHEMA_VERSION};
