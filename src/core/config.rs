//! Engine configuration.
//!
//! The engine never hardcodes its limits - callers provide an
//! `EngineConfig` at startup (the CLI fills it from flags).

use serde::{Deserialize, Serialize};

/// Default cap on the number of groups a user may mark as "top".
pub const DEFAULT_MAX_TOP_GROUPS: usize = 3;

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use values_sort::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_max_top_groups(5)
///     .with_seed(42);
///
/// assert_eq!(config.max_top_groups, 5);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of groups `toggle_top` lets the user flag (default: 3).
    pub max_top_groups: usize,

    /// Seed for id generation. `None` seeds from the clock.
    ///
    /// Same seed produces the same sequence of generated ids.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_top_groups: DEFAULT_MAX_TOP_GROUPS,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set the top-selection cap.
    #[must_use]
    pub fn with_max_top_groups(mut self, max: usize) -> Self {
        self.max_top_groups = max;
        self
    }

    /// Set a fixed id-generation seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
