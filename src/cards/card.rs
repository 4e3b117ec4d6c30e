//! Value cards - the items the user keeps or skips.
//!
//! A `ValueCard` is either a catalog card (static, shipped with the app) or
//! a custom card the user typed in. Both share one id space; catalog ids win
//! on collision.

use serde::{Deserialize, Serialize};

/// Where a card came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSource {
    /// Built-in catalog card. Immutable.
    Catalog,
    /// Created by the user and stored in session state.
    Custom,
}

/// A card in the merged deck.
///
/// ## Example
///
/// ```
/// use values_sort::cards::{CardSource, ValueCard};
///
/// let card = ValueCard::custom("custom-1", "Curiosity");
/// assert_eq!(card.source, CardSource::Custom);
/// assert!(card.tag.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueCard {
    /// Unique, stable identifier.
    pub id: String,

    /// Display label.
    pub label: String,

    pub source: CardSource,

    /// Optional theme tag (catalog cards only, in practice).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ValueCard {
    /// Create a catalog card.
    #[must_use]
    pub fn catalog(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: CardSource::Catalog,
            tag: None,
        }
    }

    /// Create a custom card.
    #[must_use]
    pub fn custom(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            source: CardSource::Custom,
            tag: None,
        }
    }

    /// Set the tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Check if this is a user-created card.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.source == CardSource::Custom
    }
}

impl std::fmt::Display for ValueCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}
