//! Card system: value cards and the catalog resolver.
//!
//! ## Key Types
//!
//! - `ValueCard`: A card in the deck (catalog or custom)
//! - `CardSource`: Where a card came from
//! - `Catalog`: Static card list, merged with custom cards into the deck
//! - `CatalogEntry`: One record of the catalog data source

pub mod card;
pub mod catalog;

pub use card::{CardSource, ValueCard};
pub use catalog::{Catalog, CatalogEntry, CatalogError};
