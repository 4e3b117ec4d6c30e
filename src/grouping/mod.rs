//! Grouping: the group store and the top-selection validator.
//!
//! ## Key Operations
//!
//! - `move_card`: Exclusive card-to-group assignment
//! - `add_group` / `rename_group` / `remove_group`: Group lifecycle
//! - `unassigned_card_ids`: Derived unassigned pool
//! - `toggle_top`: Bounded "most important" subset

pub mod groups;
pub mod top;

pub use groups::{
    add_group, group_of, is_placeholder_name, move_card, placeholder_name, remove_group,
    rename_group, unassigned_card_ids, PLACEHOLDER_PREFIX,
};
pub use top::{can_mark_more, toggle_top, top_groups};
