//! Deck traversal: current card, remaining count, keep/skip decisions.

pub mod traversal;

pub use traversal::{
    add_custom_card, current_card, decide_current, discard_current, remaining_count,
    select_current, Decision,
};
