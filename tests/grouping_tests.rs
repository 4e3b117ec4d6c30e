//! Grouping and top-selection integration tests.

use values_sort::cards::{Catalog, CatalogEntry};
use values_sort::core::{EngineConfig, SessionState};
use values_sort::engine::SessionEngine;
use values_sort::grouping::{group_of, move_card, toggle_top, top_groups, unassigned_card_ids};
use values_sort::persistence::MemoryStore;
use values_sort::summary::{can_continue, format_as_text, suggests_bigger_groups, Step};

fn engine_with_selection(n: usize) -> SessionEngine<MemoryStore> {
    let entries = (1..=n)
        .map(|i| CatalogEntry::new(format!("c{i}"), format!("Value {i}")))
        .collect();
    let catalog = Catalog::from_entries(entries).unwrap();
    let mut engine = SessionEngine::open(catalog, EngineConfig::default().with_seed(9), MemoryStore::new());
    for _ in 0..n {
        engine.select_current();
    }
    engine
}

// =============================================================================
// Moving Cards
// =============================================================================

/// Test that moving a card between groups keeps membership exclusive.
#[test]
fn test_move_between_groups() {
    let mut engine = engine_with_selection(1);
    let g1 = engine.add_group();
    let g2 = engine.add_group();

    engine.move_card("c1", Some(g1.as_str()));
    engine.move_card("c1", Some(g2.as_str()));

    let state = engine.state();
    assert!(state.group(&g1).unwrap().card_ids.is_empty());
    assert_eq!(state.group(&g2).unwrap().card_ids, im::vector!["c1".to_string()]);
    assert_eq!(group_of(state, "c1").unwrap().id, g2);
}

/// Test that moving to `None` returns the card to the unassigned pool.
#[test]
fn test_move_to_unassigned() {
    let mut engine = engine_with_selection(2);
    let g1 = engine.add_group();
    engine.move_card("c1", Some(g1.as_str()));
    assert_eq!(engine.unassigned_card_ids(), vec!["c2"]);

    engine.move_card("c1", None);
    assert_eq!(engine.unassigned_card_ids(), vec!["c1", "c2"]);
    assert!(engine.state().group(&g1).unwrap().is_empty());
}

/// Test that a card is appended at the end when re-moved into its own group.
#[test]
fn test_move_within_group_reorders() {
    let state = {
        let mut engine = engine_with_selection(2);
        let g1 = engine.add_group();
        engine.move_card("c1", Some(g1.as_str()));
        engine.move_card("c2", Some(g1.as_str()));
        engine.move_card("c1", Some(g1.as_str()));
        engine.state().clone()
    };
    assert_eq!(state.groups[0].card_ids, im::vector!["c2".to_string(), "c1".to_string()]);
}

/// Test that removing a group unassigns its cards.
#[test]
fn test_remove_group_unassigns() {
    let mut engine = engine_with_selection(2);
    let g1 = engine.add_group();
    engine.move_card("c1", Some(g1.as_str()));
    engine.move_card("c2", Some(g1.as_str()));

    engine.remove_group(&g1);
    assert!(engine.state().groups.is_empty());
    assert_eq!(engine.unassigned_card_ids(), vec!["c1", "c2"]);
}

/// Test that unselected cards cannot be grouped.
#[test]
fn test_unselected_card_not_grouped() {
    let mut state = SessionState::new();
    state.groups.push_back(values_sort::core::Group::new("g1", "A"));

    let next = move_card(&state, "stranger", Some("g1"));
    assert!(next.groups[0].is_empty());
    assert!(unassigned_card_ids(&next).is_empty());
}

/// Test placeholder names count up with the number of groups.
#[test]
fn test_placeholder_names() {
    let mut engine = engine_with_selection(0);
    let g1 = engine.add_group();
    let g2 = engine.add_group();
    assert_eq!(engine.state().group(&g1).unwrap().name, "Group 1");
    assert_eq!(engine.state().group(&g2).unwrap().name, "Group 2");

    engine.rename_group(&g1, "");
    assert_eq!(engine.state().group(&g1).unwrap().name, "");
}

// =============================================================================
// Top Selection
// =============================================================================

/// Test that the fourth top mark is rejected and unmarking frees a slot.
#[test]
fn test_top_cap() {
    let mut state = SessionState::new();
    for id in ["a", "b", "c", "d"] {
        state = toggle_top(&state, id, 3);
    }
    assert_eq!(
        state.top_group_ids,
        im::vector!["a".to_string(), "b".to_string(), "c".to_string()]
    );

    state = toggle_top(&state, "a", 3);
    assert_eq!(state.top_group_ids, im::vector!["b".to_string(), "c".to_string()]);

    state = toggle_top(&state, "d", 3);
    assert_eq!(state.top_group_ids.len(), 3);
}

/// Test that unmarking an imported, duplicated top id clears every copy.
#[test]
fn test_unmark_duplicated_imported_top_id() {
    let mut engine = engine_with_selection(0);
    let record = r#"{
        "schemaVersion": 1,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
        "groups": [{"id": "a", "name": "A", "cardIds": []}],
        "topGroupIds": ["a", "a"]
    }"#;
    assert!(engine.import_json(record).is_some());
    assert_eq!(engine.state().top_group_ids.len(), 2);

    engine.toggle_top("a");
    assert!(!engine.state().is_top("a"));
    assert!(engine.top_groups().is_empty());
}

/// Test that a removed top group still occupies a slot but is not listed.
#[test]
fn test_removed_top_group_keeps_slot() {
    let mut engine = engine_with_selection(1);
    let g1 = engine.add_group();
    engine.toggle_top(&g1);
    engine.remove_group(&g1);

    assert!(engine.state().is_top(&g1));
    assert!(top_groups(engine.state()).is_empty());
    assert!(can_continue(Step::Prioritize, engine.state()));
}

// =============================================================================
// Full Flow
// =============================================================================

/// Test a complete session from selection to the text summary.
#[test]
fn test_full_flow_summary() {
    let mut engine = engine_with_selection(3);
    assert!(can_continue(Step::Select, engine.state()));
    assert!(!can_continue(Step::Group, engine.state()));

    let g1 = engine.add_group();
    let g2 = engine.add_group();
    let g3 = engine.add_group();
    engine.rename_group(&g1, "Integrity");
    engine.rename_group(&g2, "Family");
    engine.rename_group(&g3, "Growth");
    engine.move_card("c1", Some(g1.as_str()));
    engine.move_card("c2", Some(g2.as_str()));
    assert!(suggests_bigger_groups(engine.state()));

    engine.move_card("c3", Some(g1.as_str()));
    assert!(!suggests_bigger_groups(engine.state()));
    assert!(can_continue(Step::Group, engine.state()));

    engine.toggle_top(&g1);
    assert!(can_continue(Step::Prioritize, engine.state()));

    let text = format_as_text(engine.catalog(), engine.state());
    let expected = "\
Values Card Sort - Results

Top groups
-----------
Integrity: Value 1, Value 3

All groups
-----------
Integrity: Value 1, Value 3
Family: Value 2
Growth: ";
    assert_eq!(text, expected);
}
