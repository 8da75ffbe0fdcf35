//! Unit tests for the undo engine.

use bevy::prelude::*;

use crate::library::{DefinitionId, VariantId};
use crate::schematic::{
    ComponentId, ComponentInstance, Placement, SchematicData, SymbolId, SymbolInstance,
};

use super::command::{EditorCommand, SymbolEdit};
use super::composite::CompositeCommand;
use super::error::{HistoryError, MutationError, TransactionError};
use super::undo_stack::UndoStack;

fn component(designator: &str) -> ComponentInstance {
    ComponentInstance {
        definition: DefinitionId::new("resistor"),
        variant: VariantId::new("default"),
        designator: designator.to_string(),
    }
}

fn symbol(component: ComponentId, x: f32) -> SymbolInstance {
    SymbolInstance {
        component,
        gate: "A".to_string(),
        placement: Placement::new(Vec2::new(x, 0.0), 0),
    }
}

/// Commit one transaction placing a fresh component with one symbol.
fn commit_placement(stack: &mut UndoStack, doc: &mut SchematicData, x: f32) {
    let cid = doc.allocate_component_id();
    let designator = doc.next_designator("R");
    stack.begin_transaction("Add Component to Schematic").unwrap();
    stack
        .append_to_transaction(
            EditorCommand::AddComponent {
                id: cid,
                component: component(&designator),
            },
            doc,
        )
        .unwrap();
    let sid = doc.allocate_symbol_id();
    stack
        .append_to_transaction(
            EditorCommand::AddSymbol {
                id: sid,
                symbol: symbol(cid, x),
            },
            doc,
        )
        .unwrap();
    stack.commit_transaction().unwrap();
}

#[test]
fn test_undo_redo_restores_identical_state() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    let before = doc.clone();

    for i in 0..4 {
        commit_placement(&mut stack, &mut doc, i as f32 * 100.0);
    }
    let after = doc.clone();
    assert_ne!(before, after);

    for _ in 0..4 {
        stack.undo(&mut doc).unwrap();
    }
    assert_eq!(doc, before);

    for _ in 0..4 {
        stack.redo(&mut doc).unwrap();
    }
    assert_eq!(doc, after);
}

#[test]
fn test_undo_redo_noop_at_boundaries() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    commit_placement(&mut stack, &mut doc, 0.0);
    let after = doc.clone();

    stack.redo(&mut doc).unwrap(); // already at the top
    assert_eq!(doc, after);

    stack.undo(&mut doc).unwrap();
    let before = doc.clone();
    stack.undo(&mut doc).unwrap(); // already at the bottom
    assert_eq!(doc, before);
}

#[test]
fn test_abort_restores_state_for_any_prefix() {
    // Property: aborting after K appended commands restores the document to
    // the state before begin_transaction, for all K >= 0.
    for k in 0..=3 {
        let mut doc = SchematicData::default();
        let mut stack = UndoStack::default();
        commit_placement(&mut stack, &mut doc, 0.0);
        let before = doc.clone();

        stack.begin_transaction("Add Component to Schematic").unwrap();
        if k > 0 {
            let cid = doc.allocate_component_id();
            stack
                .append_to_transaction(
                    EditorCommand::AddComponent {
                        id: cid,
                        component: component("R9"),
                    },
                    &mut doc,
                )
                .unwrap();
            for i in 1..k {
                let sid = doc.allocate_symbol_id();
                stack
                    .append_to_transaction(
                        EditorCommand::AddSymbol {
                            id: sid,
                            symbol: symbol(cid, i as f32),
                        },
                        &mut doc,
                    )
                    .unwrap();
            }
        }
        stack.abort_transaction(&mut doc);
        assert_eq!(doc, before, "abort after {} commands must restore state", k);
        assert!(!stack.is_transaction_open());
        assert_eq!(stack.history_len(), 1);
    }
}

#[test]
fn test_abort_without_transaction_is_noop() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    let before = doc.clone();
    stack.abort_transaction(&mut doc);
    assert_eq!(doc, before);
    assert_eq!(stack.history_len(), 0);
}

#[test]
fn test_begin_while_open_fails_and_preserves_open() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    stack.begin_transaction("First").unwrap();
    let cid = doc.allocate_component_id();
    stack
        .append_to_transaction(
            EditorCommand::AddComponent {
                id: cid,
                component: component("R1"),
            },
            &mut doc,
        )
        .unwrap();

    let result = stack.begin_transaction("Second");
    assert_eq!(
        result,
        Err(TransactionError::AlreadyOpen("First".to_string()))
    );
    // The existing open transaction is untouched.
    assert_eq!(stack.open_len(), Some(1));
    stack.commit_transaction().unwrap();
    assert_eq!(stack.undo_label(), Some("First"));
}

#[test]
fn test_append_without_transaction_fails() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    let cid = doc.allocate_component_id();
    let result = stack.append_to_transaction(
        EditorCommand::AddComponent {
            id: cid,
            component: component("R1"),
        },
        &mut doc,
    );
    assert_eq!(
        result,
        Err(HistoryError::Transaction(TransactionError::NotOpen))
    );
    assert_eq!(doc.component_count(), 0);
}

#[test]
fn test_failed_append_is_not_recorded() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    stack.begin_transaction("Add Component to Schematic").unwrap();
    // Symbol referencing a component that does not exist fails to execute.
    let sid = doc.allocate_symbol_id();
    let result = stack.append_to_transaction(
        EditorCommand::AddSymbol {
            id: sid,
            symbol: symbol(ComponentId(77), 0.0),
        },
        &mut doc,
    );
    assert!(matches!(result, Err(HistoryError::Mutation(_))));
    assert_eq!(stack.open_len(), Some(0));
    stack.abort_transaction(&mut doc);
    assert_eq!(doc, SchematicData::default());
}

#[test]
fn test_empty_commit_never_reaches_history() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    stack.begin_transaction("Add Symbol to Schematic").unwrap();
    stack.commit_transaction().unwrap();
    assert_eq!(stack.history_len(), 0);
    assert!(!stack.can_undo());
}

#[test]
fn test_new_transaction_truncates_redo_tail() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    commit_placement(&mut stack, &mut doc, 0.0);
    commit_placement(&mut stack, &mut doc, 100.0);
    stack.undo(&mut doc).unwrap();
    assert!(stack.can_redo());

    commit_placement(&mut stack, &mut doc, 200.0);
    assert!(!stack.can_redo());
    assert_eq!(stack.history_len(), 2);
}

#[test]
fn test_undo_redo_labels() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    assert_eq!(stack.undo_label(), None);
    commit_placement(&mut stack, &mut doc, 0.0);
    assert_eq!(stack.undo_label(), Some("Add Component to Schematic"));
    assert_eq!(stack.redo_label(), None);
    stack.undo(&mut doc).unwrap();
    assert_eq!(stack.undo_label(), None);
    assert_eq!(stack.redo_label(), Some("Add Component to Schematic"));
}

#[test]
fn test_undo_while_open_fails() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    commit_placement(&mut stack, &mut doc, 0.0);
    stack.begin_transaction("Pending").unwrap();
    assert!(matches!(
        stack.undo(&mut doc),
        Err(HistoryError::Transaction(TransactionError::AlreadyOpen(_)))
    ));
    assert!(matches!(
        stack.redo(&mut doc),
        Err(HistoryError::Transaction(TransactionError::AlreadyOpen(_)))
    ));
    assert!(!stack.can_undo());
    assert!(!stack.can_redo());
}

#[test]
fn test_composite_append_after_commit_fails() {
    let mut composite = CompositeCommand::new("Add Component to Schematic");
    composite
        .append(EditorCommand::AddComponent {
            id: ComponentId(1),
            component: component("R1"),
        })
        .unwrap();
    composite.mark_committed();
    let result = composite.append(EditorCommand::AddComponent {
        id: ComponentId(2),
        component: component("R2"),
    });
    assert_eq!(result, Err(TransactionError::AlreadyCommitted));
    assert_eq!(composite.len(), 1);
}

#[test]
fn test_composite_partial_execute_rolls_back() {
    let mut doc = SchematicData::default();
    let cid = ComponentId(1);

    // Second AddComponent with the same id fails; the first one must be
    // rolled back before the error propagates.
    let mut composite = CompositeCommand::new("Broken");
    composite
        .append(EditorCommand::AddComponent {
            id: cid,
            component: component("R1"),
        })
        .unwrap();
    composite
        .append(EditorCommand::AddComponent {
            id: cid,
            component: component("R2"),
        })
        .unwrap();

    let before = doc.clone();
    let result = composite.execute(&mut doc);
    assert_eq!(result, Err(MutationError::ComponentExists(cid)));
    assert_eq!(doc, before);
}

#[test]
fn test_composite_undo_runs_in_reverse_order() {
    let mut doc = SchematicData::default();
    let cid = doc.allocate_component_id();
    let sid = doc.allocate_symbol_id();

    let mut composite = CompositeCommand::new("Add Component to Schematic");
    composite
        .append(EditorCommand::AddComponent {
            id: cid,
            component: component("R1"),
        })
        .unwrap();
    composite
        .append(EditorCommand::AddSymbol {
            id: sid,
            symbol: symbol(cid, 0.0),
        })
        .unwrap();

    composite.execute(&mut doc).unwrap();
    assert_eq!(doc.component_count(), 1);
    assert_eq!(doc.symbol_count(), 1);

    // Forward order would fail: the component cannot be removed while its
    // symbol exists. Reverse order succeeds.
    composite.undo(&mut doc).unwrap();
    assert_eq!(doc.component_count(), 0);
    assert_eq!(doc.symbol_count(), 0);
}

#[test]
fn test_symbol_edit_preview_and_undo() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    let cid = doc.allocate_component_id();
    let sid = doc.allocate_symbol_id();

    stack.begin_transaction("Add Component to Schematic").unwrap();
    stack
        .append_to_transaction(
            EditorCommand::AddComponent {
                id: cid,
                component: component("R1"),
            },
            &mut doc,
        )
        .unwrap();
    stack
        .append_to_transaction(
            EditorCommand::AddSymbol {
                id: sid,
                symbol: symbol(cid, 0.0),
            },
            &mut doc,
        )
        .unwrap();

    let mut edit = SymbolEdit::begin(&doc, sid).unwrap();
    // Preview mutations are visible immediately...
    edit.set_position(&mut doc, Vec2::new(250.0, 50.0), true).unwrap();
    edit.set_rotation(&mut doc, 90, true).unwrap();
    assert_eq!(
        doc.symbol(sid).unwrap().placement,
        Placement::new(Vec2::new(250.0, 50.0), 90)
    );

    // ...but only the finalized edit lands in history.
    edit.set_position(&mut doc, Vec2::new(300.0, 50.0), false).unwrap();
    stack
        .append_to_transaction(edit.into_command(), &mut doc)
        .unwrap();
    assert_eq!(
        doc.symbol(sid).unwrap().placement,
        Placement::new(Vec2::new(300.0, 50.0), 90)
    );
    stack.commit_transaction().unwrap();
    assert_eq!(stack.history_len(), 1);

    // Undo restores the pre-preview placement captured at begin().
    stack.undo(&mut doc).unwrap();
    assert_eq!(doc, SchematicData::default());
}

#[test]
fn test_set_designator_command() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    let cid = doc.allocate_component_id();
    doc.insert_component(cid, component("R1")).unwrap();

    stack.begin_transaction("Rename Component").unwrap();
    stack
        .append_to_transaction(
            EditorCommand::SetDesignator {
                id: cid,
                from: "R1".to_string(),
                to: "R47".to_string(),
            },
            &mut doc,
        )
        .unwrap();
    stack.commit_transaction().unwrap();
    assert_eq!(doc.component(cid).unwrap().designator, "R47");

    stack.undo(&mut doc).unwrap();
    assert_eq!(doc.component(cid).unwrap().designator, "R1");
    stack.redo(&mut doc).unwrap();
    assert_eq!(doc.component(cid).unwrap().designator, "R47");
}

#[test]
fn test_clear_drops_history_and_open() {
    let mut doc = SchematicData::default();
    let mut stack = UndoStack::default();
    commit_placement(&mut stack, &mut doc, 0.0);
    stack.begin_transaction("Pending").unwrap();
    stack.clear();
    assert!(!stack.is_transaction_open());
    assert!(!stack.can_undo());
    assert_eq!(stack.history_len(), 0);
}
