//! Interactive placement of multi-gate components.
//!
//! The placement tool is an event-driven state machine. Starting it resolves
//! a catalog definition, opens an undo transaction, and creates the first
//! gate symbol, which then follows the pointer as a live preview. Each
//! primary click finalizes one gate into exactly one committed transaction
//! and moves on to the next gate; after the last gate the tool chains into
//! placing another instance of the same definition. Abort restarts the
//! current definition; deactivating the tool rolls everything back.
//!
//! Pointer-move previews mutate the open live edit-command instead of
//! appending history entries, so undoing one placed gate is always exactly
//! one undo step.

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::ROTATION_STEP_DEG;
use crate::library::{ComponentCatalog, DefinitionId, Gate, LookupError, SymbolVariant, VariantId};
use crate::schematic::{
    normalize_angle, ComponentId, ComponentInstance, MutationError, Placement, SchematicData,
    SymbolId, SymbolInstance,
};

use super::history::{
    EditorCommand, HistoryError, SymbolEdit, TransactionError, UndoStack,
};
use super::EditorError;

/// Input to the placement state machine.
///
/// One closed enum instead of an open event hierarchy: every state handles
/// every kind, checked exhaustively at compile time. Events are delivered as
/// Bevy messages and processed strictly in arrival order by
/// [`process_tool_events`].
#[derive(Message, Debug, Clone, PartialEq)]
pub enum ToolEvent {
    /// Activate the tool. Without a definition the picker dialog opens.
    StartPlacement {
        definition: Option<(DefinitionId, VariantId)>,
    },
    /// The picker dialog was confirmed.
    SelectionConfirmed {
        definition: DefinitionId,
        variant: VariantId,
    },
    /// The picker dialog was dismissed. Not an error; unwinds silently.
    SelectionCancelled,
    /// Pointer moved to a (grid-snapped) sheet position.
    PointerMove { pos: Vec2 },
    /// Primary button: finalize the pending gate at this position.
    PrimaryClick { pos: Vec2 },
    /// Secondary button: rotate the pending gate clockwise.
    SecondaryClick,
    RotateCw,
    RotateCcw,
    /// Abort the pending placement (restarts the same definition).
    Abort,
    /// The tool is being switched away or torn down.
    ToolDeactivated,
}

/// A placement sequence failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl From<TransactionError> for PlacementError {
    fn from(e: TransactionError) -> Self {
        PlacementError::History(HistoryError::Transaction(e))
    }
}

impl From<MutationError> for PlacementError {
    fn from(e: MutationError) -> Self {
        PlacementError::History(HistoryError::Mutation(e))
    }
}

/// Per-activation data of an active placement.
///
/// Exists exactly while the state machine is in [`PlacementState::Placing`];
/// its presence *is* the "session active" flag.
#[derive(Debug)]
pub struct PlacementSession {
    definition: DefinitionId,
    variant_id: VariantId,
    /// Resolved variant whose gates are placed in order.
    variant: SymbolVariant,
    gate_index: usize,
    /// The component instance this activation added to the circuit.
    component: ComponentId,
    /// Live edit-command for the symbol following the pointer.
    live_edit: SymbolEdit,
    /// Accumulated rotation, carried forward to the next gate and the next
    /// chained instance.
    last_angle: i32,
}

impl PlacementSession {
    pub fn definition(&self) -> &DefinitionId {
        &self.definition
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn pending_symbol(&self) -> SymbolId {
        self.live_edit.symbol_id()
    }

    pub fn current_gate(&self) -> &str {
        &self.variant.gates[self.gate_index].name
    }

    pub fn last_angle(&self) -> i32 {
        self.last_angle
    }
}

#[derive(Debug, Default)]
pub enum PlacementState {
    #[default]
    Idle,
    /// The picker dialog is open; nothing has been resolved or mutated yet.
    AwaitingSelection,
    Placing(PlacementSession),
}

/// The placement tool state machine resource.
#[derive(Resource, Default)]
pub struct PlacementTool {
    state: PlacementState,
    /// Last known pointer position, used as the spawn position when a
    /// placement starts before any pointer motion.
    last_pointer: Vec2,
}

impl PlacementTool {
    pub fn is_idle(&self) -> bool {
        matches!(self.state, PlacementState::Idle)
    }

    pub fn is_awaiting_selection(&self) -> bool {
        matches!(self.state, PlacementState::AwaitingSelection)
    }

    pub fn session(&self) -> Option<&PlacementSession> {
        match &self.state {
            PlacementState::Placing(session) => Some(session),
            _ => None,
        }
    }

    /// Status-bar prompt for the current state.
    pub fn prompt(&self, doc: &SchematicData) -> Option<String> {
        match &self.state {
            PlacementState::Idle => None,
            PlacementState::AwaitingSelection => {
                Some("Choose a component to place".to_string())
            }
            PlacementState::Placing(session) => {
                let designator = doc
                    .component(session.component())
                    .map(|c| c.designator.clone())
                    .unwrap_or_default();
                Some(format!(
                    "Click to place gate {} of {} ({}): right-click rotates, Esc restarts",
                    session.current_gate(),
                    designator,
                    session.definition()
                ))
            }
        }
    }

    /// Process one event. On failure the open transaction is aborted and the
    /// tool returns to idle; the error is handed back for surfacing.
    pub fn handle(
        &mut self,
        event: &ToolEvent,
        doc: &mut SchematicData,
        undo: &mut UndoStack,
        catalog: &ComponentCatalog,
    ) -> Result<(), PlacementError> {
        if let ToolEvent::PointerMove { pos } = event {
            self.last_pointer = *pos;
        }
        let state = std::mem::take(&mut self.state);
        match Self::transition(state, event, self.last_pointer, doc, undo, catalog) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                // Boundary recovery: no partial mutation may survive.
                undo.abort_transaction(doc);
                self.state = PlacementState::Idle;
                Err(e)
            }
        }
    }

    /// Abort any in-flight placement and return to idle. Idempotent; never
    /// propagates; used on tool switch and document teardown.
    pub fn deactivate(&mut self, doc: &mut SchematicData, undo: &mut UndoStack) {
        if !self.is_idle() {
            debug!(
                "Placement tool deactivated mid-session ({} staged commands)",
                undo.open_len().unwrap_or(0)
            );
        }
        undo.abort_transaction(doc);
        self.state = PlacementState::Idle;
    }

    fn transition(
        state: PlacementState,
        event: &ToolEvent,
        pointer: Vec2,
        doc: &mut SchematicData,
        undo: &mut UndoStack,
        catalog: &ComponentCatalog,
    ) -> Result<PlacementState, PlacementError> {
        match (state, event) {
            // ----- Idle -----
            (PlacementState::Idle, ToolEvent::StartPlacement { definition }) => {
                match definition {
                    Some((def, var)) => {
                        start_placement(def.clone(), var.clone(), 0, pointer, doc, undo, catalog)
                    }
                    None => Ok(PlacementState::AwaitingSelection),
                }
            }
            (PlacementState::Idle, _) => Ok(PlacementState::Idle),

            // ----- AwaitingSelection -----
            (
                PlacementState::AwaitingSelection,
                ToolEvent::SelectionConfirmed { definition, variant },
            ) => start_placement(
                definition.clone(),
                variant.clone(),
                0,
                pointer,
                doc,
                undo,
                catalog,
            ),
            (PlacementState::AwaitingSelection, ToolEvent::SelectionCancelled) => {
                Ok(PlacementState::Idle)
            }
            (PlacementState::AwaitingSelection, ToolEvent::Abort) => Ok(PlacementState::Idle),
            (PlacementState::AwaitingSelection, ToolEvent::ToolDeactivated) => {
                Ok(PlacementState::Idle)
            }
            (PlacementState::AwaitingSelection, ToolEvent::StartPlacement { definition }) => {
                match definition {
                    Some((def, var)) => {
                        start_placement(def.clone(), var.clone(), 0, pointer, doc, undo, catalog)
                    }
                    None => Ok(PlacementState::AwaitingSelection),
                }
            }
            (state @ PlacementState::AwaitingSelection, _) => Ok(state),

            // ----- Placing -----
            (PlacementState::Placing(mut session), ToolEvent::PointerMove { pos }) => {
                session.live_edit.set_position(doc, *pos, true)?;
                Ok(PlacementState::Placing(session))
            }
            (PlacementState::Placing(session), ToolEvent::PrimaryClick { pos }) => {
                place_pending_gate(session, *pos, doc, undo, catalog)
            }
            (
                PlacementState::Placing(mut session),
                ToolEvent::SecondaryClick | ToolEvent::RotateCw,
            ) => {
                rotate_pending(&mut session, -ROTATION_STEP_DEG, doc)?;
                Ok(PlacementState::Placing(session))
            }
            (PlacementState::Placing(mut session), ToolEvent::RotateCcw) => {
                rotate_pending(&mut session, ROTATION_STEP_DEG, doc)?;
                Ok(PlacementState::Placing(session))
            }
            (PlacementState::Placing(session), ToolEvent::Abort) => {
                // Roll back the pending instance, then restart the same
                // definition with rotation reset.
                undo.abort_transaction(doc);
                let definition = session.definition.clone();
                let variant_id = session.variant_id.clone();
                start_placement(definition, variant_id, 0, pointer, doc, undo, catalog)
            }
            (PlacementState::Placing(_), ToolEvent::ToolDeactivated) => {
                undo.abort_transaction(doc);
                Ok(PlacementState::Idle)
            }
            (PlacementState::Placing(_), ToolEvent::StartPlacement { definition }) => {
                // Switching to another component aborts the pending one.
                undo.abort_transaction(doc);
                match definition {
                    Some((def, var)) => {
                        start_placement(def.clone(), var.clone(), 0, pointer, doc, undo, catalog)
                    }
                    None => Ok(PlacementState::AwaitingSelection),
                }
            }
            (
                state @ PlacementState::Placing(_),
                ToolEvent::SelectionConfirmed { .. } | ToolEvent::SelectionCancelled,
            ) => Ok(state),
        }
    }
}

/// Resolve a definition and open the transaction for its first gate.
fn start_placement(
    definition_id: DefinitionId,
    variant_id: VariantId,
    last_angle: i32,
    position: Vec2,
    doc: &mut SchematicData,
    undo: &mut UndoStack,
    catalog: &ComponentCatalog,
) -> Result<PlacementState, PlacementError> {
    let definition = catalog.resolve(&definition_id)?;
    let variant = definition
        .variant(&variant_id)
        .ok_or_else(|| LookupError::UnknownVariant {
            definition: definition_id.clone(),
            variant: variant_id.clone(),
        })?;
    let Some(first_gate) = variant.first_gate().cloned() else {
        return Err(LookupError::EmptyVariant {
            definition: definition_id.clone(),
            variant: variant_id.clone(),
        }
        .into());
    };
    let variant = variant.clone();
    let prefix = definition.prefix.clone();

    undo.begin_transaction("Add Component to Schematic")?;

    let component = doc.allocate_component_id();
    let designator = doc.next_designator(&prefix);
    undo.append_to_transaction(
        EditorCommand::AddComponent {
            id: component,
            component: ComponentInstance {
                definition: definition_id.clone(),
                variant: variant_id.clone(),
                designator,
            },
        },
        doc,
    )?;

    let last_angle = normalize_angle(last_angle);
    let live_edit = spawn_gate_symbol(component, &first_gate, position, last_angle, doc, undo)?;
    Ok(PlacementState::Placing(PlacementSession {
        definition: definition_id,
        variant_id,
        variant,
        gate_index: 0,
        component,
        live_edit,
        last_angle,
    }))
}

/// Append the AddSymbol command for one gate and open a fresh live
/// edit-command on it, biased by the accumulated rotation.
fn spawn_gate_symbol(
    component: ComponentId,
    gate: &Gate,
    position: Vec2,
    last_angle: i32,
    doc: &mut SchematicData,
    undo: &mut UndoStack,
) -> Result<SymbolEdit, PlacementError> {
    let symbol_id = doc.allocate_symbol_id();
    undo.append_to_transaction(
        EditorCommand::AddSymbol {
            id: symbol_id,
            symbol: SymbolInstance {
                component,
                gate: gate.name.clone(),
                placement: Placement::new(position, last_angle),
            },
        },
        doc,
    )?;

    let mut live_edit = SymbolEdit::begin(doc, symbol_id)?;
    live_edit.set_rotation(doc, last_angle, true)?;
    Ok(live_edit)
}

/// Finalize the pending gate at `pos`: commit its transaction and continue
/// with the next gate, or chain into another instance of the definition.
fn place_pending_gate(
    mut session: PlacementSession,
    pos: Vec2,
    doc: &mut SchematicData,
    undo: &mut UndoStack,
    catalog: &ComponentCatalog,
) -> Result<PlacementState, PlacementError> {
    session.live_edit.set_position(doc, pos, false)?;
    undo.append_to_transaction(session.live_edit.clone().into_command(), doc)?;
    undo.commit_transaction()?;

    undo.begin_transaction("Add Symbol to Schematic")?;

    if let Some(gate) = session.variant.next_gate(session.gate_index).cloned() {
        session.gate_index += 1;
        session.live_edit =
            spawn_gate_symbol(session.component, &gate, pos, session.last_angle, doc, undo)?;
        Ok(PlacementState::Placing(session))
    } else {
        // Whole definition placed; the open composite stays empty and is
        // dropped. Chain straight into another instance of the same
        // definition, keeping the accumulated rotation.
        undo.commit_transaction()?;
        start_placement(
            session.definition.clone(),
            session.variant_id.clone(),
            session.last_angle,
            pos,
            doc,
            undo,
            catalog,
        )
    }
}

fn rotate_pending(
    session: &mut PlacementSession,
    delta_deg: i32,
    doc: &mut SchematicData,
) -> Result<(), PlacementError> {
    session.last_angle = normalize_angle(session.last_angle + delta_deg);
    session.live_edit.set_rotation(doc, session.last_angle, true)?;
    Ok(())
}

/// System: drain tool events in arrival order and run them through the state
/// machine, surfacing failures through the editor error dialog.
pub fn process_tool_events(
    mut events: MessageReader<ToolEvent>,
    mut tool: ResMut<PlacementTool>,
    mut doc: ResMut<SchematicData>,
    mut undo_stack: ResMut<UndoStack>,
    catalog: Res<ComponentCatalog>,
    mut editor_error: ResMut<EditorError>,
) {
    for event in events.read() {
        if let Err(e) = tool.handle(event, &mut doc, &mut undo_stack, &catalog) {
            warn!("Placement failed: {}", e);
            editor_error.message = Some(format!("Could not place component:\n\n{}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{builtin_definitions, ComponentDefinition};

    fn catalog() -> ComponentCatalog {
        let mut catalog = ComponentCatalog::default();
        for definition in builtin_definitions() {
            catalog.insert_workspace(definition.clone());
            catalog.insert_project(definition);
        }
        // Three-gate definition used by the multi-click tests.
        let triple = ComponentDefinition {
            id: DefinitionId::new("triple-inverter"),
            name: "Triple Inverter".to_string(),
            prefix: "U".to_string(),
            pads: vec![],
            variants: vec![SymbolVariant {
                id: VariantId::new("default"),
                name: "Three gates".to_string(),
                gates: ["A", "B", "C"]
                    .into_iter()
                    .map(|name| Gate {
                        name: name.to_string(),
                        outline: Vec2::new(100.0, 60.0),
                        pins: vec![],
                    })
                    .collect(),
            }],
        };
        catalog.insert_workspace(triple.clone());
        catalog.insert_project(triple);
        catalog
    }

    struct Fixture {
        tool: PlacementTool,
        doc: SchematicData,
        undo: UndoStack,
        catalog: ComponentCatalog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tool: PlacementTool::default(),
                doc: SchematicData::default(),
                undo: UndoStack::default(),
                catalog: catalog(),
            }
        }

        fn send(&mut self, event: ToolEvent) -> Result<(), PlacementError> {
            self.tool
                .handle(&event, &mut self.doc, &mut self.undo, &self.catalog)
        }

        fn start(&mut self, definition: &str) {
            self.send(ToolEvent::StartPlacement {
                definition: Some((
                    DefinitionId::new(definition),
                    VariantId::new("default"),
                )),
            })
            .unwrap();
        }
    }

    #[test]
    fn test_start_with_definition_enters_placing() {
        let mut fx = Fixture::new();
        fx.start("resistor");
        assert!(fx.tool.session().is_some());
        assert!(fx.undo.is_transaction_open());
        // Component add + first symbol add are in the open transaction.
        assert_eq!(fx.undo.open_len(), Some(2));
        assert_eq!(fx.doc.component_count(), 1);
        assert_eq!(fx.doc.symbol_count(), 1);
        assert_eq!(fx.undo.history_len(), 0);
    }

    #[test]
    fn test_dialog_flow_confirm() {
        let mut fx = Fixture::new();
        fx.send(ToolEvent::StartPlacement { definition: None }).unwrap();
        assert!(fx.tool.is_awaiting_selection());
        assert!(!fx.undo.is_transaction_open());

        fx.send(ToolEvent::SelectionConfirmed {
            definition: DefinitionId::new("dual-opamp"),
            variant: VariantId::new("default"),
        })
        .unwrap();
        assert!(fx.tool.session().is_some());
        assert_eq!(fx.tool.session().unwrap().current_gate(), "A");
    }

    #[test]
    fn test_dialog_cancel_unwinds_silently() {
        let mut fx = Fixture::new();
        fx.send(ToolEvent::StartPlacement { definition: None }).unwrap();
        fx.send(ToolEvent::SelectionCancelled).unwrap();
        assert!(fx.tool.is_idle());
        assert!(!fx.undo.is_transaction_open());
        assert_eq!(fx.undo.history_len(), 0);
        assert_eq!(fx.doc, SchematicData::default());
    }

    #[test]
    fn test_pointer_moves_never_grow_history() {
        let mut fx = Fixture::new();
        fx.start("resistor");
        for i in 0..50 {
            fx.send(ToolEvent::PointerMove {
                pos: Vec2::new(i as f32 * 10.0, 5.0),
            })
            .unwrap();
        }
        assert_eq!(fx.undo.history_len(), 0);
        assert_eq!(fx.undo.open_len(), Some(2));
        // The preview tracked the pointer.
        let symbol = fx.tool.session().unwrap().pending_symbol();
        assert_eq!(
            fx.doc.symbol(symbol).unwrap().placement.position,
            Vec2::new(490.0, 5.0)
        );
    }

    #[test]
    fn test_three_gates_three_clicks_three_undo_steps() {
        let mut fx = Fixture::new();
        let before = fx.doc.clone();
        fx.start("triple-inverter");

        for x in [100.0, 200.0, 300.0] {
            fx.send(ToolEvent::PrimaryClick {
                pos: Vec2::new(x, 0.0),
            })
            .unwrap();
        }
        assert_eq!(fx.undo.history_len(), 3);

        // The tool has already chained into a second instance; drop it.
        fx.send(ToolEvent::ToolDeactivated).unwrap();
        assert_eq!(fx.undo.history_len(), 3);
        assert_eq!(fx.doc.component_count(), 1);
        assert_eq!(fx.doc.symbol_count(), 3);

        for _ in 0..3 {
            fx.undo.undo(&mut fx.doc).unwrap();
        }
        assert_eq!(fx.doc, before);
    }

    #[test]
    fn test_second_gate_continues_same_component() {
        let mut fx = Fixture::new();
        fx.start("dual-opamp");
        let component = fx.tool.session().unwrap().component();

        fx.send(ToolEvent::PrimaryClick {
            pos: Vec2::new(100.0, 0.0),
        })
        .unwrap();
        let session = fx.tool.session().unwrap();
        assert_eq!(session.current_gate(), "B");
        assert_eq!(session.component(), component);
        assert_eq!(fx.undo.history_len(), 1);
        // The next transaction holds only the second gate's symbol add.
        assert_eq!(fx.undo.open_len(), Some(1));
    }

    #[test]
    fn test_chaining_restarts_same_definition() {
        let mut fx = Fixture::new();
        fx.start("resistor");
        let first_component = fx.tool.session().unwrap().component();

        fx.send(ToolEvent::PrimaryClick {
            pos: Vec2::new(100.0, 0.0),
        })
        .unwrap();

        // One committed step for the placed resistor, and a fresh pending
        // instance of the same definition already following the pointer.
        assert_eq!(fx.undo.history_len(), 1);
        let session = fx.tool.session().unwrap();
        assert_eq!(session.definition().as_str(), "resistor");
        assert_ne!(session.component(), first_component);
        assert_eq!(fx.doc.component_count(), 2);

        fx.send(ToolEvent::ToolDeactivated).unwrap();
        assert_eq!(fx.doc.component_count(), 1);
        assert_eq!(
            fx.doc.component(first_component).unwrap().designator,
            "R1"
        );
    }

    #[test]
    fn test_rotate_cw_then_ccw_is_identity() {
        let mut fx = Fixture::new();
        fx.start("resistor");
        let symbol = fx.tool.session().unwrap().pending_symbol();
        let before = fx.doc.symbol(symbol).unwrap().placement.rotation_deg;

        fx.send(ToolEvent::RotateCw).unwrap();
        fx.send(ToolEvent::RotateCcw).unwrap();
        assert_eq!(
            fx.doc.symbol(symbol).unwrap().placement.rotation_deg,
            before
        );
        assert_eq!(fx.tool.session().unwrap().last_angle(), 0);
    }

    #[test]
    fn test_secondary_click_rotates_pending_only() {
        let mut fx = Fixture::new();
        fx.start("resistor");
        let symbol = fx.tool.session().unwrap().pending_symbol();

        fx.send(ToolEvent::SecondaryClick).unwrap();
        assert_eq!(fx.doc.symbol(symbol).unwrap().placement.rotation_deg, 270);
        assert_eq!(fx.undo.history_len(), 0);
        assert_eq!(fx.undo.open_len(), Some(2));
    }

    #[test]
    fn test_rotation_carries_forward_to_next_gate() {
        let mut fx = Fixture::new();
        fx.start("dual-opamp");
        fx.send(ToolEvent::SecondaryClick).unwrap();
        fx.send(ToolEvent::PrimaryClick {
            pos: Vec2::new(100.0, 0.0),
        })
        .unwrap();

        let symbol = fx.tool.session().unwrap().pending_symbol();
        assert_eq!(fx.tool.session().unwrap().current_gate(), "B");
        assert_eq!(fx.doc.symbol(symbol).unwrap().placement.rotation_deg, 270);
    }

    #[test]
    fn test_abort_restarts_same_definition_with_reset_angle() {
        let mut fx = Fixture::new();
        fx.start("dual-opamp");
        fx.send(ToolEvent::SecondaryClick).unwrap();
        let old_symbol = fx.tool.session().unwrap().pending_symbol();

        fx.send(ToolEvent::Abort).unwrap();
        let session = fx.tool.session().unwrap();
        assert_eq!(session.definition().as_str(), "dual-opamp");
        assert_eq!(session.current_gate(), "A");
        assert_eq!(session.last_angle(), 0);
        assert_ne!(session.pending_symbol(), old_symbol);
        // The aborted pending instance is gone; only the restarted one
        // remains.
        assert_eq!(fx.doc.component_count(), 1);
        assert_eq!(fx.doc.symbol_count(), 1);
        assert_eq!(fx.undo.history_len(), 0);
    }

    #[test]
    fn test_abort_from_idle_never_opens_transaction() {
        let mut fx = Fixture::new();
        fx.send(ToolEvent::Abort).unwrap();
        assert!(fx.tool.is_idle());
        assert!(!fx.undo.is_transaction_open());
        assert_eq!(fx.undo.history_len(), 0);
        assert_eq!(fx.doc, SchematicData::default());
    }

    #[test]
    fn test_abort_from_awaiting_selection_returns_to_idle() {
        let mut fx = Fixture::new();
        fx.send(ToolEvent::StartPlacement { definition: None }).unwrap();
        fx.send(ToolEvent::Abort).unwrap();
        assert!(fx.tool.is_idle());
        assert!(!fx.undo.is_transaction_open());
    }

    #[test]
    fn test_deactivate_rolls_back_and_is_idempotent() {
        let mut fx = Fixture::new();
        let before = fx.doc.clone();
        fx.start("quad-nand");
        fx.send(ToolEvent::PointerMove {
            pos: Vec2::new(40.0, 40.0),
        })
        .unwrap();

        fx.send(ToolEvent::ToolDeactivated).unwrap();
        assert!(fx.tool.is_idle());
        assert_eq!(fx.doc, before);
        assert!(!fx.undo.is_transaction_open());

        // A second deactivation must be a clean no-op.
        fx.send(ToolEvent::ToolDeactivated).unwrap();
        assert!(fx.tool.is_idle());
        assert_eq!(fx.doc, before);
    }

    #[test]
    fn test_unknown_definition_fails_to_idle() {
        let mut fx = Fixture::new();
        let result = fx.send(ToolEvent::StartPlacement {
            definition: Some((DefinitionId::new("flux-capacitor"), VariantId::new("default"))),
        });
        assert!(matches!(
            result,
            Err(PlacementError::Lookup(LookupError::NotFound(_)))
        ));
        assert!(fx.tool.is_idle());
        assert!(!fx.undo.is_transaction_open());
        assert_eq!(fx.doc, SchematicData::default());
    }

    #[test]
    fn test_workspace_only_definition_is_not_imported() {
        let mut fx = Fixture::new();
        let exotic = ComponentDefinition {
            id: DefinitionId::new("exotic-mcu"),
            name: "Exotic MCU".to_string(),
            prefix: "U".to_string(),
            pads: vec![],
            variants: vec![SymbolVariant {
                id: VariantId::new("default"),
                name: "Default".to_string(),
                gates: vec![Gate {
                    name: "A".to_string(),
                    outline: Vec2::new(100.0, 100.0),
                    pins: vec![],
                }],
            }],
        };
        fx.catalog.insert_workspace(exotic);

        let result = fx.send(ToolEvent::StartPlacement {
            definition: Some((DefinitionId::new("exotic-mcu"), VariantId::new("default"))),
        });
        assert!(matches!(
            result,
            Err(PlacementError::Lookup(LookupError::NotImported(_)))
        ));
        assert!(fx.tool.is_idle());
        assert_eq!(fx.doc, SchematicData::default());
    }

    #[test]
    fn test_unknown_variant_fails() {
        let mut fx = Fixture::new();
        let result = fx.send(ToolEvent::StartPlacement {
            definition: Some((DefinitionId::new("resistor"), VariantId::new("exotic"))),
        });
        assert!(matches!(
            result,
            Err(PlacementError::Lookup(LookupError::UnknownVariant { .. }))
        ));
        assert!(fx.tool.is_idle());
    }

    #[test]
    fn test_pointer_and_clicks_ignored_while_idle() {
        let mut fx = Fixture::new();
        fx.send(ToolEvent::PointerMove {
            pos: Vec2::new(10.0, 10.0),
        })
        .unwrap();
        fx.send(ToolEvent::PrimaryClick {
            pos: Vec2::new(10.0, 10.0),
        })
        .unwrap();
        fx.send(ToolEvent::RotateCw).unwrap();
        assert!(fx.tool.is_idle());
        assert_eq!(fx.doc, SchematicData::default());
        assert_eq!(fx.undo.history_len(), 0);
    }

    #[test]
    fn test_placement_spawns_at_last_pointer_position() {
        let mut fx = Fixture::new();
        fx.send(ToolEvent::PointerMove {
            pos: Vec2::new(150.0, 250.0),
        })
        .unwrap();
        fx.start("resistor");
        let symbol = fx.tool.session().unwrap().pending_symbol();
        assert_eq!(
            fx.doc.symbol(symbol).unwrap().placement.position,
            Vec2::new(150.0, 250.0)
        );
    }

    #[test]
    fn test_start_while_placing_aborts_pending() {
        let mut fx = Fixture::new();
        fx.start("quad-nand");
        fx.start("resistor");
        assert_eq!(fx.doc.component_count(), 1);
        let session = fx.tool.session().unwrap();
        assert_eq!(session.definition().as_str(), "resistor");
        assert_eq!(fx.undo.history_len(), 0);
    }

    #[test]
    fn test_prompt_follows_state() {
        let mut fx = Fixture::new();
        assert_eq!(fx.tool.prompt(&fx.doc), None);
        fx.send(ToolEvent::StartPlacement { definition: None }).unwrap();
        assert!(fx.tool.prompt(&fx.doc).unwrap().contains("Choose"));
        fx.send(ToolEvent::SelectionConfirmed {
            definition: DefinitionId::new("dual-opamp"),
            variant: VariantId::new("default"),
        })
        .unwrap();
        let prompt = fx.tool.prompt(&fx.doc).unwrap();
        assert!(prompt.contains("gate A"), "prompt was: {}", prompt);
        assert!(prompt.contains("U1"), "prompt was: {}", prompt);
    }
}
