//! Gizmo rendering of the schematic sheet.
//!
//! Symbols are drawn straight from the document every frame: body outline,
//! pin stubs, and a designator tick. The pending placement and the current
//! selection get their own tint.

use bevy::prelude::*;

use crate::library::ComponentCatalog;
use crate::schematic::{SchematicData, SymbolId, SymbolInstance};
use crate::theme;

use super::placement::PlacementTool;
use super::selection::{symbol_outline, SelectedSymbol};

/// Pin stub length in sheet units.
const PIN_STUB: f32 = 15.0;

pub fn draw_symbols(
    mut gizmos: Gizmos,
    doc: Res<SchematicData>,
    catalog: Res<ComponentCatalog>,
    tool: Res<PlacementTool>,
    selected: Res<SelectedSymbol>,
) {
    let pending = tool.session().map(|s| s.pending_symbol());

    for (id, symbol) in doc.symbols() {
        let color = symbol_color(id, symbol, pending, &selected);
        draw_symbol(&mut gizmos, &doc, &catalog, symbol, color);
    }
}

fn symbol_color(
    id: SymbolId,
    _symbol: &SymbolInstance,
    pending: Option<SymbolId>,
    selected: &SelectedSymbol,
) -> Color {
    if pending == Some(id) {
        theme::PREVIEW_COLOR
    } else if selected.symbol == Some(id) {
        theme::SELECTION_COLOR
    } else {
        theme::SYMBOL_COLOR
    }
}

fn draw_symbol(
    gizmos: &mut Gizmos,
    doc: &SchematicData,
    catalog: &ComponentCatalog,
    symbol: &SymbolInstance,
    color: Color,
) {
    let outline = symbol_outline(doc, catalog, symbol);
    let placement = symbol.placement;
    let half = outline / 2.0;

    // Body rectangle, rotated with the placement.
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|corner| placement.transform_point(corner));
    for i in 0..4 {
        gizmos.line_2d(corners[i], corners[(i + 1) % 4], color);
    }

    // Pin stubs pointing away from the body.
    let pins = doc
        .component(symbol.component)
        .and_then(|component| catalog.resolve(&component.definition).ok())
        .and_then(|definition| {
            let component = doc.component(symbol.component)?;
            definition.variant(&component.variant)
        })
        .and_then(|variant| variant.gates.iter().find(|g| g.name == symbol.gate))
        .map(|gate| gate.pins.clone())
        .unwrap_or_default();
    for pin in pins {
        let direction = if pin.x.abs() >= pin.y.abs() {
            Vec2::new(pin.x.signum() * PIN_STUB, 0.0)
        } else {
            Vec2::new(0.0, pin.y.signum() * PIN_STUB)
        };
        gizmos.line_2d(
            placement.transform_point(pin),
            placement.transform_point(pin + direction),
            color,
        );
    }

    // Small origin cross so rotation is readable even for square bodies.
    let tick = 5.0;
    gizmos.line_2d(
        placement.transform_point(Vec2::new(-tick, 0.0)),
        placement.transform_point(Vec2::new(tick, 0.0)),
        color,
    );
    gizmos.line_2d(
        placement.transform_point(Vec2::new(0.0, -tick)),
        placement.transform_point(Vec2::new(0.0, tick)),
        color,
    );
}
