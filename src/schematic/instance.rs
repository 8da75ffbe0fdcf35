use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::library::{DefinitionId, VariantId};

/// Identifier for a component instance in the schematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

/// Identifier for a symbol instance in the schematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Position and orientation of a symbol on the sheet.
///
/// Rotation is stored in whole degrees, normalized to [0, 360). Interactive
/// editing only produces 90-degree steps, but the document accepts any
/// normalized angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec2,
    pub rotation_deg: i32,
}

impl Placement {
    pub fn new(position: Vec2, rotation_deg: i32) -> Self {
        Self {
            position,
            rotation_deg: normalize_angle(rotation_deg),
        }
    }

    pub fn with_position(self, position: Vec2) -> Self {
        Self { position, ..self }
    }

    pub fn with_rotation(self, rotation_deg: i32) -> Self {
        Self {
            rotation_deg: normalize_angle(rotation_deg),
            ..self
        }
    }

    /// Transform a point from symbol-local coordinates to sheet coordinates.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        let angle = (self.rotation_deg as f32).to_radians();
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        Vec2::new(
            local.x * cos_a - local.y * sin_a,
            local.x * sin_a + local.y * cos_a,
        ) + self.position
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation_deg: 0,
        }
    }
}

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_angle(deg: i32) -> i32 {
    deg.rem_euclid(360)
}

/// One instance of a catalog component in the circuit.
///
/// A component instance owns an identity (designator) but no geometry; its
/// geometry lives in the symbol instances placed for each of its gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub definition: DefinitionId,
    pub variant: VariantId,
    pub designator: String,
}

/// One placed gate symbol on the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInstance {
    pub component: ComponentId,
    pub gate: String,
    pub placement: Placement,
}
