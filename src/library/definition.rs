use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schematic::{Pad, PadFormatError};

/// Identifier of a component definition in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(String);

impl DefinitionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a symbol variant within a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One placeable gate of a symbol variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Gate suffix shown next to the designator ("A" in "U1A").
    pub name: String,
    /// Body outline size in sheet units, centered on the placement position.
    pub outline: Vec2,
    /// Pin stub offsets in symbol-local coordinates.
    #[serde(default)]
    pub pins: Vec<Vec2>,
}

/// An ordered set of gates forming one way to draw a component.
///
/// Gates are placed in list order; the sequence is restartable, so placing
/// another instance of the same definition starts over at the first gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolVariant {
    pub id: VariantId,
    pub name: String,
    pub gates: Vec<Gate>,
}

impl SymbolVariant {
    pub fn first_gate(&self) -> Option<&Gate> {
        self.gates.first()
    }

    /// The gate following `index`, if any.
    pub fn next_gate(&self, index: usize) -> Option<&Gate> {
        self.gates.get(index + 1)
    }
}

/// A component definition from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub id: DefinitionId,
    pub name: String,
    /// Designator prefix ("R" for resistors, "U" for ICs).
    pub prefix: String,
    /// Footprint pads carried by the definition for the board side of the
    /// flow. Validated on load; not used by schematic placement itself.
    #[serde(default)]
    pub pads: Vec<Pad>,
    pub variants: Vec<SymbolVariant>,
}

/// Error loading a component definition file.
#[derive(Debug, Error)]
pub enum DefinitionFormatError {
    #[error("invalid definition file: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("definition \"{id}\" declares no symbol variants")]
    NoVariants { id: DefinitionId },
    #[error("definition \"{id}\": {source}")]
    InvalidPad {
        id: DefinitionId,
        source: PadFormatError,
    },
}

impl ComponentDefinition {
    /// Parse a definition from JSON and validate its pads.
    pub fn from_json(json: &str) -> Result<Self, DefinitionFormatError> {
        let definition: ComponentDefinition = serde_json::from_str(json)?;
        if definition.variants.is_empty() {
            return Err(DefinitionFormatError::NoVariants {
                id: definition.id.clone(),
            });
        }
        for pad in &definition.pads {
            pad.validate().map_err(|source| DefinitionFormatError::InvalidPad {
                id: definition.id.clone(),
                source,
            })?;
        }
        Ok(definition)
    }

    pub fn variant(&self, id: &VariantId) -> Option<&SymbolVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// The variant used when none is specified explicitly.
    pub fn default_variant(&self) -> Option<&SymbolVariant> {
        self.variants.first()
    }
}
