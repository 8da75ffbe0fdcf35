//! Footprint pad primitive and its persisted node format.
//!
//! Pads are stored as labeled JSON nodes inside component definition files.
//! Parsing is strict: unknown shape/side tokens and out-of-range dimensions
//! fail with a format error instead of being coerced.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which board side a pad belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadSide {
    Top,
    Bottom,
    /// Through-hole pad, present on all copper layers.
    Tht,
}

/// Outline shape of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadShape {
    Round,
    Rect,
    Octagon,
}

/// A single footprint pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub id: String,
    pub side: PadSide,
    pub shape: PadShape,
    pub position: Vec2,
    pub rotation_deg: i32,
    pub size: Vec2,
    pub drill: f32,
}

/// Error parsing or validating a pad node.
#[derive(Debug, Error)]
pub enum PadFormatError {
    #[error("invalid pad node: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("pad \"{id}\" has a non-positive size ({width} x {height})")]
    NonPositiveSize { id: String, width: f32, height: f32 },
    #[error("pad \"{id}\" has a negative drill diameter ({drill})")]
    NegativeDrill { id: String, drill: f32 },
    #[error("pad node is missing an identifier")]
    MissingId,
}

#[allow(dead_code)] // node round-trip is the exchange format for pads
impl Pad {
    /// Parse a pad from its JSON node, rejecting invalid geometry.
    pub fn from_node(json: &str) -> Result<Self, PadFormatError> {
        let pad: Pad = serde_json::from_str(json)?;
        pad.validate()?;
        Ok(pad)
    }

    /// Serialize this pad to its JSON node.
    pub fn to_node(&self) -> Result<String, PadFormatError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Check the attribute invariants that the node format guarantees.
    pub fn validate(&self) -> Result<(), PadFormatError> {
        if self.id.is_empty() {
            return Err(PadFormatError::MissingId);
        }
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Err(PadFormatError::NonPositiveSize {
                id: self.id.clone(),
                width: self.size.x,
                height: self.size.y,
            });
        }
        if self.drill < 0.0 {
            return Err(PadFormatError::NegativeDrill {
                id: self.id.clone(),
                drill: self.drill,
            });
        }
        Ok(())
    }
}
