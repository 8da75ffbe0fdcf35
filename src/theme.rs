//! Centralized color theme for the application.
//!
//! This module provides all colors used throughout the editor UI and
//! rendering. Modify values here to change the application's color scheme.

use bevy::prelude::Color;

// ============================================================================
// Grid Colors
// ============================================================================

/// Semi-transparent grey grid lines
pub const GRID_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 0.25);

// ============================================================================
// Symbol Colors
// ============================================================================

/// Placed symbol bodies and pins
pub const SYMBOL_COLOR: Color = Color::srgb(0.85, 0.3, 0.2);

/// The symbol following the pointer during placement
pub const PREVIEW_COLOR: Color = Color::srgba(0.85, 0.3, 0.2, 0.5);

/// Light blue for the selected symbol
pub const SELECTION_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);
