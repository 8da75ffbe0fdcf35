//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels (also used for grid viewport calculations)
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels (also used for grid viewport calculations)
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Default grid interval of a new schematic, in sheet units
pub const DEFAULT_GRID_INTERVAL: f32 = 50.0;

/// Rotation step applied by rotate events during placement, in degrees
pub const ROTATION_STEP_DEG: i32 = 90;

/// Maximum number of recent schematics to remember in config
pub const MAX_RECENT_SCHEMATICS: usize = 5;
