use bevy::prelude::*;

use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::schematic::SchematicData;
use crate::theme;

use super::camera::{CameraZoom, EditorCamera};

#[derive(Resource)]
pub struct GridSettings {
    pub visible: bool,
    pub snap_enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            snap_enabled: true,
        }
    }
}

/// Snap a sheet position to the nearest grid intersection.
///
/// Symbols sit on grid crossings so their pins line up with wires, unlike a
/// cell-center snap.
pub fn snap_to_grid(position: Vec2, grid_interval: f32, snap_enabled: bool) -> Vec2 {
    if !snap_enabled || grid_interval <= 0.0 {
        return position;
    }
    Vec2::new(
        (position.x / grid_interval).round() * grid_interval,
        (position.y / grid_interval).round() * grid_interval,
    )
}

pub fn draw_grid(
    mut gizmos: Gizmos,
    grid_settings: Res<GridSettings>,
    doc: Res<SchematicData>,
    camera_query: Query<(&Transform, &CameraZoom), With<EditorCamera>>,
) {
    if !grid_settings.visible {
        return;
    }

    let Ok((camera_transform, zoom)) = camera_query.single() else {
        return;
    };

    let grid_interval = doc.grid_interval;
    if grid_interval <= 0.0 {
        return;
    }

    let view_width = DEFAULT_WINDOW_WIDTH * zoom.scale;
    let view_height = DEFAULT_WINDOW_HEIGHT * zoom.scale;
    let camera_pos = camera_transform.translation.truncate();

    let start_x = ((camera_pos.x - view_width / 2.0) / grid_interval).floor() as i32;
    let end_x = ((camera_pos.x + view_width / 2.0) / grid_interval).ceil() as i32;
    let start_y = ((camera_pos.y - view_height / 2.0) / grid_interval).floor() as i32;
    let end_y = ((camera_pos.y + view_height / 2.0) / grid_interval).ceil() as i32;

    for x in start_x..=end_x {
        let x_pos = x as f32 * grid_interval;
        gizmos.line_2d(
            Vec2::new(x_pos, start_y as f32 * grid_interval),
            Vec2::new(x_pos, end_y as f32 * grid_interval),
            theme::GRID_COLOR,
        );
    }

    for y in start_y..=end_y {
        let y_pos = y as f32 * grid_interval;
        gizmos.line_2d(
            Vec2::new(start_x as f32 * grid_interval, y_pos),
            Vec2::new(end_x as f32 * grid_interval, y_pos),
            theme::GRID_COLOR,
        );
    }
}
