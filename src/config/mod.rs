use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::MAX_RECENT_SCHEMATICS;
use crate::schematic::CurrentSchematicFile;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfigData {
    /// Last opened schematic file path (remembered for quick access)
    #[serde(default)]
    pub last_schematic_path: Option<PathBuf>,

    /// Recently opened schematics
    #[serde(default)]
    pub recent_schematics: Vec<PathBuf>,
}

impl AppConfigData {
    /// Record a schematic path as most recently used.
    pub fn remember_schematic(&mut self, path: PathBuf) {
        self.recent_schematics.retain(|p| p != &path);
        self.recent_schematics.insert(0, path.clone());
        self.recent_schematics.truncate(MAX_RECENT_SCHEMATICS);
        self.last_schematic_path = Some(path);
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Load configuration from disk, falling back to defaults on any error.
fn load_config() -> AppConfig {
    let config_path = crate::paths::config_file();

    let data = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    data
                }
                Err(e) => {
                    warn!("Failed to parse config file, using defaults: {}", e);
                    AppConfigData::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file, using defaults: {}", e);
                AppConfigData::default()
            }
        }
    } else {
        info!("No config file found, using defaults");
        AppConfigData::default()
    };

    AppConfig {
        data,
        config_path,
        dirty: false,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(mut config: ResMut<AppConfig>) {
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create application directories: {}", e);
    }
    *config = load_config();
}

/// System to save config when requested
fn save_config_system(mut events: MessageReader<SaveConfigRequest>, mut config: ResMut<AppConfig>) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// Tracks the open schematic file into the recent list.
fn track_current_schematic(
    current_file: Res<CurrentSchematicFile>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    let Some(path) = current_file.path.clone() else {
        return;
    };
    if config.data.last_schematic_path.as_ref() == Some(&path) {
        return;
    }
    config.data.remember_schematic(path);
    config.dirty = true;
    save_events.write(SaveConfigRequest);
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .add_message::<SaveConfigRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    track_current_schematic
                        .run_if(resource_changed::<CurrentSchematicFile>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                ),
            );
    }
}
