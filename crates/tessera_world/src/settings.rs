use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tessera_shared::worldgen::StrataLayers;
use tracing::warn;

pub const SETTINGS_FILE: &str = "world.toml";

const MIN_RENDER_DISTANCE: u32 = 1;
const MAX_RENDER_DISTANCE: u32 = 16;
const MIN_REACH: f32 = 0.5;
const MAX_REACH: f32 = 64.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "default_world_dir")]
    pub world_dir: PathBuf,
    #[serde(default = "default_render_distance")]
    pub render_distance: u32,
    #[serde(default)]
    pub world_center: Vec3,
    #[serde(default = "default_reach")]
    pub reach: f32,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default)]
    pub strata: StrataLayers,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            world_dir: default_world_dir(),
            render_distance: default_render_distance(),
            world_center: Vec3::ZERO,
            reach: default_reach(),
            worker_threads: None,
            gravity: default_gravity(),
            strata: StrataLayers::default(),
        }
    }
}

impl WorldSettings {
    pub fn chunk_dir(&self) -> PathBuf {
        self.world_dir.join("chunks")
    }

    pub fn sanitize(mut self) -> Self {
        self.render_distance = self
            .render_distance
            .clamp(MIN_RENDER_DISTANCE, MAX_RENDER_DISTANCE);
        self.reach = if self.reach.is_finite() {
            self.reach.clamp(MIN_REACH, MAX_REACH)
        } else {
            default_reach()
        };
        if !self.gravity.is_finite() {
            self.gravity = default_gravity();
        }
        if !self.world_center.is_finite() {
            self.world_center = Vec3::ZERO;
        }
        self.worker_threads = self.worker_threads.filter(|count| *count > 0);
        self
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let parsed = toml::from_str::<Self>(&contents).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to deserialize world settings: {e}"),
            )
        })?;
        Ok(parsed.sanitize())
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let settings = self.clone().sanitize();
        let serialized = toml::to_string_pretty(&settings).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize world settings: {e}"),
            )
        })?;
        fs::write(path, serialized)
    }

    /// Loads `path`, falling back to defaults (and writing them out) when the
    /// file is missing or unreadable.
    pub fn load_or_create(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to load world settings from {}: {err}", path.display());
                }
                let settings = Self::default();
                if let Err(save_err) = settings.save(path) {
                    warn!(
                        "Failed to write default world settings to {}: {save_err}",
                        path.display()
                    );
                }
                settings
            }
        }
    }
}

fn default_world_dir() -> PathBuf {
    PathBuf::from("_world")
}

fn default_render_distance() -> u32 {
    4
}

fn default_reach() -> f32 {
    5.0
}

fn default_gravity() -> f32 {
    -10.0
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use glam::Vec3;
    use tessera_shared::worldgen::StrataLayers;

    use super::WorldSettings;

    fn test_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tessera-settings-{name}-{}.toml", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: WorldSettings = toml::from_str("render_distance = 2\n").expect("parse settings");
        assert_eq!(parsed.render_distance, 2);
        assert_eq!(parsed.reach, 5.0);
        assert_eq!(parsed.gravity, -10.0);
        assert_eq!(parsed.world_center, Vec3::ZERO);
        assert_eq!(parsed.strata, StrataLayers::default());
        assert_eq!(parsed.chunk_dir(), PathBuf::from("_world").join("chunks"));
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let settings = WorldSettings {
            render_distance: 0,
            reach: f32::NAN,
            worker_threads: Some(0),
            ..WorldSettings::default()
        }
        .sanitize();
        assert_eq!(settings.render_distance, 1);
        assert_eq!(settings.reach, 5.0);
        assert_eq!(settings.worker_threads, None);

        let far = WorldSettings {
            render_distance: 400,
            ..WorldSettings::default()
        }
        .sanitize();
        assert_eq!(far.render_distance, 16);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = test_file("round-trip");
        let settings = WorldSettings {
            render_distance: 3,
            world_center: Vec3::new(40.0, 12.0, -8.0),
            worker_threads: Some(2),
            strata: StrataLayers {
                stone: 5,
                dirt: 2,
                grass: 1,
            },
            ..WorldSettings::default()
        };
        settings.save(&path).expect("save settings");
        let loaded = WorldSettings::load(&path).expect("load settings");
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_create_writes_defaults() {
        let path = test_file("create");
        let settings = WorldSettings::load_or_create(&path);
        assert_eq!(settings, WorldSettings::default());
        assert!(path.exists());

        fs::write(&path, "render_distance = \"far\"").expect("write broken settings");
        assert_eq!(WorldSettings::load_or_create(&path), WorldSettings::default());
        let _ = fs::remove_file(&path);
    }
}
