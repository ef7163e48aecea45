use serde::{Deserialize, Serialize};

/// Tunables for the simulation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed for spawning and teleports. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Barrels the players may place between resets (shared pool).
    pub barrel_budget: u32,
    /// Upper bound on bullet advances per shot, for mirror/portal cycles.
    pub max_projectile_steps: u32,
    /// Emit a bullet checkpoint every N advances.
    pub bullet_frame_stride: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            barrel_budget: 5,
            max_projectile_steps: 4096,
            bullet_frame_stride: 2,
        }
    }
}

impl EngineConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("TANKS_ENGINE_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
        {
            match toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path, error = %e, "Failed to parse engine config"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/engine.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}
