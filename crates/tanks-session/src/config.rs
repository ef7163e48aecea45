use serde::{Deserialize, Serialize};

use tanks_core::{Layout, map};
use tanks_engine::config::EngineConfig;

use crate::error::SessionError;

/// Session configuration, loaded from `tanks.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Map file to play on. The built-in arena is used when unset.
    pub map: Option<String>,
    /// Hold queued actions after a hit until the players acknowledge it.
    pub require_hit_ack: bool,
    /// Actions a player may have waiting before further input is dropped.
    pub max_queued_per_player: usize,
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map: None,
            require_hit_ack: true,
            max_queued_per_player: 2,
            engine: EngineConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults, with the engine section taken from its own config file.
    fn with_engine_defaults() -> Self {
        Self {
            engine: EngineConfig::load(),
            ..Self::default()
        }
    }

    /// Load `tanks.toml` if present, then apply environment overrides.
    ///
    /// Without a usable `tanks.toml` the engine settings come from
    /// [`EngineConfig::load`].
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("tanks.toml") {
            Ok(content) => match toml::from_str::<SessionConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from tanks.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse tanks.toml: {e}, using defaults");
                    Self::with_engine_defaults()
                },
            },
            Err(_) => {
                tracing::info!("No tanks.toml found, using defaults");
                Self::with_engine_defaults()
            },
        };

        if let Ok(map) = std::env::var("TANKS_MAP")
            && !map.is_empty()
        {
            config.map = Some(map);
        }
        if let Ok(seed) = std::env::var("TANKS_SEED")
            && !seed.is_empty()
        {
            match seed.parse::<u64>() {
                Ok(seed) => config.engine.seed = Some(seed),
                Err(e) => tracing::warn!(seed = %seed, error = %e, "Ignoring invalid TANKS_SEED"),
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.max_queued_per_player == 0 {
            return Err(SessionError::Config(
                "max_queued_per_player must be at least 1".into(),
            ));
        }
        if self.engine.bullet_frame_stride == 0 {
            return Err(SessionError::Config(
                "engine.bullet_frame_stride must be at least 1".into(),
            ));
        }
        if self.engine.max_projectile_steps == 0 {
            return Err(SessionError::Config(
                "engine.max_projectile_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The configured map, or the built-in arena.
    pub fn layout(&self) -> Result<Layout, SessionError> {
        match &self.map {
            Some(path) => Ok(map::load_layout(path)?),
            None => Ok(Layout::builtin()),
        }
    }
}
