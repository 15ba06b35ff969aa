//! Session configuration.
//!
//! Loaded from an optional JSON file; every field falls back to its default.
//! `RPG_DIFFICULTY` overrides the difficulty preset.

use std::path::Path;

use log::{info, warn};
use rpg_shared::{Difficulty, DEFAULT_TICK_RATE};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Environment variable overriding the difficulty preset
pub const DIFFICULTY_ENV: &str = "RPG_DIFFICULTY";

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "sim.json";

/// World size and population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub trees: usize,
    pub water_pools: usize,
    pub bandits: usize,
    pub villagers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 2000.0,
            trees: 100,
            water_pools: 25,
            bandits: 5,
            villagers: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub difficulty: Difficulty,
    /// RNG seed; random when absent
    pub seed: Option<u64>,
    pub tick_rate: u32,
    /// Length of a headless session in seconds
    pub session_secs: u64,
    pub world: WorldConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: None,
            tick_rate: DEFAULT_TICK_RATE,
            session_secs: 30,
            world: WorldConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| SimError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load config, falling back to defaults if the file is missing or broken.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Apply `RPG_DIFFICULTY` if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(DIFFICULTY_ENV) {
            self.apply_difficulty_override(&value);
        }
    }

    fn apply_difficulty_override(&mut self, value: &str) {
        match Difficulty::from_name(value) {
            Some(difficulty) => {
                info!("Difficulty overridden to {} by {}", difficulty.name(), DIFFICULTY_ENV);
                self.difficulty = difficulty;
            }
            None => warn!("Ignoring unknown {} value '{}'", DIFFICULTY_ENV, value),
        }
    }

    /// Milliseconds per tick.
    pub fn tick_ms(&self) -> u64 {
        1000 / u64::from(self.tick_rate.max(1))
    }
}
