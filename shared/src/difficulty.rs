//! Difficulty presets.

use serde::{Deserialize, Serialize};

/// Named difficulty level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "EASY" => Some(Self::Easy),
            "NORMAL" => Some(Self::Normal),
            "HARD" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn settings(&self) -> DifficultySettings {
        match self {
            Self::Easy => DifficultySettings {
                enemy_health_mult: 0.75,
                enemy_damage_mult: 0.75,
                player_damage_mult: 1.25,
                xp_mult: 1.2,
            },
            Self::Normal => DifficultySettings::default(),
            Self::Hard => DifficultySettings {
                enemy_health_mult: 1.5,
                enemy_damage_mult: 1.25,
                player_damage_mult: 0.85,
                xp_mult: 0.9,
            },
        }
    }
}

/// Multipliers applied by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub enemy_health_mult: f64,
    pub enemy_damage_mult: f64,
    pub player_damage_mult: f64,
    pub xp_mult: f64,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            enemy_health_mult: 1.0,
            enemy_damage_mult: 1.0,
            player_damage_mult: 1.0,
            xp_mult: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Difficulty::Normal.settings(), DifficultySettings::default());
        assert_eq!(Difficulty::Hard.settings().enemy_health_mult, 1.5);
        assert_eq!(Difficulty::Easy.settings().player_damage_mult, 1.25);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Difficulty::from_name("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name(" EASY "), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name("nightmare"), None);
    }
}
