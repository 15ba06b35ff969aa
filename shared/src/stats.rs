//! Character stats and the XP curve.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Highest level any stat can reach
pub const MAX_STAT_LEVEL: u32 = 100;

/// The eight trainable stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatName {
    Might,
    Endurance,
    Agility,
    Stealth,
    Persuasion,
    Fraud,
    Logic,
    Observation,
}

impl StatName {
    pub const ALL: [StatName; 8] = [
        StatName::Might,
        StatName::Endurance,
        StatName::Agility,
        StatName::Stealth,
        StatName::Persuasion,
        StatName::Fraud,
        StatName::Logic,
        StatName::Observation,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Might => "might",
            Self::Endurance => "endurance",
            Self::Agility => "agility",
            Self::Stealth => "stealth",
            Self::Persuasion => "persuasion",
            Self::Fraud => "fraud",
            Self::Logic => "logic",
            Self::Observation => "observation",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|stat| stat.name().eq_ignore_ascii_case(name.trim()))
    }
}

static XP_TABLE: OnceLock<[u32; MAX_STAT_LEVEL as usize + 1]> = OnceLock::new();

/// Cumulative XP per level, indexed by level. Index 0 is unused.
fn xp_table() -> &'static [u32; MAX_STAT_LEVEL as usize + 1] {
    XP_TABLE.get_or_init(|| {
        let mut table = [0u32; MAX_STAT_LEVEL as usize + 1];
        let mut total: u64 = 0;
        for level in 1..MAX_STAT_LEVEL {
            let level_xp = (level as f64 + 300.0 * 2f64.powf(level as f64 / 7.0)).floor() as u64;
            total += level_xp;
            table[level as usize + 1] = (total / 4) as u32;
        }
        table
    })
}

/// Cumulative XP for `level`, clamped to 1..=100.
pub fn xp_for_level(level: u32) -> u32 {
    xp_table()[level.clamp(1, MAX_STAT_LEVEL) as usize]
}

/// XP needed to go from `target - 1` to `target`. Zero outside 2..=100.
pub fn xp_needed_for_level(target: u32) -> u32 {
    if target <= 1 || target > MAX_STAT_LEVEL {
        return 0;
    }
    xp_for_level(target) - xp_for_level(target - 1)
}

/// Level plus progress toward the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatProgress {
    pub level: u32,
    /// XP accumulated within the current level
    pub xp: u32,
    /// XP required to reach the next level
    pub next: u32,
}

impl StatProgress {
    pub fn at_level(level: u32) -> Self {
        let level = level.clamp(1, MAX_STAT_LEVEL);
        let next = if level < MAX_STAT_LEVEL {
            xp_needed_for_level(level + 1)
        } else {
            xp_needed_for_level(MAX_STAT_LEVEL)
        };
        Self { level, xp: 0, next }
    }
}

impl Default for StatProgress {
    fn default() -> Self {
        Self::at_level(1)
    }
}

/// All eight stats of a character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    stats: [StatProgress; 8],
}

impl StatBlock {
    /// Every stat at level 1 except the given overrides.
    pub fn with_levels(levels: &[(StatName, u32)]) -> Self {
        let mut block = Self::default();
        for (stat, level) in levels {
            *block.get_mut(*stat) = StatProgress::at_level(*level);
        }
        block
    }

    pub fn get(&self, stat: StatName) -> &StatProgress {
        &self.stats[stat.index()]
    }

    pub fn get_mut(&mut self, stat: StatName) -> &mut StatProgress {
        &mut self.stats[stat.index()]
    }

    pub fn level(&self, stat: StatName) -> u32 {
        self.get(stat).level
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatName, &StatProgress)> {
        StatName::ALL.iter().map(move |stat| (*stat, self.get(*stat)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_curve_anchors() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 83);
        assert_eq!(xp_needed_for_level(2), 83);
        assert_eq!(xp_needed_for_level(1), 0);
        assert_eq!(xp_needed_for_level(101), 0);
        assert_eq!(xp_for_level(0), xp_for_level(1));
        assert_eq!(xp_for_level(250), xp_for_level(100));
    }

    #[test]
    fn test_xp_curve_is_increasing() {
        for level in 2..=MAX_STAT_LEVEL {
            assert!(xp_for_level(level) > xp_for_level(level - 1));
        }
    }

    #[test]
    fn test_stat_name_parse() {
        assert_eq!(StatName::from_name("might"), Some(StatName::Might));
        assert_eq!(StatName::from_name("Endurance"), Some(StatName::Endurance));
        assert_eq!(StatName::from_name("charisma"), None);
    }

    #[test]
    fn test_with_levels() {
        let stats = StatBlock::with_levels(&[(StatName::Might, 3), (StatName::Endurance, 5)]);
        assert_eq!(stats.level(StatName::Might), 3);
        assert_eq!(stats.level(StatName::Endurance), 5);
        assert_eq!(stats.level(StatName::Logic), 1);
        assert_eq!(stats.get(StatName::Might).next, xp_needed_for_level(4));
    }
}
