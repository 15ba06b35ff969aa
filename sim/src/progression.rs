//! XP grants and stat level-ups.

use log::{debug, info, warn};
use rpg_shared::{
    xp_needed_for_level, DifficultySettings, GameEvent, PlayerStatsSnapshot, StatBlock, StatName,
    MAX_STAT_LEVEL,
};

use crate::entities::Character;
use crate::events::EventBus;

/// Result of applying XP to a stat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpGrant {
    /// XP actually added after the difficulty multiplier
    pub granted: u32,
    /// Every level reached during this grant, in order
    pub levels_gained: Vec<u32>,
}

/// Scale a raw award by the XP multiplier. Any award of at least 1 yields at least 1.
pub fn scaled_xp(raw: f64, xp_mult: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let mut granted = (raw * xp_mult).floor();
    if raw >= 1.0 && granted < 1.0 {
        granted = 1.0;
    }
    if !granted.is_finite() || granted <= 0.0 {
        return 0;
    }
    granted.min(u32::MAX as f64) as u32
}

/// Add XP to one stat of `stats`, levelling up as many times as it covers.
/// Returns `None` when the award scales to nothing.
pub fn apply_xp(stats: &mut StatBlock, stat: StatName, raw: f64, xp_mult: f64) -> Option<XpGrant> {
    let granted = scaled_xp(raw, xp_mult);
    if granted == 0 {
        return None;
    }

    let progress = stats.get_mut(stat);
    let mut levels_gained = Vec::new();

    if progress.level >= MAX_STAT_LEVEL {
        let cap = xp_needed_for_level(MAX_STAT_LEVEL);
        progress.xp = progress.xp.saturating_add(granted).min(cap);
        progress.next = cap;
        return Some(XpGrant { granted, levels_gained });
    }

    progress.xp = progress.xp.saturating_add(granted);
    while progress.level < MAX_STAT_LEVEL && progress.next > 0 && progress.xp >= progress.next {
        progress.xp -= progress.next;
        progress.level += 1;
        if progress.level < MAX_STAT_LEVEL {
            progress.next = xp_needed_for_level(progress.level + 1);
        } else {
            progress.next = xp_needed_for_level(MAX_STAT_LEVEL);
            progress.xp = progress.xp.min(progress.next);
        }
        levels_gained.push(progress.level);
    }

    Some(XpGrant { granted, levels_gained })
}

/// Snapshot of the player-facing vitals and stats.
pub fn stats_snapshot(character: &Character) -> PlayerStatsSnapshot {
    PlayerStatsSnapshot {
        health: character.health,
        max_health: character.max_health,
        gold: character.player().map_or(0, |player| player.gold),
        stats: character.stats.clone(),
    }
}

/// Grant XP to a character and publish level-ups and the refreshed stats.
/// Endurance level-ups raise a player's max health and heal by the same amount.
pub fn grant_xp(
    character: &mut Character,
    stat: StatName,
    raw: f64,
    difficulty: &DifficultySettings,
    events: &mut EventBus,
) -> Option<XpGrant> {
    let Some(grant) = apply_xp(&mut character.stats, stat, raw, difficulty.xp_mult) else {
        debug!("Ignoring {} XP award of {} for {}", stat.name(), raw, character.name);
        return None;
    };

    let is_player = character.player().is_some();
    for level in &grant.levels_gained {
        info!("{} reached {} level {}", character.name, stat.name(), level);
        if is_player {
            events.emit(GameEvent::StatLeveledUp { stat, level: *level });
        }
    }

    if is_player {
        if stat == StatName::Endurance && !grant.levels_gained.is_empty() {
            character.sync_max_health();
        }
        events.emit(GameEvent::StatsChanged(stats_snapshot(character)));
    }

    Some(grant)
}

/// Name-based variant for callers holding a stat name string.
pub fn grant_xp_by_name(
    character: &mut Character,
    stat_name: &str,
    raw: f64,
    difficulty: &DifficultySettings,
    events: &mut EventBus,
) -> Option<XpGrant> {
    match StatName::from_name(stat_name) {
        Some(stat) => grant_xp(character, stat, raw, difficulty, events),
        None => {
            warn!("Unknown stat '{}', ignoring XP award", stat_name);
            None
        }
    }
}
