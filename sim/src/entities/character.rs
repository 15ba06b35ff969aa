//! Characters: the player, NPCs and choppable trees share one model.

use rpg_shared::{CharacterKind, EntityId, Equipment, StatBlock, StatName};

use super::npc::{BanditState, Brain, VillagerState};
use super::player::PlayerState;
use crate::combat::knockback::Knockback;
use crate::physics::{Circle, Vec2};

/// Collision radius of every walking character
pub const CHARACTER_RADIUS: f32 = 20.0;

/// Collision radius of a tree trunk
pub const TREE_TRUNK_RADIUS: f32 = 12.5;

pub const BASE_CHARACTER_HEALTH: u32 = 50;
pub const HEALTH_PER_ENDURANCE: u32 = 5;

pub const BASE_TREE_HEALTH: u32 = 20;
pub const TREE_HEALTH_PER_ENDURANCE: u32 = 3;
pub const TREE_ENDURANCE: u32 = 5;

/// Max health of a walking character for an endurance level
pub fn max_health_for(endurance_level: u32) -> u32 {
    BASE_CHARACTER_HEALTH + endurance_level.max(1) * HEALTH_PER_ENDURANCE
}

/// Max health of a tree for an endurance level
pub fn tree_health_for(endurance_level: u32) -> u32 {
    BASE_TREE_HEALTH + endurance_level * TREE_HEALTH_PER_ENDURANCE
}

/// Kind-specific state
#[derive(Debug, Clone)]
pub enum Role {
    Player(Box<PlayerState>),
    Bandit(BanditState),
    Villager(VillagerState),
    Tree,
}

/// A simulated character
#[derive(Debug, Clone)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Last non-zero direction the character faced
    pub facing: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub stats: StatBlock,
    /// Inactive characters are defeated or dead and take no part in the tick
    pub active: bool,
    /// Simulation time at which a defeated character is removed
    pub remove_at: Option<u64>,
    pub speed: f32,
    pub slow_speed: f32,
    pub in_water: bool,
    pub knockback: Option<Knockback>,
    pub role: Role,
}

impl Character {
    pub fn kind(&self) -> CharacterKind {
        match self.role {
            Role::Player(_) => CharacterKind::Player,
            Role::Bandit(_) => CharacterKind::Bandit,
            Role::Villager(_) => CharacterKind::Villager,
            Role::Tree => CharacterKind::Tree,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.active && self.health > 0
    }

    pub fn equipment(&self) -> Option<&Equipment> {
        match &self.role {
            Role::Player(player) => Some(&player.equipment),
            Role::Bandit(bandit) => Some(&bandit.equipment),
            _ => None,
        }
    }

    pub fn player(&self) -> Option<&PlayerState> {
        match &self.role {
            Role::Player(player) => Some(player.as_ref()),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.role {
            Role::Player(player) => Some(player.as_mut()),
            _ => None,
        }
    }

    pub fn brain(&self) -> Option<&Brain> {
        match &self.role {
            Role::Bandit(bandit) => Some(&bandit.brain),
            Role::Villager(villager) => Some(&villager.brain),
            _ => None,
        }
    }

    pub fn brain_mut(&mut self) -> Option<&mut Brain> {
        match &mut self.role {
            Role::Bandit(bandit) => Some(&mut bandit.brain),
            Role::Villager(villager) => Some(&mut villager.brain),
            _ => None,
        }
    }

    pub fn radius(&self) -> f32 {
        match self.role {
            Role::Tree => TREE_TRUNK_RADIUS,
            _ => CHARACTER_RADIUS,
        }
    }

    pub fn body(&self) -> Circle {
        Circle::at(self.position, self.radius())
    }

    /// Movement speed, slowed while wading through water.
    pub fn current_speed(&self) -> f32 {
        if self.in_water {
            self.slow_speed
        } else {
            self.speed
        }
    }

    /// Subtract `amount` from health, flooring at zero. Returns the new health.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Heal up to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_health.saturating_sub(self.health));
        self.health += restored;
        restored
    }

    /// Raise max health to match the endurance level, keeping the damage taken.
    pub fn sync_max_health(&mut self) {
        if matches!(self.role, Role::Tree) {
            return;
        }
        let new_max = max_health_for(self.stats.level(StatName::Endurance));
        if new_max > self.max_health {
            self.health += new_max - self.max_health;
        }
        self.max_health = new_max;
        self.health = self.health.min(self.max_health);
    }

    /// Take the character out of play and schedule its removal.
    pub fn deactivate(&mut self, remove_at: Option<u64>) {
        self.active = false;
        self.velocity = Vec2::ZERO;
        self.knockback = None;
        self.remove_at = remove_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_formulas() {
        assert_eq!(max_health_for(1), 55);
        assert_eq!(max_health_for(3), 65);
        assert_eq!(max_health_for(0), 55);
        assert_eq!(tree_health_for(TREE_ENDURANCE), 35);
    }
}
