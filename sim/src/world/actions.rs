//! Player actions and the combat they set off.

use log::{debug, info, trace, warn};
use rpg_shared::{CharacterKind, EntityId, GameEvent, HandSlot, ItemDef, ItemType, StatName};

use super::{GameWorld, NPC_REMOVAL_DELAY_MS, TREE_FADE_MS};
use crate::ai::{self, DEFAULT_WEAPON_RANGE};
use crate::combat::{
    attack_power, closest_target, effective_defense, resolve_blow, scale_attack, Knockback, BLOCK_ARC,
    CHOP_MIGHT_XP, DEFAULT_BLOCK_DURATION_MS, DEFAULT_PRIMARY_COOLDOWN_MS, DEFAULT_SHIELD_COOLDOWN_MS,
    DEFAULT_TOOL_POWER,
};
use crate::entities::{Guard, PlayerState, Role};
use crate::loot;
use crate::physics::{within_arc, Vec2};
use crate::progression;

/// Distance within which the player can talk to a villager
pub const INTERACT_DISTANCE: f32 = 60.0;

/// Walking further than this from the villager ends the dialogue
pub const DIALOGUE_BREAK_DISTANCE: f32 = 120.0;

/// What a primary action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryOutcome {
    /// Dead player, open dialogue or no player at all
    Unavailable,
    NoWeapon,
    /// Non-finite aim point; nothing happened and no cooldown was spent
    InvalidAim,
    OnCooldown,
    Miss,
    /// A bandit was hit for zero damage
    Absorbed { target: EntityId },
    Hit { target: EntityId, damage: u32, defeated: bool },
    Chopped { tree: EntityId, damage: u32, felled: bool },
}

/// Direction from `origin` toward `aim`. Aiming at the origin itself falls
/// back to `facing`; a non-finite aim has no direction.
fn aim_angle(origin: Vec2, facing: Vec2, aim: Vec2) -> Option<f32> {
    if !aim.is_finite() {
        return None;
    }
    if (aim - origin).is_zero() {
        return Some(Vec2::ZERO.angle_to(facing));
    }
    Some(origin.angle_to(aim))
}

impl GameWorld {
    /// Swing the primary-hand item toward the world point `aim`.
    pub fn primary_action(&mut self, aim: Vec2) -> PrimaryOutcome {
        let outcome = self.resolve_primary(aim);
        self.events.flush();
        outcome
    }

    /// Raise the off-hand shield toward the world point `aim`.
    pub fn off_hand_action(&mut self, aim: Vec2) -> bool {
        let raised = self.resolve_off_hand(aim);
        self.events.flush();
        raised
    }

    /// Talk to the closest villager in reach. Returns the villager's id.
    pub fn interact(&mut self) -> Option<EntityId> {
        let npc = self.resolve_interact();
        self.events.flush();
        npc
    }

    /// Drink the first healing consumable in the inventory.
    pub fn use_item(&mut self) -> bool {
        let used = self.resolve_use_item();
        self.events.flush();
        used
    }

    pub fn complete_dialogue(&mut self) {
        self.close_dialogue();
        self.events.flush();
    }

    pub(super) fn resolve_primary(&mut self, aim: Vec2) -> PrimaryOutcome {
        let now = self.now;
        if self.dialogue.is_some() {
            return PrimaryOutcome::Unavailable;
        }
        let Some(player) = self.characters.get(&self.player_id) else {
            return PrimaryOutcome::Unavailable;
        };
        if !player.is_alive() {
            return PrimaryOutcome::Unavailable;
        }
        let origin = player.position;
        let Some(angle) = aim_angle(origin, player.facing, aim) else {
            warn!("Ignoring primary action with invalid aim ({}, {})", aim.x, aim.y);
            return PrimaryOutcome::InvalidAim;
        };
        let Some(state) = player.player() else {
            return PrimaryOutcome::Unavailable;
        };

        let Some(weapon) = state.equipment.hand(HandSlot::Primary).filter(|item| item.def.can_strike()) else {
            debug!("Primary action with nothing to swing");
            return PrimaryOutcome::NoWeapon;
        };
        let def = weapon.def.clone();
        let cooldown = def.combat.map_or(DEFAULT_PRIMARY_COOLDOWN_MS, |c| c.cooldown_ms);
        if !PlayerState::ready(state.last_primary_at, cooldown, now) {
            trace!("Primary action on cooldown");
            return PrimaryOutcome::OnCooldown;
        }

        let range = def.combat.map_or(DEFAULT_WEAPON_RANGE, |c| c.range);
        if let Some(player) = self.characters.get_mut(&self.player_id) {
            player.facing = Vec2::from_angle(angle);
            if let Some(state) = player.player_mut() {
                state.last_primary_at = Some(now);
            }
        }
        self.events.emit(GameEvent::PrimaryActionUsed { cooldown_ms: cooldown });

        if def.is_axe() {
            let trees = self
                .characters
                .values()
                .filter(|c| c.active && c.kind() == CharacterKind::Tree)
                .map(|c| (c.id, c.position));
            if let Some(tree) = closest_target(origin, angle, range, trees) {
                return self.chop(tree, &def);
            }
        }

        let bandits = self
            .characters
            .values()
            .filter(|c| c.is_alive() && c.kind() == CharacterKind::Bandit)
            .map(|c| (c.id, c.position));
        match closest_target(origin, angle, range, bandits) {
            Some(target) => self.player_hits(target, &def),
            None => PrimaryOutcome::Miss,
        }
    }

    fn player_hits(&mut self, target: EntityId, weapon: &ItemDef) -> PrimaryOutcome {
        let now = self.now;
        let Some(player) = self.characters.get(&self.player_id) else {
            return PrimaryOutcome::Unavailable;
        };
        let origin = player.position;
        let power = scale_attack(
            attack_power(&player.stats, player.equipment()),
            self.difficulty.player_damage_mult,
        );

        let Some(bandit) = self.characters.get_mut(&target) else {
            return PrimaryOutcome::Miss;
        };
        let blow = resolve_blow(power, effective_defense(&bandit.stats, bandit.equipment()), None);
        if blow.damage == 0 {
            debug!("{} absorbed the blow", bandit.name);
            self.events.emit(GameEvent::DamageDealt {
                attacker: self.player_id,
                target,
                amount: 0,
                blocked: false,
                position: bandit.position.to_array(),
            });
            return PrimaryOutcome::Absorbed { target };
        }

        let remaining = bandit.apply_damage(blow.damage);
        let knockback = weapon.combat.map_or(0.0, |c| c.knockback);
        if let Some(tween) = Knockback::away_from(origin, bandit.position, knockback, now) {
            bandit.knockback = Some(tween);
        }
        debug!("Player hit {} for {} ({} left)", bandit.name, blow.damage, remaining);
        self.events.emit(GameEvent::DamageDealt {
            attacker: self.player_id,
            target,
            amount: blow.damage,
            blocked: false,
            position: bandit.position.to_array(),
        });

        if let Some(player) = self.characters.get_mut(&self.player_id) {
            progression::grant_xp(player, StatName::Might, f64::from(blow.damage), &self.difficulty, &mut self.events);
        }

        let defeated = remaining == 0;
        if defeated {
            self.defeat_npc(target);
        }
        PrimaryOutcome::Hit { target, damage: blow.damage, defeated }
    }

    fn chop(&mut self, tree_id: EntityId, tool: &ItemDef) -> PrimaryOutcome {
        let now = self.now;
        let power = tool.tool.map_or(DEFAULT_TOOL_POWER, |t| t.tool_power);
        let Some(tree) = self.characters.get_mut(&tree_id) else {
            return PrimaryOutcome::Miss;
        };

        let remaining = tree.apply_damage(power);
        let position = tree.position;
        let felled = remaining == 0;
        if felled {
            tree.deactivate(Some(now + TREE_FADE_MS));
        }
        self.events.emit(GameEvent::TreeChopped { tree: tree_id, damage: power, remaining });

        if let Some(player) = self.characters.get_mut(&self.player_id) {
            progression::grant_xp(player, StatName::Might, CHOP_MIGHT_XP, &self.difficulty, &mut self.events);
        }

        if felled {
            info!("Tree {} felled", tree_id);
            self.events.emit(GameEvent::EntityDefeated { id: tree_id, kind: CharacterKind::Tree });
            for roll in loot::roll_tree_loot(&mut self.rng, position) {
                self.spawn_drop(roll);
            }
        }
        PrimaryOutcome::Chopped { tree: tree_id, damage: power, felled }
    }

    /// A bandit's swing at the player, with the player's guard taken into account.
    pub(super) fn resolve_bandit_strike(&mut self, bandit_id: EntityId) {
        let now = self.now;
        let Some(bandit) = self.characters.get(&bandit_id) else { return };
        if !bandit.is_alive() {
            return;
        }
        let origin = bandit.position;
        let power = scale_attack(
            attack_power(&bandit.stats, bandit.equipment()),
            self.difficulty.enemy_damage_mult,
        );
        let knockback = bandit
            .equipment()
            .and_then(|e| e.primary.as_ref())
            .and_then(|weapon| weapon.def.combat)
            .map_or(0.0, |c| c.knockback);

        let player_id = self.player_id;
        let Some(player) = self.characters.get_mut(&player_id) else { return };
        if !player.is_alive() {
            return;
        }

        let defense = effective_defense(&player.stats, player.equipment());
        let to_attacker = player.position.angle_to(origin);
        let shield_bonus = player.player().and_then(|state| {
            if !state.guard.is_up(now) {
                return None;
            }
            let shield = state.equipment.off_hand.as_ref().filter(|s| s.def.item_type == ItemType::Shield)?;
            within_arc(state.guard.direction, to_attacker, BLOCK_ARC / 2.0).then_some(shield.def.defense_bonus)
        });

        let blow = resolve_blow(power, defense, shield_bonus);
        if blow.damage > 0 {
            player.apply_damage(blow.damage);
            if let Some(tween) = Knockback::away_from(origin, player.position, knockback, now) {
                player.knockback = Some(tween);
            }
        }
        if blow.blocked {
            debug!("Player blocked {} of {} damage", blow.mitigated, blow.unblocked_damage);
        }
        self.events.emit(GameEvent::DamageDealt {
            attacker: bandit_id,
            target: player_id,
            amount: blow.damage,
            blocked: blow.blocked,
            position: player.position.to_array(),
        });

        if player.health == 0 {
            self.kill_player();
            return;
        }

        let xp = blow.endurance_xp();
        if xp > 0 {
            progression::grant_xp(player, StatName::Endurance, f64::from(xp), &self.difficulty, &mut self.events);
        }
    }

    /// Take a beaten NPC out of play and roll its loot.
    pub(super) fn defeat_npc(&mut self, id: EntityId) {
        let now = self.now;
        let Some(npc) = self.characters.get_mut(&id) else { return };
        if !npc.active {
            return;
        }
        npc.deactivate(Some(now + NPC_REMOVAL_DELAY_MS));
        let kind = npc.kind();
        let position = npc.position;
        info!("{} {} defeated", npc.name, id);
        self.events.emit(GameEvent::EntityDefeated { id, kind });

        if self.dialogue == Some(id) {
            self.close_dialogue();
        }
        if kind == CharacterKind::Bandit {
            if let Some(roll) = loot::roll_bandit_loot(&mut self.rng, position) {
                self.spawn_drop(roll);
            }
        }
    }

    pub(super) fn kill_player(&mut self) {
        let Some(player) = self.characters.get_mut(&self.player_id) else { return };
        if !player.active {
            return;
        }
        player.health = 0;
        player.deactivate(None);
        info!("Player died");
        self.emit_stats();
        self.events.emit(GameEvent::PlayerDied);
        self.close_dialogue();
    }

    pub(super) fn resolve_off_hand(&mut self, aim: Vec2) -> bool {
        let now = self.now;
        if self.dialogue.is_some() {
            return false;
        }
        let Some(player) = self.characters.get_mut(&self.player_id) else { return false };
        if !player.is_alive() {
            return false;
        }
        let Some(direction) = aim_angle(player.position, player.facing, aim) else {
            warn!("Ignoring off-hand action with invalid aim ({}, {})", aim.x, aim.y);
            return false;
        };
        let Some(state) = player.player_mut() else { return false };

        let shield = state.equipment.hand(HandSlot::OffHand).filter(|item| item.def.item_type == ItemType::Shield);
        let Some(block) = shield.map(|item| item.def.block) else {
            debug!("Off-hand action without a shield");
            return false;
        };
        let cooldown = block.map_or(DEFAULT_SHIELD_COOLDOWN_MS, |b| b.cooldown_ms);
        let duration = block.map_or(DEFAULT_BLOCK_DURATION_MS, |b| b.block_duration_ms);
        if state.guard.is_up(now) || !PlayerState::ready(state.last_off_hand_at, cooldown, now) {
            trace!("Off-hand action not ready");
            return false;
        }

        state.guard = Guard { raised: true, ends_at: now + duration, direction };
        state.last_off_hand_at = Some(now);
        self.events.emit(GameEvent::OffHandActionUsed { cooldown_ms: cooldown, block_duration_ms: duration });
        true
    }

    pub(super) fn resolve_interact(&mut self) -> Option<EntityId> {
        if self.dialogue.is_some() {
            return None;
        }
        let player = self.player().filter(|p| p.is_alive())?;
        let origin = player.position;

        let npc_id = self
            .characters
            .values()
            .filter(|c| c.active && c.kind() == CharacterKind::Villager)
            .map(|c| (c.id, origin.distance_squared_to(c.position)))
            .filter(|(_, dist_sq)| *dist_sq < INTERACT_DISTANCE * INTERACT_DISTANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)?;

        let npc = self.characters.get_mut(&npc_id)?;
        npc.velocity = Vec2::ZERO;
        let toward = (origin - npc.position).normalized();
        if !toward.is_zero() {
            npc.facing = toward;
        }
        let Role::Villager(villager) = &mut npc.role else { return None };
        ai::enter_dialogue(&mut villager.brain);
        let mut lines = villager.dialogue.clone();
        if lines.is_empty() {
            lines.push("...".into());
        }
        let speaker = npc.name.clone();

        debug!("Dialogue opened with {}", speaker);
        self.dialogue = Some(npc_id);
        self.events.emit(GameEvent::DialogueOpened { npc_id, speaker, lines });
        Some(npc_id)
    }

    pub(super) fn close_dialogue(&mut self) {
        let Some(npc_id) = self.dialogue.take() else { return };
        if let Some(brain) = self.characters.get_mut(&npc_id).and_then(|npc| npc.brain_mut()) {
            ai::leave_dialogue(brain, self.now, &mut self.rng);
        }
        self.events.emit(GameEvent::DialogueClosed { npc_id });
    }

    pub(super) fn resolve_use_item(&mut self) -> bool {
        if self.dialogue.is_some() {
            return false;
        }
        let Some(player) = self.characters.get_mut(&self.player_id) else { return false };
        if !player.is_alive() || player.health >= player.max_health {
            debug!("Nothing to heal");
            return false;
        }
        let Some(state) = player.player_mut() else { return false };
        let Some(index) = state
            .inventory
            .position(|item| item.def.item_type == ItemType::Consumable && item.def.heal_amount > 0)
        else {
            debug!("No healing item in the inventory");
            return false;
        };
        let Some(def) = state.inventory.consume_one(index) else { return false };

        let restored = player.heal(def.heal_amount);
        debug!("Used {}, restored {} health", def.name, restored);
        self.emit_inventory();
        self.emit_stats();
        true
    }
}
