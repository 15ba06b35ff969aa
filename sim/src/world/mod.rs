//! Game world management.
//!
//! The world owns every character and loot drop, the clock, the RNG and the
//! event bus. One call to [`GameWorld::tick`] advances the simulation by one
//! frame, in this order:
//! 1. player timers and movement input
//! 2. player actions
//! 3. NPC AI and NPC attacks
//! 4. dialogue distance check
//! 5. motion integration (velocity, knockback, collisions, water)
//! 6. loot pickup
//! 7. removal of expired NPCs

mod actions;
mod generation;
mod requests;

pub use actions::{PrimaryOutcome, DIALOGUE_BREAK_DISTANCE, INTERACT_DISTANCE};
pub use generation::{Layout, NPC_MARGIN, NPC_MIN_DISTANCE, WATER_RADIUS};

use std::collections::BTreeMap;

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rpg_shared::{
    ArmorSlot, CharacterKind, DifficultySettings, EntityId, Equipment, GameEvent, ItemCatalog,
    ItemInstance, LootKind, PlayerInput,
};

use crate::ai::{self, NpcView, PlayerView};
use crate::config::SimConfig;
use crate::entities::{Character, CharacterFactory, LootDrop, Role};
use crate::error::SimError;
use crate::events::{EventBus, EventSubscriber, SubscriptionId};
use crate::loot::{self, LootRoll, PickupOutcome};
use crate::physics::{ArcadePhysics, Circle, PhysicsProvider, Vec2};
use crate::progression;

/// Delay between an NPC's defeat and its removal
pub const NPC_REMOVAL_DELAY_MS: u64 = 2000;

/// Delay between a tree falling and its removal
pub const TREE_FADE_MS: u64 = 300;

/// The game world containing all entities
pub struct GameWorld {
    /// Simulation clock in milliseconds
    now: u64,
    player_id: EntityId,
    characters: BTreeMap<EntityId, Character>,
    drops: BTreeMap<EntityId, LootDrop>,
    next_entity_id: EntityId,
    catalog: ItemCatalog,
    difficulty: DifficultySettings,
    physics: Box<dyn PhysicsProvider>,
    rng: StdRng,
    events: EventBus,
    /// Villager the player is talking to
    dialogue: Option<EntityId>,
}

impl GameWorld {
    /// Build a world from config: generate a layout from the seed and populate it.
    pub fn generate(config: &SimConfig) -> Result<Self, SimError> {
        let world = &config.world;
        if !(world.width > 0.0 && world.height > 0.0) {
            return Err(SimError::InvalidWorldSize { width: world.width, height: world.height });
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("Generating world with seed {} on {}", seed, config.difficulty.name());

        let mut rng = StdRng::seed_from_u64(seed);
        let layout = Layout::generate(world, &mut rng);
        Self::from_layout(&layout, config.difficulty.settings(), rng)
    }

    /// Populate a world from a layout, with arcade physics.
    pub fn from_layout(layout: &Layout, difficulty: DifficultySettings, rng: StdRng) -> Result<Self, SimError> {
        let physics = ArcadePhysics::with_water(layout.bounds, layout.water.clone());
        Self::with_physics(layout, Box::new(physics), difficulty, rng)
    }

    /// Populate a world from a layout with a caller-supplied physics provider.
    pub fn with_physics(
        layout: &Layout,
        physics: Box<dyn PhysicsProvider>,
        difficulty: DifficultySettings,
        rng: StdRng,
    ) -> Result<Self, SimError> {
        let mut world = Self {
            now: 0,
            player_id: 0,
            characters: BTreeMap::new(),
            drops: BTreeMap::new(),
            next_entity_id: 1,
            catalog: ItemCatalog::builtin(),
            difficulty,
            physics,
            rng,
            events: EventBus::new(),
            dialogue: None,
        };

        let player_id = world.next_id();
        let player = CharacterFactory::new(&world.catalog, world.difficulty).create(
            CharacterKind::Player,
            player_id,
            layout.player.x,
            layout.player.y,
            world.now,
            &mut world.rng,
        );
        let Some(player) = player else {
            error!("FATAL: failed to create the player");
            return Err(SimError::PlayerSpawn { x: layout.player.x, y: layout.player.y });
        };
        world.player_id = player_id;
        world.characters.insert(player_id, player);

        for tree in &layout.trees {
            world.spawn(CharacterKind::Tree, tree.x, tree.y);
        }
        for bandit in &layout.bandits {
            world.spawn(CharacterKind::Bandit, bandit.x, bandit.y);
        }
        for villager in &layout.villagers {
            world.spawn(CharacterKind::Villager, villager.x, villager.y);
        }

        info!(
            "World ready: {} characters, {} water pools",
            world.characters.len(),
            layout.water.len()
        );
        Ok(world)
    }

    fn next_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Spawn a non-player character. Returns `None` for invalid coordinates.
    pub fn spawn(&mut self, kind: CharacterKind, x: f32, y: f32) -> Option<EntityId> {
        if kind == CharacterKind::Player {
            warn!("The world already has a player");
            return None;
        }
        let id = self.next_id();
        let character = CharacterFactory::new(&self.catalog, self.difficulty)
            .create(kind, id, x, y, self.now, &mut self.rng)?;
        debug!("Spawned {} {} at ({:.1}, {:.1})", kind.name(), id, x, y);
        self.characters.insert(id, character);
        Some(id)
    }

    fn spawn_drop(&mut self, roll: LootRoll) -> EntityId {
        let id = self.next_id();
        let drop = LootDrop { id, kind: roll.kind, value: roll.value, position: roll.position };
        debug!("Loot {:?} x{} dropped at ({:.1}, {:.1})", drop.kind, drop.value, drop.position.x, drop.position.y);
        self.events.emit(GameEvent::LootDropped {
            id,
            kind: drop.kind.clone(),
            value: drop.value,
            position: drop.position.to_array(),
        });
        self.drops.insert(id, drop);
        id
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn player(&self) -> Option<&Character> {
        self.characters.get(&self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Character> {
        self.characters.get_mut(&self.player_id)
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn drops(&self) -> impl Iterator<Item = &LootDrop> {
        self.drops.values()
    }

    /// Villager currently in dialogue with the player.
    pub fn dialogue_partner(&self) -> Option<EntityId> {
        self.dialogue
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn difficulty(&self) -> &DifficultySettings {
        &self.difficulty
    }

    pub fn subscribe(&mut self, subscriber: impl EventSubscriber + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Place a drop directly, e.g. for scripted scenarios.
    pub fn place_drop(&mut self, kind: LootKind, value: u32, position: Vec2) -> EntityId {
        let id = self.spawn_drop(LootRoll { kind, value, position });
        self.events.flush();
        id
    }

    /// Grant XP to a character by stat name. Unknown names and ids are ignored.
    pub fn grant_xp(&mut self, id: EntityId, stat_name: &str, amount: f64) {
        match self.characters.get_mut(&id) {
            Some(character) => {
                progression::grant_xp_by_name(character, stat_name, amount, &self.difficulty, &mut self.events);
            }
            None => warn!("Cannot grant XP to missing entity {}", id),
        }
        self.events.flush();
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    fn emit_stats(&mut self) {
        if let Some(player) = self.characters.get(&self.player_id) {
            self.events.emit(GameEvent::StatsChanged(progression::stats_snapshot(player)));
        }
    }

    fn emit_inventory(&mut self) {
        if let Some(state) = self.player().and_then(|p| p.player()) {
            let slots: Vec<Option<ItemInstance>> = state.inventory.slots().to_vec();
            self.events.emit(GameEvent::InventoryChanged(slots));
        }
    }

    fn emit_equipment(&mut self) {
        if let Some(state) = self.player().and_then(|p| p.player()) {
            let equipment: Equipment = state.equipment.clone();
            self.events.emit(GameEvent::EquipmentChanged(equipment));
        }
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the simulation by `delta_ms` with this frame's player input.
    pub fn tick(&mut self, delta_ms: u64, input: &PlayerInput) {
        self.now += delta_ms;

        self.update_player(input);
        self.update_npcs();
        self.check_dialogue_distance();
        self.integrate_motion(delta_ms);
        self.collect_loot();
        self.remove_expired();

        self.events.flush();
    }

    fn update_player(&mut self, input: &PlayerInput) {
        let now = self.now;
        let Some(player) = self.characters.get_mut(&self.player_id) else { return };

        if let Some(state) = player.player_mut() {
            if state.guard.raised && !state.guard.is_up(now) {
                state.guard.raised = false;
            }
        }

        if !player.is_alive() {
            player.velocity = Vec2::ZERO;
            return;
        }

        let dir = Vec2::new(f32::from(input.move_x.signum()), f32::from(input.move_y.signum())).normalized();
        player.velocity = dir * player.current_speed();
        if !dir.is_zero() {
            player.facing = dir;
        }

        if self.dialogue.is_none() {
            if let Some(aim) = input.primary {
                self.resolve_primary(Vec2::from_array(aim));
            }
            if let Some(aim) = input.off_hand {
                self.resolve_off_hand(Vec2::from_array(aim));
            }
            if input.use_item {
                self.resolve_use_item();
            }
        }
        if input.interact {
            self.resolve_interact();
        }
    }

    fn player_view(&self) -> Option<PlayerView> {
        self.player().map(|p| PlayerView { position: p.position, alive: p.is_alive() })
    }

    fn update_npcs(&mut self) {
        let now = self.now;
        let npc_ids: Vec<EntityId> = self
            .characters
            .values()
            .filter(|c| c.active && c.kind().is_npc())
            .map(|c| c.id)
            .collect();

        for id in npc_ids {
            let player = self.player_view();
            let Some(npc) = self.characters.get(&id) else { continue };
            if !npc.active {
                continue;
            }
            let Some(brain) = npc.brain().copied() else { continue };
            let (weapon, next_attack_at) = match &npc.role {
                Role::Bandit(bandit) => (bandit.equipment.primary.as_ref().map(|w| &w.def), bandit.next_attack_at),
                _ => (None, 0),
            };
            let view = NpcView {
                kind: npc.kind(),
                position: npc.position,
                brain,
                speed: npc.current_speed(),
                weapon,
                next_attack_at,
            };
            let decision = ai::think(&view, player.as_ref(), now, &mut self.rng);

            let Some(npc) = self.characters.get_mut(&id) else { continue };
            npc.velocity = decision.velocity;
            if let Some(facing) = decision.facing {
                npc.facing = facing;
            }
            match &mut npc.role {
                Role::Bandit(bandit) => {
                    bandit.brain = decision.brain;
                    bandit.next_attack_at = decision.next_attack_at;
                }
                Role::Villager(villager) => villager.brain = decision.brain,
                _ => {}
            }

            if decision.strike {
                self.resolve_bandit_strike(id);
            }
        }
    }

    fn check_dialogue_distance(&mut self) {
        let Some(npc_id) = self.dialogue else { return };
        let player = self.player_view();
        let npc = self.characters.get(&npc_id).filter(|npc| npc.active).map(|npc| npc.position);

        let in_range = match (player, npc) {
            (Some(player), Some(npc)) => {
                player.alive
                    && player.position.distance_squared_to(npc) <= DIALOGUE_BREAK_DISTANCE * DIALOGUE_BREAK_DISTANCE
            }
            _ => false,
        };
        if !in_range {
            debug!("Dialogue with {} broken off", npc_id);
            self.close_dialogue();
        }
    }

    fn integrate_motion(&mut self, delta_ms: u64) {
        let now = self.now;
        let dt = delta_ms as f32 / 1000.0;

        let mut solids: Vec<(EntityId, Circle)> = self
            .characters
            .values()
            .filter(|c| c.active)
            .map(|c| (c.id, c.body()))
            .collect();
        let movers: Vec<EntityId> = self
            .characters
            .values()
            .filter(|c| c.active && c.kind() != CharacterKind::Tree)
            .map(|c| c.id)
            .collect();

        for id in movers {
            let Some(character) = self.characters.get_mut(&id) else { continue };
            let body = character.body();

            let target = if let Some(knockback) = character.knockback {
                if knockback.is_finished(now) {
                    character.knockback = None;
                }
                knockback.position_at(now)
            } else if !character.velocity.is_zero() {
                character.position + character.velocity * dt
            } else {
                character.in_water = self.physics.in_water(body);
                continue;
            };

            let others: Vec<Circle> = solids
                .iter()
                .filter(|(other, _)| *other != id)
                .map(|(_, circle)| *circle)
                .collect();
            let resolved = self.physics.resolve_motion(body, target, &others);
            character.position = resolved;
            character.in_water = self.physics.in_water(Circle::at(resolved, body.radius));

            if let Some(entry) = solids.iter_mut().find(|(other, _)| *other == id) {
                entry.1.center = resolved;
            }
        }
    }

    fn collect_loot(&mut self) {
        let Some(player) = self.player() else { return };
        if !player.is_alive() {
            return;
        }
        let body = player.body();
        let touching: Vec<EntityId> = self
            .drops
            .values()
            .filter(|drop| body.overlaps(&drop.body()))
            .map(|drop| drop.id)
            .collect();

        for drop_id in touching {
            let Some(drop) = self.drops.get(&drop_id).cloned() else { continue };
            let Some(state) = self.characters.get_mut(&self.player_id).and_then(|p| p.player_mut()) else {
                return;
            };
            let outcome = loot::pick_up(state, &drop, &self.catalog);

            let collected = match outcome {
                PickupOutcome::Gold(amount) => {
                    self.drops.remove(&drop_id);
                    self.emit_stats();
                    amount
                }
                PickupOutcome::Stored => {
                    self.drops.remove(&drop_id);
                    self.emit_inventory();
                    drop.value
                }
                PickupOutcome::Partial { remaining } => {
                    if let Some(left) = self.drops.get_mut(&drop_id) {
                        left.value = remaining;
                    }
                    self.emit_inventory();
                    drop.value - remaining
                }
                PickupOutcome::InventoryFull | PickupOutcome::UnknownItem => continue,
            };

            debug!("Collected {:?} x{}", drop.kind, collected);
            self.events.emit(GameEvent::LootCollected { id: drop_id, kind: drop.kind, value: collected });
        }
    }

    fn remove_expired(&mut self) {
        let now = self.now;
        let player_id = self.player_id;
        let expired: Vec<EntityId> = self
            .characters
            .values()
            .filter(|c| c.id != player_id && c.remove_at.is_some_and(|at| now >= at))
            .map(|c| c.id)
            .collect();

        for id in expired {
            if let Some(character) = self.characters.remove(&id) {
                debug!("Removed {} {}", character.kind().name(), id);
                self.events.emit(GameEvent::EntityRemoved { id });
            }
        }
    }

    /// Count of characters of `kind` still in play.
    pub fn count_active(&self, kind: CharacterKind) -> usize {
        self.characters.values().filter(|c| c.active && c.kind() == kind).count()
    }

    /// Equipped armor piece in `slot`, if any.
    pub fn equipped_armor(&self, slot: ArmorSlot) -> Option<&ItemInstance> {
        self.player().and_then(|p| p.player()).and_then(|s| s.equipment.armor.get(slot))
    }
}

impl std::fmt::Debug for GameWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameWorld")
            .field("now", &self.now)
            .field("characters", &self.characters.len())
            .field("drops", &self.drops.len())
            .field("dialogue", &self.dialogue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::physics::Bounds;
    use rpg_shared::{AiState, Difficulty};

    fn sandbox() -> GameWorld {
        let layout = Layout::empty(Bounds::new(2000.0, 2000.0), Vec2::new(1000.0, 1000.0));
        GameWorld::from_layout(&layout, DifficultySettings::default(), StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_player_starts_with_kit() {
        let world = sandbox();
        let player = world.player().unwrap();
        let state = player.player().unwrap();
        assert_eq!(state.inventory.get(0).unwrap().id(), "iron_sword");
        assert_eq!(state.inventory.get(6).unwrap().id(), "leather_pants");
        assert!(state.inventory.get(7).is_none());
        assert_eq!(state.equipment.primary.as_ref().unwrap().id(), "iron_sword");
        assert_eq!(state.equipment.off_hand.as_ref().unwrap().id(), "crude_shield");
    }

    #[test]
    fn test_nan_player_is_fatal() {
        let layout = Layout::empty(Bounds::new(100.0, 100.0), Vec2::new(f32::NAN, 5.0));
        let result = GameWorld::from_layout(&layout, DifficultySettings::default(), StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(SimError::PlayerSpawn { .. })));
    }

    #[test]
    fn test_invalid_world_size() {
        let config = SimConfig {
            world: WorldConfig { width: 0.0, ..WorldConfig::default() },
            ..SimConfig::default()
        };
        assert!(matches!(GameWorld::generate(&config), Err(SimError::InvalidWorldSize { .. })));
    }

    #[test]
    fn test_generated_world_is_populated() {
        let config = SimConfig { seed: Some(5), difficulty: Difficulty::Hard, ..SimConfig::default() };
        let world = GameWorld::generate(&config).unwrap();
        assert!(world.count_active(CharacterKind::Tree) > 50);
        assert!(world.count_active(CharacterKind::Bandit) > 0);
        assert!(world.characters().filter(|c| c.kind() == CharacterKind::Bandit).all(|b| b.max_health == 97));
    }

    #[test]
    fn test_movement_is_normalised() {
        let mut world = sandbox();
        let input = PlayerInput { move_x: 1, move_y: 1, ..PlayerInput::default() };
        world.tick(100, &input);

        let player = world.player().unwrap();
        let moved = player.position.distance_to(Vec2::new(1000.0, 1000.0));
        assert!((moved - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_water_slows_movement() {
        let mut layout = Layout::empty(Bounds::new(2000.0, 2000.0), Vec2::new(1000.0, 1000.0));
        layout.water.push(Circle::new(1000.0, 1000.0, WATER_RADIUS));
        let mut world = GameWorld::from_layout(&layout, DifficultySettings::default(), StdRng::seed_from_u64(1)).unwrap();

        // First tick discovers the water
        world.tick(100, &PlayerInput::default());
        assert!(world.player().unwrap().in_water);

        let input = PlayerInput { move_x: 1, ..PlayerInput::default() };
        world.tick(100, &input);
        assert!((world.player().unwrap().position.x - 1006.0).abs() < 1e-3);
    }

    #[test]
    fn test_npcs_wander_on_their_own() {
        let mut world = sandbox();
        let villager = world.spawn(CharacterKind::Villager, 400.0, 400.0).unwrap();
        let start = world.character(villager).unwrap().position;

        let mut moved = false;
        for _ in 0..600 {
            world.tick(16, &PlayerInput::default());
            let npc = world.character(villager).unwrap();
            if npc.brain().unwrap().state == AiState::Moving {
                moved = true;
            }
        }
        assert!(moved);
        assert_ne!(world.character(villager).unwrap().position, start);
    }

    #[test]
    fn test_defeated_npc_removed_after_delay() {
        let mut world = sandbox();
        let bandit = world.spawn(CharacterKind::Bandit, 100.0, 100.0).unwrap();
        let remove_at = world.now() + NPC_REMOVAL_DELAY_MS;
        world.character_mut(bandit).unwrap().deactivate(Some(remove_at));

        world.tick(1999, &PlayerInput::default());
        assert!(world.character(bandit).is_some());
        world.tick(1, &PlayerInput::default());
        assert!(world.character(bandit).is_none());
    }

    #[test]
    fn test_guard_lowers_when_block_window_ends() {
        let mut world = sandbox();
        assert!(world.off_hand_action(Vec2::new(1100.0, 1000.0)));

        world.tick(799, &PlayerInput::default());
        assert!(world.player().unwrap().player().unwrap().guard.raised);

        // Crude shield blocks for 800 ms
        world.tick(1, &PlayerInput::default());
        let guard = world.player().unwrap().player().unwrap().guard;
        assert!(!guard.is_up(world.now()));
        assert!(!guard.raised);
    }

    #[test]
    fn test_gold_pickup() {
        let mut world = sandbox();
        let log = crate::events::EventLog::new();
        world.subscribe(log.clone());
        world.place_drop(LootKind::Gold, 12, Vec2::new(1010.0, 1000.0));

        world.tick(16, &PlayerInput::default());
        assert_eq!(world.player().unwrap().player().unwrap().gold, 12);
        assert_eq!(world.drops().count(), 0);
        assert_eq!(log.count(|e| matches!(e, GameEvent::LootCollected { value: 12, .. })), 1);
    }
}
