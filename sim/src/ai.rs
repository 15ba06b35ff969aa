//! NPC behaviour state machine.
//!
//! `think` is a pure function of the NPC's own state, a view of the player,
//! the clock and the RNG. The world applies the returned decision.

use log::trace;
use rand::Rng;
use rpg_shared::{AiState, CharacterKind, ItemDef};

use crate::combat::effective_range;
use crate::entities::Brain;
use crate::physics::Vec2;

/// Radius within which bandits notice the player
pub const AGGRO_RADIUS: f32 = 300.0;

/// Fraction of effective range at which bandits stop chasing and attack
pub const ACTIVATION_FRACTION: f32 = 0.85;

/// Reach of an unarmed bandit before the range bonus
pub const DEFAULT_WEAPON_RANGE: f32 = 30.0;

/// Cooldown between bandit strikes when the weapon lists none
pub const BANDIT_ATTACK_COOLDOWN_MS: u64 = 1500;

const WANDER_MOVE_MS: (u64, u64) = (2000, 4500);
const WANDER_IDLE_MS: (u64, u64) = (1500, 4000);
const LOST_AGGRO_IDLE_MS: (u64, u64) = (500, 1500);
const POST_DIALOGUE_IDLE_MS: (u64, u64) = (1000, 2500);

const CARDINALS: [Vec2; 4] = [
    Vec2 { x: 0.0, y: -1.0 },
    Vec2 { x: 0.0, y: 1.0 },
    Vec2 { x: -1.0, y: 0.0 },
    Vec2 { x: 1.0, y: 0.0 },
];

/// What an NPC can see of the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub alive: bool,
}

/// An NPC's own state, as input to `think`
#[derive(Debug, Clone, Copy)]
pub struct NpcView<'a> {
    pub kind: CharacterKind,
    pub position: Vec2,
    pub brain: Brain,
    /// Speed after terrain effects
    pub speed: f32,
    pub weapon: Option<&'a ItemDef>,
    pub next_attack_at: u64,
}

/// Result of one AI step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub brain: Brain,
    pub velocity: Vec2,
    pub facing: Option<Vec2>,
    /// The NPC strikes the player this tick
    pub strike: bool,
    pub next_attack_at: u64,
}

fn deadline<R: Rng>(now: u64, (min, max): (u64, u64), rng: &mut R) -> u64 {
    now + rng.gen_range(min..=max)
}

/// Put a brain into dialogue.
pub fn enter_dialogue(brain: &mut Brain) {
    brain.state = AiState::Dialoguing;
}

/// Release a brain from dialogue into a short idle.
pub fn leave_dialogue<R: Rng>(brain: &mut Brain, now: u64, rng: &mut R) {
    if brain.state == AiState::Dialoguing {
        brain.state = AiState::Idle;
        brain.deadline = deadline(now, POST_DIALOGUE_IDLE_MS, rng);
    }
}

/// Advance an NPC's state machine by one tick.
pub fn think<R: Rng>(npc: &NpcView, player: Option<&PlayerView>, now: u64, rng: &mut R) -> Decision {
    let mut decision = Decision {
        brain: npc.brain,
        velocity: Vec2::ZERO,
        facing: None,
        strike: false,
        next_attack_at: npc.next_attack_at,
    };

    if decision.brain.state == AiState::Dialoguing {
        decision.facing = player.map(|p| (p.position - npc.position).normalized()).filter(|d| !d.is_zero());
        return decision;
    }

    let target = player.filter(|p| p.alive);
    let engaged = npc.kind == CharacterKind::Bandit
        && target.is_some_and(|p| npc.position.distance_squared_to(p.position) <= AGGRO_RADIUS * AGGRO_RADIUS);

    match target {
        Some(target) if engaged => engage(npc, target, now, &mut decision),
        _ => wander(npc, now, rng, &mut decision),
    }

    if decision.facing.is_none() && !decision.velocity.is_zero() {
        decision.facing = Some(decision.brain.heading);
    }
    decision
}

fn engage(npc: &NpcView, player: &PlayerView, now: u64, decision: &mut Decision) {
    let weapon_range = npc.weapon.and_then(|w| w.combat).map_or(DEFAULT_WEAPON_RANGE, |c| c.range);
    let reach = effective_range(weapon_range);
    let activation = reach * ACTIVATION_FRACTION;
    let dist_sq = npc.position.distance_squared_to(player.position);

    let toward = (player.position - npc.position).normalized();
    if !toward.is_zero() {
        decision.brain.heading = toward;
    }
    decision.facing = Some(decision.brain.heading);

    if dist_sq <= activation * activation {
        decision.brain.state = AiState::Attacking;
        let ready = now >= decision.next_attack_at;
        let cooldown = npc
            .weapon
            .and_then(|w| w.combat)
            .map_or(BANDIT_ATTACK_COOLDOWN_MS, |c| c.cooldown_ms);
        if ready && dist_sq <= reach * reach {
            if npc.weapon.is_some() {
                decision.strike = true;
                decision.next_attack_at = now + cooldown;
            }
        } else if ready {
            decision.next_attack_at = now + cooldown / 4;
        }
    } else {
        decision.brain.state = AiState::Chasing;
        decision.velocity = decision.brain.heading * npc.speed;
    }
}

fn wander<R: Rng>(npc: &NpcView, now: u64, rng: &mut R, decision: &mut Decision) {
    let brain = &mut decision.brain;
    match brain.state {
        AiState::Chasing | AiState::Attacking => {
            trace!("NPC lost its target, idling");
            brain.state = AiState::Idle;
            brain.deadline = deadline(now, LOST_AGGRO_IDLE_MS, rng);
        }
        AiState::Idle => {
            if now >= brain.deadline {
                let dir = CARDINALS[rng.gen_range(0..CARDINALS.len())];
                brain.state = AiState::Moving;
                brain.heading = dir;
                brain.deadline = deadline(now, WANDER_MOVE_MS, rng);
                decision.velocity = dir * npc.speed;
            }
        }
        AiState::Moving => {
            if now >= brain.deadline {
                brain.state = AiState::Idle;
                brain.deadline = deadline(now, WANDER_IDLE_MS, rng);
            } else {
                decision.velocity = brain.heading * npc.speed;
            }
        }
        AiState::Dialoguing => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rpg_shared::ItemCatalog;

    fn bandit_view<'a>(weapon: Option<&'a ItemDef>, brain: Brain) -> NpcView<'a> {
        NpcView {
            kind: CharacterKind::Bandit,
            position: Vec2::new(0.0, 0.0),
            brain,
            speed: 80.0,
            weapon,
            next_attack_at: 0,
        }
    }

    fn player_at(x: f32, y: f32) -> PlayerView {
        PlayerView { position: Vec2::new(x, y), alive: true }
    }

    #[test]
    fn test_outside_aggro_never_engages() {
        let catalog = ItemCatalog::builtin();
        let sword = catalog.get("iron_sword");
        let mut rng = StdRng::seed_from_u64(1);
        let view = bandit_view(sword, Brain::new(10_000));

        let decision = think(&view, Some(&player_at(301.0, 0.0)), 0, &mut rng);
        assert_eq!(decision.brain.state, AiState::Idle);
        assert!(!decision.strike);
        assert!(decision.velocity.is_zero());
    }

    #[test]
    fn test_chase_inside_aggro() {
        let catalog = ItemCatalog::builtin();
        let sword = catalog.get("iron_sword");
        let mut rng = StdRng::seed_from_u64(1);
        let view = bandit_view(sword, Brain::new(10_000));

        let decision = think(&view, Some(&player_at(200.0, 0.0)), 0, &mut rng);
        assert_eq!(decision.brain.state, AiState::Chasing);
        assert_eq!(decision.velocity, Vec2::new(80.0, 0.0));
        assert_eq!(decision.facing, Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_attack_inside_activation_range() {
        let catalog = ItemCatalog::builtin();
        let sword = catalog.get("iron_sword");
        let mut rng = StdRng::seed_from_u64(1);
        let view = bandit_view(sword, Brain::new(10_000));

        // Sword activation range: 134 * 0.85 = 113.9
        let decision = think(&view, Some(&player_at(100.0, 0.0)), 5_000, &mut rng);
        assert_eq!(decision.brain.state, AiState::Attacking);
        assert!(decision.strike);
        assert_eq!(decision.next_attack_at, 5_500);
        assert!(decision.velocity.is_zero());

        // Just outside activation range: still chasing
        let decision = think(&view, Some(&player_at(114.5, 0.0)), 5_000, &mut rng);
        assert_eq!(decision.brain.state, AiState::Chasing);
    }

    #[test]
    fn test_attack_waits_for_cooldown() {
        let catalog = ItemCatalog::builtin();
        let axe = catalog.get("iron_axe");
        let mut rng = StdRng::seed_from_u64(1);
        let mut view = bandit_view(axe, Brain::new(0));
        view.next_attack_at = 1_000;

        let decision = think(&view, Some(&player_at(50.0, 0.0)), 999, &mut rng);
        assert!(!decision.strike);
        assert_eq!(decision.next_attack_at, 1_000);

        let decision = think(&view, Some(&player_at(50.0, 0.0)), 1_000, &mut rng);
        assert!(decision.strike);
        assert_eq!(decision.next_attack_at, 1_700);
    }

    #[test]
    fn test_unarmed_bandit_never_strikes() {
        let mut rng = StdRng::seed_from_u64(1);
        let view = bandit_view(None, Brain::new(0));
        let decision = think(&view, Some(&player_at(40.0, 0.0)), 0, &mut rng);
        assert_eq!(decision.brain.state, AiState::Attacking);
        assert!(!decision.strike);
    }

    #[test]
    fn test_losing_aggro_returns_to_idle() {
        let catalog = ItemCatalog::builtin();
        let sword = catalog.get("iron_sword");
        let mut rng = StdRng::seed_from_u64(1);
        let mut brain = Brain::new(0);
        brain.state = AiState::Chasing;
        let view = bandit_view(sword, brain);

        let decision = think(&view, Some(&player_at(400.0, 0.0)), 2_000, &mut rng);
        assert_eq!(decision.brain.state, AiState::Idle);
        assert!((2_500..=3_500).contains(&decision.brain.deadline));

        let dead = PlayerView { position: Vec2::new(50.0, 0.0), alive: false };
        let decision = think(&view, Some(&dead), 2_000, &mut rng);
        assert_eq!(decision.brain.state, AiState::Idle);
        assert!(!decision.strike);
    }

    #[test]
    fn test_wander_cycle() {
        let mut rng = StdRng::seed_from_u64(9);
        let view = NpcView {
            kind: CharacterKind::Villager,
            position: Vec2::new(500.0, 500.0),
            brain: Brain::new(1_000),
            speed: 70.0,
            weapon: None,
            next_attack_at: 0,
        };

        let decision = think(&view, Some(&player_at(510.0, 500.0)), 999, &mut rng);
        assert_eq!(decision.brain.state, AiState::Idle);

        let decision = think(&view, Some(&player_at(510.0, 500.0)), 1_000, &mut rng);
        assert_eq!(decision.brain.state, AiState::Moving);
        assert!((3_000..=5_500).contains(&decision.brain.deadline));
        assert!((decision.velocity.length() - 70.0).abs() < 1e-4);
        assert!(CARDINALS.contains(&decision.brain.heading));

        let moving = NpcView { brain: decision.brain, ..view };
        let decision = think(&moving, None, moving.brain.deadline, &mut rng);
        assert_eq!(decision.brain.state, AiState::Idle);
        assert!(decision.velocity.is_zero());
    }

    #[test]
    fn test_dialoguing_npc_faces_player() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut brain = Brain::new(0);
        enter_dialogue(&mut brain);
        let view = NpcView {
            kind: CharacterKind::Villager,
            position: Vec2::new(0.0, 0.0),
            brain,
            speed: 70.0,
            weapon: None,
            next_attack_at: 0,
        };

        let decision = think(&view, Some(&player_at(0.0, 40.0)), 50_000, &mut rng);
        assert_eq!(decision.brain.state, AiState::Dialoguing);
        assert!(decision.velocity.is_zero());
        assert_eq!(decision.facing, Some(Vec2::new(0.0, 1.0)));

        leave_dialogue(&mut brain, 50_000, &mut rng);
        assert_eq!(brain.state, AiState::Idle);
        assert!((51_000..=52_500).contains(&brain.deadline));
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let view = NpcView {
            kind: CharacterKind::Villager,
            position: Vec2::ZERO,
            brain: Brain::new(0),
            speed: 70.0,
            weapon: None,
            next_attack_at: 0,
        };
        let a = think(&view, None, 10, &mut StdRng::seed_from_u64(42));
        let b = think(&view, None, 10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
