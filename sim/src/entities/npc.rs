//! NPC state: the AI brain plus bandit and villager specifics.

use rand::Rng;
use rpg_shared::{AiState, Equipment};

use crate::physics::Vec2;

pub const BANDIT_NAMES: [&str; 4] = ["Grak", "Rizzo", "Snag", "Twitch"];

pub const VILLAGER_NAMES: [&str; 5] = ["Alden", "Berta", "Cedric", "Daria", "Elwin"];

/// Dialogue scripts handed out to villagers. Each opens with an empty line.
pub const VILLAGER_DIALOGUE_POOL: [&[&str]; 4] = [
    &[
        "",
        "Train your ENDURANCE if you want to survive out here.",
        "Raise your shield toward an attacker. A clean block teaches you far more than a bruise does.",
        "Mind the angle, though. A shield only covers the quarter circle it faces.",
    ],
    &[
        "",
        "MIGHT grows with every blow you land.",
        "Not a fighter? Take an axe to the trees. Chopping lumber builds the arms just as well.",
    ],
    &[
        "",
        "Each weapon has its own temper.",
        "A sword swings fast and hits hard.",
        "A spear is slower and lighter, but it keeps trouble at arm's length.",
    ],
    &[
        "",
        "Bandits roam these woods. They carry gold, and sometimes a potion or two.",
        "Drink a potion when you are hurt. It does nothing for a healthy body.",
    ],
];

/// Lower bound of the first idle period after spawning
pub const INITIAL_IDLE_MIN_MS: u64 = 1000;
pub const INITIAL_IDLE_MAX_MS: u64 = 3000;

/// AI state machine memory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brain {
    pub state: AiState,
    /// Simulation time at which the current idle/moving period ends
    pub deadline: u64,
    /// Last intended movement direction
    pub heading: Vec2,
}

impl Brain {
    pub fn new(deadline: u64) -> Self {
        Self {
            state: AiState::Idle,
            deadline,
            heading: Vec2::new(0.0, -1.0),
        }
    }

    /// Brain for a freshly spawned NPC, idling for a random 1-3 s.
    pub fn spawned<R: Rng>(now: u64, rng: &mut R) -> Self {
        Self::new(now + rng.gen_range(INITIAL_IDLE_MIN_MS..=INITIAL_IDLE_MAX_MS))
    }
}

#[derive(Debug, Clone)]
pub struct BanditState {
    pub brain: Brain,
    pub equipment: Equipment,
    /// Earliest simulation time of the next strike
    pub next_attack_at: u64,
}

#[derive(Debug, Clone)]
pub struct VillagerState {
    pub brain: Brain,
    pub dialogue: Vec<String>,
}
