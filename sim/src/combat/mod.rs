//! Combat rules: hit-testing, damage, blocking and knockback.
//!
//! Everything here is pure; the world applies the results to its characters.

pub mod damage;
pub mod knockback;
pub mod targeting;

pub use damage::{attack_power, calculate_damage, effective_defense, resolve_blow, scale_attack, Blow};
pub use knockback::{Knockback, KNOCKBACK_DURATION_MS};
pub use targeting::{closest_target, effective_range, in_strike_zone};

use std::f32::consts::FRAC_PI_2;

/// Extra reach added to every weapon's listed range
pub const DAMAGE_RANGE_BONUS: f32 = 54.0;

/// Total width of the swing arc
pub const ATTACK_ARC: f32 = FRAC_PI_2;

/// Total width of the arc a raised shield covers
pub const BLOCK_ARC: f32 = FRAC_PI_2;

pub const ENDURANCE_XP_PER_DAMAGE: u32 = 1;
pub const ENDURANCE_XP_PER_BLOCK_MITIGATION: u32 = 5;

/// Might XP granted per chop
pub const CHOP_MIGHT_XP: f64 = 5.0;

pub const DEFAULT_PRIMARY_COOLDOWN_MS: u64 = 500;
pub const DEFAULT_SHIELD_COOLDOWN_MS: u64 = 1000;
pub const DEFAULT_BLOCK_DURATION_MS: u64 = 800;

/// Damage an axe deals when it lists no tool power
pub const DEFAULT_TOOL_POWER: u32 = 1;
