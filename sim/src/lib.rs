//! Simulation core for a top-down action RPG.
//!
//! A single-threaded, tick-driven world: a player, roaming bandits, villagers
//! to talk to and trees to chop. Presentation layers drive it with
//! [`PlayerInput`](rpg_shared::PlayerInput) and
//! [`PlayerRequest`](rpg_shared::PlayerRequest) values and observe it through
//! [`GameEvent`](rpg_shared::GameEvent) subscriptions.

pub mod ai;
pub mod combat;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod loot;
pub mod physics;
pub mod progression;
pub mod world;

pub use config::SimConfig;
pub use error::{RequestError, SimError};
pub use events::{ChannelSubscriber, EventLog, EventSubscriber};
pub use world::{GameWorld, Layout, PrimaryOutcome};
