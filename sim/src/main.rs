//! Headless session runner.
//!
//! Builds a world from config, plays it with a simple autopilot at the
//! configured tick rate and logs the event stream.

use std::time::{Duration, Instant};

use log::{debug, error, info};
use rpg_shared::{CharacterKind, GameEvent, PlayerInput};
use rpg_sim::ai::AGGRO_RADIUS;
use rpg_sim::config::DEFAULT_CONFIG_PATH;
use rpg_sim::{ChannelSubscriber, GameWorld, SimConfig};
use tokio::sync::mpsc;

/// Sword reach: listed range plus the reach bonus
const STRIKE_DISTANCE: f32 = 134.0;

/// Raise the shield once a bandit is this close
const BLOCK_DISTANCE: f32 = 90.0;

/// Drink a potion below this fraction of max health
const POTION_THRESHOLD: f32 = 0.4;

/// Walk toward bandits inside this distance
const HUNT_DISTANCE: f32 = AGGRO_RADIUS * 2.0;

/// Pick this tick's input from the world as the player sees it.
fn autopilot(world: &GameWorld) -> PlayerInput {
    let mut input = PlayerInput::default();
    let Some(player) = world.player().filter(|p| p.is_alive()) else {
        return input;
    };
    let origin = player.position;

    if (player.health as f32) < player.max_health as f32 * POTION_THRESHOLD {
        input.use_item = true;
    }

    let nearest = world
        .characters()
        .filter(|c| c.is_alive() && c.kind() == CharacterKind::Bandit)
        .min_by(|a, b| {
            origin
                .distance_squared_to(a.position)
                .total_cmp(&origin.distance_squared_to(b.position))
        });
    let Some(bandit) = nearest else {
        return input;
    };

    let distance = origin.distance_to(bandit.position);
    let aim = Some(bandit.position.to_array());
    if distance <= BLOCK_DISTANCE {
        input.off_hand = aim;
    }
    if distance <= STRIKE_DISTANCE {
        input.primary = aim;
    } else if distance <= HUNT_DISTANCE {
        let toward = bandit.position - origin;
        input.move_x = step(toward.x);
        input.move_y = step(toward.y);
    }
    input
}

fn step(delta: f32) -> i8 {
    if delta > 10.0 {
        1
    } else if delta < -10.0 {
        -1
    } else {
        0
    }
}

/// Presentation side: drain the event channel into the log.
async fn log_events(mut rx: mpsc::UnboundedReceiver<GameEvent>) -> usize {
    let mut count = 0;
    while let Some(event) = rx.recv().await {
        count += 1;
        match &event {
            GameEvent::StatLeveledUp { stat, level } => info!("[EVENT] {} reached level {}", stat.name(), level),
            GameEvent::EntityDefeated { id, kind } => info!("[EVENT] {} {} defeated", kind.name(), id),
            GameEvent::LootCollected { kind, value, .. } => info!("[EVENT] collected {:?} x{}", kind, value),
            GameEvent::PlayerDied => info!("[EVENT] the player died"),
            other => debug!("[EVENT] {}", other.label()),
        }
    }
    count
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let mut config = SimConfig::load_or_default(&config_path);
    config.apply_env_overrides();

    info!("Starting simulation...");
    info!("Difficulty: {}", config.difficulty.name());
    info!("Tick rate: {} Hz, session length: {}s", config.tick_rate, config.session_secs);

    let mut world = match GameWorld::generate(&config) {
        Ok(world) => world,
        Err(e) => {
            error!("Failed to build the world: {}", e);
            return;
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    world.subscribe(ChannelSubscriber::new(tx));
    let logger = tokio::spawn(log_events(rx));

    let tick_ms = config.tick_ms();
    let tick_duration = Duration::from_millis(tick_ms);
    let session_ms = config.session_secs * 1000;
    let mut tick_count: u64 = 0;

    // Main loop
    while world.now() < session_ms {
        let tick_start = Instant::now();

        let input = autopilot(&world);
        world.tick(tick_ms, &input);
        tick_count += 1;

        if world.player().map_or(true, |p| !p.is_alive()) {
            info!("Player is down, ending the session early");
            break;
        }

        // Sleep until next tick
        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            tokio::time::sleep(tick_duration - elapsed).await;
        }
    }

    if let Some(player) = world.player() {
        info!(
            "Session over after {} ticks: health {}/{}, gold {}, {} bandits left",
            tick_count,
            player.health,
            player.max_health,
            player.player().map_or(0, |state| state.gold),
            world.count_active(CharacterKind::Bandit)
        );
    }

    // Dropping the world closes the channel and lets the logger finish
    drop(world);
    match logger.await {
        Ok(count) => info!("{} events delivered", count),
        Err(e) => error!("Event logger failed: {}", e),
    }
}
