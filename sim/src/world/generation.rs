//! Procedural world layout: trees, water pools and NPC spawn points.
//!
//! Placement is rejection sampling with a bounded number of attempts per
//! entity; when every attempt fails the entity is skipped.

use log::{debug, info, warn};
use rand::Rng;

use crate::config::WorldConfig;
use crate::entities::{CHARACTER_RADIUS, TREE_TRUNK_RADIUS};
use crate::physics::{Bounds, Circle, Vec2};

/// Radius of a water pool
pub const WATER_RADIUS: f32 = 90.0;

/// Footprint of a tree sprite; drives spacing and margins
const TREE_SIZE: f32 = 102.4;
const WATER_SIZE: f32 = WATER_RADIUS * 2.0;

/// Extra clearance added around everything during placement
const PLACEMENT_BUFFER: f32 = 5.0;

const OBSTACLE_ATTEMPTS: usize = 30;
const NPC_ATTEMPTS: usize = 50;

/// Minimum distance between spawned NPCs
pub const NPC_MIN_DISTANCE: f32 = 50.0;
pub const NPC_MARGIN: f32 = 50.0;

/// Positions of everything in a world, before any entity exists
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub bounds: Bounds,
    pub player: Vec2,
    pub trees: Vec<Vec2>,
    pub water: Vec<Circle>,
    pub bandits: Vec<Vec2>,
    pub villagers: Vec<Vec2>,
}

/// Something already placed, with its clearance radius
#[derive(Debug, Clone, Copy)]
struct Placed {
    center: Vec2,
    radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Random,
    Cluster,
}

impl Layout {
    /// A layout with only the player, for hand-built scenarios.
    pub fn empty(bounds: Bounds, player: Vec2) -> Self {
        Self {
            bounds,
            player,
            trees: Vec::new(),
            water: Vec::new(),
            bandits: Vec::new(),
            villagers: Vec::new(),
        }
    }

    /// Generate a layout; the player starts at the centre.
    pub fn generate<R: Rng>(config: &WorldConfig, rng: &mut R) -> Self {
        let bounds = Bounds::new(config.width, config.height);
        let mut layout = Self::empty(bounds, Vec2::new(config.width / 2.0, config.height / 2.0));

        let tree_spacing = TREE_SIZE * 1.1;
        layout.trees = layout
            .place_obstacles(rng, config.trees, TREE_TRUNK_RADIUS, tree_spacing, TREE_SIZE, Placement::Random)
            .into_iter()
            .map(|placed| placed.center)
            .collect();

        let water_spacing = WATER_SIZE * 1.1;
        layout.water = layout
            .place_obstacles(rng, config.water_pools, WATER_RADIUS, water_spacing, WATER_SIZE / 2.0, Placement::Cluster)
            .into_iter()
            .map(|placed| Circle::at(placed.center, WATER_RADIUS))
            .collect();

        for _ in 0..config.bandits {
            if let Some(pos) = layout.find_spawn_position(rng, NPC_MIN_DISTANCE, NPC_MARGIN) {
                layout.bandits.push(pos);
            }
        }
        for _ in 0..config.villagers {
            if let Some(pos) = layout.find_spawn_position(rng, NPC_MIN_DISTANCE, NPC_MARGIN) {
                layout.villagers.push(pos);
            }
        }

        info!(
            "Generated {}x{} world: {} trees, {} water pools, {} bandits, {} villagers",
            config.width,
            config.height,
            layout.trees.len(),
            layout.water.len(),
            layout.bandits.len(),
            layout.villagers.len()
        );
        layout
    }

    /// Everything placed so far, with clearance radii.
    fn occupied(&self) -> Vec<Placed> {
        let tree_r = TREE_TRUNK_RADIUS + PLACEMENT_BUFFER;
        let npc_r = CHARACTER_RADIUS + PLACEMENT_BUFFER;
        self.trees
            .iter()
            .map(|c| Placed { center: *c, radius: tree_r })
            .chain(self.water.iter().map(|w| Placed { center: w.center, radius: w.radius + PLACEMENT_BUFFER }))
            .chain(self.bandits.iter().chain(self.villagers.iter()).map(|c| Placed { center: *c, radius: npc_r }))
            .collect()
    }

    fn place_obstacles<R: Rng>(
        &self,
        rng: &mut R,
        count: usize,
        radius: f32,
        min_distance: f32,
        margin: f32,
        placement: Placement,
    ) -> Vec<Placed> {
        let others = self.occupied();
        let self_radius = radius + PLACEMENT_BUFFER;
        let cluster_radius = radius * 2.0 * 1.5;
        let player_keep_out = min_distance * 1.5;
        let mut group: Vec<Placed> = Vec::new();

        for _ in 0..count {
            let mode = if placement == Placement::Cluster && !group.is_empty() {
                Placement::Cluster
            } else {
                Placement::Random
            };

            let mut found = None;
            for _ in 0..OBSTACLE_ATTEMPTS {
                let candidate = match mode {
                    Placement::Cluster => {
                        let anchor = group[rng.gen_range(0..group.len())].center;
                        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                        let offset = rng.gen_range(radius * 2.0 * 0.2..cluster_radius);
                        let pos = anchor + Vec2::from_angle(angle) * offset;
                        Some(Vec2::new(
                            pos.x.clamp(margin, (self.bounds.width - margin).max(margin)),
                            pos.y.clamp(margin, (self.bounds.height - margin).max(margin)),
                        ))
                    }
                    Placement::Random => random_point(rng, self.bounds, margin),
                };
                let Some(candidate) = candidate else { break };

                if candidate.distance_squared_to(self.player) < player_keep_out * player_keep_out {
                    continue;
                }
                if too_close(candidate, self_radius, &others) {
                    continue;
                }
                if mode == Placement::Random
                    && group.iter().any(|p| candidate.distance_squared_to(p.center) < min_distance * min_distance)
                {
                    continue;
                }
                found = Some(candidate);
                break;
            }

            match found {
                Some(center) => group.push(Placed { center, radius: self_radius }),
                None => debug!("Gave up placing an obstacle after {} attempts", OBSTACLE_ATTEMPTS),
            }
        }

        if group.len() < count {
            warn!("Placed {}/{} obstacles", group.len(), count);
        }
        group
    }

    /// Find a free spot for an NPC, or `None` after a bounded search.
    pub fn find_spawn_position<R: Rng>(&self, rng: &mut R, min_distance: f32, margin: f32) -> Option<Vec2> {
        let others = self.occupied();
        let self_radius = CHARACTER_RADIUS + PLACEMENT_BUFFER;
        let player_keep_out = min_distance * 2.0;

        for _ in 0..NPC_ATTEMPTS {
            let candidate = random_point(rng, self.bounds, margin)?;
            if candidate.distance_squared_to(self.player) < player_keep_out * player_keep_out {
                continue;
            }
            if too_close(candidate, self_radius, &others) {
                continue;
            }
            return Some(candidate);
        }

        warn!("No valid spawn position after {} attempts", NPC_ATTEMPTS);
        None
    }
}

fn too_close(candidate: Vec2, self_radius: f32, others: &[Placed]) -> bool {
    others.iter().any(|other| {
        let reach = other.radius + self_radius;
        candidate.distance_squared_to(other.center) < reach * reach
    })
}

/// Uniform point at least `margin` from every edge; `None` if the world is too small.
fn random_point<R: Rng>(rng: &mut R, bounds: Bounds, margin: f32) -> Option<Vec2> {
    let (max_x, max_y) = (bounds.width - margin, bounds.height - margin);
    if max_x <= margin || max_y <= margin {
        return None;
    }
    Some(Vec2::new(rng.gen_range(margin..max_x), rng.gen_range(margin..max_y)))
}
