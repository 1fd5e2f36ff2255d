//! Level streaming: the forest is generated a band at a time ahead of the
//! fox and culled behind it, so only a short window ever exists.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::obstacle::{Obstacle, ObstacleKind, pick_kind};
use crate::consts::*;

/// Owns every obstacle in the world
#[derive(Debug, Clone)]
pub struct LevelStreamer {
    /// Last band index that triggered generation (-1 before the first run)
    pub level: i32,
    obstacles: Vec<Obstacle>,
    goal_id: Option<u32>,
    rng: Pcg32,
    next_id: u32,
}

impl LevelStreamer {
    pub fn new(seed: u64) -> Self {
        Self {
            level: -1,
            obstacles: Vec::new(),
            goal_id: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Empty the world for a new run
    pub fn reset(&mut self) {
        self.level = -1;
        self.obstacles.clear();
        self.goal_id = None;
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }

    /// The foxhole, if it still exists
    pub fn goal(&self) -> Option<&Obstacle> {
        let id = self.goal_id?;
        self.obstacles.iter().find(|o| o.id == id)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True when the traveler has entered a band that has no lookahead yet
    #[inline]
    pub fn needs_advance(&self, traveler_z: f32) -> bool {
        self.level - 1 < crate::band_index(traveler_z)
    }

    /// Generate/cull as needed for the traveler's depth. Returns true if a band was added.
    pub fn update(&mut self, traveler_z: f32) -> bool {
        if self.needs_advance(traveler_z) {
            self.advance(traveler_z);
            true
        } else {
            false
        }
    }

    /// Move to the next level: bootstrap on the first call, then one band ahead
    pub fn advance(&mut self, traveler_z: f32) {
        self.level += 1;
        log::debug!("Level {}", self.level);
        if self.level == 0 {
            self.spawn_goal();
            self.generate_band(0);
        }
        self.generate_band(self.level + 1);
        self.cull(traveler_z);
    }

    fn spawn_goal(&mut self) {
        let x = self.rng.random_range(-GOAL_SPREAD..GOAL_SPREAD);
        let id = self.next_entity_id();
        self.obstacles
            .push(Obstacle::new(id, ObstacleKind::Goal, Vec3::new(x, GROUND_Y, GOAL_DEPTH)));
        self.goal_id = Some(id);
    }

    /// Scatter one band's worth of obstacles over `[index·128, (index+1)·128)` of travel.
    /// Returns how many were placed.
    pub fn generate_band(&mut self, index: i32) -> usize {
        let near = index as f32 * BAND_DEPTH;
        let far = (index + 1) as f32 * BAND_DEPTH;
        let goal_z = self.goal().map(|g| g.position.z);
        let mut placed = 0;

        for _ in 0..OBSTACLES_PER_BAND {
            let x = self.rng.random_range(WORLD_LEFT..WORLD_RIGHT);
            let z = -(self.rng.random::<f32>() * (far - near) + near);

            // Keep the approach to the foxhole clear
            if goal_z.is_some_and(|gz| (z - gz).abs() < GOAL_EXCLUSION) {
                continue;
            }

            let variant = self.rng.random_range(0..2u8);
            let sway = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let kind = pick_kind(self.rng.random::<f32>());
            let id = self.next_entity_id();
            self.obstacles.push(
                Obstacle::new(id, kind, Vec3::new(x, GROUND_Y, z)).with_look(variant, sway),
            );
            placed += 1;
        }

        log::debug!("Created level from {} to {} ({} obstacles)", near, far, placed);
        placed
    }

    /// Drop everything that has fallen behind the traveler
    pub fn cull(&mut self, traveler_z: f32) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.position.z <= traveler_z + CULL_MARGIN);
        let removed = before - self.obstacles.len();
        log::debug!("Removed {} obstacles", removed);
        removed
    }

    /// Per-tick obstacle animation
    pub fn animate(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.animate();
        }
    }
}
