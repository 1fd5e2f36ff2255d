//! Evil Mr. Grabberson: the adaptive pursuer
//!
//! He steers toward the fox laterally and matches the fox's forward speed
//! more closely the nearer he gets. His own base speed is a touch below the
//! fox's, so a fox that keeps running is never caught.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::kinematics::Body;
use crate::consts::*;

/// Enemy collision radius
pub const ENEMY_RADIUS: f32 = 0.5;
/// Base impulse caps (the fox runs at z 0.05)
pub const ENEMY_SPEED: Vec3 = Vec3::new(0.1, 0.15, 0.049);
/// Extra closing bias added to the speed blend
pub const CLOSING_BIAS: f32 = 0.005;
/// Distance scale of the speed blend attenuation
pub const BLEND_DISTANCE: f32 = 10.0;
/// Ticks per grab animation frame
pub const GRAB_FRAME_TICKS: u64 = 5;

/// Output of one pursuit step for audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitStep {
    /// Hands just closed (grab sound)
    pub grabbed: bool,
    /// Grab sound loudness, louder as he closes in
    pub grab_volume: f32,
    /// Depth distance to the player after the step
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    /// Player depth seen on the previous tick
    pub last_player_z: f32,
    /// Simulation time of that sample
    pub last_sample_ms: f64,
    /// Last valid closing speed estimate (units per ms)
    pub player_speed: f32,
    pub ticks: u64,
    pub frame: u32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self::new()
    }
}

impl Enemy {
    pub fn new() -> Self {
        Self {
            body: Body::new(Vec3::new(0.0, GROUND_Y, ENEMY_START_Z), ENEMY_SPEED, ENEMY_RADIUS),
            last_player_z: 0.0,
            last_sample_ms: 0.0,
            player_speed: 0.0,
            ticks: 0,
            frame: 0,
        }
    }

    /// Back behind the start line, sampling from the given player depth and time
    pub fn reset(&mut self, player_z: f32, now_ms: f64) {
        *self = Self::new();
        self.last_player_z = player_z;
        self.last_sample_ms = now_ms;
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Forward speed the enemy pushes for this tick
    pub fn target_z_speed(&self, distance: f32) -> f32 {
        let distance = distance.max(0.0);
        let base = self.body.speed.z;
        base + (self.player_speed - base + CLOSING_BIAS) / (1.0 + distance / BLEND_DISTANCE)
    }

    /// Chase the player one tick
    pub fn pursue(&mut self, player: Vec3, now_ms: f64) -> PursuitStep {
        self.ticks += 1;
        let mut grabbed = false;
        let frame = ((self.ticks / GRAB_FRAME_TICKS) % 2) as u32;
        if frame != self.frame {
            self.frame = frame;
            grabbed = frame == 1;
        }

        // Lateral correction proportional to the offset
        let direction = player.x - self.body.position.x;
        self.body.velocity.x += direction * self.body.speed.x;

        let distance = self.body.position.z - player.z;
        let elapsed = now_ms - self.last_sample_ms;
        if elapsed > 0.0 {
            self.player_speed = (self.last_player_z - player.z) / elapsed as f32;
        }
        self.body.velocity.z -= self.target_z_speed(distance);

        self.body.integrate();
        self.body.clamp_to_bounds();

        self.last_player_z = player.z;
        self.last_sample_ms = now_ms;

        let distance = (self.body.position.z - player.z).max(0.0);
        PursuitStep {
            grabbed,
            grab_volume: 1.0 / (1.0 + distance),
            distance,
        }
    }
}
