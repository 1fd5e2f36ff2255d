//! The Fox: input-driven runner with stamina and a mushroom "high"

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::kinematics::Body;
use super::state::SoundCue;
use crate::consts::*;
use crate::input::{Control, TickInput};

/// Player collision radius
pub const PLAYER_RADIUS: f32 = 0.5;
/// Impulse caps while sober
pub const NORMAL_SPEED: Vec3 = Vec3::new(0.1, 0.15, 0.05);
/// Impulse caps at full high
pub const HIGH_SPEED: Vec3 = Vec3::new(0.05, 0.1, 0.04);
/// Stamina spent per jump
pub const JUMP_COST: f32 = 0.35;
/// Stamina regained per tick
pub const STAMINA_REGEN: f32 = 0.005;
/// Jumping is allowed this close to the floor
pub const JUMP_MARGIN: f32 = 0.25;
/// Ticks between running hops
pub const HOP_INTERVAL: u64 = 5;
/// Ticks between geometric high decay steps
pub const HIGH_DECAY_INTERVAL: u64 = 30;
pub const HIGH_DECAY: f32 = 0.95;
/// Below this the high wears off entirely
pub const HIGH_CUTOFF: f32 = 0.1;
/// Forward drift while tumbling
pub const TUMBLE_DRIFT: f32 = 0.002;
/// Running animation frames
pub const RUN_FRAMES: u32 = 2;

/// Locomotion state of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Locomotion {
    Running,
    /// Fell over a rock; gets up once the simulation clock reaches the deadline
    Tumbling { recover_at_ms: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub stamina: f32,
    /// Mushroom high intensity (1.0 fully high, 0.0 sober)
    pub high: f32,
    pub locomotion: Locomotion,
    /// Rock the fox last fell over, until contact with it ends
    pub tripped_on: Option<u32>,
    /// Small automatic hops while running
    pub jump_run: bool,
    pub ticks: u64,
    pub frame: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            body: Body::new(Vec3::new(0.0, GROUND_Y, 0.0), NORMAL_SPEED, PLAYER_RADIUS),
            stamina: 1.0,
            high: 0.0,
            locomotion: Locomotion::Running,
            tripped_on: None,
            jump_run: true,
            ticks: 0,
            frame: 0,
        }
    }

    /// Back to the start line, sober and rested, with no pending tumble
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    #[inline]
    pub fn is_tumbling(&self) -> bool {
        matches!(self.locomotion, Locomotion::Tumbling { .. })
    }

    /// Get back up once the tumble deadline has passed
    pub fn update_locomotion(&mut self, now_ms: f64) {
        if let Locomotion::Tumbling { recover_at_ms } = self.locomotion {
            if now_ms >= recover_at_ms {
                self.get_up();
            }
        }
    }

    /// Steering and jumping from held controls. Returns the jump cue if a jump started.
    pub fn handle_input(&mut self, input: &TickInput) -> Option<SoundCue> {
        if self.is_tumbling() {
            return None;
        }

        let mut cue = None;
        if input.held(Control::Jump)
            && self.body.is_grounded_within(JUMP_MARGIN)
            && self.stamina >= JUMP_COST
        {
            self.body.velocity.y = self.body.speed.y;
            self.frame = 1;
            self.stamina -= JUMP_COST;
            cue = Some(SoundCue::Jump);
        }

        // Full steering on the ground, half in the air
        let steer = if self.body.on_floor() {
            self.body.speed.x
        } else {
            self.body.speed.x * 0.5
        };
        if input.held(Control::Left) {
            self.body.velocity.x -= steer;
        }
        if input.held(Control::Right) {
            self.body.velocity.x += steer;
        }

        cue
    }

    /// Forward drive, hops, integration and bounds clamp.
    ///
    /// Returns the hop cue when an automatic hop starts.
    pub fn step_motion(&mut self) -> Option<SoundCue> {
        self.ticks += 1;
        let mut cue = None;

        match self.locomotion {
            Locomotion::Running => {
                if self.jump_run && self.ticks % HOP_INTERVAL == 0 && self.body.on_floor() {
                    self.body.velocity.y = self.body.speed.y / 2.0;
                    self.frame = (self.frame + 1) % RUN_FRAMES;
                    cue = Some(SoundCue::Jump);
                }
                self.body.velocity.z -= self.body.speed.z * (0.5 + self.stamina * 0.5);
            }
            Locomotion::Tumbling { .. } => {
                self.body.velocity.z -= TUMBLE_DRIFT;
            }
        }

        self.body.integrate();
        self.body.clamp_to_bounds();
        cue
    }

    /// Stamina regeneration and high decay, after collisions
    pub fn regenerate(&mut self) {
        self.stamina = (self.stamina + STAMINA_REGEN).min(1.0);

        if self.high > 0.0 && self.ticks % HIGH_DECAY_INTERVAL == 0 {
            self.high *= HIGH_DECAY;
            self.apply_high_effect();
            if self.high < HIGH_CUTOFF {
                self.normal_mode();
            }
        }
    }

    /// Trip over. Returns false if already down.
    pub fn fall(&mut self, now_ms: f64) -> bool {
        if self.is_tumbling() {
            return false;
        }
        self.locomotion = Locomotion::Tumbling {
            recover_at_ms: now_ms + TUMBLE_MS,
        };
        self.frame = 0;
        true
    }

    fn get_up(&mut self) {
        self.locomotion = Locomotion::Running;
        self.frame = 0;
    }

    pub fn slow_down(&mut self, factor: f32) {
        self.body.velocity.z *= factor;
    }

    /// Blend speed caps between sober and high by the current intensity
    pub fn apply_high_effect(&mut self) {
        self.body.speed = HIGH_SPEED * self.high + NORMAL_SPEED * (1.0 - self.high);
    }

    pub fn high_mode(&mut self) {
        self.high = 1.0;
        self.apply_high_effect();
    }

    pub fn normal_mode(&mut self) {
        self.high = 0.0;
        self.apply_high_effect();
    }

    pub fn reset_stamina(&mut self) {
        self.stamina = 1.0;
    }
}
