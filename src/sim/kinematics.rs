//! Per-entity motion integration
//!
//! Velocity is an exponentially damped impulse accumulator: input adds
//! impulses, friction bleeds them off, gravity pulls y down every tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// World-space clamp rectangle for an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            top: CEILING_Y,
            bottom: GROUND_Y,
            left: ENTITY_LEFT,
            right: ENTITY_RIGHT,
        }
    }
}

/// Moving part shared by the player and the enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    /// Per-tick velocity
    pub velocity: Vec3,
    /// Per-axis impulse magnitudes
    pub speed: Vec3,
    pub bounds: Bounds,
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec3, speed: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            speed,
            bounds: Bounds::default(),
            radius,
        }
    }

    /// Apply friction and gravity, then move by the resulting velocity.
    ///
    /// Does not clamp; call [`Body::clamp_to_bounds`] afterwards.
    pub fn integrate(&mut self) {
        self.velocity.x *= FRICTION_X;
        self.velocity.y -= GRAVITY;
        self.velocity.z *= FRICTION_Z;
        self.position += self.velocity;
    }

    /// Clamp position into bounds. Landing on the floor kills downward velocity.
    pub fn clamp_to_bounds(&mut self) {
        let b = self.bounds;
        if self.position.y <= b.bottom {
            self.position.y = b.bottom;
            self.velocity.y = self.velocity.y.max(0.0);
        }
        if self.position.y > b.top {
            self.position.y = b.top;
        }
        self.position.x = self.position.x.clamp(b.left, b.right);
    }

    /// True when within `margin` above the floor
    #[inline]
    pub fn is_grounded_within(&self, margin: f32) -> bool {
        self.position.y < self.bounds.bottom + margin
    }

    /// Exactly on the floor
    #[inline]
    pub fn on_floor(&self) -> bool {
        self.position.y <= self.bounds.bottom
    }

    /// Reset motion state at a new spot
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
    }
}
