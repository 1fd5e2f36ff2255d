//! Forest obstacles and their per-kind ejection rules
//!
//! One `Obstacle` struct, tagged by `ObstacleKind`. What happens on contact
//! is decided by the obstacle, dispatched on its kind.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, push};
use super::player::Player;
use super::state::SoundCue;
use crate::consts::*;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Trips a grounded runner
    Rock,
    /// Slows and deflects
    Tree,
    /// Makes the fox high
    Mushroom,
    /// Cures the high and restores stamina
    Berry,
    /// The foxhole: reaching it wins the run
    Goal,
}

/// Static per-kind behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindTraits {
    pub radius: f32,
    /// Removed from the world when triggered
    pub consumable: bool,
    /// Applies the generic positional push on contact
    pub pushes: bool,
}

impl ObstacleKind {
    pub const fn traits(self) -> KindTraits {
        match self {
            ObstacleKind::Rock => KindTraits { radius: 0.2, consumable: false, pushes: true },
            ObstacleKind::Tree => KindTraits { radius: 0.5, consumable: false, pushes: true },
            ObstacleKind::Mushroom => KindTraits { radius: 0.2, consumable: true, pushes: false },
            ObstacleKind::Berry => KindTraits { radius: 0.2, consumable: true, pushes: false },
            ObstacleKind::Goal => KindTraits { radius: 1.5, consumable: false, pushes: false },
        }
    }

    #[inline]
    pub const fn radius(self) -> f32 {
        self.traits().radius
    }
}

/// Spawn probabilities, tested cumulatively in this order
pub const SPAWN_TABLE: [(ObstacleKind, f32); 4] = [
    (ObstacleKind::Tree, 0.70),
    (ObstacleKind::Rock, 0.20),
    (ObstacleKind::Mushroom, 0.07),
    (ObstacleKind::Berry, 0.03),
];

/// Kind for a uniform roll in `[0, 1)`
pub fn pick_kind(roll: f32) -> ObstacleKind {
    let mut threshold = 0.0;
    for (kind, probability) in SPAWN_TABLE {
        threshold += probability;
        if roll < threshold {
            return kind;
        }
    }
    // Rounding can leave the last slice a hair short of 1.0
    SPAWN_TABLE[SPAWN_TABLE.len() - 1].0
}

/// Berry bob period divisor and height
const BOB_PERIOD: f32 = 65.0;
const BOB_HEIGHT: f32 = 0.3;

/// Result of an obstacle acting on the runner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ejection {
    /// The obstacle destroys itself
    pub consumed: bool,
    pub cue: Option<SoundCue>,
    /// The runner reached the foxhole
    pub reached_goal: bool,
}

/// An obstacle in the forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub radius: f32,
    /// Sprite variation (rocks and berries have two looks)
    pub variant: u8,
    /// Sway direction for trees (+1 or -1)
    pub sway: f32,
    /// Animation clock (berry bob phase)
    pub ticks: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, position: Vec3) -> Self {
        let ticks = if kind == ObstacleKind::Berry {
            crate::wrap_positive(position.z, BAND_DEPTH)
        } else {
            0.0
        };
        Self {
            id,
            kind,
            position,
            radius: kind.radius(),
            variant: 0,
            sway: 1.0,
            ticks,
        }
    }

    pub fn with_look(mut self, variant: u8, sway: f32) -> Self {
        self.variant = variant;
        self.sway = sway;
        self
    }

    /// Per-tick animation independent of collisions
    pub fn animate(&mut self) {
        self.ticks += 1.0;
        if self.kind == ObstacleKind::Berry {
            self.position.y = GROUND_Y
                + BOB_HEIGHT * (1.0 + (std::f32::consts::PI * self.ticks / BOB_PERIOD).sin());
        }
    }

    /// Apply this obstacle's rule to the runner that touched it
    pub fn eject_other(&self, other: &mut Player, contact: &Contact, now_ms: f64) -> Ejection {
        let traits = self.kind.traits();
        let grounded = other.body.is_grounded_within(2.0 * self.radius);
        let mut pushes = traits.pushes;
        let mut out = Ejection::default();

        let triggered = match self.kind {
            ObstacleKind::Rock => {
                // A tumbling fox slides over rocks and never trips twice on one
                if other.is_tumbling() || other.tripped_on == Some(self.id) {
                    pushes = false;
                    false
                } else if grounded && other.fall(now_ms) {
                    other.tripped_on = Some(self.id);
                    out.cue = Some(SoundCue::Fall);
                    true
                } else {
                    false
                }
            }
            ObstacleKind::Tree => {
                other.slow_down(contact.normal.y.cos() - 0.25);
                true
            }
            ObstacleKind::Mushroom => {
                if grounded {
                    other.high_mode();
                    out.cue = Some(SoundCue::Mushroom);
                }
                grounded
            }
            ObstacleKind::Berry => {
                other.reset_stamina();
                other.normal_mode();
                out.cue = Some(SoundCue::Berry);
                true
            }
            ObstacleKind::Goal => {
                other.normal_mode();
                out.reached_goal = true;
                true
            }
        };

        out.consumed = triggered && traits.consumable;
        if pushes {
            push(&mut other.body, contact);
        }
        out
    }
}
