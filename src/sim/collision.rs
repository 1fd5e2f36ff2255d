//! Circle overlap and ejection resolution in the ground plane
//!
//! Everything is tested in x/z only; height is ignored except where an
//! obstacle's own rule checks whether the runner is grounded.

use glam::{Vec2, Vec3};

use super::kinematics::Body;
use super::obstacle::{Obstacle, ObstacleKind};
use super::player::Player;
use super::state::SoundCue;

/// Contact between a runner and an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from runner toward obstacle, as (x, z).
    /// Zero when the two centers coincide.
    pub normal: Vec2,
    /// Overlap distance (combined radius minus center distance)
    pub penetration: f32,
}

/// Project onto the ground plane as (x, z)
#[inline]
pub fn ground(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Check overlap between two circles in the ground plane
pub fn circle_contact(a: Vec3, a_radius: f32, b: Vec3, b_radius: f32) -> Option<Contact> {
    let delta = ground(b) - ground(a);
    let distance = delta.length();
    let combined = a_radius + b_radius;
    if distance < combined {
        Some(Contact {
            // Coincident centers give no usable direction
            normal: delta.normalize_or_zero(),
            penetration: combined - distance,
        })
    } else {
        None
    }
}

/// Move the body out along the contact normal by the overlap
pub fn push(body: &mut Body, contact: &Contact) {
    let offset = contact.normal * contact.penetration;
    body.position.x -= offset.x;
    body.position.z -= offset.y;
}

/// Everything that happened during one collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Obstacles touched this pass, in collection order
    pub hits: Vec<(u32, ObstacleKind)>,
    /// Consumed obstacles removed after the pass
    pub removed: Vec<u32>,
    pub cues: Vec<SoundCue>,
    pub reached_goal: bool,
}

/// Test the runner against every obstacle in order and apply each rule.
///
/// All overlaps are applied; later tests see the runner where earlier pushes
/// left it. Consumed obstacles are dropped after the pass so the walk never
/// skips or revisits a neighbour.
pub fn resolve_obstacles(
    player: &mut Player,
    obstacles: &mut Vec<Obstacle>,
    now_ms: f64,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for obstacle in obstacles.iter() {
        let Some(contact) = circle_contact(
            player.body.position,
            player.body.radius,
            obstacle.position,
            obstacle.radius,
        ) else {
            continue;
        };

        let ejection = obstacle.eject_other(player, &contact, now_ms);
        report.hits.push((obstacle.id, obstacle.kind));
        if ejection.consumed {
            report.removed.push(obstacle.id);
        }
        if let Some(cue) = ejection.cue {
            report.cues.push(cue);
        }
        report.reached_goal |= ejection.reached_goal;
    }

    if let Some(rock) = player.tripped_on {
        if !report.hits.iter().any(|&(id, _)| id == rock) {
            player.tripped_on = None;
        }
    }

    if !report.removed.is_empty() {
        obstacles.retain(|o| !report.removed.contains(&o.id));
        log::debug!("Consumed {} obstacles", report.removed.len());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROUND_Y;
    use proptest::prelude::*;

    fn obstacle(id: u32, kind: ObstacleKind, x: f32, z: f32) -> Obstacle {
        Obstacle::new(id, kind, Vec3::new(x, GROUND_Y, z))
    }

    #[test]
    fn test_contact_ignores_height() {
        let a = Vec3::new(0.0, -1.5, 0.0);
        let b = Vec3::new(0.3, 100.0, 0.0);
        let c = circle_contact(a, 0.5, b, 0.2).expect("overlap");
        assert!((c.normal - Vec2::X).length() < 1e-6);
        assert!((c.penetration - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.0, -0.7);
        assert!(circle_contact(a, 0.5, b, 0.2).is_none());
    }

    #[test]
    fn test_coincident_centers_no_nan() {
        let mut p = Player::new();
        let mut obstacles = vec![obstacle(1, ObstacleKind::Tree, 0.0, 0.0)];
        let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert_eq!(report.hits.len(), 1);
        assert!(p.position().is_finite());
        assert_eq!(p.position().x, 0.0);
        assert_eq!(p.position().z, 0.0);
    }

    #[test]
    fn test_mushroom_consumed_once() {
        let mut p = Player::new();
        let mut obstacles = vec![
            obstacle(1, ObstacleKind::Tree, 5.0, -20.0),
            obstacle(2, ObstacleKind::Mushroom, 0.1, 0.0),
            obstacle(3, ObstacleKind::Tree, -5.0, -30.0),
        ];
        let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert_eq!(report.removed, vec![2]);
        assert_eq!(report.cues, vec![SoundCue::Mushroom]);
        assert_eq!(p.high, 1.0);
        assert_eq!(obstacles.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 3]);

        p.normal_mode();
        let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert!(report.hits.is_empty());
        assert_eq!(p.high, 0.0);
    }

    #[test]
    fn test_adjacent_consumables_both_applied() {
        let mut p = Player::new();
        let mut obstacles = vec![
            obstacle(1, ObstacleKind::Mushroom, 0.1, 0.0),
            obstacle(2, ObstacleKind::Berry, -0.1, 0.0),
        ];
        let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert_eq!(report.removed, vec![1, 2]);
        assert!(obstacles.is_empty());
        // Berry ran second and cured the high
        assert_eq!(p.high, 0.0);
    }

    #[test]
    fn test_two_trees_both_push() {
        let mut p = Player::new();
        let mut obstacles = vec![
            obstacle(1, ObstacleKind::Tree, 0.5, 0.0),
            obstacle(2, ObstacleKind::Tree, 0.0, -0.5),
        ];
        let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert_eq!(report.hits.len(), 2);
        assert!(p.position().x < 0.0);
        assert!(p.position().z > 0.0);
    }

    #[test]
    fn test_goal_reported() {
        let mut p = Player::new();
        let mut obstacles = vec![obstacle(9, ObstacleKind::Goal, 0.0, 0.0)];
        let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert!(report.reached_goal);
        assert_eq!(obstacles.len(), 1);
    }

    #[test]
    fn test_tripped_rock_forgotten_after_contact() {
        let mut p = Player::new();
        let mut obstacles = vec![obstacle(4, ObstacleKind::Rock, 0.0, -0.3)];
        resolve_obstacles(&mut p, &mut obstacles, 0.0);
        assert_eq!(p.tripped_on, Some(4));

        // Sliding over it while down
        p.body.position.z = -0.2;
        resolve_obstacles(&mut p, &mut obstacles, 10.0);
        assert_eq!(p.tripped_on, Some(4));
        assert_eq!(p.position().z, -0.2);

        p.body.position.z = -5.0;
        resolve_obstacles(&mut p, &mut obstacles, 20.0);
        assert_eq!(p.tripped_on, None);
    }

    proptest! {
        #[test]
        fn prop_each_overlap_applied_once(
            xs in proptest::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..12),
        ) {
            let mut p = Player::new();
            let mut obstacles: Vec<Obstacle> = xs
                .iter()
                .enumerate()
                .map(|(i, &(x, z))| obstacle(i as u32, ObstacleKind::Berry, x, z))
                .collect();
            let report = resolve_obstacles(&mut p, &mut obstacles, 0.0);
            let mut ids: Vec<u32> = report.hits.iter().map(|h| h.0).collect();
            let total = ids.len();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
            prop_assert_eq!(report.removed.len(), total);
            prop_assert_eq!(obstacles.len(), xs.len() - total);
        }
    }
}
