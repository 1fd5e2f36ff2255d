//! Perspective camera trailing the fox

use glam::{Mat4, Vec3, Vec4};

/// Vertical field of view in degrees
pub const FOV_DEGREES: f32 = 35.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;
/// Downward tilt of the view
pub const PITCH: f32 = std::f32::consts::PI / 20.0;
/// Distance the eye sits behind its target
pub const BACK_OFF: f32 = 6.0;
/// How much of the fox's sideways motion the camera follows
pub const FOLLOW_X: f32 = 0.65;
/// How much of the fox's height the camera follows
pub const FOLLOW_Y: f32 = 0.25;
/// Resting height offset while following
pub const FOLLOW_LIFT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection: Mat4,
    pub view: Mat4,
}

fn projection(aspect: f32) -> Mat4 {
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    Mat4::perspective_rh_gl(FOV_DEGREES.to_radians(), aspect, NEAR, FAR)
}

impl Camera {
    /// Chase view behind the fox
    pub fn follow(aspect: f32, target: Vec3) -> Self {
        let view = Mat4::from_rotation_x(PITCH)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -BACK_OFF))
            * Mat4::from_translation(Vec3::new(
                -target.x * FOLLOW_X,
                -FOLLOW_LIFT - target.y * FOLLOW_Y,
                -target.z,
            ));
        Self {
            projection: projection(aspect),
            view,
        }
    }

    /// Static view used by the title and result screens
    pub fn stage(aspect: f32) -> Self {
        let view = Mat4::from_rotation_x(PITCH)
            * Mat4::from_translation(Vec3::new(0.0, 1.0, -BACK_OFF));
        Self {
            projection: projection(aspect),
            view,
        }
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Normalized device coordinates of a world point, None if behind the eye
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// In front of the eye and between the near and far planes
    pub fn in_depth_range(&self, world: Vec3) -> bool {
        self.project(world)
            .is_some_and(|ndc| (-1.0..=1.0).contains(&ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ahead_is_on_screen() {
        let target = Vec3::new(2.0, -1.5, -300.0);
        let camera = Camera::follow(16.0 / 9.0, target);
        let ndc = camera.project(target).expect("visible");
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
        // Sideways motion is only partly followed
        assert!(ndc.x > 0.0);
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let camera = Camera::follow(1.0, Vec3::ZERO);
        assert!(camera.project(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_depth_range_stops_at_far_plane() {
        let camera = Camera::follow(1.0, Vec3::new(0.0, -1.5, -40.0));
        assert!(camera.in_depth_range(Vec3::new(0.0, -1.5, -60.0)));
        assert!(camera.in_depth_range(Vec3::new(0.0, -1.5, -36.0)));
        assert!(!camera.in_depth_range(Vec3::new(0.0, -1.5, -40.0 - FAR - 1.0)));
        assert!(!camera.in_depth_range(Vec3::new(0.0, -1.5, -20.0)));
    }

    #[test]
    fn test_degenerate_aspect() {
        let camera = Camera::stage(0.0);
        assert!(camera.projection.is_finite());
    }
}
