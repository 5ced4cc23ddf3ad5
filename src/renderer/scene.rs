//! CPU-side description of one frame
//!
//! The web stage fills a `SceneFrame` through the capability calls and the
//! SDF pipeline turns it into GPU buffers. Kept free of wgpu types so the
//! projection math can be tested natively.

use glam::{Vec2, Vec3};

use crate::consts::*;
use crate::platform::TargetVisual;
use crate::sim::{CameraPose, Link};

/// Vertical field of view of the perspective camera being approximated
pub const CAMERA_FOV_DEG: f32 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSprite {
    pub position: Vec3,
    pub rotation: Vec2,
    pub radius: f32,
    pub emissive_intensity: f32,
    pub light_intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSprite {
    pub position: Vec3,
    pub radius: f32,
    pub visual: TargetVisual,
}

/// Top-down view window derived from the camera pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    /// World xz under the screen center
    pub center: Vec2,
    /// World units from the screen center to the top edge
    pub half_height: f32,
}

#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub ball: BallSprite,
    pub targets: Vec<TargetSprite>,
    pub links: Vec<Link>,
    pub camera: CameraPose,
}

impl Default for SceneFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneFrame {
    pub fn new() -> Self {
        Self {
            ball: BallSprite {
                position: SPAWN_POINT,
                rotation: Vec2::ZERO,
                radius: BALL_RADIUS,
                emissive_intensity: 0.0,
                light_intensity: 0.0,
            },
            targets: Vec::new(),
            links: Vec::new(),
            camera: CameraPose::start(),
        }
    }

    pub fn load_targets(&mut self, positions: &[Vec3]) {
        self.targets = positions
            .iter()
            .map(|&position| TargetSprite {
                position,
                radius: TARGET_RADIUS,
                visual: TargetVisual::HIDDEN,
            })
            .collect();
    }

    pub fn set_target_visual(&mut self, id: usize, visual: TargetVisual) {
        if let Some(target) = self.targets.get_mut(id) {
            target.visual = visual;
        }
    }

    /// Project the camera pose onto the ground plane.
    ///
    /// The camera looks down at `look_at`; the visible half height grows with
    /// its distance from that point.
    pub fn view(&self) -> ViewWindow {
        let distance = self.camera.position.distance(self.camera.look_at).max(1.0);
        let half_fov = (CAMERA_FOV_DEG.to_radians() * 0.5).tan();
        ViewWindow {
            center: Vec2::new(self.camera.look_at.x, self.camera.look_at.z),
            half_height: distance * half_fov,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_follows_ball() {
        let mut frame = SceneFrame::new();
        frame.camera = CameraPose::follow(Vec3::new(120.0, 4.5, -30.0));
        let view = frame.view();
        assert_eq!(view.center, Vec2::new(120.0, -30.0));
    }

    #[test]
    fn test_overview_shows_more_than_follow() {
        let mut frame = SceneFrame::new();
        let close = frame.view().half_height;
        frame.camera = CameraPose::overview();
        let far = frame.view().half_height;
        assert!(far > close * 2.0);
        assert_eq!(frame.view().center, Vec2::ZERO);
    }

    #[test]
    fn test_target_visual_ignores_unknown_id() {
        let mut frame = SceneFrame::new();
        frame.load_targets(&[Vec3::ZERO, Vec3::X]);
        frame.set_target_visual(1, TargetVisual::LIT);
        frame.set_target_visual(7, TargetVisual::LIT);
        assert_eq!(frame.targets[0].visual, TargetVisual::HIDDEN);
        assert_eq!(frame.targets[1].visual, TargetVisual::LIT);
    }
}
