//! Camera rig poses

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    /// Chase pose above and behind the ball
    pub fn follow(ball: Vec3) -> Self {
        Self {
            position: ball + CAMERA_FOLLOW_OFFSET,
            look_at: ball,
        }
    }

    /// High overview of the whole plane
    pub fn overview() -> Self {
        Self {
            position: CAMERA_OVERVIEW,
            look_at: Vec3::ZERO,
        }
    }

    /// Start-of-round pose: fixed position, looking at the spawn point
    pub fn start() -> Self {
        Self {
            position: CAMERA_START,
            look_at: SPAWN_POINT,
        }
    }

    pub fn lerp(&self, other: &CameraPose, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            look_at: self.look_at.lerp(other.look_at, t),
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::start()
    }
}
