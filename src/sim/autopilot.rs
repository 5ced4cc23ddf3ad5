//! Idle/demo steering
//!
//! Points the virtual stick at the nearest uncaptured target, proportional to
//! the remaining distance so the ball settles on the disc instead of
//! overshooting it.

use glam::Vec2;

use super::motion::{Ball, nearest_uncaptured};
use super::targets::Target;

/// Stick vector (x right, y up) that heads for the nearest uncaptured target
pub fn steer(ball: &Ball, targets: &[Target]) -> Option<Vec2> {
    let nearest = nearest_uncaptured(ball.pos, targets)?;
    let dx = nearest.position.x - ball.pos.x;
    let dz = nearest.position.z - ball.pos.z;
    // Plane +z is stick -y
    Some(Vec2::new(dx, -dz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::targets::TargetState;
    use glam::Vec3;

    #[test]
    fn test_steers_toward_nearest() {
        let ball = Ball::new();
        let targets = [
            Target::new(0, Vec3::new(-100.0, 0.0, 0.0)),
            Target::new(1, Vec3::new(20.0, 0.0, 30.0)),
        ];
        let stick = steer(&ball, &targets).expect("target available");
        assert_eq!(stick, Vec2::new(20.0, -30.0));
    }

    #[test]
    fn test_nothing_left_to_steer_to() {
        let ball = Ball::new();
        let mut target = Target::new(0, Vec3::new(20.0, 0.0, 0.0));
        target.state = TargetState::Captured;
        assert!(steer(&ball, &[target]).is_none());
    }
}
