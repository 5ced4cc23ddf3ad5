//! End-of-round celebration
//!
//! Two frame-stepped animations that run side by side while a round is
//! Ending: the camera glides up to the overview pose, and the captured stars
//! are connected one link at a time in catalog order. Both advance exactly
//! once per tick, so the sequence plays out the same at any frame rate.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::camera::CameraPose;
use crate::tuning::Tuning;

/// Camera glide from wherever the camera was to the overview pose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraGlide {
    from: CameraPose,
    to: CameraPose,
    frame: u32,
    total_frames: u32,
}

impl CameraGlide {
    pub fn new(from: CameraPose, to: CameraPose, total_frames: u32) -> Self {
        Self {
            from,
            to,
            frame: 0,
            total_frames: total_frames.max(1),
        }
    }

    /// Advance one frame and return the new pose
    pub fn step(&mut self) -> CameraPose {
        if self.frame < self.total_frames {
            self.frame += 1;
        }
        self.pose()
    }

    pub fn pose(&self) -> CameraPose {
        let t = self.frame as f32 / self.total_frames as f32;
        self.from.lerp(&self.to, t)
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.total_frames
    }
}

/// One segment of the constellation line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub start: Vec3,
    pub end: Vec3,
    /// Drawn fraction in [0, 1]
    pub progress: f32,
}

impl Link {
    /// Current tip of the growing line
    pub fn tip(&self) -> Vec3 {
        self.start.lerp(self.end, self.progress)
    }
}

/// Links drawn strictly one after another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSequence {
    pub links: Vec<Link>,
    current: usize,
    speed: f32,
}

impl LinkSequence {
    /// Connect each point to the next (n points -> n - 1 links)
    pub fn new(points: &[Vec3], speed: f32) -> Self {
        let links = points
            .windows(2)
            .map(|pair| Link {
                start: pair[0],
                end: pair[1],
                progress: 0.0,
            })
            .collect();
        Self {
            links,
            current: 0,
            speed: if speed > 0.0 { speed } else { 1.0 },
        }
    }

    pub fn step(&mut self) {
        if let Some(link) = self.links.get_mut(self.current) {
            link.progress = (link.progress + self.speed).min(1.0);
            if link.progress >= 1.0 {
                self.current += 1;
            }
        }
    }

    /// Index of the link being drawn
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.links.len()
    }
}

/// Everything that animates while the round is Ending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Celebration {
    pub camera: CameraGlide,
    pub lines: LinkSequence,
    frames: u32,
}

impl Celebration {
    pub fn new(camera_from: CameraPose, stars: &[Vec3], tuning: &Tuning) -> Self {
        Self {
            camera: CameraGlide::new(camera_from, CameraPose::overview(), tuning.camera_glide_frames),
            lines: LinkSequence::new(stars, tuning.link_draw_speed),
            frames: 0,
        }
    }

    /// Advance both animations one frame; returns the camera pose
    pub fn step(&mut self) -> CameraPose {
        self.frames += 1;
        self.lines.step();
        self.camera.step()
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.camera.is_finished() && self.lines.is_finished()
    }

    /// Consume the finished animation, keeping only the drawn lines
    pub fn into_links(self) -> Vec<Link> {
        self.lines.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_glide_reaches_target_in_total_frames() {
        let from = CameraPose::follow(Vec3::new(100.0, 4.5, 50.0));
        let mut glide = CameraGlide::new(from, CameraPose::overview(), 90);
        for _ in 0..89 {
            glide.step();
            assert!(!glide.is_finished());
        }
        let pose = glide.step();
        assert!(glide.is_finished());
        assert!((pose.position - CameraPose::overview().position).length() < 1e-3);
        assert!(pose.look_at.length() < 1e-3);

        // Stepping past the end holds the final pose
        assert_eq!(glide.step(), pose);
    }

    #[test]
    fn test_links_drawn_sequentially() {
        let points = [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0)];
        let mut seq = LinkSequence::new(&points, 0.25);
        assert_eq!(seq.links.len(), 2);

        for _ in 0..4 {
            seq.step();
        }
        assert_eq!(seq.links[0].progress, 1.0);
        assert_eq!(seq.links[1].progress, 0.0);
        assert_eq!(seq.current(), 1);

        seq.step();
        assert_eq!(seq.links[1].progress, 0.25);
        assert_eq!(seq.links[1].tip(), Vec3::new(10.0, 0.0, 2.5));

        for _ in 0..3 {
            seq.step();
        }
        assert!(seq.is_finished());
    }

    #[test]
    fn test_single_point_has_no_links() {
        let seq = LinkSequence::new(&[Vec3::ZERO], 0.02);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_celebration_waits_for_both() {
        let tuning = Tuning::default();
        let stars: Vec<Vec3> = (0..8).map(|i| Vec3::new(i as f32 * 20.0, 0.0, 0.0)).collect();
        let mut celebration = Celebration::new(CameraPose::start(), &stars, &tuning);

        while !celebration.camera.is_finished() {
            celebration.step();
        }
        assert_eq!(celebration.frames(), 90);
        assert!(!celebration.is_finished(), "seven links take longer than the glide");

        while !celebration.is_finished() {
            celebration.step();
        }
        assert!(celebration.frames() >= 7 * 50);
        assert!(celebration.into_links().iter().all(|l| l.progress == 1.0));
    }
}
