//! Level catalog
//!
//! Each level is a constellation: an ordered list of target positions on the
//! ground plane. The order is also the order the stars get connected in when
//! the round is won.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::settings::LevelSelection;

/// A constellation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub name: &'static str,
    /// (x, z) positions on the plane
    points: &'static [(f32, f32)],
}

impl Level {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Target positions in connection order (y = 0)
    pub fn positions(&self) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|&(x, z)| Vec3::new(x, 0.0, z))
            .collect()
    }
}

pub const LEVELS: [Level; 6] = [
    Level {
        name: "Lynx",
        points: &[
            (-190.0, 100.0),
            (-170.0, 70.0),
            (-130.0, 60.0),
            (-100.0, 25.0),
            (-10.0, 30.0),
            (90.0, -20.0),
            (130.0, -110.0),
            (170.0, -140.0),
        ],
    },
    Level {
        name: "Cassiopeia",
        points: &[
            (-190.0, 50.0),
            (-80.0, 90.0),
            (0.0, 40.0),
            (130.0, 60.0),
            (170.0, -100.0),
        ],
    },
    Level {
        name: "The Fish Hook",
        points: &[
            (-120.0, 10.0),
            (-180.0, 60.0),
            (-140.0, 120.0),
            (-20.0, 150.0),
            (30.0, -10.0),
            (120.0, -100.0),
            (230.0, -120.0),
        ],
    },
    Level {
        name: "Aries",
        points: &[(-200.0, -100.0), (20.0, -60.0), (150.0, 30.0), (160.0, 80.0)],
    },
    Level {
        name: "The Big Dipper",
        points: &[
            (-200.0, -120.0),
            (-100.0, -100.0),
            (-30.0, -40.0),
            (70.0, 0.0),
            (250.0, 30.0),
            (200.0, 130.0),
            (80.0, 100.0),
        ],
    },
    Level {
        name: "Draco",
        points: &[
            (-90.0, -30.0),
            (-160.0, -10.0),
            (-120.0, 20.0),
            (0.0, -120.0),
            (80.0, -60.0),
            (20.0, 80.0),
            (150.0, 120.0),
            (270.0, 100.0),
        ],
    },
];

/// Pick the catalog index for the next round
pub fn select(selection: LevelSelection, previous: Option<usize>, rng: &mut Pcg32) -> usize {
    match selection {
        LevelSelection::Fixed(index) => index % LEVELS.len(),
        LevelSelection::Cycle => previous.map_or(0, |p| (p + 1) % LEVELS.len()),
        LevelSelection::Random => rng.random_range(0..LEVELS.len()),
    }
}
