pub mod macros;

use blobworld_lib::model::arena::ArenaSize;
use blobworld_lib::model::config::{SimConfig, Span};
use blobworld_lib::model::physics::{BodyKind, BodyLabel, RigidBodyWorld};
use blobworld_lib::model::Simulation;
use glam::Vec2;
use std::time::Duration;

pub const DT: Duration = Duration::from_millis(16);

#[allow(dead_code)]
pub struct SimBuilder {
    config: SimConfig,
    size: Option<ArenaSize>,
    obstacles: Vec<(Vec2, f32)>,
}

#[allow(dead_code)]
impl SimBuilder {
    /// Empty 20 x 20 arena: no organisms, no fruit.
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.world.seed = Some(0);
        config.organisms.population = 0;
        config.fruit.target = 0;
        Self {
            config,
            size: None,
            obstacles: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.config.organisms.population = population;
        self
    }

    pub fn with_fruit(mut self, target: usize) -> Self {
        self.config.fruit.target = target;
        self
    }

    /// Fixed follower count, spacing and radius for every organism.
    pub fn with_body_plan(mut self, followers: usize, spacing: f32, radius: f32) -> Self {
        self.config.organisms.follower_count = Span::fixed(followers);
        self.config.organisms.spacing = Span::fixed(spacing);
        self.config.organisms.radius = Span::fixed(radius);
        self
    }

    pub fn with_size(mut self, width: f32, depth: f32) -> Self {
        self.size = Some(ArenaSize::new(width, depth));
        self
    }

    /// Static wall-labelled circle placed after the arena is built.
    pub fn with_obstacle(mut self, position: Vec2, radius: f32) -> Self {
        self.obstacles.push((position, radius));
        self
    }

    pub fn build(self) -> Simulation {
        let mut sim = Simulation::new(self.config).expect("test config must be valid");
        if let Some(size) = self.size {
            sim.resize(size).expect("test size must be valid");
        }
        for (position, radius) in self.obstacles {
            sim.world_mut()
                .create_circle(position, radius, BodyKind::Static, BodyLabel::Wall);
        }
        sim
    }
}

/// Straight player path heading +x, head first.
#[allow(dead_code)]
pub fn straight_path(head: Vec2, len: usize, spacing: f32) -> Vec<Vec2> {
    (0..len)
        .map(|i| head - Vec2::new(i as f32 * spacing, 0.0))
        .collect()
}
