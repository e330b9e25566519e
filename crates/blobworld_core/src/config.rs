//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. Every section and every field falls back to its `Default`, so a file
//! only needs to name what it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 42
//!
//! [arena]
//! target_dimension = 20.0
//!
//! [organisms]
//! population = 8
//! follower_count = { min = 2, max = 5 }
//! speed = { min = 1.5, max = 3.0 }
//!
//! [fruit]
//! target = 6
//! ```

use crate::error::{Result, SimError};
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Closed interval a value is sampled from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: Copy + PartialOrd + SampleUniform> Span<T> {
    /// Uniform sample from `min..=max`. A degenerate span yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl<T: Copy> Span<T> {
    pub const fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// Process-level settings.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the simulation RNG; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Frames between periodic summary log lines.
    pub log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            log_interval: 600,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    /// Length of the shorter arena side, in world units.
    pub target_dimension: f32,
    /// Width over depth of the initial viewport.
    pub aspect: f32,
    pub wall_thickness: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            target_dimension: 20.0,
            aspect: 1.0,
            wall_thickness: 1.0,
        }
    }
}

/// Organism spawning, steering and soft-body parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OrganismConfig {
    pub population: usize,
    pub follower_count: Span<usize>,
    pub radius: Span<f32>,
    /// Distance of a follower from the head at spawn; becomes its rest length.
    pub spacing: Span<f32>,
    /// Angle around the head a follower is placed at, in radians.
    pub follower_angle: Span<f32>,
    pub speed: Span<f32>,
    /// Seconds between leader rotations.
    pub leader_interval: Span<f32>,
    pub spawn_attempts: usize,
    /// Minimum distance between a spawn point and the arena walls.
    pub spawn_inset: f32,
    /// Minimum distance between a spawn point and the player's head.
    pub spawn_clearance: f32,
    pub look_ahead: f32,
    /// Maximum heading perturbation per frame when nothing is ahead.
    pub wander: f32,
    /// Fraction of the excess stretch corrected per frame.
    pub stiffness: f32,
    pub wiggle_amplitude: f32,
    /// Angular frequency of the wiggle, in radians per second.
    pub wiggle_frequency: f32,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            population: 6,
            follower_count: Span::new(2, 5),
            radius: Span::new(0.4, 0.8),
            spacing: Span::new(0.8, 1.4),
            follower_angle: Span::new(0.0, std::f32::consts::TAU),
            speed: Span::new(1.5, 3.0),
            leader_interval: Span::new(3.0, 8.0),
            spawn_attempts: 10,
            spawn_inset: 2.0,
            spawn_clearance: 5.0,
            look_ahead: 2.5,
            wander: 0.15,
            stiffness: 0.15,
            wiggle_amplitude: 0.05,
            wiggle_frequency: 3.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FruitConfig {
    pub target: usize,
    /// Side of the square that must be empty around a new fruit.
    pub placement_size: f32,
    pub radius: f32,
    /// Extra reach added to the collector's radius when eating.
    pub collision_radius: f32,
    pub spawn_attempts: usize,
    pub spawn_inset: f32,
}

impl Default for FruitConfig {
    fn default() -> Self {
        Self {
            target: 5,
            placement_size: 1.5,
            radius: 0.35,
            collision_radius: 0.5,
            spawn_attempts: 10,
            spawn_inset: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SnakeConfig {
    /// Arc length between consecutive proxy bodies along the player path.
    pub proxy_separation: f32,
    pub proxy_radius: f32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            proxy_separation: 0.5,
            proxy_radius: 0.4,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Broad-phase grid cell size. Should exceed the largest circle radius.
    pub cell_size: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { cell_size: 2.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub arena: ArenaConfig,
    pub organisms: OrganismConfig,
    pub fruit: FruitConfig,
    pub snake: SnakeConfig,
    pub physics: PhysicsConfig,
}

fn ensure(cond: bool, field: &'static str, reason: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(SimError::invalid_config(field, reason))
    }
}

fn ensure_finite(value: f32, field: &'static str) -> Result<()> {
    ensure(value.is_finite(), field, "must be finite")
}

/// Finite and ordered; sampling panics on anything else.
fn ensure_span(span: &Span<f32>, field: &'static str) -> Result<()> {
    ensure(span.min.is_finite() && span.max.is_finite(), field, "must be finite")?;
    ensure(span.is_ordered(), field, "min exceeds max")
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        let a = &self.arena;
        ensure_finite(a.target_dimension, "arena.target_dimension")?;
        ensure(a.target_dimension > 0.0, "arena.target_dimension", "must be positive")?;
        ensure_finite(a.aspect, "arena.aspect")?;
        ensure(a.aspect > 0.0, "arena.aspect", "must be positive")?;
        ensure_finite(a.wall_thickness, "arena.wall_thickness")?;
        ensure(a.wall_thickness > 0.0, "arena.wall_thickness", "must be positive")?;

        let o = &self.organisms;
        ensure(o.population <= 1000, "organisms.population", "too large (max 1000)")?;
        ensure(o.follower_count.is_ordered(), "organisms.follower_count", "min exceeds max")?;
        ensure(o.follower_count.max <= 64, "organisms.follower_count", "too large (max 64)")?;
        ensure_span(&o.radius, "organisms.radius")?;
        ensure(o.radius.min > 0.0, "organisms.radius", "must be positive")?;
        ensure_span(&o.spacing, "organisms.spacing")?;
        ensure(o.spacing.min > 0.0, "organisms.spacing", "must be positive")?;
        ensure_span(&o.follower_angle, "organisms.follower_angle")?;
        ensure_span(&o.speed, "organisms.speed")?;
        ensure(o.speed.min >= 0.0, "organisms.speed", "must be non-negative")?;
        ensure_span(&o.leader_interval, "organisms.leader_interval")?;
        ensure(o.leader_interval.min > 0.0, "organisms.leader_interval", "must be positive")?;
        ensure(o.spawn_attempts > 0, "organisms.spawn_attempts", "must be positive")?;
        ensure_finite(o.spawn_inset, "organisms.spawn_inset")?;
        ensure(o.spawn_inset >= 0.0, "organisms.spawn_inset", "must be non-negative")?;
        ensure_finite(o.spawn_clearance, "organisms.spawn_clearance")?;
        ensure_finite(o.look_ahead, "organisms.look_ahead")?;
        ensure(o.look_ahead > 0.0, "organisms.look_ahead", "must be positive")?;
        ensure_finite(o.wander, "organisms.wander")?;
        ensure(o.wander >= 0.0, "organisms.wander", "must be non-negative")?;
        ensure(
            o.stiffness > 0.0 && o.stiffness <= 1.0,
            "organisms.stiffness",
            "must be in (0.0, 1.0]",
        )?;
        ensure_finite(o.wiggle_amplitude, "organisms.wiggle_amplitude")?;
        ensure(o.wiggle_amplitude >= 0.0, "organisms.wiggle_amplitude", "must be non-negative")?;
        ensure_finite(o.wiggle_frequency, "organisms.wiggle_frequency")?;

        let f = &self.fruit;
        ensure(f.target <= 1000, "fruit.target", "too large (max 1000)")?;
        ensure_finite(f.placement_size, "fruit.placement_size")?;
        ensure(f.placement_size > 0.0, "fruit.placement_size", "must be positive")?;
        ensure_finite(f.radius, "fruit.radius")?;
        ensure(f.radius > 0.0, "fruit.radius", "must be positive")?;
        ensure_finite(f.collision_radius, "fruit.collision_radius")?;
        ensure(f.collision_radius >= 0.0, "fruit.collision_radius", "must be non-negative")?;
        ensure(f.spawn_attempts > 0, "fruit.spawn_attempts", "must be positive")?;
        ensure_finite(f.spawn_inset, "fruit.spawn_inset")?;
        ensure(f.spawn_inset >= 0.0, "fruit.spawn_inset", "must be non-negative")?;

        let s = &self.snake;
        ensure_finite(s.proxy_separation, "snake.proxy_separation")?;
        ensure(s.proxy_separation > 0.0, "snake.proxy_separation", "must be positive")?;
        ensure_finite(s.proxy_radius, "snake.proxy_radius")?;
        ensure(s.proxy_radius > 0.0, "snake.proxy_radius", "must be positive")?;

        ensure_finite(self.physics.cell_size, "physics.cell_size")?;
        ensure(self.physics.cell_size > 0.0, "physics.cell_size", "must be positive")?;
        ensure(self.world.log_interval > 0, "world.log_interval", "must be positive")?;

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::from(e).with_context(format!("reading {}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| e.with_context(format!("parsing {}", path.display())))
    }

    /// Digest of everything that shapes simulation behaviour.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.arena).as_bytes());
        hasher.update(format!("{:?}", self.organisms).as_bytes());
        hasher.update(format!("{:?}", self.fruit).as_bytes());
        hasher.update(format!("{:?}", self.snake).as_bytes());
        hex::encode(hasher.finalize())
    }
}
