//! # Blobworld Core
//!
//! Soft-bodied organisms wandering a walled arena around a player snake.
//!
//! This crate contains the deterministic simulation logic, including:
//! - A physics abstraction with a bundled hecs + spatial-hash backend
//! - Organism spawning, steering, leader rotation and chain relaxation
//! - Snake proxy bodies that make the player visible to organisms
//! - Fruit placement and collection
//! - Configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use blobworld_core::config::SimConfig;
//! use blobworld_core::simulation::Simulation;
//! use glam::Vec2;
//! use std::time::Duration;
//!
//! let mut config = SimConfig::default();
//! config.world.seed = Some(42);
//! let mut sim = Simulation::new(config).unwrap();
//!
//! let path = [Vec2::new(0.0, 0.0), Vec2::new(-0.2, 0.0)];
//! sim.update(Duration::from_millis(16), &path);
//!
//! assert!(!sim.is_position_blocked(0.0, 0.0, 0.5));
//! let snapshot = sim.snapshot();
//! assert!(snapshot.organisms.len() <= 6);
//! ```

/// Walled rectangle the simulation runs in
pub mod arena;
/// Player-facing collision and collection queries
pub mod collision;
/// Configuration management for simulation parameters
pub mod config;
/// Error types and the crate `Result` alias
pub mod error;
/// Fruit placement and collection
pub mod fruit;
/// Organism construction
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Organism model and population maintenance
pub mod organism;
/// Rigid-body world abstraction and the bundled backend
pub mod physics;
/// Frame driver
pub mod simulation;
/// Static bodies tracking the player's path
pub mod snake_proxy;
/// Spatial hashing for broad-phase queries
pub mod spatial_hash;
/// Per-organism systems (steering, leader rotation, relaxation)
pub mod systems;

pub use arena::{Arena, ArenaSize};
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use metrics::{init_logging, Metrics};
pub use physics::{PhysicsWorld, RigidBodyWorld};
pub use simulation::Simulation;
