pub mod autopilot;

use crate::model::arena::ArenaSize;
use crate::model::state::{SimEvent, WorldSnapshot};
use crate::model::{SimConfig, Simulation};
use anyhow::{Context, Result};
use autopilot::Autopilot;
use glam::Vec2;
use serde::Serialize;
use std::time::Duration;

/// End-of-run totals printed by the binary.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub organisms: usize,
    pub fruit: usize,
    pub fruit_eaten: u64,
    pub spawned: u64,
    pub pruned: u64,
    pub rotations: u64,
    pub wall_clock_ms: u128,
}

/// Headless frame loop: one autopilot player driving one simulation at a
/// fixed timestep.
pub struct App {
    pub sim: Simulation,
    pub player: Autopilot,
    pub dt: Duration,
}

impl App {
    pub fn new(config: SimConfig) -> Result<Self> {
        let player_radius = config.snake.proxy_radius;
        let sim = Simulation::new(config).context("building simulation")?;
        Ok(Self {
            sim,
            player: Autopilot::new(Vec2::ZERO, player_radius),
            dt: Duration::from_secs_f32(1.0 / 60.0),
        })
    }

    /// Runs one frame: the simulation sees the path from the previous move,
    /// then the player moves.
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let events = self.sim.update(self.dt, self.player.path());
        self.player.step(&mut self.sim, self.dt);
        events
    }

    /// Runs `frames` frames, handing every event to `on_event`.
    pub fn run<F: FnMut(&SimEvent)>(&mut self, frames: u64, mut on_event: F) -> RunSummary {
        for _ in 0..frames {
            for event in self.tick() {
                on_event(&event);
            }
        }
        self.summary()
    }

    /// Rebuilds the arena for a new viewport and puts the player back in
    /// the middle.
    pub fn resize(&mut self, aspect: f32) -> Result<()> {
        let size = ArenaSize::from_aspect(self.sim.config().arena.target_dimension, aspect);
        self.sim
            .resize(size)
            .with_context(|| format!("resizing to aspect {aspect}"))?;
        self.player.respawn(Vec2::ZERO);
        Ok(())
    }

    pub fn summary(&self) -> RunSummary {
        let metrics = self.sim.metrics();
        RunSummary {
            frames: self.sim.frame(),
            organisms: self.sim.organisms().len(),
            fruit: self.sim.fruit().len(),
            fruit_eaten: self.player.eaten(),
            spawned: metrics.spawned(),
            pruned: metrics.pruned(),
            rotations: metrics.rotations(),
            wall_clock_ms: metrics.elapsed().as_millis(),
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.sim.snapshot()
    }
}
