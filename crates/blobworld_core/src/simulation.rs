//! Frame driver tying the arena, the pools and the per-organism systems
//! together.

use crate::arena::{Arena, ArenaSize};
use crate::collision;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::fruit::FruitSpawner;
use crate::metrics::Metrics;
use crate::organism::OrganismPool;
use crate::physics::{PhysicsWorld, RigidBodyWorld};
use crate::snake_proxy::SnakeProxyManager;
use crate::systems::relaxation::{self, RelaxParams};
use crate::systems::{leader, steering};
use blobworld_data::{SimEvent, WorldSnapshot};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// The organism arena.
///
/// Generic over the physics backend and the random source so both can be
/// swapped in tests. `update` and `resize` take `&mut self`; a rebuild can
/// never interleave with a frame.
pub struct Simulation<W: RigidBodyWorld = PhysicsWorld, R: Rng = ChaCha8Rng> {
    config: SimConfig,
    world: W,
    arena: Arena,
    proxies: SnakeProxyManager,
    organisms: OrganismPool,
    fruit: FruitSpawner,
    rng: R,
    frame: u64,
    elapsed: f32,
    pending: Vec<SimEvent>,
    metrics: Metrics,
}

impl Simulation {
    /// Validates `config` and builds a simulation on the bundled backend,
    /// seeded from `world.seed` or from entropy.
    pub fn new(config: SimConfig) -> Result<Self> {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let world = PhysicsWorld::new(config.physics.cell_size);
        Self::with_parts(config, world, rng)
    }
}

impl<W: RigidBodyWorld, R: Rng> Simulation<W, R> {
    /// Builds a simulation on an empty `world` with an explicit random source.
    pub fn with_parts(config: SimConfig, mut world: W, rng: R) -> Result<Self> {
        config.validate()?;
        if !world.is_empty() {
            return Err(SimError::invalid_config(
                "physics",
                "world must start empty",
            ));
        }
        let size = ArenaSize::from_aspect(config.arena.target_dimension, config.arena.aspect);
        let arena = Arena::build(&mut world, size, config.arena.wall_thickness);
        tracing::info!(
            width = size.width,
            depth = size.depth,
            fingerprint = %config.fingerprint(),
            "Simulation created"
        );

        Ok(Self {
            proxies: SnakeProxyManager::new(config.snake.proxy_separation, config.snake.proxy_radius),
            organisms: OrganismPool::new(),
            fruit: FruitSpawner::new(),
            metrics: Metrics::new(config.world.log_interval),
            config,
            world,
            arena,
            rng,
            frame: 0,
            elapsed: 0.0,
            pending: Vec::new(),
        })
    }

    /// Advances one frame. `player_path` is most recent first.
    ///
    /// Order: physics step, proxy sync, population top-up, then per organism
    /// steer, maybe rotate the leader and relax, and finally fruit top-up.
    /// Returns what happened, including collections made since the last call.
    pub fn update(&mut self, dt: Duration, player_path: &[Vec2]) -> Vec<SimEvent> {
        let started = Instant::now();
        self.frame += 1;
        let secs = dt.as_secs_f32();
        self.elapsed += secs;
        let frame = self.frame;
        let mut events = std::mem::take(&mut self.pending);

        self.world.step(dt);
        self.proxies.sync(&mut self.world, player_path);

        let params = &self.config.organisms;
        self.organisms.ensure_population(
            &mut self.world,
            &self.arena,
            player_path.first().copied(),
            params,
            frame,
            &mut self.rng,
            &mut events,
        );

        for id in self.organisms.prune_malformed(&mut self.world) {
            tracing::warn!(%id, frame, "Pruned organism without segments");
            events.push(SimEvent::OrganismPruned { id, frame });
        }

        let relax = RelaxParams::from(params);
        for organism in self.organisms.iter_mut() {
            steering::steer(
                &mut self.world,
                organism,
                params.look_ahead,
                params.wander,
                &mut self.rng,
            );
            if let Some(from_segment) = leader::maybe_rotate(
                &mut self.world,
                organism,
                secs,
                params.leader_interval,
                &mut self.rng,
            ) {
                events.push(SimEvent::LeaderRotated {
                    id: organism.id,
                    from_segment,
                    frame,
                });
            }
            relaxation::relax(&mut self.world, organism, &relax, self.elapsed);
        }

        self.fruit.ensure_population(
            &mut self.world,
            &self.arena,
            &self.config.fruit,
            frame,
            &mut self.rng,
            &mut events,
        );

        self.record(&events);
        self.metrics
            .record_frame(started.elapsed(), self.organisms.len(), self.fruit.len());
        events
    }

    fn record(&self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::OrganismSpawned { .. } => self.metrics.record_spawn(),
                SimEvent::OrganismPruned { .. } => self.metrics.record_prune(),
                SimEvent::LeaderRotated { .. } => self.metrics.record_rotation(),
                SimEvent::FruitSpawned { .. } => self.metrics.record_fruit_spawn(),
                // Counted when they happen.
                SimEvent::FruitCollected { .. } | SimEvent::ArenaRebuilt { .. } => {}
            }
        }
    }

    /// Tears down the world and rebuilds it for `size`. Every pool is
    /// emptied; organisms and fruit come back over the following frames.
    pub fn resize(&mut self, size: ArenaSize) -> Result<()> {
        if !size.is_valid() {
            return Err(SimError::invalid_config(
                "arena",
                format!("cannot resize to {} x {}", size.width, size.depth),
            ));
        }
        self.world.clear();
        self.arena = Arena::build(&mut self.world, size, self.config.arena.wall_thickness);
        self.proxies.reset();
        self.organisms.reset();
        self.fruit.reset();

        tracing::info!(width = size.width, depth = size.depth, "Arena rebuilt");
        self.pending.push(SimEvent::ArenaRebuilt {
            width: size.width,
            depth: size.depth,
            frame: self.frame,
        });
        Ok(())
    }

    /// Rebuilds for a new viewport aspect ratio at the configured target
    /// dimension.
    pub fn resize_to_aspect(&mut self, aspect: f32) -> Result<()> {
        self.resize(ArenaSize::from_aspect(self.config.arena.target_dimension, aspect))
    }

    /// Whether a player circle at `(x, z)` would hit a wall or an organism.
    pub fn is_position_blocked(&self, x: f32, z: f32, radius: f32) -> bool {
        collision::is_position_blocked(&self.world, &self.arena, Vec2::new(x, z), radius)
    }

    /// Eats a fruit within reach of `(x, z)`. Returns whether one was eaten.
    pub fn handle_fruit_collection(&mut self, x: f32, z: f32, radius: f32) -> bool {
        let Some(fruit) = collision::handle_fruit_collection(
            &mut self.world,
            &mut self.fruit,
            Vec2::new(x, z),
            radius,
            self.config.fruit.collision_radius,
        ) else {
            return false;
        };
        tracing::debug!(id = %fruit.id, kind = ?fruit.kind, "Fruit collected");
        self.metrics.record_fruit_collected();
        self.pending.push(SimEvent::FruitCollected {
            id: fruit.id,
            kind: fruit.kind,
            frame: self.frame,
        });
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame: self.frame,
            width: self.arena.width(),
            depth: self.arena.depth(),
            organisms: self.organisms.snapshot(),
            fruit: self.fruit.snapshot(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Direct access to the physics world, e.g. to place extra obstacles.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn organisms(&self) -> &OrganismPool {
        &self.organisms
    }

    pub fn organisms_mut(&mut self) -> &mut OrganismPool {
        &mut self.organisms
    }

    pub fn fruit(&self) -> &FruitSpawner {
        &self.fruit
    }

    pub fn proxies(&self) -> &SnakeProxyManager {
        &self.proxies
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds of simulated time.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
