//! Fruit markers: collectible sensors scattered over free floor.

use crate::arena::Arena;
use crate::config::FruitConfig;
use crate::physics::{BodyHandle, BodyKind, BodyLabel, RigidBodyWorld};
use blobworld_data::{FruitId, FruitKind, FruitSnapshot, SimEvent};
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    pub id: FruitId,
    pub position: Vec2,
    pub kind: FruitKind,
    pub body: BodyHandle,
}

impl Fruit {
    #[must_use]
    pub fn snapshot(&self) -> FruitSnapshot {
        FruitSnapshot {
            id: self.id,
            position: self.position,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct FruitSpawner {
    fruit: Vec<Fruit>,
    next_id: u64,
}

impl FruitSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fruit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fruit.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fruit> {
        self.fruit.iter()
    }

    /// Tops the fruit count up to `params.target`. Each missing fruit gets
    /// `spawn_attempts` tries at a random point whose placement square is
    /// free of bodies; a fruit that finds no spot is skipped for this frame.
    ///
    /// Returns the number of fruit placed.
    pub fn ensure_population<W, R>(
        &mut self,
        world: &mut W,
        arena: &Arena,
        params: &FruitConfig,
        frame: u64,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> usize
    where
        W: RigidBodyWorld + ?Sized,
        R: Rng + ?Sized,
    {
        let missing = params.target.saturating_sub(self.fruit.len());
        let mut placed = 0;
        for _ in 0..missing {
            let Some(position) = find_free_spot(world, arena, params, rng) else {
                continue;
            };
            let id = FruitId(self.next_id);
            self.next_id += 1;
            let kind = FruitKind::ALL.choose(rng).copied().unwrap_or(FruitKind::Apple);
            let body = world.create_circle(position, params.radius, BodyKind::Sensor, BodyLabel::Fruit(id));
            self.fruit.push(Fruit {
                id,
                position,
                kind,
                body,
            });
            events.push(SimEvent::FruitSpawned {
                id,
                kind,
                x: position.x,
                z: position.y,
                frame,
            });
            placed += 1;
        }
        if placed < missing {
            tracing::trace!(placed, missing, "Arena too crowded for fruit");
        }
        placed
    }

    /// Removes the first fruit within `reach` of `position` together with
    /// its body.
    pub fn collect_at<W: RigidBodyWorld + ?Sized>(
        &mut self,
        world: &mut W,
        position: Vec2,
        reach: f32,
    ) -> Option<Fruit> {
        let idx = self
            .fruit
            .iter()
            .position(|f| f.position.distance_squared(position) < reach * reach)?;
        let fruit = self.fruit.remove(idx);
        world.remove(fruit.body);
        Some(fruit)
    }

    /// Forgets every fruit without touching the world.
    pub fn reset(&mut self) {
        self.fruit.clear();
    }

    pub fn snapshot(&self) -> Vec<FruitSnapshot> {
        self.fruit.iter().map(Fruit::snapshot).collect()
    }
}

fn find_free_spot<W, R>(world: &W, arena: &Arena, params: &FruitConfig, rng: &mut R) -> Option<Vec2>
where
    W: RigidBodyWorld + ?Sized,
    R: Rng + ?Sized,
{
    let half = Vec2::splat(params.placement_size * 0.5);
    (0..params.spawn_attempts)
        .map(|_| arena.random_point(params.spawn_inset, rng))
        .find(|&p| world.region_query(p - half, p + half).is_empty())
}
