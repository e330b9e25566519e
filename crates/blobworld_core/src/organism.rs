//! Organism model and the pool that keeps the population topped up.

use crate::arena::Arena;
use crate::config::OrganismConfig;
use crate::lifecycle;
use crate::physics::{BodyHandle, RigidBodyWorld};
use blobworld_data::{OrganismId, OrganismSnapshot, Rgb, SegmentSnapshot, SimEvent};
use glam::Vec2;
use rand::Rng;

/// One circle of an organism's body.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Rendered position: `anchor` plus the current wiggle.
    pub position: Vec2,
    /// Undistorted position the distance constraint acts on.
    pub anchor: Vec2,
    pub radius: f32,
    /// Index of the segment this one is constrained to. `None` for the head.
    pub parent: Option<usize>,
    pub rest_length: f32,
    /// Per-segment offset into the wiggle cycle.
    pub phase: f32,
    pub body: BodyHandle,
}

#[derive(Debug, Clone)]
pub struct Organism {
    pub id: OrganismId,
    /// Direction of travel in radians, kept in `[-PI, PI)`.
    pub heading: f32,
    pub speed: f32,
    /// Seconds left until the next leader rotation.
    pub leader_timer: f32,
    pub color: Rgb,
    /// Driven body of the head. Held separately, like `follower_bodies`, so an
    /// organism that lost its segments can still release everything it owns.
    pub head_body: BodyHandle,
    /// Sensor bodies of the followers, in spawn order.
    pub follower_bodies: Vec<BodyHandle>,
    /// Head first.
    pub segments: Vec<Segment>,
}

impl Organism {
    #[must_use]
    pub fn head(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// An organism without segments cannot be simulated or drawn.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every body this organism owns, head first.
    pub fn bodies(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        std::iter::once(self.head_body).chain(self.follower_bodies.iter().copied())
    }

    #[must_use]
    pub fn snapshot(&self) -> OrganismSnapshot {
        OrganismSnapshot {
            id: self.id,
            color: self.color,
            segments: self
                .segments
                .iter()
                .map(|s| SegmentSnapshot {
                    position: s.position,
                    radius: s.radius,
                })
                .collect(),
        }
    }
}

/// Live organisms plus the id counter. Ids are never reused, not even across
/// an arena rebuild.
#[derive(Debug, Default)]
pub struct OrganismPool {
    organisms: Vec<Organism>,
    next_id: u64,
}

impl OrganismPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Organism> {
        self.organisms.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Organism> {
        self.organisms.iter_mut()
    }

    pub fn get(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.iter().find(|o| o.id == id)
    }

    /// Adds a hand-built organism.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, organism: Organism) {
        self.next_id = self.next_id.max(organism.id.0 + 1);
        self.organisms.push(organism);
    }

    fn allocate_id(&mut self) -> OrganismId {
        let id = OrganismId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns organisms until the population target is reached or no spawn
    /// point can be found within the attempt budget, whichever comes first.
    #[allow(clippy::too_many_arguments)]
    pub fn ensure_population<W, R>(
        &mut self,
        world: &mut W,
        arena: &Arena,
        player_head: Option<Vec2>,
        params: &OrganismConfig,
        frame: u64,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) where
        W: RigidBodyWorld + ?Sized,
        R: Rng + ?Sized,
    {
        while self.organisms.len() < params.population {
            let Some(center) = find_spawn_point(arena, player_head, params, rng) else {
                tracing::trace!(
                    population = self.organisms.len(),
                    target = params.population,
                    "No spawn point found"
                );
                break;
            };
            let id = self.allocate_id();
            let organism = lifecycle::create_organism_with_rng(world, id, center, params, rng);
            events.push(SimEvent::OrganismSpawned {
                id,
                segments: organism.segments.len(),
                x: center.x,
                z: center.y,
                frame,
            });
            self.organisms.push(organism);
        }
    }

    /// Removes organisms without segments, releasing their bodies.
    pub fn prune_malformed<W: RigidBodyWorld + ?Sized>(&mut self, world: &mut W) -> Vec<OrganismId> {
        let mut pruned = Vec::new();
        self.organisms.retain(|organism| {
            if !organism.is_malformed() {
                return true;
            }
            for body in organism.bodies() {
                world.remove(body);
            }
            pruned.push(organism.id);
            false
        });
        pruned
    }

    /// Drops every organism without touching the world. The id counter
    /// keeps running.
    pub fn reset(&mut self) {
        self.organisms.clear();
    }

    pub fn snapshot(&self) -> Vec<OrganismSnapshot> {
        self.organisms.iter().map(Organism::snapshot).collect()
    }
}

/// Random point inside the arena inset, at least the configured clearance away
/// from the player's head.
pub fn find_spawn_point<R: Rng + ?Sized>(
    arena: &Arena,
    player_head: Option<Vec2>,
    params: &OrganismConfig,
    rng: &mut R,
) -> Option<Vec2> {
    (0..params.spawn_attempts)
        .map(|_| arena.random_point(params.spawn_inset, rng))
        .find(|candidate| {
            player_head.map_or(true, |head| head.distance(*candidate) >= params.spawn_clearance)
        })
}
