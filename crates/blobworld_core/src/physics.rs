//! Rigid-body world abstraction and the bundled broad-phase backend.
//!
//! The simulation only ever talks to [`RigidBodyWorld`]; nothing above this
//! module depends on how bodies are stored or how queries are answered.
//! [`PhysicsWorld`] is the shipped backend: bodies are `hecs` entities and
//! queries are served from a lazily rebuilt [`SpatialHash`].

use crate::spatial_hash::SpatialHash;
use blobworld_data::{FruitId, OrganismId};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Opaque handle of a body. Generational, so stale handles never alias.
pub type BodyHandle = hecs::Entity;

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves on its own; blocks driven bodies.
    Static,
    /// Queryable only: no collision response in either direction.
    Sensor,
    /// Moved by `step` from an externally set velocity; pushed out of solids.
    /// No friction, no rotation.
    Driven,
}

impl BodyKind {
    #[must_use]
    pub fn is_solid(self) -> bool {
        !matches!(self, BodyKind::Sensor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Box { half_extents: Vec2 },
}

impl Shape {
    /// Radius of the smallest circle around the shape's center that
    /// contains it.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Box { half_extents } => half_extents.length(),
        }
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Box { half_extents } => half_extents,
        }
    }
}

/// What a body stands for. Queries filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLabel {
    Wall,
    SnakeProxy,
    OrganismHead(OrganismId),
    OrganismSegment(OrganismId),
    Fruit(FruitId),
}

impl BodyLabel {
    #[must_use]
    pub fn organism(&self) -> Option<OrganismId> {
        match *self {
            BodyLabel::OrganismHead(id) | BodyLabel::OrganismSegment(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_snake_proxy(&self) -> bool {
        matches!(self, BodyLabel::SnakeProxy)
    }

    #[must_use]
    pub fn is_fruit(&self) -> bool {
        matches!(self, BodyLabel::Fruit(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub shape: Shape,
    pub kind: BodyKind,
    pub label: BodyLabel,
}

impl Body {
    #[must_use]
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let h = self.shape.half_extents();
        (self.position - h, self.position + h)
    }

    /// Circle-vs-circle by distance, circle-vs-box by bounds overlap.
    #[must_use]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        match self.shape {
            Shape::Circle { radius: r } => {
                let reach = r + radius;
                self.position.distance_squared(center) < reach * reach
            }
            Shape::Box { half_extents } => {
                let d = (center - self.position).abs();
                d.x < half_extents.x + radius && d.y < half_extents.y + radius
            }
        }
    }

    #[must_use]
    pub fn overlaps_aabb(&self, min: Vec2, max: Vec2) -> bool {
        let (bmin, bmax) = self.aabb();
        bmin.x <= max.x && bmax.x >= min.x && bmin.y <= max.y && bmax.y >= min.y
    }

    /// Distance along a normalized ray at which a ray of the given half-width
    /// first touches this body, if within `max_dist`. A ray starting inside
    /// the (widened) body hits at zero.
    #[must_use]
    pub fn ray_distance(&self, origin: Vec2, dir: Vec2, max_dist: f32, half_width: f32) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius } => {
                let reach = radius + half_width;
                let f = origin - self.position;
                let c = f.length_squared() - reach * reach;
                if c <= 0.0 {
                    return Some(0.0);
                }
                let b = f.dot(dir);
                if b > 0.0 {
                    return None;
                }
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let t = -b - disc.sqrt();
                (t <= max_dist).then_some(t.max(0.0))
            }
            Shape::Box { half_extents } => {
                let h = half_extents + Vec2::splat(half_width);
                let min = self.position - h;
                let max = self.position + h;
                let mut t_enter = 0.0_f32;
                let mut t_exit = max_dist;
                for axis in 0..2 {
                    let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);
                    if d.abs() < f32::EPSILON {
                        if o < lo || o > hi {
                            return None;
                        }
                        continue;
                    }
                    let inv = 1.0 / d;
                    let (t0, t1) = {
                        let a = (lo - o) * inv;
                        let b = (hi - o) * inv;
                        if a < b { (a, b) } else { (b, a) }
                    };
                    t_enter = t_enter.max(t0);
                    t_exit = t_exit.min(t1);
                    if t_enter > t_exit {
                        return None;
                    }
                }
                Some(t_enter)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyHandle,
    pub label: BodyLabel,
    pub distance: f32,
}

/// Contract every physics backend fulfils.
///
/// Mutations are cheap repositionings wherever possible; callers are
/// expected to pool bodies rather than churn them.
pub trait RigidBodyWorld {
    fn create_circle(
        &mut self,
        position: Vec2,
        radius: f32,
        kind: BodyKind,
        label: BodyLabel,
    ) -> BodyHandle;

    fn create_box(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        kind: BodyKind,
        label: BodyLabel,
    ) -> BodyHandle;

    /// Teleports a body. Unknown handles are ignored.
    fn set_position(&mut self, body: BodyHandle, position: Vec2);

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Changes the radius of a circle body; boxes are left untouched.
    fn set_circle_radius(&mut self, body: BodyHandle, radius: f32);

    fn body(&self, body: BodyHandle) -> Option<Body>;

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|b| b.position)
    }

    /// Returns whether the body existed.
    fn remove(&mut self, body: BodyHandle) -> bool;

    fn all_bodies(&self) -> Vec<(BodyHandle, Body)>;

    /// Bodies touched by a ray of the given width, nearest first.
    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: f32, width: f32) -> Vec<RayHit>;

    /// Bodies whose bounds overlap the rectangle `min..max`.
    fn region_query(&self, min: Vec2, max: Vec2) -> Vec<BodyHandle>;

    fn step(&mut self, dt: Duration);

    /// Removes every body.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Region the simulation lives in. Backends may size their broad phase
    /// from it and keep driven bodies inside it.
    fn set_bounds(&mut self, _min: Vec2, _max: Vec2) {}
}

/// Which broad-phase bucket a body currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HashSlot(Option<usize>);

struct BroadPhase {
    grid: SpatialHash<BodyHandle>,
    overflow: Vec<BodyHandle>,
}

/// `hecs`-backed world with a uniform-grid broad phase.
///
/// Small bodies inside the bounds are bucketed by center; large or outlying
/// bodies (walls, parked proxies) live in an overflow list checked on every
/// query. The grid is rebuilt lazily the first time a query runs after a body
/// changed bucket, was created or was removed.
///
/// `step` slices each driven body's motion so it never travels more than half
/// its radius between push-out passes, and once bounds are set it clamps
/// driven bodies inside them.
pub struct PhysicsWorld {
    ecs: hecs::World,
    cell_size: f32,
    bounds: (Vec2, Vec2),
    /// Set once `set_bounds` was called; driven bodies then stay inside.
    confined: bool,
    broad: RefCell<BroadPhase>,
    dirty: Cell<bool>,
}

impl PhysicsWorld {
    pub fn new(cell_size: f32) -> Self {
        let bounds = (Vec2::splat(-1.0), Vec2::splat(1.0));
        Self {
            ecs: hecs::World::new(),
            cell_size,
            bounds,
            confined: false,
            broad: RefCell::new(BroadPhase {
                grid: SpatialHash::new(cell_size, bounds.0, bounds.1),
                overflow: Vec::new(),
            }),
            dirty: Cell::new(true),
        }
    }

    /// Region the broad-phase grid currently covers.
    #[must_use]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.bounds
    }

    fn slot_for(&self, body: &Body) -> HashSlot {
        let broad = self.broad.borrow();
        if body.shape.bounding_radius() > self.cell_size {
            return HashSlot(None);
        }
        HashSlot(broad.grid.cell_idx(body.position))
    }

    fn spawn(&mut self, body: Body) -> BodyHandle {
        let slot = self.slot_for(&body);
        self.dirty.set(true);
        self.ecs.spawn((body, slot))
    }

    /// Refreshes a body's bucket after it moved or grew.
    fn reslot(&mut self, handle: BodyHandle) {
        let Ok(body) = self.ecs.get::<&Body>(handle).map(|b| *b) else {
            return;
        };
        let slot = self.slot_for(&body);
        if let Ok(mut current) = self.ecs.get::<&mut HashSlot>(handle) {
            if *current != slot {
                *current = slot;
                self.dirty.set(true);
            }
        }
    }

    fn ensure_broad_phase(&self) {
        if !self.dirty.get() {
            return;
        }
        let mut broad = self.broad.borrow_mut();
        let mut hashed = Vec::with_capacity(self.ecs.len() as usize);
        broad.overflow.clear();
        for (handle, (body, slot)) in self.ecs.query::<(&Body, &HashSlot)>().iter() {
            match slot.0 {
                Some(_) => hashed.push((body.position, handle)),
                None => broad.overflow.push(handle),
            }
        }
        broad.grid.build(&hashed);
        self.dirty.set(false);
    }

    /// Broad-phase candidates for the rectangle `min..max`.
    fn candidates(&self, min: Vec2, max: Vec2) -> Vec<BodyHandle> {
        self.ensure_broad_phase();
        let broad = self.broad.borrow();
        // Hashed bodies extend at most one cell beyond their bucket.
        let pad = Vec2::splat(self.cell_size);
        let mut out = Vec::new();
        broad.grid.query_into(min - pad, max + pad, &mut out);
        out.extend_from_slice(&broad.overflow);
        out
    }

    /// Moves a driven body out of every solid body it overlaps. Static bodies
    /// are resolved last so no push from another driven body can leave it
    /// inside a wall.
    fn resolve_penetration(&self, handle: BodyHandle, mut body: Body) -> Vec2 {
        let Shape::Circle { radius } = body.shape else {
            return body.position;
        };
        let reach = Vec2::splat(radius);
        let mut solids: Vec<Body> = self
            .candidates(body.position - reach, body.position + reach)
            .into_iter()
            .filter(|&other| other != handle)
            .filter_map(|other| self.ecs.get::<&Body>(other).ok().map(|b| *b))
            .filter(|other| other.kind.is_solid())
            .collect();
        solids.sort_by_key(|other| other.kind == BodyKind::Static);
        for other in &solids {
            body.position += penetration(&body, radius, other);
        }
        body.position
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Largest distance, as a fraction of its radius, a driven body may travel
/// between two push-out passes. Below one the center never crosses a face.
const MAX_TRAVEL_PER_RADIUS: f32 = 0.5;
const MAX_SUBSTEPS: u32 = 1024;

/// Number of integration slices needed to move `body` over `secs` without
/// skipping past a solid.
fn substeps(body: &Body, secs: f32) -> u32 {
    let travel = body.velocity.length() * secs;
    let max_travel = body.shape.bounding_radius() * MAX_TRAVEL_PER_RADIUS;
    if !travel.is_finite() || max_travel <= 0.0 {
        return 1;
    }
    ((travel / max_travel).ceil() as u32).clamp(1, MAX_SUBSTEPS)
}

/// Clamps a body center so a circle of `radius` stays inside `min..max`.
/// A region narrower than the circle pins it to the middle.
fn confine(position: Vec2, radius: f32, (min, max): (Vec2, Vec2)) -> Vec2 {
    let lo = min + Vec2::splat(radius);
    let hi = max - Vec2::splat(radius);
    let mid = (min + max) * 0.5;
    let axis = |p: f32, lo: f32, hi: f32, mid: f32| if lo > hi { mid } else { p.clamp(lo, hi) };
    Vec2::new(axis(position.x, lo.x, hi.x, mid.x), axis(position.y, lo.y, hi.y, mid.y))
}

/// Correction that moves a circle of `radius` at `body.position` out of
/// `other`.
fn penetration(body: &Body, radius: f32, other: &Body) -> Vec2 {
    match other.shape {
        Shape::Circle { radius: r } => {
            let delta = body.position - other.position;
            let dist = delta.length();
            let overlap = radius + r - dist;
            if overlap <= 0.0 {
                return Vec2::ZERO;
            }
            let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
            normal * overlap
        }
        Shape::Box { half_extents } => {
            let local = body.position - other.position;
            let closest = local.clamp(-half_extents, half_extents);
            let delta = local - closest;
            let dist = delta.length();
            if dist > f32::EPSILON {
                if dist >= radius {
                    return Vec2::ZERO;
                }
                return delta / dist * (radius - dist);
            }
            // Center inside the box: leave along the shallowest axis.
            let depth = half_extents - local.abs();
            if depth.x < depth.y {
                Vec2::new((depth.x + radius) * local.x.signum(), 0.0)
            } else {
                Vec2::new(0.0, (depth.y + radius) * local.y.signum())
            }
        }
    }
}

impl RigidBodyWorld for PhysicsWorld {
    fn create_circle(
        &mut self,
        position: Vec2,
        radius: f32,
        kind: BodyKind,
        label: BodyLabel,
    ) -> BodyHandle {
        self.spawn(Body {
            position,
            velocity: Vec2::ZERO,
            shape: Shape::Circle { radius },
            kind,
            label,
        })
    }

    fn create_box(
        &mut self,
        position: Vec2,
        half_extents: Vec2,
        kind: BodyKind,
        label: BodyLabel,
    ) -> BodyHandle {
        self.spawn(Body {
            position,
            velocity: Vec2::ZERO,
            shape: Shape::Box { half_extents },
            kind,
            label,
        })
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Ok(mut b) = self.ecs.get::<&mut Body>(body) {
            b.position = position;
        } else {
            return;
        }
        self.reslot(body);
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Ok(mut b) = self.ecs.get::<&mut Body>(body) {
            b.velocity = velocity;
        }
    }

    fn set_circle_radius(&mut self, body: BodyHandle, radius: f32) {
        if let Ok(mut b) = self.ecs.get::<&mut Body>(body) {
            if let Shape::Circle { .. } = b.shape {
                b.shape = Shape::Circle { radius };
            }
        } else {
            return;
        }
        self.reslot(body);
    }

    fn body(&self, body: BodyHandle) -> Option<Body> {
        self.ecs.get::<&Body>(body).ok().map(|b| *b)
    }

    fn remove(&mut self, body: BodyHandle) -> bool {
        let removed = self.ecs.despawn(body).is_ok();
        if removed {
            self.dirty.set(true);
        }
        removed
    }

    fn all_bodies(&self) -> Vec<(BodyHandle, Body)> {
        self.ecs
            .query::<&Body>()
            .iter()
            .map(|(handle, body)| (handle, *body))
            .collect()
    }

    fn ray_query(&self, origin: Vec2, dir: Vec2, max_dist: f32, width: f32) -> Vec<RayHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO || max_dist <= 0.0 {
            return Vec::new();
        }
        let half_width = width.max(0.0) * 0.5;
        let end = origin + dir * max_dist;
        let pad = Vec2::splat(half_width);
        let min = origin.min(end) - pad;
        let max = origin.max(end) + pad;

        let mut hits: Vec<RayHit> = self
            .candidates(min, max)
            .into_iter()
            .filter_map(|handle| {
                let body = self.body(handle)?;
                let distance = body.ray_distance(origin, dir, max_dist, half_width)?;
                Some(RayHit {
                    body: handle,
                    label: body.label,
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn region_query(&self, min: Vec2, max: Vec2) -> Vec<BodyHandle> {
        self.candidates(min, max)
            .into_iter()
            .filter(|&handle| {
                self.body(handle)
                    .is_some_and(|body| body.overlaps_aabb(min, max))
            })
            .collect()
    }

    fn step(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        let driven: Vec<(BodyHandle, Body)> = self
            .ecs
            .query::<&Body>()
            .iter()
            .filter(|(_, body)| body.kind == BodyKind::Driven)
            .map(|(handle, body)| (handle, *body))
            .collect();

        for (handle, mut body) in driven {
            let steps = substeps(&body, secs);
            let h = secs / steps as f32;
            for _ in 0..steps {
                body.position += body.velocity * h;
                body.position = self.resolve_penetration(handle, body);
                if self.confined {
                    body.position = confine(body.position, body.shape.bounding_radius(), self.bounds);
                }
            }
            self.set_position(handle, body.position);
        }
    }

    fn clear(&mut self) {
        self.ecs.clear();
        self.dirty.set(true);
    }

    fn len(&self) -> usize {
        self.ecs.len() as usize
    }

    fn set_bounds(&mut self, min: Vec2, max: Vec2) {
        self.bounds = (min, max);
        self.confined = true;
        self.broad.get_mut().grid = SpatialHash::new(self.cell_size, min, max);
        let handles: Vec<BodyHandle> = self.ecs.iter().map(|e| e.entity()).collect();
        for handle in handles {
            self.reslot(handle);
        }
        self.dirty.set(true);
    }
}
