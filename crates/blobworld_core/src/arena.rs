use crate::physics::{BodyHandle, BodyKind, BodyLabel, RigidBodyWorld};
use glam::Vec2;
use rand::Rng;

/// Playable rectangle, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaSize {
    pub width: f32,
    pub depth: f32,
}

impl ArenaSize {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }

    /// Sizes the arena for a viewport: the shorter side equals
    /// `target_dimension`, the longer one follows the aspect ratio.
    pub fn from_aspect(target_dimension: f32, aspect: f32) -> Self {
        if aspect >= 1.0 {
            Self::new(target_dimension * aspect, target_dimension)
        } else {
            Self::new(target_dimension, target_dimension / aspect)
        }
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.depth) * 0.5
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.depth.is_finite() && self.width > 0.0 && self.depth > 0.0
    }
}

/// World bounds plus the four static walls that enclose them.
#[derive(Debug, Clone)]
pub struct Arena {
    size: ArenaSize,
    wall_thickness: f32,
    walls: [BodyHandle; 4],
}

impl Arena {
    /// Creates the walls in `world` and points its broad phase at the new
    /// bounds. The caller is responsible for clearing the world first.
    pub fn build<W: RigidBodyWorld + ?Sized>(world: &mut W, size: ArenaSize, wall_thickness: f32) -> Self {
        let half = size.half_extents();
        let t = wall_thickness;

        // Side walls run past the corners so the rectangle is sealed.
        let side = Vec2::new(t * 0.5, half.y + t);
        let cap = Vec2::new(half.x + t, t * 0.5);
        let walls = [
            world.create_box(Vec2::new(-half.x - t * 0.5, 0.0), side, BodyKind::Static, BodyLabel::Wall),
            world.create_box(Vec2::new(half.x + t * 0.5, 0.0), side, BodyKind::Static, BodyLabel::Wall),
            world.create_box(Vec2::new(0.0, -half.y - t * 0.5), cap, BodyKind::Static, BodyLabel::Wall),
            world.create_box(Vec2::new(0.0, half.y + t * 0.5), cap, BodyKind::Static, BodyLabel::Wall),
        ];
        world.set_bounds(-half, half);

        Self {
            size,
            wall_thickness,
            walls,
        }
    }

    #[must_use]
    pub fn size(&self) -> ArenaSize {
        self.size
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[must_use]
    pub fn depth(&self) -> f32 {
        self.size.depth
    }

    #[must_use]
    pub fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    #[must_use]
    pub fn walls(&self) -> &[BodyHandle; 4] {
        &self.walls
    }

    /// True when a circle of `radius` at `pos` pokes out of the playable
    /// rectangle.
    #[must_use]
    pub fn is_outside(&self, pos: Vec2, radius: f32) -> bool {
        let half = self.size.half_extents();
        pos.x < -half.x + radius
            || pos.x > half.x - radius
            || pos.y < -half.y + radius
            || pos.y > half.y - radius
    }

    /// Uniform point at least `inset` away from every wall. Axes narrower
    /// than twice the inset collapse to the center line.
    pub fn random_point<R: Rng + ?Sized>(&self, inset: f32, rng: &mut R) -> Vec2 {
        let half = self.size.half_extents() - Vec2::splat(inset);
        let x = if half.x > 0.0 { rng.gen_range(-half.x..=half.x) } else { 0.0 };
        let y = if half.y > 0.0 { rng.gen_range(-half.y..=half.y) } else { 0.0 };
        Vec2::new(x, y)
    }
}
