//! Queries the player's movement logic asks the simulation.

use crate::arena::Arena;
use crate::fruit::{Fruit, FruitSpawner};
use crate::physics::RigidBodyWorld;
use glam::Vec2;

/// Whether a circle at `pos` would leave the arena or overlap a solid
/// obstacle. The player's own proxies and fruit never block.
pub fn is_position_blocked<W: RigidBodyWorld + ?Sized>(world: &W, arena: &Arena, pos: Vec2, radius: f32) -> bool {
    if arena.is_outside(pos, radius) {
        return true;
    }
    let reach = Vec2::splat(radius);
    world
        .region_query(pos - reach, pos + reach)
        .into_iter()
        .filter_map(|h| world.body(h))
        .filter(|b| !b.label.is_snake_proxy() && !b.label.is_fruit())
        .any(|b| b.overlaps_circle(pos, radius))
}

/// Eats the first fruit within `radius + collision_radius` of `pos`.
pub fn handle_fruit_collection<W: RigidBodyWorld + ?Sized>(
    world: &mut W,
    fruit: &mut FruitSpawner,
    pos: Vec2,
    radius: f32,
    collision_radius: f32,
) -> Option<Fruit> {
    fruit.collect_at(world, pos, radius + collision_radius)
}
