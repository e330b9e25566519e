//! Static stand-ins for the player's body.
//!
//! The player snake is not a physics body. Each frame its path is sampled at
//! a fixed arc-length spacing and a pooled set of static circles is moved onto
//! those samples, so organisms steer around and bounce off the snake like any
//! other obstacle.

use crate::physics::{BodyHandle, BodyKind, BodyLabel, RigidBodyWorld};
use glam::Vec2;

/// Where unused proxies wait. Far outside any arena the simulation builds.
pub const PARKED_POSITION: Vec2 = Vec2::new(1.0e4, 1.0e4);

#[derive(Debug, Clone)]
pub struct SnakeProxyManager {
    pool: Vec<BodyHandle>,
    active: usize,
    separation: f32,
    radius: f32,
}

impl SnakeProxyManager {
    pub fn new(separation: f32, radius: f32) -> Self {
        Self {
            pool: Vec::new(),
            active: 0,
            separation,
            radius,
        }
    }

    /// Moves proxies onto `path` (head first). The first proxy sits on the
    /// head; every following one is placed once the walked arc length since
    /// the previous proxy reaches the separation. The pool only grows; spare
    /// proxies are parked.
    ///
    /// Returns the number of proxies in use.
    pub fn sync<W: RigidBodyWorld + ?Sized>(&mut self, world: &mut W, path: &[Vec2]) -> usize {
        let mut used = 0;
        let mut walked = 0.0_f32;
        let mut prev: Option<Vec2> = None;

        for &point in path {
            let place = match prev {
                None => true,
                Some(p) => {
                    walked += p.distance(point);
                    walked >= self.separation
                }
            };
            prev = Some(point);
            if !place {
                continue;
            }
            walked = 0.0;
            self.place(world, used, point);
            used += 1;
        }

        // Slots beyond the previous high-water mark are already parked.
        for &handle in self.pool.iter().take(self.active).skip(used) {
            world.set_position(handle, PARKED_POSITION);
        }
        self.active = used;
        used
    }

    fn place<W: RigidBodyWorld + ?Sized>(&mut self, world: &mut W, slot: usize, point: Vec2) {
        match self.pool.get(slot) {
            Some(&handle) => world.set_position(handle, point),
            None => {
                let handle =
                    world.create_circle(point, self.radius, BodyKind::Static, BodyLabel::SnakeProxy);
                self.pool.push(handle);
            }
        }
    }

    /// Forgets the pool. Used after the world was cleared.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.active = 0;
    }

    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn handles(&self) -> &[BodyHandle] {
        &self.pool
    }

    /// Positions of the proxies currently in use, head first.
    pub fn active_positions<W: RigidBodyWorld + ?Sized>(&self, world: &W) -> Vec<Vec2> {
        self.pool[..self.active]
            .iter()
            .filter_map(|&h| world.position(h))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsWorld;

    fn straight_path(len: usize, step: f32) -> Vec<Vec2> {
        (0..len).map(|i| Vec2::new(-(i as f32) * step, 0.0)).collect()
    }

    #[test]
    fn test_first_proxy_on_head() {
        let mut world = PhysicsWorld::default();
        let mut proxies = SnakeProxyManager::new(0.5, 0.4);
        let used = proxies.sync(&mut world, &[Vec2::new(3.0, 2.0)]);
        assert_eq!(used, 1);
        assert_eq!(proxies.active_positions(&world), vec![Vec2::new(3.0, 2.0)]);
    }

    #[test]
    fn test_proxies_follow_arc_length() {
        let mut world = PhysicsWorld::default();
        let mut proxies = SnakeProxyManager::new(0.5, 0.4);
        // 17 points, 0.125 apart: 2 units of path.
        let used = proxies.sync(&mut world, &straight_path(17, 0.125));
        assert_eq!(used, 5);
        let positions = proxies.active_positions(&world);
        for pair in positions.windows(2) {
            assert!(pair[0].distance(pair[1]) >= 0.5 - 1e-4);
        }
    }

    #[test]
    fn test_pool_reused_and_spares_parked() {
        let mut world = PhysicsWorld::default();
        let mut proxies = SnakeProxyManager::new(0.5, 0.4);
        proxies.sync(&mut world, &straight_path(17, 0.125));
        let bodies = world.len();

        let used = proxies.sync(&mut world, &straight_path(6, 0.125));
        assert_eq!(used, 2);
        assert_eq!(world.len(), bodies, "shrinking path must not create bodies");
        assert_eq!(proxies.pool_len(), 5);
        for &handle in &proxies.handles()[2..] {
            assert_eq!(world.position(handle), Some(PARKED_POSITION));
        }
    }

    #[test]
    fn test_empty_path_parks_everything() {
        let mut world = PhysicsWorld::default();
        let mut proxies = SnakeProxyManager::new(0.5, 0.4);
        proxies.sync(&mut world, &straight_path(10, 0.125));
        assert_eq!(proxies.sync(&mut world, &[]), 0);
        assert!(proxies.active_positions(&world).is_empty());
        assert!(world
            .all_bodies()
            .iter()
            .all(|(_, b)| b.position == PARKED_POSITION));
    }
}
