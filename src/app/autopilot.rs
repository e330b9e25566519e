use crate::model::Simulation;
use blobworld_core::systems::steering::wrap_angle;
use glam::Vec2;
use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

/// Stand-in for the player's movement loop.
///
/// Heads for the nearest fruit, circles when there is none, and never steps
/// into a blocked position. Positions are recorded most recent first.
pub struct Autopilot {
    pub position: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub radius: f32,
    /// Radians per second.
    pub turn_rate: f32,
    path: VecDeque<Vec2>,
    max_path: usize,
    eaten: u64,
}

impl Autopilot {
    pub fn new(position: Vec2, radius: f32) -> Self {
        let mut path = VecDeque::new();
        path.push_front(position);
        Self {
            position,
            heading: 0.0,
            speed: 3.0,
            radius,
            turn_rate: 2.5,
            path,
            max_path: 60,
            eaten: 0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Path samples, head first.
    pub fn path(&mut self) -> &[Vec2] {
        self.path.make_contiguous()
    }

    pub fn eaten(&self) -> u64 {
        self.eaten
    }

    /// Moves one frame. Returns whether a fruit was eaten.
    pub fn step(&mut self, sim: &mut Simulation, dt: Duration) -> bool {
        let secs = dt.as_secs_f32();
        let max_turn = self.turn_rate * secs;

        let desired = self
            .nearest_fruit(sim)
            .map(|target| {
                let d = target - self.position;
                d.y.atan2(d.x)
            })
            .unwrap_or(self.heading + max_turn);
        let delta = angle_between(self.heading, desired).clamp(-max_turn, max_turn);
        self.heading += delta;

        // Sweep to the left until a free step is found.
        let stride = self.speed * secs;
        let mut moved = false;
        for attempt in 0..8 {
            let heading = self.heading + attempt as f32 * FRAC_PI_4;
            let next = self.position + Vec2::from_angle(heading) * stride;
            if !sim.is_position_blocked(next.x, next.y, self.radius) {
                self.heading = wrap_angle(heading);
                self.position = next;
                moved = true;
                break;
            }
        }
        if moved {
            self.path.push_front(self.position);
            self.path.truncate(self.max_path);
        }

        let ate = sim.handle_fruit_collection(self.position.x, self.position.y, self.radius);
        if ate {
            self.eaten += 1;
        }
        ate
    }

    fn nearest_fruit(&self, sim: &Simulation) -> Option<Vec2> {
        sim.fruit()
            .iter()
            .map(|f| f.position)
            .min_by(|a, b| {
                a.distance_squared(self.position)
                    .total_cmp(&b.distance_squared(self.position))
            })
    }

    /// Jumps back to `position` with a fresh path, e.g. after a resize.
    pub fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.path.clear();
        self.path.push_front(position);
    }
}

/// Signed shortest rotation from `from` to `to`.
fn angle_between(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}
