use crate::organism::Organism;
use crate::physics::RigidBodyWorld;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Outcome of one steering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerAction {
    /// Something was ahead; the heading turned a quarter circle.
    Avoided,
    /// Clear path; the heading drifted by at most the wander angle.
    Wandered,
    /// Head body is gone; nothing was changed.
    Skipped,
}

/// Maps an angle into `[-PI, PI)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid may round up to TAU itself.
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Looks `look_ahead` units along the heading with a ray as wide as the
/// head. Bodies of the organism itself are ignored. On a hit the heading turns
/// left or right by a quarter circle; otherwise it wanders. The head body's
/// velocity is then set from the new heading and the organism's speed.
pub fn steer<W, R>(world: &mut W, organism: &mut Organism, look_ahead: f32, wander: f32, rng: &mut R) -> SteerAction
where
    W: RigidBodyWorld + ?Sized,
    R: Rng + ?Sized,
{
    let Some(head) = world.body(organism.head_body) else {
        return SteerAction::Skipped;
    };
    let width = head.shape.bounding_radius() * 2.0;
    let dir = Vec2::from_angle(organism.heading);

    let blocked = world
        .ray_query(head.position, dir, look_ahead, width)
        .iter()
        .any(|hit| hit.label.organism() != Some(organism.id));

    let action = if blocked {
        let turn = if rng.gen_bool(0.5) { FRAC_PI_2 } else { -FRAC_PI_2 };
        organism.heading = wrap_angle(organism.heading + turn);
        SteerAction::Avoided
    } else {
        if wander > 0.0 {
            organism.heading = wrap_angle(organism.heading + rng.gen_range(-wander..=wander));
        }
        SteerAction::Wandered
    };

    world.set_velocity(
        organism.head_body,
        Vec2::from_angle(organism.heading) * organism.speed,
    );
    action
}
