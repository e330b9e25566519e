use crate::config::Span;
use crate::organism::Organism;
use crate::physics::RigidBodyWorld;
use rand::Rng;

/// Counts down the organism's leader timer by `dt` seconds. When it runs out
/// the timer is re-armed and, if there is a follower, a random follower trades
/// places with the head: position, anchor and radius are swapped and both
/// physics bodies are moved and resized to match. Bodies keep their roles, so
/// the head body stays the driven one.
///
/// Returns the index of the follower that became the head.
pub fn maybe_rotate<W, R>(
    world: &mut W,
    organism: &mut Organism,
    dt: f32,
    interval: Span<f32>,
    rng: &mut R,
) -> Option<usize>
where
    W: RigidBodyWorld + ?Sized,
    R: Rng + ?Sized,
{
    organism.leader_timer -= dt;
    if organism.leader_timer > 0.0 {
        return None;
    }
    organism.leader_timer = interval.sample(rng);

    if organism.segments.len() < 2 {
        return None;
    }
    let k = rng.gen_range(1..organism.segments.len());
    let (head, followers) = organism.segments.split_at_mut(1);
    let head = &mut head[0];
    let follower = &mut followers[k - 1];

    std::mem::swap(&mut head.position, &mut follower.position);
    std::mem::swap(&mut head.anchor, &mut follower.anchor);
    std::mem::swap(&mut head.radius, &mut follower.radius);

    for seg in [&*head, &*follower] {
        world.set_position(seg.body, seg.position);
        world.set_circle_radius(seg.body, seg.radius);
    }

    tracing::trace!(id = %organism.id, from = k, "Leader rotated");
    Some(k)
}
