use crate::config::OrganismConfig;
use crate::organism::{Organism, Segment};
use crate::physics::{BodyKind, BodyLabel, RigidBodyWorld};
use crate::systems::steering::wrap_angle;
use blobworld_data::{OrganismId, Rgb};
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

/// Builds an organism around `center` and creates its bodies.
///
/// The head is a driven circle; followers are sensors placed around the head
/// at a sampled distance, which becomes their rest length.
pub fn create_organism_with_rng<W, R>(
    world: &mut W,
    id: OrganismId,
    center: Vec2,
    params: &OrganismConfig,
    rng: &mut R,
) -> Organism
where
    W: RigidBodyWorld + ?Sized,
    R: Rng + ?Sized,
{
    let head_radius = params.radius.sample(rng);
    let head_body = world.create_circle(
        center,
        head_radius,
        BodyKind::Driven,
        BodyLabel::OrganismHead(id),
    );

    let followers = params.follower_count.sample(rng);
    let mut segments = Vec::with_capacity(followers + 1);
    let mut follower_bodies = Vec::with_capacity(followers);
    segments.push(Segment {
        position: center,
        anchor: center,
        radius: head_radius,
        parent: None,
        rest_length: 0.0,
        phase: rng.gen_range(0.0..TAU),
        body: head_body,
    });

    for _ in 0..followers {
        let angle = params.follower_angle.sample(rng);
        let distance = params.spacing.sample(rng);
        let radius = params.radius.sample(rng);
        let position = center + Vec2::from_angle(angle) * distance;
        let body = world.create_circle(
            position,
            radius,
            BodyKind::Sensor,
            BodyLabel::OrganismSegment(id),
        );
        follower_bodies.push(body);
        segments.push(Segment {
            position,
            anchor: position,
            radius,
            parent: Some(0),
            rest_length: distance,
            phase: rng.gen_range(0.0..TAU),
            body,
        });
    }

    let heading = wrap_angle(rng.gen_range(0.0..TAU));
    let speed = params.speed.sample(rng);
    world.set_velocity(head_body, Vec2::from_angle(heading) * speed);

    let organism = Organism {
        id,
        heading,
        speed,
        leader_timer: params.leader_interval.sample(rng),
        color: Rgb::PALETTE.choose(rng).copied().unwrap_or_default(),
        head_body,
        follower_bodies,
        segments,
    };
    tracing::debug!(
        id = %organism.id,
        segments = organism.segments.len(),
        x = center.x,
        z = center.y,
        "Organism spawned"
    );
    organism
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Span;
    use crate::physics::PhysicsWorld;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_create_organism_shape() {
        let mut world = PhysicsWorld::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let params = OrganismConfig {
            follower_count: Span::fixed(3),
            ..OrganismConfig::default()
        };
        let org = create_organism_with_rng(&mut world, OrganismId(7), Vec2::new(1.0, 2.0), &params, &mut rng);

        assert_eq!(org.segments.len(), 4);
        assert_eq!(world.len(), 4);
        assert_eq!(org.segments[0].body, org.head_body);
        assert_eq!(org.segments[0].parent, None);
        let follower_bodies: Vec<_> = org.segments[1..].iter().map(|s| s.body).collect();
        assert_eq!(org.follower_bodies, follower_bodies);

        let head = world.body(org.head_body).unwrap();
        assert_eq!(head.kind, BodyKind::Driven);
        assert_eq!(head.label, BodyLabel::OrganismHead(OrganismId(7)));

        for seg in &org.segments[1..] {
            assert_eq!(seg.parent, Some(0));
            let d = seg.position.distance(Vec2::new(1.0, 2.0));
            assert!((d - seg.rest_length).abs() < 1e-4);
            assert!(params.spacing.min <= seg.rest_length && seg.rest_length <= params.spacing.max);
            assert_eq!(world.body(seg.body).unwrap().kind, BodyKind::Sensor);
        }
    }

    #[test]
    fn test_head_velocity_matches_heading() {
        let mut world = PhysicsWorld::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let org = create_organism_with_rng(
            &mut world,
            OrganismId(0),
            Vec2::ZERO,
            &OrganismConfig::default(),
            &mut rng,
        );
        let v = world.body(org.head_body).unwrap().velocity;
        assert!((v.length() - org.speed).abs() < 1e-4);
        assert!((v - Vec2::from_angle(org.heading) * org.speed).length() < 1e-4);
        assert!(Rgb::PALETTE.contains(&org.color));
    }
}
