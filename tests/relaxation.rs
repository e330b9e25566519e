use blobworld_lib::model::arena::{Arena, ArenaSize};
use blobworld_lib::model::config::{OrganismConfig, Span};
use blobworld_lib::model::lifecycle::create_organism_with_rng;
use blobworld_lib::model::physics::{PhysicsWorld, RigidBodyWorld};
use blobworld_lib::model::state::OrganismId;
use blobworld_lib::model::systems::relaxation::{relax, RelaxParams};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn five_segment_organism(world: &mut PhysicsWorld) -> blobworld_lib::model::organism::Organism {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let params = OrganismConfig {
        follower_count: Span::fixed(4),
        spacing: Span::fixed(1.0),
        radius: Span::fixed(0.6),
        ..OrganismConfig::default()
    };
    create_organism_with_rng(world, OrganismId(0), Vec2::ZERO, &params, &mut rng)
}

#[test]
fn test_stationary_head_keeps_followers_near_rest() {
    let mut world = PhysicsWorld::default();
    let _arena = Arena::build(&mut world, ArenaSize::new(20.0, 20.0), 1.0);
    let mut org = five_segment_organism(&mut world);
    let params = RelaxParams::from(&OrganismConfig::default());
    let epsilon = params.wiggle_amplitude * 2.0_f32.sqrt() + 1e-4;

    for frame in 0..100 {
        relax(&mut world, &mut org, &params, frame as f32 / 60.0);
        let head = org.segments[0].position;
        assert_eq!(head, Vec2::ZERO);
        for seg in &org.segments[1..] {
            let d = seg.position.distance(head);
            assert!(d <= 1.0 + epsilon, "follower at {d} after frame {frame}");
        }
    }
}

#[test]
fn test_followers_catch_up_after_head_jump() {
    let mut world = PhysicsWorld::default();
    let _arena = Arena::build(&mut world, ArenaSize::new(20.0, 20.0), 1.0);
    let mut org = five_segment_organism(&mut world);
    let params = RelaxParams::from(&OrganismConfig::default());
    let epsilon = params.wiggle_amplitude * 2.0_f32.sqrt() + 1e-3;

    let target = Vec2::new(6.0, -4.0);
    world.set_position(org.head_body, target);
    let mut previous = f32::MAX;
    for frame in 0..150 {
        relax(&mut world, &mut org, &params, frame as f32 / 60.0);
        let worst = org.segments[1..]
            .iter()
            .map(|s| s.anchor.distance(target))
            .fold(0.0, f32::max);
        assert!(worst <= previous + 1e-5, "anchors must not drift away");
        previous = worst;
    }
    for seg in &org.segments[1..] {
        assert!(seg.position.distance(target) <= 1.0 + epsilon);
        assert_eq!(world.position(seg.body), Some(seg.position));
    }
}
