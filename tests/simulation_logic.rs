mod common;

use blobworld_lib::model::config::Span;
use blobworld_lib::model::physics::RigidBodyWorld;
use blobworld_lib::model::state::SimEvent;
use common::{straight_path, SimBuilder, DT};
use glam::Vec2;
use std::time::Duration;

#[test]
fn test_population_never_exceeds_target() {
    let mut sim = SimBuilder::new()
        .with_seed(7)
        .with_population(8)
        .with_fruit(6)
        .build();

    for frame in 0..600 {
        let head = Vec2::new((frame as f32 * 0.02).sin() * 6.0, (frame as f32 * 0.02).cos() * 6.0);
        sim.update(DT, &straight_path(head, 30, 0.1));
        assert_population_within_target!(sim);
    }
    assert_eq!(sim.organisms().len(), 8);
}

#[test]
fn test_heads_synced_every_frame() {
    let mut sim = SimBuilder::new().with_seed(3).with_population(5).build();
    for _ in 0..300 {
        sim.update(DT, &straight_path(Vec2::ZERO, 10, 0.2));
        assert_heads_synced!(sim);
    }
}

#[test]
fn test_long_frames_keep_heads_inside_arena() {
    let mut sim = SimBuilder::new()
        .with_seed(12)
        .with_population(8)
        .with_config(|c| {
            c.organisms.speed = Span::new(3.0, 6.0);
            c.organisms.leader_interval = Span::fixed(1.0e6);
        })
        .build();
    let half = sim.arena().size().half_extents();

    for _ in 0..120 {
        sim.update(Duration::from_millis(750), &[]);
        for org in sim.organisms().iter() {
            let head = sim.world().position(org.head_body).unwrap();
            assert!(
                head.x.abs() <= half.x + 1e-3 && head.y.abs() <= half.y + 1e-3,
                "organism {} escaped to {head}",
                org.id
            );
        }
    }
}

#[test]
fn test_fresh_arena_blocked_scenario() {
    let mut sim = SimBuilder::new().build();
    sim.resize(blobworld_lib::model::arena::ArenaSize::new(20.0, 20.0))
        .unwrap();
    assert!(!sim.is_position_blocked(0.0, 0.0, 0.5));
    assert!(sim.is_position_blocked(10.4, 0.0, 0.5));
}

#[test]
fn test_blocked_on_every_edge() {
    let sim = SimBuilder::new().with_size(30.0, 12.0).build();
    let r = 0.5;
    assert!(sim.is_position_blocked(-15.0 + r - 0.01, 0.0, r));
    assert!(sim.is_position_blocked(15.0 - r + 0.01, 0.0, r));
    assert!(sim.is_position_blocked(0.0, -6.0 + r - 0.01, r));
    assert!(sim.is_position_blocked(0.0, 6.0 - r + 0.01, r));
    assert!(!sim.is_position_blocked(14.0, 5.0, r));
}

#[test]
fn test_obstacles_block_but_player_proxies_do_not() {
    let mut sim = SimBuilder::new()
        .with_obstacle(Vec2::new(4.0, 0.0), 1.0)
        .build();
    sim.update(DT, &straight_path(Vec2::new(-3.0, 0.0), 20, 0.1));

    assert!(sim.is_position_blocked(4.5, 0.0, 0.2));
    // Standing on the own path is fine.
    assert!(!sim.is_position_blocked(-3.0, 0.0, 0.4));
    assert!(sim.proxies().active() > 0);
}

#[test]
fn test_fruit_collection_is_idempotent() {
    let mut sim = SimBuilder::new().with_seed(9).with_fruit(3).build();
    sim.update(DT, &[]);
    let fruit = sim.fruit().iter().next().unwrap().position;

    assert!(sim.handle_fruit_collection(fruit.x, fruit.y, 0.4));
    assert!(!sim.handle_fruit_collection(fruit.x, fruit.y, 0.4));
    assert_eq!(sim.fruit().len(), 2);

    let events = sim.update(DT, &[]);
    let collected = events
        .iter()
        .filter(|e| matches!(e, SimEvent::FruitCollected { .. }))
        .count();
    assert_eq!(collected, 1);
    assert_eq!(sim.fruit().len(), 3, "eaten fruit is replaced");
}

#[test]
fn test_saturated_arena_spawns_no_fruit() {
    let mut builder = SimBuilder::new().with_fruit(5).with_size(10.0, 10.0);
    for x in -5..=5 {
        for z in -5..=5 {
            builder = builder.with_obstacle(Vec2::new(x as f32, z as f32), 0.5);
        }
    }
    let mut sim = builder.build();
    let bodies = sim.world().len();

    let events = sim.update(DT, &[]);
    assert!(sim.fruit().is_empty());
    assert!(!events
        .iter()
        .any(|e| matches!(e, SimEvent::FruitSpawned { .. })));
    assert_eq!(sim.world().len(), bodies);
}

#[test]
fn test_spawns_respect_player_clearance() {
    let mut sim = SimBuilder::new()
        .with_seed(21)
        .with_population(6)
        .with_config(|c| c.organisms.spawn_clearance = 6.0)
        .build();
    let head = Vec2::new(2.0, -1.0);
    let events = sim.update(DT, &[head]);

    for event in events {
        if let SimEvent::OrganismSpawned { x, z, .. } = event {
            assert!(Vec2::new(x, z).distance(head) >= 6.0);
        }
    }
}

#[test]
fn test_resize_then_repopulate() {
    let mut sim = SimBuilder::new()
        .with_seed(5)
        .with_population(4)
        .with_fruit(2)
        .build();
    sim.update(DT, &[]);
    let max_id = sim.organisms().iter().map(|o| o.id).max().unwrap();

    sim.resize_to_aspect(0.5).unwrap();
    assert_eq!(sim.arena().width(), 20.0);
    assert_eq!(sim.arena().depth(), 40.0);
    assert!(sim.organisms().is_empty());

    let events = sim.update(DT, &[]);
    assert!(matches!(events[0], SimEvent::ArenaRebuilt { .. }));
    assert_eq!(sim.organisms().len(), 4);
    assert!(sim.organisms().iter().all(|o| o.id > max_id));
    assert_heads_synced!(sim);
}

#[test]
fn test_malformed_organism_is_pruned() {
    let mut sim = SimBuilder::new().with_seed(2).with_population(3).build();
    sim.update(DT, &[]);

    let victim = sim.organisms_mut().iter_mut().next().unwrap();
    let victim_id = victim.id;
    let head_body = victim.head_body;
    let follower_bodies = victim.follower_bodies.clone();
    victim.segments.clear();

    let events = sim.update(DT, &[]);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::OrganismPruned { id, .. } if *id == victim_id)));
    assert!(sim.world().body(head_body).is_none());
    assert!(follower_bodies
        .iter()
        .all(|&body| sim.world().body(body).is_none()));
    assert!(sim.organisms().get(victim_id).is_none());
    assert_eq!(sim.metrics().pruned(), 1);
}

#[test]
fn test_snapshot_matches_state() {
    let mut sim = SimBuilder::new()
        .with_seed(4)
        .with_population(3)
        .with_fruit(2)
        .build();
    for _ in 0..20 {
        sim.update(DT, &[]);
    }
    let snap = sim.snapshot();
    assert_eq!(snap.frame, 20);
    assert_eq!(snap.organisms.len(), 3);
    assert_eq!(snap.fruit.len(), 2);
    for (org, view) in sim.organisms().iter().zip(&snap.organisms) {
        assert_eq!(org.id, view.id);
        assert_eq!(org.segments.len(), view.segments.len());
        assert_eq!(org.segments[0].position, view.segments[0].position);
    }
    let json = snap.to_json_pretty().unwrap();
    assert!(json.contains("\"organisms\""));
}
