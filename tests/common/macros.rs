/// Asserts that the organism count is within the configured target.
#[macro_export]
macro_rules! assert_population_within_target {
    ($sim:expr) => {
        assert!(
            $sim.organisms().len() <= $sim.config().organisms.population,
            "Population {} exceeds target {}",
            $sim.organisms().len(),
            $sim.config().organisms.population
        );
        assert!(
            $sim.fruit().len() <= $sim.config().fruit.target,
            "Fruit {} exceeds target {}",
            $sim.fruit().len(),
            $sim.config().fruit.target
        );
    };
}

/// Asserts that every organism's first segment sits on its head body.
#[macro_export]
macro_rules! assert_heads_synced {
    ($sim:expr) => {
        for org in $sim.organisms().iter() {
            let body = $sim.world().position(org.head_body);
            assert_eq!(
                Some(org.segments[0].position),
                body,
                "{} head segment drifted from its body",
                org.id
            );
        }
    };
}
