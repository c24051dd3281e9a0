//! Load-duration normalization over randomized power profiles.

use chrono::TimeDelta;
use household_panel::aggregate::LoadDuration;
use household_panel::panel::{Entity, SourceTable, build_panel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod common;

#[test]
fn every_household_sums_to_one_hundred_percent() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 720;
    let index: Vec<_> = (0..n as i64)
        .map(|i| common::start() + TimeDelta::minutes(2 * i))
        .collect();

    let entities: Vec<Entity> = (0..5)
        .map(|h| {
            let peak = rng.random_range(500.0..6000.0);
            let power: Vec<f64> = (0..n).map(|_| rng.random_range(-200.0..peak)).collect();
            Entity::new(
                format!("house{h}"),
                SourceTable {
                    index: index.clone(),
                    variables: vec!["Power".into()],
                    columns: vec![power],
                },
            )
        })
        .collect();
    let panel = build_panel(entities).unwrap();

    for width in [50.0, 200.0, 1000.0] {
        let ld = LoadDuration::from_panel(&panel, "Power", width).unwrap();
        assert!(ld.bins.windows(2).all(|w| w[0] < w[1]));
        for entity in panel.entities() {
            let column = ld.column(entity).unwrap();
            assert_eq!(column.len(), ld.bins.len());
            assert!(column.iter().all(|&p| (0.0..=100.0).contains(&p)));
            let total: f64 = column.iter().sum();
            assert!((total - 100.0).abs() < 1e-9, "{entity} at {width} W: {total}");
        }
    }
}
