//! Benchmarks for dataset lookup and working point resolution.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tdb_core::{
    CurveDataset, CurveKind, DatasetCollection, ElementRole, MatchTarget, MatchWeights,
    find_best_match,
};
use tdb_devices::{CharacterizedElement, Ratings, Technology, Transistor, TransistorInfo};

fn channel_grid(role: ElementRole, temps: usize, gates: usize) -> DatasetCollection {
    let datasets = (0..temps)
        .flat_map(|t| (0..gates).map(move |g| (t, g)))
        .map(|(t, g)| {
            let t_j = -40.0 + 5.0 * t as f64;
            let v_g = 8.0 + 0.5 * g as f64;
            let points = (0..=50)
                .map(|k| {
                    let i = 4.0 * k as f64;
                    (i, 0.01 * (1.0 + t_j / 200.0) * i)
                })
                .collect();
            CurveDataset::channel_i_v(t_j, Some(v_g), points).unwrap()
        })
        .collect();
    DatasetCollection::new(role, CurveKind::Channel, datasets).unwrap()
}

fn bench_find_best_match(c: &mut Criterion) {
    let collection = channel_grid(ElementRole::Switch, 44, 25);
    let weights = MatchWeights::new(10.0).unwrap();
    let target = MatchTarget::new(117.0, 14.2);

    c.bench_function("find_best_match_1100_datasets", |b| {
        b.iter(|| find_best_match(black_box(&collection), black_box(&target), &weights).unwrap());
    });
}

fn bench_update_wp(c: &mut Criterion) {
    let switch = CharacterizedElement::switch(
        175.0,
        channel_grid(ElementRole::Switch, 8, 5),
        DatasetCollection::empty(ElementRole::Switch, CurveKind::EOn),
        DatasetCollection::empty(ElementRole::Switch, CurveKind::EOff),
    )
    .unwrap();
    let diode = CharacterizedElement::diode(175.0, channel_grid(ElementRole::Diode, 8, 5)).unwrap();
    let info = TransistorInfo {
        name: "bench".to_string(),
        manufacturer: "bench".to_string(),
        technology: Technology::SicMosfet,
        ratings: Ratings {
            v_abs_max: 1200.0,
            i_abs_max: 200.0,
            i_cont: 100.0,
        },
    };
    let mut transistor =
        Transistor::new(info, switch, diode, MatchWeights::new(10.0).unwrap()).unwrap();

    c.bench_function("update_wp_40_datasets", |b| {
        b.iter(|| {
            transistor
                .update_wp(black_box(125.0), black_box(15.0), black_box(80.0))
                .unwrap()
                .switch_r_channel()
        });
    });
}

criterion_group!(benches, bench_find_best_match, bench_update_wp);
criterion_main!(benches);
