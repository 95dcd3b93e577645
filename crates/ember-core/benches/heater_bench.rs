//! Criterion benchmarks for the heater tick loop.
//!
//! Two benchmark groups:
//! - `tick`: a busy heater exporting to a sink, and a bank of heaters
//! - `persistence`: save-state encode and decode

use criterion::{criterion_group, criterion_main, Criterion};
use ember_core::capability::FluidHandler;
use ember_core::heater::Heater;
use ember_core::id::Direction;
use ember_core::tank::FluidStack;
use ember_core::test_utils::*;

// ===========================================================================
// Builders
// ===========================================================================

/// A heater with a full input tank and energy, exporting west into a large sink.
fn busy_heater() -> (Heater<ListCatalog>, TestSite) {
    let mut heater = make_heater(vec![oil_recipe()]);
    let _ = pour(&mut heater, FluidStack::new(oil(), 1000));
    charge(&mut heater, 1000);
    let site = TestSite::with_sink(
        Direction::North,
        Direction::West,
        LimitedSink::new(u32::MAX, 20),
    );
    (heater, site)
}

/// Keep the heater fed so every iteration does real work.
fn top_up(heater: &mut Heater<ListCatalog>) {
    let _ = heater.fill(Direction::Up, FluidStack::new(oil(), 1000), true);
    charge(heater, 1000);
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(50);

    let (mut heater, mut site) = busy_heater();
    let mut tick = 0;
    group.bench_function("single_busy_heater", |b| {
        b.iter(|| {
            tick += 1;
            if tick % 20 == 0 {
                top_up(&mut heater);
            }
            heater.tick(tick, &mut site)
        });
    });

    let mut bank: Vec<_> = (0..1000).map(|_| busy_heater()).collect();
    let mut bank_tick = 0;
    group.bench_function("bank_of_1000_heaters", |b| {
        b.iter(|| {
            bank_tick += 1;
            for (heater, site) in &mut bank {
                if bank_tick % 20 == 0 {
                    top_up(heater);
                }
                heater.tick(bank_tick, site);
            }
        });
    });

    group.finish();
}

fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");
    group.sample_size(30);

    let (mut heater, mut site) = busy_heater();
    run(&mut heater, &mut site, 0, 5);
    let data = heater.serialize().expect("serialize");

    group.bench_function("serialize_state", |b| {
        b.iter(|| heater.serialize().expect("serialize"));
    });

    group.bench_function("deserialize_state", |b| {
        let mut target = make_heater(vec![oil_recipe()]);
        b.iter(|| target.deserialize_into(&data).expect("deserialize"));
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_persistence);
criterion_main!(benches);
