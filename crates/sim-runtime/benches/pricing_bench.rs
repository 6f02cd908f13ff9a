use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sim_core::{ActiveEvent, EventKind, Good, SystemDescriptor, SystemId};
use sim_econ::{calculate_price, MarketLedger};
use sim_runtime::{MarketSession, SystemCatalog};
use std::collections::BTreeMap;

fn build_systems(n: u32) -> Vec<SystemDescriptor> {
    (0..n)
        .map(|i| SystemDescriptor {
            id: SystemId(i),
            name: format!("S{i}"),
            position: [f64::from(i) * 3.0, f64::from(i % 17) * 5.0, -f64::from(i % 5)],
            stellar_class: ["O", "B", "A", "F", "G", "K", "M"][(i % 7) as usize].to_string(),
            station_count: i % 8,
        })
        .collect()
}

fn bench_prices(c: &mut Criterion) {
    let systems = build_systems(100);
    let mut ledger = MarketLedger::new();
    for s in &systems {
        ledger.record_trade(s.id, Good::Ore, -(s.id.0 as i32) * 7);
    }
    let events = vec![ActiveEvent {
        id: "boom".into(),
        kind: EventKind::MiningBoom,
        system_id: SystemId(3),
        start_day: 0,
        end_day: 365,
        modifiers: BTreeMap::from([(Good::Ore, 0.6)]),
    }];
    c.bench_function("price 100 systems x 6 goods", |b| {
        b.iter(|| {
            for s in &systems {
                for g in Good::ALL {
                    black_box(calculate_price(g, s, black_box(42), &events, Some(&ledger)));
                }
            }
        })
    });
}

fn bench_daily_tick(c: &mut Criterion) {
    let catalog = SystemCatalog::from_systems(build_systems(100)).unwrap();
    let mut session = MarketSession::new(Default::default(), catalog, 0);
    c.bench_function("trade + decay tick", |b| {
        b.iter(|| {
            for id in 0..100 {
                black_box(session.buy(SystemId(id), Good::Fuel, 25).expect("system in catalog"));
            }
            session.advance_day();
        })
    });
}

criterion_group!(benches, bench_prices, bench_daily_tick);
criterion_main!(benches);
