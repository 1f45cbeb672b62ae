#![allow(missing_docs)]
//! Path selection benchmarks over synthetic consensus snapshots
//!
//! Measures guard scoring, bandwidth-weighted shuffling and end-to-end
//! selection at a few pool sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use allypath_core::{
    bandwidth_weighted_shuffle, Alliance, AlphaParams, Bandwidth, CountryCode, PathSelector,
    Relay, SecurityScorer, TrustModel,
};
use allypath_testkit::seeded_rng;

const COUNTRIES: [&str; 8] = ["PT", "BR", "US", "RU", "CN", "DE", "IR", "FR"];
const CLIENT_IP: &str = "10.255.0.1";
const DESTINATION_IP: &str = "10.255.0.2";

#[allow(clippy::unwrap_used)]
fn alliances() -> Vec<Alliance> {
    vec![
        Alliance::new(["PT", "BR"], 0.25).unwrap(),
        Alliance::new(["US", "RU"], 0.01).unwrap(),
        Alliance::new(["PT", "CN"], 0.4).unwrap(),
        Alliance::new(["IR", "DE"], 0.8).unwrap(),
    ]
}

// Country is derived from the third octet.
fn locate(ip: &str) -> Option<CountryCode> {
    let octet: usize = ip.split('.').nth(2)?.parse().ok()?;
    COUNTRIES.get(octet % COUNTRIES.len()).map(|c| CountryCode::new(*c))
}

#[allow(clippy::unwrap_used)]
fn synthetic_relays(count: usize) -> Vec<Relay> {
    (0..count)
        .map(|i| {
            let policy = if i % 5 == 0 { "accept *:*" } else { "reject *:*" };
            Relay::new(format!("R{i}"), format!("10.{}.{}.1", i / 256, i % 256))
                .with_bandwidth(Bandwidth::measured(100 + (i as u64 * 37) % 9000))
                .with_exit_policy(policy.parse().unwrap())
        })
        .collect()
}

fn bench_guard_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard_scoring");
    let trust = TrustModel::new(alliances());

    for size in [100, 1000, 5000] {
        let relays = synthetic_relays(size);
        let scorer = SecurityScorer::new(&trust, &locate);
        group.bench_with_input(BenchmarkId::from_parameter(size), &relays, |b, relays| {
            b.iter(|| black_box(scorer.guard_security(CLIENT_IP, relays.iter())));
        });
    }

    group.finish();
}

fn bench_weighted_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_shuffle");

    for size in [100, 1000] {
        let relays = synthetic_relays(size);
        let refs: Vec<&Relay> = relays.iter().collect();
        let mut rng = seeded_rng(5);
        group.bench_with_input(BenchmarkId::from_parameter(size), &refs, |b, refs| {
            b.iter(|| black_box(bandwidth_weighted_shuffle(refs, &mut rng)));
        });
    }

    group.finish();
}

fn bench_select_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_path");
    group.sample_size(20);

    for size in [100, 1000] {
        let mut selector = PathSelector::new(
            alliances(),
            synthetic_relays(size),
            locate,
            seeded_rng(9),
        );
        let guard_params = AlphaParams::guard_default();
        let exit_params = AlphaParams::exit_default();
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                black_box(selector.select_path(
                    CLIENT_IP,
                    DESTINATION_IP,
                    &guard_params,
                    &exit_params,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_guard_scoring,
    bench_weighted_shuffle,
    bench_select_path
);
criterion_main!(benches);
