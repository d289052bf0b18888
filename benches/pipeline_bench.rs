//! Benchmarks for the analytics pipeline.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use niftybot::config::AnalyticsConfig;
use niftybot::features::{closes, compute_rsi, derive_levels};
use niftybot::strategy::{run_pipeline, SignalEngine};
use niftybot::types::{Candle, Symbol};

fn generate_candles(n: usize) -> Vec<Candle> {
    // Simple LCG PRNG for reproducibility
    let mut candles = Vec::with_capacity(n);
    let mut price = 21_500.0;
    let mut seed = 42u64;

    for i in 0..n {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let upper_bits = u32::try_from(seed >> 33).unwrap_or(0);
        let random = f64::from(upper_bits) / f64::from(u32::MAX);

        // Price change: -0.2% to +0.2%
        let open = price;
        price *= 1.0 + (random - 0.5) * 0.004;
        let high = open.max(price) + 2.0;
        let low = open.min(price) - 2.0;
        candles.push(Candle::new(i as i64 * 60, open, high, low, price, 0.0));
    }

    candles
}

fn bench_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [375_usize, 1_875, 10_000] {
        let prices = closes(&generate_candles(size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &prices, |b, prices| {
            b.iter(|| compute_rsi(black_box(prices), black_box(14)));
        });
    }

    group.finish();
}

fn bench_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("Signals");
    let config = AnalyticsConfig::default();
    let engine = SignalEngine::new(config.signals);

    for size in [375_usize, 1_875, 10_000] {
        let candles = generate_candles(size);
        let levels = derive_levels(&candles);
        let rsi = compute_rsi(&closes(&candles), config.rsi.period).unwrap_or_default();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &candles, |b, candles| {
            b.iter(|| engine.analyze(black_box(candles), levels.as_ref(), &rsi, &config.rsi));
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");
    let config = AnalyticsConfig::default();

    // One 1m session and a 5d range
    for size in [375_usize, 1_875] {
        let candles = generate_candles(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &candles, |b, candles| {
            b.iter(|| run_pipeline(Symbol::Nifty50, black_box(candles.clone()), &config));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rsi, bench_signals, bench_pipeline);
criterion_main!(benches);
