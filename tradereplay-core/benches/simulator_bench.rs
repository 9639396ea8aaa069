//! Criterion benchmarks for simulator hot paths.
//!
//! Benchmarks:
//! 1. Batch replay over synthetic bars
//! 2. Streaming driver, one bar at a time
//! 3. Metrics over a finished run
//! 4. ATR series over candles

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradereplay_core::indicators::atr_series;
use tradereplay_core::{
    run_backtest, Bar, Candle, ExecutionConfig, Metrics, RiskConfig, Signal, StreamingDriver,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let t0 = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            let signal = match i % 25 {
                0 => Signal::Long,
                12 => Signal::Short,
                _ => Signal::Flat,
            };
            Bar::new(t0 + Duration::minutes(i as i64), open, close + 1.5, close - 1.5, close)
                .with_signal(signal)
                .with_volatility(1.5)
        })
        .collect()
}

fn make_candles(n: usize) -> Vec<Candle> {
    make_bars(n)
        .iter()
        .map(|b| Candle::new(b.timestamp, b.open, b.high, b.low, b.close))
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_replay");
    let config = ExecutionConfig::default();
    let risk = RiskConfig::default();
    for n in [1_000usize, 10_000, 100_000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| run_backtest(black_box(bars), &config, &risk));
        });
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let bars = make_bars(10_000);
    c.bench_function("streaming_10k", |b| {
        b.iter(|| {
            let mut driver =
                StreamingDriver::new(ExecutionConfig::default(), RiskConfig::default()).unwrap();
            for bar in &bars {
                let _ = driver.push(black_box(bar));
            }
            driver.current_result()
        });
    });
}

fn bench_metrics(c: &mut Criterion) {
    let result = run_backtest(
        &make_bars(100_000),
        &ExecutionConfig::default(),
        &RiskConfig::default(),
    )
    .unwrap();
    c.bench_function("metrics_100k", |b| {
        b.iter(|| Metrics::compute(black_box(&result.equity), black_box(&result.trades)));
    });
}

fn bench_atr(c: &mut Criterion) {
    let candles = make_candles(100_000);
    c.bench_function("atr_series_100k", |b| {
        b.iter(|| atr_series(black_box(&candles), 14));
    });
}

criterion_group!(benches, bench_batch, bench_streaming, bench_metrics, bench_atr);
criterion_main!(benches);
