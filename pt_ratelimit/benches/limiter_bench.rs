use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use pt_ratelimit::presets::riot;
use pt_ratelimit::RateLimiter;
use pt_ratelimit::SlidingWindow;
use pt_ratelimit::TokioClock;

fn bench_try_acquire(c: &mut Criterion) {
    let window = SlidingWindow::new(u32::MAX, Duration::from_millis(1), Arc::new(TokioClock::new())).unwrap();

    c.bench_function("sliding_window_try_acquire", |b| b.iter(|| black_box(window.try_acquire())));
}

fn bench_available(c: &mut Criterion) {
    let limiter = riot::development_key_limits(Arc::new(TokioClock::new())).unwrap();

    c.bench_function("riot_limits_available", |b| b.iter(|| black_box(limiter.available())));
}

fn bench_acquire_under_limit(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
    let window = SlidingWindow::new(u32::MAX, Duration::from_millis(1), Arc::new(TokioClock::new())).unwrap();

    c.bench_function("sliding_window_acquire", |b| b.iter(|| runtime.block_on(async { black_box(window.acquire().await) })));
}

criterion_group!(benches, bench_try_acquire, bench_available, bench_acquire_under_limit);
criterion_main!(benches);
