//! Rate splitting across the worker pool

use std::time::Duration;

/// Per-worker submissions per second, rounded up so the pool never
/// undershoots the aggregate target
pub fn per_worker_rate(total_rate: u32, workers: usize) -> u32 {
    if workers == 0 {
        return 0;
    }
    let workers = workers as u32;
    total_rate.div_ceil(workers)
}

/// Delay between one worker's iterations
pub fn worker_delay(per_worker_rate: u32) -> Duration {
    if per_worker_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(1_000 / per_worker_rate as u64)
}
