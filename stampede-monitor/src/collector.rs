//! Host resource sampling
//!
//! One collector per monitor, refreshed on every tick. Process metrics
//! are matched by name substring and are best-effort: no match means the
//! monitor keeps running in degraded mode with host metrics only.

use stampede_core::health::{
    CpuMetrics, DiskMetrics, LoadMetrics, MemoryMetrics, NetworkMetrics, ProcessMetrics,
};
use std::time::Instant;
use sysinfo::{CpuExt, DiskExt, NetworkExt, ProcessExt, System, SystemExt};
use tracing::debug;

pub struct ResourceCollector {
    system: System,
    process_name: Option<String>,
    last_refresh: Instant,
    warned_no_process: bool,
}

impl ResourceCollector {
    pub fn new(process_name: Option<String>) -> Self {
        Self {
            system: System::new_all(),
            process_name,
            last_refresh: Instant::now(),
            warned_no_process: false,
        }
    }

    pub fn cpu(&mut self) -> CpuMetrics {
        self.system.refresh_cpu();
        let usage = self.system.global_cpu_info().cpu_usage();
        CpuMetrics {
            usage_percent: usage,
            idle_percent: 100.0 - usage,
            cores: self.system.cpus().len(),
        }
    }

    pub fn memory(&mut self) -> MemoryMetrics {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let used = self.system.used_memory();
        MemoryMetrics {
            used_bytes: used,
            free_bytes: total.saturating_sub(used),
            used_percent: percent(used, total),
        }
    }

    pub fn disk(&mut self) -> DiskMetrics {
        self.system.refresh_disks();
        let mut total = 0u64;
        let mut free = 0u64;
        for disk in self.system.disks() {
            total += disk.total_space();
            free += disk.available_space();
        }
        DiskMetrics {
            used_bytes: total.saturating_sub(free),
            free_bytes: free,
            used_percent: percent(total.saturating_sub(free), total),
        }
    }

    /// Byte rates since the previous network refresh
    pub fn network(&mut self) -> NetworkMetrics {
        self.system.refresh_networks();
        let elapsed = self.last_refresh.elapsed().as_secs_f64().max(0.001);
        self.last_refresh = Instant::now();

        let mut rx = 0u64;
        let mut tx = 0u64;
        for (_, data) in self.system.networks() {
            rx += data.received();
            tx += data.transmitted();
        }

        NetworkMetrics {
            rx_bytes_per_sec: (rx as f64 / elapsed) as u64,
            tx_bytes_per_sec: (tx as f64 / elapsed) as u64,
        }
    }

    pub fn load(&self) -> LoadMetrics {
        let load = self.system.load_average();
        LoadMetrics {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        }
    }

    /// Best-effort target-process metrics, matched by name substring
    pub fn process(&mut self) -> Option<ProcessMetrics> {
        let needle = self.process_name.as_deref()?;
        self.system.refresh_processes();

        let found = self
            .system
            .processes()
            .values()
            .find(|process| process.name().contains(needle))
            .map(|process| ProcessMetrics {
                name: process.name().to_string(),
                cpu_percent: process.cpu_usage(),
                memory_bytes: process.memory(),
            });

        if found.is_none() && !self.warned_no_process {
            debug!(process = needle, "target process not found; degraded mode");
            self.warned_no_process = true;
        }

        found
    }
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_metrics_are_sane() {
        let mut collector = ResourceCollector::new(None);

        let cpu = collector.cpu();
        assert!(cpu.cores > 0);
        assert!((0.0..=100.0).contains(&cpu.usage_percent));

        let memory = collector.memory();
        assert!(memory.used_bytes > 0);
        assert!((0.0..=100.0).contains(&memory.used_percent));
    }

    #[test]
    fn test_unmatched_process_is_none_not_error() {
        let mut collector =
            ResourceCollector::new(Some("no-such-process-zzz".to_string()));
        assert!(collector.process().is_none());
    }

    #[test]
    fn test_percent_zero_denominator() {
        assert_eq!(percent(10, 0), 0.0);
        assert_eq!(percent(50, 100), 50.0);
    }
}
