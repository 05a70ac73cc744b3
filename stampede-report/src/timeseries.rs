//! CSV export of the monitor's time series
//!
//! Flat row-per-sample format meant for spreadsheets and plotting, with a
//! reader so exports can be loaded back for comparison runs.

use crate::error::ReportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stampede_core::health::MetricSample;
use std::fs::File;
use std::path::Path;

/// One flattened CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: f32,
    pub rx_bytes_per_sec: u64,
    pub tx_bytes_per_sec: u64,
    pub load_one: f64,
    pub probe_status: String,
    pub probe_ms: Option<u64>,
}

impl From<&MetricSample> for TimeSeriesRow {
    fn from(sample: &MetricSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            cpu_percent: sample.cpu.usage_percent,
            memory_percent: sample.memory.used_percent,
            disk_percent: sample.disk.used_percent,
            rx_bytes_per_sec: sample.network.rx_bytes_per_sec,
            tx_bytes_per_sec: sample.network.tx_bytes_per_sec,
            load_one: sample.load.one,
            probe_status: serde_json::to_value(sample.api.status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string()),
            probe_ms: sample.api.response_time_ms,
        }
    }
}

/// Write the samples as CSV
pub fn export_timeseries(samples: &[MetricSample], path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);
    for sample in samples {
        writer.serialize(TimeSeriesRow::from(sample))?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Read an export back
pub fn read_timeseries(path: &Path) -> Result<Vec<TimeSeriesRow>, ReportError> {
    let file = File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for row in csv::Reader::from_reader(file).deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::health::{
        ApiProbe, CpuMetrics, DiskMetrics, HealthStatus, LoadMetrics, MemoryMetrics,
        NetworkMetrics,
    };

    fn sample(cpu: f32) -> MetricSample {
        MetricSample {
            timestamp: Utc::now(),
            cpu: CpuMetrics {
                usage_percent: cpu,
                idle_percent: 100.0 - cpu,
                cores: 4,
            },
            memory: MemoryMetrics {
                used_bytes: 1 << 30,
                free_bytes: 3 << 30,
                used_percent: 25.0,
            },
            disk: DiskMetrics {
                used_bytes: 0,
                free_bytes: 0,
                used_percent: 40.0,
            },
            network: NetworkMetrics {
                rx_bytes_per_sec: 1024,
                tx_bytes_per_sec: 512,
            },
            load: LoadMetrics {
                one: 0.5,
                five: 0.4,
                fifteen: 0.3,
            },
            process: None,
            api: ApiProbe {
                status: HealthStatus::Healthy,
                response_time_ms: Some(42),
                http_status: Some(200),
            },
        }
    }

    #[test]
    fn test_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeseries.csv");
        let samples = vec![sample(20.0), sample(85.5)];

        export_timeseries(&samples, &path).unwrap();
        let rows = read_timeseries(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cpu_percent, 85.5);
        assert_eq!(rows[0].probe_status, "healthy");
        assert_eq!(rows[0].probe_ms, Some(42));
    }

    #[test]
    fn test_empty_export_reads_back_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        export_timeseries(&[], &path).unwrap();
        assert!(read_timeseries(&path).unwrap().is_empty());
    }
}
