//! Request counters and response-time aggregates

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Success/failure counters for one stream of requests.
///
/// Invariant: `successful + failed == total` at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTotals {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
}

impl RequestTotals {
    pub fn record(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn merge(&mut self, other: &RequestTotals) {
        self.total += other.total;
        self.successful += other.successful;
        self.failed += other.failed;
    }

    /// Success rate in [0, 1]; zero requests counts as zero rate
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 / self.total as f64
        }
    }

    /// Percentage string for the summary, e.g. `"100.00%"`
    pub fn success_rate_display(&self) -> String {
        format!("{:.2}%", self.success_rate() * 100.0)
    }
}

/// Running min/avg/max over recorded response times
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResponseTimeStats {
    pub count: u64,
    pub total_ms: u64,
    pub min_ms: Option<u64>,
    pub max_ms: Option<u64>,
}

impl ResponseTimeStats {
    pub fn record(&mut self, ms: u64) {
        self.count += 1;
        self.total_ms += ms;
        self.min_ms = Some(self.min_ms.map_or(ms, |m| m.min(ms)));
        self.max_ms = Some(self.max_ms.map_or(ms, |m| m.max(ms)));
    }

    pub fn merge(&mut self, other: &ResponseTimeStats) {
        self.count += other.count;
        self.total_ms += other.total_ms;
        self.min_ms = match (self.min_ms, other.min_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_ms = match (self.max_ms, other.max_ms) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Average in ms; zero samples yields 0.0
    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms as f64 / self.count as f64
        }
    }
}

/// Histogram bucket boundaries in milliseconds
const BUCKET_BOUNDS_MS: [u64; 4] = [100, 500, 1000, 5000];

/// Human-readable bucket labels, in bucket order
pub const BUCKET_LABELS: [&str; 5] = ["<100ms", "100-500ms", "500ms-1s", "1s-5s", ">5s"];

/// Fixed-bucket response-time histogram.
///
/// The sum of bucket counts always equals the number of recorded samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTimeHistogram {
    pub buckets: [u64; 5],
}

impl ResponseTimeHistogram {
    pub fn record(&mut self, ms: u64) {
        let index = BUCKET_BOUNDS_MS.iter().position(|&bound| ms < bound).unwrap_or(4);
        self.buckets[index] += 1;
    }

    pub fn merge(&mut self, other: &ResponseTimeHistogram) {
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *mine += theirs;
        }
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }
}

impl Serialize for ResponseTimeHistogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(5))?;
        for (label, count) in BUCKET_LABELS.iter().zip(self.buckets.iter()) {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

// Reads back the label-keyed map the serializer writes
impl<'de> Deserialize<'de> for ResponseTimeHistogram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LabeledBuckets;

        impl<'de> Visitor<'de> for LabeledBuckets {
            type Value = ResponseTimeHistogram;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of bucket labels to counts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut histogram = ResponseTimeHistogram::default();
                while let Some((label, count)) = map.next_entry::<String, u64>()? {
                    let index = BUCKET_LABELS
                        .iter()
                        .position(|&known| known == label)
                        .ok_or_else(|| {
                            serde::de::Error::unknown_field(&label, &BUCKET_LABELS)
                        })?;
                    histogram.buckets[index] = count;
                }
                Ok(histogram)
            }
        }

        deserializer.deserialize_map(LabeledBuckets)
    }
}

/// Final counters for one worker unit (actor, worker, or connection)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitStats {
    pub id: String,
    pub totals: RequestTotals,
    pub response_times: ResponseTimeStats,
}

impl UnitStats {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, response_time_ms: u64, success: bool) {
        self.totals.record(success);
        self.response_times.record(response_time_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_identity() {
        let mut totals = RequestTotals::default();
        for i in 0..100 {
            totals.record(i % 3 != 0);
        }
        assert_eq!(totals.successful + totals.failed, totals.total);
        assert_eq!(totals.total, 100);
    }

    #[test]
    fn test_success_rate_display() {
        let mut totals = RequestTotals::default();
        for _ in 0..4 {
            totals.record(true);
        }
        assert_eq!(totals.success_rate_display(), "100.00%");

        totals.record(false);
        assert_eq!(totals.success_rate_display(), "80.00%");
    }

    #[test]
    fn test_zero_requests_no_division_by_zero() {
        let totals = RequestTotals::default();
        assert_eq!(totals.success_rate(), 0.0);
        assert_eq!(totals.success_rate_display(), "0.00%");

        let stats = ResponseTimeStats::default();
        assert_eq!(stats.avg_ms(), 0.0);
    }

    #[test]
    fn test_min_avg_max_ordering() {
        let mut stats = ResponseTimeStats::default();
        for ms in [50, 250, 900, 12, 4000] {
            stats.record(ms);
        }
        let min = stats.min_ms.unwrap() as f64;
        let max = stats.max_ms.unwrap() as f64;
        assert!(min <= stats.avg_ms());
        assert!(stats.avg_ms() <= max);
        assert_eq!(stats.min_ms, Some(12));
        assert_eq!(stats.max_ms, Some(4000));
    }

    #[test]
    fn test_histogram_buckets() {
        let mut hist = ResponseTimeHistogram::default();
        hist.record(50); // <100ms
        hist.record(99); // <100ms
        hist.record(100); // 100-500ms
        hist.record(499); // 100-500ms
        hist.record(500); // 500ms-1s
        hist.record(999); // 500ms-1s
        hist.record(1000); // 1s-5s
        hist.record(4999); // 1s-5s
        hist.record(5000); // >5s
        hist.record(60_000); // >5s
        assert_eq!(hist.buckets, [2, 2, 2, 2, 2]);
        assert_eq!(hist.total(), 10);
    }

    #[test]
    fn test_histogram_total_matches_sample_count() {
        let mut hist = ResponseTimeHistogram::default();
        let mut stats = ResponseTimeStats::default();
        for ms in [1, 10, 200, 700, 1500, 9000, 80, 450] {
            hist.record(ms);
            stats.record(ms);
        }
        assert_eq!(hist.total(), stats.count);
    }

    #[test]
    fn test_histogram_round_trips_through_json() {
        let mut hist = ResponseTimeHistogram::default();
        for ms in [5, 42, 250, 800, 2_000, 9_000] {
            hist.record(ms);
        }

        let json = serde_json::to_string(&hist).unwrap();
        let parsed: ResponseTimeHistogram = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hist);

        let unknown: Result<ResponseTimeHistogram, _> =
            serde_json::from_str(r#"{"<100ms": 1, "not-a-bucket": 2}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_merge() {
        let mut a = ResponseTimeStats::default();
        a.record(10);
        let mut b = ResponseTimeStats::default();
        b.record(500);

        a.merge(&b);
        assert_eq!(a.count, 2);
        assert_eq!(a.min_ms, Some(10));
        assert_eq!(a.max_ms, Some(500));
    }
}
