//! Run report assembly and output
//!
//! Merges the per-component reports into one run report, persists it as
//! pretty JSON, exports the monitor's time series as CSV, and mirrors an
//! executive summary on the console.

pub mod console;
pub mod error;
pub mod run_report;
pub mod timeseries;
pub mod writer;

pub use error::ReportError;
pub use run_report::RunReport;
pub use timeseries::{export_timeseries, read_timeseries, TimeSeriesRow};
pub use writer::write_json;
