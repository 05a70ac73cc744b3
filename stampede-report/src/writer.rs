//! JSON report persistence

use crate::error::ReportError;
use crate::run_report::RunReport;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the run report as pretty JSON under the output directory,
/// returning the path written
pub fn write_json(report: &RunReport, directory: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(directory).map_err(|source| ReportError::Io {
        path: directory.to_path_buf(),
        source,
    })?;

    let filename = format!(
        "stampede-report-{}.json",
        report.generated_at.format("%Y%m%d-%H%M%S")
    );
    let path = directory.join(filename);

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "run report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stampede_config::StampedeConfig;

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports");
        let report = RunReport::build(&StampedeConfig::default(), Utc::now(), vec![]);

        let path = write_json(&report, &nested).unwrap();

        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: RunReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.overall.total, 0);
    }
}
