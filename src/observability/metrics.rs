//! Metrics for the transaction quality pipeline
//!
//! Records through the `metrics` facade using Prometheus naming conventions.
//! Nothing is exported unless the embedding process installs a recorder.

use std::fmt;

/// Enum representing all metric names used in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingest
    IngestRowsRead,

    // Standardize
    StandardizeDateUnparsed,
    StandardizeAmountNotNumeric,

    // Quality
    QualityRowsValid,
    QualityRowsInvalid,
    QualityIssuesDetected,

    // Report
    ReportArtifactsWritten,
    PipelineDuration,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRowsRead => "txn_ingest_rows_read_total",
            MetricName::StandardizeDateUnparsed => "txn_standardize_date_unparsed_total",
            MetricName::StandardizeAmountNotNumeric => "txn_standardize_amount_not_numeric_total",
            MetricName::QualityRowsValid => "txn_quality_rows_valid_total",
            MetricName::QualityRowsInvalid => "txn_quality_rows_invalid_total",
            MetricName::QualityIssuesDetected => "txn_quality_issues_detected_total",
            MetricName::ReportArtifactsWritten => "txn_report_artifacts_written_total",
            MetricName::PipelineDuration => "txn_pipeline_duration_seconds",
        }
    }
}

pub mod ingest {
    use super::MetricName;

    pub fn rows_read(count: usize) {
        ::metrics::counter!(MetricName::IngestRowsRead.as_str()).increment(count as u64);
    }
}

pub mod standardize {
    use super::MetricName;

    pub fn date_unparsed() {
        ::metrics::counter!(MetricName::StandardizeDateUnparsed.as_str()).increment(1);
    }

    pub fn amount_not_numeric() {
        ::metrics::counter!(MetricName::StandardizeAmountNotNumeric.as_str()).increment(1);
    }
}

pub mod quality {
    use super::MetricName;

    pub fn rows_partitioned(valid: usize, invalid: usize) {
        ::metrics::counter!(MetricName::QualityRowsValid.as_str()).increment(valid as u64);
        ::metrics::counter!(MetricName::QualityRowsInvalid.as_str()).increment(invalid as u64);
    }

    /// Record that a rule was violated by a row
    pub fn issue_detected(rule: &'static str) {
        ::metrics::counter!(MetricName::QualityIssuesDetected.as_str(), "rule" => rule).increment(1);
    }
}

pub mod report {
    use super::MetricName;

    pub fn artifact_written(file_name: &'static str) {
        ::metrics::counter!(MetricName::ReportArtifactsWritten.as_str(), "file" => file_name).increment(1);
    }

    pub fn pipeline_duration(seconds: f64) {
        ::metrics::histogram!(MetricName::PipelineDuration.as_str()).record(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed_and_unique() {
        let all = [
            MetricName::IngestRowsRead,
            MetricName::StandardizeDateUnparsed,
            MetricName::StandardizeAmountNotNumeric,
            MetricName::QualityRowsValid,
            MetricName::QualityRowsInvalid,
            MetricName::QualityIssuesDetected,
            MetricName::ReportArtifactsWritten,
            MetricName::PipelineDuration,
        ];
        let mut names: Vec<&str> = all.iter().map(|m| m.as_str()).collect();
        assert!(names.iter().all(|n| n.starts_with("txn_")));
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        ingest::rows_read(3);
        quality::issue_detected("invalid_date");
        report::pipeline_duration(0.5);
    }
}
