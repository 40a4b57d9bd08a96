// Transaction quality pipeline: ingest, standardize, validate, report

pub mod ingestion;
pub mod processing;
pub mod report;

use chrono::Local;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span};

use crate::config::{Config, PipelinePaths};
use crate::constants;
use crate::error::{QualityError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::normalize::{standardize, StandardizedRecord};
use crate::pipeline::processing::quality_gate::validate;
use crate::pipeline::report::html::{render_html, ReportContext};
use crate::pipeline::report::{csv_out, partition, IssueCount, Partition, QualitySummary};
use crate::schema::Schema;
use crate::types::Table;

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub standardized: Table<StandardizedRecord>,
    pub partition: Partition,
    pub summary: QualitySummary,
    pub issues: Vec<IssueCount>,
    /// Artifacts in the order they were written
    pub written: Vec<PathBuf>,
}

pub struct Pipeline {
    paths: PipelinePaths,
    config: Config,
}

impl Pipeline {
    pub fn new(paths: PipelinePaths, config: Config) -> Self {
        Self { paths, config }
    }

    /// Run every stage once, in order. Data quality findings never fail the
    /// run; missing inputs and unwritable outputs do.
    pub fn run(&self) -> Result<PipelineResult> {
        let started = Instant::now();
        let mut written = Vec::new();

        let table = {
            let _span = info_span!("ingest").entered();
            ingestion::read_table(&self.paths.input)?
        };

        let standardized = {
            let _span = info_span!("standardize").entered();
            standardize(table)
        };

        fs::create_dir_all(&self.paths.output_dir).map_err(|e| QualityError::output(&self.paths.output_dir, e))?;

        let preview_path = self.paths.artifact(constants::STANDARDIZED_PREVIEW_FILE);
        csv_out::write_standardized(&preview_path, &standardized.columns, &standardized.records)?;
        self.record_written(constants::STANDARDIZED_PREVIEW_FILE, preview_path, &mut written);

        let schema = Schema::load(&self.paths.schema)?;

        let split = {
            let _span = info_span!("validate").entered();
            partition(validate(standardized.clone(), &schema))
        };

        let cleaned_path = self.paths.artifact(constants::CLEANED_DATA_FILE);
        csv_out::write_assessed(&cleaned_path, &split.columns, &split.valid)?;
        self.record_written(constants::CLEANED_DATA_FILE, cleaned_path, &mut written);

        let invalid_path = self.paths.artifact(constants::INVALID_RECORDS_FILE);
        csv_out::write_assessed(&invalid_path, &split.columns, &split.invalid)?;
        self.record_written(constants::INVALID_RECORDS_FILE, invalid_path, &mut written);

        let summary = split.summary();
        let issues = split.issue_counts();

        let html = {
            let _span = info_span!("report").entered();
            let output_dir = self.paths.output_dir.display().to_string();
            render_html(&ReportContext {
                generated_at: Local::now().naive_local(),
                summary,
                issues: &issues,
                partition: &split,
                preview_rows: self.config.report.invalid_preview_rows,
                output_dir: &output_dir,
            })
        };
        let report_path = self.paths.artifact(constants::REPORT_HTML_FILE);
        fs::write(&report_path, html).map_err(|e| QualityError::output(&report_path, e))?;
        self.record_written(constants::REPORT_HTML_FILE, report_path, &mut written);

        let elapsed = started.elapsed().as_secs_f64();
        metrics::report::pipeline_duration(elapsed);
        info!(
            total = summary.total,
            valid = summary.valid,
            invalid = summary.invalid,
            invalid_pct = %summary.invalid_pct_text(),
            elapsed_secs = elapsed,
            "Pipeline finished"
        );

        Ok(PipelineResult {
            standardized,
            partition: split,
            summary,
            issues,
            written,
        })
    }

    fn record_written(&self, file_name: &'static str, path: PathBuf, written: &mut Vec<PathBuf>) {
        info!(path = %path.display(), "Saved artifact");
        metrics::report::artifact_written(file_name);
        written.push(path);
    }
}
