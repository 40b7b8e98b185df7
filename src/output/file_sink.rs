use super::ResultSink;
use crate::pipeline::AnalysisReport;
use crate::segmentation::mask_to_overlay;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const OVERLAY_FILE: &str = "overlay.png";
pub const REPORT_FILE: &str = "report.json";

/// Writes the mask overlay as PNG and the report summary as JSON.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        tracing::info!("Writing results to {}", dir.display());
        Ok(Self { dir })
    }

    pub fn overlay_path(&self) -> PathBuf {
        self.dir.join(OVERLAY_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }
}

impl ResultSink for FileSink {
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()> {
        let overlay_path = self.overlay_path();
        mask_to_overlay(&report.result.mask)
            .save(&overlay_path)
            .with_context(|| format!("Failed to write overlay {}", overlay_path.display()))?;

        let report_path = self.report_path();
        let file = File::create(&report_path)
            .with_context(|| format!("Failed to create report {}", report_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report.summary())
            .context("Failed to serialize report")?;
        writer.flush().context("Failed to flush report")?;

        tracing::debug!(
            "Wrote {} and {}",
            overlay_path.display(),
            report_path.display()
        );
        Ok(())
    }
}
