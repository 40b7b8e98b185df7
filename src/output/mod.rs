mod file_sink;

pub use file_sink::FileSink;

use crate::pipeline::AnalysisReport;
use anyhow::Result;

/// Trait for analysis destinations
pub trait ResultSink {
    /// Persist or forward one finished analysis
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()>;
}
