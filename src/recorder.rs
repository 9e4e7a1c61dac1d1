use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::logger::Logger;
use crate::model::error::LogError;
use crate::model::measurements::Measurements;
use crate::model::table::SeriesTable;

/// Appends one row per iteration to a log file.
///
/// Iteration 0 truncates the file and writes the header before the first row. Later iterations
/// append values only, positionally, trusting the header written at iteration 0.
pub struct Recorder {
    path: PathBuf,
    logger: Option<Arc<Logger>>,
    strict: bool,
}

impl Recorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Recorder {
            path: path.into(),
            logger: None,
            strict: false,
        }
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// When enabled, appended rows must carry the same field names as the stored header.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, measurements: &Measurements, iteration: usize) -> Result<(), LogError> {
        measurements.validate()?;

        if self.strict && iteration > 0 {
            self.check_header(measurements)?;
        }

        let payload = format_rows(measurements, iteration == 0)?;

        let file = if iteration == 0 {
            File::create(&self.path)?
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?
        };

        let mut writer = BufWriter::new(file);
        writer.write_all(&payload)?;
        writer.flush()?;

        self.log(&format!(
            "iteration {}: wrote {} fields to {}",
            iteration,
            measurements.len(),
            self.path.display()
        ));
        Ok(())
    }

    fn check_header(&self, measurements: &Measurements) -> Result<(), LogError> {
        let expected = SeriesTable::read_header(&self.path)?;
        let found: Vec<String> = measurements.names().map(str::to_string).collect();
        if expected != found {
            return Err(LogError::HeaderMismatch { expected, found });
        }
        Ok(())
    }

    fn log(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.log("recorder", message);
        }
    }
}

/// Formats the header (optionally) and the value row in memory, so nothing reaches the file
/// unless the whole payload could be produced.
fn format_rows(measurements: &Measurements, with_header: bool) -> Result<Vec<u8>, LogError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(measurements.names())?;
    }
    writer.write_record(measurements.values())?;

    writer
        .into_inner()
        .map_err(|err| LogError::FileAccess(err.into_error()))
}

/// Records `measurements` as iteration `iteration` of the log at `path`.
pub fn record(
    path: impl AsRef<Path>,
    measurements: &Measurements,
    iteration: usize,
) -> Result<(), LogError> {
    Recorder::new(path.as_ref()).record(measurements, iteration)
}
