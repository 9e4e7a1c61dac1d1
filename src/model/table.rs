use std::fs::File;
use std::path::Path;

use crate::model::error::LogError;

/// A log file read back into memory: the header plus one numeric row per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl SeriesTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let file = File::open(path.as_ref())?;
        // header names stay verbatim so they match what was recorded
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Fields)
            .from_reader(file);

        let names = header_names(&mut reader)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<f64> = record.deserialize(None)?;
            rows.push(row);
        }

        Ok(SeriesTable { names, rows })
    }

    /// Reads only the first line of a log file.
    pub fn read_header(path: impl AsRef<Path>) -> Result<Vec<String>, LogError> {
        let file = File::open(path.as_ref())?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Fields)
            .from_reader(file);
        header_names(&mut reader)
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> Result<Vec<f64>, LogError> {
        if index >= self.width() {
            return Err(LogError::ColumnOutOfRange {
                id: index,
                width: self.width(),
            });
        }
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }
}

fn header_names<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, LogError> {
    let headers = reader.headers()?;
    if headers.is_empty() {
        return Err(LogError::Format("log file has no header".to_string()));
    }
    Ok(headers.iter().map(str::to_string).collect())
}
