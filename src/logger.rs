use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Append-only activity trail shared by the recorder, the renderer and the binary.
pub struct Logger {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    pub fn new(log_path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Sends activity lines to any writer instead of a file.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Logger {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn log(&self, component: &str, message: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(writer, "[{}] [{}] {}", timestamp, component, message);
            let _ = writer.flush();
        }
    }
}
