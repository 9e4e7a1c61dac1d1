use std::fmt;

/// Broad classes of failure, used by callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileAccess,
    Format,
    Value,
    Render,
}

#[derive(Debug)]
pub enum LogError {
    FileAccess(std::io::Error),
    Format(String),
    InvalidField(String),
    ColumnOutOfRange { id: usize, width: usize },
    HeaderMismatch { expected: Vec<String>, found: Vec<String> },
    Render(String),
}

impl LogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogError::FileAccess(_) => ErrorKind::FileAccess,
            LogError::Format(_) => ErrorKind::Format,
            LogError::InvalidField(_)
            | LogError::ColumnOutOfRange { .. }
            | LogError::HeaderMismatch { .. } => ErrorKind::Value,
            LogError::Render(_) => ErrorKind::Render,
        }
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogError::FileAccess(err) => write!(f, "File access error: {}", err),
            LogError::Format(msg) => write!(f, "Format error: {}", msg),
            LogError::InvalidField(msg) => write!(f, "Invalid field: {}", msg),
            LogError::ColumnOutOfRange { id, width } => write!(
                f,
                "Column id {} out of range for a log with {} columns",
                id, width
            ),
            LogError::HeaderMismatch { expected, found } => write!(
                f,
                "Header mismatch: log has [{}], row has [{}]",
                expected.join(","),
                found.join(",")
            ),
            LogError::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::FileAccess(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::FileAccess(err)
    }
}

impl From<csv::Error> for LogError {
    fn from(err: csv::Error) -> Self {
        let line = |pos: &Option<csv::Position>| match pos {
            Some(pos) => format!("line {}: ", pos.line()),
            None => String::new(),
        };

        match err.into_kind() {
            csv::ErrorKind::Io(err) => LogError::FileAccess(err),
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => LogError::Format(format!(
                "{}row has {} fields, header has {}",
                line(&pos),
                len,
                expected_len
            )),
            csv::ErrorKind::Deserialize { pos, err } => {
                LogError::Format(format!("{}non-numeric value ({})", line(&pos), err))
            }
            csv::ErrorKind::Utf8 { pos, err } => {
                LogError::Format(format!("{}invalid UTF-8 ({})", line(&pos), err))
            }
            other => LogError::Format(format!("{:?}", other)),
        }
    }
}
