use std::fmt;
use std::path::PathBuf;

/// Top-level error type for the splicewave public API.
///
/// Every variant is locally recoverable: the operator picks another file,
/// fills in a field, or confirms an overwrite. Nothing here terminates the
/// process.
#[derive(Debug)]
pub enum SpliceError {
    /// The source file could not be parsed as audio.
    Decode(String),
    /// Save was requested with no selection built.
    NoSelection,
    /// Save was requested before an output folder was chosen.
    NoOutputFolder,
    /// The output filename was empty after trimming.
    EmptyFilename,
    /// The target path exists and overwrite was not confirmed.
    FileExists(PathBuf),
    /// Write failure (disk full, permissions).
    Io(std::io::Error),
}

impl fmt::Display for SpliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceError::Decode(msg) => write!(f, "decode error: {}", msg),
            SpliceError::NoSelection => write!(f, "no selection to save"),
            SpliceError::NoOutputFolder => write!(f, "no output folder selected"),
            SpliceError::EmptyFilename => write!(f, "output filename is empty"),
            SpliceError::FileExists(path) => {
                write!(f, "file already exists: {}", path.display())
            }
            SpliceError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for SpliceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpliceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpliceError {
    fn from(err: std::io::Error) -> Self {
        SpliceError::Io(err)
    }
}

impl From<hound::Error> for SpliceError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => SpliceError::Io(io),
            other => SpliceError::Io(std::io::Error::other(other)),
        }
    }
}

/// Convenience alias so callers can write `Result<T>` instead of `Result<T, SpliceError>`.
pub type Result<T> = std::result::Result<T, SpliceError>;
