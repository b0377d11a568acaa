use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Non-power-of-two matrix size, non-square sequence length, zero-sized
    /// block, or mismatched buffer shapes.
    InvalidDimension(String),
    /// Row extraction before the Hadamard cache covers the requested length.
    Uninitialized { requested: usize, cached: usize },
    /// A pattern or source buffer does not fit on the target canvas.
    OutOfBounds(String),
    /// Wavefront-correction file with the wrong number of values or a bad line.
    ConfigFileCorrupt { line: Option<usize>, message: String },
    Io(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension(msg) => write!(f, "invalid dimension: {msg}"),
            Self::Uninitialized { requested, cached } => write!(
                f,
                "hadamard cache not initialized for length {requested} (cached size {cached})"
            ),
            Self::OutOfBounds(msg) => write!(f, "out of bounds: {msg}"),
            Self::ConfigFileCorrupt {
                line: Some(line),
                message,
            } => write!(f, "corrupt config file at line {line}: {message}"),
            Self::ConfigFileCorrupt {
                line: None,
                message,
            } => write!(f, "corrupt config file: {message}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for PatternError {}

impl From<std::io::Error> for PatternError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;
