/// Error types that can occur during tensor and model operations
///
/// # Variants
///
/// - `ShapeError` - rank or dimension mismatch, incompatible broadcasting, or a value count that does not match a shape
/// - `IndexError` - a multi-index lies outside the extent of at least one axis
/// - `ArgumentError` - unknown selector, missing or invalid construction parameter, invalid batch size
/// - `NumericError` - NaN or infinite gradients and updates, invalid denominators, division by zero
/// - `ProcessingError` - a layer was driven out of order (e.g. backward before forward)
/// - `TrainingAborted` - a training run stopped part-way; carries where it stopped and why
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    ShapeError(String),
    IndexError(String),
    ArgumentError(String),
    NumericError(String),
    ProcessingError(String),
    TrainingAborted {
        epoch: usize,
        batch: usize,
        cause: Box<ModelError>,
    },
}

impl ModelError {
    /// Returns the error that ultimately caused this one.
    ///
    /// For `TrainingAborted` this unwraps the recorded cause, for every other variant it
    /// returns `self`.
    pub fn root_cause(&self) -> &ModelError {
        match self {
            ModelError::TrainingAborted { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ShapeError(msg) => write!(f, "Shape error: {}", msg),
            ModelError::IndexError(msg) => write!(f, "Index error: {}", msg),
            ModelError::ArgumentError(msg) => write!(f, "Argument error: {}", msg),
            ModelError::NumericError(msg) => write!(f, "Numeric error: {}", msg),
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            ModelError::TrainingAborted {
                epoch,
                batch,
                cause,
            } => write!(
                f,
                "Training aborted at epoch {}, batch {}: {}",
                epoch, batch, cause
            ),
        }
    }
}

/// Implements the standard error trait for ModelError
impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::TrainingAborted { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// Input/Output error types that can occur while loading samples from disk
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (opening, reading)
/// - `ParseError` - A line of the input could not be turned into a sample
/// - `Model` - The parsed values could not be assembled into tensors
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    ParseError { line: usize, message: String },
    Model(ModelError),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::ParseError { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            IoError::Model(e) => write!(f, "Model error: {}", e),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIoError(e) => Some(e),
            IoError::Model(e) => Some(e),
            IoError::ParseError { .. } => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::StdIoError(e)
    }
}

impl From<ModelError> for IoError {
    fn from(e: ModelError) -> Self {
        IoError::Model(e)
    }
}
