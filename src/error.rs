/// Errors raised by the detector, the note and color mappers and the audio sources.
///
/// A quiet or aperiodic window is not an error: it produces
/// [`PitchEstimate::NotDetected`](crate::PitchEstimate::NotDetected).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller passed a value outside the domain of the operation.
    #[error("invalid input `{name}`: got {value}, {reason}")]
    InvalidInput {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A window does not have the length the detector was built for.
    #[error("window size mismatch: expected {expected} samples, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    /// WAV decoding errors.
    #[error(transparent)]
    Wav(#[from] hound::Error),

    /// Malformed configuration file.
    #[error(transparent)]
    Config(#[from] toml::de::Error),

    /// File I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Error::InvalidInput {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Convenience Result type for pitchdetect operations.
pub type Result<T> = std::result::Result<T, Error>;
