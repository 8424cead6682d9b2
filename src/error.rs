//! Crate-wide error type.

/// Errors produced by corpus parsing, template lookup, attribution
/// bridging, and dataset persistence.
#[derive(Debug, thiserror::Error)]
pub enum RationaleError {
    /// An analogy section could not be paired up.
    #[error("malformed corpus: {0}")]
    MalformedCorpus(String),

    /// No narrative template is registered for the category.
    #[error("no template registered for analogy category `{0}`")]
    UnknownCategory(String),

    /// The attribution collaborator failed or returned unusable scores.
    #[error("attribution failure: {0}")]
    AttributionFailure(String),

    /// Decoding token ids to text and re-encoding did not recover the
    /// original ids, so attribution output cannot be aligned back to
    /// input positions.
    #[error("token round-trip mismatch: {0}")]
    RoundTripMismatch(String),

    /// A dataset file was not produced by the matching `save`, or was
    /// produced by an incompatible version.
    #[error("serialization mismatch: {0}")]
    SerializationMismatch(String),

    /// Input tensors with inconsistent batch or sequence dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Tokenizer encode/decode error.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error(transparent)]
    Tensor(#[from] candle_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RationaleError {
    /// Wrap a `tokenizers` error (which is a boxed trait object).
    pub fn tokenizer(err: impl std::fmt::Display) -> Self {
        Self::Tokenizer(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RationaleError>;
