use thiserror::Error;

/// All errors produced by verbatim-core.
#[derive(Debug, Error)]
pub enum VerbatimError {
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("feature width mismatch: extractor produces {extractor}, model expects {model}")]
    FeatureWidthMismatch { extractor: usize, model: usize },

    #[error("inference error: {0}")]
    Inference(String),

    #[error("decoder returned no candidates for {frames} frames")]
    EmptyDecode { frames: usize },

    #[error("logit buffer of length {len} is not a whole number of {class_count}-class frames")]
    MalformedLogits { len: usize, class_count: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VerbatimError>;
