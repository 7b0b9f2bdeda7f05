/// Result type used across gifhub.
pub type GifhubResult<T> = Result<T, GifhubError>;

/// Top-level error taxonomy of a run.
#[derive(thiserror::Error, Debug)]
pub enum GifhubError {
    /// Transport failure or a non-200 response.
    #[error("network error: {0}")]
    Network(String),

    /// A required anchor token is missing from fetched text.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// A metric value is not a percentage in `0..=100`.
    #[error("parse error: value '{value}' for '{label}' is not a percentage")]
    Parse { label: String, value: String },

    /// SVG emission or rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid bundle options, unusable frames, or encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// A stage produced nothing; `stage` names it.
    #[error("empty result: stage '{stage}' produced no items")]
    EmptyResult { stage: &'static str },

    /// Invalid user-provided input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Byte-token extraction failures.
///
/// Anchors are reported lossily decoded so that the message names the token that was searched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("could not find left anchor '{0}'")]
    LeftAnchorNotFound(String),

    #[error("could not find right anchor '{0}'")]
    RightAnchorNotFound(String),

    #[error("left anchor '{0}' ends past the end of the buffer")]
    OffsetOutOfRange(String),
}

impl ExtractError {
    pub(crate) fn left_not_found(anchor: &[u8]) -> Self {
        Self::LeftAnchorNotFound(String::from_utf8_lossy(anchor).into_owned())
    }

    pub(crate) fn right_not_found(anchor: &[u8]) -> Self {
        Self::RightAnchorNotFound(String::from_utf8_lossy(anchor).into_owned())
    }

    pub(crate) fn out_of_range(anchor: &[u8]) -> Self {
        Self::OffsetOutOfRange(String::from_utf8_lossy(anchor).into_owned())
    }
}

impl GifhubError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(label: &[u8], value: &[u8]) -> Self {
        Self::Parse {
            label: String::from_utf8_lossy(label).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn empty(stage: &'static str) -> Self {
        Self::EmptyResult { stage }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
