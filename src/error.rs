use thiserror::Error;

/// Errors for the genuinely fallible edges of the drawing core.
///
/// Most degraded inputs (malformed colour tokens, unknown stamp names,
/// undo on an empty history) are soft no-ops and never surface here.
#[derive(Debug, Error)]
pub enum DoodleError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("not a PNG data URL")]
    InvalidDataUrl,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
