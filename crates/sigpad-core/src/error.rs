//! Error type shared by every sigpad operation.

/// Failures surfaced by the signature pad controller and its collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PadError {
    /// `clear` / `save` called before a drawing-engine binding exists.
    #[error("signature pad is not bound to a surface")]
    Unbound,

    /// Native failure reported by the drawing engine (bad export format,
    /// undecodable import payload, construction failure).
    #[error("drawing engine error: {0}")]
    Engine(String),

    /// Malformed caller configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The controller was re-entered while already mid-operation.
    #[error("signature pad is busy")]
    Busy,
}

pub type Result<T> = std::result::Result<T, PadError>;
