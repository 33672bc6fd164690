use std::thread::ThreadId;

/// Crate-wide result alias.
pub type GraphicsResult<T> = Result<T, GraphicsError>;

/// Errors produced while recording, mutating or replaying canvas instructions.
#[derive(thiserror::Error, Debug)]
pub enum GraphicsError {
    /// A render-context operation was attempted off the owner thread while
    /// main-thread verification is enabled.
    #[error("thread violation: render context is owned by {owner:?}, called from {caller:?}")]
    ThreadViolation {
        /// Thread bound as the owner of the render context.
        owner: ThreadId,
        /// Thread that attempted the operation.
        caller: ThreadId,
    },

    #[error("validation error: {0}")]
    Validation(String),

    /// Framebuffer readback before the first draw (or after a resize).
    #[error("fbo has not been drawn yet")]
    NotDrawn,

    #[error("resource error: {0}")]
    Resource(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GraphicsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Return `true` for [`GraphicsError::ThreadViolation`].
    pub fn is_thread_violation(&self) -> bool {
        matches!(self, Self::ThreadViolation { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
