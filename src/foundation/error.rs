/// Convenience result type used across sprite4.
pub type RasterResult<T> = Result<T, RasterError>;

/// Top-level error taxonomy used by buffer, codec and compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Open/read/write failure at the file boundary.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad magic, truncated stream or unexpected header tokens.
    #[error("format error: {0}")]
    Format(String),

    /// Pixel storage could not be reserved.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Operation on an unallocated buffer or an invalid ownership state.
    #[error("state error: {0}")]
    State(String),

    /// Clip rectangle outside the destination, bad copy rectangle or coordinates.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Invalid numeric argument (alpha, scale factor, dimensions).
    #[error("parameter error: {0}")]
    Parameter(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`RasterError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`RasterError::State`] value.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Build a [`RasterError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`RasterError::Parameter`] value.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Map a reader error, turning a short read into [`RasterError::Format`].
    pub(crate) fn from_read(err: std::io::Error, what: &str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::Format(format!("truncated stream while reading {what}"))
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
