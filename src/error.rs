//! Error types for kvolve

use std::time::Duration;

use thiserror::Error;

use crate::network::source::{NodeId, SourceRef};

/// kvolve error type
#[derive(Debug, Error)]
pub enum KvolveError {
    /// A node was committed without a pending value.
    #[error("node {node} has no pending value; call compute() before update()")]
    InvalidState { node: NodeId },

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A connection points at a missing source or at a node that is not
    /// evaluated strictly before its owner.
    #[error("node at position {node} references {reference:?}, which is not an earlier source")]
    ForwardReference { node: usize, reference: SourceRef },

    /// The exported graph text is not well formed.
    #[error("malformed graph text: {0}")]
    MalformedGraph(String),

    /// The external renderer could not be launched.
    #[error("renderer `{program}` is not available")]
    RenderUnavailable { program: String },

    /// The external renderer ran but never produced an image.
    #[error("renderer produced no image after {attempts} attempt(s)")]
    RenderFailed { attempts: usize },

    /// The last render attempt did not finish in time.
    #[error("renderer did not finish within {timeout:?}")]
    RenderTimeout { timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, KvolveError>;
