//! Error types for the render engine

use thiserror::Error;

use crate::region::PixelRegion;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can end a render call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A tile task faulted while evaluating its region
    #[error("computation failed in {region}: {reason}")]
    ComputationFailure { region: PixelRegion, reason: String },

    /// A tile does not fit the target image
    #[error("{region} does not fit a {width}x{height} image")]
    InvalidRegion {
        region: PixelRegion,
        width: u32,
        height: u32,
    },

    /// Cooperative cancellation, surfaced only when a completion is turned
    /// into a plain `Result`
    #[error("render stopped before completion")]
    Stopped,

    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),
}

impl RenderError {
    pub fn computation(region: PixelRegion, reason: impl ToString) -> Self {
        Self::ComputationFailure {
            region,
            reason: reason.to_string(),
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}
