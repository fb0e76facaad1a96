//! Error type for the flyout engine
//!
//! Geometry never fails: bad inputs degrade to zero or clamped positions.
//! The variants here cover programming errors at the API boundary.

use thiserror::Error;

use crate::host::AnchorId;
use crate::surface::SurfaceId;

#[derive(Debug, Error)]
pub enum FlyoutError {
    /// The handle was not created by this context, or was torn down
    #[error("unknown surface {0}")]
    UnknownSurface(SurfaceId),

    /// An interactive handler needed the anchor's rectangle and the host had none
    #[error("anchor `{0}` has no bounding rectangle")]
    MissingAnchorRect(AnchorId),

    #[error("unknown placement `{0}`")]
    UnknownPlacement(String),

    #[error("invalid flyout configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FlyoutError>;
