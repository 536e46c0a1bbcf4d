use crate::scene::{EntityId, LightId};

/// Errors reported by editor operations. None of them are fatal: the
/// application logs them and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no entity is selected")]
    NoTarget,
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    #[error("light {0} does not exist")]
    UnknownLight(LightId),
    #[error("failed to decode texture: {0}")]
    Texture(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
