use crate::host::SceneId;

/// Reasons a preview operation did not take effect.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("no subject was provided for the preview scene")]
    MissingSubject,
    #[error("user declined to save modified scenes")]
    SaveDeclined,
    #[error("{scene} has no preview stage object named '{stage}'")]
    MissingStage { scene: SceneId, stage: String },
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PreviewError>;
