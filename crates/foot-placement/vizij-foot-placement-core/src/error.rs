use thiserror::Error;

/// Errors produced while building a foot placement rig.
///
/// All of them are fatal to the feature: the caller is expected to leave the
/// component disabled. Per-frame stepping has no error surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("foot placement requires at least one leg")]
    NoLegs,
    #[error("foot placement is missing the hips handle")]
    MissingHips,
    #[error("leg {leg} is missing its IK target handle")]
    MissingTarget { leg: usize },
    #[error("leg {leg} is missing its IK hint handle")]
    MissingHint { leg: usize },
    #[error("invalid foot placement config: {0}")]
    InvalidConfig(String),
}

pub type SetupResult<T> = Result<T, SetupError>;
