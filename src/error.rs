use thiserror::Error;

/// Reason a requested move was rejected by validation.
///
/// Validation runs over the whole selection against the pre-move tree, so a
/// single rejection fails the entire batch before anything is relocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    /// The target folder is part of the selection itself.
    #[error("cannot move '{0}' into itself")]
    SelfTarget(String),

    /// The target folder lies inside the subtree of a selected folder.
    #[error("cannot move '{0}' into its own subtree")]
    CyclicMove(String),

    /// The target id does not resolve to root or an existing folder.
    #[error("target folder '{0}' not found")]
    TargetNotFound(String),
}

/// Errors surfaced by the bookmark core.
///
/// Validation errors are recoverable: the operation is rejected and the tree
/// is left exactly as it was.
#[derive(Debug, Error)]
pub enum Error {
    #[error("folder name cannot be empty")]
    EmptyName,

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("item '{0}' not found")]
    NotFound(String),

    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveRejection),

    #[error("malformed bookmark document: {0}")]
    ParseFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;
