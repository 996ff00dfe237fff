use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, Position};

/// Errors raised when a movement command or restored movement is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    #[error("actor {actor} is not on the grid")]
    UnknownActor { actor: ActorId },

    #[error("actor {actor} is already on the grid")]
    ActorAlreadyPresent { actor: ActorId },

    #[error("path for actor {actor} has no cells to traverse")]
    EmptyPath { actor: ActorId },

    #[error("path for actor {actor} jumps from {from} to {to} at step {index}")]
    DisconnectedPath {
        actor: ActorId,
        index: usize,
        from: Position,
        to: Position,
    },
}

impl GameError for MovementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownActor { .. } => ErrorSeverity::Recoverable,
            Self::ActorAlreadyPresent { .. }
            | Self::EmptyPath { .. }
            | Self::DisconnectedPath { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActor { .. } => "MOVE_UNKNOWN_ACTOR",
            Self::ActorAlreadyPresent { .. } => "MOVE_ACTOR_ALREADY_PRESENT",
            Self::EmptyPath { .. } => "MOVE_EMPTY_PATH",
            Self::DisconnectedPath { .. } => "MOVE_DISCONNECTED_PATH",
        }
    }
}
