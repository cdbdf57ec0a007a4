//! Error types for shot requests, playback and board configuration.

use thiserror::Error;

/// Why a shot request was refused. Refused shots never touch the board.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ShotRejected {
    /// Another shot is still in flight or resolving
    #[error("a shot is already in flight")]
    Busy,

    /// The stack overflowed the board; the grid is frozen
    #[error("the game is over")]
    GameOver,

    /// A bubble reached the ceiling row; the grid is frozen
    #[error("the board has already been won")]
    GameWon,

    #[error("shot direction has zero length")]
    ZeroDirection,

    /// Shots must aim upward
    #[error("shot direction must aim upward, got y = {y}")]
    NotUpward { y: f32 },

    #[error("shot direction is not finite")]
    NonFinite,
}

/// Misuse of the resumable shot API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no shot is in flight")]
    NoShotInFlight,

    /// `resolve` was called before every waypoint was played back
    #[error("{remaining} waypoint(s) still to play back")]
    PlaybackIncomplete { remaining: usize },
}

/// Board configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse board config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid board config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
