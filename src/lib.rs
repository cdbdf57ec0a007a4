//! Headless hex-grid bubble shooter core.
//!
//! Add [`plugin`] to a Bevy app, send [`RequestShot`] messages and listen for
//! the outcome messages. [`Board`] can also be driven directly without an app.

pub mod game;

use bevy::prelude::*;

pub use game::{
    board::{
        Board, BoardBorders, BubbleAt, DroppedBubble, GameSignal, ShotFlight, ShotOutcome,
        ShotPhase,
    },
    bubble::{BubbleColor, LayoutStrategy, SeedBubble},
    config::{BoardConfig, Playback},
    error::{ConfigError, PlaybackError, ShotRejected},
    grid::{BubbleGrid, GridBounds, GridCell},
    hex::{GridPos, HexLayout},
    projectile::{FlightEnding, Trajectory},
    shot::{
        BubblePlaced, ClusterPopped, FloatingBubblesDropped, GameLost, GameWon, RequestShot,
        ResetBoard, ShotDenied, ShotLaunched, ShotResolved, ShotSystems, WaypointReached,
    },
};

pub fn plugin(app: &mut App) {
    app.add_plugins(game::plugin);
}
