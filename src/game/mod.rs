//! The bubble shooter simulation.
//!
//! This module contains all the gameplay logic:
//! - Hexagonal grid system (odd-r offset cells, axial and cube coordinates)
//! - Bubble colors and initial layouts
//! - Grid storage and cluster detection
//! - Projectile ray marching with wall bounces
//! - The board state machine and its Bevy messages

pub mod board;
pub mod bubble;
pub mod cluster;
pub mod config;
pub mod error;
pub mod grid;
pub mod hex;
pub mod projectile;
pub mod shot;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((config::plugin, shot::plugin));
}
