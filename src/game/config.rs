//! Board configuration, supplied by the host app.
//!
//! Insert a [`BoardConfig`] resource before adding the plugin to override the
//! defaults, or load one from JSON with [`BoardConfig::from_json`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{bubble::LayoutStrategy, error::ConfigError};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<BoardConfig>();
}

/// How shot waypoints are played back before the shot resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    /// Resolve in the same frame the shot is launched (headless simulation).
    #[default]
    Instant,
    /// Wait for one `WaypointReached` message per waypoint.
    Driven,
}

/// Everything needed to build a board.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub bubbles_per_row: i32,
    pub board_height_in_rows: i32,
    pub bubble_radius: f32,
    /// Minimum chain length that pops.
    pub chain_threshold: usize,
    /// Fraction of a bubble diameter at which a neighbor counts as touching.
    pub collide_threshold: f32,
    /// Projectile speed for waypoint playback, in local units per second.
    pub shooting_speed: f32,
    /// Y coordinate dropped bubbles fall to.
    pub drop_to: f32,
    pub drop_speed: f32,
    /// Ray marching gives up after this distance.
    pub max_march_distance: f32,
    /// Wall bounces allowed in a single shot.
    pub max_bounces: u32,
    /// Number of colors in play, taken from the front of `BubbleColor::ALL`.
    pub colors: usize,
    /// Launch point in local space. Defaults to just below the bottom center.
    pub cannon: Option<[f32; 2]>,
    /// RNG seed for layouts and cannon reloads. Unseeded boards use OS entropy.
    pub seed: Option<u64>,
    pub layout: LayoutStrategy,
    pub playback: Playback,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            bubbles_per_row: 6,
            board_height_in_rows: 10,
            bubble_radius: 0.5,
            chain_threshold: 3,
            collide_threshold: 0.95,
            shooting_speed: 3.0,
            drop_to: -5.0,
            drop_speed: 15.0,
            max_march_distance: 1000.0,
            max_bounces: 256,
            colors: 6,
            cannon: None,
            seed: None,
            layout: LayoutStrategy::default(),
            playback: Playback::default(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bubbles_per_row <= 0 {
            return Err(ConfigError::invalid("bubbles_per_row", "must be positive"));
        }
        if self.board_height_in_rows <= 0 {
            return Err(ConfigError::invalid("board_height_in_rows", "must be positive"));
        }
        if !(self.bubble_radius.is_finite() && self.bubble_radius > 0.0) {
            return Err(ConfigError::invalid(
                "bubble_radius",
                format!("must be a positive number, got {}", self.bubble_radius),
            ));
        }
        if !(self.collide_threshold > 0.0 && self.collide_threshold <= 1.0) {
            return Err(ConfigError::invalid(
                "collide_threshold",
                format!("must be in (0, 1], got {}", self.collide_threshold),
            ));
        }
        if self.chain_threshold == 0 {
            return Err(ConfigError::invalid("chain_threshold", "must be at least 1"));
        }
        if !(1..=6).contains(&self.colors) {
            return Err(ConfigError::invalid(
                "colors",
                format!("must be between 1 and 6, got {}", self.colors),
            ));
        }
        if !(self.max_march_distance.is_finite() && self.max_march_distance > 0.0) {
            return Err(ConfigError::invalid("max_march_distance", "must be a positive number"));
        }
        if let Some([x, y]) = self.cannon {
            if !(x.is_finite() && y.is_finite()) {
                return Err(ConfigError::invalid("cannon", "must be finite"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bubble::BubbleColor;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BoardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BoardConfig::from_json(
            r#"{
                "bubbles_per_row": 9,
                "board_height_in_rows": 13,
                "seed": 3,
                "playback": "driven",
                "layout": {"kind": "stripes", "rows": 3, "colors": ["red", "blue", "green"]}
            }"#,
        )
        .unwrap();

        assert_eq!(config.bubbles_per_row, 9);
        assert_eq!(config.board_height_in_rows, 13);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.playback, Playback::Driven);
        assert_eq!(config.chain_threshold, 3);
        assert_eq!(config.collide_threshold, 0.95);
        assert_eq!(
            config.layout,
            LayoutStrategy::Stripes {
                rows: 3,
                colors: vec![BubbleColor::Red, BubbleColor::Blue, BubbleColor::Green]
            }
        );
    }

    #[test]
    fn test_from_json_rejects_bad_threshold() {
        let err = BoardConfig::from_json(r#"{"collide_threshold": 1.5}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "collide_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let err = BoardConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_empty_board() {
        let config = BoardConfig {
            bubbles_per_row: 0,
            ..default()
        };
        assert!(config.validate().is_err());

        let config = BoardConfig {
            colors: 7,
            ..default()
        };
        assert!(config.validate().is_err());
    }
}
