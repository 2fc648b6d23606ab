use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::Player;

/// Errors raised while loading a table configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse table config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid table config: {0}")]
    Invalid(String),
}

/// Table, ball and stepping parameters.
/// All lengths are meters, masses kilograms, impulses newton-seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Playing surface length along X (default: 2.24).
    pub table_width: f32,
    /// Playing surface width along Y (default: 1.12).
    pub table_height: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    /// Number of object balls racked at game start (default: 15).
    pub object_balls: u32,
    /// Size of the first (widest) rack row (default: 5).
    pub rack_first_row: u32,
    pub pocket_radius: f32,
    pub cushion_thickness: f32,
    pub ball_restitution: f32,
    pub cushion_restitution: f32,
    pub friction: f32,
    /// Velocity decay standing in for felt friction.
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Aggregate kinetic energy (J) separating rest from motion.
    pub rest_threshold: f32,
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Cap on fixed steps per tick to prevent a spiral of death (default: 10).
    pub max_steps_per_tick: u32,
    pub min_shot_impulse: f32,
    pub max_shot_impulse: f32,
    /// Seed for the rack shuffle. `None` seeds from entropy.
    pub rack_seed: Option<u64>,
    pub player_names: [String; 2],
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_width: 2.24,
            table_height: 1.12,
            ball_radius: 0.0286,
            ball_mass: 0.17,
            object_balls: 15,
            rack_first_row: 5,
            pocket_radius: 0.06,
            cushion_thickness: 0.05,
            ball_restitution: 0.95,
            cushion_restitution: 0.8,
            friction: 0.2,
            linear_damping: 0.6,
            angular_damping: 1.0,
            rest_threshold: 1.0e-5,
            fixed_dt: 1.0 / 60.0,
            max_steps_per_tick: 10,
            min_shot_impulse: 0.005,
            max_shot_impulse: 1.7,
            rack_seed: None,
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
        }
    }
}

impl TableConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("table_width", self.table_width),
            ("table_height", self.table_height),
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("pocket_radius", self.pocket_radius),
            ("cushion_thickness", self.cushion_thickness),
            ("rest_threshold", self.rest_threshold),
            ("fixed_dt", self.fixed_dt),
            ("max_shot_impulse", self.max_shot_impulse),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.object_balls == 0 {
            return Err(ConfigError::Invalid("object_balls must be at least 1".into()));
        }
        if self.rack_first_row == 0 {
            return Err(ConfigError::Invalid("rack_first_row must be at least 1".into()));
        }
        if self.max_steps_per_tick == 0 {
            return Err(ConfigError::Invalid("max_steps_per_tick must be at least 1".into()));
        }
        if !(self.min_shot_impulse >= 0.0) || self.min_shot_impulse > self.max_shot_impulse {
            return Err(ConfigError::Invalid(format!(
                "min_shot_impulse ({}) must be within [0, max_shot_impulse ({})]",
                self.min_shot_impulse, self.max_shot_impulse
            )));
        }
        let [one, two] = &self.player_names;
        if one.trim().is_empty() || two.trim().is_empty() || one == two {
            return Err(ConfigError::Invalid(
                "player names must be non-empty and distinct".into(),
            ));
        }
        Ok(())
    }

    pub fn ball_diameter(&self) -> f32 {
        self.ball_radius * 2.0
    }

    /// Default cue ball spot: a quarter length right of center.
    pub fn cue_spot(&self) -> Vec2 {
        Vec2::new(self.table_width * 0.25, 0.0)
    }

    /// First rack slot. Rows advance toward +X, so the narrow end of the
    /// triangle faces the cue spot.
    pub fn rack_origin(&self) -> Vec2 {
        let r = self.ball_radius;
        let spread = (self.rack_first_row.saturating_sub(1)) as f32 * r;
        Vec2::new(-self.table_width * 0.25 - r, -spread)
    }

    /// Centers of the six pockets: four corners then the two side pockets.
    pub fn pocket_centers(&self) -> [Vec2; 6] {
        let hw = self.table_width / 2.0;
        let hh = self.table_height / 2.0;
        [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(-hw, hh),
            Vec2::new(hw, hh),
            Vec2::new(0.0, -hh),
            Vec2::new(0.0, hh),
        ]
    }

    pub fn player_name(&self, player: Player) -> &str {
        &self.player_names[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_json_fills_defaults() {
        let config = TableConfig::from_json(r#"{ "object_balls": 10, "rack_seed": 7 }"#).unwrap();
        assert_eq!(config.object_balls, 10);
        assert_eq!(config.rack_seed, Some(7));
        assert!((config.ball_radius - 0.0286).abs() < 1e-6);
        assert_eq!(config.player_name(Player::Two), "Player 2");
    }

    #[test]
    fn rejects_inverted_impulse_range() {
        let err = TableConfig::from_json(r#"{ "min_shot_impulse": 5.0, "max_shot_impulse": 1.0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_player_names() {
        let err = TableConfig::from_json(r#"{ "player_names": ["Ann", "Ann"] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = TableConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rack_origin_centers_first_row() {
        let config = TableConfig::default();
        let origin = config.rack_origin();
        let r = config.ball_radius;
        assert!((origin.x - (-config.table_width * 0.25 - r)).abs() < 1e-6);
        assert!((origin.y - (-4.0 * r)).abs() < 1e-6);
        // Last ball of the first row mirrors the first across the center line.
        let last_y = origin.y + 4.0 * config.ball_diameter();
        assert!((last_y + origin.y).abs() < 1e-6);
    }
}
