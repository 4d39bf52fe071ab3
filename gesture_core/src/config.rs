//! Controller configuration, loadable from YAML.
//!
//! Every field has a default, so an empty document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::KeyBindings;
use crate::classifier::PolicyKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Which classifier to run.
    pub policy: PolicyKind,
    /// Minimum seconds between two dispatched actions.
    pub cooldown_seconds: f64,
    /// Centroid travel (pixels) needed for a swipe.
    pub movement_threshold_px: f32,
    /// Centroid samples kept by the motion policy.
    pub history_window_size: usize,
    /// Hands classified per frame, in detection order.
    pub max_hands: usize,
    /// Frame size used to turn normalized landmarks into pixels.
    pub frame_width: u32,
    pub frame_height: u32,
    /// Hands reported below this confidence are ignored.
    pub min_detection_confidence: f32,
    /// Flip landmarks horizontally before classification.
    pub mirror_input: bool,
    /// Overrides the policy's default key table.
    pub bindings: Option<KeyBindings>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            policy:                   PolicyKind::Static,
            cooldown_seconds:         0.3,
            movement_threshold_px:    35.0,
            history_window_size:      4,
            max_hands:                1,
            frame_width:              640,
            frame_height:             480,
            min_detection_confidence: 0.7,
            mirror_input:             false,
            bindings:                 None,
        }
    }
}

impl ControlConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ControlConfig = if yaml.trim().is_empty() {
            ControlConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cooldown_seconds.is_finite() || self.cooldown_seconds < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cooldown_seconds must be a non-negative number, got {}",
                self.cooldown_seconds
            )));
        }
        if !self.movement_threshold_px.is_finite() || self.movement_threshold_px < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "movement_threshold_px must be a non-negative number, got {}",
                self.movement_threshold_px
            )));
        }
        if self.history_window_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "history_window_size must be at least 2, got {}",
                self.history_window_size
            )));
        }
        if self.max_hands == 0 {
            return Err(ConfigError::Invalid("max_hands must be at least 1".into()));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size must be non-zero, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_detection_confidence must be in 0..=1, got {}",
                self.min_detection_confidence
            )));
        }
        Ok(())
    }

    /// The key table in effect: the override if present, else the policy default.
    pub fn key_bindings(&self) -> KeyBindings {
        self.bindings.unwrap_or_else(|| KeyBindings::for_policy(self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Key};

    #[test]
    fn defaults() {
        let c = ControlConfig::default();
        assert_eq!(c.policy, PolicyKind::Static);
        assert_eq!(c.cooldown_seconds, 0.3);
        assert_eq!(c.movement_threshold_px, 35.0);
        assert_eq!(c.history_window_size, 4);
        assert_eq!(c.max_hands, 1);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(ControlConfig::from_yaml("").unwrap(), ControlConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let c = ControlConfig::from_yaml("policy: motion\ncooldown_seconds: 0.25\n").unwrap();
        assert_eq!(c.policy, PolicyKind::Motion);
        assert_eq!(c.cooldown_seconds, 0.25);
        assert_eq!(c.history_window_size, 4);
        assert_eq!(c.key_bindings().key_for(Action::Hoverboard), Some(Key::Space));
    }

    #[test]
    fn bindings_override() {
        let yaml = "\
bindings:
  move_left: left
  move_right: right
  jump: space
  slide: down
  hoverboard: down
";
        let c = ControlConfig::from_yaml(yaml).unwrap();
        assert_eq!(c.key_bindings().key_for(Action::Jump), Some(Key::Space));
    }

    #[test]
    fn rejects_tiny_window() {
        let err = ControlConfig::from_yaml("history_window_size: 1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_cooldown() {
        assert!(ControlConfig::from_yaml("cooldown_seconds: -1.0").is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(matches!(
            ControlConfig::from_yaml("policy: dance"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ControlConfig::load("/nonexistent/surfer.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
