//! Sword configuration (scene-time, not mutated at runtime)
//!
//! Defaults = референсная сцена (jump 8/12, charge 10/s до 50). Загрузка из TOML:
//!
//! ```toml
//! continuous_mode = false
//!
//! [charge]
//! max_charge_force = 50.0
//! charge_rate = 10.0
//!
//! [input]
//! primary_key = "Space"
//! enable_touch = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::input::InputKey;

/// Полная конфигурация одного меча
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwordConfig {
    /// Continuous mode: stage 2 стартует сам, если input ещё зажат после прыжка.
    /// Classic mode (false): нужен второй tap.
    pub continuous_mode: bool,
    /// Подробные gameplay-логи (jump force, charge, stab)
    pub verbose: bool,
    /// Tag коллайдера меча, на который реагируют stand/floor контакты
    pub contact_tag: String,
    pub input: InputConfig,
    pub charge: ChargeTuning,
    pub body: BodyTuning,
    pub debug: DebugBindings,
}

impl Default for SwordConfig {
    fn default() -> Self {
        Self {
            continuous_mode: true,
            verbose: false,
            contact_tag: "Sword_Stand".to_string(),
            input: InputConfig::default(),
            charge: ChargeTuning::default(),
            body: BodyTuning::default(),
            debug: DebugBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub primary_key: InputKey,
    pub enable_touch: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            primary_key: InputKey::Space,
            enable_touch: true,
        }
    }
}

/// Jump / charge / stab magnitudes and timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeTuning {
    /// Upper clamp of accumulated stab force
    pub max_charge_force: f32,
    /// Force units per second while charging
    pub charge_rate: f32,
    pub jump_vertical_force: f32,
    pub jump_horizontal_force: f32,
    /// Seconds between jump impulse and stage-1 completion
    pub jump_duration: f32,
    /// Degrees per second around local X while charging
    pub rotation_speed: f32,
    /// Charge cap in seconds; reaching it auto-stabs with max force
    pub charge_duration: f32,
    /// Sign of the stab along local Y (-1 = down)
    pub stab_direction: f32,
    /// Seconds between stab impulse and stage-2 completion
    pub post_stab_delay: f32,
    /// Mass while charging ("light" sword)
    pub charged_mass: f32,
    /// Linear drag while charging
    pub charged_drag: f32,
}

impl Default for ChargeTuning {
    fn default() -> Self {
        Self {
            max_charge_force: 50.0,
            charge_rate: 10.0,
            jump_vertical_force: 12.0,
            jump_horizontal_force: 8.0,
            jump_duration: 0.8,
            rotation_speed: 720.0,
            charge_duration: 1.2,
            stab_direction: -1.0,
            post_stab_delay: 0.5,
            charged_mass: 0.01,
            charged_drag: 10.0,
        }
    }
}

/// Baseline body parameters (restored after a stab or on floor parking).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    pub rest_mass: f32,
    pub rest_drag: f32,
    /// Euler angles (degrees, YXZ order) the sword gets when parked
    pub rest_euler_degrees: [f32; 3],
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            rest_mass: 1.0,
            rest_drag: 2.0,
            rest_euler_degrees: [0.0, 90.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugBindings {
    /// Включает debug-клавиши ниже
    pub enabled: bool,
    pub test_stage1_key: InputKey,
    /// Held: stage-2 test, release: stop charging
    pub test_stage2_key: InputKey,
    pub reset_key: InputKey,
}

impl Default for DebugBindings {
    fn default() -> Self {
        Self {
            enabled: false,
            test_stage1_key: InputKey::Q,
            test_stage2_key: InputKey::E,
            reset_key: InputKey::A,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SwordConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SwordConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Rejects values the routines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.charge;

        non_negative("charge.max_charge_force", c.max_charge_force)?;
        non_negative("charge.charge_rate", c.charge_rate)?;
        non_negative("charge.jump_duration", c.jump_duration)?;
        non_negative("charge.charge_duration", c.charge_duration)?;
        non_negative("charge.post_stab_delay", c.post_stab_delay)?;
        positive("charge.charged_mass", c.charged_mass)?;
        non_negative("charge.charged_drag", c.charged_drag)?;
        positive("body.rest_mass", self.body.rest_mass)?;
        non_negative("body.rest_drag", self.body.rest_drag)?;

        if c.stab_direction == 0.0 || !c.stab_direction.is_finite() {
            return Err(ConfigError::Invalid {
                field: "charge.stab_direction",
                reason: format!("must be a non-zero sign, got {}", c.stab_direction),
            });
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be >= 0, got {}", value),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be > 0, got {}", value),
        })
    }
}
