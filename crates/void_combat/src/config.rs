//! Combat configuration

use crate::damage::DamageCurve;
use crate::error::{CombatError, Result};
use crate::regeneration::RegenerationSchedule;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest accepted regeneration interval, in seconds
pub const MIN_HEAL_UPDATE_TIME: f32 = 0.01;

/// Health configuration for a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Maximum (and starting) health
    pub max_health: f32,

    /// Regenerate after non-lethal damage
    pub auto_heal: bool,

    /// Seconds between regeneration ticks
    pub heal_update_time: f32,

    /// Seconds after the last hit before the first regeneration tick
    pub heal_delay: f32,

    /// Health restored per regeneration tick
    pub heal_modifier: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            auto_heal: true,
            heal_update_time: 1.0,
            heal_delay: 3.0,
            heal_modifier: 5.0,
        }
    }
}

impl HealthConfig {
    /// Configuration without regeneration
    pub fn without_regeneration(max_health: f32) -> Self {
        Self {
            max_health,
            auto_heal: false,
            ..Default::default()
        }
    }

    /// Check that a controller can be built from this configuration
    pub fn validate(&self) -> Result<()> {
        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "max health must be more than 0, got {}",
                self.max_health
            )));
        }
        validate_seconds("heal_update_time", self.heal_update_time)?;
        validate_seconds("heal_delay", self.heal_delay)?;
        if !self.heal_modifier.is_finite() || self.heal_modifier < 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "heal_modifier must be a non-negative number, got {}",
                self.heal_modifier
            )));
        }
        if !self.auto_heal {
            return Ok(());
        }
        if self.heal_update_time < MIN_HEAL_UPDATE_TIME {
            return Err(CombatError::InvalidConfig(format!(
                "heal_update_time must be at least {} when auto_heal is enabled, got {}",
                MIN_HEAL_UPDATE_TIME, self.heal_update_time
            )));
        }
        if self.heal_modifier == 0.0 {
            return Err(CombatError::InvalidConfig(
                "heal_modifier must be more than 0 when auto_heal is enabled".into(),
            ));
        }
        Ok(())
    }

    /// Regeneration timing derived from this configuration.
    ///
    /// Call [`HealthConfig::validate`] first; invalid durations collapse to zero.
    pub fn regeneration_schedule(&self) -> RegenerationSchedule {
        RegenerationSchedule {
            heal_amount_per_tick: self.heal_modifier,
            tick_interval: seconds(self.heal_update_time),
            initial_delay: seconds(self.heal_delay),
        }
    }
}

/// Fall damage applied when landing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingDamageConfig {
    /// Downward landing speed range; below the first value nothing happens
    pub velocity_range: [f32; 2],

    /// Damage at each end of the velocity range
    pub damage_range: [f32; 2],
}

impl Default for LandingDamageConfig {
    fn default() -> Self {
        Self {
            velocity_range: [900.0, 1200.0],
            damage_range: [10.0, 100.0],
        }
    }
}

impl LandingDamageConfig {
    /// Check both ranges are finite and ordered
    pub fn validate(&self) -> Result<()> {
        validate_range("velocity_range", self.velocity_range)?;
        validate_range("damage_range", self.damage_range)
    }

    /// The clamped mapping described by this configuration
    pub fn curve(&self) -> DamageCurve {
        DamageCurve::new(
            (self.velocity_range[0], self.velocity_range[1]),
            (self.damage_range[0], self.damage_range[1]),
        )
    }
}

/// Everything needed to set up a playable character's vitality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub health: HealthConfig,
    pub landing_damage: LandingDamageConfig,

    /// Seconds a dead character stays in the world (0 = forever)
    pub life_span_on_death: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            health: HealthConfig::default(),
            landing_damage: LandingDamageConfig::default(),
            life_span_on_death: 5.0,
        }
    }
}

impl CharacterConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.health.validate()?;
        self.landing_damage.validate()?;
        validate_seconds("life_span_on_death", self.life_span_on_death)
    }

    /// Despawn delay after death
    pub fn life_span(&self) -> Duration {
        seconds(self.life_span_on_death)
    }
}

fn validate_seconds(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CombatError::InvalidConfig(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_range(name: &str, range: [f32; 2]) -> Result<()> {
    let [min, max] = range;
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(CombatError::InvalidConfig(format!(
            "{} must be an ordered pair of numbers, got [{}, {}]",
            name, min, max
        )));
    }
    Ok(())
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or_default()
}
