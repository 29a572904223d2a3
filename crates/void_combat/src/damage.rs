//! Damage events and the impact-to-damage pipeline

use crate::health::HealthController;
use serde::{Deserialize, Serialize};

/// What caused a damage event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCause {
    /// Hitting the ground too fast
    Fall,
    /// Shots, melee and explosions from a weapon
    Weapon,
    /// Hazards placed in the level
    Environment,
    /// Damage dealt by game logic
    Scripted,
}

impl Default for DamageCause {
    fn default() -> Self {
        Self::Fall
    }
}

/// A raw damage-causing event, before it is turned into a damage amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Entity responsible for the event (if any)
    pub instigator: Option<u64>,
    /// Kind of event
    pub cause: DamageCause,
    /// Impact magnitude, e.g. downward speed at landing
    pub magnitude: f32,
}

impl DamageEvent {
    /// Create a new event with no instigator
    pub fn new(cause: DamageCause, magnitude: f32) -> Self {
        Self {
            instigator: None,
            cause,
            magnitude,
        }
    }

    /// Landing with the given vertical velocity (negative is downwards)
    pub fn landing(vertical_velocity: f32) -> Self {
        Self::new(DamageCause::Fall, landing_impact(vertical_velocity))
    }

    /// Set the instigating entity
    pub fn with_instigator(mut self, entity: u64) -> Self {
        self.instigator = Some(entity);
        self
    }
}

/// Downward speed at landing for a vertical velocity
pub fn landing_impact(vertical_velocity: f32) -> f32 {
    -vertical_velocity
}

/// Anything that accepts a damage amount
pub trait Damageable {
    fn apply_damage(&self, amount: f32);
}

impl Damageable for HealthController {
    fn apply_damage(&self, amount: f32) {
        HealthController::apply_damage(self, amount);
    }
}

/// Clamped linear mapping from an impact magnitude to a damage amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageCurve {
    pub input_range: (f32, f32),
    pub output_range: (f32, f32),
}

impl DamageCurve {
    pub fn new(input_range: (f32, f32), output_range: (f32, f32)) -> Self {
        Self {
            input_range,
            output_range,
        }
    }

    /// Check if `magnitude` is under the curve's input floor
    pub fn is_below_floor(&self, magnitude: f32) -> bool {
        magnitude < self.input_range.0
    }

    /// Map `value` from the input range onto the output range, clamping to
    /// the ends. A zero-width input range acts as a step at its value.
    pub fn map_clamped(&self, value: f32) -> f32 {
        let (in_min, in_max) = self.input_range;
        let (out_min, out_max) = self.output_range;

        let divisor = in_max - in_min;
        let pct = if divisor == 0.0 {
            if value >= in_max {
                1.0
            } else {
                0.0
            }
        } else {
            ((value - in_min) / divisor).clamp(0.0, 1.0)
        };

        out_min + (out_max - out_min) * pct
    }
}

/// What the pipeline did with an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactOutcome {
    /// Magnitude under the curve floor; the target was never called
    BelowFloor,
    /// The target was called with this amount
    Applied { damage: f32 },
}

impl ImpactOutcome {
    pub fn damage(&self) -> Option<f32> {
        match self {
            Self::BelowFloor => None,
            Self::Applied { damage } => Some(*damage),
        }
    }
}

/// Converts raw impact events into damage. Holds no per-event state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamagePipeline {
    curve: DamageCurve,
}

impl DamagePipeline {
    pub fn new(curve: DamageCurve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &DamageCurve {
        &self.curve
    }

    /// Turn `event` into damage on `target`.
    ///
    /// Events under the curve floor are dropped without calling `target`.
    pub fn process<T: Damageable + ?Sized>(&self, event: &DamageEvent, target: &T) -> ImpactOutcome {
        log::debug!(
            "{:?} impact of {} from {:?}",
            event.cause,
            event.magnitude,
            event.instigator
        );

        if self.curve.is_below_floor(event.magnitude) {
            return ImpactOutcome::BelowFloor;
        }

        let damage = self.curve.map_clamped(event.magnitude);
        log::debug!("Final damage: {}", damage);
        target.apply_damage(damage);
        ImpactOutcome::Applied { damage }
    }

    /// Landing handler: fall damage from the vertical velocity at touchdown
    pub fn on_landed<T: Damageable + ?Sized>(&self, vertical_velocity: f32, target: &T) -> ImpactOutcome {
        self.process(&DamageEvent::landing(vertical_velocity), target)
    }
}
