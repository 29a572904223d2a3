//! Void Combat - Health, Damage, and Death Handling
//!
//! This crate provides character vitality for the Void Engine.
//!
//! # Features
//!
//! - Health controller with clamped health, change/death notifications and
//!   delayed regeneration after non-lethal hits
//! - Damage pipeline mapping raw impacts (e.g. landing speed) to damage
//! - One-shot death reaction (movement, collision, weapons, ragdoll, despawn)
//! - JSON-loadable character configuration
//!
//! # Example
//!
//! ```ignore
//! use void_combat::prelude::*;
//! use void_timer::{world_ref, TimerManager};
//!
//! let timers = Arc::new(TimerManager::new());
//! let config = CharacterConfig::default();
//!
//! let health = HealthController::new(&config.health, world_ref(&timers))?;
//! health.on_health_changed(|e| println!("health: {:.0}", e.health));
//! health.initialize();
//!
//! // Landing at 1050 units/s deals 55 damage, then regeneration kicks in
//! let fall = DamagePipeline::new(config.landing_damage.curve());
//! fall.on_landed(-1050.0, &health);
//! timers.advance(Duration::from_secs(4));
//! ```

pub mod config;
pub mod damage;
pub mod death;
pub mod error;
pub mod health;
pub mod regeneration;
pub mod weapon;

pub mod prelude {
    pub use crate::config::{
        CharacterConfig, HealthConfig, LandingDamageConfig, MIN_HEAL_UPDATE_TIME,
    };
    pub use crate::damage::{
        landing_impact, DamageCause, DamageCurve, DamageEvent, DamagePipeline, Damageable,
        ImpactOutcome,
    };
    pub use crate::death::{CharacterBody, DeathReactionController, Possessor};
    pub use crate::error::{CombatError, Result};
    pub use crate::health::{Death, HealthChanged, HealthController, VitalityState, HEALTH_TOLERANCE};
    pub use crate::regeneration::{RegenerationSchedule, RegenerationTimer};
    pub use crate::weapon::{WeaponControl, WeaponRack};
}

pub use prelude::*;
