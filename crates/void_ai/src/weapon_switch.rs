//! Random weapon switching for AI characters

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use void_combat::WeaponControl;

/// The character an AI controller is driving
pub trait ControlledPawn {
    /// The pawn's weapon control, if it has one
    fn weapon(&self) -> Option<Arc<Mutex<dyn WeaponControl>>>;
}

/// One Bernoulli trial with success chance `probability`.
///
/// A non-positive (or NaN) probability returns false without touching `rng`.
pub fn should_switch<R: Rng + ?Sized>(probability: f32, rng: &mut R) -> bool {
    if probability.is_nan() || probability <= 0.0 {
        return false;
    }
    rng.gen::<f32>() <= probability
}

/// Behavior-tree service that sometimes cycles to the next weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeWeaponService {
    /// Chance of switching on each evaluation (0.0 - 1.0)
    probability: f32,
}

impl ChangeWeaponService {
    /// Display name in behavior-tree tooling
    pub const NODE_NAME: &'static str = "Change Weapon";

    /// Create a service; `probability` is clamped into `[0, 1]`
    pub fn new(probability: f32) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability }
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }

    /// Evaluate once. Returns true if the pawn switched weapons.
    ///
    /// Without a pawn or a weapon nothing is drawn from `rng`. `_delta_seconds`
    /// is accepted for the host's tick signature only.
    pub fn tick<R: Rng + ?Sized>(
        &self,
        pawn: Option<&dyn ControlledPawn>,
        _delta_seconds: f32,
        rng: &mut R,
    ) -> bool {
        let Some(weapon) = pawn.and_then(|pawn| pawn.weapon()) else {
            return false;
        };
        if !should_switch(self.probability, rng) {
            return false;
        }

        log::debug!("{}: switching to next weapon", Self::NODE_NAME);
        weapon.lock().next_weapon();
        true
    }
}

impl Default for ChangeWeaponService {
    fn default() -> Self {
        Self::new(0.5)
    }
}
