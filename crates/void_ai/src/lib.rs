//! Void AI - Decision Services
//!
//! Periodically evaluated decisions for AI-controlled characters. Services
//! carry no per-tick state; the host (a behavior tree or any other scheduler)
//! calls them once per evaluation.
//!
//! # Features
//!
//! - Probabilistic weapon switching
//!
//! # Example
//!
//! ```ignore
//! use void_ai::prelude::*;
//!
//! let service = ChangeWeaponService::new(0.2);
//! let mut rng = rand::thread_rng();
//!
//! // once per behavior-tree service tick
//! service.tick(Some(&pawn), delta_seconds, &mut rng);
//! ```

pub mod weapon_switch;

pub mod prelude {
    pub use crate::weapon_switch::{should_switch, ChangeWeaponService, ControlledPawn};
}

pub use prelude::*;
