//! Health state and the controller that owns it

use crate::config::HealthConfig;
use crate::error::Result;
use crate::regeneration::{RegenerationSchedule, RegenerationTimer};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};
use void_event::{Signal, SubscriberId};
use void_timer::{Scheduler, TimerCallback};

/// Tolerance used when comparing health against its maximum
pub const HEALTH_TOLERANCE: f32 = 1.0e-4;

/// Sent after every health mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    /// Health after the mutation
    pub health: f32,
    /// Signed change applied by the mutation
    pub delta: f32,
}

/// Sent once, when health first reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death;

/// Current and maximum health.
///
/// `0 <= health <= max_health` always holds; only [`HealthController`]
/// mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalityState {
    health: f32,
    max_health: f32,
}

impl VitalityState {
    fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
        }
    }

    /// Current health
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Health reached zero
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Health is within [`HEALTH_TOLERANCE`] of the maximum
    pub fn is_full(&self) -> bool {
        (self.health - self.max_health).abs() <= HEALTH_TOLERANCE
    }

    /// Get health as a percentage (0.0 - 1.0)
    pub fn health_percent(&self) -> f32 {
        self.health / self.max_health
    }

    /// Clamp into `[0, max_health]` and store. Returns the applied change.
    fn set_health(&mut self, health: f32) -> HealthChanged {
        let old = self.health;
        self.health = health.clamp(0.0, self.max_health);
        HealthChanged {
            health: self.health,
            delta: self.health - old,
        }
    }
}

struct ControllerState {
    vitality: VitalityState,
    regeneration: RegenerationTimer,
    death_sent: bool,
}

struct Shared {
    state: Mutex<ControllerState>,
    auto_heal: bool,
    schedule: RegenerationSchedule,
    world: Weak<dyn Scheduler>,
    health_changed: Signal<HealthChanged>,
    death: Signal<Death>,
}

/// Sole owner of a character's [`VitalityState`].
///
/// Applies damage and healing, runs regeneration on the world's scheduler and
/// notifies listeners. Clones share the same state.
///
/// Listeners run synchronously after the state is updated and without any
/// internal lock held, so they may query the controller.
#[derive(Clone)]
pub struct HealthController {
    shared: Arc<Shared>,
}

impl HealthController {
    /// Build a controller at full health.
    ///
    /// Fails on invalid configuration, notably `max_health <= 0`. `world` is
    /// the scheduler used for regeneration; once it can no longer be upgraded
    /// damage is ignored.
    pub fn new(config: &HealthConfig, world: Weak<dyn Scheduler>) -> Result<Self> {
        config.validate()?;

        let shared = Shared {
            state: Mutex::new(ControllerState {
                vitality: VitalityState::new(config.max_health),
                regeneration: RegenerationTimer::new(),
                death_sent: false,
            }),
            auto_heal: config.auto_heal,
            schedule: config.regeneration_schedule(),
            world,
            health_changed: Signal::new(),
            death: Signal::new(),
        };

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// Reset health to maximum and broadcast it. Does nothing once dead.
    pub fn initialize(&self) {
        let world = self.shared.world.upgrade();
        let changed = {
            let mut state = self.shared.state.lock();
            if state.vitality.is_dead() {
                return;
            }
            if let Some(world) = &world {
                state.regeneration.cancel(world.as_ref());
            }
            let max_health = state.vitality.max_health();
            state.vitality.set_health(max_health)
        };
        self.shared.health_changed.emit(&changed);
    }

    /// Take damage.
    ///
    /// Ignored when `amount` is not positive, when already dead, or when the
    /// world is gone. Any running regeneration is cancelled; it restarts after
    /// a non-lethal hit if auto-heal is enabled.
    pub fn apply_damage(&self, amount: f32) {
        Shared::apply_damage(&self.shared, amount);
    }

    /// Add health from a pickup. Does not affect regeneration.
    ///
    /// Returns false, without changing anything, when already full, dead, or
    /// when `amount` is not a positive number.
    pub fn try_add_health(&self, amount: f32) -> bool {
        if !amount.is_finite() || amount <= 0.0 {
            return false;
        }

        let changed = {
            let mut state = self.shared.state.lock();
            if state.vitality.is_full() || state.vitality.is_dead() {
                return false;
            }
            let health = state.vitality.health() + amount;
            state.vitality.set_health(health)
        };

        log::debug!("Picked up {} health, now {}", amount, changed.health);
        self.shared.health_changed.emit(&changed);
        true
    }

    /// Register a listener for every health mutation
    pub fn on_health_changed<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&HealthChanged) + Send + Sync + 'static,
    {
        self.shared.health_changed.subscribe(handler)
    }

    /// Register a listener for death
    pub fn on_death<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&Death) + Send + Sync + 'static,
    {
        self.shared.death.subscribe(handler)
    }

    /// Remove a listener registered with [`HealthController::on_health_changed`]
    pub fn remove_health_changed_listener(&self, id: SubscriberId) -> bool {
        self.shared.health_changed.unsubscribe(id)
    }

    /// Remove a listener registered with [`HealthController::on_death`]
    pub fn remove_death_listener(&self, id: SubscriberId) -> bool {
        self.shared.death.unsubscribe(id)
    }

    /// Snapshot of the current state
    pub fn vitality(&self) -> VitalityState {
        self.shared.state.lock().vitality
    }

    pub fn current_health(&self) -> f32 {
        self.vitality().health()
    }

    pub fn max_health(&self) -> f32 {
        self.vitality().max_health()
    }

    pub fn health_percent(&self) -> f32 {
        self.vitality().health_percent()
    }

    pub fn is_dead(&self) -> bool {
        self.vitality().is_dead()
    }

    pub fn is_full(&self) -> bool {
        self.vitality().is_full()
    }

    /// Check if a regeneration schedule is live
    pub fn is_regenerating(&self) -> bool {
        let Some(world) = self.shared.world.upgrade() else {
            return false;
        };
        self.shared.state.lock().regeneration.is_running(world.as_ref())
    }

    /// Regeneration timing
    pub fn regeneration_schedule(&self) -> RegenerationSchedule {
        self.shared.schedule
    }
}

impl Shared {
    fn apply_damage(this: &Arc<Self>, amount: f32) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        let Some(world) = this.world.upgrade() else {
            log::debug!("Ignoring {} damage without a world", amount);
            return;
        };

        let (changed, first_death) = {
            let mut state = this.state.lock();
            if state.vitality.is_dead() {
                return;
            }
            let health = state.vitality.health() - amount;
            let changed = state.vitality.set_health(health);
            let first_death = state.vitality.is_dead() && !state.death_sent;
            if first_death {
                state.death_sent = true;
            }
            (changed, first_death)
        };

        log::debug!("Took {} damage, health now {}", amount, changed.health);
        this.health_changed.emit(&changed);

        if first_death {
            log::info!("Health depleted");
            this.death.emit(&Death);
        }

        // Listeners may have hit again; decide on the state as it is now
        let mut state = this.state.lock();
        state.regeneration.cancel(world.as_ref());
        if this.auto_heal && !state.vitality.is_dead() {
            let callback = Self::regeneration_callback(this);
            state
                .regeneration
                .start(world.as_ref(), &this.schedule, callback);
        }
    }

    fn regeneration_tick(&self) {
        let Some(world) = self.world.upgrade() else {
            return;
        };

        let changed = {
            let mut state = self.state.lock();
            if state.vitality.is_dead() {
                state.regeneration.cancel(world.as_ref());
                return;
            }
            let health = state.vitality.health() + self.schedule.heal_amount_per_tick;
            state.vitality.set_health(health)
        };

        self.health_changed.emit(&changed);

        // A hit from a listener leaves health below full and owns a fresh schedule
        let mut state = self.state.lock();
        if state.vitality.is_full() {
            log::debug!("Regeneration finished at {}", state.vitality.health());
            state.regeneration.cancel(world.as_ref());
        }
    }

    fn regeneration_callback(this: &Arc<Self>) -> TimerCallback {
        let weak = Arc::downgrade(this);
        Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.regeneration_tick();
            }
        })
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        match self.world.upgrade() {
            Some(world) => state.regeneration.cancel(world.as_ref()),
            None => state.regeneration.reset(),
        }
    }
}

impl fmt::Debug for HealthController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthController")
            .field("vitality", &self.vitality())
            .field("auto_heal", &self.shared.auto_heal)
            .finish()
    }
}
