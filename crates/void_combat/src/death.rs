//! One-shot transition of a character into its dead state

use crate::health::HealthController;
use crate::weapon::WeaponControl;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use void_event::SubscriberId;
use void_timer::{Scheduler, TimerHandle};

/// Physical presence of a character.
///
/// Every operation must tolerate being called when already in that state.
pub trait CharacterBody: Send {
    /// Stop processing movement input
    fn disable_movement(&mut self);

    /// Stop responding to collision on every channel
    fn ignore_all_collision(&mut self);

    /// Hand the mesh over to physics simulation
    fn enable_ragdoll(&mut self);

    /// Remove the character from the world
    fn despawn(&mut self);
}

/// Whoever controls the character (player or AI)
pub trait Possessor: Send {
    /// Give up control and become a non-interactive observer
    fn enter_spectating(&mut self);
}

/// Applies the death transition to a character's collaborators
pub struct DeathReactionController {
    body: Arc<Mutex<dyn CharacterBody>>,
    possessor: Option<Arc<Mutex<dyn Possessor>>>,
    weapon: Option<Arc<Mutex<dyn WeaponControl>>>,
    /// Time a corpse stays in the world (zero = forever)
    life_span: Duration,
    world: Weak<dyn Scheduler>,
    reacted: AtomicBool,
    despawn_timer: Mutex<Option<TimerHandle>>,
}

impl DeathReactionController {
    pub fn new(
        body: Arc<Mutex<dyn CharacterBody>>,
        possessor: Option<Arc<Mutex<dyn Possessor>>>,
        weapon: Option<Arc<Mutex<dyn WeaponControl>>>,
        life_span: Duration,
        world: Weak<dyn Scheduler>,
    ) -> Self {
        Self {
            body,
            possessor,
            weapon,
            life_span,
            world,
            reacted: AtomicBool::new(false),
            despawn_timer: Mutex::new(None),
        }
    }

    /// React to `health`'s death notification
    pub fn attach(self: &Arc<Self>, health: &HealthController) -> SubscriberId {
        let reaction = Arc::clone(self);
        health.on_death(move |_| {
            reaction.react();
        })
    }

    /// Run the death transition. Only the first call has any effect.
    ///
    /// Returns true if this call performed the transition.
    pub fn react(&self) -> bool {
        if self.reacted.swap(true, Ordering::SeqCst) {
            return false;
        }
        log::info!("Character is dead");

        self.body.lock().disable_movement();
        self.schedule_despawn();

        match &self.possessor {
            Some(possessor) => possessor.lock().enter_spectating(),
            None => log::debug!("No possessor to move to spectating"),
        }

        self.body.lock().ignore_all_collision();

        if let Some(weapon) = &self.weapon {
            weapon.lock().stop_fire();
        }

        self.body.lock().enable_ragdoll();
        true
    }

    /// Whether the transition has run
    pub fn has_reacted(&self) -> bool {
        self.reacted.load(Ordering::SeqCst)
    }

    /// Whether a despawn is scheduled and has not happened yet
    pub fn despawn_pending(&self) -> bool {
        let Some(world) = self.world.upgrade() else {
            return false;
        };
        let handle = *self.despawn_timer.lock();
        handle.map(|handle| world.is_active(handle)).unwrap_or(false)
    }

    fn schedule_despawn(&self) {
        if self.life_span.is_zero() {
            return;
        }
        let Some(world) = self.world.upgrade() else {
            log::debug!("No world, corpse will not despawn");
            return;
        };

        let body = Arc::clone(&self.body);
        let handle = world.schedule_once(
            self.life_span,
            Box::new(move || {
                log::debug!("Despawning dead character");
                body.lock().despawn();
            }),
        );
        *self.despawn_timer.lock() = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthConfig;
    use void_timer::{no_world, world_ref, TimerManager};

    type Log = Arc<Mutex<Vec<&'static str>>>;

    struct Body(Log);
    struct Player(Log);
    struct Gun(Log);

    impl CharacterBody for Body {
        fn disable_movement(&mut self) {
            self.0.lock().push("disable_movement");
        }
        fn ignore_all_collision(&mut self) {
            self.0.lock().push("ignore_collision");
        }
        fn enable_ragdoll(&mut self) {
            self.0.lock().push("ragdoll");
        }
        fn despawn(&mut self) {
            self.0.lock().push("despawn");
        }
    }

    impl Possessor for Player {
        fn enter_spectating(&mut self) {
            self.0.lock().push("spectate");
        }
    }

    impl WeaponControl for Gun {
        fn stop_fire(&mut self) {
            self.0.lock().push("stop_fire");
        }
        fn next_weapon(&mut self) {
            self.0.lock().push("next_weapon");
        }
    }

    fn full_rig(log: &Log, life_span: Duration, world: Weak<dyn Scheduler>) -> Arc<DeathReactionController> {
        Arc::new(DeathReactionController::new(
            Arc::new(Mutex::new(Body(log.clone()))),
            Some(Arc::new(Mutex::new(Player(log.clone())))),
            Some(Arc::new(Mutex::new(Gun(log.clone())))),
            life_span,
            world,
        ))
    }

    #[test]
    fn test_reaction_order() {
        let timers = Arc::new(TimerManager::new());
        let log = Log::default();
        let reaction = full_rig(&log, Duration::from_secs(5), world_ref(&timers));

        assert!(reaction.react());
        assert_eq!(
            *log.lock(),
            vec!["disable_movement", "spectate", "ignore_collision", "stop_fire", "ragdoll"]
        );
        assert!(reaction.despawn_pending());

        timers.advance(Duration::from_secs(5));
        assert_eq!(log.lock().last(), Some(&"despawn"));
        assert!(!reaction.despawn_pending());
    }

    #[test]
    fn test_reacts_once() {
        let timers = Arc::new(TimerManager::new());
        let log = Log::default();
        let reaction = full_rig(&log, Duration::from_secs(5), world_ref(&timers));

        assert!(reaction.react());
        assert!(!reaction.react());
        assert_eq!(log.lock().len(), 5);
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn test_missing_collaborators_are_skipped() {
        let log = Log::default();
        let reaction = DeathReactionController::new(
            Arc::new(Mutex::new(Body(log.clone()))),
            None,
            None,
            Duration::from_secs(5),
            no_world(),
        );

        assert!(reaction.react());
        assert_eq!(
            *log.lock(),
            vec!["disable_movement", "ignore_collision", "ragdoll"]
        );
        assert!(!reaction.despawn_pending());
    }

    #[test]
    fn test_zero_life_span_never_despawns() {
        let timers = Arc::new(TimerManager::new());
        let log = Log::default();
        let reaction = full_rig(&log, Duration::ZERO, world_ref(&timers));

        reaction.react();
        assert_eq!(timers.active_count(), 0);
        timers.advance(Duration::from_secs(60));
        assert!(!log.lock().contains(&"despawn"));
    }

    #[test]
    fn test_attach_to_health() {
        let timers = Arc::new(TimerManager::new());
        let log = Log::default();
        let reaction = full_rig(&log, Duration::from_secs(5), world_ref(&timers));

        let health = HealthController::new(&HealthConfig::default(), world_ref(&timers))
            .expect("valid config");
        reaction.attach(&health);

        health.apply_damage(60.0);
        assert!(!reaction.has_reacted());

        health.apply_damage(60.0);
        health.apply_damage(60.0);
        assert!(reaction.has_reacted());
        assert_eq!(log.lock().iter().filter(|e| **e == "ragdoll").count(), 1);
    }
}
