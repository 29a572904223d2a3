//! Integration tests for character vitality
//!
//! Drives a full character setup against the manual clock:
//! - Fall damage through the pipeline into the health controller
//! - Regeneration after non-lethal hits
//! - Death reaction, despawn and the absorbing dead state

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use void_combat::prelude::*;
use void_timer::{world_ref, TimerManager};

#[derive(Default)]
struct Mannequin {
    movement_enabled: bool,
    colliding: bool,
    ragdoll: bool,
    despawned: bool,
}

impl CharacterBody for Mannequin {
    fn disable_movement(&mut self) {
        self.movement_enabled = false;
    }
    fn ignore_all_collision(&mut self) {
        self.colliding = false;
    }
    fn enable_ragdoll(&mut self) {
        self.ragdoll = true;
    }
    fn despawn(&mut self) {
        self.despawned = true;
    }
}

#[derive(Default)]
struct Controller {
    spectating: bool,
}

impl Possessor for Controller {
    fn enter_spectating(&mut self) {
        self.spectating = true;
    }
}

struct Character {
    timers: Arc<TimerManager>,
    health: HealthController,
    fall: DamagePipeline,
    body: Arc<Mutex<Mannequin>>,
    controller: Arc<Mutex<Controller>>,
    weapons: Arc<Mutex<WeaponRack>>,
    changes: Arc<Mutex<Vec<f32>>>,
    deaths: Arc<Mutex<u32>>,
}

fn spawn(config: &CharacterConfig) -> Character {
    let timers = Arc::new(TimerManager::new());
    let health = HealthController::new(&config.health, world_ref(&timers)).expect("valid config");

    let body = Arc::new(Mutex::new(Mannequin {
        movement_enabled: true,
        colliding: true,
        ..Default::default()
    }));
    let controller = Arc::new(Mutex::new(Controller::default()));
    let weapons = Arc::new(Mutex::new(WeaponRack::new(["rifle", "launcher"])));

    let reaction = Arc::new(DeathReactionController::new(
        body.clone(),
        Some(controller.clone()),
        Some(weapons.clone()),
        config.life_span(),
        world_ref(&timers),
    ));
    reaction.attach(&health);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let recorder = changes.clone();
    health.on_health_changed(move |e| recorder.lock().push(e.health));

    let deaths = Arc::new(Mutex::new(0));
    let counter = deaths.clone();
    health.on_death(move |_| *counter.lock() += 1);

    health.initialize();

    Character {
        timers,
        health,
        fall: DamagePipeline::new(config.landing_damage.curve()),
        body,
        controller,
        weapons,
        changes,
        deaths,
    }
}

#[test]
fn test_hit_then_lethal_hit() {
    let character = spawn(&CharacterConfig::default());
    assert_eq!(*character.changes.lock(), vec![100.0]);

    character.health.apply_damage(30.0);
    assert_eq!(character.health.current_health(), 70.0);
    assert_eq!(character.changes.lock().last(), Some(&70.0));
    assert_eq!(*character.deaths.lock(), 0);
    assert!(character.health.is_regenerating());

    character.health.apply_damage(70.0);
    assert_eq!(character.health.current_health(), 0.0);
    assert_eq!(*character.deaths.lock(), 1);
    assert!(!character.health.is_regenerating());

    character.health.apply_damage(10.0);
    assert_eq!(*character.deaths.lock(), 1);
    assert_eq!(character.changes.lock().len(), 3);
}

#[test]
fn test_fall_damage_and_recovery() {
    let character = spawn(&CharacterConfig::default());

    // A soft landing never reaches the controller
    let outcome = character.fall.on_landed(-600.0, &character.health);
    assert_eq!(outcome, ImpactOutcome::BelowFloor);
    assert_eq!(character.changes.lock().len(), 1);

    let outcome = character.fall.on_landed(-1050.0, &character.health);
    assert_eq!(outcome.damage(), Some(55.0));
    assert_eq!(character.health.current_health(), 45.0);

    // 3s delay, then +5 per second until full
    character.timers.advance(Duration::from_secs(3));
    assert_eq!(character.health.current_health(), 50.0);

    character.timers.advance(Duration::from_secs(20));
    assert!(character.health.is_full());
    assert!(!character.health.is_regenerating());
    assert_eq!(character.timers.active_count(), 0);
}

#[test]
fn test_hard_landing_kills_and_despawns() {
    let config = CharacterConfig::default();
    let character = spawn(&config);
    character.weapons.lock().start_fire();

    character.health.apply_damage(50.0);
    let outcome = character.fall.on_landed(-2000.0, &character.health);
    assert_eq!(outcome.damage(), Some(100.0));
    assert!(character.health.is_dead());

    {
        let body = character.body.lock();
        assert!(!body.movement_enabled);
        assert!(!body.colliding);
        assert!(body.ragdoll);
        assert!(!body.despawned);
    }
    assert!(character.controller.lock().spectating);
    assert!(!character.weapons.lock().is_firing());

    character.timers.advance(config.life_span());
    assert!(character.body.lock().despawned);
    assert_eq!(*character.deaths.lock(), 1);
}

#[test]
fn test_dead_character_ignores_everything() {
    let character = spawn(&CharacterConfig::default());
    character.health.apply_damage(1000.0);
    let notifications = character.changes.lock().len();

    character.fall.on_landed(-1200.0, &character.health);
    assert!(!character.health.try_add_health(25.0));
    character.timers.advance(Duration::from_secs(120));

    assert_eq!(character.health.current_health(), 0.0);
    assert_eq!(character.changes.lock().len(), notifications);
    assert_eq!(*character.deaths.lock(), 1);
}

#[test]
fn test_config_from_json() {
    let config = CharacterConfig::from_json(
        r#"{
            "health": { "max_health": 40.0, "heal_delay": 1.0, "heal_modifier": 10.0 },
            "landing_damage": { "velocity_range": [500.0, 1000.0], "damage_range": [5.0, 50.0] },
            "life_span_on_death": 2.0
        }"#,
    )
    .expect("valid config");
    let character = spawn(&config);

    character.fall.on_landed(-750.0, &character.health);
    assert_eq!(character.health.current_health(), 12.5);

    character.timers.advance(Duration::from_secs(3));
    assert_eq!(character.health.current_health(), 40.0);
    assert!(!character.health.is_regenerating());
}
