//! Weapon control seen from the vitality systems

use serde::{Deserialize, Serialize};

/// Weapon operations other systems may request
pub trait WeaponControl: Send {
    /// Stop any in-progress firing
    fn stop_fire(&mut self);

    /// Equip the next weapon in the rotation
    fn next_weapon(&mut self);
}

/// A fixed rotation of named weapons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRack {
    /// Weapon names in rotation order
    weapons: Vec<String>,
    /// Index of the equipped weapon
    current: usize,
    /// Whether the trigger is held
    #[serde(skip)]
    firing: bool,
}

impl WeaponRack {
    /// Create a rack with the first weapon equipped
    pub fn new<I, S>(weapons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            weapons: weapons.into_iter().map(Into::into).collect(),
            current: 0,
            firing: false,
        }
    }

    /// Name of the equipped weapon
    pub fn current(&self) -> Option<&str> {
        self.weapons.get(self.current).map(String::as_str)
    }

    pub fn start_fire(&mut self) {
        self.firing = !self.weapons.is_empty();
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

impl WeaponControl for WeaponRack {
    fn stop_fire(&mut self) {
        self.firing = false;
    }

    fn next_weapon(&mut self) {
        if self.weapons.is_empty() {
            return;
        }
        self.stop_fire();
        self.current = (self.current + 1) % self.weapons.len();
        log::debug!("Equipped {}", self.weapons[self.current]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        let mut rack = WeaponRack::new(["rifle", "launcher"]);
        assert_eq!(rack.current(), Some("rifle"));

        rack.next_weapon();
        assert_eq!(rack.current(), Some("launcher"));

        rack.next_weapon();
        assert_eq!(rack.current(), Some("rifle"));
    }

    #[test]
    fn test_switch_stops_fire() {
        let mut rack = WeaponRack::new(["rifle", "launcher"]);
        rack.start_fire();
        assert!(rack.is_firing());

        rack.next_weapon();
        assert!(!rack.is_firing());
    }

    #[test]
    fn test_empty_rack() {
        let mut rack = WeaponRack::new(Vec::<String>::new());
        rack.start_fire();
        rack.next_weapon();

        assert!(!rack.is_firing());
        assert_eq!(rack.current(), None);
    }
}
