//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for combat units
///
/// Lower ids win turn-order ties, so ids are handed out by the snake draft
/// rather than in roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a scheduled action token
///
/// Only used for diagnostics and log ordering, never for tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// World time counter (one tick = one CT advance for every unit)
pub type Tick = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_ordering() {
        // Lower id = higher priority
        assert!(UnitId(1) < UnitId(2));
    }

    #[test]
    fn test_team_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<TeamId, &str> = HashMap::new();
        map.insert(TeamId(1), "blue");
        assert_eq!(map.get(&TeamId(1)), Some(&"blue"));
        assert_eq!(map.get(&TeamId(2)), None);
    }

    #[test]
    fn test_action_id_display() {
        assert_eq!(ActionId(7).to_string(), "#7");
    }
}
