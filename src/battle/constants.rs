//! Combat constants - all tunable defaults in one place
//!
//! `CombatConfig` starts from these values; code that has no config at hand
//! (tests, board helpers) reads them directly.

// Readiness
pub const CT_THRESHOLD: i32 = 100;

// Damage
pub const DAMAGE_VARIANCE_PERCENT: u32 = 25;
pub const MIN_DAMAGE: i32 = 1;

// Board
pub const MAX_JUMP_DELTA: i32 = 1;
pub const DEFAULT_ATTACK_RANGE: u32 = 1;

// Turn ownership
pub const DEFAULT_MAX_ACTION_RETRIES: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_positive() {
        assert!(CT_THRESHOLD > 0);
    }

    #[test]
    fn test_variance_is_a_percentage() {
        assert!(DAMAGE_VARIANCE_PERCENT <= 100);
        assert!(MIN_DAMAGE >= 1);
    }
}
