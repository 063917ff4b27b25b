//! Tunable parameters of a simulation session.

use elemental_defence_core::{EnemyKind, MovementMode, ResourceLedger};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CORE_HEALTH: u32 = 1000;
const DEFAULT_WAVE_BONUS: u32 = 150;
const DEFAULT_RNG_SEED: u64 = 0x0e1e_3e17_a1de_fe5e;

/// Session settings, loadable from TOML.
///
/// Every field is optional in the document and falls back to the defaults of
/// the classic game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Gold the player starts with.
    pub starting_gold: u32,
    /// Mana the player starts with.
    pub starting_mana: u32,
    /// Health of the core.
    pub core_health: u32,
    /// Gold awarded for clearing a wave.
    pub wave_bonus: u32,
    /// Seed shared by the world and the wave scheduler.
    pub rng_seed: u64,
    /// How enemies travel toward the core.
    pub movement_mode: MovementMode,
    /// Enemy kinds waves draw from.
    pub enemies: Vec<EnemyKind>,
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings describe a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core_health == 0 {
            return Err(ConfigError::ZeroCoreHealth);
        }
        if self.enemies.is_empty() {
            return Err(ConfigError::NoEnemies);
        }
        Ok(())
    }

    /// Ledger holding the starting resources.
    #[must_use]
    pub fn ledger(&self) -> ResourceLedger {
        ResourceLedger::new(self.starting_gold, self.starting_mana)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let ledger = ResourceLedger::default();
        Self {
            starting_gold: ledger.gold(),
            starting_mana: ledger.mana(),
            core_health: DEFAULT_CORE_HEALTH,
            wave_bonus: DEFAULT_WAVE_BONUS,
            rng_seed: DEFAULT_RNG_SEED,
            movement_mode: MovementMode::FixedPath,
            enemies: EnemyKind::ALL.to_vec(),
        }
    }
}

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has unexpected fields.
    #[error("malformed configuration: {0}")]
    Malformed(#[from] toml::de::Error),
    /// The core would start destroyed.
    #[error("core health must be positive")]
    ZeroCoreHealth,
    /// Waves would have nothing to spawn.
    #[error("at least one enemy kind must be enabled")]
    NoEnemies,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SimulationConfig::from_toml_str("").expect("defaults");
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.starting_gold, 500);
        assert_eq!(config.starting_mana, 100);
        assert_eq!(config.wave_bonus, 150);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = SimulationConfig::from_toml_str(
            r#"
            starting_gold = 900
            movement_mode = "dynamic"
            enemies = ["goblin", "slime"]
            "#,
        )
        .expect("valid config");

        assert_eq!(config.starting_gold, 900);
        assert_eq!(config.movement_mode, MovementMode::Dynamic);
        assert_eq!(config.enemies, vec![EnemyKind::Goblin, EnemyKind::Slime]);
        assert_eq!(config.core_health, 1000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = SimulationConfig::from_toml_str("gems = 3").expect_err("unknown field");
        assert!(matches!(error, ConfigError::Malformed(_)));
    }

    #[test]
    fn unplayable_settings_are_rejected() {
        assert!(matches!(
            SimulationConfig::from_toml_str("enemies = []"),
            Err(ConfigError::NoEnemies)
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("core_health = 0"),
            Err(ConfigError::ZeroCoreHealth)
        ));
    }
}
