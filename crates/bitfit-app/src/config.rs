//! Host configuration loaded from environment variables.
//!
//! `main` calls `dotenvy::dotenv()` first, so a `.env` file in the working
//! directory works the same as exported variables.

use std::env;
use std::path::PathBuf;

use bitfit_core::content::CombatContent;
use bitfit_core::enums::Difficulty;
use bitfit_core::error::ConfigError;
use bitfit_sim::BattleConfig;

pub const SEED_VAR: &str = "BITFIT_SEED";
pub const DIFFICULTY_VAR: &str = "BITFIT_DIFFICULTY";
pub const PLAYER_VAR: &str = "BITFIT_PLAYER";
pub const BOSS_VAR: &str = "BITFIT_BOSS";
pub const CONTENT_VAR: &str = "BITFIT_CONTENT";

/// Battle settings chosen by the environment. Unset variables keep the
/// [`BattleConfig`] defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub player_archetype: String,
    pub boss_archetype: String,
    /// JSON content file replacing the built-in tables.
    pub content_path: Option<PathBuf>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        let defaults = BattleConfig::default();
        Self {
            seed: defaults.seed,
            difficulty: defaults.difficulty,
            player_archetype: defaults.player_archetype,
            boss_archetype: defaults.boss_archetype,
            content_path: None,
        }
    }
}

impl EnvConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, EnvConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvConfigError> {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(raw) = value(SEED_VAR) {
            config.seed = raw.parse().map_err(|_| EnvConfigError::InvalidSeed(raw))?;
        }
        if let Some(raw) = value(DIFFICULTY_VAR) {
            config.difficulty = parse_difficulty(&raw).ok_or(EnvConfigError::InvalidDifficulty(raw))?;
        }
        if let Some(name) = value(PLAYER_VAR) {
            config.player_archetype = name;
        }
        if let Some(name) = value(BOSS_VAR) {
            config.boss_archetype = name;
        }
        config.content_path = value(CONTENT_VAR).map(PathBuf::from);
        Ok(config)
    }

    /// Build the engine config, reading and validating the content file if one is set.
    pub fn battle_config(&self) -> Result<BattleConfig, EnvConfigError> {
        let content = match &self.content_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| EnvConfigError::ContentRead {
                    path: path.clone(),
                    source,
                })?;
                CombatContent::from_json(&json)?
            }
            None => CombatContent::builtin(),
        };
        Ok(BattleConfig {
            seed: self.seed,
            difficulty: self.difficulty,
            player_archetype: self.player_archetype.clone(),
            boss_archetype: self.boss_archetype.clone(),
            content,
            ..Default::default()
        })
    }
}

fn parse_difficulty(raw: &str) -> Option<Difficulty> {
    serde_json::from_value(serde_json::Value::String(raw.to_ascii_lowercase())).ok()
}

/// Environment configuration errors
#[derive(Debug, thiserror::Error)]
pub enum EnvConfigError {
    #[error("{SEED_VAR} must be an unsigned integer, got '{0}'")]
    InvalidSeed(String),

    #[error("{DIFFICULTY_VAR} must be easy, normal, hard or expert, got '{0}'")]
    InvalidDifficulty(String),

    #[error("cannot read content file {path:?}: {source}")]
    ContentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Content(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = EnvConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EnvConfig::default());
        assert_eq!(config.player_archetype, "brawler");
        assert_eq!(config.boss_archetype, "gym_boss");
    }

    #[test]
    fn test_reads_all_variables() {
        let config = EnvConfig::from_lookup(lookup(&[
            (SEED_VAR, "777"),
            (DIFFICULTY_VAR, " Expert "),
            (PLAYER_VAR, "speedster"),
            (BOSS_VAR, "technician"),
            (CONTENT_VAR, "content/custom.json"),
        ]))
        .unwrap();
        assert_eq!(config.seed, 777);
        assert_eq!(config.difficulty, Difficulty::Expert);
        assert_eq!(config.player_archetype, "speedster");
        assert_eq!(config.boss_archetype, "technician");
        assert_eq!(config.content_path, Some(PathBuf::from("content/custom.json")));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = EnvConfig::from_lookup(lookup(&[(SEED_VAR, "-3")])).unwrap_err();
        assert!(matches!(err, EnvConfigError::InvalidSeed(v) if v == "-3"));

        let err = EnvConfig::from_lookup(lookup(&[(DIFFICULTY_VAR, "nightmare")])).unwrap_err();
        assert!(matches!(err, EnvConfigError::InvalidDifficulty(_)));
    }

    #[test]
    fn test_battle_config_carries_choices() {
        let env = EnvConfig {
            seed: 9,
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let config = env.battle_config().unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert!(config.content.archetypes.contains_key("gym_boss"));
    }

    #[test]
    fn test_missing_content_file() {
        let env = EnvConfig {
            content_path: Some(PathBuf::from("/nonexistent/bitfit-content.json")),
            ..Default::default()
        };
        assert!(matches!(env.battle_config(), Err(EnvConfigError::ContentRead { .. })));
    }
}
