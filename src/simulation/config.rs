use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    model::config::{ConfigError, RatingConfig},
    simulation::SimulationError
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Total players, including late joiners
    pub num_players: usize,
    pub num_matches: u32,
    pub late_joiners: LateJoinerConfig
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_players: 100,
            num_matches: 4400,
            late_joiners: LateJoinerConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LateJoinerConfig {
    pub enabled: bool,
    /// Share of `num_players` that joins after the start
    pub percentage: f64,
    /// Linear mode: first join point
    pub join_after_matches: u32,
    /// Linear mode: matches between joins
    pub join_interval: u32,
    /// Exponentially distributed join times, most joining early
    pub curved_join: bool
}

impl Default for LateJoinerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            percentage: 0.5,
            join_after_matches: 25,
            join_interval: 25,
            curved_join: true
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_players < 2 {
            return Err(ConfigError::OutOfRange {
                field: "num_players",
                expected: "at least 2",
                value: self.num_players as f64
            });
        }

        let late_joiners = &self.late_joiners;
        if !(0.0..1.0).contains(&late_joiners.percentage) {
            return Err(ConfigError::OutOfRange {
                field: "late_joiners.percentage",
                expected: "in [0, 1)",
                value: late_joiners.percentage
            });
        }
        if late_joiners.join_interval == 0 {
            return Err(ConfigError::OutOfRange {
                field: "late_joiners.join_interval",
                expected: "positive",
                value: 0.0
            });
        }

        Ok(())
    }

    /// Players present at the first match. Never fewer than 2.
    pub fn initial_player_count(&self) -> usize {
        if !self.late_joiners.enabled {
            return self.num_players;
        }

        let initial = (self.num_players as f64 * (1.0 - self.late_joiners.percentage)).floor() as usize;
        initial.clamp(2, self.num_players.max(2))
    }

    pub fn late_joiner_count(&self) -> usize {
        self.num_players.saturating_sub(self.initial_player_count())
    }
}

/// Everything a run can be configured with. Missing sections fall back to
/// the ladder reset defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LadderConfig {
    pub rating: RatingConfig,
    pub simulation: SimulationConfig
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            rating: RatingConfig::ladder_reset(),
            simulation: SimulationConfig::default()
        }
    }
}

impl LadderConfig {
    pub fn from_file(path: &Path) -> Result<LadderConfig, SimulationError> {
        let contents = fs::read_to_string(path)?;
        let config: LadderConfig = serde_json::from_str(&contents)?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rating.validate()?;
        self.simulation.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{
        model::config::ConfigError,
        simulation::config::{LadderConfig, SimulationConfig}
    };

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(LadderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_initial_player_count() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.initial_player_count(), 50);
        assert_eq!(config.late_joiner_count(), 50);

        config.num_players = 3;
        config.late_joiners.percentage = 0.9;
        assert_eq!(config.initial_player_count(), 2);
        assert_eq!(config.late_joiner_count(), 1);

        config.late_joiners.enabled = false;
        assert_eq!(config.initial_player_count(), 3);
        assert_eq!(config.late_joiner_count(), 0);
    }

    #[test]
    fn test_invalid_simulation_config() {
        let mut config = SimulationConfig {
            num_players: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "num_players",
                ..
            })
        ));

        config.num_players = 10;
        config.late_joiners.percentage = 1.0;
        assert!(config.validate().is_err());

        config.late_joiners.percentage = 0.5;
        config.late_joiners.join_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_with_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"simulation": {{"seed": 7, "num_matches": 10}}}}"#).unwrap();

        let config = LadderConfig::from_file(file.path()).unwrap();

        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.num_matches, 10);
        assert_eq!(config.simulation.num_players, 100);
        assert!(config.rating.catch_up.is_some());
    }

    #[test]
    fn test_from_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(LadderConfig::from_file(file.path()).is_err());
    }
}
