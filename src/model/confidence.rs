use crate::model::{config::ConfidenceConfig, constants::CONFIDENCE_GROWTH_RATE};

/// Maps games played to a confidence score in `[0, max_confidence]`.
///
/// Grows quickly over the first games and saturates: once `games_played`
/// reaches `max_confidence_games` the configured maximum is returned exactly.
pub fn confidence(config: &ConfidenceConfig, games_played: u32) -> f64 {
    if games_played >= config.max_confidence_games {
        return config.max_confidence;
    }

    let progress = games_played as f64 / config.max_confidence_games as f64;

    config.max_confidence * (1.0 - (-CONFIDENCE_GROWTH_RATE * progress).exp())
}

/// Whether a confidence score is the configured maximum.
pub fn is_full_confidence(config: &ConfidenceConfig, confidence: f64) -> bool {
    confidence >= config.max_confidence
}

/// Whether the player has reached full confidence.
pub fn is_established(config: &ConfidenceConfig, games_played: u32) -> bool {
    is_full_confidence(config, confidence(config, games_played))
}

#[cfg(test)]
mod tests {
    use crate::model::{
        confidence::{confidence, is_established, is_full_confidence},
        config::ConfidenceConfig
    };
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_confidence_zero_games() {
        assert_eq!(confidence(&ConfidenceConfig::default(), 0), 0.0);
    }

    #[test]
    fn test_confidence_boundary_inclusive() {
        let config = ConfidenceConfig::default();

        assert_eq!(confidence(&config, 20), 1.0);
        assert_eq!(confidence(&config, 21), 1.0);
        assert_eq!(confidence(&config, 10_000), 1.0);
        assert!(confidence(&config, 19) < 1.0);
    }

    #[test]
    fn test_confidence_halfway() {
        let expected = 1.0 - (-1.5f64).exp();

        assert_abs_diff_eq!(confidence(&ConfidenceConfig::default(), 10), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_confidence_monotonic() {
        let config = ConfidenceConfig::default();
        let mut previous = confidence(&config, 0);

        for games in 1..=40 {
            let current = confidence(&config, games);
            assert!(current >= previous, "confidence decreased at {} games", games);
            previous = current;
        }
    }

    #[test]
    fn test_confidence_respects_configured_maximum() {
        let config = ConfidenceConfig {
            max_confidence_games: 5,
            max_confidence: 0.8
        };

        assert_eq!(confidence(&config, 5), 0.8);
        assert!(confidence(&config, 4) < 0.8);
        // A lowered maximum still counts as full confidence
        assert!(is_established(&config, 5));
        assert!(!is_established(&config, 4));
        assert!(is_full_confidence(&config, 0.8));
        assert!(!is_full_confidence(&config, 0.79));
    }

    #[test]
    fn test_is_established() {
        let config = ConfidenceConfig::default();

        assert!(!is_established(&config, 19));
        assert!(is_established(&config, 20));
    }
}
