use crate::model::{
    rating_tracker::RatingTracker,
    structures::{match_record::MatchRecord, player::Player}
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A player whose target equals their rating.
pub fn generate_player(name: &str, rating: f64, games_played: u32) -> Player {
    let mut player = Player::new(name, rating, rating.round() as i32, 1.0);
    player.games_played = games_played;

    player
}

/// `n` players named `Player_1..=n` at `starting_rating`, with targets spread
/// over 1000-2400.
pub fn generate_players(n: usize, starting_rating: f64) -> Vec<Player> {
    // Initialize seeded RNG for reproducible results
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    (1..=n)
        .map(|i| {
            let target = rng.random_range(1000..=2400);
            Player::new(format!("Player_{}", i), starting_rating, target, 1.0)
        })
        .collect()
}

pub fn generate_tracker(players: &[(&str, f64)]) -> RatingTracker {
    let mut tracker = RatingTracker::new();
    for (name, rating) in players {
        tracker.insert_player(generate_player(name, *rating, 0), None);
    }

    tracker
}

/// A match between two fully confident players. The winner gains 10, the
/// loser drops 10.
pub fn generate_match_record(
    match_number: u32,
    player: &str,
    opponent: &str,
    player_rating_before: f64,
    opponent_rating_before: f64,
    player_won: bool
) -> MatchRecord {
    let change = if player_won { 10.0 } else { -10.0 };

    MatchRecord {
        match_number,
        player: player.to_string(),
        opponent: opponent.to_string(),
        player_rating_before,
        opponent_rating_before,
        player_confidence: 1.0,
        opponent_confidence: 1.0,
        player_games_before: 20,
        opponent_games_before: 20,
        player_won,
        win_probability: 0.5,
        player_rating_change: change,
        opponent_rating_change: -change,
        player_variety_bonus: 0.0,
        opponent_variety_bonus: 0.0,
        player_multiplier: 1.0,
        opponent_multiplier: 1.0,
        proven_potential: None
    }
}

/// `n` random `(winner, loser)` pairs of distinct names.
pub fn generate_pairings(n: usize, names: &[String]) -> Vec<(String, String)> {
    if names.len() < 2 {
        panic!("At least two players are needed to generate pairings");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut pairings = Vec::with_capacity(n);

    for _ in 0..n {
        let a = rng.random_range(0..names.len());
        let mut b = rng.random_range(0..names.len() - 1);
        if b >= a {
            b += 1;
        }
        pairings.push((names[a].clone(), names[b].clone()));
    }

    pairings
}
