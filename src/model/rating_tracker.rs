use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::{
    config::{PercentileBasis, VarietyConfig},
    structures::{
        match_record::{MatchRecord, PpAdjustment},
        player::Player,
        rating_adjustment::RatingAdjustment,
        rating_adjustment_type::RatingAdjustmentType
    },
    variety::{self, PopulationSnapshot}
};

pub struct RatingTracker {
    // Sorted by rating descending after every change. The `global_rank` and
    // `percentile` of each player are updated through this IndexMap.
    leaderboard: IndexMap<String, Player>,
    adjustments: HashMap<String, Vec<RatingAdjustment>>,
    opponent_counts: HashMap<String, IndexMap<String, u32>>,
    // Two records per match, in match order
    history: Vec<MatchRecord>,
    // Match number -> index of its first record in `history`
    match_index: HashMap<u32, usize>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            leaderboard: IndexMap::new(),
            adjustments: HashMap::new(),
            opponent_counts: HashMap::new(),
            history: Vec::new(),
            match_index: HashMap::new()
        }
    }

    /// Adds a player to the roster with an initial ledger entry. A player
    /// that already exists is replaced and their ledger restarted.
    pub fn insert_player(&mut self, player: Player, match_number: Option<u32>) {
        self.adjustments.insert(
            player.name.clone(),
            vec![RatingAdjustment {
                adjustment_type: RatingAdjustmentType::Initial,
                match_number,
                rating_before: player.rating,
                rating_after: player.rating
            }]
        );
        self.opponent_counts.remove(&player.name);
        self.leaderboard.insert(player.name.clone(), player);

        self.sort();
    }

    pub fn get_player(&self, name: &str) -> Option<&Player> {
        self.leaderboard.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.leaderboard.contains_key(name)
    }

    /// All players, highest rated first.
    pub fn leaderboard(&self) -> impl Iterator<Item = &Player> {
        self.leaderboard.values()
    }

    pub fn len(&self) -> usize {
        self.leaderboard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }

    pub fn get_rating_adjustments(&self, name: &str) -> Option<&Vec<RatingAdjustment>> {
        self.adjustments.get(name)
    }

    pub fn opponent_counts(&self, name: &str) -> Option<&IndexMap<String, u32>> {
        self.opponent_counts.get(name)
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    /// Both perspective records of a match.
    pub fn match_records(&self, match_number: u32) -> &[MatchRecord] {
        match self.match_index.get(&match_number) {
            Some(index) => &self.history[*index..(*index + 2).min(self.history.len())],
            None => &[]
        }
    }

    /// Applies a played match to both participants and appends both
    /// perspectives to the history. Returns `false`, changing nothing, if
    /// either participant is unknown.
    pub fn apply_match(&mut self, record: MatchRecord) -> bool {
        if !self.contains(&record.player) || !self.contains(&record.opponent) {
            return false;
        }

        let mirrored = record.mirrored();
        for perspective in [&record, &mirrored] {
            if let Some(player) = self.leaderboard.get_mut(&perspective.player) {
                let rating_before = player.rating;
                player.rating += perspective.player_rating_change;
                player.games_played += 1;

                self.adjustments
                    .entry(perspective.player.clone())
                    .or_default()
                    .push(RatingAdjustment {
                        adjustment_type: RatingAdjustmentType::Match,
                        match_number: Some(perspective.match_number),
                        rating_before,
                        rating_after: player.rating
                    });
            }

            *self
                .opponent_counts
                .entry(perspective.player.clone())
                .or_default()
                .entry(perspective.opponent.clone())
                .or_default() += 1;
        }

        self.match_index.insert(record.match_number, self.history.len());
        self.history.push(record);
        self.history.push(mirrored);

        self.sort();
        true
    }

    /// Adds every change to the live rating of its player in one step and
    /// re-sorts once. Players missing from the roster are skipped. Returns the
    /// `(rating_before, rating_after)` of every player that was changed.
    pub fn apply_proven_potential(
        &mut self,
        changes: &IndexMap<String, f64>,
        match_number: Option<u32>
    ) -> IndexMap<String, (f64, f64)> {
        let mut applied = IndexMap::new();

        for (name, change) in changes {
            let Some(player) = self.leaderboard.get_mut(name) else {
                continue;
            };

            let rating_before = player.rating;
            player.rating += change;
            applied.insert(name.clone(), (rating_before, player.rating));

            self.adjustments.entry(name.clone()).or_default().push(RatingAdjustment {
                adjustment_type: RatingAdjustmentType::ProvenPotential,
                match_number,
                rating_before,
                rating_after: player.rating
            });
        }

        if !applied.is_empty() {
            self.sort();
        }

        applied
    }

    /// Records the proven potential rescaling on both perspective records of
    /// a match. `adjustment` is given from `perspective_player`'s point of view.
    pub fn attach_proven_potential(&mut self, match_number: u32, perspective_player: &str, adjustment: &PpAdjustment) {
        let Some(index) = self.match_index.get(&match_number).copied() else {
            return;
        };

        let end = (index + 2).min(self.history.len());
        for record in &mut self.history[index..end] {
            record.proven_potential = if record.player == perspective_player {
                Some(adjustment.clone())
            } else {
                Some(adjustment.mirrored())
            };
        }
    }

    /// Tie-aware percentile of a player among all players, using either
    /// current or target ratings.
    pub fn percentile(&self, name: &str, basis: PercentileBasis) -> Option<f64> {
        let rating_of = |p: &Player| match basis {
            PercentileBasis::Current => p.rating,
            PercentileBasis::Target => p.target_rating as f64
        };

        let player = self.get_player(name)?;
        let values: Vec<f64> = self.leaderboard.values().map(rating_of).collect();

        Some(variety::percentile_of(rating_of(player), &values))
    }

    /// Rating range, median games played and average entropy of the current
    /// population.
    pub fn population_snapshot(&self, config: &VarietyConfig) -> PopulationSnapshot {
        let ratings: HashMap<String, f64> = self
            .leaderboard
            .iter()
            .map(|(name, player)| (name.clone(), player.rating))
            .collect();

        // The leaderboard is sorted by rating descending
        let rating_range = match (self.leaderboard.first(), self.leaderboard.last()) {
            (Some((_, highest)), Some((_, lowest))) => highest.rating - lowest.rating,
            _ => 0.0
        };

        let games: Vec<u32> = self.leaderboard.values().map(|p| p.games_played).collect();
        let neighbor_window = config.neighbor_window(rating_range);

        let entropies: Vec<f64> = self
            .leaderboard
            .values()
            .filter_map(|player| {
                let counts = self.opponent_counts.get(&player.name)?;
                variety::weighted_entropy(player.rating, counts, &ratings, neighbor_window)
            })
            .collect();

        PopulationSnapshot {
            ratings,
            rating_range,
            median_games_played: variety::median_games_played(&games),
            average_entropy: variety::average_entropy(&entropies, config.difficulty_multiplier)
        }
    }

    /// Sorts and updates the Player global_rank and percentile values.
    fn sort(&mut self) {
        self.leaderboard
            .sort_by(|_, v1, _, v2| v2.rating.total_cmp(&v1.rating));

        let count = self.leaderboard.len() as u32;
        for (i, player) in self.leaderboard.values_mut().enumerate() {
            let global_rank = i as u32 + 1;
            player.global_rank = global_rank;
            player.percentile = RatingTracker::rank_percentile(global_rank, count);
        }
    }

    /// `P = (n/N) * 100`
    fn rank_percentile(rank: u32, total: u32) -> f64 {
        if total == 0 || rank == 0 {
            return 0.0;
        }

        let n = total - rank; // The number of players below the player
        n as f64 / total as f64 * 100.0
    }
}
