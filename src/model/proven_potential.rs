use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::model::{
    confidence::{is_established, is_full_confidence},
    config::{ConfidenceConfig, ProvenPotentialConfig, RatingConfig},
    rating_tracker::RatingTracker,
    structures::{
        match_record::{MatchRecord, PpAdjustment},
        pp_batch::{FinalizationPoint, PpBatch},
        pp_trigger::{PpResolution, PpTrigger, TriggerId, TriggerState}
    }
};

/// Number of gap thresholds, `initial_after + i * gap * gap_threshold` for
/// `i` in `1..=threshold_count`, at or below the highest rating reached.
pub fn crossed_thresholds(config: &ProvenPotentialConfig, gap: f64, initial_after: f64, snapshots: &[f64]) -> u32 {
    if gap <= 0.0 {
        return 0;
    }

    let max_reached = snapshots.iter().copied().fold(initial_after, f64::max);
    let increment = gap * config.gap_threshold;

    (1..=config.threshold_count())
        .filter(|i| initial_after + *i as f64 * increment <= max_reached)
        .count() as u32
}

/// Computes the final rescaling of a trigger from its snapshots.
pub fn resolve(config: &ProvenPotentialConfig, trigger: &PpTrigger) -> PpResolution {
    let crossed = crossed_thresholds(config, trigger.gap(), trigger.initial_new_after(), &trigger.snapshots);
    let closure_fraction = (crossed as f64 * config.gap_threshold).clamp(0.0, 1.0);

    let scaling = if trigger.established_won {
        1.0 + closure_fraction
    } else {
        1.0 - closure_fraction
    };

    PpResolution {
        crossed_thresholds: crossed,
        closure_fraction,
        scaling,
        new_adjustment: (scaling - 1.0) * trigger.new_change,
        established_adjustment: (scaling - 1.0) * trigger.established_change
    }
}

/// Owns every proven potential trigger and drives them from pending to
/// finalized.
///
/// Triggers live in an arena indexed by [`TriggerId`]; `pending` groups the
/// unresolved ones by new player. Finalization happens per new player: all of
/// their pending triggers are resolved together and applied as one batch.
pub struct ProvenPotentialTracker {
    config: ProvenPotentialConfig,
    confidence: ConfidenceConfig,
    triggers: Vec<PpTrigger>,
    pending: IndexMap<String, Vec<TriggerId>>,
    batches: Vec<PpBatch>
}

impl ProvenPotentialTracker {
    pub fn new(config: &RatingConfig) -> ProvenPotentialTracker {
        ProvenPotentialTracker {
            config: config.proven_potential.clone(),
            confidence: config.confidence.clone(),
            triggers: Vec::new(),
            pending: IndexMap::new(),
            batches: Vec::new()
        }
    }

    pub fn triggers(&self) -> &[PpTrigger] {
        &self.triggers
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&PpTrigger> {
        self.triggers.get(id.0)
    }

    pub fn batches(&self) -> &[PpBatch] {
        &self.batches
    }

    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn finalized_count(&self) -> usize {
        self.triggers.iter().filter(|t| t.is_applied()).count()
    }

    /// Creates a trigger if the match was between an established player with
    /// enough games and a player who is not yet fully confident.
    pub fn register_match(&mut self, record: &MatchRecord) -> Option<TriggerId> {
        let player_established = is_full_confidence(&self.confidence, record.player_confidence);
        let opponent_established = is_full_confidence(&self.confidence, record.opponent_confidence);

        // Orient the record so that `player` is the new side
        let oriented = match (player_established, opponent_established) {
            (false, true) => record.clone(),
            (true, false) => record.mirrored(),
            _ => return None
        };

        if oriented.opponent_games_before < self.config.min_established_games {
            return None;
        }

        if oriented.player_rating_before == oriented.opponent_rating_before {
            return None;
        }

        let id = TriggerId(self.triggers.len());
        let trigger = PpTrigger {
            id,
            match_number: oriented.match_number,
            new_player: oriented.player.clone(),
            established_player: oriented.opponent.clone(),
            new_rating_before: oriented.player_rating_before,
            established_rating_before: oriented.opponent_rating_before,
            new_change: oriented.player_rating_change,
            established_change: oriented.opponent_rating_change,
            established_won: !oriented.player_won,
            tracking_end: oriented.match_number + self.config.lookback_window,
            snapshots: Vec::new(),
            state: TriggerState::Pending
        };

        debug!(
            "PP trigger {} created at match {}: {} ({:.1}) vs established {} ({:.1})",
            id.0,
            trigger.match_number,
            trigger.new_player,
            trigger.new_rating_before,
            trigger.established_player,
            trigger.established_rating_before
        );

        self.pending.entry(trigger.new_player.clone()).or_default().push(id);
        self.triggers.push(trigger);

        Some(id)
    }

    /// Records snapshots for the participants of `match_number` and finalizes
    /// every participant whose tracking window has elapsed and who has reached
    /// full confidence.
    pub fn advance(&mut self, match_number: u32, tracker: &mut RatingTracker) -> Vec<PpBatch> {
        let participants: Vec<String> = tracker
            .match_records(match_number)
            .iter()
            .map(|r| r.player.clone())
            .collect();

        let mut ready = Vec::new();
        for name in participants {
            let Some(player) = tracker.get_player(&name) else {
                continue;
            };
            let Some(ids) = self.pending.get(&name) else {
                continue;
            };

            let mut latest_end = 0;
            for id in ids {
                let Some(trigger) = self.triggers.get_mut(id.0) else {
                    continue;
                };

                if match_number > trigger.match_number && trigger.snapshots.len() < self.config.lookback_window as usize
                {
                    trigger.snapshots.push(player.rating);
                }
                latest_end = latest_end.max(trigger.tracking_end);
            }

            if match_number >= latest_end && is_established(&self.confidence, player.games_played) {
                ready.push(name);
            }
        }

        ready
            .into_iter()
            .filter_map(|name| self.finalize_player(&name, FinalizationPoint::Match(match_number), tracker))
            .collect()
    }

    /// Finalizes every remaining pending trigger regardless of confidence.
    /// Calling this again is a no-op.
    pub fn finalize_all_pending(&mut self, tracker: &mut RatingTracker) -> Vec<PpBatch> {
        let names: Vec<String> = self.pending.keys().cloned().collect();

        names
            .into_iter()
            .filter_map(|name| self.finalize_player(&name, FinalizationPoint::SimulationEnd, tracker))
            .collect()
    }

    fn finalize_player(
        &mut self,
        new_player: &str,
        point: FinalizationPoint,
        tracker: &mut RatingTracker
    ) -> Option<PpBatch> {
        let ids = self.pending.shift_remove(new_player)?;

        let mut total_new_adjustment = 0.0;
        let mut established_adjustments: IndexMap<String, f64> = IndexMap::new();
        let mut finalized = Vec::new();

        for id in ids {
            let Some(trigger) = self.triggers.get_mut(id.0) else {
                continue;
            };
            if trigger.is_applied() {
                continue;
            }

            let resolution = resolve(&self.config, trigger);
            debug!(
                "PP trigger {} (match {}): crossed {} thresholds, closure {:.2}, scaling {:.2}, adjustment {:+.2}",
                id.0,
                trigger.match_number,
                resolution.crossed_thresholds,
                resolution.closure_fraction,
                resolution.scaling,
                resolution.new_adjustment
            );

            total_new_adjustment += resolution.new_adjustment;
            *established_adjustments
                .entry(trigger.established_player.clone())
                .or_default() += resolution.established_adjustment;

            let adjustment = PpAdjustment {
                trigger: id,
                scaling: resolution.scaling,
                crossed_thresholds: resolution.crossed_thresholds,
                closure_fraction: resolution.closure_fraction,
                player_adjusted_change: trigger.new_change * resolution.scaling,
                opponent_adjusted_change: trigger.established_change * resolution.scaling
            };
            finalized.push((trigger.match_number, adjustment));

            trigger.state = TriggerState::Finalized(resolution);
        }

        if finalized.is_empty() {
            return None;
        }

        established_adjustments.retain(|name, _| {
            let present = tracker.contains(name);
            if !present {
                warn!(
                    "Established player {} is no longer present, skipping their PP share for {}",
                    name, new_player
                );
            }
            present
        });

        let mut changes = IndexMap::new();
        changes.insert(new_player.to_string(), total_new_adjustment);
        for (name, adjustment) in &established_adjustments {
            *changes.entry(name.clone()).or_default() += adjustment;
        }

        let match_number = match point {
            FinalizationPoint::Match(n) => Some(n),
            FinalizationPoint::SimulationEnd => None
        };
        let applied = tracker.apply_proven_potential(&changes, match_number);

        for (origin, adjustment) in &finalized {
            tracker.attach_proven_potential(*origin, new_player, adjustment);
        }

        let (rating_before, rating_after) = match applied.get(new_player) {
            Some(ratings) => *ratings,
            None => {
                warn!("New player {} is no longer present, PP batch not applied to them", new_player);
                (0.0, 0.0)
            }
        };

        let batch = PpBatch {
            new_player: new_player.to_string(),
            applied_at: point,
            rating_before,
            rating_after,
            total_new_adjustment,
            triggers: finalized.iter().map(|(_, a)| a.trigger).collect(),
            trigger_matches: finalized.iter().map(|(origin, _)| *origin).collect(),
            established_adjustments
        };

        info!(
            "PP batch for {} at {}: {} trigger(s), {:.1} -> {:.1}",
            batch.new_player,
            batch.applied_at,
            batch.triggers.len(),
            batch.rating_before,
            batch.rating_after
        );

        self.batches.push(batch.clone());
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        model::{
            config::{ProvenPotentialConfig, RatingConfig},
            proven_potential::{crossed_thresholds, resolve, ProvenPotentialTracker},
            rating_tracker::RatingTracker,
            structures::{
                match_record::MatchRecord,
                pp_batch::FinalizationPoint,
                pp_trigger::{PpTrigger, TriggerId, TriggerState}
            }
        },
        utils::test_utils::{generate_match_record, generate_player}
    };

    fn trigger(established_won: bool, snapshots: Vec<f64>) -> PpTrigger {
        PpTrigger {
            id: TriggerId(0),
            match_number: 1,
            new_player: "New".to_string(),
            established_player: "Vet".to_string(),
            new_rating_before: 1000.0,
            established_rating_before: 1100.0,
            new_change: 50.0,
            established_change: 10.0,
            established_won,
            tracking_end: 17,
            snapshots,
            state: TriggerState::Pending
        }
    }

    /// A roster with an established veteran and a fresh player.
    fn roster() -> RatingTracker {
        let mut tracker = RatingTracker::new();
        tracker.insert_player(generate_player("Vet", 1100.0, 40), None);
        tracker.insert_player(generate_player("New", 1000.0, 0), None);
        tracker.insert_player(generate_player("Other", 1000.0, 40), None);
        tracker
    }

    /// Vet beats New: New is rated 1000 with no games, Vet 1100 with 40.
    fn trigger_match(match_number: u32, new_rating: f64, new_games: u32) -> MatchRecord {
        let mut record = generate_match_record(match_number, "Vet", "New", 1100.0, new_rating, true);
        record.player_confidence = 1.0;
        record.player_games_before = 40;
        record.opponent_confidence = if new_games >= 20 { 1.0 } else { 0.3 };
        record.opponent_games_before = new_games;
        record
    }

    fn filler_match(match_number: u32, new_won: bool, change: f64) -> MatchRecord {
        let mut record = generate_match_record(match_number, "New", "Other", 0.0, 1000.0, new_won);
        record.player_rating_change = change;
        record.opponent_rating_change = -change;
        record
    }

    #[test]
    fn test_crossed_thresholds_worked_example() {
        let config = ProvenPotentialConfig::default();

        assert_eq!(crossed_thresholds(&config, 100.0, 1050.0, &[1060.0, 1075.0]), 2);
        assert_eq!(crossed_thresholds(&config, 100.0, 1050.0, &[1060.0, 1075.0, 1110.0]), 6);
    }

    #[test]
    fn test_crossed_thresholds_caps_at_threshold_count() {
        let config = ProvenPotentialConfig::default();

        assert_eq!(crossed_thresholds(&config, 100.0, 1050.0, &[5000.0]), 10);
        assert_eq!(crossed_thresholds(&config, 100.0, 1050.0, &[]), 0);
        assert_eq!(crossed_thresholds(&config, 100.0, 1050.0, &[900.0, 1040.0]), 0);
        assert_eq!(crossed_thresholds(&config, 0.0, 1050.0, &[5000.0]), 0);
    }

    #[test]
    fn test_closure_is_monotonic_in_snapshots() {
        let config = ProvenPotentialConfig::default();
        let snapshots = [1040.0, 1065.0, 1055.0, 1090.0, 1080.0, 1130.0, 1100.0, 1160.0];
        let mut previous = 0;

        for n in 0..=snapshots.len() {
            let crossed = crossed_thresholds(&config, 100.0, 1050.0, &snapshots[..n]);
            assert!(crossed >= previous);
            previous = crossed;
        }
        assert_eq!(previous, 10);
    }

    #[test]
    fn test_resolve_established_winner_scales_up() {
        let config = ProvenPotentialConfig::default();
        // initial_after = 1050, gap 100, max 1075 crosses 2 thresholds
        let resolution = resolve(&config, &trigger(true, vec![1060.0, 1075.0]));

        assert_eq!(resolution.crossed_thresholds, 2);
        assert_abs_diff_eq!(resolution.closure_fraction, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(resolution.scaling, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(resolution.new_adjustment, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(resolution.established_adjustment, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_resolve_established_loser_scales_down() {
        let config = ProvenPotentialConfig::default();
        let resolution = resolve(&config, &trigger(false, vec![1060.0, 1075.0]));

        assert_abs_diff_eq!(resolution.scaling, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(resolution.new_adjustment, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(resolution.established_adjustment, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_decile_threshold_never_flips_established_loss() {
        let config = ProvenPotentialConfig {
            gap_threshold: 0.15,
            ..Default::default()
        };
        let mut rating_config = RatingConfig::default();
        rating_config.proven_potential = config.clone();
        assert!(rating_config.validate().is_ok());
        assert_eq!(config.threshold_count(), 6);

        let mut lost = trigger(false, vec![5000.0]);
        lost.established_change = -10.0;
        let resolution = resolve(&config, &lost);

        assert_eq!(resolution.crossed_thresholds, 6);
        assert_abs_diff_eq!(resolution.closure_fraction, 0.9, epsilon = 1e-12);
        assert!(resolution.closure_fraction <= 1.0);
        assert_abs_diff_eq!(resolution.scaling, 0.1, epsilon = 1e-12);
        // The established loss shrinks but stays a loss
        assert!(lost.established_change * resolution.scaling < 0.0);
    }

    #[test]
    fn test_threshold_count_uses_whole_thresholds() {
        let count = |gap_threshold| {
            ProvenPotentialConfig {
                gap_threshold,
                ..Default::default()
            }
            .threshold_count()
        };

        assert_eq!(count(0.1), 10);
        assert_eq!(count(0.2), 5);
        assert_eq!(count(0.3), 3);
        assert_eq!(count(0.4), 2);
        assert_eq!(count(1.0), 1);
    }

    #[test]
    fn test_register_requires_established_and_new() {
        let mut pp = ProvenPotentialTracker::new(&RatingConfig::default());

        // Both new
        let mut record = trigger_match(1, 1000.0, 0);
        record.player_confidence = 0.5;
        assert_eq!(pp.register_match(&record), None);

        // Both established
        assert_eq!(pp.register_match(&trigger_match(2, 1000.0, 25)), None);

        // Not enough games on the established side
        let mut record = trigger_match(3, 1000.0, 0);
        record.player_games_before = 39;
        assert_eq!(pp.register_match(&record), None);

        // No gap
        assert_eq!(pp.register_match(&trigger_match(4, 1100.0, 0)), None);

        assert!(pp.triggers().is_empty());
    }

    #[test]
    fn test_register_follows_configured_max_confidence() {
        let mut config = RatingConfig::default();
        config.confidence.max_confidence = 0.8;
        let mut pp = ProvenPotentialTracker::new(&config);

        let mut record = trigger_match(1, 1000.0, 0);
        record.player_confidence = 0.8;

        assert_eq!(pp.register_match(&record), Some(TriggerId(0)));
    }

    #[test]
    fn test_register_orients_trigger_from_either_perspective() {
        let mut pp = ProvenPotentialTracker::new(&RatingConfig::default());
        let record = trigger_match(1, 1000.0, 0);

        let id = pp.register_match(&record.mirrored()).unwrap();
        let trigger = pp.trigger(id).unwrap();

        assert_eq!(trigger.new_player, "New");
        assert_eq!(trigger.established_player, "Vet");
        assert!(trigger.established_won);
        assert_eq!(trigger.new_change, record.opponent_rating_change);
        assert_eq!(trigger.tracking_end, 17);
        assert_eq!(pp.pending_count(), 1);
    }

    #[test]
    fn test_snapshots_capped_at_lookback_window() {
        let mut config = RatingConfig::default();
        config.proven_potential.lookback_window = 3;
        let mut pp = ProvenPotentialTracker::new(&config);
        let mut tracker = roster();

        let record = trigger_match(1, 1000.0, 0);
        tracker.apply_match(record.clone());
        pp.register_match(&record);
        pp.advance(1, &mut tracker);

        for n in 2..=6 {
            tracker.apply_match(filler_match(n, true, 1.0));
            pp.advance(n, &mut tracker);
        }

        // New only has 6 games, so nothing finalizes
        let trigger = pp.trigger(TriggerId(0)).unwrap();
        assert_eq!(trigger.state, TriggerState::Pending);
        assert_eq!(trigger.snapshots.len(), 3);
        // The origin match itself is not a snapshot: New drops to 990 there
        assert_eq!(trigger.snapshots, vec![991.0, 992.0, 993.0]);
    }

    #[test]
    fn test_waits_for_confidence_then_finalizes() {
        let mut config = RatingConfig::default();
        config.proven_potential.lookback_window = 4;
        let mut pp = ProvenPotentialTracker::new(&config);
        let mut tracker = roster();

        let record = trigger_match(1, 1000.0, 0);
        tracker.apply_match(record.clone());
        pp.register_match(&record);
        assert!(pp.advance(1, &mut tracker).is_empty());

        // New climbs well past the original gap, but only reaches full
        // confidence (20 games) at match 20
        let mut finalized_at = None;
        for n in 2..=20 {
            tracker.apply_match(filler_match(n, true, 30.0));
            let batches = pp.advance(n, &mut tracker);
            if !batches.is_empty() {
                finalized_at = Some(n);
                assert_eq!(batches.len(), 1);
                assert_eq!(batches[0].applied_at, FinalizationPoint::Match(n));
            }
        }

        assert_eq!(finalized_at, Some(20));
        assert_eq!(pp.pending_count(), 0);

        let resolution = pp.trigger(TriggerId(0)).unwrap().resolution().unwrap();
        assert_eq!(resolution.crossed_thresholds, 10);
        assert_abs_diff_eq!(resolution.scaling, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_finalization_waits_for_latest_tracking_end() {
        let mut config = RatingConfig::default();
        config.proven_potential.lookback_window = 4;
        let mut pp = ProvenPotentialTracker::new(&config);

        // New is two games short of full confidence
        let mut tracker = RatingTracker::new();
        tracker.insert_player(generate_player("Vet", 1100.0, 40), None);
        tracker.insert_player(generate_player("New", 1000.0, 18), None);
        tracker.insert_player(generate_player("Other", 1000.0, 40), None);

        let first = trigger_match(1, 1000.0, 0);
        tracker.apply_match(first.clone());
        assert_eq!(pp.register_match(&first), Some(TriggerId(0)));
        assert!(pp.advance(1, &mut tracker).is_empty());

        for n in 2..=4 {
            tracker.apply_match(filler_match(n, true, 5.0));
            assert!(pp.advance(n, &mut tracker).is_empty());
        }
        assert_eq!(tracker.get_player("New").unwrap().games_played, 22);

        // The first trigger's window ends here, but a second one just started
        let new_rating = tracker.get_player("New").unwrap().rating;
        let second = trigger_match(5, new_rating, 0);
        tracker.apply_match(second.clone());
        assert_eq!(pp.register_match(&second), Some(TriggerId(1)));
        assert!(pp.advance(5, &mut tracker).is_empty());
        assert_eq!(pp.trigger(TriggerId(0)).unwrap().state, TriggerState::Pending);

        for n in 6..=8 {
            tracker.apply_match(filler_match(n, true, 5.0));
            assert!(pp.advance(n, &mut tracker).is_empty());
        }

        tracker.apply_match(filler_match(9, true, 5.0));
        let batches = pp.advance(9, &mut tracker);

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].applied_at, FinalizationPoint::Match(9));
        assert_eq!(batches[0].triggers, vec![TriggerId(0), TriggerId(1)]);
        assert_eq!(batches[0].trigger_matches, vec![1, 5]);
        assert_eq!(pp.pending_count(), 0);
        assert_eq!(pp.finalized_count(), 2);
    }

    #[test]
    fn test_batch_sums_triggers_per_player() {
        let mut pp = ProvenPotentialTracker::new(&RatingConfig::default());
        let mut tracker = roster();

        let first = trigger_match(1, 1000.0, 0);
        tracker.apply_match(first.clone());
        pp.register_match(&first);

        let new_rating = tracker.get_player("New").unwrap().rating;
        let second = trigger_match(2, new_rating, 1);
        tracker.apply_match(second.clone());
        pp.register_match(&second);

        tracker.apply_match(filler_match(3, true, 500.0));
        pp.advance(3, &mut tracker);

        let vet_before = tracker.get_player("Vet").unwrap().rating;
        let new_before = tracker.get_player("New").unwrap().rating;
        let batches = pp.finalize_all_pending(&mut tracker);

        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.applied_at, FinalizationPoint::SimulationEnd);
        assert_eq!(batch.triggers, vec![TriggerId(0), TriggerId(1)]);
        assert_eq!(batch.trigger_matches, vec![1, 2]);
        assert_eq!(batch.established_adjustments.len(), 1);

        let total_new: f64 = pp
            .triggers()
            .iter()
            .map(|t| t.resolution().unwrap().new_adjustment)
            .sum();
        let total_vet: f64 = pp
            .triggers()
            .iter()
            .map(|t| t.resolution().unwrap().established_adjustment)
            .sum();

        assert_abs_diff_eq!(batch.total_new_adjustment, total_new, epsilon = 1e-9);
        assert_abs_diff_eq!(batch.rating_before, new_before, epsilon = 1e-9);
        assert_abs_diff_eq!(tracker.get_player("New").unwrap().rating, new_before + total_new, epsilon = 1e-9);
        assert_abs_diff_eq!(tracker.get_player("Vet").unwrap().rating, vet_before + total_vet, epsilon = 1e-9);

        // Both perspectives of the origin match carry the adjustment
        for record in tracker.match_records(1) {
            let adjustment = record.proven_potential.as_ref().unwrap();
            if record.player == "New" {
                assert_abs_diff_eq!(
                    adjustment.player_adjusted_change,
                    record.player_rating_change * adjustment.scaling,
                    epsilon = 1e-9
                );
            } else {
                assert_abs_diff_eq!(
                    adjustment.opponent_adjusted_change,
                    record.opponent_rating_change * adjustment.scaling,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_finalize_all_pending_is_idempotent() {
        let mut pp = ProvenPotentialTracker::new(&RatingConfig::default());
        let mut tracker = roster();

        let record = trigger_match(1, 1000.0, 0);
        tracker.apply_match(record.clone());
        pp.register_match(&record);
        tracker.apply_match(filler_match(2, true, 100.0));
        pp.advance(2, &mut tracker);

        assert_eq!(pp.finalize_all_pending(&mut tracker).len(), 1);
        let rating = tracker.get_player("New").unwrap().rating;
        let adjustments = tracker.get_rating_adjustments("New").unwrap().len();

        assert!(pp.finalize_all_pending(&mut tracker).is_empty());
        assert_eq!(tracker.get_player("New").unwrap().rating, rating);
        assert_eq!(tracker.get_rating_adjustments("New").unwrap().len(), adjustments);
        assert_eq!(pp.finalized_count(), 1);
        assert_eq!(pp.batches().len(), 1);
    }

    #[test]
    fn test_missing_established_player_is_skipped() {
        let mut pp = ProvenPotentialTracker::new(&RatingConfig::default());
        let mut tracker = roster();

        let record = trigger_match(1, 1000.0, 0);
        tracker.apply_match(record.clone());
        pp.register_match(&record);
        tracker.apply_match(filler_match(2, true, 100.0));
        pp.advance(2, &mut tracker);

        // Rebuild the roster without the veteran
        let mut without_vet = RatingTracker::new();
        for player in tracker.leaderboard().filter(|p| p.name != "Vet") {
            without_vet.insert_player(player.clone(), None);
        }
        let new_before = without_vet.get_player("New").unwrap().rating;

        let batches = pp.finalize_all_pending(&mut without_vet);

        assert_eq!(batches.len(), 1);
        assert!(batches[0].established_adjustments.is_empty());
        assert_abs_diff_eq!(
            without_vet.get_player("New").unwrap().rating,
            new_before + batches[0].total_new_adjustment,
            epsilon = 1e-9
        );
    }
}
