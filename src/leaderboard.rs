use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sdq::{self, ScoringParams, ShotEvent, ShotOutcome, ShotScore};

/// Per-player reduction of a group of scored shots. One row per player
/// with at least `min_shots` shots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: u64,
    pub total_shots: usize,
    pub goals: usize,
    pub conversion_rate_pct: f64,
    pub overall_sdq: f64,
    pub sdq_median: f64,
    pub sdq_std_dev: f64,
    /// 100 minus the SDQ standard deviation. Deliberately unclamped: a
    /// wildly inconsistent shooter can go negative.
    pub consistency: f64,
    pub avg_location_score: f64,
    pub avg_pressure_score: f64,
    pub avg_shot_type_score: f64,
    pub avg_timing_score: f64,
    pub avg_expected_value: f64,
    pub avg_distance: f64,
    pub avg_angle: f64,
    pub shots_under_pressure: usize,
    pub shots_in_box: usize,
}

/// Score every shot. Row-wise and stateless, so the pass is parallel.
pub fn score_all(params: &ScoringParams, shots: &[ShotEvent]) -> Vec<ShotScore> {
    shots.par_iter().map(|shot| params.score(shot)).collect()
}

/// Group shots by player, drop groups below `min_shots`, reduce each group
/// to a summary row and sort descending by overall SDQ. Ties keep the order
/// players were first seen in the input.
pub fn build_leaderboard(
    params: &ScoringParams,
    shots: &[ShotEvent],
    min_shots: usize,
) -> Vec<PlayerSummary> {
    let mut order: Vec<u64> = Vec::new();
    let mut groups: HashMap<u64, Vec<&ShotEvent>> = HashMap::new();
    for shot in shots {
        groups
            .entry(shot.player_id)
            .or_insert_with(|| {
                order.push(shot.player_id);
                Vec::new()
            })
            .push(shot);
    }

    let mut rows: Vec<PlayerSummary> = order
        .into_iter()
        .filter_map(|player_id| {
            let group = &groups[&player_id];
            if group.len() < min_shots.max(1) {
                return None;
            }
            Some(summarize_player(params, player_id, group))
        })
        .collect();

    rows.sort_by(|a, b| {
        b.overall_sdq
            .partial_cmp(&a.overall_sdq)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

fn summarize_player(params: &ScoringParams, player_id: u64, shots: &[&ShotEvent]) -> PlayerSummary {
    let total_shots = shots.len();
    let scores: Vec<ShotScore> = shots.iter().map(|shot| params.score(shot)).collect();

    let sdq: Vec<f64> = scores.iter().map(|s| s.sdq).collect();
    let goals = scores
        .iter()
        .filter(|s| s.outcome == ShotOutcome::Goal)
        .count();
    let shots_under_pressure = shots.iter().filter(|s| s.under_pressure).count();
    let shots_in_box = shots
        .iter()
        .filter(|s| sdq::x_from_goal(s.x) <= params.zones.penalty_box)
        .count();

    let conversion_rate_pct = if total_shots > 0 {
        goals as f64 / total_shots as f64 * 100.0
    } else {
        0.0
    };

    let sdq_std_dev = population_std_dev(&sdq);

    PlayerSummary {
        player_id,
        total_shots,
        goals,
        conversion_rate_pct,
        overall_sdq: mean(&sdq),
        sdq_median: median(&sdq),
        sdq_std_dev,
        consistency: 100.0 - sdq_std_dev,
        avg_location_score: mean_of(&scores, |s| s.location_score),
        avg_pressure_score: mean_of(&scores, |s| s.pressure_score),
        avg_shot_type_score: mean_of(&scores, |s| s.shot_type_score),
        avg_timing_score: mean_of(&scores, |s| s.timing_score),
        avg_expected_value: mean_of(&scores, |s| s.expected_value),
        avg_distance: mean_of(&scores, |s| s.distance_to_goal),
        avg_angle: mean_of(&scores, |s| s.shot_angle),
        shots_under_pressure,
        shots_in_box,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_of(scores: &[ShotScore], pick: impl Fn(&ShotScore) -> f64) -> f64 {
    let values: Vec<f64> = scores.iter().map(pick).collect();
    mean(&values)
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (denominator N, not N-1).
fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values
        .iter()
        .map(|v| {
            let d = v - m;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    var.sqrt()
}
