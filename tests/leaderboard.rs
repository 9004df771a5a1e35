use sdq_terminal::leaderboard::{build_leaderboard, score_all};
use sdq_terminal::sdq::{BodyPart, ScoringParams, ShotEvent};

fn shot(player_id: u64, x: f64, y: f64) -> ShotEvent {
    ShotEvent {
        x,
        y,
        body_part: BodyPart::RightFoot,
        under_pressure: false,
        set_piece: false,
        counter_attack: false,
        is_goal: false,
        player_id,
        team_id: 77,
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[test]
fn empty_input_yields_empty_leaderboard() {
    let params = ScoringParams::default();
    assert!(build_leaderboard(&params, &[], 3).is_empty());
}

#[test]
fn min_shots_boundary_is_exact() {
    let params = ScoringParams::default();
    let min_shots = 4;

    let below: Vec<ShotEvent> = (0..min_shots - 1)
        .map(|i| shot(1, 110.0 - i as f64, 40.0))
        .collect();
    assert!(build_leaderboard(&params, &below, min_shots).is_empty());

    let exact: Vec<ShotEvent> = (0..min_shots)
        .map(|i| shot(1, 110.0 - i as f64, 40.0))
        .collect();
    let rows = build_leaderboard(&params, &exact, min_shots);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].player_id, 1);
    assert_eq!(rows[0].total_shots, min_shots);
}

#[test]
fn consistency_matches_population_std_dev() {
    let params = ScoringParams::default();
    let shots = vec![
        shot(5, 114.0, 40.0),
        shot(5, 102.0, 28.0),
        shot(5, 88.0, 55.0),
    ];

    let sdq: Vec<f64> = shots.iter().map(|s| params.score(s).sdq).collect();
    let expect_std = population_std_dev(&sdq);

    let rows = build_leaderboard(&params, &shots, 3);
    assert_eq!(rows.len(), 1);
    assert!((rows[0].sdq_std_dev - expect_std).abs() < 1e-9);
    assert!((rows[0].consistency - (100.0 - expect_std)).abs() < 1e-9);
}

#[test]
fn identical_shots_have_perfect_consistency() {
    let params = ScoringParams::default();
    let shots = vec![shot(2, 105.0, 40.0); 5];
    let rows = build_leaderboard(&params, &shots, 5);
    assert_eq!(rows[0].sdq_std_dev, 0.0);
    assert_eq!(rows[0].consistency, 100.0);
    assert_eq!(rows[0].sdq_median, rows[0].overall_sdq);
}

#[test]
fn component_averages_cover_every_sub_score() {
    let params = ScoringParams::default();
    let mut shots = vec![shot(8, 112.0, 40.0), shot(8, 95.0, 20.0)];
    shots[1].set_piece = true;
    shots[1].under_pressure = true;

    let scores: Vec<_> = shots.iter().map(|s| params.score(s)).collect();
    let rows = build_leaderboard(&params, &shots, 2);
    let row = &rows[0];

    let avg = |pick: fn(&sdq_terminal::sdq::ShotScore) -> f64| {
        scores.iter().map(pick).sum::<f64>() / scores.len() as f64
    };
    assert!((row.avg_location_score - avg(|s| s.location_score)).abs() < 1e-9);
    assert!((row.avg_pressure_score - avg(|s| s.pressure_score)).abs() < 1e-9);
    assert!((row.avg_shot_type_score - avg(|s| s.shot_type_score)).abs() < 1e-9);
    assert!((row.avg_timing_score - avg(|s| s.timing_score)).abs() < 1e-9);
    assert!((row.avg_expected_value - avg(|s| s.expected_value)).abs() < 1e-9);
    assert!((row.avg_distance - avg(|s| s.distance_to_goal)).abs() < 1e-9);
    assert!((row.avg_angle - avg(|s| s.shot_angle)).abs() < 1e-9);
}

#[test]
fn ordering_is_descending_with_stable_ties() {
    let params = ScoringParams::default();
    // Three players; 30 and 31 take identical shots, so their SDQ ties and
    // first-seen order must survive the sort.
    let shots = vec![
        shot(30, 95.0, 30.0),
        shot(30, 95.0, 30.0),
        shot(31, 95.0, 30.0),
        shot(31, 95.0, 30.0),
        shot(32, 112.0, 40.0),
        shot(32, 112.0, 40.0),
    ];
    let rows = build_leaderboard(&params, &shots, 2);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].player_id, 32);
    assert_eq!(rows[1].player_id, 30);
    assert_eq!(rows[2].player_id, 31);
    assert!(rows[0].overall_sdq >= rows[1].overall_sdq);
    assert_eq!(rows[1].overall_sdq, rows[2].overall_sdq);
}

#[test]
fn score_all_is_one_to_one_with_input() {
    let params = ScoringParams::default();
    let shots: Vec<ShotEvent> = (0..100u64)
        .map(|i| shot(i % 7, 60.0 + (i as f64) * 0.5, (i as f64) % 80.0))
        .collect();
    let scores = score_all(&params, &shots);
    assert_eq!(scores.len(), shots.len());
    for (score, event) in scores.iter().zip(&shots) {
        assert_eq!(*score, params.score(event));
    }
}

#[test]
fn shots_toward_either_goal_aggregate_together() {
    let params = ScoringParams::default();
    // Same player shoots in both halves; both count on the same row and
    // the box count uses goal-relative distance.
    let shots = vec![shot(11, 110.0, 40.0), shot(11, 10.0, 40.0)];
    let rows = build_leaderboard(&params, &shots, 2);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].shots_in_box, 2);
}
