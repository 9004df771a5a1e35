use sdq_terminal::sdq::{BodyPart, ScoringParams, ShotEvent, ShotOutcome, shot_angle};

fn shot(x: f64, y: f64) -> ShotEvent {
    ShotEvent {
        x,
        y,
        body_part: BodyPart::RightFoot,
        under_pressure: false,
        set_piece: false,
        counter_attack: false,
        is_goal: false,
        player_id: 9,
        team_id: 1,
    }
}

fn sample_grid() -> Vec<ShotEvent> {
    let mut shots = Vec::new();
    for &x in &[0.0, 6.0, 18.0, 45.0, 60.0, 75.0, 102.0, 114.0, 119.5, 120.0] {
        for &y in &[0.0, 8.0, 33.0, 40.0, 47.0, 72.0, 80.0] {
            for &(pressure, head, set_piece) in &[
                (false, false, false),
                (true, false, false),
                (false, true, true),
            ] {
                let mut s = shot(x, y);
                s.under_pressure = pressure;
                s.set_piece = set_piece;
                if head {
                    s.body_part = BodyPart::Head;
                }
                shots.push(s);
            }
        }
    }
    // Out-of-range coordinates must still produce bounded scores.
    shots.push(shot(-5.0, 40.0));
    shots.push(shot(130.0, -3.0));
    shots
}

#[test]
fn all_sub_scores_stay_in_bounds() {
    let params = ScoringParams::default();
    for event in sample_grid() {
        let s = params.score(&event);
        for value in [
            s.location_score,
            s.pressure_score,
            s.shot_type_score,
            s.timing_score,
            s.expected_value,
        ] {
            assert!(
                (0.0..=100.0).contains(&value),
                "out of bounds score {value} for shot at ({}, {})",
                event.x,
                event.y
            );
        }
    }
}

#[test]
fn composite_is_the_exact_weighted_sum() {
    let params = ScoringParams::default();
    for event in sample_grid() {
        let s = params.score(&event);
        let expect = 0.40 * s.location_score
            + 0.25 * s.pressure_score
            + 0.20 * s.shot_type_score
            + 0.15 * s.timing_score;
        assert!((s.sdq - expect).abs() < 1e-9);
    }
}

#[test]
fn close_central_shot_gets_band_max_and_bonus() {
    let params = ScoringParams::default();
    let s = params.score(&shot(116.0, 40.0));
    // x_from_goal = 4: distance component 100. Dead centre degenerates the
    // post-angle difference to 0 (angle score 40), and the central bonus
    // applies because |y - 40| < 8.
    let expect = (100.0 * 0.7 + 40.0 * 0.3) * 1.1;
    assert!((s.location_score - expect).abs() < 1e-9);
}

#[test]
fn pressure_flag_only_moves_the_pressure_score() {
    let params = ScoringParams::default();
    let calm = shot(104.0, 35.0);
    let mut pressed = calm.clone();
    pressed.under_pressure = true;

    let a = params.score(&calm);
    let b = params.score(&pressed);
    assert_eq!(a.pressure_score, 85.0);
    assert_eq!(b.pressure_score, 60.0);
    assert_eq!(a.location_score, b.location_score);
    assert_eq!(a.shot_type_score, b.shot_type_score);
    assert_eq!(a.timing_score, b.timing_score);
    assert_eq!(a.expected_value, b.expected_value);
}

#[test]
fn known_shot_scores_by_hand() {
    let params = ScoringParams::default();
    // Penalty spot depth, dead centre, under pressure:
    //   distance band 90 - 1.5 * 12 = 72, angle score 40, central bonus 1.1
    //   -> location 68.64; pressure 60; shot type 85 (foot, in box, the
    //   tight-angle penalty needs x_from_goal > 18); timing 70.
    let mut event = shot(102.0, 40.0);
    event.under_pressure = true;
    let s = params.score(&event);
    assert!((s.location_score - 68.64).abs() < 1e-9);
    assert_eq!(s.pressure_score, 60.0);
    assert_eq!(s.shot_type_score, 85.0);
    assert_eq!(s.timing_score, 70.0);
    let sdq = 0.40 * 68.64 + 0.25 * 60.0 + 0.20 * 85.0 + 0.15 * 70.0;
    assert!((s.sdq - sdq).abs() < 1e-9);
}

#[test]
fn scoring_is_idempotent() {
    let params = ScoringParams::default();
    for event in sample_grid() {
        assert_eq!(params.score(&event), params.score(&event));
    }
}

#[test]
fn mirrored_shots_score_identically() {
    let params = ScoringParams::default();
    for &(x, y) in &[(100.0, 30.0), (85.0, 62.0), (118.0, 40.0), (61.0, 5.0)] {
        let direct = params.score(&shot(x, y));
        let mirror = params.score(&shot(120.0 - x, y));
        assert_eq!(direct, mirror, "mirror mismatch at ({x}, {y})");
    }
}

#[test]
fn shot_angle_widens_toward_goal() {
    let near = shot_angle(108.0, 30.0);
    let far = shot_angle(80.0, 30.0);
    assert!(near > far);
}

#[test]
fn outcome_tracks_the_goal_flag() {
    let params = ScoringParams::default();
    let mut event = shot(110.0, 42.0);
    event.is_goal = true;
    assert_eq!(params.score(&event).outcome, ShotOutcome::Goal);
}
