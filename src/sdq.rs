use serde::{Deserialize, Serialize};

const PITCH_LENGTH: f64 = 120.0;
const PITCH_WIDTH: f64 = 80.0;
const GOAL_WIDTH: f64 = 8.0;

/// Which body part struck the shot. Unknown parts map to `Other`
/// at load time; a missing field maps to `RightFoot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPart {
    RightFoot,
    LeftFoot,
    Head,
    Other,
}

impl BodyPart {
    pub fn is_foot(self) -> bool {
        matches!(self, BodyPart::RightFoot | BodyPart::LeftFoot)
    }

    pub fn label(self) -> &'static str {
        match self {
            BodyPart::RightFoot => "Right foot",
            BodyPart::LeftFoot => "Left foot",
            BodyPart::Head => "Head",
            BodyPart::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Goal,
    NoGoal,
}

/// One shot event, already normalized to the StatsBomb 120x80 frame.
/// Coordinate range is the caller's responsibility; scoring never fails
/// on out-of-range values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotEvent {
    pub x: f64,
    pub y: f64,
    pub body_part: BodyPart,
    pub under_pressure: bool,
    pub set_piece: bool,
    /// Carried for interface completeness; no current data source sets it.
    pub counter_attack: bool,
    pub is_goal: bool,
    pub player_id: u64,
    pub team_id: u64,
}

/// Full score bundle for one shot. `expected_value` is informational and
/// not part of the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotScore {
    pub sdq: f64,
    pub location_score: f64,
    pub timing_score: f64,
    pub pressure_score: f64,
    pub shot_type_score: f64,
    pub expected_value: f64,
    pub distance_to_goal: f64,
    pub shot_angle: f64,
    pub outcome: ShotOutcome,
}

/// Distance bands from goal, on the goal-relative x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneThresholds {
    pub six_yard_box: f64,
    pub penalty_box: f64,
    pub danger_zone: f64,
    pub edge_of_box: f64,
    pub long_range: f64,
}

/// Composite weights. Fixed design constants; must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdqWeights {
    pub location: f64,
    pub pressure: f64,
    pub shot_type: f64,
    pub timing: f64,
}

/// Immutable scoring configuration. One instance serves any number of
/// shots; nothing here is ever mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub zones: ZoneThresholds,
    pub weights: SdqWeights,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            zones: ZoneThresholds {
                six_yard_box: 6.0,
                penalty_box: 18.0,
                danger_zone: 24.0,
                edge_of_box: 30.0,
                long_range: 45.0,
            },
            weights: SdqWeights {
                location: 0.40,
                pressure: 0.25,
                shot_type: 0.20,
                timing: 0.15,
            },
        }
    }
}

impl ScoringParams {
    /// Score one shot. Pure and total: every input yields a full bundle.
    pub fn score(&self, shot: &ShotEvent) -> ShotScore {
        let location_score = self.location_score(shot.x, shot.y);
        let distance = distance_to_goal(shot.x, shot.y);
        let angle = shot_angle(shot.x, shot.y);

        let timing_score = self.timing_score(shot.counter_attack, shot.set_piece);
        let pressure_score = self.pressure_score(shot.under_pressure);
        let shot_type_score = self.shot_type_score(shot.body_part, shot.x, angle);
        let expected_value = self.expected_value(location_score, shot.x, angle);

        let w = self.weights;
        let sdq = location_score * w.location
            + pressure_score * w.pressure
            + shot_type_score * w.shot_type
            + timing_score * w.timing;

        ShotScore {
            sdq,
            location_score,
            timing_score,
            pressure_score,
            shot_type_score,
            expected_value,
            distance_to_goal: distance,
            shot_angle: angle,
            outcome: if shot.is_goal {
                ShotOutcome::Goal
            } else {
                ShotOutcome::NoGoal
            },
        }
    }

    pub fn location_score(&self, x: f64, y: f64) -> f64 {
        let z = &self.zones;
        let d = x_from_goal(x);

        let distance_score = if d <= z.six_yard_box {
            100.0
        } else if d <= z.penalty_box {
            90.0 - (d - z.six_yard_box) * 1.5
        } else if d <= z.danger_zone {
            75.0 - (d - z.penalty_box) * 2.5
        } else if d <= z.edge_of_box {
            60.0 - (d - z.danger_zone) * 2.0
        } else if d <= z.long_range {
            40.0 - (d - z.edge_of_box) * 1.5
        } else {
            (40.0 - (d - z.long_range) * 1.5).max(10.0)
        };

        let angle = shot_angle(x, y);
        let angle_score = if angle >= 25.0 {
            100.0
        } else if angle >= 15.0 {
            80.0 + (angle - 15.0) * 2.0
        } else if angle >= 8.0 {
            60.0 + (angle - 8.0) * 2.86
        } else {
            40.0 + angle * 2.5
        };

        // Shots from the central channel are worth more than wide ones
        // at the same depth.
        let central_bonus = if (y - PITCH_WIDTH / 2.0).abs() < 8.0 {
            1.1
        } else {
            1.0
        };

        ((distance_score * 0.7 + angle_score * 0.3) * central_bonus).min(100.0)
    }

    pub fn timing_score(&self, counter_attack: bool, set_piece: bool) -> f64 {
        let mut score: f64 = 70.0;
        if counter_attack {
            score += 20.0;
        }
        if set_piece {
            score += 10.0;
        }
        score.min(100.0)
    }

    pub fn pressure_score(&self, under_pressure: bool) -> f64 {
        if under_pressure { 60.0 } else { 85.0 }
    }

    pub fn shot_type_score(&self, body_part: BodyPart, x: f64, angle: f64) -> f64 {
        let z = &self.zones;
        let d = x_from_goal(x);

        let mut score: f64 = 70.0;
        if d <= z.six_yard_box {
            score = if body_part == BodyPart::Head { 90.0 } else { 85.0 };
        } else if d <= z.penalty_box {
            if body_part.is_foot() {
                score = 85.0;
            } else if body_part == BodyPart::Head {
                score = 80.0;
            }
        } else if d > z.edge_of_box {
            score = if body_part.is_foot() { 70.0 } else { 50.0 };
        }

        // A tight angle taken from outside the box is a poor decision.
        if angle < 8.0 && d > z.penalty_box {
            score -= 15.0;
        }

        score.min(100.0)
    }

    pub fn expected_value(&self, location_score: f64, x: f64, angle: f64) -> f64 {
        let z = &self.zones;
        let d = x_from_goal(x);

        let base_xg = if d <= z.six_yard_box {
            0.50
        } else if d <= z.penalty_box {
            0.25
        } else if d <= z.danger_zone {
            0.12
        } else if d <= z.edge_of_box {
            0.06
        } else {
            0.03
        };

        let angle_mult = if angle >= 20.0 {
            1.3
        } else if angle >= 10.0 {
            1.1
        } else if angle >= 5.0 {
            0.9
        } else {
            0.7
        };

        (base_xg * angle_mult * 150.0 + location_score * 0.3).min(100.0)
    }
}

/// Distance from the shot to its attacking goal line along x. Attacking
/// direction is inferred from the pitch half the shot was taken in.
pub fn x_from_goal(x: f64) -> f64 {
    if x >= PITCH_LENGTH / 2.0 { PITCH_LENGTH - x } else { x }
}

/// Euclidean distance to the near goal-mouth centre.
pub fn distance_to_goal(x: f64, y: f64) -> f64 {
    let goal_x = if x >= PITCH_LENGTH / 2.0 { PITCH_LENGTH } else { 0.0 };
    let goal_y = PITCH_WIDTH / 2.0;
    ((x - goal_x).powi(2) + (y - goal_y).powi(2)).sqrt()
}

/// Angle subtended at the shot location by the goal mouth, in degrees.
pub fn shot_angle(x: f64, y: f64) -> f64 {
    let goal_x = if x >= PITCH_LENGTH / 2.0 { PITCH_LENGTH } else { 0.0 };
    let goal_y_center = PITCH_WIDTH / 2.0;
    let post_half = GOAL_WIDTH / 2.0;

    let post_1_y = goal_y_center - post_half;
    let post_2_y = goal_y_center + post_half;

    let dx = (goal_x - x).abs();
    let angle_1 = (y - post_1_y).abs().atan2(dx);
    let angle_2 = (y - post_2_y).abs().atan2(dx);
    (angle_1 - angle_2).abs().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(x: f64, y: f64) -> ShotEvent {
        ShotEvent {
            x,
            y,
            body_part: BodyPart::RightFoot,
            under_pressure: false,
            set_piece: false,
            counter_attack: false,
            is_goal: false,
            player_id: 1,
            team_id: 1,
        }
    }

    #[test]
    fn x_from_goal_uses_near_goal() {
        assert_eq!(x_from_goal(116.0), 4.0);
        assert_eq!(x_from_goal(4.0), 4.0);
        assert_eq!(x_from_goal(60.0), 60.0);
    }

    #[test]
    fn six_yard_central_shot_hits_distance_band_max() {
        let params = ScoringParams::default();
        // 6 units out, dead centre: distance band is 100, the post-angle
        // difference degenerates to 0 (angle score 40), central bonus 1.1.
        let score = params.location_score(114.0, 40.0);
        let expect = (100.0 * 0.7 + 40.0 * 0.3) * 1.1;
        assert!((score - expect).abs() < 1e-9);
    }

    #[test]
    fn location_decays_with_distance() {
        let params = ScoringParams::default();
        let near = params.location_score(110.0, 40.0);
        let mid = params.location_score(96.0, 40.0);
        let far = params.location_score(70.0, 40.0);
        assert!(near > mid && mid > far);
    }

    #[test]
    fn pressure_is_binary() {
        let params = ScoringParams::default();
        assert_eq!(params.pressure_score(true), 60.0);
        assert_eq!(params.pressure_score(false), 85.0);
    }

    #[test]
    fn timing_caps_at_100() {
        let params = ScoringParams::default();
        assert_eq!(params.timing_score(false, false), 70.0);
        assert_eq!(params.timing_score(false, true), 80.0);
        assert_eq!(params.timing_score(true, false), 90.0);
        assert_eq!(params.timing_score(true, true), 100.0);
    }

    #[test]
    fn header_in_six_yard_box_beats_foot() {
        let params = ScoringParams::default();
        let angle = shot_angle(116.0, 40.0);
        let head = params.shot_type_score(BodyPart::Head, 116.0, angle);
        let foot = params.shot_type_score(BodyPart::RightFoot, 116.0, angle);
        assert_eq!(head, 90.0);
        assert_eq!(foot, 85.0);
    }

    #[test]
    fn tight_angle_from_distance_is_penalized() {
        let params = ScoringParams::default();
        // Well outside the box, near the touchline: angle collapses.
        let angle = shot_angle(85.0, 2.0);
        assert!(angle < 8.0);
        let score = params.shot_type_score(BodyPart::RightFoot, 85.0, angle);
        assert_eq!(score, 55.0);
    }

    #[test]
    fn composite_uses_fixed_weights() {
        let params = ScoringParams::default();
        let s = params.score(&shot(100.0, 30.0));
        let expect = s.location_score * 0.40
            + s.pressure_score * 0.25
            + s.shot_type_score * 0.20
            + s.timing_score * 0.15;
        assert!((s.sdq - expect).abs() < 1e-9);
    }

    #[test]
    fn expected_value_stays_informational_and_bounded() {
        let params = ScoringParams::default();
        for &(x, y) in &[(118.0, 40.0), (60.0, 0.0), (90.0, 79.0), (2.0, 41.0)] {
            let s = params.score(&shot(x, y));
            assert!((0.0..=100.0).contains(&s.expected_value));
        }
    }

    #[test]
    fn goal_outcome_is_copied() {
        let params = ScoringParams::default();
        let mut event = shot(110.0, 40.0);
        event.is_goal = true;
        assert_eq!(params.score(&event).outcome, ShotOutcome::Goal);
        event.is_goal = false;
        assert_eq!(params.score(&event).outcome, ShotOutcome::NoGoal);
    }
}
