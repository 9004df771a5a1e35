//! Deterministic synthetic shot table for offline use. Stands behind the
//! same types as the open-data loader so the UI and export paths cannot
//! tell the difference.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::open_data::ShotFetch;
use crate::sdq::{BodyPart, ShotEvent};

const DEMO_TEAMS: &[&str] = &[
    "Bayern Munich",
    "Borussia Dortmund",
    "RB Leipzig",
    "Bayer Leverkusen",
    "Union Berlin",
    "SC Freiburg",
];

const PLAYERS_PER_TEAM: usize = 8;

/// Build a reproducible demo competition. Same seed, same table.
pub fn demo_shots(seed: u64) -> ShotFetch {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut players: HashMap<u64, String> = HashMap::new();
    let mut teams: HashMap<u64, String> = HashMap::new();
    let mut shots: Vec<ShotEvent> = Vec::new();

    for (team_idx, team_name) in DEMO_TEAMS.iter().enumerate() {
        let team_id = 100 + team_idx as u64;
        teams.insert(team_id, (*team_name).to_string());

        for slot in 0..PLAYERS_PER_TEAM {
            let player_id = team_id * 100 + slot as u64;
            players.insert(player_id, format!("Demo Player {player_id}"));

            // Forwards in the low slots shoot more and from closer in.
            let forward = slot < 4;
            let shot_count = if forward {
                rng.gen_range(6..26)
            } else {
                rng.gen_range(2..10)
            };

            for _ in 0..shot_count {
                shots.push(demo_shot(&mut rng, player_id, team_id, forward));
            }
        }
    }

    ShotFetch {
        shots,
        players,
        teams,
        matches_loaded: 0,
        errors: Vec::new(),
    }
}

fn demo_shot(rng: &mut StdRng, player_id: u64, team_id: u64, forward: bool) -> ShotEvent {
    // Everyone attacks the x=120 goal; the scorer only cares about the
    // goal-relative distance anyway.
    let depth: f64 = if forward {
        rng.gen_range(2.0..24.0)
    } else {
        rng.gen_range(12.0..40.0)
    };
    let x = 120.0 - depth;
    let y = rng.gen_range(18.0..62.0);

    let body_part = match rng.gen_range(0..10) {
        0..=4 => BodyPart::RightFoot,
        5..=7 => BodyPart::LeftFoot,
        8 => BodyPart::Head,
        _ => BodyPart::Other,
    };

    let under_pressure = rng.gen_bool(0.35);
    let set_piece = rng.gen_bool(0.15);

    // Close shots go in more often; a crude stand-in for real outcomes.
    let goal_odds: f64 = (0.45 - depth * 0.01).clamp(0.02, 0.45);
    let is_goal = rng.gen_bool(goal_odds);

    ShotEvent {
        x,
        y,
        body_part,
        under_pressure,
        set_piece,
        counter_attack: false,
        is_goal,
        player_id,
        team_id,
    }
}
