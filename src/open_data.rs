//! Loader for the ImpectAPI `open-data` GitHub repository.
//!
//! Downloads match, player, squad and event JSON for one competition and
//! materializes the flat shot table the scoring core consumes. Events are
//! expected already normalized to the StatsBomb 120x80 coordinate frame;
//! missing optional fields default here, at parse time, never in the core.

use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Deserialize;

use crate::net::{fetch_json_cached, http_client};
use crate::sdq::{BodyPart, ShotEvent};

const OPEN_DATA_BASE: &str = "https://raw.githubusercontent.com/ImpectAPI/open-data/main";

/// Bundesliga 2023/24, the competition the original analysis shipped with.
pub const DEFAULT_COMPETITION_ID: u32 = 743;

pub fn competition_id() -> u32 {
    env::var("SDQ_COMPETITION_ID")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
        .unwrap_or(DEFAULT_COMPETITION_ID)
}

/// Result of a full competition load. Per-match failures are collected,
/// never fatal: a partial shot table is still useful.
pub struct ShotFetch {
    pub shots: Vec<ShotEvent>,
    pub players: HashMap<u64, String>,
    pub teams: HashMap<u64, String>,
    pub matches_loaded: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MatchRow {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    id: u64,
    #[serde(default)]
    commonname: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SquadRow {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(default)]
    event_type: String,
    #[serde(default)]
    coordinates_x: f64,
    #[serde(default)]
    coordinates_y: f64,
    #[serde(default)]
    body_part_type: Option<String>,
    #[serde(default)]
    is_under_pressure: Option<bool>,
    #[serde(default)]
    set_piece_type: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    player_id: Option<u64>,
    #[serde(default)]
    team_id: Option<u64>,
}

/// Fetch every shot in the competition, plus name metadata for display.
pub fn fetch_competition_shots(cid: u32) -> ShotFetch {
    let mut errors = Vec::new();

    let players = match fetch_player_names(cid) {
        Ok(map) => map,
        Err(err) => {
            errors.push(format!("players fetch failed: {err}"));
            HashMap::new()
        }
    };
    let teams = match fetch_team_names(cid) {
        Ok(map) => map,
        Err(err) => {
            errors.push(format!("squads fetch failed: {err}"));
            HashMap::new()
        }
    };

    let match_ids = match fetch_match_ids(cid) {
        Ok(ids) => ids,
        Err(err) => {
            errors.push(format!("match list fetch failed: {err}"));
            return ShotFetch {
                shots: Vec::new(),
                players,
                teams,
                matches_loaded: 0,
                errors,
            };
        }
    };

    let results: Vec<Result<Vec<ShotEvent>, String>> = with_fetch_pool(|| {
        match_ids
            .par_iter()
            .map(|mid| {
                fetch_match_shots(cid, *mid).map_err(|err| format!("match {mid}: {err}"))
            })
            .collect()
    });

    let mut shots = Vec::new();
    let mut matches_loaded = 0usize;
    for result in results {
        match result {
            Ok(match_shots) => {
                matches_loaded += 1;
                shots.extend(match_shots);
            }
            Err(err) => errors.push(err),
        }
    }

    ShotFetch {
        shots,
        players,
        teams,
        matches_loaded,
        errors,
    }
}

pub fn fetch_match_ids(cid: u32) -> Result<Vec<u64>> {
    let client = http_client()?;
    let url = format!("{OPEN_DATA_BASE}/data/matches/matches_{cid}.json");
    let body = fetch_json_cached(client, &url).context("match list request failed")?;
    parse_match_ids_json(&body)
}

pub fn fetch_match_shots(cid: u32, match_id: u64) -> Result<Vec<ShotEvent>> {
    let client = http_client()?;
    let url = format!("{OPEN_DATA_BASE}/data/events/{cid}/{match_id}.json");
    let body = fetch_json_cached(client, &url).context("events request failed")?;
    parse_shot_events_json(&body)
}

fn fetch_player_names(cid: u32) -> Result<HashMap<u64, String>> {
    let client = http_client()?;
    let url = format!("{OPEN_DATA_BASE}/data/players/players_{cid}.json");
    let body = fetch_json_cached(client, &url).context("players request failed")?;
    parse_player_names_json(&body)
}

fn fetch_team_names(cid: u32) -> Result<HashMap<u64, String>> {
    let client = http_client()?;
    let url = format!("{OPEN_DATA_BASE}/data/squads/squads_{cid}.json");
    let body = fetch_json_cached(client, &url).context("squads request failed")?;
    parse_team_names_json(&body)
}

pub fn parse_match_ids_json(raw: &str) -> Result<Vec<u64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<MatchRow> = serde_json::from_str(trimmed).context("invalid matches json")?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}

pub fn parse_player_names_json(raw: &str) -> Result<HashMap<u64, String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(HashMap::new());
    }
    let rows: Vec<PlayerRow> = serde_json::from_str(trimmed).context("invalid players json")?;
    let mut out = HashMap::with_capacity(rows.len());
    for row in rows {
        let name = row
            .commonname
            .or(row.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Player {}", row.id));
        out.insert(row.id, name);
    }
    Ok(out)
}

pub fn parse_team_names_json(raw: &str) -> Result<HashMap<u64, String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(HashMap::new());
    }
    let rows: Vec<SquadRow> = serde_json::from_str(trimmed).context("invalid squads json")?;
    Ok(rows.into_iter().map(|row| (row.id, row.name)).collect())
}

/// Parse one match's event array and keep only SHOT rows, converting the
/// loosely-typed records into `ShotEvent` with the interface defaults.
pub fn parse_shot_events_json(raw: &str) -> Result<Vec<ShotEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<EventRow> = serde_json::from_str(trimmed).context("invalid events json")?;
    Ok(rows
        .into_iter()
        .filter(|row| row.event_type.eq_ignore_ascii_case("SHOT"))
        .map(shot_from_event)
        .collect())
}

fn shot_from_event(row: EventRow) -> ShotEvent {
    ShotEvent {
        x: row.coordinates_x,
        y: row.coordinates_y,
        body_part: body_part_from_tag(row.body_part_type.as_deref()),
        under_pressure: row.is_under_pressure.unwrap_or(false),
        // Presence of any set-piece tag marks the shot as a set piece.
        set_piece: row
            .set_piece_type
            .as_deref()
            .is_some_and(|tag| !tag.trim().is_empty()),
        counter_attack: false,
        is_goal: row.success.unwrap_or(false),
        player_id: row.player_id.unwrap_or(0),
        team_id: row.team_id.unwrap_or(0),
    }
}

fn body_part_from_tag(tag: Option<&str>) -> BodyPart {
    match tag {
        None => BodyPart::RightFoot,
        Some(raw) => match raw.trim().to_ascii_uppercase().as_str() {
            "" | "RIGHT_FOOT" => BodyPart::RightFoot,
            "LEFT_FOOT" => BodyPart::LeftFoot,
            "HEAD" => BodyPart::Head,
            _ => BodyPart::Other,
        },
    }
}

/// Display-side position guess from shooting distance. The open data has no
/// real position information; forwards shoot closer. Not ground truth.
pub fn position_label(avg_distance: f64) -> &'static str {
    if avg_distance < 18.0 { "Forward" } else { "Midfielder" }
}

fn with_fetch_pool<T>(action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let threads = fetch_parallelism();
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(6)
        .clamp(2, 32)
}
