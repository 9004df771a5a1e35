use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::leaderboard::PlayerSummary;
use crate::open_data::{ShotFetch, position_label};
use crate::sdq::{ShotEvent, ShotScore};

const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Leaderboard,
    PlayerDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    OverallSdq,
    ExpectedValue,
    ConversionRate,
    TotalShots,
    Consistency,
}

pub fn sort_label(sort: SortMode) -> &'static str {
    match sort {
        SortMode::OverallSdq => "SDQ",
        SortMode::ExpectedValue => "xValue",
        SortMode::ConversionRate => "Conv%",
        SortMode::TotalShots => "Shots",
        SortMode::Consistency => "Consistency",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    OpenData,
    Demo,
}

pub fn source_label(source: DataSource) -> &'static str {
    match source {
        DataSource::OpenData => "IMPECT OPEN DATA",
        DataSource::Demo => "DEMO",
    }
}

/// One leaderboard table row: the core's numeric summary plus the
/// display-side metadata joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub summary: PlayerSummary,
    pub player_name: String,
    pub team_name: String,
    pub position: String,
}

/// Join player/team names (with the documented fallbacks) and the distance
/// heuristic position label onto the summary rows.
pub fn build_rows(fetch: &ShotFetch, summaries: Vec<PlayerSummary>) -> Vec<LeaderboardRow> {
    let team_by_player: HashMap<u64, u64> = fetch
        .shots
        .iter()
        .map(|shot| (shot.player_id, shot.team_id))
        .collect();

    summaries
        .into_iter()
        .map(|summary| {
            let player_name = fetch
                .players
                .get(&summary.player_id)
                .cloned()
                .unwrap_or_else(|| format!("Player {}", summary.player_id));
            let team_name = team_by_player
                .get(&summary.player_id)
                .and_then(|team_id| fetch.teams.get(team_id))
                .cloned()
                .unwrap_or_else(|| "-".to_string());
            let position = position_label(summary.avg_distance).to_string();
            LeaderboardRow {
                summary,
                player_name,
                team_name,
                position,
            }
        })
        .collect()
}

/// Messages from the background loader thread to the UI.
pub enum Delta {
    Log(String),
    Loaded {
        source: DataSource,
        rows: Vec<LeaderboardRow>,
        shots_by_player: HashMap<u64, Vec<(ShotEvent, ShotScore)>>,
    },
}

pub struct AppState {
    pub screen: Screen,
    pub rows: Vec<LeaderboardRow>,
    pub shots_by_player: HashMap<u64, Vec<(ShotEvent, ShotScore)>>,
    pub selected: usize,
    pub sort: SortMode,
    pub source: Option<DataSource>,
    pub loading: bool,
    pub min_shots: usize,
    pub help_overlay: bool,
    pub log: VecDeque<String>,
}

impl AppState {
    pub fn new(min_shots: usize) -> Self {
        Self {
            screen: Screen::Leaderboard,
            rows: Vec::new(),
            shots_by_player: HashMap::new(),
            selected: 0,
            sort: SortMode::OverallSdq,
            source: None,
            loading: true,
            min_shots,
            help_overlay: false,
            log: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.log.len() >= LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line.into());
    }

    /// Rows in the current sort order. The aggregator already returns SDQ
    /// order; other modes re-sort a view without touching the data.
    pub fn sorted_rows(&self) -> Vec<&LeaderboardRow> {
        let mut rows: Vec<&LeaderboardRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            sort_key(b, self.sort)
                .partial_cmp(&sort_key(a, self.sort))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    pub fn selected_row(&self) -> Option<&LeaderboardRow> {
        self.sorted_rows().get(self.selected).copied()
    }

    pub fn selected_player_id(&self) -> Option<u64> {
        self.selected_row().map(|row| row.summary.player_id)
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1).min(self.rows.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            SortMode::OverallSdq => SortMode::ExpectedValue,
            SortMode::ExpectedValue => SortMode::ConversionRate,
            SortMode::ConversionRate => SortMode::TotalShots,
            SortMode::TotalShots => SortMode::Consistency,
            SortMode::Consistency => SortMode::OverallSdq,
        };
        self.selected = 0;
    }
}

fn sort_key(row: &LeaderboardRow, sort: SortMode) -> f64 {
    let s = &row.summary;
    match sort {
        SortMode::OverallSdq => s.overall_sdq,
        SortMode::ExpectedValue => s.avg_expected_value,
        SortMode::ConversionRate => s.conversion_rate_pct,
        SortMode::TotalShots => s.total_shots as f64,
        SortMode::Consistency => s.consistency,
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Log(line) => state.push_log(line),
        Delta::Loaded {
            source,
            rows,
            shots_by_player,
        } => {
            state.source = Some(source);
            state.rows = rows;
            state.shots_by_player = shots_by_player;
            state.loading = false;
            state.selected = 0;
        }
    }
}
