use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::sdq::{ShotEvent, ShotOutcome, ShotScore};
use crate::state::LeaderboardRow;

pub struct ExportReport {
    pub players: usize,
    pub shots: usize,
}

/// Default export filename, timestamped so repeated exports never clobber.
pub fn default_export_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("sdq_leaderboard_{stamp}.xlsx"))
}

/// Write the leaderboard and the per-shot score table to one workbook.
pub fn export_workbook(
    path: &Path,
    rows: &[LeaderboardRow],
    shots: &[(ShotEvent, ShotScore)],
) -> Result<ExportReport> {
    let mut leaderboard_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Team".to_string(),
        "Position".to_string(),
        "Shots".to_string(),
        "Goals".to_string(),
        "Conv %".to_string(),
        "Overall SDQ".to_string(),
        "SDQ Median".to_string(),
        "SDQ StdDev".to_string(),
        "Consistency".to_string(),
        "Avg Location".to_string(),
        "Avg Pressure".to_string(),
        "Avg Shot Type".to_string(),
        "Avg Timing".to_string(),
        "Avg xValue".to_string(),
        "Avg Distance".to_string(),
        "Avg Angle".to_string(),
        "Under Pressure".to_string(),
        "In Box".to_string(),
    ]];
    for row in rows {
        leaderboard_rows.push(leaderboard_row(row));
    }

    let mut shot_rows = vec![vec![
        "Player ID".to_string(),
        "Team ID".to_string(),
        "X".to_string(),
        "Y".to_string(),
        "Body Part".to_string(),
        "Pressure".to_string(),
        "Set Piece".to_string(),
        "SDQ".to_string(),
        "Location".to_string(),
        "Pressure Score".to_string(),
        "Shot Type".to_string(),
        "Timing".to_string(),
        "xValue".to_string(),
        "Distance".to_string(),
        "Angle".to_string(),
        "Outcome".to_string(),
    ]];
    for (event, score) in shots {
        shot_rows.push(shot_row(event, score));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Leaderboard")?;
        write_rows(sheet, &leaderboard_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shots")?;
        write_rows(sheet, &shot_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: rows.len(),
        shots: shots.len(),
    })
}

fn leaderboard_row(row: &LeaderboardRow) -> Vec<String> {
    let s = &row.summary;
    vec![
        s.player_id.to_string(),
        row.player_name.clone(),
        row.team_name.clone(),
        row.position.clone(),
        s.total_shots.to_string(),
        s.goals.to_string(),
        format!("{:.1}", s.conversion_rate_pct),
        format!("{:.2}", s.overall_sdq),
        format!("{:.2}", s.sdq_median),
        format!("{:.2}", s.sdq_std_dev),
        format!("{:.2}", s.consistency),
        format!("{:.2}", s.avg_location_score),
        format!("{:.2}", s.avg_pressure_score),
        format!("{:.2}", s.avg_shot_type_score),
        format!("{:.2}", s.avg_timing_score),
        format!("{:.2}", s.avg_expected_value),
        format!("{:.1}", s.avg_distance),
        format!("{:.1}", s.avg_angle),
        s.shots_under_pressure.to_string(),
        s.shots_in_box.to_string(),
    ]
}

fn shot_row(event: &ShotEvent, score: &ShotScore) -> Vec<String> {
    vec![
        event.player_id.to_string(),
        event.team_id.to_string(),
        format!("{:.1}", event.x),
        format!("{:.1}", event.y),
        event.body_part.label().to_string(),
        yes_no(event.under_pressure),
        yes_no(event.set_piece),
        format!("{:.2}", score.sdq),
        format!("{:.2}", score.location_score),
        format!("{:.2}", score.pressure_score),
        format!("{:.2}", score.shot_type_score),
        format!("{:.2}", score.timing_score),
        format!("{:.2}", score.expected_value),
        format!("{:.1}", score.distance_to_goal),
        format!("{:.1}", score.shot_angle),
        match score.outcome {
            ShotOutcome::Goal => "GOAL".to_string(),
            ShotOutcome::NoGoal => "NO_GOAL".to_string(),
        },
    ]
}

fn yes_no(value: bool) -> String {
    if value { "yes".to_string() } else { "no".to_string() }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
