use std::path::PathBuf;

use sdq_terminal::export;
use sdq_terminal::leaderboard;
use sdq_terminal::sdq::ScoringParams;
use sdq_terminal::state;
use sdq_terminal::{demo_feed, open_data};

/// Headless leaderboard export: `export_leaderboard [out.xlsx] [min_shots]`.
fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(export::default_export_path);
    let min_shots = std::env::args()
        .nth(2)
        .and_then(|raw| raw.parse::<usize>().ok())
        .or_else(|| {
            std::env::var("SDQ_MIN_SHOTS")
                .ok()
                .and_then(|raw| raw.parse::<usize>().ok())
        })
        .unwrap_or(3)
        .max(1);

    let demo = matches!(
        std::env::var("SDQ_DEMO").unwrap_or_default().trim(),
        "1" | "true" | "on" | "yes"
    );

    let fetch = if demo {
        println!("demo mode: generating shot table");
        demo_feed::demo_shots(42)
    } else {
        let cid = open_data::competition_id();
        println!("loading competition {cid} from open data");
        let fetch = open_data::fetch_competition_shots(cid);
        for err in &fetch.errors {
            eprintln!("warning: {err}");
        }
        if fetch.shots.is_empty() {
            println!("no shots loaded; falling back to demo data");
            demo_feed::demo_shots(42)
        } else {
            println!(
                "loaded {} shots from {} matches",
                fetch.shots.len(),
                fetch.matches_loaded
            );
            fetch
        }
    };

    let params = ScoringParams::default();
    let summaries = leaderboard::build_leaderboard(&params, &fetch.shots, min_shots);
    println!("{} players with at least {min_shots} shots", summaries.len());

    let scores = leaderboard::score_all(&params, &fetch.shots);
    let shots: Vec<_> = fetch.shots.iter().cloned().zip(scores).collect();
    let rows = state::build_rows(&fetch, summaries);

    let report = export::export_workbook(&path, &rows, &shots)?;
    println!(
        "wrote {} players / {} shots to {}",
        report.players,
        report.shots,
        path.display()
    );
    Ok(())
}
