use std::collections::HashMap;
use std::env;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

mod demo_feed;
mod export;
mod leaderboard;
mod net;
mod open_data;
mod sdq;
mod state;

use crate::sdq::{ScoringParams, ShotEvent, ShotScore};
use crate::state::{
    AppState, DataSource, Delta, Screen, apply_delta, sort_label, source_label,
};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(min_shots: usize) -> Self {
        Self {
            state: AppState::new(min_shots),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<Delta>) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => {
                if self.state.screen == Screen::Leaderboard {
                    self.state.cycle_sort();
                }
            }
            KeyCode::Char('d') | KeyCode::Enter => {
                if self.state.selected_player_id().is_some() {
                    self.state.screen = Screen::PlayerDetail;
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Leaderboard,
            KeyCode::Char('e') => self.export_workbook(),
            KeyCode::Char('r') => {
                self.state.loading = true;
                self.state.push_log("[INFO] Reloading shot data");
                spawn_loader(tx.clone(), self.state.min_shots);
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn export_workbook(&mut self) {
        if self.state.rows.is_empty() {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        }
        let rows: Vec<state::LeaderboardRow> =
            self.state.sorted_rows().into_iter().cloned().collect();
        let shots: Vec<(ShotEvent, ShotScore)> = self
            .state
            .shots_by_player
            .values()
            .flat_map(|group| group.iter().cloned())
            .collect();
        let path = export::default_export_path();
        match export::export_workbook(&path, &rows, &shots) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} players / {} shots to {}",
                report.players,
                report.shots,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err}")),
        }
    }
}

fn min_shots_from_env() -> usize {
    env::var("SDQ_MIN_SHOTS")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(3)
        .max(1)
}

fn demo_mode_from_env() -> bool {
    matches!(
        env::var("SDQ_DEMO").unwrap_or_default().trim(),
        "1" | "true" | "on" | "yes"
    )
}

/// Load shots in the background and hand the finished leaderboard to the UI.
fn spawn_loader(tx: mpsc::Sender<Delta>, min_shots: usize) {
    thread::spawn(move || {
        let params = ScoringParams::default();

        let (fetch, source) = if demo_mode_from_env() {
            let _ = tx.send(Delta::Log("[INFO] Demo mode: generating shots".to_string()));
            (demo_feed::demo_shots(42), DataSource::Demo)
        } else {
            let cid = open_data::competition_id();
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Loading competition {cid} from open data"
            )));
            let fetch = open_data::fetch_competition_shots(cid);
            for err in fetch.errors.iter().take(5) {
                let _ = tx.send(Delta::Log(format!("[WARN] {err}")));
            }
            if fetch.errors.len() > 5 {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] {} further fetch errors suppressed",
                    fetch.errors.len() - 5
                )));
            }
            if fetch.shots.is_empty() {
                let _ = tx.send(Delta::Log(
                    "[WARN] No shots loaded; falling back to demo data".to_string(),
                ));
                (demo_feed::demo_shots(42), DataSource::Demo)
            } else {
                let _ = tx.send(Delta::Log(format!(
                    "[INFO] Loaded {} shots from {} matches",
                    fetch.shots.len(),
                    fetch.matches_loaded
                )));
                (fetch, DataSource::OpenData)
            }
        };

        let summaries = leaderboard::build_leaderboard(&params, &fetch.shots, min_shots);
        let _ = tx.send(Delta::Log(format!(
            "[INFO] {} players with at least {min_shots} shots",
            summaries.len()
        )));

        let scores = leaderboard::score_all(&params, &fetch.shots);
        let mut shots_by_player: HashMap<u64, Vec<(ShotEvent, ShotScore)>> = HashMap::new();
        for (shot, score) in fetch.shots.iter().zip(scores) {
            shots_by_player
                .entry(shot.player_id)
                .or_default()
                .push((shot.clone(), score));
        }

        let rows = state::build_rows(&fetch, summaries);
        let _ = tx.send(Delta::Loaded {
            source,
            rows,
            shots_by_player,
        });
    });
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let min_shots = min_shots_from_env();
    spawn_loader(tx.clone(), min_shots);

    let mut app = App::new(min_shots);
    let res = run_app(&mut terminal, &mut app, tx, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tx: mpsc::Sender<Delta>,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key, &tx);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Leaderboard => render_leaderboard(frame, chunks[1], &app.state),
        Screen::PlayerDetail => render_player_detail(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let source = state
        .source
        .map(source_label)
        .unwrap_or(if state.loading { "LOADING..." } else { "NO DATA" });
    let title = match state.screen {
        Screen::Leaderboard => format!(
            "SDQ LEADERBOARD | {} | Sort: {} | Min shots: {}",
            source,
            sort_label(state.sort),
            state.min_shots
        ),
        Screen::PlayerDetail => format!("SDQ PLAYER DETAIL | {source}"),
    };
    let status = state.log.back().map(String::as_str).unwrap_or("");
    format!("  (o) {title}\n      {status}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Leaderboard => {
            "Enter/d Detail | j/k/Up/Down Move | s Sort | e Export | r Reload | ? Help | q Quit"
                .to_string()
        }
        Screen::PlayerDetail => "b/Esc Back | e Export | ? Help | q Quit".to_string(),
    }
}

fn leaderboard_columns() -> [Constraint; 9] {
    [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Min(16),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(12),
    ]
}

fn render_leaderboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = leaderboard_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let titles = [
        "#", "Player", "Team", "Pos", "Shots", "Goals", "Conv%", "SDQ", "Consistency",
    ];
    for (col, title) in header_cols.iter().zip(titles) {
        let cell = Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(cell, *col);
    }

    let list_area = sections[1];
    let rows = state.sorted_rows();
    if rows.is_empty() {
        let message = if state.loading {
            "Loading shot data..."
        } else {
            "No players meet the minimum shot count"
        };
        let empty = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let row = rows[idx];
        let s = &row.summary;
        let cells = [
            format!("{}", idx + 1),
            row.player_name.clone(),
            row.team_name.clone(),
            row.position.clone(),
            s.total_shots.to_string(),
            s.goals.to_string(),
            format!("{:.1}", s.conversion_rate_pct),
            format!("{:.1}", s.overall_sdq),
            format!("{:.1}", s.consistency),
        ];
        for (col, cell) in cols.iter().zip(cells) {
            frame.render_widget(Paragraph::new(cell).style(row_style), *col);
        }
    }
}

fn render_player_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(row) = state.selected_row() else {
        let empty =
            Paragraph::new("No player selected").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };
    let s = &row.summary;

    let mut lines = vec![
        format!(
            "{} | {} | {} | {} shots, {} goals ({:.1}%)",
            row.player_name, row.team_name, row.position, s.total_shots, s.goals,
            s.conversion_rate_pct
        ),
        String::new(),
        format!(
            "Overall SDQ {:.1}  median {:.1}  stddev {:.1}  consistency {:.1}",
            s.overall_sdq, s.sdq_median, s.sdq_std_dev, s.consistency
        ),
        format!(
            "Components: location {:.1}  pressure {:.1}  shot type {:.1}  timing {:.1}  xValue {:.1}",
            s.avg_location_score,
            s.avg_pressure_score,
            s.avg_shot_type_score,
            s.avg_timing_score,
            s.avg_expected_value
        ),
        format!(
            "Avg distance {:.1}  avg angle {:.1}  under pressure {}  in box {}",
            s.avg_distance, s.avg_angle, s.shots_under_pressure, s.shots_in_box
        ),
        String::new(),
        "Shots (x, y, body part, SDQ, xValue, outcome):".to_string(),
    ];

    if let Some(shots) = state.shots_by_player.get(&s.player_id) {
        for (event, score) in shots {
            lines.push(format!(
                "  ({:5.1}, {:4.1})  {:<10}  SDQ {:5.1}  xV {:5.1}  {}",
                event.x,
                event.y,
                event.body_part.label(),
                score.sdq,
                score.expected_value,
                match score.outcome {
                    sdq::ShotOutcome::Goal => "GOAL",
                    sdq::ShotOutcome::NoGoal => "-",
                }
            ));
        }
    }

    let body = Paragraph::new(lines.join("\n"));
    frame.render_widget(body, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(64);
    let height = area.height.min(12);
    let overlay = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, overlay);
    let text = [
        "SDQ Terminal",
        "",
        "j/k, Up/Down  move selection",
        "s             cycle leaderboard sort",
        "Enter/d       open player detail",
        "b/Esc         back to leaderboard",
        "e             export xlsx workbook",
        "r             reload shot data",
        "?             toggle this help",
        "q             quit",
    ]
    .join("\n");
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(help, overlay);
}

fn visible_range(selected: usize, len: usize, visible: usize) -> (usize, usize) {
    if visible == 0 || len == 0 {
        return (0, 0);
    }
    if len <= visible {
        return (0, len);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(len - visible);
    (start, start + visible)
}
