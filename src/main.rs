use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use ditdah::app::{App, AppDeps, AppScreen};
use ditdah::audio::open_emitter;
use ditdah::clock::SystemClock;
use ditdah::config::Config;
use ditdah::engine::timing::TICK_STEP;
use ditdah::event::{AppEvent, EventHandler};
use ditdah::hint::provider_from_config;
use ditdah::morse::Symbol;
use ditdah::net;
use ditdah::session::trainer::Direction as TrainerDirection;
use ditdah::store::{json_store, open_store};
use ditdah::ui::components::challenge_area::ChallengeArea;
use ditdah::ui::components::level_list::LevelList;
use ditdah::ui::components::offline_warning::OfflineWarning;
use ditdah::ui::components::progress_bar::ProgressBar;
use ditdah::ui::components::trainer_panel::TrainerPanel;
use ditdah::ui::layout::{AppLayout, centered_rect, pack_hint_lines};

#[derive(Parser)]
#[command(name = "ditdah", version, about = "Terminal Morse code tutor with level progression")]
struct Cli {
    #[arg(short, long, help = "Theme name (dark, light)")]
    theme: Option<String>,

    #[arg(long, help = "Disable tone output")]
    no_audio: bool,

    #[arg(short, long, help = "Open the practice trainer directly")]
    practice: bool,

    #[arg(long, help = "Directory for saved progress and the log file")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Log at debug level")]
    verbose: bool,
}

fn init_logging(data_dir: &Path, verbose: bool) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let log_path = data_dir.join("ditdah.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(json_store::default_data_dir);
    if let Err(e) = init_logging(&data_dir, cli.verbose) {
        eprintln!("logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {e:#}");
        Config::default()
    });
    if cli.no_audio {
        config.audio_enabled = false;
    }

    let events = EventHandler::new(TICK_STEP);
    let deps = AppDeps {
        store: open_store(Some(data_dir)),
        emitter: open_emitter(config.audio_enabled, config.tone_volume),
        hint_provider: provider_from_config(&config),
        clock: Box::new(SystemClock),
        rng: SmallRng::from_entropy(),
    };
    net::spawn_monitor(
        net::PROBE_TARGET.to_string(),
        Duration::from_secs(config.connectivity_probe_secs),
        events.sender(),
    );

    let mut app = App::new(config, deps, events.sender());
    if let Some(theme_name) = cli.theme.as_deref() {
        app.apply_theme(theme_name);
    }
    if cli.practice {
        app.open_practice();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("exiting after error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Resize(_, _) => {}
            other => {
                app.handle_event(other);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events; Repeat would inflate symbol input
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('r') if app.screen == AppScreen::Trainer => app.trainer_replay(),
            KeyCode::Char('a') if app.screen == AppScreen::Trainer => app.trainer_reveal(),
            _ => {}
        }
        return;
    }

    match app.screen {
        AppScreen::LevelSelect => handle_level_select_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Trainer => handle_trainer_key(app, key),
        AppScreen::Offline => handle_offline_key(app, key),
    }
}

fn symbol_for_key(code: KeyCode) -> Option<Symbol> {
    match code {
        KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char('.') => Some(Symbol::Dot),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char('-') => Some(Symbol::Dash),
        _ => None,
    }
}

fn handle_level_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('p') => app.open_practice(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.page_selection(-1),
        KeyCode::PageDown => app.page_selection(1),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last_unlocked(),
        KeyCode::Enter => app.activate_selection(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if let Some(symbol) = symbol_for_key(key.code) {
        app.quiz_symbol(symbol);
        return;
    }
    match key.code {
        KeyCode::Esc => app.go_to_levels(),
        KeyCode::Enter => app.quiz_enter(),
        KeyCode::Backspace => app.quiz_clear(),
        KeyCode::Char('r') => app.quiz_retry(),
        KeyCode::Char('?') => app.quiz_hint(),
        KeyCode::Tab => app.switch_to_trainer(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

fn handle_trainer_key(app: &mut App, key: KeyEvent) {
    let text_entry = app.trainer.is_running()
        && app.trainer.direction() == TrainerDirection::SymbolsToText;

    match key.code {
        KeyCode::Esc => app.trainer_back(),
        KeyCode::Enter => app.trainer_submit(),
        KeyCode::Char(' ') => app.trainer_start_stop(),
        KeyCode::Backspace => app.trainer_backspace(),
        KeyCode::Char(ch) if text_entry => app.trainer_type_char(ch),
        code => {
            if let Some(symbol) = symbol_for_key(code) {
                app.trainer_symbol(symbol);
                return;
            }
            match code {
                KeyCode::Char('d') => app.trainer_toggle_direction(),
                KeyCode::Char('c') => app.trainer_cycle_charset(),
                KeyCode::Char('r') => app.trainer_replay(),
                KeyCode::Char('a') => app.trainer_reveal(),
                KeyCode::Char('t') => app.toggle_theme(),
                _ => {}
            }
        }
    }
}

fn handle_offline_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let footer_lines = pack_hint_lines(&app.key_hints(), area.width as usize);
    let layout = AppLayout::new(area, footer_lines.len() as u16);
    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::LevelSelect => render_level_select(frame, app, &layout),
        AppScreen::Quiz => render_quiz(frame, app, &layout),
        AppScreen::Trainer => render_trainer(frame, app, &layout),
        AppScreen::Offline => {
            let popup = centered_rect(60, 40, layout.main);
            frame.render_widget(OfflineWarning::new(&app.theme), popup);
        }
    }

    if let Some(status) = app.status.as_deref() {
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(app.theme.colors.success()),
        )));
        frame.render_widget(line, layout.status);
    }

    let hint_style = Style::default().fg(app.theme.colors.text_pending());
    let footer: Vec<Line> = footer_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, hint_style)))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let context = match app.screen {
        AppScreen::Quiz => app
            .quiz
            .as_ref()
            .map(|q| {
                let level = q.level_index().map(|i| i + 1).unwrap_or(0);
                format!(" Level {level}: {} ", q.level_name())
            })
            .unwrap_or_default(),
        AppScreen::Trainer => " Practice Mode ".to_string(),
        AppScreen::LevelSelect | AppScreen::Offline => String::new(),
    };
    let connection = if app.online { "" } else { " | offline" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " ditdah ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{context}{connection}"),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_level_select(frame: &mut ratatui::Frame, app: &mut App, layout: &AppLayout) {
    // Borders and the unlocked-count header take four rows.
    app.list_height = (layout.main.height as usize).saturating_sub(4).max(1);
    app.level_list.ensure_visible(app.list_height);

    let list = LevelList::new(&app.catalog, &app.tracker, &app.level_list, &app.theme)
        .show_preview(layout.tier.show_preview());
    frame.render_widget(list, layout.main);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let Some(quiz) = app.quiz.as_ref() else {
        return;
    };

    let show_progress = layout.tier.show_progress_bar(layout.main.height);
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(8)];
    if show_progress {
        constraints.insert(0, Constraint::Length(3));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(layout.main);

    let mut idx = 0;
    if show_progress {
        let label = format!("Challenge {} of {}", quiz.index() + 1, quiz.len());
        frame.render_widget(ProgressBar::new(&label, quiz.progress(), &app.theme), rows[idx]);
        idx += 1;
    }

    let timer = ProgressBar::countdown(
        quiz.remaining().as_secs_f64(),
        quiz.remaining_ratio(),
        &app.theme,
    );
    frame.render_widget(timer, rows[idx]);
    idx += 1;

    frame.render_widget(ChallengeArea::new(quiz, app.now(), &app.theme), rows[idx]);
}

fn render_trainer(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let area = centered_rect(70, 80, layout.main);
    frame.render_widget(TrainerPanel::new(&app.trainer, app.now(), &app.theme), area);
}
