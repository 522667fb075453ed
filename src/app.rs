use std::sync::Arc;
use std::sync::mpsc::Sender;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::audio::{Tone, ToneEmitter};
use crate::catalog::{Catalog, build_catalog};
use crate::clock::Clock;
use crate::config::Config;
use crate::engine::progression::ProgressionTracker;
use crate::event::AppEvent;
use crate::hint::worker::{HintReply, HintWorker};
use crate::hint::{HintProvider, HintRequest};
use crate::morse::Symbol;
use crate::session::quiz::{QuizEvent, QuizSession, QuizState};
use crate::session::trainer::{Direction, TrainerFeedback, TrainerSession};
use crate::store::kv::KeyValueStore;
use crate::ui::components::level_list::LevelListState;
use crate::ui::theme::{THEME_KEY, Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    LevelSelect,
    Quiz,
    Trainer,
    Offline,
}

/// Capabilities the app is assembled from. Production wiring lives in
/// main.rs; tests substitute fakes.
pub struct AppDeps {
    pub store: Box<dyn KeyValueStore>,
    pub emitter: Box<dyn ToneEmitter>,
    pub hint_provider: Arc<dyn HintProvider>,
    pub clock: Box<dyn Clock>,
    pub rng: SmallRng,
}

pub struct App {
    pub screen: AppScreen,
    pub theme: Theme,
    pub config: Config,
    pub catalog: Catalog,
    pub tracker: ProgressionTracker,
    pub level_list: LevelListState,
    pub quiz: Option<QuizSession>,
    pub trainer: TrainerSession,
    pub status: Option<String>,
    pub online: bool,
    pub should_quit: bool,
    /// Rows the level list had on the last draw, for paging and scrolling.
    pub list_height: usize,
    /// First hint serial for the next quiz. Never reused across sessions.
    next_hint_serial: u64,
    store: Box<dyn KeyValueStore>,
    emitter: Box<dyn ToneEmitter>,
    hints: HintWorker,
    clock: Box<dyn Clock>,
}

impl App {
    pub fn new(config: Config, deps: AppDeps, events: Sender<AppEvent>) -> Self {
        let AppDeps {
            store,
            emitter,
            hint_provider,
            clock,
            mut rng,
        } = deps;

        let catalog = build_catalog(&mut rng);

        let tracker = ProgressionTracker::load(store.as_ref());
        let theme_name = store
            .get(THEME_KEY)
            .unwrap_or_else(|| crate::ui::theme::DARK.to_string());
        let theme = Theme::load_or_default(&theme_name);
        let trainer_rng = SmallRng::from_rng(&mut rng).unwrap_or_else(|_| SmallRng::from_entropy());
        let trainer = TrainerSession::new(trainer_rng);

        let mut app = Self {
            screen: AppScreen::LevelSelect,
            theme,
            config,
            catalog,
            tracker,
            level_list: LevelListState::default(),
            quiz: None,
            trainer,
            status: None,
            online: true,
            should_quit: false,
            list_height: 20,
            next_hint_serial: 0,
            store,
            emitter,
            hints: HintWorker::new(hint_provider, events),
            clock,
        };
        app.focus_next_level(app.tracker.highest_unlocked());
        app
    }

    pub fn now(&self) -> std::time::Instant {
        self.clock.now()
    }

    fn list_rows(&self) -> usize {
        self.catalog.len() + 1
    }

    fn focus_next_level(&mut self, level_index: usize) {
        let last_level = self.catalog.len().saturating_sub(1);
        let row = LevelListState::row_for_level(level_index.min(last_level));
        self.level_list.select(row, self.list_rows());
        self.level_list.center_on_selected(self.list_height);
    }

    // --- Level select ---

    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.list_rows();
        self.level_list.move_by(delta, rows);
        self.level_list.ensure_visible(self.list_height);
    }

    pub fn page_selection(&mut self, pages: isize) {
        let step = self.list_height.max(1) as isize;
        self.move_selection(pages * step);
    }

    pub fn select_first(&mut self) {
        self.level_list
            .select(LevelListState::PRACTICE_ROW, self.list_rows());
        self.level_list.ensure_visible(self.list_height);
    }

    pub fn select_last_unlocked(&mut self) {
        self.focus_next_level(self.tracker.highest_unlocked());
    }

    pub fn activate_selection(&mut self) {
        match self.level_list.selected_level() {
            None => self.open_practice(),
            Some(level_index) => self.start_level(level_index),
        }
    }

    pub fn start_level(&mut self, level_index: usize) {
        if !self.tracker.is_unlocked(level_index) {
            self.status = Some(format!("Level {} is locked", level_index + 1));
            return;
        }
        let Some(level) = self.catalog.get(level_index) else {
            return;
        };
        tracing::info!("entering level {} ({})", level_index + 1, level.name);
        let quiz = QuizSession::for_level(level_index, level, self.clock.now());
        self.retire_quiz();
        self.quiz = Some(quiz.with_first_serial(self.next_hint_serial));
        self.status = None;
        self.screen = AppScreen::Quiz;
        if self.quiz.as_ref().is_some_and(|q| q.state() == QuizState::LevelComplete) {
            self.complete_level();
        }
    }

    pub fn open_practice(&mut self) {
        self.trainer.stop();
        self.status = None;
        self.screen = AppScreen::Trainer;
    }

    /// Drop the running quiz, reserving its hint serials.
    fn retire_quiz(&mut self) -> Option<QuizSession> {
        let quiz = self.quiz.take()?;
        self.next_hint_serial = self.next_hint_serial.max(quiz.serial() + 1);
        Some(quiz)
    }

    pub fn go_to_levels(&mut self) {
        self.retire_quiz();
        self.trainer.stop();
        self.screen = if self.is_gated() {
            AppScreen::Offline
        } else {
            AppScreen::LevelSelect
        };
    }

    fn is_gated(&self) -> bool {
        self.config.require_connection && !self.online
    }

    // --- Quiz ---

    pub fn quiz_symbol(&mut self, symbol: Symbol) {
        let now = self.clock.now();
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        if quiz.push_symbol(symbol, now) {
            self.emitter.emit(Tone::from_symbol(symbol));
        }
    }

    pub fn quiz_clear(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.clear();
        }
    }

    pub fn quiz_retry(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.retry();
        }
    }

    /// Enter: submit while answering, move on after a correct answer.
    pub fn quiz_enter(&mut self) {
        let now = self.clock.now();
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let event = if quiz.state() == QuizState::Correct {
            quiz.next(now)
        } else {
            quiz.submit()
        };
        if let Some(event) = event {
            self.handle_quiz_event(event);
        }
    }

    pub fn quiz_hint(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.request_hint() {
            HintRequest::Fetch { challenge, serial } => {
                tracing::debug!("requesting hint for {challenge:?}");
                self.hints.spawn(challenge, serial, self.online);
            }
            HintRequest::Toggled { .. } | HintRequest::Ignored => {}
        }
    }

    pub fn receive_hint(&mut self, reply: HintReply) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        if !quiz.receive_hint(reply.serial, reply.text) {
            tracing::debug!("dropping stale hint for {:?}", reply.challenge);
        }
    }

    /// Tab: park the quiz and open the trainer.
    pub fn switch_to_trainer(&mut self) {
        if self.quiz.is_some() {
            self.trainer.stop();
            self.screen = AppScreen::Trainer;
        }
    }

    fn handle_quiz_event(&mut self, event: QuizEvent) {
        match event {
            QuizEvent::Correct => self.emitter.emit(Tone::Correct),
            QuizEvent::Incorrect | QuizEvent::TimeExpired => self.emitter.emit(Tone::Incorrect),
            QuizEvent::Advanced { .. } => {}
            QuizEvent::LevelComplete => self.complete_level(),
        }
    }

    fn complete_level(&mut self) {
        let Some(quiz) = self.retire_quiz() else {
            return;
        };
        let summary = quiz.summary();
        tracing::info!("{}", summary.status_line());
        self.status = Some(summary.status_line());
        if let Some(level_index) = quiz.level_index() {
            self.tracker.record_completion(level_index, self.store.as_mut());
        }
        self.go_to_levels();
        if let Some(last) = self.tracker.last_completed() {
            self.focus_next_level(last + 1);
        }
    }

    // --- Trainer ---

    pub fn trainer_back(&mut self) {
        self.trainer.stop();
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.restart_timer(self.clock.now());
            self.screen = AppScreen::Quiz;
        } else {
            self.go_to_levels();
        }
    }

    pub fn trainer_toggle_direction(&mut self) {
        let next = self.trainer.direction().toggle();
        if !self.trainer.set_direction(next) {
            self.status = Some("Stop the trainer to change settings".to_string());
        }
    }

    pub fn trainer_cycle_charset(&mut self) {
        let next = self.trainer.charset().cycle();
        if !self.trainer.set_charset(next) {
            self.status = Some("Stop the trainer to change settings".to_string());
        }
    }

    pub fn trainer_start_stop(&mut self) {
        if self.trainer.is_running() {
            self.trainer.stop();
        } else {
            self.status = None;
            self.trainer.start(self.clock.now());
        }
    }

    pub fn trainer_symbol(&mut self, symbol: Symbol) {
        if self.trainer.push_symbol(symbol, self.clock.now()) {
            self.emitter.emit(Tone::from_symbol(symbol));
        }
    }

    pub fn trainer_type_char(&mut self, ch: char) {
        self.trainer.type_char(ch);
    }

    pub fn trainer_backspace(&mut self) {
        self.trainer.backspace();
        self.trainer.clear_input();
    }

    pub fn trainer_submit(&mut self) {
        match self.trainer.submit(self.clock.now()) {
            Some(TrainerFeedback::Correct) => self.emitter.emit(Tone::Correct),
            Some(TrainerFeedback::Incorrect { .. }) => self.emitter.emit(Tone::Incorrect),
            None => {}
        }
    }

    pub fn trainer_replay(&mut self) {
        self.trainer.replay(self.clock.now());
    }

    pub fn trainer_reveal(&mut self) {
        self.trainer.reveal_answer();
    }

    // --- Shared ---

    pub fn tick(&mut self) {
        let now = self.clock.now();
        match self.screen {
            AppScreen::Quiz => {
                let event = self.quiz.as_mut().and_then(|q| q.poll(now));
                if let Some(event) = event {
                    self.handle_quiz_event(event);
                }
            }
            AppScreen::Trainer => {
                self.trainer.poll(now, self.emitter.as_ref());
            }
            AppScreen::LevelSelect | AppScreen::Offline => {}
        }
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        match self.screen {
            AppScreen::LevelSelect if self.is_gated() => self.screen = AppScreen::Offline,
            AppScreen::Offline if !self.is_gated() => self.screen = AppScreen::LevelSelect,
            _ => {}
        }
    }

    /// Apply a palette for this run without remembering it.
    pub fn apply_theme(&mut self, name: &str) {
        match Theme::load(name) {
            Some(theme) => self.theme = theme,
            None => self.status = Some(format!("Unknown theme: {name}")),
        }
    }

    pub fn toggle_theme(&mut self) {
        let name = self.theme.toggled_name();
        self.theme = Theme::load_or_default(name);
        if let Err(e) = self.store.set(THEME_KEY, name) {
            tracing::warn!("failed to persist theme: {e:#}");
        }
    }

    /// Footer key hints for the current screen, in display order.
    pub fn key_hints(&self) -> Vec<&'static str> {
        match self.screen {
            AppScreen::LevelSelect => vec![
                "[Enter] Start",
                "[p] Practice",
                "[j/k] Move",
                "[PgUp/PgDn] Page",
                "[t] Theme",
                "[q] Quit",
            ],
            AppScreen::Quiz => {
                let hint = if self.quiz.as_ref().is_some_and(|q| q.hint().has_text()) {
                    "[?] Show/Hide hint"
                } else {
                    "[?] Hint"
                };
                vec![
                    "[z/.] Dot",
                    "[x/-] Dash",
                    "[Enter] Submit/Next",
                    "[Bksp] Clear",
                    "[r] Retry",
                    hint,
                    "[Tab] Practice",
                    "[Esc] Levels",
                ]
            }
            AppScreen::Trainer if self.trainer.direction() == Direction::SymbolsToText => vec![
                "[Space] Start/Stop",
                "[d] Direction",
                "[c] Characters",
                "[Ctrl+R] Replay",
                "[Ctrl+A] Reveal",
                "[Enter] Submit",
                "[Esc] Back",
            ],
            AppScreen::Trainer => vec![
                "[Space] Start/Stop",
                "[d] Direction",
                "[c] Characters",
                "[z/x] Dot/Dash",
                "[Enter] Submit",
                "[Esc] Back",
            ],
            AppScreen::Offline => vec!["[t] Theme", "[q] Quit"],
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Tick => self.tick(),
            AppEvent::Hint(reply) => self.receive_hint(reply),
            AppEvent::Connectivity(online) => self.set_online(online),
            AppEvent::Key(_) | AppEvent::Resize(_, _) => return false,
        }
        true
    }
}
