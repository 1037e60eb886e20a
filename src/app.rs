//! App: terminal init, main loop, tick and key handling.

use crate::catalog::Category;
use crate::coordinator::{RngSource, RoundOutcome, SpinCoordinator};
use crate::history::HistoryStore;
use crate::input::{Action, key_to_action};
use crate::settings::{SettingsSource, SettingsStore};
use crate::theme::Theme;
use crate::GameConfig;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::debug;

pub type Coordinator = SpinCoordinator<SettingsStore, HistoryStore, RngSource<StdRng>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Roll,
    History,
    Settings,
}

impl Screen {
    pub const ALL: [Self; 3] = [Self::Roll, Self::History, Self::Settings];

    fn next(self) -> Self {
        match self {
            Self::Roll => Self::History,
            Self::History => Self::Settings,
            Self::Settings => Self::Roll,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Roll => Self::Settings,
            Self::History => Self::Roll,
            Self::Settings => Self::History,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Roll => " ROLL ",
            Self::History => " HISTORY ",
            Self::Settings => " SETTINGS ",
        }
    }
}

/// One toggleable face on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomRow {
    pub category: Category,
    pub label: &'static str,
    pub value: &'static str,
}

/// Customisable faces in settings order, one row per distinct value.
pub fn custom_rows() -> Vec<CustomRow> {
    let mut rows: Vec<CustomRow> = Vec::new();
    for category in Category::CUSTOMIZABLE {
        for face in category.faces() {
            if rows.iter().any(|r| r.category == category && r.value == face.value) {
                continue;
            }
            rows.push(CustomRow {
                category,
                label: face.label,
                value: face.value,
            });
        }
    }
    rows
}

#[derive(Debug, Default)]
pub struct HistoryView {
    pub selected: usize,
    /// Waiting for `y` after `c`.
    pub confirm_clear: bool,
}

#[derive(Debug, Default)]
pub struct SettingsView {
    /// 0 is the difficulty selector, then one row per `custom_rows` entry.
    pub row: usize,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    coordinator: Coordinator,
    screen: Screen,
    history_view: HistoryView,
    settings_view: SettingsView,
    custom_rows: Vec<CustomRow>,
    /// Shown under the result until the next key press.
    notice: Option<&'static str>,
    /// TachyonFX fade-in for the latest resolved trick.
    reveal_effect: Option<Effect>,
}

impl App {
    pub fn new(config: GameConfig, coordinator: Coordinator, theme: Theme) -> Self {
        Self {
            config,
            theme,
            coordinator,
            screen: Screen::Roll,
            history_view: HistoryView::default(),
            settings_view: SettingsView::default(),
            custom_rows: custom_rows(),
            notice: None,
            reveal_effect: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate);
        let mut last = Instant::now();
        loop {
            let now = Instant::now();
            let dt = now.saturating_duration_since(last);
            last = now;

            if let Some(outcome) = self.coordinator.tick(dt) {
                self.on_resolved(&outcome);
            }

            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &crate::ui::View {
                        screen: self.screen,
                        theme: &self.theme,
                        coordinator: &self.coordinator,
                        history: &self.history_view,
                        settings: &self.settings_view,
                        custom_rows: &self.custom_rows,
                        notice: self.notice,
                    },
                    &mut self.reveal_effect,
                    dt,
                );
            })?;
            if self.reveal_effect.as_ref().is_some_and(Effect::done) {
                self.reveal_effect = None;
            }

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn on_resolved(&mut self, outcome: &RoundOutcome) {
        debug!(recorded = outcome.recorded, "showing result");
        self.history_view.selected = 0;
        if !self.config.no_animation {
            self.reveal_effect = Some(crate::ui::reveal_effect(&self.theme));
        }
    }

    /// Apply one action. Returns true to quit.
    fn handle(&mut self, action: Action) -> bool {
        self.notice = None;
        match action {
            Action::Quit => return true,
            Action::NextScreen => self.switch_screen(self.screen.next()),
            Action::PrevScreen => self.switch_screen(self.screen.prev()),
            _ => match self.screen {
                Screen::Roll => self.handle_roll(action),
                Screen::History => self.handle_history(action),
                Screen::Settings => self.handle_settings(action),
            },
        }
        false
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.history_view.confirm_clear = false;
    }

    /// Settings are frozen while a round is live.
    fn settings_locked(&mut self) -> bool {
        let busy = self.coordinator.is_busy();
        if busy {
            self.notice = Some("Wait for the reels to stop");
        }
        busy
    }

    fn handle_roll(&mut self, action: Action) {
        match action {
            Action::Select => {
                self.coordinator.request_spin();
            }
            Action::ToggleMode if !self.settings_locked() => {
                let mode = self.coordinator.settings().current().mode;
                self.coordinator.settings_mut().set_mode(mode.toggled());
            }
            Action::CycleDifficulty if !self.settings_locked() => {
                let difficulty = self.coordinator.settings().current().difficulty;
                self.coordinator.settings_mut().set_difficulty(difficulty.next());
            }
            _ => {}
        }
    }

    fn handle_history(&mut self, action: Action) {
        let confirming = std::mem::take(&mut self.history_view.confirm_clear);
        let history = self.coordinator.log_mut();
        let selected_id = history.entries().get(self.history_view.selected).map(|e| e.id);
        match action {
            Action::Up => {
                self.history_view.selected = self.history_view.selected.saturating_sub(1);
            }
            Action::Down => {
                if self.history_view.selected + 1 < history.len() {
                    self.history_view.selected += 1;
                }
            }
            Action::Select => {
                if let Some(id) = selected_id {
                    history.toggle_landed(id);
                }
            }
            Action::Delete => {
                if let Some(id) = selected_id {
                    history.delete(id);
                }
            }
            Action::Clear if !history.is_empty() => self.history_view.confirm_clear = true,
            Action::Confirm if confirming => {
                history.clear();
                self.notice = Some("History cleared");
            }
            _ => {}
        }
        let len = self.coordinator.log().len();
        self.history_view.selected = self.history_view.selected.min(len.saturating_sub(1));
    }

    fn handle_settings(&mut self, action: Action) {
        let rows = self.custom_rows.len() + 1;
        match action {
            Action::Up => self.settings_view.row = self.settings_view.row.saturating_sub(1),
            Action::Down => self.settings_view.row = (self.settings_view.row + 1).min(rows - 1),
            Action::Left | Action::Right | Action::CycleDifficulty
                if self.settings_view.row == 0 && !self.settings_locked() =>
            {
                let difficulty = self.coordinator.settings().current().difficulty;
                let next = if action == Action::Left {
                    difficulty.prev()
                } else {
                    difficulty.next()
                };
                self.coordinator.settings_mut().set_difficulty(next);
            }
            Action::Select if self.settings_view.row > 0 && !self.settings_locked() => {
                let row = self.custom_rows[self.settings_view.row - 1];
                self.coordinator
                    .settings_mut()
                    .toggle_custom(row.category, row.value);
            }
            _ => {}
        }
    }
}
