//! Layout and drawing: screen tabs, reels, result line, history list, settings.

use crate::app::{Coordinator, CustomRow, HistoryView, Screen, SettingsView};
use crate::catalog::Category;
use crate::coordinator::Status;
use crate::reel::{ITEM_ROWS, ReelEngine, ReelState, WINDOW_ITEMS};
use crate::settings::SettingsSource;
use crate::theme::Theme;
use crate::Difficulty;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::time::Duration;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

const REEL_WIDTH: u16 = 14;
const REEL_GAP: u16 = 1;
/// Window rows plus the border.
const REEL_HEIGHT: u16 = ITEM_ROWS * WINDOW_ITEMS + 2;
const RESULT_HEIGHT: u16 = 5;
const REVEAL_FADE_MS: u32 = 450;

/// Everything the draw pass reads.
pub struct View<'a> {
    pub screen: Screen,
    pub theme: &'a Theme,
    pub coordinator: &'a Coordinator,
    pub history: &'a HistoryView,
    pub settings: &'a SettingsView,
    pub custom_rows: &'a [CustomRow],
    pub notice: Option<&'static str>,
}

/// Fade the result text in from the background.
pub fn reveal_effect(theme: &Theme) -> Effect {
    fx::fade_from(theme.bg, theme.bg, (REVEAL_FADE_MS, Interpolation::QuadOut))
}

/// Draw the current screen. `reveal` is advanced by `delta` over the roll result.
pub fn draw(frame: &mut Frame, view: &View, reveal: &mut Option<Effect>, delta: Duration) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(view.theme.bg)),
        area,
    );
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_tabs(frame, view, chunks[0]);
    match view.screen {
        Screen::Roll => draw_roll(frame, view, chunks[1], reveal, delta),
        Screen::History => draw_history(frame, view, chunks[1]),
        Screen::Settings => draw_settings(frame, view, chunks[1]),
    }
    draw_footer(frame, view, chunks[2]);
}

fn draw_tabs(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let settings = view.coordinator.settings().current();
    let mut spans: Vec<Span> = Screen::ALL
        .iter()
        .map(|&s| {
            let style = if s == view.screen {
                Style::default().fg(theme.bg).bg(theme.title).bold()
            } else {
                Style::default().fg(theme.main_fg)
            };
            Span::styled(s.title(), style)
        })
        .collect();
    spans.push(Span::styled(
        format!(
            "  {} / {}",
            view.coordinator.mode().title(),
            settings.difficulty.title()
        ),
        Style::default().fg(theme.inactive_fg),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_footer(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let line = if let Some(notice) = view.notice {
        Line::from(Span::styled(notice, Style::default().fg(theme.warn)))
    } else {
        let help = match view.screen {
            Screen::Roll => "Space spin   m mode   d difficulty   Tab screens   q quit",
            Screen::History => "↑/↓ select   Space landed   x delete   c clear   Tab screens",
            Screen::Settings => "←/→ difficulty   ↑/↓ select   Space toggle   Tab screens",
        };
        Line::from(Span::styled(help, Style::default().fg(theme.inactive_fg)))
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Centre a `width` x `height` box in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_roll(
    frame: &mut Frame,
    view: &View,
    area: Rect,
    reveal: &mut Option<Effect>,
    delta: Duration,
) {
    let reels = view.coordinator.reels();
    let reels_w = REEL_WIDTH * reels.len() as u16 + REEL_GAP * (reels.len() as u16 - 1);
    let stage = centered(area, reels_w.max(40), REEL_HEIGHT + RESULT_HEIGHT);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(REEL_HEIGHT), Constraint::Length(RESULT_HEIGHT)])
        .split(stage);

    let reel_row = centered(rows[0], reels_w, REEL_HEIGHT);
    let mut constraints = Vec::new();
    for i in 0..reels.len() {
        if i > 0 {
            constraints.push(Constraint::Length(REEL_GAP));
        }
        constraints.push(Constraint::Length(REEL_WIDTH));
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(reel_row);
    for (i, reel) in reels.iter().enumerate() {
        draw_reel(frame, view.theme, reel, columns[i * 2]);
    }

    draw_result(frame, view, rows[1]);
    if let Some(effect) = reveal {
        let ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
        frame.render_effect(effect, rows[1], TfxDuration::from_millis(ms));
    }
}

fn draw_reel(frame: &mut Frame, theme: &Theme, reel: &ReelEngine, area: Rect) {
    let accent = theme.reel_color(reel.index());
    let border = if reel.state() == ReelState::Idle {
        theme.div_line
    } else {
        accent
    };
    let centre = ITEM_ROWS..2 * ITEM_ROWS;
    let lines: Vec<Line> = (0..ITEM_ROWS * WINDOW_ITEMS)
        .map(|row| {
            let (face, line) = reel.face_at_row(row);
            let labels: Vec<&str> = face.label.split('\n').collect();
            // One-line labels sit on the middle line, two-line labels on the first two.
            let first = if labels.len() == 1 { 1 } else { 0 };
            let text = usize::from(line)
                .checked_sub(first)
                .and_then(|i| labels.get(i))
                .copied()
                .unwrap_or("");
            let style = if centre.contains(&row) {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.inactive_fg)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", reel.options().category().title().to_uppercase()),
            Style::default().fg(accent),
        ));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn draw_result(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let rolling = view.coordinator.status() != Status::Ready;
    let style = if rolling {
        Style::default().fg(theme.inactive_fg)
    } else {
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD)
    };
    let text = view.coordinator.display_text();
    let lines: Vec<Line> = text
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), style)))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.div_line)),
        ),
        area,
    );
}

fn draw_history(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let history = view.coordinator.log();
    let title = format!(" {} landed / {} rolled ", history.landed_count(), history.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .title(Span::styled(title, Style::default().fg(theme.title)));

    if history.is_empty() {
        frame.render_widget(
            Paragraph::new("No tricks yet. Roll one!")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.inactive_fg))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = history
        .entries()
        .iter()
        .map(|e| {
            let (mark, mark_style) = if e.landed {
                ("[✓] ", Style::default().fg(theme.good))
            } else {
                ("[ ] ", Style::default().fg(theme.inactive_fg))
            };
            let when = e
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%b %d %H:%M");
            ListItem::new(Line::from(vec![
                Span::styled(mark, mark_style),
                Span::styled(e.text.replace('\n', " · "), Style::default().fg(theme.main_fg)),
                Span::styled(
                    format!("  {} {when}", e.mode.title()),
                    Style::default().fg(theme.inactive_fg),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.div_line).add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(view.history.selected));

    if view.history.confirm_clear {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1)])
            .split(area);
        frame.render_stateful_widget(list, chunks[0], &mut state);
        frame.render_widget(
            Paragraph::new(Span::styled(
                " Clear all history? y to confirm, any other key to cancel ",
                Style::default().fg(theme.bg).bg(theme.warn),
            ))
            .alignment(Alignment::Center),
            chunks[1],
        );
    } else {
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn draw_settings(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let settings = view.coordinator.settings().current();
    let selected = view.settings.row;
    let marker = |row: usize| if row == selected { "> " } else { "  " };

    let mut items: Vec<ListItem> = Vec::new();
    let mut difficulty_spans = vec![Span::styled(
        format!("{}DIFFICULTY ", marker(0)),
        Style::default().fg(theme.title),
    )];
    for d in Difficulty::ALL {
        let style = if d == settings.difficulty {
            Style::default().fg(theme.bg).bg(theme.title).bold()
        } else {
            Style::default().fg(theme.main_fg)
        };
        difficulty_spans.push(Span::styled(format!(" {} ", d.title()), style));
    }
    items.push(ListItem::new(Line::from(difficulty_spans)));

    let custom_active = settings.difficulty == Difficulty::Custom;
    let mut selected_item = 0;
    let mut current: Option<Category> = None;
    for (i, row) in view.custom_rows.iter().enumerate() {
        if current != Some(row.category) {
            current = Some(row.category);
            let (enabled, total) = settings.custom.enabled_count(row.category);
            items.push(ListItem::new(Line::from(Span::styled(
                format!("  {} ({enabled}/{total})", row.category.title()),
                Style::default().fg(theme.title),
            ))));
        }
        let disabled = settings.custom.is_disabled(row.category, row.value);
        let check = if disabled { "[ ]" } else { "[x]" };
        let label = if row.value.is_empty() {
            "NONE".to_string()
        } else {
            row.label.replace('\n', "")
        };
        let fg = if disabled || !custom_active {
            theme.inactive_fg
        } else {
            theme.main_fg
        };
        if i + 1 == selected {
            selected_item = items.len();
        }
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{}  {check} {label}", marker(i + 1)),
            Style::default().fg(fg),
        ))));
    }

    let title = if custom_active {
        " Custom faces "
    } else {
        " Custom faces (used with CUSTOM difficulty) "
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line))
            .title(Span::styled(title, Style::default().fg(theme.title))),
    );
    let mut state = ListState::default().with_selected(Some(selected_item));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::custom_rows;
    use crate::coordinator::{RngSource, SpinCoordinator};
    use crate::history::HistoryStore;
    use crate::settings::{Settings, SettingsStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn every_screen_draws() {
        let theme = Theme::default();
        let mut coordinator: Coordinator = SpinCoordinator::new(
            SettingsStore::in_memory(Settings::default()),
            HistoryStore::in_memory(),
            RngSource(StdRng::seed_from_u64(5)),
            Duration::from_millis(10),
        );
        coordinator.log_mut().add("KICKFLIP", crate::GameMode::Flatground);
        let rows = custom_rows();
        let history = HistoryView::default();
        let settings = SettingsView { row: 3 };
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        for screen in Screen::ALL {
            let view = View {
                screen,
                theme: &theme,
                coordinator: &coordinator,
                history: &history,
                settings: &settings,
                custom_rows: &rows,
                notice: None,
            };
            let mut reveal = Some(reveal_effect(&theme));
            terminal
                .draw(|f| draw(f, &view, &mut reveal, Duration::from_millis(16)))
                .unwrap();
            let text = buffer_text(&terminal);
            match screen {
                Screen::Roll => assert!(text.contains("STANCE")),
                Screen::History => assert!(text.contains("KICKFLIP")),
                Screen::Settings => assert!(text.contains("DIFFICULTY")),
            }
        }
    }
}
