use std::time::Instant;

use crossterm::event::KeyCode;
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::content::{select, Filters, Item, ItemKey, VocabularyPolicy};
use crate::models::{CardKey, Category, Dataset, Example, ExampleSection, HskLevel, UsageNote};
use crate::speech::PlaybackDispatcher;

use super::helpers::{
    animated_percent, centered_rect, index_badge, mask_text, truncate_to_width, wrap_to_width,
};
use super::overlay::UsageOverlay;
use super::state::ListState;

/// Title row, tab row and the level row below them.
const HEADER_HEIGHT: u16 = 4;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Bar shown under the list while a card is expanded.
const NOW_PLAYING_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 5;
/// Left padding that lines card bodies up under the translation.
const CARD_INDENT: &str = "      ";
const APP_TITLE: &str = "Chinese Practice";

fn accent() -> Style {
    Style::default().fg(Color::Cyan)
}

fn hint() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
///
/// Everything rendered is derived from `dataset` and `filters` on demand; the
/// remaining fields are the explicit view state (cursor, expansion, reveals,
/// overlay, headword masking).
pub struct App {
    dataset: Dataset,
    filters: Filters,
    list: ListState,
    show_headwords: bool,
    overlay: UsageOverlay,
    player: PlaybackDispatcher,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(dataset: Dataset, filters: Filters, player: PlaybackDispatcher) -> Self {
        Self {
            dataset,
            filters,
            list: ListState::default(),
            show_headwords: true,
            overlay: UsageOverlay::default(),
            player,
            status: None,
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn list_state(&self) -> &ListState {
        &self.list
    }

    pub fn overlay(&self) -> &UsageOverlay {
        &self.overlay
    }

    pub fn headwords_visible(&self) -> bool {
        self.show_headwords
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// The entries the current filters select, in display order.
    pub fn visible_items(&self) -> Vec<Item<'_>> {
        select(&self.dataset, &self.filters)
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        self.handle_key_at(code, Instant::now())
    }

    /// Same as [`App::handle_key`] with an explicit clock, which drives the
    /// overlay transitions.
    pub fn handle_key_at(&mut self, code: KeyCode, now: Instant) -> bool {
        if code == KeyCode::Char('q') {
            return true;
        }

        if self.overlay.accepts_input() {
            self.handle_overlay_key(code, now);
        } else if !self.overlay.is_visible() {
            self.handle_list_key(code, now);
        }
        false
    }

    /// Advance time-based state.
    pub fn on_tick(&mut self, now: Instant) {
        self.overlay.tick(now);
    }

    fn handle_list_key(&mut self, code: KeyCode, now: Instant) {
        let len = self.visible_items().len();
        match code {
            KeyCode::Esc => {
                self.list.collapse();
                self.clear_status();
            }
            KeyCode::Tab => self.set_category(self.filters.category.cycle(1)),
            KeyCode::BackTab => self.set_category(self.filters.category.cycle(-1)),
            KeyCode::Char('c') => self.set_category(Category::Conversation),
            KeyCode::Char('v') => self.set_category(Category::Vocabulary),
            KeyCode::Char('p') => self.set_category(Category::Patterns),
            KeyCode::Char(digit @ '0'..='6') => self.set_level(digit),
            KeyCode::Up => self.list.move_cursor(-1, len),
            KeyCode::Down => self.list.move_cursor(1, len),
            KeyCode::PageUp => self.list.move_cursor(-PAGE_STEP, len),
            KeyCode::PageDown => self.list.move_cursor(PAGE_STEP, len),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(len),
            KeyCode::Enter => {
                if let Some(key) = self.current_key() {
                    self.list.toggle_expanded(key);
                    debug!(
                        "event=toggle_expanded category={} id={} expanded={}",
                        key.category,
                        key.id,
                        self.list.is_expanded(key)
                    );
                }
            }
            KeyCode::Char(' ') => {
                let text = self.current_item().map(|item| item.headword().to_string());
                if let Some(text) = text {
                    self.player.play(&text);
                }
            }
            KeyCode::Char('a') => self.replay_expanded(),
            KeyCode::Char('r') => {
                if let Some(key) = self.current_key() {
                    self.list.toggle_reveal(key);
                }
            }
            KeyCode::Char('h') => {
                self.show_headwords = !self.show_headwords;
                let message = if self.show_headwords {
                    "Showing Chinese headwords."
                } else {
                    "Hiding Chinese headwords."
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('u') => {
                let key = self
                    .current_item()
                    .filter(|item| item.usage().is_some())
                    .map(|item| item.key());
                if let Some(key) = key {
                    if self.overlay.open(key, now) {
                        debug!("event=overlay_open id={}", key.id);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, code: KeyCode, now: Instant) {
        let cards = self
            .overlay_note()
            .map(UsageNote::card_keys)
            .unwrap_or_default();
        let focused = cards.get(self.overlay.focus()).copied();

        match code {
            KeyCode::Esc | KeyCode::Char('u') => {
                if self.overlay.close(now) {
                    debug!("event=overlay_close");
                }
            }
            KeyCode::Up => self.overlay.move_focus(-1, cards.len()),
            KeyCode::Down => self.overlay.move_focus(1, cards.len()),
            KeyCode::Enter | KeyCode::Char('r') => {
                if let Some(card) = focused {
                    self.overlay.toggle_reveal(card);
                }
            }
            KeyCode::Char(' ') => {
                let text = focused
                    .and_then(|card| self.overlay_note()?.example(card))
                    .map(|example| example.target_text.clone());
                if let Some(text) = text {
                    self.player.play(&text);
                }
            }
            _ => {}
        }
    }

    fn set_category(&mut self, category: Category) {
        if self.filters.category == category {
            return;
        }
        self.filters.category = category;
        self.list.reset_selection();
        self.clear_status();
        debug!("event=select_category category={category}");
    }

    /// Digit keys pick a vocabulary level; `0` clears the filter.
    fn set_level(&mut self, digit: char) {
        let level = digit
            .to_digit(10)
            .and_then(|value| HskLevel::new(value as u8).ok());
        self.filters.category = Category::Vocabulary;
        self.filters.hsk_level = level;
        self.list.reset_selection();

        let message = match (level, self.filters.policy) {
            (Some(level), _) => format!("Showing {level} vocabulary."),
            (None, VocabularyPolicy::All) => "Showing all vocabulary.".to_string(),
            (None, VocabularyPolicy::Unleveled) => {
                "Showing words without an HSK level.".to_string()
            }
        };
        self.set_status(message, StatusKind::Info);
        debug!(
            "event=select_level level={}",
            level.map(HskLevel::get).unwrap_or(0)
        );
    }

    fn replay_expanded(&mut self) {
        let text = self
            .list
            .expanded()
            .and_then(|key| self.find_item(key))
            .map(|item| item.headword().to_string());
        match text {
            Some(text) => self.player.play(&text),
            None => self.set_status("Expand a card first to replay it.", StatusKind::Error),
        }
    }

    fn current_item(&self) -> Option<Item<'_>> {
        self.visible_items().get(self.list.cursor()).copied()
    }

    fn current_key(&self) -> Option<ItemKey> {
        self.current_item().map(|item| item.key())
    }

    fn find_item(&self, key: ItemKey) -> Option<Item<'_>> {
        self.visible_items()
            .into_iter()
            .find(|item| item.key() == key)
    }

    fn overlay_note(&self) -> Option<&UsageNote> {
        let key = self.overlay.item()?;
        self.find_item(key)?.usage()
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_at(frame, Instant::now());
    }

    /// Render the whole screen; `now` positions the overlay animation.
    pub fn draw_at(&self, frame: &mut Frame, now: Instant) {
        let area = frame.area();
        let items = self.visible_items();
        let expanded = self
            .list
            .expanded()
            .and_then(|key| items.iter().find(|item| item.key() == key).copied());
        let now_playing_height = if expanded.is_some() {
            NOW_PLAYING_HEIGHT
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(now_playing_height),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        if items.is_empty() {
            self.draw_empty_state(frame, chunks[1]);
        } else {
            self.draw_list(frame, chunks[1], &items);
        }
        if let Some(item) = expanded {
            self.draw_now_playing(frame, chunks[2], item);
        }
        self.draw_footer(frame, chunks[3]);

        if self.overlay.is_visible() {
            if let Some(note) = self.overlay_note() {
                self.draw_overlay(frame, area, note, now);
            }
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut tabs = vec![Span::styled(
            APP_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        tabs.push(Span::raw("   "));
        for category in Category::ALL {
            let style = if category == self.filters.category {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            tabs.push(Span::styled(format!(" {} ", category.label()), style));
            tabs.push(Span::raw(" "));
        }

        let paragraph = Paragraph::new(vec![Line::from(tabs), self.level_line()])
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(paragraph, area);
    }

    fn level_line(&self) -> Line<'static> {
        match self.filters.category {
            Category::Conversation => Line::from(Span::styled("All phrases", hint())),
            Category::Patterns => Line::from(Span::styled(
                format!("Pinned to {}", self.filters.pattern_level),
                hint(),
            )),
            Category::Vocabulary => {
                let selected = Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD);
                let unfiltered_label = match self.filters.policy {
                    VocabularyPolicy::All => "All",
                    VocabularyPolicy::Unleveled => "Unleveled",
                };
                let mut spans = vec![Span::styled("Level  ", hint())];
                let style = if self.filters.hsk_level.is_none() {
                    selected
                } else {
                    Style::default()
                };
                spans.push(Span::styled(format!("[0] {unfiltered_label}"), style));
                for level in HskLevel::all() {
                    let style = if self.filters.hsk_level == Some(level) {
                        selected
                    } else {
                        Style::default()
                    };
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(format!("[{}]", level.get()), style));
                }
                Line::from(spans)
            }
        }
    }

    fn draw_empty_state(&self, frame: &mut Frame, area: Rect) {
        let message = match (self.filters.category, self.filters.hsk_level) {
            (Category::Vocabulary, Some(level)) => format!("No {level} words yet."),
            (Category::Patterns, _) => {
                format!("No {} patterns yet.", self.filters.pattern_level)
            }
            (category, _) => format!("No {} entries yet.", category.label().to_lowercase()),
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("∅", accent().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(message),
            Line::from(Span::styled(
                "Pick another tab or press 0 to clear the level filter.",
                hint(),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    /// Render every card as plain lines and scroll so the cursor card is on
    /// screen.
    fn draw_list(&self, frame: &mut Frame, area: Rect, items: &[Item<'_>]) {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut cursor_span = (0, 0);

        for (index, item) in items.iter().enumerate() {
            let start = lines.len();
            let selected = index == self.list.cursor();
            lines.extend(self.card_lines(index, item, selected));
            if selected {
                cursor_span = (start, lines.len());
            }
        }

        let height = area.height as usize;
        let (cursor_start, cursor_end) = cursor_span;
        let offset = cursor_end.saturating_sub(height).min(cursor_start);

        let paragraph = Paragraph::new(lines).scroll((offset as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn card_lines(&self, index: usize, item: &Item<'_>, selected: bool) -> Vec<Line<'static>> {
        let key = item.key();
        let expanded = self.list.is_expanded(key);
        let pointer = if selected { "▶ " } else { "  " };
        let chevron = if expanded { "▾" } else { "▸" };
        let title_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut title = vec![
            Span::styled(pointer, accent()),
            Span::styled(index_badge(index), accent()),
            Span::raw("  "),
            Span::styled(item.translation().to_string(), title_style),
        ];
        if let Some(level) = item.hsk_level() {
            title.push(Span::styled(format!("  [{level}]"), hint()));
        }
        if item.usage().is_some() {
            title.push(Span::styled("  [u] usage", Style::default().fg(Color::Magenta)));
        }
        title.push(Span::styled(format!("  {chevron}"), hint()));

        let mut lines = vec![
            Line::from(title),
            Line::from(vec![
                Span::raw(CARD_INDENT),
                Span::styled(
                    self.headword_text(item.headword()),
                    accent().add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if expanded {
            lines.push(Line::from(vec![
                Span::raw(CARD_INDENT),
                Span::styled("Pinyin  ", hint()),
                Span::styled(
                    item.pronunciation_guide().to_string(),
                    Style::default().fg(Color::White),
                ),
            ]));
            if let Item::Pattern(pattern) = item {
                lines.push(Line::from(vec![
                    Span::raw(CARD_INDENT),
                    Span::styled("Structure  ", hint()),
                    Span::raw(pattern.structure.clone()),
                ]));
                for example in &pattern.examples {
                    lines.extend(self.pattern_example_lines(example));
                }
            }
            lines.push(Line::from(vec![
                Span::raw(CARD_INDENT),
                Span::styled("[Space] Play", hint()),
            ]));
        } else {
            let guide = item.pronunciation_guide();
            let guide_line = if self.list.is_revealed(key) {
                Span::styled(guide.to_string(), Style::default().fg(Color::Gray))
            } else {
                Span::styled(mask_text(guide), hint())
            };
            lines.push(Line::from(vec![Span::raw(CARD_INDENT), guide_line]));
        }

        lines.push(Line::from(""));
        lines
    }

    fn headword_text(&self, headword: &str) -> String {
        if self.show_headwords {
            headword.to_string()
        } else {
            mask_text(headword)
        }
    }

    fn draw_now_playing(&self, frame: &mut Frame, area: Rect, item: Item<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner_width = block.inner(area).width as usize;

        let label = "NOW PLAYING  ";
        let replay = "   [a] Replay";
        let budget = inner_width.saturating_sub(label.len() + replay.len());
        let headword = truncate_to_width(&self.headword_text(item.headword()), budget);

        let line = Line::from(vec![
            Span::styled(label, hint()),
            Span::styled(headword, accent().add_modifier(Modifier::BOLD)),
            Span::styled(replay, Style::default().fg(Color::Red)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        if self.overlay.is_visible() {
            return Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Example   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reveal Pinyin   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Play   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]);
        }
        Line::from(vec![
            Span::styled("[Tab]", key_style),
            Span::raw(" Category   "),
            Span::styled("[0-6]", key_style),
            Span::raw(" Level   "),
            Span::styled("[↑↓]", key_style),
            Span::raw(" Select   "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Expand   "),
            Span::styled("[Space]", key_style),
            Span::raw(" Play   "),
            Span::styled("[r]", key_style),
            Span::raw(" Pinyin   "),
            Span::styled("[h]", key_style),
            Span::raw(" Headwords   "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ])
    }

    fn draw_overlay(&self, frame: &mut Frame, area: Rect, note: &UsageNote, now: Instant) {
        let progress = self.overlay.progress(now);
        let popup_area = centered_rect(
            animated_percent(80, 30, progress),
            animated_percent(80, 20, progress),
            area,
        );
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", note.title))
            .borders(Borders::ALL)
            .border_style(accent());
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let width = inner.width as usize;
        let mut lines: Vec<Line<'static>> = Vec::new();
        lines.push(Line::from(Span::styled("Meaning", hint())));
        lines.extend(wrap_to_width(&note.meaning, width).into_iter().map(Line::from));
        lines.push(Line::from(Span::styled("Pattern", hint())));
        lines.extend(
            wrap_to_width(&note.grammar_pattern, width)
                .into_iter()
                .map(|text| Line::from(Span::styled(text, accent()))),
        );

        let mut focus_span = (0, 0);
        for (position, card) in note.card_keys().into_iter().enumerate() {
            if card.index == 0 {
                let heading = match card.section {
                    ExampleSection::Daily => "Daily use",
                    ExampleSection::Work => "At work",
                };
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    heading,
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )));
            }
            let Some(example) = note.example(card) else {
                continue;
            };
            let start = lines.len();
            let focused = position == self.overlay.focus();
            lines.extend(self.overlay_card_lines(card, example, focused));
            if focused {
                focus_span = (start, lines.len());
            }
        }

        let height = inner.height as usize;
        let (focus_start, focus_end) = focus_span;
        let offset = focus_end.saturating_sub(height).min(focus_start);
        frame.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
    }

    fn overlay_card_lines(
        &self,
        card: CardKey,
        example: &Example,
        focused: bool,
    ) -> Vec<Line<'static>> {
        let pointer = if focused { "▶ " } else { "  " };
        let mut lines = Vec::new();
        if let Some(label) = &example.label {
            lines.push(Line::from(vec![
                Span::styled(pointer, accent()),
                Span::styled(
                    label.clone(),
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }
        let text_pointer = if example.label.is_some() { "  " } else { pointer };
        lines.push(Line::from(vec![
            Span::styled(text_pointer, accent()),
            Span::styled(
                self.headword_text(&example.target_text),
                accent().add_modifier(Modifier::BOLD),
            ),
        ]));
        let guide = if self.overlay.is_revealed(card) {
            Span::styled(
                example.pronunciation_guide.clone(),
                Style::default().fg(Color::White),
            )
        } else {
            Span::styled(mask_text(&example.pronunciation_guide), hint())
        };
        lines.push(Line::from(vec![Span::raw("  "), guide]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(example.translation.clone()),
        ]));
        lines
    }

    fn pattern_example_lines(&self, example: &Example) -> Vec<Line<'static>> {
        vec![
            Line::from(vec![
                Span::raw(CARD_INDENT),
                Span::styled("• ", hint()),
                Span::styled(self.headword_text(&example.target_text), accent()),
            ]),
            Line::from(vec![
                Span::raw(CARD_INDENT),
                Span::raw("  "),
                Span::styled(
                    example.pronunciation_guide.clone(),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(vec![
                Span::raw(CARD_INDENT),
                Span::raw("  "),
                Span::raw(example.translation.clone()),
            ]),
        ]
    }
}
