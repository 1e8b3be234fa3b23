// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use poet_app::{AppCommand, AppEvent, AppState, Poem, SearchResults, SearchTicket, results_summary};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const APP_TITLE: &str = "The Poet: A Database Search";
const APP_SUBTITLE: &str = "Search titles and authors from the PoetryDB.";
const INPUT_PLACEHOLDER: &str = "Author or Title (e.g., Shakespeare or Raven)";
const INITIAL_PROMPT: &str =
    "Start by typing an author or title above and pressing Search or Enter.";
const SEARCH_LABEL: &str = "[ Search ]";
const READ_LABEL: &str = "[ Read Full Poem ]";
const CLOSE_LABEL: &str = "[ Close ]";
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const SEARCH_BUTTON_WIDTH: u16 = 14;
const CARD_MIN_WIDTH: u16 = 40;
const CARD_HEIGHT: u16 = 13;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Completed {
        generation: u64,
        results: SearchResults,
    },
    Failed {
        generation: u64,
        error: String,
    },
}

impl SearchEvent {
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Completed { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Search(SearchEvent),
}

pub trait SearchRuntime {
    /// Runs the author/title fan-out for one term and returns once both
    /// halves settle.
    fn search(&mut self, term: &str) -> Result<SearchResults>;

    fn spawn_search(&mut self, ticket: &SearchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let event = match self.search(&ticket.term) {
            Ok(results) => SearchEvent::Completed {
                generation: ticket.generation,
                results,
            },
            Err(error) => SearchEvent::Failed {
                generation: ticket.generation,
                error: format!("{error:#}"),
            },
        };
        tx.send(InternalEvent::Search(event))
            .map_err(|_| anyhow::anyhow!("search event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    Input,
    Results,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    focus: Focus,
    cursor: usize,
    modal_scroll: u16,
    spinner_tick: usize,
    status_token: u64,
    area: Rect,
}

pub fn run_app<R: SearchRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);
        if state.is_loading {
            view_data.spinner_tick = view_data.spinner_tick.wrapping_add(1);
        }

        if let Err(error) = terminal.draw(|frame| {
            view_data.area = frame.area();
            render(frame, state, &view_data);
        }) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(Event::Mouse(mouse)) => {
                handle_mouse_event(state, runtime, &mut view_data, &internal_tx, mouse);
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Search(event) => handle_search_event(state, view_data, tx, event),
        }
    }
}

fn handle_search_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: SearchEvent,
) {
    tracing::debug!(generation = event.generation(), "search event received");
    let events = match event {
        SearchEvent::Completed {
            generation,
            results,
        } => state.dispatch(AppCommand::CompleteSearch {
            generation,
            results,
        }),
        SearchEvent::Failed { generation, error } => state.dispatch(AppCommand::AbortSearch {
            generation,
            reason: error,
        }),
    };

    if events
        .iter()
        .any(|event| matches!(event, AppEvent::ResultsChanged(Some(_))))
    {
        view_data.cursor = 0;
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        bump_status_token(view_data, tx);
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    bump_status_token(view_data, internal_tx);
}

/// The Enter/Search path. An empty term still goes through the state
/// machine so the user sees why nothing happened.
fn execute_search<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if state.is_loading {
        emit_status(state, view_data, internal_tx, "search already running");
        return;
    }

    let Some(ticket) = state
        .dispatch(AppCommand::BeginSearch)
        .into_iter()
        .find_map(|event| match event {
            AppEvent::SearchStarted(ticket) => Some(ticket),
            _ => None,
        })
    else {
        return;
    };

    view_data.cursor = 0;
    view_data.focus = Focus::Input;
    if let Err(error) = runtime.spawn_search(&ticket, internal_tx.clone()) {
        state.dispatch(AppCommand::AbortSearch {
            generation: ticket.generation,
            reason: format!("{error:#}"),
        });
    }
}

fn open_selected_poem(state: &mut AppState, view_data: &mut ViewData) {
    let Some(poem) = state
        .search_results
        .as_ref()
        .and_then(|results| results.get(view_data.cursor))
        .cloned()
    else {
        return;
    };
    view_data.modal_scroll = 0;
    state.dispatch(AppCommand::SelectPoem(poem));
}

fn handle_key_event<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if state.selected_poem.is_some() {
        handle_modal_key(state, view_data, key);
        return false;
    }

    match view_data.focus {
        Focus::Input => handle_input_key(state, runtime, view_data, internal_tx, key),
        Focus::Results => handle_results_key(state, view_data, key),
    }
    false
}

fn handle_modal_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.dispatch(AppCommand::ClosePoem);
        }
        KeyCode::Down | KeyCode::Char('j') => scroll_modal(state, view_data, 1),
        KeyCode::Up | KeyCode::Char('k') => scroll_modal(state, view_data, -1),
        KeyCode::PageDown | KeyCode::Char('d') => {
            let page = modal_page(view_data);
            scroll_modal(state, view_data, page);
        }
        KeyCode::PageUp | KeyCode::Char('u') => {
            let page = modal_page(view_data);
            scroll_modal(state, view_data, -page);
        }
        KeyCode::Home | KeyCode::Char('g') => view_data.modal_scroll = 0,
        KeyCode::End | KeyCode::Char('G') => scroll_modal(state, view_data, isize::MAX / 2),
        _ => {}
    }
}

fn handle_input_key<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => execute_search(state, runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            state.dispatch(AppCommand::DeleteChar);
        }
        KeyCode::Esc => {
            state.dispatch(AppCommand::ClearTerm);
        }
        KeyCode::Char('u') if ctrl => {
            state.dispatch(AppCommand::ClearTerm);
        }
        KeyCode::Tab | KeyCode::Down => {
            if state.result_count() > 0 {
                view_data.focus = Focus::Results;
            }
        }
        KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            state.dispatch(AppCommand::InsertChar(ch));
        }
        _ => {}
    }
}

fn handle_results_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let columns = isize::try_from(current_grid_columns(state, view_data)).unwrap_or(1);
    match key.code {
        KeyCode::Tab | KeyCode::Esc | KeyCode::Char('/') => view_data.focus = Focus::Input,
        KeyCode::Enter => open_selected_poem(state, view_data),
        KeyCode::Left | KeyCode::Char('h') => move_cursor(state, view_data, -1),
        KeyCode::Right | KeyCode::Char('l') => move_cursor(state, view_data, 1),
        KeyCode::Up | KeyCode::Char('k') => move_cursor(state, view_data, -columns),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(state, view_data, columns),
        KeyCode::Home | KeyCode::Char('g') => view_data.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            view_data.cursor = state.result_count().saturating_sub(1);
        }
        _ => {}
    }
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let count = state.result_count();
    if count == 0 {
        view_data.cursor = 0;
        return;
    }
    // Moving up past the first card stays put.
    if delta < 0 && delta.unsigned_abs() > view_data.cursor {
        return;
    }
    view_data.cursor = view_data
        .cursor
        .saturating_add_signed(delta)
        .min(count - 1);
}

fn scroll_modal(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let Some(poem) = state.selected_poem.as_ref() else {
        return;
    };
    let text = modal_layout(view_data.area).text;
    // Wrapped rows, not source lines, bound the scroll.
    let total = modal_paragraph(poem).line_count(text.width);
    let max =
        u16::try_from(total.saturating_sub(usize::from(text.height))).unwrap_or(u16::MAX);
    let next = usize::from(view_data.modal_scroll).saturating_add_signed(delta);
    view_data.modal_scroll = u16::try_from(next).unwrap_or(u16::MAX).min(max);
}

fn modal_page(view_data: &ViewData) -> isize {
    isize::try_from(modal_layout(view_data.area).text.height.max(1)).unwrap_or(1)
}

fn handle_mouse_event<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
) {
    let (column, row) = (mouse.column, mouse.row);

    if state.selected_poem.is_some() {
        match mouse.kind {
            MouseEventKind::ScrollDown => scroll_modal(state, view_data, 1),
            MouseEventKind::ScrollUp => scroll_modal(state, view_data, -1),
            MouseEventKind::Down(MouseButton::Left) => {
                let modal = modal_layout(view_data.area);
                let on_close = rect_contains(modal.close, column, row);
                let on_backdrop = !rect_contains(modal.outer, column, row);
                if on_close || on_backdrop {
                    state.dispatch(AppCommand::ClosePoem);
                }
            }
            _ => {}
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let columns = isize::try_from(current_grid_columns(state, view_data)).unwrap_or(1);
            let delta = if mouse.kind == MouseEventKind::ScrollDown {
                columns
            } else {
                -columns
            };
            move_cursor(state, view_data, delta);
            return;
        }
        _ => return,
    }

    let layout = screen_layout(view_data.area);
    if rect_contains(layout.button, column, row) {
        if state.can_submit() {
            execute_search(state, runtime, view_data, internal_tx);
        }
        return;
    }
    if rect_contains(layout.input, column, row) {
        view_data.focus = Focus::Input;
        return;
    }

    let Some(grid) = body_layout(state, layout.body).grid else {
        return;
    };
    let hit = card_slots(grid, state.result_count(), view_data.cursor)
        .into_iter()
        .find(|(_, card)| rect_contains(*card, column, row));
    if let Some((index, card)) = hit {
        view_data.cursor = index;
        view_data.focus = Focus::Results;
        if rect_contains(card_button_rect(card), column, row) {
            open_selected_poem(state, view_data);
        }
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenLayout {
    header: Rect,
    input: Rect,
    button: Rect,
    body: Rect,
    status: Rect,
}

fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);
    let search = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(SEARCH_BUTTON_WIDTH)])
        .split(rows[1]);

    ScreenLayout {
        header: rows[0],
        input: search[0],
        button: search[1],
        body: rows[2],
        status: rows[3],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct BodyLayout {
    error: Option<Rect>,
    prompt: Option<Rect>,
    loading: Option<Rect>,
    meta: Option<Rect>,
    grid: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodySlot {
    Error,
    Prompt,
    Loading,
    Meta,
    Grid,
    Filler,
}

fn show_initial_prompt(state: &AppState) -> bool {
    state.search_results.is_none() && state.error.is_none() && !state.is_loading
}

fn body_layout(state: &AppState, body: Rect) -> BodyLayout {
    let mut slots = Vec::new();
    if state.error.is_some() {
        slots.push((BodySlot::Error, Constraint::Length(4)));
    }
    if show_initial_prompt(state) {
        slots.push((BodySlot::Prompt, Constraint::Length(3)));
    }
    if state.is_loading {
        slots.push((BodySlot::Loading, Constraint::Length(1)));
    }
    if state.result_count() > 0 {
        slots.push((BodySlot::Meta, Constraint::Length(1)));
        slots.push((BodySlot::Grid, Constraint::Min(0)));
    } else {
        slots.push((BodySlot::Filler, Constraint::Min(0)));
    }

    let rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(slots.iter().map(|(_, constraint)| *constraint))
        .split(body);

    let mut layout = BodyLayout::default();
    for ((slot, _), rect) in slots.iter().zip(rects.iter()) {
        let rect = Some(*rect);
        match slot {
            BodySlot::Error => layout.error = rect,
            BodySlot::Prompt => layout.prompt = rect,
            BodySlot::Loading => layout.loading = rect,
            BodySlot::Meta => layout.meta = rect,
            BodySlot::Grid => layout.grid = rect,
            BodySlot::Filler => {}
        }
    }
    layout
}

fn grid_columns(width: u16) -> usize {
    usize::from((width / CARD_MIN_WIDTH).max(1))
}

fn current_grid_columns(state: &AppState, view_data: &ViewData) -> usize {
    body_layout(state, screen_layout(view_data.area).body)
        .grid
        .map_or(1, |grid| grid_columns(grid.width))
}

/// Visible cards for the grid, scrolled so the cursor's row is on screen.
fn card_slots(grid: Rect, count: usize, cursor: usize) -> Vec<(usize, Rect)> {
    let columns = grid_columns(grid.width);
    let visible_rows = usize::from((grid.height / CARD_HEIGHT).max(1));
    let first_row = (cursor / columns + 1).saturating_sub(visible_rows);
    let card_width = grid.width / columns as u16;

    let mut slots = Vec::new();
    for row in 0..visible_rows {
        let y = grid.y + row as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(grid.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        for column in 0..columns {
            let index = (first_row + row) * columns + column;
            if index >= count {
                return slots;
            }
            let x = grid.x + column as u16 * card_width;
            slots.push((index, Rect::new(x, y, card_width, height)));
        }
    }
    slots
}

fn card_button_rect(card: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(card);
    Rect::new(
        inner.x,
        inner.bottom().saturating_sub(1),
        inner.width,
        inner.height.min(1),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModalLayout {
    outer: Rect,
    text: Rect,
    close: Rect,
}

fn modal_layout(area: Rect) -> ModalLayout {
    let outer = centered_rect(70, 80, area);
    let inner = Block::default().borders(Borders::ALL).inner(outer);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    let close_width = (CLOSE_LABEL.len() as u16).min(parts[1].width);
    let close = Rect::new(
        parts[1].right().saturating_sub(close_width),
        parts[1].y,
        close_width,
        parts[1].height,
    );
    ModalLayout {
        outer,
        text: parts[0],
        close,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = screen_layout(frame.area());

    let header = Paragraph::new(format!("{APP_TITLE}\n{APP_SUBTITLE}"))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, layout.header);

    let input_focused = view_data.focus == Focus::Input && state.selected_poem.is_none();
    let (input_text, input_style) = if state.search_term.is_empty() {
        (
            INPUT_PLACEHOLDER.to_owned(),
            Style::default().fg(Color::DarkGray),
        )
    } else if input_focused {
        (format!("{}_", state.search_term), Style::default())
    } else {
        (state.search_term.clone(), Style::default())
    };
    let input_border = if input_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .title("search")
            .borders(Borders::ALL)
            .border_style(input_border),
    );
    frame.render_widget(input, layout.input);

    let button_style = if state.can_submit() {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(search_button_label(state, view_data))
        .alignment(Alignment::Center)
        .style(button_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, layout.button);

    render_body(frame, layout.body, state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout.status);

    if let Some(poem) = &state.selected_poem {
        render_modal(frame, poem, view_data);
    }
}

fn render_body(frame: &mut ratatui::Frame<'_>, body: Rect, state: &AppState, view_data: &ViewData) {
    let layout = body_layout(state, body);

    if let (Some(area), Some(error)) = (layout.error, &state.error) {
        let banner = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Error")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(banner, area);
    }

    if let Some(area) = layout.prompt {
        let prompt = Paragraph::new(INITIAL_PROMPT)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(prompt, area);
    }

    if let Some(area) = layout.loading {
        let loading = Paragraph::new(format!(
            "{} searching authors and titles...",
            spinner_frame(view_data)
        ))
        .style(Style::default().fg(Color::Cyan));
        frame.render_widget(loading, area);
    }

    let (Some(meta), Some(grid), Some(results)) =
        (layout.meta, layout.grid, state.search_results.as_ref())
    else {
        return;
    };

    frame.render_widget(
        Paragraph::new(results_summary(results.len()))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        meta,
    );

    let results_focused = view_data.focus == Focus::Results;
    for (index, card) in card_slots(grid, results.len(), view_data.cursor) {
        let Some(poem) = results.get(index) else {
            continue;
        };
        let selected = results_focused && index == view_data.cursor;
        let border = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let text_area = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(1),
        );
        frame.render_widget(
            Paragraph::new(card_text(poem)).wrap(Wrap { trim: false }),
            text_area,
        );

        let read_style = if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Blue)
        };
        frame.render_widget(
            Paragraph::new(READ_LABEL).style(read_style),
            card_button_rect(card),
        );
    }
}

fn render_modal(frame: &mut ratatui::Frame<'_>, poem: &Poem, view_data: &ViewData) {
    let layout = modal_layout(frame.area());
    frame.render_widget(Clear, layout.outer);

    let block = Block::default()
        .title(poem.title.as_str())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, layout.outer);

    frame.render_widget(
        modal_paragraph(poem).scroll((view_data.modal_scroll, 0)),
        layout.text,
    );

    frame.render_widget(
        Paragraph::new(CLOSE_LABEL).style(Style::default().fg(Color::Red)),
        layout.close,
    );
}

fn spinner_frame(view_data: &ViewData) -> &'static str {
    SPINNER_FRAMES[view_data.spinner_tick % SPINNER_FRAMES.len()]
}

fn search_button_label(state: &AppState, view_data: &ViewData) -> String {
    if state.is_loading {
        format!("[ {} ]", spinner_frame(view_data))
    } else {
        SEARCH_LABEL.to_owned()
    }
}

pub fn card_text(poem: &Poem) -> String {
    format!(
        "{}\nby {}\nLines: {}\n\n{}",
        poem.title,
        poem.author,
        poem.linecount,
        poem.preview()
    )
}

fn modal_text(poem: &Poem) -> String {
    format!("by {}\n\n{}", poem.author, poem.full_text())
}

fn modal_paragraph(poem: &Poem) -> Paragraph<'static> {
    Paragraph::new(modal_text(poem)).wrap(Wrap { trim: false })
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let (mode, hints) = if state.selected_poem.is_some() {
        ("POEM", "j/k scroll | esc or click outside close | ctrl+q quit")
    } else {
        match view_data.focus {
            Focus::Input => (
                "SEARCH",
                "enter search | tab results | esc clear | ctrl+q quit",
            ),
            Focus::Results => (
                "RESULTS",
                "arrows/hjkl move | enter read | tab input | ctrl+q quit",
            ),
        }
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
