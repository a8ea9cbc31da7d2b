// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal dashboard.
//!
//! The reference host for a [`DataController`]: a commits table that dims while a refresh is in
//! flight, keeps the last page visible under a failed refresh (inline banner), and mirrors its
//! filter/paging state into the shareable query shown in the header.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::controller::{DataController, PagingLinks, PagingOptions, ViewState};
use crate::model::{BuildStatus, CommitSummary};
use crate::nav::MemoryNavigator;
use crate::nav::Navigator as _;
use crate::params::Params;
use crate::ui::ChangeSignal;

const PASSED_COLOR: Color = Color::LightGreen;
const FAILED_COLOR: Color = Color::LightRed;
const IN_PROGRESS_COLOR: Color = Color::LightYellow;
const UNKNOWN_COLOR: Color = Color::DarkGray;
const DIMMED_COLOR: Color = Color::DarkGray;
const BANNER_COLOR: Color = Color::LightRed;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const SHARE_COLOR: Color = Color::DarkGray;

const REDRAW_AT_LEAST_EVERY: Duration = Duration::from_secs(1);

type Feed = Vec<CommitSummary>;

/// Dashboard state. Construction performs the host's mount duties: seed `initialize` (guarded,
/// so a re-created `App` over a surviving controller does not duplicate the fetch) and restore
/// the shareable address.
pub struct App {
    controller: DataController<Feed>,
    signal: Arc<ChangeSignal>,
    navigator: Arc<MemoryNavigator>,
    branches: Vec<String>,
    branch_index: Option<usize>,
    live_update: bool,
    poll_interval: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(
        controller: DataController<Feed>,
        signal: Arc<ChangeSignal>,
        navigator: Arc<MemoryNavigator>,
        branches: Vec<String>,
        poll_interval: Duration,
        initial_params: Params,
    ) -> Self {
        let branch_index = initial_params
            .get("branch")
            .and_then(|branch| branches.iter().position(|known| known == branch));

        if !controller.has_run_initialize() {
            controller.initialize(initial_params);
        }
        let _ = controller.update_address();

        Self {
            controller,
            signal,
            navigator,
            branches,
            branch_index,
            live_update: false,
            poll_interval,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn live_update(&self) -> bool {
        self.live_update
    }

    pub fn controller(&self) -> &DataController<Feed> {
        &self.controller
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.controller.destroy();
                self.should_quit = true;
            }
            KeyCode::Char('n') => self.follow_next(),
            KeyCode::Char('p') => self.follow_previous(),
            KeyCode::Char('b') => self.cycle_branch(),
            KeyCode::Char('r') => {
                let _ = self.controller.update_with_params(Params::new(), false);
            }
            KeyCode::Char('l') => self.toggle_live_update(),
            _ => {}
        }
    }

    fn paging_links(&self) -> PagingLinks {
        self.controller.paging_links(PagingOptions::next_previous())
    }

    fn follow_next(&mut self) {
        if let Some(link) = self.paging_links().next {
            let _ = self.controller.follow(&link);
            let _ = self.controller.update_address();
        }
    }

    fn follow_previous(&mut self) {
        if let Some(link) = self.paging_links().previous {
            let _ = self.controller.follow(&link);
            let _ = self.controller.update_address();
        }
    }

    /// Advances the branch filter: all branches -> first -> ... -> last -> all branches.
    /// A filter change invalidates the current page, so paging resets.
    fn cycle_branch(&mut self) {
        if self.branches.is_empty() {
            return;
        }
        self.branch_index = match self.branch_index {
            None => Some(0),
            Some(index) if index + 1 < self.branches.len() => Some(index + 1),
            Some(_) => None,
        };

        let mut partial = Params::new();
        match self.branch_index {
            Some(index) => partial.set("branch", self.branches[index].as_str()),
            None => partial.set("branch", ""),
        }
        let _ = self.controller.update_with_params(partial, true);
        let _ = self.controller.update_address();
    }

    fn toggle_live_update(&mut self) {
        self.live_update = !self.live_update;
        if self.live_update {
            self.controller.enable_polling(self.poll_interval);
        } else {
            self.controller.disable_polling();
        }
    }

    fn current_branch_label(&self) -> &str {
        match self.branch_index {
            Some(index) => self.branches[index].as_str(),
            None => "all",
        }
    }
}

/// Runs the dashboard until the user quits.
pub fn run(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut last_drawn_rev = None;
    let mut last_drawn_at = Instant::now();

    while !app.should_quit {
        let rev = app.signal.rev();
        if last_drawn_rev != Some(rev) || last_drawn_at.elapsed() >= REDRAW_AT_LEAST_EVERY {
            terminal.draw(|frame| draw(frame, &app))?;
            last_drawn_rev = Some(rev);
            last_drawn_at = Instant::now();
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    last_drawn_rev = None;
                }
                Event::Resize(..) => {
                    last_drawn_rev = None;
                }
                _ => {}
            }
        }
    }

    Ok(())
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.size();

    let banner = app.controller.failed_to_load_updated_data();
    let mut constraints = vec![Constraint::Length(2)];
    if banner {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let layout =
        Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);
    let header_area = layout[0];
    let mut next_area = 1;
    let banner_area = if banner {
        next_area += 1;
        Some(layout[next_area - 1])
    } else {
        None
    };
    let body_area = layout[next_area];
    let footer_area = layout[next_area + 1];

    frame.render_widget(header_widget(app), header_area);
    if let Some(banner_area) = banner_area {
        if let Some(error) = app.controller.data_for_error_message() {
            frame.render_widget(Paragraph::new(banner_line(&error.to_string())), banner_area);
        }
    }
    draw_body(frame, app, body_area);
    frame.render_widget(
        Paragraph::new(footer_help_line(app.live_update, &app.paging_links())),
        footer_area,
    );
}

fn draw_body(frame: &mut Frame<'_>, app: &App, area: Rect) {
    match app.controller.data_to_show() {
        ViewState::NotRequested | ViewState::Loading => {
            frame.render_widget(
                Paragraph::new("Loading commits…").wrap(Wrap { trim: true }),
                area,
            );
        }
        ViewState::Failed(error) => {
            frame.render_widget(
                Paragraph::new(format!("Could not load commits.\n\n{error}"))
                    .style(Style::default().fg(BANNER_COLOR))
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
        ViewState::Loaded(envelope) => {
            let now_secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0);
            let dimmed = app.controller.is_loading_updated_data();

            let rows = envelope.data.iter().map(|commit| {
                let cells = commit_cells(commit, now_secs);
                let status_style = if dimmed {
                    Style::default().fg(DIMMED_COLOR)
                } else {
                    Style::default().fg(status_color(commit.status))
                };
                Row::new(vec![
                    Cell::from(cells[0].clone()).style(status_style),
                    Cell::from(cells[1].clone()),
                    Cell::from(cells[2].clone()),
                    Cell::from(cells[3].clone()),
                    Cell::from(cells[4].clone()),
                    Cell::from(cells[5].clone()),
                ])
            });

            let widths = [
                Constraint::Length(2),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Min(20),
                Constraint::Length(9),
            ];
            let mut table = Table::new(rows, widths)
                .header(
                    Row::new(vec!["", "Commit", "Author", "Branch", "Name", "Committed"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .block(Block::default().borders(Borders::TOP).title(body_title(app)));
            if dimmed {
                table = table.style(Style::default().fg(DIMMED_COLOR));
            }
            frame.render_widget(table, area);
        }
    }
}

fn header_widget(app: &App) -> Paragraph<'static> {
    let title = Line::from(vec![
        Span::styled("Tidemark", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" — commit feed"),
    ]);
    let share = share_line(&app.navigator.read_query());
    Paragraph::new(vec![title, share])
}

fn body_title(app: &App) -> String {
    format!("commits · branch: {}", app.current_branch_label())
}

fn share_line(query: &str) -> Line<'static> {
    let target = if query.is_empty() { "(default view)".to_owned() } else { format!("?{query}") };
    Line::from(vec![
        Span::styled("share ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled(target, Style::default().fg(SHARE_COLOR)),
    ])
}

fn banner_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("refresh failed: {message} — showing the last loaded page"),
        Style::default().fg(BANNER_COLOR),
    ))
}

fn footer_help_line(live_update: bool, links: &PagingLinks) -> Line<'static> {
    let mut spans = Vec::new();
    let mut hint = |key: &str, label: String| {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(format!(" {label}"), Style::default().fg(FOOTER_LABEL_COLOR)));
    };

    hint("q", "quit".to_owned());
    hint("b", "branch".to_owned());
    if links.next.is_some() {
        hint("n", "next page".to_owned());
    }
    if links.previous.is_some() {
        hint("p", "prev page".to_owned());
    }
    hint("r", "refresh".to_owned());
    hint("l", format!("live update: {}", if live_update { "on" } else { "off" }));

    Line::from(spans)
}

fn status_color(status: BuildStatus) -> Color {
    match status {
        BuildStatus::Passed => PASSED_COLOR,
        BuildStatus::Failed => FAILED_COLOR,
        BuildStatus::InProgress => IN_PROGRESS_COLOR,
        BuildStatus::Unknown => UNKNOWN_COLOR,
    }
}

fn commit_cells(commit: &CommitSummary, now_secs: u64) -> [String; 6] {
    [
        commit.status.glyph().to_owned(),
        commit.short_sha().to_owned(),
        commit.author.clone(),
        commit.branch.clone(),
        commit.title().to_owned(),
        humanize_age(now_secs, commit.committed_at),
    ]
}

fn humanize_age(now_secs: u64, committed_at: u64) -> String {
    let delta = now_secs.saturating_sub(committed_at);
    if delta < 60 {
        format!("{delta}s")
    } else if delta < 3_600 {
        format!("{}m", delta / 60)
    } else if delta < 86_400 {
        format!("{}h", delta / 3_600)
    } else {
        format!("{}d", delta / 86_400)
    }
}
