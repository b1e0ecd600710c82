use std::{fs::File, sync::{Arc, Mutex}, time::{Duration, Instant}};

use anyhow::Result;
use chrono::{Local, Utc};
use clap::Parser;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Frame, Terminal, widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs}, layout::{Alignment, Constraint, Direction, Layout}, style::{Color, Modifier, Style}, text::{Line, Span}};
use tracing_subscriber::EnvFilter;

use todo_client::{
    application::todo_app::{ListView, RowView, TodoApp},
    config::ClientConfig,
    domain::todo::{Filter, TodoId},
    infrastructure::{reqwest_transport::ReqwestTransport, toasts::{ToastLevel, ToastTray}},
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = ClientConfig::parse();
    init_logging(&config)?;

    let transport = ReqwestTransport::new(&config.client_settings())?;
    tracing::info!(base_url = transport.base_url(), "starting");
    let toasts = ToastTray::default();
    let app = TodoApp::new(Arc::new(transport), Arc::new(toasts.clone()));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, Screen::new(app, toasts, config.base_url.clone()));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

/// The UI owns the terminal, so logs only go to a file when one is configured.
fn init_logging(config: &ClientConfig) -> Result<()> {
    let Some(path) = &config.log_file else { return Ok(()) };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus { List, Input }

struct Screen {
    app: TodoApp,
    toasts: ToastTray,
    focus: Focus,
    selected: usize,
    list_state: ListState,
    last_tick: Instant,
    base_url: String,
}

impl Screen {
    fn new(app: TodoApp, toasts: ToastTray, base_url: String) -> Self {
        Self { app, toasts, focus: Focus::List, selected: 0, list_state: ListState::default(), last_tick: Instant::now(), base_url }
    }

    fn rows(&self) -> Vec<RowView> {
        match self.app.list_view() {
            ListView::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    fn selected_id(&self) -> Option<TodoId> { self.rows().get(self.selected).map(|row| row.id.clone()) }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }

    /// Returns false when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.app.edit().editing_id().is_some() {
            match key.code {
                KeyCode::Esc => self.app.cancel_edit(),
                KeyCode::Enter => { self.app.save_edit(); }
                KeyCode::Backspace => { if let Some(buffer) = self.app.edit_buffer_mut() { buffer.pop(); } }
                KeyCode::Char(c) => { if let Some(buffer) = self.app.edit_buffer_mut() { buffer.push(c); } }
                _ => {}
            }
            return true;
        }
        match self.focus {
            Focus::Input => match key.code {
                KeyCode::Esc => self.focus = Focus::List,
                KeyCode::Enter => { self.app.add_todo(); }
                KeyCode::Backspace => { self.app.draft_mut().pop(); }
                KeyCode::Char(c) => self.app.draft_mut().push(c),
                _ => {}
            },
            Focus::List => match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Up => { if self.selected > 0 { self.selected -= 1; } }
                KeyCode::Down => { if self.selected + 1 < self.rows().len() { self.selected += 1; } }
                KeyCode::Enter | KeyCode::Char(' ') => { if let Some(id) = self.selected_id() { self.app.toggle(&id); } }
                KeyCode::Char('a') | KeyCode::Char('n') => self.focus = Focus::Input,
                KeyCode::Char('e') => { if let Some(id) = self.selected_id() { self.app.start_edit(&id); } }
                KeyCode::Char('d') => { if let Some(id) = self.selected_id() { self.app.delete(&id); } }
                KeyCode::Char('f') => { let next = self.app.filter().next(); self.app.set_filter(next); }
                KeyCode::Char(c @ '1'..='3') => {
                    let idx = c as usize - '1' as usize;
                    self.app.set_filter(Filter::ALL[idx]);
                }
                KeyCode::Char('r') => self.app.refetch(),
                _ => {}
            },
        }
        true
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, mut screen: Screen) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        screen.app.pump();
        screen.clamp_selection();
        terminal.draw(|f| draw(f, &mut screen))?;

        let timeout = tick_rate.saturating_sub(screen.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                if !screen.handle_key(key) { break; }
            }
        }
        if screen.last_tick.elapsed() >= tick_rate {
            screen.last_tick = Instant::now();
        }
    }
    Ok(())
}

fn draw(f: &mut Frame, screen: &mut Screen) {
    let toasts = screen.toasts.visible(Utc::now());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(toasts.len() as u16 + 2),
        ])
        .split(f.size());

    let help = match (screen.app.edit().editing_id().is_some(), screen.focus) {
        (true, _) => "Editing: type to change the title, Enter: save, Esc: cancel",
        (false, Focus::Input) => "New todo: type a title, Enter: add, Esc: back to the list",
        (false, Focus::List) => "Space/Enter: toggle, a: add, e: edit, d: delete, f/1-3: filter, r: reload, q: quit",
    };
    let header = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(format!("My Todo List  ({})", screen.base_url)));
    f.render_widget(header, chunks[0]);

    let filter = screen.app.filter();
    let selected_tab = Filter::ALL.iter().position(|candidate| *candidate == filter).unwrap_or(0);
    let tabs = Tabs::new(Filter::ALL.iter().map(|candidate| candidate.label()).collect::<Vec<_>>())
        .select(selected_tab)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("filter"));
    f.render_widget(tabs, chunks[1]);

    let busy = screen.app.todos().loading() || screen.app.create().loading() || screen.app.update().loading() || screen.app.remove().loading();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("todos [{}]{}", filter.label(), if busy { "  syncing..." } else { "" }));
    match screen.app.list_view() {
        ListView::Failed(message) => {
            let error = Paragraph::new(vec![
                Line::from(Span::styled("Error", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
                Line::from(message),
                Line::from("r: retry"),
            ])
            .style(Style::default().fg(Color::Red))
            .block(list_block);
            f.render_widget(error, chunks[2]);
        }
        ListView::Placeholders(count) => {
            let items: Vec<ListItem> = (0..count)
                .map(|_| ListItem::new("( ) ░░░░░░░░░░░░░░░░░░░░░░░░      ░░░░ ░░░░░"))
                .collect();
            let list = List::new(items).style(Style::default().fg(Color::DarkGray)).block(list_block);
            f.render_widget(list, chunks[2]);
        }
        ListView::Empty(message) => {
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray))
                .block(list_block);
            f.render_widget(empty, chunks[2]);
        }
        ListView::Rows(rows) => {
            let items: Vec<ListItem> = rows.iter().map(row_item).collect();
            let list = List::new(items)
                .block(list_block)
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, chunks[2], &mut screen.list_state);
        }
    }

    let input_style = if screen.focus == Focus::Input { Style::default().fg(Color::Yellow) } else { Style::default() };
    let cursor = if screen.focus == Focus::Input { "_" } else { "" };
    let input = Paragraph::new(format!("{}{}", screen.app.draft(), cursor))
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title("What do you need to do?"));
    f.render_widget(input, chunks[3]);

    let lines: Vec<Line> = toasts
        .iter()
        .map(|toast| {
            let color = match toast.level { ToastLevel::Success => Color::Green, ToastLevel::Error => Color::Red };
            let at = toast.raised_at.with_timezone(&Local).format("%H:%M:%S");
            Line::from(Span::styled(format!("{at}  {}", toast.message), Style::default().fg(color)))
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("notifications")), chunks[4]);
}

fn row_item(row: &RowView) -> ListItem<'static> {
    let mark = if row.completed { "[x]" } else { "[ ]" };
    let [first, second] = row.controls();
    let text = if row.editing { format!("{}_", row.text) } else { row.text.clone() };
    let style = if row.editing {
        Style::default().fg(Color::Yellow)
    } else if row.completed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    ListItem::new(format!("{mark} {text}   [{first}] [{second}]")).style(style)
}
