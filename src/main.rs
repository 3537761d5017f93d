use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, Frame, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}, text::{Line, Span}};
use tracing_subscriber::EnvFilter;

use todo_sync::{
    application::{notice::{Level, Toasts}, session::{Request, Session}, synchronizer::TodoSynchronizer, view::{self, ListView}},
    config::Config,
    domain::todo::Field,
    infrastructure::http_collection::HttpTodoCollection,
};

type Synchronizer = TodoSynchronizer<HttpTodoCollection, Toasts>;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    // the terminal belongs to the UI, so logs go to a file
    let log = OpenOptions::new().create(true).append(true).open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(Mutex::new(log))
        .init();

    let collection = HttpTodoCollection::new(&config.api_url, config.request_timeout)?;
    tracing::info!(url = %collection.base_url(), "starting");
    let sync = TodoSynchronizer::new(collection, Toasts::new(config.toast_ttl));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, sync).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus { List, Form(Field) }

struct App {
    session: Session<HttpTodoCollection, Toasts>,
    selected: usize,
    list_state: ListState,
    focus: Focus,
    last_tick: Instant,
}

impl App {
    fn clamp_selection(&mut self) {
        let len = self.session.list().len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }
}

fn edit_field(sync: &mut Synchronizer, field: Field, edit: impl FnOnce(&mut String)) {
    let mut value = sync.draft().fields().get(field).to_string();
    edit(&mut value);
    sync.set_field(field, value);
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, sync: Synchronizer) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { session: Session::new(sync), selected: 0, list_state: ListState::default(), focus: Focus::Form(Field::Title), last_tick: Instant::now() };
    app.session.start(Request::Refresh);

    loop {
        if let Some(done) = app.session.poll()? {
            if done.request == Request::Submit && done.succeeded { app.focus = Focus::List; }
            app.clamp_selection();
        }
        terminal.draw(|f| draw(f, &mut app))?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                if app.focus == Focus::List && key.code == KeyCode::Char('q') { break; }
                // keys are dropped while a request owns the synchronizer
                let Some(sync) = app.session.idle_mut() else { continue };
                let mut request = None;
                match app.focus {
                    Focus::List => match key.code {
                        KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                        KeyCode::Down => { if app.selected + 1 < sync.list().len() { app.selected += 1; } }
                        KeyCode::Char('e') => {
                            if let Some(todo) = sync.list().get(app.selected).cloned() {
                                sync.begin_edit(&todo);
                                app.focus = Focus::Form(Field::Title);
                            }
                        }
                        KeyCode::Char('d') => { request = sync.list().get(app.selected).map(|t| Request::Remove(t.id)); }
                        KeyCode::Char('n') => { sync.reset(); app.focus = Focus::Form(Field::Title); }
                        KeyCode::Char('r') => { request = Some(Request::Refresh); }
                        KeyCode::Tab => { app.focus = Focus::Form(Field::Title); }
                        _ => {}
                    },
                    Focus::Form(field) => match key.code {
                        KeyCode::Esc => { sync.reset(); app.focus = Focus::List; }
                        KeyCode::Enter => { request = Some(Request::Submit); }
                        KeyCode::Backspace => edit_field(sync, field, |v| { v.pop(); }),
                        KeyCode::Char(c) => edit_field(sync, field, |v| v.push(c)),
                        KeyCode::Tab => {
                            app.focus = if field == Field::Description { Focus::List } else { Focus::Form(field.next()) };
                        }
                        _ => {}
                    },
                }
                if let Some(request) = request { app.session.start(request); }
                app.clamp_selection();
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            if let Some(sync) = app.session.idle_mut() { sync.notifier_mut().expire(Instant::now()); }
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let draft = app.session.draft();
    let form_title = match draft.id() {
        Some(id) => format!("edit todo #{id}  [Enter] {}", view::submit_label(draft)),
        None => format!("new todo  [Enter] {}", view::submit_label(draft)),
    };
    let form_lines: Vec<Line> = Field::ALL.iter().map(|&field| {
        let active = app.focus == Focus::Form(field);
        let cursor = if active { "_" } else { "" };
        let style = if active { Style::default().fg(Color::Cyan) } else { Style::default() };
        Line::from(vec![
            Span::styled(format!("{:<12}", field.name()), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("{}{cursor}", draft.fields().get(field)), style),
        ])
    }).collect();
    f.render_widget(Paragraph::new(form_lines).block(Block::default().borders(Borders::ALL).title(form_title)), chunks[0]);

    let list_block = Block::default().borders(Borders::ALL).title("Todos  (e: edit, d: delete, n: new, r: refresh, q: quit)");
    match ListView::project(app.session.list()) {
        ListView::Empty => f.render_widget(Paragraph::new(view::EMPTY_MESSAGE).block(list_block), chunks[1]),
        ListView::Rows(rows) => {
            let items: Vec<ListItem> = rows.into_iter().map(|row| ListItem::new(vec![
                Line::from(Span::styled(row.title, Style::default().add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(row.description, Style::default().fg(Color::Gray))),
            ])).collect();
            let highlight = if app.focus == Focus::List { Modifier::BOLD | Modifier::REVERSED } else { Modifier::BOLD };
            let list = List::new(items)
                .block(list_block)
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(highlight))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, chunks[1], &mut app.list_state);
        }
    }

    let footer = match (app.session.pending(), app.session.idle().and_then(|s| s.notifier().current())) {
        (Some(request), _) => Paragraph::new(Span::styled(format!("working: {request:?}..."), Style::default().fg(Color::Yellow))),
        (None, Some(notice)) => {
            let color = match notice.level { Level::Success => Color::Green, Level::Info => Color::Blue, Level::Error => Color::Red };
            Paragraph::new(Span::styled(notice.message.clone(), Style::default().fg(color)))
        }
        (None, None) => Paragraph::new("Tab: switch field/list  |  Enter: save  |  Esc: cancel edit"),
    };
    f.render_widget(footer.block(Block::default().borders(Borders::ALL).title("status")), chunks[2]);
}
