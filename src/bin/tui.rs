use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use bookshelf::{
    application::record_service::{RecordService, RecordServiceImpl},
    config::AppConfig,
    domain::{record::RecordId, repository::Repository, todo::{Todo, TodoRequest}},
    infrastructure::sqlite_repo::SqliteTodoRepository,
};

type Service = RecordServiceImpl<Todo, SqliteTodoRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let service = Service::new(repo);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, service, config.database_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create }

#[derive(Clone, Copy, PartialEq, Eq)]
enum Filter { All, Open, Done }

impl Filter {
    fn label(self) -> &'static str {
        match self { Filter::All => "All", Filter::Open => "Open", Filter::Done => "Done" }
    }

    fn next(self) -> Self {
        match self { Filter::All => Filter::Open, Filter::Open => Filter::Done, Filter::Done => Filter::All }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActiveField { Title, Description, Priority }

impl ActiveField {
    fn label(self) -> &'static str {
        match self { ActiveField::Title => "Title", ActiveField::Description => "Desc", ActiveField::Priority => "Priority" }
    }

    fn next(self) -> Self {
        match self { ActiveField::Title => ActiveField::Description, ActiveField::Description => ActiveField::Priority, ActiveField::Priority => ActiveField::Title }
    }
}

struct App {
    service: Service,
    database_url: String,
    items: Vec<Todo>,
    selected: usize,
    last_tick: Instant,
    mode: Mode,
    list_state: ListState,
    filter: Filter,
    filtered_indices: Vec<usize>,
    field: ActiveField,
    draft_title: String,
    draft_desc: String,
    draft_priority: String,
    status: Option<String>,
}

impl App {
    fn new(service: Service, database_url: String) -> Self {
        App {
            service,
            database_url,
            items: vec![],
            selected: 0,
            last_tick: Instant::now(),
            mode: Mode::View,
            list_state: ListState::default(),
            filter: Filter::All,
            filtered_indices: Vec::new(),
            field: ActiveField::Title,
            draft_title: String::new(),
            draft_desc: String::new(),
            draft_priority: String::new(),
            status: None,
        }
    }

    async fn load(&mut self) -> Result<()> {
        self.items = self.service.list().await?;
        self.recompute_filtered();
        Ok(())
    }

    fn recompute_filtered(&mut self) {
        self.filtered_indices.clear();
        for (i, t) in self.items.iter().enumerate() {
            let include = match self.filter {
                Filter::All => true,
                Filter::Open => !t.complete,
                Filter::Done => t.complete,
            };
            if include { self.filtered_indices.push(i); }
        }
        let len = self.filtered_indices.len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }

    fn current(&self) -> Option<&Todo> {
        self.filtered_indices.get(self.selected).and_then(|&idx| self.items.get(idx))
    }

    fn clear_draft(&mut self) {
        self.draft_title.clear();
        self.draft_desc.clear();
        self.draft_priority.clear();
    }

    fn active_draft(&mut self) -> &mut String {
        match self.field {
            ActiveField::Title => &mut self.draft_title,
            ActiveField::Description => &mut self.draft_desc,
            ActiveField::Priority => &mut self.draft_priority,
        }
    }

    async fn toggle_current(&mut self) {
        let Some(todo) = self.current() else { return };
        let id = todo.id;
        let request = TodoRequest { complete: !todo.complete, ..TodoRequest::from(todo) };
        let outcome = self.service.replace(id, request).await;
        self.report(outcome.map(|_| format!("toggled #{id}")));
    }

    async fn delete_current(&mut self) {
        let Some(id) = self.current().map(|t| t.id) else { return };
        let outcome = self.service.delete(id).await;
        self.report(outcome.map(|_| format!("deleted #{id}")));
        if self.selected > 0 { self.selected -= 1; }
    }

    async fn save_draft(&mut self) {
        let Ok(priority) = self.draft_priority.trim().parse::<i64>() else {
            self.status = Some("priority must be a number from 1 to 5".into());
            return;
        };
        let request = TodoRequest {
            id: None,
            title: self.draft_title.trim().to_string(),
            description: self.draft_desc.trim().to_string(),
            priority,
            complete: false,
        };
        let created = self.service.create(request).await.map(|t| t.id);
        let ok = created.is_ok();
        self.report(created.map(|id: RecordId| format!("created #{id}")));
        if ok {
            self.mode = Mode::View;
            self.clear_draft();
        }
    }

    fn report(&mut self, outcome: Result<String, bookshelf::error::AppError>) {
        self.status = Some(match outcome { Ok(msg) => msg, Err(e) => format!("error: {e}") });
    }
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, service: Service, database_url: String) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App::new(service, database_url);
    app.load().await?;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new("Todos (Enter: toggle, n: new, d: delete, f: filter, q: quit)  |  New: Tab to switch field, Enter to save, Esc to cancel")
                .block(Block::default().borders(Borders::ALL).title("bookshelf-tui"));
            f.render_widget(header, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let list_items: Vec<ListItem> = app.filtered_indices.iter().filter_map(|&idx| app.items.get(idx)).map(|t| {
                let mark = if t.complete { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} P{} {}", mark, t.priority, t.title))
            }).collect();
            if app.filtered_indices.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(format!("items [{}]", app.filter.label())))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, middle[0], &mut app.list_state);

            let detail = match app.current() {
                Some(t) => format!(
                    "#{}  {}\n\nPriority: {}\nComplete: {}\n\nDescription:\n{}",
                    t.id, t.title, t.priority, if t.complete { "yes" } else { "no" }, t.description
                ),
                None => String::new(),
            };
            let details = Paragraph::new(detail)
                .block(Block::default().borders(Borders::ALL).title("details"));
            f.render_widget(details, middle[1]);

            let footer_text = match app.mode {
                Mode::View => app.status.clone().unwrap_or_else(|| format!("DATABASE_URL={}  |  Filter=[{}]", app.database_url, app.filter.label())),
                Mode::Create => {
                    let value = match app.field { ActiveField::Title => &app.draft_title, ActiveField::Description => &app.draft_desc, ActiveField::Priority => &app.draft_priority };
                    let hint = app.status.as_deref().unwrap_or("Tab to switch, Enter to save, Esc to cancel");
                    format!("{}: {}_  |  {}", app.field.label(), value, hint)
                }
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "info", Mode::Create => "create" }));
            f.render_widget(footer, chunks[2]);
        })?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Presses only; repeats and releases would duplicate input.
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                        KeyCode::Down => { let len = app.filtered_indices.len(); if app.selected + 1 < len { app.selected += 1; } }
                        KeyCode::Enter => { app.toggle_current().await; app.load().await?; }
                        KeyCode::Char('d') => { app.delete_current().await; app.load().await?; }
                        KeyCode::Char('n') => {
                            app.mode = Mode::Create;
                            app.field = ActiveField::Title;
                            app.status = None;
                            app.clear_draft();
                        }
                        KeyCode::Char('f') => {
                            app.filter = app.filter.next();
                            app.recompute_filtered();
                        }
                        _ => {}
                    },
                    Mode::Create => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.status = None; app.clear_draft(); }
                        KeyCode::Enter => { app.save_draft().await; app.load().await?; }
                        KeyCode::Backspace => { app.active_draft().pop(); }
                        KeyCode::Char(c) => app.active_draft().push(c),
                        KeyCode::Tab => { app.field = app.field.next(); }
                        _ => {}
                    },
                }
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}
