use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use todo_api::{
    application::todo_service::{TodoService, TodoServiceImpl},
    config::AppConfig,
    domain::{repository::TodoRepository, todo::Todo},
    infrastructure::sqlite_repo::{prepare_sqlite_file, SqliteTodoRepository},
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    prepare_sqlite_file(&config.database_url)?;
    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);

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
enum Mode { View, Create, Edit }

struct App<R: TodoRepository> {
    service: TodoServiceImpl<R>,
    database_url: String,
    items: Vec<Todo>,
    selected: usize,
    last_tick: Instant,
    mode: Mode,
    list_state: ListState,
    draft_title: String,
    status: Option<String>,
}

impl<R: TodoRepository> App<R> {
    async fn load(&mut self) -> Result<()> {
        self.items = self.service.find_all().await?;
        let len = self.items.len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
        Ok(())
    }

    fn selected_todo(&self) -> Option<&Todo> { self.items.get(self.selected) }

    /// Saves through the service, keeping failures on the status line instead of aborting the UI.
    async fn save(&mut self, todo: Todo) {
        self.status = match self.service.save(todo).await {
            Ok(saved) => saved.id.map(|id| format!("saved #{id}")),
            Err(e) => Some(format!("save failed: {e}")),
        };
    }
}

async fn run_app<R: TodoRepository>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, service: TodoServiceImpl<R>, database_url: String) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { service, database_url, items: vec![], selected: 0, last_tick: Instant::now(), mode: Mode::View, list_state: ListState::default(), draft_title: String::new(), status: None };
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

            let header = Paragraph::new("Todos (Enter: toggle completed, n: new, e: edit title, d: delete, q: quit)  |  New/Edit: type title, Enter to save, Esc to cancel")
                .block(Block::default().borders(Borders::ALL).title("todo-tui"));
            f.render_widget(header, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let list_items: Vec<ListItem> = app.items.iter().map(|t| {
                let mark = if t.is_completed() { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", mark, t.title))
            }).collect();
            if app.items.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(format!("items [{}]", app.items.len())))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, middle[0], &mut app.list_state);

            let detail = match app.items.get(app.selected) {
                Some(t) => format!(
                    "Id: {}\n\nTitle:\n{}\n\nCompleted: {}",
                    t.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    t.title,
                    if t.is_completed() { "yes" } else { "no" },
                ),
                None => String::new(),
            };
            let details = Paragraph::new(detail)
                .block(Block::default().borders(Borders::ALL).title("details"));
            f.render_widget(details, middle[1]);

            let footer_text = match app.mode {
                Mode::View => match &app.status {
                    Some(status) => format!("DATABASE_URL={}  |  {}", app.database_url, status),
                    None => format!("DATABASE_URL={}", app.database_url),
                },
                Mode::Create => format!("Create title: {}_  |  (Enter to save, Esc to cancel)", app.draft_title),
                Mode::Edit => format!("Edit title: {}_  |  (Enter to save, Esc to cancel)", app.draft_title),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "info", Mode::Create => "create", Mode::Edit => "edit" }));
            f.render_widget(footer, chunks[2]);
        })?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                        KeyCode::Down => { if app.selected + 1 < app.items.len() { app.selected += 1; } }
                        KeyCode::Enter => {
                            if let Some(mut todo) = app.selected_todo().cloned() {
                                todo.set_completed(!todo.is_completed());
                                app.save(todo).await;
                                app.load().await?;
                            }
                        }
                        KeyCode::Char('n') => {
                            app.mode = Mode::Create;
                            app.draft_title.clear();
                        }
                        KeyCode::Char('e') => {
                            if let Some(title) = app.selected_todo().map(|t| t.title.clone()) {
                                app.mode = Mode::Edit;
                                app.draft_title = title;
                            }
                        }
                        KeyCode::Char('d') => {
                            if let Some(id) = app.selected_todo().and_then(|t| t.id) {
                                app.status = match app.service.delete_by_id(id).await {
                                    Ok(()) => Some(format!("deleted #{id}")),
                                    Err(e) => Some(format!("delete failed: {e}")),
                                };
                                if app.selected > 0 { app.selected -= 1; }
                                app.load().await?;
                            }
                        }
                        _ => {}
                    },
                    Mode::Create | Mode::Edit => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.draft_title.clear(); }
                        KeyCode::Enter => {
                            let title = std::mem::take(&mut app.draft_title);
                            let todo = draft_todo(app.mode, app.selected_todo(), title);
                            if let Some(todo) = todo { app.save(todo).await; }
                            app.mode = Mode::View;
                            app.draft_title.clear();
                            app.load().await?;
                        }
                        KeyCode::Backspace => { app.draft_title.pop(); }
                        KeyCode::Char(c) => app.draft_title.push(c),
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

/// Turns the typed title into the todo to save. Titles are stored as typed, empty ones included.
fn draft_todo(mode: Mode, selected: Option<&Todo>, title: String) -> Option<Todo> {
    match mode {
        Mode::Create => Some(Todo::new(title, false)),
        Mode::Edit => selected.cloned().map(|t| Todo { title, ..t }),
        Mode::View => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_api::domain::todo::TodoId;

    #[test]
    fn create_keeps_empty_title() {
        let todo = draft_todo(Mode::Create, None, String::new()).unwrap();
        assert_eq!(todo, Todo::new("", false));
    }

    #[test]
    fn edit_replaces_only_title() {
        let existing = Todo { id: Some(TodoId(4)), title: "old".into(), completed: true };
        let todo = draft_todo(Mode::Edit, Some(&existing), "  ".into()).unwrap();
        assert_eq!(todo, Todo { id: Some(TodoId(4)), title: "  ".into(), completed: true });
    }

    #[test]
    fn edit_without_selection_saves_nothing() {
        assert_eq!(draft_todo(Mode::Edit, None, "x".into()), None);
    }
}
