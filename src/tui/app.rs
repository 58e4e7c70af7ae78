use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::board::{BoardGeometry, DragListener, DragSessionController, WindowConfig};
use crate::io::board_io::{self, discover_board, load_board};
use crate::io::lock::{TUI_TIMEOUT, with_lock};
use crate::io::watcher::BoardWatcher;
use crate::logging::{self, LogTarget};
use crate::model::{Application, Board, Status};
use crate::ops::partition::column_indices;

use super::input;
use super::render;
use super::theme::Theme;

/// A one-line message for the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Committed changes waiting to be written.
///
/// Filled by drag commits, drained after each event. Provisional status
/// changes never land here.
#[derive(Debug, Default)]
pub struct Outbox {
    /// The collection changed and must be saved
    pub dirty: bool,
    /// Status changes committed since the last flush, for the status row
    pub status_changes: Vec<(String, Status)>,
}

/// Applies drag effects to the live board.
pub struct BoardSink<'a> {
    pub applications: &'a mut Vec<Application>,
    pub outbox: &'a mut Outbox,
}

impl DragListener for BoardSink<'_> {
    fn on_provisional_status(&mut self, id: &str, status: Status) {
        if let Some(app) = self.applications.iter_mut().find(|a| a.id == id) {
            app.status = status;
        }
    }

    fn on_status_change(&mut self, id: &str, status: Status) {
        self.outbox.status_changes.push((id.to_string(), status));
    }

    fn on_reorder(&mut self, collection: Vec<Application>) {
        *self.applications = collection;
        self.outbox.dirty = true;
    }
}

/// Main application state
pub struct App {
    pub board: Board,
    pub theme: Theme,
    pub window_config: WindowConfig,
    pub drag: DragSessionController,
    /// Where everything was drawn last frame, for hit testing
    pub geometry: BoardGeometry,
    /// Index into the stage order
    pub focused_column: usize,
    /// Focused card index per column
    pub cursors: HashMap<Status, usize>,
    /// Scroll offset per column, in rows
    pub scroll: HashMap<Status, f64>,
    pub outbox: Outbox,
    pub message: Option<StatusMessage>,
    /// An external change arrived during a drag and is waiting
    pub pending_reload: bool,
    /// Fingerprint of the last applications.json we wrote
    pub last_written: Option<u64>,
    pub should_quit: bool,
}

impl App {
    pub fn new(board: Board) -> Self {
        let theme = Theme::from_config(&board.config.ui);
        let window_config = WindowConfig::from_config(&board.config.virtualization);
        let drag = DragSessionController::new(&board.config.drag);
        App {
            board,
            theme,
            window_config,
            drag,
            geometry: BoardGeometry::default(),
            focused_column: 0,
            cursors: HashMap::new(),
            scroll: HashMap::new(),
            outbox: Outbox::default(),
            message: None,
            pending_reload: false,
            last_written: None,
            should_quit: false,
        }
    }

    pub fn stages(&self) -> &[Status] {
        self.board.config.board.stages.stages()
    }

    pub fn focused_status(&self) -> Option<Status> {
        self.stages().get(self.focused_column).copied()
    }

    /// Number of cards in a column
    pub fn column_len(&self, status: Status) -> usize {
        self.board
            .applications
            .iter()
            .filter(|a| a.status == status)
            .count()
    }

    pub fn cursor(&self, status: Status) -> usize {
        self.cursors.get(&status).copied().unwrap_or(0)
    }

    /// The focused card, if its column is not empty
    pub fn focused_card(&self) -> Option<(Status, usize, &Application)> {
        let status = self.focused_status()?;
        let members = column_indices(&self.board.applications, status);
        let index = self.cursor(status).min(members.len().checked_sub(1)?);
        Some((status, index, &self.board.applications[members[index]]))
    }

    /// Clamp cursors to their columns after the collection changed
    pub fn clamp_cursors(&mut self) {
        let statuses: Vec<Status> = self.stages().to_vec();
        for status in statuses {
            let len = self.column_len(status);
            let cursor = self.cursors.entry(status).or_insert(0);
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
        if self.focused_column >= self.stages().len() {
            self.focused_column = self.stages().len().saturating_sub(1);
        }
    }

    /// Put the focus on the card with `id`
    pub fn focus_card(&mut self, id: &str) {
        let Some((status, index)) =
            crate::ops::partition::column_position(&self.board.applications, id)
        else {
            return;
        };
        if let Some(col) = self.board.config.board.stages.position(status) {
            self.focused_column = col;
            self.cursors.insert(status, index);
        }
    }

    /// A listener that applies drag effects to this app
    pub fn sink(&mut self) -> BoardSink<'_> {
        BoardSink {
            applications: &mut self.board.applications,
            outbox: &mut self.outbox,
        }
    }

    /// Write committed changes to disk.
    ///
    /// A failed write is reported but not rolled back: the board keeps
    /// showing the committed order and the next successful flush persists it.
    /// Nothing is written while a session is active, since the live
    /// collection then carries provisional statuses.
    pub fn flush(&mut self) {
        if self.drag.is_active() {
            return;
        }
        let changes = std::mem::take(&mut self.outbox.status_changes);
        if !self.outbox.dirty {
            return;
        }

        let data_dir = &self.board.data_dir;
        let applications = &self.board.applications;
        let result = with_lock(data_dir, TUI_TIMEOUT, || {
            board_io::save_applications(data_dir, applications)
        });

        match result {
            Ok(fingerprint) => {
                self.outbox.dirty = false;
                self.last_written = Some(fingerprint);
                if let Some((id, status)) = changes.last() {
                    self.message = Some(StatusMessage::info(format!(
                        "{} moved to {}",
                        id,
                        status.label()
                    )));
                }
            }
            Err(e) => {
                // Stays dirty so the next flush retries
                tracing::warn!(error = %e, "could not save applications");
                self.message = Some(StatusMessage::error(format!("save failed: {}", e)));
            }
        }
    }

    /// React to a change of applications.json or board.toml on disk.
    ///
    /// Deferred while a drag session is active; writes of our own are
    /// recognised by fingerprint and skipped.
    pub fn handle_external_change(&mut self) {
        if self.drag.is_active() {
            self.pending_reload = true;
            return;
        }
        self.pending_reload = false;

        let on_disk = board_io::applications_fingerprint(&self.board.data_dir);
        let config_changed = match crate::io::config_io::read_config(&self.board.data_dir) {
            Ok(config) => {
                let changed = config != self.board.config;
                if changed {
                    tracing::debug!("board.toml changed");
                    self.theme = Theme::from_config(&config.ui);
                    self.window_config = WindowConfig::from_config(&config.virtualization);
                    self.drag.set_activation_distance(config.drag.activation_distance);
                    self.board.config = config;
                }
                changed
            }
            Err(e) => {
                self.message = Some(StatusMessage::error(e.to_string()));
                false
            }
        };
        if on_disk.is_some() && on_disk == self.last_written && !config_changed {
            return;
        }

        match board_io::load_applications(&self.board.data_dir) {
            Ok(applications) => {
                tracing::debug!(count = applications.len(), "reloaded from disk");
                self.board.applications = applications;
                self.last_written = on_disk;
                self.clamp_cursors();
                self.message = Some(StatusMessage::info("reloaded from disk"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.message = Some(StatusMessage::error(format!("reload failed: {}", e)));
            }
        }
    }

    /// Run a deferred reload once the drag has ended
    pub fn after_drag(&mut self) {
        if self.pending_reload && !self.drag.is_active() {
            self.handle_external_change();
        }
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(ui_state) = read_ui_state(&app.board.data_dir) else {
        return;
    };

    if let Some(status) = ui_state.focused
        && let Some(col) = app.board.config.board.stages.position(status)
    {
        app.focused_column = col;
    }

    for (status, column) in &ui_state.columns {
        app.cursors.insert(*status, column.cursor);
        app.scroll.insert(*status, column.scroll_offset as f64);
    }
    app.clamp_cursors();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{ColumnUiState, UiState, write_ui_state};

    let columns = app
        .stages()
        .iter()
        .map(|status| {
            (
                *status,
                ColumnUiState {
                    cursor: app.cursor(*status),
                    scroll_offset: app.scroll.get(status).copied().unwrap_or(0.0).max(0.0) as usize,
                },
            )
        })
        .collect();

    let ui_state = UiState {
        focused: app.focused_status(),
        columns,
    };

    if let Err(e) = write_ui_state(&app.board.data_dir, &ui_state) {
        tracing::debug!(error = %e, "could not save ui state");
    }
}

/// Run the TUI application
pub fn run(board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match board_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let root = discover_board(&start)?;
    let board = load_board(&root)?;
    logging::init(LogTarget::board_file(&board.data_dir));
    tracing::info!(root = %root.display(), "starting board");

    let watcher = start_watcher(&board.data_dir);
    let mut app = App::new(board);
    app.last_written = board_io::applications_fingerprint(&app.board.data_dir);

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Nothing half-dragged survives exit
    let mut sink = BoardSink {
        applications: &mut app.board.applications,
        outbox: &mut app.outbox,
    };
    app.drag.cancel(&mut sink);
    app.flush();
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_watcher(data_dir: &Path) -> Option<BoardWatcher> {
    match BoardWatcher::start(data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watching disabled");
            None
        }
    }
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&BoardWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app);
                        save_counter = 0;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::FocusLost => input::handle_focus_lost(app),
                _ => {}
            }
            app.flush();
            app.after_drag();
        }

        if let Some(watcher) = watcher
            && !watcher.poll().is_empty()
        {
            app.handle_external_change();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
