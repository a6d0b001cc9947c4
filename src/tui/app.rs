use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;

use crate::browser::TabHost;
use crate::controller::{self, ActionOutcome};
use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::Task;

use super::view;

const EVENT_POLL_MS: u64 = 120;
const WATCH_DEBOUNCE_MS: u64 = 200;

enum LoadRequest {
    Reload,
}

enum UiMsg {
    Loaded(Vec<Task>),
    LoadError(String),
    WatchError(String),
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// One in-flight reorder: the grabbed task, waiting for a drop target.
pub(crate) struct MoveGesture {
    pub(crate) task_id: String,
}

#[derive(Default, Clone, Copy)]
struct Viewport {
    width: u16,
    height: u16,
}

pub struct AppState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) selected: Option<usize>,
    pub(crate) move_gesture: Option<MoveGesture>,
    status_message: Option<String>,
    info_message: Option<String>,
    watch_error: Option<String>,
    viewport: Viewport,
    store: TaskStore,
}

impl AppState {
    fn new(store: TaskStore) -> Self {
        Self {
            tasks: Vec::new(),
            selected: None,
            move_gesture: None,
            status_message: None,
            info_message: None,
            watch_error: None,
            viewport: Viewport::default(),
            store,
        }
    }

    fn update_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Viewport { width, height };
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.tasks.get(idx))
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(error) = self.watch_error.as_ref() {
            return Some((error.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.move_gesture.is_some() {
            return "j/k pick target  enter swap  esc cancel".to_string();
        }
        "j/k move  enter open  c done/undone  m move  d delete  s snapshot  C clear done  r reload  q quit"
            .to_string()
    }

    pub(crate) fn task_count_summary(&self) -> String {
        let completed = self.tasks.iter().filter(|task| task.is_completed()).count();
        let open = self.tasks.len() - completed;
        format!("open: {open}  completed: {completed}")
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn apply_outcome(&mut self, outcome: ActionOutcome, req_tx: &Sender<LoadRequest>) {
        if outcome.changed {
            let _ = req_tx.send(LoadRequest::Reload);
        }
        self.set_info(outcome.message);
    }

    fn apply_loaded(&mut self, tasks: Vec<Task>) {
        let previous_id = self.selected_task().map(|task| task.id.clone());
        let previous_index = self.selected;
        self.tasks = tasks;
        self.selected = if self.tasks.is_empty() {
            None
        } else {
            previous_id
                .and_then(|id| self.tasks.iter().position(|task| task.id == id))
                .or_else(|| previous_index.map(|idx| idx.min(self.tasks.len() - 1)))
                .or(Some(0))
        };
        if let Some(gesture) = self.move_gesture.as_ref() {
            if !self.tasks.iter().any(|task| task.id == gesture.task_id) {
                self.move_gesture = None;
            }
        }
        self.status_message = None;
    }

    fn move_selection(&mut self, delta: isize) {
        if self.tasks.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0);
        let max = self.tasks.len().saturating_sub(1);
        let next = (current as isize + delta).clamp(0, max as isize) as usize;
        self.selected = Some(next);
    }

    fn list_jump(&self) -> isize {
        let jump = (self.viewport.height.saturating_sub(4) / 2).max(1);
        jump as isize
    }
}

pub fn run<H: TabHost>(store: TaskStore, host: H, runtime: Runtime) -> Result<()> {
    let (ui_tx, ui_rx) = mpsc::channel();
    let (req_tx, req_rx) = mpsc::channel();

    spawn_loader(store.clone(), req_rx, ui_tx.clone());
    spawn_watch(&store, req_tx.clone(), ui_tx);

    if req_tx.send(LoadRequest::Reload).is_err() {
        return Err(Error::OperationFailed(
            "failed to start task loader".to_string(),
        ));
    }

    let mut app = AppState::new(store);
    run_terminal(&mut app, &host, &runtime, ui_rx, req_tx)
}

fn run_terminal<H: TabHost>(
    app: &mut AppState,
    host: &H,
    runtime: &Runtime,
    ui_rx: Receiver<UiMsg>,
    req_tx: Sender<LoadRequest>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.width, size.height);

    let result = run_loop(&mut terminal, app, host, runtime, ui_rx, req_tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<H: TabHost>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    host: &H,
    runtime: &Runtime,
    ui_rx: Receiver<UiMsg>,
    req_tx: Sender<LoadRequest>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().width, frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, host, runtime, key, &req_tx) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(width, height) => {
                    app.update_viewport(width, height);
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_ui_msg(app: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::Loaded(tasks) => app.apply_loaded(tasks),
        UiMsg::LoadError(err) => {
            app.status_message = Some(format!("load error: {err}"));
        }
        UiMsg::WatchError(err) => {
            app.watch_error = Some(format!("watch error: {err}"));
        }
    }
}

/// Returns true when the app should quit.
fn handle_key<H: TabHost>(
    app: &mut AppState,
    host: &H,
    runtime: &Runtime,
    key: KeyEvent,
    req_tx: &Sender<LoadRequest>,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if let Some(gesture) = app.move_gesture.take() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.move_selection(1);
                app.move_gesture = Some(gesture);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.move_selection(-1);
                app.move_gesture = Some(gesture);
            }
            KeyCode::Enter => {
                let Some(target) = app.selected_task().map(|task| task.id.clone()) else {
                    return false;
                };
                match controller::swap(&app.store, &gesture.task_id, &target) {
                    Ok(outcome) => {
                        if outcome.changed {
                            // The reload reselects by id, so the cursor follows
                            // the grabbed task to its new slot.
                            app.selected = app
                                .tasks
                                .iter()
                                .position(|task| task.id == gesture.task_id);
                        }
                        app.apply_outcome(outcome, req_tx);
                    }
                    Err(err) => app.set_error(err.to_string()),
                }
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => {
                app.set_info("move cancelled".to_string());
            }
            _ => {
                app.move_gesture = Some(gesture);
            }
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_selection(app.list_jump());
            false
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_selection(-app.list_jump());
            false
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            false
        }
        KeyCode::Enter => {
            let Some(task_id) = app.selected_task().map(|task| task.id.clone()) else {
                app.set_error("no task selected".to_string());
                return false;
            };
            match runtime.block_on(controller::open(&app.store, host, &task_id)) {
                Ok(outcome) => app.apply_outcome(outcome, req_tx),
                Err(err) => app.set_error(err.to_string()),
            }
            false
        }
        KeyCode::Char('c') => {
            let Some(task_id) = app.selected_task().map(|task| task.id.clone()) else {
                app.set_error("no task selected".to_string());
                return false;
            };
            match runtime.block_on(controller::toggle(&app.store, host, &task_id)) {
                Ok(outcome) => app.apply_outcome(outcome, req_tx),
                Err(err) => app.set_error(err.to_string()),
            }
            false
        }
        KeyCode::Char('d') => {
            let Some(task_id) = app.selected_task().map(|task| task.id.clone()) else {
                app.set_error("no task selected".to_string());
                return false;
            };
            match controller::remove(&app.store, &task_id) {
                Ok(outcome) => app.apply_outcome(outcome, req_tx),
                Err(err) => app.set_error(err.to_string()),
            }
            false
        }
        KeyCode::Char('m') => {
            let Some(task_id) = app.selected_task().map(|task| task.id.clone()) else {
                app.set_error("no task selected".to_string());
                return false;
            };
            app.move_gesture = Some(MoveGesture { task_id });
            false
        }
        KeyCode::Char('s') => {
            match runtime.block_on(controller::snapshot(&app.store, host)) {
                Ok(outcome) => {
                    if outcome.added > 0 {
                        let _ = req_tx.send(LoadRequest::Reload);
                        app.set_info(format!("captured {} tab(s)", outcome.added));
                    } else {
                        app.set_info("no open tabs to capture".to_string());
                    }
                }
                Err(err) => app.set_error(err.to_string()),
            }
            false
        }
        KeyCode::Char('C') => {
            match controller::clear_completed(&app.store) {
                Ok(outcome) => {
                    if outcome.removed > 0 {
                        let _ = req_tx.send(LoadRequest::Reload);
                        app.set_info(format!("cleared {} completed task(s)", outcome.removed));
                    } else {
                        app.set_info("no completed tasks".to_string());
                    }
                }
                Err(err) => app.set_error(err.to_string()),
            }
            false
        }
        KeyCode::Char('r') => {
            let _ = req_tx.send(LoadRequest::Reload);
            false
        }
        _ => false,
    }
}

fn spawn_loader(store: TaskStore, req_rx: Receiver<LoadRequest>, ui_tx: Sender<UiMsg>) {
    thread::spawn(move || {
        while let Ok(req) = req_rx.recv() {
            match req {
                LoadRequest::Reload => match store.load() {
                    Ok(tasks) => {
                        let _ = ui_tx.send(UiMsg::Loaded(tasks));
                    }
                    Err(err) => {
                        let _ = ui_tx.send(UiMsg::LoadError(err.to_string()));
                    }
                },
            }
        }
    });
}

fn spawn_watch(store: &TaskStore, req_tx: Sender<LoadRequest>, ui_tx: Sender<UiMsg>) {
    // Writes replace the store file by rename, so watch its directory.
    let Some(dir) = store.path().parent().map(|dir| dir.to_path_buf()) else {
        return;
    };
    if !dir.exists() {
        return;
    }

    thread::spawn(move || {
        let (event_tx, event_rx) = mpsc::channel();
        let watcher: notify::Result<RecommendedWatcher> = notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        });

        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(err) => {
                let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                return;
            }
        };

        if let Err(err) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
            return;
        }

        let debounce = Duration::from_millis(WATCH_DEBOUNCE_MS);

        loop {
            match event_rx.recv() {
                Ok(Ok(_)) => {
                    // A store rewrite emits a burst of events; stay quiet
                    // for one debounce window before reloading.
                    loop {
                        match event_rx.recv_timeout(debounce) {
                            Ok(Ok(_)) => continue,
                            Ok(Err(err)) => {
                                let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                            }
                            Err(mpsc::RecvTimeoutError::Timeout) => break,
                            Err(mpsc::RecvTimeoutError::Disconnected) => return,
                        }
                    }
                    if req_tx.send(LoadRequest::Reload).is_err() {
                        return;
                    }
                }
                Ok(Err(err)) => {
                    let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                }
                Err(_) => break,
            }
        }
    });
}
