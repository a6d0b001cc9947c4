use std::io::Cursor;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;
use tiny_http::{Header, Method, Request, Response, Server};

pub fn tabq_cmd() -> Command {
    Command::cargo_bin("tabq").expect("tabq binary")
}

/// An endpoint that nothing listens on.
pub fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Store fixture: a temp dir holding the tasks file and the config home.
///
/// Pointing HOME and XDG_CONFIG_HOME here keeps commands from picking up a
/// real user config.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn read_tasks(&self) -> Vec<Value> {
        let contents = std::fs::read_to_string(self.path()).expect("read store");
        serde_json::from_str(&contents).expect("parse store")
    }

    pub fn write_tasks(&self, tasks: &Value) {
        let body = serde_json::to_string_pretty(tasks).expect("serialize tasks");
        std::fs::write(self.path(), body).expect("write store");
    }
}

#[derive(Clone)]
pub struct FakeTab {
    pub id: String,
    pub url: String,
    pub title: String,
}

#[derive(Default)]
struct BrowserState {
    tabs: Vec<FakeTab>,
    created: Vec<String>,
    activated: Vec<String>,
    closed: Vec<String>,
    next_id: u32,
}

/// In-process stand-in for a browser's remote debugging endpoint.
///
/// Serves the discovery surface the client uses: `/json/list`,
/// `PUT /json/new?<encoded-url>`, `/json/activate/<id>` and
/// `/json/close/<id>`, over real HTTP on a random port.
pub struct FakeBrowser {
    endpoint: String,
    state: Arc<Mutex<BrowserState>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeBrowser {
    pub fn start() -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind fake browser");
        let port = server.server_addr().to_ip().expect("tcp addr").port();
        let state = Arc::new(Mutex::new(BrowserState::default()));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_state = Arc::clone(&state);
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::SeqCst) {
                match server.recv_timeout(Duration::from_millis(25)) {
                    Ok(Some(request)) => handle_request(request, &thread_state),
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
        });

        Self {
            endpoint: format!("http://127.0.0.1:{port}"),
            state,
            stop,
            handle: Some(handle),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn add_tab(&self, id: &str, url: &str, title: &str) {
        self.state.lock().unwrap().tabs.push(FakeTab {
            id: id.to_string(),
            url: url.to_string(),
            title: title.to_string(),
        });
    }

    pub fn tabs(&self) -> Vec<FakeTab> {
        self.state.lock().unwrap().tabs.clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn activated(&self) -> Vec<String> {
        self.state.lock().unwrap().activated.clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.state.lock().unwrap().closed.clone()
    }
}

impl Drop for FakeBrowser {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_request(request: Request, state: &Arc<Mutex<BrowserState>>) {
    let url = request.url().to_string();
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url.as_str(), None),
    };

    let mut state = state.lock().unwrap();
    let response = match (request.method(), path) {
        (&Method::Get, "/json/list") => {
            let targets: Vec<Value> = state
                .tabs
                .iter()
                .map(|tab| {
                    json!({
                        "id": tab.id,
                        "type": "page",
                        "url": tab.url,
                        "title": tab.title,
                    })
                })
                .collect();
            json_response(&Value::Array(targets))
        }
        (&Method::Put, "/json/new") => {
            let encoded = query.unwrap_or_default();
            let url = urlencoding::decode(encoded)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| encoded.to_string());
            state.next_id += 1;
            let tab = FakeTab {
                id: format!("fake-{}", state.next_id),
                url,
                title: String::new(),
            };
            state.created.push(tab.url.clone());
            state.tabs.push(tab.clone());
            json_response(&json!({
                "id": tab.id,
                "type": "page",
                "url": tab.url,
                "title": tab.title,
            }))
        }
        (&Method::Get, path) if path.starts_with("/json/activate/") => {
            let id = path.trim_start_matches("/json/activate/");
            if state.tabs.iter().any(|tab| tab.id == id) {
                state.activated.push(id.to_string());
                Response::from_string("Target activated")
            } else {
                not_found()
            }
        }
        (&Method::Get, path) if path.starts_with("/json/close/") => {
            let id = path.trim_start_matches("/json/close/");
            let before = state.tabs.len();
            state.tabs.retain(|tab| tab.id != id);
            if state.tabs.len() < before {
                state.closed.push(id.to_string());
                Response::from_string("Target is closing")
            } else {
                not_found()
            }
        }
        _ => not_found(),
    };
    drop(state);

    let _ = request.respond(response);
}

fn json_response(value: &Value) -> Response<Cursor<Vec<u8>>> {
    let header =
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).expect("static header");
    Response::from_string(value.to_string()).with_header(header)
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    Response::from_string("No such target id").with_status_code(404)
}
