//! Minimal HTTP/1.1 server for retry integration tests.
//!
//! Serves scripted status codes per path and counts requests, so tests can
//! assert exactly how many attempts the executor made against each path.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Scripted responses for one path: served in order, with the last entry
/// repeating once the script runs out. `(500, "boom")` forever is just a
/// one-entry script.
pub type Script = Vec<(u16, &'static str)>;

pub struct MockServer {
    port: u16,
    hits: Arc<Mutex<HashMap<String, u32>>>,
}

impl MockServer {
    /// Starts a server in a background thread with the given path scripts.
    /// Unknown paths get 404. The server runs until the process exits.
    pub fn start(routes: Vec<(&str, Script)>) -> MockServer {
        let routes: Arc<HashMap<String, Script>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, script)| (path.to_string(), script))
                .collect(),
        );
        let hits: Arc<Mutex<HashMap<String, u32>>> = Arc::new(Mutex::new(HashMap::new()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let accept_hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&accept_hits);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });

        MockServer { port, hits }
    }

    /// Base URL, no trailing slash: `http://127.0.0.1:<port>`.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Number of requests received on a path so far.
    pub fn hits(&self, path: &str) -> u32 {
        *self.hits.lock().unwrap().get(path).unwrap_or(&0)
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Script>,
    hits: &Mutex<HashMap<String, u32>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match request_path(request) {
        Some(p) => p,
        None => return,
    };

    // Count first, respond second, so a hit is recorded even if the client
    // aborts mid-response.
    let seen = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry(path.clone()).or_insert(0);
        *count += 1;
        *count
    };

    let (status, body) = match routes.get(&path) {
        Some(script) if !script.is_empty() => {
            let idx = (seen as usize - 1).min(script.len().saturating_sub(1));
            script[idx]
        }
        _ => (404, "no such path"),
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn request_path(request: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let mut parts = first_line.split_whitespace();
    let _method = parts.next()?;
    let target = parts.next()?;
    Some(target.split('?').next().unwrap_or(target).to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}
