//! Minimal HTTP/1.1 tile server for integration tests.
//!
//! Serves a fixed set of paths. HEAD answers with or without Content-Length,
//! GET returns the tile body, and unknown paths get 404. Every response closes
//! the connection. GET requests are counted per path so tests can tell a
//! skipped tile from a re-downloaded one. A GET can also be cut short to
//! simulate a stalled or dropped transfer.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How a tile answers HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadMode {
    /// Content-Length equals the body length
    Accurate,
    /// Content-Length advertises this many bytes regardless of the body
    Advertise(u64),
    /// No Content-Length header at all
    NoLength,
    /// HEAD fails with this status
    Status(u16),
}

/// How a tile answers GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    /// Full body
    Full,
    /// Headers for the full body, this many bytes, then silence
    StallAfter(usize),
    /// Headers for the full body, this many bytes, then the connection closes
    CloseAfter(usize),
}

/// How long a stalled GET holds its connection open
const STALL_FOR: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct Tile {
    body: Vec<u8>,
    head: HeadMode,
    get: GetMode,
    gets: AtomicUsize,
}

/// Builder for the set of served tiles
#[derive(Debug, Default)]
pub struct TileServerBuilder {
    tiles: HashMap<String, Tile>,
}

impl TileServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `/<name>` with an accurate HEAD
    pub fn tile(self, name: &str, body: Vec<u8>) -> Self {
        self.tile_with_head(name, body, HeadMode::Accurate)
    }

    /// Serve `body` at `/<name>` with the given HEAD behaviour
    pub fn tile_with_head(self, name: &str, body: Vec<u8>, head: HeadMode) -> Self {
        self.insert(name, body, head, GetMode::Full)
    }

    /// Serve `body` at `/<name>` with an accurate HEAD and the given GET behaviour
    pub fn tile_with_get(self, name: &str, body: Vec<u8>, get: GetMode) -> Self {
        self.insert(name, body, HeadMode::Accurate, get)
    }

    fn insert(mut self, name: &str, body: Vec<u8>, head: HeadMode, get: GetMode) -> Self {
        self.tiles.insert(
            format!("/{}", name),
            Tile {
                body,
                head,
                get,
                gets: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Start serving on an ephemeral port in a background thread
    pub fn start(self) -> TileServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let tiles = Arc::new(self.tiles);
        let served = Arc::clone(&tiles);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let tiles = Arc::clone(&served);
                thread::spawn(move || handle(stream, &tiles));
            }
        });
        TileServer {
            base_url: format!("http://127.0.0.1:{}/", port),
            tiles,
        }
    }
}

/// Handle to a running tile server; it lives until the process exits
#[derive(Debug, Clone)]
pub struct TileServer {
    base_url: String,
    tiles: Arc<HashMap<String, Tile>>,
}

impl TileServer {
    /// URL of `name` on this server
    pub fn url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }

    /// Number of GET requests served for `name`
    pub fn get_count(&self, name: &str) -> usize {
        self.tiles
            .get(&format!("/{}", name))
            .map(|tile| tile.gets.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

fn handle(mut stream: TcpStream, tiles: &HashMap<String, Tile>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);

    let Some(tile) = tiles.get(path) else {
        let _ = stream.write_all(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    };

    if method.eq_ignore_ascii_case("HEAD") {
        let response = match tile.head {
            HeadMode::Accurate => ok_head(Some(tile.body.len() as u64)),
            HeadMode::Advertise(length) => ok_head(Some(length)),
            HeadMode::NoLength => ok_head(None),
            HeadMode::Status(code) => format!(
                "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            ),
        };
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        tile.gets.fetch_add(1, Ordering::SeqCst);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: image/tiff\r\nConnection: close\r\n\r\n",
            tile.body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        match tile.get {
            GetMode::Full => {
                let _ = stream.write_all(&tile.body);
            }
            GetMode::StallAfter(sent) => {
                let _ = stream.write_all(&tile.body[..sent.min(tile.body.len())]);
                let _ = stream.flush();
                thread::sleep(STALL_FOR);
            }
            GetMode::CloseAfter(sent) => {
                let _ = stream.write_all(&tile.body[..sent.min(tile.body.len())]);
                let _ = stream.flush();
                let _ = stream.shutdown(Shutdown::Both);
            }
        }
        return;
    }

    let _ = stream.write_all(
        b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    );
}

fn ok_head(content_length: Option<u64>) -> String {
    match content_length {
        Some(length) => format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            length
        ),
        None => "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_string(),
    }
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    (method, path)
}
