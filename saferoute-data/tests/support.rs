//! Loopback HTTP server returning a canned response to every request.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Server answering each connection with the same response.
///
/// The listener thread is detached and lives until the test binary exits.
pub struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Serve `body` with `status` (for example `"200 OK"`) after `delay`.
    pub fn start(status: &str, body: &str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let address = listener.local_addr().expect("listener address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let response = format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &response, delay, &seen);
            }
        });
        Self {
            base_url: format!("http://{address}"),
            requests,
        }
    }

    /// Base URL of a port with nothing listening on it.
    pub fn unreachable() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let address = listener.local_addr().expect("listener address");
        drop(listener);
        Self {
            base_url: format!("http://{address}"),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Root URL to configure the client with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request lines received so far, such as `GET /path?query HTTP/1.1`.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().expect("request log lock").clone()
    }
}

fn serve(
    stream: TcpStream,
    response: &str,
    delay: Duration,
    seen: &Mutex<Vec<String>>,
) -> Option<()> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).ok()?;
        if read == 0 || header == "\r\n" {
            break;
        }
    }
    seen.lock()
        .expect("request log lock")
        .push(request_line.trim_end().to_owned());
    thread::sleep(delay);
    let mut stream = stream;
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()
}
