#![allow(dead_code)]

//! Single-shot HTTP stub for exercising the real client without a registry.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// What the stub saw on the wire.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

pub struct StubRegistry {
    pub url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl StubRegistry {
    /// Accepts exactly one request on a random local port and answers with `status` and `body`.
    pub fn spawn(status: u16, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub registry");
        let addr = listener.local_addr().expect("stub address");

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept publish request");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut headers = HashMap::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header line");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
            }

            let length: usize = headers
                .get("content-length")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let mut raw = vec![0u8; length];
            reader.read_exact(&mut raw).expect("read request body");

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().expect("flush response");

            CapturedRequest {
                method,
                path,
                headers,
                body: String::from_utf8(raw).expect("utf-8 body"),
            }
        });

        StubRegistry {
            url: format!("http://{addr}/api/v1/publish"),
            handle,
        }
    }

    /// Waits for the request to be served and returns it.
    pub fn captured(self) -> CapturedRequest {
        self.handle.join().expect("stub registry thread panicked")
    }
}

/// Leaves connections in the backlog and never answers; the listener lives as long as the returned value.
pub struct HungRegistry {
    pub url: String,
    _listener: TcpListener,
}

impl HungRegistry {
    pub fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind hung registry");
        let addr = listener.local_addr().expect("hung registry address");
        // The kernel completes the handshake from the backlog; nothing ever reads or replies.
        HungRegistry {
            url: format!("http://{addr}/api/v1/publish"),
            _listener: listener,
        }
    }
}

/// A URL on a local port nothing is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("ephemeral address");
    drop(listener);
    format!("http://{addr}/api/v1/publish")
}
