//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response for one path.
#[derive(Clone)]
pub struct MockRoute {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
    pub delay: Duration,
}

impl MockRoute {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            content_type: "application/json",
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: r#"{"message":"error"}"#.to_string(),
            content_type: "application/json",
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Content API stand-in. Unknown paths answer 404.
#[derive(Clone, Default)]
pub struct MockBackend {
    routes: Arc<HashMap<String, MockRoute>>,
    calls: Arc<Mutex<HashMap<String, Arc<AtomicUsize>>>>,
}

impl MockBackend {
    pub fn new(routes: Vec<(&str, MockRoute)>) -> Self {
        Self {
            routes: Arc::new(routes.into_iter().map(|(p, r)| (p.to_string(), r)).collect()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self, path: &str) -> usize {
        self.counter(path).load(Ordering::SeqCst)
    }

    fn counter(&self, path: &str) -> Arc<AtomicUsize> {
        self.calls.lock().unwrap().entry(path.to_string()).or_default().clone()
    }

    /// Bind to an ephemeral port and serve until the test ends.
    pub async fn start(self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, _)) => {
                        let backend = self.clone();
                        tokio::spawn(async move {
                            let Some(path) = read_request_path(&mut socket).await else {
                                return;
                            };
                            backend.counter(&path).fetch_add(1, Ordering::SeqCst);
                            let route = backend.routes.get(&path).cloned().unwrap_or_else(|| MockRoute::status(404));

                            tokio::time::sleep(route.delay).await;
                            let response = format!(
                                "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                route.status,
                                reason(route.status),
                                route.content_type,
                                route.body.len(),
                                route.body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        addr
    }
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let target = head.lines().next()?.split_whitespace().nth(1)?;
    Some(target.split('?').next().unwrap_or(target).to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
