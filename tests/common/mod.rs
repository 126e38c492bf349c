//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use order_gateway::config::ServiceConfig;
use order_gateway::http::HttpServer;
use order_gateway::lifecycle::Shutdown;
use order_gateway::observability::logging::{LogSink, RequestLogRecord};

/// Log sink that records every emitted entry for assertions.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<RequestLogRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<RequestLogRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, record: &RequestLogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Start the gateway on an ephemeral port with a recording sink.
pub async fn start_gateway(
    mut config: ServiceConfig,
    sink: Arc<RecordingSink>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::with_log_sink(config, sink);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

/// Start a mock payment backend that records every raw request it receives
/// (head and body) and answers with the given status.
pub async fn start_payment_backend(status: u16) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    start_backend(status, Duration::ZERO).await
}

/// Payment backend that stalls before answering 200, for cancellation and
/// backpressure tests.
pub async fn start_slow_payment_backend(delay: Duration) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    start_backend(200, delay).await
}

async fn start_backend(status: u16, delay: Duration) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let captured_writer = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let captured = captured_writer.clone();
                    tokio::spawn(async move {
                        let request = read_full_request(&mut socket).await;
                        captured.lock().unwrap().push(request);

                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }

                        let status_line = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                            status_line
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

/// Read one HTTP/1.1 request (head plus content-length body) as text.
async fn read_full_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Head first.
    let head_end = loop {
        match socket.read(&mut chunk).await {
            Ok(0) => break buf.len(),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find_head_end(&buf) {
                    break pos;
                }
            }
            Err(_) => break buf.len(),
        }
    };

    // Then the declared body length, if any.
    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Build a client that never reuses pooled connections between tests.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
