//! Control plane over a real loopback socket.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use mnemon::adapters::time::ManualClock;
use mnemon::context::MonitorContext;
use mnemon::control::ControlPlane;
use mnemon::http::{self, Router};
use mnemon::scenario;
use mnemon::sensors::Channel;

fn start_server(burst: u32) -> (SocketAddr, Arc<MonitorContext>) {
    let ctx = Arc::new(MonitorContext::new(
        scenario::default_name(),
        Box::new(ManualClock::new()),
    ));
    let listener = http::server::bind(0).unwrap();
    let port = listener.local_addr().unwrap().port();
    let router = Router::new(ControlPlane::new(Arc::clone(&ctx)), 1, burst);
    http::server::spawn(listener, router).unwrap();
    (SocketAddr::from(([127, 0, 0, 1], port)), ctx)
}

/// Send one raw request and return `(status, headers, body)`.
fn exchange(addr: SocketAddr, raw: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream.write_all(raw.as_bytes()).unwrap();
    let mut text = String::new();
    stream.read_to_string(&mut text).unwrap();

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    (status, head.to_string(), body.to_string())
}

fn post(addr: SocketAddr, path: &str, body: &str) -> (u16, String, String) {
    exchange(
        addr,
        &format!(
            "POST {path} HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
}

#[test]
fn status_over_socket_has_cors_headers() {
    let (addr, _) = start_server(10);
    let (status, head, body) = exchange(addr, "GET /api/status HTTP/1.1\r\nHost: test\r\n\r\n");
    assert_eq!(status, 200);
    assert!(head.contains("Access-Control-Allow-Origin: *"));
    assert!(head.contains("Connection: close"));
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["status"], "running");
}

#[test]
fn override_lands_in_shared_store() {
    let (addr, ctx) = start_server(10);
    let (status, _, body) = post(addr, "/api/sensors/dht22", r#"{"temperature": 48.5}"#);
    assert_eq!(status, 200);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["override_active"], true);
    assert_eq!(ctx.store().read(Channel::Temperature), 48.5);
}

#[test]
fn preflight_is_no_content() {
    let (addr, _) = start_server(10);
    let (status, head, body) = exchange(
        addr,
        "OPTIONS /api/sensors/ldr HTTP/1.1\r\nHost: test\r\n\r\n",
    );
    assert_eq!(status, 204);
    assert!(head.contains("Access-Control-Allow-Methods: GET, POST, OPTIONS"));
    assert!(body.is_empty());
}

#[test]
fn oversized_body_is_413() {
    let (addr, _) = start_server(10);
    let (status, _, body) = exchange(
        addr,
        "POST /api/sensors/dht22 HTTP/1.1\r\nContent-Length: 100000\r\n\r\n{}",
    );
    assert_eq!(status, 413);
    assert!(body.contains("Payload too large"));
}

#[test]
fn unknown_path_is_404() {
    let (addr, _) = start_server(10);
    let (status, _, body) = exchange(addr, "GET /nope HTTP/1.1\r\n\r\n");
    assert_eq!(status, 404);
    assert!(body.contains("Endpoint not found"));
}

#[test]
fn burst_exhaustion_is_429() {
    let (addr, _) = start_server(2);
    assert_eq!(post(addr, "/api/sensors/reset", "").0, 200);
    assert_eq!(post(addr, "/api/sensors/reset", "").0, 200);
    let (status, _, body) = post(addr, "/api/sensors/reset", "");
    assert_eq!(status, 429);
    assert!(body.contains("Rate limit exceeded"));
    // Reads are never limited.
    assert_eq!(exchange(addr, "GET /api/status HTTP/1.1\r\n\r\n").0, 200);
}

#[test]
fn concurrent_clients_all_answered() {
    let (addr, _) = start_server(100);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(move || exchange(addr, "GET /api/status HTTP/1.1\r\n\r\n").0)
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 200);
    }
}
