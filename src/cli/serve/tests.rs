use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::Method;

use super::{App, Route, handle_request, lifecycle};
use crate::rcon::testing::RecordingSink;
use crate::resource::ResourceId;
use crate::resource::autostart::AutoStartList;
use crate::webhook::signature::sign_sha256;
use crate::webhook::{Deployer, PullOutcome, WorkTree};

const SECRET: &str = "s3cret";

struct UpdatedTree;

impl WorkTree for UpdatedTree {
    fn pull(&self) -> anyhow::Result<PullOutcome> {
        Ok(PullOutcome::Updated {
            from: None,
            to: None,
        })
    }
}

fn make_app() -> (Arc<RecordingSink>, Arc<App>) {
    let sink = Arc::new(RecordingSink::new());
    let auto_start = AutoStartList::new(["chat"].map(ResourceId::from));
    let deployer = Deployer::new(sink.clone(), auto_start, Box::new(UpdatedTree));
    (sink, Arc::new(App::new(deployer, SECRET)))
}

/// Serve exactly one request on a free port.
fn serve_one(app: Arc<App>) -> (SocketAddr, JoinHandle<()>) {
    let (server, addr) = lifecycle::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        handle_request(request, &app).unwrap();
    });
    (addr, handle)
}

/// Send a raw request and return (status, body).
fn send(addr: SocketAddr, head: &str, body: &[u8]) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    write!(
        stream,
        "{head}\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .unwrap();
    stream.write_all(body).unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).unwrap();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

#[test]
fn test_routes() {
    assert_eq!(Route::of(&Method::Post, "/webhook"), Route::Webhook);
    assert_eq!(Route::of(&Method::Post, "/webhook/"), Route::Webhook);
    assert_eq!(Route::of(&Method::Get, "/refresh?x=1"), Route::Refresh);
    assert_eq!(Route::of(&Method::Head, "/refresh"), Route::Refresh);
    assert_eq!(Route::of(&Method::Get, "/webhook"), Route::NotFound);
    assert_eq!(Route::of(&Method::Post, "/refresh"), Route::NotFound);
    assert_eq!(Route::of(&Method::Get, "/"), Route::NotFound);
}

#[test]
fn test_refresh_endpoint_sends_refresh_only() {
    let (sink, app) = make_app();
    let (addr, handle) = serve_one(app);

    let (status, _) = send(addr, "GET /refresh HTTP/1.1", b"");
    handle.join().unwrap();

    assert_eq!(status, 200);
    assert_eq!(sink.sent(), ["refresh"]);
}

#[test]
fn test_unknown_route() {
    let (sink, app) = make_app();
    let (addr, handle) = serve_one(app);

    let (status, _) = send(addr, "GET /status HTTP/1.1", b"");
    handle.join().unwrap();

    assert_eq!(status, 404);
    assert!(sink.sent().is_empty());
}

#[test]
fn test_webhook_without_signature() {
    let (sink, app) = make_app();
    let (addr, handle) = serve_one(app);

    let (status, body) = send(addr, "POST /webhook HTTP/1.1", b"{}");
    handle.join().unwrap();

    assert_eq!(status, 403);
    assert_eq!(body, "No X-Hub-Signature found on request");
    assert!(sink.sent().is_empty());
}

#[test]
fn test_webhook_with_wrong_signature() {
    let (sink, app) = make_app();
    let (addr, handle) = serve_one(app);

    let sig = sign_sha256(b"not the secret", b"{}");
    let head = format!("POST /webhook HTTP/1.1\r\nX-Hub-Signature-256: {sig}");
    let (status, body) = send(addr, &head, b"{}");
    handle.join().unwrap();

    assert_eq!(status, 403);
    assert_eq!(body, "X-Hub-Signature does not match blob signature");
    assert!(sink.sent().is_empty());
}

#[test]
fn test_signed_push_refreshes() {
    let (sink, app) = make_app();
    let (addr, handle) = serve_one(app);

    let payload = br#"{"ref":"refs/heads/master","head_commit":{"id":"abc","message":"m"}}"#;
    let sig = sign_sha256(SECRET.as_bytes(), payload);
    let head = format!(
        "POST /webhook HTTP/1.1\r\nX-GitHub-Event: push\r\nX-Hub-Signature-256: {sig}"
    );
    let (status, body) = send(addr, &head, payload);
    // The pull runs after the response; joining waits for it
    handle.join().unwrap();

    assert_eq!(status, 200);
    assert_eq!(body, "ok");
    assert_eq!(sink.sent(), ["refresh", "restart chat"]);
}

#[test]
fn test_signed_ping_does_not_deploy() {
    let (sink, app) = make_app();
    let (addr, handle) = serve_one(app);

    let payload = br#"{"zen":"Design for failure."}"#;
    let sig = sign_sha256(SECRET.as_bytes(), payload);
    let head = format!(
        "POST /webhook HTTP/1.1\r\nX-GitHub-Event: ping\r\nX-Hub-Signature-256: {sig}"
    );
    let (status, body) = send(addr, &head, payload);
    handle.join().unwrap();

    assert_eq!(status, 200);
    assert_eq!(body, "pong");
    assert!(sink.sent().is_empty());
}
