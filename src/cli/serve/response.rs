//! HTTP response handlers.

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

const PLAIN: &str = "text/plain; charset=utf-8";

/// Respond with a short plain-text body.
pub fn respond_text(request: Request, status: u16, body: &str) -> Result<()> {
    if is_head_request(&request) {
        let response = Response::empty(StatusCode(status)).with_header(plain_header());
        request.respond(response)?;
        return Ok(());
    }

    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(plain_header());
    request.respond(response)?;
    Ok(())
}

pub fn respond_ok(request: Request, body: &str) -> Result<()> {
    respond_text(request, 200, body)
}

/// 403 with the rejection reason as body.
pub fn respond_forbidden(request: Request, reason: &str) -> Result<()> {
    respond_text(request, 403, reason)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond_text(request, 404, "404 Not Found")
}

pub fn respond_payload_too_large(request: Request) -> Result<()> {
    respond_text(request, 413, "413 Payload Too Large")
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_text(request, 503, "503 Service Unavailable")
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn plain_header() -> Header {
    Header::from_bytes("Content-Type", PLAIN).expect("static header is valid")
}
