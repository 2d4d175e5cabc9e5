//! `POST /webhook` and `GET /refresh` handlers.

use std::io::Read;

use anyhow::Result;
use tiny_http::Request;

use super::{App, response};
use crate::log;
use crate::rcon::Command;
use crate::webhook::{DeployOutcome, EVENT_HEADER, PushSummary, Signature, SignatureError};

/// Largest payload GitHub delivers.
const MAX_BODY: u64 = 25 * 1024 * 1024;

/// What to do with a delivery.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    Deploy(Option<PushSummary>),
    Pong,
    /// Correctly signed, but not an event that deploys.
    Ignored(String),
    Rejected(SignatureError),
}

/// Authenticate a delivery, then classify it by event type.
///
/// The signature is checked before anything else, pings included.
pub fn judge<'a>(
    secret: &[u8],
    header: impl Fn(&str) -> Option<&'a str>,
    body: &[u8],
) -> Verdict {
    let signature = match Signature::from_headers(&header) {
        Ok(signature) => signature,
        Err(e) => return Verdict::Rejected(e),
    };
    if let Err(e) = signature.verify(secret, body) {
        return Verdict::Rejected(e);
    }

    match header(EVENT_HEADER) {
        Some("ping") => Verdict::Pong,
        None | Some("push") => Verdict::Deploy(PushSummary::parse(body)),
        Some(other) => Verdict::Ignored(other.to_string()),
    }
}

/// Body of a 403 response.
fn rejection_message(error: &SignatureError) -> &'static str {
    match error {
        SignatureError::Missing => "No X-Hub-Signature found on request",
        _ => "X-Hub-Signature does not match blob signature",
    }
}

pub fn handle_webhook(mut request: Request, app: &App) -> Result<()> {
    log!("webhook"; "post /webhook");

    if request
        .body_length()
        .is_some_and(|len| len as u64 > MAX_BODY)
    {
        return response::respond_payload_too_large(request);
    }
    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY + 1)
        .read_to_end(&mut body)?;
    if body.len() as u64 > MAX_BODY {
        return response::respond_payload_too_large(request);
    }

    let headers: Vec<(String, String)> = request
        .headers()
        .iter()
        .map(|h| (h.field.as_str().as_str().to_string(), h.value.as_str().to_string()))
        .collect();

    let verdict = judge(
        &app.secret,
        |name| {
            headers
                .iter()
                .find(|(field, _)| field.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        },
        &body,
    );

    match verdict {
        Verdict::Rejected(e) => {
            log!("webhook"; "rejected: {}", e);
            response::respond_forbidden(request, rejection_message(&e))
        }
        Verdict::Pong => response::respond_ok(request, "pong"),
        Verdict::Ignored(event) => {
            log!("webhook"; "ignoring `{}` event", event);
            response::respond_ok(request, "ignored")
        }
        Verdict::Deploy(summary) => {
            if let Some(summary) = summary {
                log!("webhook"; "{}", summary);
            }
            // Answer before pulling so the git host does not time out
            response::respond_ok(request, "ok")?;
            if let DeployOutcome::Refreshed { sent } = app.deployer.deploy() {
                crate::debug!("webhook"; "deploy sent {} command(s)", sent);
            }
            Ok(())
        }
    }
}

/// Send the coarse `refresh` only. Restarts stay with the webhook path.
pub fn handle_refresh(request: Request, app: &App) -> Result<()> {
    if let Err(e) = app.deployer.sink().send(&Command::Refresh) {
        log!("rcon"; "refresh: {:#}", anyhow::Error::from(e));
    }
    response::respond_ok(request, "refresh sent")
}
