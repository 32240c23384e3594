//! HTTP control plane.
//!
//! | Module    | Role                                                     |
//! |-----------|----------------------------------------------------------|
//! | `request` | incremental request parser over a fixed 2 KiB buffer     |
//! | `router`  | route table, body decoding, token-bucket rate limiting   |
//! | `server`  | I/O thread: non-blocking accept + per-connection tasks   |
//!
//! Every response closes the connection and carries the CORS headers.

pub mod request;
pub mod router;
pub mod server;

use serde::Serialize;

use crate::error::ControlError;

pub use request::{Method, Request, RequestParser};
pub use router::Router;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => {
                log::error!("HTTP: response encoding failed: {}", e);
                Self {
                    status: 500,
                    body: r#"{"success":false,"error":"Internal error"}"#.into(),
                }
            }
        }
    }

    /// Reply to a CORS pre-flight.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: String::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::json(404, &serde_json::json!({ "error": ControlError::UnknownRoute.to_string() }))
    }

    /// `{success: false, error}` with the status for `err`.
    pub fn error(err: ControlError) -> Self {
        if err == ControlError::UnknownRoute {
            return Self::not_found();
        }
        Self::json(
            err.status(),
            &serde_json::json!({ "success": false, "error": err.to_string() }),
        )
    }

    /// Full wire form, status line to body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {} {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Connection: close\r\n\
             Content-Length: {}\r\n",
            self.status,
            reason(self.status),
            self.body.len()
        );
        if !self.body.is_empty() {
            out.push_str("Content-Type: application/json\r\n");
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out.into_bytes()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        _ => "Internal Server Error",
    }
}
