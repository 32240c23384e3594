//! Incremental HTTP/1.1 request parser.
//!
//! Bytes are fed as they arrive from a non-blocking socket. The parser
//! keeps them in a fixed [`MAX_REQUEST`]-byte buffer and reports a complete
//! request once the header block and `Content-Length` bytes of body are in.
//!
//! Only what the control plane needs is parsed: method, path (query string
//! dropped) and body. Other headers are skipped. Chunked bodies are not
//! supported; a request without `Content-Length` has an empty body.

use heapless::Vec;

use crate::error::ControlError;

/// Whole request, headers included.
pub const MAX_REQUEST: usize = 2048;

/// Longest path kept.
pub const MAX_PATH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Other,
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "OPTIONS" => Self::Options,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: heapless::String<MAX_PATH>,
    pub body: Vec<u8, MAX_REQUEST>,
}

impl Request {
    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }
}

pub struct RequestParser {
    buf: Vec<u8, MAX_REQUEST>,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append `data`. Returns the request once it is complete.
    ///
    /// Fails with `PayloadTooLarge` as soon as the declared or received
    /// size exceeds the buffer, and with `MalformedBody` on an unparsable
    /// request line or `Content-Length`.
    pub fn feed(&mut self, data: &[u8]) -> Result<Option<Request>, ControlError> {
        if self.buf.extend_from_slice(data).is_err() {
            return Err(ControlError::PayloadTooLarge);
        }

        let Some(header_end) = find_header_end(&self.buf) else {
            return if self.buf.is_full() {
                Err(ControlError::PayloadTooLarge)
            } else {
                Ok(None)
            };
        };

        let head = core::str::from_utf8(&self.buf[..header_end])
            .map_err(|_| ControlError::MalformedBody)?;
        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ControlError::MalformedBody)?;
        let (method, path) = parse_request_line(request_line)?;

        let mut content_length = 0usize;
        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse()
                    .map_err(|_| ControlError::MalformedBody)?;
            }
        }

        let body_start = header_end + 4;
        let total = body_start
            .checked_add(content_length)
            .ok_or(ControlError::PayloadTooLarge)?;
        if total > MAX_REQUEST {
            return Err(ControlError::PayloadTooLarge);
        }
        if self.buf.len() < total {
            return Ok(None);
        }

        let mut body = Vec::new();
        // `total` is within MAX_REQUEST, so the body fits.
        let _ = body.extend_from_slice(&self.buf[body_start..total]);
        Ok(Some(Request { method, path, body }))
    }

    /// Bytes buffered so far.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_request_line(line: &str) -> Result<(Method, heapless::String<MAX_PATH>), ControlError> {
    let mut parts = line.split_ascii_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ControlError::MalformedBody);
    };
    if !version.starts_with("HTTP/1.") || !target.starts_with('/') {
        return Err(ControlError::MalformedBody);
    }
    let raw_path = target.split_once('?').map_or(target, |(p, _)| p);
    // An over-long path cannot match any route; keep a prefix so it 404s.
    let mut path = heapless::String::new();
    for c in raw_path.chars() {
        if path.push(c).is_err() {
            break;
        }
    }
    Ok((Method::parse(method), path))
}
