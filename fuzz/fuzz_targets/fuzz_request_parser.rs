//! Fuzz target: `RequestParser::feed`
//!
//! Splits arbitrary bytes at a fuzzer-chosen point and feeds both halves.
//! The parser must never panic, and a completed request must fit the
//! fixed buffers it was parsed into.
//!
//! cargo fuzz run fuzz_request_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use mnemon::http::RequestParser;
use mnemon::http::request::{MAX_PATH, MAX_REQUEST};

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let at = usize::from(split).min(rest.len());

    let mut parser = RequestParser::new();
    let req = match parser.feed(&rest[..at]) {
        Ok(Some(req)) => Some(req),
        Ok(None) => parser.feed(&rest[at..]).ok().flatten(),
        Err(_) => None,
    };

    if let Some(req) = req {
        assert!(req.path.len() <= MAX_PATH);
        assert!(req.body.len() <= MAX_REQUEST);
        assert!(req.path.starts_with('/'), "path must be absolute");
    }
});
