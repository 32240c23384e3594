//! Fuzz target: `Router::handle` with arbitrary JSON bodies
//!
//! Posts fuzzer bytes to every override endpoint and the scenario
//! endpoint. Invariants:
//! - No panics under any body
//! - Every response status is one the control plane documents
//! - A rejected override leaves the store untouched
//!
//! cargo fuzz run fuzz_router

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use mnemon::adapters::time::ManualClock;
use mnemon::context::MonitorContext;
use mnemon::control::ControlPlane;
use mnemon::http::{Router, RequestParser};
use mnemon::scenario;
use mnemon::sensors::Channel;

const PATHS: [&str; 4] = [
    "/api/sensors/dht22",
    "/api/sensors/ldr",
    "/api/sensors/mpu6050",
    "/api/scenario",
];

fuzz_target!(|data: &[u8]| {
    let Some((&pick, body)) = data.split_first() else {
        return;
    };
    let path = PATHS[usize::from(pick) % PATHS.len()];

    let mut raw = format!("POST {path} HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
    raw.extend_from_slice(body);
    let Ok(Some(req)) = RequestParser::new().feed(&raw) else {
        return;
    };

    let ctx = Arc::new(MonitorContext::new(
        scenario::default_name(),
        Box::new(ManualClock::new()),
    ));
    let before = Channel::ALL.map(|ch| ctx.store().cell(ch));
    let mut router = Router::new(ControlPlane::new(Arc::clone(&ctx)), 1000, 1000);
    let resp = router.handle(&req);

    assert!(matches!(resp.status, 200 | 400), "status {}", resp.status);
    if resp.status != 200 {
        let after = Channel::ALL.map(|ch| ctx.store().cell(ch));
        assert_eq!(before, after, "rejected request changed the store");
    }
});
