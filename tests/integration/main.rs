//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. All tests run on the host with no real
//! hardware required; `http_tests` binds a loopback socket.

mod concurrency_tests;
mod control_plane_tests;
mod http_tests;
mod mock_hw;
mod monitor_tests;
