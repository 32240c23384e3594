//! HTTP I/O task: reactor-driven, one task per connection.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! multi-task scheduling and `async-io-mini` for reactor-driven timers
//! (no busy-spinning). Tasks:
//!
//! 1. **Accept**: polls the non-blocking listener every 50 ms, spawns a
//!    client task per connection while fewer than [`MAX_CLIENTS`] are open
//! 2. **Client**: polls its socket every 1 ms, feeds the request parser,
//!    routes the complete request, writes the response and closes
//!
//! ```text
//!  ┌────────────────────────────────────────────────────────────┐
//!  │  http-io thread                                            │
//!  │  ┌──────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                        │  │
//!  │  │                                                      │  │
//!  │  │  ┌─────────┐  ┌──────────┐  ┌──────────┐             │  │
//!  │  │  │ Accept  │  │ Client 1 │  │ Client 2 │  …  (≤ 4)   │  │
//!  │  │  │ 50ms ⏱  │  │ 1ms ⏱    │  │ 1ms ⏱    │             │  │
//!  │  │  └─────────┘  └──────────┘  └──────────┘             │  │
//!  │  └───────────────────────┬──────────────────────────────┘  │
//!  └──────────────────────────┼─────────────────────────────────┘
//!                             ▼
//!                 Router ──▶ ControlPlane ──▶ Arc<MonitorContext>
//! ```
//!
//! The router lives on this thread only; the sampler is reached through
//! the shared context, never through this executor.

use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::rc::Rc;
use std::time::Instant;

use edge_executor::LocalExecutor;
use log::{debug, info, warn};

use super::HttpResponse;
use super::request::RequestParser;
use super::router::Router;

/// Connections served at once; further ones wait in the listen backlog.
pub const MAX_CLIENTS: usize = 4;

/// A connection must deliver its full request within this window.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

const ACCEPT_POLL: Duration = Duration::from_millis(50);
const READ_POLL: Duration = Duration::from_millis(1);
const READ_CHUNK: usize = 512;

type SharedRouter = Rc<RefCell<Router>>;
type Executor<'a> = LocalExecutor<'a, 8>;

/// Bind the control-plane listener in non-blocking mode.
pub fn bind(port: u16) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

// ── Connection slot accounting ───────────────────────────────

/// Frees the client slot when the connection task ends, however it ends.
struct SlotGuard(Rc<Cell<usize>>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

// ── Async tasks ──────────────────────────────────────────────

/// Accept task: checks for new connections at 50 ms intervals.
async fn accept_loop<'a>(
    executor: &Executor<'a>,
    listener: TcpListener,
    router: SharedRouter,
    active: Rc<Cell<usize>>,
) {
    loop {
        if active.get() < MAX_CLIENTS {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(true) {
                        warn!("HTTP: {} setup failed: {}", peer, e);
                        continue;
                    }
                    debug!("HTTP: {} connected", peer);
                    active.set(active.get() + 1);
                    let guard = SlotGuard(active.clone());
                    executor
                        .spawn(client_task(stream, peer, router.clone(), guard))
                        .detach();
                    // Drain the backlog before sleeping.
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => warn!("HTTP: accept failed: {}", e),
            }
        }
        async_io_mini::Timer::after(ACCEPT_POLL).await;
    }
}

/// Client task: read one request, answer it, close.
async fn client_task(mut stream: TcpStream, peer: SocketAddr, router: SharedRouter, _slot: SlotGuard) {
    let started = Instant::now();
    let mut parser = RequestParser::new();
    let mut buf = [0u8; READ_CHUNK];

    let response = loop {
        match stream.read(&mut buf) {
            Ok(0) => {
                debug!("HTTP: {} closed before sending a request", peer);
                return;
            }
            Ok(n) => match parser.feed(&buf[..n]) {
                Ok(Some(req)) => break router.borrow_mut().handle(&req),
                Ok(None) => continue,
                Err(e) => {
                    warn!("HTTP: {} rejected: {}", peer, e);
                    break HttpResponse::error(e);
                }
            },
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("HTTP: {} read failed: {}", peer, e);
                return;
            }
        }
        if started.elapsed() >= REQUEST_TIMEOUT {
            warn!("HTTP: {} timed out after {} bytes", peer, parser.buffered());
            return;
        }
        async_io_mini::Timer::after(READ_POLL).await;
    };

    if let Err(e) = write_response(&mut stream, &response) {
        warn!("HTTP: {} write failed: {}", peer, e);
    }
}

/// Blocking write, bounded by [`REQUEST_TIMEOUT`].
fn write_response(stream: &mut TcpStream, response: &HttpResponse) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_write_timeout(Some(REQUEST_TIMEOUT))?;
    stream.write_all(&response.to_bytes())?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)
}

/// Entry point for the I/O thread.
fn run_io_loop(listener: TcpListener, router: Router) {
    let executor: Executor<'_> = LocalExecutor::new();
    let router: SharedRouter = Rc::new(RefCell::new(router));
    let active = Rc::new(Cell::new(0usize));

    match listener.local_addr() {
        Ok(addr) => info!("HTTP: listening on {} ({} max clients)", addr, MAX_CLIENTS),
        Err(_) => info!("HTTP: listening ({} max clients)", MAX_CLIENTS),
    }

    futures_lite::future::block_on(executor.run(accept_loop(&executor, listener, router, active)));
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the I/O thread. Takes ownership of the bound listener and the
/// router; runs until the process exits.
pub fn spawn(listener: TcpListener, router: Router) -> io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("http-io".into())
        .spawn(move || run_io_loop(listener, router))
}
