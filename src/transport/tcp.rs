//! # TCP Printer Transport
//!
//! Manages a single TCP connection to a printer endpoint with an explicit
//! lifecycle, and performs a blocking send of a finished ticket byte
//! stream.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! (no connection)
//!       │ connect(host, port)
//!       ▼
//!  SettingUp ──► Ready ──► Failed      (socket / send error)
//!       │          │
//!       │          └─────► Cancelled   (disconnect / superseded)
//!       └──► Failed | Cancelled
//! ```
//!
//! `Failed` and `Cancelled` are terminal for a connection; a new
//! `connect` call discards the old connection and starts a fresh one.
//! Every transition is delivered to the registered state-change handler,
//! in order; the handler is the only channel by which transient states
//! are observable, since `print` only reports the outcome of one send.
//!
//! ## Blocking Print
//!
//! Each connection's I/O runs on a dedicated worker thread created at
//! connect time. `print` hands the buffer to the worker over a channel
//! and blocks on a completion channel until the send succeeds or fails.
//! Printers are driven synchronously from request/response application
//! logic, so the asynchronous send is deliberately wrapped into one
//! blocking call with no internal retry and no queuing. Concurrent
//! `print` calls are not coordinated here; callers must serialize them,
//! one transport per printer.
//!
//! No timeout is enforced by default (`set_send_timeout` opts into a
//! bounded wait). Tearing the connection down shuts the socket, so a
//! `print` blocked on a stalled peer returns an error instead of hanging.
//!
//! TCP_NODELAY is always enabled; printers are latency-sensitive for
//! short command bursts. No TLS: a trusted local network is assumed.

use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::BoletaError;

/// Lifecycle state of one printer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The connection is being established.
    SettingUp,
    /// The connection is live; `print` is accepted.
    Ready,
    /// A socket or send error ended the connection. Terminal.
    Failed,
    /// The connection was torn down or superseded. Terminal.
    Cancelled,
}

impl ConnectionState {
    /// Whether this state ends the connection's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// Handler invoked on every connection state transition.
///
/// Notifications are informational and delivered in transition order from
/// the connection's threads; handlers must not block for long and must
/// not panic.
pub type StateHandler = dyn Fn(ConnectionState) + Send + Sync;

enum Command {
    Send(Vec<u8>, mpsc::Sender<std::io::Result<()>>),
    Shutdown,
}

/// Lock that survives a poisoned mutex (state reads must stay available
/// even if a handler panicked on another thread).
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// State shared between the transport, the worker thread, and teardown.
struct Shared {
    state: Mutex<ConnectionState>,
    /// Clone of the live stream, kept so teardown can unblock a stalled
    /// send from outside the worker.
    stream: Mutex<Option<TcpStream>>,
    /// Set by teardown before the socket is shut down, so the worker can
    /// tell a deliberate cancellation apart from a peer failure.
    closing: AtomicBool,
    handler: Option<Arc<StateHandler>>,
}

impl Shared {
    fn set_state(&self, next: ConnectionState) {
        *lock(&self.state) = next;
        debug!(state = ?next, "printer connection state");
        if let Some(handler) = &self.handler {
            handler(next);
        }
    }

    fn state(&self) -> ConnectionState {
        *lock(&self.state)
    }

    fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// The terminal state a worker should report when its socket dies:
    /// Cancelled if teardown initiated it, Failed otherwise.
    fn exit_state(&self) -> ConnectionState {
        if self.is_closing() {
            ConnectionState::Cancelled
        } else {
            ConnectionState::Failed
        }
    }
}

/// One live TCP session, owned exclusively by its transport.
struct Connection {
    shared: Arc<Shared>,
    cmd_tx: mpsc::Sender<Command>,
}

impl Connection {
    /// Start a connection attempt. Reports `SettingUp` synchronously,
    /// then hands off to a dedicated worker thread.
    fn open(host: &str, port: u16, handler: Option<Arc<StateHandler>>) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(ConnectionState::SettingUp),
            stream: Mutex::new(None),
            closing: AtomicBool::new(false),
            handler,
        });
        debug!(host, port = %port, "printer connection starting");
        if let Some(handler) = &shared.handler {
            handler(ConnectionState::SettingUp);
        }

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let addr = format!("{}:{}", host, port);
        let worker_shared = Arc::clone(&shared);
        let spawned = thread::Builder::new()
            .name("boleta-printer-io".into())
            .spawn(move || worker(addr, worker_shared, cmd_rx));
        if let Err(e) = spawned {
            warn!(error = %e, "could not spawn printer I/O thread");
            shared.set_state(ConnectionState::Failed);
        }

        Self { shared, cmd_tx }
    }

    fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Tear the connection down: mark it closing, shut the socket so a
    /// blocked send returns, and tell the worker to exit with Cancelled.
    fn teardown(&self) {
        self.shared.closing.store(true, Ordering::SeqCst);
        if let Some(stream) = lock(&self.shared.stream).take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        let _ = self.cmd_tx.send(Command::Shutdown);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if !self.state().is_terminal() {
            self.teardown();
        }
    }
}

/// Per-connection I/O loop. Runs on the dedicated worker thread and is
/// the only place that mutates the socket or drives state transitions
/// after setup.
fn worker(addr: String, shared: Arc<Shared>, cmd_rx: mpsc::Receiver<Command>) {
    let mut stream = match TcpStream::connect(&addr) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(%addr, error = %e, "printer connect failed");
            shared.set_state(shared.exit_state());
            return;
        }
    };

    // Hard requirement: no coalescing of short command bursts.
    if let Err(e) = stream.set_nodelay(true) {
        warn!(%addr, error = %e, "could not enable TCP_NODELAY");
        shared.set_state(shared.exit_state());
        return;
    }

    match stream.try_clone() {
        Ok(clone) => *lock(&shared.stream) = Some(clone),
        Err(e) => {
            warn!(%addr, error = %e, "could not retain printer socket handle");
            shared.set_state(shared.exit_state());
            return;
        }
    }

    // Torn down while the handshake was in flight
    if shared.is_closing() {
        shared.set_state(ConnectionState::Cancelled);
        return;
    }

    shared.set_state(ConnectionState::Ready);

    for cmd in cmd_rx {
        match cmd {
            Command::Send(bytes, reply) => {
                debug!(len = bytes.len(), "sending ticket to printer");
                let result = stream.write_all(&bytes).and_then(|_| stream.flush());
                match result {
                    Ok(()) => {
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        // State change first, so the notification is never
                        // observed after the print outcome it explains.
                        shared.set_state(shared.exit_state());
                        let _ = reply.send(Err(e));
                        return;
                    }
                }
            }
            Command::Shutdown => {
                shared.set_state(ConnectionState::Cancelled);
                return;
            }
        }
    }

    // Command channel closed without an explicit shutdown: the transport
    // was dropped.
    shared.set_state(ConnectionState::Cancelled);
}

/// TCP client for a thermal printer.
///
/// Owns at most one live [`Connection`]; calling `connect` again
/// supersedes (cancels) any prior one. One transport per printer;
/// there is no multiplexing.
///
/// The connection slot uses interior mutability so that `disconnect` (or
/// a superseding `connect`) can be issued from another thread while a
/// `print` is blocked on a stalled socket; the blocked call then returns
/// a transport error and the connection reports `Cancelled`. This does
/// not coordinate concurrent `print` calls; those remain the caller's
/// job to serialize.
///
/// ## Example
///
/// ```no_run
/// use boleta::elements::Encoding;
/// use boleta::ticket::{Block, Ticket};
/// use boleta::transport::TcpTransport;
///
/// let mut printer = TcpTransport::new();
/// printer.on_connection_state_change(|state| {
///     eprintln!("printer: {:?}", state);
/// });
/// printer.connect("192.168.1.50", "9100")?;
///
/// let ticket = Ticket::new().add(Block::title("HELLO"));
/// // ... wait for Ready via the state handler, then:
/// printer.print(&ticket.serialize(Encoding::Utf8))?;
/// # Ok::<(), boleta::BoletaError>(())
/// ```
#[derive(Default)]
pub struct TcpTransport {
    connection: Mutex<Option<Connection>>,
    handler: Option<Arc<StateHandler>>,
    send_timeout: Option<Duration>,
}

impl TcpTransport {
    /// A transport with no connection and no state handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the connection-state handler.
    ///
    /// The handler is captured by connections created by later `connect`
    /// calls; it is invoked exactly once per transition, in order.
    pub fn on_connection_state_change<F>(&mut self, handler: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
    }

    /// Bound the blocking wait inside [`print`](Self::print).
    ///
    /// Default is `None`: `print` waits as long as the socket does. With a
    /// timeout set, an expired wait surfaces as a transport error; the
    /// send itself is not retried or recovered.
    pub fn set_send_timeout(&mut self, timeout: Option<Duration>) {
        self.send_timeout = timeout;
    }

    /// Open a connection to `host:port`, superseding any existing one.
    ///
    /// The port must parse to a valid non-zero port number; otherwise
    /// this fails with [`BoletaError::InvalidPort`] before any socket is
    /// created or notification fires. Connection establishment itself is
    /// asynchronous: observe `Ready` (or `Failed`) through the state
    /// handler or [`connection_state`](Self::connection_state).
    pub fn connect(&self, host: &str, port: &str) -> Result<(), BoletaError> {
        let port = parse_port(port)?;

        if let Some(old) = lock(&self.connection).take() {
            old.teardown();
        }
        // The slot lock is not held while the new connection notifies
        // SettingUp, so a handler may call back into this transport.
        let connection = Connection::open(host, port, self.handler.clone());
        *lock(&self.connection) = Some(connection);
        Ok(())
    }

    /// Tear down the current connection, if any. The connection reports
    /// `Cancelled` through the state handler, and any `print` blocked on
    /// it returns a transport error.
    pub fn disconnect(&self) {
        if let Some(connection) = lock(&self.connection).take() {
            connection.teardown();
        }
    }

    /// Current connection state, or `None` if `connect` was never called
    /// (or the connection was explicitly discarded).
    pub fn connection_state(&self) -> Option<ConnectionState> {
        lock(&self.connection).as_ref().map(Connection::state)
    }

    /// Send one finished ticket byte stream, blocking until the send
    /// completes or fails.
    ///
    /// Preconditions, checked in order with zero I/O on violation:
    /// 1. a connection exists, else [`BoletaError::NotConnected`];
    /// 2. its state is `Ready`; any other state is rejected immediately
    ///    rather than queued, also as `NotConnected`.
    ///
    /// A send failure surfaces as [`BoletaError::Transport`] and leaves
    /// the connection state exactly as reported by the state handler; the
    /// caller decides whether to reconnect. No retries, no buffering.
    pub fn print(&self, bytes: &[u8]) -> Result<(), BoletaError> {
        // Clone the connection's handles and release the slot lock before
        // blocking, so teardown stays possible while the send is in flight.
        let (shared, cmd_tx) = {
            let slot = lock(&self.connection);
            let connection = slot.as_ref().ok_or(BoletaError::NotConnected)?;
            (Arc::clone(&connection.shared), connection.cmd_tx.clone())
        };
        if shared.state() != ConnectionState::Ready {
            return Err(BoletaError::NotConnected);
        }

        let (reply_tx, reply_rx) = mpsc::channel();
        cmd_tx
            .send(Command::Send(bytes.to_vec(), reply_tx))
            .map_err(|_| BoletaError::Unknown)?;

        let outcome = match self.send_timeout {
            None => reply_rx.recv().map_err(|_| interrupted_send())?,
            Some(timeout) => reply_rx.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => {
                    BoletaError::Transport(format!("send timed out after {:?}", timeout))
                }
                RecvTimeoutError::Disconnected => interrupted_send(),
            })?,
        };

        outcome.map_err(|e| BoletaError::Transport(e.to_string()))
    }
}

/// Error for a send whose completion channel died: the connection was
/// cancelled or its worker exited before reporting an outcome.
fn interrupted_send() -> BoletaError {
    BoletaError::Transport("connection closed before send completed".into())
}

fn parse_port(port: &str) -> Result<u16, BoletaError> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(BoletaError::InvalidPort(port.to_string())),
        Ok(port) => Ok(port),
    }
}
