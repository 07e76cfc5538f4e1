//! # Transport Tests
//!
//! Exercises the TCP printer transport against loopback sockets: the
//! connection lifecycle and its notifications, the blocking print
//! contract, and the error taxonomy. The "printer" is a plain
//! `TcpListener` so the bytes observed at the socket are exactly what a
//! printer would consume.

use std::io::{ErrorKind, Read};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use boleta::elements::Encoding;
use boleta::ticket::{Block, Ticket};
use boleta::transport::{ConnectionState, TcpTransport};
use boleta::BoletaError;

/// Bind a loopback listener and return it with the host/port strings a
/// caller would pass to `connect`.
fn printer_socket() -> (TcpListener, String, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("local addr");
    (listener, addr.ip().to_string(), addr.port().to_string())
}

/// Poll until `cond` holds or the timeout elapses.
fn wait_until(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

/// Transport with a handler that records every transition in order.
fn recording_transport() -> (TcpTransport, Arc<Mutex<Vec<ConnectionState>>>) {
    let states = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&states);
    let mut transport = TcpTransport::new();
    transport.on_connection_state_change(move |state| {
        recorder.lock().unwrap().push(state);
    });
    (transport, states)
}

fn recorded(states: &Arc<Mutex<Vec<ConnectionState>>>) -> Vec<ConnectionState> {
    states.lock().unwrap().clone()
}

fn wait_for_ready(transport: &TcpTransport) {
    assert!(
        wait_until(
            || transport.connection_state() == Some(ConnectionState::Ready),
            Duration::from_secs(2),
        ),
        "connection never became ready: {:?}",
        transport.connection_state()
    );
}

#[test]
fn print_before_connect_fails_without_io() {
    let (listener, _, _) = printer_socket();
    listener.set_nonblocking(true).unwrap();

    let transport = TcpTransport::new();
    assert!(matches!(
        transport.print(&[0x1D, 0x56, 0x00]),
        Err(BoletaError::NotConnected)
    ));
    assert_eq!(transport.connection_state(), None);

    // Nothing ever touched the socket
    assert_eq!(
        listener.accept().unwrap_err().kind(),
        ErrorKind::WouldBlock
    );
}

#[test]
fn invalid_port_fails_before_any_notification() {
    let (transport, states) = recording_transport();

    for bad in ["", "abc", "-9100", "65536", "0"] {
        assert!(
            matches!(
                transport.connect("127.0.0.1", bad),
                Err(BoletaError::InvalidPort(_))
            ),
            "expected InvalidPort for {:?}",
            bad
        );
    }

    assert!(recorded(&states).is_empty());
    assert_eq!(transport.connection_state(), None);
}

#[test]
fn connect_reports_setting_up_then_ready_in_order() {
    let (listener, host, port) = printer_socket();
    let (transport, states) = recording_transport();

    transport.connect(&host, &port).unwrap();
    wait_for_ready(&transport);
    drop(listener);

    assert_eq!(
        recorded(&states),
        vec![ConnectionState::SettingUp, ConnectionState::Ready]
    );
}

#[test]
fn connect_to_dead_endpoint_ends_in_failed() {
    // Bind and immediately drop to get a port that refuses connections.
    let (listener, host, port) = printer_socket();
    drop(listener);

    let (transport, states) = recording_transport();
    transport.connect(&host, &port).unwrap();

    assert!(wait_until(
        || transport.connection_state() == Some(ConnectionState::Failed),
        Duration::from_secs(2),
    ));
    assert_eq!(
        recorded(&states),
        vec![ConnectionState::SettingUp, ConnectionState::Failed]
    );

    // A failed connection rejects sends without queuing them
    assert!(matches!(
        transport.print(b"ticket"),
        Err(BoletaError::NotConnected)
    ));
}

#[test]
fn print_delivers_exact_ticket_bytes() {
    let (listener, host, port) = printer_socket();
    let ticket = Ticket::new()
        .add(Block::title("LA FONDA"))
        .add(Block::kv("Cafe", "2.50"))
        .add(Block::qr("https://example.com/r/42"))
        .serialize(Encoding::Utf8);

    let expected_len = ticket.len();
    let reader = thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("printer accept");
        let mut received = vec![0u8; expected_len];
        socket.read_exact(&mut received).expect("read ticket");
        received
    });

    let transport = TcpTransport::new();
    transport.connect(&host, &port).unwrap();
    wait_for_ready(&transport);

    transport.print(&ticket).unwrap();
    assert_eq!(transport.connection_state(), Some(ConnectionState::Ready));

    assert_eq!(reader.join().unwrap(), ticket);
}

#[test]
fn back_to_back_prints_arrive_whole_and_in_order() {
    let (listener, host, port) = printer_socket();

    let first = Ticket::new()
        .add(Block::plain_text("first ticket"))
        .serialize(Encoding::Utf8);
    let second = Ticket::new()
        .add(Block::plain_text("second ticket"))
        .add(Block::divider())
        .serialize(Encoding::Utf8);

    let total = first.len() + second.len();
    let reader = thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("printer accept");
        let mut received = vec![0u8; total];
        socket.read_exact(&mut received).expect("read tickets");
        received
    });

    let transport = TcpTransport::new();
    transport.connect(&host, &port).unwrap();
    wait_for_ready(&transport);

    transport.print(&first).unwrap();
    transport.print(&second).unwrap();

    // One ticket's bytes fully, then the next, never interleaved
    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(reader.join().unwrap(), expected);
}

#[test]
fn peer_failure_surfaces_as_transport_error_and_failed_state() {
    let (listener, host, port) = printer_socket();
    let (transport, states) = recording_transport();

    transport.connect(&host, &port).unwrap();
    let (socket, _) = listener.accept().expect("printer accept");
    wait_for_ready(&transport);
    drop(socket);
    drop(listener);

    // The first writes may land in buffers before the reset is observed;
    // keep sending until the failure surfaces.
    let payload = vec![0x20u8; 64 * 1024];
    let mut failure = None;
    for _ in 0..50 {
        match transport.print(&payload) {
            Ok(()) => thread::sleep(Duration::from_millis(10)),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    assert!(
        matches!(failure, Some(BoletaError::Transport(_))),
        "expected a transport error, got {:?}",
        failure
    );
    assert_eq!(transport.connection_state(), Some(ConnectionState::Failed));
    assert_eq!(
        recorded(&states),
        vec![
            ConnectionState::SettingUp,
            ConnectionState::Ready,
            ConnectionState::Failed
        ]
    );

    // The failed state is left exactly as reported; later prints are
    // rejected synchronously
    assert!(matches!(
        transport.print(b"more"),
        Err(BoletaError::NotConnected)
    ));
}

#[test]
fn disconnect_reports_cancelled() {
    let (listener, host, port) = printer_socket();
    let (transport, states) = recording_transport();

    transport.connect(&host, &port).unwrap();
    wait_for_ready(&transport);

    transport.disconnect();
    assert_eq!(transport.connection_state(), None);
    assert!(wait_until(
        || recorded(&states).last() == Some(&ConnectionState::Cancelled),
        Duration::from_secs(2),
    ));
    assert_eq!(
        recorded(&states),
        vec![
            ConnectionState::SettingUp,
            ConnectionState::Ready,
            ConnectionState::Cancelled
        ]
    );

    assert!(matches!(
        transport.print(b"late"),
        Err(BoletaError::NotConnected)
    ));
    drop(listener);
}

#[test]
fn new_connect_supersedes_previous_connection() {
    let (old_listener, old_host, old_port) = printer_socket();
    let (new_listener, new_host, new_port) = printer_socket();
    let (transport, states) = recording_transport();

    transport.connect(&old_host, &old_port).unwrap();
    wait_for_ready(&transport);

    transport.connect(&new_host, &new_port).unwrap();
    wait_for_ready(&transport);

    // The superseded connection reported Cancelled along the way
    assert!(wait_until(
        || recorded(&states).contains(&ConnectionState::Cancelled),
        Duration::from_secs(2),
    ));

    // Prints now go to the new endpoint
    let ticket = Ticket::new()
        .add(Block::plain_text("routed to the new printer"))
        .serialize(Encoding::Utf8);
    let expected_len = ticket.len();
    let reader = thread::spawn(move || {
        let (mut socket, _) = new_listener.accept().expect("accept on new endpoint");
        let mut received = vec![0u8; expected_len];
        socket.read_exact(&mut received).expect("read ticket");
        received
    });
    transport.print(&ticket).unwrap();
    assert_eq!(reader.join().unwrap(), ticket);
    drop(old_listener);
}

#[test]
fn teardown_unblocks_a_stalled_print() {
    let (listener, host, port) = printer_socket();
    let (transport, states) = recording_transport();

    transport.connect(&host, &port).unwrap();
    // Accept but never read, so a large send fills every buffer and stalls.
    let (socket, _) = listener.accept().expect("printer accept");
    wait_for_ready(&transport);

    let unblocked = AtomicBool::new(false);
    let payload = vec![0x20u8; 64 * 1024 * 1024];
    thread::scope(|scope| {
        let printer = scope.spawn(|| {
            let result = transport.print(&payload);
            unblocked.store(true, Ordering::SeqCst);
            result
        });

        // Give the send time to wedge, then tear the connection down.
        thread::sleep(Duration::from_millis(200));
        assert!(!unblocked.load(Ordering::SeqCst), "send never stalled");
        transport.disconnect();

        let result = printer.join().expect("print thread");
        assert!(matches!(result, Err(BoletaError::Transport(_))));
    });

    assert!(wait_until(
        || recorded(&states).last() == Some(&ConnectionState::Cancelled),
        Duration::from_secs(2),
    ));
    drop(socket);
}

#[test]
fn bounded_send_timeout_turns_a_stall_into_an_error() {
    let (listener, host, port) = printer_socket();
    let mut transport = TcpTransport::new();
    transport.set_send_timeout(Some(Duration::from_millis(200)));

    transport.connect(&host, &port).unwrap();
    let (socket, _) = listener.accept().expect("printer accept");
    wait_for_ready(&transport);

    let payload = vec![0x20u8; 64 * 1024 * 1024];
    let started = Instant::now();
    let result = transport.print(&payload);
    assert!(matches!(result, Err(BoletaError::Transport(_))));
    assert!(started.elapsed() < Duration::from_secs(5));

    drop(socket);
    transport.disconnect();
}

#[test]
fn state_notifications_use_a_channel_cleanly() {
    // The handler pattern the host application uses to persist a "last
    // connected" flag: forward transitions onto a channel and consume
    // them on its own thread.
    let (listener, host, port) = printer_socket();
    let (state_tx, state_rx) = mpsc::channel();

    let mut transport = TcpTransport::new();
    transport.on_connection_state_change(move |state| {
        let _ = state_tx.send(state);
    });
    transport.connect(&host, &port).unwrap();

    assert_eq!(
        state_rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        ConnectionState::SettingUp
    );
    assert_eq!(
        state_rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        ConnectionState::Ready
    );

    transport.disconnect();
    assert_eq!(
        state_rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        ConnectionState::Cancelled
    );
    drop(listener);
}
