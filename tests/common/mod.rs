//! Fake collaborators for driving a connection without any real I/O.
//!
//! `FakeDriver` implements the driver seams with scriptable state: the
//! resolver outcome, each socket's connect results, inbound bytes and
//! per-call write acceptance are all set by the test, and every
//! subscription change is recorded for inspection.

#![allow(dead_code)]

use sockline::driver::{
    ConnectStatus, Driver, Interest, Notifier, RawSocket, ResolveStatus, Resolver, SocketId,
    TimerService,
};
use sockline::{Connection, Event};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;

/// Scripted outcome of one `connect` call on a fake socket.
#[derive(Clone, Copy, Debug)]
pub enum ConnectOutcome {
    Established,
    Pending,
    Refused,
}

/// Shared, scriptable state behind a [`FakeSocket`].
pub struct SocketState {
    pub nonblocking: bool,
    pub closed: bool,
    /// Outcomes popped by successive `connect` calls; empty means
    /// `Established`.
    pub connect_results: VecDeque<ConnectOutcome>,
    /// Bytes the socket will serve to `read`.
    pub inbound: Vec<u8>,
    /// Maximum bytes accepted per `write` call.
    pub accept_limit: usize,
    /// Accepted bytes of each `write` call, in order.
    pub writes: Vec<Vec<u8>>,
    /// Error kind returned by the next `read` call, if set.
    pub read_error: Option<io::ErrorKind>,
    /// Error kind returned by the next `write` call, if set.
    pub write_error: Option<io::ErrorKind>,
}

impl Default for SocketState {
    fn default() -> Self {
        Self {
            nonblocking: false,
            closed: false,
            connect_results: VecDeque::new(),
            inbound: Vec::new(),
            accept_limit: usize::MAX,
            writes: Vec::new(),
            read_error: None,
            write_error: None,
        }
    }
}

impl SocketState {
    /// Concatenation of all accepted bytes, in transmission order.
    pub fn transmitted(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

/// A raw socket whose behavior is scripted through a shared [`SocketState`].
pub struct FakeSocket {
    id: SocketId,
    state: Rc<RefCell<SocketState>>,
}

impl FakeSocket {
    pub fn new(id: SocketId, state: Rc<RefCell<SocketState>>) -> Self {
        Self { id, state }
    }
}

impl RawSocket for FakeSocket {
    fn id(&self) -> SocketId {
        self.id
    }

    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        self.state.borrow_mut().nonblocking = nonblocking;
        Ok(())
    }

    fn connect(&mut self, _addr: std::net::SocketAddr) -> io::Result<ConnectStatus> {
        let outcome = self
            .state
            .borrow_mut()
            .connect_results
            .pop_front()
            .unwrap_or(ConnectOutcome::Established);

        match outcome {
            ConnectOutcome::Established => Ok(ConnectStatus::Established),
            ConnectOutcome::Pending => Ok(ConnectStatus::Pending),
            ConnectOutcome::Refused => Err(io::ErrorKind::ConnectionRefused.into()),
        }
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();

        if let Some(kind) = state.read_error.take() {
            return Err(kind.into());
        }

        let n = buffer.len().min(state.inbound.len());
        buffer[..n].copy_from_slice(&state.inbound[..n]);
        state.inbound.drain(..n);
        Ok(n)
    }

    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();

        if let Some(kind) = state.write_error.take() {
            return Err(kind.into());
        }

        let accepted = buffer.len().min(state.accept_limit);
        state.writes.push(buffer[..accepted].to_vec());
        Ok(accepted)
    }

    fn bytes_available(&self) -> usize {
        self.state.borrow().inbound.len()
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed = true;
    }
}

/// A resolver whose outcome the test sets explicitly.
#[derive(Default)]
pub struct FakeResolver {
    pub requests: Vec<String>,
    status: Option<ResolveStatus>,
}

impl FakeResolver {
    pub fn succeed(&mut self, addrs: Vec<IpAddr>) {
        self.status = Some(ResolveStatus::Found(addrs));
    }

    pub fn fail(&mut self) {
        self.status = Some(ResolveStatus::Failed);
    }
}

impl Resolver for FakeResolver {
    fn resolve(&mut self, host: &str) {
        self.requests.push(host.to_string());
        self.status = Some(ResolveStatus::Pending);
    }

    fn status(&self) -> ResolveStatus {
        self.status.clone().unwrap_or(ResolveStatus::Pending)
    }
}

/// Records every subscription change the connection makes.
#[derive(Default)]
pub struct RecordingNotifier {
    pub registered: Vec<(SocketId, Interest)>,
    pub deregistered: Vec<SocketId>,
    /// The currently active subscription, if any.
    pub current: Option<(SocketId, Interest)>,
}

impl Notifier for RecordingNotifier {
    fn register(&mut self, id: SocketId, interest: Interest) {
        self.registered.push((id, interest));
        self.current = Some((id, interest));
    }

    fn reregister(&mut self, id: SocketId, interest: Interest) {
        self.current = Some((id, interest));
    }

    fn deregister(&mut self, id: SocketId) {
        self.deregistered.push(id);
        self.current = None;
    }
}

/// A timer the test ticks by hand.
#[derive(Default)]
pub struct ManualTimer {
    pub armed: Option<Duration>,
    pub arm_count: usize,
    pub disarm_count: usize,
}

impl TimerService for ManualTimer {
    fn arm(&mut self, interval: Duration) {
        self.armed = Some(interval);
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed = None;
        self.disarm_count += 1;
    }
}

/// Scriptable event-loop handle for tests.
#[derive(Default)]
pub struct FakeDriver {
    pub resolver: FakeResolver,
    pub notifier: RecordingNotifier,
    pub timer: ManualTimer,
    /// State of every socket opened so far, oldest first.
    pub sockets: Vec<Rc<RefCell<SocketState>>>,
    /// States handed to upcoming `open_socket` calls.
    scripted: VecDeque<Rc<RefCell<SocketState>>>,
    pub open_error: Option<io::ErrorKind>,
    next_id: SocketId,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the state the next opened socket will use, returning a
    /// handle for later inspection.
    pub fn script_next_socket(&mut self) -> Rc<RefCell<SocketState>> {
        let state = Rc::new(RefCell::new(SocketState::default()));
        self.scripted.push_back(state.clone());
        state
    }

    /// The most recently opened socket's state.
    pub fn last_socket(&self) -> Rc<RefCell<SocketState>> {
        self.sockets
            .last()
            .cloned()
            .expect("Failed to find an opened socket")
    }
}

impl Driver for FakeDriver {
    type Socket = FakeSocket;
    type Resolver = FakeResolver;
    type Notifier = RecordingNotifier;
    type Timer = ManualTimer;

    fn open_socket(&mut self) -> io::Result<FakeSocket> {
        if let Some(kind) = self.open_error.take() {
            return Err(kind.into());
        }

        let state = self
            .scripted
            .pop_front()
            .unwrap_or_else(|| Rc::new(RefCell::new(SocketState::default())));
        let id = self.next_id;
        self.next_id += 1;

        self.sockets.push(state.clone());
        Ok(FakeSocket::new(id, state))
    }

    fn resolver(&mut self) -> &mut FakeResolver {
        &mut self.resolver
    }

    fn notifier(&mut self) -> &mut RecordingNotifier {
        &mut self.notifier
    }

    fn timer(&mut self) -> &mut ManualTimer {
        &mut self.timer
    }
}

/// Drains every queued notification.
pub fn drain_events(connection: &mut Connection<FakeDriver>) -> Vec<Event> {
    let mut events = Vec::new();

    while let Some(event) = connection.poll_event() {
        events.push(event);
    }

    events
}

/// Drives a fresh connection all the way to `Connected` against the
/// given address, draining the lifecycle events on the way.
pub fn establish(connection: &mut Connection<FakeDriver>, addr: &str) -> Rc<RefCell<SocketState>> {
    let addr: IpAddr = addr.parse().expect("Failed to parse address");

    connection.connect_to_host("example.org", 80);
    connection.driver_mut().resolver.succeed(vec![addr]);
    connection.on_resolver_update();
    connection.on_write_ready();
    drain_events(connection);

    connection.driver().last_socket()
}

/// Makes `bytes` readable on the socket and fires read readiness.
pub fn deliver(
    connection: &mut Connection<FakeDriver>,
    socket: &Rc<RefCell<SocketState>>,
    bytes: &[u8],
) {
    socket.borrow_mut().inbound.extend_from_slice(bytes);
    connection.on_read_ready();
}
