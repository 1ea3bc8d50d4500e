use super::bridge::NotificationBridge;
use super::builder::{Config, ConnectionBuilder};
use super::event::Event;
use super::state::{Mode, State, WriteReadiness};
use crate::buffer::{ChunkQueue, ScanOutcome, scan_line};
use crate::driver::{ConnectStatus, Driver, Interest, RawSocket, Resolver, ResolveStatus};
use crate::error::ConnError;

use std::collections::VecDeque;
use std::io;
use std::net::{IpAddr, SocketAddr};

use tracing::{debug, trace};

/// A buffered, non-blocking connection.
///
/// `Connection` sits between application code and a raw byte-stream
/// socket. Writes are queued in memory and transmitted as the socket
/// accepts them; inbound bytes are queued as the socket produces them and
/// drained with [`read`](Self::read) or, in line mode,
/// [`read_line`](Self::read_line). No operation ever blocks: the
/// lifecycle advances through the `on_*` entry points the host event loop
/// calls when the resolver progresses, the socket becomes readable or
/// writable, or the idle timer fires.
///
/// All logic runs on the thread owning the host loop; application calls
/// and readiness callbacks are serialized through the same dispatch, so
/// there is no internal locking.
pub struct Connection<D: Driver> {
    /// The injected event-loop handle.
    pub(crate) driver: D,

    /// Current lifecycle state.
    pub(crate) state: State,

    /// Current read mode.
    pub(crate) mode: Mode,

    /// Hostname of the current or last connection attempt.
    pub(crate) host: String,

    /// Peer port of the current or last connection attempt.
    pub(crate) port: u16,

    /// Address picked from the resolver's result.
    pub(crate) addr: Option<IpAddr>,

    /// The owned raw socket handle, present from Connecting onward.
    pub(crate) socket: Option<D::Socket>,

    /// Unconsumed inbound bytes.
    pub(crate) read_queue: ChunkQueue,

    /// Outbound bytes pending transmission.
    pub(crate) write_queue: ChunkQueue,

    /// Whether a complete line is buffered. Meaningful only in line mode.
    pub(crate) has_newline: bool,

    /// Whether any read-readiness event was seen since the socket came up.
    /// The very first one may report an empty socket without the peer
    /// having closed, and must not be treated as a close.
    pub(crate) seen_read_ready: bool,

    /// Readiness subscriptions and idle-timer state.
    pub(crate) bridge: NotificationBridge,

    /// Notifications not yet drained by the host.
    pub(crate) events: VecDeque<Event>,

    /// Buffering thresholds and idle interval.
    pub(crate) config: Config,
}

impl<D: Driver> Connection<D> {
    /// Creates an idle connection with default configuration.
    ///
    /// Use [`ConnectionBuilder`] to customize thresholds.
    pub fn new(driver: D) -> Self {
        ConnectionBuilder::new().build(driver)
    }

    pub(crate) fn with_config(driver: D, config: Config) -> Self {
        Self {
            driver,
            state: State::Idle,
            mode: Mode::Binary,
            host: String::new(),
            port: 0,
            addr: None,
            socket: None,
            read_queue: ChunkQueue::new(),
            write_queue: ChunkQueue::new(),
            has_newline: false,
            seen_read_ready: false,
            bridge: NotificationBridge::new(),
            events: VecDeque::new(),
            config,
        }
    }

    /// Starts a connection attempt to `host:port`.
    ///
    /// Any previous connection is torn down first and all buffered state
    /// is discarded. The call returns immediately; progress is reported
    /// through [`Event`]s as the resolver and the socket advance.
    pub fn connect_to_host(&mut self, host: &str, port: u16) {
        self.force_idle();
        self.reset_stream_state();

        self.host = host.to_string();
        self.port = port;
        self.state = State::ResolvingHost;

        debug!(host, port, "starting host resolution");
        self.driver.resolver().resolve(host);
    }

    /// Takes ownership of an already-established raw socket and enters
    /// the connected state directly.
    ///
    /// Like [`connect_to_host`](Self::connect_to_host), any previous
    /// connection is torn down first. The handle is made non-blocking and
    /// subscribed for both readiness directions.
    pub fn adopt_socket(&mut self, mut socket: D::Socket) {
        self.force_idle();
        self.reset_stream_state();

        if let Err(err) = socket.set_nonblocking(true) {
            socket.close();
            self.push_event(Event::Error(ConnError::Socket(err)));
            return;
        }

        let id = socket.id();
        self.socket = Some(socket);
        self.state = State::Connected;
        self.bridge.bind(
            self.driver.notifier(),
            id,
            Interest {
                read: true,
                write: true,
            },
        );

        debug!(id, "adopted established socket");
        self.push_event(Event::Connected);
    }

    /// Closes the connection.
    ///
    /// No-op when idle. The read mode resets to binary and any
    /// buffered-but-unread input is dropped. With an empty write queue
    /// the close completes synchronously and the connection is idle when
    /// the call returns; otherwise it moves to [`State::Closing`] and
    /// finishes with [`Event::DelayedCloseFinished`] once every pending
    /// byte has been transmitted.
    pub fn close(&mut self) {
        if self.state == State::Idle {
            return;
        }

        self.mode = Mode::Binary;
        self.has_newline = false;
        self.read_queue.clear();
        self.disarm_idle_timer();

        if !self.write_queue.is_empty() && self.socket.is_some() {
            debug!(
                pending = self.write_queue.len(),
                "deferring close until pending writes drain"
            );
            self.state = State::Closing;
            self.bridge.set_interest(
                self.driver.notifier(),
                Interest {
                    read: false,
                    write: true,
                },
            );
            return;
        }

        self.teardown_socket();
        self.write_queue.clear();
        self.state = State::Idle;
        debug!("connection closed");
    }

    /// Switches between binary and line reads.
    ///
    /// Entering line mode scans the already-buffered input for a
    /// terminator; leaving it drops the cached scan result.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;

        match mode {
            Mode::Line => self.rescan_newline(),
            Mode::Binary => self.has_newline = false,
        }
    }

    /// Queues bytes for transmission, returning how many were accepted.
    ///
    /// Returns `0` with no side effect while the connection is draining
    /// toward a close, or when `data` is empty. Everything else is
    /// buffered in full — transmission happens as the socket reports
    /// write readiness, in exactly the order `write` calls queued the
    /// bytes.
    pub fn write(&mut self, data: &[u8]) -> usize {
        if self.state == State::Closing || data.is_empty() {
            return 0;
        }

        self.write_queue
            .append(data, self.config.small_write_threshold);
        trace!(
            bytes = data.len(),
            pending = self.write_queue.len(),
            "queued outbound bytes"
        );

        if self.socket.is_some() {
            self.bridge.set_interest(
                self.driver.notifier(),
                Interest {
                    read: true,
                    write: true,
                },
            );
        }

        data.len()
    }

    /// Drains up to `maxlen` buffered inbound bytes.
    ///
    /// Valid in any state, so input buffered before a peer close remains
    /// readable. Returns an empty vector when nothing is buffered.
    pub fn read(&mut self, maxlen: usize) -> Vec<u8> {
        let n = maxlen.min(self.read_queue.len());
        let mut out = Vec::with_capacity(n);

        if n > 0 {
            self.read_queue.consume(n, Some(&mut out));
            self.after_consume();
        }

        out
    }

    /// Returns `true` when a complete line is buffered in line mode.
    pub fn can_read_line(&self) -> bool {
        self.mode == Mode::Line && self.has_newline
    }

    /// Drains one line, including its terminating `\n`.
    ///
    /// Returns an empty vector unless [`can_read_line`](Self::can_read_line)
    /// currently holds.
    pub fn read_line(&mut self) -> Vec<u8> {
        if !self.can_read_line() {
            return Vec::new();
        }

        let mut line = Vec::new();

        match scan_line(&self.read_queue, Some(&mut line)) {
            ScanOutcome::Line(len) => {
                self.read_queue.consume(len, None);
                self.after_consume();
                line
            }
            ScanOutcome::NoLine => Vec::new(),
        }
    }

    /// Returns the number of buffered inbound bytes.
    pub fn bytes_available(&self) -> usize {
        self.read_queue.len()
    }

    /// Returns the number of outbound bytes pending transmission.
    pub fn bytes_to_write(&self) -> usize {
        self.write_queue.len()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the current read mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the hostname of the current or last connection attempt.
    pub fn peer_host(&self) -> &str {
        &self.host
    }

    /// Returns the peer port of the current or last connection attempt.
    pub fn peer_port(&self) -> u16 {
        self.port
    }

    /// Returns the resolved peer address once one has been picked.
    pub fn peer_address(&self) -> Option<IpAddr> {
        self.addr
    }

    /// Returns the injected driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns the injected driver mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Removes and returns the oldest undelivered notification.
    pub fn poll_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Entry point for resolver progress.
    ///
    /// The host calls this whenever the lookup started by
    /// [`connect_to_host`](Self::connect_to_host) advances. A pending
    /// lookup with no address yet keeps waiting; a failed or empty result
    /// degrades to idle with [`ConnError::ResolveFailed`]; otherwise the
    /// *first* resolved address is picked deterministically and the
    /// connect is issued.
    pub fn on_resolver_update(&mut self) {
        if self.state != State::ResolvingHost {
            return;
        }

        match self.driver.resolver().status() {
            ResolveStatus::Pending => {}

            ResolveStatus::Failed => self.fail_resolution(),

            ResolveStatus::Found(addrs) => match addrs.first() {
                Some(&addr) => {
                    self.push_event(Event::HostFound);
                    self.start_connect(addr);
                }
                None => self.fail_resolution(),
            },
        }
    }

    /// Entry point for read readiness on the current socket.
    pub fn on_read_ready(&mut self) {
        if self.state != State::Connected {
            return;
        }

        self.ingest();
    }

    /// Entry point for write readiness on the current socket.
    ///
    /// While connecting, write readiness reports the handshake outcome;
    /// once connected (or draining toward a close) it drives the flush
    /// engine.
    pub fn on_write_ready(&mut self) {
        match self.state.write_readiness() {
            WriteReadiness::AwaitingConnect => self.finish_connect(),
            WriteReadiness::Flushing => self.flush(),
            WriteReadiness::Ignored => {}
        }
    }

    /// Entry point for the idle-data timer.
    ///
    /// Re-announces buffered input while any remains; disarms the timer
    /// once the read queue has emptied.
    pub fn on_timer_tick(&mut self) {
        if self.read_queue.is_empty() {
            self.disarm_idle_timer();
            return;
        }

        self.push_event(Event::ReadyRead);
    }

    /// Forces the connection to idle, discarding a deferred close if a
    /// previous `close()` left one draining.
    fn force_idle(&mut self) {
        if self.state == State::Idle {
            return;
        }

        self.close();

        if self.state != State::Idle {
            self.teardown_socket();
            self.write_queue.clear();
            self.state = State::Idle;
        }
    }

    /// Clears all per-attempt buffered state before a fresh connection.
    fn reset_stream_state(&mut self) {
        self.read_queue.clear();
        self.write_queue.clear();
        self.has_newline = false;
        self.seen_read_ready = false;
        self.addr = None;
    }

    fn fail_resolution(&mut self) {
        debug!(host = %self.host, "host resolution failed");
        self.state = State::Idle;
        self.push_event(Event::Error(ConnError::ResolveFailed));
    }

    /// Opens a socket and issues the non-blocking connect.
    fn start_connect(&mut self, addr: IpAddr) {
        self.addr = Some(addr);
        let target = SocketAddr::new(addr, self.port);

        let mut socket = match self.driver.open_socket() {
            Ok(socket) => socket,
            Err(err) => {
                self.state = State::Idle;
                self.push_event(Event::Error(ConnError::ConnectFailed(err)));
                return;
            }
        };

        if let Err(err) = socket.set_nonblocking(true) {
            socket.close();
            self.state = State::Idle;
            self.push_event(Event::Error(ConnError::ConnectFailed(err)));
            return;
        }

        match socket.connect(target) {
            // Established or still pending: either way, wait for write
            // readiness to report the outcome.
            Ok(_) => {
                let id = socket.id();
                self.socket = Some(socket);
                self.state = State::Connecting;
                self.bridge.bind(
                    self.driver.notifier(),
                    id,
                    Interest {
                        read: true,
                        write: true,
                    },
                );
                debug!(addr = %target, "connection attempt started");
            }

            Err(err) => {
                socket.close();
                self.state = State::Idle;
                debug!(addr = %target, error = %err, "connection attempt rejected");
                self.push_event(Event::Error(ConnError::ConnectFailed(err)));
            }
        }
    }

    /// Collects the outcome of an in-flight handshake after write
    /// readiness fired.
    fn finish_connect(&mut self) {
        let Some(addr) = self.addr else {
            return;
        };
        let target = SocketAddr::new(addr, self.port);

        let outcome = match self.socket.as_mut() {
            Some(socket) => socket.connect(target),
            None => return,
        };

        match outcome {
            Ok(ConnectStatus::Established) => {
                self.state = State::Connected;
                debug!(addr = %target, "connection established");
                self.push_event(Event::Connected);

                // Drain anything queued while the handshake was in flight.
                self.flush();
            }

            Ok(ConnectStatus::Pending) => {}

            Err(err) => {
                debug!(addr = %target, error = %err, "connection attempt failed");
                self.teardown_socket();
                self.state = State::Idle;
                self.push_event(Event::Error(ConnError::ConnectFailed(err)));
            }
        }
    }

    /// Pulls available bytes off the socket into the read queue.
    fn ingest(&mut self) {
        let available = match self.socket.as_ref() {
            Some(socket) => socket.bytes_available(),
            None => return,
        };

        if available == 0 {
            // The very first readiness event after connect may report an
            // empty socket without the peer having closed; skip exactly
            // that one. Any later empty read is the peer going away.
            if self.seen_read_ready {
                self.handle_peer_close();
            } else {
                self.seen_read_ready = true;
            }
            return;
        }

        self.seen_read_ready = true;

        let mut chunk = vec![0u8; available];
        let n = match self.socket.as_mut() {
            Some(socket) => match socket.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return,
                Err(err) => {
                    self.fail_live_socket(ConnError::Socket(err));
                    return;
                }
            },
            None => return,
        };

        if n == 0 {
            self.handle_peer_close();
            return;
        }

        // Short reads are expected; keep only what actually arrived.
        chunk.truncate(n);
        trace!(bytes = n, "ingested inbound chunk");
        self.read_queue.push_chunk(chunk);

        if self.mode == Mode::Line {
            self.rescan_newline();
        }

        self.arm_idle_timer();
        self.push_event(Event::ReadyRead);
    }

    /// Peer-initiated close: buffered input stays readable, everything
    /// outbound is abandoned.
    fn handle_peer_close(&mut self) {
        debug!("peer closed the connection");
        self.teardown_socket();
        self.write_queue.clear();
        self.state = State::Idle;
        self.push_event(Event::Closed);
    }

    /// Hard socket failure while live: degrade to idle and report it.
    pub(crate) fn fail_live_socket(&mut self, error: ConnError) {
        self.teardown_socket();
        self.write_queue.clear();
        self.state = State::Idle;
        self.push_event(Event::Error(error));
    }

    /// Unsubscribes and closes the current socket handle, if any.
    pub(crate) fn teardown_socket(&mut self) {
        self.bridge.unbind(self.driver.notifier());

        if let Some(mut socket) = self.socket.take() {
            socket.close();
        }
    }

    /// Refreshes the cached line flag from the buffered bytes.
    fn rescan_newline(&mut self) {
        self.has_newline = matches!(scan_line(&self.read_queue, None), ScanOutcome::Line(_));
    }

    /// Bookkeeping after bytes left the read queue.
    fn after_consume(&mut self) {
        if self.mode == Mode::Line {
            self.rescan_newline();
        }

        if self.read_queue.is_empty() {
            self.disarm_idle_timer();
        }
    }

    pub(crate) fn arm_idle_timer(&mut self) {
        self.bridge
            .arm_timer(self.driver.timer(), self.config.idle_interval);
    }

    pub(crate) fn disarm_idle_timer(&mut self) {
        self.bridge.disarm_timer(self.driver.timer());
    }

    pub(crate) fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }
}
