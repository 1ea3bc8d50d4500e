use crate::error::ConnError;

/// A notification queued by a connection and drained by the host with
/// [`poll_event`](crate::Connection::poll_event).
///
/// Events are delivered in the order they were produced. The queue
/// replaces direct callbacks so that no application code runs re-entrantly
/// inside a readiness handler.
#[derive(Debug)]
pub enum Event {
    /// The hostname lookup produced a usable address.
    HostFound,

    /// The connection is established; reads and writes are live.
    Connected,

    /// The peer closed the connection. Input buffered before the close
    /// remains readable.
    Closed,

    /// A close deferred by pending writes has finished draining and the
    /// connection is back to idle.
    DelayedCloseFinished,

    /// Unread input is buffered. Re-emitted at most once per idle-timer
    /// period while the data sits unconsumed.
    ReadyRead,

    /// The raw socket accepted this many outbound bytes.
    BytesWritten(usize),

    /// The connection failed and degraded to idle.
    Error(ConnError),
}
