use super::socket::SocketId;

/// Readiness interests for a registered socket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interest {
    /// Deliver read-readiness events.
    pub read: bool,

    /// Deliver write-readiness events.
    pub write: bool,
}

/// Per-socket, per-direction readiness subscriptions.
///
/// The host event loop implements this trait and, for every subscribed
/// socket, calls [`Connection::on_read_ready`](crate::Connection::on_read_ready)
/// and [`Connection::on_write_ready`](crate::Connection::on_write_ready)
/// when the corresponding readiness fires.
///
/// A socket must be registered before interests can be updated, and must
/// be deregistered before its handle is closed so the loop never fires on
/// an invalid handle.
pub trait Notifier {
    /// Subscribes a new socket with the given interests.
    fn register(&mut self, id: SocketId, interest: Interest);

    /// Updates the interests of an already registered socket.
    fn reregister(&mut self, id: SocketId, interest: Interest);

    /// Removes all subscriptions for a socket.
    fn deregister(&mut self, id: SocketId);
}
