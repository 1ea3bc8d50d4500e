use std::io;
use std::net::SocketAddr;

/// Identifier for a raw socket handle.
///
/// The notifier keys readiness subscriptions by this value, so it must be
/// stable for the lifetime of the handle and unique among live handles.
pub type SocketId = usize;

/// Outcome of a non-blocking connect attempt that did not fail outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectStatus {
    /// The connection is established and the socket is usable.
    Established,

    /// The handshake is still in flight; the socket becomes writable
    /// once it completes.
    Pending,
}

/// A raw byte-stream socket primitive.
///
/// Implementations wrap whatever the platform provides (a file descriptor,
/// a simulated peer, ...). All operations must be non-blocking once
/// [`set_nonblocking`](Self::set_nonblocking) has been enabled: a read or
/// write that cannot make progress returns [`io::ErrorKind::WouldBlock`]
/// instead of waiting.
pub trait RawSocket {
    /// Returns the identifier used to key readiness subscriptions.
    fn id(&self) -> SocketId;

    /// Switches the handle between blocking and non-blocking mode.
    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()>;

    /// Initiates or re-checks a connection to `addr`.
    ///
    /// Calling this again on a handle with a handshake in flight reports
    /// the current outcome: [`ConnectStatus::Established`] once the
    /// handshake succeeded, an error if it failed. This mirrors the usual
    /// non-blocking connect protocol, where write readiness signals
    /// completion and the connect call is re-issued to learn the result.
    fn connect(&mut self, addr: SocketAddr) -> io::Result<ConnectStatus>;

    /// Reads into `buffer`, returning the number of bytes transferred.
    ///
    /// Short reads are expected; a return of `Ok(0)` on a live connection
    /// means the peer closed its end.
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Writes from `buffer`, returning the number of bytes accepted.
    ///
    /// Short writes are expected and are not errors.
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize>;

    /// Returns the number of bytes currently readable without blocking.
    fn bytes_available(&self) -> usize;

    /// Closes the handle. Further operations on it are invalid.
    fn close(&mut self);
}
