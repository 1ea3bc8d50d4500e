//! Collaborator seams between a connection and its host event loop.
//!
//! A connection never performs name resolution, socket syscalls or event
//! registration itself. Those concerns belong to the host, which hands the
//! connection a [`Driver`] — an explicit event-loop handle bundling:
//! - a [`Resolver`] for asynchronous hostname lookups,
//! - a factory for non-blocking [`RawSocket`] handles,
//! - a [`Notifier`] for per-socket readiness subscriptions,
//! - a [`TimerService`] for the recurring idle-data timer.
//!
//! The host delivers progress back by calling the `on_*` entry points on
//! [`Connection`](crate::Connection) whenever the resolver advances, the
//! socket becomes readable or writable, or the timer fires.

mod notify;
mod resolver;
mod socket;
mod timer;

pub use notify::{Interest, Notifier};
pub use resolver::{ResolveStatus, Resolver};
pub use socket::{ConnectStatus, RawSocket, SocketId};
pub use timer::TimerService;

use std::io;

/// The event-loop handle injected into each connection.
///
/// `Driver` bundles the four collaborator services a connection consumes.
/// There is exactly one driver per connection; nothing in this crate keeps
/// process-wide state.
pub trait Driver {
    /// Raw socket handles produced by [`open_socket`](Self::open_socket).
    type Socket: RawSocket;

    /// The hostname resolver service.
    type Resolver: Resolver;

    /// The readiness subscription service.
    type Notifier: Notifier;

    /// The recurring timer service.
    type Timer: TimerService;

    /// Creates a fresh, unconnected raw socket.
    ///
    /// The connection sets the handle non-blocking before issuing a
    /// connect on it.
    fn open_socket(&mut self) -> io::Result<Self::Socket>;

    /// Returns the resolver service.
    fn resolver(&mut self) -> &mut Self::Resolver;

    /// Returns the readiness notifier.
    fn notifier(&mut self) -> &mut Self::Notifier;

    /// Returns the timer service.
    fn timer(&mut self) -> &mut Self::Timer;
}
