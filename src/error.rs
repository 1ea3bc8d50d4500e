use std::io;

use thiserror::Error;

/// Failures a connection reports through
/// [`Event::Error`](crate::Event::Error).
///
/// None of these is fatal to the process: every failure degrades the
/// connection to idle, and the caller may immediately retry.
#[derive(Debug, Error)]
pub enum ConnError {
    /// The hostname lookup finished without a usable address.
    #[error("host name lookup produced no usable address")]
    ResolveFailed,

    /// The raw primitive rejected the connection handshake.
    #[error("connection attempt failed: {0}")]
    ConnectFailed(io::Error),

    /// The raw socket reported a hard error while the connection was live.
    #[error("socket error: {0}")]
    Socket(io::Error),
}
