/// Lifecycle states of a [`Connection`](crate::Connection).
///
/// A connection is created `Idle` and advances `ResolvingHost` →
/// `Connecting` → `Connected`. Every failure degrades back to `Idle`;
/// a close with pending writes passes through `Closing` first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No connection exists. The only state a new attempt may start from.
    Idle,

    /// A hostname lookup is in flight.
    ResolvingHost,

    /// A non-blocking connect has been issued; write readiness will
    /// report its outcome.
    Connecting,

    /// The connection is established and transferring data.
    Connected,

    /// A close was requested while writes were still pending; the
    /// connection stays up until the write queue drains.
    Closing,
}

/// Read modes layered on the byte stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Raw byte reads via [`read`](crate::Connection::read).
    #[default]
    Binary,

    /// Line-oriented reads via [`read_line`](crate::Connection::read_line),
    /// layered on the same buffered bytes.
    Line,
}

/// What a write-readiness event means in the current state.
///
/// The same readiness callback serves two purposes in the non-blocking
/// connect protocol; this tag makes the dispatch explicit instead of
/// flag checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WriteReadiness {
    /// The handshake outcome is ready to be collected.
    AwaitingConnect,

    /// Pending writes may be transmitted.
    Flushing,

    /// The event carries no meaning and is dropped.
    Ignored,
}

impl State {
    /// Classifies a write-readiness event arriving in this state.
    pub(crate) fn write_readiness(self) -> WriteReadiness {
        match self {
            State::Connecting => WriteReadiness::AwaitingConnect,
            State::Connected | State::Closing => WriteReadiness::Flushing,
            State::Idle | State::ResolvingHost => WriteReadiness::Ignored,
        }
    }
}
