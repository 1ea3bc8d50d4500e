use super::core::Connection;
use crate::driver::Driver;

use std::time::Duration;

/// Bytes below which consecutive small writes merge into the tail chunk.
const DEFAULT_SMALL_WRITE_THRESHOLD: usize = 128;

/// Bytes below which pending chunks coalesce into one transmission,
/// approximating a single network packet.
const DEFAULT_COALESCE_THRESHOLD: usize = 1480;

/// How often buffered-but-unread input is re-announced.
const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(1);

/// Resolved configuration carried by a connection.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Config {
    pub(crate) small_write_threshold: usize,
    pub(crate) coalesce_threshold: usize,
    pub(crate) idle_interval: Duration,
}

/// Builder for configuring and creating a [`Connection`].
///
/// `ConnectionBuilder` allows customizing the buffering thresholds and
/// the idle-data interval before constructing the connection.
///
/// # Examples
///
/// ```rust,ignore
/// let connection = ConnectionBuilder::new()
///     .coalesce_threshold(512)
///     .build(driver);
/// ```
pub struct ConnectionBuilder {
    config: Config,
}

impl ConnectionBuilder {
    /// Creates a new `ConnectionBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config {
                small_write_threshold: DEFAULT_SMALL_WRITE_THRESHOLD,
                coalesce_threshold: DEFAULT_COALESCE_THRESHOLD,
                idle_interval: DEFAULT_IDLE_INTERVAL,
            },
        }
    }

    /// Sets the threshold under which small writes merge into the tail
    /// chunk instead of allocating a new one.
    ///
    /// # Panics
    ///
    /// Panics if `bytes == 0`.
    pub fn small_write_threshold(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "small_write_threshold must be > 0");

        self.config.small_write_threshold = bytes;
        self
    }

    /// Sets the threshold under which pending chunks coalesce into one
    /// staged transmission.
    ///
    /// # Panics
    ///
    /// Panics if `bytes == 0`.
    pub fn coalesce_threshold(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "coalesce_threshold must be > 0");

        self.config.coalesce_threshold = bytes;
        self
    }

    /// Sets how often buffered-but-unread input is re-announced through
    /// [`Event::ReadyRead`](crate::Event::ReadyRead).
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn idle_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "idle_interval must be > 0");

        self.config.idle_interval = interval;
        self
    }

    /// Builds a connection driven by `driver` with the configured options.
    pub fn build<D: Driver>(self, driver: D) -> Connection<D> {
        Connection::with_config(driver, self.config)
    }
}

impl Default for ConnectionBuilder {
    /// Creates a default `ConnectionBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
