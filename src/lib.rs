//! # Sockline
//!
//! **Sockline** is a buffered, non-blocking connection core: it sits between
//! application code and a raw byte-stream socket and hides partial reads and
//! writes behind in-memory queues, so callers always see whole, ordered byte
//! ranges.
//!
//! The crate performs no I/O of its own. Name resolution, socket syscalls,
//! readiness notification and timers are consumed through the [`driver`]
//! seams; the host event loop injects a [`Driver`] into each connection and
//! feeds readiness back through the `on_*` entry points. Nothing ever
//! blocks, and nothing suspends — "waiting" is simply remaining in a
//! non-terminal [`State`] until a callback advances it.
//!
//! Sockline offers:
//!
//! - A **callback-driven lifecycle** (resolving → connecting → connected →
//!   closing) with the classic non-blocking connect protocol, where write
//!   readiness doubles as connect-completion detection
//! - **Chunked write buffering** with small-write merging and packet-sized
//!   coalescing on transmit
//! - **Chunked read buffering** with an idle-data timer re-announcing input
//!   that sits unconsumed
//! - A **line-oriented read mode** layered on the binary byte stream
//! - **Graceful delayed close** that keeps the connection up just long
//!   enough to drain already-queued writes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sockline::{Connection, Event};
//!
//! let mut connection = Connection::new(driver);
//! connection.connect_to_host("example.org", 80);
//!
//! // ... the host loop calls on_resolver_update / on_read_ready /
//! // on_write_ready / on_timer_tick as its readiness sources fire ...
//!
//! while let Some(event) = connection.poll_event() {
//!     match event {
//!         Event::Connected => {
//!             connection.write(b"GET / HTTP/1.0\r\n\r\n");
//!         }
//!         Event::ReadyRead => {
//!             let bytes = connection.read(4096);
//!             // ...
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`driver`] — the collaborator seams a host event loop implements

mod buffer;
mod conn;
mod error;

pub mod driver;

pub use conn::{Connection, ConnectionBuilder, Event, Mode, State};
pub use driver::Driver;
pub use error::ConnError;
