//! Flush engine: coalesced transmission of pending writes.
//!
//! A flush pass transmits at most once per write-readiness event. Small
//! head chunks are staged together with their successors into one buffer
//! approximating a network packet; large heads go out as they are. The
//! raw socket decides how much it accepts — short writes simply leave the
//! remainder queued for the next pass.

use super::core::Connection;
use super::event::Event;
use super::state::State;
use crate::driver::{Driver, Interest, RawSocket};
use crate::error::ConnError;

use std::io;

use tracing::{debug, trace};

impl<D: Driver> Connection<D> {
    /// Runs one transmission pass over the pending write queue.
    ///
    /// No-op unless the connection is connected or draining toward a
    /// close with bytes pending. When a deferred close drains to empty,
    /// this is where the connection finally goes down.
    pub(crate) fn flush(&mut self) {
        if !matches!(self.state, State::Connected | State::Closing) {
            return;
        }

        if self.write_queue.is_empty() {
            return;
        }

        let Some(socket) = self.socket.as_mut() else {
            return;
        };

        let threshold = self.config.coalesce_threshold;
        let head_len = self.write_queue.head_remainder().len();

        let attempted = if head_len < threshold {
            // Stage consecutive chunks into one buffer, stopping before
            // it would overflow the threshold.
            let mut staging = Vec::with_capacity(threshold);

            for span in self.write_queue.unconsumed() {
                if staging.len() + span.len() > threshold {
                    break;
                }
                staging.extend_from_slice(span);
            }

            trace!(staged = staging.len(), "transmitting coalesced chunks");
            socket.write(&staging)
        } else {
            trace!(bytes = head_len, "transmitting head chunk uncoalesced");
            socket.write(self.write_queue.head_remainder())
        };

        let accepted = match attempted {
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => 0,
            Err(err) => {
                self.fail_live_socket(ConnError::Socket(err));
                return;
            }
        };

        if accepted > 0 {
            self.write_queue.consume(accepted, None);
            self.push_event(Event::BytesWritten(accepted));
        }

        if self.state == State::Closing && self.write_queue.is_empty() {
            // The drain a deferred close was waiting for just finished.
            self.teardown_socket();
            self.state = State::Idle;
            debug!("delayed close finished");
            self.push_event(Event::DelayedCloseFinished);
            return;
        }

        // Write readiness stays subscribed exactly while bytes remain.
        self.bridge.set_interest(
            self.driver.notifier(),
            Interest {
                read: self.state == State::Connected,
                write: !self.write_queue.is_empty(),
            },
        );
    }
}
