use crate::driver::{Interest, Notifier, SocketId, TimerService};

use std::time::Duration;

use tracing::trace;

/// Tracks readiness subscriptions and the idle-data timer for one
/// connection.
///
/// The bridge owns one read and one write subscription per live raw
/// socket handle. It must be rebound whenever the handle is replaced and
/// unbound before the handle is closed, so the host loop never fires on
/// an invalid handle.
pub(crate) struct NotificationBridge {
    /// The socket currently subscribed, if any.
    bound: Option<SocketId>,

    /// Whether the idle-data timer is currently armed.
    timer_armed: bool,
}

impl NotificationBridge {
    /// Creates a bridge with no subscriptions.
    pub(crate) fn new() -> Self {
        Self {
            bound: None,
            timer_armed: false,
        }
    }

    /// Subscribes a new socket handle, replacing any previous binding.
    pub(crate) fn bind<N: Notifier>(&mut self, notifier: &mut N, id: SocketId, interest: Interest) {
        if let Some(previous) = self.bound.take() {
            notifier.deregister(previous);
        }

        trace!(id, ?interest, "binding readiness subscriptions");
        notifier.register(id, interest);
        self.bound = Some(id);
    }

    /// Updates the interests of the bound socket. No-op when unbound.
    pub(crate) fn set_interest<N: Notifier>(&mut self, notifier: &mut N, interest: Interest) {
        if let Some(id) = self.bound {
            notifier.reregister(id, interest);
        }
    }

    /// Removes all subscriptions for the bound socket. No-op when unbound.
    pub(crate) fn unbind<N: Notifier>(&mut self, notifier: &mut N) {
        if let Some(id) = self.bound.take() {
            trace!(id, "removing readiness subscriptions");
            notifier.deregister(id);
        }
    }

    /// Arms the idle-data timer if it is not already running.
    pub(crate) fn arm_timer<T: TimerService>(&mut self, timer: &mut T, interval: Duration) {
        if !self.timer_armed {
            timer.arm(interval);
            self.timer_armed = true;
        }
    }

    /// Stops the idle-data timer if it is running.
    pub(crate) fn disarm_timer<T: TimerService>(&mut self, timer: &mut T) {
        if self.timer_armed {
            timer.disarm();
            self.timer_armed = false;
        }
    }
}
