use std::time::Duration;

/// A single recurring timer per connection.
///
/// While armed, the host event loop calls
/// [`Connection::on_timer_tick`](crate::Connection::on_timer_tick) once per
/// interval. The connection uses it to re-announce buffered input to
/// consumers that only react to edge-triggered readiness.
pub trait TimerService {
    /// Arms the timer to fire every `interval`. Re-arming replaces the
    /// previous interval.
    fn arm(&mut self, interval: Duration);

    /// Stops the timer. Disarming an idle timer is a no-op.
    fn disarm(&mut self);
}
