use std::net::IpAddr;

/// Progress of an asynchronous hostname lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveStatus {
    /// The lookup is still running and has produced no address yet.
    Pending,

    /// At least one address is available. The lookup may still be
    /// running; the list only ever grows.
    Found(Vec<IpAddr>),

    /// The lookup finished without producing any usable address.
    Failed,
}

/// An asynchronous hostname resolver.
///
/// [`resolve`](Self::resolve) starts a lookup and returns immediately.
/// The host event loop calls
/// [`Connection::on_resolver_update`](crate::Connection::on_resolver_update)
/// whenever the lookup makes progress; the connection then samples
/// [`status`](Self::status). How names are actually resolved is entirely
/// the implementation's business.
pub trait Resolver {
    /// Starts (or restarts) a lookup for `host`, discarding any previous
    /// lookup state.
    fn resolve(&mut self, host: &str);

    /// Reports the current progress of the active lookup.
    fn status(&self) -> ResolveStatus;
}
