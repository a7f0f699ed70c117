//! Optional observation of intermediate signing values.

/// A value produced while preparing a signed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    /// The `Date` header value.
    Date(&'a str),
    /// The hex MD5 of the body.
    ContentMd5(&'a str),
    /// The exact string passed to the HMAC.
    CanonicalString(&'a str),
    /// The `Authorization` header value.
    Authorization(&'a str),
    /// The `Host` header value.
    Host(&'a str),
    /// The full request URL.
    Url(&'a str),
}

/// Hook receiving [`TraceEvent`]s. Implementations must not fail.
pub trait SigningTrace: Send + Sync {
    /// Observe one event.
    fn record(&self, event: TraceEvent<'_>);
}

impl<F> SigningTrace for F
where
    F: Fn(TraceEvent<'_>) + Send + Sync,
{
    fn record(&self, event: TraceEvent<'_>) {
        self(event)
    }
}

/// Forwards every event to `tracing` at TRACE level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl SigningTrace for TracingHook {
    fn record(&self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::Date(v) => tracing::trace!(date = %v, "signing"),
            TraceEvent::ContentMd5(v) => tracing::trace!(content_md5 = %v, "signing"),
            TraceEvent::CanonicalString(v) => tracing::trace!(canonical = ?v, "signing"),
            TraceEvent::Authorization(v) => tracing::trace!(authorization = %v, "signing"),
            TraceEvent::Host(v) => tracing::trace!(host = %v, "signing"),
            TraceEvent::Url(v) => tracing::trace!(url = %v, "signing"),
        }
    }
}
