//! Request envelope
//!
//! Cross-cutting fields every request carries besides its action fields.
//! Concrete requests hold a [`RequestEnvelope`] and expose it through
//! [`Identifiable`](super::Identifiable).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{EventTrackingId, NetworkingNodeId, RequestId};
use crate::support::CancellationHandle;

/// Caller-supplied envelope values. Everything except the destination is
/// optional and gets a default when the envelope is built.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub destination: NetworkingNodeId,
    pub request_id: Option<RequestId>,
    pub request_timestamp: Option<DateTime<Utc>>,
    pub request_timeout: Option<Duration>,
    pub event_tracking_id: Option<EventTrackingId>,
    pub cancellation: Option<CancellationHandle>,
}

impl RequestContext {
    pub fn new(destination: NetworkingNodeId) -> Self {
        Self {
            destination,
            request_id: None,
            request_timestamp: None,
            request_timeout: None,
            event_tracking_id: None,
            cancellation: None,
        }
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.request_timestamp = Some(timestamp);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_event_tracking_id(mut self, event_tracking_id: EventTrackingId) -> Self {
        self.event_tracking_id = Some(event_tracking_id);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationHandle) -> Self {
        self.cancellation = Some(cancellation);
        self
    }
}

impl From<NetworkingNodeId> for RequestContext {
    fn from(destination: NetworkingNodeId) -> Self {
        Self::new(destination)
    }
}

/// Identity and metadata of one request.
///
/// Equality and hashing cover every field except the cancellation handle,
/// which is a control channel rather than part of the value.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    destination: NetworkingNodeId,
    action: &'static str,
    request_id: RequestId,
    request_timestamp: DateTime<Utc>,
    request_timeout: Option<Duration>,
    event_tracking_id: Option<EventTrackingId>,
    cancellation: Option<CancellationHandle>,
}

impl RequestEnvelope {
    /// Build the envelope, generating a request id and taking the current
    /// time when the context doesn't provide them.
    pub fn new(action: &'static str, context: RequestContext) -> Self {
        Self {
            destination: context.destination,
            action,
            request_id: context.request_id.unwrap_or_else(RequestId::generate),
            request_timestamp: context.request_timestamp.unwrap_or_else(Utc::now),
            request_timeout: context.request_timeout,
            event_tracking_id: context.event_tracking_id,
            cancellation: context.cancellation,
        }
    }

    pub fn destination(&self) -> &NetworkingNodeId {
        &self.destination
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn request_timestamp(&self) -> DateTime<Utc> {
        self.request_timestamp
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn event_tracking_id(&self) -> Option<&EventTrackingId> {
        self.event_tracking_id.as_ref()
    }

    pub fn cancellation(&self) -> Option<&CancellationHandle> {
        self.cancellation.as_ref()
    }

    /// Context that rebuilds an equal envelope, e.g. for decoding the same
    /// message again or re-sending it.
    pub fn to_context(&self) -> RequestContext {
        RequestContext {
            destination: self.destination.clone(),
            request_id: Some(self.request_id.clone()),
            request_timestamp: Some(self.request_timestamp),
            request_timeout: self.request_timeout,
            event_tracking_id: self.event_tracking_id.clone(),
            cancellation: self.cancellation.clone(),
        }
    }
}

impl PartialEq for RequestEnvelope {
    fn eq(&self, other: &Self) -> bool {
        self.destination == other.destination
            && self.action == other.action
            && self.request_id == other.request_id
            && self.request_timestamp == other.request_timestamp
            && self.request_timeout == other.request_timeout
            && self.event_tracking_id == other.event_tracking_id
    }
}

impl Eq for RequestEnvelope {}

impl Hash for RequestEnvelope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.destination.hash(state);
        self.action.hash(state);
        self.request_id.hash(state);
        self.request_timestamp.hash(state);
        self.request_timeout.hash(state);
        self.event_tracking_id.hash(state);
    }
}

impl fmt::Display for RequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] to {}", self.action, self.request_id, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn node() -> NetworkingNodeId {
        NetworkingNodeId::parse("CP001").unwrap()
    }

    fn hash_of(envelope: &RequestEnvelope) -> u64 {
        let mut hasher = DefaultHasher::new();
        envelope.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn defaults_are_filled_in() {
        let before = Utc::now();
        let envelope = RequestEnvelope::new("Reset", node().into());
        assert_eq!(envelope.action(), "Reset");
        assert_eq!(envelope.request_id().as_str().len(), 36);
        assert!(envelope.request_timestamp() >= before);
        assert_eq!(envelope.request_timeout(), None);
        assert!(envelope.cancellation().is_none());
    }

    #[test]
    fn fresh_envelopes_get_distinct_ids() {
        let a = RequestEnvelope::new("Reset", node().into());
        let b = RequestEnvelope::new("Reset", node().into());
        assert_ne!(a.request_id(), b.request_id());
        assert_ne!(a, b);
    }

    #[test]
    fn cancellation_is_not_part_of_equality() {
        let a = RequestEnvelope::new("Reset", node().into());
        let b = RequestEnvelope::new(
            "Reset",
            a.to_context().with_cancellation(CancellationHandle::new()),
        );
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn every_value_field_matters() {
        let a = RequestEnvelope::new("Reset", node().into());
        let other_timeout =
            RequestEnvelope::new("Reset", a.to_context().with_timeout(Duration::from_secs(5)));
        let other_tracking = RequestEnvelope::new(
            "Reset",
            a.to_context()
                .with_event_tracking_id(EventTrackingId::parse("trace-1").unwrap()),
        );
        let other_action = RequestEnvelope::new("ClearCache", a.to_context());
        assert_ne!(a, other_timeout);
        assert_ne!(a, other_tracking);
        assert_ne!(a, other_action);
    }

    #[test]
    fn display_names_action_and_destination() {
        let envelope = RequestEnvelope::new(
            "Reset",
            RequestContext::new(node()).with_request_id(RequestId::parse("42").unwrap()),
        );
        assert_eq!(envelope.to_string(), "Reset [42] to CP001");
    }
}
