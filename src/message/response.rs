//! Response envelope
//!
//! Every response keeps the request it answers and the [`Outcome`] of the
//! exchange. Concrete responses hold a [`ResponseEnvelope`] and expose it
//! through [`Correlatable`](super::Correlatable).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::domain::Outcome;

pub struct ResponseEnvelope<R> {
    request: Arc<R>,
    outcome: Outcome,
}

impl<R> ResponseEnvelope<R> {
    /// Envelope of a response decoded from a real reply.
    pub fn ok(request: Arc<R>) -> Self {
        Self {
            request,
            outcome: Outcome::Ok,
        }
    }

    pub fn with_outcome(request: Arc<R>, outcome: Outcome) -> Self {
        Self { request, outcome }
    }

    pub fn request(&self) -> &Arc<R> {
        &self.request
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

impl<R> Clone for ResponseEnvelope<R> {
    fn clone(&self) -> Self {
        Self {
            request: Arc::clone(&self.request),
            outcome: self.outcome.clone(),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for ResponseEnvelope<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseEnvelope")
            .field("request", &self.request)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Request is compared by value, not by pointer.
impl<R: PartialEq> PartialEq for ResponseEnvelope<R> {
    fn eq(&self, other: &Self) -> bool {
        self.outcome == other.outcome && *self.request == *other.request
    }
}

impl<R: Eq> Eq for ResponseEnvelope<R> {}

impl<R: Hash> Hash for ResponseEnvelope<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.request.hash(state);
        self.outcome.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fault, FaultKind};

    #[test]
    fn requests_compare_by_value() {
        let a = ResponseEnvelope::ok(Arc::new(5u32));
        let b = ResponseEnvelope::ok(Arc::new(5u32));
        assert_eq!(a, b);
        assert_ne!(a, ResponseEnvelope::ok(Arc::new(6u32)));
    }

    #[test]
    fn outcome_is_part_of_equality() {
        let request = Arc::new(1u32);
        let ok = ResponseEnvelope::ok(request.clone());
        let failed =
            ResponseEnvelope::with_outcome(request, Outcome::Fault(Fault::new(FaultKind::Timeout)));
        assert_ne!(ok, failed);
        assert!(ok.outcome().is_ok());
        assert_eq!(failed.outcome().fault().map(|f| f.kind), Some(FaultKind::Timeout));
    }

    #[test]
    fn clones_share_the_request() {
        let envelope = ResponseEnvelope::ok(Arc::new(String::from("request")));
        let clone = envelope.clone();
        assert!(Arc::ptr_eq(envelope.request(), clone.request()));
    }
}
