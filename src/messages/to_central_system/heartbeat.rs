//! Heartbeat

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CENTRAL_SYSTEM_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeartbeatRequest {
    envelope: RequestEnvelope,
}

impl HeartbeatRequest {
    pub fn new(context: impl Into<RequestContext>) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
        }
    }
}

impl Identifiable for HeartbeatRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for HeartbeatRequest {
    const ACTION: &'static str = "Heartbeat";
    const XML_NAME: &'static str = "heartbeatRequest";
    const XML_NAMESPACE: &'static str = CENTRAL_SYSTEM_NAMESPACE;

    type Response = HeartbeatResponse;

    fn decode_json(_object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self { envelope })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().build()
    }

    fn decode_xml(_element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self { envelope })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE).build()
    }
}

impl fmt::Display for HeartbeatRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Heartbeat [{}]", self.request_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeartbeatResponse {
    envelope: ResponseEnvelope<HeartbeatRequest>,
    pub current_time: DateTime<Utc>,
}

impl HeartbeatResponse {
    pub fn new(request: Arc<HeartbeatRequest>, current_time: DateTime<Utc>) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            current_time,
        }
    }
}

impl Correlatable for HeartbeatResponse {
    type Request = HeartbeatRequest;

    fn envelope(&self) -> &ResponseEnvelope<HeartbeatRequest> {
        &self.envelope
    }
}

impl Response for HeartbeatResponse {
    const XML_NAME: &'static str = "heartbeatResponse";

    fn decode_json(object: &JsonObject<'_>, request: Arc<HeartbeatRequest>) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("currentTime")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("currentTime", &self.current_time)
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, request: Arc<HeartbeatRequest>) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("currentTime")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, HeartbeatRequest::XML_NAMESPACE)
            .field("currentTime", &self.current_time)
            .build()
    }

    fn failed_with(request: Arc<HeartbeatRequest>, outcome: Outcome) -> Self {
        let current_time = request.request_timestamp();
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            current_time,
        }
    }
}

impl fmt::Display for HeartbeatResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Heartbeat at {} ({})", self.current_time, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;
    use crate::messages::test_support::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn round_trips_with_sub_second_time() {
        let request = HeartbeatRequest::new(context());
        assert_request_round_trip(&request);
        assert_response_round_trip(&HeartbeatResponse::new(
            Arc::new(request),
            timestamp() + Duration::milliseconds(250),
        ));
    }

    #[test]
    fn offset_times_are_normalized_to_utc() {
        let response = HeartbeatResponse::try_parse_json(
            &json!({"currentTime": "2024-03-01T14:00:00+02:00"}),
            Arc::new(HeartbeatRequest::new(context())),
            None,
        )
        .unwrap();
        assert_eq!(
            response.current_time,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn invalid_time_is_rejected() {
        let err = HeartbeatResponse::try_parse_json(
            &json!({"currentTime": "yesterday"}),
            Arc::new(HeartbeatRequest::new(context())),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { .. }));
    }

    #[test]
    fn failed_uses_request_timestamp() {
        let response = HeartbeatResponse::failed(Arc::new(HeartbeatRequest::new(context())));
        assert_eq!(response.current_time, timestamp());
        assert!(!response.outcome().is_ok());
    }

    #[test]
    fn current_time_is_mandatory() {
        let request = Arc::new(HeartbeatRequest::new(context()));
        assert_response_requires::<HeartbeatResponse>(
            &json!({"currentTime": "2024-03-01T12:00:00Z"}),
            Arc::clone(&request),
            &["currentTime"],
        );
        assert_server_fault(&HeartbeatResponse::failed(Arc::clone(&request)), &request);
    }
}
