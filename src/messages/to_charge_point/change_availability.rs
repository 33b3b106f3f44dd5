//! ChangeAvailability

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CHARGE_POINT_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::{AvailabilityStatus, AvailabilityType};

/// Connector `0` addresses the whole charge point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeAvailabilityRequest {
    envelope: RequestEnvelope,
    pub connector_id: u32,
    pub kind: AvailabilityType,
}

impl ChangeAvailabilityRequest {
    pub fn new(context: impl Into<RequestContext>, connector_id: u32, kind: AvailabilityType) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            connector_id,
            kind,
        }
    }
}

impl Identifiable for ChangeAvailabilityRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for ChangeAvailabilityRequest {
    const ACTION: &'static str = "ChangeAvailability";
    const XML_NAME: &'static str = "changeAvailabilityRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = ChangeAvailabilityResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            connector_id: object.mandatory("connectorId")?,
            kind: object.mandatory("type")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("connectorId", &self.connector_id)
            .field("type", &self.kind)
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            connector_id: element.mandatory("connectorId")?,
            kind: element.mandatory("type")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("connectorId", &self.connector_id)
            .field("type", &self.kind)
            .build()
    }
}

impl fmt::Display for ChangeAvailabilityRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Set connector {} of {} {}",
            self.connector_id,
            self.destination(),
            self.kind
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeAvailabilityResponse {
    envelope: ResponseEnvelope<ChangeAvailabilityRequest>,
    pub status: AvailabilityStatus,
}

impl ChangeAvailabilityResponse {
    pub fn new(request: Arc<ChangeAvailabilityRequest>, status: AvailabilityStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for ChangeAvailabilityResponse {
    type Request = ChangeAvailabilityRequest;

    fn envelope(&self) -> &ResponseEnvelope<ChangeAvailabilityRequest> {
        &self.envelope
    }
}

impl Response for ChangeAvailabilityResponse {
    const XML_NAME: &'static str = "changeAvailabilityResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<ChangeAvailabilityRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<ChangeAvailabilityRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, ChangeAvailabilityRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<ChangeAvailabilityRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: AvailabilityStatus::Unknown,
        }
    }
}

impl fmt::Display for ChangeAvailabilityResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeAvailability {} ({})", self.status, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;
    use crate::messages::test_support::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request() -> ChangeAvailabilityRequest {
        ChangeAvailabilityRequest::new(context(), 2, AvailabilityType::Inoperative)
    }

    #[test]
    fn round_trips() {
        assert_request_round_trip(&request());
        assert_response_round_trip(&ChangeAvailabilityResponse::new(
            Arc::new(request()),
            AvailabilityStatus::Scheduled,
        ));
    }

    #[test]
    fn json_shape() {
        assert_eq!(
            request().to_json(None),
            json!({"connectorId": 2, "type": "Inoperative"})
        );
    }

    #[test]
    fn connector_id_must_be_unsigned() {
        let err = ChangeAvailabilityRequest::try_parse_json(
            &json!({"connectorId": -1, "type": "Operative"}),
            context(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { .. }));
        assert_eq!(err.field(), Some("connectorId"));
    }

    #[test]
    fn failed_defaults_to_unknown() {
        let response = ChangeAvailabilityResponse::failed(Arc::new(request()));
        assert_eq!(response.status, AvailabilityStatus::Unknown);
        assert!(!response.outcome().is_ok());
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        assert_request_requires::<ChangeAvailabilityRequest>(
            &json!({"connectorId": 1, "type": "Operative"}),
            &["connectorId", "type"],
        );
        assert_response_requires::<ChangeAvailabilityResponse>(
            &json!({"status": "Scheduled"}),
            Arc::new(request()),
            &["status"],
        );
    }
}
