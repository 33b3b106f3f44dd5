//! UnlockConnector

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
use crate::messages::types::UnlockStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnlockConnectorRequest {
    envelope: RequestEnvelope,
    pub connector_id: u32,
}

impl UnlockConnectorRequest {
    pub fn new(context: impl Into<RequestContext>, connector_id: u32) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            connector_id,
        }
    }
}

impl Identifiable for UnlockConnectorRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for UnlockConnectorRequest {
    const ACTION: &'static str = "UnlockConnector";
    const XML_NAME: &'static str = "unlockConnectorRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = UnlockConnectorResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            connector_id: object.mandatory("connectorId")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("connectorId", &self.connector_id)
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            connector_id: element.mandatory("connectorId")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("connectorId", &self.connector_id)
            .build()
    }
}

impl fmt::Display for UnlockConnectorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unlock connector {} of {}",
            self.connector_id,
            self.destination()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnlockConnectorResponse {
    envelope: ResponseEnvelope<UnlockConnectorRequest>,
    pub status: UnlockStatus,
}

impl UnlockConnectorResponse {
    pub fn new(request: Arc<UnlockConnectorRequest>, status: UnlockStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for UnlockConnectorResponse {
    type Request = UnlockConnectorRequest;

    fn envelope(&self) -> &ResponseEnvelope<UnlockConnectorRequest> {
        &self.envelope
    }
}

impl Response for UnlockConnectorResponse {
    const XML_NAME: &'static str = "unlockConnectorResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<UnlockConnectorRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<UnlockConnectorRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, UnlockConnectorRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<UnlockConnectorRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: UnlockStatus::Unknown,
        }
    }
}

impl fmt::Display for UnlockConnectorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnlockConnector {} ({})", self.status, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;
    use crate::messages::test_support::*;
    use serde_json::json;

    #[test]
    fn round_trips() {
        let request = UnlockConnectorRequest::new(context(), 1);
        assert_request_round_trip(&request);
        assert_response_round_trip(&UnlockConnectorResponse::new(
            Arc::new(request),
            UnlockStatus::UnlockFailed,
        ));
    }

    #[test]
    fn xml_connector_id_must_be_numeric() {
        let element = crate::codec::xml::parse_document(
            "<unlockConnectorRequest><connectorId>one</connectorId></unlockConnectorRequest>",
        )
        .unwrap();
        let err = UnlockConnectorRequest::try_parse_xml(&element, context(), None).unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { .. }));
    }

    #[test]
    fn fractional_connector_id_is_rejected() {
        let err =
            UnlockConnectorRequest::try_parse_json(&json!({"connectorId": 1.5}), context(), None)
                .unwrap_err();
        assert_eq!(err.field(), Some("connectorId"));
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        assert_request_requires::<UnlockConnectorRequest>(&json!({"connectorId": 2}), &["connectorId"]);
        assert_response_requires::<UnlockConnectorResponse>(
            &json!({"status": "Unlocked"}),
            Arc::new(UnlockConnectorRequest::new(context(), 2)),
            &["status"],
        );
    }

    #[test]
    fn failed_defaults_to_unknown() {
        let request = Arc::new(UnlockConnectorRequest::new(context(), 1));
        let response = UnlockConnectorResponse::failed(Arc::clone(&request));
        assert_eq!(response.status, UnlockStatus::Unknown);
        assert_server_fault(&response, &request);
    }
}
