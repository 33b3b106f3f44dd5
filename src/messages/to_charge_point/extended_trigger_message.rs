//! ExtendedTriggerMessage (security extension)

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
use crate::messages::types::{MessageTriggerExtended, TriggerMessageStatus};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtendedTriggerMessageRequest {
    envelope: RequestEnvelope,
    pub requested_message: MessageTriggerExtended,
    pub connector_id: Option<u32>,
}

impl ExtendedTriggerMessageRequest {
    pub fn new(
        context: impl Into<RequestContext>,
        requested_message: MessageTriggerExtended,
        connector_id: Option<u32>,
    ) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            requested_message,
            connector_id,
        }
    }
}

impl Identifiable for ExtendedTriggerMessageRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for ExtendedTriggerMessageRequest {
    const ACTION: &'static str = "ExtendedTriggerMessage";
    const XML_NAME: &'static str = "extendedTriggerMessageRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = ExtendedTriggerMessageResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            requested_message: object.mandatory("requestedMessage")?,
            connector_id: object.optional("connectorId")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("requestedMessage", &self.requested_message)
            .optional("connectorId", self.connector_id.as_ref())
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            requested_message: element.mandatory("requestedMessage")?,
            connector_id: element.optional("connectorId")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("requestedMessage", &self.requested_message)
            .optional("connectorId", self.connector_id.as_ref())
            .build()
    }
}

impl fmt::Display for ExtendedTriggerMessageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trigger {} on {}", self.requested_message, self.destination())?;
        if let Some(connector_id) = self.connector_id {
            write!(f, " connector {}", connector_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtendedTriggerMessageResponse {
    envelope: ResponseEnvelope<ExtendedTriggerMessageRequest>,
    pub status: TriggerMessageStatus,
}

impl ExtendedTriggerMessageResponse {
    pub fn new(request: Arc<ExtendedTriggerMessageRequest>, status: TriggerMessageStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for ExtendedTriggerMessageResponse {
    type Request = ExtendedTriggerMessageRequest;

    fn envelope(&self) -> &ResponseEnvelope<ExtendedTriggerMessageRequest> {
        &self.envelope
    }
}

impl Response for ExtendedTriggerMessageResponse {
    const XML_NAME: &'static str = "extendedTriggerMessageResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<ExtendedTriggerMessageRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<ExtendedTriggerMessageRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, ExtendedTriggerMessageRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<ExtendedTriggerMessageRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: TriggerMessageStatus::Unknown,
        }
    }
}

impl fmt::Display for ExtendedTriggerMessageResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtendedTriggerMessage {} ({})", self.status, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::test_support::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn round_trips() {
        let request = ExtendedTriggerMessageRequest::new(
            context(),
            MessageTriggerExtended::SignChargePointCertificate,
            None,
        );
        assert_request_round_trip(&request);
        assert_response_round_trip(&ExtendedTriggerMessageResponse::new(
            Arc::new(request),
            TriggerMessageStatus::Accepted,
        ));
    }

    #[test]
    fn accepts_security_triggers() {
        let request = ExtendedTriggerMessageRequest::try_parse_json(
            &json!({"requestedMessage": "LogStatusNotification", "connectorId": 0}),
            context(),
            None,
        )
        .unwrap();
        assert_eq!(
            request.requested_message,
            MessageTriggerExtended::LogStatusNotification
        );
        assert_eq!(request.connector_id, Some(0));
    }

    #[test]
    fn xml_uses_charge_point_namespace() {
        let request =
            ExtendedTriggerMessageRequest::new(context(), MessageTriggerExtended::Heartbeat, None);
        let element = request.to_xml(None);
        assert_eq!(element.name, "extendedTriggerMessageRequest");
        assert_eq!(element.namespace.as_deref(), Some(CHARGE_POINT_NAMESPACE));
    }

    #[test]
    fn failed_defaults_to_unknown() {
        let request =
            ExtendedTriggerMessageRequest::new(context(), MessageTriggerExtended::Heartbeat, None);
        let response = ExtendedTriggerMessageResponse::failed(Arc::new(request));
        assert_eq!(response.status, TriggerMessageStatus::Unknown);
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        assert_request_requires::<ExtendedTriggerMessageRequest>(
            &json!({"requestedMessage": "SignChargePointCertificate", "connectorId": 1}),
            &["requestedMessage"],
        );
        assert_response_requires::<ExtendedTriggerMessageResponse>(
            &json!({"status": "Accepted"}),
            Arc::new(ExtendedTriggerMessageRequest::new(
                context(),
                MessageTriggerExtended::Heartbeat,
                None,
            )),
            &["status"],
        );
    }
}
