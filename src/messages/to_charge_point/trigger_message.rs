//! TriggerMessage

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
use crate::messages::types::{MessageTrigger, TriggerMessageStatus};

/// Asks the charge point to send one of its own messages now.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerMessageRequest {
    envelope: RequestEnvelope,
    pub requested_message: MessageTrigger,
    /// Absent means the message concerns the whole charge point.
    pub connector_id: Option<u32>,
}

impl TriggerMessageRequest {
    pub fn new(
        context: impl Into<RequestContext>,
        requested_message: MessageTrigger,
        connector_id: Option<u32>,
    ) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            requested_message,
            connector_id,
        }
    }
}

impl Identifiable for TriggerMessageRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for TriggerMessageRequest {
    const ACTION: &'static str = "TriggerMessage";
    const XML_NAME: &'static str = "triggerMessageRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = TriggerMessageResponse;

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

impl fmt::Display for TriggerMessageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trigger {} on {}", self.requested_message, self.destination())?;
        if let Some(connector_id) = self.connector_id {
            write!(f, " connector {}", connector_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerMessageResponse {
    envelope: ResponseEnvelope<TriggerMessageRequest>,
    pub status: TriggerMessageStatus,
}

impl TriggerMessageResponse {
    pub fn new(request: Arc<TriggerMessageRequest>, status: TriggerMessageStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for TriggerMessageResponse {
    type Request = TriggerMessageRequest;

    fn envelope(&self) -> &ResponseEnvelope<TriggerMessageRequest> {
        &self.envelope
    }
}

impl Response for TriggerMessageResponse {
    const XML_NAME: &'static str = "triggerMessageResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<TriggerMessageRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<TriggerMessageRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, TriggerMessageRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<TriggerMessageRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: TriggerMessageStatus::Unknown,
        }
    }
}

impl fmt::Display for TriggerMessageResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TriggerMessage {} ({})", self.status, self.outcome())
    }
}
