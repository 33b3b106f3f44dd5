//! Reset

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
use crate::messages::types::{ResetStatus, ResetType};

/// Asks a charge point to reboot, either gracefully or immediately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetRequest {
    envelope: RequestEnvelope,
    pub kind: ResetType,
}

impl ResetRequest {
    pub fn new(context: impl Into<RequestContext>, kind: ResetType) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            kind,
        }
    }
}

impl Identifiable for ResetRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for ResetRequest {
    const ACTION: &'static str = "Reset";
    const XML_NAME: &'static str = "resetRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = ResetResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            kind: object.mandatory("type")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("type", &self.kind).build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            kind: element.mandatory("type")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("type", &self.kind)
            .build()
    }
}

impl fmt::Display for ResetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reset of {}", self.kind, self.destination())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetResponse {
    envelope: ResponseEnvelope<ResetRequest>,
    pub status: ResetStatus,
}

impl ResetResponse {
    pub fn new(request: Arc<ResetRequest>, status: ResetStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for ResetResponse {
    type Request = ResetRequest;

    fn envelope(&self) -> &ResponseEnvelope<ResetRequest> {
        &self.envelope
    }
}

impl Response for ResetResponse {
    const XML_NAME: &'static str = "resetResponse";

    fn decode_json(object: &JsonObject<'_>, request: Arc<ResetRequest>) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(element: &XmlElement<'_>, request: Arc<ResetRequest>) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, ResetRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<ResetRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: ResetStatus::Unknown,
        }
    }
}

impl fmt::Display for ResetResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reset {} ({})", self.status, self.outcome())
    }
}
