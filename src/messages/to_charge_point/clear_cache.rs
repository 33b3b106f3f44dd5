//! ClearCache

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
use crate::messages::types::ClearCacheStatus;

/// Clears the authorization cache. Carries no fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClearCacheRequest {
    envelope: RequestEnvelope,
}

impl ClearCacheRequest {
    pub fn new(context: impl Into<RequestContext>) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
        }
    }
}

impl Identifiable for ClearCacheRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for ClearCacheRequest {
    const ACTION: &'static str = "ClearCache";
    const XML_NAME: &'static str = "clearCacheRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = ClearCacheResponse;

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

impl fmt::Display for ClearCacheRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clear cache of {}", self.destination())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClearCacheResponse {
    envelope: ResponseEnvelope<ClearCacheRequest>,
    pub status: ClearCacheStatus,
}

impl ClearCacheResponse {
    pub fn new(request: Arc<ClearCacheRequest>, status: ClearCacheStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for ClearCacheResponse {
    type Request = ClearCacheRequest;

    fn envelope(&self) -> &ResponseEnvelope<ClearCacheRequest> {
        &self.envelope
    }
}

impl Response for ClearCacheResponse {
    const XML_NAME: &'static str = "clearCacheResponse";

    fn decode_json(object: &JsonObject<'_>, request: Arc<ClearCacheRequest>) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(element: &XmlElement<'_>, request: Arc<ClearCacheRequest>) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, ClearCacheRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<ClearCacheRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: ClearCacheStatus::Unknown,
        }
    }
}

impl fmt::Display for ClearCacheResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClearCache {} ({})", self.status, self.outcome())
    }
}
