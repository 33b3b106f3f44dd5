//! Authorize

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CENTRAL_SYSTEM_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{IdToken, Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::{AuthorizationStatus, IdTagInfo};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizeRequest {
    envelope: RequestEnvelope,
    pub id_tag: IdToken,
}

impl AuthorizeRequest {
    pub fn new(context: impl Into<RequestContext>, id_tag: IdToken) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            id_tag,
        }
    }
}

impl Identifiable for AuthorizeRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for AuthorizeRequest {
    const ACTION: &'static str = "Authorize";
    const XML_NAME: &'static str = "authorizeRequest";
    const XML_NAMESPACE: &'static str = CENTRAL_SYSTEM_NAMESPACE;

    type Response = AuthorizeResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            id_tag: object.mandatory("idTag")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("idTag", &self.id_tag).build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            id_tag: element.mandatory("idTag")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("idTag", &self.id_tag)
            .build()
    }
}

impl fmt::Display for AuthorizeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Authorize {}", self.id_tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizeResponse {
    envelope: ResponseEnvelope<AuthorizeRequest>,
    pub id_tag_info: IdTagInfo,
}

impl AuthorizeResponse {
    pub fn new(request: Arc<AuthorizeRequest>, id_tag_info: IdTagInfo) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            id_tag_info,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.id_tag_info.status == AuthorizationStatus::Accepted
    }
}

impl Correlatable for AuthorizeResponse {
    type Request = AuthorizeRequest;

    fn envelope(&self) -> &ResponseEnvelope<AuthorizeRequest> {
        &self.envelope
    }
}

impl Response for AuthorizeResponse {
    const XML_NAME: &'static str = "authorizeResponse";

    fn decode_json(object: &JsonObject<'_>, request: Arc<AuthorizeRequest>) -> ParseResult<Self> {
        let info = object.mandatory_object("idTagInfo")?;
        Ok(Self::new(request, IdTagInfo::decode_json(&info)?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .value("idTagInfo", self.id_tag_info.encode_json())
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, request: Arc<AuthorizeRequest>) -> ParseResult<Self> {
        let info = element.mandatory_child("idTagInfo")?;
        Ok(Self::new(request, IdTagInfo::decode_xml(&info)?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, AuthorizeRequest::XML_NAMESPACE)
            .child("idTagInfo", |b| self.id_tag_info.encode_xml(b))
            .build()
    }

    fn failed_with(request: Arc<AuthorizeRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            id_tag_info: IdTagInfo::new(AuthorizationStatus::Invalid),
        }
    }
}

impl fmt::Display for AuthorizeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Authorize {}: {} ({})",
            self.request().id_tag,
            self.id_tag_info.status,
            self.outcome()
        )
    }
}
