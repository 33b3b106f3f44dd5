//! Request/response framework
//!
//! ## Architecture
//!
//! ```text
//!   wire document ──► try_parse_json / try_parse_xml ──► decode_* ──► parse hook ──► message
//!   message ──► to_json / to_xml ──► encode_* ──► serialize hook ──► wire document
//! ```
//!
//! - [`Request`]: concrete requests: a [`RequestEnvelope`] plus action fields.
//! - [`Response`]: concrete responses: a [`ResponseEnvelope`] (request
//!   back-reference + [`Outcome`]) plus action fields, with a success path
//!   (`decode_*` / constructors) and a failure path (`failed_with`, `failed`).
//! - [`Identifiable`] / [`Correlatable`]: accessors for the two envelopes.
//!
//! Concrete types only implement the `decode_*` / `encode_*` hooks. The
//! provided `try_parse_*` / `to_*` methods are the single place where custom
//! hooks run and where parse failures are logged.

pub mod request;
pub mod response;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use xmltree::Element;

use crate::codec::{JsonObject, JsonParseHook, JsonSerializeHook, ParseHook, SerializeHook};
use crate::codec::{XmlElement, XmlParseHook, XmlSerializeHook};
use crate::domain::{NetworkingNodeId, Outcome, ParseResult, RequestId};

pub use request::{RequestContext, RequestEnvelope};
pub use response::ResponseEnvelope;

/// Optional JSON payload field that overrides the request destination.
pub const NODE_ID_EXTENSION_FIELD: &str = "chargeBoxId";

/// Access to the envelope of a request.
pub trait Identifiable {
    fn envelope(&self) -> &RequestEnvelope;

    fn destination(&self) -> &NetworkingNodeId {
        self.envelope().destination()
    }

    fn action(&self) -> &'static str {
        self.envelope().action()
    }

    fn request_id(&self) -> &RequestId {
        self.envelope().request_id()
    }

    fn request_timestamp(&self) -> DateTime<Utc> {
        self.envelope().request_timestamp()
    }
}

/// Access to the request a response answers and the exchange outcome.
pub trait Correlatable {
    type Request: Request;

    fn envelope(&self) -> &ResponseEnvelope<Self::Request>;

    fn request(&self) -> &Arc<Self::Request> {
        self.envelope().request()
    }

    fn outcome(&self) -> &Outcome {
        self.envelope().outcome()
    }
}

fn finish_parse<M, D>(
    action: &'static str,
    format: &'static str,
    source: &D,
    decoded: ParseResult<M>,
    custom_parser: Option<&ParseHook<M, D>>,
) -> ParseResult<M> {
    let result = match (decoded, custom_parser) {
        (Ok(message), Some(hook)) => hook.apply(action, source, message),
        (decoded, _) => decoded,
    };
    if let Err(e) = &result {
        debug!(action, format, reason = %e, "Failed to parse message");
    }
    result
}

fn finish_serialize<M, D>(message: &M, built: D, custom_serializer: Option<&SerializeHook<M, D>>) -> D {
    match custom_serializer {
        Some(hook) => hook.apply(message, built),
        None => built,
    }
}

/// A request message of one protocol action.
pub trait Request:
    Identifiable + Clone + Eq + Hash + Debug + Display + Send + Sync + 'static
{
    /// Action name used for dispatch; not part of the JSON payload.
    const ACTION: &'static str;

    /// Local name of the XML body element.
    const XML_NAME: &'static str;

    /// XML namespace of this action's request and response elements.
    const XML_NAMESPACE: &'static str;

    type Response: Response<Request = Self>;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self>;

    fn encode_json(&self) -> Value;

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self>;

    fn encode_xml(&self) -> Element;

    /// Decode a JSON payload. The payload may carry a `chargeBoxId` that
    /// replaces the destination given in `context`.
    fn try_parse_json(
        json: &Value,
        context: RequestContext,
        custom_parser: Option<&JsonParseHook<Self>>,
    ) -> ParseResult<Self> {
        let decoded = JsonObject::root(json, Self::ACTION).and_then(|object| {
            let mut context = context;
            if let Some(node) = object.optional::<NetworkingNodeId>(NODE_ID_EXTENSION_FIELD)? {
                context.destination = node;
            }
            Self::decode_json(&object, RequestEnvelope::new(Self::ACTION, context))
        });
        finish_parse(Self::ACTION, "JSON", json, decoded, custom_parser)
    }

    fn try_parse_xml(
        xml: &Element,
        context: RequestContext,
        custom_parser: Option<&XmlParseHook<Self>>,
    ) -> ParseResult<Self> {
        let decoded = XmlElement::root(xml, Self::XML_NAME, Self::XML_NAMESPACE).and_then(|element| {
            Self::decode_xml(&element, RequestEnvelope::new(Self::ACTION, context))
        });
        finish_parse(Self::ACTION, "XML", xml, decoded, custom_parser)
    }

    /// Fail-fast variant of [`Request::try_parse_json`].
    ///
    /// # Panics
    ///
    /// Panics with the parse reason when the payload is invalid.
    fn parse_json(json: &Value, context: RequestContext) -> Self {
        Self::try_parse_json(json, context, None)
            .unwrap_or_else(|e| panic!("Invalid {} request: {}", Self::ACTION, e))
    }

    /// Fail-fast variant of [`Request::try_parse_xml`].
    ///
    /// # Panics
    ///
    /// Panics with the parse reason when the element is invalid.
    fn parse_xml(xml: &Element, context: RequestContext) -> Self {
        Self::try_parse_xml(xml, context, None)
            .unwrap_or_else(|e| panic!("Invalid {} request: {}", Self::ACTION, e))
    }

    fn to_json(&self, custom_serializer: Option<&JsonSerializeHook<Self>>) -> Value {
        finish_serialize(self, self.encode_json(), custom_serializer)
    }

    fn to_xml(&self, custom_serializer: Option<&XmlSerializeHook<Self>>) -> Element {
        finish_serialize(self, self.encode_xml(), custom_serializer)
    }
}

/// The response message of one protocol action.
pub trait Response:
    Correlatable + Clone + Eq + Hash + Debug + Display + Send + Sync + 'static
{
    /// Local name of the XML body element.
    const XML_NAME: &'static str;

    fn decode_json(object: &JsonObject<'_>, request: Arc<Self::Request>) -> ParseResult<Self>;

    fn encode_json(&self) -> Value;

    fn decode_xml(element: &XmlElement<'_>, request: Arc<Self::Request>) -> ParseResult<Self>;

    fn encode_xml(&self) -> Element;

    /// Response carrying `outcome` and the safe default of every action field.
    fn failed_with(request: Arc<Self::Request>, outcome: Outcome) -> Self;

    /// Response for an exchange that produced no usable reply.
    fn failed(request: Arc<Self::Request>) -> Self {
        Self::failed_with(request, Outcome::server_fault())
    }

    fn try_parse_json(
        json: &Value,
        request: Arc<Self::Request>,
        custom_parser: Option<&JsonParseHook<Self>>,
    ) -> ParseResult<Self> {
        let action = <Self::Request as Request>::ACTION;
        let decoded = JsonObject::root(json, Self::XML_NAME)
            .and_then(|object| Self::decode_json(&object, request));
        finish_parse(action, "JSON", json, decoded, custom_parser)
    }

    fn try_parse_xml(
        xml: &Element,
        request: Arc<Self::Request>,
        custom_parser: Option<&XmlParseHook<Self>>,
    ) -> ParseResult<Self> {
        let action = <Self::Request as Request>::ACTION;
        let namespace = <Self::Request as Request>::XML_NAMESPACE;
        let decoded = XmlElement::root(xml, Self::XML_NAME, namespace)
            .and_then(|element| Self::decode_xml(&element, request));
        finish_parse(action, "XML", xml, decoded, custom_parser)
    }

    /// Fail-fast variant of [`Response::try_parse_json`].
    ///
    /// # Panics
    ///
    /// Panics with the parse reason when the payload is invalid.
    fn parse_json(json: &Value, request: Arc<Self::Request>) -> Self {
        Self::try_parse_json(json, request, None).unwrap_or_else(|e| {
            panic!(
                "Invalid {} response: {}",
                <Self::Request as Request>::ACTION,
                e
            )
        })
    }

    /// Fail-fast variant of [`Response::try_parse_xml`].
    ///
    /// # Panics
    ///
    /// Panics with the parse reason when the element is invalid.
    fn parse_xml(xml: &Element, request: Arc<Self::Request>) -> Self {
        Self::try_parse_xml(xml, request, None).unwrap_or_else(|e| {
            panic!(
                "Invalid {} response: {}",
                <Self::Request as Request>::ACTION,
                e
            )
        })
    }

    fn to_json(&self, custom_serializer: Option<&JsonSerializeHook<Self>>) -> Value {
        finish_serialize(self, self.encode_json(), custom_serializer)
    }

    fn to_xml(&self, custom_serializer: Option<&XmlSerializeHook<Self>>) -> Element {
        finish_serialize(self, self.encode_xml(), custom_serializer)
    }
}
