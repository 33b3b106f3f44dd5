//! DataTransfer
//!
//! Vendor-specific exchange. `data` is opaque text whose format is agreed
//! between the parties identified by `vendorId` / `messageId`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CHARGE_POINT_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{CiString255, CiString50, Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::DataTransferStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataTransferRequest {
    envelope: RequestEnvelope,
    pub vendor_id: CiString255,
    pub message_id: Option<CiString50>,
    pub data: Option<String>,
}

impl DataTransferRequest {
    pub fn new(context: impl Into<RequestContext>, vendor_id: CiString255) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            vendor_id,
            message_id: None,
            data: None,
        }
    }

    pub fn with_message_id(mut self, message_id: CiString50) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

impl Identifiable for DataTransferRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for DataTransferRequest {
    const ACTION: &'static str = "DataTransfer";
    const XML_NAME: &'static str = "dataTransferRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = DataTransferResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            vendor_id: object.mandatory("vendorId")?,
            message_id: object.optional("messageId")?,
            data: object.optional("data")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("vendorId", &self.vendor_id)
            .optional("messageId", self.message_id.as_ref())
            .optional("data", self.data.as_ref())
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            vendor_id: element.mandatory("vendorId")?,
            message_id: element.optional("messageId")?,
            data: element.optional("data")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("vendorId", &self.vendor_id)
            .optional("messageId", self.message_id.as_ref())
            .optional("data", self.data.as_ref())
            .build()
    }
}

impl fmt::Display for DataTransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataTransfer {}", self.vendor_id)?;
        if let Some(message_id) = &self.message_id {
            write!(f, "/{}", message_id)?;
        }
        write!(f, " to {}", self.destination())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataTransferResponse {
    envelope: ResponseEnvelope<DataTransferRequest>,
    pub status: DataTransferStatus,
    pub data: Option<String>,
}

impl DataTransferResponse {
    pub fn new(
        request: Arc<DataTransferRequest>,
        status: DataTransferStatus,
        data: Option<String>,
    ) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
            data,
        }
    }
}

impl Correlatable for DataTransferResponse {
    type Request = DataTransferRequest;

    fn envelope(&self) -> &ResponseEnvelope<DataTransferRequest> {
        &self.envelope
    }
}

impl Response for DataTransferResponse {
    const XML_NAME: &'static str = "dataTransferResponse";

    fn decode_json(object: &JsonObject<'_>, request: Arc<DataTransferRequest>) -> ParseResult<Self> {
        Ok(Self::new(
            request,
            object.mandatory("status")?,
            object.optional("data")?,
        ))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("status", &self.status)
            .optional("data", self.data.as_ref())
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, request: Arc<DataTransferRequest>) -> ParseResult<Self> {
        Ok(Self::new(
            request,
            element.mandatory("status")?,
            element.optional("data")?,
        ))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, DataTransferRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .optional("data", self.data.as_ref())
            .build()
    }

    fn failed_with(request: Arc<DataTransferRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: DataTransferStatus::Unknown,
            data: None,
        }
    }
}

impl fmt::Display for DataTransferResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataTransfer {} ({})", self.status, self.outcome())
    }
}
