//! ChangeConfiguration

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CHARGE_POINT_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{CiString50, CiString500, Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::ConfigurationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeConfigurationRequest {
    envelope: RequestEnvelope,
    pub key: CiString50,
    pub value: CiString500,
}

impl ChangeConfigurationRequest {
    pub fn new(context: impl Into<RequestContext>, key: CiString50, value: CiString500) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            key,
            value,
        }
    }
}

impl Identifiable for ChangeConfigurationRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for ChangeConfigurationRequest {
    const ACTION: &'static str = "ChangeConfiguration";
    const XML_NAME: &'static str = "changeConfigurationRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = ChangeConfigurationResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            key: object.mandatory("key")?,
            value: object.mandatory("value")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("key", &self.key)
            .field("value", &self.value)
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            key: element.mandatory("key")?,
            value: element.mandatory("value")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("key", &self.key)
            .field("value", &self.value)
            .build()
    }
}

impl fmt::Display for ChangeConfigurationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Set {} = {:?} on {}",
            self.key,
            self.value.as_str(),
            self.destination()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeConfigurationResponse {
    envelope: ResponseEnvelope<ChangeConfigurationRequest>,
    pub status: ConfigurationStatus,
}

impl ChangeConfigurationResponse {
    pub fn new(request: Arc<ChangeConfigurationRequest>, status: ConfigurationStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for ChangeConfigurationResponse {
    type Request = ChangeConfigurationRequest;

    fn envelope(&self) -> &ResponseEnvelope<ChangeConfigurationRequest> {
        &self.envelope
    }
}

impl Response for ChangeConfigurationResponse {
    const XML_NAME: &'static str = "changeConfigurationResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<ChangeConfigurationRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<ChangeConfigurationRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, ChangeConfigurationRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<ChangeConfigurationRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: ConfigurationStatus::Unknown,
        }
    }
}

impl fmt::Display for ChangeConfigurationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeConfiguration {} ({})", self.status, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;
    use crate::messages::test_support::*;
    use serde_json::json;

    fn request(value: &str) -> ChangeConfigurationRequest {
        ChangeConfigurationRequest::new(
            context(),
            CiString50::parse("MeterValueSampleInterval").unwrap(),
            CiString500::parse(value).unwrap(),
        )
    }

    #[test]
    fn round_trips() {
        assert_request_round_trip(&request("60"));
        assert_response_round_trip(&ChangeConfigurationResponse::new(
            Arc::new(request("60")),
            ConfigurationStatus::RebootRequired,
        ));
    }

    #[test]
    fn empty_value_is_kept() {
        let parsed = ChangeConfigurationRequest::try_parse_json(
            &json!({"key": "MeterValueSampleInterval", "value": ""}),
            context(),
            None,
        )
        .unwrap();
        assert_eq!(parsed, request(""));
    }

    #[test]
    fn missing_value_is_rejected() {
        let err = ChangeConfigurationRequest::try_parse_json(
            &json!({"key": "MeterValueSampleInterval"}),
            context(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingField { ref field, .. } if field == "value"));
    }

    #[test]
    fn markup_in_value_survives_xml() {
        assert_request_round_trip(&request("<a & b>"));
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        assert_request_requires::<ChangeConfigurationRequest>(
            &json!({"key": "HeartbeatInterval", "value": "300"}),
            &["key", "value"],
        );
        assert_response_requires::<ChangeConfigurationResponse>(
            &json!({"status": "RebootRequired"}),
            Arc::new(request("300")),
            &["status"],
        );
    }

    #[test]
    fn failed_defaults_to_unknown() {
        let request = Arc::new(request("300"));
        let response = ChangeConfigurationResponse::failed(Arc::clone(&request));
        assert_eq!(response.status, ConfigurationStatus::Unknown);
        assert_server_fault(&response, &request);
    }
}
