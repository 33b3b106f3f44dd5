//! GetConfiguration
//!
//! Requested keys and reported entries keep document order. Unknown keys
//! form a set: duplicates collapse and order carries no meaning.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CHARGE_POINT_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{CiString50, Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::ConfigurationKey;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GetConfigurationRequest {
    envelope: RequestEnvelope,
    /// Empty asks for every key the charge point knows.
    pub keys: Vec<CiString50>,
}

impl GetConfigurationRequest {
    pub fn new(context: impl Into<RequestContext>, keys: Vec<CiString50>) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            keys,
        }
    }

    pub fn all(context: impl Into<RequestContext>) -> Self {
        Self::new(context, Vec::new())
    }
}

impl Identifiable for GetConfigurationRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for GetConfigurationRequest {
    const ACTION: &'static str = "GetConfiguration";
    const XML_NAME: &'static str = "getConfigurationRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = GetConfigurationResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            keys: object.optional_list("key")?.unwrap_or_default(),
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().list("key", &self.keys).build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            keys: element.list("key")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .list("key", &self.keys)
            .build()
    }
}

impl fmt::Display for GetConfigurationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            write!(f, "Get full configuration of {}", self.destination())
        } else {
            let keys: Vec<&str> = self.keys.iter().map(|k| k.as_str()).collect();
            write!(
                f,
                "Get configuration [{}] of {}",
                keys.join(", "),
                self.destination()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GetConfigurationResponse {
    envelope: ResponseEnvelope<GetConfigurationRequest>,
    pub configuration_keys: Vec<ConfigurationKey>,
    pub unknown_keys: BTreeSet<CiString50>,
}

impl GetConfigurationResponse {
    pub fn new(
        request: Arc<GetConfigurationRequest>,
        configuration_keys: Vec<ConfigurationKey>,
        unknown_keys: BTreeSet<CiString50>,
    ) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            configuration_keys,
            unknown_keys,
        }
    }

    /// Entry reported for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ConfigurationKey> {
        self.configuration_keys
            .iter()
            .find(|entry| entry.key.as_str() == key)
    }
}

impl Correlatable for GetConfigurationResponse {
    type Request = GetConfigurationRequest;

    fn envelope(&self) -> &ResponseEnvelope<GetConfigurationRequest> {
        &self.envelope
    }
}

impl Response for GetConfigurationResponse {
    const XML_NAME: &'static str = "getConfigurationResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<GetConfigurationRequest>,
    ) -> ParseResult<Self> {
        let configuration_keys = object
            .optional_objects("configurationKey")?
            .unwrap_or_default()
            .iter()
            .map(ConfigurationKey::decode_json)
            .collect::<ParseResult<Vec<_>>>()?;
        let unknown_keys = object
            .optional_list::<CiString50>("unknownKey")?
            .unwrap_or_default()
            .into_iter()
            .collect();
        Ok(Self::new(request, configuration_keys, unknown_keys))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .objects(
                "configurationKey",
                self.configuration_keys
                    .iter()
                    .map(ConfigurationKey::encode_json)
                    .collect(),
            )
            .list("unknownKey", &self.unknown_keys)
            .build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<GetConfigurationRequest>,
    ) -> ParseResult<Self> {
        let configuration_keys = element
            .children("configurationKey")
            .iter()
            .map(ConfigurationKey::decode_xml)
            .collect::<ParseResult<Vec<_>>>()?;
        let unknown_keys = element
            .list::<CiString50>("unknownKey")?
            .into_iter()
            .collect();
        Ok(Self::new(request, configuration_keys, unknown_keys))
    }

    fn encode_xml(&self) -> Element {
        let builder = XmlBuilder::root(Self::XML_NAME, GetConfigurationRequest::XML_NAMESPACE);
        self.configuration_keys
            .iter()
            .fold(builder, |builder, entry| {
                builder.child("configurationKey", |b| entry.encode_xml(b))
            })
            .list("unknownKey", &self.unknown_keys)
            .build()
    }

    fn failed_with(request: Arc<GetConfigurationRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            configuration_keys: Vec::new(),
            unknown_keys: BTreeSet::new(),
        }
    }
}

impl fmt::Display for GetConfigurationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GetConfiguration: {} key(s), {} unknown ({})",
            self.configuration_keys.len(),
            self.unknown_keys.len(),
            self.outcome()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CiString500, ParseError};
    use crate::messages::test_support::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key(text: &str) -> CiString50 {
        CiString50::parse(text).unwrap()
    }

    fn request() -> Arc<GetConfigurationRequest> {
        Arc::new(GetConfigurationRequest::new(
            context(),
            vec![key("HeartbeatInterval"), key("Vendor.Secret"), key("AuthorizeRemoteTxRequests")],
        ))
    }

    fn sample_response() -> GetConfigurationResponse {
        GetConfigurationResponse::new(
            request(),
            vec![
                ConfigurationKey {
                    key: key("HeartbeatInterval"),
                    readonly: false,
                    value: Some(CiString500::parse("300").unwrap()),
                },
                ConfigurationKey {
                    key: key("AuthorizeRemoteTxRequests"),
                    readonly: true,
                    value: None,
                },
            ],
            [key("Vendor.Secret")].into_iter().collect(),
        )
    }

    #[test]
    fn round_trips() {
        assert_request_round_trip(request().as_ref());
        assert_request_round_trip(&GetConfigurationRequest::all(context()));
        assert_response_round_trip(&sample_response());
    }

    #[test]
    fn empty_key_list_is_omitted() {
        assert_eq!(GetConfigurationRequest::all(context()).to_json(None), json!({}));
    }

    #[test]
    fn response_json_shape() {
        assert_eq!(
            sample_response().to_json(None),
            json!({
                "configurationKey": [
                    {"key": "HeartbeatInterval", "readonly": false, "value": "300"},
                    {"key": "AuthorizeRemoteTxRequests", "readonly": true}
                ],
                "unknownKey": ["Vendor.Secret"]
            })
        );
    }

    #[test]
    fn key_order_matters_but_unknown_key_order_does_not() {
        let a = GetConfigurationRequest::new(context(), vec![key("A"), key("B")]);
        let b = GetConfigurationRequest::new(context(), vec![key("B"), key("A")]);
        assert_ne!(a, b);

        let request = Arc::new(a);
        let first = GetConfigurationResponse::try_parse_json(
            &json!({"unknownKey": ["A", "B", "A"]}),
            request.clone(),
            None,
        )
        .unwrap();
        let second =
            GetConfigurationResponse::try_parse_json(&json!({"unknownKey": ["B", "A"]}), request, None)
                .unwrap();
        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
        assert_eq!(first.unknown_keys.len(), 2);
    }

    #[test]
    fn nested_entry_errors_are_indexed() {
        let err = GetConfigurationResponse::try_parse_json(
            &json!({"configurationKey": [
                {"key": "A", "readonly": true},
                {"readonly": false}
            ]}),
            request(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingField { .. }));
        assert_eq!(err.field(), Some("configurationKey[1].key"));
    }

    #[test]
    fn oversized_key_is_rejected() {
        let err = GetConfigurationRequest::try_parse_json(
            &json!({"key": ["ok", "k".repeat(51)]}),
            context(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("key[1]"));
    }

    #[test]
    fn lookup_by_key() {
        let response = sample_response();
        assert_eq!(
            response.get("HeartbeatInterval").and_then(|e| e.value.as_ref()).map(|v| v.as_str()),
            Some("300")
        );
        assert!(response.get("Missing").is_none());
    }

    #[test]
    fn failed_has_empty_collections() {
        let response = GetConfigurationResponse::failed(request());
        assert!(response.configuration_keys.is_empty());
        assert!(response.unknown_keys.is_empty());
        assert_eq!(response.to_json(None), json!({}));
    }
}
