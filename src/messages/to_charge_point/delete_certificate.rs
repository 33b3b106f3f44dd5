//! DeleteCertificate (security extension)

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
use crate::messages::types::{CertificateHashData, DeleteCertificateStatus};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeleteCertificateRequest {
    envelope: RequestEnvelope,
    pub certificate_hash_data: CertificateHashData,
}

impl DeleteCertificateRequest {
    pub fn new(context: impl Into<RequestContext>, certificate_hash_data: CertificateHashData) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            certificate_hash_data,
        }
    }
}

impl Identifiable for DeleteCertificateRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for DeleteCertificateRequest {
    const ACTION: &'static str = "DeleteCertificate";
    const XML_NAME: &'static str = "deleteCertificateRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = DeleteCertificateResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        let hash_data = object.mandatory_object("certificateHashData")?;
        Ok(Self {
            envelope,
            certificate_hash_data: CertificateHashData::decode_json(&hash_data)?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .value("certificateHashData", self.certificate_hash_data.encode_json())
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        let hash_data = element.mandatory_child("certificateHashData")?;
        Ok(Self {
            envelope,
            certificate_hash_data: CertificateHashData::decode_xml(&hash_data)?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .child("certificateHashData", |b| {
                self.certificate_hash_data.encode_xml(b)
            })
            .build()
    }
}

impl fmt::Display for DeleteCertificateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Delete certificate {} on {}",
            self.certificate_hash_data,
            self.destination()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeleteCertificateResponse {
    envelope: ResponseEnvelope<DeleteCertificateRequest>,
    pub status: DeleteCertificateStatus,
}

impl DeleteCertificateResponse {
    pub fn new(request: Arc<DeleteCertificateRequest>, status: DeleteCertificateStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for DeleteCertificateResponse {
    type Request = DeleteCertificateRequest;

    fn envelope(&self) -> &ResponseEnvelope<DeleteCertificateRequest> {
        &self.envelope
    }
}

impl Response for DeleteCertificateResponse {
    const XML_NAME: &'static str = "deleteCertificateResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<DeleteCertificateRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<DeleteCertificateRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, DeleteCertificateRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<DeleteCertificateRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: DeleteCertificateStatus::Unknown,
        }
    }
}

impl fmt::Display for DeleteCertificateResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeleteCertificate {} ({})", self.status, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HexDigest, ParseError};
    use crate::messages::test_support::*;
    use crate::messages::types::{HashAlgorithm, SerialNumber};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn hash_data() -> CertificateHashData {
        CertificateHashData {
            hash_algorithm: HashAlgorithm::Sha256,
            issuer_name_hash: HexDigest::parse("0a1b2c3d").unwrap(),
            issuer_key_hash: HexDigest::from_bytes(&[0xde, 0xad, 0xbe, 0xef]),
            serial_number: SerialNumber::parse("7f0a").unwrap(),
        }
    }

    #[test]
    fn round_trips() {
        let request = DeleteCertificateRequest::new(context(), hash_data());
        assert_request_round_trip(&request);
        assert_response_round_trip(&DeleteCertificateResponse::new(
            Arc::new(request),
            DeleteCertificateStatus::NotFound,
        ));
    }

    #[test]
    fn json_nests_hash_data() {
        let request = DeleteCertificateRequest::new(context(), hash_data());
        assert_eq!(
            request.to_json(None),
            json!({"certificateHashData": {
                "hashAlgorithm": "SHA256",
                "issuerNameHash": "0a1b2c3d",
                "issuerKeyHash": "deadbeef",
                "serialNumber": "7f0a"
            }})
        );
    }

    #[test]
    fn missing_serial_number_is_reported() {
        let payload = json!({"certificateHashData": {
            "hashAlgorithm": "SHA256",
            "issuerNameHash": "0a1b2c3d",
            "issuerKeyHash": "deadbeef"
        }});
        let err = DeleteCertificateRequest::try_parse_json(&payload, context(), None).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { .. }));
        assert!(err.to_string().contains("serialNumber"));
    }

    #[test]
    fn missing_serial_number_in_xml_is_reported() {
        let element = crate::codec::xml::parse_document(
            r#"<deleteCertificateRequest xmlns="urn://Ocpp/Cp/2015/10/">
                 <certificateHashData>
                   <hashAlgorithm>SHA256</hashAlgorithm>
                   <issuerNameHash>0a1b</issuerNameHash>
                   <issuerKeyHash>2c3d</issuerKeyHash>
                 </certificateHashData>
               </deleteCertificateRequest>"#,
        )
        .unwrap();
        let err = DeleteCertificateRequest::try_parse_xml(&element, context(), None).unwrap_err();
        assert_eq!(err.field(), Some("certificateHashData.serialNumber"));
    }

    #[test]
    fn hash_data_must_be_an_object() {
        let err = DeleteCertificateRequest::try_parse_json(
            &json!({"certificateHashData": "0a1b"}),
            context(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { .. }));
    }

    #[test]
    fn equality_covers_nested_fields() {
        let a = DeleteCertificateRequest::new(context(), hash_data());
        let mut other = hash_data();
        other.serial_number = SerialNumber::parse("7f0b").unwrap();
        let b = DeleteCertificateRequest::new(context(), other);
        assert_ne!(a, b);
        assert_ne!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        assert_request_requires::<DeleteCertificateRequest>(
            &json!({
                "certificateHashData": {
                    "hashAlgorithm": "SHA256",
                    "issuerNameHash": "0a1b2c3d",
                    "issuerKeyHash": "deadbeef",
                    "serialNumber": "7f0a"
                }
            }),
            &["certificateHashData"],
        );
        assert_response_requires::<DeleteCertificateResponse>(
            &json!({"status": "Failed"}),
            Arc::new(DeleteCertificateRequest::new(context(), hash_data())),
            &["status"],
        );
    }

    #[test]
    fn failed_defaults_to_unknown() {
        let request = Arc::new(DeleteCertificateRequest::new(context(), hash_data()));
        let response = DeleteCertificateResponse::failed(Arc::clone(&request));
        assert_eq!(response.status, DeleteCertificateStatus::Unknown);
        assert_server_fault(&response, &request);
    }
}
