//! InstallCertificate (security extension)

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CHARGE_POINT_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{BoundedString, Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::{CertificateStatus, CertificateUse};

/// PEM-encoded X.509 certificate, `string[0..5500]`.
pub type PemCertificate = BoundedString<5500>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallCertificateRequest {
    envelope: RequestEnvelope,
    pub certificate_type: CertificateUse,
    pub certificate: PemCertificate,
}

impl InstallCertificateRequest {
    pub fn new(
        context: impl Into<RequestContext>,
        certificate_type: CertificateUse,
        certificate: PemCertificate,
    ) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            certificate_type,
            certificate,
        }
    }
}

impl Identifiable for InstallCertificateRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for InstallCertificateRequest {
    const ACTION: &'static str = "InstallCertificate";
    const XML_NAME: &'static str = "installCertificateRequest";
    const XML_NAMESPACE: &'static str = CHARGE_POINT_NAMESPACE;

    type Response = InstallCertificateResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            certificate_type: object.mandatory("certificateType")?,
            certificate: object.mandatory("certificate")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("certificateType", &self.certificate_type)
            .field("certificate", &self.certificate)
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            certificate_type: element.mandatory("certificateType")?,
            certificate: element.mandatory("certificate")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("certificateType", &self.certificate_type)
            .field("certificate", &self.certificate)
            .build()
    }
}

impl fmt::Display for InstallCertificateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Install {} ({} chars) on {}",
            self.certificate_type,
            self.certificate.as_str().chars().count(),
            self.destination()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallCertificateResponse {
    envelope: ResponseEnvelope<InstallCertificateRequest>,
    pub status: CertificateStatus,
}

impl InstallCertificateResponse {
    pub fn new(request: Arc<InstallCertificateRequest>, status: CertificateStatus) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
        }
    }
}

impl Correlatable for InstallCertificateResponse {
    type Request = InstallCertificateRequest;

    fn envelope(&self) -> &ResponseEnvelope<InstallCertificateRequest> {
        &self.envelope
    }
}

impl Response for InstallCertificateResponse {
    const XML_NAME: &'static str = "installCertificateResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<InstallCertificateRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, object.mandatory("status")?))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new().field("status", &self.status).build()
    }

    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<InstallCertificateRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(request, element.mandatory("status")?))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, InstallCertificateRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .build()
    }

    fn failed_with(request: Arc<InstallCertificateRequest>, outcome: Outcome) -> Self {
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: CertificateStatus::Unknown,
        }
    }
}

impl fmt::Display for InstallCertificateResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstallCertificate {} ({})", self.status, self.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;
    use crate::messages::test_support::*;
    use serde_json::json;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIU\n-----END CERTIFICATE-----";

    fn request() -> InstallCertificateRequest {
        InstallCertificateRequest::new(
            context(),
            CertificateUse::CentralSystemRootCertificate,
            PemCertificate::parse(PEM).unwrap(),
        )
    }

    #[test]
    fn round_trips_with_line_breaks() {
        assert_request_round_trip(&request());
        assert_response_round_trip(&InstallCertificateResponse::new(
            Arc::new(request()),
            CertificateStatus::Failed,
        ));
    }

    #[test]
    fn oversized_certificate_is_rejected() {
        let err = InstallCertificateRequest::try_parse_json(
            &json!({
                "certificateType": "ManufacturerRootCertificate",
                "certificate": "A".repeat(5501)
            }),
            context(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { ref field, .. } if field == "certificate"));
    }

    #[test]
    fn unknown_certificate_use_is_rejected() {
        let err = InstallCertificateRequest::try_parse_json(
            &json!({"certificateType": "V2GRootCertificate", "certificate": PEM}),
            context(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("certificateType"));
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        assert_request_requires::<InstallCertificateRequest>(
            &json!({"certificateType": "ManufacturerRootCertificate", "certificate": PEM}),
            &["certificateType", "certificate"],
        );
        assert_response_requires::<InstallCertificateResponse>(
            &json!({"status": "Rejected"}),
            Arc::new(request()),
            &["status"],
        );
    }

    #[test]
    fn failed_defaults_to_unknown() {
        let request = Arc::new(request());
        let response = InstallCertificateResponse::failed(Arc::clone(&request));
        assert_eq!(response.status, CertificateStatus::Unknown);
        assert_server_fault(&response, &request);
    }
}
