//! Protocol enumerations and complex types shared by the catalog
//!
//! Enumeration policy: response status enums declare an `Unknown` fallback
//! member. It is their failure-path default and absorbs tokens the protocol
//! doesn't define. Request-side enums and [`AuthorizationStatus`] are strict.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec::enums::wire_enum;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{CiString50, CiString500, HexDigest, IdToken, ParseResult};

// ── Request-side enumerations (strict) ─────────────────────────

wire_enum! {
    /// Kind of reset requested.
    pub enum ResetType: "ResetType" {
        Hard => "Hard",
        Soft => "Soft",
    }
}

wire_enum! {
    /// Requested availability of a connector or the whole charge point.
    pub enum AvailabilityType: "AvailabilityType" {
        Inoperative => "Inoperative",
        Operative => "Operative",
    }
}

wire_enum! {
    /// Message the central system asks the charge point to send.
    pub enum MessageTrigger: "MessageTrigger" {
        BootNotification => "BootNotification",
        DiagnosticsStatusNotification => "DiagnosticsStatusNotification",
        FirmwareStatusNotification => "FirmwareStatusNotification",
        Heartbeat => "Heartbeat",
        MeterValues => "MeterValues",
        StatusNotification => "StatusNotification",
    }
}

wire_enum! {
    /// Trigger kinds of the security extension's `ExtendedTriggerMessage`.
    pub enum MessageTriggerExtended: "MessageTriggerEnumType" {
        BootNotification => "BootNotification",
        LogStatusNotification => "LogStatusNotification",
        FirmwareStatusNotification => "FirmwareStatusNotification",
        Heartbeat => "Heartbeat",
        MeterValues => "MeterValues",
        SignChargePointCertificate => "SignChargePointCertificate",
        StatusNotification => "StatusNotification",
    }
}

wire_enum! {
    /// Kind of root certificate being installed.
    pub enum CertificateUse: "CertificateUseEnumType" {
        CentralSystemRootCertificate => "CentralSystemRootCertificate",
        ManufacturerRootCertificate => "ManufacturerRootCertificate",
    }
}

wire_enum! {
    /// Hash algorithm used for certificate hash data.
    pub enum HashAlgorithm: "HashAlgorithmEnumType" {
        Sha256 => "SHA256",
        Sha384 => "SHA384",
        Sha512 => "SHA512",
    }
}

// ── Response status enumerations (Unknown fallback) ────────────

wire_enum! {
    pub enum ResetStatus: "ResetStatus" {
        Accepted => "Accepted",
        Rejected => "Rejected",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum AvailabilityStatus: "AvailabilityStatus" {
        Accepted => "Accepted",
        Rejected => "Rejected",
        Scheduled => "Scheduled",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum ClearCacheStatus: "ClearCacheStatus" {
        Accepted => "Accepted",
        Rejected => "Rejected",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum UnlockStatus: "UnlockStatus" {
        Unlocked => "Unlocked",
        UnlockFailed => "UnlockFailed",
        NotSupported => "NotSupported",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    /// Shared by `TriggerMessage` and `ExtendedTriggerMessage`.
    pub enum TriggerMessageStatus: "TriggerMessageStatus" {
        Accepted => "Accepted",
        Rejected => "Rejected",
        NotImplemented => "NotImplemented",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum ConfigurationStatus: "ConfigurationStatus" {
        Accepted => "Accepted",
        Rejected => "Rejected",
        RebootRequired => "RebootRequired",
        NotSupported => "NotSupported",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum DataTransferStatus: "DataTransferStatus" {
        Accepted => "Accepted",
        Rejected => "Rejected",
        UnknownMessageId => "UnknownMessageId",
        UnknownVendorId => "UnknownVendorId",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum CertificateStatus: "CertificateStatusEnumType" {
        Accepted => "Accepted",
        Rejected => "Rejected",
        Failed => "Failed",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum DeleteCertificateStatus: "DeleteCertificateStatusEnumType" {
        Accepted => "Accepted",
        Failed => "Failed",
        NotFound => "NotFound",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    pub enum RegistrationStatus: "RegistrationStatus" {
        Accepted => "Accepted",
        Pending => "Pending",
        Rejected => "Rejected",
    }
    fallback Unknown => "Unknown";
}

wire_enum! {
    /// Strict: an unrecognized authorization status must never be mistaken
    /// for a known one. The failure-path default is `Invalid`.
    pub enum AuthorizationStatus: "AuthorizationStatus" {
        Accepted => "Accepted",
        Blocked => "Blocked",
        Expired => "Expired",
        Invalid => "Invalid",
        ConcurrentTx => "ConcurrentTx",
    }
}

// ── CertificateHashData ────────────────────────────────────────

/// Identifies an installed certificate by issuer hashes and serial number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateHashData {
    pub hash_algorithm: HashAlgorithm,
    pub issuer_name_hash: HexDigest,
    pub issuer_key_hash: HexDigest,
    /// `string[0..40]`
    pub serial_number: SerialNumber,
}

pub type SerialNumber = crate::domain::BoundedString<40>;

impl CertificateHashData {
    pub fn decode_json(object: &JsonObject<'_>) -> ParseResult<Self> {
        Ok(Self {
            hash_algorithm: object.mandatory("hashAlgorithm")?,
            issuer_name_hash: object.mandatory("issuerNameHash")?,
            issuer_key_hash: object.mandatory("issuerKeyHash")?,
            serial_number: object.mandatory("serialNumber")?,
        })
    }

    pub fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("hashAlgorithm", &self.hash_algorithm)
            .field("issuerNameHash", &self.issuer_name_hash)
            .field("issuerKeyHash", &self.issuer_key_hash)
            .field("serialNumber", &self.serial_number)
            .build()
    }

    pub fn decode_xml(element: &XmlElement<'_>) -> ParseResult<Self> {
        Ok(Self {
            hash_algorithm: element.mandatory("hashAlgorithm")?,
            issuer_name_hash: element.mandatory("issuerNameHash")?,
            issuer_key_hash: element.mandatory("issuerKeyHash")?,
            serial_number: element.mandatory("serialNumber")?,
        })
    }

    pub fn encode_xml(&self, builder: XmlBuilder) -> XmlBuilder {
        builder
            .field("hashAlgorithm", &self.hash_algorithm)
            .field("issuerNameHash", &self.issuer_name_hash)
            .field("issuerKeyHash", &self.issuer_key_hash)
            .field("serialNumber", &self.serial_number)
    }
}

impl fmt::Display for CertificateHashData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} serial {} (issuer {})",
            self.hash_algorithm, self.serial_number, self.issuer_name_hash
        )
    }
}

// ── IdTagInfo ──────────────────────────────────────────────────

/// Authorization verdict for an id tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdTagInfo {
    pub status: AuthorizationStatus,
    pub expiry_date: Option<DateTime<Utc>>,
    pub parent_id_tag: Option<IdToken>,
}

impl IdTagInfo {
    pub fn new(status: AuthorizationStatus) -> Self {
        Self {
            status,
            expiry_date: None,
            parent_id_tag: None,
        }
    }

    pub fn decode_json(object: &JsonObject<'_>) -> ParseResult<Self> {
        Ok(Self {
            status: object.mandatory("status")?,
            expiry_date: object.optional("expiryDate")?,
            parent_id_tag: object.optional("parentIdTag")?,
        })
    }

    pub fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("status", &self.status)
            .optional("expiryDate", self.expiry_date.as_ref())
            .optional("parentIdTag", self.parent_id_tag.as_ref())
            .build()
    }

    pub fn decode_xml(element: &XmlElement<'_>) -> ParseResult<Self> {
        Ok(Self {
            status: element.mandatory("status")?,
            expiry_date: element.optional("expiryDate")?,
            parent_id_tag: element.optional("parentIdTag")?,
        })
    }

    pub fn encode_xml(&self, builder: XmlBuilder) -> XmlBuilder {
        builder
            .field("status", &self.status)
            .optional("expiryDate", self.expiry_date.as_ref())
            .optional("parentIdTag", self.parent_id_tag.as_ref())
    }
}

// ── ConfigurationKey ───────────────────────────────────────────

/// One configuration entry reported by `GetConfiguration`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigurationKey {
    pub key: CiString50,
    pub readonly: bool,
    pub value: Option<CiString500>,
}

impl ConfigurationKey {
    pub fn decode_json(object: &JsonObject<'_>) -> ParseResult<Self> {
        Ok(Self {
            key: object.mandatory("key")?,
            readonly: object.mandatory("readonly")?,
            value: object.optional("value")?,
        })
    }

    pub fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("key", &self.key)
            .field("readonly", &self.readonly)
            .optional("value", self.value.as_ref())
            .build()
    }

    pub fn decode_xml(element: &XmlElement<'_>) -> ParseResult<Self> {
        Ok(Self {
            key: element.mandatory("key")?,
            readonly: element.mandatory("readonly")?,
            value: element.optional("value")?,
        })
    }

    pub fn encode_xml(&self, builder: XmlBuilder) -> XmlBuilder {
        builder
            .field("key", &self.key)
            .field("readonly", &self.readonly)
            .optional("value", self.value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::xml::CHARGE_POINT_NAMESPACE;
    use crate::codec::WireEnum;
    use crate::domain::ParseError;
    use serde_json::json;

    fn assert_round_trip<E: WireEnum>() {
        for member in E::MEMBERS {
            assert_eq!(E::parse(member.as_text()), Ok(*member), "{}", E::NAME);
        }
    }

    #[test]
    fn every_enum_round_trips() {
        assert_round_trip::<ResetType>();
        assert_round_trip::<AvailabilityType>();
        assert_round_trip::<MessageTrigger>();
        assert_round_trip::<MessageTriggerExtended>();
        assert_round_trip::<CertificateUse>();
        assert_round_trip::<HashAlgorithm>();
        assert_round_trip::<ResetStatus>();
        assert_round_trip::<AvailabilityStatus>();
        assert_round_trip::<ClearCacheStatus>();
        assert_round_trip::<UnlockStatus>();
        assert_round_trip::<TriggerMessageStatus>();
        assert_round_trip::<ConfigurationStatus>();
        assert_round_trip::<DataTransferStatus>();
        assert_round_trip::<CertificateStatus>();
        assert_round_trip::<DeleteCertificateStatus>();
        assert_round_trip::<RegistrationStatus>();
        assert_round_trip::<AuthorizationStatus>();
    }

    #[test]
    fn wire_tokens_are_exact() {
        assert_eq!(HashAlgorithm::Sha256.as_text(), "SHA256");
        assert!(HashAlgorithm::parse("sha256").is_err());
        assert!(ResetType::parse("hard").is_err());
    }

    #[test]
    fn status_enums_fall_back_to_unknown() {
        assert_eq!(ResetStatus::parse("Postponed"), Ok(ResetStatus::Unknown));
        assert_eq!(
            DataTransferStatus::parse("Whatever"),
            Ok(DataTransferStatus::Unknown)
        );
        assert!(AuthorizationStatus::parse("Unknown").is_err());
        assert!(AuthorizationStatus::FALLBACK.is_none());
    }

    #[test]
    fn certificate_hash_data_reports_nested_path() {
        let doc = json!({
            "certificateHashData": {
                "hashAlgorithm": "SHA256",
                "issuerNameHash": "aabb",
                "issuerKeyHash": "ccdd"
            }
        });
        let root = JsonObject::root(&doc, "test").unwrap();
        let nested = root.mandatory_object("certificateHashData").unwrap();
        let err = CertificateHashData::decode_json(&nested).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { .. }));
        assert_eq!(err.field(), Some("certificateHashData.serialNumber"));
    }

    #[test]
    fn certificate_hash_data_rejects_non_hex_digest() {
        let doc = json!({
            "hashAlgorithm": "SHA256",
            "issuerNameHash": "not-hex",
            "issuerKeyHash": "ccdd",
            "serialNumber": "01"
        });
        let root = JsonObject::root(&doc, "test").unwrap();
        let err = CertificateHashData::decode_json(&root).unwrap_err();
        assert_eq!(err.field(), Some("issuerNameHash"));
    }

    #[test]
    fn configuration_key_xml_round_trip() {
        let key = ConfigurationKey {
            key: CiString50::parse("HeartbeatInterval").unwrap(),
            readonly: false,
            value: Some(CiString500::parse("300").unwrap()),
        };
        let element = key
            .encode_xml(XmlBuilder::root("configurationKey", CHARGE_POINT_NAMESPACE))
            .build();
        let view = XmlElement::root(&element, "configurationKey", CHARGE_POINT_NAMESPACE).unwrap();
        assert_eq!(ConfigurationKey::decode_xml(&view), Ok(key));
    }

    #[test]
    fn id_tag_info_omits_absent_fields() {
        let info = IdTagInfo::new(AuthorizationStatus::Blocked);
        assert_eq!(info.encode_json(), json!({"status": "Blocked"}));
    }
}
