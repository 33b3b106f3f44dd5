//! BootNotification

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use xmltree::Element;

use crate::codec::xml::CENTRAL_SYSTEM_NAMESPACE;
use crate::codec::{JsonBuilder, JsonObject, XmlBuilder, XmlElement};
use crate::domain::{CiString20, CiString25, CiString50, Outcome, ParseResult};
use crate::message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};
use crate::messages::types::RegistrationStatus;

/// Sent by a charge point after start-up to register with the central system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BootNotificationRequest {
    envelope: RequestEnvelope,
    pub charge_point_vendor: CiString20,
    pub charge_point_model: CiString20,
    pub charge_point_serial_number: Option<CiString25>,
    pub charge_box_serial_number: Option<CiString25>,
    pub firmware_version: Option<CiString50>,
    pub iccid: Option<CiString20>,
    pub imsi: Option<CiString20>,
    pub meter_type: Option<CiString25>,
    pub meter_serial_number: Option<CiString25>,
}

impl BootNotificationRequest {
    pub fn new(
        context: impl Into<RequestContext>,
        charge_point_vendor: CiString20,
        charge_point_model: CiString20,
    ) -> Self {
        Self {
            envelope: RequestEnvelope::new(Self::ACTION, context.into()),
            charge_point_vendor,
            charge_point_model,
            charge_point_serial_number: None,
            charge_box_serial_number: None,
            firmware_version: None,
            iccid: None,
            imsi: None,
            meter_type: None,
            meter_serial_number: None,
        }
    }
}

impl Identifiable for BootNotificationRequest {
    fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }
}

impl Request for BootNotificationRequest {
    const ACTION: &'static str = "BootNotification";
    const XML_NAME: &'static str = "bootNotificationRequest";
    const XML_NAMESPACE: &'static str = CENTRAL_SYSTEM_NAMESPACE;

    type Response = BootNotificationResponse;

    fn decode_json(object: &JsonObject<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            charge_point_vendor: object.mandatory("chargePointVendor")?,
            charge_point_model: object.mandatory("chargePointModel")?,
            charge_point_serial_number: object.optional("chargePointSerialNumber")?,
            charge_box_serial_number: object.optional("chargeBoxSerialNumber")?,
            firmware_version: object.optional("firmwareVersion")?,
            iccid: object.optional("iccid")?,
            imsi: object.optional("imsi")?,
            meter_type: object.optional("meterType")?,
            meter_serial_number: object.optional("meterSerialNumber")?,
        })
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("chargePointVendor", &self.charge_point_vendor)
            .field("chargePointModel", &self.charge_point_model)
            .optional("chargePointSerialNumber", self.charge_point_serial_number.as_ref())
            .optional("chargeBoxSerialNumber", self.charge_box_serial_number.as_ref())
            .optional("firmwareVersion", self.firmware_version.as_ref())
            .optional("iccid", self.iccid.as_ref())
            .optional("imsi", self.imsi.as_ref())
            .optional("meterType", self.meter_type.as_ref())
            .optional("meterSerialNumber", self.meter_serial_number.as_ref())
            .build()
    }

    fn decode_xml(element: &XmlElement<'_>, envelope: RequestEnvelope) -> ParseResult<Self> {
        Ok(Self {
            envelope,
            charge_point_vendor: element.mandatory("chargePointVendor")?,
            charge_point_model: element.mandatory("chargePointModel")?,
            charge_point_serial_number: element.optional("chargePointSerialNumber")?,
            charge_box_serial_number: element.optional("chargeBoxSerialNumber")?,
            firmware_version: element.optional("firmwareVersion")?,
            iccid: element.optional("iccid")?,
            imsi: element.optional("imsi")?,
            meter_type: element.optional("meterType")?,
            meter_serial_number: element.optional("meterSerialNumber")?,
        })
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, Self::XML_NAMESPACE)
            .field("chargePointVendor", &self.charge_point_vendor)
            .field("chargePointModel", &self.charge_point_model)
            .optional("chargePointSerialNumber", self.charge_point_serial_number.as_ref())
            .optional("chargeBoxSerialNumber", self.charge_box_serial_number.as_ref())
            .optional("firmwareVersion", self.firmware_version.as_ref())
            .optional("iccid", self.iccid.as_ref())
            .optional("imsi", self.imsi.as_ref())
            .optional("meterType", self.meter_type.as_ref())
            .optional("meterSerialNumber", self.meter_serial_number.as_ref())
            .build()
    }
}

impl fmt::Display for BootNotificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Boot of {} {}",
            self.charge_point_vendor, self.charge_point_model
        )?;
        if let Some(firmware) = &self.firmware_version {
            write!(f, " (firmware {})", firmware)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BootNotificationResponse {
    envelope: ResponseEnvelope<BootNotificationRequest>,
    pub status: RegistrationStatus,
    pub current_time: DateTime<Utc>,
    /// Heartbeat interval in seconds when accepted, retry delay otherwise.
    pub interval: u32,
}

impl BootNotificationResponse {
    pub fn new(
        request: Arc<BootNotificationRequest>,
        status: RegistrationStatus,
        current_time: DateTime<Utc>,
        interval: u32,
    ) -> Self {
        Self {
            envelope: ResponseEnvelope::ok(request),
            status,
            current_time,
            interval,
        }
    }
}

impl Correlatable for BootNotificationResponse {
    type Request = BootNotificationRequest;

    fn envelope(&self) -> &ResponseEnvelope<BootNotificationRequest> {
        &self.envelope
    }
}

impl Response for BootNotificationResponse {
    const XML_NAME: &'static str = "bootNotificationResponse";

    fn decode_json(
        object: &JsonObject<'_>,
        request: Arc<BootNotificationRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(
            request,
            object.mandatory("status")?,
            object.mandatory("currentTime")?,
            object.mandatory("interval")?,
        ))
    }

    fn encode_json(&self) -> Value {
        JsonBuilder::new()
            .field("status", &self.status)
            .field("currentTime", &self.current_time)
            .field("interval", &self.interval)
            .build()
    }

    /// The SOAP schema names the interval `heartbeatInterval`.
    fn decode_xml(
        element: &XmlElement<'_>,
        request: Arc<BootNotificationRequest>,
    ) -> ParseResult<Self> {
        Ok(Self::new(
            request,
            element.mandatory("status")?,
            element.mandatory("currentTime")?,
            element.mandatory("heartbeatInterval")?,
        ))
    }

    fn encode_xml(&self) -> Element {
        XmlBuilder::root(Self::XML_NAME, BootNotificationRequest::XML_NAMESPACE)
            .field("status", &self.status)
            .field("currentTime", &self.current_time)
            .field("heartbeatInterval", &self.interval)
            .build()
    }

    fn failed_with(request: Arc<BootNotificationRequest>, outcome: Outcome) -> Self {
        let current_time = request.request_timestamp();
        Self {
            envelope: ResponseEnvelope::with_outcome(request, outcome),
            status: RegistrationStatus::Unknown,
            current_time,
            interval: 0,
        }
    }
}

impl fmt::Display for BootNotificationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BootNotification {} interval={}s ({})",
            self.status,
            self.interval,
            self.outcome()
        )
    }
}
