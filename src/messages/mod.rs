//! OCPP 1.6 message catalog
//!
//! - `to_charge_point`: actions initiated by the central system
//!   (XML namespace `urn://Ocpp/Cp/2015/10/`).
//! - `to_central_system`: actions initiated by the charge point
//!   (XML namespace `urn://Ocpp/Cs/2015/10/`).
//!
//! Every action is a [`Request`](crate::message::Request) /
//! [`Response`](crate::message::Response) pair built on the shared envelopes.

pub mod to_central_system;
pub mod to_charge_point;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use to_central_system::{
    AuthorizeRequest, AuthorizeResponse, BootNotificationRequest, BootNotificationResponse,
    HeartbeatRequest, HeartbeatResponse,
};
pub use to_charge_point::{
    ChangeAvailabilityRequest, ChangeAvailabilityResponse, ChangeConfigurationRequest,
    ChangeConfigurationResponse, ClearCacheRequest, ClearCacheResponse, DataTransferRequest,
    DataTransferResponse, DeleteCertificateRequest, DeleteCertificateResponse,
    ExtendedTriggerMessageRequest, ExtendedTriggerMessageResponse, GetConfigurationRequest,
    GetConfigurationResponse, InstallCertificateRequest, InstallCertificateResponse,
    ResetRequest, ResetResponse, TriggerMessageRequest, TriggerMessageResponse,
    UnlockConnectorRequest, UnlockConnectorResponse,
};
pub use types::*;
