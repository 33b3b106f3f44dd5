//! Actions initiated by the central system and handled by the charge point.

pub mod change_availability;
pub mod change_configuration;
pub mod clear_cache;
pub mod data_transfer;
pub mod delete_certificate;
pub mod extended_trigger_message;
pub mod get_configuration;
pub mod install_certificate;
pub mod reset;
pub mod trigger_message;
pub mod unlock_connector;

pub use change_availability::{ChangeAvailabilityRequest, ChangeAvailabilityResponse};
pub use change_configuration::{ChangeConfigurationRequest, ChangeConfigurationResponse};
pub use clear_cache::{ClearCacheRequest, ClearCacheResponse};
pub use data_transfer::{DataTransferRequest, DataTransferResponse};
pub use delete_certificate::{DeleteCertificateRequest, DeleteCertificateResponse};
pub use extended_trigger_message::{ExtendedTriggerMessageRequest, ExtendedTriggerMessageResponse};
pub use get_configuration::{GetConfigurationRequest, GetConfigurationResponse};
pub use install_certificate::{InstallCertificateRequest, InstallCertificateResponse};
pub use reset::{ResetRequest, ResetResponse};
pub use trigger_message::{TriggerMessageRequest, TriggerMessageResponse};
pub use unlock_connector::{UnlockConnectorRequest, UnlockConnectorResponse};
