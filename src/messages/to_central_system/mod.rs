//! Actions initiated by the charge point and handled by the central system.

pub mod authorize;
pub mod boot_notification;
pub mod heartbeat;

pub use authorize::{AuthorizeRequest, AuthorizeResponse};
pub use boot_notification::{BootNotificationRequest, BootNotificationResponse};
pub use heartbeat::{HeartbeatRequest, HeartbeatResponse};
