//! # Texnouz OCPP Messages
//!
//! OCPP 1.6 message catalog with a dual JSON (OCPP-J payload) and XML
//! (OCPP-S body element) codec.
//!
//! ## Architecture
//!
//! - **domain**: identifiers, bounded strings, outcomes and parse errors
//! - **codec**: field extractors, document builders, protocol enumerations
//!   and custom parser/serializer hooks
//! - **message**: request/response envelopes and the `Request` / `Response`
//!   traits every action implements
//! - **messages**: the concrete actions, grouped by the side that handles them
//! - **exchange**: pairing replies with pending requests, timeouts and
//!   cancellation
//! - **config**: TOML settings for the exchange layer
//!
//! Frame-level transport (WebSocket / SOAP envelopes) is out of scope: callers
//! hand payloads in and take payloads out.

pub mod codec;
pub mod config;
pub mod domain;
pub mod exchange;
pub mod message;
pub mod messages;
pub mod support;

pub use config::{default_config_path, Config, ConfigError, ExchangeSettings};

pub use domain::{Fault, FaultKind, NetworkingNodeId, Outcome, ParseError, ParseResult, RequestId};

pub use message::{
    Correlatable, Identifiable, Request, RequestContext, RequestEnvelope, Response,
    ResponseEnvelope,
};

pub use exchange::{Correlator, PendingReply, Reply};

pub use support::CancellationHandle;
