//! Domain layer
//!
//! Value types shared by every message: identifiers, the response outcome
//! model and codec errors.

pub mod error;
pub mod identifiers;
pub mod outcome;

pub use error::{Mismatch, ParseError, ParseResult};
pub use identifiers::{
    BoundedString, CiString20, CiString25, CiString255, CiString50, CiString500, EventTrackingId,
    HexDigest, IdToken, IdentifierError, NetworkingNodeId, RequestId,
};
pub use outcome::{Fault, FaultKind, Outcome};
