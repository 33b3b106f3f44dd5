//! Response outcome model
//!
//! An [`Outcome`] tells whether the action fields of a response came from a
//! real reply (`Ok`) or were synthesized from defaults because the exchange
//! failed (`Fault`).

use std::fmt;

/// Classification of a failed exchange.
///
/// The first group mirrors the OCPP-J `CallError` codes, the second group is
/// what a transport reports when no reply could be obtained at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    NotImplemented,
    NotSupported,
    InternalError,
    ProtocolError,
    SecurityError,
    FormationViolation,
    PropertyConstraintViolation,
    OccurenceConstraintViolation,
    TypeConstraintViolation,
    GenericError,
    /// No usable reply: lost connection, undecodable payload, etc.
    Server,
    /// No reply within the request timeout.
    Timeout,
}

impl FaultKind {
    pub const ALL: &'static [FaultKind] = &[
        Self::NotImplemented,
        Self::NotSupported,
        Self::InternalError,
        Self::ProtocolError,
        Self::SecurityError,
        Self::FormationViolation,
        Self::PropertyConstraintViolation,
        Self::OccurenceConstraintViolation,
        Self::TypeConstraintViolation,
        Self::GenericError,
        Self::Server,
        Self::Timeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotImplemented => "NotImplemented",
            Self::NotSupported => "NotSupported",
            Self::InternalError => "InternalError",
            Self::ProtocolError => "ProtocolError",
            Self::SecurityError => "SecurityError",
            Self::FormationViolation => "FormationViolation",
            Self::PropertyConstraintViolation => "PropertyConstraintViolation",
            Self::OccurenceConstraintViolation => "OccurenceConstraintViolation",
            Self::TypeConstraintViolation => "TypeConstraintViolation",
            Self::GenericError => "GenericError",
            Self::Server => "Server",
            Self::Timeout => "Timeout",
        }
    }

    /// Map a `CallError` error code. Codes outside the protocol's list
    /// become `GenericError`.
    pub fn from_error_code(code: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == code)
            .unwrap_or(Self::GenericError)
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure attached to a synthesized response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fault {
    pub kind: FaultKind,
    pub description: Option<String>,
}

impl Fault {
    pub fn new(kind: FaultKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    pub fn with_description(kind: FaultKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: Some(description.into()),
        }
    }

    /// Fault built from an OCPP-J `CallError` (code + description).
    pub fn from_call_error(code: &str, description: &str) -> Self {
        let description = (!description.is_empty()).then(|| description.to_string());
        Self {
            kind: FaultKind::from_error_code(code),
            description,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.kind, description),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Whether a response carries decoded action fields or failure defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Ok,
    Fault(Fault),
}

impl Outcome {
    /// The outcome used by `failed(request)` constructors.
    pub fn server_fault() -> Self {
        Self::Fault(Fault::new(FaultKind::Server))
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Ok => None,
            Self::Fault(fault) => Some(fault),
        }
    }
}

impl From<Fault> for Outcome {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Fault(fault) => write!(f, "Fault({})", fault),
        }
    }
}
