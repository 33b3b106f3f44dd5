//! Protocol enumerations
//!
//! Every enumeration maps each member to exactly one case-sensitive wire
//! token. Parsing is strict unless the enumeration declares a fallback member
//! (`Unknown`), in which case unrecognized tokens map to that member. The
//! policy is part of each enum's definition, see [`wire_enum!`].

use std::fmt::Debug;
use std::hash::Hash;

use serde_json::Value;

use super::{describe_json, describe_text};
use crate::domain::Mismatch;

/// Closed set of wire tokens.
pub trait WireEnum: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Protocol name of the enumeration, used in error reasons.
    const NAME: &'static str;

    /// Every member, fallback included.
    const MEMBERS: &'static [Self];

    /// Member returned for unrecognized tokens; `None` makes parsing strict.
    const FALLBACK: Option<Self>;

    fn as_text(&self) -> &'static str;

    fn parse(token: &str) -> Result<Self, Mismatch> {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|member| member.as_text() == token)
            .or(Self::FALLBACK)
            .ok_or_else(|| Mismatch::new(Self::describe(), describe_text(token)))
    }

    /// "ResetType (one of Hard, Soft)"
    fn describe() -> String {
        let tokens: Vec<&str> = Self::MEMBERS.iter().map(|m| m.as_text()).collect();
        format!("{} (one of {})", Self::NAME, tokens.join(", "))
    }
}

pub(crate) fn enum_from_json<E: WireEnum>(value: &Value) -> Result<E, Mismatch> {
    match value.as_str() {
        Some(token) => E::parse(token),
        None => Err(Mismatch::new(E::describe(), describe_json(value))),
    }
}

/// Define a protocol enumeration together with its [`WireEnum`],
/// [`WireValue`](super::WireValue), `Display` and `FromStr` impls.
///
/// ```ignore
/// wire_enum! {
///     /// Result of a reset request.
///     pub enum ResetStatus: "ResetStatus" {
///         Accepted => "Accepted",
///         Rejected => "Rejected",
///     }
///     fallback Unknown => "Unknown";
/// }
/// ```
macro_rules! wire_enum {
    (@define
        $(#[$meta:meta])*
        $vis:vis $name:ident, $label:literal,
        [ $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ ],
        $fallback:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::codec::WireEnum for $name {
            const NAME: &'static str = $label;
            const MEMBERS: &'static [Self] = &[ $( Self::$variant ),+ ];
            const FALLBACK: Option<Self> = $fallback;

            fn as_text(&self) -> &'static str {
                match self {
                    $( Self::$variant => $token ),+
                }
            }
        }

        impl $crate::codec::WireValue for $name {
            fn expected() -> String {
                <Self as $crate::codec::WireEnum>::describe()
            }

            fn from_json(value: &serde_json::Value) -> Result<Self, $crate::domain::Mismatch> {
                $crate::codec::enums::enum_from_json(value)
            }

            fn to_json(&self) -> serde_json::Value {
                serde_json::Value::String(
                    <Self as $crate::codec::WireEnum>::as_text(self).to_string(),
                )
            }

            fn from_xml_text(text: &str) -> Result<Self, $crate::domain::Mismatch> {
                <Self as $crate::codec::WireEnum>::parse(text.trim())
            }

            fn to_xml_text(&self) -> String {
                <Self as $crate::codec::WireEnum>::as_text(self).to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(<Self as $crate::codec::WireEnum>::as_text(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::Mismatch;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::codec::WireEnum>::parse(s)
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
        fallback $fallback:ident => $ftoken:literal;
    ) => {
        $crate::codec::enums::wire_enum!(@define
            $(#[$meta])*
            $vis $name, $label,
            [
                $( $(#[$vmeta])* $variant => $token ),+ ,
                #[doc = "Token not defined by the protocol."]
                $fallback => $ftoken
            ],
            Some($name::$fallback)
        );
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $crate::codec::enums::wire_enum!(@define
            $(#[$meta])*
            $vis $name, $label,
            [ $( $(#[$vmeta])* $variant => $token ),+ ],
            None
        );
    };
}

pub(crate) use wire_enum;
