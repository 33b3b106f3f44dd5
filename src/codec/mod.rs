//! Wire codec building blocks
//!
//! ```text
//!  JSON object ──► JsonObject ─┐                      ┌─► JsonBuilder ──► JSON object
//!                              ├─► WireValue / WireEnum ┤
//!  XML element ──► XmlElement ─┘                      └─► XmlBuilder  ──► XML element
//! ```
//!
//! - [`WireValue`]: conversion of a single field value to and from both
//!   encodings. JSON keeps native types (numbers, booleans), XML is text only.
//! - [`WireEnum`]: closed protocol enumerations with exact wire tokens.
//! - [`json`] / [`xml`]: field extractors with mandatory/optional policy and
//!   the matching document builders.
//! - [`hooks`]: custom parser/serializer injection points.

pub mod enums;
pub mod hooks;
pub mod json;
pub mod xml;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::domain::{BoundedString, HexDigest, IdentifierError, Mismatch, NetworkingNodeId};

pub use enums::WireEnum;
pub use hooks::{
    CustomCodecs, JsonParseHook, JsonSerializeHook, ParseHook, SerializeHook, XmlParseHook,
    XmlSerializeHook,
};
pub use json::{JsonBuilder, JsonObject};
pub use xml::{XmlBuilder, XmlElement};

/// A value that can be carried by a single wire field.
pub trait WireValue: Sized {
    /// Short description of the accepted shape, used in error reasons.
    fn expected() -> String;

    fn from_json(value: &Value) -> Result<Self, Mismatch>;

    fn to_json(&self) -> Value;

    fn from_xml_text(text: &str) -> Result<Self, Mismatch>;

    fn to_xml_text(&self) -> String;
}

const PREVIEW_CHARS: usize = 40;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{:?}…", head)
    } else {
        format!("{:?}", text)
    }
}

/// Render a JSON value for error reasons ("string \"abc\"", "number 5", ...).
pub(crate) fn describe_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {}", preview(s)),
        Value::Array(items) => format!("array of {} element(s)", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}

/// Render XML text content for error reasons.
pub(crate) fn describe_text(text: &str) -> String {
    format!("text {}", preview(text))
}

fn json_str<'v>(value: &'v Value, expected: impl FnOnce() -> String) -> Result<&'v str, Mismatch> {
    value
        .as_str()
        .ok_or_else(|| Mismatch::new(expected(), describe_json(value)))
}

fn invalid(expected: String, found: String, error: IdentifierError) -> Mismatch {
    Mismatch::new(expected, format!("{} ({})", found, error))
}

// ── Primitives ─────────────────────────────────────────────────

impl WireValue for String {
    fn expected() -> String {
        "string".to_string()
    }

    fn from_json(value: &Value) -> Result<Self, Mismatch> {
        json_str(value, Self::expected).map(str::to_string)
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
        Ok(text.to_string())
    }

    fn to_xml_text(&self) -> String {
        self.clone()
    }
}

impl WireValue for bool {
    fn expected() -> String {
        "boolean".to_string()
    }

    fn from_json(value: &Value) -> Result<Self, Mismatch> {
        value
            .as_bool()
            .ok_or_else(|| Mismatch::new(Self::expected(), describe_json(value)))
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    /// `xsd:boolean` lexical forms.
    fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(Mismatch::new(Self::expected(), describe_text(text))),
        }
    }

    fn to_xml_text(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_wire_value {
    ($ty:ty, $label:literal, $accessor:ident) => {
        impl WireValue for $ty {
            fn expected() -> String {
                $label.to_string()
            }

            fn from_json(value: &Value) -> Result<Self, Mismatch> {
                value
                    .$accessor()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| Mismatch::new(Self::expected(), describe_json(value)))
            }

            fn to_json(&self) -> Value {
                Value::from(*self)
            }

            fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
                text.trim()
                    .parse::<$ty>()
                    .map_err(|_| Mismatch::new(Self::expected(), describe_text(text)))
            }

            fn to_xml_text(&self) -> String {
                self.to_string()
            }
        }
    };
}

integer_wire_value!(u32, "unsigned 32-bit integer", as_u64);
integer_wire_value!(u64, "unsigned 64-bit integer", as_u64);
integer_wire_value!(i32, "signed 32-bit integer", as_i64);

impl WireValue for DateTime<Utc> {
    fn expected() -> String {
        "RFC 3339 timestamp".to_string()
    }

    fn from_json(value: &Value) -> Result<Self, Mismatch> {
        let text = json_str(value, Self::expected)?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| Mismatch::new(Self::expected(), describe_json(value)))
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_xml_text())
    }

    fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| Mismatch::new(Self::expected(), describe_text(text)))
    }

    /// Sub-second digits are only written when present, so decoding the
    /// output yields the same instant.
    fn to_xml_text(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

// ── Domain text types ──────────────────────────────────────────

impl<const N: usize> WireValue for BoundedString<N> {
    fn expected() -> String {
        format!("string of at most {} characters", N)
    }

    fn from_json(value: &Value) -> Result<Self, Mismatch> {
        let text = json_str(value, Self::expected)?;
        Self::parse(text).map_err(|e| invalid(Self::expected(), describe_json(value), e))
    }

    fn to_json(&self) -> Value {
        Value::String(self.as_str().to_string())
    }

    fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
        Self::parse(text).map_err(|e| invalid(Self::expected(), describe_text(text), e))
    }

    fn to_xml_text(&self) -> String {
        self.as_str().to_string()
    }
}

impl WireValue for HexDigest {
    fn expected() -> String {
        format!("hexadecimal string of at most {} characters", Self::MAX_LENGTH)
    }

    fn from_json(value: &Value) -> Result<Self, Mismatch> {
        let text = json_str(value, Self::expected)?;
        Self::parse(text).map_err(|e| invalid(Self::expected(), describe_json(value), e))
    }

    fn to_json(&self) -> Value {
        Value::String(self.as_str().to_string())
    }

    fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
        Self::parse(text.trim()).map_err(|e| invalid(Self::expected(), describe_text(text), e))
    }

    fn to_xml_text(&self) -> String {
        self.as_str().to_string()
    }
}

impl WireValue for NetworkingNodeId {
    fn expected() -> String {
        "networking node identifier".to_string()
    }

    fn from_json(value: &Value) -> Result<Self, Mismatch> {
        let text = json_str(value, Self::expected)?;
        Self::parse(text).map_err(|e| invalid(Self::expected(), describe_json(value), e))
    }

    fn to_json(&self) -> Value {
        Value::String(self.as_str().to_string())
    }

    fn from_xml_text(text: &str) -> Result<Self, Mismatch> {
        Self::parse(text.trim()).map_err(|e| invalid(Self::expected(), describe_text(text), e))
    }

    fn to_xml_text(&self) -> String {
        self.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CiString20;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn integers_are_exact() {
        assert_eq!(u32::from_json(&json!(7)), Ok(7));
        assert!(u32::from_json(&json!(7.5)).is_err());
        assert!(u32::from_json(&json!(-1)).is_err());
        assert!(u32::from_json(&json!(u64::from(u32::MAX) + 1)).is_err());
        assert!(u32::from_json(&json!("7")).is_err());
        assert_eq!(i32::from_xml_text(" -3 "), Ok(-3));
        assert!(i32::from_xml_text("3.0").is_err());
    }

    #[test]
    fn mismatch_reports_found_shape() {
        let err = u32::from_json(&json!("seven")).unwrap_err();
        assert_eq!(err.expected, "unsigned 32-bit integer");
        assert_eq!(err.found, "string \"seven\"");
    }

    #[test]
    fn xml_booleans() {
        assert_eq!(bool::from_xml_text("true"), Ok(true));
        assert_eq!(bool::from_xml_text("0"), Ok(false));
        assert!(bool::from_xml_text("TRUE").is_err());
        assert_eq!(true.to_xml_text(), "true");
    }

    #[test]
    fn timestamps_keep_sub_second_precision() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::microseconds(123_456);
        let text = ts.to_xml_text();
        assert_eq!(text, "2024-01-02T03:04:05.123456Z");
        assert_eq!(DateTime::<Utc>::from_xml_text(&text), Ok(ts));
        assert_eq!(DateTime::<Utc>::from_json(&ts.to_json()), Ok(ts));
    }

    #[test]
    fn timestamps_accept_offsets() {
        let parsed = DateTime::<Utc>::from_json(&json!("2024-01-02T05:04:05+02:00")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn bounded_string_reason_mentions_limit() {
        let err = CiString20::from_json(&json!("a".repeat(21))).unwrap_err();
        assert_eq!(err.expected, "string of at most 20 characters");
        assert!(err.found.contains("exceeds 20 characters"));
    }

    #[test]
    fn long_values_are_truncated_in_reasons() {
        let found = describe_json(&json!("x".repeat(100)));
        assert!(found.ends_with('…'));
        assert!(found.len() < 60);
    }
}
