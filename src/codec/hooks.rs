//! Custom parser and serializer hooks
//!
//! A hook post-processes one message type without touching its codec:
//! a parse hook receives the source document and the default-decoded message
//! and returns the message to hand out; a serialize hook receives the message
//! and the default-built document and returns the document to send.
//!
//! Hooks run exactly once, after the default decode/encode, from the
//! provided `try_parse_*` / `to_*` methods of [`Request`](crate::message::Request)
//! and [`Response`](crate::message::Response). Their result is authoritative.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use xmltree::Element;

use crate::domain::{ParseError, ParseResult};

type ParseFn<M, D> = dyn Fn(&D, M) -> Result<M, String> + Send + Sync;
type SerializeFn<M, D> = dyn Fn(&M, D) -> D + Send + Sync;

/// Post-processor for decoded messages of type `M` read from documents `D`.
pub struct ParseHook<M, D> {
    inner: Arc<ParseFn<M, D>>,
}

impl<M, D> ParseHook<M, D> {
    pub fn new(hook: impl Fn(&D, M) -> Result<M, String> + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(hook),
        }
    }

    /// An `Err` from the hook becomes [`ParseError::Mapping`].
    pub(crate) fn apply(&self, action: &'static str, source: &D, decoded: M) -> ParseResult<M> {
        (self.inner)(source, decoded).map_err(|reason| ParseError::Mapping { action, reason })
    }
}

impl<M, D> Clone for ParseHook<M, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, D> fmt::Debug for ParseHook<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParseHook")
    }
}

/// Post-processor for documents `D` built from messages of type `M`.
pub struct SerializeHook<M, D> {
    inner: Arc<SerializeFn<M, D>>,
}

impl<M, D> SerializeHook<M, D> {
    pub fn new(hook: impl Fn(&M, D) -> D + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(hook),
        }
    }

    pub(crate) fn apply(&self, message: &M, built: D) -> D {
        (self.inner)(message, built)
    }
}

impl<M, D> Clone for SerializeHook<M, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, D> fmt::Debug for SerializeHook<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerializeHook")
    }
}

pub type JsonParseHook<M> = ParseHook<M, Value>;
pub type XmlParseHook<M> = ParseHook<M, Element>;
pub type JsonSerializeHook<M> = SerializeHook<M, Value>;
pub type XmlSerializeHook<M> = SerializeHook<M, Element>;

/// The full set of hooks for one message type, for callers that keep them
/// configured in one place (e.g. the exchange correlator).
#[derive(Debug)]
pub struct CustomCodecs<M> {
    pub json_parser: Option<JsonParseHook<M>>,
    pub xml_parser: Option<XmlParseHook<M>>,
    pub json_serializer: Option<JsonSerializeHook<M>>,
    pub xml_serializer: Option<XmlSerializeHook<M>>,
}

impl<M> CustomCodecs<M> {
    pub fn none() -> Self {
        Self {
            json_parser: None,
            xml_parser: None,
            json_serializer: None,
            xml_serializer: None,
        }
    }

    pub fn with_json_parser(mut self, hook: JsonParseHook<M>) -> Self {
        self.json_parser = Some(hook);
        self
    }

    pub fn with_xml_parser(mut self, hook: XmlParseHook<M>) -> Self {
        self.xml_parser = Some(hook);
        self
    }

    pub fn with_json_serializer(mut self, hook: JsonSerializeHook<M>) -> Self {
        self.json_serializer = Some(hook);
        self
    }

    pub fn with_xml_serializer(mut self, hook: XmlSerializeHook<M>) -> Self {
        self.xml_serializer = Some(hook);
        self
    }
}

impl<M> Default for CustomCodecs<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> Clone for CustomCodecs<M> {
    fn clone(&self) -> Self {
        Self {
            json_parser: self.json_parser.clone(),
            xml_parser: self.xml_parser.clone(),
            json_serializer: self.json_serializer.clone(),
            xml_serializer: self.xml_serializer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_hook_errors_become_mapping_errors() {
        let hook: JsonParseHook<u32> = ParseHook::new(|_, _| Err("rejected".into()));
        let err = hook.apply("Reset", &json!({}), 1).unwrap_err();
        assert_eq!(
            err,
            ParseError::Mapping {
                action: "Reset",
                reason: "rejected".into()
            }
        );
    }

    #[test]
    fn parse_hook_sees_source_document() {
        let hook: JsonParseHook<u32> = ParseHook::new(|source: &Value, decoded| {
            Ok(decoded + source["bonus"].as_u64().unwrap_or(0) as u32)
        });
        assert_eq!(hook.apply("Reset", &json!({"bonus": 2}), 1), Ok(3));
    }

    #[test]
    fn serialize_hook_result_is_authoritative() {
        let hook: JsonSerializeHook<u32> =
            SerializeHook::new(|message, mut built: Value| {
                built["vendorExtension"] = json!(message);
                built
            });
        assert_eq!(
            hook.apply(&7, json!({"status": "Accepted"})),
            json!({"status": "Accepted", "vendorExtension": 7})
        );
    }

    #[test]
    fn clones_share_the_hook() {
        let codecs = CustomCodecs::<u32>::none()
            .with_json_serializer(SerializeHook::new(|_, built| built));
        let cloned = codecs.clone();
        assert!(cloned.json_serializer.is_some());
        assert!(cloned.json_parser.is_none());
    }
}
