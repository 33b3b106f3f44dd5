//! JSON field extraction and emission
//!
//! [`JsonObject`] reads fields out of an OCPP-J payload object. `null` is
//! treated like an absent field: a mandatory `null` is missing, an optional
//! `null` is `None`. Nested objects and arrays carry their path so reasons
//! read like `configurationKey[1].key`.

use serde_json::{Map, Value};

use super::{describe_json, WireValue};
use crate::domain::{Mismatch, ParseError, ParseResult};

/// Read-only view of a JSON object with field extraction helpers.
#[derive(Debug, Clone)]
pub struct JsonObject<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> JsonObject<'a> {
    /// View a document root. Anything but an object is rejected.
    pub fn root(value: &'a Value, expected: &str) -> ParseResult<Self> {
        match value.as_object() {
            Some(map) => Ok(Self {
                map,
                path: String::new(),
            }),
            None => Err(ParseError::UnexpectedElement {
                expected: format!("JSON object ({})", expected),
                found: describe_json(value),
            }),
        }
    }

    /// Path of this object inside the document (`""` for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    fn path_of(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|value| !value.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn mandatory<T: WireValue>(&self, name: &str) -> ParseResult<T> {
        self.mandatory_with(name, T::expected, T::from_json)
    }

    pub fn optional<T: WireValue>(&self, name: &str) -> ParseResult<Option<T>> {
        self.optional_with(name, T::from_json)
    }

    /// Mandatory field with a custom conversion.
    pub fn mandatory_with<T>(
        &self,
        name: &str,
        expected: impl FnOnce() -> String,
        convert: impl FnOnce(&Value) -> Result<T, Mismatch>,
    ) -> ParseResult<T> {
        match self.get(name) {
            Some(value) => convert(value).map_err(|m| ParseError::malformed(self.path_of(name), m)),
            None => Err(ParseError::missing(self.path_of(name), expected())),
        }
    }

    /// Optional field with a custom conversion. A present value that fails
    /// conversion is an error, never `None`.
    pub fn optional_with<T>(
        &self,
        name: &str,
        convert: impl FnOnce(&Value) -> Result<T, Mismatch>,
    ) -> ParseResult<Option<T>> {
        self.get(name)
            .map(|value| convert(value).map_err(|m| ParseError::malformed(self.path_of(name), m)))
            .transpose()
    }

    pub fn mandatory_object(&self, name: &str) -> ParseResult<JsonObject<'a>> {
        match self.get(name) {
            Some(value) => self.nested(name, value),
            None => Err(ParseError::missing(self.path_of(name), "object")),
        }
    }

    pub fn optional_object(&self, name: &str) -> ParseResult<Option<JsonObject<'a>>> {
        self.get(name).map(|value| self.nested(name, value)).transpose()
    }

    fn nested(&self, name: &str, value: &'a Value) -> ParseResult<JsonObject<'a>> {
        let path = self.path_of(name);
        match value.as_object() {
            Some(map) => Ok(JsonObject { map, path }),
            None => Err(ParseError::malformed(
                path,
                Mismatch::new("object", describe_json(value)),
            )),
        }
    }

    fn array(&self, name: &str) -> ParseResult<Option<&'a Vec<Value>>> {
        self.get(name)
            .map(|value| {
                value.as_array().ok_or_else(|| {
                    ParseError::malformed(
                        self.path_of(name),
                        Mismatch::new("array", describe_json(value)),
                    )
                })
            })
            .transpose()
    }

    /// Optional array of scalar values, in document order.
    pub fn optional_list<T: WireValue>(&self, name: &str) -> ParseResult<Option<Vec<T>>> {
        let Some(items) = self.array(name)? else {
            return Ok(None);
        };
        let base = self.path_of(name);
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_json(item)
                    .map_err(|m| ParseError::malformed(format!("{}[{}]", base, index), m))
            })
            .collect::<ParseResult<Vec<T>>>()
            .map(Some)
    }

    /// Optional array of objects, in document order.
    pub fn optional_objects(&self, name: &str) -> ParseResult<Option<Vec<JsonObject<'a>>>> {
        let Some(items) = self.array(name)? else {
            return Ok(None);
        };
        let base = self.path_of(name);
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let path = format!("{}[{}]", base, index);
                match item.as_object() {
                    Some(map) => Ok(JsonObject { map, path }),
                    None => Err(ParseError::malformed(
                        path,
                        Mismatch::new("object", describe_json(item)),
                    )),
                }
            })
            .collect::<ParseResult<Vec<_>>>()
            .map(Some)
    }
}

/// Builds a JSON payload object field by field.
#[derive(Debug, Default)]
pub struct JsonBuilder {
    map: Map<String, Value>,
}

impl JsonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<T: WireValue>(mut self, name: &str, value: &T) -> Self {
        self.map.insert(name.to_string(), value.to_json());
        self
    }

    /// Absent values are omitted, never written as `null`.
    pub fn optional<T: WireValue>(self, name: &str, value: Option<&T>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Already-built nested value (object or array).
    pub fn value(mut self, name: &str, value: Value) -> Self {
        self.map.insert(name.to_string(), value);
        self
    }

    /// Array of scalars; omitted when empty.
    pub fn list<'v, T: WireValue + 'v>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = &'v T>,
    ) -> Self {
        let items: Vec<Value> = values.into_iter().map(WireValue::to_json).collect();
        if !items.is_empty() {
            self.map.insert(name.to_string(), Value::Array(items));
        }
        self
    }

    /// Array of already-built objects; omitted when empty.
    pub fn objects(mut self, name: &str, values: Vec<Value>) -> Self {
        if !values.is_empty() {
            self.map.insert(name.to_string(), Value::Array(values));
        }
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}

/// Read a JSON document from text.
pub fn parse_document(text: &str) -> ParseResult<Value> {
    serde_json::from_str(text).map_err(|e| ParseError::InvalidDocument {
        format: "JSON",
        reason: e.to_string(),
    })
}
