//! Helpers shared by the catalog tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::Value;
use xmltree::{Element, XMLNode};

use crate::codec::xml::{parse_document, write_document};
use crate::domain::{NetworkingNodeId, Outcome, ParseError, RequestId};
use crate::message::{Correlatable, Identifiable, Request, RequestContext, Response};

pub fn node() -> NetworkingNodeId {
    NetworkingNodeId::parse("CP001").unwrap()
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Context with fixed id and timestamp so independent decodes compare equal.
pub fn context() -> RequestContext {
    RequestContext::new(node())
        .with_request_id(RequestId::parse("req-1").unwrap())
        .with_timestamp(timestamp())
}

pub fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// JSON, XML element and XML text round trips all yield the same request.
pub fn assert_request_round_trip<R: Request>(request: &R) {
    let json = request.to_json(None);
    let from_json = R::try_parse_json(&json, request.envelope().to_context(), None).unwrap();
    assert_eq!(&from_json, request);

    let xml = request.to_xml(None);
    let from_xml = R::try_parse_xml(&xml, request.envelope().to_context(), None).unwrap();
    assert_eq!(&from_xml, request);

    let text = write_document(&xml).unwrap();
    let reparsed = parse_document(&text).unwrap();
    let from_text = R::try_parse_xml(&reparsed, request.envelope().to_context(), None).unwrap();
    assert_eq!(&from_text, request);
    assert_eq!(hash_of(&from_json), hash_of(&from_text));
}

/// Same as [`assert_request_round_trip`] for responses with an `Ok` outcome.
pub fn assert_response_round_trip<P: Response>(response: &P) {
    let json = response.to_json(None);
    let from_json = P::try_parse_json(&json, response.request().clone(), None).unwrap();
    assert_eq!(&from_json, response);

    let xml = response.to_xml(None);
    let from_xml = P::try_parse_xml(&xml, response.request().clone(), None).unwrap();
    assert_eq!(&from_xml, response);

    let text = write_document(&xml).unwrap();
    let reparsed = parse_document(&text).unwrap();
    let from_text = P::try_parse_xml(&reparsed, response.request().clone(), None).unwrap();
    assert_eq!(&from_text, response);
    assert_eq!(hash_of(&from_json), hash_of(&from_text));
}

fn without_json_field(document: &Value, name: &str) -> Value {
    let mut document = document.clone();
    if let Some(object) = document.as_object_mut() {
        object.remove(name);
    }
    document
}

fn without_xml_field(element: &Element, name: &str) -> Element {
    let mut element = element.clone();
    element
        .children
        .retain(|node| !matches!(node, XMLNode::Element(child) if child.name == name));
    element
}

fn assert_missing(err: &ParseError, name: &str) {
    assert!(
        matches!(err, ParseError::MissingField { .. }),
        "dropping {} gave {}",
        name,
        err
    );
    assert_eq!(err.field(), Some(name));
}

/// `valid` decodes; dropping any one of `mandatory` from it fails in both
/// encodings with a `MissingField` naming that field.
pub fn assert_request_requires<R: Request>(valid: &Value, mandatory: &[&str]) {
    let complete = R::try_parse_json(valid, context(), None).unwrap();
    let xml = complete.to_xml(None);
    for name in mandatory {
        let err = R::try_parse_json(&without_json_field(valid, name), context(), None).unwrap_err();
        assert_missing(&err, name);
        let err = R::try_parse_xml(&without_xml_field(&xml, name), context(), None).unwrap_err();
        assert_missing(&err, name);
    }
}

/// Response counterpart of [`assert_request_requires`]. Field names must be
/// the same in both encodings.
pub fn assert_response_requires<P: Response>(
    valid: &Value,
    request: Arc<P::Request>,
    mandatory: &[&str],
) {
    let complete = P::try_parse_json(valid, Arc::clone(&request), None).unwrap();
    let xml = complete.to_xml(None);
    for name in mandatory {
        let err = P::try_parse_json(&without_json_field(valid, name), Arc::clone(&request), None)
            .unwrap_err();
        assert_missing(&err, name);
        let err =
            P::try_parse_xml(&without_xml_field(&xml, name), Arc::clone(&request), None).unwrap_err();
        assert_missing(&err, name);
    }
}

/// `failed` answers the same request with a server fault.
pub fn assert_server_fault<P: Response>(response: &P, request: &Arc<P::Request>) {
    assert_eq!(response.outcome(), &Outcome::server_fault());
    assert!(Arc::ptr_eq(response.request(), request));
}
