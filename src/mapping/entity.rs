//! Entity mapper
//!
//! Converts the store's JSON representations into `Node` / `Relationship`
//! values and builds request bodies from them. Store metadata (`self`,
//! `traverse`, `outgoing_relationships`, ...) is dropped; only the identity
//! and the `data` mapping survive.

use super::id::{id_from_uri, uri_from_id};
use crate::config::ClientConfig;
use crate::error::{SeraphError, SeraphResult};
use crate::graph::{Node, Properties, Relationship};
use serde_json::{json, Value};

fn field<'a>(raw: &'a Value, name: &str, what: &str) -> SeraphResult<&'a str> {
    raw.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| SeraphError::decode(format!("{} response has no {:?} field", what, name)))
}

fn data(raw: &Value, what: &str) -> SeraphResult<Properties> {
    match raw.get("data") {
        None | Some(Value::Null) => Ok(Properties::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(SeraphError::decode(format!(
            "{} data must be an object, got {}",
            what, other
        ))),
    }
}

/// Decode a node representation
pub fn to_node(raw: &Value) -> SeraphResult<Node> {
    let id = id_from_uri(field(raw, "self", "node")?)?;
    Ok(Node::with_properties(data(raw, "node")?).identified(id))
}

/// Decode a relationship representation
pub fn to_relationship(raw: &Value) -> SeraphResult<Relationship> {
    let id = id_from_uri(field(raw, "self", "relationship")?)?;
    let start = id_from_uri(field(raw, "start", "relationship")?)?;
    let end = id_from_uri(field(raw, "end", "relationship")?)?;
    let rel_type = field(raw, "type", "relationship")?;
    Ok(Relationship::new(id, start, end, rel_type, data(raw, "relationship")?))
}

/// Request body for creating or updating a node: the properties only
pub fn from_node(node: &Node) -> Value {
    Value::Object(node.properties.clone())
}

/// A validated relationship creation request
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRequest {
    pub start: u64,
    pub end: u64,
    pub rel_type: String,
    pub properties: Properties,
}

impl RelationshipRequest {
    /// Creation endpoint, relative to the API root
    pub fn path(&self) -> String {
        uri_from_id("node/{id}/relationships", self.start)
    }

    /// Body naming the end node by its absolute self-reference
    pub fn body(&self, config: &ClientConfig) -> Value {
        json!({
            "to": config.resource_uri("node", self.end),
            "type": self.rel_type,
            "data": self.properties,
        })
    }
}

/// Validate and build a relationship creation request
pub fn from_relationship(
    start: u64,
    rel_type: &str,
    end: u64,
    properties: Option<Properties>,
) -> SeraphResult<RelationshipRequest> {
    if rel_type.is_empty() {
        return Err(SeraphError::validation("relationship type must be a non-empty string"));
    }
    Ok(RelationshipRequest {
        start,
        end,
        rel_type: rel_type.to_string(),
        properties: properties.unwrap_or_default(),
    })
}
