//! Relationship query builder
//!
//! Lists the relationships of a node through
//! `node/{id}/relationships/{in|out|all}[/{type1&type2...}]`.

use crate::error::{SeraphError, SeraphResult};
use crate::graph::{Direction, Relationship};
use crate::http::Operation;
use crate::mapping::{to_relationship, uri_from_id};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a value for use as one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Direction and type filter for listing a node's relationships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipQuery {
    pub direction: Direction,
    /// Empty means every type
    pub types: Vec<String>,
}

impl RelationshipQuery {
    pub fn new<I, S>(direction: Direction, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RelationshipQuery {
            direction,
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_type(mut self, rel_type: impl Into<String>) -> Self {
        self.types.push(rel_type.into());
        self
    }

    pub fn validate(&self) -> SeraphResult<()> {
        if self.types.iter().any(String::is_empty) {
            return Err(SeraphError::validation(
                "relationship type filter must not contain empty names",
            ));
        }
        Ok(())
    }

    /// Listing path for one node, relative to the API root
    pub fn path_for(&self, node_id: u64) -> SeraphResult<String> {
        self.validate()?;
        let mut path = format!(
            "{}/{}",
            uri_from_id("node/{id}/relationships", node_id),
            self.direction.as_str()
        );
        if !self.types.is_empty() {
            let types: Vec<String> = self.types.iter().map(|t| encode_segment(t)).collect();
            path.push('/');
            path.push_str(&types.join("&"));
        }
        Ok(path)
    }

    pub fn operation_for(&self, node_id: u64) -> SeraphResult<Operation> {
        Ok(Operation::get(self.path_for(node_id)?))
    }

    /// Decode a listing response, keeping the store's order
    pub fn decode(response: Value) -> SeraphResult<Vec<Relationship>> {
        match response {
            Value::Array(items) => items.iter().map(to_relationship).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(SeraphError::decode(format!(
                "relationship listing must be an array, got {}",
                other
            ))),
        }
    }
}
