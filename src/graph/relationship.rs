//! Relationship implementation for the client-side object model
//!
//! Start node, end node and type form a relationship's structural identity and
//! are read-only once the relationship exists; only properties may change.

use super::types::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed, directed relationship between two stored nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Store-assigned identity
    id: u64,

    /// Node the relationship goes FROM
    start: u64,

    /// Node the relationship goes TO
    end: u64,

    /// Relationship type (e.g. "knows", "coworker")
    #[serde(rename = "type")]
    rel_type: String,

    /// Properties associated with this relationship
    pub properties: Properties,
}

impl Relationship {
    pub(crate) fn new(
        id: u64,
        start: u64,
        end: u64,
        rel_type: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Relationship {
            id,
            start,
            end,
            rel_type: rel_type.into(),
            properties,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    /// Whether `node_id` is either endpoint
    pub fn touches(&self, node_id: u64) -> bool {
        self.start == node_id || self.end == node_id
    }

    /// The endpoint opposite to `node_id`, if `node_id` is an endpoint
    pub fn other_node(&self, node_id: u64) -> Option<u64> {
        if self.start == node_id {
            Some(self.end)
        } else if self.end == node_id {
            Some(self.start)
        } else {
            None
        }
    }

    /// Set a property value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let rel = Relationship::new(9, 1, 2, "coworker", Properties::new());
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({ "id": 9, "start": 1, "end": 2, "type": "coworker", "properties": {} })
        );
    }

    #[test]
    fn test_endpoints() {
        let rel = Relationship::new(9, 1, 2, "knows", Properties::new());
        assert!(rel.touches(1));
        assert!(!rel.touches(3));
        assert_eq!(rel.other_node(2), Some(1));
        assert_eq!(rel.other_node(5), None);
    }
}
