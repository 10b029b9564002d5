//! Node implementation for the client-side object model
//!
//! A node is an optional store-assigned id plus a property mapping. The id is
//! kept apart from the properties: it is never sent in a request body and never
//! appears as an ordinary property.

use super::types::Properties;
use crate::error::{SeraphError, SeraphResult};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Key that carries the id in the flat object form of a node
pub const DEFAULT_ID_KEY: &str = "id";

/// A node in the property graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Store-assigned identity, `None` until first saved
    id: Option<u64>,

    /// Properties associated with this node
    pub properties: Properties,
}

impl Node {
    /// Create an unsaved node with no properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unsaved node from a property mapping
    pub fn with_properties(properties: Properties) -> Self {
        Node {
            id: None,
            properties,
        }
    }

    /// Split a flat object into identity and properties.
    ///
    /// If `id_key` is present it must hold a non-negative integer; it becomes
    /// the node's id and is removed from the properties.
    pub fn from_object(mut object: Properties, id_key: &str) -> SeraphResult<Self> {
        let id = match object.remove(id_key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) if n.as_u64().is_some() => n.as_u64(),
            Some(other) => {
                return Err(SeraphError::validation(format!(
                    "{:?} must be a non-negative integer, got {}",
                    id_key, other
                )))
            }
        };
        Ok(Node {
            id,
            properties: object,
        })
    }

    /// Flat object form: the id under `id_key` followed by all properties
    pub fn to_object(&self, id_key: &str) -> Properties {
        let mut object = Properties::new();
        if let Some(id) = self.id {
            object.insert(id_key.to_string(), Value::from(id));
        }
        for (k, v) in &self.properties {
            object.insert(k.clone(), v.clone());
        }
        object
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Whether the node has been persisted
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Attach the id decoded from a store response
    pub(crate) fn identified(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder-style property setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
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

    /// Convenience accessor for string properties
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.properties.len() + usize::from(self.id.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(id) = self.id {
            map.serialize_entry(DEFAULT_ID_KEY, &id)?;
        }
        for (k, v) in &self.properties {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Properties::deserialize(deserializer)?;
        Node::from_object(object, DEFAULT_ID_KEY).map_err(de::Error::custom)
    }
}

impl TryFrom<Value> for Node {
    type Error = SeraphError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => Node::from_object(object, DEFAULT_ID_KEY),
            other => Err(SeraphError::validation(format!(
                "a node must be a JSON object, got {}",
                other
            ))),
        }
    }
}
