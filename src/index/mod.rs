//! Secondary index support
//!
//! Store indexes map (key, value) pairs to nodes or relationships. An index's
//! target kind is fixed when it is created and decides which entities may be
//! added to it. Label indexes instead declare the property keys the store
//! indexes automatically for every node carrying the label.

pub mod manager;
pub mod schema;

pub use manager::IndexManager;
pub use schema::{SchemaIndex, SchemaIndexManager};

use crate::error::{SeraphError, SeraphResult};
use crate::graph::{Entity, Node, Relationship};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity kind an index holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Node,
    Relationship,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Node => "node",
            IndexKind::Relationship => "relationship",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexKind {
    type Err = SeraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(IndexKind::Node),
            "relationship" => Ok(IndexKind::Relationship),
            other => Err(SeraphError::InvalidIndexTarget(other.to_string())),
        }
    }
}

/// Matching strategy of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    #[default]
    Exact,
    Fulltext,
}

/// Index configuration sent on creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(rename = "type")]
    pub index_type: IndexType,
    pub provider: String,
}

impl IndexConfig {
    pub fn exact() -> Self {
        IndexConfig {
            index_type: IndexType::Exact,
            provider: "lucene".to_string(),
        }
    }

    pub fn fulltext() -> Self {
        IndexConfig {
            index_type: IndexType::Fulltext,
            provider: "lucene".to_string(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::exact()
    }
}

/// Something that can be stored in an index
pub trait Indexable {
    fn index_kind(&self) -> IndexKind;

    /// Id of the stored entity
    fn index_id(&self) -> SeraphResult<u64>;
}

impl Indexable for Node {
    fn index_kind(&self) -> IndexKind {
        IndexKind::Node
    }

    fn index_id(&self) -> SeraphResult<u64> {
        self.id()
            .ok_or_else(|| SeraphError::validation("cannot index a node that has not been saved"))
    }
}

impl Indexable for Relationship {
    fn index_kind(&self) -> IndexKind {
        IndexKind::Relationship
    }

    fn index_id(&self) -> SeraphResult<u64> {
        Ok(self.id())
    }
}

impl Indexable for Entity {
    fn index_kind(&self) -> IndexKind {
        match self {
            Entity::Node(node) => node.index_kind(),
            Entity::Relationship(rel) => rel.index_kind(),
        }
    }

    fn index_id(&self) -> SeraphResult<u64> {
        match self {
            Entity::Node(node) => node.index_id(),
            Entity::Relationship(rel) => rel.index_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parse() {
        assert_eq!("node".parse::<IndexKind>().unwrap(), IndexKind::Node);
        assert_eq!("relationship".parse::<IndexKind>().unwrap(), IndexKind::Relationship);

        let err = "crazyType".parse::<IndexKind>().unwrap_err();
        assert!(matches!(err, SeraphError::InvalidIndexTarget(ref t) if t == "crazyType"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_config_shape() {
        assert_eq!(
            serde_json::to_value(IndexConfig::fulltext()).unwrap(),
            json!({ "type": "fulltext", "provider": "lucene" })
        );
        assert_eq!(IndexConfig::default().index_type, IndexType::Exact);
    }

    #[test]
    fn test_unsaved_node_not_indexable() {
        assert!(Node::new().index_id().unwrap_err().is_validation());
    }
}
