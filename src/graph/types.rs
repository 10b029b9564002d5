//! Core type definitions shared by the client operations

use super::node::Node;
use super::relationship::Relationship;
use crate::error::{SeraphError, SeraphResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Property mapping of a node or relationship
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A single item or an ordered sequence of items
///
/// Every CRUD operation accepts either form and answers in the same form:
/// `One` in gives `One` out, `Many` in gives `Many` out with positions preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single item, or `None` for the sequence form
    pub fn one(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(_) => None,
        }
    }

    /// The sequence, or `None` for the single form
    pub fn many(self) -> Option<Vec<T>> {
        match self {
            OneOrMany::One(_) => None,
            OneOrMany::Many(items) => Some(items),
        }
    }

    /// Flatten either form into a vector
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> OneOrMany<U> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

impl<T: Clone> From<&[T]> for OneOrMany<T> {
    fn from(items: &[T]) -> Self {
        OneOrMany::Many(items.to_vec())
    }
}

macro_rules! impl_one {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OneOrMany<$ty> {
                fn from(item: $ty) -> Self {
                    OneOrMany::One(item)
                }
            }
        )*
    };
}

impl_one!(Node, Relationship, Entity, u64, String);

impl From<&str> for OneOrMany<String> {
    fn from(item: &str) -> Self {
        OneOrMany::One(item.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(items: Vec<&str>) -> Self {
        OneOrMany::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&Node> for OneOrMany<Node> {
    fn from(node: &Node) -> Self {
        OneOrMany::One(node.clone())
    }
}

impl From<&Relationship> for OneOrMany<Relationship> {
    fn from(rel: &Relationship) -> Self {
        OneOrMany::One(rel.clone())
    }
}

/// Traversal direction relative to the queried node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Queried node is the end node
    In,
    /// Queried node is the start node
    Out,
    /// No directional restriction
    #[default]
    All,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::All => "all",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SeraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "all" => Ok(Direction::All),
            other => Err(SeraphError::validation(format!(
                "unknown direction {:?} (expected in, out or all)",
                other
            ))),
        }
    }
}

/// A node or relationship read back from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Node(Node),
    Relationship(Relationship),
}

impl Entity {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Entity::Node(node) => Some(node),
            Entity::Relationship(_) => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Entity::Relationship(rel) => Some(rel),
            Entity::Node(_) => None,
        }
    }
}

/// Anything that resolves to a stored node's id: a raw id or a saved `Node`
pub trait AsNodeId {
    fn as_node_id(&self) -> SeraphResult<u64>;
}

impl AsNodeId for u64 {
    fn as_node_id(&self) -> SeraphResult<u64> {
        Ok(*self)
    }
}

impl AsNodeId for Node {
    fn as_node_id(&self) -> SeraphResult<u64> {
        self.id()
            .ok_or_else(|| SeraphError::validation("node has not been saved and has no id"))
    }
}

impl<T: AsNodeId + ?Sized> AsNodeId for &T {
    fn as_node_id(&self) -> SeraphResult<u64> {
        (**self).as_node_id()
    }
}

/// Resolve every node to its id, failing on the first unsaved one
pub(crate) fn node_ids<N: AsNodeId>(nodes: &[N]) -> SeraphResult<Vec<u64>> {
    nodes.iter().map(AsNodeId::as_node_id).collect()
}
