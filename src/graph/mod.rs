//! Client-side graph data model
//!
//! Plain owned values handed to and returned from the client:
//! - Nodes: store-assigned id plus a JSON property map
//! - Relationships: id, start/end node ids, type and properties
//! - `OneOrMany` for operations that accept a single item or a sequence

pub mod node;
pub mod relationship;
pub mod types;

// Re-export main types
pub use node::{Node, DEFAULT_ID_KEY};
pub use relationship::Relationship;
pub(crate) use types::node_ids;
pub use types::{AsNodeId, Direction, Entity, OneOrMany, Properties};
