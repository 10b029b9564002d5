//! Translation between store representations and the client object model
//!
//! - `id`: numeric identity <-> self-referencing URI
//! - `entity`: JSON node/relationship representations <-> `Node` / `Relationship`

pub mod entity;
pub mod id;

pub use entity::{
    from_node, from_relationship, to_node, to_relationship, RelationshipRequest,
};
pub use id::{id_from_uri, resource_kind, uri_from_id};
