//! Seraph — object mapping for REST graph databases
//!
//! Lets application code treat nodes, relationships, indexes and query results
//! of a remote graph store as plain Rust values.
//!
//! # Architecture
//!
//! - `mapping`: identifier codec and entity mapper (store JSON <-> `Node` / `Relationship`)
//! - `batch`: packs N operations into one batch request and restores input order
//! - `query`: relationship listing, result shape interpretation, predicate lookups
//! - `index`: secondary and label index management
//! - `client`: the `Seraph` facade; single-or-many inputs branch once here
//! - `http`: the `Transport` seam and its reqwest implementation
//!
//! Every operation is `async`, returns `SeraphResult<T>` and performs no
//! retries and no caching. Batches are all-or-nothing.
//!
//! ## Example Usage
//!
//! ```no_run
//! use seraph::{Node, Seraph, RelationshipQuery, Direction};
//!
//! # async fn demo() -> seraph::SeraphResult<()> {
//! let db = Seraph::new("http://localhost:7474")?;
//!
//! // Create nodes in one batch
//! let users = db
//!     .save_many(vec![Node::new().with("name", "Jon"), Node::new().with("name", "Helge")])
//!     .await?;
//!
//! // Link them
//! let link = db.rel().create(&users[0], "coworker", &users[1], None).await?;
//! assert_eq!(link.rel_type(), "coworker");
//!
//! // Outgoing relationships of Jon
//! let out = db
//!     .relationships_of(&users[0], &RelationshipQuery::default().direction(Direction::Out))
//!     .await?;
//! assert_eq!(out.len(), 1);
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod http;
pub mod index;
pub mod mapping;
pub mod query;

// Re-export main types for convenience
pub use client::{RelationshipApi, Seraph};
pub use config::ClientConfig;
pub use error::{SeraphError, SeraphResult};

pub use graph::{AsNodeId, Direction, Entity, Node, OneOrMany, Properties, Relationship};

pub use http::{HttpTransport, Method, Operation, Transport};

pub use index::{
    IndexConfig, IndexKind, IndexManager, IndexType, Indexable, SchemaIndex, SchemaIndexManager,
};

pub use query::{Cell, MatchMode, RawQueryResult, RelationshipQuery, Row};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
