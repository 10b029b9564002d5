//! Query support
//!
//! The query language is opaque to the client: a query string and its named
//! parameters are posted as-is. What this module interprets is the *shape* of
//! the answer and the requests that read relationships:
//! - `result`: tabular results, cell decoding and row collapsing
//! - `traversal`: relationship listing by direction and type
//! - `predicate`: property-equality lookups built as parameterised queries

pub mod predicate;
pub mod result;
pub mod traversal;

// Re-export main types
pub use predicate::{find_query, MatchMode};
pub use result::{decode_cell, interpret, Cell, RawQueryResult, Row};
pub use traversal::RelationshipQuery;

use crate::graph::Properties;
use crate::http::Operation;
use serde_json::{json, Value};

/// Path of the query endpoint relative to the API root
pub const QUERY_PATH: &str = "cypher";

/// Request executing `query` with named parameters
pub fn query_operation(query: &str, params: Option<&Properties>) -> Operation {
    let params = params.cloned().map(Value::Object).unwrap_or_else(|| json!({}));
    Operation::post(QUERY_PATH, json!({ "query": query, "params": params }))
}
