//! Result shape interpreter
//!
//! One tabular response format serves scalar projections, whole nodes, whole
//! relationships and any mix of them. Each cell is classified on its own, in a
//! fixed order:
//!
//! 1. node shape: `self` pointing at a node, a `data` object, no `start`/`end`/`type`
//! 2. relationship shape: `self` pointing at a relationship, plus `start`, `end`, `type`
//! 3. anything else passes through verbatim
//!
//! Rows then collapse to a bare cell for single-column results, or a
//! column-name mapping otherwise.

use crate::error::{SeraphError, SeraphResult};
use crate::graph::{Node, Relationship};
use crate::mapping::{resource_kind, to_node, to_relationship};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tabular result exactly as the store returned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQueryResult {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl RawQueryResult {
    pub fn from_response(response: Value) -> SeraphResult<Self> {
        serde_json::from_value(response)
            .map_err(|e| SeraphError::decode(format!("malformed query result: {}", e)))
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One reconstructed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Node(Node),
    Relationship(Relationship),
    Value(Value),
}

impl Cell {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Cell::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Cell::Relationship(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cell::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// One reconstructed row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    /// The only column of a single-column result
    Single(Cell),
    /// Column name to cell, in column order
    Named(IndexMap<String, Cell>),
}

impl Row {
    /// Cell of a named column; a single-column row has no names
    pub fn get(&self, column: &str) -> Option<&Cell> {
        match self {
            Row::Named(cells) => cells.get(column),
            Row::Single(_) => None,
        }
    }

    pub fn as_single(&self) -> Option<&Cell> {
        match self {
            Row::Single(cell) => Some(cell),
            Row::Named(_) => None,
        }
    }
}

fn self_kind(object: &serde_json::Map<String, Value>) -> Option<&str> {
    object.get("self").and_then(Value::as_str).and_then(resource_kind)
}

/// Whether a cell carries a node representation
pub fn is_node_shape(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    self_kind(object) == Some("node")
        && object.get("data").is_some_and(Value::is_object)
        && !["start", "end", "type"].iter().any(|k| object.contains_key(*k))
}

/// Whether a cell carries a relationship representation
pub fn is_relationship_shape(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    self_kind(object) == Some("relationship")
        && ["start", "end", "type"]
            .iter()
            .all(|k| object.get(*k).is_some_and(Value::is_string))
}

/// Classify and decode a single cell
pub fn decode_cell(value: Value) -> SeraphResult<Cell> {
    if is_node_shape(&value) {
        Ok(Cell::Node(to_node(&value)?))
    } else if is_relationship_shape(&value) {
        Ok(Cell::Relationship(to_relationship(&value)?))
    } else {
        Ok(Cell::Value(value))
    }
}

/// Decode every cell and collapse rows by column cardinality
pub fn interpret(raw: RawQueryResult) -> SeraphResult<Vec<Row>> {
    let RawQueryResult { columns, data } = raw;
    let mut rows = Vec::with_capacity(data.len());

    for (index, row) in data.into_iter().enumerate() {
        if row.len() != columns.len() {
            return Err(SeraphError::decode(format!(
                "row {} has {} cells for {} columns",
                index,
                row.len(),
                columns.len()
            )));
        }
        if columns.len() == 1 {
            let cell = row.into_iter().next().map(decode_cell).transpose()?;
            rows.push(Row::Single(cell.unwrap_or(Cell::Value(Value::Null))));
        } else {
            let cells = columns
                .iter()
                .cloned()
                .zip(row)
                .map(|(column, value)| Ok((column, decode_cell(value)?)))
                .collect::<SeraphResult<IndexMap<_, _>>>()?;
            rows.push(Row::Named(cells));
        }
    }

    Ok(rows)
}
