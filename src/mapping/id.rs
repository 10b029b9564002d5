//! Identifier codec
//!
//! The store identifies every entity by a self-referencing URI whose last path
//! segment is the numeric id, e.g. `http://localhost:7474/db/data/node/12`.

use crate::error::{SeraphError, SeraphResult};

/// Placeholder substituted by [`uri_from_id`]
pub const ID_PLACEHOLDER: &str = "{id}";

fn segments(uri: &str) -> impl Iterator<Item = &str> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    path.trim_end_matches('/').rsplit('/')
}

/// Decode the id from the trailing segment of a self-reference
pub fn id_from_uri(uri: &str) -> SeraphResult<u64> {
    let last = segments(uri).next().unwrap_or_default();
    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SeraphError::malformed_reference(format!(
            "no numeric id at the end of {:?}",
            uri
        )));
    }
    last.parse::<u64>()
        .map_err(|e| SeraphError::malformed_reference(format!("{:?}: {}", uri, e)))
}

/// Embed an id into a path template.
///
/// `node/{id}/properties` becomes `node/12/properties`; a template without a
/// placeholder gets the id appended as a new segment.
pub fn uri_from_id(template: &str, id: u64) -> String {
    if template.contains(ID_PLACEHOLDER) {
        template.replace(ID_PLACEHOLDER, &id.to_string())
    } else if template.is_empty() || template.ends_with('/') {
        format!("{}{}", template, id)
    } else {
        format!("{}/{}", template, id)
    }
}

/// Segment naming the resource collection of a self-reference (`node`, `relationship`)
pub fn resource_kind(uri: &str) -> Option<&str> {
    let mut rev = segments(uri);
    let last = rev.next()?;
    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rev.next().filter(|kind| !kind.is_empty())
}
