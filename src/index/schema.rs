//! Label indexes: a label plus the property keys indexed under it

use crate::client::Seraph;
use crate::error::{SeraphError, SeraphResult};
use crate::graph::OneOrMany;
use crate::http::Operation;
use crate::query::traversal::encode_segment;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// A label index as the store reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIndex {
    pub label: String,
    #[serde(default)]
    pub property_keys: Vec<String>,
}

/// Label index operations, reached through [`Seraph::schema_index`]
#[derive(Clone, Copy)]
pub struct SchemaIndexManager<'a> {
    db: &'a Seraph,
}

impl std::fmt::Debug for SchemaIndexManager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaIndexManager").finish_non_exhaustive()
    }
}

fn label_path(label: &str) -> SeraphResult<String> {
    if label.is_empty() {
        return Err(SeraphError::validation("index label must not be empty"));
    }
    Ok(format!("schema/index/{}", encode_segment(label)))
}

fn create_operation(label: &str, keys: Vec<String>) -> SeraphResult<Operation> {
    if keys.is_empty() || keys.iter().any(String::is_empty) {
        return Err(SeraphError::validation(
            "a label index needs at least one non-empty property key",
        ));
    }
    Ok(Operation::post(label_path(label)?, json!({ "property_keys": keys })))
}

impl<'a> SchemaIndexManager<'a> {
    pub(crate) fn new(db: &'a Seraph) -> Self {
        Self { db }
    }

    /// Index `label` on one property key or several
    pub async fn create(
        &self,
        label: &str,
        keys: impl Into<OneOrMany<String>>,
    ) -> SeraphResult<SchemaIndex> {
        let keys: OneOrMany<String> = keys.into();
        let operation = create_operation(label, keys.into_vec())?;
        debug!("Creating label index on {}", label);
        let response = self.db.transport().request(&operation).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Indexes declared on `label`
    pub async fn list(&self, label: &str) -> SeraphResult<Vec<SchemaIndex>> {
        let response = self
            .db
            .transport()
            .request(&Operation::get(label_path(label)?))
            .await?;
        match response {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => Ok(serde_json::from_value(response)?),
            other => Err(SeraphError::decode(format!(
                "label index listing must be an array, got {}",
                other
            ))),
        }
    }

    /// Drop the index on `label` for one property key
    pub async fn delete(&self, label: &str, key: &str) -> SeraphResult<()> {
        if key.is_empty() {
            return Err(SeraphError::validation("index key must not be empty"));
        }
        let path = format!("{}/{}", label_path(label)?, encode_segment(key));
        self.db.transport().request(&Operation::delete(path)).await?;
        Ok(())
    }
}
