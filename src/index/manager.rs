//! Manager for store indexes
//!
//! Handles creation, deletion, listing, entry insertion and lookup for the
//! indexes of one target kind.

use super::{IndexConfig, IndexKind, Indexable};
use crate::batch::run_batch;
use crate::client::Seraph;
use crate::error::{SeraphError, SeraphResult};
use crate::graph::{Entity, OneOrMany};
use crate::http::Operation;
use crate::mapping::{to_node, to_relationship};
use crate::query::traversal::encode_segment;
use serde_json::{json, Value};
use tracing::debug;

/// Index operations bound to a client and a target kind
#[derive(Clone, Copy)]
pub struct IndexManager<'a> {
    db: &'a Seraph,
    kind: IndexKind,
}

impl std::fmt::Debug for IndexManager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl<'a> IndexManager<'a> {
    pub(crate) fn new(db: &'a Seraph, kind: IndexKind) -> Self {
        Self { db, kind }
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    fn collection_path(&self) -> String {
        format!("index/{}", self.kind)
    }

    fn index_path(&self, name: &str) -> String {
        format!("index/{}/{}", self.kind, encode_segment(name))
    }

    fn create_operation(
        &self,
        name: &str,
        config: Option<&IndexConfig>,
    ) -> SeraphResult<Operation> {
        if name.is_empty() {
            return Err(SeraphError::validation("index name must not be empty"));
        }
        let mut body = json!({ "name": name });
        if let Some(config) = config {
            body["config"] = serde_json::to_value(config)?;
        }
        Ok(Operation::post(self.collection_path(), body))
    }

    /// Create one index, or several in a single batch.
    ///
    /// Without a config the store's default (exact-match) index is created.
    pub async fn create(
        &self,
        names: impl Into<OneOrMany<String>>,
        config: Option<&IndexConfig>,
    ) -> SeraphResult<()> {
        match names.into() {
            OneOrMany::One(name) => {
                let operation = self.create_operation(&name, config)?;
                debug!("Creating {} index {}", self.kind, name);
                self.db.transport().request(&operation).await?;
                Ok(())
            }
            OneOrMany::Many(names) => {
                let operations = names
                    .iter()
                    .map(|name| self.create_operation(name, config))
                    .collect::<SeraphResult<Vec<_>>>()?;
                debug!("Creating {} {} indexes", names.len(), self.kind);
                run_batch(self.db.transport(), operations, |_, _| Ok(())).await?;
                Ok(())
            }
        }
    }

    /// Names of the existing indexes of this kind
    pub async fn list(&self) -> SeraphResult<Vec<String>> {
        let response = self
            .db
            .transport()
            .request(&Operation::get(self.collection_path()))
            .await?;
        match response {
            Value::Null => Ok(Vec::new()),
            Value::Object(indexes) => Ok(indexes.keys().cloned().collect()),
            other => Err(SeraphError::decode(format!(
                "index listing must be an object, got {}",
                other
            ))),
        }
    }

    /// Drop an index and all of its entries
    pub async fn delete(&self, name: &str) -> SeraphResult<()> {
        self.db
            .transport()
            .request(&Operation::delete(self.index_path(name)))
            .await?;
        Ok(())
    }

    fn add_operation<E: Indexable>(
        &self,
        name: &str,
        entity: &E,
        key: &str,
        value: &Value,
    ) -> SeraphResult<Operation> {
        let entity_kind = entity.index_kind();
        if entity_kind != self.kind {
            return Err(SeraphError::validation(format!(
                "cannot add a {} to {} index {:?}",
                entity_kind, self.kind, name
            )));
        }
        if key.is_empty() {
            return Err(SeraphError::validation("index key must not be empty"));
        }
        let uri = self.db.config().resource_uri(entity_kind.as_str(), entity.index_id()?);
        Ok(Operation::post(
            self.index_path(name),
            json!({ "uri": uri, "key": key, "value": value }),
        ))
    }

    /// Associate `key`/`value` with an entity in the named index
    pub async fn add<E: Indexable>(
        &self,
        name: &str,
        entity: &E,
        key: &str,
        value: impl Into<Value>,
    ) -> SeraphResult<()> {
        let operation = self.add_operation(name, entity, key, &value.into())?;
        self.db.transport().request(&operation).await?;
        Ok(())
    }

    /// Associate the same `key`/`value` with every entity, in one batch
    pub async fn add_many<E: Indexable>(
        &self,
        name: &str,
        entities: &[E],
        key: &str,
        value: impl Into<Value>,
    ) -> SeraphResult<()> {
        let value = value.into();
        let operations = entities
            .iter()
            .map(|entity| self.add_operation(name, entity, key, &value))
            .collect::<SeraphResult<Vec<_>>>()?;
        run_batch(self.db.transport(), operations, |_, _| Ok(())).await?;
        Ok(())
    }

    /// Entities indexed under `key`/`value`.
    ///
    /// A single hit comes back as `One`; zero or several hits as `Many`.
    pub async fn read(
        &self,
        name: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> SeraphResult<OneOrMany<Entity>> {
        let value = match value.into() {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let path = format!(
            "{}/{}/{}",
            self.index_path(name),
            encode_segment(key),
            encode_segment(&value)
        );
        let response = self.db.transport().request(&Operation::get(path)).await?;

        let items = match response {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => {
                return Err(SeraphError::decode(format!(
                    "index lookup must return an array, got {}",
                    other
                )))
            }
        };
        let mut entities = items
            .iter()
            .map(|item| match self.kind {
                IndexKind::Node => to_node(item).map(Entity::Node),
                IndexKind::Relationship => to_relationship(item).map(Entity::Relationship),
            })
            .collect::<SeraphResult<Vec<_>>>()?;

        if entities.len() == 1 {
            Ok(OneOrMany::One(entities.remove(0)))
        } else {
            Ok(OneOrMany::Many(entities))
        }
    }
}
