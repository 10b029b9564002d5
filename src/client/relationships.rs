//! Relationship operations: creation, traversal listing and CRUD

use super::Seraph;
use crate::batch::run_batch;
use crate::error::SeraphResult;
use crate::graph::{AsNodeId, OneOrMany, Properties, Relationship};
use crate::http::Operation;
use crate::index::IndexManager;
use crate::mapping::{from_relationship, to_relationship, uri_from_id, RelationshipRequest};
use crate::query::RelationshipQuery;
use serde_json::Value;
use tracing::debug;

impl Seraph {
    fn relate_operation(&self, request: &RelationshipRequest) -> Operation {
        Operation::post(request.path(), request.body(self.config()))
    }

    /// Create a relationship from `start` to one end node, or to each of
    /// several end nodes sharing type and properties
    pub async fn relate<S: AsNodeId, E: AsNodeId>(
        &self,
        start: S,
        rel_type: &str,
        ends: impl Into<OneOrMany<E>>,
        properties: Option<Properties>,
    ) -> SeraphResult<OneOrMany<Relationship>> {
        match ends.into() {
            OneOrMany::One(end) => self
                .relate_one(start, rel_type, end, properties)
                .await
                .map(OneOrMany::One),
            OneOrMany::Many(ends) => self
                .relate_many(start, rel_type, &ends, properties)
                .await
                .map(OneOrMany::Many),
        }
    }

    pub async fn relate_one<S: AsNodeId, E: AsNodeId>(
        &self,
        start: S,
        rel_type: &str,
        end: E,
        properties: Option<Properties>,
    ) -> SeraphResult<Relationship> {
        let request =
            from_relationship(start.as_node_id()?, rel_type, end.as_node_id()?, properties)?;
        let response = self.transport().request(&self.relate_operation(&request)).await?;
        let rel = to_relationship(&response)?;
        debug!(
            "Created relationship {} ({} -[{}]-> {})",
            rel.id(),
            rel.start(),
            rel_type,
            rel.end()
        );
        Ok(rel)
    }

    pub async fn relate_many<S: AsNodeId, E: AsNodeId>(
        &self,
        start: S,
        rel_type: &str,
        ends: &[E],
        properties: Option<Properties>,
    ) -> SeraphResult<Vec<Relationship>> {
        let start = start.as_node_id()?;
        let operations = ends
            .iter()
            .map(|end| {
                let request =
                    from_relationship(start, rel_type, end.as_node_id()?, properties.clone())?;
                Ok(self.relate_operation(&request))
            })
            .collect::<SeraphResult<Vec<_>>>()?;
        run_batch(self.transport(), operations, |_, body| to_relationship(&body)).await
    }

    /// Relationships of one node, or of each of several nodes.
    ///
    /// For several nodes, `result[i]` holds the relationships of `nodes[i]`.
    pub async fn relationships<N: AsNodeId>(
        &self,
        nodes: impl Into<OneOrMany<N>>,
        query: &RelationshipQuery,
    ) -> SeraphResult<OneOrMany<Vec<Relationship>>> {
        match nodes.into() {
            OneOrMany::One(node) => self.relationships_of(node, query).await.map(OneOrMany::One),
            OneOrMany::Many(nodes) => self
                .relationships_of_many(&nodes, query)
                .await
                .map(OneOrMany::Many),
        }
    }

    pub async fn relationships_of<N: AsNodeId>(
        &self,
        node: N,
        query: &RelationshipQuery,
    ) -> SeraphResult<Vec<Relationship>> {
        let operation = query.operation_for(node.as_node_id()?)?;
        let response = self.transport().request(&operation).await?;
        RelationshipQuery::decode(response)
    }

    pub async fn relationships_of_many<N: AsNodeId>(
        &self,
        nodes: &[N],
        query: &RelationshipQuery,
    ) -> SeraphResult<Vec<Vec<Relationship>>> {
        let operations = nodes
            .iter()
            .map(|node| query.operation_for(node.as_node_id()?))
            .collect::<SeraphResult<Vec<_>>>()?;
        run_batch(self.transport(), operations, |_, body| RelationshipQuery::decode(body)).await
    }
}

/// Relationship CRUD, reached through [`Seraph::rel`]
#[derive(Clone, Copy)]
pub struct RelationshipApi<'a> {
    db: &'a Seraph,
}

impl std::fmt::Debug for RelationshipApi<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipApi").finish_non_exhaustive()
    }
}

impl<'a> RelationshipApi<'a> {
    pub(crate) fn new(db: &'a Seraph) -> Self {
        Self { db }
    }

    /// Same as [`Seraph::relate_one`]
    pub async fn create<S: AsNodeId, E: AsNodeId>(
        &self,
        start: S,
        rel_type: &str,
        end: E,
        properties: Option<Properties>,
    ) -> SeraphResult<Relationship> {
        self.db.relate_one(start, rel_type, end, properties).await
    }

    pub async fn read(
        &self,
        ids: impl Into<OneOrMany<u64>>,
    ) -> SeraphResult<OneOrMany<Relationship>> {
        match ids.into() {
            OneOrMany::One(id) => self.read_one(id).await.map(OneOrMany::One),
            OneOrMany::Many(ids) => self.read_many(&ids).await.map(OneOrMany::Many),
        }
    }

    pub async fn read_one(&self, id: u64) -> SeraphResult<Relationship> {
        let response = self
            .db
            .transport()
            .request(&Operation::get(uri_from_id("relationship", id)))
            .await?;
        to_relationship(&response)
    }

    pub async fn read_many(&self, ids: &[u64]) -> SeraphResult<Vec<Relationship>> {
        let operations = ids
            .iter()
            .map(|id| Operation::get(uri_from_id("relationship", *id)))
            .collect();
        run_batch(self.db.transport(), operations, |_, body| to_relationship(&body)).await
    }

    fn update_operation(rel: &Relationship) -> Operation {
        Operation::put(
            uri_from_id("relationship/{id}/properties", rel.id()),
            Value::Object(rel.properties.clone()),
        )
    }

    /// Replace the stored properties; start, end and type never change
    pub async fn update(&self, rels: impl Into<OneOrMany<Relationship>>) -> SeraphResult<()> {
        match rels.into() {
            OneOrMany::One(rel) => self.update_one(&rel).await,
            OneOrMany::Many(rels) => self.update_many(&rels).await,
        }
    }

    pub async fn update_one(&self, rel: &Relationship) -> SeraphResult<()> {
        self.db.transport().request(&Self::update_operation(rel)).await?;
        debug!("Updated relationship {}", rel.id());
        Ok(())
    }

    pub async fn update_many(&self, rels: &[Relationship]) -> SeraphResult<()> {
        let operations = rels.iter().map(Self::update_operation).collect();
        run_batch(self.db.transport(), operations, |_, _| Ok(())).await?;
        Ok(())
    }

    pub async fn delete(&self, ids: impl Into<OneOrMany<u64>>) -> SeraphResult<()> {
        match ids.into() {
            OneOrMany::One(id) => self.delete_one(id).await,
            OneOrMany::Many(ids) => self.delete_many(&ids).await,
        }
    }

    pub async fn delete_one(&self, id: u64) -> SeraphResult<()> {
        self.db
            .transport()
            .request(&Operation::delete(uri_from_id("relationship", id)))
            .await?;
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[u64]) -> SeraphResult<()> {
        let operations = ids
            .iter()
            .map(|id| Operation::delete(uri_from_id("relationship", *id)))
            .collect();
        run_batch(self.db.transport(), operations, |_, _| Ok(())).await?;
        Ok(())
    }

    /// Indexes over relationships
    pub fn index(&self) -> IndexManager<'a> {
        self.db.rel_index()
    }
}
