//! Seraph — object-mapping client for a REST graph store
//!
//! Every operation that accepts `OneOrMany` branches exactly once, here at
//! the boundary, into a `*_one` variant (one plain request) or a `*_many`
//! variant (one batch request, results in input order).

pub mod relationships;

pub use relationships::RelationshipApi;

use crate::batch::run_batch;
use crate::config::ClientConfig;
use crate::error::{SeraphError, SeraphResult};
use crate::graph::{node_ids, AsNodeId, Node, OneOrMany, Properties};
use crate::http::{HttpTransport, Operation, Transport};
use crate::index::{IndexKind, IndexManager, SchemaIndexManager};
use crate::mapping::{from_node, to_node, uri_from_id};
use crate::query::{find_query, interpret, query_operation, MatchMode, RawQueryResult, Row};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for one graph store.
///
/// Holds only immutable configuration and a shared transport, so it can be
/// used from any number of tasks at once. Nothing is cached between calls.
#[derive(Clone)]
pub struct Seraph {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl Seraph {
    /// Connect over HTTP with default settings
    ///
    /// # Example
    /// ```no_run
    /// # use seraph::Seraph;
    /// # async fn demo() -> seraph::SeraphResult<()> {
    /// let db = Seraph::new("http://localhost:7474")?;
    /// let users = db.query("start n = node(*) return n.name?", None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(endpoint: &str) -> SeraphResult<Self> {
        Self::with_config(ClientConfig::new(endpoint))
    }

    /// Connect over HTTP with explicit settings
    pub fn with_config(config: ClientConfig) -> SeraphResult<Self> {
        let transport = HttpTransport::new(config.clone())?;
        info!("Seraph client for {}", config.api_url(""));
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Use a custom transport (in-memory stores, recording proxies, ...)
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Issue an arbitrary request against the API root
    pub async fn call(&self, operation: Operation) -> SeraphResult<Value> {
        self.transport.request(&operation).await
    }

    // ============================================================
    // Nodes
    // ============================================================

    fn save_operation(node: &Node) -> Operation {
        match node.id() {
            Some(id) => Operation::put(uri_from_id("node/{id}/properties", id), from_node(node)),
            None => Operation::post("node", from_node(node)),
        }
    }

    /// Create unsaved nodes, update saved ones
    pub async fn save(&self, input: impl Into<OneOrMany<Node>>) -> SeraphResult<OneOrMany<Node>> {
        match input.into() {
            OneOrMany::One(node) => self.save_one(node).await.map(OneOrMany::One),
            OneOrMany::Many(nodes) => self.save_many(nodes).await.map(OneOrMany::Many),
        }
    }

    pub async fn save_one(&self, node: Node) -> SeraphResult<Node> {
        let response = self.transport.request(&Self::save_operation(&node)).await?;
        match node.id() {
            Some(id) => {
                debug!("Updated node {}", id);
                Ok(node)
            }
            None => {
                let saved = to_node(&response)?;
                debug!("Created node {:?}", saved.id());
                Ok(saved)
            }
        }
    }

    pub async fn save_many(&self, nodes: Vec<Node>) -> SeraphResult<Vec<Node>> {
        let operations = nodes.iter().map(Self::save_operation).collect();
        run_batch(self.transport(), operations, |index, body| match nodes[index].id() {
            Some(_) => Ok(nodes[index].clone()),
            None => to_node(&body),
        })
        .await
    }

    /// Read nodes by id or by saved `Node`
    pub async fn read<N: AsNodeId>(
        &self,
        nodes: impl Into<OneOrMany<N>>,
    ) -> SeraphResult<OneOrMany<Node>> {
        match nodes.into() {
            OneOrMany::One(node) => self.read_one(node.as_node_id()?).await.map(OneOrMany::One),
            OneOrMany::Many(nodes) => {
                let ids = node_ids(&nodes)?;
                self.read_many(&ids).await.map(OneOrMany::Many)
            }
        }
    }

    pub async fn read_one(&self, id: u64) -> SeraphResult<Node> {
        let response = self
            .transport
            .request(&Operation::get(uri_from_id("node", id)))
            .await?;
        to_node(&response)
    }

    pub async fn read_many(&self, ids: &[u64]) -> SeraphResult<Vec<Node>> {
        let operations = ids
            .iter()
            .map(|id| Operation::get(uri_from_id("node", *id)))
            .collect();
        run_batch(self.transport(), operations, |_, body| to_node(&body)).await
    }

    /// Delete nodes by id or by saved `Node`
    pub async fn delete<N: AsNodeId>(&self, nodes: impl Into<OneOrMany<N>>) -> SeraphResult<()> {
        match nodes.into() {
            OneOrMany::One(node) => self.delete_one(node.as_node_id()?).await,
            OneOrMany::Many(nodes) => self.delete_many(&node_ids(&nodes)?).await,
        }
    }

    pub async fn delete_one(&self, id: u64) -> SeraphResult<()> {
        self.transport
            .request(&Operation::delete(uri_from_id("node", id)))
            .await?;
        debug!("Deleted node {}", id);
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[u64]) -> SeraphResult<()> {
        let operations = ids
            .iter()
            .map(|id| Operation::delete(uri_from_id("node", *id)))
            .collect();
        run_batch(self.transport(), operations, |_, _| Ok(())).await?;
        Ok(())
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Execute a query and return its table untouched
    pub async fn query_raw(
        &self,
        query: &str,
        params: Option<&Properties>,
    ) -> SeraphResult<RawQueryResult> {
        let operation = query_operation(query, params);
        let response = self.transport.request(&operation).await.map_err(|e| match e {
            SeraphError::Request { message, .. } => SeraphError::Query(message),
            other => other,
        })?;
        RawQueryResult::from_response(response)
    }

    /// Execute a query and rebuild nodes and relationships in its cells
    pub async fn query(&self, query: &str, params: Option<&Properties>) -> SeraphResult<Vec<Row>> {
        interpret(self.query_raw(query, params).await?)
    }

    /// Nodes whose properties equal every (or, with `MatchMode::Any`, some)
    /// entry of `predicate`
    pub async fn find(&self, predicate: &Properties, mode: MatchMode) -> SeraphResult<Vec<Node>> {
        let (text, params) = find_query(predicate, mode);
        let raw = self.query_raw(&text, Some(&params)).await?;
        raw.data
            .iter()
            .map(|row| {
                row.first()
                    .ok_or_else(|| SeraphError::decode("find result row is empty"))
                    .and_then(to_node)
            })
            .collect()
    }

    // ============================================================
    // Indexes
    // ============================================================

    /// Indexes over nodes
    pub fn index(&self) -> IndexManager<'_> {
        self.node_index()
    }

    pub fn node_index(&self) -> IndexManager<'_> {
        IndexManager::new(self, IndexKind::Node)
    }

    pub fn rel_index(&self) -> IndexManager<'_> {
        IndexManager::new(self, IndexKind::Relationship)
    }

    /// Indexes over `"node"` or `"relationship"`; any other target is rejected
    pub fn index_for(&self, target: &str) -> SeraphResult<IndexManager<'_>> {
        Ok(IndexManager::new(self, target.parse()?))
    }

    /// Label indexes over node properties
    pub fn schema_index(&self) -> SchemaIndexManager<'_> {
        SchemaIndexManager::new(self)
    }

    // ============================================================
    // Relationships
    // ============================================================

    pub fn rel(&self) -> RelationshipApi<'_> {
        RelationshipApi::new(self)
    }
}

impl std::fmt::Debug for Seraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seraph").field("config", &self.config).finish_non_exhaustive()
    }
}

