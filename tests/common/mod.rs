//! In-memory stand-in for the store's REST API
//!
//! Speaks the same JSON as the real store for nodes, relationships, indexes
//! and batches, records every operation it receives, and answers batches in
//! reverse order so callers must correlate by token.

#![allow(dead_code)]

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde_json::{json, Map, Value};
use seraph::{ClientConfig, Method, Operation, Seraph, SeraphError, SeraphResult, Transport};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

pub const BASE: &str = "http://localhost:7474/db/data";

type Properties = Map<String, Value>;
type QueryHandler = Box<dyn Fn(&str, &Value) -> Result<Value, (u16, String)> + Send + Sync>;

#[derive(Debug, Clone)]
struct RelRecord {
    start: u64,
    end: u64,
    rel_type: String,
    data: Properties,
}

#[derive(Default)]
struct StoreState {
    next_node: u64,
    next_rel: u64,
    nodes: BTreeMap<u64, Properties>,
    rels: BTreeMap<u64, RelRecord>,
    indexes: BTreeMap<(String, String), Value>,
    entries: HashMap<(String, String, String, String), Vec<String>>,
    schema_indexes: BTreeMap<String, Vec<Vec<String>>>,
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
    log: Mutex<Vec<Operation>>,
    query_handler: Mutex<Option<QueryHandler>>,
    embed_item_failures: Mutex<bool>,
}

type Reply = Result<Value, (u16, String)>;

fn node_repr(id: u64, data: &Properties) -> Value {
    json!({
        "self": format!("{}/node/{}", BASE, id),
        "data": data,
        "properties": format!("{}/node/{}/properties", BASE, id),
        "outgoing_relationships": format!("{}/node/{}/relationships/out", BASE, id),
        "incoming_relationships": format!("{}/node/{}/relationships/in", BASE, id),
        "traverse": format!("{}/node/{}/traverse/{{returnType}}", BASE, id),
    })
}

fn rel_repr(id: u64, rel: &RelRecord) -> Value {
    json!({
        "self": format!("{}/relationship/{}", BASE, id),
        "start": format!("{}/node/{}", BASE, rel.start),
        "end": format!("{}/node/{}", BASE, rel.end),
        "type": rel.rel_type,
        "data": rel.data,
        "properties": format!("{}/relationship/{}/properties", BASE, id),
    })
}

fn not_found(what: &str) -> (u16, String) {
    (404, format!("Cannot find {}", what))
}

fn parse_id(segment: &str) -> Result<u64, (u16, String)> {
    segment.parse().map_err(|_| (400, format!("bad id {:?}", segment)))
}

fn trailing_id(uri: &str) -> Result<u64, (u16, String)> {
    parse_id(uri.trim_end_matches('/').rsplit('/').next().unwrap_or_default())
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn object(body: &Option<Value>) -> Properties {
    body.as_ref().and_then(Value::as_object).cloned().unwrap_or_default()
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A client talking to a fresh fake store
    pub fn client() -> (Arc<FakeStore>, Seraph) {
        let store = Self::new();
        let db = Seraph::with_transport(ClientConfig::default(), store.clone());
        (store, db)
    }

    pub fn on_query<F>(&self, handler: F)
    where
        F: Fn(&str, &Value) -> Result<Value, (u16, String)> + Send + Sync + 'static,
    {
        *self.query_handler.lock().unwrap() = Some(Box::new(handler));
    }

    /// Report failed batch items inline instead of failing the whole batch
    pub fn embed_item_failures(&self, embed: bool) {
        *self.embed_item_failures.lock().unwrap() = embed;
    }

    pub fn requests(&self) -> Vec<Operation> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().unwrap().nodes.len()
    }

    /// Answer a `cypher` request by delegating to the registered handler
    fn query(&self, body: &Option<Value>) -> Reply {
        let body = body.clone().unwrap_or(Value::Null);
        let text = body.get("query").and_then(Value::as_str).unwrap_or_default().to_string();
        let params = body.get("params").cloned().unwrap_or_else(|| json!({}));
        match self.query_handler.lock().unwrap().as_ref() {
            Some(handler) => handler(&text, &params),
            None => Err((400, "no query handler registered".to_string())),
        }
    }

    /// Node representation for query handlers
    pub fn node_json(&self, id: u64) -> Value {
        let state = self.state.lock().unwrap();
        node_repr(id, &state.nodes[&id])
    }

    /// Relationship representation for query handlers
    pub fn rel_json(&self, id: u64) -> Value {
        let state = self.state.lock().unwrap();
        rel_repr(id, &state.rels[&id])
    }

    fn batch(&self, body: &Option<Value>) -> Reply {
        let jobs = body
            .as_ref()
            .and_then(Value::as_array)
            .cloned()
            .ok_or((400, "batch body must be an array".to_string()))?;
        let embed = *self.embed_item_failures.lock().unwrap();

        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            let method: Method = serde_json::from_value(job["method"].clone())
                .map_err(|e| (400, e.to_string()))?;
            let to = job["to"].as_str().unwrap_or_default().to_string();
            let id = job["id"].clone();
            let op = Operation::with_method(method, to.clone(), job.get("body").cloned());
            match self.handle(&op) {
                Ok(body) => {
                    let mut item = json!({ "id": id, "from": to, "status": 200 });
                    if !body.is_null() {
                        item["body"] = body;
                    }
                    results.push(item);
                }
                Err((status, message)) if embed => results.push(json!({
                    "id": id,
                    "from": to,
                    "status": status,
                    "body": { "message": message },
                })),
                Err((_, message)) => return Err((500, message)),
            }
        }
        results.reverse();
        Ok(Value::Array(results))
    }

    fn handle(&self, op: &Operation) -> Reply {
        let segments: Vec<&str> = op.path.trim_matches('/').split('/').collect();
        match (op.method, segments.as_slice()) {
            (Method::Post, ["batch"]) => self.batch(&op.body),
            (Method::Post, ["cypher"]) => self.query(&op.body),
            _ => self.handle_entity(op, &segments),
        }
    }

    fn handle_entity(&self, op: &Operation, segments: &[&str]) -> Reply {
        let mut state = self.state.lock().unwrap();
        let state = &mut *state;
        match (op.method, segments) {
            (Method::Post, ["node"]) => {
                let id = state.next_node;
                state.next_node += 1;
                let data = object(&op.body);
                let repr = node_repr(id, &data);
                state.nodes.insert(id, data);
                Ok(repr)
            }
            (Method::Get, ["node", id]) => {
                let id = parse_id(id)?;
                let data =
                    state.nodes.get(&id).ok_or_else(|| not_found(&format!("node {}", id)))?;
                Ok(node_repr(id, data))
            }
            (Method::Delete, ["node", id]) => {
                let id = parse_id(id)?;
                if !state.nodes.contains_key(&id) {
                    return Err(not_found(&format!("node {}", id)));
                }
                if state.rels.values().any(|r| r.start == id || r.end == id) {
                    return Err((409, format!("node {} still has relationships", id)));
                }
                state.nodes.remove(&id);
                Ok(Value::Null)
            }
            (Method::Put, ["node", id, "properties"]) => {
                let id = parse_id(id)?;
                let data = state
                    .nodes
                    .get_mut(&id)
                    .ok_or_else(|| not_found(&format!("node {}", id)))?;
                *data = object(&op.body);
                Ok(Value::Null)
            }
            (Method::Post, ["node", id, "relationships"]) => {
                let start = parse_id(id)?;
                let body = object(&op.body);
                let to = body.get("to").and_then(Value::as_str).unwrap_or_default();
                let end = trailing_id(to)?;
                if !state.nodes.contains_key(&start) || !state.nodes.contains_key(&end) {
                    return Err(not_found("relationship endpoint"));
                }
                let rel_type = body.get("type").and_then(Value::as_str).unwrap_or_default();
                if rel_type.is_empty() {
                    return Err((400, "relationship type missing".to_string()));
                }
                let record = RelRecord {
                    start,
                    end,
                    rel_type: rel_type.to_string(),
                    data: body.get("data").and_then(Value::as_object).cloned().unwrap_or_default(),
                };
                let id = state.next_rel;
                state.next_rel += 1;
                let repr = rel_repr(id, &record);
                state.rels.insert(id, record);
                Ok(repr)
            }
            (Method::Get, ["node", id, "relationships", direction, rest @ ..]) => {
                let id = parse_id(id)?;
                if !state.nodes.contains_key(&id) {
                    return Err(not_found(&format!("node {}", id)));
                }
                let types: Vec<String> = match rest {
                    [] => Vec::new(),
                    [types] => types.split('&').map(decode).collect(),
                    _ => return Err((400, "bad relationship path".to_string())),
                };
                let listing: Vec<Value> = state
                    .rels
                    .iter()
                    .filter(|(_, r)| match *direction {
                        "in" => r.end == id,
                        "out" => r.start == id,
                        _ => r.start == id || r.end == id,
                    })
                    .filter(|(_, r)| types.is_empty() || types.contains(&r.rel_type))
                    .map(|(rid, r)| rel_repr(*rid, r))
                    .collect();
                Ok(Value::Array(listing))
            }
            (Method::Get, ["relationship", id]) => {
                let id = parse_id(id)?;
                let rel = state
                    .rels
                    .get(&id)
                    .ok_or_else(|| not_found(&format!("relationship {}", id)))?;
                Ok(rel_repr(id, rel))
            }
            (Method::Delete, ["relationship", id]) => {
                let id = parse_id(id)?;
                state
                    .rels
                    .remove(&id)
                    .ok_or_else(|| not_found(&format!("relationship {}", id)))?;
                Ok(Value::Null)
            }
            (Method::Put, ["relationship", id, "properties"]) => {
                let id = parse_id(id)?;
                let rel = state
                    .rels
                    .get_mut(&id)
                    .ok_or_else(|| not_found(&format!("relationship {}", id)))?;
                rel.data = object(&op.body);
                Ok(Value::Null)
            }
            (Method::Get, ["index", kind]) => {
                let listing: Properties = state
                    .indexes
                    .iter()
                    .filter(|((k, _), _)| k == kind)
                    .map(|((_, name), config)| (name.clone(), config.clone()))
                    .collect();
                if listing.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(Value::Object(listing))
                }
            }
            (Method::Post, ["index", kind]) => {
                if *kind != "node" && *kind != "relationship" {
                    return Err((400, format!("unknown index kind {}", kind)));
                }
                let body = object(&op.body);
                let name =
                    body.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
                let config = body
                    .get("config")
                    .cloned()
                    .unwrap_or_else(|| json!({ "type": "exact", "provider": "lucene" }));
                state.indexes.insert((kind.to_string(), name.clone()), config.clone());
                let template = format!("{}/index/{}/{}/{{key}}/{{value}}", BASE, kind, name);
                Ok(json!({ "template": template }))
            }
            (Method::Delete, ["index", kind, name]) => {
                let name = decode(name);
                state
                    .indexes
                    .remove(&(kind.to_string(), name.clone()))
                    .ok_or_else(|| not_found(&format!("index {}", name)))?;
                Ok(Value::Null)
            }
            (Method::Post, ["index", kind, name]) => {
                let body = object(&op.body);
                let uri = body.get("uri").and_then(Value::as_str).unwrap_or_default().to_string();
                let key = body.get("key").and_then(Value::as_str).unwrap_or_default().to_string();
                let value = match body.get("value") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                let entity_id = trailing_id(&uri)?;
                let exists = match *kind {
                    "node" => state.nodes.contains_key(&entity_id),
                    _ => state.rels.contains_key(&entity_id),
                };
                if !exists {
                    return Err(not_found(&uri));
                }
                // indexes spring into existence on first use
                let name = decode(name);
                state
                    .indexes
                    .entry((kind.to_string(), name.clone()))
                    .or_insert_with(|| json!({ "type": "exact", "provider": "lucene" }));
                state
                    .entries
                    .entry((kind.to_string(), name, key, value))
                    .or_default()
                    .push(uri.clone());
                Ok(json!({ "self": uri }))
            }
            (Method::Get, ["index", kind, name, key, value]) => {
                let lookup = (kind.to_string(), decode(name), decode(key), decode(value));
                let uris = state.entries.get(&lookup).cloned().unwrap_or_default();
                let mut hits = Vec::with_capacity(uris.len());
                for uri in uris {
                    let id = trailing_id(&uri)?;
                    match *kind {
                        "node" => {
                            if let Some(data) = state.nodes.get(&id) {
                                hits.push(node_repr(id, data));
                            }
                        }
                        _ => {
                            if let Some(rel) = state.rels.get(&id) {
                                hits.push(rel_repr(id, rel));
                            }
                        }
                    }
                }
                Ok(Value::Array(hits))
            }
            (Method::Post, ["schema", "index", label]) => {
                let label = decode(label);
                let keys: Vec<String> = op
                    .body
                    .as_ref()
                    .and_then(|body| body.get("property_keys"))
                    .and_then(|keys| serde_json::from_value(keys.clone()).ok())
                    .unwrap_or_default();
                if keys.is_empty() {
                    return Err((400, "property_keys missing".to_string()));
                }
                let declared = state.schema_indexes.entry(label.clone()).or_default();
                if declared.contains(&keys) {
                    return Err((409, format!("{} is already indexed on {:?}", label, keys)));
                }
                declared.push(keys.clone());
                Ok(json!({ "label": label, "property_keys": keys }))
            }
            (Method::Get, ["schema", "index", label]) => {
                let label = decode(label);
                let listing: Vec<Value> = state
                    .schema_indexes
                    .get(&label)
                    .map(|declared| {
                        declared
                            .iter()
                            .map(|keys| json!({ "label": label, "property_keys": keys }))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(Value::Array(listing))
            }
            (Method::Delete, ["schema", "index", label, key]) => {
                let (label, key) = (decode(label), decode(key));
                let declared = state.schema_indexes.entry(label.clone()).or_default();
                let before = declared.len();
                declared.retain(|keys| !(keys.len() == 1 && keys[0] == key));
                if declared.len() == before {
                    return Err(not_found(&format!("index on {}({})", label, key)));
                }
                Ok(Value::Null)
            }
            _ => Err((404, format!("no route for {}", op))),
        }
    }
}

#[async_trait]
impl Transport for FakeStore {
    async fn request(&self, operation: &Operation) -> SeraphResult<Value> {
        self.log.lock().unwrap().push(operation.clone());
        self.handle(operation)
            .map_err(|(status, message)| SeraphError::request(Some(status), message))
    }
}

/// Shorthand for building property maps in tests
pub fn props(value: Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}
