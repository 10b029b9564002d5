//! Batch coordinator
//!
//! Packs N logical operations into one `POST batch` exchange and maps the
//! answers back to submission order. Each sub-operation carries a dense
//! correlation token (its input index); results are slotted by token, never by
//! their position in the response, because the store does not promise to
//! answer in submission order.
//!
//! A batch is all-or-nothing for the caller: one failed item fails the call.

use crate::error::{SeraphError, SeraphResult};
use crate::http::{Method, Operation, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Path of the batch endpoint relative to the API root
pub const BATCH_PATH: &str = "batch";

/// One sub-operation of a batch request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOperation {
    pub method: Method,
    /// Target path, relative to the API root with a leading `/`
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Correlation token
    pub id: usize,
}

/// One entry of the batch response
#[derive(Debug, Deserialize)]
struct BatchItem {
    id: usize,
    #[serde(default)]
    body: Value,
    #[serde(default)]
    status: Option<u16>,
}

/// An ordered set of operations submitted in a single exchange
#[derive(Debug, Clone, Default)]
pub struct Batch {
    operations: Vec<BatchOperation>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Batch {
            operations: Vec::with_capacity(capacity),
        }
    }

    /// Append an operation and return its correlation token
    pub fn push(&mut self, operation: Operation) -> usize {
        let id = self.operations.len();
        self.operations.push(BatchOperation {
            method: operation.method,
            to: format!("/{}", operation.path),
            body: operation.body,
            id,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[BatchOperation] {
        &self.operations
    }

    /// The single request carrying every sub-operation
    pub fn to_operation(&self) -> SeraphResult<Operation> {
        Ok(Operation::post(BATCH_PATH, serde_json::to_value(&self.operations)?))
    }

    /// Send the batch and return the response bodies in submission order.
    ///
    /// An empty batch completes immediately without touching the transport.
    pub async fn submit(self, transport: &dyn Transport) -> SeraphResult<Vec<Value>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Submitting batch of {} operations", self.len());
        let response = transport.request(&self.to_operation()?).await?;
        demultiplex(self.len(), response)
    }
}

/// Slot a raw batch response back into submission order
pub fn demultiplex(count: usize, response: Value) -> SeraphResult<Vec<Value>> {
    let items: Vec<BatchItem> = match response {
        Value::Array(_) => serde_json::from_value(response)
            .map_err(|e| SeraphError::decode(format!("malformed batch response: {}", e)))?,
        other => {
            return Err(SeraphError::decode(format!(
                "batch response must be an array, got {}",
                other
            )))
        }
    };

    let mut slots: Vec<Option<Value>> = vec![None; count];
    for item in items {
        if let Some(status) = item.status {
            if !(200..300).contains(&status) {
                warn!("Batch item {} failed with status {}", item.id, status);
                let message = item
                    .body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("batch operation failed");
                return Err(SeraphError::request(
                    Some(status),
                    format!("batch item {}: {}", item.id, message),
                ));
            }
        }
        let slot = slots.get_mut(item.id).ok_or_else(|| {
            SeraphError::decode(format!(
                "batch response token {} out of range for {} operations",
                item.id, count
            ))
        })?;
        if slot.is_some() {
            return Err(SeraphError::decode(format!(
                "batch response token {} answered twice",
                item.id
            )));
        }
        *slot = Some(item.body);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(id, slot)| {
            slot.ok_or_else(|| {
                SeraphError::decode(format!("batch response has no result for token {}", id))
            })
        })
        .collect()
}

/// Issue `operations` as one batch and decode each answer with its input index
pub async fn run_batch<T, F>(
    transport: &dyn Transport,
    operations: Vec<Operation>,
    mut decode: F,
) -> SeraphResult<Vec<T>>
where
    F: FnMut(usize, Value) -> SeraphResult<T>,
{
    let mut batch = Batch::with_capacity(operations.len());
    for operation in operations {
        batch.push(operation);
    }
    batch
        .submit(transport)
        .await?
        .into_iter()
        .enumerate()
        .map(|(index, body)| decode(index, body))
        .collect()
}
