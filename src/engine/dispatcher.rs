//! Dispatch Queue and Result Synchronizer
//!
//! The `Dispatcher` owns the two pieces of shared state the engine uses for
//! cross-task signaling:
//! - a bounded FIFO channel of ready tasks that workers drain through the
//!   task service, and
//! - a registry of one-shot result futures keyed by expression id, which the
//!   reducer blocks on and the result-submission path resolves.
//!
//! Neither structure is a system of record; the durable store is. The future
//! registry is locked only for lookup/insert/remove, never across a wait.

use super::types::AtomicTask;
use crate::config::DISPATCH_QUEUE_CAPACITY;

use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

pub struct Dispatcher {
    queue_tx: mpsc::Sender<AtomicTask>,
    queue_rx: Mutex<mpsc::Receiver<AtomicTask>>,
    /// Pending result futures, one per expression currently blocked on a
    /// reduction step. Holding only the sender half keeps ownership of the
    /// wait with the reducer.
    futures: DashMap<i64, oneshot::Sender<f64>>,
}

impl Dispatcher {
    pub fn new() -> Arc<Self> {
        let (queue_tx, queue_rx) = mpsc::channel(DISPATCH_QUEUE_CAPACITY);

        Arc::new(Self {
            queue_tx,
            queue_rx: Mutex::new(queue_rx),
            futures: DashMap::new(),
        })
    }

    /// Places a ready task on the dispatch queue without blocking.
    ///
    /// The queue is sized so this never fails under normal load; a full or
    /// closed queue is reported as an error and surfaces as a dispatch
    /// failure for the owning expression.
    pub fn enqueue(&self, task: AtomicTask) -> Result<()> {
        self.queue_tx
            .try_send(task)
            .map_err(|e| anyhow::anyhow!("dispatch queue rejected task: {}", e))
    }

    /// Non-blocking poll of the dispatch queue.
    ///
    /// Returns `None` immediately when the queue is empty so that callers can
    /// fall through to the durable-store scan instead of stalling a worker.
    pub async fn try_dequeue(&self) -> Option<AtomicTask> {
        self.queue_rx.lock().await.try_recv().ok()
    }

    /// Registers a fresh result future for `expression_id` and returns the
    /// receiving half for the reducer to block on.
    ///
    /// A leftover future for the same expression (possible only if a previous
    /// step was abandoned) is replaced and its waiter dropped.
    pub fn register(&self, expression_id: i64) -> oneshot::Receiver<f64> {
        let (tx, rx) = oneshot::channel();
        self.futures.insert(expression_id, tx);
        rx
    }

    /// Resolves the pending future for `expression_id`, if one is registered.
    ///
    /// Returns whether a waiting reducer was actually unblocked. An absent
    /// key is not an error: nobody is waiting, the result is already durable.
    pub fn resolve(&self, expression_id: i64, value: f64) -> bool {
        match self.futures.remove(&expression_id) {
            Some((_, tx)) => tx.send(value).is_ok(),
            None => false,
        }
    }

    /// Drops the pending future for `expression_id` without resolving it.
    /// Used when a step fails after registration but before a worker reports.
    pub fn discard(&self, expression_id: i64) {
        self.futures.remove(&expression_id);
    }

    /// Number of expressions currently blocked on a result.
    pub fn waiting_count(&self) -> usize {
        self.futures.len()
    }
}
