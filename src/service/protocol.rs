//! Task Protocol Definitions
//!
//! DTOs exchanged between the task service and the worker pool, plus the
//! endpoint constants both sides share.

use crate::engine::types::{AtomicTask, Operator};
use serde::{Deserialize, Serialize};

pub const ENDPOINT_GET_TASK: &str = "/worker/get_task";
pub const ENDPOINT_SUBMIT_RESULT: &str = "/worker/submit_result";

/// A task as handed to a worker.
///
/// `has_task: false` is the polling contract's "nothing to do right now",
/// not an error; the other fields carry defaults in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTask {
    pub id: i64,
    pub operand_a: f64,
    pub operand_b: f64,
    pub operator: Operator,
    /// Simulated compute cost the worker sleeps for before computing.
    pub operation_time_ms: u64,
    pub has_task: bool,
}

impl WireTask {
    pub fn from_task(task: &AtomicTask, operation_time_ms: u64) -> Self {
        Self {
            id: task.id,
            operand_a: task.operand_a,
            operand_b: task.operand_b,
            operator: task.operator,
            operation_time_ms,
            has_task: true,
        }
    }

    pub fn none() -> Self {
        Self {
            id: 0,
            operand_a: 0.0,
            operand_b: 0.0,
            operator: Operator::Add,
            operation_time_ms: 0,
            has_task: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResult {
    pub id: i64,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub success: bool,
}
