use super::protocol::{TaskResponse, TaskResult, WireTask};
use crate::config::Config;
use crate::engine::dispatcher::Dispatcher;
use crate::storage::memory::Storage;

use axum::{extract::Extension, Json};
use std::sync::Arc;

pub async fn handle_get_task(
    Extension(dispatcher): Extension<Arc<Dispatcher>>,
    Extension(storage): Extension<Arc<Storage>>,
    Extension(config): Extension<Arc<Config>>,
) -> Json<WireTask> {
    // Freshly dispatched tasks first.
    if let Some(task) = dispatcher.try_dequeue().await {
        let op_time = config.operation_time_ms(task.operator);
        return Json(WireTask::from_task(&task, op_time));
    }

    // Fall back to the store scan so tasks lost from the queue (e.g. claimed
    // by a worker that died before reporting) are eventually re-offered.
    match storage.unprocessed_tasks(1) {
        Ok(tasks) => match tasks.first() {
            Some(task) => {
                let op_time = config.operation_time_ms(task.operator);
                Json(WireTask::from_task(task, op_time))
            }
            None => Json(WireTask::none()),
        },
        Err(e) => {
            tracing::error!("error receiving unprocessed tasks: {}", e);
            Json(WireTask::none())
        }
    }
}

pub async fn handle_submit_result(
    Extension(dispatcher): Extension<Arc<Dispatcher>>,
    Extension(storage): Extension<Arc<Storage>>,
    Json(result): Json<TaskResult>,
) -> Json<TaskResponse> {
    let write = match storage.complete_task(result.id, result.value) {
        Ok(write) => write,
        Err(e) => {
            tracing::error!("error saving the task result: {}", e);
            return Json(TaskResponse { success: false });
        }
    };

    // Only the write that actually transitioned the task resolves the future;
    // a duplicate submission must not unblock a newer step of the expression.
    if write.first_write {
        if dispatcher.resolve(write.expression_id, result.value) {
            tracing::debug!(
                "task {} result {} delivered to expression {}",
                result.id,
                result.value,
                write.expression_id
            );
        } else {
            // No one waiting: the result is durable either way.
            tracing::debug!(
                "no reducer waiting on expression {}",
                write.expression_id
            );
        }
    }

    Json(TaskResponse { success: true })
}
