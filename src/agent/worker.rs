use crate::config::Config;
use crate::service::protocol::{
    TaskResponse, TaskResult, WireTask, ENDPOINT_GET_TASK, ENDPOINT_SUBMIT_RESULT,
};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Fixed backoff after a transport failure.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// Poll interval while the service reports no available task.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Spawns the worker pool and returns immediately.
pub fn start(config: Arc<Config>) {
    tracing::info!("starting {} workers", config.computing_power);

    for worker_id in 0..config.computing_power {
        let config = config.clone();
        tokio::spawn(async move {
            run_worker(worker_id, config).await;
        });
    }
}

/// The main loop for a single worker: request, compute, submit, repeat.
/// Runs until process shutdown; there is no terminal state.
pub async fn run_worker(id: usize, config: Arc<Config>) {
    let client = reqwest::Client::new();
    let get_url = format!("http://{}{}", config.task_addr, ENDPOINT_GET_TASK);
    let submit_url = format!("http://{}{}", config.task_addr, ENDPOINT_SUBMIT_RESULT);

    tracing::info!("worker {} started", id);

    loop {
        let task = match fetch_task(&client, &get_url).await {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!("worker {} error getting task: {}", id, e);
                tokio::time::sleep(RETRY_BACKOFF).await;
                continue;
            }
        };

        if !task.has_task {
            tokio::time::sleep(IDLE_POLL).await;
            continue;
        }

        tracing::info!(
            "worker {} received task {}: {} {} {}",
            id,
            task.id,
            task.operand_a,
            task.operator,
            task.operand_b
        );

        // Simulated compute cost.
        tokio::time::sleep(Duration::from_millis(task.operation_time_ms)).await;

        let value = task.operator.apply(task.operand_a, task.operand_b);

        match submit_result(&client, &submit_url, task.id, value).await {
            Ok(true) => {
                tracing::info!("worker {} completed task {} with result {}", id, task.id, value);
            }
            Ok(false) => {
                // Storage rejected the write; the task stays unprocessed and
                // will be re-offered by the fallback scan.
                tracing::warn!("worker {} result for task {} was not accepted", id, task.id);
            }
            Err(e) => {
                tracing::warn!("worker {} error sending result: {}", id, e);
            }
        }
    }
}

pub(crate) async fn fetch_task(client: &reqwest::Client, url: &str) -> Result<WireTask> {
    let task = client.get(url).send().await?.json::<WireTask>().await?;
    Ok(task)
}

pub(crate) async fn submit_result(
    client: &reqwest::Client,
    url: &str,
    task_id: i64,
    value: f64,
) -> Result<bool> {
    let response = client
        .post(url)
        .json(&TaskResult { id: task_id, value })
        .send()
        .await?
        .json::<TaskResponse>()
        .await?;
    Ok(response.success)
}
