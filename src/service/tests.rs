//! Task Service Tests
//!
//! Exercises the two protocol operations directly as handler calls: queue
//! preference and store fallback for `GetTask`, persistence, future
//! resolution, and idempotence for `SubmitResult`.

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::engine::dispatcher::Dispatcher;
    use crate::engine::types::Operator;
    use crate::service::handlers::{handle_get_task, handle_submit_result};
    use crate::service::protocol::TaskResult;
    use crate::storage::memory::Storage;
    use axum::extract::Extension;
    use axum::Json;
    use std::net::SocketAddr;
    use std::sync::Arc;

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            api_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            task_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            computing_power: 1,
            addition_ms: 100,
            subtraction_ms: 100,
            multiplication_ms: 200,
            division_ms: 300,
            jwt_secret: "test_secret".to_string(),
        })
    }

    #[tokio::test]
    async fn test_get_task_empty_everywhere_reports_no_task() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        let Json(task) = handle_get_task(
            Extension(dispatcher),
            Extension(storage),
            Extension(test_config()),
        )
        .await;

        assert!(!task.has_task);
    }

    #[tokio::test]
    async fn test_get_task_prefers_the_queue() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        let queued = storage.create_task(1, 2.0, 3.0, Operator::Mul).unwrap();
        dispatcher.enqueue(queued.clone()).unwrap();

        let Json(task) = handle_get_task(
            Extension(dispatcher.clone()),
            Extension(storage),
            Extension(test_config()),
        )
        .await;

        assert!(task.has_task);
        assert_eq!(task.id, queued.id);
        assert_eq!(task.operand_a, 2.0);
        assert_eq!(task.operand_b, 3.0);
        assert_eq!(task.operator, Operator::Mul);
        assert_eq!(task.operation_time_ms, 200);

        // The queue copy is consumed.
        assert!(dispatcher.try_dequeue().await.is_none());
    }

    #[tokio::test]
    async fn test_get_task_falls_back_to_the_store_scan() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        // Persisted but never enqueued, as after a lost queue entry.
        let orphaned = storage.create_task(7, 6.0, 2.0, Operator::Div).unwrap();

        let Json(task) = handle_get_task(
            Extension(dispatcher),
            Extension(storage),
            Extension(test_config()),
        )
        .await;

        assert!(task.has_task);
        assert_eq!(task.id, orphaned.id);
        assert_eq!(task.operation_time_ms, 300);
    }

    #[tokio::test]
    async fn test_submit_result_persists_and_resolves_the_future() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        let task = storage.create_task(5, 3.0, 4.0, Operator::Add).unwrap();
        let rx = dispatcher.register(5);

        let Json(response) = handle_submit_result(
            Extension(dispatcher.clone()),
            Extension(storage.clone()),
            Json(TaskResult {
                id: task.id,
                value: 7.0,
            }),
        )
        .await;

        assert!(response.success);

        let (value, processed) = storage.task_result(task.id).unwrap();
        assert!(processed);
        assert_eq!(value, 7.0);

        assert_eq!(rx.await.unwrap(), 7.0);
        assert_eq!(dispatcher.waiting_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_result_without_a_waiter_still_persists() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        let task = storage.create_task(5, 1.0, 1.0, Operator::Add).unwrap();

        let Json(response) = handle_submit_result(
            Extension(dispatcher),
            Extension(storage.clone()),
            Json(TaskResult {
                id: task.id,
                value: 2.0,
            }),
        )
        .await;

        assert!(response.success);
        let (value, processed) = storage.task_result(task.id).unwrap();
        assert!(processed);
        assert_eq!(value, 2.0);
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_idempotent() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        let task = storage.create_task(5, 3.0, 4.0, Operator::Add).unwrap();

        let Json(first) = handle_submit_result(
            Extension(dispatcher.clone()),
            Extension(storage.clone()),
            Json(TaskResult {
                id: task.id,
                value: 7.0,
            }),
        )
        .await;
        assert!(first.success);

        // The expression has moved on to its next step by now.
        let mut rx = dispatcher.register(5);

        let Json(second) = handle_submit_result(
            Extension(dispatcher.clone()),
            Extension(storage.clone()),
            Json(TaskResult {
                id: task.id,
                value: 99.0,
            }),
        )
        .await;

        // Still reported as success, but the record keeps the first value and
        // the newer step's future is untouched.
        assert!(second.success);
        let (value, processed) = storage.task_result(task.id).unwrap();
        assert!(processed);
        assert_eq!(value, 7.0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_submit_result_for_unknown_task_fails_softly() {
        let storage = Storage::new();
        let dispatcher = Dispatcher::new();

        let Json(response) = handle_submit_result(
            Extension(dispatcher),
            Extension(storage),
            Json(TaskResult { id: 404, value: 1.0 }),
        )
        .await;

        assert!(!response.success);
    }
}
