//! Storage Tests
//!
//! Validates the record-store mechanics: monotonic id assignment, user
//! uniqueness, expression upsert/ownership scoping, and the single
//! `processed: false -> true` transition on tasks.

#[cfg(test)]
mod tests {
    use crate::engine::types::{ExpressionStatus, Operator};
    use crate::storage::memory::Storage;

    // ============================================================
    // Users
    // ============================================================

    #[test]
    fn test_create_and_look_up_user() {
        let storage = Storage::new();

        let id = storage.create_user("alice", "hash-a").unwrap();
        let user = storage.user_by_login("alice").unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.login, "alice");
        assert_eq!(user.password_hash, "hash-a");
    }

    #[test]
    fn test_duplicate_login_is_rejected() {
        let storage = Storage::new();

        storage.create_user("alice", "hash-a").unwrap();
        let result = storage.create_user("alice", "hash-b");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[test]
    fn test_unknown_login_is_an_error() {
        let storage = Storage::new();

        assert!(storage.user_by_login("nobody").is_err());
    }

    // ============================================================
    // Expressions
    // ============================================================

    #[test]
    fn test_expression_ids_are_monotonic() {
        let storage = Storage::new();

        let first = storage.next_expression_id();
        let second = storage.next_expression_id();

        assert!(second > first);
    }

    #[test]
    fn test_expression_upsert_and_fetch() {
        let storage = Storage::new();

        let id = storage.next_expression_id();
        storage
            .save_expression(id, 1, "3+4", ExpressionStatus::Processing, 0.0)
            .unwrap();

        let expr = storage.expression(id, 1).unwrap();
        assert_eq!(expr.status, ExpressionStatus::Processing);
        assert_eq!(expr.result, 0.0);

        // Same id written again replaces the record.
        storage
            .save_expression(id, 1, "3+4", ExpressionStatus::Completed, 7.0)
            .unwrap();

        let expr = storage.expression(id, 1).unwrap();
        assert_eq!(expr.status, ExpressionStatus::Completed);
        assert_eq!(expr.result, 7.0);
    }

    #[test]
    fn test_expression_is_scoped_to_its_owner() {
        let storage = Storage::new();

        let id = storage.next_expression_id();
        storage
            .save_expression(id, 1, "3+4", ExpressionStatus::Processing, 0.0)
            .unwrap();

        assert!(storage.expression(id, 2).is_err());
    }

    #[test]
    fn test_expression_listing_is_per_user_and_ordered() {
        let storage = Storage::new();

        let id_a = storage.next_expression_id();
        let id_b = storage.next_expression_id();
        let id_other = storage.next_expression_id();
        storage
            .save_expression(id_b, 1, "1+1", ExpressionStatus::Processing, 0.0)
            .unwrap();
        storage
            .save_expression(id_a, 1, "2+2", ExpressionStatus::Completed, 4.0)
            .unwrap();
        storage
            .save_expression(id_other, 2, "3+3", ExpressionStatus::Processing, 0.0)
            .unwrap();

        let list = storage.expressions_for_user(1);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, id_a);
        assert_eq!(list[1].id, id_b);
    }

    // ============================================================
    // Tasks
    // ============================================================

    #[test]
    fn test_task_creation_assigns_monotonic_ids() {
        let storage = Storage::new();

        let first = storage.create_task(1, 1.0, 2.0, Operator::Add).unwrap();
        let second = storage.create_task(1, 3.0, 4.0, Operator::Mul).unwrap();

        assert!(second.id > first.id);
        assert!(!first.processed);
        assert_eq!(first.expression_id, 1);
    }

    #[test]
    fn test_complete_task_transitions_exactly_once() {
        let storage = Storage::new();
        let task = storage.create_task(9, 8.0, 2.0, Operator::Div).unwrap();

        let write = storage.complete_task(task.id, 4.0).unwrap();
        assert!(write.first_write);
        assert_eq!(write.expression_id, 9);

        // Result is immutable once processed.
        let write = storage.complete_task(task.id, 123.0).unwrap();
        assert!(!write.first_write);

        let (value, processed) = storage.task_result(task.id).unwrap();
        assert!(processed);
        assert_eq!(value, 4.0);
    }

    #[test]
    fn test_complete_unknown_task_is_an_error() {
        let storage = Storage::new();

        assert!(storage.complete_task(404, 1.0).is_err());
    }

    #[test]
    fn test_unprocessed_scan_respects_limit_and_order() {
        let storage = Storage::new();

        let first = storage.create_task(1, 1.0, 1.0, Operator::Add).unwrap();
        let second = storage.create_task(1, 2.0, 2.0, Operator::Add).unwrap();
        let third = storage.create_task(2, 3.0, 3.0, Operator::Add).unwrap();

        let batch = storage.unprocessed_tasks(2).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, first.id);
        assert_eq!(batch[1].id, second.id);

        // Completed tasks drop out of the scan.
        storage.complete_task(first.id, 2.0).unwrap();
        let batch = storage.unprocessed_tasks(10).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, second.id);
        assert_eq!(batch[1].id, third.id);
    }
}
