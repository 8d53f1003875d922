use crate::engine::types::{AtomicTask, Expression, ExpressionStatus, Operator};

use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A registered user and their credential hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
}

/// Outcome of persisting a task result.
///
/// `first_write` distinguishes the one transition `processed: false -> true`
/// from idempotent re-submissions, so that only the first write resolves the
/// owning expression's result future.
#[derive(Debug, Clone, Copy)]
pub struct TaskWrite {
    pub expression_id: i64,
    pub first_write: bool,
}

/// In-memory record store.
///
/// `DashMap`s keep individual operations lock-free from the caller's point of
/// view; all id assignment is monotonic via atomic counters.
pub struct Storage {
    users: DashMap<i64, User>,
    logins: DashMap<String, i64>,
    expressions: DashMap<i64, Expression>,
    tasks: DashMap<i64, AtomicTask>,
    next_user_id: AtomicI64,
    next_expression_id: AtomicI64,
    next_task_id: AtomicI64,
}

impl Storage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            users: DashMap::new(),
            logins: DashMap::new(),
            expressions: DashMap::new(),
            tasks: DashMap::new(),
            next_user_id: AtomicI64::new(0),
            next_expression_id: AtomicI64::new(0),
            next_task_id: AtomicI64::new(0),
        })
    }

    // --- Users ---

    /// Creates a user, failing when the login is already taken.
    pub fn create_user(&self, login: &str, password_hash: &str) -> Result<i64> {
        match self.logins.entry(login.to_string()) {
            Entry::Occupied(_) => anyhow::bail!("user {} already exists", login),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
                self.users.insert(
                    id,
                    User {
                        id,
                        login: login.to_string(),
                        password_hash: password_hash.to_string(),
                    },
                );
                slot.insert(id);
                Ok(id)
            }
        }
    }

    pub fn user_by_login(&self, login: &str) -> Result<User> {
        let id = *self
            .logins
            .get(login)
            .ok_or_else(|| anyhow::anyhow!("user {} not found", login))?;
        let user = self
            .users
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("user {} not found", login))?;
        Ok(user.value().clone())
    }

    // --- Expressions ---

    /// Allocates the next expression id. Monotonic across the store lifetime.
    pub fn next_expression_id(&self) -> i64 {
        self.next_expression_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Inserts or overwrites the expression record. Only the reducer (and the
    /// submission handler that creates the initial `Processing` record) write
    /// through here.
    pub fn save_expression(
        &self,
        id: i64,
        owner: i64,
        source: &str,
        status: ExpressionStatus,
        result: f64,
    ) -> Result<()> {
        self.expressions.insert(
            id,
            Expression {
                id,
                owner,
                source: source.to_string(),
                status,
                result,
            },
        );
        Ok(())
    }

    /// Fetches one expression, scoped to its owner.
    pub fn expression(&self, id: i64, owner: i64) -> Result<Expression> {
        let expr = self
            .expressions
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("expression {} not found", id))?;

        if expr.owner != owner {
            anyhow::bail!("expression {} not found", id);
        }

        Ok(expr.value().clone())
    }

    /// All expressions belonging to `owner`, ordered by id.
    pub fn expressions_for_user(&self, owner: i64) -> Vec<Expression> {
        let mut list: Vec<Expression> = self
            .expressions
            .iter()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by_key(|expr| expr.id);
        list
    }

    // --- Tasks ---

    /// Creates a fresh unprocessed task for one reduction step.
    pub fn create_task(
        &self,
        expression_id: i64,
        operand_a: f64,
        operand_b: f64,
        operator: Operator,
    ) -> Result<AtomicTask> {
        let id = self.next_task_id.fetch_add(1, Ordering::SeqCst) + 1;
        let task = AtomicTask {
            id,
            expression_id,
            operand_a,
            operand_b,
            operator,
            processed: false,
            result: 0.0,
        };
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Persists a task result.
    ///
    /// The first call transitions the task to `processed` and sets the
    /// result; later calls leave the record untouched and report
    /// `first_write: false`, which callers use to keep re-submissions from
    /// resolving a future that belongs to a newer step.
    pub fn complete_task(&self, task_id: i64, value: f64) -> Result<TaskWrite> {
        let mut task = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| anyhow::anyhow!("task {} not found", task_id))?;

        if task.processed {
            return Ok(TaskWrite {
                expression_id: task.expression_id,
                first_write: false,
            });
        }

        task.processed = true;
        task.result = value;

        Ok(TaskWrite {
            expression_id: task.expression_id,
            first_write: true,
        })
    }

    /// Up to `limit` unprocessed tasks, ordered by id. This is the fallback
    /// scan that re-offers tasks lost from the dispatch queue.
    pub fn unprocessed_tasks(&self, limit: usize) -> Result<Vec<AtomicTask>> {
        let mut tasks: Vec<AtomicTask> = self
            .tasks
            .iter()
            .filter(|entry| !entry.processed)
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by_key(|task| task.id);
        tasks.truncate(limit);
        Ok(tasks)
    }

    pub fn task_result(&self, task_id: i64) -> Result<(f64, bool)> {
        let task = self
            .tasks
            .get(&task_id)
            .ok_or_else(|| anyhow::anyhow!("task {} not found", task_id))?;
        Ok((task.result, task.processed))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
