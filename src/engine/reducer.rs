//! Per-expression reduction.
//!
//! `reduce` runs as an independent tokio task per expression. It repeatedly
//! extracts one atomic binary operation, dispatches it, and blocks on the
//! expression's result future until a worker reports the value, then splices
//! the value back into the operand list. Two passes resolve precedence:
//! `*`/`/` first, then `+`/`-`, each strictly left to right.
//!
//! The reducer never returns a value to a caller; every terminal outcome is
//! persisted on the expression record instead.

use super::dispatcher::Dispatcher;
use super::types::{ExpressionStatus, Operator, ReduceError};
use crate::storage::memory::Storage;

use std::sync::Arc;

/// Splits `source` into operand values and operator symbols, left to right.
///
/// Operands are single digits; any other character is skipped, which keeps
/// whitespace harmless and pushes garbage input into the count check below.
pub fn tokenize(source: &str) -> (Vec<f64>, Vec<Operator>) {
    let mut operands = Vec::new();
    let mut operators = Vec::new();

    for c in source.chars() {
        if let Some(op) = Operator::from_char(c) {
            operators.push(op);
        } else if c.is_ascii_digit() {
            operands.push(f64::from(c as u8 - b'0'));
        }
    }

    (operands, operators)
}

/// Reduces one expression to a single value and persists the terminal state.
pub async fn reduce(
    storage: Arc<Storage>,
    dispatcher: Arc<Dispatcher>,
    expression_id: i64,
    owner_id: i64,
    source: String,
) {
    let (mut operands, mut operators) = tokenize(&source);

    // A valid expression interleaves operands and operators.
    if operands.len() != operators.len() + 1 {
        fail(
            &storage,
            expression_id,
            owner_id,
            &source,
            ReduceError::MalformedExpression,
        );
        return;
    }

    // Pass 1: multiplication and division.
    let mut i = 0;
    while i < operators.len() {
        let op = operators[i];
        if !op.is_high_precedence() {
            i += 1;
            continue;
        }

        // Detected before any task is dispatched for this operator.
        if op == Operator::Div && operands[i + 1] == 0.0 {
            fail(
                &storage,
                expression_id,
                owner_id,
                &source,
                ReduceError::DivisionByZero,
            );
            return;
        }

        match reduce_step(
            &storage,
            &dispatcher,
            expression_id,
            operands[i],
            operands[i + 1],
            op,
        )
        .await
        {
            Ok(value) => {
                // Splice the result back in and re-check the same index,
                // since the lists just shrank.
                operands[i] = value;
                operands.remove(i + 1);
                operators.remove(i);
            }
            Err(e) => {
                fail(&storage, expression_id, owner_id, &source, e);
                return;
            }
        }
    }

    // Pass 2: addition and subtraction over whatever remains.
    let mut i = 0;
    while i < operators.len() {
        let op = operators[i];

        match reduce_step(
            &storage,
            &dispatcher,
            expression_id,
            operands[i],
            operands[i + 1],
            op,
        )
        .await
        {
            Ok(value) => {
                operands[i] = value;
                operands.remove(i + 1);
                operators.remove(i);
            }
            Err(e) => {
                fail(&storage, expression_id, owner_id, &source, e);
                return;
            }
        }
    }

    let result = operands[0];
    if let Err(e) = storage.save_expression(
        expression_id,
        owner_id,
        &source,
        ExpressionStatus::Completed,
        result,
    ) {
        tracing::error!(
            "failed to persist completion of expression {}: {}",
            expression_id,
            e
        );
        return;
    }

    tracing::info!("expression {} completed with result {}", expression_id, result);
}

/// Dispatches one atomic operation and blocks until its result arrives.
///
/// Order matters: the result future is registered before the task is
/// persisted, so that by the time any worker can see the task (through the
/// queue or the store's fallback scan) the future is already in place. The
/// wait has no timeout; a task that is never claimed stalls the expression
/// indefinitely.
async fn reduce_step(
    storage: &Arc<Storage>,
    dispatcher: &Arc<Dispatcher>,
    expression_id: i64,
    operand_a: f64,
    operand_b: f64,
    operator: Operator,
) -> Result<f64, ReduceError> {
    let result = dispatcher.register(expression_id);

    let task = match storage.create_task(expression_id, operand_a, operand_b, operator) {
        Ok(task) => task,
        Err(e) => {
            dispatcher.discard(expression_id);
            return Err(ReduceError::DispatchFailure(e.to_string()));
        }
    };

    if let Err(e) = dispatcher.enqueue(task.clone()) {
        dispatcher.discard(expression_id);
        return Err(ReduceError::DispatchFailure(e.to_string()));
    }

    tracing::debug!(
        "dispatched task {} for expression {}: {} {} {}",
        task.id,
        expression_id,
        operand_a,
        operator,
        operand_b
    );

    result
        .await
        .map_err(|_| ReduceError::DispatchFailure("result future dropped".to_string()))
}

/// Records a terminal reduction failure on the expression.
fn fail(
    storage: &Arc<Storage>,
    expression_id: i64,
    owner_id: i64,
    source: &str,
    error: ReduceError,
) {
    tracing::warn!("expression {} failed: {}", expression_id, error);

    if let Err(e) =
        storage.save_expression(expression_id, owner_id, source, ExpressionStatus::Error, 0.0)
    {
        tracing::error!(
            "failed to persist error state of expression {}: {}",
            expression_id,
            e
        );
    }
}
