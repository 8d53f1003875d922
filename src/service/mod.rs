//! Worker-Facing Task Service
//!
//! The protocol boundary between the engine and the remote worker pool.
//! Exposes two operations over HTTP:
//! - **`GetTask`**: hands out the next ready task, checking the dispatch
//!   queue first and falling back to the durable store's unprocessed scan.
//! - **`SubmitResult`**: persists a computed result and resolves the owning
//!   expression's result future, unblocking its reducer.
//!
//! Persistence errors degrade to "no task" / "submission unsuccessful"
//! responses instead of protocol errors, so a storage hiccup never crashes
//! the service; workers simply retry.
//!
//! ## Submodules
//! - **`protocol`**: Wire DTOs and endpoint constants.
//! - **`handlers`**: The axum handlers implementing both operations.

pub mod handlers;
pub mod protocol;

#[cfg(test)]
mod tests;
