//! Expression Decomposition and Dispatch Engine
//!
//! This module is the core of the calculator: it turns a user-submitted
//! arithmetic expression into a sequence of atomic binary operations and
//! hands each one to the remote worker pool, one at a time.
//!
//! ## Architecture Overview
//! The engine follows a **Pull-based** dispatch model with per-step
//! synchronization:
//! 1. **Reduction**: One reducer task per expression scans the operator list
//!    with left-to-right precedence resolution and extracts one atomic
//!    operation at a time.
//! 2. **Dispatch**: Each extracted operation is persisted to the durable store
//!    and enqueued on the bounded in-memory dispatch queue that workers poll.
//! 3. **Synchronization**: Before enqueueing, the reducer registers a one-shot
//!    result future keyed by expression id and then blocks on it. The task
//!    service resolves the future when a worker reports the result, which
//!    unblocks the reducer for the next step.
//!
//! At most one task is ever outstanding per expression; parallelism comes
//! from many expressions reducing concurrently.
//!
//! ## Submodules
//! - **`types`**: Expression/task records, the operator algebra, and the
//!   reduction error taxonomy.
//! - **`reducer`**: The per-expression decomposition algorithm.
//! - **`dispatcher`**: Owner of the dispatch queue and the result-future
//!   registry.

pub mod dispatcher;
pub mod reducer;
pub mod types;
