//! Worker Pool (Agent)
//!
//! Spawns the configured number of independent workers. Each worker is a
//! remote compute client in spirit: it talks to the task service exclusively
//! over HTTP, polls for a task, sleeps for the task's declared operation
//! time to simulate compute cost, computes the result locally, and submits
//! it back.
//!
//! Workers run for the lifetime of the process. Transport failures are
//! retried forever with a fixed backoff and never surface to an expression;
//! an unreported task is simply re-offered by the store's fallback scan.

pub mod worker;

pub use worker::start;
