//! User-Facing HTTP API
//!
//! Registration, login, expression submission, and expression inspection.
//! Submission creates the `Processing` record, hands the expression to a
//! freshly spawned reducer, and immediately returns the assigned id; clients
//! poll the expression endpoints to observe the terminal state.
//!
//! ## Submodules
//! - **`protocol`**: Request/response DTOs.
//! - **`handlers`**: The axum handlers and their error mapping.

pub mod handlers;
pub mod protocol;
