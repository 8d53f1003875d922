//! Distributed Expression Calculator Library
//!
//! This library crate defines the core modules of the calculation cluster.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of loosely coupled subsystems:
//!
//! - **`engine`**: The decomposition-and-dispatch core. Reduces an arithmetic
//!   expression into a sequence of atomic binary operations and synchronizes
//!   each one with the remote worker that computes it.
//! - **`service`**: The worker-facing task protocol (`GetTask` / `SubmitResult`),
//!   bridging the dispatch queue, the durable store, and the result futures.
//! - **`agent`**: The worker pool. Independent pollers that request tasks,
//!   simulate compute cost, and report results back over HTTP.
//! - **`api`**: The user-facing HTTP API for registration, login, and
//!   expression submission/inspection.
//! - **`auth`**: Password hashing and JWT issuance/validation.
//! - **`storage`**: The durable record store for users, expressions, and tasks.
//! - **`config`**: Environment-driven runtime configuration.

pub mod agent;
pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod service;
pub mod storage;
