//! Runtime configuration loaded from the environment.
//!
//! Every knob has a default so the cluster runs out of the box; `.env` files
//! are honored when `dotenvy` is loaded by the binary before `from_env`.

use crate::engine::types::Operator;
use std::net::SocketAddr;
use std::str::FromStr;

/// Capacity of the in-memory dispatch queue. Large enough that the reducer
/// never has to block on enqueue under normal load.
pub const DISPATCH_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address of the user-facing HTTP API.
    pub api_addr: SocketAddr,
    /// Bind address of the worker-facing task service.
    pub task_addr: SocketAddr,
    /// Number of parallel workers in the agent pool.
    pub computing_power: usize,
    /// Simulated compute cost per operator, in milliseconds.
    pub addition_ms: u64,
    pub subtraction_ms: u64,
    pub multiplication_ms: u64,
    pub division_ms: u64,
    /// HMAC secret for signing access tokens.
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_addr: env_or("API_ADDR", SocketAddr::from(([127, 0, 0, 1], 8080))),
            task_addr: env_or("TASK_ADDR", SocketAddr::from(([127, 0, 0, 1], 50051))),
            computing_power: env_or("COMPUTING_POWER", 3),
            addition_ms: env_or("TIME_ADDITION_MS", 100),
            subtraction_ms: env_or("TIME_SUBTRACTION_MS", 100),
            multiplication_ms: env_or("TIME_MULTIPLICATIONS_MS", 200),
            division_ms: env_or("TIME_DIVISIONS_MS", 300),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "default_jwt_secret_key".to_string()),
        }
    }

    /// Simulated duration a worker should sleep before computing `op`.
    pub fn operation_time_ms(&self, op: Operator) -> u64 {
        match op {
            Operator::Add => self.addition_ms,
            Operator::Sub => self.subtraction_ms,
            Operator::Mul => self.multiplication_ms,
            Operator::Div => self.division_ms,
        }
    }
}

/// Reads an environment variable, falling back to `default` when the variable
/// is absent or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
