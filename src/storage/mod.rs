//! Durable Record Store
//!
//! Persists users, expressions, and atomic tasks, and is the single source of
//! truth for all of them; the dispatch queue and the result futures are only
//! signaling mechanisms layered on top.
//!
//! The store is constructed once at startup and injected (`Arc`) into every
//! component that needs it. The current backend is in-memory; the calling
//! code treats every operation as a synchronous, failure-reporting call and
//! does not assume any specific storage engine.

pub mod memory;

#[cfg(test)]
mod tests;
