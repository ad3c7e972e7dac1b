//! Resource-allocation capacity engine.
//!
//! Decides whether an employee can take on a project for a time window
//! without blowing weekly capacity, scores conflicts among overlapping
//! allocations, and optimizes assignment of employees to role
//! requirements under availability and cost constraints.
//!
//! ARCHITECTURE (leaf-first):
//!   - `ledger`    — weekly capacity accounting, pure functions
//!   - `conflict`  — severity-tiered conflict detection
//!   - `matcher`   — priority-weighted skill matching
//!   - `optimizer` — greedy deterministic team selection
//!   - `engine`    — the orchestrator facade over the providers
//!
//! RULES:
//!   - Reads are pure functions over caller-supplied snapshots; no locks,
//!     no shared mutable state, safe to run concurrently.
//!   - The only write is the allocation upsert; the provider serializes
//!     the conflict check and the write per employee.
//!   - Over-allocation is a result, not an error. Malformed input is the
//!     only fatal condition.
//!   - Thresholds and blend weights are configuration, never literals.

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod matcher;
pub mod model;
pub mod optimizer;
pub mod rng;
pub mod sample;
pub mod store;
pub mod types;
