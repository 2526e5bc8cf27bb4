//! Common types used throughout the memory controller simulator.
//!
//! This module provides the fundamental building blocks shared across all
//! fidelity levels. It includes:
//! 1. **Value Types:** Cycle, address, and geometry index aliases.
//! 2. **Requests:** The `Request` record with its completion notifier.
//! 3. **Bank State:** The per-bank protocol state enumeration.
//! 4. **Error Handling:** Construction-time configuration errors.

/// Error types for controller construction.
pub mod error;

/// Core value types (cycles, addresses, requests, bank state).
pub mod types;

pub use error::ConfigError;
pub use types::{
    Address, BankState, Column, CompletionCallback, Cycle, Priority, Request, RequestId,
    RequestKind, Row,
};
