//! Typed error kinds the service raises on its own, as opposed to storage
//! failures, which travel as context-wrapped `anyhow` chains. Both types are
//! cheap value types so callers can match on them with `downcast_ref` and
//! compare payloads directly.

use thiserror::Error;

/// Raised by update/delete/get when no record carries the requested id. The
/// id is part of the value so "not found for which id" survives propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expense with id {id} not found")]
pub struct ExpenseNotFound {
    pub id: u32,
}

/// Raised by add/update before any store access when the amount is not
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("amount must be greater than zero, got {amount}")]
pub struct InvalidAmount {
    pub amount: f64,
}
