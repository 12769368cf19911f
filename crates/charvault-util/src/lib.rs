//! Shared utilities for charvault.
//!
//! This crate provides common utilities used across the charvault workspace:
//! - Prefixed ULID identifiers for characters and snapshots
//! - Logging setup with tracing
//! - XDG-style directory lookup
//! - RAII-based timing for slow persistence operations

pub mod id;
pub mod log;
pub mod path;
pub mod timing;

pub use id::{IdPrefix, Identifier};
pub use timing::TimingGuard;
