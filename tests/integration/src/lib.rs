//! Integration test utilities for the blog
//!
//! End-to-end tests drive the real router over HTTP. Storage is the
//! in-memory repository set from [`memory`], so no database is needed.

pub mod helpers;
pub mod memory;

pub use helpers::*;
pub use memory::MemoryDb;
