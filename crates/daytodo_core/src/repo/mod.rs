//! Repository layer over shared storage.
//!
//! # Responsibility
//! - Define the whole-list memo persistence contract.
//! - Isolate wire encoding from store orchestration.
//!
//! # Invariants
//! - Decode failures surface as `RepoError::Decode`, never as panics.

pub mod memo_repo;
