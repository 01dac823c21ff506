//! Functional core for the findecisions project.
//!
//! This crate holds the domain types, the trait seams that the server binary
//! implements against concrete backends (cache, storage, queue, email, auth
//! provider), and the pure logic that does not touch I/O directly: cache key
//! construction, pagination math, error-to-status mapping, the auth
//! orchestrator and the notification consumer loop.

pub mod auth;
pub mod cache;
pub mod domain;
pub mod error;
pub mod queue;
pub mod storage;
