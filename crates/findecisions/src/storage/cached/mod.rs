//! Cached repository decorators.
//!
//! Each decorator wraps the backing store with a read-through cache and
//! applies the authorization rules for its entity. Cache failures are
//! soft: a broken cache degrades to direct store reads, never to request
//! failures. Invalidation runs only after a store write succeeds.

mod decision;
mod project;

pub use decision::{CachedDecisionRepository, DecisionPatch, NewDecision};
pub use project::{CachedProjectRepository, NewProject, ProjectPatch};
