//! Deterministic test harness for `brpl-core`.
//!
//! Provides mock implementations of every collaborator trait the core
//! consumes (`Clock`, `NeighborTable`, `ParentTable`, `ReferenceObjective`,
//! `TrustOracle`) plus scripted builders for the concrete end-to-end
//! scenarios BRPL's worked examples describe, so integration tests can
//! assemble exact inputs without hand-rolling stub structs per test.

pub mod mocks;
pub mod scenarios;
