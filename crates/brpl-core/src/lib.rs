//! BRPL: a trust-weighted parent-selection objective for RPL-like DAG
//! routing on constrained nodes.
//!
//! This crate contains:
//! - **Config** — tunables and defaults (`config`), validated fixed-point
//!   scale and thresholds
//! - **DAG state** — per-DAG queue/churn/path-cost tracking (`dag`), the
//!   queue occupancy meter (`queue`) and neighbor churn sampler
//!   (`neighbors`) it's built from
//! - **Trust** — per-parent sinkhole/gray-hole sub-scores and their
//!   combination (`trust`, `parent`)
//! - **Scoring** — the base weight function and trust penalty (`scoring`)
//! - **Comparator** — the objective-function vtable wrapping a reference
//!   objective (`comparator`)
//! - **Collaborator seams** — traits the host implements: clock, neighbor
//!   table, parent table, reference objective, trust oracle, log sink
//!   (`contracts`, `logging`)
//!
//! Every ratio and coefficient in this crate is fixed-point, scaled by
//! [`config::BrplConfig::scale`]; nothing here uses floating point.

pub mod comparator;
pub mod config;
pub mod contracts;
pub mod dag;
pub mod error;
pub mod fixedpoint;
pub mod ids;
pub mod logging;
pub mod neighbors;
pub mod parent;
pub mod queue;
pub mod scoring;
pub mod trust;

pub use comparator::{BrplObjective, OCP_BRPL};
pub use config::BrplConfig;
pub use error::BrplError;
pub use ids::{DagId, NodeId, Rank};
pub use parent::ParentTrustState;
