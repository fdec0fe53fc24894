//! Mock collaborator implementations, one per `brpl_core::contracts` trait.
//!
//! Each mock is a plain owned/mutable struct, not an actor or a simulated
//! device — tests drive time and topology explicitly by mutating the mock
//! between calls into `brpl_core`, the same way the real host would drive
//! the core from its own event loop.

use brpl_core::contracts::{
    BrplQueueAdvert, Clock, NeighborTable, ParentSnapshot, ParentTable, ReferenceObjective,
    TrustOracle,
};
use brpl_core::ids::{DagId, NodeId, Rank};
use std::collections::HashMap;

/// A clock whose `now_seconds`/`now_ticks` only move when the test tells
/// them to, via [`SimClock::advance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    seconds: u64,
}

impl SimClock {
    pub fn new(start_seconds: u64) -> Self {
        Self { seconds: start_seconds }
    }

    pub fn advance(&mut self, seconds: u64) {
        self.seconds += seconds;
    }
}

impl Clock for SimClock {
    fn now_ticks(&self) -> u64 {
        self.seconds
    }

    fn now_seconds(&self) -> u64 {
        self.seconds
    }
}

/// A neighbor table the test populates directly; [`SimNeighborTable::set`]
/// replaces the current snapshot wholesale, mirroring how a real neighbor
/// cache is read at a single instant rather than incrementally diffed.
#[derive(Debug, Clone, Default)]
pub struct SimNeighborTable {
    current: Vec<NodeId>,
}

impl SimNeighborTable {
    pub fn new(initial: impl IntoIterator<Item = NodeId>) -> Self {
        Self { current: initial.into_iter().collect() }
    }

    pub fn set(&mut self, snapshot: impl IntoIterator<Item = NodeId>) {
        self.current = snapshot.into_iter().collect();
    }
}

impl NeighborTable for SimNeighborTable {
    fn neighbors(&self) -> Vec<NodeId> {
        self.current.clone()
    }
}

/// A parent table backed by a per-DAG `Vec<ParentSnapshot>` the test
/// populates directly.
#[derive(Debug, Clone, Default)]
pub struct SimParentTable {
    by_dag: HashMap<u8, Vec<ParentSnapshot>>,
}

impl SimParentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parents(&mut self, dag: DagId, parents: Vec<ParentSnapshot>) {
        self.by_dag.insert(dag.0, parents);
    }
}

impl ParentTable for SimParentTable {
    fn parents_on_dag(&self, dag: DagId) -> Vec<ParentSnapshot> {
        self.by_dag.get(&dag.0).cloned().unwrap_or_default()
    }
}

/// A reference objective (stand-in for MRHOF/OF0) with per-parent link
/// metric, path cost, and rank-via-parent tables the test fills in; any
/// parent not present reports metric/cost `0` and `rank_via_parent` `0`,
/// the same "absent means zero, not an error" convention the trait leaves
/// up to real implementations.
#[derive(Debug, Clone, Default)]
pub struct SimReferenceObjective {
    link_metric: HashMap<u16, u16>,
    usable: HashMap<u16, bool>,
    path_cost: HashMap<u16, u16>,
    rank_via_parent: HashMap<u16, Rank>,
    available: bool,
}

impl SimReferenceObjective {
    pub fn new() -> Self {
        Self { available: true, ..Default::default() }
    }

    pub fn with_parent(mut self, parent: NodeId, link_metric: u16, rank_via_parent: Rank) -> Self {
        self.link_metric.insert(parent.0, link_metric);
        self.usable.insert(parent.0, true);
        self.path_cost.insert(parent.0, link_metric);
        self.rank_via_parent.insert(parent.0, rank_via_parent);
        self
    }
}

impl ReferenceObjective for SimReferenceObjective {
    fn parent_link_metric(&self, parent: NodeId) -> u16 {
        *self.link_metric.get(&parent.0).unwrap_or(&0)
    }

    fn parent_has_usable_link(&self, parent: NodeId) -> bool {
        *self.usable.get(&parent.0).unwrap_or(&false)
    }

    fn parent_path_cost(&self, parent: NodeId) -> u16 {
        *self.path_cost.get(&parent.0).unwrap_or(&0)
    }

    fn rank_via_parent(&self, parent: NodeId) -> Rank {
        *self.rank_via_parent.get(&parent.0).unwrap_or(&Rank(0))
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// A gray-hole trust oracle the test can seed per node; unseeded nodes
/// report full trust, matching [`brpl_core::contracts::TrustOracle`]'s
/// "no observation yet" convention.
#[derive(Debug, Clone, Default)]
pub struct SimTrustOracle {
    gray: HashMap<u16, u16>,
}

impl SimTrustOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_gray(&mut self, node: NodeId, raw: u16) {
        self.gray.insert(node.0, raw);
    }
}

impl TrustOracle for SimTrustOracle {
    fn trust_gray_raw(&self, node: NodeId, scale: u32) -> u16 {
        *self.gray.get(&node.0).unwrap_or(&(scale as u16))
    }
}

/// Convenience constructor for a [`ParentSnapshot`] with no advertised
/// queue occupancy.
pub fn bare_parent(id: NodeId, rank: Rank) -> ParentSnapshot {
    ParentSnapshot { id, rank, brpl_queue: None }
}

/// Convenience constructor for a [`ParentSnapshot`] that advertises a
/// `queue`/`queue_max` pair.
pub fn parent_with_queue(id: NodeId, rank: Rank, queue: u16, queue_max: u16) -> ParentSnapshot {
    ParentSnapshot { id, rank, brpl_queue: Some(BrplQueueAdvert { queue, queue_max }) }
}
