// DVSim: Simulating Distance-Vector Route Convergence
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # History logs
//!
//! Time-keyed logs recorded at every event boundary, so a user interface can
//! scrub through simulated time: the full graph, every node's routing table,
//! and per-node distance and routing tables.
//!
//! Time advances monotonically, so each log is an append-only vector of
//! `(time, value)` pairs; recording at an already-recorded timestamp
//! replaces the entry. Timestamps are compared within an epsilon to absorb
//! floating-point rounding.

use crate::sim::snapshot::{GraphSnapshot, RoutingSnapshot};
use crate::sim::types::{DistanceTable, NodeId, RoutingTable, SimTime, TIME_EPSILON};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Distance and routing tables of one node at one recorded time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// The node's two-level distance table
    pub distance_table: DistanceTable,
    /// The node's collapsed routing table
    pub routing_table: RoutingTable,
}

fn same_time(a: SimTime, b: SimTime) -> bool {
    (a - b).abs() <= TIME_EPSILON
}

fn push_or_replace<T>(log: &mut Vec<(SimTime, T)>, time: SimTime, value: T) {
    match log.last_mut() {
        Some((t, slot)) if same_time(*t, time) => *slot = value,
        _ => log.push((time, value)),
    }
}

/// The three time-keyed logs of a simulation
#[derive(Debug, Clone, Default)]
pub struct History {
    graph: Vec<(SimTime, GraphSnapshot)>,
    routing: Vec<(SimTime, RoutingSnapshot)>,
    nodes: IndexMap<NodeId, Vec<(SimTime, NodeRecord)>>,
}

impl History {
    /// Create empty logs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded entries.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.routing.clear();
        self.nodes.clear();
    }

    /// Record the full graph at `time`.
    pub fn record_graph(&mut self, time: SimTime, snapshot: GraphSnapshot) {
        push_or_replace(&mut self.graph, time, snapshot);
    }

    /// Record every node's routing table at `time`.
    pub fn record_routing(&mut self, time: SimTime, snapshot: RoutingSnapshot) {
        push_or_replace(&mut self.routing, time, snapshot);
    }

    /// Record one node's distance and routing tables at `time`.
    pub fn record_node(&mut self, name: &NodeId, time: SimTime, record: NodeRecord) {
        push_or_replace(self.nodes.entry(name.clone()).or_default(), time, record);
    }

    /// The graph snapshot recorded at `time`, if any.
    pub fn graph_at(&self, time: SimTime) -> Option<&GraphSnapshot> {
        self.graph.iter().find(|(t, _)| same_time(*t, time)).map(|(_, snapshot)| snapshot)
    }

    /// The routing overview recorded at `time`, if any.
    pub fn routing_at(&self, time: SimTime) -> Option<&RoutingSnapshot> {
        self.routing.iter().find(|(t, _)| same_time(*t, time)).map(|(_, snapshot)| snapshot)
    }

    /// The time-ordered log of one node, if any entry was recorded.
    pub fn node_log(&self, name: &NodeId) -> Option<&[(SimTime, NodeRecord)]> {
        self.nodes.get(name).map(|log| log.as_slice())
    }

    /// All recorded graph entries, in time order.
    pub fn graph_log(&self) -> &[(SimTime, GraphSnapshot)] {
        &self.graph
    }

    /// All recorded routing entries, in time order.
    pub fn routing_log(&self) -> &[(SimTime, RoutingSnapshot)] {
        &self.routing
    }
}
