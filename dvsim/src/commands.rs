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

//! # Command surface
//!
//! The operations consumed by the external HTTP layer: initialize, run one
//! convergence episode, step, reset, mutate the topology, and query the
//! recorded snapshots and logs. The [`Simulator`] pairs a [`Network`] with
//! its [`History`] and the initial adjacency (for `reset`), and records
//! snapshots at every event boundary.

use crate::error::Error;
use crate::sim::history::{History, NodeRecord};
use crate::sim::network::Network;
use crate::sim::snapshot::{ConnectionView, GraphSnapshot, MessageView, RoutingSnapshot};
use crate::sim::types::{Adjacency, DirectLinks, LinkCost, NodeId, SimError, SimTime, ValidationError};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::TryFrom;

/// Hard bound on simulated time within one convergence episode. When it
/// trips, the episode ends regardless of the queue state; the caller sees
/// this in the returned `max_time`.
pub const EPISODE_TIME_LIMIT: SimTime = 100.0;

/// Fixed step used while driving a convergence episode. Half of the smallest
/// possible link cost, so no integer-offset delivery can be skipped.
pub const EPISODE_TICK: SimTime = 0.5;

/// Report returned by [`Simulator::run_to_quiescence`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Simulated time when the episode ended (quiescence or the time limit)
    pub max_time: SimTime,
    /// Messages in flight right after the initiating broadcasts
    pub initial_messages: Vec<MessageView>,
}

/// Outcome of a single [`Simulator::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Nodes that received at least one advertisement, in first-seen order
    pub delivered: Vec<NodeId>,
    /// True iff no advertisement remains in flight
    pub quiescent: bool,
}

/// The command surface: a simulation, the adjacency it was initialized
/// with, and the logs recorded while driving it.
#[derive(Debug)]
pub struct Simulator {
    initial: Adjacency,
    net: Network,
    history: History,
}

impl Simulator {
    /// Initialize a simulation from an adjacency description. The adjacency
    /// is validated (symmetry, positive integer costs, no self-loops).
    pub fn new(adjacency: Adjacency) -> Result<Self, Error> {
        let net = Network::from_adjacency(adjacency.clone())?;
        Ok(Self { initial: adjacency, net, history: History::new() })
    }

    /// Immutable access to the simulation state
    pub fn network(&self) -> &Network {
        &self.net
    }

    /// Immutable access to the recorded logs
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The current graph snapshot, including in-flight messages.
    pub fn graph(&self) -> GraphSnapshot {
        self.net.graph_snapshot()
    }

    /// Run one convergence episode: broadcast from every node, then tick in
    /// fixed half-unit steps until no advertisement remains in flight or the
    /// episode time limit trips. Snapshots are recorded after the initiating
    /// broadcasts and after every tick.
    pub fn run_to_quiescence(&mut self) -> EpisodeReport {
        debug!("episode start at t={}", self.net.time_from_start());
        self.net.run();
        self.record_full();
        let initial_messages = self.net.graph_snapshot().messages;
        loop {
            let (received, quiescent) = self.net.tick(Some(EPISODE_TICK));
            self.record_tick(&received);
            if quiescent || self.net.time_from_start() >= EPISODE_TIME_LIMIT {
                break;
            }
        }
        debug!("episode end at t={}", self.net.time_from_start());
        EpisodeReport { max_time: self.net.time_from_start(), initial_messages }
    }

    /// Advance the simulation by one tick (to the next delivery if `dt` is
    /// `None`) and record snapshots at the new time.
    pub fn step(&mut self, dt: Option<SimTime>) -> StepOutcome {
        let (delivered, quiescent) = self.net.tick(dt);
        self.record_tick(&delivered);
        StepOutcome { delivered, quiescent }
    }

    /// Rebuild the simulation from the initial adjacency and drop all logs.
    pub fn reset(&mut self) -> Result<GraphSnapshot, Error> {
        debug!("resetting simulation");
        self.net = Network::from_adjacency(self.initial.clone())?;
        self.history.clear();
        Ok(self.mutation_snapshot())
    }

    /// Create a node with no links and an auto-generated name.
    pub fn add_node(&mut self) -> GraphSnapshot {
        self.net.add_node();
        self.mutation_snapshot()
    }

    /// Delete a node and everything referencing it.
    pub fn remove_node(&mut self, name: &str) -> Result<GraphSnapshot, Error> {
        self.net.remove_node(&NodeId::from(name))?;
        Ok(self.mutation_snapshot())
    }

    /// Replace the direct links of a node from raw user input of the shape
    /// `{destination: {"cost": value}}`. Costs must parse as strictly
    /// positive integers, destinations must exist on the graph, and a node
    /// cannot be linked to itself; destinations with blank names are
    /// silently discarded. On any validation error, no state is mutated.
    pub fn edit_node(&mut self, name: &str, input: &Map<String, Value>) -> Result<GraphSnapshot, Error> {
        let links = parse_link_input(input, self.net.connections())?;
        self.net.edit_node(&NodeId::from(name), links)?;
        Ok(self.mutation_snapshot())
    }

    /// The direct links of a node, wrapped for the connection query.
    pub fn get_connection(&self, name: &str) -> Result<ConnectionView, Error> {
        let id = NodeId::from(name);
        match self.net.connections().get(&id) {
            Some(links) => Ok(ConnectionView { cost: links.clone() }),
            None => Err(SimError::NodeNotFound(id).into()),
        }
    }

    /// The graph snapshot recorded at `timestamp`.
    pub fn get_snapshot_at(&self, timestamp: SimTime) -> Result<&GraphSnapshot, Error> {
        self.history.graph_at(timestamp).ok_or(Error::SnapshotNotFound(timestamp))
    }

    /// The all-nodes routing overview recorded at `timestamp`.
    pub fn get_routing_at(&self, timestamp: SimTime) -> Result<&RoutingSnapshot, Error> {
        self.history.routing_at(timestamp).ok_or(Error::RoutingNotFound(timestamp))
    }

    /// The time-indexed distance and routing tables of one node.
    pub fn get_node_log(&self, name: &str) -> Result<&[(SimTime, NodeRecord)], Error> {
        let id = NodeId::from(name);
        self.history.node_log(&id).ok_or(Error::NodeLogNotFound(id))
    }

    /// Snapshot returned by the topology mutation commands: the current
    /// graph with the message list cleared.
    fn mutation_snapshot(&self) -> GraphSnapshot {
        self.net.graph_snapshot().without_messages()
    }

    /// Record graph, routing, and every node's tables at the current time.
    fn record_full(&mut self) {
        let time = self.net.time_from_start();
        self.history.record_graph(time, self.net.graph_snapshot());
        self.history.record_routing(time, self.net.routing_snapshot());
        let names: Vec<NodeId> = self.net.nodes().map(|(id, _)| id.clone()).collect();
        for name in names {
            self.record_node(&name, time);
        }
    }

    /// Record graph and routing at the current time, plus the tables of the
    /// nodes that received an advertisement this tick.
    fn record_tick(&mut self, received: &[NodeId]) {
        let time = self.net.time_from_start();
        self.history.record_graph(time, self.net.graph_snapshot());
        self.history.record_routing(time, self.net.routing_snapshot());
        for name in received {
            self.record_node(name, time);
        }
    }

    fn record_node(&mut self, name: &NodeId, time: SimTime) {
        if let Some(node) = self.net.get_node(name) {
            let record = NodeRecord {
                distance_table: node.distance_table().clone(),
                routing_table: node.routing_table().clone(),
            };
            self.history.record_node(name, time, record);
        }
    }
}

/// Parse the raw `edit_node` input. Entries are checked one at a time, in
/// input order: the cost must parse first, then the destination must exist
/// on the graph, before the next entry is examined. Each entry is
/// `{"cost": value}` (a bare value is tolerated); the cost may be a JSON
/// integer or a string holding one, matching what a form field submits.
fn parse_link_input(
    input: &Map<String, Value>,
    connections: &Adjacency,
) -> Result<DirectLinks, Error> {
    let mut links = DirectLinks::new();
    for (dest, entry) in input.iter() {
        let dest = dest.trim();
        if dest.is_empty() {
            continue;
        }
        let raw = entry.get("cost").unwrap_or(entry);
        let cost = parse_cost(raw)?;
        let dest = NodeId::from(dest);
        if !connections.contains_key(&dest) {
            return Err(ValidationError::UnknownDestination.into());
        }
        links.insert(dest, cost);
    }
    Ok(links)
}

fn parse_cost(value: &Value) -> Result<LinkCost, Error> {
    let cost = match value {
        Value::Number(n) => n.as_u64().and_then(|c| LinkCost::try_from(c).ok()),
        Value::String(s) => s.trim().parse::<LinkCost>().ok(),
        _ => None,
    };
    match cost {
        Some(cost) if cost > 0 => Ok(cost),
        _ => Err(ValidationError::NonIntegerCost.into()),
    }
}
