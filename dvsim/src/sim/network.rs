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

//! # Simulation state
//!
//! This module holds the authoritative simulation state: the ordered node
//! registry, the master adjacency, the queue of in-flight advertisements,
//! and the simulated clock. It drives broadcasts, advances discrete time,
//! and exposes the topology mutations.

use crate::sim::advertisement::{AdQueue, Advertisement};
use crate::sim::node::Node;
use crate::sim::snapshot::{GraphSnapshot, RoutingSnapshot};
use crate::sim::types::{
    Adjacency, DirectLinks, NodeId, SimError, SimTime, ValidationError,
};
use indexmap::IndexMap;
use log::*;

/// # Network
///
/// The authoritative registry of nodes and undirected links. The network
/// owns the queue of in-flight advertisements and the simulated clock, and
/// serializes every delivery: within one [`Network::tick`], all due messages
/// are delivered in enqueue order before any resulting re-broadcast is
/// enqueued.
///
/// The master adjacency is kept symmetric at all times: every link appears
/// identically on both endpoints. Topology mutations purge queued
/// advertisements whose endpoints or link no longer exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// All nodes, in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Master adjacency, mirrored on both endpoints of every link
    connections: Adjacency,
    /// In-flight advertisements, in enqueue order
    queue: AdQueue,
    /// Simulated time since initialization
    time_from_start: SimTime,
}

impl Network {
    /// Build a network from a full adjacency description. The adjacency is
    /// validated first: self-loops, zero costs, links to undeclared nodes,
    /// and asymmetric costs are rejected.
    pub fn from_adjacency(connections: Adjacency) -> Result<Self, SimError> {
        Self::check_adjacency(&connections)?;
        let mut nodes = IndexMap::new();
        for (name, links) in connections.iter() {
            nodes.insert(name.clone(), Node::new(name.clone(), links.clone()));
        }
        Ok(Self { nodes, connections, queue: AdQueue::new(), time_from_start: 0.0 })
    }

    fn check_adjacency(adjacency: &Adjacency) -> Result<(), SimError> {
        for (name, links) in adjacency.iter() {
            for (neighbor, &cost) in links.iter() {
                if neighbor == name {
                    return Err(ValidationError::SelfLoop.into());
                }
                if cost == 0 {
                    return Err(ValidationError::NonIntegerCost.into());
                }
                match adjacency.get(neighbor) {
                    None => return Err(SimError::NodeNotFound(neighbor.clone())),
                    Some(back) => match back.get(name) {
                        Some(&mirror) if mirror == cost => {}
                        _ => {
                            return Err(SimError::AsymmetricLink(name.clone(), neighbor.clone()))
                        }
                    },
                }
            }
        }
        Ok(())
    }

    /// Simulated time since initialization
    pub fn time_from_start(&self) -> SimTime {
        self.time_from_start
    }

    /// True iff no advertisement is in flight
    pub fn is_quiescent(&self) -> bool {
        self.queue.is_empty()
    }

    /// The master adjacency
    pub fn connections(&self) -> &Adjacency {
        &self.connections
    }

    /// Look up a node by name
    pub fn get_node(&self, name: &NodeId) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Iterate over all nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    pub(crate) fn queue(&self) -> &AdQueue {
        &self.queue
    }

    /// Initiate convergence: enqueue one broadcast from every node to each of
    /// its direct neighbors.
    pub fn run(&mut self) {
        debug!("initiating convergence: broadcasting from every node");
        let names: Vec<NodeId> = self.nodes.keys().cloned().collect();
        for name in names {
            self.broadcast(&name);
        }
    }

    /// Enqueue one advertisement from `name` to each of its direct
    /// neighbors, carrying a copy of the node's shared vector. The copy is
    /// required so later updates to the node do not retroactively alter
    /// in-flight messages.
    pub fn broadcast(&mut self, name: &NodeId) {
        let (links, shared) = match self.nodes.get(name) {
            Some(node) => (node.direct_links().clone(), node.shared_vector().clone()),
            None => return,
        };
        for (neighbor, &cost) in links.iter() {
            trace!("{} -> {}: advertising {} destinations", name, neighbor, shared.len());
            self.queue.push_back(Advertisement::new(
                name.clone(),
                neighbor.clone(),
                cost,
                shared.clone(),
            ));
        }
    }

    /// Advance simulated time by `dt`, or, if `dt` is `None`, by the time to
    /// the next delivery. With `None` and an empty queue, the clock does not
    /// advance and the call returns immediately.
    ///
    /// Every due message is delivered in enqueue order; nodes whose routing
    /// changed re-broadcast once, after all deliveries. Returns the nodes
    /// that received at least one advertisement (first-seen order) and a
    /// flag that is true iff the queue is now empty.
    pub fn tick(&mut self, dt: Option<SimTime>) -> (Vec<NodeId>, bool) {
        let dt = match dt {
            Some(dt) => dt,
            None => {
                match self
                    .queue
                    .iter()
                    .map(|ad| ad.remaining)
                    .min_by(|a, b| a.partial_cmp(b).unwrap())
                {
                    Some(next) => next,
                    None => return (Vec::new(), true),
                }
            }
        };
        self.time_from_start += dt;
        for ad in self.queue.iter_mut() {
            ad.elapse(dt);
        }

        let mut received: Vec<NodeId> = Vec::new();
        let mut to_broadcast: Vec<NodeId> = Vec::new();
        let mut remaining = AdQueue::new();
        while let Some(ad) = self.queue.pop_front() {
            if !ad.is_delivered() {
                remaining.push_back(ad);
                continue;
            }
            trace!("{} -> {}: delivered at t={}", ad.source, ad.target, self.time_from_start);
            let node = match self.nodes.get_mut(&ad.target) {
                Some(node) => node,
                None => continue,
            };
            if !received.contains(&ad.target) {
                received.push(ad.target.clone());
            }
            if node.update_from_neighbor(&ad.source, ad.payload) && !to_broadcast.contains(&ad.target)
            {
                to_broadcast.push(ad.target);
            }
        }
        self.queue = remaining;

        for name in to_broadcast.iter() {
            self.broadcast(name);
        }
        (received, self.queue.is_empty())
    }

    /// Create a node with no links, named after the successor of the current
    /// lexicographic maximum (`A` on an empty graph). Returns the new name.
    pub fn add_node(&mut self) -> NodeId {
        let name = match self.connections.keys().max() {
            Some(max) => max.successor(),
            None => NodeId::new("A"),
        };
        debug!("adding node {}", name);
        self.nodes.insert(name.clone(), Node::new(name.clone(), DirectLinks::new()));
        self.connections.insert(name.clone(), DirectLinks::new());
        name
    }

    /// Delete a node: purge all incident links from the master adjacency and
    /// all queued advertisements touching the node, then let every surviving
    /// node recompute its tables and re-broadcast where routing changed.
    pub fn remove_node(&mut self, name: &NodeId) -> Result<(), SimError> {
        if self.nodes.shift_remove(name).is_none() {
            return Err(SimError::NodeNotFound(name.clone()));
        }
        debug!("removing node {}", name);
        self.connections.shift_remove(name);
        for links in self.connections.values_mut() {
            links.shift_remove(name);
        }
        self.queue.retain(|ad| &ad.source != name && &ad.target != name);
        self.refresh_direct_links();
        Ok(())
    }

    /// Replace the direct links of `name` atomically: the node is removed
    /// from every previous neighbor and mirrored into every new one, keeping
    /// the adjacency symmetric. Queued advertisements traveling a link that
    /// no longer exists are dropped. Every node recomputes its tables and
    /// re-broadcasts where routing changed.
    pub fn edit_node(&mut self, name: &NodeId, new_links: DirectLinks) -> Result<(), SimError> {
        if !self.connections.contains_key(name) {
            return Err(SimError::NodeNotFound(name.clone()));
        }
        for (neighbor, &cost) in new_links.iter() {
            if cost == 0 {
                return Err(ValidationError::NonIntegerCost.into());
            }
            if !self.connections.contains_key(neighbor) {
                return Err(ValidationError::UnknownDestination.into());
            }
        }
        if new_links.contains_key(name) {
            return Err(ValidationError::SelfLoop.into());
        }
        debug!("editing node {}: {} links", name, new_links.len());

        let old: Vec<NodeId> = self
            .connections
            .get(name)
            .map(|links| links.keys().cloned().collect())
            .unwrap_or_default();
        for neighbor in old {
            if let Some(links) = self.connections.get_mut(&neighbor) {
                links.shift_remove(name);
            }
        }
        self.connections.insert(name.clone(), new_links.clone());
        for (neighbor, &cost) in new_links.iter() {
            if let Some(links) = self.connections.get_mut(neighbor) {
                links.insert(name.clone(), cost);
            }
        }

        let connections = &self.connections;
        self.queue.retain(|ad| {
            connections
                .get(&ad.source)
                .map(|links| links.contains_key(&ad.target))
                .unwrap_or(false)
        });
        self.refresh_direct_links();
        Ok(())
    }

    /// Push the (possibly changed) master adjacency down to every node and
    /// re-broadcast from the ones whose routing changed.
    fn refresh_direct_links(&mut self) {
        let mut to_broadcast: Vec<NodeId> = Vec::new();
        let names: Vec<NodeId> = self.nodes.keys().cloned().collect();
        for name in names {
            let links = self.connections.get(&name).cloned().unwrap_or_default();
            if let Some(node) = self.nodes.get_mut(&name) {
                if node.update_direct_links(links) {
                    to_broadcast.push(name);
                }
            }
        }
        for name in to_broadcast {
            self.broadcast(&name);
        }
    }

    /// Extract the current graph snapshot (nodes, links, in-flight messages).
    pub fn graph_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from_net(self)
    }

    /// Extract every node's routing table, keyed by node.
    pub fn routing_snapshot(&self) -> RoutingSnapshot {
        self.nodes
            .iter()
            .map(|(name, node)| (name.clone(), node.routing_table().clone()))
            .collect()
    }
}
