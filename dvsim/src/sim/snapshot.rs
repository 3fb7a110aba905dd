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

//! # Snapshots
//!
//! Value-typed projections of the simulation state, extracted for external
//! observation. Their serialized shape is the wire contract consumed by the
//! visualization layer.

use crate::sim::network::Network;
use crate::sim::types::{DirectLinks, LinkCost, NodeId, RoutingTable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One node entry of a graph snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    /// Node identifier
    pub id: NodeId,
}

/// One undirected edge, listed from the lower-ordered endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkView {
    /// Lower-ordered endpoint
    pub source: NodeId,
    /// Higher-ordered endpoint
    pub target: NodeId,
    /// Link cost
    pub label: LinkCost,
}

/// One in-flight advertisement with its progress along the link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    /// Sending node
    pub source: NodeId,
    /// Receiving node
    pub target: NodeId,
    /// Fraction of the link already traveled, in `[0, 1]`
    pub progress: f64,
}

/// Full graph snapshot: nodes, undirected links, and in-flight messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes, in creation order
    pub nodes: Vec<NodeView>,
    /// One entry per undirected edge, listed from the lower-ordered endpoint
    pub links: Vec<LinkView>,
    /// In-flight messages, in enqueue order
    pub messages: Vec<MessageView>,
}

impl GraphSnapshot {
    /// Extract the current graph from the network.
    pub fn from_net(net: &Network) -> Self {
        let nodes = net.nodes().map(|(id, _)| NodeView { id: id.clone() }).collect();
        let links = net
            .connections()
            .iter()
            .flat_map(|(source, links)| {
                links
                    .iter()
                    .filter(move |(target, _)| source < *target)
                    .map(move |(target, &label)| LinkView {
                        source: source.clone(),
                        target: target.clone(),
                        label,
                    })
            })
            .collect();
        let messages = net
            .queue()
            .iter()
            .map(|ad| MessageView {
                source: ad.source.clone(),
                target: ad.target.clone(),
                progress: ad.progress(),
            })
            .collect();
        Self { nodes, links, messages }
    }

    /// The same snapshot with the message list cleared, as returned by the
    /// topology mutation commands.
    pub fn without_messages(mut self) -> Self {
        self.messages.clear();
        self
    }
}

/// Routing tables of every node, keyed by node name
pub type RoutingSnapshot = IndexMap<NodeId, RoutingTable>;

/// The direct links of one node, wrapped for the connection query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionView {
    /// Cost of each incident link, keyed by neighbor
    pub cost: DirectLinks,
}
