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

//! Module containing all type definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Node identification (the name of a router, unique within a simulation)
///
/// Names compare lexicographically. Auto-generated names are single uppercase
/// letters in ascending order.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create an identifier from anything string-like.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier following `self` in the auto-generation sequence. The
    /// final character is incremented, so `A` becomes `B`. Auto-generated
    /// names are single letters.
    pub(crate) fn successor(&self) -> NodeId {
        match self.0.chars().last() {
            Some(c) => {
                let mut name = self.0.clone();
                name.pop();
                name.push((c as u8 + 1) as char);
                NodeId(name)
            }
            None => NodeId::new("A"),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Cost of a single link (a strictly positive integer)
pub type LinkCost = u32;

/// Simulated time
pub type SimTime = f64;

/// Mapping from a neighbor to the cost of the direct link towards it
pub type DirectLinks = IndexMap<NodeId, LinkCost>;

/// A best-cost vector, mapping a destination to the advertised cost
pub type DistanceVector = IndexMap<NodeId, LinkCost>;

/// Full adjacency of the graph, mapping every node to its direct links
pub type Adjacency = IndexMap<NodeId, DirectLinks>;

/// Two-level distance table: via-neighbor, then destination, to total cost
pub type DistanceTable = IndexMap<NodeId, IndexMap<NodeId, LinkCost>>;

/// Routing table, mapping a destination to the cheapest known route
pub type RoutingTable = IndexMap<NodeId, RouteEntry>;

/// Any computed path cost above this sentinel is treated as "no route", and
/// the destination is dropped from the routing table.
pub const UNREACHABLE_THRESHOLD: LinkCost = 1000;

/// A remaining travel time within this epsilon of zero counts as delivered,
/// guarding against accumulated floating-point rounding.
pub const TIME_EPSILON: SimTime = 1e-9;

/// One routing table entry: the cheapest known cost to a destination and the
/// neighbor traffic is forwarded to.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Total cost of the cheapest known path
    pub cost: LinkCost,
    /// The neighbor the traffic is forwarded to
    pub next_hop: NodeId,
}

/// Validation errors for user input to topology mutation. The messages are
/// part of the wire contract and surfaced to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A cost did not parse as a strictly positive integer
    #[error("You can only enter integer costs!")]
    NonIntegerCost,
    /// A destination name does not exist on the graph
    #[error("Your destination nodes must be valid nodes on the graph!")]
    UnknownDestination,
    /// A node may not be linked to itself
    #[error("You cannot link a node to itself!")]
    SelfLoop,
}

/// Simulation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Invalid user input; no state was mutated
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),
    /// The named node is not part of the topology
    #[error("Node {0} was not found in the topology")]
    NodeNotFound(NodeId),
    /// The adjacency names a link on both endpoints with different costs
    #[error("Adjacency is not symmetric between {0} and {1}")]
    AsymmetricLink(NodeId, NodeId),
}
