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

#![deny(missing_docs, missing_debug_implementations)]

//! # The distance-vector engine
//!
//! This module simulates the convergence of the classical distributed
//! distance-vector routing protocol on a weighted undirected graph. Each
//! [`Node`](node::Node) maintains its own distance and routing tables and
//! reacts to neighbor advertisements and direct-link changes; the
//! [`Network`] owns the nodes, the master adjacency, and the queue of
//! in-flight [`Advertisement`]s, and advances discrete time with
//! [`Network::tick`] until no broadcasts remain in flight.
//!
//! Advertisements travel along links for a time equal to the link cost, and
//! hold the sender's best-cost vector as a value copy taken at send time.
//! Nodes are referenced by [`NodeId`] values everywhere; the network
//! resolves identifiers through its registry, so no message holds a
//! reference into a node.

pub(crate) mod advertisement;
pub mod history;
pub(crate) mod network;
pub mod node;
pub mod snapshot;
pub(crate) mod types;

pub use advertisement::Advertisement;
pub use history::{History, NodeRecord};
pub use network::Network;
pub use node::Node;
pub use snapshot::{
    ConnectionView, GraphSnapshot, LinkView, MessageView, NodeView, RoutingSnapshot,
};
pub use types::{
    Adjacency, DirectLinks, DistanceTable, DistanceVector, LinkCost, NodeId, RouteEntry,
    RoutingTable, SimError, SimTime, ValidationError, TIME_EPSILON, UNREACHABLE_THRESHOLD,
};
