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

//! Module defining a single distance-vector router.

use crate::sim::types::{
    DirectLinks, DistanceTable, DistanceVector, LinkCost, NodeId, RouteEntry, RoutingTable,
    UNREACHABLE_THRESHOLD,
};
use indexmap::IndexMap;
use itertools::Itertools;
use log::*;

/// A single router running the distance-vector protocol.
///
/// The node holds the costs of its direct links, a cache of the most recent
/// best-cost vector received from each neighbor, the two-level distance
/// table derived from them, and the collapsed cheapest-route table. All maps
/// are insertion-ordered; tie-breaks during best-cost selection depend on
/// that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name of the node
    name: NodeId,
    /// Costs of the direct links, keyed by neighbor
    direct: DirectLinks,
    /// Most recently received best-cost vector, per neighbor. Kept separate
    /// from the distance table so a direct-link change can recompute the
    /// columns without re-receiving the vectors.
    neighbor_vectors: IndexMap<NodeId, DistanceVector>,
    /// Distance table: via-neighbor, then destination, to total cost
    distance: DistanceTable,
    /// Cheapest known route per destination
    routes: RoutingTable,
    /// Projection of `routes` without next hops, sent in advertisements
    shared: DistanceVector,
}

impl Node {
    /// Create a node with the given direct links. The distance table diagonal
    /// and the routing table are seeded from the links; no neighbor vectors
    /// are cached yet.
    pub(crate) fn new(name: NodeId, direct: DirectLinks) -> Self {
        let mut distance = DistanceTable::new();
        let mut routes = RoutingTable::new();
        let mut shared = DistanceVector::new();
        for (neighbor, &cost) in direct.iter() {
            distance
                .entry(neighbor.clone())
                .or_insert_with(IndexMap::new)
                .insert(neighbor.clone(), cost);
            routes.insert(neighbor.clone(), RouteEntry { cost, next_hop: neighbor.clone() });
            shared.insert(neighbor.clone(), cost);
        }
        Self { name, direct, neighbor_vectors: IndexMap::new(), distance, routes, shared }
    }

    /// Name of the node
    pub fn name(&self) -> &NodeId {
        &self.name
    }

    /// Costs of the direct links, keyed by neighbor
    pub fn direct_links(&self) -> &DirectLinks {
        &self.direct
    }

    /// The current distance table
    pub fn distance_table(&self) -> &DistanceTable {
        &self.distance
    }

    /// The current routing table
    pub fn routing_table(&self) -> &RoutingTable {
        &self.routes
    }

    /// The vector this node advertises to its neighbors
    pub fn shared_vector(&self) -> &DistanceVector {
        &self.shared
    }

    /// Store the advertised vector of a neighbor, recompute that neighbor's
    /// column of the distance table, and rerun best-cost selection. Returns
    /// whether the cheapest-route table changed.
    ///
    /// An advertisement from a sender that is not a current direct neighbor
    /// is ignored; this happens when a link is edited away while a message is
    /// still in flight.
    pub(crate) fn update_from_neighbor(&mut self, from: &NodeId, vector: DistanceVector) -> bool {
        if !self.direct.contains_key(from) {
            debug!("{}: ignoring advertisement from non-neighbor {}", self.name, from);
            return false;
        }
        self.neighbor_vectors.insert(from.clone(), vector);
        self.refresh_column(from);
        self.select_best()
    }

    /// Replace the direct links wholesale. Columns and cached vectors of
    /// vanished neighbors are dropped, the distance table diagonal is seeded
    /// with the new costs, every remaining column is recomputed, and
    /// best-cost selection is rerun. Returns whether the cheapest-route table
    /// changed.
    pub(crate) fn update_direct_links(&mut self, new_direct: DirectLinks) -> bool {
        self.direct = new_direct;
        let seeds: Vec<(NodeId, LinkCost)> =
            self.direct.iter().map(|(n, &c)| (n.clone(), c)).collect();
        for (neighbor, cost) in seeds {
            self.distance
                .entry(neighbor.clone())
                .or_insert_with(IndexMap::new)
                .insert(neighbor, cost);
        }
        let direct = &self.direct;
        self.distance.retain(|via, _| direct.contains_key(via));
        self.neighbor_vectors.retain(|via, _| direct.contains_key(via));
        let cached: Vec<NodeId> = self.neighbor_vectors.keys().cloned().collect();
        for via in cached {
            self.refresh_column(&via);
        }
        self.select_best()
    }

    /// Recompute the column `via` of the distance table from the cached
    /// vector: every advertised destination (except this node itself) costs
    /// the direct link plus the advertised cost. Destinations the neighbor no
    /// longer advertises are purged, except the diagonal entry.
    fn refresh_column(&mut self, via: &NodeId) {
        let link_cost = match self.direct.get(via) {
            Some(&cost) => cost,
            None => return,
        };
        let advertised = match self.neighbor_vectors.get(via) {
            Some(vector) => vector.clone(),
            None => return,
        };
        let name = &self.name;
        let column = self.distance.entry(via.clone()).or_insert_with(IndexMap::new);
        for (dest, &cost) in advertised.iter() {
            if dest != name {
                column.insert(dest.clone(), link_cost + cost);
            }
        }
        column.retain(|dest, _| dest == via || advertised.contains_key(dest));
    }

    /// Collapse the distance table into the cheapest-route table and the
    /// shared vector. Returns whether anything changed.
    fn select_best(&mut self) -> bool {
        let mut changed = false;

        // destinations in first-seen order across the columns
        let all_dests: Vec<NodeId> =
            self.distance.values().flat_map(|column| column.keys()).unique().cloned().collect();

        for dest in all_dests.iter() {
            let mut best: Option<(LinkCost, NodeId)> = None;
            for (via, column) in self.distance.iter() {
                if let Some(&cost) = column.get(dest) {
                    match best {
                        Some((current, _)) if cost >= current => {}
                        _ => best = Some((cost, via.clone())),
                    }
                }
            }
            let (cost, via) = match best {
                Some(found) => found,
                None => continue,
            };
            if cost > UNREACHABLE_THRESHOLD {
                self.routes.shift_remove(dest);
                self.shared.shift_remove(dest);
                changed = true;
                continue;
            }
            match self.routes.get(dest) {
                // an equal cost keeps the established next hop, as long as
                // that neighbor still has a column
                Some(entry) if entry.cost == cost && self.distance.contains_key(&entry.next_hop) => {
                }
                _ => {
                    self.routes.insert(dest.clone(), RouteEntry { cost, next_hop: via });
                    self.shared.insert(dest.clone(), cost);
                    changed = true;
                }
            }
        }

        // destinations withdrawn from every column lose their route
        let stale: Vec<NodeId> =
            self.routes.keys().filter(|dest| !all_dests.contains(dest)).cloned().collect();
        for dest in stale {
            self.routes.shift_remove(&dest);
            self.shared.shift_remove(&dest);
            changed = true;
        }

        changed
    }
}
