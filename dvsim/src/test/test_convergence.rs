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

use crate::sim::{Adjacency, LinkCost, NodeId, UNREACHABLE_THRESHOLD};
use crate::test::fixtures::{default_adjacency, id, line_adjacency};
use crate::Simulator;
use indexmap::indexmap;
use maplit::hashmap;
use petgraph::algo::bellman_ford;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;
use serde_json::json;
use std::collections::HashMap;

fn sim(adjacency: Adjacency) -> Simulator {
    Simulator::new(adjacency).unwrap()
}

fn routes_of(sim: &Simulator, name: &str) -> HashMap<NodeId, (LinkCost, NodeId)> {
    sim.network()
        .get_node(&id(name))
        .unwrap()
        .routing_table()
        .iter()
        .map(|(d, e)| (d.clone(), (e.cost, e.next_hop.clone())))
        .collect()
}

fn edit(sim: &mut Simulator, name: &str, links: &[(&str, LinkCost)]) {
    let mut input = serde_json::Map::new();
    for (dest, cost) in links {
        input.insert(dest.to_string(), json!({ "cost": cost }));
    }
    sim.edit_node(name, &input).unwrap();
}

/// Shortest-path costs from every node, computed independently with
/// Bellman-Ford on the same adjacency.
fn ground_truth(adjacency: &Adjacency) -> HashMap<(NodeId, NodeId), LinkCost> {
    let mut graph: Graph<(), f64, Undirected> = Graph::new_undirected();
    let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();
    for name in adjacency.keys() {
        indices.insert(name.clone(), graph.add_node(()));
    }
    for (name, links) in adjacency.iter() {
        for (neighbor, &cost) in links.iter() {
            if name < neighbor {
                graph.add_edge(indices[name], indices[neighbor], f64::from(cost));
            }
        }
    }
    let mut costs = HashMap::new();
    for (name, &index) in indices.iter() {
        let paths = bellman_ford(&graph, index).unwrap();
        for (other, &other_index) in indices.iter() {
            let distance = paths.distances[other_index.index()];
            if other != name && distance.is_finite() {
                costs.insert((name.clone(), other.clone()), distance as LinkCost);
            }
        }
    }
    costs
}

#[test]
fn test_default_graph_converges() {
    let mut sim = sim(default_adjacency());
    let report = sim.run_to_quiescence();

    assert!(sim.network().is_quiescent());
    assert_eq!(report.max_time, 11.0);
    assert_eq!(report.initial_messages.len(), 10);
    assert!(report.initial_messages.iter().all(|m| m.progress == 0.0));

    assert_eq!(
        routes_of(&sim, "A"),
        hashmap! {
            id("B") => (5, id("B")),
            id("C") => (5, id("E")),
            id("D") => (3, id("E")),
            id("E") => (1, id("E")),
        }
    );
    assert_eq!(
        routes_of(&sim, "B"),
        hashmap! {
            id("A") => (5, id("A")),
            id("C") => (10, id("A")),
            id("D") => (4, id("D")),
            id("E") => (6, id("D")),
        }
    );
    assert_eq!(
        routes_of(&sim, "C"),
        hashmap! {
            id("A") => (5, id("E")),
            id("B") => (10, id("E")),
            id("D") => (6, id("E")),
            id("E") => (4, id("E")),
        }
    );
    assert_eq!(
        routes_of(&sim, "D"),
        hashmap! {
            id("A") => (3, id("E")),
            id("B") => (4, id("B")),
            id("C") => (6, id("E")),
            id("E") => (2, id("E")),
        }
    );
    assert_eq!(
        routes_of(&sim, "E"),
        hashmap! {
            id("A") => (1, id("A")),
            id("B") => (6, id("A")),
            id("C") => (4, id("C")),
            id("D") => (2, id("D")),
        }
    );
}

#[test]
fn test_convergence_matches_bellman_ford() {
    let adjacency = default_adjacency();
    let truth = ground_truth(&adjacency);

    let mut sim = sim(adjacency);
    sim.run_to_quiescence();

    let mut checked = 0;
    for (name, node) in sim.network().nodes() {
        for (dest, entry) in node.routing_table().iter() {
            assert_eq!(entry.cost, truth[&(name.clone(), dest.clone())]);
            // the next hop is always a current direct neighbor
            assert!(node.direct_links().contains_key(&entry.next_hop));
            assert!(entry.cost <= UNREACHABLE_THRESHOLD);
            checked += 1;
        }
    }
    // every node knows a route to each of the four others
    assert_eq!(checked, 20);
}

#[test]
fn test_link_removal_reconverges() {
    let mut sim = sim(default_adjacency());
    sim.run_to_quiescence();

    // drop A-E; the only remaining path from A to E is A -> B -> D -> E
    edit(&mut sim, "A", &[("B", 5)]);
    let report = sim.run_to_quiescence();

    assert!(sim.network().is_quiescent());
    assert!(report.max_time < 100.0);
    assert_eq!(
        routes_of(&sim, "A"),
        hashmap! {
            id("B") => (5, id("B")),
            id("C") => (15, id("B")),
            id("D") => (9, id("B")),
            id("E") => (11, id("B")),
        }
    );
    assert_eq!(routes_of(&sim, "E")[&id("A")], (11, id("D")));

    // the re-converged costs are again the true shortest paths
    let truth = ground_truth(sim.network().connections());
    for (name, node) in sim.network().nodes() {
        for (dest, entry) in node.routing_table().iter() {
            assert_eq!(entry.cost, truth[&(name.clone(), dest.clone())]);
        }
    }
}

#[test]
fn test_added_node_stays_isolated() {
    let mut sim = sim(default_adjacency());
    sim.run_to_quiescence();
    let before = sim.network().routing_snapshot();

    let snapshot = sim.add_node();
    assert!(snapshot.nodes.iter().any(|n| n.id == id("F")));

    // the new node knows nothing, nothing else changed, nothing is in flight
    assert!(sim.network().get_node(&id("F")).unwrap().routing_table().is_empty());
    assert!(sim.network().is_quiescent());
    for (name, table) in before.iter() {
        assert_eq!(sim.network().get_node(name).unwrap().routing_table(), table);
    }
}

#[test]
fn test_unreachable_destination_is_dropped() {
    let mut sim = sim(line_adjacency());
    sim.run_to_quiescence();
    assert_eq!(routes_of(&sim, "A"), hashmap! { id("B") => (1, id("B")) });

    // cutting B loose leaves nothing reachable from either side
    sim.edit_node("B", &serde_json::Map::new()).unwrap();
    sim.run_to_quiescence();

    assert!(routes_of(&sim, "A").is_empty());
    assert!(routes_of(&sim, "B").is_empty());
}

#[test]
fn test_replaying_commands_is_deterministic() {
    let drive = |sim: &mut Simulator| {
        sim.run_to_quiescence();
        edit(sim, "A", &[("B", 5)]);
        sim.run_to_quiescence()
    };

    let mut first = sim(default_adjacency());
    let mut second = sim(default_adjacency());
    let report_a = drive(&mut first);
    let report_b = drive(&mut second);

    assert_eq!(report_a, report_b);
    assert_eq!(first.network().time_from_start(), second.network().time_from_start());
    assert_eq!(first.history().routing_log(), second.history().routing_log());
    assert_eq!(first.history().graph_log(), second.history().graph_log());
}

#[test]
fn test_identity_edit_changes_nothing() {
    let mut sim = sim(default_adjacency());
    sim.run_to_quiescence();
    let routing = sim.network().routing_snapshot();
    let graph = sim.network().graph_snapshot();

    // re-submitting A's current links triggers no broadcast and no change
    edit(&mut sim, "A", &[("B", 5), ("E", 1)]);
    assert!(sim.network().is_quiescent());
    assert_eq!(sim.network().routing_snapshot(), routing);
    assert_eq!(sim.network().graph_snapshot(), graph);
}

#[test]
fn test_second_episode_is_a_no_op() {
    let mut sim = sim(default_adjacency());
    sim.run_to_quiescence();
    let routing = sim.network().routing_snapshot();

    // all vectors are already converged: everything delivers without any
    // table change, so the queue drains after the largest link cost
    let report = sim.run_to_quiescence();
    assert!(sim.network().is_quiescent());
    assert_eq!(report.max_time, 16.0);
    assert_eq!(sim.network().routing_snapshot(), routing);
}

#[test]
fn test_empty_graph_runs_cleanly() {
    let mut sim = sim(Adjacency::new());
    let report = sim.run_to_quiescence();

    assert!(sim.network().is_quiescent());
    assert!(report.initial_messages.is_empty());
    // the episode always performs at least one half-unit tick
    assert_eq!(report.max_time, 0.5);
    assert!(sim.graph().nodes.is_empty());
}

#[test]
fn test_add_then_remove_restores_state() {
    let mut sim = sim(default_adjacency());
    sim.run_to_quiescence();
    let before = sim.network().clone();

    sim.add_node();
    sim.remove_node("F").unwrap();
    assert_eq!(sim.network(), &before);
}

#[test]
fn test_count_to_infinity_is_cut_off() {
    // a ring of two distant nodes plus a stub; withdrawing the stub's only
    // link forces costs towards it to climb until the threshold drops it
    let adjacency = indexmap! {
        id("A") => indexmap! { id("B") => 1, id("C") => 400 },
        id("B") => indexmap! { id("A") => 1, id("C") => 400 },
        id("C") => indexmap! { id("A") => 400, id("B") => 400 },
    };
    let mut sim = sim(adjacency);
    sim.run_to_quiescence();
    assert_eq!(routes_of(&sim, "A")[&id("C")], (400, id("C")));

    edit(&mut sim, "C", &[]);
    let report = sim.run_to_quiescence();

    // the episode ends, by quiescence or by the hard time limit, and no
    // route above the threshold survives
    assert!(report.max_time <= 100.0);
    for (_, node) in sim.network().nodes() {
        for (_, entry) in node.routing_table().iter() {
            assert!(entry.cost <= UNREACHABLE_THRESHOLD);
        }
    }
}
