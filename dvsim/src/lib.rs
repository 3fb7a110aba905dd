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

#![deny(missing_docs)]

//! # DVSim: Simulating Distance-Vector Route Convergence
//!
//! This is a library for simulating the convergence of the classical
//! distributed distance-vector routing protocol on a user-editable weighted
//! undirected graph. Every node independently maintains a distance table and
//! a routing table, and exchanges its best-known costs with its immediate
//! neighbors along links whose traversal time equals the link cost. The
//! simulator advances discrete time until no broadcasts remain in flight.
//!
//! ## Structure
//!
//! - **[`sim`]**: the engine. See the main structure
//!   [`Network`](sim::Network), the per-router state
//!   [`Node`](sim::node::Node), and the in-flight
//!   [`Advertisement`](sim::Advertisement). Snapshots
//!   ([`GraphSnapshot`](sim::GraphSnapshot)) and time-keyed logs
//!   ([`History`](sim::History)) are value-typed projections for external
//!   observation.
//!
//! - **[`commands`]**: the [`Simulator`], a small command surface
//!   (initialize, run one convergence episode, step, reset, mutate the
//!   topology, query snapshots and logs) consumed by an external HTTP
//!   layer. User input is validated here; the wire messages are part of the
//!   contract.
//!
//! ## Example usage
//!
//! The following example builds a two-node network, runs a convergence
//! episode, and reads the resulting route:
//!
//! ```rust
//! use dvsim::sim::NodeId;
//! use dvsim::Simulator;
//! use indexmap::indexmap;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adjacency = indexmap! {
//!         NodeId::from("A") => indexmap! { NodeId::from("B") => 1 },
//!         NodeId::from("B") => indexmap! { NodeId::from("A") => 1 },
//!     };
//!
//!     let mut sim = Simulator::new(adjacency)?;
//!     let report = sim.run_to_quiescence();
//!     assert_eq!(report.max_time, 1.0);
//!
//!     let routes = sim.network().routing_snapshot();
//!     assert_eq!(routes[&NodeId::from("A")][&NodeId::from("B")].cost, 1);
//!     assert!(sim.network().is_quiescent());
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod error;
pub mod sim;

mod test;

pub use commands::{EpisodeReport, Simulator, StepOutcome, EPISODE_TICK, EPISODE_TIME_LIMIT};
pub use error::Error;
