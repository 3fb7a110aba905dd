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

//! Command-line driver for the distance-vector convergence simulator. It
//! stands in for the HTTP layer during manual experimentation: it loads an
//! adjacency description from JSON, runs one convergence episode, and
//! prints the requested projection as JSON.

use clap::{Parser, Subcommand};
use dvsim::sim::Adjacency;
use dvsim::Simulator;
use log::*;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dvsim", about = "Distance-vector route convergence simulator")]
struct CommandLineArguments {
    #[command(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Run one convergence episode and print the final graph snapshot
    Run {
        /// Adjacency JSON file of the shape {"node": {"neighbor": cost}}
        file: PathBuf,
    },
    /// Run one convergence episode and print every routing table
    Routes {
        /// Adjacency JSON file of the shape {"node": {"neighbor": cost}}
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let args = CommandLineArguments::parse();

    match args.cmd {
        MainCommand::Run { file } => {
            let mut sim = load(&file)?;
            let report = sim.run_to_quiescence();
            info!("episode ended at t={}", report.max_time);
            let output = serde_json::json!({
                "graph": sim.graph(),
                "routing": sim.network().routing_snapshot(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        MainCommand::Routes { file } => {
            let mut sim = load(&file)?;
            let report = sim.run_to_quiescence();
            info!("episode ended at t={}", report.max_time);
            println!("{}", serde_json::to_string_pretty(&sim.network().routing_snapshot())?);
        }
    }

    Ok(())
}

fn load(file: &PathBuf) -> Result<Simulator, Box<dyn Error>> {
    let raw = fs::read_to_string(file)?;
    let adjacency: Adjacency = serde_json::from_str(&raw)?;
    Ok(Simulator::new(adjacency)?)
}
