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

//! Module containing all error types

use crate::sim::{NodeId, SimError, SimTime, ValidationError};
use thiserror::Error;

/// Main error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Error propagated from the simulation core
    #[error("Simulation Error: {0}")]
    Sim(#[from] SimError),
    /// No graph snapshot was recorded at the requested time
    #[error("No snapshot was recorded at time {0}")]
    SnapshotNotFound(SimTime),
    /// No routing overview was recorded at the requested time
    #[error("No routing overview was recorded at time {0}")]
    RoutingNotFound(SimTime),
    /// No log exists for the requested node
    #[error("No log was recorded for node {0}")]
    NodeLogNotFound(NodeId),
}

impl From<ValidationError> for Error {
    fn from(cause: ValidationError) -> Self {
        Self::Sim(SimError::Validation(cause))
    }
}
