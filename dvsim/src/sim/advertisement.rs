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

//! Module defining in-flight advertisements

use crate::sim::types::{DistanceVector, LinkCost, NodeId, SimTime, TIME_EPSILON};
use std::collections::VecDeque;

/// An advertisement in flight between two adjacent nodes. It carries a value
/// copy of the sender's shared vector, taken at send time, so later updates
/// to the sender do not alter the message.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    /// Sending node
    pub source: NodeId,
    /// Receiving node
    pub target: NodeId,
    /// Time left until the message reaches the receiver
    pub remaining: SimTime,
    /// Total travel time, assigned at send time from the link cost. Progress
    /// is computed against this value, not the current link cost, so a link
    /// edit cannot push progress outside `[0, 1]`.
    pub travel_time: SimTime,
    /// The sender's shared vector at send time
    pub payload: DistanceVector,
}

impl Advertisement {
    pub(crate) fn new(
        source: NodeId,
        target: NodeId,
        cost: LinkCost,
        payload: DistanceVector,
    ) -> Self {
        Self {
            source,
            target,
            remaining: SimTime::from(cost),
            travel_time: SimTime::from(cost),
            payload,
        }
    }

    /// Let `dt` time units pass.
    pub fn elapse(&mut self, dt: SimTime) {
        self.remaining -= dt;
    }

    /// The message counts as delivered once its remaining travel time is
    /// within an epsilon of zero.
    pub fn is_delivered(&self) -> bool {
        self.remaining <= TIME_EPSILON
    }

    /// Fraction of the link already traveled, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        ((self.travel_time - self.remaining) / self.travel_time).max(0.0).min(1.0)
    }
}

/// Queue of in-flight advertisements, in enqueue order.
pub(crate) type AdQueue = VecDeque<Advertisement>;
