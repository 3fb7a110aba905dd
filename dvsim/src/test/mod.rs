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

#[cfg(test)]
mod test_convergence;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::sim::{Adjacency, NodeId};
    use indexmap::indexmap;

    pub fn id(name: &str) -> NodeId {
        NodeId::from(name)
    }

    /// The default five-node graph of the original user interface.
    pub fn default_adjacency() -> Adjacency {
        indexmap! {
            id("A") => indexmap! { id("B") => 5, id("E") => 1 },
            id("B") => indexmap! { id("A") => 5, id("D") => 4 },
            id("C") => indexmap! { id("E") => 4 },
            id("D") => indexmap! { id("B") => 4, id("E") => 2 },
            id("E") => indexmap! { id("A") => 1, id("C") => 4, id("D") => 2 },
        }
    }

    /// Two nodes joined by a unit-cost link.
    pub fn line_adjacency() -> Adjacency {
        indexmap! {
            id("A") => indexmap! { id("B") => 1 },
            id("B") => indexmap! { id("A") => 1 },
        }
    }
}
