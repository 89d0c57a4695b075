/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

//! This is the utility module of the arena navigation kernel, containing the grid primitives
//! the [kernel core](https://crates.io/crates/arena-kernel-core/) is built upon.
//!
//! It contains the following features:
//! - Simple 2-D integer coordinates ([Coord2D]) with Manhattan metrics and 4-connected neighbourhoods.
//! - Cardinal directions ([Direction]) that double as facings, with left/right rotations.
//! - A helper ([DirectionConverter]) that maps directions to coordinate deltas and back,
//!   parameterised by whether up is the positive ([YUp]) or negative ([YDown]) y axis.
//! - A dense, row-major 2-D storage ([Map2D]) addressed by [Coord2D].

mod coord2d;
mod direction;
mod map2d;

pub use coord2d::*;
pub use direction::*;
pub use map2d::*;
