/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

//! This is the core of the arena navigation kernel, shared by the champions of a
//! turn-based, partially observable grid arena.
//!
//! Every tick a champion receives an [Observation] of the tiles it can see, folds it into
//! its [BeliefState], derives a [CostField] from that belief, finds a path with the
//! [PathEngine] and turns the first step of that path into one facing-relative [Action]
//! with the [ActionTranslator].
//! The [Navigator] ties these together for one champion, and [PolicyController] drives a
//! navigator with a pluggable [TargetPolicy] behind the [Controller] interface the arena
//! engine calls.
//!
//! Grid primitives such as coordinates and directions live in the
//! [`arena-kernel-utils`](https://crates.io/crates/arena-kernel-utils/) crate.

mod action;
mod belief;
mod config;
mod cost;
mod error;
mod navigator;
mod observation;
mod path;
mod terrain;

pub use action::*;
pub use belief::*;
pub use config::*;
pub use cost::*;
pub use error::*;
pub use navigator::*;
pub use observation::*;
pub use path::*;
pub use terrain::*;
