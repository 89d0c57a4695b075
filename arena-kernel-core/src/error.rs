/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use arena_kernel_utils::Coord2D;
use thiserror::Error;

/// A failure of one kernel operation.
///
/// None of these is fatal: the calling policy is expected to fall back to a
/// harmless action for the tick in which the error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// A coordinate lies outside the loaded terrain; the caller should skip it.
    #[error("coordinate {0} is outside the arena")]
    OutOfBounds(Coord2D),
    /// The cost field has no enterable cell, so not even a fallback path exists.
    #[error("no path from {start} toward {target:?}: no passable cell")]
    NotFound {
        start: Coord2D,
        target: Option<Coord2D>,
    },
    /// The translator was given two cells that are not 4-adjacent (or equal).
    #[error("cannot translate a move from {from} to {to}: cells are not adjacent")]
    InvalidDisplacement { from: Coord2D, to: Coord2D },
    /// An observation older than the last ingested one.
    #[error("observation for tick {got} arrived after tick {last}")]
    TickRegression { last: u64, got: u64 },
    /// The visible tiles do not contain the champion itself.
    #[error("observation does not contain the champion at {0}")]
    NoSelfObservation(Coord2D),
    /// The navigator was queried before the first `reset`.
    #[error("navigator used before reset")]
    NotReset,
    /// The navigator was asked to move before its first observation of the game.
    #[error("navigator has not observed the arena yet")]
    NoObservation,
}

/// A failure to read the textual arena format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseArenaError {
    #[error("invalid tile character {0:?}")]
    UnknownTile(char),
    #[error("arena lines have inconsistent lengths")]
    InconsistentLines,
    #[error("arena is empty")]
    Empty,
}

/// A failure to resolve an engine name (terrain, weapon, effect...) into its tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} name: {name:?}")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub name: String,
}

/// A failure to load or validate a kernel configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
