/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::{cmp::Reverse, collections::BinaryHeap};

use arena_kernel_utils::{Coord2D, Map2D};
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::{CostField, KernelError};

/// The search algorithm used by the [PathEngine].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Uniform expansion, no heuristic.
    Dijkstra,
    /// Manhattan distance scaled by the cheapest step as heuristic.
    #[default]
    AStar,
}

/// A path from a source to either the requested target or the closest reachable cell to it.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    // never empty, starts at the source
    path: Vec<Coord2D>,
    cost: f32,
    target: Coord2D,
}

impl PathResult {
    /// The cells from the source to the destination, both included.
    pub fn path(&self) -> &[Coord2D] {
        &self.path
    }

    pub fn source(&self) -> Coord2D {
        self.path[0]
    }

    pub fn destination(&self) -> Coord2D {
        self.path[self.path.len() - 1]
    }

    /// The target that was asked for, which might differ from the destination.
    pub fn target(&self) -> Coord2D {
        self.target
    }

    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }

    /// Whether the path has no step, the source being its destination.
    pub fn is_empty(&self) -> bool {
        self.steps() == 0
    }

    /// The sum of the costs of entering every cell after the source.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn reached_target(&self) -> bool {
        self.destination() == self.target
    }

    /// The cell to move to next, `None` for an empty path.
    pub fn first_step(&self) -> Option<Coord2D> {
        self.path.get(1).copied()
    }
}

type Priority = NotNan<f32>;

// SAFETY: 0.0 is not NaN
const ZERO: Priority = unsafe { NotNan::new_unchecked(0.) };

/// The state of one best-first search over a cost field.
struct Search {
    source: Coord2D,
    distances: Map2D<Option<f32>>,
    parents: Map2D<Option<Coord2D>>,
    // cells in the order in which they were settled, the source first
    settled: Vec<Coord2D>,
}

impl Search {
    fn run(field: &CostField, source: Coord2D, target: Option<Coord2D>, heuristic_scale: f32) -> Self {
        let size = field.size();
        let mut search = Search {
            source,
            distances: Map2D::new(size, None),
            parents: Map2D::new(size, None),
            settled: Vec::new(),
        };
        let mut closed = Map2D::new(size, false);
        let heuristic = |coord: Coord2D| match target {
            Some(target) => coord.manhattan_dist(target) as f32 * heuristic_scale,
            None => 0.,
        };

        // ties on priority are broken by insertion order
        let mut sequence = 0u64;
        let mut open = BinaryHeap::new();
        open.push(Reverse((ZERO, sequence, source)));
        if let Some(distance) = search.distances.get_mut(source) {
            *distance = Some(0.);
        }

        while let Some(Reverse((_, _, coord))) = open.pop() {
            match closed.get_mut(coord) {
                Some(done) if !*done => *done = true,
                _ => continue,
            }
            search.settled.push(coord);
            if Some(coord) == target {
                break;
            }
            let distance = search.distance(coord).unwrap_or(0.);
            for neighbor in coord.neighbors() {
                if closed.get(neighbor).copied().unwrap_or(true) {
                    continue;
                }
                let cost = match field.cost(neighbor) {
                    Some(cost) => cost,
                    None => continue,
                };
                let candidate = distance + cost;
                if search.distance(neighbor).map_or(false, |known| known <= candidate) {
                    continue;
                }
                let priority = match NotNan::new(candidate + heuristic(neighbor)) {
                    Ok(priority) => priority,
                    Err(_) => continue,
                };
                if let Some(slot) = search.distances.get_mut(neighbor) {
                    *slot = Some(candidate);
                }
                if let Some(slot) = search.parents.get_mut(neighbor) {
                    *slot = Some(coord);
                }
                sequence += 1;
                open.push(Reverse((priority, sequence, neighbor)));
            }
        }
        log::trace!(
            "search from {} toward {:?} settled {} cells",
            source,
            target,
            search.settled.len()
        );
        search
    }

    fn distance(&self, coord: Coord2D) -> Option<f32> {
        self.distances.get(coord).copied().flatten()
    }

    fn path_to(&self, end: Coord2D, target: Coord2D) -> PathResult {
        let mut path = vec![end];
        let mut current = end;
        while let Some(parent) = self.parents.get(current).copied().flatten() {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        PathResult {
            path,
            cost: self.distance(end).unwrap_or(0.),
            target,
        }
    }

    /// The settled cell closest to `target` in Manhattan distance, ties going to
    /// the cheaper path and then to the earlier settled cell.
    fn closest_to(&self, target: Coord2D) -> Coord2D {
        let mut best = self.source;
        let mut best_key = (self.source.manhattan_dist(target), 0.);
        for &coord in &self.settled {
            let key = (
                coord.manhattan_dist(target),
                self.distance(coord).unwrap_or(0.),
            );
            if key.0 < best_key.0 || (key.0 == best_key.0 && key.1 < best_key.1) {
                best = coord;
                best_key = key;
            }
        }
        best
    }
}

/// Shortest paths over a [CostField] on the 4-connected grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PathEngine {
    mode: SearchMode,
}

impl PathEngine {
    pub fn new(mode: SearchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    // An empty or fully blocked field has nothing to fall back to, wherever the source is.
    fn check(field: &CostField, source: Coord2D, target: Option<Coord2D>) -> Result<(), KernelError> {
        if field.passable_count() == 0 {
            return Err(KernelError::NotFound {
                start: source,
                target,
            });
        }
        if !field.contains(source) {
            return Err(KernelError::OutOfBounds(source));
        }
        Ok(())
    }

    /// Finds the cheapest path from `source` to `target`.
    ///
    /// Entering a cell costs the field's cost for it; the source itself is never paid for.
    /// If `target` cannot be reached, the path leads to the reachable cell closest to it instead.
    pub fn shortest_path(
        &self,
        field: &CostField,
        source: Coord2D,
        target: Coord2D,
    ) -> Result<PathResult, KernelError> {
        Self::check(field, source, Some(target))?;
        if source == target {
            return Ok(PathResult {
                path: vec![source],
                cost: 0.,
                target,
            });
        }

        let scale = match self.mode {
            SearchMode::Dijkstra => 0.,
            SearchMode::AStar => field.min_cost().unwrap_or(0.),
        };
        let search = Search::run(field, source, Some(target), scale);
        if search.settled.last() == Some(&target) {
            return Ok(search.path_to(target, target));
        }
        let closest = search.closest_to(target);
        log::debug!(
            "{} unreachable from {}, falling back to {}",
            target,
            source,
            closest
        );
        Ok(search.path_to(closest, target))
    }

    /// Computes the distances from `source` to every reachable cell in one pass.
    pub fn flood(&self, field: &CostField, source: Coord2D) -> Result<DistanceField, KernelError> {
        Self::check(field, source, None)?;
        Ok(DistanceField {
            search: Search::run(field, source, None, 0.),
        })
    }
}

/// The result of flooding a cost field from one source, answering queries for many targets.
pub struct DistanceField {
    search: Search,
}

impl DistanceField {
    pub fn source(&self) -> Coord2D {
        self.search.source
    }

    /// The cost of the cheapest path to `coord`, `None` if it is not reachable.
    pub fn distance_to(&self, coord: Coord2D) -> Option<f32> {
        self.search.distance(coord)
    }

    /// The cheapest path to `coord`, `None` if it is not reachable.
    pub fn path_to(&self, coord: Coord2D) -> Option<PathResult> {
        self.search
            .distance(coord)
            .map(|_| self.search.path_to(coord, coord))
    }

    /// The first cell to move to toward `coord`, `None` if unreachable or already there.
    pub fn first_step_toward(&self, coord: Coord2D) -> Option<Coord2D> {
        self.path_to(coord).and_then(|path| path.first_step())
    }

    /// The path toward `target`, or toward the reachable cell closest to it.
    pub fn closest_to(&self, target: Coord2D) -> PathResult {
        // a flood settles every cell it reaches
        if self.search.distance(target).is_some() {
            self.search.path_to(target, target)
        } else {
            self.search.path_to(self.search.closest_to(target), target)
        }
    }

    /// The reachable cells, nearest first.
    pub fn reachable(&self) -> &[Coord2D] {
        &self.search.settled
    }
}
