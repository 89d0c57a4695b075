/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::ops::{Add, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A 2-D integer coordinate type, addressing one cell of the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord2D {
    pub x: i32,
    pub y: i32,
}

impl Coord2D {
    pub const ZERO: Coord2D = Coord2D::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Coord2D { x, y }
    }
    /// Returns the absolute value, component by component.
    pub const fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }
    /// Returns the absolute value of the difference to other, component by component.
    pub fn abs_diff(&self, other: &Coord2D) -> Self {
        (*self - *other).abs()
    }
    /// Manhattan distance between self and other.
    pub fn manhattan_dist(&self, other: Coord2D) -> i32 {
        let diff = self.abs_diff(&other);
        diff.x + diff.y
    }
    /// Manhattan norm, i.e. the distance to the origin.
    pub const fn norm(&self) -> i32 {
        self.x.abs() + self.y.abs()
    }
    /// Whether this is one of the four axis-aligned unit vectors.
    pub const fn is_unit(&self) -> bool {
        self.norm() == 1
    }
    /// Whether other is one of the four cells sharing an edge with self.
    pub fn is_adjacent(&self, other: Coord2D) -> bool {
        (other - *self).is_unit()
    }
    /// The four cells sharing an edge with self, in a fixed order (+x, -x, +y, -y).
    pub fn neighbors(&self) -> [Coord2D; 4] {
        [
            Self::new(self.x + 1, self.y),
            Self::new(self.x - 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x, self.y - 1),
        ]
    }
    /// Generates a random value between 0 (inclusive) and range (exclusive).
    pub fn rand_uniform(rng: &mut impl Rng, range: Coord2D) -> Self {
        let x = rng.gen_range(0..range.x);
        let y = rng.gen_range(0..range.y);
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// Row-major, so that ordered collections of cells iterate like the map reads.
impl Ord for Coord2D {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}
impl PartialOrd for Coord2D {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Coord2D {
    type Output = Coord2D;

    fn add(self, rhs: Self) -> Self::Output {
        Coord2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord2D {
    type Output = Coord2D;

    fn sub(self, rhs: Self) -> Self::Output {
        Coord2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::*;

    #[test]
    fn cmp() {
        assert_eq!(Coord2D::new(0, 0), Coord2D::new(0, 0));
        assert!(Coord2D::new(0, 0) < Coord2D::new(0, 1));
        assert!(Coord2D::new(0, 0) < Coord2D::new(1, 0));
        assert!(Coord2D::new(1, 0) < Coord2D::new(0, 1));
    }

    #[test]
    fn manhattan_dist() {
        assert_eq!(Coord2D::new(0, 0).manhattan_dist(Coord2D::new(0, 2)), 2);
        assert_eq!(Coord2D::new(0, 0).manhattan_dist(Coord2D::new(-2, 0)), 2);
        assert_eq!(Coord2D::new(3, 2).manhattan_dist(Coord2D::new(0, 1)), 4);
        assert_eq!(Coord2D::new(-3, 2).norm(), 5);
    }

    #[test]
    fn adjacency() {
        let origin = Coord2D::new(2, 2);
        for neighbor in origin.neighbors() {
            assert!(origin.is_adjacent(neighbor));
            assert_eq!(origin.manhattan_dist(neighbor), 1);
        }
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(Coord2D::new(3, 3)));
        assert!(!origin.is_adjacent(Coord2D::new(4, 2)));
    }

    #[test]
    fn rand_uniform_stays_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let range = Coord2D::new(3, 5);
        for _ in 0..100 {
            let c = Coord2D::rand_uniform(&mut rng, range);
            assert!(c.x >= 0 && c.x < 3);
            assert!(c.y >= 0 && c.y < 5);
        }
    }
}
