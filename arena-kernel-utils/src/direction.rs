/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::{fmt, marker::PhantomData, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Coord2D;

/// A helper trait that tells whether up and down are positive or negative.
pub trait YUpDown {
    /// Returns 1 or -1 depending on the up direction.
    fn up() -> i32;
    /// Returns 1 or -1 depending on the down direction.
    fn down() -> i32 {
        -Self::up()
    }
}

/// Up is positive.
pub struct YUp;
impl YUpDown for YUp {
    fn up() -> i32 {
        1
    }
}

/// Down is positive, as in screen coordinates and in the arena engine.
pub struct YDown;
impl YUpDown for YDown {
    fn up() -> i32 {
        -1
    }
}

/// A cardinal direction, also used as the facing of a champion.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The direction obtained by rotating a quarter turn counter-clockwise.
    pub const fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// The direction obtained by rotating a quarter turn clockwise.
    pub const fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);
impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid direction name: {}", self.0)
    }
}
impl std::error::Error for ParseDirectionError {}

/// Accepts the engine spelling of facings, case insensitive.
impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}

/// A helper struct to apply direction to coordinates.
pub struct DirectionConverter<YDir: YUpDown> {
    _phantom: PhantomData<YDir>,
}
impl<YDir: YUpDown> DirectionConverter<YDir> {
    /// The unit vector pointing in `direction`.
    pub fn delta(direction: Direction) -> Coord2D {
        match direction {
            Direction::Up => Coord2D::new(0, YDir::up()),
            Direction::Down => Coord2D::new(0, YDir::down()),
            Direction::Left => Coord2D::new(-1, 0),
            Direction::Right => Coord2D::new(1, 0),
        }
    }

    /// Moves `coord` by `direction`.
    pub fn apply(direction: Direction, coord: Coord2D) -> Coord2D {
        coord + Self::delta(direction)
    }

    /// Gets the direction of a unit vector, or `None` if `delta` is not one of the four unit vectors.
    pub fn try_from_delta(delta: Coord2D) -> Option<Direction> {
        DIRECTIONS
            .iter()
            .copied()
            .find(|direction| Self::delta(*direction) == delta)
    }

    /// Gets the direction between `start` and `end`, or `None` if they are not adjacent with 4-connectivity.
    pub fn between(start: Coord2D, end: Coord2D) -> Option<Direction> {
        Self::try_from_delta(end - start)
    }
}

/// All directions, clockwise from up.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];
/// Apply direction to coordinates with up being positive.
pub type DirectionConverterYUp = DirectionConverter<YUp>;
/// Apply direction to coordinates with up being negative.
pub type DirectionConverterYDown = DirectionConverter<YDown>;
