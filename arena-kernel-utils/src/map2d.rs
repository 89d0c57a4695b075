/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::fmt;

use crate::Coord2D;

/// A dense, row-major 2-D map, addressed by [Coord2D] with the origin at the top-left.
#[derive(Clone, PartialEq, Eq)]
pub struct Map2D<T> {
    width: usize,
    tiles: Box<[T]>,
}

impl<T: fmt::Debug> fmt::Debug for Map2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1)) {
            write!(f, " ")?;
            for tile in row {
                write!(f, "{:?} ", tile)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T> Map2D<T> {
    pub fn new(size: Coord2D, value: T) -> Self
    where
        T: Clone,
    {
        let width = size.x.max(0) as usize;
        let height = size.y.max(0) as usize;
        Map2D {
            width,
            tiles: vec![value; width * height].into_boxed_slice(),
        }
    }

    /// Builds a map from rows; returns `None` if rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Map2D {
            width,
            tiles: rows.into_iter().flatten().collect::<Vec<_>>().into_boxed_slice(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.tiles.len() / self.width
        }
    }

    pub fn size(&self) -> Coord2D {
        Coord2D::new(self.width() as i32, self.height() as i32)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn index(&self, coord: Coord2D) -> Option<usize> {
        let x: usize = coord.x.try_into().ok()?;
        let y: usize = coord.y.try_into().ok()?;
        if x < self.width() && y < self.height() {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    fn coord(&self, index: usize) -> Coord2D {
        Coord2D::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn contains(&self, coord: Coord2D) -> bool {
        self.index(coord).is_some()
    }

    pub fn get(&self, coord: Coord2D) -> Option<&T> {
        self.index(coord).map(|index| &self.tiles[index])
    }

    pub fn get_mut(&mut self, coord: Coord2D) -> Option<&mut T> {
        self.index(coord).map(move |index| &mut self.tiles[index])
    }

    /// Iterates over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2D, &T)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, tile)| (self.coord(index), tile))
    }

    /// Iterates mutably over all cells in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Coord2D, &mut T)> + '_ {
        let width = self.width;
        self.tiles.iter_mut().enumerate().map(move |(index, tile)| {
            (
                Coord2D::new((index % width) as i32, (index / width) as i32),
                tile,
            )
        })
    }

    /// Builds a map of the same size by applying `f` to every cell.
    pub fn map<U>(&self, mut f: impl FnMut(Coord2D, &T) -> U) -> Map2D<U> {
        Map2D {
            width: self.width,
            tiles: self
                .iter()
                .map(|(coord, tile)| f(coord, tile))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn new_and_size() {
        let map = Map2D::new(Coord2D::new(4, 3), 0u8);
        assert_eq!(map.size(), Coord2D::new(4, 3));
        assert_eq!(map.len(), 12);
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
    }

    #[test]
    fn access() {
        let mut map = Map2D::new(Coord2D::new(3, 2), '.');
        *map.get_mut(Coord2D::new(2, 1)).unwrap() = '#';
        assert_eq!(map.get(Coord2D::new(2, 1)), Some(&'#'));
        assert_eq!(map.get(Coord2D::new(1, 1)), Some(&'.'));
        assert_eq!(map.get(Coord2D::new(-1, 0)), None);
        assert_eq!(map.get(Coord2D::new(3, 0)), None);
        assert_eq!(map.get(Coord2D::new(0, 2)), None);
        assert!(!map.contains(Coord2D::new(0, -1)));
    }

    #[test]
    fn rows_and_iteration() {
        let map = Map2D::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let cells = map.iter().map(|(c, v)| (c, *v)).collect::<Vec<_>>();
        assert_eq!(
            cells,
            vec![
                (Coord2D::new(0, 0), 1),
                (Coord2D::new(1, 0), 2),
                (Coord2D::new(0, 1), 3),
                (Coord2D::new(1, 1), 4),
            ]
        );
        assert!(Map2D::from_rows(vec![vec![1, 2], vec![3]]).is_none());
        let mut doubled = map.map(|_, v| v * 2);
        assert_eq!(doubled.get(Coord2D::new(1, 1)), Some(&8));
        for (coord, value) in doubled.iter_mut() {
            *value += coord.x;
        }
        assert_eq!(doubled.get(Coord2D::new(1, 0)), Some(&5));
        assert_eq!(doubled.get(Coord2D::new(0, 1)), Some(&6));
    }
}
