/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::str::FromStr;

use arena_kernel_utils::{Coord2D, Map2D};
use serde::{Deserialize, Serialize};

use crate::{KernelError, ParseArenaError, ParseKindError};

/// The permanent kind of a tile.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerrainKind {
    Land,
    Forest,
    Menhir,
    Wall,
    Water,
}

impl TerrainKind {
    pub fn is_passable(&self) -> bool {
        !matches!(self, TerrainKind::Wall | TerrainKind::Water)
    }
}

impl FromStr for TerrainKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "land" => Ok(TerrainKind::Land),
            "forest" => Ok(TerrainKind::Forest),
            "menhir" => Ok(TerrainKind::Menhir),
            "wall" => Ok(TerrainKind::Wall),
            "sea" | "water" => Ok(TerrainKind::Water),
            _ => Err(ParseKindError {
                kind: "terrain",
                name: s.to_owned(),
            }),
        }
    }
}

/// The kind of a weapon, either lying on a tile or held by a champion.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeaponKind {
    Knife,
    Sword,
    Axe,
    Bow,
    Amulet,
    Scroll,
}

impl WeaponKind {
    /// The letter marking this weapon in the arena text format.
    pub fn map_char(&self) -> char {
        match self {
            WeaponKind::Knife => 'K',
            WeaponKind::Sword => 'S',
            WeaponKind::Axe => 'A',
            WeaponKind::Bow => 'B',
            WeaponKind::Amulet => 'M',
            WeaponKind::Scroll => 'C',
        }
    }

    fn from_map_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(WeaponKind::Knife),
            'S' => Some(WeaponKind::Sword),
            'A' => Some(WeaponKind::Axe),
            'B' => Some(WeaponKind::Bow),
            'M' => Some(WeaponKind::Amulet),
            'C' => Some(WeaponKind::Scroll),
            _ => None,
        }
    }
}

impl FromStr for WeaponKind {
    type Err = ParseKindError;

    // Loaded and unloaded bows share a kind: loading is engine-side state.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "knife" => Ok(WeaponKind::Knife),
            "sword" => Ok(WeaponKind::Sword),
            "axe" => Ok(WeaponKind::Axe),
            "bow" | "bow_loaded" | "bow_unloaded" => Ok(WeaponKind::Bow),
            "amulet" => Ok(WeaponKind::Amulet),
            "scroll" => Ok(WeaponKind::Scroll),
            _ => Err(ParseKindError {
                kind: "weapon",
                name: s.to_owned(),
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsumableKind {
    Potion,
}

impl FromStr for ConsumableKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "potion" => Ok(ConsumableKind::Potion),
            _ => Err(ParseKindError {
                kind: "consumable",
                name: s.to_owned(),
            }),
        }
    }
}

/// A transient effect on a tile. Its remaining duration is not observable.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Mist,
    Fire,
    WeaponCut,
}

impl EffectKind {
    pub fn is_hazard(&self) -> bool {
        matches!(self, EffectKind::Mist | EffectKind::Fire)
    }
}

impl FromStr for EffectKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mist" => Ok(EffectKind::Mist),
            "fire" => Ok(EffectKind::Fire),
            "weaponcut" | "weapon_cut" => Ok(EffectKind::WeaponCut),
            _ => Err(ParseKindError {
                kind: "effect",
                name: s.to_owned(),
            }),
        }
    }
}

/// The static layout of an arena, the one piece of full information a champion gets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    terrain: Map2D<TerrainKind>,
    loot: Vec<(Coord2D, WeaponKind)>,
}

impl Arena {
    pub fn new(terrain: Map2D<TerrainKind>) -> Self {
        Self {
            terrain,
            loot: Vec::new(),
        }
    }

    /// An arena of the given size made of one terrain kind.
    pub fn uniform(size: Coord2D, kind: TerrainKind) -> Self {
        Self::new(Map2D::new(size, kind))
    }

    pub fn size(&self) -> Coord2D {
        self.terrain.size()
    }

    pub fn terrain(&self) -> &Map2D<TerrainKind> {
        &self.terrain
    }

    pub fn at(&self, coord: Coord2D) -> Option<TerrainKind> {
        self.terrain.get(coord).copied()
    }

    /// Weapons lying on the arena at game start.
    pub fn loot(&self) -> &[(Coord2D, WeaponKind)] {
        &self.loot
    }

    pub fn set(&mut self, coord: Coord2D, kind: TerrainKind) -> Result<(), KernelError> {
        let tile = self
            .terrain
            .get_mut(coord)
            .ok_or(KernelError::OutOfBounds(coord))?;
        *tile = kind;
        Ok(())
    }

    pub fn place_loot(&mut self, coord: Coord2D, weapon: WeaponKind) -> Result<(), KernelError> {
        if !self.terrain.contains(coord) {
            return Err(KernelError::OutOfBounds(coord));
        }
        self.loot.retain(|(c, _)| *c != coord);
        self.loot.push((coord, weapon));
        Ok(())
    }
}

fn parse_tile(c: char) -> Result<(TerrainKind, Option<WeaponKind>), ParseArenaError> {
    match c {
        '=' => Ok((TerrainKind::Water, None)),
        '#' => Ok((TerrainKind::Wall, None)),
        '.' => Ok((TerrainKind::Land, None)),
        '@' => Ok((TerrainKind::Forest, None)),
        c => WeaponKind::from_map_char(c)
            .map(|weapon| (TerrainKind::Land, Some(weapon)))
            .ok_or(ParseArenaError::UnknownTile(c)),
    }
}

/// Reads the arena text format: one line per row, `=` water, `#` wall, `.` land,
/// `@` forest, and weapon letters standing for land carrying that weapon.
impl FromStr for Arena {
    type Err = ParseArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        let mut loot = Vec::new();
        for (y, line) in s.lines().map(str::trim_end).filter(|l| !l.is_empty()).enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(x, c)| {
                    let (kind, weapon) = parse_tile(c)?;
                    if let Some(weapon) = weapon {
                        loot.push((Coord2D::new(x as i32, y as i32), weapon));
                    }
                    Ok(kind)
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(ParseArenaError::Empty);
        }
        let terrain = Map2D::from_rows(rows).ok_or(ParseArenaError::InconsistentLines)?;
        Ok(Arena { terrain, loot })
    }
}
