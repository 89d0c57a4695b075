/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::collections::{BTreeMap, BTreeSet};

use arena_kernel_utils::{Coord2D, Direction};

use crate::{ConsumableKind, EffectKind, KernelError, TerrainKind, WeaponKind};

/// A champion standing on a tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    pub name: String,
    pub facing: Direction,
    pub weapon: WeaponKind,
    pub health: i32,
}

impl Occupant {
    pub fn new(name: impl Into<String>, facing: Direction, weapon: WeaponKind, health: i32) -> Self {
        Self {
            name: name.into(),
            facing,
            weapon,
            health,
        }
    }
}

/// What a champion sees of one tile at one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSnapshot {
    pub terrain: TerrainKind,
    pub loot: Option<WeaponKind>,
    pub consumable: Option<ConsumableKind>,
    pub effects: BTreeSet<EffectKind>,
    pub occupant: Option<Occupant>,
}

impl TileSnapshot {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            loot: None,
            consumable: None,
            effects: BTreeSet::new(),
            occupant: None,
        }
    }

    pub fn with_loot(mut self, weapon: WeaponKind) -> Self {
        self.loot = Some(weapon);
        self
    }

    pub fn with_consumable(mut self, consumable: ConsumableKind) -> Self {
        self.consumable = Some(consumable);
        self
    }

    pub fn with_effect(mut self, effect: EffectKind) -> Self {
        self.effects.insert(effect);
        self
    }

    pub fn with_occupant(mut self, occupant: Occupant) -> Self {
        self.occupant = Some(occupant);
        self
    }

    pub fn has_effect(&self, effect: EffectKind) -> bool {
        self.effects.contains(&effect)
    }
}

/// Everything the engine tells a champion at one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    /// Tick counter of the game, non-decreasing across observations.
    ///
    /// Staleness is measured in these ticks, so it must grow by at least one on every
    /// engine tick: two observations sharing a tick count as the same moment, and tiles
    /// unseen between them do not age.
    pub tick: u64,
    pub position: Coord2D,
    pub facing: Direction,
    pub weapon: WeaponKind,
    pub health: i32,
    /// Champions still alive, including self.
    pub alive: usize,
    pub visible: BTreeMap<Coord2D, TileSnapshot>,
}

impl Observation {
    /// Builds an observation from the visible tiles alone, reading the champion's
    /// own facing, weapon and health from the occupant of its own tile.
    pub fn from_visible(
        tick: u64,
        position: Coord2D,
        alive: usize,
        visible: BTreeMap<Coord2D, TileSnapshot>,
    ) -> Result<Self, KernelError> {
        let me = visible
            .get(&position)
            .and_then(|tile| tile.occupant.as_ref())
            .ok_or(KernelError::NoSelfObservation(position))?;
        Ok(Self {
            tick,
            position,
            facing: me.facing,
            weapon: me.weapon,
            health: me.health,
            alive,
            visible,
        })
    }

    /// The name of the champion making this observation, if it sees itself.
    pub fn own_name(&self) -> Option<&str> {
        self.visible
            .get(&self.position)
            .and_then(|tile| tile.occupant.as_ref())
            .map(|occupant| occupant.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_state_from_own_tile() {
        let me = Occupant::new("Rusty", Direction::Left, WeaponKind::Axe, 7);
        let position = Coord2D::new(2, 3);
        let mut visible = BTreeMap::new();
        visible.insert(position, TileSnapshot::new(TerrainKind::Land).with_occupant(me));
        visible.insert(Coord2D::new(2, 2), TileSnapshot::new(TerrainKind::Forest));
        let observation = Observation::from_visible(4, position, 5, visible).unwrap();
        assert_eq!(observation.facing, Direction::Left);
        assert_eq!(observation.weapon, WeaponKind::Axe);
        assert_eq!(observation.health, 7);
        assert_eq!(observation.own_name(), Some("Rusty"));
    }

    #[test]
    fn missing_self_is_an_error() {
        let position = Coord2D::new(0, 0);
        let mut visible = BTreeMap::new();
        visible.insert(position, TileSnapshot::new(TerrainKind::Land));
        assert_eq!(
            Observation::from_visible(0, position, 1, visible),
            Err(KernelError::NoSelfObservation(position))
        );
    }

    #[test]
    fn snapshot_builder() {
        let tile = TileSnapshot::new(TerrainKind::Land)
            .with_effect(EffectKind::Mist)
            .with_consumable(ConsumableKind::Potion);
        assert!(tile.has_effect(EffectKind::Mist));
        assert!(!tile.has_effect(EffectKind::Fire));
        assert_eq!(tile.consumable, Some(ConsumableKind::Potion));
        assert_eq!(tile.loot, None);
    }
}
