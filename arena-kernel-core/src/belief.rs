/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use arena_kernel_utils::{Coord2D, Direction, Map2D};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    Arena, ConsumableKind, EffectKind, KernelError, Observation, Occupant, TerrainKind,
    TileSnapshot, WeaponKind,
};

/// The last snapshot of a tile and the tick at which it was taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedTile {
    pub snapshot: TileSnapshot,
    pub refreshed: u64,
}

/// What the champion knows about itself from the last observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelfState {
    pub name: Option<String>,
    pub position: Coord2D,
    pub facing: Direction,
    pub weapon: WeaponKind,
    pub health: i32,
    pub alive: usize,
}

/// Another champion as last seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BelievedOpponent<'a> {
    pub position: Coord2D,
    pub occupant: &'a Occupant,
    pub staleness: u64,
}

/// The outcome of ingesting one observation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub refreshed: usize,
    pub out_of_bounds: Vec<Coord2D>,
}

/// The accumulated, possibly stale, model of the arena held by one champion.
///
/// Static terrain comes from the arena layout; everything else comes from
/// observations and is only as fresh as the last time its tile was seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeliefState {
    terrain: Map2D<Option<TerrainKind>>,
    observed: Map2D<Option<ObservedTile>>,
    // weapons known from the layout, until their tile is first observed
    initial_loot: FxHashMap<Coord2D, WeaponKind>,
    mist: FxHashSet<Coord2D>,
    fire: FxHashSet<Coord2D>,
    menhir: Option<Coord2D>,
    tick: Option<u64>,
    me: Option<SelfState>,
}

impl BeliefState {
    /// A fresh belief with the full static layout of `arena` and no dynamic knowledge.
    pub fn from_arena(arena: &Arena) -> Self {
        let mut belief = Self::unexplored(arena.size());
        belief.terrain = arena.terrain().map(|_, kind| Some(*kind));
        belief.menhir = arena
            .terrain()
            .iter()
            .find(|(_, kind)| **kind == TerrainKind::Menhir)
            .map(|(coord, _)| coord);
        belief.initial_loot = arena.loot().iter().copied().collect();
        belief
    }

    /// A fresh belief in which the terrain itself is unknown.
    pub fn unexplored(size: Coord2D) -> Self {
        Self {
            terrain: Map2D::new(size, None),
            observed: Map2D::new(size, None),
            initial_loot: FxHashMap::default(),
            mist: FxHashSet::default(),
            fire: FxHashSet::default(),
            menhir: None,
            tick: None,
            me: None,
        }
    }

    /// Updates the belief with one observation.
    ///
    /// Tiles outside the arena are skipped and reported in the summary.
    /// Staleness follows [Observation::tick]: a second observation with the same tick
    /// refreshes what it shows but ages nothing.
    /// Ingesting the same observation twice leaves the belief as after the first time.
    pub fn ingest(&mut self, observation: &Observation) -> Result<IngestSummary, KernelError> {
        if let Some(last) = self.tick {
            if observation.tick < last {
                return Err(KernelError::TickRegression {
                    last,
                    got: observation.tick,
                });
            }
        }
        self.tick = Some(observation.tick);

        let mut summary = IngestSummary::default();
        for (coord, snapshot) in &observation.visible {
            match self.observe_tile(observation.tick, *coord, snapshot) {
                Ok(()) => summary.refreshed += 1,
                Err(e) => {
                    log::warn!("T{}: skipping tile: {}", observation.tick, e);
                    summary.out_of_bounds.push(*coord);
                }
            }
        }

        self.me = Some(SelfState {
            name: observation.own_name().map(str::to_owned),
            position: observation.position,
            facing: observation.facing,
            weapon: observation.weapon,
            health: observation.health,
            alive: observation.alive,
        });
        log::trace!(
            "T{}: ingested {} tiles at {}",
            observation.tick,
            summary.refreshed,
            observation.position
        );
        Ok(summary)
    }

    fn observe_tile(
        &mut self,
        tick: u64,
        coord: Coord2D,
        snapshot: &TileSnapshot,
    ) -> Result<(), KernelError> {
        // At most one menhir, and only where none is known yet.
        let menhir_elsewhere = self.menhir.map_or(false, |menhir| menhir != coord);
        let terrain = self
            .terrain
            .get_mut(coord)
            .ok_or(KernelError::OutOfBounds(coord))?;
        if snapshot.terrain == TerrainKind::Menhir && menhir_elsewhere {
            log::debug!(
                "T{}: ignoring menhir at {}, already known at {:?}",
                tick,
                coord,
                self.menhir
            );
        } else {
            match *terrain {
                None => *terrain = Some(snapshot.terrain),
                // The menhir is placed by the engine on top of the static layout.
                Some(known) if snapshot.terrain == TerrainKind::Menhir && known.is_passable() => {
                    *terrain = Some(TerrainKind::Menhir)
                }
                Some(known) if known != snapshot.terrain => log::debug!(
                    "{}: keeping terrain {:?}, observed {:?}",
                    coord,
                    known,
                    snapshot.terrain
                ),
                Some(_) => {}
            }
        }

        if snapshot.terrain == TerrainKind::Menhir && self.menhir.is_none() {
            log::debug!("T{}: menhir found at {}", tick, coord);
            self.menhir = Some(coord);
        }
        if snapshot.has_effect(EffectKind::Mist) {
            self.mist.insert(coord);
        }
        if snapshot.has_effect(EffectKind::Fire) {
            self.fire.insert(coord);
        }
        self.initial_loot.remove(&coord);

        if let Some(tile) = self.observed.get_mut(coord) {
            *tile = Some(ObservedTile {
                snapshot: snapshot.clone(),
                refreshed: tick,
            });
        }
        Ok(())
    }

    /// Clears occupants that were last seen more than `max_staleness` ticks ago.
    pub fn forget_stale_occupants(&mut self, max_staleness: u64) {
        let now = match self.tick {
            Some(tick) => tick,
            None => return,
        };
        let mut forgotten = 0;
        for (_, tile) in self.observed.iter_mut() {
            if let Some(tile) = tile {
                if now - tile.refreshed > max_staleness && tile.snapshot.occupant.take().is_some() {
                    forgotten += 1;
                }
            }
        }
        if forgotten > 0 {
            log::trace!("T{}: forgot {} stale occupants", now, forgotten);
        }
    }

    pub fn size(&self) -> Coord2D {
        self.terrain.size()
    }

    pub fn contains(&self, coord: Coord2D) -> bool {
        self.terrain.contains(coord)
    }

    /// The tick of the last ingested observation.
    pub fn tick(&self) -> Option<u64> {
        self.tick
    }

    pub fn me(&self) -> Option<&SelfState> {
        self.me.as_ref()
    }

    /// The terrain of a tile, `None` if unknown or outside the arena.
    pub fn terrain(&self, coord: Coord2D) -> Option<TerrainKind> {
        self.terrain.get(coord).copied().flatten()
    }

    pub fn observed(&self, coord: Coord2D) -> Option<&ObservedTile> {
        self.observed.get(coord).and_then(Option::as_ref)
    }

    /// The last snapshot of a tile, `None` if it was never seen.
    pub fn snapshot(&self, coord: Coord2D) -> Option<&TileSnapshot> {
        self.observed(coord).map(|tile| &tile.snapshot)
    }

    /// Ticks since the tile was last seen, `None` if it was never seen.
    pub fn staleness(&self, coord: Coord2D) -> Option<u64> {
        let now = self.tick?;
        self.observed(coord).map(|tile| now - tile.refreshed)
    }

    pub fn menhir(&self) -> Option<Coord2D> {
        self.menhir
    }

    pub fn has_seen_mist(&self) -> bool {
        !self.mist.is_empty()
    }

    /// Every tile ever seen bearing mist.
    pub fn known_mist(&self) -> &FxHashSet<Coord2D> {
        &self.mist
    }

    /// Every tile ever seen burning.
    pub fn known_fire(&self) -> &FxHashSet<Coord2D> {
        &self.fire
    }

    fn observed_tiles(&self) -> impl Iterator<Item = (Coord2D, &ObservedTile)> + '_ {
        self.observed
            .iter()
            .filter_map(|(coord, tile)| tile.as_ref().map(|tile| (coord, tile)))
    }

    /// Believed weapon locations, in row-major order.
    pub fn weapons(&self) -> Vec<(Coord2D, WeaponKind)> {
        let mut weapons = self
            .observed_tiles()
            .filter_map(|(coord, tile)| tile.snapshot.loot.map(|weapon| (coord, weapon)))
            .chain(self.initial_loot.iter().map(|(coord, weapon)| (*coord, *weapon)))
            .collect::<Vec<_>>();
        weapons.sort();
        weapons
    }

    /// Believed consumable locations, in row-major order.
    pub fn consumables(&self) -> Vec<(Coord2D, ConsumableKind)> {
        self.observed_tiles()
            .filter_map(|(coord, tile)| tile.snapshot.consumable.map(|c| (coord, c)))
            .collect()
    }

    /// Whether `name` is the champion holding this belief.
    pub fn is_me(&self, occupant: &Occupant) -> bool {
        self.me
            .as_ref()
            .and_then(|me| me.name.as_deref())
            .map_or(false, |name| name == occupant.name)
    }

    /// The believed occupant of a tile, if it is not the champion itself.
    pub fn opponent_at(&self, coord: Coord2D) -> Option<&Occupant> {
        if self.me.as_ref().map_or(false, |me| me.position == coord) {
            return None;
        }
        self.snapshot(coord)
            .and_then(|tile| tile.occupant.as_ref())
            .filter(|occupant| !self.is_me(occupant))
    }

    /// Other champions as last seen, in row-major order.
    pub fn opponents(&self) -> Vec<BelievedOpponent<'_>> {
        let now = self.tick.unwrap_or(0);
        self.observed_tiles()
            .filter_map(|(coord, tile)| {
                self.opponent_at(coord).map(|occupant| BelievedOpponent {
                    position: coord,
                    occupant,
                    staleness: now - tile.refreshed,
                })
            })
            .collect()
    }
}
