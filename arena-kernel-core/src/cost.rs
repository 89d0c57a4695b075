/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::collections::BTreeMap;

use arena_kernel_utils::{Coord2D, Map2D};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{BeliefState, ConfigError, ConsumableKind, EffectKind, WeaponKind};

/// The weights turning a belief into traversal costs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CostWeights {
    /// Cost of entering a passable cell.
    pub base: f32,
    /// No passable cell ever costs less than this.
    pub floor: f32,
    pub mist_penalty: f32,
    pub fire_penalty: f32,
    /// Added when another champion is believed to stand on the cell.
    pub occupant_penalty: f32,
    /// Whether potions and loot lower the cost of their cells.
    pub seek_items: bool,
    pub potion_bonus: f32,
    /// Per-weapon bonus; a negative bonus makes the weapon's cell more expensive.
    pub loot_bonus: BTreeMap<WeaponKind, f32>,
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights {
            base: 1.,
            floor: 1.,
            mist_penalty: 8.,
            fire_penalty: 16.,
            occupant_penalty: 2.,
            seek_items: false,
            potion_bonus: 0.,
            loot_bonus: BTreeMap::new(),
        }
    }
}

impl CostWeights {
    /// Weights on a scale of 100 per step, leaving room for item bonuses above the floor.
    pub fn fine_grained() -> Self {
        CostWeights {
            base: 100.,
            floor: 1.,
            mist_penalty: 25.,
            fire_penalty: 50.,
            occupant_penalty: 5.,
            seek_items: true,
            potion_bonus: 49.,
            loot_bonus: [(WeaponKind::Scroll, -1000.), (WeaponKind::Amulet, -1000.)]
                .into_iter()
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("base", self.base),
            ("floor", self.floor),
            ("mist-penalty", self.mist_penalty),
            ("fire-penalty", self.fire_penalty),
            ("occupant-penalty", self.occupant_penalty),
            ("potion-bonus", self.potion_bonus),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0. {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.floor <= 0. {
            return Err(ConfigError::Invalid("floor must be positive".into()));
        }
        if let Some((weapon, value)) = self.loot_bonus.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "loot bonus for {:?} must be finite, got {}",
                weapon, value
            )));
        }
        Ok(())
    }
}

/// Per-cell cost of entering a cell, `None` for cells that cannot be entered.
#[derive(Clone, Debug, PartialEq)]
pub struct CostField {
    costs: Map2D<Option<f32>>,
    min_cost: Option<f32>,
}

impl CostField {
    /// Derives the cost of every cell from the current belief.
    ///
    /// Hazards and occupants are taken from the last snapshot of each cell,
    /// which may be stale. Cells of unknown terrain cost `weights.base`.
    pub fn build(belief: &BeliefState, weights: &CostWeights) -> Self {
        let loot = if weights.seek_items {
            belief.weapons().into_iter().collect::<FxHashMap<_, _>>()
        } else {
            FxHashMap::default()
        };
        let costs = Map2D::new(belief.size(), ()).map(|coord, _| {
            if let Some(terrain) = belief.terrain(coord) {
                if !terrain.is_passable() {
                    return None;
                }
            }
            let mut cost = weights.base;
            if let Some(snapshot) = belief.snapshot(coord) {
                if snapshot.has_effect(EffectKind::Mist) {
                    cost += weights.mist_penalty;
                }
                if snapshot.has_effect(EffectKind::Fire) {
                    cost += weights.fire_penalty;
                }
                if belief.opponent_at(coord).is_some() {
                    cost += weights.occupant_penalty;
                }
                if weights.seek_items && snapshot.consumable == Some(ConsumableKind::Potion) {
                    cost -= weights.potion_bonus;
                }
            }
            if let Some(weapon) = loot.get(&coord) {
                cost -= weights.loot_bonus.get(weapon).copied().unwrap_or(0.);
            }
            Some(cost.max(weights.floor))
        });
        Self::from_costs(costs)
    }

    /// Wraps raw costs. Non-finite entries are impassable, negative ones are raised to zero.
    pub fn from_costs(costs: Map2D<Option<f32>>) -> Self {
        let costs = costs.map(|_, cost| cost.filter(|c| c.is_finite()).map(|c| c.max(0.)));
        let min_cost = costs
            .iter()
            .filter_map(|(_, cost)| *cost)
            .fold(None, |min: Option<f32>, c| Some(min.map_or(c, |m| m.min(c))));
        Self { costs, min_cost }
    }

    /// A field where every cell costs `cost`.
    pub fn uniform(size: Coord2D, cost: f32) -> Self {
        Self::from_costs(Map2D::new(size, Some(cost)))
    }

    /// The cost of entering `coord`, `None` if impassable or outside the field.
    pub fn cost(&self, coord: Coord2D) -> Option<f32> {
        self.costs.get(coord).copied().flatten()
    }

    pub fn is_passable(&self, coord: Coord2D) -> bool {
        self.cost(coord).is_some()
    }

    /// The cheapest finite cost in the field, `None` if no cell is passable.
    pub fn min_cost(&self) -> Option<f32> {
        self.min_cost
    }

    pub fn size(&self) -> Coord2D {
        self.costs.size()
    }

    pub fn contains(&self, coord: Coord2D) -> bool {
        self.costs.contains(coord)
    }

    pub fn passable_count(&self) -> usize {
        self.costs.iter().filter(|(_, cost)| cost.is_some()).count()
    }
}
