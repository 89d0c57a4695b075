/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Action, ConfigError, CostWeights, SearchMode};

/// How a navigator turns a path into actions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementStyle {
    /// Step sideways or backward without turning.
    #[default]
    Strafe,
    /// Turn to face the next cell, then step forward.
    TurnThenStep,
}

/// The configuration of a navigator, usually loaded from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KernelConfig {
    pub weights: CostWeights,
    pub search: SearchMode,
    pub movement: MovementStyle,
    /// Attack a believed opponent standing straight ahead on the path instead of waiting.
    pub attack_blockers: bool,
    /// Forget occupants not seen for more than this many ticks.
    pub occupant_memory: Option<u64>,
    /// The action returned when a tick fails.
    pub default_action: Action,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            weights: CostWeights::default(),
            search: SearchMode::default(),
            movement: MovementStyle::default(),
            attack_blockers: false,
            occupant_memory: None,
            default_action: Action::TurnRight,
        }
    }
}

impl KernelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: KernelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.default_action.is_step() {
            return Err(ConfigError::Invalid(format!(
                "default action {} would move the champion",
                self.default_action
            )));
        }
        Ok(())
    }
}
