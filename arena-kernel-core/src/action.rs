/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::{fmt, marker::PhantomData};

use arena_kernel_utils::{Coord2D, Direction, DirectionConverter, YDown, YUp, YUpDown};
use serde::{Deserialize, Serialize};

use crate::KernelError;

/// One of the discrete actions a champion can take in a tick, relative to its facing.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    TurnLeft,
    TurnRight,
    StepForward,
    StepBackward,
    StepLeft,
    StepRight,
    Attack,
    #[default]
    DoNothing,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::StepForward,
        Action::StepBackward,
        Action::StepLeft,
        Action::StepRight,
        Action::Attack,
        Action::DoNothing,
    ];

    /// The facing and position of a champion after taking this action on an empty arena.
    pub fn outcome<Y: YUpDown>(&self, facing: Direction, position: Coord2D) -> (Direction, Coord2D) {
        let step = |direction| (facing, DirectionConverter::<Y>::apply(direction, position));
        match self {
            Action::TurnLeft => (facing.turn_left(), position),
            Action::TurnRight => (facing.turn_right(), position),
            Action::StepForward => step(facing),
            Action::StepBackward => step(facing.opposite()),
            Action::StepLeft => step(facing.turn_left()),
            Action::StepRight => step(facing.turn_right()),
            Action::Attack | Action::DoNothing => (facing, position),
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(
            self,
            Action::StepForward | Action::StepBackward | Action::StepLeft | Action::StepRight
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::TurnLeft => "TurnLeft",
            Action::TurnRight => "TurnRight",
            Action::StepForward => "StepForward",
            Action::StepBackward => "StepBackward",
            Action::StepLeft => "StepLeft",
            Action::StepRight => "StepRight",
            Action::Attack => "Attack",
            Action::DoNothing => "DoNothing",
        };
        write!(f, "{}", name)
    }
}

/// Converts moves between adjacent cells into facing-relative actions.
pub struct ActionTranslator<Y: YUpDown> {
    _phantom: PhantomData<Y>,
}

impl<Y: YUpDown> ActionTranslator<Y> {
    /// The single action moving a champion facing `facing` from `current` to `next`.
    ///
    /// `next` must be `current` or one of its four neighbors, any other
    /// displacement is an error and never approximated.
    pub fn translate(facing: Direction, current: Coord2D, next: Coord2D) -> Result<Action, KernelError> {
        if current == next {
            return Ok(Action::DoNothing);
        }
        let direction = DirectionConverter::<Y>::between(current, next).ok_or(
            KernelError::InvalidDisplacement {
                from: current,
                to: next,
            },
        )?;
        Ok(if direction == facing {
            Action::StepForward
        } else if direction == facing.opposite() {
            Action::StepBackward
        } else if direction == facing.turn_left() {
            Action::StepLeft
        } else {
            Action::StepRight
        })
    }

    /// The turn bringing `facing` closer to `desired`, `None` if already there.
    ///
    /// Facing the opposite way takes two turns; the first is always [Action::TurnLeft].
    pub fn turn_toward(facing: Direction, desired: Direction) -> Option<Action> {
        if facing == desired {
            None
        } else if facing.turn_right() == desired {
            Some(Action::TurnRight)
        } else {
            Some(Action::TurnLeft)
        }
    }

    /// The turn to face the adjacent cell `next`, `None` if already facing it.
    pub fn turn_toward_cell(
        facing: Direction,
        current: Coord2D,
        next: Coord2D,
    ) -> Result<Option<Action>, KernelError> {
        let desired = DirectionConverter::<Y>::between(current, next).ok_or(
            KernelError::InvalidDisplacement {
                from: current,
                to: next,
            },
        )?;
        Ok(Self::turn_toward(facing, desired))
    }
}

/// Translate actions with up being positive.
pub type ActionTranslatorYUp = ActionTranslator<YUp>;
/// Translate actions with up being negative, as the arena engine does.
pub type ActionTranslatorYDown = ActionTranslator<YDown>;
