/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::marker::PhantomData;

use arena_kernel_utils::{Coord2D, DirectionConverter, YDown, YUp, YUpDown};

use crate::{
    Action, ActionTranslator, Arena, BeliefState, CostField, DistanceField, IngestSummary,
    KernelConfig, KernelError, MovementStyle, Observation, PathEngine, PathResult, SelfState,
};

/// The per-champion owner of the belief state, keeping the cost field of the current tick.
pub struct Navigator<Y: YUpDown> {
    config: KernelConfig,
    engine: PathEngine,
    belief: Option<BeliefState>,
    // valid until the next observation
    cost_field: Option<CostField>,
    _phantom: PhantomData<Y>,
}

impl<Y: YUpDown> Navigator<Y> {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            engine: PathEngine::new(config.search),
            config,
            belief: None,
            cost_field: None,
            _phantom: PhantomData,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Starts a new game on `arena`, dropping everything learned in the previous one.
    pub fn reset(&mut self, arena: &Arena) {
        self.belief = Some(BeliefState::from_arena(arena));
        self.cost_field = None;
        log::debug!("navigator reset on a {} arena", arena.size());
    }

    /// Ends the game, dropping the belief state.
    pub fn praise(&mut self, score: i32) {
        let tick = self.belief.as_ref().and_then(BeliefState::tick);
        log::info!("game ended at tick {:?} with score {}", tick, score);
        self.belief = None;
        self.cost_field = None;
    }

    pub fn belief(&self) -> Result<&BeliefState, KernelError> {
        self.belief.as_ref().ok_or(KernelError::NotReset)
    }

    fn me(&self) -> Result<&SelfState, KernelError> {
        self.belief()?.me().ok_or(KernelError::NoObservation)
    }

    /// Ingests the observation of the current tick.
    pub fn observe(&mut self, observation: &Observation) -> Result<IngestSummary, KernelError> {
        let belief = self.belief.as_mut().ok_or(KernelError::NotReset)?;
        let summary = belief.ingest(observation)?;
        if let Some(memory) = self.config.occupant_memory {
            belief.forget_stale_occupants(memory);
        }
        self.cost_field = None;
        Ok(summary)
    }

    pub fn has_cached_cost_field(&self) -> bool {
        self.cost_field.is_some()
    }

    /// The cost field of the current belief, built at most once per tick.
    pub fn cost_field(&mut self) -> Result<&CostField, KernelError> {
        let belief = self.belief.as_ref().ok_or(KernelError::NotReset)?;
        let weights = &self.config.weights;
        Ok(self
            .cost_field
            .get_or_insert_with(|| CostField::build(belief, weights)))
    }

    /// The path from the champion's position toward `target`.
    pub fn path_to(&mut self, target: Coord2D) -> Result<PathResult, KernelError> {
        let position = self.me()?.position;
        let engine = self.engine;
        engine.shortest_path(self.cost_field()?, position, target)
    }

    /// The distances from the champion's position to every reachable cell.
    pub fn distances(&mut self) -> Result<DistanceField, KernelError> {
        let position = self.me()?.position;
        let engine = self.engine;
        engine.flood(self.cost_field()?, position)
    }

    /// The action bringing the champion one step closer to `target`.
    pub fn step_toward(&mut self, target: Coord2D) -> Result<Action, KernelError> {
        let path = self.path_to(target)?;
        let me = self.me()?;
        let (facing, position) = (me.facing, me.position);
        let next = match path.first_step() {
            Some(next) => next,
            None => return Ok(Action::DoNothing),
        };
        let ahead = DirectionConverter::<Y>::apply(facing, position);
        if self.config.attack_blockers
            && next == ahead
            && self.belief()?.opponent_at(next).is_some()
        {
            log::trace!("{}: opponent blocking the path at {}", position, next);
            return Ok(Action::Attack);
        }
        match self.config.movement {
            MovementStyle::Strafe => ActionTranslator::<Y>::translate(facing, position, next),
            MovementStyle::TurnThenStep => {
                ActionTranslator::<Y>::turn_toward_cell(facing, position, next)
                    .map(|turn| turn.unwrap_or(Action::StepForward))
            }
        }
    }
}

/// Navigator with up being positive.
pub type NavigatorYUp = Navigator<YUp>;
/// Navigator with up being negative, as the arena engine does.
pub type NavigatorYDown = Navigator<YDown>;

/// A champion as seen by the arena engine.
pub trait Controller {
    /// The name under which the champion is registered.
    fn name(&self) -> &str;
    /// Called once at the start of every game.
    fn reset(&mut self, arena: &Arena);
    /// Called once per tick, must always return an action.
    fn decide(&mut self, observation: &Observation) -> Action;
    /// Called once at the end of every game (by default do nothing)
    fn praise(&mut self, _score: i32) {}
}

/// Where a champion wants to go, the part of a controller specific to each strategy.
pub trait TargetPolicy {
    /// The cell to head to this tick, `None` to stay (the controller then returns its default action).
    fn choose_target(&mut self, belief: &BeliefState) -> Option<Coord2D>;
    /// Called at the start of every game (by default do nothing)
    fn reset(&mut self) {}
    /// Called at the end of every game (by default do nothing)
    fn praise(&mut self, _score: i32) {}
}

// automatic implementation for closures
impl<F: FnMut(&BeliefState) -> Option<Coord2D>> TargetPolicy for F {
    fn choose_target(&mut self, belief: &BeliefState) -> Option<Coord2D> {
        self(belief)
    }
}

/// A [Controller] that walks toward the targets of a [TargetPolicy].
///
/// Any kernel error is logged and answered with the configured default action,
/// so that a fault never lasts beyond its tick.
pub struct PolicyController<P: TargetPolicy, Y: YUpDown> {
    name: String,
    navigator: Navigator<Y>,
    policy: P,
}

impl<P: TargetPolicy, Y: YUpDown> PolicyController<P, Y> {
    pub fn new(name: impl Into<String>, config: KernelConfig, policy: P) -> Self {
        Self {
            name: name.into(),
            navigator: Navigator::new(config),
            policy,
        }
    }

    pub fn navigator(&self) -> &Navigator<Y> {
        &self.navigator
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    fn try_decide(&mut self, observation: &Observation) -> Result<Action, KernelError> {
        self.navigator.observe(observation)?;
        let target = self.policy.choose_target(self.navigator.belief()?);
        match target {
            Some(target) => self.navigator.step_toward(target),
            None => Ok(self.navigator.config().default_action),
        }
    }
}

impl<P: TargetPolicy, Y: YUpDown> Controller for PolicyController<P, Y> {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self, arena: &Arena) {
        self.navigator.reset(arena);
        self.policy.reset();
    }

    fn decide(&mut self, observation: &Observation) -> Action {
        match self.try_decide(observation) {
            Ok(action) => action,
            Err(e) => {
                let fallback = self.navigator.config().default_action;
                log::warn!(
                    "T{}\t{}: {}, falling back to {}",
                    observation.tick,
                    self.name,
                    e,
                    fallback
                );
                fallback
            }
        }
    }

    fn praise(&mut self, score: i32) {
        log::info!("{} praised with {}", self.name, score);
        self.navigator.praise(score);
        self.policy.praise(score);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use arena_kernel_utils::Direction;

    use super::*;
    use crate::{Occupant, TerrainKind, TileSnapshot, WeaponKind};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn observation(tick: u64, position: Coord2D, facing: Direction, others: Vec<(Coord2D, TileSnapshot)>) -> Observation {
        let mut visible = others.into_iter().collect::<BTreeMap<_, _>>();
        visible.insert(
            position,
            TileSnapshot::new(TerrainKind::Land).with_occupant(Occupant::new("me", facing, WeaponKind::Knife, 8)),
        );
        Observation::from_visible(tick, position, 2, visible).unwrap()
    }

    #[test]
    fn lifecycle_errors() {
        init_logger();
        let mut navigator = NavigatorYDown::new(KernelConfig::default());
        assert_eq!(navigator.belief().err(), Some(KernelError::NotReset));
        assert_eq!(
            navigator.observe(&observation(0, Coord2D::ZERO, Direction::Up, vec![])),
            Err(KernelError::NotReset)
        );
        navigator.reset(&Arena::uniform(Coord2D::new(3, 3), TerrainKind::Land));
        assert_eq!(navigator.step_toward(Coord2D::new(2, 2)), Err(KernelError::NoObservation));
        navigator.observe(&observation(0, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert!(navigator.step_toward(Coord2D::new(2, 2)).is_ok());
        navigator.praise(3);
        assert_eq!(navigator.belief().err(), Some(KernelError::NotReset));
    }

    #[test]
    fn cost_field_cached_per_tick() {
        init_logger();
        let mut navigator = NavigatorYDown::new(KernelConfig::default());
        navigator.reset(&Arena::uniform(Coord2D::new(4, 4), TerrainKind::Land));
        navigator.observe(&observation(0, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert!(!navigator.has_cached_cost_field());
        navigator.path_to(Coord2D::new(3, 3)).unwrap();
        assert!(navigator.has_cached_cost_field());
        navigator.path_to(Coord2D::new(0, 3)).unwrap();
        navigator.distances().unwrap();
        assert!(navigator.has_cached_cost_field());
        navigator.observe(&observation(1, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert!(!navigator.has_cached_cost_field());
    }

    #[test]
    fn movement_styles() {
        init_logger();
        let arena = Arena::uniform(Coord2D::new(3, 1), TerrainKind::Land);
        let target = Coord2D::new(2, 0);
        let mut strafe = NavigatorYDown::new(KernelConfig::default());
        strafe.reset(&arena);
        strafe.observe(&observation(0, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert_eq!(strafe.step_toward(target), Ok(Action::StepRight));

        let mut turning = NavigatorYDown::new(KernelConfig {
            movement: MovementStyle::TurnThenStep,
            ..Default::default()
        });
        turning.reset(&arena);
        turning.observe(&observation(0, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert_eq!(turning.step_toward(target), Ok(Action::TurnRight));
        turning.observe(&observation(1, Coord2D::ZERO, Direction::Right, vec![])).unwrap();
        assert_eq!(turning.step_toward(target), Ok(Action::StepForward));
        assert_eq!(turning.step_toward(Coord2D::ZERO), Ok(Action::DoNothing));
    }

    #[test]
    fn attacks_blocker_ahead() {
        init_logger();
        let arena = Arena::uniform(Coord2D::new(3, 1), TerrainKind::Land);
        let enemy = Occupant::new("enemy", Direction::Left, WeaponKind::Sword, 3);
        let blocked = vec![(Coord2D::new(1, 0), TileSnapshot::new(TerrainKind::Land).with_occupant(enemy))];
        let mut navigator = NavigatorYDown::new(KernelConfig {
            attack_blockers: true,
            ..Default::default()
        });
        navigator.reset(&arena);
        navigator
            .observe(&observation(0, Coord2D::ZERO, Direction::Right, blocked.clone()))
            .unwrap();
        assert_eq!(navigator.step_toward(Coord2D::new(2, 0)), Ok(Action::Attack));
        // not facing it: just move
        navigator.observe(&observation(1, Coord2D::ZERO, Direction::Up, blocked)).unwrap();
        assert_eq!(navigator.step_toward(Coord2D::new(2, 0)), Ok(Action::StepRight));
    }

    #[test]
    fn occupant_memory_is_applied() {
        init_logger();
        let arena = Arena::uniform(Coord2D::new(4, 1), TerrainKind::Land);
        let enemy = Occupant::new("enemy", Direction::Left, WeaponKind::Bow, 3);
        let mut navigator = NavigatorYDown::new(KernelConfig {
            occupant_memory: Some(2),
            ..Default::default()
        });
        navigator.reset(&arena);
        let seen = vec![(Coord2D::new(3, 0), TileSnapshot::new(TerrainKind::Land).with_occupant(enemy))];
        navigator.observe(&observation(0, Coord2D::ZERO, Direction::Up, seen)).unwrap();
        navigator.observe(&observation(2, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert_eq!(navigator.belief().unwrap().opponents().len(), 1);
        navigator.observe(&observation(3, Coord2D::ZERO, Direction::Up, vec![])).unwrap();
        assert!(navigator.belief().unwrap().opponents().is_empty());
    }

    #[test]
    fn controller_falls_back_on_errors() {
        init_logger();
        let arena = Arena::uniform(Coord2D::new(3, 3), TerrainKind::Land);
        let mut controller = PolicyController::<_, YDown>::new(
            "walker",
            KernelConfig::default(),
            |_: &BeliefState| Some(Coord2D::new(0, 2)),
        );
        assert_eq!(controller.name(), "walker");

        // never reset
        let first = observation(5, Coord2D::ZERO, Direction::Down, vec![]);
        assert_eq!(controller.decide(&first), Action::TurnRight);

        controller.reset(&arena);
        assert_eq!(controller.decide(&first), Action::StepForward);
        // tick regression
        let stale = observation(4, Coord2D::ZERO, Direction::Down, vec![]);
        assert_eq!(controller.decide(&stale), Action::TurnRight);
        controller.praise(10);
        assert!(controller.navigator().belief().is_err());
    }

    #[test]
    fn controller_without_target_idles() {
        init_logger();
        let mut controller = PolicyController::<_, YDown>::new(
            "idle",
            KernelConfig {
                default_action: Action::TurnLeft,
                ..Default::default()
            },
            |_: &BeliefState| None,
        );
        controller.reset(&Arena::uniform(Coord2D::new(2, 2), TerrainKind::Land));
        let action = controller.decide(&observation(0, Coord2D::ZERO, Direction::Up, vec![]));
        assert_eq!(action, Action::TurnLeft);
    }
}
