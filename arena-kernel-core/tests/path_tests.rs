/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::collections::{BTreeMap, HashSet};

use arena_kernel_core::{
    Action, Arena, BeliefState, CostField, CostWeights, EffectKind, KernelConfig, NavigatorYUp,
    Observation, Occupant, PathEngine, PathResult, SearchMode, TerrainKind, TileSnapshot,
    WeaponKind,
};
use arena_kernel_utils::{Coord2D, Direction, Map2D, YUp};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x5eed_a2e4a;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_simple_path(result: &PathResult, field: &CostField) {
    let mut seen = HashSet::new();
    for cell in result.path() {
        assert!(seen.insert(*cell), "cell {} visited twice", cell);
    }
    for pair in result.path().windows(2) {
        assert!(pair[0].is_adjacent(pair[1]), "{} and {} not adjacent", pair[0], pair[1]);
        assert!(field.is_passable(pair[1]), "{} is not passable", pair[1]);
    }
}

fn random_field(rng: &mut ChaCha8Rng, size: Coord2D, wall_probability: f64) -> CostField {
    let mut costs = Map2D::new(size, None);
    for y in 0..size.y {
        for x in 0..size.x {
            let cost = if rng.gen_bool(wall_probability) {
                None
            } else {
                Some(rng.gen_range(1..=5) as f32)
            };
            *costs.get_mut(Coord2D::new(x, y)).unwrap() = cost;
        }
    }
    CostField::from_costs(costs)
}

fn random_passable(rng: &mut ChaCha8Rng, field: &CostField) -> Coord2D {
    loop {
        let coord = Coord2D::rand_uniform(rng, field.size());
        if field.is_passable(coord) {
            return coord;
        }
    }
}

#[test]
fn uniform_paths_have_manhattan_length() {
    init_logger();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let size = Coord2D::new(11, 7);
    let field = CostField::uniform(size, 1.);
    for mode in [SearchMode::Dijkstra, SearchMode::AStar] {
        let engine = PathEngine::new(mode);
        for _ in 0..200 {
            let source = Coord2D::rand_uniform(&mut rng, size);
            let target = Coord2D::rand_uniform(&mut rng, size);
            let result = engine.shortest_path(&field, source, target).unwrap();
            assert!(result.reached_target());
            assert_eq!(result.source(), source);
            assert_eq!(result.steps() as i32, source.manhattan_dist(target));
            assert_eq!(result.cost(), source.manhattan_dist(target) as f32);
            assert_simple_path(&result, &field);
        }
    }
}

#[test]
fn search_modes_agree_on_costs() {
    init_logger();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + 1);
    let dijkstra = PathEngine::new(SearchMode::Dijkstra);
    let a_star = PathEngine::new(SearchMode::AStar);
    for _ in 0..30 {
        let field = random_field(&mut rng, Coord2D::new(12, 9), 0.25);
        if field.passable_count() == 0 {
            continue;
        }
        let source = random_passable(&mut rng, &field);
        let flood = dijkstra.flood(&field, source).unwrap();
        for _ in 0..10 {
            let target = random_passable(&mut rng, &field);
            let slow = dijkstra.shortest_path(&field, source, target).unwrap();
            let fast = a_star.shortest_path(&field, source, target).unwrap();
            assert_eq!(slow.reached_target(), fast.reached_target());
            assert_simple_path(&slow, &field);
            assert_simple_path(&fast, &field);
            if fast.reached_target() {
                assert_eq!(slow.cost(), fast.cost());
                assert_eq!(flood.distance_to(target), Some(fast.cost()));
                // the first step lies on an optimal path
                if let Some(step) = fast.first_step() {
                    assert_eq!(flood.distance_to(step), field.cost(step));
                }
            } else {
                assert_eq!(flood.distance_to(target), None);
                // fallbacks end equally close to the target
                assert_eq!(
                    slow.destination().manhattan_dist(target),
                    fast.destination().manhattan_dist(target)
                );
                assert_eq!(
                    flood.closest_to(target).destination().manhattan_dist(target),
                    fast.destination().manhattan_dist(target)
                );
            }
        }
    }
}

#[test]
fn walled_off_target_falls_back_deterministically() {
    init_logger();
    let size = Coord2D::new(7, 7);
    let center = Coord2D::new(3, 3);
    let mut costs = Map2D::new(size, Some(1.));
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx != 0 || dy != 0 {
                *costs.get_mut(center + Coord2D::new(dx, dy)).unwrap() = None;
            }
        }
    }
    let field = CostField::from_costs(costs);
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + 2);
    for mode in [SearchMode::Dijkstra, SearchMode::AStar] {
        let engine = PathEngine::new(mode);
        for _ in 0..20 {
            // sources on the border are at least 3 away from the center
            let source = loop {
                let coord = Coord2D::rand_uniform(&mut rng, size);
                if coord.x == 0 || coord.y == 0 || coord.x == 6 || coord.y == 6 {
                    break coord;
                }
            };
            let first = engine.shortest_path(&field, source, center).unwrap();
            assert!(!first.is_empty());
            assert!(!first.reached_target());
            assert_eq!(first.destination().manhattan_dist(center), 2);
            assert_simple_path(&first, &field);
            let again = engine.shortest_path(&field, source, center).unwrap();
            assert_eq!(first, again);
        }
    }
}

fn observe_self(tick: u64, position: Coord2D, facing: Direction, extra: Vec<(Coord2D, TileSnapshot)>) -> Observation {
    let mut visible = extra.into_iter().collect::<BTreeMap<_, _>>();
    visible.insert(
        position,
        TileSnapshot::new(TerrainKind::Land).with_occupant(Occupant::new("walker", facing, WeaponKind::Knife, 10)),
    );
    Observation::from_visible(tick, position, 1, visible).unwrap()
}

#[test]
fn five_by_five_walk() {
    init_logger();
    let arena = Arena::uniform(Coord2D::new(5, 5), TerrainKind::Land);
    let target = Coord2D::new(0, 3);
    let mut navigator = NavigatorYUp::new(KernelConfig::default());
    navigator.reset(&arena);

    let mut position = Coord2D::new(0, 0);
    let mut facing = Direction::Up;
    navigator.observe(&observe_self(0, position, facing, vec![])).unwrap();
    let path = navigator.path_to(target).unwrap();
    assert_eq!(path.first_step(), Some(Coord2D::new(0, 1)));

    for tick in 1..=3 {
        let action = navigator.step_toward(target).unwrap();
        assert_eq!(action, Action::StepForward);
        let (new_facing, new_position) = action.outcome::<YUp>(facing, position);
        facing = new_facing;
        position = new_position;
        navigator.observe(&observe_self(tick, position, facing, vec![])).unwrap();
    }
    assert_eq!(position, target);
    let path = navigator.path_to(target).unwrap();
    assert!(path.is_empty());
    assert_eq!(navigator.step_toward(target).unwrap(), Action::DoNothing);
}

#[test]
fn mist_is_avoided() {
    init_logger();
    let arena = Arena::uniform(Coord2D::new(5, 5), TerrainKind::Land);
    let mut belief = BeliefState::from_arena(&arena);
    let mist = Coord2D::new(2, 2);
    let source = Coord2D::new(2, 0);
    belief
        .ingest(&observe_self(
            0,
            source,
            Direction::Down,
            vec![(mist, TileSnapshot::new(TerrainKind::Land).with_effect(EffectKind::Mist))],
        ))
        .unwrap();

    let weights = CostWeights::default();
    let field = CostField::build(&belief, &weights);
    let baseline = field.cost(Coord2D::new(0, 0)).unwrap();
    assert!(field.cost(mist).unwrap() > baseline);
    for neighbor in mist.neighbors() {
        assert_eq!(field.cost(neighbor), Some(baseline));
    }

    let target = Coord2D::new(2, 4);
    for mode in [SearchMode::Dijkstra, SearchMode::AStar] {
        let result = PathEngine::new(mode).shortest_path(&field, source, target).unwrap();
        assert!(result.reached_target());
        assert!(!result.path().contains(&mist));
        assert_eq!(result.steps(), 6);
        assert_eq!(result.cost(), 6.);
    }

    // with a penalty cheaper than the detour, the short path wins
    let cheap = CostWeights {
        mist_penalty: 1.,
        ..Default::default()
    };
    let field = CostField::build(&belief, &cheap);
    let result = PathEngine::default().shortest_path(&field, source, target).unwrap();
    assert!(result.path().contains(&mist));
    assert_eq!(result.cost(), 5.);
}
