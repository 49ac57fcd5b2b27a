use adaptive_defence_core::{
    AttackPlan, CellCoord, Command, EnemyId, EnemySpawn, Event, WavePhase, WaveRejection,
    WaveTier,
};
use adaptive_defence_system_pathing::compute_path;
use adaptive_defence_system_spawning::Spawning;
use adaptive_defence_system_tower_combat::TowerCombat;
use adaptive_defence_world::{self as world, query, World};

fn begin_and_launch(world: &mut World, plan: AttackPlan) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::BeginWave, &mut events);

    let mut spawning = Spawning::new();
    let mut commands = Vec::new();
    spawning.handle(
        query::phase(world),
        plan,
        query::round(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn tick(world: &mut World, combat: &mut TowerCombat) -> Vec<Event> {
    let mut commands = Vec::new();
    combat.handle(
        query::phase(world),
        &query::enemy_view(world),
        &query::tower_view(world),
        query::towers_upgraded(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn undefended_normal_wave_breaches_and_advances_round() {
    let mut world = World::new();
    let plan = AttackPlan::new(4, WaveTier::Normal).expect("valid plan");
    let launch_events = begin_and_launch(&mut world, plan);

    assert!(launch_events.contains(&Event::PlanRequested { round: 1 }));
    assert!(launch_events.contains(&Event::WaveLaunched { plan, enemies: 5 }));
    assert_eq!(query::phase(&world), WavePhase::Running);
    assert_eq!(query::wave_progress(&world), 5);
    for enemy in query::enemy_view(&world).iter() {
        assert_eq!(enemy.hit_points, 22);
        assert_eq!(enemy.cell, CellCoord::new(4, 0));
    }

    let mut combat = TowerCombat::new();
    let final_index = compute_path(4).final_index();
    for _ in 1..final_index {
        let _ = tick(&mut world, &mut combat);
        assert_eq!(query::health(&world), 100, "no breach before final index");
    }

    let events = tick(&mut world, &mut combat);
    let breaches = events
        .iter()
        .filter(|event| matches!(event, Event::BaseBreached { .. }))
        .count();
    assert_eq!(breaches, 5);
    assert_eq!(query::health(&world), 50);
    assert_eq!(query::round(&world), 2);
    assert_eq!(query::wave_progress(&world), 0);
    assert_eq!(query::money(&world), 100);
    assert_eq!(query::phase(&world), WavePhase::Reporting);
    assert!(events.contains(&Event::WaveCompleted {
        round: 1,
        kills: 0,
        breaches: 5,
    }));
}

#[test]
fn adjacent_tower_kills_weak_enemy_within_two_ticks() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            cell: CellCoord::new(0, 1),
        },
        &mut events,
    );
    world::apply(&mut world, Command::BeginWave, &mut events);
    let plan = AttackPlan::new(0, WaveTier::Weak).expect("valid plan");
    world::apply(
        &mut world,
        Command::LaunchWave {
            plan,
            enemies: vec![EnemySpawn {
                hit_points: 10,
                path: compute_path(0),
            }],
        },
        &mut events,
    );
    assert_eq!(query::money(&world), 80);

    let mut combat = TowerCombat::new();
    let first = tick(&mut world, &mut combat);
    assert!(first.contains(&Event::EnemyDamaged {
        enemy: EnemyId::new(0),
        damage: 8,
        remaining: 2,
    }));
    assert_eq!(query::wave_progress(&world), 1);

    let second = tick(&mut world, &mut combat);
    let kills = second
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 1);
    assert_eq!(query::wave_progress(&world), 0);
    assert_eq!(query::money(&world), 90);
    assert_eq!(query::phase(&world), WavePhase::Reporting);
}

#[test]
fn second_begin_while_in_progress_is_rejected() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(&mut world, Command::BeginWave, &mut events);
    world::apply(&mut world, Command::BeginWave, &mut events);

    let requests = events
        .iter()
        .filter(|event| matches!(event, Event::PlanRequested { .. }))
        .count();
    assert_eq!(requests, 1);
    assert!(events.contains(&Event::WaveRejected {
        reason: WaveRejection::WaveInProgress,
    }));
    assert_eq!(query::phase(&world), WavePhase::RequestingPlan);
}

#[test]
fn begin_is_rejected_while_running_and_reporting() {
    let mut world = World::new();
    let plan = AttackPlan::new(7, WaveTier::Weak).expect("valid plan");
    let _ = begin_and_launch(&mut world, plan);

    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginWave, &mut events);
    assert_eq!(
        events,
        vec![Event::WaveRejected {
            reason: WaveRejection::WaveInProgress,
        }]
    );

    let mut combat = TowerCombat::new();
    while query::phase(&world) == WavePhase::Running {
        let _ = tick(&mut world, &mut combat);
    }
    assert_eq!(query::phase(&world), WavePhase::Reporting);

    events.clear();
    world::apply(&mut world, Command::BeginWave, &mut events);
    assert_eq!(
        events,
        vec![Event::WaveRejected {
            reason: WaveRejection::WaveInProgress,
        }]
    );

    events.clear();
    world::apply(
        &mut world,
        Command::FinishReport {
            message: "I will adapt soon.".to_owned(),
        },
        &mut events,
    );
    assert_eq!(query::phase(&world), WavePhase::Idle);
    assert_eq!(query::message(&world), "I will adapt soon.");
}

#[test]
fn aborted_plan_request_leaves_no_partial_state() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(&mut world, Command::BeginWave, &mut events);
    assert_eq!(query::message(&world), "AI is preparing its attack...");

    world::apply(
        &mut world,
        Command::AbortWave {
            message: "AI unavailable".to_owned(),
        },
        &mut events,
    );

    assert!(events.contains(&Event::WaveAborted));
    assert_eq!(query::phase(&world), WavePhase::Idle);
    assert_eq!(query::message(&world), "AI unavailable");
    assert_eq!(query::round(&world), 1);
    assert_eq!(query::money(&world), 100);
    assert_eq!(query::wave_progress(&world), 0);
    assert!(query::enemy_view(&world).is_empty());

    events.clear();
    world::apply(&mut world, Command::BeginWave, &mut events);
    assert!(events.contains(&Event::PlanRequested { round: 1 }));
}

#[test]
fn launch_outside_plan_request_is_ignored() {
    let mut world = World::new();
    let mut events = Vec::new();
    let plan = AttackPlan::new(2, WaveTier::Strong).expect("valid plan");

    world::apply(
        &mut world,
        Command::LaunchWave {
            plan,
            enemies: vec![EnemySpawn {
                hit_points: 30,
                path: compute_path(2),
            }],
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::phase(&world), WavePhase::Idle);
}

#[test]
fn health_has_no_floor_and_defeat_blocks_new_waves() {
    let mut world = World::new();
    let mut combat = TowerCombat::new();
    let plan = AttackPlan::new(0, WaveTier::Strong).expect("valid plan");

    for _ in 0..2 {
        let _ = begin_and_launch(&mut world, plan);
        while query::phase(&world) == WavePhase::Running {
            let _ = tick(&mut world, &mut combat);
        }
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::FinishReport {
                message: String::new(),
            },
            &mut events,
        );
    }

    assert_eq!(query::health(&world), 100 - 14 * 10);
    assert!(query::is_defeated(&world));

    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginWave, &mut events);
    assert_eq!(
        events,
        vec![Event::WaveRejected {
            reason: WaveRejection::BaseDestroyed,
        }]
    );
}

#[test]
fn enemy_hit_points_never_increase() {
    let mut world = World::new();
    let mut events = Vec::new();
    for cell in [CellCoord::new(3, 0), CellCoord::new(4, 2), CellCoord::new(6, 3)] {
        world::apply(&mut world, Command::PlaceTower { cell }, &mut events);
    }
    let plan = AttackPlan::new(3, WaveTier::Strong).expect("valid plan");
    let _ = begin_and_launch(&mut world, plan);

    let mut combat = TowerCombat::new();
    let mut previous: Vec<i32> = query::enemy_view(&world)
        .iter()
        .map(|enemy| enemy.hit_points)
        .collect();
    while query::phase(&world) == WavePhase::Running {
        let _ = tick(&mut world, &mut combat);
        let current: Vec<i32> = query::enemy_view(&world)
            .iter()
            .map(|enemy| enemy.hit_points)
            .collect();
        for (before, after) in previous.iter().zip(current.iter()) {
            assert!(after <= before, "hit points increased from {before} to {after}");
        }
        previous = current;
    }
}
