use std::time::Duration;

use demo_stage_core::{
    CardSnapshot, Command, Event, SpriteIndex, TaskKind, TextureCatalog, Viewport,
};
use demo_stage_system_dealer::{Config, Dealer};
use demo_stage_world::{self as world, query, StageConfig, World, DECK_SIZE};

fn stage_world() -> World {
    let catalog = TextureCatalog::with_contiguous(SpriteIndex::DISTINCT_PER_SHEET + 1);
    World::new(StageConfig::new(Viewport::new(1280.0, 720.0), catalog)).expect("valid config")
}

#[test]
fn emits_multiple_reveal_commands_for_large_dt() {
    let mut world = stage_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartTask {
            task: TaskKind::CardReveal,
        },
        &mut events,
    );

    let mut dealer = Dealer::new(Config::new(Duration::from_millis(500)));
    let mut commands = Vec::new();
    dealer.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(2),
        }],
        query::active_task(&world),
        &mut commands,
    );

    assert_eq!(commands.len(), 4, "expected one reveal per interval");
    assert!(commands
        .iter()
        .all(|command| matches!(command, Command::RevealCard)));
}

#[test]
fn other_tasks_reset_the_accumulator() {
    let mut dealer = Dealer::new(Config::new(Duration::from_secs(1)));

    let mut commands = Vec::new();
    dealer.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        Some(TaskKind::CardReveal),
        &mut commands,
    );
    assert!(commands.is_empty(), "no reveal before a full interval");

    dealer.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        Some(TaskKind::RandomLayout),
        &mut commands,
    );
    assert!(commands.is_empty(), "other tasks never reveal");

    dealer.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        Some(TaskKind::CardReveal),
        &mut commands,
    );
    assert!(commands.is_empty(), "accumulator restarts after the detour");

    dealer.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        Some(TaskKind::CardReveal),
        &mut commands,
    );
    assert_eq!(commands.len(), 1, "expected reveal after a full interval");
}

#[test]
fn deals_the_entire_deck_over_time() {
    let mut world = stage_world();
    let mut dealer = Dealer::new(Config::new(Duration::from_millis(1000)));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartTask {
            task: TaskKind::CardReveal,
        },
        &mut events,
    );

    for _ in 0..DECK_SIZE + 10 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1000),
            },
            &mut events,
        );
        let mut commands = Vec::new();
        dealer.handle(&events, query::active_task(&world), &mut commands);
        for command in commands {
            let mut reveal_events = Vec::new();
            world::apply(&mut world, command, &mut reveal_events);
        }
    }

    assert_eq!(query::revealed_count(&world), DECK_SIZE as usize);
    assert_eq!(query::staged_count(&world), 0);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        !first.log.is_empty(),
        "scripted run should produce reveal events"
    );
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = stage_world();
    let mut dealer = Dealer::new(Config::new(Duration::from_millis(750)));
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        process_dealing(&mut world, &mut dealer, events, &mut log);
    }

    ReplayOutcome {
        cards: query::card_view(&world).into_vec(),
        log,
    }
}

fn process_dealing(
    world: &mut World,
    dealer: &mut Dealer,
    pending_events: Vec<Event>,
    log: &mut Vec<Event>,
) {
    let mut events = pending_events;

    loop {
        log.extend(events.iter().cloned());

        let active_task = query::active_task(world);
        let mut commands = Vec::new();
        dealer.handle(&events, active_task, &mut commands);

        if commands.is_empty() {
            break;
        }

        events.clear();

        for command in commands {
            let mut generated_events = Vec::new();
            world::apply(world, command, &mut generated_events);
            events.extend(generated_events);
        }
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::StartTask {
            task: TaskKind::CardReveal,
        },
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        Command::StartTask {
            task: TaskKind::RandomLayout,
        },
        Command::StartTask {
            task: TaskKind::CardReveal,
        },
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        Command::Tick {
            dt: Duration::from_secs(3),
        },
    ]
}

#[derive(Clone, Debug, PartialEq)]
struct ReplayOutcome {
    cards: Vec<CardSnapshot>,
    log: Vec<Event>,
}
