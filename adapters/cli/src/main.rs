#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the demo stage without a window.

mod stubs;
mod ticker;

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use demo_stage_core::{Command, Event, SpriteIndex, TaskKind, TextureCatalog, Viewport};
use demo_stage_rendering::{
    back_to_menu_button, card_nodes, scatter_nodes, BackdropPresentation, ButtonIntent, Color,
    Emitter, HudAnchor, ParticleEngine, Presentation, SceneContainer, StageScene, TextureRegistry,
};
use demo_stage_system_dealer::{Config as DealerConfig, Dealer};
use demo_stage_world::{self as world, query, StageConfig, World};

use stubs::{CollectingContainer, InMemoryTextures, StubParticleEngine};
use ticker::Ticker;

const STAGE_WIDTH: f32 = 1280.0;
const STAGE_HEIGHT: f32 = 720.0;
const REVEAL_INTERVAL: Duration = Duration::from_millis(1000);

/// Task selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TaskChoice {
    /// Staggered card reveal animation.
    CardReveal,
    /// Periodically refreshing random layout.
    RandomLayout,
    /// One-shot particle showcase.
    ParticleShowcase,
}

impl TaskChoice {
    const fn kind(self) -> TaskKind {
        match self {
            Self::CardReveal => TaskKind::CardReveal,
            Self::RandomLayout => TaskKind::RandomLayout,
            Self::ParticleShowcase => TaskKind::ParticleShowcase,
        }
    }
}

impl fmt::Display for TaskChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CardReveal => "card-reveal",
            Self::RandomLayout => "random-layout",
            Self::ParticleShowcase => "particle-showcase",
        };
        f.write_str(name)
    }
}

/// Headless frame-loop driver for the demo stage.
#[derive(Debug, Parser)]
#[command(name = "demo-stage")]
struct Args {
    /// Task started once the stage has booted.
    #[arg(long, value_enum, default_value_t = TaskChoice::CardReveal)]
    task: TaskChoice,

    /// Number of frames to simulate before returning to the menu.
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Fixed frame delta in milliseconds used for scripted runs.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Advances with wall-clock deltas instead of the fixed delta.
    #[arg(long)]
    realtime: bool,

    /// Seed for the random layout task, drawn randomly when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the demo stage command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let viewport = Viewport::new(STAGE_WIDTH, STAGE_HEIGHT);
    let catalog = TextureCatalog::with_contiguous(SpriteIndex::DISTINCT_PER_SHEET + 1);
    let textures = InMemoryTextures::with_catalog(&catalog);

    let mut world = World::new(StageConfig::new(viewport, catalog).with_scatter_seed(seed))
        .context("constructing the stage")?;
    println!("{}", query::welcome_banner(&world));

    let mut dealer = Dealer::new(DealerConfig::new(REVEAL_INTERVAL));
    let mut engine = StubParticleEngine::default();
    let mut container = CollectingContainer::default();
    let mut presentation = Presentation::new(
        "Demo Stage",
        Color::from_rgb_u8(0x10, 0x10, 0x18),
        StageScene::default(),
    );
    println!(
        "{} ({}x{})",
        presentation.window_title, STAGE_WIDTH, STAGE_HEIGHT
    );

    submit(
        &mut world,
        &mut dealer,
        &mut engine,
        ButtonIntent::StartTask(args.task.kind()).command(),
    )?;

    let mut ticker = Ticker::new();
    for _ in 0..args.frames {
        let dt = if args.realtime {
            ticker.frame_delta()
        } else {
            Duration::from_millis(args.frame_ms)
        };

        submit(&mut world, &mut dealer, &mut engine, Command::Tick { dt })?;
        presentation.scene = rebuild_scene(&world, &textures, &mut container)?;
        engine.update(dt);
    }

    submit(
        &mut world,
        &mut dealer,
        &mut engine,
        back_to_menu_button().intent.command(),
    )?;

    println!("frames simulated: {} (seed {seed})", args.frames);
    println!(
        "cards revealed: {} of {}",
        query::revealed_count(&world),
        world::DECK_SIZE
    );
    println!(
        "scene nodes: {}{}",
        container.children().len(),
        if presentation.scene.backdrop.is_some() {
            " plus backdrop"
        } else {
            ""
        }
    );
    println!(
        "particle engine: {} emitter(s), {:?} simulated",
        engine.emitters_started(),
        engine.elapsed()
    );

    Ok(())
}

/// Applies one command, then feeds the resulting events through the dealer
/// until the command stream settles.
fn submit(
    world: &mut World,
    dealer: &mut Dealer,
    engine: &mut StubParticleEngine,
    command: Command,
) -> Result<()> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    loop {
        for event in &events {
            log_event(event);
        }
        for event in &events {
            if let Event::EffectRequested { effect } = event {
                let mut emitter = engine
                    .emitter(*effect)
                    .context("resolving the requested effect")?;
                emitter.init(HudAnchor::Center.position(query::viewport(world)))?;
            }
        }

        let mut commands = Vec::new();
        dealer.handle(&events, query::active_task(world), &mut commands);
        if commands.is_empty() {
            return Ok(());
        }

        events.clear();
        for command in commands {
            let mut generated = Vec::new();
            world::apply(world, command, &mut generated);
            events.extend(generated);
        }
    }
}

/// Rebuilds the display list from the world's current views.
fn rebuild_scene(
    world: &World,
    textures: &InMemoryTextures,
    container: &mut CollectingContainer,
) -> Result<StageScene> {
    let mut scene = StageScene {
        cards: card_nodes(&query::card_view(world)),
        ..StageScene::default()
    };
    if let Some(view) = query::scatter_view(world) {
        scene.scatter = scatter_nodes(&view);
    }
    if let Some(snapshot) = query::showcase_view(world) {
        scene.backdrop = Some(BackdropPresentation::from_rect(snapshot.backdrop));
    }

    container.remove_children();
    for node in scene.cards.iter().chain(scene.scatter.iter()) {
        let _ = textures
            .lookup(node.sprite)
            .context("resolving a scene node texture")?;
        container.add_child(*node);
    }

    Ok(scene)
}

fn log_event(event: &Event) {
    match event {
        Event::TimeAdvanced { .. } => {}
        Event::TaskStarted { task } => println!("task started: {task:?}"),
        Event::TaskStopped { task } => println!("task stopped: {task:?}"),
        Event::TaskStartRejected { task, reason } => {
            println!("task rejected: {task:?} ({reason})");
        }
        Event::CardRevealed {
            card,
            ordinal,
            target,
        } => println!(
            "card {} revealed (ordinal {ordinal}) toward ({:.1}, {:.1})",
            card.get(),
            target.x(),
            target.y()
        ),
        Event::MotionCompleted { card } => println!("card {} settled", card.get()),
        Event::LayoutRefreshed { generation } => {
            println!("layout refreshed (generation {generation})");
        }
        Event::EffectRequested { effect } => {
            println!("effect requested: {}", effect.name());
        }
    }
}
