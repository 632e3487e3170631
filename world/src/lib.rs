#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative stage state for the demo tasks.
//!
//! The stage owns exactly one task at a time. Starting a task allocates its
//! session state, stopping discards it wholesale, and every time-based update
//! flows through [`apply`] with an explicit frame delta. Adapters and systems
//! observe the stage exclusively through broadcast events and the [`query`]
//! module.

mod deck;

use std::{mem, time::Duration};

use demo_stage_core::{
    BackdropRect, Command, ConfigError, Event, EffectKind, Position, ScatterItem, TaskKind,
    TextureCatalog, Viewport, WELCOME_BANNER,
};

use deck::DealSession;
pub use deck::DECK_SIZE;

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;
const DEFAULT_SCATTER_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

const SCATTER_ITEM_COUNT: usize = 12;
const LAYOUT_REFRESH_THRESHOLD: Duration = Duration::from_millis(2000);

const BACKDROP_SCALE: f32 = 0.7;
const BACKDROP_HEIGHT_RATIO: f32 = 1.1;

/// Construction-time parameters for the stage.
#[derive(Clone, Debug)]
pub struct StageConfig {
    viewport: Viewport,
    catalog: TextureCatalog,
    scatter_seed: u64,
}

impl StageConfig {
    /// Creates a new configuration from the fixed viewport and texture catalog.
    #[must_use]
    pub fn new(viewport: Viewport, catalog: TextureCatalog) -> Self {
        Self {
            viewport,
            catalog,
            scatter_seed: DEFAULT_SCATTER_SEED,
        }
    }

    /// Overrides the seed used by the random layout task.
    #[must_use]
    pub fn with_scatter_seed(mut self, seed: u64) -> Self {
        self.scatter_seed = seed;
        self
    }
}

/// Represents the authoritative stage state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    viewport: Viewport,
    catalog: TextureCatalog,
    scatter_seed: u64,
    task: TaskState,
}

impl World {
    /// Creates a new stage ready to run the demo tasks.
    ///
    /// Malformed configuration is fatal here; the stage never attempts
    /// partial degraded operation.
    pub fn new(config: StageConfig) -> Result<Self, ConfigError> {
        let StageConfig {
            viewport,
            catalog,
            scatter_seed,
        } = config;

        if !(viewport.max_x() > 0.0 && viewport.max_y() > 0.0) {
            return Err(ConfigError::InvalidViewport {
                max_x: viewport.max_x(),
                max_y: viewport.max_y(),
            });
        }
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            viewport,
            catalog,
            scatter_seed,
            task: TaskState::Idle,
        })
    }
}

/// Per-task session state, constructed fresh on start and discarded on stop.
#[derive(Debug)]
enum TaskState {
    Idle,
    CardReveal(DealSession),
    RandomLayout(ScatterSession),
    ParticleShowcase(ShowcaseSession),
}

impl TaskState {
    fn kind(&self) -> Option<TaskKind> {
        match self {
            Self::Idle => None,
            Self::CardReveal(_) => Some(TaskKind::CardReveal),
            Self::RandomLayout(_) => Some(TaskKind::RandomLayout),
            Self::ParticleShowcase(_) => Some(TaskKind::ParticleShowcase),
        }
    }
}

/// Accumulator-timed random layout session.
#[derive(Debug)]
struct ScatterSession {
    timer: Duration,
    threshold: Duration,
    generation: u64,
    rng_state: u64,
    items: Vec<ScatterItem>,
}

impl ScatterSession {
    fn start(seed: u64, viewport: Viewport, catalog: &TextureCatalog) -> Self {
        let mut session = Self {
            timer: Duration::ZERO,
            threshold: LAYOUT_REFRESH_THRESHOLD,
            generation: 0,
            rng_state: seed,
            items: Vec::with_capacity(SCATTER_ITEM_COUNT),
        };
        session.regenerate(viewport, catalog);
        session
    }

    /// Accumulates `dt` and performs one refresh per full threshold
    /// crossing, carrying the remainder into the next cycle.
    fn advance(
        &mut self,
        dt: Duration,
        viewport: Viewport,
        catalog: &TextureCatalog,
        out_events: &mut Vec<Event>,
    ) {
        self.timer = self.timer.saturating_add(dt);
        while self.timer >= self.threshold {
            self.timer -= self.threshold;
            self.generation = self.generation.saturating_add(1);
            self.regenerate(viewport, catalog);
            out_events.push(Event::LayoutRefreshed {
                generation: self.generation,
            });
        }
    }

    fn regenerate(&mut self, viewport: Viewport, catalog: &TextureCatalog) {
        self.items.clear();
        let sprite_count = catalog.len();
        for _ in 0..SCATTER_ITEM_COUNT {
            let pick = (self.advance_rng() % sprite_count as u64) as usize;
            let Some(sprite) = catalog.iter().nth(pick) else {
                continue;
            };
            let x = self.random_fraction() * viewport.max_x();
            let y = self.random_fraction() * viewport.max_y();
            self.items.push(ScatterItem {
                sprite,
                position: Position::new(x, y),
            });
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn random_fraction(&mut self) -> f32 {
        (self.advance_rng() % 10_000) as f32 / 10_000.0
    }
}

/// Static content owned by the particle showcase session.
///
/// Per-frame motion of the effect itself belongs to the external engine; the
/// stage only records what was requested.
#[derive(Debug)]
struct ShowcaseSession {
    effect: EffectKind,
    backdrop: BackdropRect,
}

impl ShowcaseSession {
    fn start(viewport: Viewport) -> Self {
        let width = viewport.max_x() * BACKDROP_SCALE;
        let height = viewport.max_y() * BACKDROP_HEIGHT_RATIO * BACKDROP_SCALE;
        let origin = Position::new(
            (viewport.max_x() - width) * 0.5,
            viewport.max_y() * 0.5 - height * 0.5,
        );
        Self {
            effect: EffectKind::FireArc,
            backdrop: BackdropRect::new(origin, width, height),
        }
    }
}

/// Applies the provided command to the stage, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartTask { task } => start_task(world, task, out_events),
        Command::StopTask => stop_task(world, out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            advance_active_task(world, dt, out_events);
        }
        Command::RevealCard => reveal_card(world, out_events),
    }
}

fn start_task(world: &mut World, task: TaskKind, out_events: &mut Vec<Event>) {
    // Resources are validated before the current task is touched, so a
    // rejected start leaves the stage exactly as it was.
    let session = match task {
        TaskKind::CardReveal => match DealSession::deal(&world.catalog) {
            Ok(session) => TaskState::CardReveal(session),
            Err(reason) => {
                out_events.push(Event::TaskStartRejected { task, reason });
                return;
            }
        },
        TaskKind::RandomLayout => TaskState::RandomLayout(ScatterSession::start(
            world.scatter_seed,
            world.viewport,
            &world.catalog,
        )),
        TaskKind::ParticleShowcase => {
            TaskState::ParticleShowcase(ShowcaseSession::start(world.viewport))
        }
    };

    // Restarting the active task also lands here: fresh state, never a
    // silent no-op.
    stop_task(world, out_events);
    world.task = session;
    out_events.push(Event::TaskStarted { task });

    if task == TaskKind::ParticleShowcase {
        out_events.push(Event::EffectRequested {
            effect: EffectKind::FireArc,
        });
    }
}

fn stop_task(world: &mut World, out_events: &mut Vec<Event>) {
    // Each variant maps 1:1 to its teardown; the session data is dropped
    // wholesale when `previous` leaves scope.
    let previous = mem::replace(&mut world.task, TaskState::Idle);
    if let Some(task) = previous.kind() {
        out_events.push(Event::TaskStopped { task });
    }
}

fn advance_active_task(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    match &mut world.task {
        TaskState::Idle | TaskState::ParticleShowcase(_) => {}
        TaskState::CardReveal(session) => {
            let mut completed = Vec::new();
            session.advance_motions(dt, &mut completed);
            for card in completed {
                out_events.push(Event::MotionCompleted { card });
            }
        }
        TaskState::RandomLayout(session) => {
            session.advance(dt, world.viewport, &world.catalog, out_events);
        }
    }
}

fn reveal_card(world: &mut World, out_events: &mut Vec<Event>) {
    // Reveal requests that outlive their session are silent no-ops; only an
    // active card-reveal task with staged cards reacts.
    if let TaskState::CardReveal(session) = &mut world.task {
        if let Some(record) = session.reveal_next() {
            out_events.push(Event::CardRevealed {
                card: record.card,
                ordinal: record.ordinal,
                target: record.target,
            });
        }
    }
}

/// Query functions that provide read-only access to the stage state.
pub mod query {
    use demo_stage_core::{
        CardView, Position, ScatterView, ShowcaseSnapshot, TaskKind, Viewport,
    };

    use super::{TaskState, World};

    /// Retrieves the welcome banner that adapters may display on boot.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Fixed stage dimensions captured at construction time.
    #[must_use]
    pub fn viewport(world: &World) -> Viewport {
        world.viewport
    }

    /// Task currently active on the stage, if any.
    #[must_use]
    pub fn active_task(world: &World) -> Option<TaskKind> {
        world.task.kind()
    }

    /// Captures a read-only view of the active deal session's cards.
    ///
    /// Empty whenever the card-reveal task is not active.
    #[must_use]
    pub fn card_view(world: &World) -> CardView {
        match &world.task {
            TaskState::CardReveal(session) => CardView::from_snapshots(session.snapshots()),
            _ => CardView::default(),
        }
    }

    /// Number of cards still waiting in the staged pool.
    #[must_use]
    pub fn staged_count(world: &World) -> usize {
        match &world.task {
            TaskState::CardReveal(session) => session.staged_len(),
            _ => 0,
        }
    }

    /// Number of cards moved into the revealed set so far.
    #[must_use]
    pub fn revealed_count(world: &World) -> usize {
        match &world.task {
            TaskState::CardReveal(session) => session.revealed_len(),
            _ => 0,
        }
    }

    /// Number of motions still updating card positions.
    #[must_use]
    pub fn motions_in_flight(world: &World) -> usize {
        match &world.task {
            TaskState::CardReveal(session) => session.motions_len(),
            _ => 0,
        }
    }

    /// Reversed initial-position sequence the deal session targets.
    #[must_use]
    pub fn target_positions(world: &World) -> &[Position] {
        match &world.task {
            TaskState::CardReveal(session) => session.targets(),
            _ => &[],
        }
    }

    /// Captures the random layout's current items and refresh generation.
    #[must_use]
    pub fn scatter_view(world: &World) -> Option<ScatterView> {
        match &world.task {
            TaskState::RandomLayout(session) => Some(ScatterView::new(
                session.items.clone(),
                session.generation,
            )),
            _ => None,
        }
    }

    /// Captures the particle showcase's static content, if active.
    #[must_use]
    pub fn showcase_view(world: &World) -> Option<ShowcaseSnapshot> {
        match &world.task {
            TaskState::ParticleShowcase(session) => Some(ShowcaseSnapshot {
                effect: session.effect,
                backdrop: session.backdrop,
            }),
            _ => None,
        }
    }
}
