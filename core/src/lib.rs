#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the demo stage.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative stage, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the stage executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Widgets never reach into the control
//! hierarchy; pressing a button produces a command, nothing more.

use std::{collections::BTreeSet, error::Error, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the demo stage.";

/// Identifies one of the three mutually exclusive demo tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Staggered card-reveal animation over a staged deck.
    CardReveal,
    /// Periodically refreshing random sprite layout.
    RandomLayout,
    /// One-shot particle-effect showcase driven by the external engine.
    ParticleShowcase,
}

/// Commands that express all permissible stage mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests activation of the provided task, stopping any active task first.
    StartTask {
        /// Task the stage should activate.
        task: TaskKind,
    },
    /// Returns the stage to the idle menu, releasing the active task's state.
    StopTask,
    /// Advances the simulation clock by the provided frame delta.
    Tick {
        /// Duration of real time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that the next staged card be revealed and set in motion.
    RevealCard,
}

/// Events broadcast by the stage after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a task became active with freshly allocated state.
    TaskStarted {
        /// Task that became active.
        task: TaskKind,
    },
    /// Confirms that a task released its state and the stage is idle.
    TaskStopped {
        /// Task that was stopped.
        task: TaskKind,
    },
    /// Reports that a task start request was rejected before any allocation.
    TaskStartRejected {
        /// Task that failed to start.
        task: TaskKind,
        /// Specific reason the start failed.
        reason: StartError,
    },
    /// Confirms that a staged card moved into the revealed set.
    CardRevealed {
        /// Identifier of the revealed card.
        card: CardId,
        /// Zero-based reveal order within the session.
        ordinal: u32,
        /// Position the card's motion will carry it to.
        target: Position,
    },
    /// Reports that a card's motion reached its target and left the in-flight set.
    MotionCompleted {
        /// Identifier of the card whose motion finished.
        card: CardId,
    },
    /// Announces that the random layout discarded and reinstantiated its content.
    LayoutRefreshed {
        /// Number of refreshes performed during the session so far.
        generation: u64,
    },
    /// Requests that the external particle engine anchor the named effect.
    EffectRequested {
        /// Effect the showcase task delegates to the engine.
        effect: EffectKind,
    },
}

/// Unique identifier assigned to a card within a deal session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    /// Creates a new card identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a sprite within the shared spritesheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteIndex(u32);

impl SpriteIndex {
    /// Highest sprite index available on the sheet.
    ///
    /// The sheet holds fewer sprites than a full deck holds cards, so deck
    /// slots past this index wrap back toward the start of the sheet.
    pub const DISTINCT_PER_SHEET: u32 = 52;

    /// Creates a new sprite index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Resolves the sprite assigned to the provided deck slot.
    ///
    /// The wrap is applied twice because a 144-card deck overruns the sheet
    /// twice; the resulting index always lands within the sheet.
    #[must_use]
    pub const fn for_deck_slot(slot: u32) -> Self {
        let first = if slot > Self::DISTINCT_PER_SHEET {
            slot - Self::DISTINCT_PER_SHEET + 1
        } else {
            slot
        };
        let second = if first > Self::DISTINCT_PER_SHEET {
            first - Self::DISTINCT_PER_SHEET + 1
        } else {
            first
        };
        Self(second)
    }
}

/// Two-dimensional stage position expressed in screen units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the position.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the position.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Linearly interpolates from this position toward `target`.
    ///
    /// A progress of `0.0` yields `self` and `1.0` yields `target`; callers
    /// clamp progress before interpolating.
    #[must_use]
    pub fn lerp(self, target: Self, progress: f32) -> Self {
        Self {
            x: self.x + (target.x - self.x) * progress,
            y: self.y + (target.y - self.y) * progress,
        }
    }
}

/// Fixed stage dimensions captured once at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    max_x: f32,
    max_y: f32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(max_x: f32, max_y: f32) -> Self {
        Self { max_x, max_y }
    }

    /// Width of the stage in screen units.
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Height of the stage in screen units.
    #[must_use]
    pub const fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Center point of the stage.
    #[must_use]
    pub const fn center(&self) -> Position {
        Position::new(self.max_x * 0.5, self.max_y * 0.5)
    }
}

/// Named particle effects the showcase task can request from the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Arcing fire effect from the stock effect bundle.
    FireArc,
}

impl EffectKind {
    /// Name under which the effect is registered with the particle engine.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FireArc => "fire-arc",
        }
    }
}

/// Set of sprite indices with registered textures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureCatalog {
    sprites: BTreeSet<SpriteIndex>,
}

impl TextureCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog covering the contiguous range `0..count`.
    #[must_use]
    pub fn with_contiguous(count: u32) -> Self {
        let mut catalog = Self::new();
        for index in 0..count {
            catalog.register(SpriteIndex::new(index));
        }
        catalog
    }

    /// Registers a texture for the provided sprite index.
    pub fn register(&mut self, sprite: SpriteIndex) {
        let _ = self.sprites.insert(sprite);
    }

    /// Reports whether a texture is registered for the sprite index.
    #[must_use]
    pub fn contains(&self, sprite: SpriteIndex) -> bool {
        self.sprites.contains(&sprite)
    }

    /// Number of registered textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Reports whether the catalog holds no textures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Iterator over the registered sprite indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = SpriteIndex> + '_ {
        self.sprites.iter().copied()
    }
}

/// Reasons a task start request may be rejected by the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartError {
    /// A sprite required by the task has no registered texture.
    AssetNotFound {
        /// Sprite index that failed catalog lookup.
        sprite: SpriteIndex,
    },
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetNotFound { sprite } => {
                write!(f, "no texture registered for sprite {}", sprite.get())
            }
        }
    }
}

impl Error for StartError {}

/// Reasons the stage rejects its construction-time configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// Viewport dimensions must both be positive.
    InvalidViewport {
        /// Provided stage width that failed validation.
        max_x: f32,
        /// Provided stage height that failed validation.
        max_y: f32,
    },
    /// The texture catalog holds no registered sprites.
    EmptyCatalog,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { max_x, max_y } => {
                write!(
                    f,
                    "viewport dimensions must be positive, got {max_x}x{max_y}"
                )
            }
            Self::EmptyCatalog => write!(f, "texture catalog holds no registered sprites"),
        }
    }
}

impl Error for ConfigError {}

/// Immutable representation of a single card's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardSnapshot {
    /// Unique identifier assigned to the card.
    pub id: CardId,
    /// Sprite the card displays.
    pub sprite: SpriteIndex,
    /// Current stage position of the card.
    pub position: Position,
    /// Indicates whether the card left the staged pool.
    pub revealed: bool,
    /// Indicates whether a motion is still updating the card.
    pub in_flight: bool,
}

/// Read-only snapshot describing all cards within a deal session.
#[derive(Clone, Debug, Default)]
pub struct CardView {
    snapshots: Vec<CardSnapshot>,
}

impl CardView {
    /// Creates a new card view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CardSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured card snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CardSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CardSnapshot> {
        self.snapshots
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Single sprite placed by the random layout task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterItem {
    /// Sprite the item displays.
    pub sprite: SpriteIndex,
    /// Stage position assigned to the item.
    pub position: Position,
}

/// Read-only snapshot describing the random layout's current content.
#[derive(Clone, Debug, Default)]
pub struct ScatterView {
    items: Vec<ScatterItem>,
    generation: u64,
}

impl ScatterView {
    /// Creates a new scatter view from the provided items.
    #[must_use]
    pub fn new(items: Vec<ScatterItem>, generation: u64) -> Self {
        Self { items, generation }
    }

    /// Items currently placed by the layout.
    #[must_use]
    pub fn items(&self) -> &[ScatterItem] {
        &self.items
    }

    /// Number of refreshes performed during the session so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Axis-aligned rectangle backing the particle showcase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackdropRect {
    origin: Position,
    width: f32,
    height: f32,
}

impl BackdropRect {
    /// Creates a new backdrop rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Position, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Width of the rectangle in screen units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle in screen units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Immutable description of the particle showcase's static content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShowcaseSnapshot {
    /// Effect the session requested from the particle engine.
    pub effect: EffectKind,
    /// Static backdrop constructed when the task started.
    pub backdrop: BackdropRect,
}
