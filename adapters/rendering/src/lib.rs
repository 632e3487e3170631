#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for demo stage adapters.

use anyhow::Result as AnyResult;
use demo_stage_core::{
    BackdropRect, CardView, Command, EffectKind, ScatterView, SpriteIndex, TaskKind, Viewport,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Immutable descriptor for one sprite placed in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneNode {
    /// Sheet sprite displayed by this node.
    pub sprite: SpriteIndex,
    /// Position of the node's anchor in stage coordinates.
    pub position: Vec2,
    /// Normalized anchor within the sprite, `(0.5, 0.5)` for centered.
    pub anchor: Vec2,
}

impl SceneNode {
    /// Creates a new scene node anchored at the sprite's center.
    #[must_use]
    pub const fn centered(sprite: SpriteIndex, position: Vec2) -> Self {
        Self {
            sprite,
            position,
            anchor: Vec2::new(0.5, 0.5),
        }
    }
}

/// Solid rectangle drawn behind the particle showcase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackdropPresentation {
    /// Top-left corner of the rectangle in stage coordinates.
    pub origin: Vec2,
    /// Rectangle width in stage units.
    pub width: f32,
    /// Rectangle height in stage units.
    pub height: f32,
    /// Fill color of the rectangle.
    pub color: Color,
}

impl BackdropPresentation {
    /// Fill used when the showcase does not override it.
    pub const DEFAULT_COLOR: Color = Color::from_rgb_u8(0x1c, 0x1c, 0x24);

    /// Creates a backdrop descriptor from the world's rectangle.
    #[must_use]
    pub fn from_rect(rect: BackdropRect) -> Self {
        Self {
            origin: Vec2::new(rect.origin().x(), rect.origin().y()),
            width: rect.width(),
            height: rect.height(),
            color: Self::DEFAULT_COLOR,
        }
    }
}

/// Mutable display-list owner into which adapters place scene nodes.
pub trait SceneContainer {
    /// Appends a node to the container's display list.
    fn add_child(&mut self, node: SceneNode);

    /// Removes every node from the container's display list.
    fn remove_children(&mut self);
}

/// Resolves sheet sprite indices to backend texture handles.
pub trait TextureRegistry {
    /// Handle type understood by the backend.
    type Texture;

    /// Looks up the texture backing the provided sprite.
    ///
    /// Fails when the sprite was never loaded into the registry.
    fn lookup(&self, sprite: SpriteIndex) -> Result<&Self::Texture, RenderingError>;
}

/// External particle engine driven once per frame by the adapter.
pub trait ParticleEngine {
    /// Emitter type produced for a requested effect.
    type Emitter: Emitter;

    /// Creates an emitter for the named effect bundle.
    ///
    /// Fails when the effect is not present in the engine's bundle.
    fn emitter(&mut self, effect: EffectKind) -> Result<Self::Emitter, RenderingError>;

    /// Advances the engine's own simulation by the frame delta.
    fn update(&mut self, dt: Duration);
}

/// Handle to one running particle effect.
pub trait Emitter {
    /// Starts the effect anchored at the provided stage position.
    fn init(&mut self, anchor: Vec2) -> AnyResult<()>;
}

/// Named anchor points the HUD derives from the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HudAnchor {
    /// Back-to-menu button position.
    RightTopCorner,
    /// Status text position.
    RightBottomCorner,
    /// Random layout container origin.
    Center,
    /// Title text position.
    CenterTop,
    /// First task button, 35% down the stage.
    TaskButtonFirst,
    /// Second task button, halfway down the stage.
    TaskButtonSecond,
    /// Third task button, 65% down the stage.
    TaskButtonThird,
    /// Frame counter position.
    LeftTopCorner,
    /// Version text position.
    LeftBottomCorner,
}

impl HudAnchor {
    /// Resolves the anchor to stage coordinates for the given viewport.
    #[must_use]
    pub fn position(self, viewport: Viewport) -> Vec2 {
        let max_x = viewport.max_x();
        let max_y = viewport.max_y();
        match self {
            Self::RightTopCorner => Vec2::new(max_x - 125.0, 12.0),
            Self::RightBottomCorner => Vec2::new(max_x - 10.0, max_y - 20.0),
            Self::Center => Vec2::new(max_x * 0.50, max_y * 0.50),
            Self::CenterTop => Vec2::new(max_x * 0.50 - 150.0, 30.0),
            Self::TaskButtonFirst => Vec2::new(max_x * 0.50 - 125.0, max_y * 0.35),
            Self::TaskButtonSecond => Vec2::new(max_x * 0.50 - 125.0, max_y * 0.50),
            Self::TaskButtonThird => Vec2::new(max_x * 0.50 - 125.0, max_y * 0.65),
            Self::LeftTopCorner => Vec2::new(max_x * 0.01, 30.0),
            Self::LeftBottomCorner => Vec2::new(10.0, max_y * 0.95),
        }
    }
}

/// Intent raised by a HUD button press.
///
/// Buttons never reach into the stage; they surface an intent that the
/// adapter converts into a command for the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonIntent {
    /// Requests that the named task becomes the active one.
    StartTask(TaskKind),
    /// Requests that the active task stops and the menu returns.
    ReturnToMenu,
}

impl ButtonIntent {
    /// Converts the intent into the command submitted to the world.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::StartTask(task) => Command::StartTask { task },
            Self::ReturnToMenu => Command::StopTask,
        }
    }
}

/// Static description of one HUD button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ButtonSpec {
    /// Text drawn on the button face.
    pub label: &'static str,
    /// Anchor the button is placed at.
    pub anchor: HudAnchor,
    /// Intent raised when the button is pressed.
    pub intent: ButtonIntent,
}

impl ButtonSpec {
    /// Creates a new button descriptor.
    #[must_use]
    pub const fn new(label: &'static str, anchor: HudAnchor, intent: ButtonIntent) -> Self {
        Self {
            label,
            anchor,
            intent,
        }
    }
}

/// The three task buttons shown on the menu.
#[must_use]
pub const fn task_buttons() -> [ButtonSpec; 3] {
    [
        ButtonSpec::new(
            "Task 1",
            HudAnchor::TaskButtonFirst,
            ButtonIntent::StartTask(TaskKind::CardReveal),
        ),
        ButtonSpec::new(
            "Task 2",
            HudAnchor::TaskButtonSecond,
            ButtonIntent::StartTask(TaskKind::RandomLayout),
        ),
        ButtonSpec::new(
            "Task 3",
            HudAnchor::TaskButtonThird,
            ButtonIntent::StartTask(TaskKind::ParticleShowcase),
        ),
    ]
}

/// The back-to-menu button shown while a task runs.
#[must_use]
pub const fn back_to_menu_button() -> ButtonSpec {
    ButtonSpec::new(
        "Back to Menu",
        HudAnchor::RightTopCorner,
        ButtonIntent::ReturnToMenu,
    )
}

/// Scene nodes for every card in the deal session, staged and revealed alike.
#[must_use]
pub fn card_nodes(cards: &CardView) -> Vec<SceneNode> {
    cards
        .iter()
        .map(|snapshot| {
            SceneNode::centered(
                snapshot.sprite,
                Vec2::new(snapshot.position.x(), snapshot.position.y()),
            )
        })
        .collect()
}

/// Scene nodes for the random layout's current items.
#[must_use]
pub fn scatter_nodes(view: &ScatterView) -> Vec<SceneNode> {
    view.items()
        .iter()
        .map(|item| {
            SceneNode::centered(
                item.sprite,
                Vec2::new(item.position.x(), item.position.y()),
            )
        })
        .collect()
}

/// Scene description assembled from world queries for backends to draw.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StageScene {
    /// Card sprites for the card-reveal task.
    pub cards: Vec<SceneNode>,
    /// Scattered sprites for the random layout task.
    pub scatter: Vec<SceneNode>,
    /// Backdrop rectangle for the particle showcase.
    pub backdrop: Option<BackdropPresentation>,
}

impl StageScene {
    /// Returns `true` when no task contributes any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.scatter.is_empty() && self.backdrop.is_none()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: StageScene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: StageScene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Errors that can occur when resolving presentation resources.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The sprite was never loaded into the texture registry.
    AssetNotFound {
        /// Sprite index that failed to resolve.
        sprite: SpriteIndex,
    },
    /// The particle bundle does not contain the requested effect.
    UnknownEffect {
        /// Name of the effect that failed to resolve.
        name: String,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetNotFound { sprite } => {
                write!(f, "no texture registered for sprite {}", sprite.get())
            }
            Self::UnknownEffect { name } => {
                write!(f, "particle bundle does not contain effect {name:?}")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use demo_stage_core::{CardId, CardSnapshot, Position, ScatterItem};

    const VIEWPORT: Viewport = Viewport::new(1000.0, 800.0);

    #[test]
    fn hud_anchors_follow_viewport_geometry() {
        assert_eq!(
            HudAnchor::RightTopCorner.position(VIEWPORT),
            Vec2::new(875.0, 12.0)
        );
        assert_eq!(
            HudAnchor::Center.position(VIEWPORT),
            Vec2::new(500.0, 400.0)
        );
        assert_eq!(
            HudAnchor::TaskButtonSecond.position(VIEWPORT),
            Vec2::new(375.0, 400.0)
        );
        assert_eq!(
            HudAnchor::LeftBottomCorner.position(VIEWPORT),
            Vec2::new(10.0, 760.0)
        );
    }

    #[test]
    fn task_buttons_map_to_distinct_start_commands() {
        let buttons = task_buttons();
        let tasks: Vec<TaskKind> = buttons
            .iter()
            .map(|button| match button.intent.command() {
                Command::StartTask { task } => task,
                other => panic!("unexpected command: {other:?}"),
            })
            .collect();

        assert_eq!(
            tasks,
            vec![
                TaskKind::CardReveal,
                TaskKind::RandomLayout,
                TaskKind::ParticleShowcase,
            ]
        );
    }

    #[test]
    fn back_to_menu_maps_to_stop() {
        assert_eq!(back_to_menu_button().intent.command(), Command::StopTask);
    }

    #[test]
    fn card_nodes_preserve_order_and_positions() {
        let view = CardView::from_snapshots(vec![
            CardSnapshot {
                id: CardId::new(1),
                sprite: SpriteIndex::new(1),
                position: Position::new(20.0, 30.0),
                revealed: true,
                in_flight: false,
            },
            CardSnapshot {
                id: CardId::new(0),
                sprite: SpriteIndex::new(0),
                position: Position::new(10.0, 15.0),
                revealed: false,
                in_flight: false,
            },
        ]);

        let nodes = card_nodes(&view);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].sprite, SpriteIndex::new(0));
        assert_eq!(nodes[0].position, Vec2::new(10.0, 15.0));
        assert_eq!(nodes[0].anchor, Vec2::new(0.5, 0.5));
        assert_eq!(nodes[1].position, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn scatter_nodes_mirror_view_items() {
        let view = ScatterView::new(
            vec![ScatterItem {
                sprite: SpriteIndex::new(7),
                position: Position::new(100.0, 200.0),
            }],
            3,
        );

        let nodes = scatter_nodes(&view);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].sprite, SpriteIndex::new(7));
        assert_eq!(nodes[0].position, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn backdrop_presentation_copies_world_geometry() {
        let rect = BackdropRect::new(Position::new(192.0, 82.8), 896.0, 554.4);
        let backdrop = BackdropPresentation::from_rect(rect);

        assert_eq!(backdrop.origin, Vec2::new(192.0, 82.8));
        assert_eq!(backdrop.width, 896.0);
        assert_eq!(backdrop.height, 554.4);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 128, 255).lighten(0.5);
        assert!(color.red > 0.49 && color.red < 0.51);
        assert!(color.blue > 0.99);
        assert_eq!(color.alpha, 1.0);
    }
}
