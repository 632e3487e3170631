//! In-memory collaborators standing in for a rendering backend.

use std::{collections::BTreeMap, time::Duration};

use anyhow::Result as AnyResult;
use demo_stage_core::{EffectKind, SpriteIndex, TextureCatalog};
use demo_stage_rendering::{
    Emitter, ParticleEngine, RenderingError, SceneContainer, SceneNode, TextureRegistry,
};
use glam::Vec2;

/// Display-list stub that records the nodes added each frame.
#[derive(Debug, Default)]
pub(crate) struct CollectingContainer {
    children: Vec<SceneNode>,
}

impl CollectingContainer {
    pub(crate) fn children(&self) -> &[SceneNode] {
        &self.children
    }
}

impl SceneContainer for CollectingContainer {
    fn add_child(&mut self, node: SceneNode) {
        self.children.push(node);
    }

    fn remove_children(&mut self) {
        self.children.clear();
    }
}

/// Texture registry backed by generated spritesheet frame names.
#[derive(Debug)]
pub(crate) struct InMemoryTextures {
    names: BTreeMap<SpriteIndex, String>,
}

impl InMemoryTextures {
    /// Registers one frame name per sprite in the catalog.
    pub(crate) fn with_catalog(catalog: &TextureCatalog) -> Self {
        let names = catalog
            .iter()
            .map(|sprite| (sprite, format!("card{}.png", sprite.get())))
            .collect();
        Self { names }
    }
}

impl TextureRegistry for InMemoryTextures {
    type Texture = String;

    fn lookup(&self, sprite: SpriteIndex) -> Result<&String, RenderingError> {
        self.names
            .get(&sprite)
            .ok_or(RenderingError::AssetNotFound { sprite })
    }
}

/// Particle engine stub that only tracks what it was asked to do.
#[derive(Debug)]
pub(crate) struct StubParticleEngine {
    bundle: Vec<EffectKind>,
    elapsed: Duration,
    emitters_started: u32,
}

impl Default for StubParticleEngine {
    fn default() -> Self {
        Self {
            bundle: vec![EffectKind::FireArc],
            elapsed: Duration::ZERO,
            emitters_started: 0,
        }
    }
}

impl StubParticleEngine {
    pub(crate) fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn emitters_started(&self) -> u32 {
        self.emitters_started
    }
}

impl ParticleEngine for StubParticleEngine {
    type Emitter = StubEmitter;

    fn emitter(&mut self, effect: EffectKind) -> Result<StubEmitter, RenderingError> {
        if !self.bundle.contains(&effect) {
            return Err(RenderingError::UnknownEffect {
                name: effect.name().to_owned(),
            });
        }
        self.emitters_started += 1;
        Ok(StubEmitter { effect })
    }

    fn update(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

/// Emitter stub that reports its activation on stdout.
#[derive(Debug)]
pub(crate) struct StubEmitter {
    effect: EffectKind,
}

impl Emitter for StubEmitter {
    fn init(&mut self, anchor: Vec2) -> AnyResult<()> {
        println!(
            "effect {} anchored at ({:.1}, {:.1})",
            self.effect.name(),
            anchor.x,
            anchor.y
        );
        Ok(())
    }
}
