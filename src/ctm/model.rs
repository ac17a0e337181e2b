//! Connected texture models: the unbaked form built from a block model and
//! the baked form queried by renderers.

use super::cache::{validate_textures, OverrideResolutionCache, RenderLayerMask, ResolvedTextures, SpriteGetter};
use super::connectivity::ConnectivityClassifier;
use super::context::{CompositeConnectivityKey, FaceConnectivityEncoder};
use super::overrides::{DependencySet, ModelOverrides};
use super::texture::{RenderLayer, SubtileSelection, TextureBehavior};
use super::CtmConfig;
use crate::atlas::Sprite;
use crate::error::Result;
use crate::resolver::ModelResolver;
use crate::resource_pack::{BlockModel, ResourcePack, SpriteMetadataLookup};
use crate::types::{BlockPosition, BlockReader, BlockState, BlockTransform, Direction, ResourceLocation, TintIndex};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A block model with its parsed overrides, ready to validate and bake.
#[derive(Debug, Clone)]
pub struct CtmModel {
    model: BlockModel,
    overrides: ModelOverrides,
    config: CtmConfig,
}

impl CtmModel {
    /// Wrap a fully resolved block model, parsing its overrides.
    pub fn new(model: BlockModel, lookup: &dyn SpriteMetadataLookup, config: CtmConfig) -> Result<Self> {
        let overrides = ModelOverrides::parse(&model.ctm_overrides, lookup)?;
        Ok(Self {
            model,
            overrides,
            config,
        })
    }

    /// Resolve a model and its parents from a pack.
    pub fn load(pack: &ResourcePack, location: &str, config: CtmConfig) -> Result<Self> {
        let model = ModelResolver::new(pack).resolve(location)?;
        Self::new(model, pack, config)
    }

    pub fn model(&self) -> &BlockModel {
        &self.model
    }

    pub fn overrides(&self) -> &ModelOverrides {
        &self.overrides
    }

    pub fn config(&self) -> &CtmConfig {
        &self.config
    }

    /// Textures needed by the overrides.
    pub fn dependencies(&self) -> &DependencySet {
        self.overrides.dependencies()
    }

    /// Face textures plus override dependencies, sorted.
    pub fn textures(&self) -> Vec<ResourceLocation> {
        let textures: BTreeSet<_> = self
            .model
            .face_textures()
            .into_iter()
            .chain(self.dependencies().iter().cloned())
            .collect();
        textures.into_iter().collect()
    }

    /// Check the texture count of every behavior this model can use.
    /// Returns the textures that carry metadata.
    pub fn validate(&self, lookup: &dyn SpriteMetadataLookup) -> Result<Vec<ResourceLocation>> {
        if self.config.validate_model_textures {
            validate_textures(lookup, &self.textures(), &self.overrides)
        } else {
            validate_textures(lookup, self.dependencies(), &self.overrides)
        }
    }

    /// Validate, then resolve every behavior the model can render with.
    ///
    /// `sprites` maps texture locations to atlas sprites. Local `#variable`
    /// references are resolved through this model's textures first.
    pub fn bake(
        &self,
        lookup: &dyn SpriteMetadataLookup,
        sprites: &SpriteGetter<'_>,
        transform: BlockTransform,
        location: ResourceLocation,
    ) -> Result<BakedCtmModel> {
        self.validate(lookup)?;

        let getter = |texture: &ResourceLocation| -> Sprite {
            if !texture.is_local_reference() {
                return sprites(texture);
            }
            match self.model.resolve_texture_location(texture.path()) {
                Some(resolved) => sprites(&resolved),
                None => {
                    log::warn!("{}: unresolved texture variable {}", location, texture.path());
                    sprites(&self.config.missing_texture)
                }
            }
        };

        let mut cache = OverrideResolutionCache::new(lookup);
        cache.resolve_overrides(&self.model, &self.overrides, &getter)?;

        let mut faces = Vec::new();
        for element in &self.model.elements {
            for direction in Direction::ALL {
                let Some(face) = element.faces.get(&direction) else {
                    continue;
                };

                let texture = self
                    .model
                    .resolve_texture_location(&face.texture)
                    .unwrap_or_else(|| {
                        log::warn!("{}: unresolved face texture {}", location, face.texture);
                        self.config.missing_texture.clone()
                    });
                let tint_index = face.tint_index();
                let sprite = match tint_index.and_then(|tint| cache.get_override_sprite(tint)) {
                    Some(sprite) => sprite.clone(),
                    None => sprites(&texture),
                };
                cache.resolve_sprite(&sprite, &getter)?;

                faces.push(BakedFace {
                    direction: transform.apply(direction),
                    cullface: face.cullface.map(|cullface| transform.apply(cullface)),
                    tint_index,
                    texture,
                    sprite,
                });
            }
        }

        let resolved = cache.into_resolved();
        log::debug!(
            "Baked {}: {} faces, {} behaviors, layer mask {:#010b}",
            location,
            faces.len(),
            resolved.behaviors().count(),
            resolved.layers().bits()
        );

        Ok(BakedCtmModel {
            location,
            faces,
            resolved,
            default_layer: self.config.default_layer,
            ambient_occlusion: self.model.ambient_occlusion,
        })
    }
}

/// One face of a baked model.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedFace {
    /// World-space direction after the block transform.
    pub direction: Direction,
    pub cullface: Option<Direction>,
    pub tint_index: Option<TintIndex>,
    /// The face's resolved texture location, before any static override.
    pub texture: ResourceLocation,
    /// The sprite drawn on the face, after any static override.
    pub sprite: Sprite,
}

/// A baked model and the query surface renderers use.
///
/// Immutable once built, so it can be shared across render threads.
#[derive(Debug, Clone)]
pub struct BakedCtmModel {
    location: ResourceLocation,
    faces: Vec<BakedFace>,
    resolved: ResolvedTextures,
    default_layer: RenderLayer,
    ambient_occlusion: bool,
}

impl BakedCtmModel {
    pub fn location(&self) -> &ResourceLocation {
        &self.location
    }

    pub fn faces(&self) -> &[BakedFace] {
        &self.faces
    }

    pub fn ambient_occlusion(&self) -> bool {
        self.ambient_occlusion
    }

    pub fn get_texture(&self, sprite: &ResourceLocation) -> Option<&Arc<TextureBehavior>> {
        self.resolved.get_texture(sprite)
    }

    pub fn get_override_sprite(&self, tint: TintIndex) -> Option<&Sprite> {
        self.resolved.get_override_sprite(tint)
    }

    pub fn get_override_texture(&self, tint: TintIndex, texture: &ResourceLocation) -> Option<&Arc<TextureBehavior>> {
        self.resolved.get_override_texture(tint, texture)
    }

    /// Every behavior this model resolved.
    pub fn ctm_textures(&self) -> impl Iterator<Item = &Arc<TextureBehavior>> {
        self.resolved.behaviors()
    }

    pub fn resolved(&self) -> &ResolvedTextures {
        &self.resolved
    }

    pub fn layers(&self) -> RenderLayerMask {
        self.resolved.layers()
    }

    pub fn can_render_in_layer(&self, layer: RenderLayer) -> bool {
        self.resolved.layers().can_render_in(layer, self.default_layer)
    }

    /// The behavior that renders a face: a tint override for the face's
    /// texture if there is one, otherwise the behavior of its sprite.
    pub fn behavior_for(&self, face: &BakedFace) -> Option<&Arc<TextureBehavior>> {
        face.tint_index
            .and_then(|tint| self.get_override_texture(tint, &face.texture))
            .or_else(|| self.get_texture(&face.sprite.name))
    }

    /// Composite connectivity key of a block rendered with `behavior`.
    ///
    /// Unconnected behaviors never look at the world and get the empty key.
    pub fn compressed_data(
        &self,
        behavior: &TextureBehavior,
        state: &BlockState,
        world: &dyn BlockReader,
        pos: BlockPosition,
        classifier: &dyn ConnectivityClassifier,
    ) -> CompositeConnectivityKey {
        if !behavior.is_connected() {
            return CompositeConnectivityKey::EMPTY;
        }
        FaceConnectivityEncoder::encode(state, world, pos, &behavior.connection_rules(), classifier).compressed_data()
    }

    /// Pick the regions to draw for one face of a block at `pos`.
    pub fn render_face(
        &self,
        face: &BakedFace,
        state: &BlockState,
        world: &dyn BlockReader,
        pos: BlockPosition,
        classifier: &dyn ConnectivityClassifier,
    ) -> SubtileSelection {
        self.render_face_with_key(face, state, world, pos, classifier).0
    }

    /// Like [`render_face`](Self::render_face), also returning the key the
    /// selection was made from. The world is classified once.
    pub fn render_face_with_key(
        &self,
        face: &BakedFace,
        state: &BlockState,
        world: &dyn BlockReader,
        pos: BlockPosition,
        classifier: &dyn ConnectivityClassifier,
    ) -> (SubtileSelection, CompositeConnectivityKey) {
        match self.behavior_for(face) {
            Some(behavior) => {
                let key = self.compressed_data(behavior, state, world, pos, classifier);
                (behavior.select_subtile(face.direction, key), key)
            }
            None => (
                SubtileSelection::whole(&face.sprite.name, face.sprite.region),
                CompositeConnectivityKey::EMPTY,
            ),
        }
    }
}
