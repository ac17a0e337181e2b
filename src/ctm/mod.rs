//! Connected texture resolution.
//!
//! A [`CtmModel`] wraps a resolved block model and its tint overrides.
//! Baking it produces a [`BakedCtmModel`] holding one behavior per sprite
//! and per overridden `(tint, texture)` pair. At render time the baked
//! model classifies the neighbors of a block into a
//! [`CompositeConnectivityKey`] and each behavior picks its sub-tiles from it.

pub mod cache;
pub mod connectivity;
pub mod context;
pub mod factory;
pub mod model;
pub mod overrides;
pub mod texture;

pub use cache::{OverrideResolutionCache, RenderLayerMask, ResolvedTextures, SpriteGetter};
pub use connectivity::{
    ConnectionPredicate, ConnectionRules, ConnectivityClassifier, FaceConnectivity, Neighbor, NeighborClassifier,
};
pub use context::{CompositeConnectivityKey, FaceConnectivityEncoder};
pub use factory::{SpriteResolver, TextureBehaviorFactory};
pub use model::{BakedCtmModel, BakedFace, CtmModel};
pub use overrides::{DependencySet, ModelOverrides, OverrideEntry};
pub use texture::{RenderLayer, Subtile, SubtileSelection, TextureBehavior, TextureType};

use crate::types::ResourceLocation;

/// Configuration for validating and baking connected texture models.
#[derive(Debug, Clone, PartialEq)]
pub struct CtmConfig {
    /// Texture used for faces whose texture cannot be resolved.
    pub missing_texture: ResourceLocation,
    /// Layer that behaviors without an explicit layer render in.
    pub default_layer: RenderLayer,
    /// Also validate the metadata of the model's own face textures before baking.
    ///
    /// When false, only override metadata and dependencies are checked
    /// eagerly. A face texture with a bad texture count still fails the
    /// bake, but only once its behavior is built.
    pub validate_model_textures: bool,
}

impl Default for CtmConfig {
    fn default() -> Self {
        Self {
            missing_texture: ResourceLocation::new(ResourceLocation::DEFAULT_NAMESPACE, "missingno"),
            default_layer: RenderLayer::Solid,
            validate_model_textures: true,
        }
    }
}

impl CtmConfig {
    pub fn with_missing_texture(mut self, texture: impl Into<ResourceLocation>) -> Self {
        self.missing_texture = texture.into();
        self
    }

    pub fn with_default_layer(mut self, layer: RenderLayer) -> Self {
        self.default_layer = layer;
        self
    }

    pub fn with_validate_model_textures(mut self, validate: bool) -> Self {
        self.validate_model_textures = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_builders() {
        let config = CtmConfig::default();
        assert_eq!(config.missing_texture, ResourceLocation::parse("missingno"));
        assert_eq!(config.default_layer, RenderLayer::Solid);
        assert!(config.validate_model_textures);

        let config = config
            .with_missing_texture("mod:block/missing")
            .with_default_layer(RenderLayer::Translucent)
            .with_validate_model_textures(false);
        assert_eq!(config.missing_texture, ResourceLocation::parse("mod:block/missing"));
        assert_eq!(config.default_layer, RenderLayer::Translucent);
        assert!(!config.validate_model_textures);
    }
}
