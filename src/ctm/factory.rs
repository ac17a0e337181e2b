//! Construction of texture behaviors from metadata.

use super::texture::TextureBehavior;
use crate::atlas::Sprite;
use crate::error::Result;
use crate::resource_pack::TextureMetadata;
use crate::types::ResourceLocation;

/// Callback resolving an auxiliary texture to its sprite.
///
/// May re-enter behavior resolution for the auxiliary, so it is fallible.
pub type SpriteResolver<'r> = dyn FnMut(&ResourceLocation) -> Result<Sprite> + 'r;

/// Builds [`TextureBehavior`]s. The behavior type was already resolved from
/// its tag when the metadata was parsed; construction only gathers sprites.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureBehaviorFactory;

impl TextureBehaviorFactory {
    pub fn create(
        &self,
        metadata: &TextureMetadata,
        primary: Sprite,
        resolver: &mut SpriteResolver<'_>,
    ) -> Result<TextureBehavior> {
        metadata.validate()?;

        let mut sprites = Vec::with_capacity(metadata.provided_textures());
        sprites.push(primary);
        for texture in &metadata.additional_textures {
            sprites.push(resolver(texture)?);
        }

        Ok(TextureBehavior::new(
            metadata.texture_type,
            sprites,
            metadata.layer,
            metadata.extra.clone(),
        ))
    }

    /// Behavior for a texture without metadata.
    pub fn normal(&self, sprite: Sprite) -> TextureBehavior {
        TextureBehavior::normal(sprite)
    }
}
