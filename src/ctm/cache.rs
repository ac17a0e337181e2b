//! Memoized behavior resolution for one bake of one model.

use super::factory::TextureBehaviorFactory;
use super::overrides::{ModelOverrides, OverrideEntry};
use super::texture::{RenderLayer, TextureBehavior};
use crate::atlas::Sprite;
use crate::error::{CtmError, Result};
use crate::resource_pack::{BlockModel, SpriteMetadataLookup, TextureMetadata};
use crate::types::{ResourceLocation, TintIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Host callback mapping a texture location to its atlas sprite.
pub type SpriteGetter<'g> = dyn Fn(&ResourceLocation) -> Sprite + 'g;

/// Render layers declared by the behaviors of a model.
///
/// Bit `n` is set when some behavior declared the layer with ordinal `n`;
/// bit 7 is set when some behavior declared no layer at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderLayerMask(u8);

impl RenderLayerMask {
    pub const NO_LAYER_BIT: u8 = 7;

    pub const EMPTY: RenderLayerMask = RenderLayerMask(0);

    pub fn record(&mut self, layer: Option<RenderLayer>) {
        let bit = layer.map_or(Self::NO_LAYER_BIT, RenderLayer::ordinal);
        self.0 |= 1 << bit;
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, layer: RenderLayer) -> bool {
        self.0 & (1 << layer.ordinal()) != 0
    }

    /// Whether some behavior left its layer to the block default.
    pub fn has_layerless(self) -> bool {
        self.0 & (1 << Self::NO_LAYER_BIT) != 0
    }

    /// Whether anything renders in `layer`, with layerless behaviors using `default`.
    pub fn can_render_in(self, layer: RenderLayer, default: RenderLayer) -> bool {
        self.contains(layer) || (self.has_layerless() && layer == default)
    }

    /// Explicitly declared layers, in ordinal order.
    pub fn layers(self) -> impl Iterator<Item = RenderLayer> {
        RenderLayer::ALL.into_iter().filter(move |layer| self.contains(*layer))
    }
}

/// Behaviors resolved during a bake, frozen for rendering.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTextures {
    textures: HashMap<ResourceLocation, Arc<TextureBehavior>>,
    sprite_overrides: BTreeMap<TintIndex, Sprite>,
    texture_overrides: HashMap<(TintIndex, ResourceLocation), Arc<TextureBehavior>>,
    layers: RenderLayerMask,
}

impl ResolvedTextures {
    pub fn get_texture(&self, sprite: &ResourceLocation) -> Option<&Arc<TextureBehavior>> {
        self.textures.get(sprite)
    }

    pub fn get_override_sprite(&self, tint: TintIndex) -> Option<&Sprite> {
        self.sprite_overrides.get(&tint)
    }

    pub fn get_override_texture(&self, tint: TintIndex, texture: &ResourceLocation) -> Option<&Arc<TextureBehavior>> {
        self.texture_overrides.get(&(tint, texture.clone()))
    }

    /// Every resolved behavior: per-sprite ones first, then per-override ones.
    pub fn behaviors(&self) -> impl Iterator<Item = &Arc<TextureBehavior>> {
        self.textures.values().chain(self.texture_overrides.values())
    }

    pub fn sprite_overrides(&self) -> impl Iterator<Item = (TintIndex, &Sprite)> {
        self.sprite_overrides.iter().map(|(tint, sprite)| (*tint, sprite))
    }

    pub fn texture_overrides(&self) -> impl Iterator<Item = (TintIndex, &ResourceLocation, &Arc<TextureBehavior>)> {
        self.texture_overrides
            .iter()
            .map(|((tint, texture), behavior)| (*tint, texture, behavior))
    }

    pub fn layers(&self) -> RenderLayerMask {
        self.layers
    }
}

/// Resolves sprites and tint overrides to behaviors, constructing each at most once.
///
/// One cache serves one bake; it takes `&mut self` throughout, so a single
/// instance can never be resolved from two places at once.
pub struct OverrideResolutionCache<'m> {
    lookup: &'m dyn SpriteMetadataLookup,
    factory: TextureBehaviorFactory,
    resolved: ResolvedTextures,
    /// Sprites whose behavior is currently being constructed.
    in_progress: HashSet<ResourceLocation>,
}

impl<'m> OverrideResolutionCache<'m> {
    pub fn new(lookup: &'m dyn SpriteMetadataLookup) -> Self {
        Self {
            lookup,
            factory: TextureBehaviorFactory,
            resolved: ResolvedTextures::default(),
            in_progress: HashSet::new(),
        }
    }

    /// The behavior of a sprite, constructing it on first use.
    pub fn resolve_sprite(&mut self, sprite: &Sprite, getter: &SpriteGetter<'_>) -> Result<Arc<TextureBehavior>> {
        if let Some(behavior) = self.resolved.textures.get(&sprite.name) {
            return Ok(Arc::clone(behavior));
        }
        let metadata = self.lookup.metadata(&sprite.name)?;
        self.construct(sprite, metadata.as_deref(), getter)
    }

    /// Resolve an auxiliary texture to its sprite. Auxiliaries with their
    /// own metadata also get a behavior, which is where cycles surface.
    fn resolve_auxiliary(&mut self, texture: &ResourceLocation, getter: &SpriteGetter<'_>) -> Result<Sprite> {
        let sprite = getter(texture);
        if !self.resolved.textures.contains_key(&sprite.name) {
            if let Some(metadata) = self.lookup.metadata(&sprite.name)? {
                self.construct(&sprite, Some(metadata.as_ref()), getter)?;
            }
        }
        Ok(sprite)
    }

    fn construct(
        &mut self,
        sprite: &Sprite,
        metadata: Option<&TextureMetadata>,
        getter: &SpriteGetter<'_>,
    ) -> Result<Arc<TextureBehavior>> {
        if !self.in_progress.insert(sprite.name.clone()) {
            return Err(CtmError::RecursiveTexture(sprite.name.to_string()));
        }

        let factory = self.factory;
        let built = match metadata {
            Some(metadata) => factory.create(metadata, sprite.clone(), &mut |texture: &ResourceLocation| {
                self.resolve_auxiliary(texture, getter)
            }),
            None => Ok(factory.normal(sprite.clone())),
        };
        self.in_progress.remove(&sprite.name);

        let behavior = Arc::new(built?);
        log::trace!("Resolved {} as {}", sprite.name, behavior.texture_type());
        self.resolved.layers.record(behavior.render_layer());
        self.resolved
            .textures
            .insert(sprite.name.clone(), Arc::clone(&behavior));
        Ok(behavior)
    }

    /// Resolve the override of one tint index.
    ///
    /// A static override stores its sprite. When the tint index carries
    /// behavior metadata, every distinct texture used by faces with that
    /// tint index gets one behavior, keyed by `(tint, texture)`.
    pub fn resolve_override(
        &mut self,
        tint: TintIndex,
        model: &BlockModel,
        overrides: &ModelOverrides,
        getter: &SpriteGetter<'_>,
    ) -> Result<()> {
        let static_sprite = match overrides.entry(tint) {
            Some(OverrideEntry::Static(texture)) => {
                let sprite = getter(texture);
                self.resolved.sprite_overrides.insert(tint, sprite.clone());
                Some(sprite)
            }
            Some(OverrideEntry::Dynamic(_)) => None,
            None => return Ok(()),
        };

        let Some(metadata) = overrides.metadata(tint) else {
            return Ok(());
        };

        let textures: BTreeSet<ResourceLocation> = model
            .faces()
            .filter(|(_, face)| face.tint_index() == Some(tint))
            .filter_map(|(_, face)| model.resolve_texture_location(&face.texture))
            .collect();

        for texture in textures {
            let key = (tint, texture);
            if self.resolved.texture_overrides.contains_key(&key) {
                continue;
            }

            let primary = match &static_sprite {
                Some(sprite) => sprite.clone(),
                None => getter(&key.1),
            };
            let factory = self.factory;
            let behavior = factory.create(metadata, primary, &mut |texture: &ResourceLocation| {
                self.resolve_auxiliary(texture, getter)
            })?;

            let behavior = Arc::new(behavior);
            log::trace!("Resolved override {} for {} as {}", tint, key.1, behavior.texture_type());
            self.resolved.layers.record(behavior.render_layer());
            self.resolved.texture_overrides.insert(key, behavior);
        }
        Ok(())
    }

    /// Resolve every override of a model.
    pub fn resolve_overrides(
        &mut self,
        model: &BlockModel,
        overrides: &ModelOverrides,
        getter: &SpriteGetter<'_>,
    ) -> Result<()> {
        for tint in overrides.tint_indices() {
            self.resolve_override(tint, model, overrides, getter)?;
        }
        Ok(())
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

    pub fn layers(&self) -> RenderLayerMask {
        self.resolved.layers
    }

    pub fn into_resolved(self) -> ResolvedTextures {
        self.resolved
    }
}

/// Check the texture count of every behavior a model can use.
///
/// Covers the metadata of `textures` and of every override. Returns the
/// textures that carry metadata.
pub fn validate_textures<'t, I>(
    lookup: &dyn SpriteMetadataLookup,
    textures: I,
    overrides: &ModelOverrides,
) -> Result<Vec<ResourceLocation>>
where
    I: IntoIterator<Item = &'t ResourceLocation>,
{
    let mut with_metadata = Vec::new();
    for texture in textures {
        if texture.is_local_reference() {
            continue;
        }
        if let Some(metadata) = lookup.metadata(texture)? {
            metadata.validate()?;
            with_metadata.push(texture.clone());
        }
    }

    for (tint, metadata) in overrides.all_metadata() {
        log::trace!("Validating override {} ({})", tint, metadata.texture_type);
        metadata.validate()?;
    }
    Ok(with_metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasRegion;
    use crate::ctm::TextureType;
    use serde_json::json;

    type Lookup = HashMap<ResourceLocation, Arc<TextureMetadata>>;

    fn sprite(name: &str) -> Sprite {
        Sprite::new(ResourceLocation::parse(name), AtlasRegion::FULL)
    }

    fn getter(location: &ResourceLocation) -> Sprite {
        Sprite::new(location.clone(), AtlasRegion::new(0.0, 0.0, 0.5, 0.5))
    }

    fn with_metadata(entries: &[(&str, TextureMetadata)]) -> Lookup {
        entries
            .iter()
            .map(|(name, meta)| (ResourceLocation::parse(name), Arc::new(meta.clone())))
            .collect()
    }

    fn model(json: serde_json::Value) -> BlockModel {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_mask_bits() {
        let mut mask = RenderLayerMask::EMPTY;
        mask.record(Some(RenderLayer::CutoutMipped));
        mask.record(Some(RenderLayer::Translucent));
        mask.record(None);

        assert_eq!(mask.bits(), (1 << 1) | (1 << 3) | (1 << 7));
        assert!(mask.contains(RenderLayer::Translucent));
        assert!(!mask.contains(RenderLayer::Solid));
        assert!(mask.can_render_in(RenderLayer::Solid, RenderLayer::Solid));
        assert!(!mask.can_render_in(RenderLayer::Cutout, RenderLayer::Solid));
        assert_eq!(
            mask.layers().collect::<Vec<_>>(),
            vec![RenderLayer::CutoutMipped, RenderLayer::Translucent]
        );
    }

    #[test]
    fn test_resolve_sprite_is_memoized() {
        let lookup = with_metadata(&[(
            "mod:glass",
            TextureMetadata::new(TextureType::CtmCompact).with_textures(["mod:glass-ctm"]),
        )]);
        let mut cache = OverrideResolutionCache::new(&lookup);

        let first = cache.resolve_sprite(&sprite("mod:glass"), &getter).unwrap();
        let second = cache.resolve_sprite(&sprite("mod:glass"), &getter).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.texture_type(), TextureType::CtmCompact);

        let plain = cache.resolve_sprite(&sprite("mod:stone"), &getter).unwrap();
        assert_eq!(plain.texture_type(), TextureType::Normal);
        assert!(Arc::ptr_eq(
            &plain,
            cache.get_texture(&ResourceLocation::parse("mod:stone")).unwrap()
        ));
    }

    #[test]
    fn test_layers_accumulate_across_resolutions() {
        let lookup = with_metadata(&[
            ("mod:a", TextureMetadata::new(TextureType::CtmHorizontal).with_layer(RenderLayer::CutoutMipped)),
            ("mod:b", TextureMetadata::new(TextureType::CtmVertical).with_layer(RenderLayer::Translucent)),
            ("mod:c", TextureMetadata::new(TextureType::CtmVertical)),
        ]);
        let mut cache = OverrideResolutionCache::new(&lookup);
        for name in ["mod:a", "mod:b", "mod:c", "mod:a"] {
            cache.resolve_sprite(&sprite(name), &getter).unwrap();
        }
        assert_eq!(cache.layers().bits(), (1 << 1) | (1 << 3) | (1 << 7));
    }

    #[test]
    fn test_auxiliary_with_metadata_is_resolved() {
        let lookup = with_metadata(&[
            (
                "mod:glass",
                TextureMetadata::new(TextureType::CtmCompact).with_textures(["mod:glass-ctm"]),
            ),
            (
                "mod:glass-ctm",
                TextureMetadata::new(TextureType::CtmHorizontal).with_layer(RenderLayer::Cutout),
            ),
        ]);
        let mut cache = OverrideResolutionCache::new(&lookup);
        cache.resolve_sprite(&sprite("mod:glass"), &getter).unwrap();

        let auxiliary = cache.get_texture(&ResourceLocation::parse("mod:glass-ctm")).unwrap();
        assert_eq!(auxiliary.texture_type(), TextureType::CtmHorizontal);
        assert!(cache.layers().contains(RenderLayer::Cutout));
    }

    #[test]
    fn test_cycle_is_reported() {
        let lookup = with_metadata(&[
            ("mod:a", TextureMetadata::new(TextureType::CtmCompact).with_textures(["mod:b"])),
            ("mod:b", TextureMetadata::new(TextureType::CtmCompact).with_textures(["mod:a"])),
        ]);
        let mut cache = OverrideResolutionCache::new(&lookup);

        let err = cache.resolve_sprite(&sprite("mod:a"), &getter).unwrap_err();
        assert!(matches!(err, CtmError::RecursiveTexture(ref t) if t == "mod:a"));
        assert!(cache.get_texture(&ResourceLocation::parse("mod:a")).is_none());
    }

    #[test]
    fn test_static_override() {
        let model = model(json!({
            "textures": { "all": "mod:bricks" },
            "elements": [{
                "from": [0, 0, 0], "to": [16, 16, 16],
                "faces": { "up": { "texture": "#all", "tintindex": 0 } }
            }],
            "ctm_overrides": { "0": "mod:bricks_mossy" }
        }));
        let lookup = Lookup::new();
        let overrides = ModelOverrides::parse(&model.ctm_overrides, &lookup).unwrap();

        let mut cache = OverrideResolutionCache::new(&lookup);
        cache.resolve_overrides(&model, &overrides, &getter).unwrap();

        let sprite = cache.get_override_sprite(0).unwrap();
        assert_eq!(sprite.name, ResourceLocation::parse("mod:bricks_mossy"));
        assert_eq!(sprite.region, AtlasRegion::new(0.0, 0.0, 0.5, 0.5));
        assert!(cache
            .get_override_texture(0, &ResourceLocation::parse("mod:bricks"))
            .is_none());
        assert_eq!(cache.layers(), RenderLayerMask::EMPTY);
    }

    #[test]
    fn test_dynamic_override_groups_faces_by_texture() {
        let model = model(json!({
            "textures": { "side": "mod:log_side", "end": "mod:log_top" },
            "elements": [{
                "from": [0, 0, 0], "to": [16, 16, 16],
                "faces": {
                    "north": { "texture": "#side", "tintindex": 2 },
                    "south": { "texture": "#side", "tintindex": 2 },
                    "east": { "texture": "mod:log_side", "tintindex": 2 },
                    "up": { "texture": "#end", "tintindex": 2 },
                    "down": { "texture": "#end" }
                }
            }],
            "ctm_overrides": {
                "2": { "type": "ctm_compact", "layer": "CUTOUT", "textures": ["mod:log-ctm"] }
            }
        }));
        let lookup = Lookup::new();
        let overrides = ModelOverrides::parse(&model.ctm_overrides, &lookup).unwrap();

        let mut cache = OverrideResolutionCache::new(&lookup);
        cache.resolve_override(2, &model, &overrides, &getter).unwrap();

        let side = cache
            .get_override_texture(2, &ResourceLocation::parse("mod:log_side"))
            .unwrap();
        let top = cache
            .get_override_texture(2, &ResourceLocation::parse("mod:log_top"))
            .unwrap();
        assert_eq!(side.primary().name, ResourceLocation::parse("mod:log_side"));
        assert_eq!(top.primary().name, ResourceLocation::parse("mod:log_top"));
        assert_eq!(side.sprites()[1].name, ResourceLocation::parse("mod:log-ctm"));
        assert!(!Arc::ptr_eq(side, top));
        assert!(cache.get_override_sprite(2).is_none());
        assert_eq!(cache.into_resolved().texture_overrides().count(), 2);
    }

    #[test]
    fn test_static_override_with_metadata_uses_override_sprite() {
        let model = model(json!({
            "textures": { "all": "mod:bricks" },
            "elements": [{
                "from": [0, 0, 0], "to": [16, 16, 16],
                "faces": { "west": { "texture": "#all", "tintindex": 1 } }
            }],
            "ctm_overrides": { "1": "mod:glass" }
        }));
        let lookup = with_metadata(&[(
            "mod:glass",
            TextureMetadata::new(TextureType::CtmVertical).with_layer(RenderLayer::Translucent),
        )]);
        let overrides = ModelOverrides::parse(&model.ctm_overrides, &lookup).unwrap();

        let mut cache = OverrideResolutionCache::new(&lookup);
        cache.resolve_overrides(&model, &overrides, &getter).unwrap();

        let behavior = cache
            .get_override_texture(1, &ResourceLocation::parse("mod:bricks"))
            .unwrap();
        assert_eq!(behavior.primary().name, ResourceLocation::parse("mod:glass"));
        assert_eq!(cache.layers().bits(), 1 << 3);
    }

    #[test]
    fn test_validate_textures() {
        let lookup = with_metadata(&[
            ("mod:ok", TextureMetadata::new(TextureType::CtmCompact).with_textures(["mod:ok-ctm"])),
            ("mod:bad", TextureMetadata::new(TextureType::CtmCompact)),
        ]);
        let overrides = ModelOverrides::default();

        let ok = [ResourceLocation::parse("mod:ok"), ResourceLocation::parse("mod:plain")];
        assert_eq!(
            validate_textures(&lookup, &ok, &overrides).unwrap(),
            vec![ResourceLocation::parse("mod:ok")]
        );

        let bad = [ResourceLocation::parse("mod:bad")];
        let err = validate_textures(&lookup, &bad, &overrides).unwrap_err();
        assert!(matches!(err, CtmError::TextureCountMismatch { required: 2, provided: 1, .. }));
    }

    #[test]
    fn test_validate_checks_override_metadata() {
        let raw = serde_json::from_value(json!({
            "2": { "type": "ctm_compact", "textures": ["mod:a_side", "mod:b_side"] }
        }))
        .unwrap();
        let lookup = Lookup::new();
        let overrides = ModelOverrides::parse(&raw, &lookup).unwrap();

        let err = validate_textures(&lookup, std::iter::empty(), &overrides).unwrap_err();
        assert!(matches!(err, CtmError::TextureCountMismatch { required: 2, provided: 3, .. }));
    }
}
