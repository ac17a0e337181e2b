//! Tint index overrides declared by a model.
//!
//! A model's `ctm_overrides` object maps tint indices to either a texture
//! name or an inline behavior object:
//!
//! ```json
//! "ctm_overrides": {
//!   "0": "mod:block/bricks_mossy",
//!   "2": { "type": "ctm_compact", "textures": ["mod:block/bricks-ctm"] }
//! }
//! ```
//!
//! Parsing happens once when the model is constructed and also discovers
//! the textures the model depends on.

use crate::error::Result;
use crate::resource_pack::{SpriteMetadataLookup, TextureMetadata};
use crate::types::{ResourceLocation, TintIndex};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// What a tint index is overridden with.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideEntry {
    /// Replace the sprite of every face with this tint index.
    Static(ResourceLocation),
    /// Apply a behavior to every face with this tint index, keeping each face's texture.
    Dynamic(Arc<TextureMetadata>),
}

/// Textures a model needs loaded. Model-local `#variable` references are never members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet(BTreeSet<ResourceLocation>);

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a texture. Returns false for local references and duplicates.
    pub fn insert(&mut self, texture: ResourceLocation) -> bool {
        if texture.is_local_reference() {
            return false;
        }
        self.0.insert(texture)
    }

    pub fn contains(&self, texture: &ResourceLocation) -> bool {
        self.0.contains(texture)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceLocation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a ResourceLocation;
    type IntoIter = std::collections::btree_set::Iter<'a, ResourceLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parsed overrides of one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOverrides {
    entries: BTreeMap<TintIndex, OverrideEntry>,
    /// Behavior metadata per tint index. Dynamic entries always have one;
    /// static entries have one when their texture carries metadata.
    metadata: BTreeMap<TintIndex, Arc<TextureMetadata>>,
    dependencies: DependencySet,
}

impl ModelOverrides {
    /// Parse a raw override object.
    ///
    /// Malformed entries are skipped with a warning. Failing to read the
    /// metadata of a static override's texture is fatal.
    pub fn parse(raw: &BTreeMap<String, Value>, lookup: &dyn SpriteMetadataLookup) -> Result<Self> {
        let mut overrides = Self::default();

        for (key, value) in raw {
            let Ok(tint) = key.trim().parse::<TintIndex>() else {
                log::warn!("Ignoring override with non-numeric tint index '{}'", key);
                continue;
            };

            match value {
                Value::String(texture) => {
                    let texture = ResourceLocation::parse(texture);
                    if !texture.is_local_reference() {
                        if let Some(metadata) = lookup.metadata(&texture)? {
                            overrides.add_auxiliaries(&metadata);
                            overrides.metadata.insert(tint, metadata);
                        }
                    }
                    overrides.dependencies.insert(texture.clone());
                    overrides.entries.insert(tint, OverrideEntry::Static(texture));
                }
                Value::Object(_) => match TextureMetadata::from_json(value) {
                    Ok(metadata) => {
                        let metadata = Arc::new(metadata);
                        overrides.add_auxiliaries(&metadata);
                        overrides.metadata.insert(tint, Arc::clone(&metadata));
                        overrides.entries.insert(tint, OverrideEntry::Dynamic(metadata));
                    }
                    Err(reason) => {
                        log::warn!("Ignoring malformed override for tint index {}: {}", tint, reason);
                    }
                },
                other => {
                    log::warn!(
                        "Ignoring override for tint index {}: expected a string or an object, got {}",
                        tint,
                        other
                    );
                }
            }
        }

        Ok(overrides)
    }

    fn add_auxiliaries(&mut self, metadata: &TextureMetadata) {
        for texture in &metadata.additional_textures {
            self.dependencies.insert(texture.clone());
        }
    }

    pub fn entry(&self, tint: TintIndex) -> Option<&OverrideEntry> {
        self.entries.get(&tint)
    }

    pub fn entries(&self) -> impl Iterator<Item = (TintIndex, &OverrideEntry)> {
        self.entries.iter().map(|(tint, entry)| (*tint, entry))
    }

    /// Tint indices with an override, ascending.
    pub fn tint_indices(&self) -> impl Iterator<Item = TintIndex> + '_ {
        self.entries.keys().copied()
    }

    /// Behavior metadata applied to faces with this tint index, if any.
    pub fn metadata(&self, tint: TintIndex) -> Option<&Arc<TextureMetadata>> {
        self.metadata.get(&tint)
    }

    pub fn all_metadata(&self) -> impl Iterator<Item = (TintIndex, &Arc<TextureMetadata>)> {
        self.metadata.iter().map(|(tint, metadata)| (*tint, metadata))
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
