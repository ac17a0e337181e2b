//! Resource pack loading and parsing.
//!
//! This module handles loading resource packs (ZIP files or directories)
//! and parsing the parts connected textures need: block models, the set of
//! known textures and their `.png.mcmeta` metadata.

pub mod loader;
pub mod metadata;
pub mod model;

pub use metadata::{DirectoryMetadataSource, SpriteMetadataLookup, TextureExtra, TextureMetadata};
pub use model::{BlockModel, ModelElement, ModelFace};

use crate::error::Result;
use crate::types::{split_location, ResourceLocation};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A loaded resource pack.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    /// Model definitions by namespace and model path.
    /// Key: namespace, Value: map of model_path to model.
    pub models: HashMap<String, HashMap<String, BlockModel>>,

    /// Texture paths present in the pack, by namespace.
    pub textures: HashMap<String, HashSet<String>>,

    /// Raw `.png.mcmeta` contents by namespace and texture path.
    /// Parsed on lookup so a broken file only fails the models that use it.
    pub texture_metadata: HashMap<String, HashMap<String, String>>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a model by full resource location (e.g., "minecraft:block/stone").
    pub fn get_model(&self, resource_location: &str) -> Option<&BlockModel> {
        let (namespace, path) = split_location(resource_location);
        self.models.get(namespace).and_then(|ns| ns.get(path))
    }

    /// Check whether a texture exists (e.g., "minecraft:block/stone").
    pub fn has_texture(&self, resource_location: &str) -> bool {
        let (namespace, path) = split_location(resource_location);
        self.textures
            .get(namespace)
            .map(|ns| ns.contains(path))
            .unwrap_or(false)
    }

    /// Get the raw metadata file contents for a texture.
    pub fn get_texture_metadata(&self, resource_location: &str) -> Option<&str> {
        let (namespace, path) = split_location(resource_location);
        self.texture_metadata
            .get(namespace)
            .and_then(|ns| ns.get(path))
            .map(|s| s.as_str())
    }

    /// Add a model.
    pub fn add_model(&mut self, namespace: &str, model_path: &str, model: BlockModel) {
        self.models
            .entry(namespace.to_string())
            .or_default()
            .insert(model_path.to_string(), model);
    }

    /// Register a texture.
    pub fn add_texture(&mut self, namespace: &str, texture_path: &str) {
        self.textures
            .entry(namespace.to_string())
            .or_default()
            .insert(texture_path.to_string());
    }

    /// Add the raw `.png.mcmeta` contents of a texture.
    pub fn add_texture_metadata(&mut self, namespace: &str, texture_path: &str, contents: impl Into<String>) {
        self.texture_metadata
            .entry(namespace.to_string())
            .or_default()
            .insert(texture_path.to_string(), contents.into());
    }

    /// Get the total number of models.
    pub fn model_count(&self) -> usize {
        self.models.values().map(|m| m.len()).sum()
    }

    /// Get the total number of textures.
    pub fn texture_count(&self) -> usize {
        self.textures.values().map(|m| m.len()).sum()
    }

    /// Get the total number of texture metadata files.
    pub fn metadata_count(&self) -> usize {
        self.texture_metadata.values().map(|m| m.len()).sum()
    }

    /// All textures in the pack as resource locations, sorted.
    pub fn texture_locations(&self) -> Vec<ResourceLocation> {
        let mut locations: Vec<_> = self
            .textures
            .iter()
            .flat_map(|(ns, paths)| paths.iter().map(move |p| ResourceLocation::new(ns.as_str(), p.as_str())))
            .collect();
        locations.sort();
        locations
    }

    /// Get all namespaces in the resource pack.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<_> = self
            .models
            .keys()
            .chain(self.textures.keys())
            .chain(self.texture_metadata.keys())
            .map(|s| s.as_str())
            .collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }
}

impl SpriteMetadataLookup for ResourcePack {
    fn metadata(&self, texture: &ResourceLocation) -> Result<Option<Arc<TextureMetadata>>> {
        let Some(contents) = self
            .texture_metadata
            .get(texture.namespace())
            .and_then(|ns| ns.get(texture.path()))
        else {
            return Ok(None);
        };
        Ok(TextureMetadata::from_mcmeta(texture, contents)?.map(Arc::new))
    }
}
