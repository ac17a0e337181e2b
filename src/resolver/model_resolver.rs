//! Model inheritance resolution.

use crate::error::{CtmError, Result};
use crate::resource_pack::{BlockModel, ResourcePack};
use crate::types::ResourceLocation;
use std::cell::RefCell;
use std::collections::HashMap;

/// Maximum depth for model inheritance to prevent infinite loops.
const MAX_INHERITANCE_DEPTH: usize = 10;

/// Resolves model inheritance chains.
pub struct ModelResolver<'a> {
    pack: &'a ResourcePack,
    cache: RefCell<HashMap<ResourceLocation, BlockModel>>,
}

impl<'a> ModelResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            pack,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a model with all inherited properties.
    pub fn resolve(&self, model_location: &str) -> Result<BlockModel> {
        let location = ResourceLocation::parse(model_location);
        if let Some(cached) = self.cache.borrow().get(&location) {
            return Ok(cached.clone());
        }

        let resolved = self.resolve_internal(&location, 0)?;

        self.cache.borrow_mut().insert(location, resolved.clone());

        Ok(resolved)
    }

    fn resolve_internal(&self, location: &ResourceLocation, depth: usize) -> Result<BlockModel> {
        if depth >= MAX_INHERITANCE_DEPTH {
            return Err(CtmError::ModelInheritanceTooDeep(location.to_string()));
        }

        let base_model = self
            .pack
            .get_model(&location.to_string())
            .ok_or_else(|| CtmError::ModelResolution(format!("Model not found: {}", location)))?;

        let parent_location = match base_model.parent_location() {
            Some(parent) => parent,
            None => return Ok(base_model.clone()),
        };

        // Builtin parents (builtin/generated, builtin/entity) have no JSON
        if parent_location.path().starts_with("builtin/") {
            return Ok(base_model.clone());
        }

        let parent_model = self.resolve_internal(&parent_location, depth + 1)?;

        Ok(merge_models(&parent_model, base_model))
    }
}

/// Merge a parent model into a child model.
/// Child properties override parent properties.
fn merge_models(parent: &BlockModel, child: &BlockModel) -> BlockModel {
    let mut merged = parent.clone();

    for (key, value) in &child.textures {
        merged.textures.insert(key.clone(), value.clone());
    }

    if !child.elements.is_empty() {
        merged.elements = child.elements.clone();
    }

    // Overrides are replaced as a whole, never merged per tint index
    if !child.ctm_overrides.is_empty() {
        merged.ctm_overrides = child.ctm_overrides.clone();
    }

    merged.ambient_occlusion = child.ambient_occlusion;
    merged.parent = None;

    merged
}
