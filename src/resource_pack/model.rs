//! Block model parsing.
//!
//! Block models define geometry using cuboid elements. Models that opt into
//! connected textures additionally carry a `ctm_overrides` object mapping
//! tint indices to override textures.

use crate::types::{Direction, ElementRotation, ResourceLocation, TintIndex, LOCAL_MARKER};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Maximum number of `#variable` hops followed when resolving a texture.
const MAX_TEXTURE_CHAIN: usize = 10;

/// A parsed block model from models/*.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default)]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion.
    #[serde(default = "default_ao", rename = "ambientocclusion")]
    pub ambient_occlusion: bool,

    /// Texture variable definitions.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids).
    #[serde(default)]
    pub elements: Vec<ModelElement>,

    /// Raw tint index overrides, keyed by the tint index as a string.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ctm_overrides: BTreeMap<String, serde_json::Value>,
}

fn default_ao() -> bool {
    true
}

impl BlockModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the full parent resource location.
    pub fn parent_location(&self) -> Option<ResourceLocation> {
        self.parent.as_deref().map(ResourceLocation::parse)
    }

    /// Check if this model has its own elements (not inherited).
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Resolve a texture reference (e.g., "#side") one level.
    /// Returns None if the reference cannot be resolved.
    pub fn resolve_texture<'a>(&'a self, reference: &'a str) -> Option<&'a str> {
        match reference.strip_prefix(LOCAL_MARKER) {
            Some(key) => self.textures.get(key).map(|s| s.as_str()),
            None => Some(reference),
        }
    }

    /// Follow `#variable` references until a concrete texture location is reached.
    /// Returns None for dangling or cyclic references.
    pub fn resolve_texture_location(&self, reference: &str) -> Option<ResourceLocation> {
        let mut current = reference;
        for _ in 0..MAX_TEXTURE_CHAIN {
            if !current.starts_with(LOCAL_MARKER) {
                return Some(ResourceLocation::parse(current));
            }
            current = self.resolve_texture(current)?;
        }
        None
    }

    /// Iterate over every face of every element.
    pub fn faces(&self) -> impl Iterator<Item = (Direction, &ModelFace)> + '_ {
        self.elements
            .iter()
            .flat_map(|element| element.faces.iter().map(|(dir, face)| (*dir, face)))
    }

    /// Every concrete texture location referenced by a face, sorted and deduplicated.
    pub fn face_textures(&self) -> Vec<ResourceLocation> {
        let mut textures: Vec<_> = self
            .faces()
            .filter_map(|(_, face)| self.resolve_texture_location(&face.texture))
            .collect();
        textures.sort();
        textures.dedup();
        textures
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (0-16 range).
    pub from: [f32; 3],
    /// Maximum corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,
    /// Whether this element receives shade.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions.
    #[serde(default)]
    pub faces: HashMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

/// A face of a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// Face direction for culling.
    #[serde(default)]
    pub cullface: Option<Direction>,
    /// UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index (-1 = no tint).
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,
}

fn default_tint_index() -> i32 {
    -1
}

impl ModelFace {
    /// The tint index of this face, if it has one.
    pub fn tint_index(&self) -> Option<TintIndex> {
        TintIndex::try_from(self.tintindex).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_with_overrides() {
        let json = r##"{
            "parent": "block/cube_all",
            "textures": { "all": "mod:block/bricks" },
            "ctm_overrides": {
                "0": "mod:bricks_mossy",
                "2": { "type": "ctm_compact", "textures": ["mod:a_side"] }
            }
        }"##;

        let model: BlockModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.parent_location(), Some(ResourceLocation::parse("minecraft:block/cube_all")));
        assert_eq!(model.ctm_overrides.len(), 2);
        assert!(model.ctm_overrides["0"].is_string());
        assert!(model.ctm_overrides["2"].is_object());
    }

    #[test]
    fn test_parse_model_with_elements() {
        let json = r##"{
            "textures": { "texture": "block/stone" },
            "elements": [
                {
                    "from": [0, 0, 0],
                    "to": [16, 16, 16],
                    "faces": {
                        "down":  { "texture": "#texture", "cullface": "down" },
                        "up":    { "texture": "#texture", "cullface": "up", "tintindex": 0 }
                    }
                }
            ]
        }"##;

        let model: BlockModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.elements.len(), 1);
        assert!(model.ctm_overrides.is_empty());

        let faces = &model.elements[0].faces;
        assert_eq!(faces[&Direction::Down].tint_index(), None);
        assert_eq!(faces[&Direction::Up].tint_index(), Some(0));
        assert_eq!(model.face_textures(), vec![ResourceLocation::parse("minecraft:block/stone")]);
    }

    #[test]
    fn test_resolve_texture() {
        let model = BlockModel {
            textures: [
                ("all".to_string(), "block/stone".to_string()),
                ("side".to_string(), "#all".to_string()),
                ("loop".to_string(), "#loop".to_string()),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        assert_eq!(model.resolve_texture("#all"), Some("block/stone"));
        assert_eq!(model.resolve_texture("#side"), Some("#all")); // Only one level
        assert_eq!(model.resolve_texture("block/dirt"), Some("block/dirt"));
        assert_eq!(model.resolve_texture("#missing"), None);

        assert_eq!(
            model.resolve_texture_location("#side"),
            Some(ResourceLocation::parse("block/stone"))
        );
        assert_eq!(model.resolve_texture_location("#loop"), None);
    }
}
