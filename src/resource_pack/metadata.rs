//! Connected texture metadata.
//!
//! Textures opt into a behavior through a `ctm` section in their
//! `.png.mcmeta` file:
//!
//! ```json
//! {
//!   "ctm": {
//!     "ctm_version": 1,
//!     "type": "ctm_compact",
//!     "layer": "CUTOUT",
//!     "textures": ["mod:block/bricks-ctm"],
//!     "extra": { "connect_to": ["mod:mossy_bricks"] }
//!   }
//! }
//! ```
//!
//! Model overrides use the inner object directly, without the `ctm` wrapper.

use crate::ctm::{RenderLayer, TextureType};
use crate::error::{CtmError, Result};
use crate::types::ResourceLocation;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The only metadata schema version understood.
pub const CURRENT_VERSION: u32 = 1;

/// Source of per-texture behavior metadata.
pub trait SpriteMetadataLookup {
    /// Look up the metadata of a texture.
    ///
    /// `Ok(None)` means the texture has no behavior metadata and renders
    /// unmodified. Errors are fatal for the model being loaded.
    fn metadata(&self, texture: &ResourceLocation) -> Result<Option<Arc<TextureMetadata>>>;
}

impl SpriteMetadataLookup for HashMap<ResourceLocation, Arc<TextureMetadata>> {
    fn metadata(&self, texture: &ResourceLocation) -> Result<Option<Arc<TextureMetadata>>> {
        Ok(self.get(texture).cloned())
    }
}

/// Behavior-specific flags from the `extra` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextureExtra {
    /// Other blocks this texture connects to, besides its own block.
    #[serde(default)]
    pub connect_to: Vec<ResourceLocation>,
    /// Compare only block identity when testing neighbors.
    #[serde(default)]
    pub ignore_states: bool,
    /// Keep classifying faces that are covered by an equivalent block.
    #[serde(default)]
    pub connect_inside: bool,
}

/// Parsed behavior metadata for one texture or override entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMetadata {
    pub version: u32,
    pub texture_type: TextureType,
    pub layer: Option<RenderLayer>,
    /// Auxiliary textures, in declaration order. The primary sprite is not included.
    pub additional_textures: Vec<ResourceLocation>,
    pub extra: TextureExtra,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    ctm_version: Option<u32>,
    #[serde(rename = "type", default = "default_type")]
    texture_type: String,
    #[serde(default)]
    layer: Option<RenderLayer>,
    #[serde(default)]
    textures: Vec<ResourceLocation>,
    #[serde(default)]
    extra: TextureExtra,
}

fn default_type() -> String {
    "normal".to_string()
}

#[derive(Deserialize)]
struct McMeta {
    #[serde(default)]
    ctm: Option<serde_json::Value>,
}

impl TextureMetadata {
    /// A metadata record with no auxiliary textures or flags.
    pub fn new(texture_type: TextureType) -> Self {
        Self {
            version: CURRENT_VERSION,
            texture_type,
            layer: None,
            additional_textures: Vec::new(),
            extra: TextureExtra::default(),
        }
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn with_textures<I, L>(mut self, textures: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<ResourceLocation>,
    {
        self.additional_textures = textures.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a metadata object. Objects without `ctm_version` are version 1.
    ///
    /// The error is a human-readable reason; callers attach the texture name.
    pub fn from_json(value: &serde_json::Value) -> std::result::Result<Self, String> {
        let raw = RawMetadata::deserialize(value).map_err(|e| e.to_string())?;

        let version = raw.ctm_version.unwrap_or(CURRENT_VERSION);
        if version != CURRENT_VERSION {
            return Err(format!("unsupported ctm_version {}", version));
        }

        let texture_type = TextureType::from_tag(&raw.texture_type)
            .ok_or_else(|| format!("unknown texture type '{}'", raw.texture_type))?;

        Ok(Self {
            version,
            texture_type,
            layer: raw.layer,
            additional_textures: raw.textures,
            extra: raw.extra,
        })
    }

    /// Parse the contents of a `.png.mcmeta` file.
    /// Returns None when the file has no `ctm` section.
    pub fn from_mcmeta(texture: &ResourceLocation, contents: &str) -> Result<Option<Self>> {
        let invalid = |reason: String| CtmError::InvalidMetadata {
            texture: texture.to_string(),
            reason,
        };

        let mcmeta: McMeta = serde_json::from_str(contents).map_err(|e| invalid(e.to_string()))?;
        match mcmeta.ctm {
            Some(section) => Self::from_json(&section).map(Some).map_err(invalid),
            None => Ok(None),
        }
    }

    /// Number of textures the behavior type needs, including the primary sprite.
    pub fn required_textures(&self) -> usize {
        self.texture_type.required_textures()
    }

    /// Number of textures provided: every auxiliary plus the primary sprite.
    pub fn provided_textures(&self) -> usize {
        self.additional_textures.len() + 1
    }

    /// Check that the number of provided textures matches the behavior type.
    pub fn validate(&self) -> Result<()> {
        if self.required_textures() != self.provided_textures() {
            return Err(CtmError::TextureCountMismatch {
                texture_type: self.texture_type.to_string(),
                required: self.required_textures(),
                provided: self.provided_textures(),
            });
        }
        Ok(())
    }
}

/// Path of the metadata file for a texture, relative to the pack root.
pub fn mcmeta_path(texture: &ResourceLocation) -> PathBuf {
    Path::new("assets")
        .join(texture.namespace())
        .join("textures")
        .join(format!("{}.png.mcmeta", texture.path()))
}

/// Reads metadata straight from an unpacked resource pack on every lookup.
#[derive(Debug, Clone)]
pub struct DirectoryMetadataSource {
    root: PathBuf,
}

impl DirectoryMetadataSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl SpriteMetadataLookup for DirectoryMetadataSource {
    fn metadata(&self, texture: &ResourceLocation) -> Result<Option<Arc<TextureMetadata>>> {
        let path = self.root.join(mcmeta_path(texture));
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CtmError::MetadataRead {
                    texture: texture.to_string(),
                    source,
                })
            }
        };
        Ok(TextureMetadata::from_mcmeta(texture, &contents)?.map(Arc::new))
    }
}
