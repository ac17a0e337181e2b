//! # Connected Textures
//!
//! A Rust library for resolving connected textures of block models.
//!
//! ## Overview
//!
//! Textures opt into a connected behavior through a `ctm` section in their
//! `.png.mcmeta` file, and models can override the textures of tinted faces
//! through a `ctm_overrides` object. This library validates those
//! declarations, bakes each model into a set of texture behaviors, and at
//! render time packs the connectivity of a block's six faces into a single
//! key that the behaviors use to pick their sub-tiles.
//!
//! ## Quick Start
//!
//! ```ignore
//! use connected_textures::{load_resource_pack, CtmConfig, CtmModel, NeighborClassifier, SpriteAtlas};
//!
//! let pack = load_resource_pack("path/to/pack.zip")?;
//! let model = CtmModel::load(&pack, "mod:block/glass", CtmConfig::default())?;
//!
//! // Map textures to atlas regions
//! let atlas = SpriteAtlas::grid(model.config().missing_texture.clone(), pack.texture_locations());
//! let sprites = |texture: &ResourceLocation| atlas.sprite(texture);
//!
//! let baked = model.bake(&pack, &sprites, BlockTransform::default(), "mod:block/glass".into())?;
//!
//! // Pick the sub-tiles of one face of a block in a world
//! let face = &baked.faces()[0];
//! let selection = baked.render_face(face, &state, &world, pos, &NeighborClassifier);
//! ```

pub mod atlas;
pub mod ctm;
pub mod error;
pub mod resolver;
pub mod resource_pack;
pub mod types;

// Re-export main types for convenience
pub use atlas::{AtlasRegion, Sprite, SpriteAtlas};
pub use ctm::{
    BakedCtmModel, BakedFace, CompositeConnectivityKey, ConnectivityClassifier, CtmConfig, CtmModel,
    FaceConnectivity, FaceConnectivityEncoder, NeighborClassifier, RenderLayer, RenderLayerMask,
    SubtileSelection, TextureBehavior, TextureType,
};
pub use error::{CtmError, Result};
pub use resource_pack::{BlockModel, ResourcePack, SpriteMetadataLookup, TextureMetadata};
pub use types::{BlockPosition, BlockReader, BlockState, BlockTransform, Direction, ResourceLocation, TintIndex};

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from ZIP bytes.
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    resource_pack::loader::load_from_bytes(data)
}
