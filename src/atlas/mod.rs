//! Resolved sprites and their atlas regions.
//!
//! Packing and uploading the atlas belongs to the host; this module only
//! describes where a sprite lives so behaviors can hand back sub-regions.

mod sprite;

pub use sprite::{AtlasRegion, Sprite, SpriteAtlas};
