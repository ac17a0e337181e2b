//! Sprite lookup with a missing-texture fallback.

use crate::types::ResourceLocation;
use std::collections::HashMap;

/// A region within the texture atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    /// U coordinate of the left edge (0-1).
    pub u_min: f32,
    /// V coordinate of the top edge (0-1).
    pub v_min: f32,
    /// U coordinate of the right edge (0-1).
    pub u_max: f32,
    /// V coordinate of the bottom edge (0-1).
    pub v_max: f32,
}

impl AtlasRegion {
    /// The whole atlas.
    pub const FULL: AtlasRegion = AtlasRegion {
        u_min: 0.0,
        v_min: 0.0,
        u_max: 1.0,
        v_max: 1.0,
    };

    pub fn new(u_min: f32, v_min: f32, u_max: f32, v_max: f32) -> Self {
        Self {
            u_min,
            v_min,
            u_max,
            v_max,
        }
    }

    /// Get the width of this region in UV space.
    pub fn width(&self) -> f32 {
        self.u_max - self.u_min
    }

    /// Get the height of this region in UV space.
    pub fn height(&self) -> f32 {
        self.v_max - self.v_min
    }

    /// Transform a local UV coordinate (0-1) to atlas coordinate.
    pub fn transform_uv(&self, u: f32, v: f32) -> [f32; 2] {
        [
            self.u_min + u * self.width(),
            self.v_min + v * self.height(),
        ]
    }

    /// A sub-rectangle given in local (0-1) coordinates of this region.
    pub fn sub_region(&self, u0: f32, v0: f32, u1: f32, v1: f32) -> AtlasRegion {
        let [u_min, v_min] = self.transform_uv(u0, v0);
        let [u_max, v_max] = self.transform_uv(u1, v1);
        AtlasRegion::new(u_min, v_min, u_max, v_max)
    }

    /// Cell `(column, row)` of this region split into an even `size` x `size` grid.
    pub fn grid_cell(&self, size: u32, column: u32, row: u32) -> AtlasRegion {
        let step = 1.0 / size as f32;
        self.sub_region(
            column as f32 * step,
            row as f32 * step,
            (column + 1) as f32 * step,
            (row + 1) as f32 * step,
        )
    }
}

/// A texture resolved to its atlas region at bake time.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: ResourceLocation,
    pub region: AtlasRegion,
}

impl Sprite {
    pub fn new(name: ResourceLocation, region: AtlasRegion) -> Self {
        Self { name, region }
    }
}

/// Mapping from texture location to atlas region.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    regions: HashMap<ResourceLocation, AtlasRegion>,
    missing: ResourceLocation,
}

impl SpriteAtlas {
    /// Create an empty atlas whose lookups fall back to `missing`.
    pub fn new(missing: ResourceLocation) -> Self {
        let mut regions = HashMap::new();
        regions.insert(missing.clone(), AtlasRegion::FULL);
        Self { regions, missing }
    }

    /// Lay textures out on an even square grid, missing texture first.
    pub fn grid<I>(missing: ResourceLocation, textures: I) -> Self
    where
        I: IntoIterator<Item = ResourceLocation>,
    {
        let mut names = vec![missing.clone()];
        for texture in textures {
            if !names.contains(&texture) {
                names.push(texture);
            }
        }

        let size = (names.len() as f64).sqrt().ceil().max(1.0) as u32;
        let mut atlas = Self::new(missing);
        for (i, name) in names.into_iter().enumerate() {
            let i = i as u32;
            atlas.insert(name, AtlasRegion::FULL.grid_cell(size, i % size, i / size));
        }
        atlas
    }

    pub fn insert(&mut self, name: ResourceLocation, region: AtlasRegion) {
        self.regions.insert(name, region);
    }

    pub fn contains(&self, name: &ResourceLocation) -> bool {
        self.regions.contains_key(name)
    }

    /// Number of sprites, including the missing texture.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The missing-texture sprite.
    pub fn missing(&self) -> Sprite {
        Sprite::new(self.missing.clone(), self.regions[&self.missing])
    }

    /// Resolve a texture, falling back to the missing texture.
    pub fn sprite(&self, name: &ResourceLocation) -> Sprite {
        match self.regions.get(name) {
            Some(region) => Sprite::new(name.clone(), *region),
            None => {
                log::trace!("No sprite for {}, using {}", name, self.missing);
                self.missing()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_math() {
        let region = AtlasRegion::new(0.5, 0.0, 1.0, 0.5);
        assert_eq!(region.width(), 0.5);
        assert_eq!(region.transform_uv(0.5, 0.5), [0.75, 0.25]);
        assert_eq!(region.grid_cell(2, 1, 1), AtlasRegion::new(0.75, 0.25, 1.0, 0.5));
    }

    #[test]
    fn test_missing_fallback() {
        let missing = ResourceLocation::parse("minecraft:missingno");
        let mut atlas = SpriteAtlas::new(missing.clone());
        let stone = ResourceLocation::parse("block/stone");
        atlas.insert(stone.clone(), AtlasRegion::new(0.0, 0.0, 0.5, 0.5));

        assert_eq!(atlas.sprite(&stone).name, stone);
        assert_eq!(atlas.sprite(&ResourceLocation::parse("block/dirt")).name, missing);
    }

    #[test]
    fn test_grid_layout() {
        let missing = ResourceLocation::parse("minecraft:missingno");
        let atlas = SpriteAtlas::grid(
            missing,
            ["mod:a", "mod:b", "mod:c", "mod:a"].into_iter().map(ResourceLocation::parse),
        );

        assert_eq!(atlas.len(), 4);
        let c = atlas.sprite(&ResourceLocation::parse("mod:c"));
        assert_eq!(c.region, AtlasRegion::new(0.5, 0.5, 1.0, 1.0));
    }
}
