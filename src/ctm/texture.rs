//! Texture behaviors: the closed set of connected texture types and the
//! sub-tile selection each of them performs.

use super::connectivity::{ConnectionPredicate, ConnectionRules, FaceConnectivity, Neighbor};
use super::context::CompositeConnectivityKey;
use crate::atlas::{AtlasRegion, Sprite};
use crate::resource_pack::TextureExtra;
use crate::types::{BlockState, Direction, ResourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering pass a behavior may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderLayer {
    #[serde(alias = "solid")]
    Solid,
    #[serde(alias = "cutout_mipped")]
    CutoutMipped,
    #[serde(alias = "cutout")]
    Cutout,
    #[serde(alias = "translucent")]
    Translucent,
}

impl RenderLayer {
    pub const ALL: [RenderLayer; 4] = [
        RenderLayer::Solid,
        RenderLayer::CutoutMipped,
        RenderLayer::Cutout,
        RenderLayer::Translucent,
    ];

    /// Bit position of this layer in a render layer mask.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderLayer::Solid => write!(f, "SOLID"),
            RenderLayer::CutoutMipped => write!(f, "CUTOUT_MIPPED"),
            RenderLayer::Cutout => write!(f, "CUTOUT"),
            RenderLayer::Translucent => write!(f, "TRANSLUCENT"),
        }
    }
}

/// The behavior types a texture can declare.
///
/// Sheet layouts (2x2 tiles, row-major):
/// - `CtmCompact`: texture 0 is the unconnected base, texture 1 holds
///   center, vertical edge, horizontal edge and inner corner tiles.
///   Each quarter of a face is picked independently.
/// - `CtmHorizontal` / `CtmVertical`: texture 0 holds single, start,
///   middle and end tiles along the face's horizontal or vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Normal,
    CtmCompact,
    CtmHorizontal,
    CtmVertical,
}

impl TextureType {
    pub const ALL: [TextureType; 4] = [
        TextureType::Normal,
        TextureType::CtmCompact,
        TextureType::CtmHorizontal,
        TextureType::CtmVertical,
    ];

    /// Resolve a metadata type tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "normal" => Some(TextureType::Normal),
            "ctm_compact" => Some(TextureType::CtmCompact),
            "ctm_horizontal" | "ctmh" => Some(TextureType::CtmHorizontal),
            "ctm_vertical" | "ctmv" => Some(TextureType::CtmVertical),
            _ => None,
        }
    }

    /// Canonical tag of this type.
    pub fn tag(self) -> &'static str {
        match self {
            TextureType::Normal => "normal",
            TextureType::CtmCompact => "ctm_compact",
            TextureType::CtmHorizontal => "ctm_horizontal",
            TextureType::CtmVertical => "ctm_vertical",
        }
    }

    /// Number of textures this type needs, including the primary sprite.
    pub fn required_textures(self) -> usize {
        match self {
            TextureType::CtmCompact => 2,
            TextureType::Normal | TextureType::CtmHorizontal | TextureType::CtmVertical => 1,
        }
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A renderable region of one of a behavior's sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtile {
    pub sprite: ResourceLocation,
    pub region: AtlasRegion,
}

/// The regions to draw for one face, one per quarter of the face.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtileSelection {
    /// Top-left, top-right, bottom-left, bottom-right.
    pub quadrants: [Subtile; 4],
}

impl SubtileSelection {
    /// The same region for the whole face, split into quarters.
    pub fn whole(sprite: &ResourceLocation, region: AtlasRegion) -> Self {
        let quadrant = |column, row| Subtile {
            sprite: sprite.clone(),
            region: region.grid_cell(2, column, row),
        };
        Self {
            quadrants: [quadrant(0, 0), quadrant(1, 0), quadrant(0, 1), quadrant(1, 1)],
        }
    }
}

const CENTER: u32 = 0;
const VERTICAL: u32 = 1;
const HORIZONTAL: u32 = 2;
const INNER_CORNER: u32 = 3;

/// A constructed texture behavior with its resolved sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBehavior {
    texture_type: TextureType,
    /// Primary sprite first, then auxiliaries in metadata order.
    sprites: Vec<Sprite>,
    layer: Option<RenderLayer>,
    extra: TextureExtra,
}

impl TextureBehavior {
    /// Build a behavior. `sprites` must hold exactly the textures the type requires.
    pub(crate) fn new(
        texture_type: TextureType,
        sprites: Vec<Sprite>,
        layer: Option<RenderLayer>,
        extra: TextureExtra,
    ) -> Self {
        debug_assert_eq!(sprites.len(), texture_type.required_textures());
        Self {
            texture_type,
            sprites,
            layer,
            extra,
        }
    }

    /// Pass-through behavior for a texture without metadata.
    pub fn normal(sprite: Sprite) -> Self {
        Self::new(TextureType::Normal, vec![sprite], None, TextureExtra::default())
    }

    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn primary(&self) -> &Sprite {
        &self.sprites[0]
    }

    /// Declared render layer; None means the block's default layer.
    pub fn render_layer(&self) -> Option<RenderLayer> {
        self.layer
    }

    pub fn ignore_states(&self) -> bool {
        self.extra.ignore_states
    }

    pub fn connect_inside(&self) -> bool {
        self.extra.connect_inside
    }

    /// Whether this behavior needs neighbor connectivity at all.
    pub fn is_connected(&self) -> bool {
        self.texture_type != TextureType::Normal
    }

    /// Classification rules derived from this behavior.
    pub fn connection_rules(&self) -> ConnectionRules<'_> {
        ConnectionRules::new(self)
            .with_ignore_states(self.ignore_states())
            .with_connect_inside(self.connect_inside())
    }

    /// Pick the regions to draw on `face` given the block's composite key.
    pub fn select_subtile(&self, face: Direction, key: CompositeConnectivityKey) -> SubtileSelection {
        let connectivity = key.face(face);
        match self.texture_type {
            TextureType::Normal => self.whole(0),
            TextureType::CtmCompact => self.select_compact(connectivity),
            TextureType::CtmHorizontal => self.select_axis(connectivity, Neighbor::Left, Neighbor::Right),
            TextureType::CtmVertical => self.select_axis(connectivity, Neighbor::Up, Neighbor::Down),
        }
    }

    fn whole(&self, index: usize) -> SubtileSelection {
        let sprite = &self.sprites[index];
        SubtileSelection::whole(&sprite.name, sprite.region)
    }

    fn select_compact(&self, connectivity: FaceConnectivity) -> SubtileSelection {
        let base = &self.sprites[0];
        let sheet = &self.sprites[1];

        let quadrant = |column: u32, row: u32| {
            let vertical = if row == 0 { Neighbor::Up } else { Neighbor::Down };
            let horizontal = if column == 0 { Neighbor::Left } else { Neighbor::Right };
            let diagonal = Neighbor::diagonal(vertical, horizontal);

            let v = connectivity.connected(vertical);
            let h = connectivity.connected(horizontal);
            let tile = match (v, h) {
                (false, false) => None,
                (true, false) => Some(VERTICAL),
                (false, true) => Some(HORIZONTAL),
                (true, true) if connectivity.connected(diagonal) => Some(CENTER),
                (true, true) => Some(INNER_CORNER),
            };

            match tile {
                None => Subtile {
                    sprite: base.name.clone(),
                    region: base.region.grid_cell(2, column, row),
                },
                Some(tile) => Subtile {
                    sprite: sheet.name.clone(),
                    region: sheet
                        .region
                        .grid_cell(2, tile % 2, tile / 2)
                        .grid_cell(2, column, row),
                },
            }
        };

        SubtileSelection {
            quadrants: [quadrant(0, 0), quadrant(1, 0), quadrant(0, 1), quadrant(1, 1)],
        }
    }

    fn select_axis(&self, connectivity: FaceConnectivity, first: Neighbor, second: Neighbor) -> SubtileSelection {
        let sheet = &self.sprites[0];
        let tile = match (connectivity.connected(first), connectivity.connected(second)) {
            (false, false) => 0,
            (false, true) => 1,
            (true, true) => 2,
            (true, false) => 3,
        };
        SubtileSelection::whole(&sheet.name, sheet.region.grid_cell(2, tile % 2, tile / 2))
    }
}

impl ConnectionPredicate for TextureBehavior {
    fn connects(&self, own: &BlockState, other: &BlockState) -> bool {
        (own.same_block(other) && own.properties == other.properties)
            || self.extra.connect_to.contains(&other.block())
    }
}
