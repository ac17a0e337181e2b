//! Connected textures CLI
//!
//! Inspect, validate and bake the connected textures of resource pack models.

use clap::{Args, Parser, Subcommand, ValueEnum};
use connected_textures::{
    load_resource_pack, BakedCtmModel, BlockPosition, BlockState, BlockTransform, CtmConfig, CtmModel,
    NeighborClassifier, RenderLayer, ResourceLocation, ResourcePack, SpriteAtlas,
};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ctm-inspect")]
#[command(author, version, about = "Inspect connected textures in a resource pack", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a resource pack
    Info {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,
    },

    /// List the textures a model's overrides depend on
    Deps(ModelArgs),

    /// Check the texture counts of every behavior a model can use
    Validate(ModelArgs),

    /// Bake a model and list its behaviors, overrides and layers
    Bake {
        #[command(flatten)]
        model: ModelArgs,

        /// X rotation in degrees
        #[arg(long, default_value = "0")]
        x: i32,

        /// Y rotation in degrees
        #[arg(long, default_value = "0")]
        y: i32,
    },

    /// Bake a model and pick the sub-tiles of one block in a world
    Render {
        #[command(flatten)]
        model: ModelArgs,

        /// Input JSON file containing block data
        #[arg(short, long)]
        input: PathBuf,

        /// Position of the block to render, as x,y,z
        #[arg(long, value_parser = parse_position)]
        at: BlockPosition,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Model location (e.g., "mod:block/glass")
    model: String,

    /// Path to resource pack (ZIP or directory)
    #[arg(short, long)]
    resource_pack: PathBuf,

    /// Layer for behaviors that declare none
    #[arg(long, value_enum, default_value = "solid")]
    default_layer: LayerArg,

    /// Texture used when a face texture cannot be resolved
    #[arg(long, default_value = "minecraft:missingno")]
    missing_texture: String,

    /// Only validate override metadata, not the model's own face textures
    #[arg(long)]
    skip_model_textures: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LayerArg {
    Solid,
    CutoutMipped,
    Cutout,
    Translucent,
}

impl From<LayerArg> for RenderLayer {
    fn from(layer: LayerArg) -> Self {
        match layer {
            LayerArg::Solid => RenderLayer::Solid,
            LayerArg::CutoutMipped => RenderLayer::CutoutMipped,
            LayerArg::Cutout => RenderLayer::Cutout,
            LayerArg::Translucent => RenderLayer::Translucent,
        }
    }
}

impl ModelArgs {
    fn config(&self) -> CtmConfig {
        CtmConfig::default()
            .with_default_layer(self.default_layer.into())
            .with_missing_texture(self.missing_texture.as_str())
            .with_validate_model_textures(!self.skip_model_textures)
    }

    fn load(&self) -> Result<(ResourcePack, CtmModel), Box<dyn std::error::Error>> {
        println!("Loading resource pack from {:?}...", self.resource_pack);
        let pack = load_resource_pack(&self.resource_pack)?;
        let model = CtmModel::load(&pack, &self.model, self.config())?;
        Ok((pack, model))
    }
}

fn parse_position(s: &str) -> Result<BlockPosition, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("Invalid position format: '{}'. Use x,y,z", s));
    }
    let coord = |part: &str| {
        part.parse::<i32>()
            .map_err(|e| format!("Invalid coordinate '{}': {}", part, e))
    };
    Ok(BlockPosition::new(coord(parts[0])?, coord(parts[1])?, coord(parts[2])?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { resource_pack } => show_pack_info(&resource_pack)?,
        Commands::Deps(args) => show_dependencies(&args)?,
        Commands::Validate(args) => validate_model(&args)?,
        Commands::Bake { model, x, y } => {
            let (pack, ctm) = model.load()?;
            let baked = bake(&pack, &ctm, &model.model, BlockTransform::new(x, y, false))?;
            print_baked(&baked);
        }
        Commands::Render { model, input, at } => render_block(&model, &input, at)?,
    }

    Ok(())
}

fn show_pack_info(resource_pack_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading resource pack from {:?}...", resource_pack_path);
    let pack = load_resource_pack(resource_pack_path)?;

    println!("\nResource Pack Info:");
    println!("  Namespaces: {}", pack.namespaces().join(", "));
    println!("  Models: {}", pack.model_count());
    println!("  Textures: {}", pack.texture_count());
    println!("  Texture metadata: {}", pack.metadata_count());

    Ok(())
}

fn show_dependencies(args: &ModelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (pack, model) = args.load()?;

    println!("\n{}: {} overrides", args.model, model.overrides().len());
    for texture in model.dependencies() {
        let status = if pack.has_texture(&texture.to_string()) { "" } else { " (missing)" };
        println!("  {}{}", texture, status);
    }

    Ok(())
}

fn validate_model(args: &ModelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (pack, model) = args.load()?;
    let with_metadata = model.validate(&pack)?;

    println!("\n{} is valid", args.model);
    println!("  Textures checked: {}", model.textures().len());
    println!("  Textures with behaviors: {}", with_metadata.len());
    for texture in &with_metadata {
        println!("    {}", texture);
    }
    println!("  Override behaviors: {}", model.overrides().all_metadata().count());

    Ok(())
}

fn bake(
    pack: &ResourcePack,
    model: &CtmModel,
    location: &str,
    transform: BlockTransform,
) -> Result<BakedCtmModel, Box<dyn std::error::Error>> {
    let atlas = SpriteAtlas::grid(model.config().missing_texture.clone(), pack.texture_locations());
    let sprites = |texture: &ResourceLocation| atlas.sprite(texture);
    Ok(model.bake(pack, &sprites, transform, ResourceLocation::parse(location))?)
}

fn print_baked(baked: &BakedCtmModel) {
    println!("\nBaked {}: {} faces", baked.location(), baked.faces().len());

    println!("  Behaviors:");
    for behavior in baked.ctm_textures() {
        let layer = behavior
            .render_layer()
            .map(|layer| layer.to_string())
            .unwrap_or_else(|| "default".to_string());
        println!("    {} [{}] layer {}", behavior.primary().name, behavior.texture_type(), layer);
    }

    println!("  Overrides:");
    for (tint, sprite) in baked.resolved().sprite_overrides() {
        println!("    tint {} -> sprite {}", tint, sprite.name);
    }
    for (tint, texture, behavior) in baked.resolved().texture_overrides() {
        println!("    tint {} on {} -> {}", tint, texture, behavior.texture_type());
    }

    let layers: Vec<String> = RenderLayer::ALL
        .into_iter()
        .filter(|layer| baked.can_render_in_layer(*layer))
        .map(|layer| layer.to_string())
        .collect();
    println!("  Layer mask: {:#010b} ({})", baked.layers().bits(), layers.join(", "));
}

fn render_block(args: &ModelArgs, input: &PathBuf, at: BlockPosition) -> Result<(), Box<dyn std::error::Error>> {
    let (pack, model) = args.load()?;
    let baked = bake(&pack, &model, &args.model, BlockTransform::default())?;

    println!("Loading block data from {:?}...", input);
    let json_content = fs::read_to_string(input)?;
    let block_data: BlockDataInput = serde_json::from_str(&json_content)?;
    let world = block_data.into_world();
    println!("  Loaded {} blocks", world.len());

    let state = world
        .get(&at)
        .cloned()
        .ok_or_else(|| format!("No block at {},{},{}", at.x, at.y, at.z))?;

    println!("\n{} at {},{},{}:", state.name, at.x, at.y, at.z);
    for face in baked.faces() {
        let (selection, key) = baked.render_face_with_key(face, &state, &world, at, &NeighborClassifier);
        let connectivity = key.unpack(face.direction);
        println!("  {:<5} connectivity {:#010b}", face.direction.to_string(), connectivity);
        for (corner, quadrant) in ["top-left", "top-right", "bottom-left", "bottom-right"]
            .iter()
            .zip(&selection.quadrants)
        {
            let r = quadrant.region;
            println!(
                "    {:<12} {} [{:.4}, {:.4}, {:.4}, {:.4}]",
                corner, quadrant.sprite, r.u_min, r.v_min, r.u_max, r.v_max
            );
        }
    }

    Ok(())
}

// JSON input format
#[derive(serde::Deserialize)]
struct BlockDataInput {
    blocks: Vec<BlockEntry>,
}

#[derive(serde::Deserialize)]
struct BlockEntry {
    x: i32,
    y: i32,
    z: i32,
    #[serde(default = "default_block_name")]
    name: String,
    #[serde(default)]
    properties: HashMap<String, String>,
}

fn default_block_name() -> String {
    "minecraft:stone".to_string()
}

impl BlockDataInput {
    fn into_world(self) -> HashMap<BlockPosition, BlockState> {
        self.blocks
            .into_iter()
            .map(|entry| {
                // Normalize block name
                let name = if entry.name.contains(':') {
                    entry.name
                } else {
                    format!("minecraft:{}", entry.name)
                };
                let state = entry
                    .properties
                    .into_iter()
                    .fold(BlockState::new(name), |state, (key, value)| state.with_property(key, value));
                (BlockPosition::new(entry.x, entry.y, entry.z), state)
            })
            .collect()
    }
}
