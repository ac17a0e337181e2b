//! Resource pack loading from ZIP files and directories.

use super::{BlockModel, ResourcePack};
use crate::error::{CtmError, Result};
use std::io::Read;
use std::path::Path;

/// Load a resource pack from a file path.
///
/// Supports both ZIP files and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ResourcePack> {
    let path = path.as_ref();

    if path.is_dir() {
        load_from_directory(path)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)
    }
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = ResourcePack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let file_path = file.name().to_string();

        let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) else {
            continue;
        };

        match asset_type {
            "models" if asset_path.ends_with(".json") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                add_model_json(&mut pack, namespace, asset_path.trim_end_matches(".json"), &contents);
            }
            "textures" if asset_path.ends_with(".png.mcmeta") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                pack.add_texture_metadata(namespace, asset_path.trim_end_matches(".png.mcmeta"), contents);
            }
            "textures" if asset_path.ends_with(".png") => {
                pack.add_texture(namespace, asset_path.trim_end_matches(".png"));
            }
            _ => {}
        }
    }

    log_pack_summary("ZIP data", &pack);
    Ok(pack)
}

/// Load a resource pack from a directory.
fn load_from_directory(path: &Path) -> Result<ResourcePack> {
    let mut pack = ResourcePack::new();

    let assets_path = path.join("assets");
    if !assets_path.exists() {
        return Err(CtmError::InvalidResourcePack(
            "No assets directory found".to_string(),
        ));
    }

    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let namespace = namespace_entry.file_name().to_string_lossy().to_string();
        let namespace_path = namespace_entry.path();

        let models_path = namespace_path.join("models");
        if models_path.exists() {
            visit_files(&models_path, &models_path, &mut |relative, file| {
                if let Some(model_path) = relative.strip_suffix(".json") {
                    let contents = std::fs::read_to_string(file)?;
                    add_model_json(&mut pack, &namespace, model_path, &contents);
                }
                Ok(())
            })?;
        }

        let textures_path = namespace_path.join("textures");
        if textures_path.exists() {
            visit_files(&textures_path, &textures_path, &mut |relative, file| {
                if let Some(texture_path) = relative.strip_suffix(".png.mcmeta") {
                    let contents = std::fs::read_to_string(file)?;
                    pack.add_texture_metadata(&namespace, texture_path, contents);
                } else if let Some(texture_path) = relative.strip_suffix(".png") {
                    pack.add_texture(&namespace, texture_path);
                }
                Ok(())
            })?;
        }
    }

    log_pack_summary(path.display(), &pack);
    Ok(pack)
}

fn log_pack_summary(source: impl std::fmt::Display, pack: &ResourcePack) {
    log::debug!(
        "Loaded pack from {}: {} models, {} textures, {} metadata files",
        source,
        pack.model_count(),
        pack.texture_count(),
        pack.metadata_count()
    );
}

/// Parse a model and add it, skipping it with a warning if it is malformed.
fn add_model_json(pack: &mut ResourcePack, namespace: &str, model_path: &str, contents: &str) {
    match serde_json::from_str::<BlockModel>(contents) {
        Ok(model) => pack.add_model(namespace, model_path, model),
        Err(e) => log::warn!("Failed to parse model {}:{}: {}", namespace, model_path, e),
    }
}

/// Parse an asset path from a ZIP file.
/// Returns (namespace, asset_type, asset_path) if valid.
fn parse_asset_path(file_path: &str) -> Option<(&str, &str, &str)> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(4, '/').collect();

    if parts.len() >= 4 && parts[0] == "assets" {
        Some((parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

/// Walk a directory recursively, calling the handler with each file's
/// `/`-separated path relative to `base`.
fn visit_files<F>(base: &Path, dir: &Path, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, &Path) -> Result<()>,
{
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            visit_files(base, &path, handler)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let relative = relative.to_string_lossy().replace('\\', "/");
            handler(&relative, &path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_asset_path() {
        assert_eq!(
            parse_asset_path("assets/minecraft/models/block/stone.json"),
            Some(("minecraft", "models", "block/stone.json"))
        );
        assert_eq!(
            parse_asset_path("assets/mymod/textures/block/custom.png.mcmeta"),
            Some(("mymod", "textures", "block/custom.png.mcmeta"))
        );
        assert_eq!(parse_asset_path("pack.mcmeta"), None);
        assert_eq!(parse_asset_path("data/minecraft/recipes/test.json"), None);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let block_models = dir.path().join("assets/mod/models/block");
        let block_textures = dir.path().join("assets/mod/textures/block");
        std::fs::create_dir_all(&block_models).unwrap();
        std::fs::create_dir_all(&block_textures).unwrap();

        std::fs::write(block_models.join("bricks.json"), r#"{ "textures": { "all": "mod:block/bricks" } }"#).unwrap();
        std::fs::write(block_models.join("broken.json"), "{").unwrap();
        std::fs::write(block_textures.join("bricks.png"), [0u8; 4]).unwrap();
        std::fs::write(block_textures.join("bricks.png.mcmeta"), r#"{ "ctm": { "type": "normal" } }"#).unwrap();

        let pack = load_from_path(dir.path()).unwrap();
        assert!(pack.get_model("mod:block/bricks").is_some());
        assert!(pack.get_model("mod:block/broken").is_none());
        assert!(pack.has_texture("mod:block/bricks"));
        assert!(pack.get_texture_metadata("mod:block/bricks").is_some());
    }

    struct CapturingLogger {
        messages: std::sync::Mutex<Vec<String>>,
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Debug
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut messages) = self.messages.lock() {
                messages.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        messages: std::sync::Mutex::new(Vec::new()),
    };

    #[test]
    fn test_directory_load_logs_summary() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Debug);

        let dir = tempfile::tempdir().unwrap();
        let block_models = dir.path().join("assets/mod/models/block");
        std::fs::create_dir_all(&block_models).unwrap();
        std::fs::write(block_models.join("glass.json"), "{}").unwrap();

        load_from_path(dir.path()).unwrap();

        let expected = format!(
            "Loaded pack from {}: 1 models, 0 textures, 0 metadata files",
            dir.path().display()
        );
        let messages = LOGGER.messages.lock().unwrap();
        assert!(messages.contains(&expected), "missing '{}' in {:?}", expected, messages);
    }

    #[test]
    fn test_load_from_directory_requires_assets() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_from_path(dir.path()),
            Err(CtmError::InvalidResourcePack(_))
        ));
    }

    #[test]
    fn test_load_from_zip_bytes() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("assets/mod/models/block/glass.json", options).unwrap();
            writer.write_all(br#"{ "parent": "block/cube_all" }"#).unwrap();
            writer.start_file("assets/mod/textures/block/glass.png", options).unwrap();
            writer.write_all(&[0u8; 4]).unwrap();
            writer.start_file("assets/mod/textures/block/glass.png.mcmeta", options).unwrap();
            writer.write_all(br#"{ "ctm": { "type": "ctmh" } }"#).unwrap();
            writer.finish().unwrap();
        }

        let pack = load_from_bytes(buffer.get_ref()).unwrap();
        assert_eq!(pack.model_count(), 1);
        assert_eq!(pack.texture_count(), 1);
        assert_eq!(pack.metadata_count(), 1);
    }
}
