//! Cookbook discovery on disk.

use std::path::Path;

use cookbook_metadata_core::Cookbook;
use tracing::debug;

use crate::config::CliConfig;
use crate::error::{CliError, Result};

/// Builds a [`Cookbook`] from a cookbook directory.
///
/// The name is `name_override` when given, otherwise the directory's final
/// path component. Recipe files are the entries of
/// `<dir>/<recipes_dir>` with the configured extension, sorted by file name.
/// A missing recipes directory yields a cookbook with no recipes.
#[tracing::instrument(skip(config))]
pub fn discover_cookbook(
    dir: &Path,
    name_override: Option<&str>,
    config: &CliConfig,
) -> Result<Cookbook> {
    let name = match name_override {
        Some(name) => name.to_string(),
        None => cookbook_name(dir)?,
    };

    let recipes_dir = dir.join(&config.recipes_dir);
    let mut recipe_files = Vec::new();
    if recipes_dir.is_dir() {
        let entries =
            std::fs::read_dir(&recipes_dir).map_err(|err| CliError::io(&recipes_dir, err))?;
        for entry in entries {
            let entry = entry.map_err(|err| CliError::io(&recipes_dir, err))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == config.recipe_extension);
            if !matches_extension {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|f| f.to_str()) {
                recipe_files.push(file_name.to_string());
            }
        }
        recipe_files.sort();
    } else {
        debug!(dir = %recipes_dir.display(), "no recipes directory");
    }

    debug!(cookbook = %name, recipes = recipe_files.len(), "discovered cookbook");
    Ok(Cookbook::new(name).with_recipe_files(recipe_files))
}

fn cookbook_name(dir: &Path) -> Result<String> {
    let canonical = dir.canonicalize().map_err(|err| CliError::io(dir, err))?;
    canonical
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CliError::UnnamedCookbook(dir.to_path_buf()))
}
