use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use crate::avatar_renderer::create_avatar;
use crate::people_loader::load_avatar_specs;

pub const DEFAULT_FONT_PATHS: [&str; 2] = [
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/arial.ttf",
];

pub trait AvatarConfig {
    fn people_csv(&self) -> &str;
    fn output_dir(&self) -> &str;
    /// Font files to try, in order
    fn font_paths(&self) -> &[String];
}

/// Load the people table and write one avatar per record, in table order.
///
/// A table that cannot be read still produces `default.png`. Any rendering
/// or write failure stops the run.
pub fn generate_avatars<T: AvatarConfig>(config: &T) -> anyhow::Result<Vec<PathBuf>> {
    let output_dir = Path::new(config.output_dir());

    // Create output directory if it doesn't exist
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    }

    let specs = load_avatar_specs(Path::new(config.people_csv()));
    tracing::info!(count = specs.len(), "Generating avatars");

    let mut written = Vec::with_capacity(specs.len());
    for spec in &specs {
        let path = create_avatar(spec, output_dir, config.font_paths())
            .with_context(|| format!("Failed to create avatar for {}", spec.output_filename))?;
        written.push(path);
    }

    Ok(written)
}
