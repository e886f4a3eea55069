use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::role_colors::{colors_for_role, parse_color, Rgb};

/// Everything needed to draw one avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarSpec {
    pub output_filename: String,
    pub initials: String,
    pub background_color: Rgb,
    pub text_color: Rgb,
}

impl AvatarSpec {
    /// The fallback avatar appended after every table
    pub fn default_avatar() -> Self {
        AvatarSpec {
            output_filename: "default.png".to_string(),
            initials: "User".to_string(),
            background_color: parse_color("#cccccc"),
            text_color: parse_color("white"),
        }
    }
}

const DEFAULT_ROLE: &str = "Family";
const REQUIRED_COLUMNS: [&str; 2] = ["Name", "Image_Filename"];

/// One row of the people table
#[derive(Debug, Deserialize)]
struct PersonRecord {
    #[serde(rename = "Name", default)]
    full_name: Option<String>,
    #[serde(rename = "Image_Filename", default)]
    source_image_name: Option<String>,
    #[serde(rename = "Role", default)]
    role: Option<String>,
}

/// First letter of each of the first two name tokens, uppercased.
pub fn initials_for(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Swap a lowercase `.jpg`/`.jpeg` extension for `.png`; anything else is left alone.
pub fn png_filename_for(image_filename: &str) -> String {
    [".jpg", ".jpeg"]
        .iter()
        .find_map(|ext| image_filename.strip_suffix(ext))
        .map(|stem| format!("{}.png", stem))
        .unwrap_or_else(|| image_filename.to_string())
}

fn spec_for(record: PersonRecord) -> Option<AvatarSpec> {
    let name = record.full_name.filter(|name| !name.is_empty())?;
    let image = record.source_image_name.filter(|image| !image.is_empty())?;
    let role = record.role.unwrap_or_else(|| DEFAULT_ROLE.to_string());
    let (background_color, text_color) = colors_for_role(&role);

    Some(AvatarSpec {
        output_filename: png_filename_for(&image),
        initials: initials_for(&name),
        background_color,
        text_color,
    })
}

/// Parse a people table from any reader, followed by the default avatar.
pub fn read_avatar_specs_from<R: Read>(reader: R) -> Result<Vec<AvatarSpec>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read table header")?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            anyhow::bail!("Missing required column '{}'", column);
        }
    }

    let mut specs = Vec::new();
    for (index, row) in reader.deserialize::<PersonRecord>().enumerate() {
        let record = row.with_context(|| format!("Failed to parse row {}", index + 1))?;
        match spec_for(record) {
            Some(spec) => specs.push(spec),
            None => tracing::debug!(row = index + 1, "Skipping row without name or image filename"),
        }
    }

    specs.push(AvatarSpec::default_avatar());
    Ok(specs)
}

/// Read the people table at `path`, failing if it cannot be opened or parsed.
pub fn read_avatar_specs(path: &Path) -> Result<Vec<AvatarSpec>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open people table {}", path.display()))?;
    read_avatar_specs_from(file)
}

/// Read the people table at `path`, degrading to just the default avatar on any failure.
pub fn load_avatar_specs(path: &Path) -> Vec<AvatarSpec> {
    match read_avatar_specs(path) {
        Ok(specs) => specs,
        Err(e) => {
            tracing::warn!("Error reading CSV: {:#}", e);
            vec![AvatarSpec::default_avatar()]
        }
    }
}
