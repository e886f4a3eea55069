use anyhow::Result;
use avatar_generator_lib::{generate_avatars, AvatarConfig};
use image::Rgba;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const FIXTURE_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans-Bold.ttf");

struct GeneratorArgs {
    people_csv: String,
    output_dir: String,
    fonts: Vec<String>,
}

impl AvatarConfig for GeneratorArgs {
    fn people_csv(&self) -> &str {
        &self.people_csv
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn font_paths(&self) -> &[String] {
        &self.fonts
    }
}

fn args_for(dir: &Path, fonts: Vec<String>) -> GeneratorArgs {
    GeneratorArgs {
        people_csv: dir.join("data/people.csv").to_string_lossy().to_string(),
        output_dir: dir.join("img").to_string_lossy().to_string(),
        fonts,
    }
}

fn output_files(dir: &str) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir)? {
        names.insert(entry?.file_name().to_string_lossy().to_string());
    }
    Ok(names)
}

#[test]
fn test_generate_from_table() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir_all(temp_dir.path().join("data"))?;
    fs::write(
        temp_dir.path().join("data/people.csv"),
        "Name,Image_Filename,Role\n\
         Grace Hopper,grace.jpg,Matriarch\n\
         Alan Turing,alan.jpeg,Patriarch\n\
         ,skipped.jpg,Son\n",
    )?;
    let args = args_for(temp_dir.path(), vec!["/nonexistent/font.ttf".to_string()]);

    let written = generate_avatars(&args)?;

    assert_eq!(written.len(), 3);
    assert!(written[2].ends_with("default.png"));

    // Every output file corresponds to a table row or the default avatar
    let expected: HashSet<String> = ["grace.png", "alan.png", "default.png"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(output_files(&args.output_dir)?, expected);

    let grace = image::open(Path::new(&args.output_dir).join("grace.png"))?.to_rgba8();
    assert_eq!(grace.dimensions(), (200, 200));
    assert_eq!(*grace.get_pixel(100, 1), Rgba([0xc2, 0x18, 0x5b, 255]));
    assert_eq!(grace.get_pixel(0, 0)[3], 0);

    Ok(())
}

#[test]
fn test_missing_table_produces_only_default() -> Result<()> {
    let temp_dir = tempdir()?;
    let args = args_for(temp_dir.path(), vec!["/nonexistent/font.ttf".to_string()]);

    let written = generate_avatars(&args)?;

    assert_eq!(written.len(), 1);
    assert_eq!(output_files(&args.output_dir)?, HashSet::from(["default.png".to_string()]));

    let default = image::open(&written[0])?.to_rgba8();
    assert_eq!(*default.get_pixel(100, 1), Rgba([0xcc, 0xcc, 0xcc, 255]));
    assert!(default.pixels().any(|p| *p == Rgba([255, 255, 255, 255])), "Expected white text");

    Ok(())
}

#[test]
fn test_output_is_deterministic() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir_all(temp_dir.path().join("data"))?;
    fs::write(
        temp_dir.path().join("data/people.csv"),
        "Name,Image_Filename,Role\nGrace Hopper,grace.jpg,Matriarch\n",
    )?;
    let args = args_for(temp_dir.path(), vec![FIXTURE_FONT.to_string()]);

    let first = generate_avatars(&args)?;
    let first_bytes = first.iter().map(fs::read).collect::<std::io::Result<Vec<_>>>()?;

    let second = generate_avatars(&args)?;
    let second_bytes = second.iter().map(fs::read).collect::<std::io::Result<Vec<_>>>()?;

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);

    for path in &first {
        let avatar = image::open(path)?.to_rgba8();
        assert_eq!(avatar.dimensions(), (200, 200));
        assert!(avatar.pixels().all(|p| p[3] == 0 || p[3] == 255));
    }
    Ok(())
}

#[test]
fn test_unwritable_output_dir_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    // A regular file where the output directory should be
    let blocker = temp_dir.path().join("img");
    fs::write(&blocker, "not a directory")?;
    let args = args_for(temp_dir.path(), Vec::new());

    assert!(generate_avatars(&args).is_err());
    Ok(())
}
