use anyhow::Result;
use avatar_generator_lib::{generate_avatars, AvatarConfig, AVATAR_SIZE, DEFAULT_FONT_PATHS};
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with Name, Image_Filename and Role columns
    #[arg(long, env = "AVATAR_PEOPLE_CSV", default_value = "data/people.csv")]
    people_csv: String,

    /// Directory to write avatar images to
    #[arg(long, env = "AVATAR_OUTPUT_DIR", default_value = "img")]
    output_dir: String,

    /// Font files to try in order; the built-in font is used if none load
    #[arg(
        long = "font",
        env = "AVATAR_FONTS",
        value_delimiter = ',',
        default_values_t = DEFAULT_FONT_PATHS.map(String::from)
    )]
    fonts: Vec<String>,
}

impl AvatarConfig for Args {
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

fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args = Args::parse();
    tracing::debug!(?args, "Starting avatar generation");

    let written = generate_avatars(&args)?;

    println!("All avatar images created successfully!");
    println!(
        "{} images are {}x{} pixels with circular shape and transparent background",
        written.len(),
        AVATAR_SIZE,
        AVATAR_SIZE
    );

    Ok(())
}
