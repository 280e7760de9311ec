use clap::{Parser, Subcommand};
use recent_image::config::{self, Overrides};
use recent_image::{BatchedImage, Selector, descriptor, output, select};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recent-image")]
#[command(about = "Load the Nth most recently modified image in a folder")]
#[command(long_about = "\
Load the Nth most recently modified image in a folder

Files are matched by extension (lowercase or UPPERCASE), ordered newest
first by modification time, and the one at --index is decoded into a
float RGB buffer and an inverted alpha mask (0 = opaque, 1 = transparent).

  --index 0   most recent
  --index 1   second most recent
  ...

Settings can come from a TOML file (--config); flags override the file.
Run 'recent-image gen-config' to print a documented config.")]
#[command(version)]
struct Cli {
    /// TOML config file with directory / extensions / index
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder to pick images from
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Comma-separated extensions [default: jpg,jpeg,png,bmp,tiff,tif,webp]
    #[arg(long, global = true)]
    extensions: Option<String>,

    /// Recency rank, 0 = most recent [default: 0]
    #[arg(long, global = true)]
    index: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the selected image and print a summary
    Select {
        /// Write the normalized RGB buffer as an 8-bit PNG
        #[arg(long)]
        save_rgb: Option<PathBuf>,
        /// Write the mask as an 8-bit grayscale PNG (white = 1.0)
        #[arg(long)]
        save_mask: Option<PathBuf>,
        /// Print tensor shapes as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Report whether select would succeed, and why not
    Check,
    /// Print the change token (modification time of the selected file, or NaN)
    Token,
    /// Print the input/output descriptor as JSON
    Describe,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        directory: cli.dir.clone(),
        extensions: cli.extensions.clone(),
        index: cli.index,
    };

    match cli.command {
        Command::Select {
            save_rgb,
            save_mask,
            json,
        } => {
            let config = config::resolve_config(cli.config.as_deref(), &overrides)?;
            let decoded = Selector::new().select(&config.to_request())?;

            if let Some(path) = &save_rgb {
                to_rgb8(decoded.rgb()).save(path)?;
            }
            if let Some(path) = &save_mask {
                to_luma8(decoded.mask()).save(path)?;
            }

            if json {
                let batch = BatchedImage::from(decoded);
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                for line in output::format_selection(config.index, &decoded) {
                    println!("{}", line);
                }
            }
        }
        Command::Check => {
            let config = config::resolve_config(cli.config.as_deref(), &overrides)?;
            let validation = Selector::new().validate(&config.to_request());
            println!("{}", output::format_validation(&validation));
            if !validation.is_ok() {
                std::process::exit(1);
            }
        }
        Command::Token => {
            let config = config::resolve_config(cli.config.as_deref(), &overrides)?;
            let token = select::change_token(&config.to_request());
            println!("{}", output::format_token(token));
        }
        Command::Describe => {
            println!("{}", serde_json::to_string_pretty(&descriptor())?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Quantize a `[0, 1]` float RGB buffer back to 8 bits for saving.
fn to_rgb8(rgb: &image::Rgb32FImage) -> image::RgbImage {
    image::RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        image::Rgb(rgb.get_pixel(x, y).0.map(quantize))
    })
}

fn to_luma8(mask: &recent_image::imaging::Mask) -> image::GrayImage {
    image::GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        image::Luma([quantize(mask.get_pixel(x, y)[0])])
    })
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
