//! gridbit CLI - sample an image through a grid and save the result as a bitmap

use clap::Parser;
use gridbit::export::{self, PathTarget, EXPORT_FILENAME};
use gridbit::{host, overlay, Extractor, GeometryState, GridError, Vec2};
use log::{info, warn};
use std::path::PathBuf;

fn parse_pair(s: &str) -> Result<Vec2, String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = a.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = b.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Vec2::new(x, y))
}

#[derive(Parser)]
#[command(name = "gridbit", about = "Extract monochrome pixel art by sampling an image through a grid")]
struct Args {
    /// Input image file (png, jpeg or bmp)
    input: PathBuf,
    /// Grid origin in image pixels, e.g. "3.5,2"
    #[arg(long, default_value = "0,0", value_parser = parse_pair)]
    origin: Vec2,
    /// Cell size in image pixels, e.g. "8,8" (each side at least 1)
    #[arg(short, long, default_value = "8,8", value_parser = parse_pair)]
    cell: Vec2,
    /// Display scale (1-10); each sampled pixel is saved as scale x scale
    #[arg(short, long, default_value = "2")]
    scale: f64,
    /// A cell is on when any channel mean is above this value
    #[arg(short, long, default_value = "127")]
    threshold: u8,
    /// Swap on and off pixels
    #[arg(short, long)]
    invert: bool,
    /// Bitmap output file or directory
    #[arg(short, long, default_value = EXPORT_FILENAME)]
    output: PathBuf,
    /// Also write the magnified source with the grid drawn on it (PNG)
    #[arg(long)]
    overlay: Option<PathBuf>,
    /// Print the sampled pixels as text
    #[arg(short, long)]
    print: bool,
    /// Print a JSON summary of the run
    #[arg(long)]
    json: bool,
    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), GridError> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let geometry = GeometryState::new(args.origin, args.cell, args.scale);
    let extractor = Extractor::new(geometry)
        .with_threshold(args.threshold)
        .with_invert(args.invert);

    let source = host::decode(&std::fs::read(&args.input)?)?;
    info!("loaded {} ({}x{})", args.input.display(), source.width(), source.height());

    if let Some(path) = &args.overlay {
        overlay::render_preview(&source, extractor.geometry()).save(path)?;
    }

    let image = image::DynamicImage::ImageRgba8(source);
    let binary = extractor.extract(&image);

    let mut target = PathTarget::new(&args.output);
    let saved = export::export(&binary, extractor.geometry().pixel_scale(), &mut target)?;
    if !saved {
        warn!("grid does not cover the image, nothing saved");
    }

    if args.print {
        print!("{}", binary.to_text());
    }

    if args.json {
        let summary = serde_json::json!({
            "input": args.input.display().to_string(),
            "geometry": extractor.geometry(),
            "source": { "width": image.width(), "height": image.height() },
            "output": { "width": binary.width(), "height": binary.height(), "on": binary.count_on() },
            "saved": saved.then(|| target.resolve(EXPORT_FILENAME).display().to_string()),
        });
        println!("{summary:#}");
    }

    Ok(())
}
