use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use posekit_io::{convert_ply_to_obj_with_options, inspect_depth_image, ConvertOptions};
use tracing_subscriber::EnvFilter;

/// Data preparation tools for object pose estimation.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an ASCII PLY point cloud into an OBJ mesh plus MTL material.
    Convert {
        /// Source PLY file.
        src: PathBuf,
        /// Destination OBJ file. The MTL file is written next to it.
        dst: PathBuf,
        /// Optional JSON file with conversion options. Defaults are used if omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the conversion report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Report pixel layout and sample range of a depth image.
    DepthStats {
        /// Image file to inspect.
        image: PathBuf,
        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(path: Option<&Path>) -> Result<ConvertOptions> {
    let Some(path) = path else {
        return Ok(ConvertOptions::default());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let options: ConvertOptions = serde_json::from_str(&data)
        .with_context(|| format!("invalid options file {}", path.display()))?;
    tracing::debug!(?options, "Loaded conversion options");
    Ok(options)
}

fn run_convert(src: &Path, dst: &Path, config: Option<&Path>, json: bool) -> Result<String> {
    let options = load_options(config)?;
    let report = convert_ply_to_obj_with_options(src, dst, &options)
        .with_context(|| format!("failed to convert {}", src.display()))?;
    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    Ok(format!(
        "{}\n -> {}\n -> {}\nvertices: {}, faces: {}, dropped faces: {}, vertex colors: {}",
        report.source.display(),
        report.mesh.display(),
        report.material.display(),
        report.vertex_count,
        report.face_count,
        report.dropped_faces,
        report.has_color
    ))
}

fn run_depth_stats(image: &Path, json: bool) -> Result<String> {
    let stats = inspect_depth_image(image)
        .with_context(|| format!("failed to inspect {}", image.display()))?;
    if json {
        return Ok(serde_json::to_string_pretty(&stats)?);
    }
    Ok(format!(
        "size: {}x{}\nmode: {}\nsample type: {}\nmin: {} max: {}\nzero samples: {}",
        stats.width,
        stats.height,
        stats.color_type,
        stats.sample_type,
        stats.min,
        stats.max,
        stats.zero_samples
    ))
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = match &args.command {
        Command::Convert {
            src,
            dst,
            config,
            json,
        } => run_convert(src, dst, config.as_deref(), *json)?,
        Command::DepthStats { image, json } => run_depth_stats(image, *json)?,
    };
    println!("{output}");
    Ok(())
}
