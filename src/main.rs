use clap::{Parser, Subcommand};
use photo_orient::image_loader;
use photo_orient::orientation::describe;
use photo_orient::{Error, OrientationResult, StageConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(
    name = "photo-orient",
    version,
    about = "Detect and fix EXIF orientation of uploaded photos"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the stored orientation of each image
    Detect {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
        /// Files or directories (scanned recursively)
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Write upright copies of JPEG images
    Fix {
        #[arg(long, short = 'o')]
        out_dir: PathBuf,
        /// Stage configuration JSON (exportQuality is used)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a Path,
    orientation: OrientationResult,
    rotation: i32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Detect { json, paths } => run_detect(&paths, json),
        Commands::Fix {
            out_dir,
            config,
            paths,
        } => run_fix(&paths, &out_dir, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn collect(args: &[String]) -> Vec<PathBuf> {
    let paths = image_loader::collect_paths(args);
    if paths.is_empty() {
        eprintln!("Error: no supported image files found");
        process::exit(1);
    }
    paths
}

fn run_detect(args: &[String], json: bool) -> Result<(), Error> {
    let mut failed = false;
    for path in collect(args) {
        let orientation = match image_loader::detect_file_orientation(&path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
                continue;
            }
        };
        let rotation = orientation.rotation().degrees();
        if json {
            let report = Report {
                path: &path,
                orientation,
                rotation,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "{} | {} | rotate {}",
                path.display(),
                describe(orientation),
                rotation
            );
        }
    }
    if failed {
        process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "jpeg")]
fn run_fix(args: &[String], out_dir: &Path, config: Option<&Path>) -> Result<(), Error> {
    use photo_orient::fix::{self, FixPlan, FixPlanner};

    let config = match config {
        Some(path) => StageConfig::from_json_file(path)?,
        None => StageConfig::default(),
    };
    std::fs::create_dir_all(out_dir).map_err(|e| Error::Write {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    let mut planner = FixPlanner::new(out_dir);
    let mut failed = false;
    for path in collect(args) {
        let result = planner.plan(&path).and_then(|plan| match plan {
            FixPlan::NotJpeg => Ok(None),
            FixPlan::Write {
                target,
                data,
                orientation,
            } => {
                fix::write_upright(&target, &data, config.export_quality)?;
                Ok(Some((target, orientation)))
            }
        });
        match result {
            Ok(Some((target, orientation))) => {
                log::info!(
                    "{} -> {} ({})",
                    path.display(),
                    target.display(),
                    describe(orientation)
                );
                println!("{} | rotate {}", target.display(), orientation.rotation().degrees());
            }
            Ok(None) => log::warn!("skipping {}: not a JPEG", path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
    Ok(())
}

#[cfg(not(feature = "jpeg"))]
fn run_fix(_args: &[String], _out_dir: &Path, config: Option<&Path>) -> Result<(), Error> {
    if let Some(path) = config {
        StageConfig::from_json_file(path)?;
    }
    Err(Error::Unsupported("JPEG encoding (build with --features jpeg)"))
}
