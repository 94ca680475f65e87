//! Command-line interface for the scan label pipeline.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ViewerMode;
use crate::processors::pipeline;
use crate::visualization::{self, PlotViewer, Viewer};
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "scan-label-pipeline")]
#[command(about = "Convert annotated scans into labelled PLY point clouds", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every scan file into per-scan and global PLY clouds (default).
    ///
    /// The global cloud is then shown with the configured viewer. The default
    /// plot viewer writes a PNG and returns; `viewer.mode: command` (or setting
    /// `viewer.program`) opens an interactive program and waits until it exits.
    Convert {
        /// Directory containing scan files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory for PLY files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the viewer after conversion
        #[arg(long)]
        no_view: bool,
    },

    /// Print the label groups of a scan directory without writing clouds
    Groups {
        /// Directory containing scan files
        directory: PathBuf,
    },

    /// Open an existing PLY file with the configured viewer
    View {
        /// Input PLY file
        ply_file: PathBuf,
        /// Output PNG path for the plot viewer (defaults to the PLY path with .png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            let head: String = value.chars().take(36).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        None => cmd_convert(config, None, None, false),
        Some(Commands::Convert {
            input,
            output,
            no_view,
        }) => cmd_convert(config, input, output, no_view),
        Some(Commands::Groups { directory }) => cmd_groups(&directory, &config),
        Some(Commands::View { ply_file, output }) => cmd_view(&ply_file, output, &config),
    }
}

fn cmd_convert(
    mut config: PipelineConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    no_view: bool,
) {
    let start = Instant::now();

    if let Some(input) = input {
        config.input.directory = input;
    }
    if let Some(output) = output {
        config.output.directory = output;
    }
    if no_view {
        config.viewer.mode = Some(ViewerMode::None);
    }

    let viewer = match visualization::viewer_from_config(&config) {
        Ok(v) => v,
        Err(e) => {
            error!("Invalid viewer configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Input: {}", config.input.directory.display());
    println!("Output: {}", config.output.directory.display());

    let spinner = create_spinner("Converting scans...");
    let clearing = viewer.as_deref().map(|inner| ClearingViewer {
        spinner: &spinner,
        inner,
    });
    let result = pipeline::run(&config, clearing.as_ref().map(|v| v as &dyn Viewer));
    spinner.finish_and_clear();

    let summary = match result {
        Ok(s) => s,
        Err(e) => {
            error!("Conversion failed: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut items = vec![
        ("Input directory", config.input.directory.display().to_string()),
        ("Output directory", config.output.directory.display().to_string()),
        ("Scans converted", summary.scans.len().to_string()),
        ("Global points", summary.global_points.to_string()),
        ("Global classes", summary.global_classes.len().to_string()),
        ("Global cloud", summary.global_output.display().to_string()),
    ];
    if let Some(report) = &summary.groups_report {
        items.push(("Label groups", report.display().to_string()));
    }
    items.push(("Duration", format!("{:.2?}", start.elapsed())));
    print_summary("Conversion Complete", &items);
}

/// Clears the progress spinner before the viewer takes over the terminal.
struct ClearingViewer<'a> {
    spinner: &'a ProgressBar,
    inner: &'a dyn Viewer,
}

impl Viewer for ClearingViewer<'_> {
    fn show(&self, ply_path: &Path) -> visualization::Result<()> {
        self.spinner.finish_and_clear();
        self.inner.show(ply_path)
    }
}

fn cmd_groups(directory: &Path, config: &PipelineConfig) {
    let start = Instant::now();

    let spinner = create_spinner("Reading scan labels...");
    let labels = match pipeline::inspect_labels(
        directory,
        &config.input.record_separator,
        config.input.sort_files,
    ) {
        Ok(l) => l,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Failed to read labels: {:#}", e);
            std::process::exit(1);
        }
    };
    spinner.finish_and_clear();

    for (key, members) in labels.groups.iter() {
        let key = if key.is_empty() { "<empty>" } else { key };
        println!("{}", key);
        for member in members {
            println!("    {}", member);
        }
    }
    println!();
    for (code, class) in labels.encoded.classes.iter().enumerate() {
        println!("{:>4}  {}", code, class);
    }

    print_summary(
        "Label Groups",
        &[
            ("Directory", directory.display().to_string()),
            ("Labelled points", labels.encoded.codes.len().to_string()),
            ("Groups", labels.groups.len().to_string()),
            ("Classes", labels.encoded.num_classes().to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
}

fn cmd_view(ply_file: &Path, output: Option<PathBuf>, config: &PipelineConfig) {
    // An explicit view request always shows something, so `none` falls back to a plot.
    let viewer: Box<dyn Viewer> = match config.viewer.effective_mode() {
        ViewerMode::Plot | ViewerMode::None => Box::new(PlotViewer {
            image_path: output,
            max_points: config.viewer.max_points,
            alpha: config.viewer.alpha,
            color_by: config.viewer.color_by,
        }),
        ViewerMode::Command => match visualization::viewer_from_config(config) {
            Ok(Some(v)) => v,
            Ok(None) => {
                error!("No viewer configured");
                std::process::exit(1);
            }
            Err(e) => {
                error!("Invalid viewer configuration: {}", e);
                std::process::exit(1);
            }
        },
    };

    info!("Opening {}", ply_file.display());
    if let Err(e) = viewer.show(ply_file) {
        error!("Viewer failed: {}", e);
        std::process::exit(1);
    }
    println!("Viewed {}", ply_file.display());
}
