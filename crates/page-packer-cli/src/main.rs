mod pdf;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use page_packer_core::config::{PageConfig, A4, LETTER};
use page_packer_core::pipeline::{pack_images, ImageInput};
use serde::Deserialize;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "page-packer",
    about = "Pack a folder of images onto fixed-size PDF pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images and write a PDF
    Pack(PackArgs),
    /// Layout-only: compute placements and export JSON (no PDF)
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output PDF path
    #[arg(short, long, default_value = "packed.pdf", help_heading = "Input/Output")]
    output: PathBuf,
    /// YAML config file path (overrides layout-related options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Page geometry (points; 72 points = 1 inch)
    /// Page preset: a4 | letter (overridden by explicit width/height)
    #[arg(long, help_heading = "Page")]
    page_size: Option<String>,
    /// Page width
    #[arg(long, help_heading = "Page")]
    page_width: Option<f64>,
    /// Page height
    #[arg(long, help_heading = "Page")]
    page_height: Option<f64>,
    /// Uniform margin on all four sides
    #[arg(long, default_value_t = 72.0, help_heading = "Page")]
    margin: f64,
    /// Horizontal gap between neighboring images
    #[arg(long, default_value_t = 14.4, help_heading = "Page")]
    gutter_x: f64,
    /// Vertical gap between shelves
    #[arg(long, default_value_t = 14.4, help_heading = "Page")]
    gutter_y: f64,

    // Sizing
    /// Cap on a placed image's width
    #[arg(long, default_value_t = 144.0, help_heading = "Sizing")]
    max_rect_width: f64,
    /// Cap on a placed image's height
    #[arg(long, default_value_t = 144.0, help_heading = "Sizing")]
    max_rect_height: f64,
    /// Pixels with alpha <= this value count as transparent when trimming
    #[arg(long, default_value_t = 0, help_heading = "Sizing")]
    alpha_threshold: u8,

    // Export
    /// Export the placement list (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_layout: Option<PathBuf>,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run(args, false, cli.progress && !cli.quiet),
        Commands::Layout(args) => run(args, true, false),
    }
}

fn run(args: &PackArgs, layout_only: bool, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(args)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&args.input, &args.include, &args.exclude)?;
    let (inputs, images) = load_inputs_with_progress(&paths, show_progress);
    info!(count = inputs.len(), "loaded input images");

    let result = pack_images(inputs, &cfg)?;
    let stats = result.stats(&cfg);
    info!(
        pages = stats.page_count,
        placed = stats.placed,
        occupancy = %format!("{:.2}%", stats.occupancy * 100.0),
        "packed"
    );
    for diag in &result.diagnostics {
        warn!(id = %diag.id, reason = ?diag.reason, "diagnostic");
    }

    if layout_only {
        let json = serde_json::to_string_pretty(&result)?;
        match &args.export_layout {
            Some(path) => {
                fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
                info!(?path, pages = result.page_count, "layout written");
            }
            None => println!("{}", json),
        }
    } else {
        if let Some(path) = &args.export_layout {
            if !args.dry_run {
                let json = serde_json::to_string_pretty(&result)?;
                fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
                info!(?path, "layout written");
            }
        }
        if !args.dry_run {
            pdf::write_pdf(&result, &images, &cfg, &args.output)?;
        }
    }

    if let Some(stats_path) = &args.export_stats {
        let value = serde_json::json!({
            "pages": stats.page_count,
            "placed": stats.placed,
            "clamped": stats.clamped,
            "dropped": stats.dropped,
            "used_area": stats.used_area,
            "page_area": stats.page_area,
            "occupancy": stats.occupancy,
        });
        if !args.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn build_config(args: &PackArgs) -> anyhow::Result<PageConfig> {
    let (preset_w, preset_h) = match args.page_size.as_deref() {
        None => A4,
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "a4" => A4,
            "letter" => LETTER,
            other => anyhow::bail!("unknown page size: {}", other),
        },
    };
    let mut cfg = PageConfig {
        page_width: args.page_width.unwrap_or(preset_w),
        page_height: args.page_height.unwrap_or(preset_h),
        margin_top: args.margin,
        margin_bottom: args.margin,
        margin_left: args.margin,
        margin_right: args.margin,
        gutter_x: args.gutter_x,
        gutter_y: args.gutter_y,
        max_rect_width: args.max_rect_width,
        max_rect_height: args.max_rect_height,
        alpha_threshold: args.alpha_threshold,
    };
    if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let overlay: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = overlay.into_page_config(cfg);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    list.sort();
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Loads every path, absorbing per-file decode failures as placeholder
/// inputs so one broken file never aborts the batch.
fn load_inputs_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> (Vec<ImageInput>, HashMap<String, DynamicImage>) {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut inputs = Vec::with_capacity(paths.len());
    let mut images = HashMap::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        let key = p.to_string_lossy().replace('\\', "/");
        match load_image(p) {
            Ok(img) => {
                images.insert(key.clone(), img.clone());
                inputs.push(ImageInput::decoded(key, img));
            }
            Err(e) => {
                warn!(?p, error = %e, "decode failed; packing placeholder");
                inputs.push(ImageInput::failed(key, e));
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    (inputs, images)
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    page_width: Option<f64>,
    page_height: Option<f64>,
    margin_top: Option<f64>,
    margin_bottom: Option<f64>,
    margin_left: Option<f64>,
    margin_right: Option<f64>,
    gutter_x: Option<f64>,
    gutter_y: Option<f64>,
    max_rect_width: Option<f64>,
    max_rect_height: Option<f64>,
    alpha_threshold: Option<u8>,
}

impl YamlConfig {
    fn into_page_config(self, mut cfg: PageConfig) -> PageConfig {
        if let Some(v) = self.page_width {
            cfg.page_width = v;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = v;
        }
        if let Some(v) = self.margin_top {
            cfg.margin_top = v;
        }
        if let Some(v) = self.margin_bottom {
            cfg.margin_bottom = v;
        }
        if let Some(v) = self.margin_left {
            cfg.margin_left = v;
        }
        if let Some(v) = self.margin_right {
            cfg.margin_right = v;
        }
        if let Some(v) = self.gutter_x {
            cfg.gutter_x = v;
        }
        if let Some(v) = self.gutter_y {
            cfg.gutter_y = v;
        }
        if let Some(v) = self.max_rect_width {
            cfg.max_rect_width = v;
        }
        if let Some(v) = self.max_rect_height {
            cfg.max_rect_height = v;
        }
        if let Some(v) = self.alpha_threshold {
            cfg.alpha_threshold = v;
        }
        cfg
    }
}
