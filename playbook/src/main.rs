//! Offline diagram tool: renders a board backup to SVG/PNG and generates
//! the app icons.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pitch_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "playbook")]
#[command(about = "Render sideline board diagrams and app icons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a board backup to an SVG or PNG file
    Render {
        /// Backup JSON downloaded from the board
        backup: PathBuf,

        /// Output file; the extension picks the format (.svg or .png)
        out: PathBuf,

        /// Apply this saved formation before rendering
        #[arg(long)]
        formation: Option<String>,

        /// Canvas width in pixels
        #[arg(long, default_value_t = 900.0)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// Board config overrides (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the app icon as PNG
    Icon {
        /// Edge length in pixels
        size: u32,

        /// Output PNG path
        out: PathBuf,

        /// Pad the text for adaptive icon masks
        #[arg(long)]
        maskable: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Svg,
    Png,
}

fn output_format(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("svg") => Ok(Format::Svg),
        Some("png") => Ok(Format::Png),
        _ => bail!("unsupported output {}: use .svg or .png", path.display()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            Ok(Config::from_json(&text))
        }
        None => Ok(Config::default()),
    }
}

fn render(
    backup: &Path,
    out: &Path,
    formation: Option<&str>,
    (width, height): (f64, f64),
    config: Option<&Path>,
) -> Result<()> {
    if !(width > 0.0 && height > 0.0) {
        bail!("canvas size must be positive, got {width}x{height}");
    }
    let format = output_format(out)?;
    let cfg = load_config(config)?;
    let text = fs::read_to_string(backup)
        .with_context(|| format!("reading backup {}", backup.display()))?;
    let svg = playbook_core::backup_to_svg(&text, formation, width, height, &cfg)?;
    match format {
        Format::Svg => fs::write(out, svg)?,
        Format::Png => {
            let png = playbook_core::svg_to_png(&svg, playbook_core::system_fonts())?;
            fs::write(out, png)?;
        }
    }
    info!("wrote {}", out.display());
    Ok(())
}

fn icon(size: u32, out: &Path, maskable: bool) -> Result<()> {
    if size == 0 {
        bail!("icon size must be positive");
    }
    let png = playbook_core::app_icon_png(size, maskable, playbook_core::system_fonts())?;
    fs::write(out, png).with_context(|| format!("writing {}", out.display()))?;
    info!("wrote {size}px icon to {}", out.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            backup,
            out,
            formation,
            width,
            height,
            config,
        } => render(
            &backup,
            &out,
            formation.as_deref(),
            (width, height),
            config.as_deref(),
        ),
        Commands::Icon {
            size,
            out,
            maskable,
        } => icon(size, &out, maskable),
    }
}
