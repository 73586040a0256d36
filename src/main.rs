mod core;
mod decoder;
mod error;
mod renderer;
mod shared;
mod sync;
mod utils;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::core::{play_batch, Overrides, Settings};
use crate::renderer::RenderMode;
use crate::sync::CancellationToken;

/// Show images and animations in the terminal with half-block characters.
#[derive(Parser)]
#[command(name = "icat", author, version, about, long_about = None)]
struct Cli {
    /// Column to start each image at (1-based)
    #[arg(short = 'x', long)]
    column: Option<u32>,
    /// Row to draw the image at (1-based, single file only)
    #[arg(short = 'y', long)]
    row: Option<u32>,
    /// Force the width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Force the height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Keep the original size instead of fitting the terminal width
    #[arg(short, long)]
    keep: bool,
    /// Color codes to emit
    #[arg(short, long, value_enum)]
    mode: Option<RenderMode>,
    /// Config file to read instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a debug log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,
    /// Images or videos to show, `-` for stdin
    #[arg(required_unless_present = "print_config")]
    files: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            column: self.column,
            row: self.row,
            width: self.width,
            height: self.height,
            keep_size: self.keep,
            mode: self.mode,
            log_file: self.log_file.clone(),
        }
    }
}

fn init_logger(path: &Path) -> Result<()> {
    utils::logger::init(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Settings::load(cli.config.as_deref())?;
    let mut settings = loaded.settings;
    settings.apply_overrides(&cli.overrides());

    if cli.print_config {
        let dump = serde_json::json!({
            "settings": settings,
            "terminal_columns": renderer::geometry::terminal_columns(),
            "config_path": cli.config.clone().or_else(core::settings::default_config_path),
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    if let Some(path) = &settings.log_file {
        init_logger(path)?;
    }
    for key in &loaded.unknown_keys {
        utils::logger::info(&format!("ignoring unknown config key `{}`", key));
    }
    utils::logger::info(&format!("settings: {:?}", settings));

    let cancel = CancellationToken::new();
    cancel
        .install_interrupt_handler()
        .context("failed to install Ctrl-C handler")?;

    let out = BufWriter::new(io::stdout());
    let report = play_batch(&cli.files, &settings, &cancel, out)?;

    if report.failed > 0 {
        bail!(
            "{} of {} files could not be shown",
            report.failed,
            cli.files.len()
        );
    }
    Ok(())
}
