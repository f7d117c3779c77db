//! kwcurate CLI: mix spoken-word recordings with background noise into a
//! keyword-spotting training set.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use kwcurate_core::types::BitDepth;
use kwcurate_core::{CurateConfig, CurationSummary, MixParams};

// ─── CLI ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "kwcurate",
    about = "Audio mixing tool that combines spoken word examples with random \
             bits of background noise to create a dataset for keyword spotting training",
    version,
)]
struct Cli {
    /// Target words, separated by commas
    #[arg(short, long)]
    targets: String,

    /// Number of mixed samples per output category
    #[arg(short, long, default_value_t = 1500,
          value_parser = clap::value_parser!(u64).range(1..))]
    num_samples: u64,

    /// Relative volume to multiply each word by
    #[arg(short, long, default_value_t = 1.0)]
    word_vol: f64,

    /// Relative volume to multiply each background noise by
    #[arg(short = 'g', long, default_value_t = 0.1)]
    bg_vol: f64,

    /// Duration of each output clip in seconds
    #[arg(short, long, default_value_t = 1.0)]
    sample_time: f64,

    /// Sample rate of each output clip in Hz
    #[arg(short = 'r', long, default_value_t = 16000,
          value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: u32,

    /// Bit depth of each sample
    #[arg(short = 'e', long, default_value = "PCM_16", value_parser = BitDepth::NAMES.to_vec())]
    bit_depth: String,

    /// Directory with the background noise recordings
    #[arg(short, long)]
    bg_dir: PathBuf,

    /// Directory for the mixed clips (deleted and recreated)
    #[arg(short, long)]
    out_dir: PathBuf,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Delete an existing output directory without asking
    #[arg(short = 'y', long, default_value_t = false)]
    yes: bool,

    /// Write a JSON manifest of every generated clip to this path
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Source directories, each divided into one subdirectory per word
    #[arg(required = true, value_name = "DIR")]
    in_dirs: Vec<PathBuf>,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    print_banner();

    let bit_depth: BitDepth = cli
        .bit_depth
        .parse()
        .map_err(anyhow::Error::msg)?;

    let config = CurateConfig {
        targets: cli.targets,
        num_samples: cli.num_samples as usize,
        params: MixParams {
            word_vol: cli.word_vol,
            noise_vol: cli.bg_vol,
            sample_time: cli.sample_time,
            sample_rate: cli.sample_rate,
            bit_depth,
        },
        noise_dir: cli.bg_dir,
        out_dir: cli.out_dir,
        input_dirs: cli.in_dirs,
        seed: cli.seed,
    };

    let assume_yes = cli.yes;
    let summary = kwcurate_core::process(&config, |out_dir| {
        assume_yes || confirm_delete(out_dir)
    })?;

    if let Some(path) = &cli.manifest {
        write_manifest(path, &summary)?;
    }

    for category in &summary.categories {
        println!(
            "{:>12}: {} clip(s) from {} source file(s)",
            category.name,
            category.clips_written(),
            category.source_count
        );
    }
    println!("Done!");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────

fn print_banner() {
    let rule = "-".repeat(71);
    println!("{}", rule);
    println!("Keyword Dataset Curation Tool");
    println!("v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", rule);
}

/// Ask before deleting an existing output directory.
fn confirm_delete(out_dir: &Path) -> bool {
    println!("WARNING: Output directory already exists:");
    println!("{}", out_dir.display());
    println!("This tool will delete the output directory and everything in it.");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    match query_yes_no("Continue?", &mut input, &mut std::io::stdout()) {
        Ok(answer) => {
            if !answer {
                println!("Please delete directory to continue. Exiting.");
            }
            answer
        }
        Err(e) => {
            log::error!("Failed to read answer: {:#}", e);
            false
        }
    }
}

/// Prompt until the answer is yes or no. An empty answer or end of input
/// counts as no.
fn query_yes_no<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> Result<bool> {
    loop {
        write!(out, "{} [y/N] ", question)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read from stdin")? == 0 {
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "y" | "ye" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => writeln!(out, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}

fn write_manifest(path: &Path, summary: &CurationSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
    log::info!("Wrote manifest {}", path.display());
    Ok(())
}
