mod reporter;
mod table;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kinopick_core::domain::{TitleIndex, Winner};
use kinopick_core::selection::SelectionPolicy;
use kinopick_core::services::PickService;
use kinopick_probe::FfmpegProbe;
use kinopick_scanner::WalkScanner;

use crate::reporter::ConsoleReporter;

/// Scans a movie library (one subdirectory per title) and keeps one file
/// per title: German audio first, highest video bitrate second.
#[derive(Debug, Parser)]
#[command(name = "kinopick", version, about)]
struct Cli {
  /// Root directory of the movie library.
  root: PathBuf,

  /// Where to write the winning paths, one per line.
  #[arg(long, default_value = "movies.txt")]
  list: PathBuf,

  /// Where to write the full title index for auditing.
  #[arg(long, default_value = "movies.json")]
  json: PathBuf,

  /// Skip writing the JSON index.
  #[arg(long)]
  no_json: bool,

  /// Accepted audio language tag (repeatable). Defaults to the German set.
  #[arg(long = "lang")]
  languages: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let cli = Cli::parse();

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("kinopick failed: {e:#}");
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  // --- Dependency injection phase ---

  // 1. Scanner adapter (filesystem walk, extension filter).
  let scanner = WalkScanner::from_config().context("load scanner configuration")?;

  // 2. Metadata adapter (FFmpeg).
  let probe = FfmpegProbe::default();

  // 3. Diagnostic sink (log lines, filterable via RUST_LOG).
  let reporter = ConsoleReporter::new();

  // 4. Service wiring.
  let service = PickService::new(scanner, probe, reporter);

  let policy = if cli.languages.is_empty() {
    SelectionPolicy::german()
  } else {
    SelectionPolicy::with_languages(&cli.languages)
  };

  let (index, winners) = service
    .run(&cli.root, &policy)
    .await
    .with_context(|| format!("scan failed for {}", cli.root.display()))?;

  if index.is_empty() {
    tracing::info!(root = %cli.root.display(), "no media files found, writing empty result");
  }

  print_duplicates(&index);
  print_winners(&winners);

  write_list(&cli.list, &winners).with_context(|| format!("write {}", cli.list.display()))?;

  if !cli.no_json {
    write_index_json(&cli.json, &index)
      .with_context(|| format!("write {}", cli.json.display()))?;
  }

  Ok(())
}

/// Titles backed by more than one file; these are the groups where the
/// selection policy actually had to decide something.
fn print_duplicates(index: &TitleIndex) {
  let rows: Vec<Vec<String>> = index
    .groups()
    .iter()
    .filter(|g| g.entries.len() > 1)
    .map(|g| vec![g.title.clone(), g.entries.len().to_string()])
    .collect();

  if rows.is_empty() {
    return;
  }

  println!("Titles with more than one file:");
  println!("{}", table::render(&["Title", "Files"], &rows));
}

fn print_winners(winners: &[Winner]) {
  if winners.is_empty() {
    return;
  }

  let rows: Vec<Vec<String>> = winners
    .iter()
    .map(|w| vec![w.title.clone(), format_bitrate(w.bitrate), w.path.display().to_string()])
    .collect();

  println!("Selected files:");
  println!("{}", table::render(&["Title", "Bitrate", "Path"], &rows));
}

fn format_bitrate(bits_per_sec: u64) -> String {
  if bits_per_sec == 0 {
    "unknown".to_owned()
  } else {
    format!("{} kb/s", bits_per_sec / 1000)
  }
}

fn write_list(path: &Path, winners: &[Winner]) -> std::io::Result<()> {
  let mut out = String::new();
  for winner in winners {
    out.push_str(&winner.path.display().to_string());
    out.push('\n');
  }

  kinopick_fs::atomic_write_str(path, &out)
}

fn write_index_json(path: &Path, index: &TitleIndex) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(index.groups())?;
  kinopick_fs::atomic_write_str(path, &json)?;
  Ok(())
}
