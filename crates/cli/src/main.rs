mod inputs;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipforge_core::{
    load_config, validate_config, Config, Dispatcher, FfmpegRunner, JobEventKind, JobId, JobSpec,
    PresetCatalog,
};

use inputs::{batch_output_dir, collect_inputs};

#[derive(Parser)]
#[command(name = "clipforge")]
#[command(author, version, about = "Batch video transcoding with ffmpeg presets")]
struct Cli {
    /// Input video file, or a folder to transcode in batch
    #[arg(required_unless_present = "list_presets")]
    input: Option<PathBuf>,

    /// Preset tag, e.g. "Remove Audio" (see --list-presets)
    #[arg(short, long, required_unless_present = "list_presets")]
    preset: Option<String>,

    /// Output file (single-file mode) or output folder (batch mode).
    /// Batch mode defaults to a sibling folder named "<folder> <preset>"
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum simultaneous encodes, overrides the config file
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = PresetCatalog::new();
    if cli.list_presets {
        for preset in catalog.all() {
            println!("{}", preset.tag());
        }
        return Ok(());
    }

    // Both are enforced by clap when not listing presets
    let input = cli.input.context("an input path is required")?;
    let preset_tag = cli.preset.context("a preset (-p) is required")?;

    let preset = catalog.resolve(&preset_tag).with_context(|| {
        format!("unknown preset {preset_tag:?}, see --list-presets for valid tags")
    })?;

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(jobs) = cli.jobs {
        config.dispatcher.max_concurrent_jobs = jobs;
    }
    validate_config(&config).context("Configuration validation failed")?;

    let specs = build_specs(&input, cli.output, preset.tag())?;
    let total = specs.len();
    let names: HashMap<JobId, String> = specs
        .iter()
        .map(|s| (s.id, s.input_path.display().to_string()))
        .collect();

    info!(
        jobs = total,
        max_concurrent = config.dispatcher.max_concurrent_jobs,
        preset = %preset,
        "starting batch"
    );

    let (sink, mut events) = clipforge_core::ChannelSink::channel();
    let dispatcher = Dispatcher::new(
        config.dispatcher.clone(),
        FfmpegRunner::new(config.runner.clone()),
        Arc::new(sink),
    );

    for spec in specs {
        let name = names[&spec.id].clone();
        dispatcher
            .submit(spec)
            .await
            .with_context(|| format!("failed to submit {name}"))?;
    }
    dispatcher.shutdown();

    let mut terminals = 0;
    let mut failed = 0u64;
    while terminals < total {
        let Some(event) = events.recv().await else {
            bail!("event stream ended with {terminals} of {total} jobs finished");
        };
        let name = names
            .get(&event.job_id)
            .map(String::as_str)
            .unwrap_or("unknown");
        match event.kind {
            JobEventKind::Queued => debug!(job = name, "queued"),
            JobEventKind::Running => info!(job = name, "encoding"),
            JobEventKind::Progress { fraction, message } => {
                debug!(job = name, progress = format!("{:.0}%", fraction * 100.0), %message);
            }
            JobEventKind::Completed => {
                terminals += 1;
                info!(job = name, "done");
            }
            JobEventKind::Failed { reason } => {
                terminals += 1;
                failed += 1;
                warn!(job = name, %reason, "failed");
            }
        }
    }

    let completed = total as u64 - failed;
    info!(completed, failed, "batch finished");
    if failed > 0 {
        bail!("{failed} of {total} jobs failed");
    }
    Ok(())
}

/// Loads an explicit config file, falls back to ./config.toml if present,
/// otherwise uses defaults. Environment overrides apply in the first two
/// cases through the loader.
fn load_config_or_default(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let default = std::path::Path::new("config.toml");
            if default.exists() {
                load_config(default).context("Failed to load config.toml")
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Expands the input into one spec per file.
///
/// A folder input becomes a batch over its supported video files, writing
/// into the output folder (created if needed). A file input needs an
/// explicit output path.
fn build_specs(input: &std::path::Path, output: Option<PathBuf>, tag: &str) -> Result<Vec<JobSpec>> {
    if input.is_dir() {
        let files = collect_inputs(input)
            .with_context(|| format!("failed to list {}", input.display()))?;
        if files.is_empty() {
            bail!("no supported video files in {}", input.display());
        }
        let out_dir = output.unwrap_or_else(|| batch_output_dir(input, tag));
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        files
            .into_iter()
            .map(|file| {
                let name = file
                    .file_name()
                    .with_context(|| format!("{} has no file name", file.display()))?;
                let out = out_dir.join(name);
                Ok(JobSpec::new(file, out, tag))
            })
            .collect()
    } else {
        let output =
            output.context("an output path (-o) is required when the input is a single file")?;
        Ok(vec![JobSpec::new(input, output, tag)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_build_specs_single_file_requires_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        File::create(&input).unwrap();

        let result = build_specs(&input, None, "Remove Audio");
        assert!(result.is_err());

        let out = dir.path().join("out.mp4");
        let specs = build_specs(&input, Some(out.clone()), "Remove Audio").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].input_path, input);
        assert_eq!(specs[0].output_path, out);
        assert_eq!(specs[0].preset_tag, "Remove Audio");
    }

    #[test]
    fn test_build_specs_folder_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let videos = dir.path().join("videos");
        fs::create_dir(&videos).unwrap();
        File::create(videos.join("a.mp4")).unwrap();
        File::create(videos.join("b.mkv")).unwrap();
        File::create(videos.join("skip.txt")).unwrap();

        let specs = build_specs(&videos, None, "Remove Audio").unwrap();
        assert_eq!(specs.len(), 2);

        let out_dir = dir.path().join("videos Remove Audio");
        assert!(out_dir.is_dir());
        for spec in &specs {
            assert!(spec.output_path.starts_with(&out_dir));
            assert_eq!(
                spec.output_path.file_name(),
                spec.input_path.file_name()
            );
        }
    }

    #[test]
    fn test_build_specs_empty_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_specs(dir.path(), None, "Remove Audio");
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from([
            "clipforge",
            "/videos",
            "--preset",
            "Remove Audio",
            "-j",
            "2",
        ]);
        assert_eq!(cli.input.unwrap(), PathBuf::from("/videos"));
        assert_eq!(cli.preset.unwrap(), "Remove Audio");
        assert_eq!(cli.jobs, Some(2));
    }

    #[test]
    fn test_cli_list_presets_needs_no_input() {
        let cli = Cli::parse_from(["clipforge", "--list-presets"]);
        assert!(cli.list_presets);
        assert!(cli.input.is_none());
    }
}
