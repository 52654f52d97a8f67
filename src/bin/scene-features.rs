use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde_json::json;
use scene_features::{
    BatchOptions, BatchReport, FeatureOptions, FlowPointRow, FrameQualityRow, ProgressCallback,
    ProgressInfo, VideoAnalysis, VideoInput, VideoSummary, analyze_video, validate_tables,
};

const CLI_AFTER_HELP: &str = "Examples:\n  scene-features analyze clip.quality.json --flow clip.flow.json --json\n  scene-features analyze clip.quality.json --summary --remove-transitions\n  scene-features validate clip.quality.json --flow clip.flow.json\n  scene-features batch tables/ --out features.json --progress\n  scene-features completions zsh > _scene-features";

const QUALITY_SUFFIX: &str = ".quality.json";
const FLOW_SUFFIX: &str = ".flow.json";

#[derive(Debug, Parser)]
#[command(
    name = "scene-features",
    version,
    about = "Compute per-scene features from frame quality and optical-flow tables",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,

    /// Desired worker thread count (requires the `rayon` feature).
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Extraction thresholds shared by `analyze` and `batch`.
#[derive(Debug, Args, Clone)]
struct FeatureArgs {
    /// Flow distance in pixels above which a point counts as moving.
    #[arg(long, default_value_t = 1.0)]
    motion_threshold: f64,

    /// Ignore moving points near scene edges when classifying motion.
    #[arg(long)]
    remove_transitions: bool,

    /// Seconds ignored at each scene edge with --remove-transitions.
    #[arg(long, default_value_t = 1.0)]
    transition_buffer: f64,

    /// Frames with blur below this value are blurry.
    #[arg(long, default_value_t = 100.0)]
    blur_threshold: f64,

    /// Number of dominant hue bins reported per scene.
    #[arg(long, default_value_t = 10)]
    top_colors: usize,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 480)]
    frame_width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 360)]
    frame_height: u32,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract features for one video.
    #[command(
        about = "Extract scene features for one video",
        after_help = "Examples:\n  scene-features analyze clip.quality.json --flow clip.flow.json\n  scene-features analyze clip.quality.json --json --summary --out clip.features.json"
    )]
    Analyze {
        /// Quality table (JSON array of frame rows).
        quality: PathBuf,
        /// Flow table (JSON array of flow-point rows).
        #[arg(long)]
        flow: Option<PathBuf>,
        /// Video identifier. Defaults to the quality file name.
        #[arg(long)]
        video_id: Option<String>,
        /// Output the feature table as JSON.
        #[arg(long)]
        json: bool,
        /// Include the video-level summary.
        #[arg(long)]
        summary: bool,
        /// Write output to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        features: FeatureArgs,
    },

    /// Validate input tables and print a report.
    #[command(
        about = "Validate input tables",
        after_help = "Examples:\n  scene-features validate clip.quality.json --flow clip.flow.json"
    )]
    Validate {
        /// Quality table (JSON array of frame rows).
        quality: PathBuf,
        /// Flow table (JSON array of flow-point rows).
        #[arg(long)]
        flow: Option<PathBuf>,
    },

    /// Extract features for every video in a directory.
    #[command(
        about = "Extract scene features for a directory of videos",
        after_help = "Every `<id>.quality.json` in the directory is one video; a matching\n`<id>.flow.json` is used when present.\n\nExamples:\n  scene-features batch tables/ --out features.json --progress"
    )]
    Batch {
        /// Directory holding `<id>.quality.json` and `<id>.flow.json` files.
        dir: PathBuf,
        /// Write the JSON report to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        features: FeatureArgs,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn feature_options(args: &FeatureArgs) -> FeatureOptions {
    FeatureOptions::new()
        .with_motion_threshold(args.motion_threshold)
        .with_remove_transitions(args.remove_transitions)
        .with_transition_buffer_seconds(args.transition_buffer)
        .with_blur_threshold(args.blur_threshold)
        .with_top_color_count(args.top_colors)
        .with_frame_size(args.frame_width, args.frame_height)
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    let rows = serde_json::from_str(&contents)
        .map_err(|error| format!("cannot parse {}: {error}", path.display()))?;
    Ok(rows)
}

fn read_flow(path: Option<&Path>) -> Result<Vec<FlowPointRow>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => read_table(path),
        None => Ok(Vec::new()),
    }
}

/// `clip.quality.json` -> `clip`; any other file name -> its stem.
fn video_id_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    match name.strip_suffix(QUALITY_SUFFIX) {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => path.file_stem()?.to_str().map(str::to_string),
    }
}

/// Find `<id>.quality.json` files in `dir`, sorted by id, with their
/// optional flow companions.
fn discover_videos(
    dir: &Path,
) -> Result<Vec<(String, PathBuf, Option<PathBuf>)>, Box<dyn std::error::Error>> {
    let mut videos = Vec::new();
    for entry in fs::read_dir(dir)
        .map_err(|error| format!("cannot read directory {}: {error}", dir.display()))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(id) = name.strip_suffix(QUALITY_SUFFIX) else {
            continue;
        };
        if id.is_empty() {
            continue;
        }
        let flow = dir.join(format!("{id}{FLOW_SUFFIX}"));
        let flow = flow.is_file().then_some(flow);
        videos.push((id.to_string(), path.clone(), flow));
    }
    videos.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(videos)
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.3}"),
        None => "-".to_string(),
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn emit(
    contents: &str,
    out: Option<&Path>,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match out {
        Some(path) => {
            ensure_writable_path(path, overwrite)?;
            fs::write(path, contents)?;
            eprintln!("{} {}", "saved".green().bold(), path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn apply_global_options(global: &GlobalOptions) {
    if let Some(threads) = global.threads {
        #[cfg(feature = "rayon")]
        if threads > 0 {
            unsafe {
                std::env::set_var("RAYON_NUM_THREADS", threads.to_string());
            }
        }

        #[cfg(not(feature = "rayon"))]
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("--threads {threads} requires building with the `rayon` feature").yellow()
        );
    }
}

struct BarProgress {
    bar: ProgressBar,
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.current);
        if let Some(video) = &info.current_video {
            self.bar.set_message(video.clone());
        }
    }
}

fn analysis_json(analysis: &VideoAnalysis, with_summary: bool) -> serde_json::Value {
    let failures: Vec<String> = analysis.failures.iter().map(ToString::to_string).collect();
    let mut payload = json!({
        "video_id": analysis.table.video_id,
        "scene_count": analysis.scene_count,
        "scenes": analysis.table.rows,
        "failures": failures,
    });
    if with_summary {
        payload["summary"] = json!(VideoSummary::from_table(&analysis.table));
    }
    payload
}

fn batch_json(report: &BatchReport) -> serde_json::Value {
    let videos: Vec<serde_json::Value> = report
        .videos
        .iter()
        .map(|analysis| analysis_json(analysis, true))
        .collect();
    let rejected: Vec<serde_json::Value> = report
        .rejected
        .iter()
        .map(|rejection| {
            json!({
                "video_id": rejection.video_id,
                "error": rejection.error.to_string(),
            })
        })
        .collect();
    json!({ "videos": videos, "rejected": rejected })
}

fn analysis_text(analysis: &VideoAnalysis, with_summary: bool) -> String {
    let mut lines = vec![format!(
        "{} {} ({} scene(s))",
        "video".cyan().bold(),
        analysis.table.video_id,
        analysis.scene_count
    )];

    for row in analysis.table.iter() {
        let features = &row.features;
        let kind = if features.is_static {
            "static".normal()
        } else {
            "action".magenta()
        };
        lines.push(format!(
            "  scene {:>3} [{}, {}) {} {:.2}s  blur {:.1}  flow p50 {}  shake {:.3}  colors {}",
            row.scene_index,
            row.begin_frame,
            row.end_frame,
            kind,
            features.duration,
            features.average_blur,
            format_optional(features.flow_percentile_50),
            features.shake_coefficient,
            features.top_colors.iter().take(3).cloned().collect::<Vec<_>>().join(","),
        ));
    }

    for failure in &analysis.failures {
        lines.push(format!("  {} {failure}", "failed".red().bold()));
    }

    if with_summary {
        let summary = VideoSummary::from_table(&analysis.table);
        lines.push(format!(
            "{} {} static / {} action, action time {}",
            "summary".cyan().bold(),
            summary.static_scene_count,
            summary.action_scene_count,
            format_optional(summary.action_time_fraction),
        ));
        if let Some(action) = &summary.action {
            lines.push(format!(
                "  saturation {}  value {}  shake {}  blur {}",
                format_optional(action.average_saturation),
                format_optional(action.average_value),
                format_optional(action.shake_weighted),
                format_optional(action.blur_weighted),
            ));
        }
    }

    lines.join("\n")
}

fn run_batch(inputs: &[VideoInput], options: &BatchOptions) -> BatchReport {
    #[cfg(feature = "rayon")]
    {
        scene_features::analyze_batch_parallel(inputs, options)
    }
    #[cfg(not(feature = "rayon"))]
    {
        scene_features::analyze_batch(inputs, options)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    apply_global_options(&cli.global);

    match cli.command {
        Commands::Analyze {
            quality,
            flow,
            video_id,
            json,
            summary,
            out,
            features,
        } => {
            let video_id = video_id
                .or_else(|| video_id_from_path(&quality))
                .ok_or("cannot derive a video id; pass --video-id")?;
            let quality_rows: Vec<FrameQualityRow> = read_table(&quality)?;
            let flow_rows = read_flow(flow.as_deref())?;

            let analysis = analyze_video(&video_id, &quality_rows, &flow_rows, &feature_options(&features))?;
            let contents = if json {
                serde_json::to_string_pretty(&analysis_json(&analysis, summary))?
            } else {
                analysis_text(&analysis, summary)
            };
            emit(&contents, out.as_deref(), cli.global.overwrite)?;

            if !analysis.is_complete() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!(
                        "{} of {} scene(s) could not be extracted",
                        analysis.failures.len(),
                        analysis.scene_count
                    )
                    .yellow()
                );
            }
        }
        Commands::Validate { quality, flow } => {
            let quality_rows: Vec<FrameQualityRow> = read_table(&quality)?;
            let flow_rows = read_flow(flow.as_deref())?;
            let report = validate_tables(&quality_rows, &flow_rows);
            print!("{report}");
            if report.is_valid() {
                println!("{}", "valid".green().bold());
            } else {
                return Err(format!("{} validation error(s)", report.errors.len()).into());
            }
        }
        Commands::Batch { dir, out, features } => {
            let discovered = discover_videos(&dir)?;
            if discovered.is_empty() {
                return Err(format!("no *{QUALITY_SUFFIX} files in {}", dir.display()).into());
            }

            let mut inputs = Vec::with_capacity(discovered.len());
            for (video_id, quality, flow) in discovered {
                if cli.global.verbose {
                    eprintln!("loading {video_id}");
                }
                inputs.push(VideoInput {
                    video_id,
                    quality: read_table(&quality)?,
                    flow: read_flow(flow.as_deref())?,
                });
            }

            let mut options = BatchOptions::new().with_features(feature_options(&features));
            let progress_bar = if cli.global.progress {
                let pb = ProgressBar::new(inputs.len() as u64);
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?;
                pb.set_style(style.progress_chars("##-"));
                options = options.with_progress(Arc::new(BarProgress { bar: pb.clone() }));
                Some(pb)
            } else {
                None
            };

            let report = run_batch(&inputs, &options);

            if let Some(pb) = progress_bar {
                pb.finish_with_message("done");
            }

            emit(
                &serde_json::to_string_pretty(&batch_json(&report))?,
                out.as_deref(),
                cli.global.overwrite,
            )?;

            let scene_rows = report.rows().count();
            let scene_failures = report.scene_failures().count();
            eprintln!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{} video(s), {scene_rows} scene(s), {scene_failures} failed scene(s), {} rejected video(s)",
                    report.videos.len(),
                    report.rejected.len()
                )
                .green()
            );
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "scene-features", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
