use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use gifwright::{
    CombineOptions, EncodeOptions, ExtractOptions, GifFile, LoopCount, OutputFormat,
    ProgressCallback, ProgressInfo, ReorderPolicy, ReverseOptions, SelectionPolicy,
    configuration::{DEFAULT_GIF_QUALITY, DEFAULT_IMAGE_QUALITY, DEFAULT_OUTPUT_DIRECTORY},
    validation::validate_quality,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  gifwright info input.gif --json\n  gifwright --output-dir frames extract input.gif --frames 1-5,10 --format jpg\n  gifwright reverse input.gif bounce.gif --mode ping-pong --forward 2 --backward 1\n  gifwright combine frames/frames.csv rebuilt.gif --duration 80\n  gifwright completions zsh > _gifwright";

#[derive(Debug, Parser)]
#[command(
    name = "gifwright",
    version,
    about = "Extract, reverse, and recombine GIF animation frames",
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
    /// Show debug logging output.
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(long)]
    quiet: bool,

    /// Show a progress bar where supported.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// Output quality, 1-100 (default 95 for images, 85 for GIFs).
    #[arg(long)]
    quality: Option<i64>,

    /// Directory for extracted frames.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print GIF metadata.
    #[command(
        about = "Print GIF metadata",
        after_help = "Examples:\n  gifwright info input.gif\n  gifwright info input.gif --json"
    )]
    Info {
        /// Input GIF path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a GIF and print a report.
    #[command(
        about = "Validate GIF file",
        after_help = "Examples:\n  gifwright validate input.gif"
    )]
    Validate {
        /// Input GIF path.
        input: PathBuf,
    },

    /// Extract frames to the output directory.
    #[command(
        about = "Extract frames as images",
        after_help = "Examples:\n  gifwright extract input.gif --every 5\n  gifwright --output-dir frames extract input.gif --range 10:40:2 --format jpg\n  gifwright extract input.gif --key-frames quarter_points"
    )]
    Extract {
        /// Input GIF path.
        input: PathBuf,
        /// 1-based frame numbers and ranges, e.g. "1-3,7".
        #[arg(long, conflicts_with_all = ["range", "every", "key_frames"])]
        frames: Option<String>,
        /// Zero-based START:END[:STEP], end exclusive.
        #[arg(long, conflicts_with_all = ["every", "key_frames"])]
        range: Option<String>,
        /// Extract every Nth frame.
        #[arg(long, conflicts_with = "key_frames")]
        every: Option<i64>,
        /// Key-frame method (first_last_middle, first_last, middle, quarter_points).
        #[arg(long)]
        key_frames: Option<String>,
        /// Output image format (png, jpg, bmp, tiff, webp, gif).
        #[arg(long, default_value = "png")]
        format: String,
        /// File name prefix.
        #[arg(long, default_value = "frame")]
        prefix: String,
        /// Skip writing frames.csv.
        #[arg(long)]
        no_manifest: bool,
        /// Save frames on multiple threads.
        #[cfg(feature = "rayon")]
        #[arg(long)]
        parallel: bool,
    },

    /// Write a reordered copy of a GIF.
    #[command(
        about = "Reverse or reorder a GIF",
        after_help = "Examples:\n  gifwright reverse input.gif reversed.gif\n  gifwright reverse input.gif bounce.gif --mode ping-pong\n  gifwright reverse input.gif out.gif --mode custom --pattern 0,2,4,2"
    )]
    Reverse {
        /// Input GIF path.
        input: PathBuf,
        /// Output GIF path.
        output: PathBuf,
        /// Reorder mode: reverse | ping-pong | custom.
        #[arg(long, default_value = "reverse")]
        mode: String,
        /// Forward passes for ping-pong.
        #[arg(long, default_value_t = 1)]
        forward: i64,
        /// Reverse passes for ping-pong.
        #[arg(long, default_value_t = 1)]
        backward: i64,
        /// Zero-based frame positions for custom mode, e.g. "0,1,2,1".
        #[arg(long)]
        pattern: Option<String>,
        /// Loop count for the output (0 = forever). Defaults to the source's.
        #[arg(long)]
        loop_count: Option<u16>,
        /// Fail instead of writing the original when the result is empty.
        #[arg(long)]
        no_fallback: bool,
    },

    /// Combine the images listed in a manifest into a GIF.
    #[command(
        about = "Combine frames into a GIF",
        after_help = "Examples:\n  gifwright combine frames/frames.csv rebuilt.gif\n  gifwright combine list.csv out.gif --duration 50"
    )]
    Combine {
        /// Manifest CSV path.
        manifest: PathBuf,
        /// Output GIF path.
        output: PathBuf,
        /// Frame duration in milliseconds for rows without one.
        #[arg(long, default_value_t = 100)]
        duration: u32,
        /// Loop count for the output (0 = forever).
        #[arg(long, default_value_t = 0)]
        loop_count: u16,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Build a selection policy from the mutually exclusive extract flags.
fn parse_selection(
    frames: Option<&str>,
    range: Option<&str>,
    every: Option<i64>,
    key_frames: Option<&str>,
) -> Result<SelectionPolicy, Box<dyn std::error::Error>> {
    let policy = match (frames, range, every, key_frames) {
        (Some(spec), _, _, _) => SelectionPolicy::explicit(spec)?,
        (_, Some(range), _, _) => parse_range(range)?,
        (_, _, Some(n), _) => SelectionPolicy::every_nth(n)?,
        (_, _, _, Some(method)) => SelectionPolicy::key_frames(method)?,
        _ => SelectionPolicy::All,
    };
    Ok(policy)
}

fn parse_range(value: &str) -> Result<SelectionPolicy, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    let (start, end, step): (i64, i64, i64) = match parts.as_slice() {
        [start, end] => (start.parse()?, end.parse()?, 1),
        [start, end, step] => (start.parse()?, end.parse()?, step.parse()?),
        _ => return Err(format!("invalid --range {value:?} (expected START:END[:STEP])").into()),
    };
    Ok(SelectionPolicy::range(start, end, step)?)
}

fn parse_reorder(
    mode: &str,
    forward: i64,
    backward: i64,
    pattern: Option<&str>,
) -> Result<ReorderPolicy, Box<dyn std::error::Error>> {
    match mode.to_ascii_lowercase().replace('_', "-").as_str() {
        "reverse" | "simple" => Ok(ReorderPolicy::Simple),
        "ping-pong" | "pingpong" => Ok(ReorderPolicy::ping_pong(forward, backward)?),
        "custom" => {
            let pattern = pattern.ok_or("--mode custom requires --pattern")?;
            Ok(ReorderPolicy::custom_from_str(pattern)?)
        }
        _ => Err(format!("unsupported --mode: {mode} (reverse|ping-pong|custom)").into()),
    }
}

fn resolve_quality(
    global: &GlobalOptions,
    default: u8,
) -> Result<u8, Box<dyn std::error::Error>> {
    match global.quality {
        Some(quality) => Ok(validate_quality(quality)?),
        None => Ok(default),
    }
}

fn init_logging(global: &GlobalOptions) {
    let level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
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

fn ensure_writable_directory(
    directory: &Path,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let occupied = directory.is_dir() && fs::read_dir(directory)?.next().is_some();
    if occupied {
        if !overwrite {
            return Err(format!(
                "output directory is not empty: {} (use --overwrite)",
                directory.display()
            )
            .into());
        }
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("writing into existing directory {}", directory.display()).yellow()
        );
    }
    Ok(())
}

/// Drives an indicatif bar from library progress callbacks.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(message: &'static str) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        bar.set_message(message);
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn progress_bar(
    global: &GlobalOptions,
    message: &'static str,
) -> Result<Option<Arc<TerminalProgress>>, Box<dyn std::error::Error>> {
    if global.progress {
        Ok(Some(Arc::new(TerminalProgress::new(message)?)))
    } else {
        Ok(None)
    }
}

fn success(message: String) {
    println!("{} {}", "success:".green().bold(), message.green());
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Commands::Info { input, json } => {
            let gif = GifFile::open(&input)?;
            let metadata = gif.metadata();
            if json {
                let loop_count = match metadata.loop_count {
                    LoopCount::Infinite => json!("infinite"),
                    LoopCount::Finite(n) => json!(n),
                };
                let payload = json!({
                    "path": gif.path().display().to_string(),
                    "width": metadata.width,
                    "height": metadata.height,
                    "frame_count": metadata.frame_count,
                    "is_animated": metadata.is_animated,
                    "loop_count": loop_count,
                    "duration_seconds": metadata.total_duration.as_secs_f64(),
                    "durations_ms": metadata.durations,
                    "file_size": metadata.file_size,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("File: {}", gif.path().display());
                println!("Size: {}x{}", metadata.width, metadata.height);
                println!(
                    "Frames: {}{}",
                    metadata.frame_count,
                    if metadata.is_animated { "" } else { " (static)" }
                );
                println!("Duration: {:.2}s", metadata.total_duration.as_secs_f64());
                println!("Loop: {}", metadata.loop_count);
                println!("File size: {} bytes", metadata.file_size);
            }
        }
        Commands::Validate { input } => {
            let gif = GifFile::open(&input)?;
            let report = gif.validate();
            print!("{report}");
            if !report.is_valid() {
                return Err(format!("{} failed validation", input.display()).into());
            }
        }
        Commands::Extract {
            input,
            frames,
            range,
            every,
            key_frames,
            format,
            prefix,
            no_manifest,
            #[cfg(feature = "rayon")]
            parallel,
        } => {
            let policy = parse_selection(
                frames.as_deref(),
                range.as_deref(),
                every,
                key_frames.as_deref(),
            )?;
            let format: OutputFormat = format.parse()?;
            let quality = resolve_quality(&cli.global, DEFAULT_IMAGE_QUALITY)?;
            let directory = cli
                .global
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY));
            ensure_writable_directory(&directory, cli.global.overwrite)?;

            let gif = GifFile::open(&input)?;
            let mut options = ExtractOptions::new()
                .with_format(format)
                .with_quality(quality)
                .with_prefix(prefix)
                .with_manifest(!no_manifest);
            let progress = progress_bar(&cli.global, "extracting")?;
            if let Some(progress) = &progress {
                options = options.with_progress(progress.clone());
            }

            #[cfg(feature = "rayon")]
            let report = if parallel {
                gif.extract_frames_parallel(&directory, &policy, &options)?
            } else {
                gif.extract_frames(&directory, &policy, &options)?
            };
            #[cfg(not(feature = "rayon"))]
            let report = gif.extract_frames(&directory, &policy, &options)?;

            if let Some(progress) = progress {
                progress.finish();
            }
            if cli.global.verbose {
                for (index, path) in report.indices.iter().zip(&report.paths) {
                    eprintln!("saved frame {index} -> {}", path.display());
                }
            }
            success(format!(
                "Extracted {} frame(s) to {}",
                report.len(),
                directory.display()
            ));
        }
        Commands::Reverse {
            input,
            output,
            mode,
            forward,
            backward,
            pattern,
            loop_count,
            no_fallback,
        } => {
            let policy = parse_reorder(&mode, forward, backward, pattern.as_deref())?;
            let quality = resolve_quality(&cli.global, DEFAULT_GIF_QUALITY)?;
            ensure_writable_path(&output, cli.global.overwrite)?;

            let gif = GifFile::open(&input)?;
            let mut encode = EncodeOptions::new().with_quality(quality);
            if let Some(count) = loop_count {
                encode = encode.with_repeat(LoopCount::from_count(count));
            }
            let mut options = ReverseOptions::new()
                .with_encode(encode)
                .with_fallback_to_original(!no_fallback);
            let progress = progress_bar(&cli.global, "encoding")?;
            if let Some(progress) = &progress {
                options = options.with_progress(progress.clone());
            }

            let report = gif.reverse(&output, &policy, &options)?;
            if let Some(progress) = progress {
                progress.finish();
            }
            if report.fell_back {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("{policy} produced no frames; wrote the original animation").yellow()
                );
            }
            success(format!(
                "Wrote {} frame(s) ({policy}) to {}",
                report.output_frame_count,
                report.output_path.display()
            ));
        }
        Commands::Combine {
            manifest,
            output,
            duration,
            loop_count,
        } => {
            let quality = resolve_quality(&cli.global, DEFAULT_GIF_QUALITY)?;
            ensure_writable_path(&output, cli.global.overwrite)?;

            let encode = EncodeOptions::new()
                .with_quality(quality)
                .with_repeat(LoopCount::from_count(loop_count));
            let mut options = CombineOptions::new()
                .with_encode(encode)
                .with_frame_duration(duration);
            let progress = progress_bar(&cli.global, "encoding")?;
            if let Some(progress) = &progress {
                options = options.with_progress(progress.clone());
            }

            let report = gifwright::combine_frames(&manifest, &output, &options)?;
            if let Some(progress) = progress {
                progress.finish();
            }
            if report.resized_frames > 0 {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!(
                        "resized {} frame(s) to {}x{}",
                        report.resized_frames, report.width, report.height
                    )
                    .yellow()
                );
            }
            success(format!(
                "Combined {} frame(s) into {}",
                report.frame_count,
                report.output_path.display()
            ));
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "gifwright", &mut std::io::stdout());
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
