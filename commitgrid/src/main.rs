// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the commitgrid binary.
//!
//! The CLI renders configured job files, one-off heatmaps and banners, and
//! prints calendar statistics as JSON.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
    time::Duration
};

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use commitgrid::{
    CalendarSummary, ColorScheme, ContributionSource, Error, FileSource, GitHubSource, JobEntry,
    JobReport, PngEntry, Preset, RasterCapability, RenderJob, load_jobs, normalize_job,
    output_io_error, run_job, summarize, today_utc
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface for rendering contribution heatmaps.
#[derive(Debug, Parser)]
#[command(
    name = "commitgrid",
    version,
    about = "Render GitHub contribution calendars as SVG heatmaps and banners"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// GitHub personal access token.
    #[arg(long = "token", env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Enable debug logging.
    #[arg(long = "verbose", short = 'v', action = ArgAction::SetTrue, global = true)]
    verbose: bool
}

#[derive(Debug, Subcommand)]
/// Supported commands exposed by the CLI.
enum Command {
    /// Render every job of a YAML configuration file.
    Render(RenderArgs),
    /// Render a single heatmap or banner.
    Generate(GenerateArgs),
    /// Print calendar statistics as JSON.
    Stats(StatsArgs),
    /// Save a calendar as JSON for offline renders.
    Fetch(FetchArgs),
    /// List the built-in presets and color schemes.
    Presets
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Path to the YAML configuration file describing render jobs.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf
}

/// Date window shared by the commands that fetch a calendar.
#[derive(Debug, Args, Default)]
struct WindowArgs {
    /// First day of the window (YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD). Defaults to today.
    #[arg(long = "to", value_name = "DATE")]
    to: Option<NaiveDate>,

    /// Read a saved calendar instead of calling the GitHub API.
    #[arg(long = "calendar", value_name = "PATH")]
    calendar: Option<PathBuf>
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    /// Preset name.
    #[arg(long = "preset", default_value = "standard")]
    preset: Preset,

    /// Color scheme name.
    #[arg(long = "theme", default_value = "light")]
    theme: ColorScheme,

    /// Destination of the SVG document.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write a PNG to this path.
    #[arg(long = "png", value_name = "PATH")]
    png: Option<PathBuf>,

    /// Scale factor applied to the PNG.
    #[arg(long = "scale", requires = "png")]
    scale: Option<f32>,

    /// Name shown in the title or banner heading.
    #[arg(long = "display-name", value_name = "NAME")]
    display_name: Option<String>,

    #[command(flatten)]
    window: WindowArgs
}

#[derive(Debug, Args)]
struct StatsArgs {
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,

    #[command(flatten)]
    window: WindowArgs
}

#[derive(Debug, Args)]
struct FetchArgs {
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    /// Destination of the calendar JSON.
    #[arg(long = "output", value_name = "PATH")]
    output: PathBuf,

    #[command(flatten)]
    window: WindowArgs
}

/// JSON document printed by the `stats` command.
#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    login:          &'a str,
    from:           NaiveDate,
    to:             NaiveDate,
    reported_total: u32,
    totals_agree:   bool,
    statistics:     &'a commitgrid::Statistics
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("{}", error.to_display_string());
        if let Some(hint) = hint_for(&error) {
            eprintln!("hint: {hint}");
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into())
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from configuration loading, fetching and
/// serialization.
async fn run(cli: Cli) -> Result<(), Error> {
    let token = cli.token.as_deref();
    match cli.command {
        Command::Render(args) => run_render(args, token).await,
        Command::Generate(args) => run_generate(args, token).await,
        Command::Stats(args) => run_stats(args, token).await,
        Command::Fetch(args) => run_fetch(args, token).await,
        Command::Presets => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_presets(&mut handle)
        }
    }
}

async fn run_render(args: RenderArgs, token: Option<&str>) -> Result<(), Error> {
    let jobs = load_jobs(&args.config)?;
    let raster = RasterCapability::detect();
    info!("Loaded {} jobs from {}", jobs.len(), args.config.display());

    let mut written = 0;
    for job in &jobs {
        let report = execute(job, token, &raster).await?;
        if report.svg_written {
            written += 1;
        }
    }

    info!("Rendered {written} of {} jobs", jobs.len());
    Ok(())
}

async fn run_generate(args: GenerateArgs, token: Option<&str>) -> Result<(), Error> {
    let job = generate_job(&args, today_utc())?;
    let raster = RasterCapability::detect();
    let report = execute(&job, token, &raster).await?;

    if report.svg_written {
        println!("{}", report.svg_path.display());
    }
    if let (true, Some(path)) = (report.png_written, report.png_path.as_ref()) {
        println!("{}", path.display());
    }
    Ok(())
}

fn generate_job(args: &GenerateArgs, today: NaiveDate) -> Result<RenderJob, Error> {
    let entry = JobEntry {
        preset: Some(args.preset),
        theme: Some(args.theme),
        output: args.output.as_ref().map(|path| path.display().to_string()),
        display_name: args.display_name.clone(),
        from: args.window.from,
        to: args.window.to,
        calendar_file: args.window.calendar.as_ref().map(|path| path.display().to_string()),
        png: args.png.as_ref().map(|path| PngEntry {
            output: Some(path.display().to_string()),
            scale: args.scale,
            ..PngEntry::default()
        }),
        ..JobEntry::for_user(args.user.as_str())
    };
    normalize_job(&entry, today)
}

async fn run_stats(args: StatsArgs, token: Option<&str>) -> Result<(), Error> {
    let (job, summary) = fetch_summary(&args.user, &args.window, token).await?;
    let report = StatsReport {
        login:          &job.login,
        from:           job.from,
        to:             job.to,
        reported_total: summary.reported_total,
        totals_agree:   summary.totals_agree(),
        statistics:     &summary.statistics
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &report, args.pretty)
}

async fn run_fetch(args: FetchArgs, token: Option<&str>) -> Result<(), Error> {
    let job = window_job(&args.user, &args.window)?;
    let calendar = fetch_calendar(&job, token).await?;

    let json = serde_json::to_string_pretty(&calendar)?;
    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| output_io_error(parent, source))?;
    }
    fs::write(&args.output, json).map_err(|source| output_io_error(&args.output, source))?;
    println!("{}", args.output.display());
    Ok(())
}

async fn fetch_summary(
    user: &str,
    window: &WindowArgs,
    token: Option<&str>
) -> Result<(RenderJob, CalendarSummary), Error> {
    let job = window_job(user, window)?;
    let calendar = fetch_calendar(&job, token).await?;
    let summary = summarize(&calendar);
    Ok((job, summary))
}

/// Normalizes a throwaway job so ad-hoc commands share validation and
/// window defaults with configured jobs.
fn window_job(user: &str, window: &WindowArgs) -> Result<RenderJob, Error> {
    let entry = JobEntry {
        from: window.from,
        to: window.to,
        calendar_file: window.calendar.as_ref().map(|path| path.display().to_string()),
        ..JobEntry::for_user(user)
    };
    normalize_job(&entry, today_utc())
}

async fn execute(
    job: &RenderJob,
    token: Option<&str>,
    raster: &RasterCapability
) -> Result<JobReport, Error> {
    let spinner = spinner(format!("Rendering {}...", job.slug));
    let result = match job.calendar_file.as_deref() {
        Some(path) => run_job(&FileSource::new(path), job, raster).await,
        None => run_job(&github_source(token)?, job, raster).await
    };
    match &result {
        Ok(_) => spinner.finish_with_message(format!("Rendered {}", job.slug)),
        Err(_) => spinner.abandon_with_message(format!("Failed to render {}", job.slug))
    }
    result
}

async fn fetch_calendar(
    job: &RenderJob,
    token: Option<&str>
) -> Result<commitgrid::Calendar, Error> {
    let spinner = spinner(format!("Fetching calendar for {}...", job.login));
    let result = match job.calendar_file.as_deref() {
        Some(path) => {
            FileSource::new(path)
                .fetch_calendar(&job.login, job.from, job.to)
                .await
        }
        None => {
            github_source(token)?
                .fetch_calendar(&job.login, job.from, job.to)
                .await
        }
    };
    spinner.finish_and_clear();
    result
}

fn github_source(token: Option<&str>) -> Result<GitHubSource, Error> {
    let token = token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            Error::validation("a GitHub token is required; pass --token or set GITHUB_TOKEN")
        })?;
    GitHubSource::new(token)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

fn write_json<W: io::Write, T: Serialize>(
    writer: &mut W,
    value: &T,
    pretty: bool
) -> Result<(), Error> {
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }

    Ok(())
}

fn write_presets<W: io::Write>(writer: &mut W) -> Result<(), Error> {
    let write = |writer: &mut W, line: String| {
        writeln!(writer, "{line}").map_err(|source| output_io_error(Path::new("-"), source))
    };

    write(writer, "Presets:".to_owned())?;
    for preset in Preset::ALL {
        write(writer, format!("  {:<16} {}", preset.name(), preset.description()))?;
    }
    write(writer, "Themes:".to_owned())?;
    for scheme in ColorScheme::ALL {
        write(writer, format!("  {}", scheme.name()))?;
    }
    Ok(())
}

/// Suggests a fix for well-known upstream failures.
fn hint_for(error: &Error) -> Option<&'static str> {
    let Error::Service {
        message
    } = error
    else {
        return None;
    };

    if message.contains("Bad credentials") {
        Some("the GitHub token was rejected; check GITHUB_TOKEN or --token")
    } else if message.contains("Could not resolve to a User") {
        Some("the login does not exist on GitHub; check --user or the job's user field")
    } else {
        None
    }
}
