// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Transformation logic that converts raw job entries into normalized render
//! jobs.
//!
//! Normalization resolves defaults (preset, theme, date window, output
//! paths), validates every user-supplied value and resolves the preset into a
//! [`RenderPlan`] up front, so rendering itself never has to fail.

use std::{
    collections::HashSet,
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    sync::LazyLock
};

use chrono::{Duration, Months, NaiveDate, Utc};
use regex::Regex;
use tracing::debug;

use crate::{
    banner::{BannerText, IconGrid},
    config::{BannerEntry, JobEntry, JobsConfig, PngEntry},
    error::{self, Error},
    layout::LayoutOverrides,
    output::RasterOptions,
    palette::{ColorScheme, is_hex_color},
    presets::{Preset, RenderPlan}
};

/// Directory receiving rendered documents by default.
const DEFAULT_OUTPUT_DIR: &str = "output";
/// Days before `to` covered by the default window.
const DEFAULT_WINDOW_DAYS: i64 = 364;
/// Accepted range of `layout.cell_size`.
const CELL_SIZE_RANGE: RangeInclusive<u32> = 1..=64;
/// Largest accepted cell gap and corner radius.
const MAX_CELL_SPACING: u32 = 32;
/// Accepted range of `layout.font_size`.
const FONT_SIZE_RANGE: RangeInclusive<u32> = 1..=96;
/// Largest accepted padding on any side.
const MAX_PADDING: u32 = 1000;

static LOGIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,38})$").expect("login pattern is valid")
});

/// PNG destination and options of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct PngTarget {
    /// Destination of the PNG file.
    pub path:    PathBuf,
    /// Requested size and quality.
    pub options: RasterOptions
}

/// Normalized render job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// Slug identifying the job in logs and default file names.
    pub slug:          String,
    /// GitHub login whose calendar is rendered.
    pub login:         String,
    /// Preset the plan was resolved from.
    pub preset:        Preset,
    /// Color scheme the plan was resolved with.
    pub scheme:        ColorScheme,
    /// First day of the fetched window.
    pub from:          NaiveDate,
    /// Last day of the fetched window.
    pub to:            NaiveDate,
    /// Saved calendar used instead of the GitHub API.
    pub calendar_file: Option<PathBuf>,
    /// Destination of the SVG document.
    pub svg_path:      PathBuf,
    /// Optional PNG conversion.
    pub png:           Option<PngTarget>,
    /// Fully resolved rendering options.
    pub plan:          RenderPlan
}

/// Current UTC date, used as the default end of the window.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Loads jobs from the provided YAML configuration file path.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or an entry violates invariants during normalization.
pub fn load_jobs(path: &Path) -> Result<Vec<RenderJob>, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_jobs(&contents, today_utc())
}

/// Parses jobs from a YAML document string, resolving relative dates
/// against `today`.
///
/// # Errors
///
/// Propagates [`Error::Parse`] when the YAML cannot be decoded and
/// [`Error::Validation`] when entries are missing or invalid.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use commitgrid::{Preset, parse_jobs};
///
/// let today = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date");
/// let jobs = parse_jobs("jobs:\n  - user: octocat\n", today)?;
/// assert_eq!(jobs[0].preset, Preset::Standard);
/// assert_eq!(jobs[0].svg_path.to_str(), Some("output/octocat-standard.svg"));
/// assert_eq!(jobs[0].from, NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"));
/// # Ok::<(), commitgrid::Error>(())
/// ```
pub fn parse_jobs(contents: &str, today: NaiveDate) -> Result<Vec<RenderJob>, Error> {
    let config: JobsConfig = serde_yaml::from_str(contents)?;
    normalize_jobs(config, today)
}

/// Normalizes every entry of a configuration document.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the document has no jobs, an entry is
/// invalid, or two jobs write to the same path.
pub fn normalize_jobs(config: JobsConfig, today: NaiveDate) -> Result<Vec<RenderJob>, Error> {
    if config.jobs.is_empty() {
        return Err(Error::validation("configuration must define at least one job"));
    }

    let mut seen_paths = HashSet::new();
    let mut jobs = Vec::with_capacity(config.jobs.len());

    for entry in &config.jobs {
        let job = normalize_job(entry, today)?;

        let outputs = std::iter::once(&job.svg_path).chain(job.png.as_ref().map(|png| &png.path));
        for path in outputs {
            if !seen_paths.insert(path.clone()) {
                return Err(Error::validation(format!(
                    "duplicate output path '{}' detected",
                    path.display()
                )));
            }
        }

        jobs.push(job);
    }

    Ok(jobs)
}

/// Normalizes a single entry.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the login, date window, colors or
/// palette are invalid.
pub fn normalize_job(entry: &JobEntry, today: NaiveDate) -> Result<RenderJob, Error> {
    let login = entry.user.trim();
    validate_login(login)?;

    let (from, to) = resolve_window(entry.from, entry.to, today)?;
    let preset = entry.resolved_preset();
    let scheme = entry.theme.unwrap_or_default();
    let slug = entry.resolved_slug();

    let svg_path = non_empty(entry.output.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR).join(format!("{slug}.svg")));
    let png = entry.png.as_ref().map(|png| png_target(png, &svg_path));

    let plan = resolve_plan(entry, login, preset, scheme)?;
    debug!(slug = %slug, preset = %preset, scheme = %scheme, "normalized job");

    Ok(RenderJob {
        slug,
        login: login.to_owned(),
        preset,
        scheme,
        from,
        to,
        calendar_file: non_empty(entry.calendar_file.as_deref()).map(PathBuf::from),
        svg_path,
        png,
        plan
    })
}

/// Validates a GitHub login.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the login is empty, longer than 39
/// characters, or contains characters other than ASCII letters, digits and
/// hyphens.
pub fn validate_login(login: &str) -> Result<(), Error> {
    if LOGIN_PATTERN.is_match(login) {
        Ok(())
    } else {
        Err(Error::validation(format!("'{login}' is not a valid GitHub login")))
    }
}

fn resolve_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate
) -> Result<(NaiveDate, NaiveDate), Error> {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or(to - Duration::days(DEFAULT_WINDOW_DAYS));

    if from > to {
        return Err(Error::validation(format!(
            "window start {from} is after window end {to}"
        )));
    }
    // GitHub caps a query at one year measured from `from` 00:00 to `to` 23:59:59.
    if from
        .checked_add_months(Months::new(12))
        .is_some_and(|limit| to >= limit)
    {
        return Err(Error::validation(format!(
            "window {from}..{to} exceeds one year"
        )));
    }

    Ok((from, to))
}

fn png_target(entry: &PngEntry, svg_path: &Path) -> PngTarget {
    let path = non_empty(entry.output.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| svg_path.with_extension("png"));

    PngTarget {
        path,
        options: RasterOptions {
            quality: entry.quality,
            scale:   entry.scale,
            width:   entry.width,
            height:  entry.height
        }
    }
}

fn resolve_plan(
    entry: &JobEntry,
    login: &str,
    preset: Preset,
    scheme: ColorScheme
) -> Result<RenderPlan, Error> {
    let display_name = entry.resolved_display_name();
    let mut plan = preset.plan(scheme);

    if let Some(overrides) = entry.layout.as_ref() {
        for (field, color) in [
            ("background", overrides.background.as_deref()),
            ("text_color", overrides.text_color.as_deref()),
            ("muted_color", overrides.muted_color.as_deref())
        ] {
            if let Some(color) = color
                && !is_hex_color(color)
            {
                return Err(Error::validation(format!(
                    "layout.{field} '{color}' is not a hex color"
                )));
            }
        }

        validate_layout_bounds(overrides)?;

        let heatmap = plan.heatmap_mut();
        *heatmap = heatmap.clone().with_overrides(overrides)?;
    }

    if let Some(banner) = plan.banner_mut() {
        let defaults = BannerEntry::default();
        let text = entry.banner.as_ref().unwrap_or(&defaults);
        banner.text = banner_text(text, preset, login, display_name.as_deref());
        if let Some(icons) = text.icons.as_ref() {
            banner.icons = if icons.is_empty() {
                None
            } else {
                Some(IconGrid::new(icons.clone(), text.icon_columns.unwrap_or(3)))
            };
        } else if let (Some(grid), Some(columns)) = (banner.icons.as_mut(), text.icon_columns) {
            grid.columns = columns;
        }
    } else {
        plan.heatmap_mut().display_name = display_name;
    }

    Ok(plan)
}

fn validate_layout_bounds(overrides: &LayoutOverrides) -> Result<(), Error> {
    let padding = overrides.padding.unwrap_or_default();
    let checks = [
        ("cell_size", overrides.cell_size, CELL_SIZE_RANGE),
        ("cell_padding", overrides.cell_padding, 0..=MAX_CELL_SPACING),
        ("corner_radius", overrides.corner_radius, 0..=MAX_CELL_SPACING),
        ("font_size", overrides.font_size, FONT_SIZE_RANGE),
        ("padding.top", padding.top, 0..=MAX_PADDING),
        ("padding.right", padding.right, 0..=MAX_PADDING),
        ("padding.bottom", padding.bottom, 0..=MAX_PADDING),
        ("padding.left", padding.left, 0..=MAX_PADDING)
    ];

    for (field, value, range) in checks {
        if let Some(value) = value
            && !range.contains(&value)
        {
            return Err(Error::validation(format!(
                "layout.{field} must be between {} and {}, got {value}",
                range.start(),
                range.end()
            )));
        }
    }
    Ok(())
}

fn banner_text(
    entry: &BannerEntry,
    preset: Preset,
    login: &str,
    display_name: Option<&str>
) -> BannerText {
    let profile = preset.uses_profile_text();
    BannerText {
        handle:     entry
            .handle
            .clone()
            .or_else(|| profile.then(|| login.to_owned())),
        heading:    entry
            .heading
            .clone()
            .or_else(|| display_name.filter(|_| profile).map(str::to_owned)),
        subheading: entry.subheading.clone(),
        callout:    entry.callout.clone()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::banner::Icon;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
    }

    fn validation_message(error: Error) -> String {
        match error {
            Error::Validation {
                message
            } => message,
            other => panic!("unexpected error variant: {other:?}")
        }
    }

    #[test]
    fn defaults_are_resolved() {
        let jobs = parse_jobs("jobs:\n  - user: Octocat\n", today()).expect("valid jobs");
        let job = &jobs[0];

        assert_eq!(job.slug, "octocat-standard");
        assert_eq!(job.login, "Octocat");
        assert_eq!(job.scheme, ColorScheme::Light);
        assert_eq!(job.to, today());
        assert_eq!((job.to - job.from).num_days(), 364);
        assert_eq!(job.svg_path, PathBuf::from("output/octocat-standard.svg"));
        assert!(job.png.is_none());
        assert!(job.calendar_file.is_none());
    }

    #[test]
    fn empty_document_is_rejected() {
        let error = parse_jobs("jobs: []\n", today()).expect_err("expected validation error");
        assert_eq!(validation_message(error), "configuration must define at least one job");
    }

    #[test]
    fn invalid_logins_are_rejected() {
        let too_long = "a".repeat(40);
        for login in ["-octocat", "octo cat", "octo_cat", too_long.as_str()] {
            let error = validate_login(login).expect_err("expected validation error");
            assert!(validation_message(error).contains("not a valid GitHub login"));
        }
        assert!(validate_login("octo-cat-42").is_ok());
        assert!(validate_login(&"a".repeat(39)).is_ok());
    }

    #[test]
    fn reversed_window_is_rejected() {
        let yaml = "jobs:\n  - user: octocat\n    from: 2024-06-01\n    to: 2024-05-01\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).contains("is after window end"));
    }

    #[test]
    fn window_longer_than_a_year_is_rejected() {
        let yaml = "jobs:\n  - user: octocat\n    from: 2023-01-01\n    to: 2024-01-02\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).contains("exceeds one year"));

        let leap = "jobs:\n  - user: octocat\n    from: 2024-01-01\n    to: 2024-12-31\n";
        assert!(parse_jobs(leap, today()).is_ok());
    }

    #[test]
    fn window_reaching_the_same_date_next_year_is_rejected() {
        let yaml = "jobs:\n  - user: octocat\n    from: 2023-01-01\n    to: 2024-01-01\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).contains("exceeds one year"));

        let full_year = "jobs:\n  - user: octocat\n    from: 2023-01-01\n    to: 2023-12-31\n";
        assert!(parse_jobs(full_year, today()).is_ok());
    }

    #[test]
    fn oversized_layout_values_are_rejected() {
        let yaml = "jobs:\n  - user: octocat\n    layout:\n      cell_size: 4294967295\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert_eq!(
            validation_message(error),
            "layout.cell_size must be between 1 and 64, got 4294967295"
        );

        let yaml = "jobs:\n  - user: octocat\n    layout:\n      font_size: 4294967295\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).starts_with("layout.font_size"));

        let yaml = "jobs:\n  - user: octocat\n    layout:\n      padding:\n        right: 5000\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).starts_with("layout.padding.right"));

        let yaml = "jobs:\n  - user: octocat\n    layout:\n      cell_size: 0\n";
        assert!(parse_jobs(yaml, today()).is_err());
    }

    #[test]
    fn layout_values_at_the_bounds_render() {
        let yaml = r#"
jobs:
  - user: octocat
    layout:
      cell_size: 64
      cell_padding: 32
      corner_radius: 32
      font_size: 96
      padding:
        top: 1000
        right: 1000
        bottom: 1000
        left: 1000
"#;
        let jobs = parse_jobs(yaml, today()).expect("valid jobs");
        let calendar = crate::calendar::Calendar::from_daily_counts(today(), &[3; 371]);
        let svg = jobs[0].plan.render(&calendar);
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn duplicate_outputs_are_rejected() {
        let yaml = r#"
jobs:
  - user: octocat
    output: out/grid.svg
  - user: hubot
    output: out/grid.svg
"#;
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).contains("duplicate output path 'out/grid.svg'"));
    }

    #[test]
    fn png_path_defaults_next_to_svg() {
        let yaml = "jobs:\n  - user: octocat\n    output: out/grid.svg\n    png:\n      scale: 2\n";
        let jobs = parse_jobs(yaml, today()).expect("valid jobs");
        let png = jobs[0].png.as_ref().expect("png target");

        assert_eq!(png.path, PathBuf::from("out/grid.png"));
        assert_eq!(png.options.scale, Some(2.0));
    }

    #[test]
    fn png_colliding_with_another_svg_is_rejected() {
        let yaml = r#"
jobs:
  - user: octocat
    output: out/a.svg
    png:
      output: out/b.svg
  - user: hubot
    output: out/b.svg
"#;
        assert!(parse_jobs(yaml, today()).is_err());
    }

    #[test]
    fn short_palette_is_rejected() {
        let yaml = r##"
jobs:
  - user: octocat
    layout:
      palette: ["#000000", "#111111", "#222222", "#333333"]
"##;
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert_eq!(validation_message(error), "palette must contain exactly 5 colors, got 4");
    }

    #[test]
    fn non_hex_layout_color_is_rejected() {
        let yaml = "jobs:\n  - user: octocat\n    layout:\n      background: white\n";
        let error = parse_jobs(yaml, today()).expect_err("expected validation error");
        assert!(validation_message(error).contains("layout.background 'white'"));
    }

    #[test]
    fn layout_overrides_apply_on_top_of_preset() {
        let yaml = r#"
jobs:
  - user: octocat
    preset: compact
    display_name: The Octocat
    layout:
      cell_size: 14
      padding:
        left: 40
"#;
        let jobs = parse_jobs(yaml, today()).expect("valid jobs");
        let options = jobs[0].plan.heatmap();

        assert_eq!(options.cell_size, 14);
        assert_eq!(options.padding.left, 40);
        assert_eq!(options.padding.top, 12);
        assert_eq!(options.display_name.as_deref(), Some("The Octocat"));
    }

    #[test]
    fn text_banner_defaults_to_profile_text() {
        let yaml = "jobs:\n  - user: octocat\n    preset: banner\n    display_name: The Octocat\n";
        let mut jobs = parse_jobs(yaml, today()).expect("valid jobs");
        let banner = jobs[0].plan.banner_mut().expect("banner plan");

        assert_eq!(banner.text.handle.as_deref(), Some("octocat"));
        assert_eq!(banner.text.heading.as_deref(), Some("The Octocat"));
        assert_eq!(banner.text.subheading, None);
    }

    #[test]
    fn grid_banner_has_no_default_text() {
        let yaml = "jobs:\n  - user: octocat\n    preset: banner-grid\n    display_name: Octo\n";
        let mut jobs = parse_jobs(yaml, today()).expect("valid jobs");
        let banner = jobs[0].plan.banner_mut().expect("banner plan");

        assert_eq!(banner.text, BannerText::default());
    }

    #[test]
    fn banner_icons_replace_preset_grid() {
        let yaml = r#"
jobs:
  - user: octocat
    preset: banner-showcase
    banner:
      callout: "Rust\nOpen source"
      icons: [star, heart]
      icon_columns: 1
  - user: hubot
    preset: banner-showcase
    banner:
      icons: []
"#;
        let mut jobs = parse_jobs(yaml, today()).expect("valid jobs");

        let first = jobs[0].plan.banner_mut().expect("banner plan");
        let grid = first.icons.as_ref().expect("icon grid");
        assert_eq!(grid.icons, vec![Icon::Star, Icon::Heart]);
        assert_eq!(grid.columns, 1);
        assert_eq!(first.text.callout.as_deref(), Some("Rust\nOpen source"));

        let second = jobs[1].plan.banner_mut().expect("banner plan");
        assert!(second.icons.is_none());
    }

    #[test]
    fn load_jobs_reads_from_disk() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("jobs.yaml");
        fs::write(&path, "jobs:\n  - user: octocat\n    calendar_file: cal.json\n")
            .expect("write config");

        let jobs = load_jobs(&path).expect("valid jobs");
        assert_eq!(jobs[0].calendar_file, Some(PathBuf::from("cal.json")));
    }

    #[test]
    fn load_jobs_reports_missing_file() {
        let temp = tempdir().expect("failed to create tempdir");
        let error = load_jobs(&temp.path().join("missing.yaml")).expect_err("expected io error");
        assert!(matches!(error, Error::Io { .. }));
    }
}
