// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Contribution calendar heatmaps and profile banners rendered as SVG.
//!
//! The library normalizes a contribution calendar into a flat day list with
//! statistics, buckets daily counts into five levels, and lays the days out
//! as a week-by-weekday grid. Rendering is a pure function from a calendar
//! and options to markup; fetching, job configuration, file output and PNG
//! conversion live at the edges.

mod banner;
mod calendar;
mod config;
mod error;
mod jobs;
mod layout;
mod normalizer;
mod output;
mod palette;
mod pipeline;
mod presets;
mod render;
mod source;
mod svg;

pub use banner::{
    BANNER_HEIGHT, BANNER_WIDTH, BannerOptions, BannerText, GridPlacement, Icon, IconGrid,
    build_banner, format_handle, render_banner
};
pub use calendar::{Calendar, ContributionDay, ContributionWeek, DAYS_PER_WEEK, sunday_based_weekday};
pub use config::{BannerEntry, JobEntry, JobsConfig, PngEntry};
pub use error::{Error, calendar_error, io_error, output_io_error};
pub use jobs::{
    PngTarget, RenderJob, load_jobs, normalize_job, normalize_jobs, parse_jobs, today_utc,
    validate_login
};
pub use layout::{GridGeometry, LayoutOptions, LayoutOverrides, Padding, PaddingOverrides};
pub use normalizer::{
    CalendarSummary, MonthTotal, Statistics, compute_statistics, flatten, summarize
};
#[cfg(feature = "raster")]
pub use output::ResvgRasterizer;
pub use output::{RasterCapability, RasterOptions, Rasterizer, write_markup};
pub use palette::{
    ColorScheme, LEVEL_COUNT, Palette, ThemeColors, contribution_level, is_hex_color
};
pub use pipeline::{JobReport, render_job, run_job};
pub use presets::{Preset, RenderPlan};
pub use render::{build_heatmap, render_heatmap, summary_text, tooltip_text};
pub use source::{ContributionSource, FileSource, GitHubSource};
pub use svg::{Element, SVG_NAMESPACE, escape_xml};
