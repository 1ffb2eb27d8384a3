// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! End-to-end execution of a render job.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    calendar::Calendar,
    error::Error,
    jobs::RenderJob,
    normalizer::{Statistics, summarize},
    output::{RasterCapability, write_markup},
    source::ContributionSource
};

/// Outcome of a single job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    /// Slug of the job.
    pub slug:           String,
    /// Destination of the SVG document.
    pub svg_path:       PathBuf,
    /// Whether the SVG document was written.
    pub svg_written:    bool,
    /// Destination of the PNG file, when requested.
    pub png_path:       Option<PathBuf>,
    /// Whether the PNG file was written.
    pub png_written:    bool,
    /// Total reported by the data source.
    pub reported_total: u32,
    /// Statistics of the rendered calendar.
    pub statistics:     Statistics
}

/// Fetches, renders and stores one job.
///
/// Write and conversion failures are logged and reflected in the report;
/// only upstream data errors abort the job.
///
/// # Errors
///
/// Propagates errors returned by the contribution source.
pub async fn run_job<S>(
    source: &S,
    job: &RenderJob,
    raster: &RasterCapability
) -> Result<JobReport, Error>
where
    S: ContributionSource
{
    info!("Rendering {} for {} ({}..{})", job.slug, job.login, job.from, job.to);
    let calendar = source.fetch_calendar(&job.login, job.from, job.to).await?;
    Ok(render_job(&calendar, job, raster))
}

/// Renders and stores a job from an already fetched calendar.
pub fn render_job(calendar: &Calendar, job: &RenderJob, raster: &RasterCapability) -> JobReport {
    let summary = summarize(calendar);
    if !summary.totals_agree() {
        warn!(
            reported = summary.reported_total,
            summed = summary.statistics.total,
            "calendar total disagrees with the sum of daily counts for {}",
            job.login
        );
    }

    let markup = job.plan.render(calendar);
    let svg_written = write_markup(&markup, &job.svg_path);
    if svg_written {
        info!("Wrote {}", job.svg_path.display());
    }

    let png_written = job
        .png
        .as_ref()
        .is_some_and(|png| raster.convert(&markup, &png.path, &png.options));

    JobReport {
        slug: job.slug.clone(),
        svg_path: job.svg_path.clone(),
        svg_written,
        png_path: job.png.as_ref().map(|png| png.path.clone()),
        png_written,
        reported_total: summary.reported_total,
        statistics: summary.statistics
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;
    use crate::{config::JobEntry, jobs::normalize_job, presets::Preset, source::FileSource};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
    }

    fn calendar() -> Calendar {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
        Calendar::from_daily_counts(start, &[0, 1, 4, 7, 10, 2, 0])
    }

    struct FailingSource;

    impl ContributionSource for FailingSource {
        async fn fetch_calendar(
            &self,
            _login: &str,
            _from: NaiveDate,
            _to: NaiveDate
        ) -> Result<Calendar, Error> {
            Err(Error::service("Bad credentials"))
        }
    }

    #[tokio::test]
    async fn job_renders_saved_calendar_to_disk() {
        let temp = tempdir().expect("failed to create tempdir");
        let calendar_path = temp.path().join("calendar.json");
        fs::write(&calendar_path, serde_json::to_string(&calendar()).expect("serialize"))
            .expect("write calendar");

        let entry = JobEntry {
            output: Some(temp.path().join("out/grid.svg").display().to_string()),
            ..JobEntry::for_user("octocat")
        };
        let job = normalize_job(&entry, today()).expect("valid job");
        let source = FileSource::new(&calendar_path);

        let report = run_job(&source, &job, &RasterCapability::Unavailable)
            .await
            .expect("job succeeds");

        assert!(report.svg_written);
        assert!(!report.png_written);
        assert_eq!(report.reported_total, 24);
        assert_eq!(report.statistics.max_day, 10);
        let markup = fs::read_to_string(&report.svg_path).expect("svg written");
        assert!(markup.contains("24 contributions this year"));
    }

    #[tokio::test]
    async fn upstream_errors_propagate() {
        let job = normalize_job(&JobEntry::for_user("octocat"), today()).expect("valid job");
        let error = run_job(&FailingSource, &job, &RasterCapability::Unavailable)
            .await
            .expect_err("expected service error");
        assert_eq!(error.to_string(), "service error: Bad credentials");
    }

    #[test]
    fn unwritable_destination_is_reported_not_raised() {
        let temp = tempdir().expect("failed to create tempdir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").expect("write blocker");

        let entry = JobEntry {
            output: Some(blocker.join("grid.svg").display().to_string()),
            preset: Some(Preset::Banner),
            png: Some(Default::default()),
            ..JobEntry::for_user("octocat")
        };
        let job = normalize_job(&entry, today()).expect("valid job");
        let report = render_job(&calendar(), &job, &RasterCapability::Unavailable);

        assert!(!report.svg_written);
        assert!(!report.png_written);
        assert_eq!(report.png_path, Some(blocker.join("grid.png")));
    }

    #[test]
    fn reported_total_is_kept_when_sums_disagree() {
        let mut calendar = calendar();
        calendar.total = 30;
        let temp = tempdir().expect("failed to create tempdir");
        let entry = JobEntry {
            output: Some(temp.path().join("grid.svg").display().to_string()),
            ..JobEntry::for_user("octocat")
        };
        let job = normalize_job(&entry, today()).expect("valid job");

        let report = render_job(&calendar, &job, &RasterCapability::Unavailable);
        assert_eq!(report.reported_total, 30);
        assert_eq!(report.statistics.total, 24);
        let markup = fs::read_to_string(&report.svg_path).expect("svg written");
        assert!(markup.contains("30 contributions this year"));
    }
}
