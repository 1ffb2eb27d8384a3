// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Transformation of week-oriented calendars into flat day lists and derived
//! statistics.
//!
//! Every function in this module is total over well-formed input. Gaps,
//! duplicates and ordering of the source weeks are trusted as delivered.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::calendar::{Calendar, ContributionDay, DAYS_PER_WEEK};

/// Aggregate statistics derived from a list of contribution days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Sum of all daily counts.
    pub total:           u64,
    /// Number of days that were aggregated.
    pub day_count:       usize,
    /// Mean contributions per day, `0.0` when no days were supplied.
    pub average_per_day: f64,
    /// Largest single-day count.
    pub max_day:         u32,
    /// Days with at least one contribution.
    pub active_days:     usize,
    /// Length of the streak ending on the most recent day.
    pub current_streak:  u32,
    /// Longest streak found anywhere in the range.
    pub longest_streak:  u32,
    /// Totals indexed by weekday, Sunday first.
    pub weekday_totals:  [u64; DAYS_PER_WEEK],
    /// Totals per `YYYY-MM` month in ascending order.
    pub month_totals:    Vec<MonthTotal>
}

impl Statistics {
    /// Returns `true` when the statistics were computed over no days.
    pub fn is_empty(&self) -> bool {
        self.day_count == 0
    }
}

/// Contribution total for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    /// Sum of counts for the month.
    pub total: u64
}

/// Flattened calendar together with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSummary {
    /// Days in source order.
    pub days:           Vec<ContributionDay>,
    /// Statistics computed from `days`.
    pub statistics:     Statistics,
    /// Total reported by the data source. This is the value shown in
    /// rendered output.
    pub reported_total: u32
}

impl CalendarSummary {
    /// Whether the reported total equals the sum of the flattened days.
    pub fn totals_agree(&self) -> bool {
        u64::from(self.reported_total) == self.statistics.total
    }
}

/// Concatenates the days of every week in order.
pub fn flatten(calendar: &Calendar) -> Vec<ContributionDay> {
    calendar
        .weeks
        .iter()
        .flat_map(|week| week.days.iter().copied())
        .collect()
}

/// Flattens a calendar and computes its statistics in one pass.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use commitgrid::{Calendar, summarize};
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
/// let summary = summarize(&Calendar::from_daily_counts(start, &[0, 2, 5]));
/// assert_eq!(summary.statistics.total, 7);
/// assert_eq!(summary.statistics.current_streak, 2);
/// assert!(summary.totals_agree());
/// ```
pub fn summarize(calendar: &Calendar) -> CalendarSummary {
    let days = flatten(calendar);
    let statistics = compute_statistics(&days);
    CalendarSummary {
        days,
        statistics,
        reported_total: calendar.total
    }
}

/// Computes aggregate statistics over the provided days.
pub fn compute_statistics(days: &[ContributionDay]) -> Statistics {
    let total: u64 = days.iter().map(|day| u64::from(day.count)).sum();
    let day_count = days.len();
    let average_per_day = if day_count == 0 {
        0.0
    } else {
        total as f64 / day_count as f64
    };
    let max_day = days.iter().map(|day| day.count).max().unwrap_or(0);
    let active_days = days.iter().filter(|day| day.count > 0).count();

    let mut sorted: Vec<&ContributionDay> = days.iter().collect();
    sorted.sort_by_key(|day| day.date);
    let (current_streak, longest_streak) = streaks(&sorted);

    Statistics {
        total,
        day_count,
        average_per_day,
        max_day,
        active_days,
        current_streak,
        longest_streak,
        weekday_totals: weekday_totals(days),
        month_totals: month_totals(days)
    }
}

/// Returns `(current, longest)` streaks over days sorted by date.
fn streaks(sorted: &[&ContributionDay]) -> (u32, u32) {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in sorted {
        if day.count == 0 {
            run = 0;
        } else if run > 0 && previous.is_some_and(|date| is_next_day(date, day.date)) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
        previous = Some(day.date);
    }

    (current_streak(sorted), longest)
}

fn current_streak(sorted: &[&ContributionDay]) -> u32 {
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for day in sorted.iter().rev() {
        if day.count == 0 {
            break;
        }
        if let Some(date) = expected
            && date != day.date
        {
            break;
        }
        streak += 1;
        expected = day.date.checked_sub_days(Days::new(1));
    }

    streak
}

fn is_next_day(previous: NaiveDate, current: NaiveDate) -> bool {
    previous.checked_add_days(Days::new(1)) == Some(current)
}

fn weekday_totals(days: &[ContributionDay]) -> [u64; DAYS_PER_WEEK] {
    let mut totals = [0; DAYS_PER_WEEK];
    for day in days {
        debug_assert!(
            (day.weekday as usize) < DAYS_PER_WEEK,
            "weekday {} out of range for {}",
            day.weekday,
            day.date
        );
        if let Some(slot) = totals.get_mut(day.weekday as usize) {
            *slot += u64::from(day.count);
        }
    }
    totals
}

fn month_totals(days: &[ContributionDay]) -> Vec<MonthTotal> {
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    for day in days {
        let key = day.date.format("%Y-%m").to_string();
        *months.entry(key).or_default() += u64::from(day.count);
    }

    months
        .into_iter()
        .map(|(month, total)| MonthTotal {
            month,
            total
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ContributionWeek;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn run(start: NaiveDate, counts: &[u32]) -> Vec<ContributionDay> {
        start
            .iter_days()
            .zip(counts)
            .map(|(day, &count)| ContributionDay::new(day, count))
            .collect()
    }

    #[test]
    fn flatten_concatenates_weeks_in_order() {
        let calendar = Calendar::from_daily_counts(date(2024, 1, 3), &[1, 2, 3, 4, 5, 6]);
        let days = flatten(&calendar);

        let counts: Vec<u32> = days.iter().map(|day| day.count).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(days[4].date, date(2024, 1, 7));
    }

    #[test]
    fn flatten_does_not_deduplicate() {
        let day = ContributionDay::new(date(2024, 1, 1), 1);
        let calendar = Calendar {
            total: 2,
            weeks: vec![
                ContributionWeek {
                    first_day: day.date,
                    days:      vec![day]
                },
                ContributionWeek {
                    first_day: day.date,
                    days:      vec![day]
                },
            ]
        };
        assert_eq!(flatten(&calendar).len(), 2);
    }

    #[test]
    fn empty_input_yields_zeroed_statistics() {
        let statistics = compute_statistics(&[]);

        assert!(statistics.is_empty());
        assert_eq!(statistics.total, 0);
        assert_eq!(statistics.average_per_day, 0.0);
        assert_eq!(statistics.max_day, 0);
        assert_eq!(statistics.current_streak, 0);
        assert_eq!(statistics.longest_streak, 0);
        assert!(statistics.month_totals.is_empty());
    }

    #[test]
    fn totals_average_and_max() {
        let days = run(date(2024, 1, 1), &[0, 4, 8, 0]);
        let statistics = compute_statistics(&days);

        assert_eq!(statistics.total, 12);
        assert_eq!(statistics.average_per_day, 3.0);
        assert_eq!(statistics.max_day, 8);
        assert_eq!(statistics.active_days, 2);
    }

    #[test]
    fn current_streak_is_zero_when_latest_day_is_empty() {
        let days = run(date(2024, 5, 1), &[1, 5, 3, 0]);
        let statistics = compute_statistics(&days);

        assert_eq!(statistics.current_streak, 0);
        assert_eq!(statistics.longest_streak, 3);
    }

    #[test]
    fn current_streak_counts_trailing_active_days() {
        let days = run(date(2024, 5, 1), &[3, 0, 2, 4]);
        let statistics = compute_statistics(&days);

        assert_eq!(statistics.current_streak, 2);
        assert_eq!(statistics.longest_streak, 2);
    }

    #[test]
    fn streaks_break_on_calendar_gaps() {
        let days = vec![
            ContributionDay::new(date(2024, 5, 1), 1),
            ContributionDay::new(date(2024, 5, 2), 1),
            ContributionDay::new(date(2024, 5, 4), 1),
            ContributionDay::new(date(2024, 5, 5), 1),
        ];
        let statistics = compute_statistics(&days);

        assert_eq!(statistics.current_streak, 2);
        assert_eq!(statistics.longest_streak, 2);
    }

    #[test]
    fn streaks_sort_unordered_input_by_date() {
        let mut days = run(date(2024, 5, 1), &[1, 1, 1, 0, 1, 1]);
        days.reverse();
        let statistics = compute_statistics(&days);

        assert_eq!(statistics.current_streak, 2);
        assert_eq!(statistics.longest_streak, 3);
    }

    #[test]
    fn streaks_cross_month_boundaries() {
        let days = run(date(2024, 2, 28), &[1, 2, 3]);
        let statistics = compute_statistics(&days);

        assert_eq!(statistics.current_streak, 3);
        assert_eq!(statistics.longest_streak, 3);
    }

    #[test]
    fn single_week_weekday_totals_match_counts() {
        let counts = [0, 1, 4, 7, 10, 2, 0];
        let calendar = Calendar::from_daily_counts(date(2024, 1, 7), &counts);
        let statistics = compute_statistics(&flatten(&calendar));

        let expected: Vec<u64> = counts.iter().map(|&count| u64::from(count)).collect();
        assert_eq!(statistics.weekday_totals.to_vec(), expected);
    }

    #[test]
    fn month_totals_are_sorted_chronologically() {
        let days = vec![
            ContributionDay::new(date(2024, 3, 1), 2),
            ContributionDay::new(date(2023, 12, 31), 5),
            ContributionDay::new(date(2024, 1, 15), 1),
            ContributionDay::new(date(2024, 1, 16), 3),
        ];
        let statistics = compute_statistics(&days);

        let months: Vec<(&str, u64)> = statistics
            .month_totals
            .iter()
            .map(|entry| (entry.month.as_str(), entry.total))
            .collect();
        assert_eq!(months, vec![("2023-12", 5), ("2024-01", 4), ("2024-03", 2)]);
    }

    #[test]
    fn summary_compares_reported_and_summed_totals() {
        let mut calendar = Calendar::from_daily_counts(date(2024, 1, 1), &[3, 4]);
        assert!(summarize(&calendar).totals_agree());

        calendar.total = 10;
        let summary = summarize(&calendar);
        assert!(!summary.totals_agree());
        assert_eq!(summary.reported_total, 10);
        assert_eq!(summary.statistics.total, 7);
    }
}
