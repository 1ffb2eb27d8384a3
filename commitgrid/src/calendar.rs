// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Contribution calendar data model.
//!
//! A [`Calendar`] mirrors the week-oriented shape returned by the GitHub
//! contribution calendar: weeks run Sunday through Saturday, the first and
//! last week may be partial, and every day carries its weekday index so the
//! renderer can place it on the vertical axis without inspecting its slot in
//! the week.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of rows in the calendar grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Contribution count for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    /// Calendar date of the day.
    pub date:    NaiveDate,
    /// Number of contributions recorded on that day.
    pub count:   u32,
    /// Weekday index where `0` is Sunday and `6` is Saturday.
    pub weekday: u8
}

impl ContributionDay {
    /// Creates a day record deriving the weekday index from the date.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use commitgrid::ContributionDay;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    /// let day = ContributionDay::new(date, 3);
    /// assert_eq!(day.weekday, 1);
    /// ```
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self {
            date,
            count,
            weekday: sunday_based_weekday(date)
        }
    }
}

/// Chronological run of up to seven days starting on `first_day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionWeek {
    /// First day present in the week.
    pub first_day: NaiveDate,
    /// Days of the week in chronological order.
    pub days:      Vec<ContributionDay>
}

/// Full contribution dataset for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Total reported by the data source.
    pub total: u32,
    /// Weeks in chronological order; their index is the grid column.
    pub weeks: Vec<ContributionWeek>
}

impl Calendar {
    /// Builds a Sunday-aligned calendar from consecutive daily counts.
    ///
    /// The first week starts at `start` and may be partial. A new week opens
    /// on every Sunday. The reported total is the sum of `counts`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use commitgrid::Calendar;
    ///
    /// // 2024-01-03 is a Wednesday.
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 3).expect("valid date");
    /// let calendar = Calendar::from_daily_counts(start, &[1, 2, 3, 4, 5]);
    /// assert_eq!(calendar.weeks.len(), 2);
    /// assert_eq!(calendar.weeks[0].days.len(), 4);
    /// assert_eq!(calendar.total, 15);
    /// ```
    pub fn from_daily_counts(start: NaiveDate, counts: &[u32]) -> Self {
        let mut weeks: Vec<ContributionWeek> = Vec::with_capacity(counts.len() / 7 + 2);

        for (date, &count) in start.iter_days().zip(counts) {
            let day = ContributionDay::new(date, count);
            match weeks.last_mut() {
                Some(week) if day.weekday != 0 => week.days.push(day),
                _ => weeks.push(ContributionWeek {
                    first_day: date,
                    days:      vec![day]
                })
            }
        }

        Self {
            total: counts.iter().sum(),
            weeks
        }
    }

    /// Number of grid columns.
    pub fn weeks_count(&self) -> usize {
        self.weeks.len()
    }

    /// Returns the first and last dates present in the calendar.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.weeks.first()?.days.first()?.date;
        let last = self.weeks.last()?.days.last()?.date;
        Some((first, last))
    }
}

/// Weekday index with Sunday as `0`, matching the GitHub calendar rows.
pub fn sunday_based_weekday(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}
