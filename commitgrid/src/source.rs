// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Contribution calendar sources.
//!
//! [`GitHubSource`] queries the GraphQL API through octocrab; [`FileSource`]
//! replays a calendar previously saved as JSON so renders can run offline.

use std::{
    fs,
    future::Future,
    path::{Path, PathBuf}
};

use chrono::{NaiveDate, NaiveTime};
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    calendar::{Calendar, ContributionDay, ContributionWeek},
    error::{self, Error}
};

const CALENDAR_QUERY: &str = "query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          firstDay
          contributionDays {
            date
            contributionCount
            weekday
          }
        }
      }
    }
  }
}";

/// Provider of contribution calendars.
pub trait ContributionSource {
    /// Fetches the calendar of `login` between `from` and `to` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when the upstream service rejects the
    /// request, or another [`Error`] variant when local data is unusable.
    fn fetch_calendar(
        &self,
        login: &str,
        from: NaiveDate,
        to: NaiveDate
    ) -> impl Future<Output = Result<Calendar, Error>> + Send;
}

/// Calendar source backed by the GitHub GraphQL API.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    octocrab: Octocrab
}

impl GitHubSource {
    /// Builds an authenticated client from a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when the HTTP client cannot be built.
    pub fn new(token: &str) -> Result<Self, Error> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_owned())
            .build()
            .map_err(|e| Error::service(format!("failed to build octocrab: {e}")))?;
        Ok(Self::with_client(octocrab))
    }

    /// Wraps an existing client.
    pub fn with_client(octocrab: Octocrab) -> Self {
        Self {
            octocrab
        }
    }
}

impl ContributionSource for GitHubSource {
    async fn fetch_calendar(
        &self,
        login: &str,
        from: NaiveDate,
        to: NaiveDate
    ) -> Result<Calendar, Error> {
        debug!("Fetching contribution calendar for {login} from {from} to {to}");

        let payload = json!({
            "query": CALENDAR_QUERY,
            "variables": {
                "login": login,
                "from": to_datetime(from, NaiveTime::MIN),
                "to": to_datetime(to, end_of_day())
            }
        });

        let response: GraphQlResponse = self
            .octocrab
            .graphql(&payload)
            .await
            .map_err(|e| Error::service(describe_octocrab_error(&e)))?;

        let calendar = decode_calendar(response, login)?;
        info!(
            "Fetched {} weeks for {login} ({} contributions)",
            calendar.weeks.len(),
            calendar.total
        );
        Ok(calendar)
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn to_datetime(date: NaiveDate, time: NaiveTime) -> String {
    format!("{}Z", date.and_time(time).format("%Y-%m-%dT%H:%M:%S"))
}

/// Prefers the message GitHub put in the response body over the generic
/// transport description.
fn describe_octocrab_error(error: &octocrab::Error) -> String {
    match error {
        octocrab::Error::GitHub {
            source, ..
        } => source.message.clone(),
        other => other.to_string()
    }
}

/// Calendar source reading the JSON form of [`Calendar`] from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf
}

impl FileSource {
    /// Source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into()
        }
    }

    /// File the calendar is read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Calendar, Error> {
        let contents =
            fs::read_to_string(&self.path).map_err(|source| error::io_error(&self.path, source))?;
        serde_json::from_str(&contents).map_err(|source| error::calendar_error(&self.path, source))
    }
}

impl ContributionSource for FileSource {
    async fn fetch_calendar(
        &self,
        login: &str,
        from: NaiveDate,
        to: NaiveDate
    ) -> Result<Calendar, Error> {
        debug!(
            "Reading saved calendar for {login} from {}; window {from}..{to} is not applied",
            self.path.display()
        );
        self.load()
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data:   Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphQlError>
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String
}

#[derive(Debug, Deserialize)]
struct QueryData {
    user: Option<UserNode>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: CollectionNode
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionNode {
    contribution_calendar: CalendarNode
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarNode {
    total_contributions: u32,
    weeks:               Vec<WeekNode>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekNode {
    first_day:         NaiveDate,
    contribution_days: Vec<DayNode>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayNode {
    date:               NaiveDate,
    contribution_count: u32,
    weekday:            u8
}

fn decode_calendar(response: GraphQlResponse, login: &str) -> Result<Calendar, Error> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect();
        return Err(Error::service(messages.join("; ")));
    }

    let user = response
        .data
        .and_then(|data| data.user)
        .ok_or_else(|| {
            Error::service(format!("Could not resolve to a User with the login of '{login}'."))
        })?;

    let calendar = user.contributions_collection.contribution_calendar;
    let weeks = calendar
        .weeks
        .into_iter()
        .map(|week| ContributionWeek {
            first_day: week.first_day,
            days:      week
                .contribution_days
                .into_iter()
                .map(|day| ContributionDay {
                    date:    day.date,
                    count:   day.contribution_count,
                    weekday: day.weekday
                })
                .collect()
        })
        .collect();

    Ok(Calendar {
        total: calendar.total_contributions,
        weeks
    })
}
