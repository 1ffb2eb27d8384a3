// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Contribution levels, five-color palettes and named color schemes.
//!
//! Every count maps to one of [`LEVEL_COUNT`] levels through a fixed
//! threshold table. A [`Palette`] holds exactly one color per level, so the
//! renderer can index it directly.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Number of contribution levels and palette entries.
pub const LEVEL_COUNT: usize = 5;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("hex color pattern is valid")
});

/// Buckets a daily count into a level between `0` and `4`.
///
/// | count   | level |
/// |---------|-------|
/// | 0       | 0     |
/// | 1..=3   | 1     |
/// | 4..=6   | 2     |
/// | 7..=9   | 3     |
/// | 10 or more | 4  |
///
/// # Examples
///
/// ```
/// use commitgrid::contribution_level;
///
/// assert_eq!(contribution_level(0), 0);
/// assert_eq!(contribution_level(6), 2);
/// assert_eq!(contribution_level(1000), 4);
/// ```
pub fn contribution_level(count: u32) -> usize {
    match count {
        0 => 0,
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4
    }
}

/// Returns `true` when `value` is a `#rgb`, `#rrggbb` or `#rrggbbaa` color.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Ordered list of exactly five colors where the index is the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    colors: [String; LEVEL_COUNT]
}

impl Palette {
    /// Builds a palette from five color literals.
    pub fn new(colors: [&str; LEVEL_COUNT]) -> Self {
        Self {
            colors: colors.map(str::to_owned)
        }
    }

    /// Color painted for the given level. Levels above `4` use the last
    /// entry.
    pub fn color(&self, level: usize) -> &str {
        &self.colors[level.min(LEVEL_COUNT - 1)]
    }

    /// Color painted for a raw daily count.
    pub fn color_for_count(&self, count: u32) -> &str {
        self.color(contribution_level(count))
    }

    /// All colors from level `0` to level `4`.
    pub fn colors(&self) -> &[String; LEVEL_COUNT] {
        &self.colors
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = Error;

    /// Validates a user-supplied color list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the list does not hold exactly five
    /// entries or an entry is not a hex color.
    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        let length = colors.len();
        let colors: [String; LEVEL_COUNT] = colors.try_into().map_err(|_| {
            Error::validation(format!(
                "palette must contain exactly {LEVEL_COUNT} colors, got {length}"
            ))
        })?;

        if let Some(invalid) = colors.iter().find(|color| !is_hex_color(color)) {
            return Err(Error::validation(format!(
                "palette color '{invalid}' is not a hex color"
            )));
        }

        Ok(Self {
            colors
        })
    }
}

/// Named visual themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// GitHub's light greens on white.
    #[default]
    Light,
    /// GitHub's dark mode greens.
    Dark,
    /// Saturated cyan and magenta on near-black.
    Neon,
    /// Blues on white.
    Ocean,
    /// Oranges and reds on a warm background.
    Sunset,
    /// GitHub's Halloween yellows.
    Halloween
}

/// Colors that make up a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Cell colors for levels `0` to `4`.
    pub levels:     [&'static str; LEVEL_COUNT],
    /// Canvas background.
    pub background: &'static str,
    /// Primary text.
    pub text:       &'static str,
    /// Secondary text such as labels and captions.
    pub muted:      &'static str,
    /// Highlight used for handles and decorative strokes.
    pub accent:     &'static str
}

impl ColorScheme {
    /// Every scheme in presentation order.
    pub const ALL: [ColorScheme; 6] = [
        ColorScheme::Light,
        ColorScheme::Dark,
        ColorScheme::Neon,
        ColorScheme::Ocean,
        ColorScheme::Sunset,
        ColorScheme::Halloween
    ];

    /// Lowercase name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
            ColorScheme::Neon => "neon",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Sunset => "sunset",
            ColorScheme::Halloween => "halloween"
        }
    }

    /// Looks a scheme up by its name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Colors of the scheme.
    pub fn colors(self) -> ThemeColors {
        match self {
            ColorScheme::Light => ThemeColors {
                levels:     ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"],
                background: "#ffffff",
                text:       "#24292f",
                muted:      "#57606a",
                accent:     "#216e39"
            },
            ColorScheme::Dark => ThemeColors {
                levels:     ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"],
                background: "#0d1117",
                text:       "#e6edf3",
                muted:      "#8b949e",
                accent:     "#39d353"
            },
            ColorScheme::Neon => ThemeColors {
                levels:     ["#1a1a2e", "#16f4d0", "#00d9ff", "#ff00e4", "#fffb00"],
                background: "#0a0a0f",
                text:       "#e0e0ff",
                muted:      "#8a8aa8",
                accent:     "#ff00e4"
            },
            ColorScheme::Ocean => ThemeColors {
                levels:     ["#ebedf0", "#aadaff", "#5fb3f9", "#2f81f7", "#0a3069"],
                background: "#f6f8fa",
                text:       "#0a3069",
                muted:      "#57606a",
                accent:     "#2f81f7"
            },
            ColorScheme::Sunset => ThemeColors {
                levels:     ["#f1e7dd", "#ffd8a8", "#ffa94d", "#f76707", "#c92a2a"],
                background: "#fff9f2",
                text:       "#3b1f0e",
                muted:      "#8a5a3c",
                accent:     "#f76707"
            },
            ColorScheme::Halloween => ThemeColors {
                levels:     ["#ebedf0", "#ffee4a", "#ffc501", "#fe9600", "#03001c"],
                background: "#ffffff",
                text:       "#24292f",
                muted:      "#57606a",
                accent:     "#fe9600"
            }
        }
    }

    /// Palette built from the scheme's level colors.
    pub fn palette(self) -> Palette {
        Palette::new(self.colors().levels)
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value).ok_or_else(|| {
            Error::validation(format!("unknown color scheme '{}'", value.trim()))
        })
    }
}
