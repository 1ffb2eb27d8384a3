// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Named render presets.
//!
//! A [`Preset`] bundles layout and composition choices under a short name so
//! configuration files only need to say `preset: banner`. Resolving a preset
//! against a [`ColorScheme`] yields a [`RenderPlan`] that the pipeline renders
//! without further branching.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    banner::{BannerOptions, GridPlacement, IconGrid, render_banner},
    calendar::Calendar,
    error::Error,
    layout::{LayoutOptions, Padding},
    palette::ColorScheme,
    render::render_heatmap
};

/// Built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Full heatmap with title, labels, legend and summary.
    #[default]
    Standard,
    /// Smaller cells with month labels and legend only.
    Compact,
    /// Bare grid of cells.
    Minimal,
    /// Profile banner with handle, heading and a corner heatmap.
    Banner,
    /// Banner with callout text and an icon grid.
    BannerShowcase,
    /// Banner dominated by a centered heatmap.
    BannerGrid
}

/// Resolved rendering decision for one job.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    /// Standalone heatmap document.
    Heatmap(LayoutOptions),
    /// Banner document embedding a heatmap.
    Banner(BannerOptions)
}

impl RenderPlan {
    /// Renders the calendar into SVG markup.
    pub fn render(&self, calendar: &Calendar) -> String {
        match self {
            RenderPlan::Heatmap(options) => render_heatmap(calendar, options),
            RenderPlan::Banner(options) => render_banner(calendar, options)
        }
    }

    /// Heatmap options, including the ones embedded in a banner.
    pub fn heatmap(&self) -> &LayoutOptions {
        match self {
            RenderPlan::Heatmap(options) => options,
            RenderPlan::Banner(options) => &options.heatmap
        }
    }

    /// Mutable access to the heatmap options.
    pub fn heatmap_mut(&mut self) -> &mut LayoutOptions {
        match self {
            RenderPlan::Heatmap(options) => options,
            RenderPlan::Banner(options) => &mut options.heatmap
        }
    }

    /// Banner options when the plan renders a banner.
    pub fn banner_mut(&mut self) -> Option<&mut BannerOptions> {
        match self {
            RenderPlan::Heatmap(_) => None,
            RenderPlan::Banner(options) => Some(options)
        }
    }
}

impl Preset {
    /// Every preset in presentation order.
    pub const ALL: [Preset; 6] = [
        Preset::Standard,
        Preset::Compact,
        Preset::Minimal,
        Preset::Banner,
        Preset::BannerShowcase,
        Preset::BannerGrid
    ];

    /// Name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::Compact => "compact",
            Preset::Minimal => "minimal",
            Preset::Banner => "banner",
            Preset::BannerShowcase => "banner-showcase",
            Preset::BannerGrid => "banner-grid"
        }
    }

    /// One-line description shown by the `presets` command.
    pub fn description(self) -> &'static str {
        match self {
            Preset::Standard => "heatmap with title, day and month labels, legend and summary",
            Preset::Compact => "smaller heatmap with month labels and legend",
            Preset::Minimal => "bare grid of cells without any text",
            Preset::Banner => "1584x396 profile banner with handle, heading and corner heatmap",
            Preset::BannerShowcase => "profile banner with callout text and an icon grid",
            Preset::BannerGrid => "profile banner with a large centered heatmap"
        }
    }

    /// Looks a preset up by name, ignoring ASCII case and accepting `_` for
    /// `-`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(&normalized))
    }

    /// Whether the preset renders a banner.
    pub fn is_banner(self) -> bool {
        matches!(
            self,
            Preset::Banner | Preset::BannerShowcase | Preset::BannerGrid
        )
    }

    /// Whether banner text defaults to the account handle and display name.
    pub fn uses_profile_text(self) -> bool {
        matches!(self, Preset::Banner | Preset::BannerShowcase)
    }

    /// Resolves the preset for a color scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitgrid::{ColorScheme, Preset, RenderPlan};
    ///
    /// match Preset::Compact.plan(ColorScheme::Dark) {
    ///     RenderPlan::Heatmap(options) => assert_eq!(options.cell_size, 9),
    ///     RenderPlan::Banner(_) => unreachable!()
    /// }
    /// ```
    pub fn plan(self, scheme: ColorScheme) -> RenderPlan {
        let base = LayoutOptions::themed(scheme);
        match self {
            Preset::Standard => RenderPlan::Heatmap(base),
            Preset::Compact => RenderPlan::Heatmap(LayoutOptions {
                cell_size: 9,
                cell_padding: 2,
                font_size: 9,
                show_title: false,
                show_day_labels: false,
                show_summary: false,
                padding: Padding::uniform(12),
                ..base
            }),
            Preset::Minimal => RenderPlan::Heatmap(LayoutOptions {
                show_title: false,
                show_legend: false,
                show_day_labels: false,
                show_month_labels: false,
                show_summary: false,
                padding: Padding::uniform(8),
                ..base
            }),
            Preset::Banner => RenderPlan::Banner(BannerOptions::new(scheme, banner_heatmap(base))),
            Preset::BannerShowcase => {
                let mut options = BannerOptions::new(scheme, banner_heatmap(base));
                options.icons = Some(IconGrid::developer());
                RenderPlan::Banner(options)
            }
            Preset::BannerGrid => {
                let heatmap = LayoutOptions {
                    cell_size: 10,
                    cell_padding: 3,
                    show_title: false,
                    show_tooltips: false,
                    ..base
                };
                let mut options = BannerOptions::new(scheme, heatmap);
                options.placement = GridPlacement::Center;
                options.accent_bar = false;
                RenderPlan::Banner(options)
            }
        }
    }
}

/// Compact corner heatmap shared by the text banners.
fn banner_heatmap(base: LayoutOptions) -> LayoutOptions {
    LayoutOptions {
        cell_size: 6,
        cell_padding: 2,
        corner_radius: 1,
        font_size: 9,
        show_title: false,
        show_legend: false,
        show_day_labels: false,
        show_tooltips: false,
        padding: Padding::uniform(8),
        ..base
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value)
            .ok_or_else(|| Error::validation(format!("unknown preset '{}'", value.trim())))
    }
}
