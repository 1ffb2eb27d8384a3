// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Profile banner composition.
//!
//! A banner is a fixed 4:1 canvas sized for professional networking profile
//! headers. It layers literal text blocks and a small grid of outline icons
//! over the theme background and embeds the regular heatmap, produced by
//! [`build_heatmap`], as a nested `<svg>` element.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    calendar::Calendar,
    layout::{GridGeometry, LayoutOptions},
    palette::ColorScheme,
    render::build_heatmap,
    svg::Element
};

/// Banner canvas width in pixels.
pub const BANNER_WIDTH: u32 = 1584;
/// Banner canvas height in pixels.
pub const BANNER_HEIGHT: u32 = 396;

const TEXT_LEFT: u32 = 64;
const HANDLE_BASELINE: u32 = 84;
const HEADING_BASELINE: u32 = 150;
const SUBHEADING_BASELINE: u32 = 196;
const CALLOUT_BASELINE: u32 = 250;
const CALLOUT_LINE_HEIGHT: u32 = 30;
const ACCENT_BAR_WIDTH: u32 = 8;
/// Icon path data is authored on a 24×24 grid.
const ICON_VIEWBOX: f64 = 24.0;

/// Built-in outline icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Angle brackets.
    Code,
    /// Prompt with a cursor line.
    Terminal,
    /// Branch with two commits.
    GitBranch,
    /// Stacked cylinder.
    Database,
    /// Cloud outline.
    Cloud,
    /// Chip with pins.
    Cpu,
    /// Five-pointed star.
    Star,
    /// Heart outline.
    Heart
}

impl Icon {
    /// Stroke path on a 24×24 grid.
    pub fn path_data(self) -> &'static str {
        match self {
            Icon::Code => "M16 18l6-6-6-6M8 6l-6 6 6 6",
            Icon::Terminal => "M4 17l6-6-6-6M12 19h8",
            Icon::GitBranch => {
                "M6 3v12M18 9a9 9 0 0 1-9 9M21 6a3 3 0 1 1-6 0 3 3 0 0 1 6 0zM9 18a3 3 0 1 1-6 0 3 3 0 0 1 6 0z"
            }
            Icon::Database => {
                "M12 2C7 2 3 3.3 3 5v14c0 1.7 4 3 9 3s9-1.3 9-3V5c0-1.7-4-3-9-3zM3 5c0 1.7 4 3 9 3s9-1.3 9-3M3 12c0 1.7 4 3 9 3s9-1.3 9-3"
            }
            Icon::Cloud => "M18 10h-1.3A8 8 0 1 0 9 20h9a5 5 0 0 0 0-10z",
            Icon::Cpu => {
                "M6 4h12a2 2 0 0 1 2 2v12a2 2 0 0 1-2 2H6a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2zM9 9h6v6H9zM9 1v3M15 1v3M9 20v3M15 20v3M20 9h3M20 14h3M1 9h3M1 14h3"
            }
            Icon::Star => "M12 2l3.1 6.3 6.9 1-5 4.9 1.2 6.8L12 17.8 5.8 21l1.2-6.8-5-4.9 6.9-1z",
            Icon::Heart => {
                "M20.8 4.6a5.5 5.5 0 0 0-7.8 0L12 5.7l-1-1.1a5.5 5.5 0 0 0-7.8 7.8l1 1.1L12 21l7.8-7.8 1-1.1a5.5 5.5 0 0 0 0-7.8z"
            }
        }
    }
}

/// Icons arranged row by row in a fixed grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconGrid {
    /// Icons in reading order.
    pub icons:   Vec<Icon>,
    /// Icons per row.
    pub columns: u32,
    /// Rendered edge length of one icon.
    pub size:    u32,
    /// Space between icons.
    pub gap:     u32
}

impl IconGrid {
    /// Grid of `icons` with the default size and spacing.
    pub fn new(icons: Vec<Icon>, columns: u32) -> Self {
        Self {
            icons,
            columns: columns.max(1),
            size: 32,
            gap: 16
        }
    }

    /// Icon set used by the showcase banner.
    pub fn developer() -> Self {
        Self::new(
            vec![
                Icon::Code,
                Icon::Terminal,
                Icon::GitBranch,
                Icon::Database,
                Icon::Cloud,
                Icon::Cpu
            ],
            3
        )
    }

    fn width(&self) -> u32 {
        let columns = self.columns.min(self.icons.len() as u32).max(1);
        columns * self.size + (columns - 1) * self.gap
    }
}

/// Decorative text blocks. Each block is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerText {
    /// Account handle shown above the heading, prefixed with `@`.
    pub handle:     Option<String>,
    /// Large heading line.
    pub heading:    Option<String>,
    /// Secondary line under the heading.
    pub subheading: Option<String>,
    /// Free text split into lines on `\n`.
    pub callout:    Option<String>
}

/// Where the embedded heatmap sits on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridPlacement {
    /// Anchored to the bottom-right corner inside the margin.
    #[default]
    BottomRight,
    /// Centered on the canvas.
    Center
}

/// Options for a banner render.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerOptions {
    /// Canvas width.
    pub width:      u32,
    /// Canvas height.
    pub height:     u32,
    /// Theme providing background, text and accent colors.
    pub scheme:     ColorScheme,
    /// Options of the embedded heatmap.
    pub heatmap:    LayoutOptions,
    /// Heatmap position.
    pub placement:  GridPlacement,
    /// Distance kept from the canvas edges.
    pub margin:     u32,
    /// Text overlays.
    pub text:       BannerText,
    /// Optional icon grid in the top-right corner.
    pub icons:      Option<IconGrid>,
    /// Draw a vertical accent bar along the left edge.
    pub accent_bar: bool
}

impl BannerOptions {
    /// Banner with a compact corner heatmap and no overlays.
    pub fn new(scheme: ColorScheme, heatmap: LayoutOptions) -> Self {
        Self {
            width: BANNER_WIDTH,
            height: BANNER_HEIGHT,
            scheme,
            heatmap,
            placement: GridPlacement::BottomRight,
            margin: 32,
            text: BannerText::default(),
            icons: None,
            accent_bar: true
        }
    }
}

/// Renders a banner as a standalone SVG document.
pub fn render_banner(calendar: &Calendar, options: &BannerOptions) -> String {
    build_banner(calendar, options).render_document()
}

/// Builds the banner document tree.
pub fn build_banner(calendar: &Calendar, options: &BannerOptions) -> Element {
    let colors = options.scheme.colors();
    debug!(
        width = options.width,
        height = options.height,
        scheme = %options.scheme,
        "building banner document"
    );

    let mut document = Element::svg(options.width, options.height);
    document.push(banner_style(options));
    document.push(
        Element::new("rect")
            .attr("width", options.width)
            .attr("height", options.height)
            .attr("fill", colors.background)
    );
    if options.accent_bar {
        document.push(
            Element::new("rect")
                .attr("width", ACCENT_BAR_WIDTH)
                .attr("height", options.height)
                .attr("fill", colors.accent)
        );
    }

    document.extend(text_blocks(&options.text));
    if let Some(icons) = options.icons.as_ref() {
        document.push(icon_grid(icons, options));
    }
    document.push(embedded_heatmap(calendar, options));

    document
}

fn banner_style(options: &BannerOptions) -> Element {
    let colors = options.scheme.colors();
    let css = format!(
        "text{{font-family:{family}}}\
         .handle{{fill:{accent};font-size:22px;font-weight:600}}\
         .heading{{fill:{text};font-size:46px;font-weight:700}}\
         .subheading{{fill:{muted};font-size:24px}}\
         .callout{{fill:{text};font-size:20px}}",
        family = options.heatmap.font_family,
        accent = colors.accent,
        text = colors.text,
        muted = colors.muted
    );
    Element::new("style").text(css)
}

fn text_blocks(text: &BannerText) -> Vec<Element> {
    let mut blocks = Vec::new();
    let line = |class: &'static str, y: u32, content: &str| {
        Element::new("text")
            .attr("class", class)
            .attr("x", TEXT_LEFT)
            .attr("y", y)
            .text(content)
    };

    if let Some(handle) = non_blank(text.handle.as_deref()) {
        blocks.push(line("handle", HANDLE_BASELINE, &format_handle(handle)));
    }
    if let Some(heading) = non_blank(text.heading.as_deref()) {
        blocks.push(line("heading", HEADING_BASELINE, heading));
    }
    if let Some(subheading) = non_blank(text.subheading.as_deref()) {
        blocks.push(line("subheading", SUBHEADING_BASELINE, subheading));
    }
    if let Some(callout) = non_blank(text.callout.as_deref()) {
        for (index, content) in callout.lines().enumerate() {
            let y = CALLOUT_BASELINE + index as u32 * CALLOUT_LINE_HEIGHT;
            blocks.push(line("callout", y, content.trim_end()));
        }
    }

    blocks
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Prefixes a handle with `@` unless it already carries one.
pub fn format_handle(handle: &str) -> String {
    if handle.starts_with('@') {
        handle.to_owned()
    } else {
        format!("@{handle}")
    }
}

fn icon_grid(grid: &IconGrid, options: &BannerOptions) -> Element {
    let accent = options.scheme.colors().accent;
    let origin_x = options
        .width
        .saturating_sub(options.margin + grid.width());
    let origin_y = options.margin;
    let scale = f64::from(grid.size) / ICON_VIEWBOX;
    let stride = grid.size + grid.gap;
    let columns = grid.columns.max(1);

    let mut group = Element::new("g").attr("class", "icons");
    for (index, icon) in grid.icons.iter().enumerate() {
        let column = index as u32 % columns;
        let row = index as u32 / columns;
        let x = origin_x + column * stride;
        let y = origin_y + row * stride;
        group.push(
            Element::new("g")
                .attr("transform", format!("translate({x} {y}) scale({scale})"))
                .child(
                    Element::new("path")
                        .attr("d", icon.path_data())
                        .attr("fill", "none")
                        .attr("stroke", accent)
                        .attr("stroke-width", 2)
                        .attr("stroke-linecap", "round")
                        .attr("stroke-linejoin", "round")
                )
        );
    }

    group
}

fn embedded_heatmap(calendar: &Calendar, options: &BannerOptions) -> Element {
    let geometry = GridGeometry::new(calendar.weeks_count(), &options.heatmap);
    let (x, y) = match options.placement {
        GridPlacement::BottomRight => (
            options
                .width
                .saturating_sub(geometry.width + options.margin),
            options
                .height
                .saturating_sub(geometry.height + options.margin)
        ),
        GridPlacement::Center => (
            options.width.saturating_sub(geometry.width) / 2,
            options.height.saturating_sub(geometry.height) / 2
        )
    };

    let mut heatmap = build_heatmap(calendar, &options.heatmap);
    heatmap.set_attr("x", x);
    heatmap.set_attr("y", y);
    heatmap
}
