// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Heatmap document renderer.
//!
//! The renderer is a total function from a [`Calendar`] and
//! [`LayoutOptions`] to SVG markup. It runs a fixed sequence of stages, each
//! appending elements to the document tree:
//!
//! 1. root `<svg>` sized from [`GridGeometry`]
//! 2. style block and background
//! 3. title
//! 4. day labels
//! 5. month labels
//! 6. cells
//! 7. legend
//! 8. summary line
//!
//! The tree is serialized once when the last stage has run.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::{
    calendar::{Calendar, ContributionDay, DAYS_PER_WEEK},
    layout::{FOOTER_GAP, GridGeometry, LayoutOptions},
    palette::{LEVEL_COUNT, contribution_level},
    svg::Element
};

/// Rows that carry a day label, Sunday being row `0`.
const DAY_LABELS: [(u8, &str); 3] = [(1, "Mon"), (3, "Wed"), (5, "Fri")];
/// Horizontal room reserved for the trailing "More" caption.
const LEGEND_CAPTION_WIDTH: u32 = 30;
/// Gap between legend captions and swatches.
const LEGEND_CAPTION_GAP: u32 = 4;

/// Renders a heatmap as a standalone SVG document.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use commitgrid::{Calendar, LayoutOptions, render_heatmap};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
/// let calendar = Calendar::from_daily_counts(start, &[0, 1, 4, 7, 10, 2, 0]);
/// let svg = render_heatmap(&calendar, &LayoutOptions::default());
/// assert!(svg.contains("24 contributions this year"));
/// ```
pub fn render_heatmap(calendar: &Calendar, options: &LayoutOptions) -> String {
    build_heatmap(calendar, options).render_document()
}

/// Builds the heatmap document tree without serializing it.
///
/// Banner composition nests the returned `<svg>` element inside a larger
/// canvas.
pub fn build_heatmap(calendar: &Calendar, options: &LayoutOptions) -> Element {
    let geometry = GridGeometry::new(calendar.weeks_count(), options);
    debug!(
        weeks = geometry.weeks,
        width = geometry.width,
        height = geometry.height,
        "building heatmap document"
    );

    let mut document = Element::svg(geometry.width, geometry.height);
    document.push(style_block(options));
    document.push(
        Element::new("rect")
            .attr("width", geometry.width)
            .attr("height", geometry.height)
            .attr("fill", &options.background)
    );

    if let Some(title) = title(options, &geometry) {
        document.push(title);
    }
    if options.show_day_labels {
        document.extend(day_labels(&geometry));
    }
    if options.show_month_labels {
        document.extend(month_labels(calendar, &geometry));
    }
    document.push(cells(calendar, options, &geometry));
    if options.show_legend {
        document.push(legend(options, &geometry));
    }
    if options.show_summary {
        document.push(summary(calendar.total, &geometry));
    }

    document
}

fn style_block(options: &LayoutOptions) -> Element {
    let size = options.font_size;
    let mut css = format!(
        "text{{font-family:{family};font-size:{size}px}}\
         .label{{fill:{muted}}}\
         .title{{fill:{text};font-size:{title}px;font-weight:600}}\
         .summary{{fill:{text}}}\
         .cell{{shape-rendering:geometricPrecision}}",
        family = options.font_family,
        muted = options.muted_color,
        text = options.text_color,
        title = size + 4
    );
    if options.show_tooltips {
        css.push_str(&format!(
            ".cell:hover{{stroke:{};stroke-width:1}}",
            options.text_color
        ));
    }
    Element::new("style").text(css)
}

fn title(options: &LayoutOptions, geometry: &GridGeometry) -> Option<Element> {
    if !options.renders_title() {
        return None;
    }
    let name = options.display_name.as_deref()?.trim();
    let baseline = options.padding.top.max(options.font_size + 6);

    Some(
        Element::new("text")
            .attr("class", "title")
            .attr("x", f64::from(geometry.width) / 2.0)
            .attr("y", baseline)
            .attr("text-anchor", "middle")
            .text(name)
    )
}

fn day_labels(geometry: &GridGeometry) -> Vec<Element> {
    DAY_LABELS
        .iter()
        .map(|&(weekday, label)| {
            Element::new("text")
                .attr("class", "label")
                .attr("x", geometry.left.saturating_sub(6))
                .attr("y", geometry.row_center(weekday))
                .attr("text-anchor", "end")
                .attr("dominant-baseline", "middle")
                .text(label)
        })
        .collect()
}

/// Emits a label wherever the month of a week's first day changes.
///
/// Week `0` is never labeled, but its month still counts as seen, so a
/// second week in the same month stays unlabeled as well.
fn month_labels(calendar: &Calendar, geometry: &GridGeometry) -> Vec<Element> {
    let mut labels = Vec::with_capacity(12);
    let mut last_month: Option<u32> = None;
    let baseline = geometry.top.saturating_sub(6);

    for (index, week) in calendar.weeks.iter().enumerate() {
        let month = week.first_day.month();
        if last_month == Some(month) {
            continue;
        }
        last_month = Some(month);
        if index == 0 {
            continue;
        }
        labels.push(
            Element::new("text")
                .attr("class", "label")
                .attr("x", geometry.cell_x(index))
                .attr("y", baseline)
                .text(week.first_day.format("%b").to_string())
        );
    }

    labels
}

fn cells(calendar: &Calendar, options: &LayoutOptions, geometry: &GridGeometry) -> Element {
    let mut group = Element::new("g").attr("class", "cells");

    for (index, week) in calendar.weeks.iter().enumerate() {
        for day in &week.days {
            debug_assert!(
                (day.weekday as usize) < DAYS_PER_WEEK,
                "weekday {} out of range for {}",
                day.weekday,
                day.date
            );
            if (day.weekday as usize) < DAYS_PER_WEEK {
                group.push(cell(day, index, options, geometry));
            }
        }
    }

    group
}

fn cell(
    day: &ContributionDay,
    week: usize,
    options: &LayoutOptions,
    geometry: &GridGeometry
) -> Element {
    let level = contribution_level(day.count);
    let mut rect = Element::new("rect")
        .attr("class", "cell")
        .attr("x", geometry.cell_x(week))
        .attr("y", geometry.cell_y(day.weekday))
        .attr("width", options.cell_size)
        .attr("height", options.cell_size)
        .attr("fill", options.palette.color(level))
        .attr("data-date", day.date)
        .attr("data-count", day.count)
        .attr("data-level", level);

    if options.corner_radius > 0 {
        rect.set_attr("rx", options.corner_radius);
        rect.set_attr("ry", options.corner_radius);
    }
    if options.show_tooltips {
        rect.push(Element::new("title").text(tooltip_text(day.count, day.date)));
    }

    rect
}

/// Tooltip such as `"1 contribution on Jan 5, 2024"`.
pub fn tooltip_text(count: u32, date: NaiveDate) -> String {
    let noun = if count == 1 { "contribution" } else { "contributions" };
    format!("{count} {noun} on {}", date.format("%b %-d, %Y"))
}

/// Summary line such as `"1247 contributions this year"`.
pub fn summary_text(total: u32) -> String {
    let noun = if total == 1 { "contribution" } else { "contributions" };
    format!("{total} {noun} this year")
}

fn footer_baseline(geometry: &GridGeometry) -> u32 {
    geometry.grid_bottom() + FOOTER_GAP + geometry.cell_size - 1
}

fn legend(options: &LayoutOptions, geometry: &GridGeometry) -> Element {
    let stride = options.cell_size + options.cell_padding;
    let swatches_width = LEVEL_COUNT as u32 * stride - options.cell_padding;
    let swatches_right = geometry
        .grid_right()
        .saturating_sub(LEGEND_CAPTION_WIDTH + LEGEND_CAPTION_GAP);
    let swatches_left = swatches_right.saturating_sub(swatches_width);
    let top = geometry.grid_bottom() + FOOTER_GAP;
    let baseline = footer_baseline(geometry);

    let mut group = Element::new("g").attr("class", "legend");
    group.push(
        Element::new("text")
            .attr("class", "label")
            .attr("x", swatches_left.saturating_sub(LEGEND_CAPTION_GAP))
            .attr("y", baseline)
            .attr("text-anchor", "end")
            .text("Less")
    );

    for (level, color) in options.palette.colors().iter().enumerate() {
        let mut swatch = Element::new("rect")
            .attr("x", swatches_left + level as u32 * stride)
            .attr("y", top)
            .attr("width", options.cell_size)
            .attr("height", options.cell_size)
            .attr("fill", color);
        if options.corner_radius > 0 {
            swatch.set_attr("rx", options.corner_radius);
            swatch.set_attr("ry", options.corner_radius);
        }
        group.push(swatch);
    }

    group.push(
        Element::new("text")
            .attr("class", "label")
            .attr("x", swatches_right + LEGEND_CAPTION_GAP)
            .attr("y", baseline)
            .text("More")
    );

    group
}

fn summary(total: u32, geometry: &GridGeometry) -> Element {
    Element::new("text")
        .attr("class", "summary")
        .attr("x", geometry.left)
        .attr("y", footer_baseline(geometry))
        .text(summary_text(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calendar::ContributionWeek,
        layout::Padding,
        palette::ColorScheme
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn year_calendar() -> Calendar {
        // 2023-01-01 is a Sunday, 371 days fill 53 full weeks.
        let counts: Vec<u32> = (0..371).map(|index| index % 13).collect();
        Calendar::from_daily_counts(date(2023, 1, 1), &counts)
    }

    fn texts(element: &Element) -> Vec<String> {
        let mut found = Vec::new();
        collect_texts(element, &mut found);
        found
    }

    fn collect_texts(element: &Element, found: &mut Vec<String>) {
        if element.name() == "text" {
            found.push(element.render());
        }
        for child in element.children() {
            collect_texts(child, found);
        }
    }

    fn cell_rects(document: &Element) -> Vec<&Element> {
        document
            .children()
            .iter()
            .find(|child| child.attribute("class") == Some("cells"))
            .map(|group| group.children().iter().collect())
            .unwrap_or_default()
    }

    #[test]
    fn single_week_cells_use_bucketed_palette_colors() {
        let calendar = Calendar::from_daily_counts(date(2024, 1, 7), &[0, 1, 4, 7, 10, 2, 0]);
        let options = LayoutOptions::default();
        let document = build_heatmap(&calendar, &options);

        let levels: Vec<&str> = cell_rects(&document)
            .iter()
            .filter_map(|rect| rect.attribute("data-level"))
            .collect();
        assert_eq!(levels, vec!["0", "1", "2", "3", "4", "1", "0"]);

        let fills: Vec<&str> = cell_rects(&document)
            .iter()
            .filter_map(|rect| rect.attribute("fill"))
            .collect();
        let palette = ColorScheme::Light.palette();
        assert_eq!(fills[4], palette.color(4));
        assert_eq!(fills[0], palette.color(0));
    }

    #[test]
    fn cells_are_placed_by_weekday_not_slot() {
        let day = ContributionDay {
            date:    date(2024, 1, 10),
            count:   3,
            weekday: 3
        };
        let calendar = Calendar {
            total: 3,
            weeks: vec![ContributionWeek {
                first_day: day.date,
                days:      vec![day]
            }]
        };
        let options = LayoutOptions::default();
        let geometry = GridGeometry::new(1, &options);
        let document = build_heatmap(&calendar, &options);

        let rect = cell_rects(&document)[0];
        let expected_y = geometry.cell_y(3).to_string();
        assert_eq!(rect.attribute("y"), Some(expected_y.as_str()));
    }

    #[test]
    fn document_declares_computed_size() {
        let calendar = year_calendar();
        let options = LayoutOptions::default();
        let geometry = GridGeometry::new(53, &options);
        let svg = render_heatmap(&calendar, &options);

        assert!(svg.contains(&format!(
            "width=\"{}\" height=\"{}\"",
            geometry.width, geometry.height
        )));
        assert_eq!(geometry.grid_width, 687);
    }

    #[test]
    fn summary_contains_authoritative_total() {
        let mut calendar = year_calendar();
        calendar.total = 1247;
        let svg = render_heatmap(&calendar, &LayoutOptions::default());

        assert!(svg.contains("1247 contributions this year"));
    }

    #[test]
    fn summary_and_tooltips_agree_in_number() {
        assert_eq!(summary_text(1), "1 contribution this year");
        assert_eq!(
            tooltip_text(1, date(2024, 1, 5)),
            "1 contribution on Jan 5, 2024"
        );
        assert_eq!(
            tooltip_text(0, date(2024, 12, 25)),
            "0 contributions on Dec 25, 2024"
        );
    }

    #[test]
    fn first_week_month_is_never_labeled() {
        // 2024-01-07 is a Sunday; week 4 starts on 2024-02-04.
        let calendar = Calendar::from_daily_counts(date(2024, 1, 7), &[1; 53 * 7]);
        let options = LayoutOptions::default();
        let geometry = GridGeometry::new(53, &options);
        let labels = month_labels(&calendar, &geometry);

        let rendered: Vec<String> = labels.iter().map(Element::render).collect();
        assert_eq!(rendered.len(), 12);

        let february = &rendered[0];
        assert!(february.contains(">Feb<"));
        assert!(february.contains(&format!("x=\"{}\"", geometry.cell_x(4))));

        // The only January label belongs to the following year's week.
        let january: Vec<&String> = rendered.iter().filter(|label| label.contains(">Jan<")).collect();
        assert_eq!(january.len(), 1);
        assert!(january[0].contains(&format!("x=\"{}\"", geometry.cell_x(52))));
    }

    #[test]
    fn first_week_is_skipped_even_when_it_starts_a_month() {
        let calendar = Calendar::from_daily_counts(date(2023, 1, 1), &[0; 21]);
        let options = LayoutOptions::default();
        let labels = month_labels(&calendar, &GridGeometry::new(3, &options));
        assert!(labels.is_empty());
    }

    #[test]
    fn only_three_day_labels_are_rendered() {
        let document = build_heatmap(&year_calendar(), &LayoutOptions::default());
        let labels: Vec<String> = texts(&document)
            .into_iter()
            .filter(|text| text.contains("dominant-baseline"))
            .collect();

        assert_eq!(labels.len(), 3);
        assert!(labels[0].contains(">Mon<"));
        assert!(labels[1].contains(">Wed<"));
        assert!(labels[2].contains(">Fri<"));
    }

    #[test]
    fn toggles_remove_optional_stages() {
        let options = LayoutOptions {
            display_name: Some("Octocat".to_owned()),
            show_title: false,
            show_legend: false,
            show_day_labels: false,
            show_month_labels: false,
            show_summary: false,
            show_tooltips: false,
            corner_radius: 0,
            padding: Padding::uniform(4),
            ..LayoutOptions::default()
        };
        let svg = render_heatmap(&year_calendar(), &options);

        assert!(!svg.contains("<text"));
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("rx="));
        assert!(!svg.contains(":hover"));
        assert!(!svg.contains("class=\"legend\""));
    }

    #[test]
    fn title_is_centered_and_escaped() {
        let options = LayoutOptions {
            display_name: Some("Ada & <Co>".to_owned()),
            ..LayoutOptions::default()
        };
        let geometry = GridGeometry::new(53, &options);
        let svg = render_heatmap(&year_calendar(), &options);

        assert!(svg.contains("Ada &amp; &lt;Co&gt;"));
        assert!(svg.contains(&format!("x=\"{}\"", f64::from(geometry.width) / 2.0)));
    }

    #[test]
    fn tooltips_and_hover_style_follow_toggle() {
        let svg = render_heatmap(&year_calendar(), &LayoutOptions::default());
        assert!(svg.contains("<title>"));
        assert!(svg.contains(".cell:hover"));
        assert!(svg.contains("contributions on Jan 1, 2023"));
    }

    #[test]
    fn legend_has_five_swatches_and_captions() {
        let options = LayoutOptions::default();
        let geometry = GridGeometry::new(53, &options);
        let legend = legend(&options, &geometry);

        let swatches = legend
            .children()
            .iter()
            .filter(|child| child.name() == "rect")
            .count();
        assert_eq!(swatches, LEVEL_COUNT);

        let markup = legend.render();
        assert!(markup.contains(">Less<"));
        assert!(markup.contains(">More<"));
    }

    #[test]
    fn empty_calendar_still_renders_a_document() {
        let calendar = Calendar {
            total: 0,
            weeks: Vec::new()
        };
        let svg = render_heatmap(&calendar, &LayoutOptions::default());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("0 contributions this year"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
