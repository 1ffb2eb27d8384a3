// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Layout options and grid geometry for heatmap documents.
//!
//! [`LayoutOptions`] is constructed fresh for each render, usually from a
//! preset, and then adjusted through [`LayoutOverrides`]. Overrides replace
//! whole values with the exception of the padding box, which merges field by
//! field.
//!
//! [`GridGeometry`] turns the options and a week count into pixel positions.

use serde::{Deserialize, Serialize};

use crate::{
    calendar::DAYS_PER_WEEK,
    error::Error,
    palette::{ColorScheme, Palette}
};

/// Minimum left margin reserved for the `Mon`/`Wed`/`Fri` labels.
pub const DAY_LABEL_MARGIN: u32 = 32;
/// Minimum top margin reserved for month labels.
pub const MONTH_LABEL_MARGIN: u32 = 20;
/// Vertical band reserved above the grid for the title.
pub const TITLE_BAND: u32 = 24;
/// Gap between the grid and the legend/summary row.
pub const FOOTER_GAP: u32 = 8;

/// Margins around the grid in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    /// Space above the grid.
    pub top:    u32,
    /// Space to the right of the grid.
    pub right:  u32,
    /// Space below the grid.
    pub bottom: u32,
    /// Space to the left of the grid.
    pub left:   u32
}

impl Padding {
    /// Same margin on all four sides.
    pub const fn uniform(value: u32) -> Self {
        Self {
            top:    value,
            right:  value,
            bottom: value,
            left:   value
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(20)
    }
}

/// Complete set of options driving a heatmap render.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Edge length of a cell.
    pub cell_size:         u32,
    /// Gap between neighbouring cells.
    pub cell_padding:      u32,
    /// Corner radius applied to every cell, `0` for square cells.
    pub corner_radius:     u32,
    /// Fill colors for levels `0` to `4`.
    pub palette:           Palette,
    /// Canvas background.
    pub background:        String,
    /// Title and summary color.
    pub text_color:        String,
    /// Label and caption color.
    pub muted_color:       String,
    /// CSS font family list.
    pub font_family:       String,
    /// Base font size for labels.
    pub font_size:         u32,
    /// Name shown in the title.
    pub display_name:      Option<String>,
    /// Render the title when a display name is present.
    pub show_title:        bool,
    /// Render the Less/More legend.
    pub show_legend:       bool,
    /// Render the `Mon`/`Wed`/`Fri` labels.
    pub show_day_labels:   bool,
    /// Render month labels above the grid.
    pub show_month_labels: bool,
    /// Render the total contributions line.
    pub show_summary:      bool,
    /// Attach a hover tooltip to every cell.
    pub show_tooltips:     bool,
    /// Margins around the grid.
    pub padding:           Padding
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::themed(ColorScheme::default())
    }
}

impl LayoutOptions {
    /// Default options colored by the given scheme.
    pub fn themed(scheme: ColorScheme) -> Self {
        let colors = scheme.colors();
        Self {
            cell_size:         11,
            cell_padding:      2,
            corner_radius:     2,
            palette:           scheme.palette(),
            background:        colors.background.to_owned(),
            text_color:        colors.text.to_owned(),
            muted_color:       colors.muted.to_owned(),
            font_family:       "-apple-system, 'Segoe UI', Helvetica, Arial, sans-serif".to_owned(),
            font_size:         10,
            display_name:      None,
            show_title:        true,
            show_legend:       true,
            show_day_labels:   true,
            show_month_labels: true,
            show_summary:      true,
            show_tooltips:     true,
            padding:           Padding::default()
        }
    }

    /// Applies caller overrides. Set fields win, padding merges per side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when an override palette does not hold
    /// exactly five hex colors.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitgrid::{LayoutOptions, LayoutOverrides, PaddingOverrides};
    ///
    /// let overrides = LayoutOverrides {
    ///     cell_size: Some(14),
    ///     padding: Some(PaddingOverrides {
    ///         left: Some(4),
    ///         ..PaddingOverrides::default()
    ///     }),
    ///     ..LayoutOverrides::default()
    /// };
    /// let options = LayoutOptions::default().with_overrides(&overrides)?;
    /// assert_eq!(options.cell_size, 14);
    /// assert_eq!(options.padding.left, 4);
    /// assert_eq!(options.padding.top, 20);
    /// # Ok::<(), commitgrid::Error>(())
    /// ```
    pub fn with_overrides(mut self, overrides: &LayoutOverrides) -> Result<Self, Error> {
        if let Some(value) = overrides.cell_size {
            self.cell_size = value;
        }
        if let Some(value) = overrides.cell_padding {
            self.cell_padding = value;
        }
        if let Some(value) = overrides.corner_radius {
            self.corner_radius = value;
        }
        if let Some(colors) = overrides.palette.as_ref() {
            self.palette = Palette::try_from(colors.clone())?;
        }
        if let Some(value) = overrides.background.as_ref() {
            self.background = value.clone();
        }
        if let Some(value) = overrides.text_color.as_ref() {
            self.text_color = value.clone();
        }
        if let Some(value) = overrides.muted_color.as_ref() {
            self.muted_color = value.clone();
        }
        if let Some(value) = overrides.font_family.as_ref() {
            self.font_family = value.clone();
        }
        if let Some(value) = overrides.font_size {
            self.font_size = value;
        }
        if let Some(value) = overrides.show_title {
            self.show_title = value;
        }
        if let Some(value) = overrides.show_legend {
            self.show_legend = value;
        }
        if let Some(value) = overrides.show_day_labels {
            self.show_day_labels = value;
        }
        if let Some(value) = overrides.show_month_labels {
            self.show_month_labels = value;
        }
        if let Some(value) = overrides.show_summary {
            self.show_summary = value;
        }
        if let Some(value) = overrides.show_tooltips {
            self.show_tooltips = value;
        }
        if let Some(padding) = overrides.padding.as_ref() {
            self.padding = padding.apply(self.padding);
        }
        Ok(self)
    }

    /// Whether the title stage emits anything.
    pub fn renders_title(&self) -> bool {
        self.show_title
            && self
                .display_name
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty())
    }
}

/// Partial layout options read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutOverrides {
    /// Cell edge length override.
    #[serde(default)]
    pub cell_size:         Option<u32>,
    /// Cell gap override.
    #[serde(default)]
    pub cell_padding:      Option<u32>,
    /// Corner radius override.
    #[serde(default)]
    pub corner_radius:     Option<u32>,
    /// Custom palette; must hold exactly five hex colors.
    #[serde(default)]
    pub palette:           Option<Vec<String>>,
    /// Background color override.
    #[serde(default)]
    pub background:        Option<String>,
    /// Text color override.
    #[serde(default)]
    pub text_color:        Option<String>,
    /// Label color override.
    #[serde(default)]
    pub muted_color:       Option<String>,
    /// Font family override.
    #[serde(default)]
    pub font_family:       Option<String>,
    /// Font size override.
    #[serde(default)]
    pub font_size:         Option<u32>,
    /// Title visibility override.
    #[serde(default)]
    pub show_title:        Option<bool>,
    /// Legend visibility override.
    #[serde(default)]
    pub show_legend:       Option<bool>,
    /// Weekday label visibility override.
    #[serde(default)]
    pub show_day_labels:   Option<bool>,
    /// Month label visibility override.
    #[serde(default)]
    pub show_month_labels: Option<bool>,
    /// Summary line visibility override.
    #[serde(default)]
    pub show_summary:      Option<bool>,
    /// Cell tooltip override.
    #[serde(default)]
    pub show_tooltips:     Option<bool>,
    /// Per-side padding overrides.
    #[serde(default)]
    pub padding:           Option<PaddingOverrides>
}

/// Per-side padding overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaddingOverrides {
    /// Top padding override.
    #[serde(default)]
    pub top:    Option<u32>,
    /// Right padding override.
    #[serde(default)]
    pub right:  Option<u32>,
    /// Bottom padding override.
    #[serde(default)]
    pub bottom: Option<u32>,
    /// Left padding override.
    #[serde(default)]
    pub left:   Option<u32>
}

impl PaddingOverrides {
    /// Replaces the sides that are set and keeps the rest of `base`.
    pub fn apply(&self, base: Padding) -> Padding {
        Padding {
            top:    self.top.unwrap_or(base.top),
            right:  self.right.unwrap_or(base.right),
            bottom: self.bottom.unwrap_or(base.bottom),
            left:   self.left.unwrap_or(base.left)
        }
    }
}

/// Pixel geometry of a heatmap for a given week count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Number of grid columns.
    pub weeks:        u32,
    /// Edge length of a cell.
    pub cell_size:    u32,
    /// Gap between cells.
    pub cell_padding: u32,
    /// X of the first column.
    pub left:         u32,
    /// Y of the first row.
    pub top:          u32,
    /// Width of the cell block without trailing padding.
    pub grid_width:   u32,
    /// Height of the cell block without trailing padding.
    pub grid_height:  u32,
    /// Full document width.
    pub width:        u32,
    /// Full document height.
    pub height:       u32
}

impl GridGeometry {
    /// Computes the geometry of a grid with `weeks` columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitgrid::{GridGeometry, LayoutOptions};
    ///
    /// let geometry = GridGeometry::new(53, &LayoutOptions::default());
    /// assert_eq!(geometry.grid_width, 687);
    /// assert_eq!(geometry.grid_height, 89);
    /// ```
    pub fn new(weeks: usize, options: &LayoutOptions) -> Self {
        let weeks = u32::try_from(weeks).unwrap_or(u32::MAX);
        let stride = options.cell_size + options.cell_padding;
        let span = |count: u32| count.saturating_mul(stride).saturating_sub(options.cell_padding);

        let grid_width = if weeks == 0 { 0 } else { span(weeks) };
        let grid_height = span(DAYS_PER_WEEK as u32);

        let padding = options.padding;
        let left = if options.show_day_labels {
            padding.left.max(DAY_LABEL_MARGIN)
        } else {
            padding.left
        };
        let title_band = if options.renders_title() { TITLE_BAND } else { 0 };
        let top = title_band
            + if options.show_month_labels {
                padding.top.max(MONTH_LABEL_MARGIN)
            } else {
                padding.top
            };
        let footer = if options.show_legend || options.show_summary {
            FOOTER_GAP + options.cell_size
        } else {
            0
        };

        Self {
            weeks,
            cell_size: options.cell_size,
            cell_padding: options.cell_padding,
            left,
            top,
            grid_width,
            grid_height,
            width: left + grid_width + padding.right,
            height: top + grid_height + footer + padding.bottom
        }
    }

    /// X coordinate of column `week`.
    pub fn cell_x(&self, week: usize) -> u32 {
        self.left + week as u32 * self.stride()
    }

    /// Y coordinate of row `weekday`.
    pub fn cell_y(&self, weekday: u8) -> u32 {
        self.top + u32::from(weekday) * self.stride()
    }

    /// Right edge of the cell block.
    pub fn grid_right(&self) -> u32 {
        self.left + self.grid_width
    }

    /// Bottom edge of the cell block.
    pub fn grid_bottom(&self) -> u32 {
        self.top + self.grid_height
    }

    /// Vertical center of row `weekday`.
    pub fn row_center(&self, weekday: u8) -> f64 {
        f64::from(self.cell_y(weekday)) + f64::from(self.cell_size) / 2.0
    }

    fn stride(&self) -> u32 {
        self.cell_size + self.cell_padding
    }
}
