// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration document types describing render jobs.
//!
//! The types in this module mirror the YAML documents consumed by the
//! `render` command. Every field except the account login is optional; the
//! `jobs` module resolves defaults and validates values.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{banner::Icon, layout::LayoutOverrides, palette::ColorScheme, presets::Preset};

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use commitgrid::JobsConfig;
///
/// let yaml = r#"
/// jobs:
///   - user: octocat
///     preset: banner
///     theme: neon
/// "#;
/// let config: JobsConfig = serde_yaml::from_str(yaml).expect("valid configuration");
/// assert_eq!(config.jobs.len(), 1);
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct JobsConfig {
    /// Render jobs in execution order.
    #[serde(default)]
    pub jobs: Vec<JobEntry>
}

/// Raw configuration entry describing one render before normalization.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct JobEntry {
    /// GitHub login whose calendar is rendered.
    #[serde(alias = "username", alias = "login")]
    pub user: String,

    /// Named preset. Defaults to `standard`.
    #[serde(default)]
    pub preset: Option<Preset>,

    /// Color scheme. Defaults to `light`.
    #[serde(default, alias = "color_scheme")]
    pub theme: Option<ColorScheme>,

    /// Destination of the SVG document.
    #[serde(default)]
    pub output: Option<String>,

    /// Name shown in the heatmap title and as the banner heading.
    #[serde(default)]
    pub display_name: Option<String>,

    /// First day of the fetched window.
    #[serde(default)]
    pub from: Option<NaiveDate>,

    /// Last day of the fetched window.
    #[serde(default)]
    pub to: Option<NaiveDate>,

    /// Saved calendar JSON used instead of the GitHub API.
    #[serde(default)]
    pub calendar_file: Option<String>,

    /// Optional PNG conversion of the rendered document.
    #[serde(default)]
    pub png: Option<PngEntry>,

    /// Layout overrides applied on top of the preset.
    #[serde(default)]
    pub layout: Option<LayoutOverrides>,

    /// Banner text and icons. Ignored by heatmap presets.
    #[serde(default)]
    pub banner: Option<BannerEntry>
}

impl JobEntry {
    /// Entry for `user` with every optional field unset.
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }

    /// Preset after applying the default.
    pub fn resolved_preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }

    /// Slug used for default file names: the lowercase login followed by
    /// the preset name.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitgrid::{JobEntry, Preset};
    ///
    /// let mut entry = JobEntry::for_user("OctoCat");
    /// entry.preset = Some(Preset::BannerGrid);
    /// assert_eq!(entry.resolved_slug(), "octocat-banner-grid");
    /// ```
    pub fn resolved_slug(&self) -> String {
        format!(
            "{}-{}",
            self.user.trim().to_ascii_lowercase(),
            self.resolved_preset().name()
        )
    }

    /// Display name with surrounding whitespace removed. Blank values count
    /// as unset.
    pub fn resolved_display_name(&self) -> Option<String> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    }
}

/// PNG conversion settings.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PngEntry {
    /// Destination of the PNG file. Defaults to the SVG path with a `.png`
    /// extension.
    #[serde(default)]
    pub output: Option<String>,

    /// Multiplier applied to the intrinsic size.
    #[serde(default, deserialize_with = "deserialize_optional_scale")]
    pub scale: Option<f32>,

    /// Explicit output width in pixels.
    #[serde(default, deserialize_with = "deserialize_optional_dimension")]
    pub width: Option<u32>,

    /// Explicit output height in pixels.
    #[serde(default, deserialize_with = "deserialize_optional_dimension")]
    pub height: Option<u32>,

    /// Requested quality between 1 and 100.
    #[serde(default, deserialize_with = "deserialize_optional_quality")]
    pub quality: Option<u8>
}

/// Banner customization entry.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BannerEntry {
    /// Handle shown above the heading. Defaults to the login for text
    /// banners.
    #[serde(default)]
    pub handle: Option<String>,

    /// Heading line. Defaults to the display name for text banners.
    #[serde(default)]
    pub heading: Option<String>,

    /// Line under the heading.
    #[serde(default)]
    pub subheading: Option<String>,

    /// Multi-line text separated by `\n`.
    #[serde(default)]
    pub callout: Option<String>,

    /// Icons replacing the preset's icon grid. An empty list removes it.
    #[serde(default)]
    pub icons: Option<Vec<Icon>>,

    /// Icons per row between 1 and 6.
    #[serde(default, deserialize_with = "deserialize_optional_columns")]
    pub icon_columns: Option<u32>
}

fn deserialize_optional_scale<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>
{
    let value = Option::<f32>::deserialize(deserializer)?;
    match value {
        Some(scale) if !scale.is_finite() || scale <= 0.0 => Err(serde::de::Error::custom(
            format!("png scale must be a positive number, got {scale}")
        )),
        other => Ok(other)
    }
}

fn deserialize_optional_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>
{
    let value = Option::<u32>::deserialize(deserializer)?;
    if value == Some(0) {
        return Err(serde::de::Error::custom("png dimensions must be greater than zero"));
    }
    Ok(value)
}

fn deserialize_optional_quality<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>
{
    let value = Option::<u8>::deserialize(deserializer)?;
    match value {
        Some(quality) if !(1..=100).contains(&quality) => Err(serde::de::Error::custom(format!(
            "png quality must be between 1 and 100, got {quality}"
        ))),
        other => Ok(other)
    }
}

fn deserialize_optional_columns<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>
{
    let value = Option::<u32>::deserialize(deserializer)?;
    match value {
        Some(columns) if !(1..=6).contains(&columns) => Err(serde::de::Error::custom(format!(
            "icon_columns must be between 1 and 6, got {columns}"
        ))),
        other => Ok(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_entry_deserializes() {
        let yaml = r##"
jobs:
  - username: octocat
    preset: banner-showcase
    theme: neon
    output: out/octocat.svg
    display_name: "  The Octocat  "
    from: 2024-01-01
    to: 2024-12-31
    png:
      scale: 2.0
      quality: 90
    layout:
      cell_size: 12
      padding:
        left: 40
    banner:
      heading: Building things
      callout: "Rust\nOpen source"
      icons: [code, git_branch]
      icon_columns: 2
"##;
        let config: JobsConfig = serde_yaml::from_str(yaml).expect("valid configuration");
        let entry = &config.jobs[0];

        assert_eq!(entry.user, "octocat");
        assert_eq!(entry.preset, Some(Preset::BannerShowcase));
        assert_eq!(entry.theme, Some(ColorScheme::Neon));
        assert_eq!(entry.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(entry.resolved_display_name().as_deref(), Some("The Octocat"));
        assert_eq!(entry.png.as_ref().and_then(|png| png.scale), Some(2.0));
        let layout = entry.layout.as_ref().expect("layout overrides");
        assert_eq!(layout.cell_size, Some(12));
        let banner = entry.banner.as_ref().expect("banner entry");
        assert_eq!(banner.icons, Some(vec![Icon::Code, Icon::GitBranch]));
        assert_eq!(banner.callout.as_deref(), Some("Rust\nOpen source"));
    }

    #[test]
    fn slug_defaults_to_standard_preset() {
        let entry = JobEntry::for_user("Octocat");
        assert_eq!(entry.resolved_slug(), "octocat-standard");
    }

    #[test]
    fn blank_display_name_is_unset() {
        let entry = JobEntry {
            display_name: Some("   ".to_owned()),
            ..JobEntry::for_user("octocat")
        };
        assert_eq!(entry.resolved_display_name(), None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "user: octocat\ncolour: red\n";
        let error = serde_yaml::from_str::<JobEntry>(yaml).expect_err("expected unknown field");
        assert!(error.to_string().contains("colour"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let yaml = "user: octocat\ntheme: plaid\n";
        assert!(serde_yaml::from_str::<JobEntry>(yaml).is_err());
    }

    #[test]
    fn png_quality_outside_range_is_rejected() {
        let error = serde_yaml::from_str::<PngEntry>("quality: 0").expect_err("expected error");
        assert!(error.to_string().contains("between 1 and 100"));
        assert!(serde_yaml::from_str::<PngEntry>("quality: 100").is_ok());
    }

    #[test]
    fn png_scale_must_be_positive() {
        let error = serde_yaml::from_str::<PngEntry>("scale: -1.5").expect_err("expected error");
        assert!(error.to_string().contains("positive"));
    }

    #[test]
    fn zero_png_width_is_rejected() {
        assert!(serde_yaml::from_str::<PngEntry>("width: 0").is_err());
    }

    #[test]
    fn icon_columns_are_bounded() {
        let error =
            serde_yaml::from_str::<BannerEntry>("icon_columns: 9").expect_err("expected error");
        assert!(error.to_string().contains("between 1 and 6"));
    }
}
