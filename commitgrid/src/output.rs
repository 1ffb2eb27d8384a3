// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Artifact persistence and optional raster conversion.
//!
//! Writing is best-effort: failures are logged and reported as `false` so a
//! batch of jobs keeps going when one destination is unwritable. Raster
//! support is decided once when the process starts and injected into the
//! pipeline as a [`RasterCapability`].

use std::{fs, path::Path};

use tracing::{debug, info, warn};

use crate::error::{self, Error};

/// Writes SVG markup to `destination`, creating missing parent directories.
///
/// Returns `true` when the file was written. Failures are logged at warn
/// level and swallowed.
pub fn write_markup(markup: &str, destination: &Path) -> bool {
    match try_write(markup, destination) {
        Ok(()) => {
            debug!(path = %destination.display(), bytes = markup.len(), "wrote markup");
            true
        }
        Err(error) => {
            warn!("{}", error.to_display_string());
            false
        }
    }
}

fn try_write(markup: &str, destination: &Path) -> Result<(), Error> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| error::output_io_error(parent, source))?;
    }
    fs::write(destination, markup).map_err(|source| error::output_io_error(destination, source))
}

/// Requested PNG properties.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RasterOptions {
    /// Requested quality in percent. PNG is lossless, so the value is only
    /// recorded.
    pub quality: Option<u8>,
    /// Multiplier applied to the intrinsic size.
    pub scale:   Option<f32>,
    /// Explicit width in pixels.
    pub width:   Option<u32>,
    /// Explicit height in pixels.
    pub height:  Option<u32>
}

impl RasterOptions {
    /// Output size for a document with the given intrinsic size.
    ///
    /// Explicit dimensions win over `scale`. A single explicit dimension
    /// keeps the aspect ratio.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitgrid::RasterOptions;
    ///
    /// let options = RasterOptions {
    ///     width: Some(3168),
    ///     scale: Some(4.0),
    ///     ..RasterOptions::default()
    /// };
    /// assert_eq!(options.target_size(1584.0, 396.0), (3168, 792));
    /// ```
    pub fn target_size(&self, intrinsic_width: f32, intrinsic_height: f32) -> (u32, u32) {
        let ratio = if intrinsic_width > 0.0 {
            intrinsic_height / intrinsic_width
        } else {
            1.0
        };

        let (width, height) = match (self.width, self.height) {
            (Some(width), Some(height)) => (width as f32, height as f32),
            (Some(width), None) => (width as f32, width as f32 * ratio),
            (None, Some(height)) => (height as f32 / ratio, height as f32),
            (None, None) => {
                let scale = self.scale.unwrap_or(1.0);
                (intrinsic_width * scale, intrinsic_height * scale)
            }
        };

        (to_pixels(width), to_pixels(height))
    }
}

fn to_pixels(value: f32) -> u32 {
    if value.is_finite() {
        (value.round() as u32).max(1)
    } else {
        1
    }
}

/// Converts SVG markup into a PNG file.
pub trait Rasterizer: Send + Sync {
    /// Renders `svg` to `destination` and returns the pixel size written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Raster`] when the markup cannot be parsed or the
    /// image cannot be encoded or stored.
    fn rasterize(
        &self,
        svg: &str,
        destination: &Path,
        options: &RasterOptions
    ) -> Result<(u32, u32), Error>;
}

/// Raster support available to the process.
pub enum RasterCapability {
    /// Conversion is performed by the contained rasterizer.
    Available(Box<dyn Rasterizer>),
    /// Conversion requests are skipped.
    Unavailable
}

impl std::fmt::Debug for RasterCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterCapability::Available(_) => f.write_str("RasterCapability::Available"),
            RasterCapability::Unavailable => f.write_str("RasterCapability::Unavailable")
        }
    }
}

impl RasterCapability {
    /// Capability compiled into this build.
    pub fn detect() -> Self {
        #[cfg(feature = "raster")]
        {
            RasterCapability::Available(Box::new(ResvgRasterizer))
        }
        #[cfg(not(feature = "raster"))]
        {
            RasterCapability::Unavailable
        }
    }

    /// Whether conversions will be attempted.
    pub fn is_available(&self) -> bool {
        matches!(self, RasterCapability::Available(_))
    }

    /// Converts `svg` into a PNG at `destination`.
    ///
    /// Returns `true` when a file was written. Missing support is logged at
    /// info level; conversion failures at warn level. Neither is an error.
    pub fn convert(&self, svg: &str, destination: &Path, options: &RasterOptions) -> bool {
        let rasterizer = match self {
            RasterCapability::Available(rasterizer) => rasterizer,
            RasterCapability::Unavailable => {
                info!(
                    path = %destination.display(),
                    "raster support is not compiled in; skipping PNG conversion"
                );
                return false;
            }
        };

        match rasterizer.rasterize(svg, destination, options) {
            Ok((width, height)) => {
                info!(
                    path = %destination.display(),
                    width,
                    height,
                    quality = options.quality,
                    "wrote PNG"
                );
                true
            }
            Err(error) => {
                warn!(path = %destination.display(), "{}", error.to_display_string());
                false
            }
        }
    }
}

/// Rasterizer backed by resvg.
#[cfg(feature = "raster")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgRasterizer;

#[cfg(feature = "raster")]
impl Rasterizer for ResvgRasterizer {
    fn rasterize(
        &self,
        svg: &str,
        destination: &Path,
        options: &RasterOptions
    ) -> Result<(u32, u32), Error> {
        use resvg::{tiny_skia, usvg};

        let mut parse_options = usvg::Options::default();
        parse_options.fontdb_mut().load_system_fonts();

        let tree = usvg::Tree::from_str(svg, &parse_options)
            .map_err(|e| Error::raster(format!("failed to parse SVG: {e}")))?;
        let size = tree.size();
        let (width, height) = options.target_size(size.width(), size.height());

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| Error::raster(format!("failed to allocate {width}x{height} pixmap")))?;
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height()
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                Error::raster(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        pixmap
            .save_png(destination)
            .map_err(|e| Error::raster(format!("failed to encode PNG: {e}")))?;

        Ok((width, height))
    }
}
