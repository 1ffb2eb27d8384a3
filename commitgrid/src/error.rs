#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the commitgrid crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Rendering itself never fails. Errors originate from the edges of the
//! pipeline: reading job documents, talking to GitHub, decoding saved
//! calendars and writing artifacts.

use std::path::{Path, PathBuf};

/// Unified error type returned by the library and CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading job documents or calendars.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the file being read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors of job documents.
    #[error("failed to parse job configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when a job document or option set violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when emitting JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps decoding errors of a saved calendar file.
    #[error("failed to decode calendar at {path:?}: {source}")]
    Calendar {
        /// Location of the calendar file.
        path:   PathBuf,
        /// Underlying decoding error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing rendered documents.
    #[error("failed to write artifact at {path:?}: {source}")]
    Output {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Raster conversion failures.
    #[error("raster conversion failed: {message}")]
    Raster {
        /// Human readable message describing the conversion failure.
        message: String
    },
    /// Errors reported by the contribution data source.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs a raster conversion error.
    pub fn raster<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Raster {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Output`] variant capturing the failing path and
/// source.
pub fn output_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Output {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Calendar`] variant for an undecodable calendar file.
pub fn calendar_error(path: &Path, source: serde_json::Error) -> Error {
    Error::Calendar {
        path: path.to_path_buf(),
        source
    }
}
