//! Structured error types for the report generator.
//!
//! Only unrecoverable conditions surface here: a config that cannot be parsed
//! or validated, a missing banner photo, an unusable value font, or a failed
//! write. A broken image inside a figure block is not an error; the block is
//! skipped and the rest of the report still renders.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public labreport functions.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON input failed to parse as a report config.
    #[error("Failed to parse report config: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A required asset does not exist on disk.
    #[error("Missing {what}: '{}'", .path.display())]
    MissingAsset { what: &'static str, path: PathBuf },

    /// An image could not be read or decoded.
    #[error("Image error for '{src}': {message}")]
    Image { src: String, message: String },

    /// A font could not be loaded or parsed.
    #[error("Font error: {0}")]
    Font(String),

    /// The config parsed but holds values the layout cannot use.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Reading the input or writing the output failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check key names, \
                 that `lab_image` is present, and that items are [label, value] pairs."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the draft file truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: ReportError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse report config"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn missing_asset_names_the_path() {
        let err = ReportError::MissingAsset {
            what: "banner photo",
            path: PathBuf::from("/nope/lab.jpg"),
        };
        assert_eq!(err.to_string(), "Missing banner photo: '/nope/lab.jpg'");
    }
}
