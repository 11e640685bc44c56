//! Structured error types for the arrangement engine.
//!
//! Only a few things can actually go wrong: the input document fails to
//! parse, its page geometry leaves no room for content, or the engine catches
//! its fit estimate and its committed layout disagreeing.
//! Running out of room in a bounded container is reported as
//! [`LayoutError::ExtentExhausted`] internally, but the arrangement loop turns
//! it into a truncation outcome before it reaches the caller.

use thiserror::Error;

use crate::layout::extent::ExtentRef;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Content was emitted past the bottom of an extent. This means the
    /// fit estimate and the committed layout disagreed; the document is
    /// abandoned rather than rendered with overlapping content.
    #[error(
        "over-consumption on extent {extent}: requested {requested:.3}pt with {remaining:.3}pt remaining"
    )]
    OverConsumption {
        requested: f64,
        remaining: f64,
        extent: ExtentRef,
    },

    /// A block measured as fitting whole could not be emitted whole.
    #[error("fit estimate disagreed with emission on extent {extent}: stopped at {cursor:.3}")]
    FitMismatch { extent: ExtentRef, cursor: f64 },

    /// The page margins leave no height for content.
    #[error("page has no room for content: body height is {capacity:.3}pt")]
    InvalidGeometry { capacity: f64 },

    /// A bounded container was asked for a continuation extent.
    #[error("extent {extent} is a bounded container and cannot advance")]
    ExtentExhausted { extent: ExtentRef },

    /// JSON input failed to parse as a valid document.
    #[error("failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        LayoutError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_carries_hint() {
        let err: LayoutError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let message = err.to_string();
        assert!(message.starts_with("failed to parse document"));
        assert!(message.contains("trailing commas"));
    }

    #[test]
    fn invalid_geometry_reports_capacity() {
        let err = LayoutError::InvalidGeometry { capacity: -60.0 };
        assert_eq!(err.to_string(), "page has no room for content: body height is -60.000pt");
    }

    #[test]
    fn over_consumption_names_extent() {
        let err = LayoutError::OverConsumption {
            requested: 30.0,
            remaining: 12.5,
            extent: ExtentRef { id: 0, number: 3 },
        };
        assert_eq!(
            err.to_string(),
            "over-consumption on extent #0 (page 3): requested 30.000pt with 12.500pt remaining"
        );
    }
}
