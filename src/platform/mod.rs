//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Mounting on a canvas and wiring DOM input (web only)
//! - Errors surfaced to the embedding page

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

use crate::settings::{QualityPreset, Settings};
use crate::sim::ContentKind;

/// Failures while mounting or driving the game from the page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element with id '{0}'")]
    CanvasNotFound(String),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),
    #[error("2D canvas context unavailable")]
    NoContext,
    #[error("unknown content kind '{0}'")]
    UnknownContent(String),
    #[error("unknown quality preset '{0}'")]
    UnknownQuality(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Parse a content name coming from the page
pub fn parse_content(name: &str) -> Result<ContentKind, PlatformError> {
    ContentKind::from_str(name).ok_or_else(|| PlatformError::UnknownContent(name.to_string()))
}

pub fn parse_quality(name: &str) -> Result<QualityPreset, PlatformError> {
    QualityPreset::from_str(name).ok_or_else(|| PlatformError::UnknownQuality(name.to_string()))
}

/// Copy of `current` with one named toggle changed
pub fn with_option(current: &Settings, name: &str, on: bool) -> Result<Settings, PlatformError> {
    let mut settings = current.clone();
    if settings.set_option(name, on) {
        Ok(settings)
    } else {
        Err(PlatformError::UnknownOption(name.to_string()))
    }
}

/// Wall clock in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall clock in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_names_parse() {
        assert_eq!(parse_content("Music"), Ok(ContentKind::Music));
        assert_eq!(parse_content("mail"), Ok(ContentKind::Contact));
        assert_eq!(
            parse_content("shop"),
            Err(PlatformError::UnknownContent("shop".into()))
        );
    }

    #[test]
    fn settings_names_parse() {
        assert_eq!(parse_quality("high"), Ok(QualityPreset::High));
        assert_eq!(
            parse_quality("ultra"),
            Err(PlatformError::UnknownQuality("ultra".into()))
        );

        let base = Settings::default();
        let changed = with_option(&base, "trails", false).unwrap();
        assert!(!changed.trails);
        assert!(base.trails);
        assert_eq!(
            with_option(&base, "fog", true),
            Err(PlatformError::UnknownOption("fog".into()))
        );
    }

    #[test]
    fn errors_read_well() {
        assert_eq!(
            PlatformError::CanvasNotFound("game".into()).to_string(),
            "no element with id 'game'"
        );
        assert_eq!(PlatformError::NoContext.to_string(), "2D canvas context unavailable");
    }

    #[test]
    fn clock_moves_forward() {
        let a = now_ms();
        let b = now_ms();
        assert!(a > 0.0 && b >= a);
    }
}
