//! Color Contrast
//!
//! WCAG relative luminance and contrast ratio over CSS color strings.

use lens_css::Color;
use serde::Serialize;

use crate::rules::Status;

/// Minimum ratio for normal text (AA)
pub const NORMAL_TEXT_MINIMUM: f64 = 4.5;
/// Minimum ratio for large text (AA)
pub const LARGE_TEXT_MINIMUM: f64 = 3.0;

/// Contrast checker
#[derive(Debug)]
pub struct ContrastChecker;

impl ContrastChecker {
    /// Calculate relative luminance
    pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        }
        0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
    }

    /// Calculate contrast ratio between two luminances
    pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Minimum AA ratio for the text size class
    pub fn requirement(large_text: bool) -> f64 {
        if large_text { LARGE_TEXT_MINIMUM } else { NORMAL_TEXT_MINIMUM }
    }

    /// Check if contrast meets WCAG AA
    pub fn meets_aa(ratio: f64, large_text: bool) -> bool {
        ratio >= Self::requirement(large_text)
    }
}

/// Outcome of the contrast check for one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastResult {
    pub ratio: f64,
    pub requirement: f64,
    pub status: Status,
}

/// Contrast ratio between two CSS colors.
///
/// `None` when either color does not parse or is fully transparent.
/// Partial alpha is ignored, so `contrast(a, b) == contrast(b, a)`.
pub fn contrast(a: &str, b: &str) -> Option<f64> {
    let a = opaque(a)?;
    let b = opaque(b)?;
    Some(ContrastChecker::contrast_ratio(
        ContrastChecker::luminance(a.r, a.g, a.b),
        ContrastChecker::luminance(b.r, b.g, b.b),
    ))
}

fn opaque(css: &str) -> Option<Color> {
    Color::parse(css).filter(|c| !c.is_transparent())
}

/// Grade a ratio against the AA requirement for the text size class
pub fn classify(ratio: f64, large_text: bool) -> ContrastResult {
    let requirement = ContrastChecker::requirement(large_text);
    let status = if ContrastChecker::meets_aa(ratio, large_text) { Status::Pass } else { Status::Fail };
    ContrastResult { ratio, requirement, status }
}

/// Large text: at least 18px, or at least 14px and bold
pub fn is_large_text(font_size_px: f32, font_weight: &str) -> bool {
    if font_size_px >= 18.0 {
        return true;
    }
    let weight = font_weight.trim();
    let bold = weight.eq_ignore_ascii_case("bold")
        || weight.eq_ignore_ascii_case("bolder")
        || weight.parse::<f32>().is_ok_and(|w| w >= 700.0);
    font_size_px >= 14.0 && bold
}
