//! Computed style values
//!
//! Only the properties that feed contrast and large-text checks are tracked.

use crate::{Color, Declaration};

/// Root font size in px (`rem` base and `medium`)
const ROOT_FONT_SIZE: f32 = 16.0;

/// Computed style of one element
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ComputedStyle {
    /// Foreground (text) color, inherited
    pub color: Color,
    /// Background color, not inherited
    pub background_color: Color,
    /// Font size in px, inherited
    pub font_size: f32,
    /// Numeric font weight, inherited
    pub font_weight: u16,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            font_size: ROOT_FONT_SIZE,
            font_weight: 400,
        }
    }
}

impl ComputedStyle {
    /// Starting point for a child: inherited properties copied, the rest initial
    pub fn inherit_from(parent: &ComputedStyle) -> Self {
        Self {
            color: parent.color,
            font_size: parent.font_size,
            font_weight: parent.font_weight,
            ..Self::default()
        }
    }

    /// Apply one cascaded declaration. Unparseable values are ignored.
    pub fn apply_declaration(&mut self, decl: &Declaration, parent: &ComputedStyle) {
        let value = decl.value.trim().to_ascii_lowercase();
        let initial = Self::default();

        match value.as_str() {
            "inherit" => {
                self.set_from(&decl.property, parent);
                return;
            }
            "initial" => {
                self.set_from(&decl.property, &initial);
                return;
            }
            "unset" | "revert" | "revert-layer" => {
                let source = match decl.property.as_str() {
                    "background-color" | "background" => &initial,
                    _ => parent,
                };
                self.set_from(&decl.property, source);
                return;
            }
            _ => {}
        }

        match decl.property.as_str() {
            "color" => {
                if value == "currentcolor" {
                    self.color = parent.color;
                } else if let Some(c) = Color::parse(&value) {
                    self.color = c;
                }
            }
            "background-color" => {
                if let Some(c) = self.parse_color_value(&value) {
                    self.background_color = c;
                }
            }
            "background" => {
                self.background_color = split_top_level(&value)
                    .into_iter()
                    .rev()
                    .find_map(|token| self.parse_color_value(token))
                    .unwrap_or(Color::TRANSPARENT);
            }
            "font-size" => {
                if let Some(px) = parse_font_size(&value, parent.font_size) {
                    self.font_size = px;
                }
            }
            "font-weight" => {
                if let Some(w) = parse_font_weight(&value, parent.font_weight) {
                    self.font_weight = w;
                }
            }
            "font" => self.apply_font_shorthand(&value, parent),
            _ => {}
        }
    }

    fn parse_color_value(&self, value: &str) -> Option<Color> {
        if value == "currentcolor" {
            Some(self.color)
        } else {
            Color::parse(value)
        }
    }

    fn set_from(&mut self, property: &str, source: &ComputedStyle) {
        match property {
            "color" => self.color = source.color,
            "background-color" | "background" => self.background_color = source.background_color,
            "font-size" => self.font_size = source.font_size,
            "font-weight" => self.font_weight = source.font_weight,
            "font" => {
                self.font_size = source.font_size;
                self.font_weight = source.font_weight;
            }
            _ => {}
        }
    }

    /// `font: [style] [variant] [weight] size[/line-height] family`
    fn apply_font_shorthand(&mut self, value: &str, parent: &ComputedStyle) {
        let mut weight = 400;
        for token in split_top_level(value) {
            if let Some(w) = parse_font_weight(token, parent.font_weight).filter(|_| token != "normal") {
                weight = w;
                continue;
            }
            let size = token.split('/').next().unwrap_or(token);
            if let Some(px) = parse_font_size(size, parent.font_size) {
                self.font_size = px;
                self.font_weight = weight;
                return;
            }
        }
        // System fonts and anything without a size leave the style untouched
    }
}

/// Resolve a `font-size` value to px against the parent size
pub fn parse_font_size(value: &str, parent_px: f32) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let keyword = match value.as_str() {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(ROOT_FONT_SIZE),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        "xxx-large" => Some(48.0),
        "larger" => Some(parent_px * 1.2),
        "smaller" => Some(parent_px / 1.2),
        "0" => Some(0.0),
        _ => None,
    };
    if keyword.is_some() {
        return keyword;
    }

    let split = value
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let n: f32 = number.trim().parse().ok()?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }

    let px = match unit {
        "px" => n,
        "em" => n * parent_px,
        "rem" => n * ROOT_FONT_SIZE,
        "%" => n * parent_px / 100.0,
        "pt" => n * 4.0 / 3.0,
        "pc" => n * 16.0,
        "in" => n * 96.0,
        "cm" => n * 96.0 / 2.54,
        "mm" => n * 96.0 / 25.4,
        _ => return None,
    };
    Some(px)
}

/// Resolve a `font-weight` value against the parent weight
pub fn parse_font_weight(value: &str, parent: u16) -> Option<u16> {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" => Some(700),
        "bolder" => Some(match parent {
            0..=349 => 400,
            350..=549 => 700,
            _ => 900,
        }),
        "lighter" => Some(match parent {
            0..=549 => 100,
            550..=749 => 400,
            _ => 700,
        }),
        other => {
            let n: f32 = other.parse().ok()?;
            (1.0..=1000.0).contains(&n).then(|| n.round() as u16)
        }
    }
}

/// Split on whitespace that is not inside parentheses
fn split_top_level(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    out.push(&value[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(&value[s..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_units() {
        assert_eq!(parse_font_size("24px", 16.0), Some(24.0));
        assert_eq!(parse_font_size("2em", 10.0), Some(20.0));
        assert_eq!(parse_font_size("1.5rem", 10.0), Some(24.0));
        assert_eq!(parse_font_size("150%", 12.0), Some(18.0));
        assert_eq!(parse_font_size("18pt", 16.0), Some(24.0));
        assert_eq!(parse_font_size("x-large", 16.0), Some(24.0));
        assert_eq!(parse_font_size("-2px", 16.0), None);
        assert_eq!(parse_font_size("calc(1em + 2px)", 16.0), None);
    }

    #[test]
    fn test_font_weight() {
        assert_eq!(parse_font_weight("bold", 400), Some(700));
        assert_eq!(parse_font_weight("600", 400), Some(600));
        assert_eq!(parse_font_weight("bolder", 400), Some(700));
        assert_eq!(parse_font_weight("lighter", 700), Some(400));
        assert_eq!(parse_font_weight("heavy", 400), None);
    }

    #[test]
    fn test_background_shorthand() {
        let parent = ComputedStyle::default();
        let mut style = ComputedStyle::inherit_from(&parent);
        style.apply_declaration(&Declaration::new("background", "url(\"a b.png\") no-repeat #336699"), &parent);
        assert_eq!(style.background_color, Color::rgb(0x33, 0x66, 0x99));

        style.apply_declaration(&Declaration::new("background", "none"), &parent);
        assert!(style.background_color.is_transparent());
    }

    #[test]
    fn test_font_shorthand() {
        let parent = ComputedStyle::default();
        let mut style = ComputedStyle::inherit_from(&parent);
        style.apply_declaration(&Declaration::new("font", "italic bold 18px/1.2 Georgia, serif"), &parent);
        assert_eq!(style.font_size, 18.0);
        assert_eq!(style.font_weight, 700);
    }

    #[test]
    fn test_global_keywords() {
        let parent = ComputedStyle {
            color: Color::rgb(1, 2, 3),
            background_color: Color::WHITE,
            ..ComputedStyle::default()
        };
        let mut style = ComputedStyle::inherit_from(&parent);
        style.apply_declaration(&Declaration::new("color", "red"), &parent);
        style.apply_declaration(&Declaration::new("color", "inherit"), &parent);
        assert_eq!(style.color, Color::rgb(1, 2, 3));

        style.apply_declaration(&Declaration::new("background-color", "unset"), &parent);
        assert!(style.background_color.is_transparent());
        style.apply_declaration(&Declaration::new("background-color", "inherit"), &parent);
        assert_eq!(style.background_color, Color::WHITE);
    }
}
