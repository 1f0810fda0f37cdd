//! CSS colors
//!
//! Parses the color syntaxes that show up in computed and authored styles:
//! hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`, named colors and `transparent`.

use std::fmt;

/// CSS color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent (alpha 0)
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse any supported CSS color, case-insensitively
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        if s.is_empty() {
            return None;
        }
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        if let Some((func, args)) = split_function(&s) {
            return match func {
                "rgb" | "rgba" => parse_rgb_args(args),
                "hsl" | "hsla" => parse_hsl_args(args),
                _ => None,
            };
        }
        Self::from_name(&s)
    }

    /// Parse a hex color (#RGB, #RGBA, #RRGGBB, #RRGGBBAA); leading `#` optional
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Parse a named color
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .binary_search_by(|(n, _)| n.cmp(&name))
            .ok()
            .map(|i| {
                let rgb = NAMED_COLORS[i].1;
                Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
            })
    }

    /// Serialize the way browsers report computed colors
    pub fn to_css_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = (self.a as f64 / 255.0 * 1000.0).round() / 1000.0;
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
        }
    }
}

/// `rgb(1, 2, 3)` -> ("rgb", "1, 2, 3")
fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

/// Split function arguments in either legacy comma or modern space/slash syntax
fn split_args(args: &str) -> Option<(Vec<&str>, Option<&str>)> {
    if args.contains(',') {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        match parts.len() {
            3 => Some((parts, None)),
            4 => Some((parts[..3].to_vec(), Some(parts[3]))),
            _ => None,
        }
    } else {
        let (channels, alpha) = match args.split_once('/') {
            Some((c, a)) => (c, Some(a.trim())),
            None => (args, None),
        };
        let parts: Vec<&str> = channels.split_whitespace().collect();
        if parts.len() != 3 {
            return None;
        }
        Some((parts, alpha))
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

fn clamp_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn parse_channel(s: &str) -> Option<u8> {
    match s.strip_suffix('%') {
        Some(pct) => Some(clamp_byte(parse_number(pct)? * 2.55)),
        None if s == "none" => Some(0),
        None => Some(clamp_byte(parse_number(s)?)),
    }
}

fn parse_alpha(s: Option<&str>) -> Option<u8> {
    let Some(s) = s else {
        return Some(255);
    };
    let value = match s.strip_suffix('%') {
        Some(pct) => parse_number(pct)? / 100.0,
        None => parse_number(s)?,
    };
    Some(clamp_byte(value.clamp(0.0, 1.0) * 255.0))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let (channels, alpha) = split_args(args)?;
    Some(Color::rgba(
        parse_channel(channels[0])?,
        parse_channel(channels[1])?,
        parse_channel(channels[2])?,
        parse_alpha(alpha)?,
    ))
}

fn parse_hsl_args(args: &str) -> Option<Color> {
    let (channels, alpha) = split_args(args)?;
    let hue = channels[0].trim_end_matches("deg");
    let h = parse_number(hue)?.rem_euclid(360.0) / 360.0;
    let s = parse_number(channels[1].trim_end_matches('%'))?.clamp(0.0, 100.0) / 100.0;
    let l = parse_number(channels[2].trim_end_matches('%'))?.clamp(0.0, 100.0) / 100.0;

    let (r, g, b) = hsl_to_rgb(h, s, l);
    Some(Color::rgba(clamp_byte(r * 255.0), clamp_byte(g * 255.0), clamp_byte(b * 255.0), parse_alpha(alpha)?))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    (hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// CSS Color Level 4 named colors, sorted for binary search
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff), ("antiquewhite", 0xfaebd7), ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4), ("azure", 0xf0ffff), ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4), ("black", 0x000000), ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff), ("blueviolet", 0x8a2be2), ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887), ("cadetblue", 0x5f9ea0), ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e), ("coral", 0xff7f50), ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc), ("crimson", 0xdc143c), ("cyan", 0x00ffff),
    ("darkblue", 0x00008b), ("darkcyan", 0x008b8b), ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9), ("darkgreen", 0x006400), ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b), ("darkmagenta", 0x8b008b), ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00), ("darkorchid", 0x9932cc), ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a), ("darkseagreen", 0x8fbc8f), ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f), ("darkslategrey", 0x2f4f4f), ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3), ("deeppink", 0xff1493), ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969), ("dimgrey", 0x696969), ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222), ("floralwhite", 0xfffaf0), ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff), ("gainsboro", 0xdcdcdc), ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700), ("goldenrod", 0xdaa520), ("gray", 0x808080),
    ("green", 0x008000), ("greenyellow", 0xadff2f), ("grey", 0x808080),
    ("honeydew", 0xf0fff0), ("hotpink", 0xff69b4), ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082), ("ivory", 0xfffff0), ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa), ("lavenderblush", 0xfff0f5), ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd), ("lightblue", 0xadd8e6), ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff), ("lightgoldenrodyellow", 0xfafad2), ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90), ("lightgrey", 0xd3d3d3), ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a), ("lightseagreen", 0x20b2aa), ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899), ("lightslategrey", 0x778899), ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0), ("lime", 0x00ff00), ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6), ("magenta", 0xff00ff), ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa), ("mediumblue", 0x0000cd), ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db), ("mediumseagreen", 0x3cb371), ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a), ("mediumturquoise", 0x48d1cc), ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970), ("mintcream", 0xf5fffa), ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5), ("navajowhite", 0xffdead), ("navy", 0x000080),
    ("oldlace", 0xfdf5e6), ("olive", 0x808000), ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500), ("orangered", 0xff4500), ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa), ("palegreen", 0x98fb98), ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093), ("papayawhip", 0xffefd5), ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f), ("pink", 0xffc0cb), ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6), ("purple", 0x800080), ("rebeccapurple", 0x663399),
    ("red", 0xff0000), ("rosybrown", 0xbc8f8f), ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513), ("salmon", 0xfa8072), ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57), ("seashell", 0xfff5ee), ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0), ("skyblue", 0x87ceeb), ("slateblue", 0x6a5acd),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f), ("steelblue", 0x4682b4), ("tan", 0xd2b48c),
    ("teal", 0x008080), ("thistle", 0xd8bfd8), ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0), ("violet", 0xee82ee), ("wheat", 0xf5deb3),
    ("white", 0xffffff), ("whitesmoke", 0xf5f5f5), ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_table_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_hex() {
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#000000"), Some(Color::BLACK));
        assert_eq!(Color::parse("#ff000080"), Some(Color::rgba(255, 0, 0, 128)));
        assert_eq!(Color::parse("#0000"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("#ggg"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn test_rgb_syntaxes() {
        assert_eq!(Color::parse("rgb(255, 255, 255)"), Some(Color::WHITE));
        assert_eq!(Color::parse("RGB(0,0,0)"), Some(Color::BLACK));
        assert_eq!(Color::parse("rgba(0, 0, 0, 0)"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("rgb(0 128 0 / 50%)"), Some(Color::rgba(0, 128, 0, 128)));
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("rgb(1, 2)"), None);
        assert_eq!(Color::parse("rgb(a, b, c)"), None);
    }

    #[test]
    fn test_hsl() {
        assert_eq!(Color::parse("hsl(0, 100%, 50%)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("hsl(120deg 100% 25%)"), Some(Color::rgb(0, 128, 0)));
        assert_eq!(Color::parse("hsla(0, 0%, 100%, 1)"), Some(Color::WHITE));
    }

    #[test]
    fn test_named() {
        assert_eq!(Color::parse("White"), Some(Color::WHITE));
        assert_eq!(Color::parse("rebeccapurple"), Some(Color::rgb(0x66, 0x33, 0x99)));
        assert_eq!(Color::parse("transparent"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("notacolor"), None);
        assert_eq!(Color::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(1, 2, 3).to_css_string(), "rgb(1, 2, 3)");
        assert_eq!(Color::rgba(0, 0, 0, 0).to_css_string(), "rgba(0, 0, 0, 0)");
        let reparsed = Color::parse(&Color::rgba(10, 20, 30, 128).to_css_string()).unwrap();
        assert_eq!(reparsed, Color::rgba(10, 20, 30, 128));
    }
}
